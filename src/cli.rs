// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigChange;
use crate::core::DisplayContext;
use crate::error::Result;
use crate::geometry::GeometryKind;
use crate::material::MaterialKind;
use crate::math::Color;
use crate::scenes::{preset_by_name_or_default, ScenePreset, DEFAULT_PRESET};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scene-sync")]
#[command(about = "Spinning mesh driven by a live control panel", long_about = None)]
pub struct Cli {
    /// Starting preset: getting-started, torus, icosahedron, pilot (falls back to $SCENE)
    #[arg(long)]
    pub scene: Option<String>,

    /// JSON file overriding the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub geometry: Option<String>,

    #[arg(long)]
    pub material: Option<String>,

    /// Object color as #RRGGBB
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub rotation_speed: Option<f32>,

    #[arg(long)]
    pub light_intensity: Option<f32>,

    #[arg(long)]
    pub camera_distance: Option<f32>,

    #[arg(long)]
    pub flat_shading: bool,

    /// Draw the white edge overlay
    #[arg(long)]
    pub wireframe: bool,

    /// Start with the animation stopped
    #[arg(long)]
    pub paused: bool,

    /// Hide the control panel
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Render offscreen without a window, then exit
    #[arg(long)]
    pub headless: bool,

    /// Frames to render in headless mode
    #[arg(long, default_value_t = 120)]
    pub frames: u64,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,
}

impl Cli {
    /// Preset name from the flag, then $SCENE, then the default
    pub fn scene_name(&self) -> String {
        self.scene
            .clone()
            .or_else(|| std::env::var("SCENE").ok())
            .unwrap_or_else(|| DEFAULT_PRESET.to_string())
    }

    pub fn viewport(&self) -> DisplayContext {
        DisplayContext::new(self.width, self.height)
    }

    /// Individual flags as changes, in field order
    pub fn overrides(&self) -> Result<Vec<ConfigChange>> {
        let mut changes = Vec::new();

        if let Some(name) = &self.geometry {
            changes.push(ConfigChange::Geometry(GeometryKind::from_name_or_default(name)));
        }
        if let Some(name) = &self.material {
            changes.push(ConfigChange::Material(MaterialKind::from_name_or_default(name)));
        }
        if let Some(hex) = &self.color {
            changes.push(ConfigChange::Color(hex.parse::<Color>()?));
        }
        if let Some(v) = self.rotation_speed {
            changes.push(ConfigChange::RotationSpeed(v));
        }
        if let Some(v) = self.light_intensity {
            changes.push(ConfigChange::LightIntensity(v));
        }
        if let Some(v) = self.camera_distance {
            changes.push(ConfigChange::CameraDistance(v));
        }
        if self.flat_shading {
            changes.push(ConfigChange::FlatShading(true));
        }
        if self.wireframe {
            changes.push(ConfigChange::Wireframe(true));
        }
        if self.paused {
            changes.push(ConfigChange::Paused(true));
        }
        Ok(changes)
    }

    /// Preset, then config file, then flags
    pub fn resolve(&self) -> Result<ScenePreset> {
        let mut preset = preset_by_name_or_default(&self.scene_name());
        log::info!("scene preset: {}", preset.name);

        if let Some(path) = &self.config {
            log::info!("loading config {}", path.display());
            preset.config = preset.config.overlay_json_file(path)?;
        }

        for change in self.overrides()? {
            preset.config.apply(change);
        }
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scene-sync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]);
        assert!(!cli.no_ui);
        assert!(!cli.headless);
        assert_eq!(cli.frames, 120);
        assert_eq!(cli.viewport(), DisplayContext::new(1280, 720));
        assert!(cli.overrides().unwrap().is_empty());
    }

    #[test]
    fn flags_become_changes() {
        let cli = parse(&[
            "--geometry",
            "torus",
            "--color",
            "#ff8800",
            "--rotation-speed",
            "0.05",
            "--paused",
            "--wireframe",
        ]);
        assert_eq!(
            cli.overrides().unwrap(),
            vec![
                ConfigChange::Geometry(GeometryKind::Torus),
                ConfigChange::Color(Color::new(0xff, 0x88, 0x00)),
                ConfigChange::RotationSpeed(0.05),
                ConfigChange::Wireframe(true),
                ConfigChange::Paused(true),
            ]
        );
    }

    #[test]
    fn flags_override_the_preset() {
        let preset = parse(&["--scene", "icosahedron", "--camera-distance", "20", "--material", "phong"])
            .resolve()
            .unwrap();
        assert_eq!(preset.name, "icosahedron");
        assert_eq!(preset.config.geometry, GeometryKind::Icosahedron);
        assert_eq!(preset.config.material, MaterialKind::Phong);
        assert_eq!(preset.config.camera_distance, 10.0);
        assert!(preset.config.wireframe && preset.config.flat_shading);
    }

    #[test]
    fn unknown_geometry_is_not_fatal() {
        let cli = parse(&["--geometry", "teapot"]);
        assert_eq!(cli.overrides().unwrap(), vec![ConfigChange::Geometry(GeometryKind::Box)]);
    }

    #[test]
    fn bad_color_is_an_error() {
        assert!(parse(&["--color", "chartreuse"]).overrides().is_err());
    }

    #[test]
    fn headless_options() {
        let cli = parse(&["--headless", "--frames", "10", "--width", "64", "--height", "32", "--no-ui"]);
        assert!(cli.headless && cli.no_ui);
        assert_eq!(cli.frames, 10);
        assert_eq!(cli.viewport().aspect(), 2.0);
    }
}
