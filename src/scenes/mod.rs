mod getting_started;
mod icosahedron;
mod pilot;
mod torus;

pub use getting_started::create_getting_started_preset;
pub use icosahedron::create_icosahedron_preset;
pub use pilot::create_pilot_preset;
pub use torus::create_torus_preset;

use crate::config::SceneConfig;
use crate::light::LightRig;

/// Named starting configuration and light rig
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePreset {
    pub name: &'static str,
    pub config: SceneConfig,
    pub lights: LightRig,
}

pub const DEFAULT_PRESET: &str = "getting-started";

pub const PRESET_NAMES: [&str; 4] = ["getting-started", "torus", "icosahedron", "pilot"];

pub fn preset_by_name(name: &str) -> Option<ScenePreset> {
    match name.trim().to_ascii_lowercase().as_str() {
        "getting-started" => Some(create_getting_started_preset()),
        "torus" => Some(create_torus_preset()),
        "icosahedron" => Some(create_icosahedron_preset()),
        "pilot" => Some(create_pilot_preset()),
        _ => None,
    }
}

pub fn preset_by_name_or_default(name: &str) -> ScenePreset {
    preset_by_name(name).unwrap_or_else(|| {
        log::warn!("unknown scene {:?}, using {}", name, DEFAULT_PRESET);
        create_getting_started_preset()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves_to_itself() {
        for name in PRESET_NAMES {
            assert_eq!(preset_by_name(name).map(|p| p.name), Some(name));
        }
    }

    #[test]
    fn unknown_name_falls_back() {
        assert!(preset_by_name("fractal").is_none());
        assert_eq!(preset_by_name_or_default("fractal").name, DEFAULT_PRESET);
    }

    #[test]
    fn presets_are_already_in_range() {
        for name in PRESET_NAMES {
            let preset = preset_by_name_or_default(name);
            assert_eq!(preset.config, preset.config.normalized(), "{}", name);
        }
    }
}
