use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::geometry::GeometryKind;
use crate::material::MaterialKind;
use crate::math::Color;

/// Slider bounds of a numeric field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

impl FieldRange {
    /// Clamp into range; non-finite input falls back to the default
    pub fn clamp(&self, field: ConfigField, value: f32) -> f32 {
        if !value.is_finite() {
            log::warn!("{} = {} is not a number, using {}", field, value, self.default);
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        if clamped != value {
            log::warn!("{} = {} out of [{}, {}], clamped to {}", field, value, self.min, self.max, clamped);
        }
        clamped
    }

    pub fn step_up(&self, value: f32) -> f32 {
        (value + self.step).min(self.max)
    }

    pub fn step_down(&self, value: f32) -> f32 {
        (value - self.step).max(self.min)
    }
}

pub const ROTATION_SPEED: FieldRange = FieldRange {
    min: 0.0,
    max: 0.1,
    step: 0.001,
    default: 0.01,
};

pub const LIGHT_INTENSITY: FieldRange = FieldRange {
    min: 0.0,
    max: 2.0,
    step: 0.1,
    default: 1.0,
};

pub const CAMERA_DISTANCE: FieldRange = FieldRange {
    min: 2.0,
    max: 10.0,
    step: 0.1,
    default: 5.0,
};

/// User-adjustable scene parameters; every field always has a value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub geometry: GeometryKind,
    pub material: MaterialKind,
    pub color: Color,
    /// Radians added to rotation x and y per tick
    pub rotation_speed: f32,
    pub light_intensity: f32,
    pub camera_distance: f32,
    pub flat_shading: bool,
    /// White edge overlay drawn just outside the surface
    pub wireframe: bool,
    pub paused: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryKind::default(),
            material: MaterialKind::default(),
            color: Color::GREEN,
            rotation_speed: ROTATION_SPEED.default,
            light_intensity: LIGHT_INTENSITY.default,
            camera_distance: CAMERA_DISTANCE.default,
            flat_shading: false,
            wireframe: false,
            paused: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Geometry,
    Material,
    Color,
    RotationSpeed,
    LightIntensity,
    CameraDistance,
    FlatShading,
    Wireframe,
    Paused,
}

impl ConfigField {
    pub const ALL: [ConfigField; 9] = [
        ConfigField::Geometry,
        ConfigField::Material,
        ConfigField::Color,
        ConfigField::RotationSpeed,
        ConfigField::LightIntensity,
        ConfigField::CameraDistance,
        ConfigField::FlatShading,
        ConfigField::Wireframe,
        ConfigField::Paused,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigField::Geometry => "geometry",
            ConfigField::Material => "material",
            ConfigField::Color => "color",
            ConfigField::RotationSpeed => "rotation_speed",
            ConfigField::LightIntensity => "light_intensity",
            ConfigField::CameraDistance => "camera_distance",
            ConfigField::FlatShading => "flat_shading",
            ConfigField::Wireframe => "wireframe",
            ConfigField::Paused => "paused",
        }
    }

    pub fn range(self) -> Option<FieldRange> {
        match self {
            ConfigField::RotationSpeed => Some(ROTATION_SPEED),
            ConfigField::LightIntensity => Some(LIGHT_INTENSITY),
            ConfigField::CameraDistance => Some(CAMERA_DISTANCE),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of the configuration set to a new value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    Geometry(GeometryKind),
    Material(MaterialKind),
    Color(Color),
    RotationSpeed(f32),
    LightIntensity(f32),
    CameraDistance(f32),
    FlatShading(bool),
    Wireframe(bool),
    Paused(bool),
}

impl ConfigChange {
    pub fn field(&self) -> ConfigField {
        match self {
            ConfigChange::Geometry(_) => ConfigField::Geometry,
            ConfigChange::Material(_) => ConfigField::Material,
            ConfigChange::Color(_) => ConfigField::Color,
            ConfigChange::RotationSpeed(_) => ConfigField::RotationSpeed,
            ConfigChange::LightIntensity(_) => ConfigField::LightIntensity,
            ConfigChange::CameraDistance(_) => ConfigField::CameraDistance,
            ConfigChange::FlatShading(_) => ConfigField::FlatShading,
            ConfigChange::Wireframe(_) => ConfigField::Wireframe,
            ConfigChange::Paused(_) => ConfigField::Paused,
        }
    }

    /// Numeric values clamped into their field range
    pub fn normalized(self) -> Self {
        match self {
            ConfigChange::RotationSpeed(v) => {
                ConfigChange::RotationSpeed(ROTATION_SPEED.clamp(ConfigField::RotationSpeed, v))
            }
            ConfigChange::LightIntensity(v) => {
                ConfigChange::LightIntensity(LIGHT_INTENSITY.clamp(ConfigField::LightIntensity, v))
            }
            ConfigChange::CameraDistance(v) => {
                ConfigChange::CameraDistance(CAMERA_DISTANCE.clamp(ConfigField::CameraDistance, v))
            }
            other => other,
        }
    }
}

impl fmt::Display for ConfigChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigChange::Geometry(kind) => write!(f, "geometry = {}", kind),
            ConfigChange::Material(kind) => write!(f, "material = {}", kind),
            ConfigChange::Color(color) => write!(f, "color = {}", color),
            ConfigChange::RotationSpeed(v) => write!(f, "rotation_speed = {:.3}", v),
            ConfigChange::LightIntensity(v) => write!(f, "light_intensity = {:.1}", v),
            ConfigChange::CameraDistance(v) => write!(f, "camera_distance = {:.1}", v),
            ConfigChange::FlatShading(v) => write!(f, "flat_shading = {}", v),
            ConfigChange::Wireframe(v) => write!(f, "wireframe = {}", v),
            ConfigChange::Paused(v) => write!(f, "paused = {}", v),
        }
    }
}

impl SceneConfig {
    /// Current value of a field, as the change that would set it
    pub fn get(&self, field: ConfigField) -> ConfigChange {
        match field {
            ConfigField::Geometry => ConfigChange::Geometry(self.geometry),
            ConfigField::Material => ConfigChange::Material(self.material),
            ConfigField::Color => ConfigChange::Color(self.color),
            ConfigField::RotationSpeed => ConfigChange::RotationSpeed(self.rotation_speed),
            ConfigField::LightIntensity => ConfigChange::LightIntensity(self.light_intensity),
            ConfigField::CameraDistance => ConfigChange::CameraDistance(self.camera_distance),
            ConfigField::FlatShading => ConfigChange::FlatShading(self.flat_shading),
            ConfigField::Wireframe => ConfigChange::Wireframe(self.wireframe),
            ConfigField::Paused => ConfigChange::Paused(self.paused),
        }
    }

    /// Set exactly the named field; returns false when the value is unchanged
    pub fn apply(&mut self, change: ConfigChange) -> bool {
        let change = change.normalized();
        if self.get(change.field()) == change {
            return false;
        }

        match change {
            ConfigChange::Geometry(v) => self.geometry = v,
            ConfigChange::Material(v) => self.material = v,
            ConfigChange::Color(v) => self.color = v,
            ConfigChange::RotationSpeed(v) => self.rotation_speed = v,
            ConfigChange::LightIntensity(v) => self.light_intensity = v,
            ConfigChange::CameraDistance(v) => self.camera_distance = v,
            ConfigChange::FlatShading(v) => self.flat_shading = v,
            ConfigChange::Wireframe(v) => self.wireframe = v,
            ConfigChange::Paused(v) => self.paused = v,
        }
        true
    }

    /// Copy with every numeric field clamped into range
    pub fn normalized(mut self) -> Self {
        for field in ConfigField::ALL {
            if field.range().is_some() {
                let change = self.get(field);
                self.apply(change);
            }
        }
        self
    }

    /// Changes that turn `self` into `target`, in field order
    pub fn diff(&self, target: &SceneConfig) -> Vec<ConfigChange> {
        let target = target.normalized();
        ConfigField::ALL
            .into_iter()
            .map(|field| target.get(field))
            .filter(|change| self.get(change.field()) != *change)
            .collect()
    }

    /// Keys present in `json` replace ours; everything else is kept
    pub fn overlay_json_str(&self, json: &str) -> serde_json::Result<Self> {
        let mut merged = serde_json::to_value(self)?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;

        match (merged.as_object_mut(), overrides) {
            (Some(base), serde_json::Value::Object(keys)) => base.extend(keys),
            (_, other) => merged = other,
        }
        serde_json::from_value::<SceneConfig>(merged).map(SceneConfig::normalized)
    }

    pub fn overlay_json_file(&self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = Self::read(path)?;
        self.overlay_json_str(&text).map_err(|source| SceneError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.geometry, GeometryKind::Box);
        assert_eq!(config.material, MaterialKind::Basic);
        assert_eq!(config.color, Color::from_hex(0x4caf50));
        assert_eq!(config.rotation_speed, 0.01);
        assert_eq!(config.light_intensity, 1.0);
        assert_eq!(config.camera_distance, 5.0);
        assert!(!config.flat_shading);
        assert!(!config.wireframe);
        assert!(!config.paused);
    }

    #[test]
    fn apply_updates_exactly_one_field() {
        let mut config = SceneConfig::default();
        assert!(config.apply(ConfigChange::LightIntensity(1.5)));

        let mut expected = SceneConfig::default();
        expected.light_intensity = 1.5;
        assert_eq!(config, expected);
    }

    #[test]
    fn apply_same_value_is_noop() {
        let mut config = SceneConfig::default();
        assert!(!config.apply(ConfigChange::Geometry(GeometryKind::Box)));
        assert!(!config.apply(ConfigChange::Color(Color::GREEN)));
    }

    #[test]
    fn out_of_range_values_clamp() {
        let mut config = SceneConfig::default();
        config.apply(ConfigChange::RotationSpeed(5.0));
        config.apply(ConfigChange::CameraDistance(-3.0));
        config.apply(ConfigChange::LightIntensity(f32::NAN));
        assert_eq!(config.rotation_speed, 0.1);
        assert_eq!(config.camera_distance, 2.0);
        assert_eq!(config.light_intensity, 1.0);
    }

    #[test]
    fn clamped_to_current_value_is_noop() {
        let mut config = SceneConfig::default();
        config.apply(ConfigChange::CameraDistance(10.0));
        assert!(!config.apply(ConfigChange::CameraDistance(50.0)));
    }

    #[test]
    fn diff_lists_changed_fields_in_order() {
        let current = SceneConfig::default();
        let mut target = current;
        target.color = Color::ORANGE;
        target.geometry = GeometryKind::Torus;
        target.camera_distance = 99.0;

        assert_eq!(
            current.diff(&target),
            vec![
                ConfigChange::Geometry(GeometryKind::Torus),
                ConfigChange::Color(Color::ORANGE),
                ConfigChange::CameraDistance(10.0),
            ]
        );
        assert!(current.diff(&current).is_empty());
    }

    #[test]
    fn json_missing_fields_take_defaults() {
        let config = SceneConfig::default()
            .overlay_json_str(r##"{ "geometry": "sphere", "color": "#ff0000" }"##)
            .unwrap();
        assert_eq!(config.geometry, GeometryKind::Sphere);
        assert_eq!(config.color, Color::new(255, 0, 0));
        assert_eq!(config.material, MaterialKind::Basic);
        assert_eq!(config.rotation_speed, 0.01);
    }

    #[test]
    fn json_unknown_kinds_fall_back_and_numbers_clamp() {
        let config =
            SceneConfig::default().overlay_json_str(r#"{ "geometry": "cone", "material": "toon", "rotation_speed": 1.0 }"#)
                .unwrap();
        assert_eq!(config.geometry, GeometryKind::Box);
        assert_eq!(config.material, MaterialKind::Basic);
        assert_eq!(config.rotation_speed, 0.1);
    }

    #[test]
    fn overlay_keeps_unmentioned_fields() {
        let mut base = SceneConfig::default();
        base.geometry = GeometryKind::Torus;
        base.flat_shading = true;

        let merged = base.overlay_json_str(r#"{ "material": "phong", "camera_distance": 3.0 }"#).unwrap();
        assert_eq!(merged.geometry, GeometryKind::Torus);
        assert!(merged.flat_shading);
        assert_eq!(merged.material, MaterialKind::Phong);
        assert_eq!(merged.camera_distance, 3.0);
    }

    #[test]
    fn overlay_rejects_non_object() {
        assert!(SceneConfig::default().overlay_json_str("[1, 2]").is_err());
    }

    #[test]
    fn json_bad_color_is_an_error() {
        assert!(SceneConfig::default().overlay_json_str(r#"{ "color": "green-ish" }"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SceneConfig::default()
            .overlay_json_file("/nonexistent/scene.json")
            .unwrap_err();
        assert!(matches!(err, SceneError::ConfigRead { .. }));
        assert!(err.to_string().contains("/nonexistent/scene.json"));
    }

    #[test]
    fn step_helpers_stay_in_range() {
        assert_eq!(CAMERA_DISTANCE.step_down(2.05), 2.0);
        assert_eq!(CAMERA_DISTANCE.step_up(10.0), 10.0);
        assert!((CAMERA_DISTANCE.step_up(5.0) - 5.1).abs() < 1e-6);
    }
}
