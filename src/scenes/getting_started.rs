use glam::Vec3;

use super::ScenePreset;
use crate::config::SceneConfig;
use crate::light::{Light, LightRig};
use crate::math::Color;

/// Green unlit cube spinning in front of the camera
pub fn create_getting_started_preset() -> ScenePreset {
    ScenePreset {
        name: "getting-started",
        config: SceneConfig::default(),
        lights: LightRig::new(vec![
            Light::ambient(Color::from_hex(0x404040), 0.5),
            Light::point(Color::WHITE, 1.0, Vec3::new(5.0, 5.0, 5.0)),
        ]),
    }
}
