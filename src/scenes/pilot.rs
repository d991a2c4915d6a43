use glam::Vec3;

use super::ScenePreset;
use crate::config::SceneConfig;
use crate::light::{Light, LightRig};
use crate::material::MaterialKind;
use crate::math::Color;

/// Orange standard-material box lit by a distant point light
pub fn create_pilot_preset() -> ScenePreset {
    let config = SceneConfig {
        material: MaterialKind::Standard,
        color: Color::ORANGE,
        ..SceneConfig::default()
    };

    ScenePreset {
        name: "pilot",
        config,
        lights: LightRig::new(vec![
            Light::ambient(Color::WHITE, 0.3),
            Light::point(Color::WHITE, 1.0, Vec3::new(10.0, 10.0, 10.0)),
        ]),
    }
}
