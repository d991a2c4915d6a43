use super::ScenePreset;
use crate::config::SceneConfig;
use crate::geometry::GeometryKind;
use crate::light::{Light, LightRig, Orbit};
use crate::material::MaterialKind;
use crate::math::Color;

/// Lit torus with a key light circling it
pub fn create_torus_preset() -> ScenePreset {
    let config = SceneConfig {
        geometry: GeometryKind::Torus,
        material: MaterialKind::Standard,
        color: Color::from_seed(7),
        rotation_speed: 0.01,
        ..SceneConfig::default()
    };

    ScenePreset {
        name: "torus",
        config,
        lights: LightRig::new(vec![
            Light::ambient(Color::from_hex(0x404040), 0.5),
            Light::orbiting(
                Color::WHITE,
                1.0,
                Orbit {
                    radius: 7.0,
                    height: 5.0,
                    speed: 0.8,
                },
            ),
        ]),
    }
}
