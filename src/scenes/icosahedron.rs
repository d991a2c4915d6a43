use super::ScenePreset;
use crate::config::SceneConfig;
use crate::geometry::GeometryKind;
use crate::light::{Light, LightRig};
use crate::material::MaterialKind;
use crate::math::Color;

/// Faceted white icosahedron with its edge overlay, under a red/brown hemisphere light
pub fn create_icosahedron_preset() -> ScenePreset {
    let config = SceneConfig {
        geometry: GeometryKind::Icosahedron,
        material: MaterialKind::Standard,
        color: Color::WHITE,
        rotation_speed: 0.002,
        camera_distance: 2.5,
        flat_shading: true,
        wireframe: true,
        ..SceneConfig::default()
    };

    ScenePreset {
        name: "icosahedron",
        config,
        lights: LightRig::new(vec![Light::hemisphere(
            Color::from_hex(0xff0000),
            Color::from_hex(0xaa5500),
            1.0,
        )]),
    }
}
