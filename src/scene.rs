use std::fmt;

use glam::{EulerRot, Mat4, Vec3};

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::core::{DisplayContext, GeometryHandle, MaterialHandle};
use crate::geometry::GeometryKind;
use crate::light::LightRig;
use crate::material::Material;
use crate::types::ModelUniform;

/// Identity of a built scene object; a rebuild yields a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Euler rotation in radians, applied X then Y then Z
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub rotation: Vec3,
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn to_uniform(&self) -> ModelUniform {
        ModelUniform {
            matrix: self.matrix().to_cols_array_2d(),
        }
    }

    /// Rotation with a uniform scale applied first
    pub fn scaled_uniform(&self, scale: f32) -> ModelUniform {
        ModelUniform {
            matrix: (self.matrix() * Mat4::from_scale(Vec3::splat(scale))).to_cols_array_2d(),
        }
    }
}

/// The single renderable in the scene slot
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub geometry: GeometryKind,
    pub material: Material,
    pub transform: Transform,
    pub geometry_handle: GeometryHandle,
    pub material_handle: MaterialHandle,
}

/// Everything the builder, synchronizer and render loop share
#[derive(Debug, Clone)]
pub struct SceneState {
    pub config: SceneConfig,
    pub object: Option<SceneObject>,
    pub lights: LightRig,
    pub camera: Camera,
    pub viewport: DisplayContext,
    /// Seconds of animation time seen by the last running tick
    pub elapsed: f32,
}

impl SceneState {
    /// Empty slot, camera and lights derived from `config`
    pub fn new(config: SceneConfig, mut lights: LightRig, viewport: DisplayContext) -> Self {
        let config = config.normalized();
        lights.set_intensity(config.light_intensity);
        lights.update(0.0);
        Self {
            camera: Camera::new(config.camera_distance, viewport.aspect()),
            config,
            object: None,
            lights,
            viewport,
            elapsed: 0.0,
        }
    }

    /// Material the current configuration describes
    pub fn configured_material(&self) -> Material {
        Material::new(self.config.material, self.config.color)
            .with_flat_shading(self.config.flat_shading)
            .with_wireframe(self.config.wireframe)
    }

    pub fn object_id(&self) -> Option<ObjectId> {
        self.object.as_ref().map(|o| o.id)
    }

    pub fn rotation(&self) -> Option<Vec3> {
        self.object.as_ref().map(|o| o.transform.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigChange;
    use crate::material::MaterialKind;
    use crate::math::Color;

    #[test]
    fn identity_transform() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_about_y_turns_x_into_minus_z() {
        let transform = Transform {
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
        };
        let p = transform.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn new_state_follows_config() {
        let mut config = SceneConfig::default();
        config.apply(ConfigChange::CameraDistance(8.0));
        config.apply(ConfigChange::LightIntensity(0.5));
        config.apply(ConfigChange::Material(MaterialKind::Phong));

        let state = SceneState::new(config, LightRig::default(), DisplayContext::new(800, 400));
        assert!(state.object.is_none());
        assert_eq!(state.camera.distance, 8.0);
        assert_eq!(state.camera.aspect, 2.0);
        assert_eq!(state.lights.intensity(), 0.5);
        assert_eq!(state.configured_material().kind, MaterialKind::Phong);
        assert_eq!(state.configured_material().color, Color::GREEN);
    }
}
