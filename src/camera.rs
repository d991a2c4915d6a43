use glam::{Mat4, Vec3};

use crate::types::CameraUniform;

pub const FOV_DEGREES: f32 = 50.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;

/// Perspective camera on the +Z axis looking at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
}

impl Camera {
    pub fn new(distance: f32, aspect: f32) -> Self {
        Self {
            fov_y: FOV_DEGREES.to_radians(),
            aspect,
            near: NEAR,
            far: FAR,
            distance,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
            position: self.position().to_array(),
            _pad: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(5.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn sits_on_positive_z() {
        let camera = Camera::new(7.5, 1.5);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 7.5));
        assert!((camera.fov_y - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = Camera::new(5.0, 16.0 / 9.0);
        let clip = camera.view_proj() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn ignores_degenerate_aspect() {
        let mut camera = Camera::new(5.0, 2.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect(0.5);
        assert_eq!(camera.aspect, 0.5);
    }

    #[test]
    fn farther_camera_shrinks_the_object() {
        let edge = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let near = Camera::new(2.0, 1.0).view_proj() * edge;
        let far = Camera::new(10.0, 1.0).view_proj() * edge;
        assert!(near.x / near.w > far.x / far.w);
    }
}
