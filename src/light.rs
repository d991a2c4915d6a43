use glam::Vec3;

use crate::math::Color;
use crate::types::{LightsUniform, PointLightUniform, MAX_POINT_LIGHTS};

/// Circular path of a point light around the Y axis
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Orbit {
    pub radius: f32,
    pub height: f32,
    /// Radians per second
    pub speed: f32,
}

impl Orbit {
    pub fn position_at(&self, time: f32) -> Vec3 {
        let angle = time * self.speed;
        Vec3::new(self.radius * angle.cos(), self.height, self.radius * angle.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Point {
        color: Color,
        intensity: f32,
        position: Vec3,
        orbit: Option<Orbit>,
    },
    Hemisphere {
        sky: Color,
        ground: Color,
        intensity: f32,
    },
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Light::Ambient { color, intensity }
    }

    pub fn point(color: Color, intensity: f32, position: Vec3) -> Self {
        Light::Point {
            color,
            intensity,
            position,
            orbit: None,
        }
    }

    pub fn orbiting(color: Color, intensity: f32, orbit: Orbit) -> Self {
        Light::Point {
            color,
            intensity,
            position: orbit.position_at(0.0),
            orbit: Some(orbit),
        }
    }

    pub fn hemisphere(sky: Color, ground: Color, intensity: f32) -> Self {
        Light::Hemisphere { sky, ground, intensity }
    }

    /// Direct lights follow the global intensity; ambient fill does not
    pub fn is_direct(&self) -> bool {
        !matches!(self, Light::Ambient { .. })
    }
}

fn scaled(color: Color, intensity: f32) -> [f32; 4] {
    let [r, g, b] = color.to_linear_f32();
    [r * intensity, g * intensity, b * intensity, 1.0]
}

/// Lights of the scene plus the user-controlled intensity scale
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: Vec<Light>,
    scale: f32,
}

impl LightRig {
    pub fn new(lights: Vec<Light>) -> Self {
        let points = lights.iter().filter(|l| matches!(l, Light::Point { .. })).count();
        if points > MAX_POINT_LIGHTS {
            log::warn!(
                "{} point lights configured, only the first {} are rendered",
                points,
                MAX_POINT_LIGHTS
            );
        }
        Self { lights, scale: 1.0 }
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn intensity(&self) -> f32 {
        self.scale
    }

    /// Scale direct lights in place
    pub fn set_intensity(&mut self, intensity: f32) {
        self.scale = intensity;
    }

    /// Effective intensity of a light after scaling
    pub fn effective_intensity(&self, light: &Light) -> f32 {
        let base = match light {
            Light::Ambient { intensity, .. }
            | Light::Point { intensity, .. }
            | Light::Hemisphere { intensity, .. } => *intensity,
        };
        if light.is_direct() {
            base * self.scale
        } else {
            base
        }
    }

    /// Move orbiting lights to their position at `time` seconds
    pub fn update(&mut self, time: f32) {
        for light in &mut self.lights {
            if let Light::Point {
                position,
                orbit: Some(orbit),
                ..
            } = light
            {
                *position = orbit.position_at(time);
            }
        }
    }

    pub fn to_uniform(&self) -> LightsUniform {
        let mut uniform = LightsUniform {
            ambient: [0.0; 4],
            sky: [0.0; 4],
            ground: [0.0; 4],
            count: [0; 4],
            points: [PointLightUniform::default(); MAX_POINT_LIGHTS],
        };

        let mut points = 0usize;
        for light in &self.lights {
            let intensity = self.effective_intensity(light);
            match *light {
                Light::Ambient { color, .. } => {
                    let c = scaled(color, intensity);
                    for i in 0..3 {
                        uniform.ambient[i] += c[i];
                    }
                }
                Light::Hemisphere { sky, ground, .. } => {
                    uniform.sky = scaled(sky, intensity);
                    uniform.ground = scaled(ground, intensity);
                }
                Light::Point { color, position, .. } if points < MAX_POINT_LIGHTS => {
                    uniform.points[points] = PointLightUniform {
                        position: position.extend(intensity).to_array(),
                        color: scaled(color, 1.0),
                    };
                    points += 1;
                }
                Light::Point { .. } => {}
            }
        }
        uniform.ambient[3] = 1.0;
        uniform.count[0] = points as u32;
        uniform
    }
}

impl Default for LightRig {
    /// Soft ambient fill plus one static key light
    fn default() -> Self {
        Self::new(vec![
            Light::ambient(Color::WHITE, 0.4),
            Light::point(Color::WHITE, 1.0, Vec3::new(5.0, 5.0, 5.0)),
        ])
    }
}
