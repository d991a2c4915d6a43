use std::fmt;
use std::str::FromStr;

use crate::math::Color;
use crate::types::MaterialUniform;

/// Shading models, mirroring the basic/standard/phong trio of the tutorials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MaterialKind {
    /// Unlit flat color
    #[default]
    Basic,
    /// Diffuse with a soft, broad highlight
    Standard,
    /// Diffuse with a tight specular highlight
    Phong,
}

/// Per-kind shading constants fed to the shader
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shading {
    pub lit: bool,
    pub shininess: f32,
    pub specular: f32,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [MaterialKind::Basic, MaterialKind::Standard, MaterialKind::Phong];

    pub fn shading(self) -> Shading {
        match self {
            MaterialKind::Basic => Shading { lit: false, shininess: 1.0, specular: 0.0 },
            MaterialKind::Standard => Shading { lit: true, shininess: 8.0, specular: 0.15 },
            MaterialKind::Phong => Shading { lit: true, shininess: 30.0, specular: 0.5 },
        }
    }

    /// Index the shader switches on
    pub fn shader_index(self) -> u32 {
        match self {
            MaterialKind::Basic => 0,
            MaterialKind::Standard => 1,
            MaterialKind::Phong => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MaterialKind::Basic => "basic",
            MaterialKind::Standard => "standard",
            MaterialKind::Phong => "phong",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaterialKind::Basic => "Basic",
            MaterialKind::Standard => "Standard",
            MaterialKind::Phong => "Phong",
        }
    }

    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = MaterialKind::default();
            log::warn!("unknown material {:?}, using {}", name, fallback.name());
            fallback
        })
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaterialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| format!("unknown material {:?}", s))
    }
}

impl From<String> for MaterialKind {
    fn from(name: String) -> Self {
        Self::from_name_or_default(&name)
    }
}

/// Material state of the scene object; color, flat shading and wireframe mutate in place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub flat_shading: bool,
    /// Draw the edge overlay on top of the surface
    pub wireframe: bool,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            flat_shading: false,
            wireframe: false,
        }
    }

    pub fn with_flat_shading(mut self, flat: bool) -> Self {
        self.flat_shading = flat;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Unlit white used for the edge overlay
    pub fn wire_uniform() -> MaterialUniform {
        Material::new(MaterialKind::Basic, Color::WHITE).to_uniform()
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        let shading = self.kind.shading();
        let [r, g, b] = self.color.to_linear_f32();
        MaterialUniform {
            color: [r, g, b, 1.0],
            params: [
                self.kind.shader_index() as f32,
                if self.flat_shading { 1.0 } else { 0.0 },
                shading.shininess,
                shading.specular,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_is_unlit() {
        assert!(!MaterialKind::Basic.shading().lit);
        assert!(MaterialKind::Standard.shading().lit);
        assert!(MaterialKind::Phong.shading().lit);
    }

    #[test]
    fn phong_is_shinier_than_standard() {
        let standard = MaterialKind::Standard.shading();
        let phong = MaterialKind::Phong.shading();
        assert!(phong.shininess > standard.shininess);
        assert!(phong.specular > standard.specular);
    }

    #[test]
    fn unknown_name_falls_back_to_basic() {
        assert_eq!(MaterialKind::from_name_or_default("lambert"), MaterialKind::Basic);
        let kind: MaterialKind = serde_json::from_str("\"toon\"").unwrap();
        assert_eq!(kind, MaterialKind::Basic);
        let kind: MaterialKind = serde_json::from_str("\"phong\"").unwrap();
        assert_eq!(kind, MaterialKind::Phong);
    }

    #[test]
    fn uniform_packs_kind_and_color() {
        let uniform = Material::new(MaterialKind::Phong, Color::WHITE)
            .with_flat_shading(true)
            .to_uniform();
        assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.params[0], 2.0);
        assert_eq!(uniform.params[1], 1.0);
        assert_eq!(uniform.params[2], 30.0);
    }

    #[test]
    fn uniform_color_is_linear() {
        let uniform = Material::new(MaterialKind::Basic, Color::GREEN).to_uniform();
        let [r, g, b] = Color::GREEN.to_linear_f32();
        assert_eq!(uniform.color, [r, g, b, 1.0]);
        // 0xAF / 255 would be 0.686
        assert!((uniform.color[1] - 0.4287).abs() < 1e-3);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(MaterialKind::Phong.next(), MaterialKind::Basic);
        assert_eq!(MaterialKind::Basic.prev(), MaterialKind::Phong);
    }
}
