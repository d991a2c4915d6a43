mod primitives;

pub use primitives::{box_mesh, icosahedron_mesh, sphere_mesh, torus_mesh};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::types::Vertex;

/// CPU-side triangle mesh handed to the backend for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Line-list indices, one segment per distinct edge; edges along split
    /// vertices (flat faces, UV seams) are matched by position
    pub fn edge_indices(&self) -> Vec<u32> {
        let key = |i: u32| {
            self.vertices
                .get(i as usize)
                .map(|v| v.position.map(f32::to_bits))
        };

        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let (Some(ka), Some(kb)) = (key(a), key(b)) else {
                    continue;
                };
                let edge = if ka <= kb { (ka, kb) } else { (kb, ka) };
                if seen.insert(edge) {
                    lines.extend([a, b]);
                }
            }
        }
        lines
    }
}

/// Geometry kinds selectable from the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum GeometryKind {
    #[default]
    Box,
    Sphere,
    Torus,
    Icosahedron,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 4] = [
        GeometryKind::Box,
        GeometryKind::Sphere,
        GeometryKind::Torus,
        GeometryKind::Icosahedron,
    ];

    /// Constructor for this kind with its default parameters
    pub fn constructor(self) -> fn() -> MeshData {
        match self {
            GeometryKind::Box => unit_box,
            GeometryKind::Sphere => unit_sphere,
            GeometryKind::Torus => ring_torus,
            GeometryKind::Icosahedron => faceted_icosahedron,
        }
    }

    pub fn build(self) -> MeshData {
        (self.constructor())()
    }

    pub fn name(self) -> &'static str {
        match self {
            GeometryKind::Box => "box",
            GeometryKind::Sphere => "sphere",
            GeometryKind::Torus => "torus",
            GeometryKind::Icosahedron => "icosahedron",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GeometryKind::Box => "Box",
            GeometryKind::Sphere => "Sphere",
            GeometryKind::Torus => "Torus",
            GeometryKind::Icosahedron => "Icosahedron",
        }
    }

    /// Parse a kind name, falling back to the default for anything unknown
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = GeometryKind::default();
            log::warn!("unknown geometry {:?}, using {}", name, fallback.name());
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

fn unit_box() -> MeshData {
    box_mesh(1.0, 1.0, 1.0)
}

fn unit_sphere() -> MeshData {
    sphere_mesh(1.0, 32, 16)
}

fn ring_torus() -> MeshData {
    torus_mesh(1.5, 0.2, 12, 48)
}

fn faceted_icosahedron() -> MeshData {
    icosahedron_mesh(1.0, 2)
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| format!("unknown geometry {:?}", s))
    }
}

impl From<String> for GeometryKind {
    fn from(name: String) -> Self {
        Self::from_name_or_default(&name)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn every_kind_builds_a_mesh() {
        for kind in GeometryKind::ALL {
            let mesh = kind.build();
            assert!(mesh.triangle_count() > 0, "{} produced no triangles", kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Sphere".parse::<GeometryKind>().unwrap(), GeometryKind::Sphere);
        assert_eq!(" TORUS ".parse::<GeometryKind>().unwrap(), GeometryKind::Torus);
    }

    #[test]
    fn unknown_name_falls_back_to_box() {
        assert_eq!(GeometryKind::from_name_or_default("cylinder"), GeometryKind::Box);
        let kind: GeometryKind = serde_json::from_str("\"dodecahedron\"").unwrap();
        assert_eq!(kind, GeometryKind::Box);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&GeometryKind::Icosahedron).unwrap(), "\"icosahedron\"");
    }

    #[test]
    fn next_and_prev_cycle() {
        assert_eq!(GeometryKind::Box.next(), GeometryKind::Sphere);
        assert_eq!(GeometryKind::Icosahedron.next(), GeometryKind::Box);
        assert_eq!(GeometryKind::Box.prev(), GeometryKind::Icosahedron);
        for kind in GeometryKind::ALL {
            assert_eq!(kind.next().prev(), kind);
        }
    }

    #[test]
    fn box_edges_are_shared_across_faces() {
        // 12 cube edges plus one diagonal per face
        let edges = GeometryKind::Box.build().edge_indices();
        assert_eq!(edges.len(), 2 * 18);
    }

    #[test]
    fn edges_reference_real_vertices() {
        for kind in GeometryKind::ALL {
            let mesh = kind.build();
            let edges = mesh.edge_indices();
            assert_eq!(edges.len() % 2, 0);
            assert!(!edges.is_empty(), "{} has no edges", kind);
            assert!(edges.iter().all(|&i| (i as usize) < mesh.vertices.len()));
            assert!(edges.chunks(2).all(|e| {
                Vec3::from_array(mesh.vertices[e[0] as usize].position)
                    != Vec3::from_array(mesh.vertices[e[1] as usize].position)
            }));
        }
    }
}
