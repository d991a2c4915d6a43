use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::MeshData;
use crate::types::Vertex;

/// Axis-aligned box centered on the origin, 4 vertices per face so edges stay sharp
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let dims = Vec3::new(width, height, depth);

    // (normal, u, v) with u x v == normal so each quad winds CCW seen from outside
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let vertices: Vec<Vertex> = faces
        .iter()
        .flat_map(|&(normal, u, v)| {
            corners.iter().map(move |&(s, t)| {
                let p = (normal + u * s + v * t) * 0.5 * dims;
                Vertex::new(p.to_array(), normal.to_array())
            })
        })
        .collect();

    let indices = (0..faces.len() as u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect();

    MeshData { vertices, indices }
}

/// UV sphere; pole rows emit a single triangle per segment
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let vertices = (0..=hs)
        .flat_map(|iy| {
            let v = iy as f32 / hs as f32;
            (0..=ws).map(move |ix| {
                let u = ix as f32 / ws as f32;
                let dir = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                Vertex::new((dir * radius).to_array(), dir.normalize_or_zero().to_array())
            })
        })
        .collect();

    let row = ws + 1;
    let mut indices = Vec::with_capacity((6 * ws * (hs - 1)) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Torus in the XY plane around the Z axis
pub fn torus_mesh(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let rs = radial_segments.max(3);
    let ts = tubular_segments.max(3);

    let vertices = (0..=rs)
        .flat_map(|j| {
            let v = j as f32 / rs as f32 * TAU;
            (0..=ts).map(move |i| {
                let u = i as f32 / ts as f32 * TAU;
                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - center).normalize_or_zero();
                Vertex::new(position.to_array(), normal.to_array())
            })
        })
        .collect();

    let row = ts + 1;
    let indices = (1..=rs)
        .flat_map(|j| {
            (1..=ts).flat_map(move |i| {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                [a, b, d, b, c, d]
            })
        })
        .collect();

    MeshData { vertices, indices }
}

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
];

/// Subdivided icosahedron projected onto a sphere, unshared vertices per triangle
pub fn icosahedron_mesh(radius: f32, detail: u32) -> MeshData {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let corners = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ];

    let cols = detail as usize + 1;
    let mut positions = Vec::with_capacity(ICOSAHEDRON_FACES.len() * cols * cols * 3);

    for [ia, ib, ic] in ICOSAHEDRON_FACES {
        let (a, b, c) = (corners[ia], corners[ib], corners[ic]);

        let grid: Vec<Vec<Vec3>> = (0..=cols)
            .map(|i| {
                let aj = a.lerp(c, i as f32 / cols as f32);
                let bj = b.lerp(c, i as f32 / cols as f32);
                let rows = cols - i;
                (0..=rows)
                    .map(|j| {
                        if rows == 0 {
                            aj
                        } else {
                            aj.lerp(bj, j as f32 / rows as f32)
                        }
                    })
                    .collect()
            })
            .collect();

        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                let tri = if j % 2 == 0 {
                    [grid[i][k + 1], grid[i + 1][k], grid[i][k]]
                } else {
                    [grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]
                };
                positions.extend_from_slice(&tri);
            }
        }
    }

    let vertices: Vec<Vertex> = positions
        .into_iter()
        .map(|p| {
            let n = p.normalize();
            Vertex::new((n * radius).to_array(), n.to_array())
        })
        .collect();
    let indices = (0..vertices.len() as u32).collect();

    MeshData { vertices, indices }
}
