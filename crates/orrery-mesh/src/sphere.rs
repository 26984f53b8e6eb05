//! Latitude/longitude sphere generation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::Mesh;

/// Generates a UV sphere of the given radius.
///
/// Rows run from the north pole (`+Y`) to the south pole; columns wrap once
/// around the `Y` axis with a duplicated seam column so the equirectangular
/// texture meets cleanly. Segment counts below 3 around or 2 across are
/// raised to those minimums.
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let width = width_segments.max(3);
    let height = height_segments.max(2);
    let columns = width + 1;

    let vertex_count = (columns * (height + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let normal = Vec3::new(-cos_theta * sin_phi, cos_phi, sin_theta * sin_phi);
            positions.push(normal * radius);
            normals.push(normal.normalize_or_zero());
            uvs.push([u, v]);
        }
    }

    // Poles collapse to a point, so the first and last rows only need one
    // triangle per quad.
    let mut indices = Vec::with_capacity((width * (height - 1) * 6) as usize);
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * columns + ix + 1;
            let b = iy * columns + ix;
            let c = (iy + 1) * columns + ix;
            let d = (iy + 1) * columns + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Mesh {
        positions,
        normals,
        uvs,
        indices,
    }
}
