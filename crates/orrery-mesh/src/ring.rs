//! Flat annulus generation for planetary rings.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::Mesh;

/// Generates a flat ring in the XZ plane, centered on the origin.
///
/// The texture's `u` axis runs radially from the inner edge (`0`) to the outer
/// edge (`1`), so a 1D alpha strip maps across the ring's width; `v` runs once
/// around. Fewer than 3 segments is raised to 3.
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let columns = segments + 1;

    let mut positions = Vec::with_capacity(2 * columns as usize);
    let mut uvs = Vec::with_capacity(2 * columns as usize);

    for (edge, radius) in [inner_radius, outer_radius].into_iter().enumerate() {
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let (sin, cos) = (t * TAU).sin_cos();
            positions.push(Vec3::new(radius * cos, 0.0, -radius * sin));
            uvs.push([edge as f32, t]);
        }
    }
    let normals = vec![Vec3::Y; positions.len()];

    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let inner = i;
        let outer = columns + i;
        indices.extend_from_slice(&[inner, outer, inner + 1]);
        indices.extend_from_slice(&[outer, outer + 1, inner + 1]);
    }

    Mesh {
        positions,
        normals,
        uvs,
        indices,
    }
}
