//! Light sources.

use glam::Vec3;

use crate::graph::NodeId;

/// Omnidirectional light. When `attached_to` is set it follows that node's
/// world position, otherwise it sits at `position`.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub attached_to: Option<NodeId>,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
}

impl PointLight {
    pub fn attached(node: NodeId, color: Vec3, intensity: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            attached_to: Some(node),
            color,
            intensity,
        }
    }
}

/// Constant light added to every lit surface so the night side is not black.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.15,
        }
    }
}

impl AmbientLight {
    /// Premultiplied colour for GPU upload.
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}
