//! Per-instance data handed to the drawing backend.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Instance data for instanced rendering.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, PartialEq)]
pub struct InstanceData {
    /// Model matrix (4x4)
    pub model: [[f32; 4]; 4],
    /// Color tint
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: [[f32; 4]; 4], color: [f32; 4]) -> Self {
        Self { model, color }
    }

    /// Build from position/rotation/scale and a tint.
    pub fn from_parts(position: Vec3, rotation: Quat, scale: Vec3, color: [f32; 4]) -> Self {
        Self {
            model: Mat4::from_scale_rotation_translation(scale, rotation, position)
                .to_cols_array_2d(),
            color,
        }
    }

    /// Translation column of the model matrix.
    pub fn position(&self) -> Vec3 {
        let w = self.model[3];
        Vec3::new(w[0], w[1], w[2])
    }
}

impl Default for InstanceData {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
