//! Terrain height field and mesh generation.
//!
//! **Single source of truth:** [`height`] is the only definition of the ground.
//! The render mesh, player ground clamp, enemy placement and respawn all call
//! it, so the ground you see is the ground you stand on.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Amplitude of the broad rolling hills.
pub const LOW_AMPLITUDE: f32 = 10.0;
/// Frequency of the broad rolling hills.
pub const LOW_FREQUENCY: f32 = 0.01;
/// Amplitude of the small bumps layered on top.
pub const HIGH_AMPLITUDE: f32 = 2.0;
/// Frequency of the small bumps layered on top.
pub const HIGH_FREQUENCY: f32 = 0.05;

/// Ground elevation at world coordinates (x, z).
///
/// Two sine/cosine octaves; pure and defined for every finite input.
#[inline]
pub fn height(x: f32, z: f32) -> f32 {
    (x * LOW_FREQUENCY).sin() * (z * LOW_FREQUENCY).cos() * LOW_AMPLITUDE
        + (x * HIGH_FREQUENCY).sin() * (z * HIGH_FREQUENCY).cos() * HIGH_AMPLITUDE
}

/// Vertex for terrain mesh.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Configuration for terrain mesh generation.
#[derive(Debug, Clone)]
pub struct TerrainConfig {
    /// Size of terrain in world units (square, centred on the origin + offset).
    pub size: f32,
    /// Number of vertices per side.
    pub resolution: u32,
    /// World-space X offset of the grid centre.
    pub offset_x: f32,
    /// World-space Z offset of the grid centre.
    pub offset_z: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 1000.0,
            resolution: 200,
            offset_x: 0.0,
            offset_z: 0.0,
        }
    }
}

/// Generated terrain data.
#[derive(Debug)]
pub struct TerrainData {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    pub heightmap: Vec<f32>,
    pub config: TerrainConfig,
}

impl TerrainData {
    /// Build the render grid by sampling [`height`] at every vertex.
    pub fn generate(config: TerrainConfig) -> Self {
        let res = config.resolution.max(2) as usize;
        let step = config.size / (res - 1) as f32;
        let half = config.size / 2.0;

        let mut vertices = Vec::with_capacity(res * res);
        let mut heightmap = Vec::with_capacity(res * res);

        for z in 0..res {
            for x in 0..res {
                let world_x = x as f32 * step - half + config.offset_x;
                let world_z = z as f32 * step - half + config.offset_z;
                let world_y = height(world_x, world_z);
                heightmap.push(world_y);
                vertices.push(TerrainVertex {
                    position: [world_x, world_y, world_z],
                    normal: [0.0, 1.0, 0.0],
                    uv: [x as f32 / (res - 1) as f32, z as f32 / (res - 1) as f32],
                });
            }
        }

        Self::calculate_normals(&mut vertices, res);

        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for z in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (z * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.push(top_left);
                indices.push(bottom_left);
                indices.push(top_right);

                indices.push(top_right);
                indices.push(bottom_left);
                indices.push(bottom_right);
            }
        }

        Self {
            vertices,
            indices,
            heightmap,
            config,
        }
    }

    fn calculate_normals(vertices: &mut [TerrainVertex], resolution: usize) {
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; vertices.len()];

        for z in 0..(resolution - 1) {
            for x in 0..(resolution - 1) {
                let i0 = z * resolution + x;
                let i1 = i0 + 1;
                let i2 = (z + 1) * resolution + x;
                let i3 = i2 + 1;

                let v0: Vec3 = vertices[i0].position.into();
                let v1: Vec3 = vertices[i1].position.into();
                let v2: Vec3 = vertices[i2].position.into();
                let v3: Vec3 = vertices[i3].position.into();

                let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
                normals[i0] += n1;
                normals[i2] += n1;
                normals[i1] += n1;

                let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
                normals[i1] += n2;
                normals[i2] += n2;
                normals[i3] += n2;
            }
        }

        for (i, vertex) in vertices.iter_mut().enumerate() {
            let n = normals[i].try_normalize().unwrap_or(Vec3::Y);
            vertex.normal = [n.x, n.y, n.z];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_is_deterministic() {
        for &(x, z) in &[(0.0, 0.0), (12.5, -40.0), (-399.0, 250.0), (1e4, -1e4)] {
            assert_eq!(height(x, z), height(x, z));
        }
    }

    #[test]
    fn height_at_origin_is_zero() {
        // sin(0) kills both octaves
        assert_eq!(height(0.0, 0.0), 0.0);
    }

    #[test]
    fn height_stays_within_amplitude() {
        let bound = LOW_AMPLITUDE + HIGH_AMPLITUDE;
        let mut x = -500.0;
        while x <= 500.0 {
            let mut z = -500.0;
            while z <= 500.0 {
                let h = height(x, z);
                assert!(h.abs() <= bound + 1e-4, "height({x}, {z}) = {h}");
                z += 17.0;
            }
            x += 13.0;
        }
    }

    #[test]
    fn height_matches_closed_form() {
        let (x, z) = (120.0_f32, -35.0_f32);
        let expected = (x * 0.01).sin() * (z * 0.01).cos() * 10.0
            + (x * 0.05).sin() * (z * 0.05).cos() * 2.0;
        assert!((height(x, z) - expected).abs() < 1e-6);
    }

    /// The render mesh must sit exactly on the gameplay ground.
    #[test]
    fn mesh_vertices_sample_height_function() {
        let data = TerrainData::generate(TerrainConfig {
            size: 64.0,
            resolution: 17,
            offset_x: 10.0,
            offset_z: -20.0,
        });
        assert_eq!(data.vertices.len(), 17 * 17);
        assert_eq!(data.indices.len(), 16 * 16 * 6);
        for v in &data.vertices {
            assert_eq!(v.position[1], height(v.position[0], v.position[2]));
            assert!(v.normal[1] > 0.0, "terrain normals point up");
        }
        assert_eq!(data.heightmap.len(), data.vertices.len());
    }

    #[test]
    fn flat_quad_normals_are_straight_up() {
        let mut vertices = vec![
            TerrainVertex { position: [0.0, 0.0, 0.0], normal: [0.0; 3], uv: [0.0; 2] },
            TerrainVertex { position: [1.0, 0.0, 0.0], normal: [0.0; 3], uv: [0.0; 2] },
            TerrainVertex { position: [0.0, 0.0, 1.0], normal: [0.0; 3], uv: [0.0; 2] },
            TerrainVertex { position: [1.0, 0.0, 1.0], normal: [0.0; 3], uv: [0.0; 2] },
        ];
        TerrainData::calculate_normals(&mut vertices, 2);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn normals_follow_the_slope() {
        let data = TerrainData::generate(TerrainConfig {
            size: 20.0,
            resolution: 41,
            offset_x: 60.0,
            offset_z: 15.0,
        });
        let eps = 0.01;
        for v in &data.vertices {
            let [x, _, z] = v.position;
            let dx = (height(x + eps, z) - height(x - eps, z)) / (2.0 * eps);
            let dz = (height(x, z + eps) - height(x, z - eps)) / (2.0 * eps);
            let expected = Vec3::new(-dx, 1.0, -dz).normalize();
            let got = Vec3::from(v.normal);
            assert!(got.dot(expected) > 0.999, "normal {got:?} vs slope {expected:?} at ({x}, {z})");
        }
    }
}
