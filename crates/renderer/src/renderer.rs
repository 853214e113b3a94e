//! The drawing seam between the simulation and whatever puts pixels on screen.

use crate::{
    camera::{Camera, CameraUniform},
    vertex::InstanceData,
};

/// Everything a backend needs to draw one frame. Built fresh each frame;
/// the backend never reaches back into simulation state.
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    pub camera: CameraUniform,
    /// One instance per enemy body part, tinted by any active pulse.
    pub enemies: Vec<InstanceData>,
    /// Static decorative scenery.
    pub obstacles: Vec<InstanceData>,
    /// Whether the muzzle flash is showing this frame.
    pub muzzle_flash: bool,
    /// Red screen overlay strength, 0 = none.
    pub damage_overlay: f32,
}

impl SceneSnapshot {
    pub fn new(camera: &Camera) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update(camera);
        Self {
            camera: uniform,
            ..Default::default()
        }
    }

    pub fn instance_count(&self) -> usize {
        self.enemies.len() + self.obstacles.len()
    }
}

/// Draws frames. The simulation calls this once per tick and does not care
/// what happens inside.
pub trait Renderer {
    fn render_frame(&mut self, scene: &SceneSnapshot);
}

/// Backend with no output surface. Counts frames for diagnostics.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    last_instance_count: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_instance_count(&self) -> usize {
        self.last_instance_count
    }
}

impl Renderer for HeadlessRenderer {
    fn render_frame(&mut self, scene: &SceneSnapshot) {
        self.frames += 1;
        self.last_instance_count = scene.instance_count();
        if self.frames % 600 == 0 {
            log::debug!(
                "frame {}: {} enemy parts, {} obstacles",
                self.frames,
                scene.enemies.len(),
                scene.obstacles.len()
            );
        }
    }
}
