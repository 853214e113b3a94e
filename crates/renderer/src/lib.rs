//! Rendering seam for the game: camera, per-instance data and the frame sink.

pub mod camera;
pub mod renderer;
pub mod vertex;

pub use camera::*;
pub use renderer::*;
pub use vertex::*;
