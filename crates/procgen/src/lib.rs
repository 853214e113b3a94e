//! Procedural generation for terrain and scenery.

pub mod scatter;
pub mod terrain;

pub use scatter::*;
pub use terrain::*;
