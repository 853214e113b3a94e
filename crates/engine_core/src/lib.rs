//! Core engine types and utilities.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and spatial components
//! - Frame timing driven by host timestamps
//! - Deferred/recurring timers for the single-threaded loop
//! - Common component types for ECS

pub mod components;
pub mod time;
pub mod timer;
pub mod transform;

pub use components::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
pub use hecs::{Entity, World};
