//! Shared constants for the formation pre-processor and the drone show renderer.

pub mod coordinate_system;
pub mod formation;
pub mod procedural_shader;
pub mod render_settings;
pub mod texture;
pub mod timeline;
