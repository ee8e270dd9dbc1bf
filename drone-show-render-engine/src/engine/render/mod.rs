//! Rendering of the drones and render-world extraction.

/// Main world → render world synchronisation.
pub mod extraction;

/// Instanced light and body draws positioned from the compute textures.
///
/// One specialised mesh pipeline for both parts; the part selects the
/// `DRONE_LIGHT` shader def.
pub mod instanced_drone_plugin;
