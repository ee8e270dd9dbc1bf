//! Asset types and handles of a baked show.

/// Handles of every texture and model the show needs.
pub mod drone_show_assets;

/// `manifest.json` as a bevy asset plus its validated pipeline sizes.
pub mod show_manifest;
