//! Loading pipeline of a baked show.
//!
//! Manifest first, then the formation textures, then the compute targets and
//! finally the instanced drone entities. Any failure keeps the app in
//! [`AppState::Loading`](crate::engine::core::app_state::AppState).

/// Instanced light and body entities, with primitive fallbacks for the model.
pub mod drone_creator;

/// Manifest and model requests, manifest validation and camera fitting.
pub mod manifest_loader;

/// Flags of the loading stages checked before entering the show.
pub mod progress;

/// Nearest sampling for baked textures and creation of the storage targets.
pub mod texture_config;

/// Load state monitoring of the formation textures.
pub mod texture_loader;
