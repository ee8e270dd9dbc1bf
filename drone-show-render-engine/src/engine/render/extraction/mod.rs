//! Resource extraction systems for render world synchronisation.

/// Mirrors [`AppState`](crate::engine::core::app_state::AppState) so render
/// systems can run only while the show is running.
pub mod app_state;
