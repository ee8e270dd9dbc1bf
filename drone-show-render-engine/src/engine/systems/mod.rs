//! Runtime systems of the main world while the show runs.

/// FPS overlay text.
pub mod fps_tracking;

/// Keyboard tweaks of the separation and lighting settings (native only).
pub mod settings_input;

/// Show time, timeline segment and pulse intensity of the current frame.
pub mod show_clock;
