//! Free-fly camera for watching the show.
//!
//! Starts in front of the baked show bounds, looking at their centre.

/// Camera resource and the keyboard/mouse controller system.
pub mod show_camera;
