/// Renderer-only settings. Values shared with the baker live in the `constants` crate.
pub mod path;
pub mod render_settings;
