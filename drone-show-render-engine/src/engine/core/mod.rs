//! Core application setup and state management.

/// App construction: plugins, resources, render-world systems and schedules.
pub mod app_setup;

/// Loading → Running state machine.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
pub mod window_config;
