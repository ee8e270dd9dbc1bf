//! GPU-independent model of the drone show pipeline.
//!
//! Everything the compute shaders do per frame has a CPU counterpart here:
//! formation generation, texture packing, the timeline, the launch flight
//! path, spatial hashing and the bitonic sort network. The baker uses it to
//! produce textures, the renderer uses it for configuration and uniforms.

pub mod bitonic;
pub mod error;
pub mod flight;
pub mod formation;
pub mod hash;
pub mod manifest;
pub mod noise;
pub mod ping_pong;
pub mod pipeline;
pub mod render;
pub mod sampler;
pub mod show;
pub mod texture;
pub mod timeline;

pub use error::{ConfigError, ManifestError, SortError, SourceError, TextureError};
pub use formation::{FormationKind, FormationSlot};
pub use ping_pong::PingPong;
pub use pipeline::PipelineConfig;
pub use timeline::Timeline;
