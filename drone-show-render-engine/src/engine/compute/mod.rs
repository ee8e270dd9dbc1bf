//! Per-frame GPU choreography.
//!
//! Four compute stages run in one command encoder, each seeing the finished
//! output of the previous one:
//!
//! 1. **Position** (`formation_position.wgsl`): launch curve from the pad
//!    towards the blend of the `from`/`to` formations. Writes xyz + opacity
//!    into the position ping-pong and the blended colour.
//! 2. **Hash** (`spatial_hash.wgsl`): one `(cell hash, drone id)` key per
//!    texel, `u32::MAX` for empty slots.
//! 3. **Bitonic sort** (`bitonic_sort.wgsl`): one gather dispatch per
//!    `(stage, sub_stage)` over the sort ping-pong.
//! 4. **Rank** (`sort_rank.wgsl`): scatter the sorted index of every drone.
//!
//! ```wgsl
//! // position pass
//! @group(0) @binding(0) var anchor_positions: texture_2d<f32>;
//! @group(0) @binding(1) var from_positions: texture_2d<f32>;
//! @group(0) @binding(2) var to_positions: texture_2d<f32>;
//! @group(0) @binding(3) var from_colours: texture_2d<f32>;
//! @group(0) @binding(4) var to_colours: texture_2d<f32>;
//! @group(0) @binding(5) var position_out: texture_storage_2d<rgba32float, write>;
//! @group(0) @binding(6) var colour_out: texture_storage_2d<rgba16float, write>;
//! @group(0) @binding(7) var<uniform> params: PositionParams;
//! ```

/// Render-world plugin, pipelines and the per-frame dispatch.
pub mod choreography_compute;

/// `#[repr(C)]` uniform blocks of the compute stages.
pub mod uniforms;
