/// Default number of drones in a show (64x64 state textures)
pub const DEFAULT_DRONE_COUNT: usize = 4096;

/// Largest per-drone state texture edge the renderer will allocate
pub const MAX_TEXTURE_SIZE: u32 = 4096;

/// Alpha value of position texels that hold no drone
pub const UNUSED_FORMATION_TAG: f32 = -1.0;

/// Position textures: RGBA32F, xyz + formation id
pub const POSITION_TEXEL_CHANNELS: usize = 4;

/// Colour textures: RGBA16F, rgb + opacity
pub const COLOUR_TEXEL_CHANNELS: usize = 4;
