/// Edge length of a spatial hash cell in world units
pub const HASH_CELL_SIZE: f32 = 100.0;

/// Per-axis multipliers of the cell hash
pub const HASH_PRIMES: [i32; 3] = [92_837_111, 689_287_499, 283_923_481];

/// Sort key of slots without a drone, sorts after every real cell
pub const EMPTY_HASH: u32 = u32::MAX;

/// Compute shader workgroup edge (8x8 invocations)
pub const WORKGROUP_SIZE: u32 = 8;

/// Upper bound of sorted neighbours visited on each side during separation
pub const MAX_NEIGHBOUR_WINDOW: u32 = 16;

/// Window used when the manifest carries no occupancy statistics
pub const DEFAULT_NEIGHBOUR_WINDOW: u32 = 8;
