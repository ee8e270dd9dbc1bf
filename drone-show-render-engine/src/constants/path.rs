/// Directory under `assets/` holding the baked show (manifest.json + formations/).
pub const RELATIVE_MANIFEST_PATH: &str = "show";

pub const DRONE_MODEL_PATH: &str = "models/drone.glb";

/// glTF mesh names of the two drone parts.
pub const LIGHT_MESH_NAME: &str = "Light_Geo";
pub const BODY_MESH_NAME: &str = "Body_Geo";

pub const FORMATION_POSITION_SHADER: &str = "shaders/formation_position.wgsl";
pub const SPATIAL_HASH_SHADER: &str = "shaders/spatial_hash.wgsl";
pub const BITONIC_SORT_SHADER: &str = "shaders/bitonic_sort.wgsl";
pub const SORT_RANK_SHADER: &str = "shaders/sort_rank.wgsl";
pub const DRONE_INSTANCED_SHADER: &str = "shaders/drone_instanced.wgsl";
