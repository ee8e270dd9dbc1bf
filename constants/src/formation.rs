/// Cube edge length (drones per axis) of the grid formation
pub const GRID_EDGE: u32 = 16;

/// Distance between neighbouring grid drones
pub const GRID_SPACING: f32 = 50.0;

/// Radius of the sphere formation, large enough that neighbours never touch
pub const SPHERE_RADIUS: f32 = 400.0;

/// Scale applied to the unit parametric heart curve
pub const HEART_SCALE: f32 = 20.0;

/// Double helix: strand radius, total height, full turns and how often a
/// rung joins the strands (in drones per strand)
pub const HELIX_RADIUS: f32 = 160.0;
pub const HELIX_HEIGHT: f32 = 800.0;
pub const HELIX_TURNS: f32 = 4.0;
pub const HELIX_RUNG_SPACING: usize = 20;

/// Spiral galaxy: arm count, disc radius and turns of each arm
pub const GALAXY_ARMS: u32 = 3;
pub const GALAXY_RADIUS: f32 = 450.0;
pub const GALAXY_TIGHTNESS: f32 = 3.0;

/// Wave sheet: drone spacing and crest height
pub const WAVE_SPACING: f32 = 40.0;
pub const WAVE_AMPLITUDE: f32 = 120.0;

/// Firework burst radius and shell centres in units of that radius
pub const BURST_RADIUS: f32 = 180.0;
pub const BURST_CENTRES: [[f32; 3]; 5] = [
    [0.0, 0.17, 0.0],
    [1.25, -0.25, 0.83],
    [-1.25, -0.25, 0.83],
    [0.0, 1.0, -1.25],
    [0.0, -0.67, 1.25],
];

/// Stepped pyramid: base layer side (drones) and spacing; each layer is two
/// drones narrower than the one below
pub const PYRAMID_BASE: u32 = 20;
pub const PYRAMID_SPACING: f32 = 40.0;

/// Torus: ring and tube radius, and how often the tube winds per ring
pub const TORUS_MAJOR_RADIUS: f32 = 350.0;
pub const TORUS_MINOR_RADIUS: f32 = 140.0;
pub const TORUS_WINDINGS: f32 = 7.0;

/// Largest extent (world units) of a point-list formation after rescaling
pub const POINT_LIST_EXTENT: f32 = 800.0;

/// Where unused slots are parked, far below the stage
pub const UNUSED_SLOT_POSITION: [f32; 3] = [0.0, -10_000.0, 0.0];

/// Seed for text surface sampling so repeated bakes match
pub const DEFAULT_SAMPLE_SEED: u64 = 0x5eed_d20e;

/// Drone light colour in HSL (hue comes from the drone id)
pub const DRONE_SATURATION: f32 = 0.8;
pub const DRONE_LIGHTNESS: f32 = 0.6;

/// Multiplier of the sine-fract noise used for per-drone variation
pub const NOISE_MULTIPLIER: f32 = 43_758.547;

pub const FORMATION_GRID: u8 = 0;
pub const FORMATION_SPHERE: u8 = 1;
pub const FORMATION_TEXT: u8 = 2;
pub const FORMATION_HEART: u8 = 3;
pub const FORMATION_POINTS: u8 = 4;
pub const FORMATION_HELIX: u8 = 5;
pub const FORMATION_GALAXY: u8 = 6;
pub const FORMATION_WAVE: u8 = 7;
pub const FORMATION_BURST: u8 = 8;
pub const FORMATION_PYRAMID: u8 = 9;
pub const FORMATION_TORUS: u8 = 10;

pub struct FormationInfo {
    pub id: u8,
    pub name: &'static str,
}

pub const FORMATION_MAP: &[FormationInfo] = &[
    FormationInfo {
        id: FORMATION_GRID,
        name: "grid",
    },
    FormationInfo {
        id: FORMATION_SPHERE,
        name: "sphere",
    },
    FormationInfo {
        id: FORMATION_TEXT,
        name: "text",
    },
    FormationInfo {
        id: FORMATION_HEART,
        name: "heart",
    },
    FormationInfo {
        id: FORMATION_POINTS,
        name: "points",
    },
    FormationInfo {
        id: FORMATION_HELIX,
        name: "helix",
    },
    FormationInfo {
        id: FORMATION_GALAXY,
        name: "galaxy",
    },
    FormationInfo {
        id: FORMATION_WAVE,
        name: "wave",
    },
    FormationInfo {
        id: FORMATION_BURST,
        name: "burst",
    },
    FormationInfo {
        id: FORMATION_PYRAMID,
        name: "pyramid",
    },
    FormationInfo {
        id: FORMATION_TORUS,
        name: "torus",
    },
];

pub fn get_formation_name(id: u8) -> &'static str {
    FORMATION_MAP
        .iter()
        .find(|f| f.id == id)
        .map_or("unknown", |f| f.name)
}
