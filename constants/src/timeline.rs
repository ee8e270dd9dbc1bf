/// Seconds before the first formation change
pub const FIRST_TRANSITION_AT: f32 = 15.0;

/// Seconds spent blending from one formation into the next
pub const TRANSITION_DURATION: f32 = 5.0;

/// Seconds a formation is held between transitions
pub const HOLD_DURATION: f32 = 5.0;

/// Seconds a drone needs to fly from the pad into its formation
pub const FLIGHT_DURATION: f32 = 10.0;

/// Launch stagger per grid row (back rows leave first)
pub const ROW_DELAY: f32 = 0.2;

/// Maximum random launch jitter per drone
pub const DRONE_DELAY: f32 = 0.1;

/// Height added to every formation so the show hovers above the pad
pub const FLY_UP_HEIGHT: f32 = 25.0;

/// Launch pad layout
pub const PAD_SPACING: f32 = 40.0;
pub const PAD_HEIGHT: f32 = -70.0;

/// Distance of the Bézier control point from the anchor formation
pub const CONTROL_DISTANCE: f32 = 750.0;

/// Global scale of the show (multiplies fly-up height)
pub const SHOW_SCALE: f32 = 1.0;
