use constants::formation::GRID_EDGE;
use constants::timeline::{
    CONTROL_DISTANCE, DRONE_DELAY, FLIGHT_DURATION, FLY_UP_HEIGHT, PAD_HEIGHT, PAD_SPACING,
    ROW_DELAY, SHOW_SCALE,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::formation::grid_cell;
use crate::noise::hash_noise;
use crate::timeline::smoothstep;

/// Launch from the ground pad into the show, mirrored by the position pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightPlan {
    /// Drones per pad row, equal to the state texture width.
    pub pad_width: u32,
    pub grid_edge: u32,
    pub scale: f32,
    pub flight_duration: f32,
    pub row_delay: f32,
    pub drone_delay: f32,
    pub fly_up_height: f32,
    pub pad_spacing: f32,
    pub pad_height: f32,
    pub control_distance: f32,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self::new(64)
    }
}

impl FlightPlan {
    pub fn new(pad_width: u32) -> Self {
        Self {
            pad_width,
            grid_edge: GRID_EDGE,
            scale: SHOW_SCALE,
            flight_duration: FLIGHT_DURATION,
            row_delay: ROW_DELAY,
            drone_delay: DRONE_DELAY,
            fly_up_height: FLY_UP_HEIGHT,
            pad_spacing: PAD_SPACING,
            pad_height: PAD_HEIGHT,
            control_distance: CONTROL_DISTANCE,
        }
    }

    pub fn start_position(&self, id: usize) -> Vec3 {
        let width = self.pad_width.max(1) as usize;
        let half = (width as f32 - 1.0) / 2.0;
        Vec3::new(
            ((id % width) as f32 - half) * self.pad_spacing,
            self.pad_height,
            ((id / width) as f32 - half) * self.pad_spacing,
        )
    }

    /// Back rows of the grid leave first, each drone with a little jitter.
    pub fn launch_delay(&self, id: usize) -> f32 {
        let (_, row, _) = grid_cell(id, self.grid_edge);
        let rows_behind = (self.grid_edge.max(1) as usize - 1).saturating_sub(row);
        rows_behind as f32 * self.row_delay + hash_noise(id as f32) * self.drone_delay
    }

    pub fn launch_progress(&self, id: usize, time: f32) -> f32 {
        let t = (time - self.launch_delay(id)) / self.flight_duration;
        smoothstep(0.0, 1.0, t.clamp(0.0, 1.0))
    }

    pub fn lift(&self) -> Vec3 {
        Vec3::new(0.0, self.fly_up_height * self.scale, 0.0)
    }

    /// Pull the curve outwards from the centre of the show, starting at the
    /// lifted anchor.
    pub fn control_point(&self, anchor: Vec3) -> Vec3 {
        let lifted = anchor + self.lift();
        lifted + (lifted - self.lift()).normalize_or_zero() * self.control_distance
    }

    /// Position of a drone flying towards `target` (already blended between formations).
    pub fn position(&self, id: usize, time: f32, anchor: Vec3, target: Vec3) -> Vec3 {
        quadratic_bezier(
            self.start_position(id),
            self.control_point(anchor),
            target + self.lift(),
            self.launch_progress(id, time),
        )
    }

    /// Time after which every drone has arrived.
    pub fn landed_at(&self) -> f32 {
        (self.grid_edge.max(1) - 1) as f32 * self.row_delay + self.drone_delay + self.flight_duration
    }
}

pub fn quadratic_bezier(start: Vec3, control: Vec3, end: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    start * (u * u) + control * (2.0 * u * t) + end * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pad_is_centred() {
        let plan = FlightPlan::new(64);
        assert_eq!(plan.start_position(0), Vec3::new(-1260.0, -70.0, -1260.0));
        assert_eq!(plan.start_position(4095), Vec3::new(1260.0, -70.0, 1260.0));
    }

    #[test]
    fn drones_sit_on_the_pad_before_launch_and_arrive_after() {
        let plan = FlightPlan::new(64);
        let anchor = Vec3::new(100.0, 0.0, 0.0);
        let target = Vec3::new(0.0, 200.0, 0.0);
        assert_eq!(plan.position(5, 0.0, anchor, target), plan.start_position(5));
        let landed = plan.position(5, plan.landed_at() + 0.01, anchor, target);
        assert!((landed - (target + plan.lift())).length() < 1e-3);
    }

    #[test]
    fn back_rows_launch_first() {
        let plan = FlightPlan::new(64);
        // row 15 is the front row, row 0 the back row
        assert!(plan.launch_delay(15 * 16) < plan.launch_delay(0));
        assert!(plan.launch_delay(0) <= 15.0 * 0.2 + 0.1);
    }

    #[test]
    fn control_point_at_origin_degenerates_to_lifted_anchor() {
        let plan = FlightPlan::new(4);
        assert_eq!(plan.control_point(Vec3::ZERO), plan.lift());
    }

    #[test]
    fn control_point_pushes_lifted_anchor_away_from_origin() {
        let plan = FlightPlan::new(4);
        let anchor = Vec3::new(0.0, 0.0, 300.0);
        let expected = anchor + plan.lift() + Vec3::Z * plan.control_distance;
        assert!((plan.control_point(anchor) - expected).length() < 1e-3);
    }

    #[test]
    fn bezier_endpoints() {
        let (a, b, c) = (Vec3::X, Vec3::Y, Vec3::Z);
        assert_eq!(quadratic_bezier(a, b, c, 0.0), a);
        assert_eq!(quadratic_bezier(a, b, c, 1.0), c);
    }
}
