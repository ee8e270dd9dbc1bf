//! CPU mirrors of the per-drone math in the instanced drone shader.

use constants::procedural_shader::{DEFAULT_NEIGHBOUR_WINDOW, MAX_NEIGHBOUR_WINDOW};
use constants::render_settings::{PULSE_BASE_INTENSITY, PULSE_GAIN};
use glam::Vec3;

use crate::hash::HashKey;

/// Sharp periodic pulse in `[0, 1]`.
pub fn heartbeat(time: f32, frequency: f32) -> f32 {
    (((time * frequency).sin() + 1.0) / 2.0).powi(3)
}

/// LED brightness multiplier at `time`.
pub fn light_intensity(time: f32, frequency: f32) -> f32 {
    PULSE_BASE_INTENSITY + heartbeat(time, frequency) * PULSE_GAIN
}

/// Sorted neighbours visited on each side, from the densest cell of the bake.
pub fn neighbour_window(max_cell_occupancy: usize) -> u32 {
    match max_cell_occupancy {
        0 => DEFAULT_NEIGHBOUR_WINDOW,
        n => (n as u32).clamp(1, MAX_NEIGHBOUR_WINDOW),
    }
}

/// Push of drone `id` away from close drones sharing its hash cell.
///
/// `sorted` is the key list after the bitonic sort, `rank[id]` the position of
/// `id` in it and `positions` the current position of each drone id.
pub fn separation_offset(
    id: usize,
    sorted: &[HashKey],
    rank: &[u32],
    positions: &[Vec3],
    window: u32,
    safety_radius: f32,
    strength: f32,
) -> Vec3 {
    let Some(&own_rank) = rank.get(id) else {
        return Vec3::ZERO;
    };
    let own_rank = own_rank as usize;
    let Some(own) = sorted.get(own_rank).filter(|k| !k.is_empty()) else {
        return Vec3::ZERO;
    };
    let p = positions[id];
    let window = window as usize;
    let lower = own_rank.saturating_sub(window);
    let upper = (own_rank + window).min(sorted.len().saturating_sub(1));

    let mut push = Vec3::ZERO;
    for neighbour in sorted[lower..=upper].iter() {
        if neighbour.id == own.id || neighbour.hash != own.hash {
            continue;
        }
        let Some(q) = positions.get(neighbour.id as usize) else {
            continue;
        };
        let away = p - *q;
        let distance = away.length();
        if distance > 0.0 && distance < safety_radius {
            push += away / distance / distance * strength;
        }
    }
    push
}

/// Number of drones with at least one same-cell neighbour closer than `safety_radius`.
pub fn crowded_drones(sorted: &[HashKey], positions: &[Vec3], safety_radius: f32) -> usize {
    let mut crowded = 0;
    for run in sorted.chunk_by(|a, b| a.hash == b.hash) {
        if run[0].is_empty() {
            continue;
        }
        for key in run {
            let p = positions[key.id as usize];
            let close = run.iter().any(|other| {
                other.id != key.id && positions[other.id as usize].distance(p) < safety_radius
            });
            if close {
                crowded += 1;
            }
        }
    }
    crowded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitonic::sort_in_place;
    use crate::formation::FormationSlot;
    use crate::hash::{hash_keys, ranks};
    use pretty_assertions::assert_eq;

    #[test]
    fn heartbeat_range() {
        assert_eq!(heartbeat(0.0, 5.0), 0.125);
        let peak = std::f32::consts::FRAC_PI_2 / 5.0;
        assert!((heartbeat(peak, 5.0) - 1.0).abs() < 1e-6);
        assert!((light_intensity(peak, 5.0) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(neighbour_window(0), 8);
        assert_eq!(neighbour_window(3), 3);
        assert_eq!(neighbour_window(500), 16);
    }

    fn sorted_setup(positions: &[Vec3]) -> (Vec<HashKey>, Vec<u32>) {
        let slots: Vec<_> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| FormationSlot::used(i, *p))
            .collect();
        let mut keys = hash_keys(&slots, 100.0, positions.len().next_power_of_two());
        sort_in_place(&mut keys).unwrap();
        let rank = ranks(&keys);
        (keys, rank)
    }

    #[test]
    fn close_pairs_push_apart() {
        let positions = vec![
            Vec3::new(10.0, 10.0, 10.0),
            Vec3::new(20.0, 10.0, 10.0),
            Vec3::new(500.0, 10.0, 10.0),
        ];
        let (sorted, rank) = sorted_setup(&positions);
        let push = separation_offset(0, &sorted, &rank, &positions, 8, 50.0, 100.0);
        assert!((push - Vec3::new(-10.0, 0.0, 0.0)).length() < 1e-4);
        let far = separation_offset(2, &sorted, &rank, &positions, 8, 50.0, 100.0);
        assert_eq!(far, Vec3::ZERO);
        assert_eq!(crowded_drones(&sorted, &positions, 50.0), 2);
    }

    #[test]
    fn neighbours_in_other_cells_are_ignored() {
        let positions = vec![Vec3::new(99.0, 0.0, 0.0), Vec3::new(101.0, 0.0, 0.0)];
        let (sorted, rank) = sorted_setup(&positions);
        assert_eq!(
            separation_offset(0, &sorted, &rank, &positions, 8, 50.0, 100.0),
            Vec3::ZERO
        );
    }
}
