/// Bounds and crowding statistics for the manifest.
use choreography::bitonic::sort_in_place;
use choreography::formation::FormationSlot;
use choreography::hash::{hash_keys, max_cell_occupancy};
use choreography::manifest::{BoundsData, ShowStats};
use choreography::render::{crowded_drones, neighbour_window};
use choreography::show::Show;
use choreography::SortError;
use glam::Vec3;

/// Bounds of the used slots of one formation.
pub fn formation_bounds(slots: &[FormationSlot]) -> Option<BoundsData> {
    let mut used = slots.iter().filter(|s| s.is_used()).map(|s| s.position);
    let first = used.next()?;
    let (min, max) = used.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Some(BoundsData::from_corners(min, max))
}

/// Bounds of the whole show, launch included, sampled every `step` seconds.
pub fn show_bounds(show: &Show, step: f32) -> BoundsData {
    let end = show.timeline().finished_at().max(show.plan().landed_at()) + step;
    let samples = (end / step).ceil() as usize;
    let (min, max) = show
        .bounds_over((0..=samples).map(|i| i as f32 * step))
        .unwrap_or((Vec3::ZERO, Vec3::ZERO));
    BoundsData::from_corners(min, max)
}

/// Hash and sort a formation on the CPU the way the compute passes do.
pub fn crowding(
    slots: &[FormationSlot],
    cell_size: f32,
    safety_radius: f32,
    sort_len: usize,
) -> Result<ShowStats, SortError> {
    let mut keys = hash_keys(slots, cell_size, sort_len);
    sort_in_place(&mut keys)?;
    let positions: Vec<Vec3> = slots.iter().map(|s| s.position).collect();
    let occupancy = max_cell_occupancy(&keys);
    Ok(ShowStats {
        max_cell_occupancy: occupancy,
        crowded_drones: crowded_drones(&keys, &positions, safety_radius),
        neighbour_window: neighbour_window(occupancy),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use choreography::formation::{FormationKind, generate};
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_bounds_ignore_parked_slots() {
        let kind = FormationKind::Grid {
            edge: 2,
            spacing: 10.0,
        };
        let bounds = formation_bounds(&generate(&kind, 12).unwrap()).unwrap();
        assert_eq!(bounds.min_y, -5.0);
        assert_eq!(bounds.max_x, 5.0);
        assert_eq!(formation_bounds(&[FormationSlot::unused()]), None);
    }

    #[test]
    fn default_grid_fills_cells_evenly() {
        let slots = generate(&FormationKind::default_grid(), 4096).unwrap();
        let stats = crowding(&slots, 100.0, 50.0, 4096).unwrap();
        // 50 unit spacing in 100 unit cells: at most 2 per axis share a cell
        assert_eq!(stats.max_cell_occupancy, 8);
        assert_eq!(stats.crowded_drones, 0);
        assert_eq!(stats.neighbour_window, 8);
    }

    #[test]
    fn stacked_drones_are_crowded() {
        let slots = vec![
            FormationSlot::used(0, Vec3::splat(1.0)),
            FormationSlot::used(1, Vec3::splat(2.0)),
            FormationSlot::used(2, Vec3::splat(3.0)),
        ];
        let stats = crowding(&slots, 100.0, 50.0, 4).unwrap();
        assert_eq!(stats.max_cell_occupancy, 3);
        assert_eq!(stats.crowded_drones, 3);
        assert!(crowding(&slots, 100.0, 50.0, 3).is_err());
    }
}
