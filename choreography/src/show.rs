use glam::Vec3;

use crate::error::ConfigError;
use crate::flight::FlightPlan;
use crate::formation::FormationSlot;
use crate::timeline::{Segment, Timeline};

/// A complete show evaluated on the CPU: what the position pass computes per frame.
#[derive(Debug, Clone)]
pub struct Show {
    formations: Vec<Vec<FormationSlot>>,
    timeline: Timeline,
    plan: FlightPlan,
}

/// Blended state of one drone at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneState {
    pub position: Vec3,
    pub colour: [f32; 4],
}

impl Show {
    pub fn new(
        formations: Vec<Vec<FormationSlot>>,
        timeline: Timeline,
        plan: FlightPlan,
    ) -> Result<Self, ConfigError> {
        timeline.validate()?;
        let expected = formations.first().ok_or(ConfigError::NoFormations)?.len();
        if let Some((index, f)) = formations
            .iter()
            .enumerate()
            .find(|(_, f)| f.len() != expected)
        {
            return Err(ConfigError::FormationSize {
                index,
                expected,
                actual: f.len(),
            });
        }
        if timeline.formation_count != formations.len() {
            return Err(ConfigError::InvalidTimeline(
                "formation count differs from the formation list",
            ));
        }
        Ok(Self {
            formations,
            timeline,
            plan,
        })
    }

    pub fn drone_count(&self) -> usize {
        self.formations[0].len()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn plan(&self) -> &FlightPlan {
        &self.plan
    }

    pub fn formation(&self, index: usize) -> Option<&[FormationSlot]> {
        self.formations.get(index).map(Vec::as_slice)
    }

    /// Blended formation target of drone `id`, before the flight path is applied.
    pub fn target(&self, id: usize, segment: Segment) -> DroneState {
        let from = self.formations[segment.from][id];
        let to = self.formations[segment.to][id];
        let mut colour = [0.0; 4];
        for (c, (a, b)) in colour.iter_mut().zip(from.colour.iter().zip(to.colour)) {
            *c = a + (b - a) * segment.blend;
        }
        DroneState {
            position: from.position.lerp(to.position, segment.blend),
            colour,
        }
    }

    pub fn state_at(&self, id: usize, time: f32) -> DroneState {
        let target = self.target(id, self.timeline.segment_at(time));
        let anchor = self.formations[0][id].position;
        DroneState {
            position: self.plan.position(id, time, anchor, target.position),
            colour: target.colour,
        }
    }

    pub fn position_at(&self, id: usize, time: f32) -> Vec3 {
        self.state_at(id, time).position
    }

    /// Bounds of every visible drone over the given instants.
    pub fn bounds_over(&self, times: impl IntoIterator<Item = f32>) -> Option<(Vec3, Vec3)> {
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for time in times {
            for id in 0..self.drone_count() {
                let state = self.state_at(id, time);
                if state.colour[3] <= 0.0 {
                    continue;
                }
                let p = state.position;
                bounds = Some(match bounds {
                    Some((min, max)) => (min.min(p), max.max(p)),
                    None => (p, p),
                });
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formation::{FormationKind, generate};
    use pretty_assertions::assert_eq;

    fn show(count: usize) -> Show {
        let formations = vec![
            generate(&FormationKind::default_grid(), count).unwrap(),
            generate(&FormationKind::default_sphere(), count).unwrap(),
        ];
        Show::new(formations, Timeline::new(2), FlightPlan::new(64)).unwrap()
    }

    #[test]
    fn rendering_twice_gives_the_same_positions() {
        let show = show(64);
        for id in 0..64 {
            assert_eq!(show.position_at(id, 17.3), show.position_at(id, 17.3));
        }
    }

    #[test]
    fn finished_show_holds_the_last_formation() {
        let show = show(8);
        let sphere = show.formation(1).unwrap();
        let late = show.timeline().finished_at() + 100.0;
        for (id, slot) in sphere.iter().enumerate() {
            let p = show.position_at(id, late);
            assert!((p - (slot.position + show.plan().lift())).length() < 1e-3);
        }
    }

    #[test]
    fn mismatched_formations_are_rejected() {
        let err = Show::new(
            vec![vec![FormationSlot::unused(); 4], vec![FormationSlot::unused(); 3]],
            Timeline::new(2),
            FlightPlan::new(2),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::FormationSize {
                index: 1,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn bounds_skip_parked_slots() {
        let show = Show::new(
            vec![generate(&FormationKind::Grid { edge: 1, spacing: 1.0 }, 2).unwrap()],
            Timeline::new(1),
            FlightPlan::new(2),
        )
        .unwrap();
        let (min, max) = show.bounds_over([1000.0]).unwrap();
        assert_eq!(min, max);
        assert!(min.y > 0.0);
    }
}
