use constants::timeline::{FIRST_TRANSITION_AT, HOLD_DURATION, TRANSITION_DURATION};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Fixed schedule of formation changes: wait, then alternate transitions and holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub formation_count: usize,
    pub first_transition_at: f32,
    pub transition_duration: f32,
    pub hold_duration: f32,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Which two formations are blended and by how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub blend: f32,
}

impl Timeline {
    pub fn new(formation_count: usize) -> Self {
        Self {
            formation_count,
            first_transition_at: FIRST_TRANSITION_AT,
            transition_duration: TRANSITION_DURATION,
            hold_duration: HOLD_DURATION,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.formation_count == 0 {
            return Err(ConfigError::NoFormations);
        }
        let finite = [
            self.first_transition_at,
            self.transition_duration,
            self.hold_duration,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::InvalidTimeline("durations must be finite"));
        }
        if self.transition_duration <= 0.0 {
            return Err(ConfigError::InvalidTimeline(
                "transition duration must be positive",
            ));
        }
        if self.hold_duration < 0.0 || self.first_transition_at < 0.0 {
            return Err(ConfigError::InvalidTimeline(
                "hold and start times cannot be negative",
            ));
        }
        Ok(())
    }

    fn last_index(&self) -> usize {
        self.formation_count.saturating_sub(1)
    }

    /// Show progress in formation units: `1.5` is halfway between formations 1 and 2.
    ///
    /// Monotonic in `time`, zero before the first transition and clamped at the
    /// last formation.
    pub fn progress(&self, time: f32) -> f32 {
        let last = self.last_index() as f32;
        if last == 0.0 || time.is_nan() || time <= self.first_transition_at {
            return 0.0;
        }
        let cycle = self.transition_duration + self.hold_duration;
        let elapsed = time - self.first_transition_at;
        let completed = (elapsed / cycle).floor();
        let within = elapsed - completed * cycle;
        let partial = (within / self.transition_duration).clamp(0.0, 1.0);
        (completed + partial).min(last)
    }

    pub fn segment(&self, progress: f32) -> Segment {
        let last = self.last_index();
        let clamped = progress.clamp(0.0, last as f32);
        let from = (clamped.floor() as usize).min(last);
        let to = (from + 1).min(last);
        let blend = if from == to {
            0.0
        } else {
            smoothstep(0.0, 1.0, clamped - from as f32)
        };
        Segment { from, to, blend }
    }

    pub fn segment_at(&self, time: f32) -> Segment {
        self.segment(self.progress(time))
    }

    /// Time at which the last formation is reached.
    pub fn finished_at(&self) -> f32 {
        match self.last_index() {
            0 => self.first_transition_at,
            last => {
                self.first_transition_at
                    + (last - 1) as f32 * (self.transition_duration + self.hold_duration)
                    + self.transition_duration
            }
        }
    }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0.0, 0.0)]
    #[test_case(14.9, 0.0)]
    #[test_case(17.5, 0.5)]
    #[test_case(20.0, 1.0)]
    #[test_case(24.0, 1.0)]
    #[test_case(27.5, 1.5)]
    #[test_case(35.0, 2.0)]
    #[test_case(1000.0, 2.0)]
    fn default_schedule(time: f32, expected: f32) {
        let timeline = Timeline::new(3);
        assert!((timeline.progress(time) - expected).abs() < 1e-5);
    }

    #[test]
    fn single_formation_never_moves() {
        let timeline = Timeline::new(1);
        assert_eq!(timeline.progress(500.0), 0.0);
        assert_eq!(
            timeline.segment_at(500.0),
            Segment {
                from: 0,
                to: 0,
                blend: 0.0
            }
        );
    }

    #[test]
    fn segment_blends_with_smoothstep() {
        let segment = Timeline::new(4).segment(1.25);
        assert_eq!((segment.from, segment.to), (1, 2));
        assert!((segment.blend - smoothstep(0.0, 1.0, 0.25)).abs() < 1e-6);

        let end = Timeline::new(4).segment(3.0);
        assert_eq!((end.from, end.to, end.blend), (3, 3, 0.0));
    }

    #[test]
    fn finish_time_matches_progress() {
        let timeline = Timeline::new(4);
        assert_eq!(timeline.finished_at(), 40.0);
        assert_eq!(timeline.progress(timeline.finished_at()), 3.0);
    }

    #[test]
    fn validation() {
        assert_eq!(Timeline::new(0).validate(), Err(ConfigError::NoFormations));
        let mut timeline = Timeline::new(2);
        assert_eq!(timeline.validate(), Ok(()));
        timeline.transition_duration = 0.0;
        assert!(timeline.validate().is_err());
        timeline.transition_duration = f32::NAN;
        assert!(timeline.validate().is_err());
    }

    proptest! {
        #[test]
        fn progress_is_monotonic(a in 0.0f32..200.0, b in 0.0f32..200.0, count in 1usize..8) {
            let timeline = Timeline::new(count);
            let (early, late) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(timeline.progress(early) <= timeline.progress(late));
            prop_assert!(timeline.progress(late) <= (count - 1) as f32);
        }
    }
}
