use bevy::prelude::*;
use bevy::render::extract_resource::ExtractResource;
use choreography::render::light_intensity;
use choreography::timeline::Timeline;

use crate::constants::render_settings::DroneLightingSettings;
use crate::engine::assets::show_manifest::ShowManifestAsset;

/// Wall-clock start of the show. Show time only moves forward.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ShowClock {
    start: Option<f32>,
}

impl ShowClock {
    pub fn start(&mut self, now: f32) {
        self.start = Some(now);
    }

    /// Seconds since the show started, zero before.
    pub fn show_time(&self, now: f32) -> f32 {
        self.start.map_or(0.0, |start| (now - start).max(0.0))
    }
}

/// Per-frame show state shared with the compute passes and the drone shader.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, ExtractResource)]
pub struct ShowFrame {
    pub time: f32,
    /// Formation progress, see [`Timeline::progress`].
    pub progress: f32,
    pub from: u32,
    pub to: u32,
    pub blend: f32,
    pub intensity: f32,
}

impl ShowFrame {
    pub fn at(timeline: &Timeline, time: f32, lighting: &DroneLightingSettings) -> Self {
        let progress = timeline.progress(time);
        let segment = timeline.segment(progress);
        Self {
            time,
            progress,
            from: segment.from as u32,
            to: segment.to as u32,
            blend: segment.blend,
            intensity: light_intensity(time, lighting.pulse_frequency),
        }
    }
}

pub fn advance_show_clock(
    clock: Res<ShowClock>,
    time: Res<Time>,
    manifest: Option<Res<ShowManifestAsset>>,
    lighting: Res<DroneLightingSettings>,
    mut frame: ResMut<ShowFrame>,
) {
    let Some(manifest) = manifest else {
        return;
    };
    let show_time = clock.show_time(time.elapsed_secs());
    *frame = ShowFrame::at(&manifest.timeline, show_time, &lighting);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_is_zero_until_started() {
        let mut clock = ShowClock::default();
        assert_eq!(clock.show_time(12.0), 0.0);
        clock.start(10.0);
        assert_eq!(clock.show_time(12.5), 2.5);
    }

    #[test]
    fn frame_follows_the_timeline() {
        let timeline = Timeline::new(3);
        let lighting = DroneLightingSettings::default();

        let before = ShowFrame::at(&timeline, 1.0, &lighting);
        assert_eq!((before.from, before.to, before.blend), (0, 1, 0.0));

        let held = ShowFrame::at(&timeline, 1_000.0, &lighting);
        assert_eq!((held.from, held.to), (2, 2));
        assert_eq!(held.progress, 2.0);
    }
}
