use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::engine::systems::show_clock::ShowFrame;

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    frame: Res<ShowFrame>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(fps) = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
    else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!(
            "FPS: {fps:.1}  t = {:.1}s  formation {} → {} ({:.0}%)",
            frame.time,
            frame.from,
            frame.to,
            frame.blend * 100.0
        );
    }
}
