/// `inspect`: validate a baked show and report what the renderer will see.
use crate::dds_writer::read_position_dds;
use crate::manifest::load_manifest;
use anyhow::{Context, Result, bail};
use choreography::texture::PositionTexture;
use constants::formation::get_formation_name;
use std::path::Path;

pub struct FormationReport {
    pub name: String,
    pub kind: &'static str,
    pub occupied: usize,
    pub non_finite: usize,
}

/// Frame-level numbers of a baked show.
pub struct ShowReport {
    pub drone_count: usize,
    pub texture_width: u32,
    pub sort_passes: usize,
    pub finished_at: f32,
    pub formations: Vec<FormationReport>,
}

pub fn inspect(manifest_path: &Path) -> Result<()> {
    let show = collect(manifest_path)?;
    println!(
        "{} drones, {}x{} textures, {} sort passes per frame, show ends at {:.1}s",
        show.drone_count,
        show.texture_width,
        show.texture_width,
        show.sort_passes,
        show.finished_at
    );
    for report in &show.formations {
        println!(
            "{:<16} {:<8} {:>6} drones{}",
            report.name,
            report.kind,
            report.occupied,
            if report.non_finite > 0 {
                format!(", {} non-finite texels", report.non_finite)
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

pub fn collect(manifest_path: &Path) -> Result<ShowReport> {
    let manifest = load_manifest(manifest_path)?;
    let pipeline = manifest
        .validate()
        .with_context(|| format!("{} is not a valid show", manifest_path.display()))?;
    let base = manifest_path.parent().unwrap_or(Path::new("."));

    let mut reports = Vec::with_capacity(manifest.formations.len());
    for entry in &manifest.formations {
        let (size, floats) = read_position_dds(&base.join(&entry.texture_files.position))?;
        if size != manifest.texture_size {
            bail!(
                "{} is {}x{}, manifest says {}",
                entry.texture_files.position,
                size,
                size,
                manifest.texture_size
            );
        }
        let texture = PositionTexture::from_floats(size, floats)?;
        let occupied = (0..pipeline.sort_len())
            .filter(|&i| texture.is_occupied(i))
            .count();
        let non_finite = texture
            .as_floats()
            .iter()
            .filter(|f| !f.is_finite())
            .count();
        reports.push(FormationReport {
            name: entry.name.clone(),
            kind: get_formation_name(entry.id),
            occupied,
            non_finite,
        });
    }
    Ok(ShowReport {
        drone_count: pipeline.drone_count(),
        texture_width: pipeline.texture_width(),
        sort_passes: pipeline.sort_passes().len(),
        finished_at: manifest.timeline.finished_at(),
        formations: reports,
    })
}
