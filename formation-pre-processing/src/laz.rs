use anyhow::{Context, Result};
use constants::coordinate_system::survey_to_show;
use glam::Vec3;
use las::Reader;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats.
pub fn create_reader(file_path: &Path) -> Result<Reader> {
    let file = File::open(file_path)
        .with_context(|| format!("opening point list {}", file_path.display()))?;
    Ok(Reader::new(BufReader::new(file))?)
}

/// Read a survey point list into show space, centred and scaled to `extent`.
pub fn load_point_list(file_path: &Path, extent: f32, max_points: usize) -> Result<Vec<Vec3>> {
    let mut reader = create_reader(file_path)?;
    let mut survey = Vec::with_capacity(reader.header().number_of_points() as usize);
    for point in reader.points() {
        let point = point?;
        survey.push(survey_to_show([point.x, point.y, point.z]));
    }
    info!(
        "Read {} points from {}",
        survey.len(),
        file_path.display()
    );
    Ok(fit_points(&survey, extent, max_points))
}

/// Evenly thin to `max_points`, centre on the bounds and scale the longest side to `extent`.
pub fn fit_points(points: &[[f64; 3]], extent: f32, max_points: usize) -> Vec<Vec3> {
    if points.is_empty() || max_points == 0 {
        return Vec::new();
    }
    let kept: Vec<[f64; 3]> = if points.len() > max_points {
        let step = points.len() as f64 / max_points as f64;
        (0..max_points)
            .map(|i| points[((i as f64 * step) as usize).min(points.len() - 1)])
            .collect()
    } else {
        points.to_vec()
    };

    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in &kept {
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }
    let centre: [f64; 3] = std::array::from_fn(|axis| (min[axis] + max[axis]) * 0.5);
    let longest = (0..3).map(|axis| max[axis] - min[axis]).fold(0.0, f64::max);
    let scale = if longest > 0.0 {
        extent as f64 / longest
    } else {
        1.0
    };

    kept.iter()
        .map(|p| {
            Vec3::new(
                ((p[0] - centre[0]) * scale) as f32,
                ((p[1] - centre[1]) * scale) as f32,
                ((p[2] - centre[2]) * scale) as f32,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fits_into_extent_around_origin() {
        let points = [[10.0, 0.0, 0.0], [30.0, 5.0, 0.0], [20.0, 10.0, 0.0]];
        let fitted = fit_points(&points, 100.0, 10);
        assert_eq!(fitted[0], Vec3::new(-50.0, -25.0, 0.0));
        assert_eq!(fitted[1], Vec3::new(50.0, 0.0, 0.0));
        assert_eq!(fitted[2], Vec3::new(0.0, 25.0, 0.0));
    }

    #[test]
    fn thins_large_lists_evenly() {
        let points: Vec<[f64; 3]> = (0..100).map(|i| [i as f64, 0.0, 0.0]).collect();
        let fitted = fit_points(&points, 99.0, 10);
        assert_eq!(fitted.len(), 10);
        assert!(fitted.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn single_point_sits_at_origin() {
        assert_eq!(fit_points(&[[5.0, 5.0, 5.0]], 100.0, 4), vec![Vec3::ZERO]);
        assert!(fit_points(&[], 100.0, 4).is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_point_list(Path::new("/nonexistent/logo.laz"), 1.0, 1).unwrap_err();
        assert!(format!("{err:#}").contains("logo.laz"));
    }
}
