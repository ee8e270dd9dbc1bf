/// Survey data is Z-up, the show is Y-up.
/// Rows are the show axes: x = x, y = z, z = -y.
pub const SURVEY_TO_SHOW: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, -1.0, 0.0],
];

/// Rotate a survey-space point into show space.
pub fn survey_to_show(point: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (row, value) in SURVEY_TO_SHOW.iter().zip(out.iter_mut()) {
        *value = row.iter().zip(point).map(|(m, p)| m * p).sum();
    }
    out
}
