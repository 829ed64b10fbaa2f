/// Wraps a compass bearing into `[0, 360)`.
pub fn normalize_bearing(bearing_deg: f64) -> f64 {
    let wrapped = bearing_deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed clockwise difference from `reference` to `bearing`, in `(-180, 180]`.
pub fn angular_offset(bearing_deg: f64, reference_deg: f64) -> f64 {
    let diff = normalize_bearing(bearing_deg - reference_deg);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
