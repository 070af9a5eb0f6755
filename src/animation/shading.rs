//! Progress mapping and synthetic lighting shared by every fold.

/// Upper bound for progress fed into an angle mapping.
///
/// A flap at exactly 90° is edge-on and collapses to zero area.
pub const MAX_PROGRESS: f64 = 0.99;

/// Quarter turn, the sweep of a single hinge fold.
pub const QUARTER_TURN: f64 = std::f64::consts::FRAC_PI_2;

/// Half turn, the sweep of a flap folding over onto its neighbour.
pub const HALF_TURN: f64 = std::f64::consts::PI;

/// Clamp progress into `[0, MAX_PROGRESS]`. NaN maps to 0.
pub fn clamp_progress(p: f64) -> f64 {
    if p.is_nan() {
        return 0.0;
    }
    p.clamp(0.0, MAX_PROGRESS)
}

/// Linear progress of frame `index` out of `count`, already clamped.
///
/// A single-frame sequence sits at progress 0.
pub fn frame_progress(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    clamp_progress(index as f64 / (count - 1) as f64)
}

/// Unclamped linear progress in `[0, 1]`, for effects that may reach their end state.
pub fn frame_progress_inclusive(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    (index as f64 / (count - 1) as f64).clamp(0.0, 1.0)
}

/// Rotation magnitude for `progress` over a sweep of `sweep` radians.
pub fn fold_angle(progress: f64, sweep: f64) -> f64 {
    clamp_progress(progress) * sweep
}

/// Cosine foreshortening of a flap rotated by `angle`: 1 when flat, 0 when edge-on.
pub fn foreshortening(angle: f64) -> f64 {
    angle.cos().abs()
}

/// Brightness multiplier for a flap rotated by `angle`.
///
/// Darkens by `strength * (1 - foreshortening)`, so a flap seen more edge-on renders darker.
pub fn lighting_factor(angle: f64, strength: f64) -> f64 {
    let strength = strength.clamp(0.0, 1.0);
    (1.0 - strength * (1.0 - foreshortening(angle))).clamp(0.0, 1.0)
}

/// Visible fraction of the seam for a closing-book fold at `progress`.
///
/// Never drops below `min_height`.
pub fn seam_height(progress: f64, min_height: f64) -> f64 {
    (1.0 - progress).max(min_height)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/shading.rs"]
mod tests;
