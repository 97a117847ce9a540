// Centralized tolerances and numeric helpers for node geometry

pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_DENOM: f32 = 1e-8;          // denominator guard for ratios

#[inline] pub fn near_zero(x: f32, eps: f32) -> bool { x.abs() <= eps }

#[inline]
pub fn safe_div(num: f32, den: f32, fallback: f32) -> f32 {
    if den.abs() <= EPS_DENOM { fallback } else { num/den }
}

/// Wrap an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    if !deg.is_finite() { return 0.0; }
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 || near_zero(r, EPS_LEN) { 0.0 } else { r }
}
