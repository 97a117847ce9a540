// Centralized ingestion limits and geometric bounds

use crate::model::Vec2;

// Document size caps (JSON ingest)
pub const MAX_NODES: usize = 10_000;
pub const MAX_EDGES: usize = 50_000;
pub const MAX_TEXT_LEN: usize = 64 * 1024;

// Node geometry
pub const MIN_NODE_SIZE: f32 = 40.0;
pub const MAX_NODE_SIZE: f32 = 100_000.0;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

// Viewport
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 8.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

/// Clamp a canvas point into the coordinate bounds.
#[inline]
pub fn clamp_point(p: Vec2) -> Vec2 {
    Vec2::new(p.x.clamp(COORD_MIN, COORD_MAX), p.y.clamp(COORD_MIN, COORD_MAX))
}

#[inline]
pub fn in_size_bounds(s: f32) -> bool { s.is_finite() && s > 0.0 && s <= MAX_NODE_SIZE }

/// Clamp a requested node dimension to `[min, MAX_NODE_SIZE]`.
/// Non-finite requests collapse to the minimum.
#[inline]
pub fn clamp_size(s: f32, min: f32) -> f32 {
    if !s.is_finite() { return min; }
    s.max(min).min(MAX_NODE_SIZE)
}
