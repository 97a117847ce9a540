use super::tolerance::EPS_LEN;
use crate::model::Vec2;

pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    dx*dx + dy*dy
}

/// Rotate `p` about `c` by `deg` degrees (clockwise in screen space, y down).
pub fn rotate_about(p: Vec2, c: Vec2, deg: f32) -> Vec2 {
    if deg.abs() <= EPS_LEN { return p; }
    let (s, co) = deg.to_radians().sin_cos();
    let dx = p.x - c.x; let dy = p.y - c.y;
    Vec2 { x: c.x + dx*co - dy*s, y: c.y + dx*s + dy*co }
}

/// Vertices of a regular polygon centred on `(cx, cy)`, first vertex at `start` radians.
pub fn regular_polygon(cx: f32, cy: f32, radius: f32, sides: usize, start: f32) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / sides as f32;
    (0..sides)
        .map(|i| {
            let a = start + i as f32 * step;
            Vec2 { x: cx + radius * a.cos(), y: cy + radius * a.sin() }
        })
        .collect()
}

/// Alternating outer/inner vertices of a star with `points` tips.
pub fn star_polygon(cx: f32, cy: f32, outer: f32, inner: f32, points: usize) -> Vec<Vec2> {
    let n = points * 2;
    let step = std::f32::consts::TAU / n as f32;
    (0..n)
        .map(|i| {
            let a = -std::f32::consts::FRAC_PI_2 + i as f32 * step;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec2 { x: cx + r * a.cos(), y: cy + r * a.sin() }
        })
        .collect()
}
