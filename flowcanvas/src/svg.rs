use crate::algorithms::routing::EdgeCurve;
use crate::geometry::shapes::Outline;
use crate::model::Node;
use std::fmt::Write;

/// SVG path `d` for an outline in node-local coordinates.
pub fn outline_to_svg_path(o: &Outline) -> String {
    let mut d = String::new();
    push_outline(&mut d, o);
    d
}

fn sep(d: &mut String) {
    if !d.is_empty() {
        d.push(' ');
    }
}

fn push_outline(d: &mut String, o: &Outline) {
    match o {
        Outline::Rect { x, y, w, h, r } => {
            sep(d);
            let r = r.min(w * 0.5).min(h * 0.5).max(0.0);
            if r <= 0.0 {
                let _ = write!(d, "M {} {} H {} V {} H {} Z", x, y, x + w, y + h, x);
            } else {
                let _ = write!(
                    d,
                    "M {} {} H {} A {r} {r} 0 0 1 {} {} V {} A {r} {r} 0 0 1 {} {} H {} A {r} {r} 0 0 1 {} {} V {} A {r} {r} 0 0 1 {} {} Z",
                    x + r, y,
                    x + w - r,
                    x + w, y + r,
                    y + h - r,
                    x + w - r, y + h,
                    x + r,
                    x, y + h - r,
                    y + r,
                    x + r, y,
                    r = r
                );
            }
        }
        Outline::Ellipse { cx, cy, rx, ry } => {
            sep(d);
            // two half arcs; a single arc with equal endpoints draws nothing
            let _ = write!(
                d,
                "M {} {} A {} {} 0 1 0 {} {} A {} {} 0 1 0 {} {} Z",
                cx - rx, cy, rx, ry, cx + rx, cy, rx, ry, cx - rx, cy
            );
        }
        Outline::Polygon { points } | Outline::Polyline { points } => {
            let Some((first, rest)) = points.split_first() else { return };
            sep(d);
            let _ = write!(d, "M {} {}", first.x, first.y);
            for p in rest {
                let _ = write!(d, " L {} {}", p.x, p.y);
            }
            if matches!(o, Outline::Polygon { .. }) {
                d.push_str(" Z");
            }
        }
        Outline::Compound { parts } => {
            for p in parts {
                push_outline(d, p);
            }
        }
    }
}

/// `M x y C c1 c2 end` for an edge curve.
pub fn curve_to_svg_path(c: &EdgeCurve) -> String {
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        c.start.x, c.start.y, c.c1.x, c.c1.y, c.c2.x, c.c2.y, c.end.x, c.end.y
    )
}

/// SVG `transform` placing a node-local drawing on the canvas.
pub fn node_transform(n: &Node) -> String {
    let c = n.center();
    if n.rotation == 0.0 {
        format!("translate({} {})", n.position.x, n.position.y)
    } else {
        format!("rotate({} {} {}) translate({} {})", n.rotation, c.x, c.y, n.position.x, n.position.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::outline;
    use crate::model::{ShapeKind, Vec2};

    #[test]
    fn polygon_path_closes() {
        let d = outline_to_svg_path(&outline(ShapeKind::Diamond, 80.0, 80.0));
        assert_eq!(d, "M 40 4 L 76 40 L 40 76 L 4 40 Z");
    }

    #[test]
    fn square_rect_uses_lines_only() {
        let d = outline_to_svg_path(&outline(ShapeKind::Header, 120.0, 40.0));
        assert_eq!(d, "M 0 0 H 120 V 40 H 0 Z");
    }

    #[test]
    fn compound_outline_has_one_subpath_per_part() {
        let d = outline_to_svg_path(&outline(ShapeKind::UShape1, 80.0, 80.0));
        assert_eq!(d.matches('M').count(), 3);
        let d = outline_to_svg_path(&outline(ShapeKind::Document, 80.0, 100.0));
        // body closes, fold stays open
        assert_eq!(d.matches('Z').count(), 1);
    }

    #[test]
    fn curve_path_format() {
        let c = EdgeCurve {
            start: Vec2::new(0.0, 0.0),
            c1: Vec2::new(25.0, 0.0),
            c2: Vec2::new(75.0, 10.0),
            end: Vec2::new(100.0, 10.0),
        };
        assert_eq!(curve_to_svg_path(&c), "M 0 0 C 25 0, 75 10, 100 10");
    }
}
