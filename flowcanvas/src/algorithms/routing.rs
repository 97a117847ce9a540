use crate::algorithms::picking::{local_to_world, world_handle};
use crate::geometry::tolerance::{safe_div, EPS_LEN};
use crate::model::{HandleId, HandleSide, Node, Vec2};

/// Minimum control-arm length for edge curves, canvas units.
pub const MIN_CURVE_OFFSET: f32 = 25.0;
/// Fraction of the endpoint distance used as control-arm length.
pub const CURVATURE: f32 = 0.25;

/// Unit vector pointing away from the node at `handle`, rotation applied.
pub fn handle_direction(node: &Node, handle: HandleId) -> Vec2 {
    let local = match handle.side {
        HandleSide::Top => Vec2::new(0.0, -1.0),
        HandleSide::Bottom => Vec2::new(0.0, 1.0),
        HandleSide::Left | HandleSide::Start => Vec2::new(-1.0, 0.0),
        HandleSide::Right | HandleSide::End => Vec2::new(1.0, 0.0),
        // vertex handles point away from the box centre
        HandleSide::Corner(_) => {
            let w = node.size.width;
            let h = node.size.height;
            let p = node
                .kind
                .definition()
                .handle_point(w, h, handle)
                .unwrap_or(Vec2::new(w * 0.5, h * 0.5));
            let d = p.sub(Vec2::new(w * 0.5, h * 0.5));
            let len = (d.x * d.x + d.y * d.y).sqrt();
            if len <= EPS_LEN {
                Vec2::new(0.0, -1.0)
            } else {
                d.scale(1.0 / len)
            }
        }
    };
    // rotate the direction, not a point: map through the node transform and
    // subtract the transformed origin
    let origin = local_to_world(node, Vec2::default());
    local_to_world(node, local).sub(origin)
}

/// The four control points of the cubic drawn for an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
    pub start: Vec2,
    pub c1: Vec2,
    pub c2: Vec2,
    pub end: Vec2,
}

pub fn curve_between(start: Vec2, start_dir: Vec2, end: Vec2, end_dir: Vec2) -> EdgeCurve {
    let d = end.sub(start);
    let dist = (d.x * d.x + d.y * d.y).sqrt();
    let offset = (dist * CURVATURE).max(MIN_CURVE_OFFSET);
    EdgeCurve {
        start,
        c1: start.add(start_dir.scale(offset)),
        c2: end.add(end_dir.scale(offset)),
        end,
    }
}

/// Curve for a committed edge, `None` if either handle cannot be resolved.
pub fn edge_curve(source: &Node, source_handle: HandleId, target: &Node, target_handle: HandleId) -> Option<EdgeCurve> {
    let start = world_handle(source, source_handle)?;
    let end = world_handle(target, target_handle)?;
    Some(curve_between(
        start,
        handle_direction(source, source_handle),
        end,
        handle_direction(target, target_handle),
    ))
}

/// Curve for a connection still being dragged: the loose end has no
/// handle, so it points back toward the source.
pub fn preview_curve(source: &Node, source_handle: HandleId, cursor: Vec2) -> Option<EdgeCurve> {
    let start = world_handle(source, source_handle)?;
    let d = start.sub(cursor);
    let len = (d.x * d.x + d.y * d.y).sqrt();
    let back = Vec2::new(safe_div(d.x, len, 0.0), safe_div(d.y, len, 0.0));
    Some(curve_between(start, handle_direction(source, source_handle), cursor, back))
}
