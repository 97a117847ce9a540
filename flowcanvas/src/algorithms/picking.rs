use crate::geometry::math::{dist_sq, rotate_about};
use crate::geometry::shapes::HandlePoint;
use crate::model::{HandleId, HandleRole, Node, Vec2};
use crate::store::GraphStore;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleHit {
    pub node_id: String,
    pub handle: HandleId,
    pub position: Vec2,
    pub dist: f32,
}

/// Local point -> canvas point for `node`, rotation about the centre included.
pub fn local_to_world(node: &Node, p: Vec2) -> Vec2 {
    let world = node.position.add(p);
    rotate_about(world, node.center(), node.rotation)
}

/// Canvas point -> unrotated node-local point.
pub fn world_to_local(node: &Node, p: Vec2) -> Vec2 {
    rotate_about(p, node.center(), -node.rotation).sub(node.position)
}

pub fn world_handle_points(node: &Node) -> Vec<HandlePoint> {
    node.kind
        .definition()
        .handles(node.size.width, node.size.height)
        .into_iter()
        .map(|h| HandlePoint { id: h.id, position: local_to_world(node, h.position) })
        .collect()
}

pub fn world_handle(node: &Node, id: HandleId) -> Option<Vec2> {
    node.kind
        .definition()
        .handle_point(node.size.width, node.size.height, id)
        .map(|p| local_to_world(node, p))
}

pub fn node_contains(node: &Node, p: Vec2) -> bool {
    let l = world_to_local(node, p);
    l.x >= 0.0 && l.y >= 0.0 && l.x <= node.size.width && l.y <= node.size.height
}

/// Topmost node whose rotated box contains `p`.
pub fn node_at<'a>(store: &'a GraphStore, p: Vec2) -> Option<&'a Node> {
    store.nodes().iter().rev().find(|n| node_contains(n, p))
}

/// Nearest handle of `role` within `radius` of `p`, over every node that
/// passes `filter`. Ties go to the topmost node.
pub fn handle_at(
    store: &GraphStore,
    p: Vec2,
    radius: f32,
    role: HandleRole,
    mut filter: impl FnMut(&Node) -> bool,
) -> Option<HandleHit> {
    let r2 = radius * radius;
    let mut best: Option<(f32, &Node, HandlePoint)> = None;
    for n in store.nodes().iter().rev() {
        if !filter(n) {
            continue;
        }
        for h in world_handle_points(n) {
            if h.id.role != role {
                continue;
            }
            let d2 = dist_sq(h.position, p);
            if d2 <= r2 && best.as_ref().map_or(true, |(bd, _, _)| d2 < *bd) {
                best = Some((d2, n, h));
            }
        }
    }
    best.map(|(d2, n, h)| HandleHit { node_id: n.id.clone(), handle: h.id, position: h.position, dist: d2.sqrt() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HandleSide, ShapeKind, Size, Style};

    fn rect(id: &str, x: f32, y: f32, rot: f32) -> Node {
        Node {
            id: id.into(),
            kind: ShapeKind::Rectangle,
            position: Vec2::new(x, y),
            size: Size::new(100.0, 50.0),
            rotation: rot,
            style: Style::default(),
            text: String::new(),
            conditional_state: None,
            connections: Vec::new(),
        }
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        dist_sq(a, b) < 1e-6
    }

    #[test]
    fn handles_follow_rotation() {
        let n = rect("a", 0.0, 0.0, 90.0);
        // right midpoint (100,25) turns onto the bottom of the centre (50,25)
        let p = world_handle(&n, HandleId::source(HandleSide::Right)).unwrap();
        assert!(close(p, Vec2::new(50.0, 75.0)));
        assert!(world_handle(&n, HandleId::source(HandleSide::Start)).is_none());
    }

    #[test]
    fn topmost_node_wins() {
        let mut s = GraphStore::new(40.0);
        s.add_node(rect("a", 0.0, 0.0, 0.0)).unwrap();
        s.add_node(rect("b", 50.0, 0.0, 0.0)).unwrap();
        assert_eq!(node_at(&s, Vec2::new(75.0, 10.0)).unwrap().id, "b");
        assert_eq!(node_at(&s, Vec2::new(10.0, 10.0)).unwrap().id, "a");
        assert!(node_at(&s, Vec2::new(500.0, 10.0)).is_none());
    }

    #[test]
    fn rotated_box_hit_test() {
        let n = rect("a", 0.0, 0.0, 90.0);
        // rotated box spans x 25..75, y -25..75
        assert!(node_contains(&n, Vec2::new(50.0, -20.0)));
        assert!(!node_contains(&n, Vec2::new(90.0, 25.0)));
    }

    #[test]
    fn handle_at_respects_role_and_radius() {
        let mut s = GraphStore::new(40.0);
        s.add_node(rect("a", 0.0, 0.0, 0.0)).unwrap();
        let hit = handle_at(&s, Vec2::new(3.0, 26.0), 10.0, HandleRole::Target, |_| true).unwrap();
        assert_eq!(hit.handle.to_string(), "left-target");
        assert!(handle_at(&s, Vec2::new(30.0, 26.0), 10.0, HandleRole::Target, |_| true).is_none());
        assert!(handle_at(&s, Vec2::new(3.0, 26.0), 10.0, HandleRole::Target, |n| n.id != "a").is_none());
    }
}
