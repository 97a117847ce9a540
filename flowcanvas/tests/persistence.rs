use flowcanvas::geometry::limits::{MAX_EDGES, MAX_TEXT_LEN};
use flowcanvas::{Editor, NodeTypeTemplate, ShapeKind, Vec2};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

fn node(id: &str, kind: &str, x: f32) -> Value {
    json!({
        "id": id, "kind": kind,
        "position": {"x": x, "y": 0.0},
        "size": {"width": 80.0, "height": 80.0}
    })
}

#[test]
fn save_and_load_keeps_graph() {
    let mut ed = Editor::default();
    let a = ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::House), Vec2::new(0.0, 0.0));
    let b = ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::Arrow), Vec2::new(200.0, 0.0));
    ed.connect_str(&a, "corner1-source", &b, "start-target").unwrap();
    let saved = ed.to_json_string();

    let mut other = Editor::default();
    other.from_json_str_strict(&saved).unwrap();
    assert_eq!(other.snapshot(), ed.snapshot());
    assert!(!other.can_undo());

    // ids keep counting past loaded ones
    let c = other.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::Circle), Vec2::new(0.0, 0.0));
    assert!(c != a && c != b);
}

#[test]
fn strict_rejects_bad_handles() {
    let mut ed = Editor::default();
    let doc = json!({
        "nodes": [node("a", "rectangle", 0.0), node("b", "arrow", 200.0)],
        "edges": [{
            "id": "e", "sourceNodeId": "a", "sourceHandleId": "right-source",
            "targetNodeId": "b", "targetHandleId": "left-target"
        }]
    });
    assert_eq!(ed.from_json_value_strict(doc).unwrap_err().code(), "invalid_handle");

    let swapped = json!({
        "nodes": [node("a", "rectangle", 0.0)],
        "edges": [{
            "id": "e", "sourceNodeId": "a", "sourceHandleId": "right-target",
            "targetNodeId": "a", "targetHandleId": "left-target"
        }]
    });
    assert_eq!(ed.from_json_value_strict(swapped).unwrap_err().code(), "incompatible_handle");
    assert_eq!(ed.node_count(), 0);
}

#[test]
fn strict_rejects_unknown_kind_and_long_text() {
    let mut ed = Editor::default();
    let doc = json!({"nodes": [node("a", "blob", 0.0)], "edges": []});
    assert_eq!(ed.from_json_value_strict(doc).unwrap_err().code(), "json_parse");

    let mut long = node("a", "circle", 0.0);
    long["text"] = json!("x".repeat(MAX_TEXT_LEN + 1));
    let doc = json!({"nodes": [long], "edges": []});
    assert_eq!(ed.from_json_value_strict(doc).unwrap_err().code(), "out_of_bounds");
}

#[test]
fn strict_edge_cap() {
    let mut ed = Editor::default();
    let edges: Vec<Value> = (0..=MAX_EDGES)
        .map(|i| {
            json!({
                "id": format!("e{}", i), "sourceNodeId": "a", "sourceHandleId": "right-source",
                "targetNodeId": "a", "targetHandleId": "left-target"
            })
        })
        .collect();
    let doc = json!({"nodes": [node("a", "rectangle", 0.0)], "edges": edges});
    assert_eq!(ed.from_json_value_strict(doc).unwrap_err().code(), "caps_exceeded");
}

#[test]
fn lenient_load_normalizes_nodes() {
    let mut ed = Editor::default();
    let doc = json!({
        "nodes": [{
            "id": "a", "kind": "diamond",
            "position": {"x": 5.0, "y": 5.0},
            "size": {"width": 3.0, "height": 500.0},
            "rotation": 450.0,
            "style": {"outlineWidth": -1.0}
        }],
        "edges": []
    });
    assert!(ed.from_json_value(doc));
    let n = ed.node("a").unwrap();
    assert_eq!(n.size.width, 40.0);
    assert_eq!(n.size.height, 500.0);
    assert_eq!(n.rotation, 90.0);
    assert_eq!(n.style.outline_width, 2.0);
}

#[test]
fn every_commit_reaches_the_change_subscriber() {
    let mut ed = Editor::default();
    let docs: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let d = docs.clone();
    ed.on_change(move |snap| d.borrow_mut().push(snap.nodes.len()));

    let a = ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::Cross), Vec2::new(0.0, 0.0));
    ed.rotate(&a);
    ed.pointer_down_on_node(&a, Vec2::new(0.0, 0.0), false);
    ed.pointer_move(Vec2::new(5.0, 0.0));
    ed.pointer_move(Vec2::new(9.0, 0.0));
    ed.pointer_up(Vec2::new(9.0, 0.0));
    ed.delete(&a);
    ed.from_json_value(json!({"nodes": [node("x", "octagon", 0.0)], "edges": []}));

    // one publish per committed batch; the drag publishes on release only
    assert_eq!(*docs.borrow(), vec![1, 1, 1, 0, 1]);
}
