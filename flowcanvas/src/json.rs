use crate::error::{EditorError, Result};
use crate::geometry::limits;
use crate::model::{Edge, HandleRole, Node, Snapshot};
use crate::Editor;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocSer<'a> {
    version: u32,
    nodes: &'a [Node],
    edges: &'a [Edge],
}

#[derive(Deserialize)]
struct DocDe {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

pub fn to_json_impl(ed: &Editor) -> Value {
    let doc = DocSer { version: DOCUMENT_VERSION, nodes: ed.store.nodes(), edges: ed.store.edges() };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Lenient load: entries that fail to parse are skipped, dangling edges are
/// pruned. Returns false only when the document itself is unusable.
pub fn from_json_impl(ed: &mut Editor, v: Value) -> bool {
    let Value::Object(mut map) = v else { return false };
    let nodes: Vec<Node> = take_array(&mut map, "nodes");
    let edges: Vec<Edge> = take_array(&mut map, "edges");
    let total = edges.len();
    let pruned = ed.load_snapshot(Snapshot { nodes, edges });
    if pruned > 0 {
        warn!("pruned {} of {} edges with missing endpoints or handles", pruned, total);
    }
    true
}

fn take_array<T: for<'de> Deserialize<'de>>(map: &mut serde_json::Map<String, Value>, key: &str) -> Vec<T> {
    let Some(Value::Array(items)) = map.remove(key) else { return Vec::new() };
    let len = items.len();
    let out: Vec<T> = items.into_iter().filter_map(|it| serde_json::from_value(it).ok()).collect();
    if out.len() != len {
        warn!("skipped {} malformed {}", len - out.len(), key);
    }
    out
}

/// Strict load: the whole document is validated before anything changes.
pub fn from_json_impl_strict(ed: &mut Editor, v: Value) -> Result<()> {
    let doc: DocDe = serde_json::from_value(v)?;
    validate(&doc)?;
    let pruned = ed.load_snapshot(Snapshot { nodes: doc.nodes, edges: doc.edges });
    debug_assert_eq!(pruned, 0);
    Ok(())
}

fn validate(doc: &DocDe) -> Result<()> {
    if let Some(ver) = doc.version {
        if ver > DOCUMENT_VERSION {
            return Err(EditorError::OutOfBounds("document version"));
        }
    }
    if doc.nodes.len() > limits::MAX_NODES {
        return Err(EditorError::CapsExceeded(format!("nodes>{}", limits::MAX_NODES)));
    }
    if doc.edges.len() > limits::MAX_EDGES {
        return Err(EditorError::CapsExceeded(format!("edges>{}", limits::MAX_EDGES)));
    }
    let mut ids = HashSet::new();
    for n in &doc.nodes {
        if n.id.is_empty() {
            return Err(EditorError::UnknownNode(String::new()));
        }
        if !ids.insert(n.id.as_str()) {
            return Err(EditorError::DuplicateId(n.id.clone()));
        }
        if !limits::in_coord_bounds(n.position.x) || !limits::in_coord_bounds(n.position.y) {
            return Err(EditorError::OutOfBounds("node position"));
        }
        if !limits::in_size_bounds(n.size.width) || !limits::in_size_bounds(n.size.height) {
            return Err(EditorError::OutOfBounds("node size"));
        }
        if !n.rotation.is_finite() {
            return Err(EditorError::OutOfBounds("node rotation"));
        }
        if n.text.len() > limits::MAX_TEXT_LEN {
            return Err(EditorError::OutOfBounds("node text"));
        }
    }
    let by_id: HashMap<&str, &Node> = doc.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    for e in &doc.edges {
        if e.id.is_empty() {
            return Err(EditorError::UnknownEdge(String::new()));
        }
        if !ids.insert(e.id.as_str()) {
            return Err(EditorError::DuplicateId(e.id.clone()));
        }
        for (node_id, handle, role) in [
            (&e.source_node_id, e.source_handle_id, HandleRole::Source),
            (&e.target_node_id, e.target_handle_id, HandleRole::Target),
        ] {
            let n = by_id.get(node_id.as_str()).ok_or_else(|| EditorError::UnknownNode(node_id.clone()))?;
            if handle.role != role {
                return Err(EditorError::HandleRole { handle: handle.to_string(), expected: role });
            }
            if !n.kind.definition().has_handle(handle) {
                return Err(EditorError::UnknownHandle { node: n.id.clone(), handle: handle.to_string() });
            }
        }
    }
    Ok(())
}

impl Editor {
    pub fn to_json_value(&self) -> Value {
        to_json_impl(self)
    }

    pub fn to_json_string(&self) -> String {
        self.to_json_value().to_string()
    }

    pub fn from_json_value(&mut self, v: Value) -> bool {
        from_json_impl(self, v)
    }

    pub fn from_json_value_strict(&mut self, v: Value) -> Result<()> {
        from_json_impl_strict(self, v)
    }

    pub fn from_json_str_strict(&mut self, s: &str) -> Result<()> {
        let v: Value = serde_json::from_str(s)?;
        self.from_json_value_strict(v)
    }

    /// Replace the graph with a loaded document. Not undoable: history,
    /// selection, hover and any in-flight drag are reset.
    fn load_snapshot(&mut self, snap: Snapshot) -> usize {
        self.abort_interactions();
        let pruned = self.store.replace(snap);
        self.selection.clear();
        self.hovered.clear();
        self.reset_history();
        self.publish("load");
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rect(id: &str) -> Value {
        json!({
            "id": id, "kind": "rectangle",
            "position": {"x": 10.0, "y": 20.0},
            "size": {"width": 120.0, "height": 60.0}
        })
    }

    fn link(id: &str, a: &str, b: &str) -> Value {
        json!({
            "id": id,
            "sourceNodeId": a, "sourceHandleId": "right-source",
            "targetNodeId": b, "targetHandleId": "left-target"
        })
    }

    #[test]
    fn document_shape() {
        let mut ed = Editor::default();
        assert!(ed.from_json_value(json!({"nodes": [rect("a"), rect("b")], "edges": [link("e", "a", "b")]})));
        let v = ed.to_json_value();
        assert_eq!(v["version"], 1);
        assert_eq!(v["nodes"][0]["style"]["fontFamily"], "Open Sans");
        assert_eq!(v["nodes"][0]["connections"][0]["edgeId"], "e");
        assert_eq!(v["edges"][0]["targetHandleId"], "left-target");
    }

    #[test]
    fn lenient_prunes_and_skips() {
        let mut ed = Editor::default();
        let doc = json!({
            "nodes": [rect("a"), {"id": "bad"}],
            "edges": [link("e1", "a", "ghost"), link("e2", "a", "a")]
        });
        assert!(ed.from_json_value(doc));
        assert_eq!(ed.node_count(), 1);
        assert_eq!(ed.edge_count(), 1);
        assert!(!ed.from_json_value(json!([1, 2])));
    }

    #[test]
    fn strict_rejects_with_codes() {
        let mut ed = Editor::default();
        let dup = json!({"nodes": [rect("a"), rect("a")], "edges": []});
        assert_eq!(ed.from_json_value_strict(dup).unwrap_err().code(), "duplicate_id");
        let dangling = json!({"nodes": [rect("a")], "edges": [link("e", "a", "b")]});
        assert_eq!(ed.from_json_value_strict(dangling).unwrap_err().code(), "invalid_id");
        let mut far = rect("a");
        far["position"]["x"] = json!(1e9);
        assert_eq!(
            ed.from_json_value_strict(json!({"nodes": [far], "edges": []})).unwrap_err().code(),
            "out_of_bounds"
        );
        assert_eq!(ed.from_json_str_strict("{nope").unwrap_err().code(), "json_parse");
        assert_eq!(ed.node_count(), 0);
    }

    #[test]
    fn strict_caps() {
        let mut ed = Editor::default();
        let nodes: Vec<Value> = (0..=limits::MAX_NODES).map(|i| rect(&format!("n{}", i))).collect();
        let err = ed.from_json_value_strict(json!({"nodes": nodes, "edges": []})).unwrap_err();
        assert_eq!(err.code(), "caps_exceeded");
    }

    #[test]
    fn load_resets_history() {
        let mut ed = Editor::default();
        ed.add_node_from_template(
            &crate::palette::NodeTypeTemplate::for_kind(crate::model::ShapeKind::Circle),
            crate::model::Vec2::new(0.0, 0.0),
        );
        assert!(ed.can_undo());
        ed.from_json_value_strict(json!({"version": 1, "nodes": [rect("a")], "edges": []})).unwrap();
        assert!(!ed.can_undo());
        assert!(ed.selected_ids().is_empty());
    }
}
