use crate::error::{EditorError, Result};
use crate::geometry::limits::{self, MAX_TEXT_LEN};
use crate::geometry::tolerance::normalize_degrees;
use crate::model::{Connection, Edge, HandleId, HandleRole, Node, NodePatch, ShapeKind, Snapshot, Vec2};
use crate::style::{apply_style_patch, normalize_style};
use std::collections::{HashMap, HashSet};

/// Ordered in-memory graph. Node order is z-order (last is topmost).
pub struct GraphStore {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    min_size: f32,
    revision: u64,
    next_seq: u64,
}

impl GraphStore {
    pub fn new(min_size: f32) -> Self {
        GraphStore { nodes: Vec::new(), edges: Vec::new(), min_size, revision: 1, next_seq: 0 }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }
    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { nodes: self.nodes.clone(), edges: self.edges.clone() }
    }

    fn id_taken(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id) || self.edges.iter().any(|e| e.id == id)
    }

    /// Fresh `<prefix>-<n>` id. The counter only moves forward, so an id
    /// removed by delete or undo is never handed out again in this session.
    pub fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("{}-{}", prefix, self.next_seq);
            if !self.id_taken(&id) {
                return id;
            }
        }
    }

    /// Enforce the stored-node invariants: clamped size, wrapped rotation,
    /// finite position, populated style, bounded text.
    pub(crate) fn normalize_node(&self, n: &mut Node) {
        n.size.width = limits::clamp_size(n.size.width, self.min_size);
        n.size.height = limits::clamp_size(n.size.height, self.min_size);
        n.rotation = normalize_degrees(n.rotation);
        if !n.position.is_finite() {
            n.position = Vec2::default();
        }
        n.position = limits::clamp_point(n.position);
        normalize_style(&mut n.style);
        if n.text.len() > MAX_TEXT_LEN {
            let cut = n
                .text
                .char_indices()
                .map(|(i, _)| i)
                .take_while(|&i| i <= MAX_TEXT_LEN)
                .last()
                .unwrap_or(0);
            n.text.truncate(cut);
        }
    }

    /// Insert a node, generating an id when `node.id` is empty.
    pub fn add_node(&mut self, mut node: Node) -> Result<String> {
        if node.id.is_empty() {
            node.id = self.next_id(node.kind.as_str());
        } else if self.id_taken(&node.id) {
            return Err(EditorError::DuplicateId(node.id));
        }
        self.normalize_node(&mut node);
        // connections are owned by edges in this store
        node.connections.clear();
        let id = node.id.clone();
        self.nodes.push(node);
        self.bump();
        Ok(id)
    }

    /// Shallow merge of `patch` onto the node. Identity is never touched.
    /// Returns false when the node is missing or nothing changed.
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        let min = self.min_size;
        let Some(idx) = self.nodes.iter().position(|n| n.id == id) else { return false };
        let mut n = self.nodes[idx].clone();
        if let Some(p) = patch.position {
            if p.is_finite() {
                n.position = p;
            }
        }
        if let Some(w) = patch.width {
            n.size.width = limits::clamp_size(w, min);
        }
        if let Some(h) = patch.height {
            n.size.height = limits::clamp_size(h, min);
        }
        if let Some(r) = patch.rotation {
            n.rotation = r;
        }
        if let Some(t) = &patch.text {
            n.text = t.clone();
        }
        apply_style_patch(&mut n.style, &patch.style);
        if let Some(state) = patch.conditional_state {
            n.conditional_state = state;
        }
        self.normalize_node(&mut n);
        if n == self.nodes[idx] {
            return false;
        }
        self.nodes[idx] = n;
        self.bump();
        true
    }

    /// Set a node's position directly, clamped like every other write.
    /// Used by move gestures.
    pub(crate) fn set_position(&mut self, id: &str, p: Vec2) -> bool {
        if !p.is_finite() {
            return false;
        }
        let p = limits::clamp_point(p);
        let Some(n) = self.node_mut(id) else { return false };
        if n.position == p {
            return false;
        }
        n.position = p;
        self.bump();
        true
    }

    /// Remove a node and every edge touching it. Idempotent.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.nodes.iter().position(|n| n.id == id) else { return false };
        self.remove_edges_touching(id);
        self.nodes.remove(idx);
        self.bump();
        true
    }

    /// Validate and insert an edge, appending its descriptor to the source node.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<String> {
        let source = self
            .node(&edge.source_node_id)
            .ok_or_else(|| EditorError::UnknownNode(edge.source_node_id.clone()))?;
        check_handle(source, edge.source_handle_id, HandleRole::Source)?;
        let target = self
            .node(&edge.target_node_id)
            .ok_or_else(|| EditorError::UnknownNode(edge.target_node_id.clone()))?;
        check_handle(target, edge.target_handle_id, HandleRole::Target)?;
        if edge.id.is_empty() {
            edge.id = self.next_id("edge");
        } else if self.id_taken(&edge.id) {
            return Err(EditorError::DuplicateId(edge.id));
        }
        let conn = Connection {
            edge_id: edge.id.clone(),
            from_handle: edge.source_handle_id,
            to_node_id: edge.target_node_id.clone(),
            to_handle: edge.target_handle_id,
        };
        if let Some(src) = self.node_mut(&edge.source_node_id) {
            src.connections.push(conn);
        }
        let id = edge.id.clone();
        self.edges.push(edge);
        self.bump();
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edges.iter().position(|e| e.id == id) else { return false };
        let e = self.edges.remove(idx);
        if let Some(src) = self.node_mut(&e.source_node_id) {
            src.connections.retain(|c| c.edge_id != e.id);
        }
        self.bump();
        true
    }

    /// Remove every edge with `id` as source or target. Returns how many went.
    pub fn remove_edges_touching(&mut self, id: &str) -> usize {
        let before = self.edges.len();
        let gone: HashSet<String> =
            self.edges.iter().filter(|e| e.touches(id)).map(|e| e.id.clone()).collect();
        if gone.is_empty() {
            return 0;
        }
        self.edges.retain(|e| !gone.contains(&e.id));
        for n in &mut self.nodes {
            n.connections.retain(|c| !gone.contains(&c.edge_id) && c.to_node_id != id);
        }
        self.bump();
        before - self.edges.len()
    }

    /// Swap in a whole snapshot. Nodes are re-normalized, duplicate node ids
    /// keep their first occurrence, edges with a missing endpoint are pruned,
    /// and connection descriptors are rebuilt from the surviving edges.
    /// Returns the number of edges pruned.
    pub fn replace(&mut self, snap: Snapshot) -> usize {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(snap.nodes.len());
        for mut n in snap.nodes {
            if !seen.insert(n.id.clone()) {
                continue;
            }
            self.normalize_node(&mut n);
            nodes.push(n);
        }
        let kinds: HashMap<String, ShapeKind> = nodes.iter().map(|n| (n.id.clone(), n.kind)).collect();
        let mut edge_ids = HashSet::new();
        let total = snap.edges.len();
        let edges: Vec<Edge> = snap
            .edges
            .into_iter()
            .filter(|e| {
                let ok = match (kinds.get(e.source_node_id.as_str()), kinds.get(e.target_node_id.as_str())) {
                    (Some(sk), Some(tk)) => {
                        e.source_handle_id.role == HandleRole::Source
                            && e.target_handle_id.role == HandleRole::Target
                            && sk.definition().has_handle(e.source_handle_id)
                            && tk.definition().has_handle(e.target_handle_id)
                    }
                    _ => false,
                };
                ok && !seen.contains(&e.id) && edge_ids.insert(e.id.clone())
            })
            .collect();
        let pruned = total - edges.len();
        for n in &mut nodes {
            let keep: Vec<Connection> = edges
                .iter()
                .filter(|e| e.source_node_id == n.id)
                .map(|e| {
                    n.connections.iter().find(|c| c.edge_id == e.id).cloned().unwrap_or(Connection {
                        edge_id: e.id.clone(),
                        from_handle: e.source_handle_id,
                        to_node_id: e.target_node_id.clone(),
                        to_handle: e.target_handle_id,
                    })
                })
                .collect();
            n.connections = keep;
        }
        self.nodes = nodes;
        self.edges = edges;
        self.bump();
        pruned
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.bump();
    }
}

fn check_handle(node: &Node, handle: HandleId, role: HandleRole) -> Result<()> {
    if handle.role != role {
        return Err(EditorError::HandleRole { handle: handle.to_string(), expected: role });
    }
    if !node.kind.definition().has_handle(handle) {
        return Err(EditorError::UnknownHandle { node: node.id.clone(), handle: handle.to_string() });
    }
    Ok(())
}
