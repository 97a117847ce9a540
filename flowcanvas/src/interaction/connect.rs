//! Edge-connection state machine.
//!
//! `Idle` -> `Dragging` on pointer-down over a visible source handle, back to
//! `Idle` on drop. Only the start of a drag is gated on handle visibility;
//! any target handle on any node is a valid drop, hovered or not.

use crate::algorithms::picking::{handle_at, world_handle};
use crate::error::{EditorError, Result};
use crate::model::{Edge, HandleId, HandleRole, Vec2};
use crate::Editor;
use log::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConnectionState {
    #[default]
    Idle,
    Dragging {
        source_node: String,
        source_handle: HandleId,
        /// Loose end of the prospective edge, canvas coordinates.
        cursor: Vec2,
    },
}

impl Editor {
    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self.connection, ConnectionState::Dragging { .. })
    }

    /// Start dragging an edge out of `handle` on `node_id`. Refused unless the
    /// handle is a source handle of that node's kind and the node currently
    /// shows its handles.
    pub fn begin_connection(&mut self, node_id: &str, handle: HandleId) -> bool {
        if handle.role != HandleRole::Source || !self.handles_visible(node_id) {
            return false;
        }
        let Some(start) = self.store.node(node_id).and_then(|n| world_handle(n, handle)) else {
            return false;
        };
        self.gesture = Default::default();
        self.connection = ConnectionState::Dragging {
            source_node: node_id.to_string(),
            source_handle: handle,
            cursor: start,
        };
        debug!("connection drag from {} {}", node_id, handle);
        true
    }

    /// Move the loose end. No-op when idle.
    pub fn update_connection(&mut self, canvas: Vec2) -> bool {
        match &mut self.connection {
            ConnectionState::Dragging { cursor, .. } if canvas.is_finite() => {
                *cursor = canvas;
                true
            }
            _ => false,
        }
    }

    pub fn cancel_connection(&mut self) -> bool {
        let was = self.is_connecting();
        self.connection = ConnectionState::Idle;
        was
    }

    /// Drop the dragged edge on a specific handle. Returns the new edge id;
    /// an incompatible or missing target cancels the drag without mutation.
    pub fn drop_connection_on(&mut self, node_id: &str, handle: HandleId) -> Option<String> {
        match self.try_drop_connection_on(node_id, handle) {
            Ok(id) => Some(id),
            Err(e) => {
                debug!("connection dropped: {}", e);
                None
            }
        }
    }

    /// Like [`Editor::drop_connection_on`] but reports why nothing was
    /// connected. The drag ends either way.
    pub fn try_drop_connection_on(&mut self, node_id: &str, handle: HandleId) -> Result<String> {
        let ConnectionState::Dragging { source_node, source_handle, .. } = std::mem::take(&mut self.connection) else {
            return Err(EditorError::NoActiveConnection);
        };
        self.connect(&source_node, source_handle, node_id, handle)
    }

    /// Drop the dragged edge at a canvas point, hit-testing target handles of
    /// every node within the configured pick radius.
    pub fn drop_connection_at(&mut self, canvas: Vec2) -> Option<String> {
        if !self.is_connecting() {
            return None;
        }
        let radius = self.config.handle_pick_radius;
        match handle_at(&self.store, canvas, radius, HandleRole::Target, |_| true) {
            Some(hit) => self.drop_connection_on(&hit.node_id, hit.handle),
            None => {
                self.cancel_connection();
                None
            }
        }
    }

    /// Commit an edge directly. Self-loops and parallel edges are allowed.
    pub fn connect(
        &mut self,
        source_node: &str,
        source_handle: HandleId,
        target_node: &str,
        target_handle: HandleId,
    ) -> Result<String> {
        let edge = Edge {
            id: String::new(),
            source_node_id: source_node.to_string(),
            source_handle_id: source_handle,
            target_node_id: target_node.to_string(),
            target_handle_id: target_handle,
        };
        self.mutate("connect", |s| s.add_edge(edge))
    }

    /// String-typed variant of [`Editor::connect`].
    pub fn connect_str(&mut self, source_node: &str, source_handle: &str, target_node: &str, target_handle: &str) -> Result<String> {
        let sh: HandleId = source_handle.parse()?;
        let th: HandleId = target_handle.parse()?;
        self.connect(source_node, sh, target_node, th)
    }
}
