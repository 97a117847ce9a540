//! Pointer-driven manipulation: select, move, resize, plus the one-shot
//! node actions (rotate, copy, delete).
//!
//! A move or resize is a multi-event sequence. Its intermediate state lives
//! in [`Gesture`], not in the store; history is recorded lazily on the first
//! event that actually changes a node, and the sequence is published once on
//! pointer-up.

use crate::algorithms::picking::{handle_at, node_at};
use crate::error::EditorError;
use crate::geometry::limits::{self, clamp_size};
use crate::geometry::tolerance::normalize_degrees;
use crate::model::{HandleRole, NodePatch, Size, Vec2};
use crate::Editor;
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeDirection {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::Top,
        ResizeDirection::Bottom,
        ResizeDirection::Left,
        ResizeDirection::Right,
        ResizeDirection::TopLeft,
        ResizeDirection::TopRight,
        ResizeDirection::BottomLeft,
        ResizeDirection::BottomRight,
    ];

    /// Sign applied to the pointer delta per axis: -1 for left/top, +1 for
    /// right/bottom, 0 when the axis is not affected.
    pub fn signs(self) -> (f32, f32) {
        match self {
            ResizeDirection::Top => (0.0, -1.0),
            ResizeDirection::Bottom => (0.0, 1.0),
            ResizeDirection::Left => (-1.0, 0.0),
            ResizeDirection::Right => (1.0, 0.0),
            ResizeDirection::TopLeft => (-1.0, -1.0),
            ResizeDirection::TopRight => (1.0, -1.0),
            ResizeDirection::BottomLeft => (-1.0, 1.0),
            ResizeDirection::BottomRight => (1.0, 1.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeDirection::Top => "top",
            ResizeDirection::Bottom => "bottom",
            ResizeDirection::Left => "left",
            ResizeDirection::Right => "right",
            ResizeDirection::TopLeft => "top-left",
            ResizeDirection::TopRight => "top-right",
            ResizeDirection::BottomLeft => "bottom-left",
            ResizeDirection::BottomRight => "bottom-right",
        }
    }

    /// New size after dragging this affordance by `delta` canvas units.
    pub fn apply(self, origin: Size, delta: Vec2, min: f32) -> Size {
        let (sx, sy) = self.signs();
        Size {
            width: clamp_size(origin.width + sx * delta.x, min),
            height: clamp_size(origin.height + sy * delta.y, min),
        }
    }
}

impl fmt::Display for ResizeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeDirection {
    type Err = EditorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeDirection::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or(EditorError::OutOfBounds("resize direction"))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum Gesture {
    #[default]
    Idle,
    Move {
        anchor: String,
        start: Vec2,
        origins: Vec<(String, Vec2)>,
        /// History generation right after the gesture recorded its entry.
        recorded: Option<u64>,
    },
    Resize {
        node: String,
        dir: ResizeDirection,
        start: Vec2,
        origin: Size,
        recorded: Option<u64>,
    },
}

impl Gesture {
    /// The node whose removal ends the gesture.
    pub(crate) fn anchor(&self) -> Option<&str> {
        match self {
            Gesture::Idle => None,
            Gesture::Move { anchor, .. } => Some(anchor),
            Gesture::Resize { node, .. } => Some(node),
        }
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerTarget {
    Canvas,
    Node { id: String },
    Handle {
        #[serde(rename = "nodeId")]
        node_id: String,
        handle: String,
    },
}

impl Editor {
    pub fn is_dragging(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Generic pointer-down at a screen point: a visible source handle
    /// starts a connection, a node body selects and starts a move, empty
    /// canvas clears the selection (unless the modifier is held).
    pub fn pointer_down(&mut self, screen: Vec2, toggle: bool) -> PointerTarget {
        let p = self.screen_to_canvas(screen);
        let radius = self.config.handle_pick_radius;
        let hit = handle_at(&self.store, p, radius, HandleRole::Source, |n| {
            self.hovered.contains(&n.id) || self.selection.contains(&n.id)
        });
        if let Some(hit) = hit {
            if self.begin_connection(&hit.node_id, hit.handle) {
                return PointerTarget::Handle { node_id: hit.node_id, handle: hit.handle.to_string() };
            }
        }
        if let Some(id) = node_at(&self.store, p).map(|n| n.id.clone()) {
            self.pointer_down_on_node(&id, screen, toggle);
            return PointerTarget::Node { id };
        }
        if !toggle {
            self.selection.clear();
        }
        PointerTarget::Canvas
    }

    /// Pointer-down on a node body. Updates the selection and, if the node
    /// is still selected afterwards, starts moving it (with the rest of the
    /// selection when it is part of a multi-selection).
    pub fn pointer_down_on_node(&mut self, id: &str, screen: Vec2, toggle: bool) -> bool {
        if !self.select(id, toggle) {
            return false;
        }
        if !self.selection.contains(id) {
            return true;
        }
        self.cancel_connection();
        let origins = self
            .selection
            .iter()
            .filter_map(|sid| self.store.node(sid).map(|n| (n.id.clone(), n.position)))
            .collect();
        self.gesture = Gesture::Move { anchor: id.to_string(), start: screen, origins, recorded: None };
        true
    }

    /// Engage a resize affordance on a selected node.
    pub fn begin_resize(&mut self, id: &str, dir: ResizeDirection, screen: Vec2) -> bool {
        if !self.selection.contains(id) {
            return false;
        }
        let Some(n) = self.store.node(id) else { return false };
        let origin = n.size;
        self.cancel_connection();
        self.gesture = Gesture::Resize { node: id.to_string(), dir, start: screen, origin, recorded: None };
        true
    }

    /// Feed a pointer position. Returns whether the store changed.
    pub fn pointer_move(&mut self, screen: Vec2) -> bool {
        if !screen.is_finite() {
            return false;
        }
        let zoom = self.viewport.zoom;
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {
                let p = self.screen_to_canvas(screen);
                self.update_connection(p);
                false
            }
            Gesture::Move { anchor, start, origins, mut recorded } => {
                if !self.store.contains_node(&anchor) {
                    // dragged node vanished; end the drag without touching anything
                    return false;
                }
                let delta = screen.sub(start).scale(1.0 / zoom);
                let targets: Vec<(String, Vec2)> = origins
                    .iter()
                    .filter(|(id, _)| self.store.contains_node(id))
                    .map(|(id, o)| (id.clone(), limits::clamp_point(o.add(delta))))
                    .collect();
                let dirty = targets
                    .iter()
                    .any(|(id, p)| self.store.node(id).map_or(false, |n| n.position != *p));
                if dirty && recorded.is_none() {
                    self.record();
                    recorded = Some(self.history.generation());
                }
                let mut changed = false;
                for (id, p) in &targets {
                    changed |= self.store.set_position(id, *p);
                }
                trace!("move {} by ({}, {})", anchor, delta.x, delta.y);
                self.gesture = Gesture::Move { anchor, start, origins, recorded };
                changed
            }
            Gesture::Resize { node, dir, start, origin, mut recorded } => {
                let Some(current) = self.store.node(&node).map(|n| n.size) else { return false };
                let delta = screen.sub(start).scale(1.0 / zoom);
                let size = dir.apply(origin, delta, self.store.min_size());
                let mut changed = false;
                if size != current {
                    if recorded.is_none() {
                        self.record();
                        recorded = Some(self.history.generation());
                    }
                    changed = self.store.update_node(&node, &NodePatch::size(size.width, size.height));
                }
                trace!("resize {} {} to {}x{}", node, dir, size.width, size.height);
                self.gesture = Gesture::Resize { node, dir, start, origin, recorded };
                changed
            }
        }
    }

    /// Finish the active gesture. A move or resize commits the state left by
    /// the last pointer-move; a connection drag is dropped at this point.
    pub fn pointer_up(&mut self, screen: Vec2) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {
                if !self.is_connecting() {
                    return false;
                }
                let p = self.screen_to_canvas(screen);
                self.drop_connection_at(p).is_some()
            }
            Gesture::Move { recorded, .. } => {
                if recorded.is_some() {
                    self.prune_transient();
                    self.publish("move");
                }
                recorded.is_some()
            }
            Gesture::Resize { recorded, .. } => {
                if recorded.is_some() {
                    self.publish("resize");
                }
                recorded.is_some()
            }
        }
    }

    /// Abandon the active move/resize and put the dragged nodes back where
    /// the gesture found them. If the drag's history entry is still the
    /// newest, it is dropped and the pre-drag state comes back verbatim.
    /// Otherwise edits made mid-drag are kept and the restore becomes its
    /// own undo step.
    pub fn cancel_gesture(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let recorded = match &gesture {
            Gesture::Idle => return false,
            Gesture::Move { recorded, .. } | Gesture::Resize { recorded, .. } => *recorded,
        };
        let Some(generation) = recorded else { return true };
        if generation == self.history.generation() {
            if let Some(before) = self.history.discard_last() {
                self.store.replace(before);
                self.prune_transient();
                self.notify_history();
                self.publish("cancel");
            }
            return true;
        }
        self.mutate("cancel", |s| match gesture {
            Gesture::Move { origins, .. } => origins
                .iter()
                .fold(false, |changed, (id, p)| s.set_position(id, *p) || changed),
            Gesture::Resize { node, origin, .. } => {
                s.update_node(&node, &NodePatch::size(origin.width, origin.height))
            }
            Gesture::Idle => false,
        });
        true
    }

    /// Undoable shallow update, the properties-panel entry point.
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        self.mutate("update", |s| s.update_node(id, patch))
    }

    pub fn rotate(&mut self, id: &str) -> bool {
        if !self.selection.contains(id) {
            return false;
        }
        let step = self.config.rotation_step;
        self.mutate("rotate", |s| rotate_in(s, id, step))
    }

    /// Rotate every selected node in one undo step.
    pub fn rotate_selected(&mut self) -> usize {
        let ids = self.selection.to_vec();
        let step = self.config.rotation_step;
        self.mutate("rotate", |s| ids.iter().filter(|id| rotate_in(s, id, step)).count())
    }

    /// Duplicate a selected node. The copy gets a fresh id, no connections,
    /// and becomes the sole selection.
    pub fn copy(&mut self, id: &str) -> Option<String> {
        if !self.selection.contains(id) {
            return None;
        }
        let offset = self.config.copy_offset;
        let new_id = self.mutate("copy", |s| copy_in(s, id, offset))?;
        self.selection.replace_selection([new_id.clone()]);
        Some(new_id)
    }

    pub fn copy_selected(&mut self) -> Vec<String> {
        let ids = self.selection.to_vec();
        let offset = self.config.copy_offset;
        let copies: Vec<String> =
            self.mutate("copy", |s| ids.iter().filter_map(|id| copy_in(s, id, offset)).collect());
        if !copies.is_empty() {
            self.selection.replace_selection(copies.iter().cloned());
        }
        copies
    }

    /// Delete a selected node together with every edge touching it.
    pub fn delete(&mut self, id: &str) -> bool {
        if !self.selection.contains(id) {
            return false;
        }
        self.mutate("delete", |s| s.remove_node(id))
    }

    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.to_vec();
        self.mutate("delete", |s| ids.iter().filter(|id| s.remove_node(id)).count())
    }

    pub fn remove_edge(&mut self, id: &str) -> bool {
        self.mutate("remove edge", |s| s.remove_edge(id))
    }
}

fn rotate_in(s: &mut crate::store::GraphStore, id: &str, step: f32) -> bool {
    let Some(r) = s.node(id).map(|n| n.rotation) else { return false };
    s.update_node(id, &NodePatch::rotation(normalize_degrees(r + step)))
}

fn copy_in(s: &mut crate::store::GraphStore, id: &str, offset: Vec2) -> Option<String> {
    let mut n = s.node(id)?.clone();
    n.id = String::new();
    n.position = n.position.add(offset);
    n.connections.clear();
    s.add_node(n).ok()
}
