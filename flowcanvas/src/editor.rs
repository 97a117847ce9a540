use crate::config::EditorConfig;
use crate::geometry::limits::{ZOOM_MAX, ZOOM_MIN};
use crate::history::{History, HistoryStatus};
use crate::interaction::connect::ConnectionState;
use crate::interaction::gestures::Gesture;
use crate::model::{Edge, Node, Snapshot, Vec2};
use crate::selection::SelectionSet;
use crate::store::GraphStore;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Screen/canvas transform: `canvas = (screen - pan) / zoom`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { zoom: 1.0, pan: Vec2::default() }
    }
}

impl Viewport {
    pub fn screen_to_canvas(&self, p: Vec2) -> Vec2 {
        p.sub(self.pan).scale(1.0 / self.zoom)
    }
    pub fn canvas_to_screen(&self, p: Vec2) -> Vec2 {
        p.scale(self.zoom).add(self.pan)
    }
}

pub type SubscriptionId = u32;
type ChangeListener = Box<dyn FnMut(&Snapshot)>;
type HistoryListener = Box<dyn FnMut(HistoryStatus)>;

#[derive(Default)]
struct Listeners {
    next_id: SubscriptionId,
    change: Vec<(SubscriptionId, ChangeListener)>,
    history: Vec<(SubscriptionId, HistoryListener)>,
}

impl Listeners {
    fn next(&mut self) -> SubscriptionId {
        self.next_id += 1;
        self.next_id
    }
}

/// The canvas editing engine: graph store, history, selection and the
/// in-flight pointer gesture. Interaction modules add their operations
/// through further `impl Editor` blocks.
pub struct Editor {
    pub(crate) store: GraphStore,
    pub(crate) history: History<Snapshot>,
    pub(crate) selection: SelectionSet,
    pub(crate) hovered: HashSet<String>,
    pub(crate) viewport: Viewport,
    pub(crate) gesture: Gesture,
    pub(crate) connection: ConnectionState,
    pub(crate) config: EditorConfig,
    listeners: Listeners,
    last_status: HistoryStatus,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.normalized();
        Editor {
            store: GraphStore::new(config.min_node_size),
            history: History::new(config.history_limit),
            selection: SelectionSet::new(),
            hovered: HashSet::new(),
            viewport: Viewport::default(),
            gesture: Gesture::Idle,
            connection: ConnectionState::Idle,
            config,
            listeners: Listeners::default(),
            last_status: HistoryStatus::default(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // Read access
    pub fn store(&self) -> &GraphStore {
        &self.store
    }
    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }
    pub fn edges(&self) -> &[Edge] {
        self.store.edges()
    }
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.store.node(id)
    }
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    // Selection and hover
    pub fn select(&mut self, id: &str, toggle: bool) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.selection.handle_interaction(id, toggle);
        true
    }
    pub fn set_selection(&mut self, ids: &[String]) {
        let store = &self.store;
        self.selection
            .replace_selection(ids.iter().filter(|id| store.contains_node(id)).cloned());
    }
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }
    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.to_vec()
    }
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }
    pub fn set_hovered(&mut self, id: &str, hovered: bool) {
        if hovered {
            if self.store.contains_node(id) {
                self.hovered.insert(id.to_string());
            }
        } else {
            self.hovered.remove(id);
        }
    }
    pub fn is_hovered(&self, id: &str) -> bool {
        self.hovered.contains(id)
    }
    /// Handles are shown (and can start a drag) only on hovered or selected nodes.
    pub fn handles_visible(&self, id: &str) -> bool {
        self.is_hovered(id) || self.is_selected(id)
    }

    // Viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.viewport.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }
    pub fn set_pan(&mut self, pan: Vec2) {
        if pan.is_finite() {
            self.viewport.pan = pan;
        }
    }
    pub fn screen_to_canvas(&self, p: Vec2) -> Vec2 {
        self.viewport.screen_to_canvas(p)
    }

    // History
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.can_undo() {
            return false;
        }
        self.abort_interactions();
        let current = self.store.snapshot();
        let Some(prev) = self.history.undo(current) else { return false };
        self.restore(prev, "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        self.abort_interactions();
        let current = self.store.snapshot();
        let Some(next) = self.history.redo(current) else { return false };
        self.restore(next, "redo");
        true
    }

    fn restore(&mut self, snap: Snapshot, op: &str) {
        self.store.replace(snap);
        self.prune_transient();
        self.notify_history();
        self.publish(op);
    }

    /// Run one undoable batch. The pre-batch snapshot is recorded only if the
    /// store revision moved.
    pub(crate) fn mutate<R>(&mut self, op: &str, f: impl FnOnce(&mut GraphStore) -> R) -> R {
        let before = self.store.snapshot();
        let rev = self.store.revision();
        let out = f(&mut self.store);
        if self.store.revision() != rev {
            self.history.record(before);
            self.notify_history();
            self.prune_transient();
            self.publish(op);
        }
        out
    }

    /// Record the pre-mutation state for a multi-event gesture.
    pub(crate) fn record(&mut self) {
        self.history.record(self.store.snapshot());
        self.notify_history();
    }

    /// Drop selection, hover and gesture state whose node no longer exists.
    /// A drag whose node was deleted ends here without touching the store.
    pub(crate) fn prune_transient(&mut self) {
        let store = &self.store;
        self.selection.retain(|id| store.contains_node(id));
        self.hovered.retain(|id| store.contains_node(id));
        if self.gesture.anchor().map_or(false, |id| !store.contains_node(id)) {
            self.gesture = Gesture::Idle;
        }
    }

    pub(crate) fn abort_interactions(&mut self) {
        self.gesture = Gesture::Idle;
        self.connection = ConnectionState::Idle;
    }

    /// Log a committed mutation and hand the new snapshot to subscribers.
    pub(crate) fn publish(&mut self, op: &str) {
        debug!(
            "{}: {} nodes, {} edges (rev {})",
            op,
            self.store.node_count(),
            self.store.edge_count(),
            self.store.revision()
        );
        if self.listeners.change.is_empty() {
            return;
        }
        let snap = self.store.snapshot();
        for (_, cb) in self.listeners.change.iter_mut() {
            cb(&snap);
        }
    }

    pub(crate) fn notify_history(&mut self) {
        let status = self.history.status();
        if status == self.last_status {
            return;
        }
        self.last_status = status;
        for (_, cb) in self.listeners.history.iter_mut() {
            cb(status);
        }
    }

    /// Drop all history, e.g. after loading a document.
    pub fn reset_history(&mut self) {
        self.history.clear();
        self.notify_history();
    }

    // Subscriptions
    pub fn on_change(&mut self, cb: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        let id = self.listeners.next();
        self.listeners.change.push((id, Box::new(cb)));
        id
    }

    /// Subscribe to undo/redo availability. The callback fires once right
    /// away with the current status, then on every change.
    pub fn on_history(&mut self, mut cb: impl FnMut(HistoryStatus) + 'static) -> SubscriptionId {
        let id = self.listeners.next();
        cb(self.history.status());
        self.listeners.history.push((id, Box::new(cb)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.change.len() + self.listeners.history.len();
        self.listeners.change.retain(|(i, _)| *i != id);
        self.listeners.history.retain(|(i, _)| *i != id);
        before != self.listeners.change.len() + self.listeners.history.len()
    }

    /// Remove everything; undoable.
    pub fn clear(&mut self) -> bool {
        self.abort_interactions();
        self.mutate("clear", |s| {
            if s.node_count() == 0 && s.edge_count() == 0 {
                return false;
            }
            s.clear();
            true
        })
    }
}
