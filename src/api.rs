use crate::error;
use crate::interop::{from_js, opt_str, to_js};
use crate::Canvas;
use flowcanvas::{
    builtin_templates, search_templates, EditorConfig, HandleId, Modifiers, NodePatch,
    NodeTypeTemplate, ResizeDirection, ShapeKind, Vec2,
};
use js_sys::Function;
use log::Level;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console. `level` is one of
/// `error`, `warn`, `info`, `debug`, `trace`; anything else means debug.
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> bool {
    let level = level.and_then(|l| Level::from_str(&l).ok()).unwrap_or(Level::Debug);
    console_log::init_with_level(level).is_ok()
}

/// Built-in palette entries, optionally filtered by a search query.
#[wasm_bindgen]
pub fn templates(query: Option<String>) -> JsValue {
    let all = builtin_templates();
    let hits = search_templates(&all, query.as_deref().unwrap_or(""));
    to_js(&hits)
}

fn finite2(x: f32, y: f32) -> Result<Vec2, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("y"));
    }
    Ok(Vec2::new(x, y))
}

fn template_for(kind: &str) -> Result<NodeTypeTemplate, JsValue> {
    ShapeKind::from_str(kind)
        .map(NodeTypeTemplate::for_kind)
        .map_err(|e| error::from_editor(&e))
}

fn handle(h: &str) -> Result<HandleId, JsValue> {
    HandleId::from_str(h).map_err(|e| error::from_editor(&e))
}

#[wasm_bindgen]
impl Canvas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Canvas {
        crate::Canvas::rs_new()
    }
    /// Build with a partial `EditorConfig` object. Unusable values fall
    /// back to defaults.
    pub fn with_config(config: JsValue) -> Canvas {
        let cfg: EditorConfig = from_js(config).unwrap_or_default();
        crate::Canvas::rs_with_config(cfg)
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }
    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }

    // Nodes
    pub fn add_node(&mut self, kind: &str, x: f32, y: f32) -> Option<String> {
        let t = template_for(kind).ok()?;
        let p = finite2(x, y).ok()?;
        Some(self.inner.add_node_from_template(&t, p))
    }
    pub fn add_node_res(&mut self, kind: &str, x: f32, y: f32) -> JsValue {
        let t = match template_for(kind) {
            Ok(t) => t,
            Err(e) => return e,
        };
        match finite2(x, y) {
            Ok(p) => error::ok(JsValue::from_str(&self.inner.add_node_from_template(&t, p))),
            Err(e) => e,
        }
    }
    /// Create from a full template object (custom size, style or text).
    pub fn add_node_from_template(&mut self, template: JsValue, x: f32, y: f32) -> Option<String> {
        let t: NodeTypeTemplate = from_js(template).ok()?;
        let p = finite2(x, y).ok()?;
        Some(self.inner.add_node_from_template(&t, p))
    }
    pub fn add_node_from_template_res(&mut self, template: JsValue, x: f32, y: f32) -> JsValue {
        let t: NodeTypeTemplate = match from_js(template) {
            Ok(t) => t,
            Err(e) => return error::bad_input("template", e),
        };
        match finite2(x, y) {
            Ok(p) => error::ok(JsValue::from_str(&self.inner.add_node_from_template(&t, p))),
            Err(e) => e,
        }
    }
    pub fn click_add(&mut self, kind: &str) -> Option<String> {
        let t = template_for(kind).ok()?;
        Some(self.inner.click_add(&t))
    }
    pub fn drop_template(&mut self, kind: &str, screen_x: f32, screen_y: f32) -> Option<String> {
        let t = template_for(kind).ok()?;
        let p = finite2(screen_x, screen_y).ok()?;
        Some(self.inner.drop_template(&t, p))
    }
    pub fn get_node(&self, id: &str) -> JsValue {
        match self.inner.node(id) {
            Some(n) => to_js(n),
            None => JsValue::NULL,
        }
    }
    pub fn get_node_res(&self, id: &str) -> JsValue {
        match self.inner.node(id) {
            Some(n) => error::ok(to_js(n)),
            None => error::invalid_id("node", id),
        }
    }
    pub fn update_node(&mut self, id: &str, patch: JsValue) -> bool {
        match from_js::<NodePatch>(patch) {
            Ok(p) => self.inner.update_node(id, &p),
            Err(_) => false,
        }
    }
    pub fn update_node_res(&mut self, id: &str, patch: JsValue) -> JsValue {
        if self.inner.node(id).is_none() {
            return error::invalid_id("node", id);
        }
        match from_js::<NodePatch>(patch) {
            Ok(p) => error::ok(JsValue::from_bool(self.inner.update_node(id, &p))),
            Err(e) => error::bad_input("patch", e),
        }
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }
    pub fn snapshot(&self) -> JsValue {
        to_js(&self.inner.snapshot())
    }

    // Selection and hover
    pub fn select(&mut self, id: &str, toggle: bool) -> bool {
        self.inner.select(id, toggle)
    }
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection()
    }
    pub fn selected_ids(&self) -> JsValue {
        to_js(&self.inner.selected_ids())
    }
    pub fn set_hovered(&mut self, id: &str, hovered: bool) {
        self.inner.set_hovered(id, hovered)
    }

    // Viewport
    pub fn set_zoom(&mut self, zoom: f32) {
        self.inner.set_zoom(zoom)
    }
    pub fn set_pan(&mut self, x: f32, y: f32) {
        if let Ok(p) = finite2(x, y) {
            self.inner.set_pan(p)
        }
    }
    pub fn viewport(&self) -> JsValue {
        to_js(&self.inner.viewport())
    }

    // Pointer gestures (screen coordinates)
    pub fn pointer_down(&mut self, x: f32, y: f32, toggle: bool) -> JsValue {
        match finite2(x, y) {
            Ok(p) => to_js(&self.inner.pointer_down(p, toggle)),
            Err(_) => JsValue::NULL,
        }
    }
    pub fn pointer_down_on_node(&mut self, id: &str, x: f32, y: f32, toggle: bool) -> bool {
        self.inner.pointer_down_on_node(id, Vec2::new(x, y), toggle)
    }
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_move(Vec2::new(x, y))
    }
    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.inner.pointer_up(Vec2::new(x, y))
    }
    pub fn begin_resize(&mut self, id: &str, dir: &str, x: f32, y: f32) -> bool {
        match ResizeDirection::from_str(dir) {
            Ok(d) => self.inner.begin_resize(id, d, Vec2::new(x, y)),
            Err(_) => false,
        }
    }
    pub fn begin_resize_res(&mut self, id: &str, dir: &str, x: f32, y: f32) -> JsValue {
        let d = match ResizeDirection::from_str(dir) {
            Ok(d) => d,
            Err(e) => return error::from_editor(&e),
        };
        let p = match finite2(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        if self.inner.node(id).is_none() {
            return error::invalid_id("node", id);
        }
        if !self.inner.is_selected(id) {
            return error::not_selected(id);
        }
        error::ok(JsValue::from_bool(self.inner.begin_resize(id, d, p)))
    }
    pub fn cancel_gesture(&mut self) -> bool {
        self.inner.cancel_gesture()
    }
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    // Connections
    pub fn begin_connection(&mut self, node: &str, handle_id: &str) -> bool {
        match handle(handle_id) {
            Ok(h) => self.inner.begin_connection(node, h),
            Err(_) => false,
        }
    }
    pub fn drop_connection_on(&mut self, node: &str, handle_id: &str) -> Option<String> {
        let h = handle(handle_id).ok();
        match h {
            Some(h) => self.inner.drop_connection_on(node, h),
            None => {
                self.inner.cancel_connection();
                None
            }
        }
    }
    pub fn drop_connection_on_res(&mut self, node: &str, handle_id: &str) -> JsValue {
        let h = match handle(handle_id) {
            Ok(h) => h,
            Err(e) => {
                self.inner.cancel_connection();
                return e;
            }
        };
        let r = self.inner.try_drop_connection_on(node, h);
        error::result(r, |id| JsValue::from_str(&id))
    }
    pub fn cancel_connection(&mut self) -> bool {
        self.inner.cancel_connection()
    }
    pub fn is_connecting(&self) -> bool {
        self.inner.is_connecting()
    }
    pub fn connect(&mut self, source: &str, source_handle: &str, target: &str, target_handle: &str) -> Option<String> {
        self.inner.connect_str(source, source_handle, target, target_handle).ok()
    }
    pub fn connect_res(&mut self, source: &str, source_handle: &str, target: &str, target_handle: &str) -> JsValue {
        let r = self.inner.connect_str(source, source_handle, target, target_handle);
        error::result(r, |id| JsValue::from_str(&id))
    }
    pub fn remove_edge(&mut self, id: &str) -> bool {
        self.inner.remove_edge(id)
    }
    pub fn remove_edge_res(&mut self, id: &str) -> JsValue {
        if self.inner.store().edge(id).is_none() {
            return error::invalid_id("edge", id);
        }
        error::ok(JsValue::from_bool(self.inner.remove_edge(id)))
    }

    // Node actions (selected nodes only)
    pub fn rotate(&mut self, id: &str) -> bool {
        self.inner.rotate(id)
    }
    pub fn rotate_res(&mut self, id: &str) -> JsValue {
        if let Some(e) = self.require_selected(id) {
            return e;
        }
        error::ok(JsValue::from_bool(self.inner.rotate(id)))
    }
    pub fn copy(&mut self, id: &str) -> Option<String> {
        self.inner.copy(id)
    }
    pub fn copy_res(&mut self, id: &str) -> JsValue {
        if let Some(e) = self.require_selected(id) {
            return e;
        }
        error::ok(opt_str(self.inner.copy(id)))
    }
    pub fn delete(&mut self, id: &str) -> bool {
        self.inner.delete(id)
    }
    pub fn delete_res(&mut self, id: &str) -> JsValue {
        if let Some(e) = self.require_selected(id) {
            return e;
        }
        error::ok(JsValue::from_bool(self.inner.delete(id)))
    }
    pub fn delete_selected(&mut self) -> u32 {
        self.inner.delete_selected() as u32
    }
    pub fn clear(&mut self) -> bool {
        self.inner.clear()
    }

    // Keyboard
    pub fn handle_key(&mut self, key: &str, ctrl: bool, meta: bool, shift: bool, alt: bool) -> bool {
        self.inner.handle_key(key, Modifiers { ctrl, meta, shift, alt })
    }

    // History
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // Properties panel
    pub fn properties(&self) -> JsValue {
        match self.inner.properties() {
            Some(v) => to_js(&v),
            None => JsValue::NULL,
        }
    }
    pub fn apply_properties(&mut self, patch: JsValue) -> bool {
        match from_js::<NodePatch>(patch) {
            Ok(p) => self.inner.apply_properties(&p),
            Err(_) => false,
        }
    }

    // Render model
    pub fn render_nodes(&self) -> JsValue {
        to_js(&self.inner.render_nodes())
    }
    pub fn render_edges(&self) -> JsValue {
        to_js(&self.inner.render_edges())
    }

    // Persistence
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn to_json_string(&self) -> String {
        self.inner.to_json_string()
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match from_js::<serde_json::Value>(v) {
            Ok(val) => self.inner.from_json_value(val),
            Err(_) => false,
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match from_js::<serde_json::Value>(v) {
            Ok(val) => error::result(self.inner.from_json_value_strict(val), |_| JsValue::from_bool(true)),
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }

    // Subscriptions
    /// `cb(snapshot)` after every committed mutation.
    pub fn on_change(&mut self, cb: Function) -> u32 {
        self.inner.on_change(move |snap| {
            let _ = cb.call1(&JsValue::NULL, &to_js(snap));
        })
    }
    /// `cb({ canUndo, canRedo })` now and whenever either flips.
    pub fn on_history(&mut self, cb: Function) -> u32 {
        self.inner.on_history(move |status| {
            let _ = cb.call1(&JsValue::NULL, &to_js(&status));
        })
    }
    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.inner.unsubscribe(id)
    }
}

impl Canvas {
    fn require_selected(&self, id: &str) -> Option<JsValue> {
        if self.inner.node(id).is_none() {
            return Some(error::invalid_id("node", id));
        }
        if !self.inner.is_selected(id) {
            return Some(error::not_selected(id));
        }
        None
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}
