use crate::interop::{new_obj, set_kv};
use flowcanvas::EditorError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data {
        set_kv(&e, "data", &d);
    }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Envelope for a core error, keeping its stable code.
pub fn from_editor(e: &EditorError) -> JsValue {
    let data = match e {
        EditorError::UnknownNode(id) => Some(kv("id", id)),
        EditorError::UnknownEdge(id) => Some(kv("id", id)),
        EditorError::DuplicateId(id) => Some(kv("id", id)),
        EditorError::UnknownHandle { node, handle } => {
            let d = new_obj();
            set_kv(&d, "node", &JsValue::from_str(node));
            set_kv(&d, "handle", &JsValue::from_str(handle));
            Some(d.into())
        }
        EditorError::InvalidHandleId(h) => Some(kv("handle", h)),
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

pub fn result<T>(r: flowcanvas::Result<T>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(f(v)),
        Err(e) => from_editor(&e),
    }
}

fn kv(k: &str, v: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, k, &JsValue::from_str(v));
    d.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_str(id));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn not_selected(id: &str) -> JsValue {
    from_editor(&EditorError::NotSelected(id.to_string()))
}

#[inline]
pub fn bad_input(param: &str, e: impl std::fmt::Display) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    err("invalid_input", format!("parameter '{}': {}", param, e), Some(d.into()))
}
