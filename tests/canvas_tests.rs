#![cfg(target_arch = "wasm32")]

use flowcanvas_wasm::Canvas;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, k: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(k)).unwrap_or(JsValue::UNDEFINED)
}

fn is_ok(v: &JsValue) -> bool {
    get(v, "ok").as_bool().unwrap_or(false)
}

fn is_err_code(v: &JsValue, code: &str) -> bool {
    !is_ok(v) && get(&get(v, "error"), "code").as_string().map_or(false, |c| c == code)
}

#[wasm_bindgen_test]
fn add_rotate_undo_delete() {
    let mut c = Canvas::new();
    let id = c.add_node("rectangle", 200.0, 200.0).expect("node id");
    let n = c.get_node(&id);
    assert_eq!(get(&get(&n, "position"), "x").as_f64(), Some(200.0));
    assert_eq!(get(&n, "rotation").as_f64(), Some(0.0));

    assert!(c.rotate(&id));
    assert_eq!(get(&c.get_node(&id), "rotation").as_f64(), Some(90.0));
    assert!(c.undo());
    assert_eq!(get(&c.get_node(&id), "rotation").as_f64(), Some(0.0));
    assert!(c.delete(&id));
    assert_eq!(c.node_count(), 0);
}

#[wasm_bindgen_test]
fn connect_by_handle_names() {
    let mut c = Canvas::new();
    let a = c.add_node("rectangle", 0.0, 0.0).unwrap();
    let b = c.add_node("ellipse", 300.0, 0.0).unwrap();
    assert!(c.select(&a, false));
    assert!(c.begin_connection(&a, "right-source"));
    let e = c.drop_connection_on(&b, "left-target").expect("edge id");
    assert_eq!(c.edge_count(), 1);

    let edges = c.render_edges();
    let first = Array::from(&edges).get(0);
    assert_eq!(get(&first, "id").as_string(), Some(e));
    let conns = Array::from(&get(&c.get_node(&a), "connections"));
    assert_eq!(conns.length(), 1);
}

#[wasm_bindgen_test]
fn strict_methods_return_typed_errors() {
    let mut c = Canvas::new();
    let rev = c.revision();
    assert!(is_err_code(&c.add_node_res("blob", 0.0, 0.0), "invalid_kind"));
    assert!(is_err_code(&c.add_node_res("circle", f32::NAN, 0.0), "non_finite"));
    assert!(is_err_code(&c.get_node_res("nope"), "invalid_id"));
    assert!(is_err_code(&c.remove_edge_res("nope"), "invalid_id"));
    assert_eq!(c.revision(), rev, "state mutated on error");

    let a = c.add_node("rectangle", 0.0, 0.0).unwrap();
    c.clear_selection();
    assert!(is_err_code(&c.rotate_res(&a), "not_selected"));
    assert!(is_err_code(&c.connect_res(&a, "right-target", &a, "left-target"), "incompatible_handle"));
    assert!(is_err_code(&c.connect_res(&a, "middle", &a, "left-target"), "invalid_handle"));
    assert!(is_err_code(&c.begin_resize_res(&a, "sideways", 0.0, 0.0), "out_of_bounds"));
    assert!(is_err_code(&c.drop_connection_on_res(&a, "left-target"), "no_connection"));
    assert!(is_ok(&c.connect_res(&a, "right-source", &a, "left-target")));
}

#[wasm_bindgen_test]
fn json_round_trip_and_strict_load() {
    let mut c = Canvas::new();
    let a = c.add_node("house", 0.0, 0.0).unwrap();
    let b = c.add_node("arrow", 200.0, 0.0).unwrap();
    c.connect(&a, "corner2-source", &b, "start-target").unwrap();
    let doc = c.to_json();

    let mut d = Canvas::new();
    assert!(is_ok(&d.from_json_res(doc)));
    assert_eq!(d.node_count(), 2);
    assert_eq!(d.edge_count(), 1);
    assert!(!d.can_undo());

    let bad = js_sys::JSON::parse(r#"{"nodes":[{"id":"x","kind":"circle","position":{"x":0,"y":0},"size":{"width":80,"height":80}},{"id":"x","kind":"circle","position":{"x":0,"y":0},"size":{"width":80,"height":80}}],"edges":[]}"#).unwrap();
    assert!(is_err_code(&d.from_json_res(bad), "duplicate_id"));
    assert_eq!(d.node_count(), 2);
}

#[wasm_bindgen_test]
fn history_subscription_reports_status() {
    let mut c = Canvas::new();
    let seen = Array::new();
    let push = Function::new_with_args("s", "this.push(s.canUndo)");
    let bound = push.bind(&seen);
    let sub = c.on_history(bound);
    c.add_node("circle", 0.0, 0.0).unwrap();
    c.undo();
    assert_eq!(seen.length(), 3);
    assert_eq!(seen.get(1).as_bool(), Some(true));
    assert_eq!(seen.get(2).as_bool(), Some(false));
    assert!(c.unsubscribe(sub));
}

#[wasm_bindgen_test]
fn keyboard_shortcuts() {
    let mut c = Canvas::new();
    let a = c.add_node("star", 0.0, 0.0).unwrap();
    assert!(c.handle_key("r", false, false, false, false));
    assert_eq!(get(&c.get_node(&a), "rotation").as_f64(), Some(90.0));
    assert!(c.handle_key("d", true, false, false, false));
    assert_eq!(c.node_count(), 2);
    assert!(c.handle_key("z", true, false, false, false));
    assert_eq!(c.node_count(), 1);
    // undo dropped the selected copy, so nothing is left to delete
    assert!(!c.handle_key("Delete", false, false, false, false));
    c.select(&a, false);
    assert!(c.handle_key("Delete", false, false, false, false));
    assert_eq!(c.node_count(), 0);
}
