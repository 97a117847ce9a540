use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser handle around the canvas editing engine.
#[wasm_bindgen]
pub struct Canvas {
    pub(crate) inner: flowcanvas::Editor,
}

impl Canvas {
    pub fn rs_new() -> Canvas {
        Canvas { inner: flowcanvas::Editor::default() }
    }
    pub fn rs_with_config(config: flowcanvas::EditorConfig) -> Canvas {
        Canvas { inner: flowcanvas::Editor::new(config) }
    }
}
