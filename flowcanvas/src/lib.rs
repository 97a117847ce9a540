//! Headless engine for a node/edge diagram canvas: typed shape nodes with
//! connection handles, bezier edges between handles, selection, drag
//! gestures, undo/redo and JSON persistence. Rendering is left to the host;
//! [`Editor::render_nodes`] and [`Editor::render_edges`] produce everything a
//! view needs to draw one frame.

pub mod model;
pub mod error;
pub mod config;
pub mod history;
pub mod selection;
pub mod store;
pub mod style;
pub mod palette;
pub mod properties;
pub mod render;
pub mod svg;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod shapes;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
    pub mod routing;
}
pub mod interaction {
    pub mod connect;
    pub mod gestures;
    pub mod keys;
}
mod editor;
mod json;

pub use config::EditorConfig;
pub use editor::{Editor, SubscriptionId, Viewport};
pub use error::{EditorError, Result};
pub use history::HistoryStatus;
pub use interaction::connect::ConnectionState;
pub use interaction::gestures::{PointerTarget, ResizeDirection};
pub use interaction::keys::{KeyCommand, Modifiers};
pub use json::DOCUMENT_VERSION;
pub use model::{
    ConditionalState, Connection, Edge, HandleId, HandleRole, HandleSide, Node, NodePatch,
    OutlineStyle, ShapeKind, Size, Snapshot, Style, StylePatch, Vec2,
};
pub use palette::{builtin_templates, search_templates, NodeTypeTemplate, TemplateCategory};
pub use properties::PropertiesView;
pub use render::{EdgeRender, HandleRender, NodeRender};
