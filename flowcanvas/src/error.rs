//! Error type for the strict entry points of the editor.
//!
//! Interactive operations (pointer gestures, rotate, copy, delete, undo) never
//! surface these: they report failure as `false`/`None` and leave the graph
//! untouched. `EditorError` is returned by the checked APIs (`connect`,
//! strict JSON ingest, config parsing, id parsing) so callers at the wasm
//! boundary can turn it into a typed `{ code, message }` envelope.

use crate::model::HandleRole;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("unknown node id '{0}'")]
    UnknownNode(String),

    #[error("unknown edge id '{0}'")]
    UnknownEdge(String),

    #[error("node '{node}' has no handle '{handle}'")]
    UnknownHandle { node: String, handle: String },

    #[error("handle '{handle}' cannot act as a {expected} handle")]
    HandleRole { handle: String, expected: HandleRole },

    #[error("node '{0}' is not selected")]
    NotSelected(String),

    #[error("no connection drag in progress")]
    NoActiveConnection,

    #[error("malformed handle id '{0}'")]
    InvalidHandleId(String),

    #[error("unknown shape kind '{0}'")]
    InvalidShapeKind(String),

    #[error("document exceeds cap: {0}")]
    CapsExceeded(String),

    #[error("value out of bounds: {0}")]
    OutOfBounds(&'static str),

    #[error("duplicate id '{0}'")]
    DuplicateId(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// Stable machine-readable code, used in the wasm error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            EditorError::UnknownNode(_) | EditorError::UnknownEdge(_) => "invalid_id",
            EditorError::UnknownHandle { .. } => "invalid_handle",
            EditorError::HandleRole { .. } => "incompatible_handle",
            EditorError::NotSelected(_) => "not_selected",
            EditorError::NoActiveConnection => "no_connection",
            EditorError::InvalidHandleId(_) => "invalid_handle",
            EditorError::InvalidShapeKind(_) => "invalid_kind",
            EditorError::CapsExceeded(_) => "caps_exceeded",
            EditorError::OutOfBounds(_) => "out_of_bounds",
            EditorError::DuplicateId(_) => "duplicate_id",
            EditorError::Json(_) => "json_parse",
        }
    }
}
