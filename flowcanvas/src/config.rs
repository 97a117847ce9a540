//! Editor tuning knobs.
//!
//! Every field has a default, so a partial JSON document is a valid config:
//!
//! ```json
//! { "minNodeSize": 48, "historyLimit": 200 }
//! ```

use crate::error::Result;
use crate::geometry::limits::{MAX_NODE_SIZE, MIN_NODE_SIZE};
use crate::model::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower clamp for node width and height.
    pub min_node_size: f32,
    /// Offset applied to a duplicated node.
    pub copy_offset: Vec2,
    /// Degrees added per rotate click.
    pub rotation_step: f32,
    /// Maximum undo depth; `None` keeps everything.
    pub history_limit: Option<usize>,
    /// Drop-target tolerance around a handle, canvas units.
    pub handle_pick_radius: f32,
    /// Canvas point where click-to-add places a palette node.
    pub click_add_position: Vec2,
    /// Whether a newly created node becomes the sole selection.
    pub select_on_create: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            min_node_size: MIN_NODE_SIZE,
            copy_offset: Vec2::new(40.0, 40.0),
            rotation_step: 90.0,
            history_limit: None,
            handle_pick_radius: 10.0,
            click_add_position: Vec2::new(300.0, 200.0),
            select_on_create: true,
        }
    }
}

impl EditorConfig {
    /// Parse and normalize a JSON config document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EditorConfig = serde_json::from_str(s)?;
        Ok(cfg.normalized())
    }

    /// Replace unusable values with defaults.
    pub fn normalized(mut self) -> Self {
        let d = EditorConfig::default();
        if !(self.min_node_size.is_finite() && self.min_node_size > 0.0 && self.min_node_size <= MAX_NODE_SIZE) {
            log::warn!("minNodeSize {} rejected, using {}", self.min_node_size, d.min_node_size);
            self.min_node_size = d.min_node_size;
        }
        if !self.copy_offset.is_finite() {
            self.copy_offset = d.copy_offset;
        }
        if !(self.rotation_step.is_finite() && self.rotation_step > 0.0) {
            self.rotation_step = d.rotation_step;
        }
        if self.history_limit == Some(0) {
            self.history_limit = d.history_limit;
        }
        if !(self.handle_pick_radius.is_finite() && self.handle_pick_radius > 0.0) {
            self.handle_pick_radius = d.handle_pick_radius;
        }
        if !self.click_add_position.is_finite() {
            self.click_add_position = d.click_add_position;
        }
        self
    }
}
