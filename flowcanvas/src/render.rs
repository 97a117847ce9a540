//! Read-only render model handed to the view layer.

use crate::algorithms::routing::{edge_curve, preview_curve};
use crate::geometry::shapes::{outline, HandlePoint, Outline};
use crate::interaction::connect::ConnectionState;
use crate::model::{Style, Vec2};
use crate::style::effective_style;
use crate::svg::{curve_to_svg_path, node_transform, outline_to_svg_path};
use crate::Editor;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleRender {
    #[serde(flatten)]
    pub point: HandlePoint,
    /// 1.0 on hovered or selected nodes, 0.0 otherwise. Presentation only.
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRender {
    pub id: String,
    pub kind: String,
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub transform: String,
    pub outline: Outline,
    pub path: String,
    pub style: Style,
    pub dash_array: Option<&'static str>,
    pub text: String,
    pub selected: bool,
    pub hovered: bool,
    /// Node-local handle points.
    pub handles: Vec<HandleRender>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRender {
    /// Empty for the pending connection preview.
    pub id: String,
    pub source: Vec2,
    pub target: Vec2,
    pub path: String,
    pub pending: bool,
}

impl Editor {
    /// Per-node draw data, bottom to top.
    pub fn render_nodes(&self) -> Vec<NodeRender> {
        self.store
            .nodes()
            .iter()
            .map(|n| {
                let (w, h) = (n.size.width, n.size.height);
                let o = outline(n.kind, w, h);
                let style = effective_style(n);
                let visible = self.handles_visible(&n.id);
                NodeRender {
                    id: n.id.clone(),
                    kind: n.kind.to_string(),
                    position: n.position,
                    width: w,
                    height: h,
                    rotation: n.rotation,
                    transform: node_transform(n),
                    path: outline_to_svg_path(&o),
                    outline: o,
                    dash_array: style.outline_style.dash_array(),
                    style,
                    text: n.text.clone(),
                    selected: self.selection.contains(&n.id),
                    hovered: self.hovered.contains(&n.id),
                    handles: n
                        .kind
                        .definition()
                        .handles(w, h)
                        .into_iter()
                        .map(|point| HandleRender { point, opacity: if visible { 1.0 } else { 0.0 } })
                        .collect(),
                }
            })
            .collect()
    }

    /// Committed edges plus, while dragging, the preview to the cursor.
    pub fn render_edges(&self) -> Vec<EdgeRender> {
        let mut out: Vec<EdgeRender> = self
            .store
            .edges()
            .iter()
            .filter_map(|e| {
                let s = self.store.node(&e.source_node_id)?;
                let t = self.store.node(&e.target_node_id)?;
                let c = edge_curve(s, e.source_handle_id, t, e.target_handle_id)?;
                Some(EdgeRender {
                    id: e.id.clone(),
                    source: c.start,
                    target: c.end,
                    path: curve_to_svg_path(&c),
                    pending: false,
                })
            })
            .collect();
        if let ConnectionState::Dragging { source_node, source_handle, cursor } = &self.connection {
            let preview = self
                .store
                .node(source_node)
                .and_then(|n| preview_curve(n, *source_handle, *cursor));
            if let Some(c) = preview {
                out.push(EdgeRender {
                    id: String::new(),
                    source: c.start,
                    target: c.end,
                    path: curve_to_svg_path(&c),
                    pending: true,
                });
            }
        }
        out
    }
}
