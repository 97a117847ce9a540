use crate::algorithms::picking::world_handle_points;
use crate::geometry::shapes::HandlePoint;
use crate::model::{Node, NodePatch, Style};
use crate::style::effective_style;
use crate::Editor;
use serde::Serialize;

/// What the inspector panel shows for the selected node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesView {
    pub node: Node,
    pub effective_style: Style,
    pub handles: Vec<HandlePoint>,
}

impl Editor {
    /// Node driving the properties panel: the first selected node in store
    /// order, or none.
    pub fn properties_node(&self) -> Option<&Node> {
        self.store.nodes().iter().find(|n| self.selection.contains(&n.id))
    }

    pub fn properties(&self) -> Option<PropertiesView> {
        let node = self.properties_node()?;
        Some(PropertiesView {
            node: node.clone(),
            effective_style: effective_style(node),
            handles: world_handle_points(node),
        })
    }

    /// Apply an inspector patch to the properties node. Undoable.
    pub fn apply_properties(&mut self, patch: &NodePatch) -> bool {
        let Some(id) = self.properties_node().map(|n| n.id.clone()) else { return false };
        self.update_node(&id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionalState, ShapeKind, StylePatch, Vec2};
    use crate::palette::NodeTypeTemplate;

    #[test]
    fn no_selection_no_view() {
        let mut ed = Editor::default();
        ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::Rectangle), Vec2::new(0.0, 0.0));
        ed.clear_selection();
        assert!(ed.properties().is_none());
        assert!(!ed.apply_properties(&NodePatch::rotation(90.0)));
    }

    #[test]
    fn patch_goes_to_selected_node() {
        let mut ed = Editor::default();
        let id = ed.add_node_from_template(&NodeTypeTemplate::for_kind(ShapeKind::Rectangle), Vec2::new(0.0, 0.0));
        let patch = NodePatch {
            text: Some("Start".into()),
            style: StylePatch { fill: Some("#0f0".into()), ..Default::default() },
            conditional_state: Some(Some(ConditionalState::Wip)),
            ..Default::default()
        };
        assert!(ed.apply_properties(&patch));
        let view = ed.properties().unwrap();
        assert_eq!(view.node.id, id);
        assert_eq!(view.node.text, "Start");
        assert_eq!(view.effective_style.outline_color, "#eab308");
        assert_eq!(view.node.style.outline_color, "#333");
        assert_eq!(view.handles.len(), 8);
        assert!(ed.undo());
        assert_eq!(ed.node(&id).unwrap().text, "Rectangle");
    }
}
