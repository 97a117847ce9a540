//! Node-type catalogue and node creation.
//!
//! The palette supplies [`NodeTypeTemplate`]s; the editor turns one into a
//! fully normalized [`Node`] at a canvas position, either where a template
//! was dropped or at the configured click-to-add point.

use crate::model::{ConditionalState, Node, ShapeKind, Size, Style, Vec2};
use crate::Editor;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    #[default]
    Basic,
    Advanced,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeTemplate {
    pub id: String,
    pub kind: ShapeKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: TemplateCategory,
    pub default_size: Size,
    #[serde(default)]
    pub default_style: Style,
    #[serde(default)]
    pub default_text: String,
    /// Carried by catalogue entries but never applied: new nodes start
    /// without a conditional state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_conditional_state: Option<ConditionalState>,
}

impl NodeTypeTemplate {
    /// Catalogue entry for `kind` with its default size and style.
    pub fn for_kind(kind: ShapeKind) -> Self {
        let def = kind.definition();
        let category = match kind {
            ShapeKind::Header | ShapeKind::Database | ShapeKind::Cylinder | ShapeKind::Document => {
                TemplateCategory::Advanced
            }
            _ => TemplateCategory::Basic,
        };
        let text = match kind {
            ShapeKind::LShape1 | ShapeKind::LShape2 => "L".to_string(),
            ShapeKind::UShape1 | ShapeKind::UShape2 => "U".to_string(),
            _ => def.name.to_string(),
        };
        NodeTypeTemplate {
            id: kind.as_str().to_string(),
            kind,
            name: def.name.to_string(),
            description: format!("{} shape", def.name),
            category,
            default_size: def.default_size,
            default_style: Style::default(),
            default_text: text,
            default_conditional_state: Some(ConditionalState::Inactive),
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.name.to_lowercase().contains(&q) || self.description.to_lowercase().contains(&q)
    }
}

/// One template per shape kind, in catalogue order.
pub fn builtin_templates() -> Vec<NodeTypeTemplate> {
    ShapeKind::ALL.iter().map(|&k| NodeTypeTemplate::for_kind(k)).collect()
}

/// Case-insensitive search over name and description. An empty query
/// returns everything.
pub fn search_templates<'a>(templates: &'a [NodeTypeTemplate], query: &str) -> Vec<&'a NodeTypeTemplate> {
    templates.iter().filter(|t| t.matches(query)).collect()
}

/// Build an id-less node from a template. The store assigns the id.
pub fn create_node_from_template(template: &NodeTypeTemplate, position: Vec2) -> Node {
    Node {
        id: String::new(),
        kind: template.kind,
        position,
        size: template.default_size,
        rotation: 0.0,
        style: template.default_style.clone(),
        text: template.default_text.clone(),
        conditional_state: None,
        connections: Vec::new(),
    }
}

impl Editor {
    /// Create a node from `template` at a canvas position. Undoable. The
    /// new node becomes the sole selection unless disabled in the config.
    pub fn add_node_from_template(&mut self, template: &NodeTypeTemplate, position: Vec2) -> String {
        let node = create_node_from_template(template, position);
        let id = self.mutate("add node", |s| s.add_node(node));
        match id {
            Ok(id) => {
                if self.config.select_on_create {
                    self.selection.replace_selection([id.clone()]);
                }
                id
            }
            // ids are generated, so a duplicate cannot happen
            Err(e) => {
                log::warn!("add node failed: {}", e);
                String::new()
            }
        }
    }

    /// Click on a palette entry: place at the click-to-add point.
    pub fn click_add(&mut self, template: &NodeTypeTemplate) -> String {
        let p = self.config.click_add_position;
        self.add_node_from_template(template, p)
    }

    /// Drop a palette entry at a screen point.
    pub fn drop_template(&mut self, template: &NodeTypeTemplate, screen: Vec2) -> String {
        let p = self.screen_to_canvas(screen);
        self.add_node_from_template(template, p)
    }
}
