//! Style normalization and conditional-state presets.
//!
//! Nodes are normalized once on the way into the store, so every stored
//! [`Style`] is fully populated and renderers never fall back per field.

use crate::model::{ConditionalState, Node, OutlineStyle, Style, StylePatch};

/// Colours and stroke pattern a conditional state forces onto a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConditionalPreset {
    pub outline_color: &'static str,
    pub outline_style: OutlineStyle,
    pub text_color: &'static str,
}

pub fn preset(state: ConditionalState) -> ConditionalPreset {
    match state {
        ConditionalState::Inactive => ConditionalPreset {
            outline_color: "#ef4444",
            outline_style: OutlineStyle::Dashed,
            text_color: "#ef4444",
        },
        ConditionalState::Active => ConditionalPreset {
            outline_color: "#22c55e",
            outline_style: OutlineStyle::Solid,
            text_color: "#22c55e",
        },
        ConditionalState::Wip => ConditionalPreset {
            outline_color: "#eab308",
            outline_style: OutlineStyle::Solid,
            text_color: "#eab308",
        },
    }
}

/// Replace invalid fields with their defaults in place.
pub fn normalize_style(style: &mut Style) {
    let d = Style::default();
    if style.fill.trim().is_empty() {
        style.fill = d.fill;
    }
    if style.outline_color.trim().is_empty() {
        style.outline_color = d.outline_color;
    }
    if !(style.outline_width.is_finite() && style.outline_width > 0.0) {
        style.outline_width = d.outline_width;
    }
    if style.text_color.trim().is_empty() {
        style.text_color = d.text_color;
    }
    if !(style.font_size.is_finite() && style.font_size > 0.0) {
        style.font_size = d.font_size;
    }
    if style.font_family.trim().is_empty() {
        style.font_family = d.font_family;
    }
    if !(100..=900).contains(&style.font_weight) {
        style.font_weight = d.font_weight;
    }
}

/// Merge the set fields of `patch` onto `style`. Returns whether anything changed.
pub fn apply_style_patch(style: &mut Style, patch: &StylePatch) -> bool {
    let before = style.clone();
    if let Some(v) = &patch.fill {
        style.fill = v.clone();
    }
    if let Some(v) = &patch.outline_color {
        style.outline_color = v.clone();
    }
    if let Some(v) = patch.outline_style {
        style.outline_style = v;
    }
    if let Some(v) = patch.outline_width {
        style.outline_width = v;
    }
    if let Some(v) = &patch.text_color {
        style.text_color = v.clone();
    }
    if let Some(v) = patch.font_size {
        style.font_size = v;
    }
    if let Some(v) = &patch.font_family {
        style.font_family = v.clone();
    }
    if let Some(v) = patch.font_weight {
        style.font_weight = v;
    }
    normalize_style(style);
    *style != before
}

/// Style as rendered: the conditional preset, when present, wins over the
/// explicit outline colour, outline pattern and text colour.
pub fn effective_style(node: &Node) -> Style {
    let mut s = node.style.clone();
    if let Some(state) = node.conditional_state {
        let p = preset(state);
        s.outline_color = p.outline_color.to_string();
        s.outline_style = p.outline_style;
        s.text_color = p.text_color.to_string();
    }
    s
}
