use crate::error::EditorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x + o.x, y: self.y + o.y }
    }
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2 { x: self.x - o.x, y: self.y - o.y }
    }
    pub fn scale(self, s: f32) -> Vec2 {
        Vec2 { x: self.x * s, y: self.y * s }
    }
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// Every node kind the canvas can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
    Parallelogram,
    Trapezoid,
    Pentagon,
    Hexagon,
    Octagon,
    Star,
    Cross,
    Arrow,
    House,
    LShape1,
    LShape2,
    UShape1,
    UShape2,
    Circle,
    Cylinder,
    Document,
    Database,
    Header,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 21] = [
        ShapeKind::Rectangle,
        ShapeKind::Ellipse,
        ShapeKind::Diamond,
        ShapeKind::Parallelogram,
        ShapeKind::Trapezoid,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Octagon,
        ShapeKind::Star,
        ShapeKind::Cross,
        ShapeKind::Arrow,
        ShapeKind::House,
        ShapeKind::LShape1,
        ShapeKind::LShape2,
        ShapeKind::UShape1,
        ShapeKind::UShape2,
        ShapeKind::Circle,
        ShapeKind::Cylinder,
        ShapeKind::Document,
        ShapeKind::Database,
        ShapeKind::Header,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Star => "star",
            ShapeKind::Cross => "cross",
            ShapeKind::Arrow => "arrow",
            ShapeKind::House => "house",
            ShapeKind::LShape1 => "lshape1",
            ShapeKind::LShape2 => "lshape2",
            ShapeKind::UShape1 => "ushape1",
            ShapeKind::UShape2 => "ushape2",
            ShapeKind::Circle => "circle",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Document => "document",
            ShapeKind::Database => "database",
            ShapeKind::Header => "header",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = EditorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EditorError::InvalidShapeKind(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl OutlineStyle {
    /// SVG `stroke-dasharray` value, `None` for a continuous stroke.
    pub fn dash_array(self) -> Option<&'static str> {
        match self {
            OutlineStyle::Solid => None,
            OutlineStyle::Dashed => Some("6,3"),
            OutlineStyle::Dotted => Some("2,2"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionalState {
    Inactive,
    Active,
    Wip,
}

/// Fully populated node style. Missing fields deserialize to defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Style {
    pub fill: String,
    pub outline_color: String,
    pub outline_style: OutlineStyle,
    pub outline_width: f32,
    pub text_color: String,
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: u16,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            fill: "#fff".to_string(),
            outline_color: "#333".to_string(),
            outline_style: OutlineStyle::Solid,
            outline_width: 2.0,
            text_color: "#000".to_string(),
            font_size: 15.0,
            font_family: "Open Sans".to_string(),
            font_weight: 400,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleRole {
    Source,
    Target,
}

impl fmt::Display for HandleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandleRole::Source => "source",
            HandleRole::Target => "target",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleSide {
    Top,
    Bottom,
    Left,
    Right,
    Corner(u8),
    Start,
    End,
}

impl fmt::Display for HandleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleSide::Top => f.write_str("top"),
            HandleSide::Bottom => f.write_str("bottom"),
            HandleSide::Left => f.write_str("left"),
            HandleSide::Right => f.write_str("right"),
            HandleSide::Corner(i) => write!(f, "corner{}", i),
            HandleSide::Start => f.write_str("start"),
            HandleSide::End => f.write_str("end"),
        }
    }
}

/// A connection point on a node, written `"<side>-<role>"` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandleId {
    pub side: HandleSide,
    pub role: HandleRole,
}

impl HandleId {
    pub const fn new(side: HandleSide, role: HandleRole) -> Self {
        HandleId { side, role }
    }
    pub const fn source(side: HandleSide) -> Self {
        HandleId { side, role: HandleRole::Source }
    }
    pub const fn target(side: HandleSide) -> Self {
        HandleId { side, role: HandleRole::Target }
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side, self.role)
    }
}

impl FromStr for HandleId {
    type Err = EditorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || EditorError::InvalidHandleId(s.to_string());
        let (side, role) = s.rsplit_once('-').ok_or_else(bad)?;
        let role = match role {
            "source" => HandleRole::Source,
            "target" => HandleRole::Target,
            _ => return Err(bad()),
        };
        let side = match side {
            "top" => HandleSide::Top,
            "bottom" => HandleSide::Bottom,
            "left" => HandleSide::Left,
            "right" => HandleSide::Right,
            "start" => HandleSide::Start,
            "end" => HandleSide::End,
            other => {
                let n = other.strip_prefix("corner").ok_or_else(bad)?;
                HandleSide::Corner(n.parse::<u8>().map_err(|_| bad())?)
            }
        };
        Ok(HandleId { side, role })
    }
}

impl Serialize for HandleId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HandleId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Outgoing edge descriptor kept on the source node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub edge_id: String,
    pub from_handle: HandleId,
    pub to_node_id: String,
    pub to_handle: HandleId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub kind: ShapeKind,
    pub position: Vec2,
    pub size: Size,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_state: Option<ConditionalState>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Node {
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: self.position.x + self.size.width * 0.5,
            y: self.position.y + self.size.height * 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source_node_id: String,
    pub source_handle_id: HandleId,
    pub target_node_id: String,
    pub target_handle_id: HandleId,
}

impl Edge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

/// Full copy of the graph, used for history and persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Per-field style update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StylePatch {
    pub fill: Option<String>,
    pub outline_color: Option<String>,
    pub outline_style: Option<OutlineStyle>,
    pub outline_width: Option<f32>,
    pub text_color: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<u16>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        *self == StylePatch::default()
    }
}

/// Shallow update of a node's mutable attributes. Identity (id, kind) is never patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodePatch {
    pub position: Option<Vec2>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub text: Option<String>,
    pub style: StylePatch,
    /// Absent leaves the state alone, `null` clears it.
    #[serde(deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub conditional_state: Option<Option<ConditionalState>>,
}

impl NodePatch {
    pub fn is_empty(&self) -> bool {
        *self == NodePatch::default()
    }
    pub fn position(p: Vec2) -> Self {
        NodePatch { position: Some(p), ..Default::default() }
    }
    pub fn size(width: f32, height: f32) -> Self {
        NodePatch { width: Some(width), height: Some(height), ..Default::default() }
    }
    pub fn rotation(deg: f32) -> Self {
        NodePatch { rotation: Some(deg), ..Default::default() }
    }
}

fn double_option<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_id_round_trips_through_strings() {
        for s in ["top-source", "right-target", "corner3-source", "start-target", "end-source"] {
            let h: HandleId = s.parse().unwrap();
            assert_eq!(h.to_string(), s);
        }
        assert!("middle-source".parse::<HandleId>().is_err());
        assert!("top-sideways".parse::<HandleId>().is_err());
        assert!("cornerX-target".parse::<HandleId>().is_err());
        assert!("top".parse::<HandleId>().is_err());
    }

    #[test]
    fn shape_kind_parses_wire_names() {
        assert_eq!("lshape1".parse::<ShapeKind>().unwrap(), ShapeKind::LShape1);
        assert_eq!(serde_json::to_string(&ShapeKind::UShape2).unwrap(), "\"ushape2\"");
        assert!("image".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn style_fills_missing_fields() {
        let s: Style = serde_json::from_str(r##"{"fill":"#abc"}"##).unwrap();
        assert_eq!(s.fill, "#abc");
        assert_eq!(s.outline_width, 2.0);
        assert_eq!(s.font_family, "Open Sans");
    }

    #[test]
    fn patch_distinguishes_null_from_absent() {
        let p: NodePatch = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(p.conditional_state, None);
        let p: NodePatch = serde_json::from_str(r#"{"conditionalState":null}"#).unwrap();
        assert_eq!(p.conditional_state, Some(None));
        let p: NodePatch = serde_json::from_str(r#"{"conditionalState":"wip"}"#).unwrap();
        assert_eq!(p.conditional_state, Some(Some(ConditionalState::Wip)));
    }

    #[test]
    fn edge_serializes_camel_case() {
        let e = Edge {
            id: "e1".into(),
            source_node_id: "a".into(),
            source_handle_id: HandleId::source(HandleSide::Right),
            target_node_id: "b".into(),
            target_handle_id: HandleId::target(HandleSide::Left),
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["sourceNodeId"], "a");
        assert_eq!(v["sourceHandleId"], "right-source");
        assert_eq!(v["targetHandleId"], "left-target");
    }
}
