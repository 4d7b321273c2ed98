// ABOUTME: Presentation Object Model (POM) node types for the prompt2pptx application
// ABOUTME: Defines the slide layout tree consumed by the external PPTX builder

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Node type tags accepted in the `"type"` field.
pub const NODE_TYPES: [&str; 7] = ["text", "image", "table", "box", "vstack", "hstack", "shape"];

/// Size of a node along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLength", into = "RawLength")]
pub enum Length {
    /// Absolute size in pixels
    Px(f64),
    /// Fill the available space of the parent (`"max"`)
    Max,
    /// Percentage of the parent (`"50%"`)
    Percent(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawLength {
    Number(f64),
    Text(String),
}

impl TryFrom<RawLength> for Length {
    type Error = String;

    fn try_from(raw: RawLength) -> Result<Self, Self::Error> {
        match raw {
            RawLength::Number(px) => Ok(Length::Px(px)),
            RawLength::Text(text) => text.parse(),
        }
    }
}

impl From<Length> for RawLength {
    fn from(length: Length) -> Self {
        match length {
            Length::Px(px) => RawLength::Number(px),
            Length::Max => RawLength::Text("max".to_string()),
            Length::Percent(pct) => RawLength::Text(format!("{}%", pct)),
        }
    }
}

impl std::str::FromStr for Length {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text == "max" {
            return Ok(Length::Max);
        }
        text.strip_suffix('%')
            .and_then(|pct| pct.trim().parse::<f64>().ok())
            .filter(|pct| pct.is_finite() && *pct >= 0.0)
            .map(Length::Percent)
            .ok_or_else(|| {
                format!(
                    "invalid length \"{}\", expected a number, \"max\" or a percentage like \"50%\"",
                    text
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashType {
    Solid,
    Dash,
    DashDot,
    LgDash,
    LgDashDot,
    LgDashDotDot,
    SysDash,
    SysDot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignItems {
    Start,
    Center,
    End,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JustifyContent {
    Start,
    Center,
    End,
    SpaceBetween,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_type: Option<DashType>,
}

/// Layout attributes shared by every node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_text: Option<TextAlign>,
    #[serde(flatten)]
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Local path, URL or base64 data
    pub src: String,
    #[serde(flatten)]
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_text: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableNode {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_row_height: Option<f64>,
    #[serde(flatten)]
    pub layout: Layout,
}

/// Container wrapping exactly one child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxNode {
    pub children: Box<PomNode>,
    #[serde(flatten)]
    pub layout: Layout,
}

/// Children laid out in array order along the stack's axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackNode {
    pub children: Vec<PomNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(flatten)]
    pub layout: Layout,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeFill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparency: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_type: Option<DashType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowType {
    Outer,
    Inner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeShadow {
    #[serde(rename = "type")]
    pub kind: ShadowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeNode {
    /// Preset geometry name understood by the builder, e.g. `roundRect`
    pub shape_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ShapeFill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<ShapeLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShapeShadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_px: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_text: Option<TextAlign>,
    #[serde(flatten)]
    pub layout: Layout,
}

/// One element of a slide layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PomNode {
    Text(TextNode),
    Image(ImageNode),
    Table(TableNode),
    Box(BoxNode),
    VStack(StackNode),
    HStack(StackNode),
    Shape(ShapeNode),
}

impl PomNode {
    /// The wire tag of this node (`"vstack"`, `"text"`, ...)
    pub fn type_name(&self) -> &'static str {
        match self {
            PomNode::Text(_) => "text",
            PomNode::Image(_) => "image",
            PomNode::Table(_) => "table",
            PomNode::Box(_) => "box",
            PomNode::VStack(_) => "vstack",
            PomNode::HStack(_) => "hstack",
            PomNode::Shape(_) => "shape",
        }
    }

    pub fn layout(&self) -> &Layout {
        match self {
            PomNode::Text(node) => &node.layout,
            PomNode::Image(node) => &node.layout,
            PomNode::Table(node) => &node.layout,
            PomNode::Box(node) => &node.layout,
            PomNode::VStack(node) | PomNode::HStack(node) => &node.layout,
            PomNode::Shape(node) => &node.layout,
        }
    }

    /// Direct children in layout order. Leaf nodes have none.
    pub fn children(&self) -> Vec<&PomNode> {
        match self {
            PomNode::Box(node) => vec![node.children.as_ref()],
            PomNode::VStack(node) | PomNode::HStack(node) => node.children.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this node is one of the two stack containers usable as a slide root.
    pub fn is_stack(&self) -> bool {
        matches!(self, PomNode::VStack(_) | PomNode::HStack(_))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|child| child.node_count()).sum::<usize>()
    }
}

/// Canvas size handed to the builder, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl std::str::FromStr for Canvas {
    type Err = String;

    /// Parse a `WIDTHxHEIGHT` spec such as `1280x720`.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (w, h) = spec
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid canvas size \"{}\", expected WIDTHxHEIGHT", spec))?;
        let width = w.trim().parse::<u32>().map_err(|e| format!("invalid canvas width: {}", e))?;
        let height = h.trim().parse::<u32>().map_err(|e| format!("invalid canvas height: {}", e))?;
        if width == 0 || height == 0 {
            return Err(format!("canvas size must be non-zero, got {}", spec));
        }
        Ok(Self { width, height })
    }
}

/// Serialize a document as pretty-printed JSON, the format the builder reads.
pub fn to_pretty_json(slides: &[PomNode]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(slides)
}

fn length_schema() -> Value {
    json!({
        "anyOf": [
            { "type": "number" },
            { "type": "string", "enum": ["max"] },
            { "type": "string", "pattern": "^[0-9]+(\\.[0-9]+)?%$" }
        ]
    })
}

fn dash_type_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["solid", "dash", "dashDot", "lgDash", "lgDashDot", "lgDashDotDot", "sysDash", "sysDot"]
    })
}

fn align_text_schema() -> Value {
    json!({ "type": "string", "enum": ["left", "center", "right"] })
}

fn node_schema(kind: &str, mut properties: serde_json::Map<String, Value>, required: &[&str]) -> Value {
    properties.insert("type".to_string(), json!({ "type": "string", "const": kind }));
    for (key, value) in [
        ("w", length_schema()),
        ("h", length_schema()),
        ("minW", json!({ "type": "number" })),
        ("maxW", json!({ "type": "number" })),
        ("minH", json!({ "type": "number" })),
        ("maxH", json!({ "type": "number" })),
        ("padding", json!({ "type": "number" })),
        ("backgroundColor", json!({ "type": "string" })),
        (
            "border",
            json!({
                "type": "object",
                "properties": {
                    "color": { "type": "string" },
                    "width": { "type": "number" },
                    "dashType": dash_type_schema()
                }
            }),
        ),
    ] {
        properties.insert(key.to_string(), value);
    }

    let mut required_fields = vec!["type"];
    required_fields.extend_from_slice(required);

    json!({
        "type": "object",
        "properties": properties,
        "required": required_fields
    })
}

fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

/// JSON Schema for a whole document, rooted at `{ "slides": [...] }`.
///
/// Hosted structured output requires an object root, which is why the
/// node array is wrapped.
pub fn document_schema() -> Value {
    let node_ref = json!({ "$ref": "#/$defs/node" });

    let variants = vec![
        node_schema(
            "text",
            object(json!({
                "text": { "type": "string" },
                "fontPx": { "type": "number" },
                "color": { "type": "string" },
                "bold": { "type": "boolean" },
                "alignText": align_text_schema()
            })),
            &["text"],
        ),
        node_schema("image", object(json!({ "src": { "type": "string" } })), &["src"]),
        node_schema(
            "table",
            object(json!({
                "columns": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "width": { "type": "number" } },
                        "required": ["width"]
                    }
                },
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "height": { "type": "number" },
                            "cells": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "text": { "type": "string" },
                                        "fontPx": { "type": "number" },
                                        "color": { "type": "string" },
                                        "bold": { "type": "boolean" },
                                        "alignText": align_text_schema(),
                                        "backgroundColor": { "type": "string" }
                                    },
                                    "required": ["text"]
                                }
                            }
                        },
                        "required": ["cells"]
                    }
                },
                "defaultRowHeight": { "type": "number" }
            })),
            &["columns", "rows"],
        ),
        node_schema("box", object(json!({ "children": node_ref })), &["children"]),
        node_schema(
            "vstack",
            object(json!({
                "children": { "type": "array", "items": node_ref },
                "alignItems": { "type": "string", "enum": ["start", "center", "end", "stretch"] },
                "justifyContent": { "type": "string", "enum": ["start", "center", "end", "spaceBetween"] },
                "gap": { "type": "number" }
            })),
            &["children"],
        ),
        node_schema(
            "hstack",
            object(json!({
                "children": { "type": "array", "items": node_ref },
                "alignItems": { "type": "string", "enum": ["start", "center", "end", "stretch"] },
                "justifyContent": { "type": "string", "enum": ["start", "center", "end", "spaceBetween"] },
                "gap": { "type": "number" }
            })),
            &["children"],
        ),
        node_schema(
            "shape",
            object(json!({
                "shapeType": { "type": "string" },
                "text": { "type": "string" },
                "fill": {
                    "type": "object",
                    "properties": {
                        "color": { "type": "string" },
                        "transparency": { "type": "number" }
                    }
                },
                "line": {
                    "type": "object",
                    "properties": {
                        "color": { "type": "string" },
                        "width": { "type": "number" },
                        "dashType": dash_type_schema()
                    }
                },
                "shadow": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string", "enum": ["outer", "inner"] },
                        "opacity": { "type": "number" },
                        "blur": { "type": "number" },
                        "angle": { "type": "number" },
                        "offset": { "type": "number" },
                        "color": { "type": "string" }
                    },
                    "required": ["type"]
                },
                "fontPx": { "type": "number" },
                "fontColor": { "type": "string" },
                "alignText": align_text_schema()
            })),
            &["shapeType"],
        ),
    ];

    json!({
        "type": "object",
        "properties": {
            "slides": { "type": "array", "items": node_ref }
        },
        "required": ["slides"],
        "$defs": {
            "node": { "anyOf": variants }
        }
    })
}
