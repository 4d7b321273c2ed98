// ABOUTME: Document validation for the prompt2pptx application
// ABOUTME: Checks candidate JSON against the POM node schema with path-qualified errors

use crate::errors::{Prompt2PptxError, Result};
use crate::pom::{Border, Length, PomNode, ShapeFill, ShapeLine, ShapeShadow, NODE_TYPES};
use serde::Deserialize;
use serde_json::{Map, Value};

const TEXT_ALIGN: &[&str] = &["left", "center", "right"];
const ALIGN_ITEMS: &[&str] = &["start", "center", "end", "stretch"];
const JUSTIFY_CONTENT: &[&str] = &["start", "center", "end", "spaceBetween"];

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    String,
    Number,
    Bool,
    Border,
    Fill,
    Line,
    Shadow,
    Length,
    OneOf(&'static [&'static str]),
    Node,
    Nodes,
    Columns,
    Rows,
}

struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> Field {
    Field {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> Field {
    Field {
        name,
        kind,
        required: false,
    }
}

const LAYOUT_FIELDS: &[Field] = &[
    optional("w", FieldKind::Length),
    optional("h", FieldKind::Length),
    optional("minW", FieldKind::Number),
    optional("maxW", FieldKind::Number),
    optional("minH", FieldKind::Number),
    optional("maxH", FieldKind::Number),
    optional("padding", FieldKind::Number),
    optional("backgroundColor", FieldKind::String),
    optional("border", FieldKind::Border),
];

const TEXT_FIELDS: &[Field] = &[
    required("text", FieldKind::String),
    optional("fontPx", FieldKind::Number),
    optional("color", FieldKind::String),
    optional("bold", FieldKind::Bool),
    optional("alignText", FieldKind::OneOf(TEXT_ALIGN)),
];

const IMAGE_FIELDS: &[Field] = &[required("src", FieldKind::String)];

const TABLE_FIELDS: &[Field] = &[
    required("columns", FieldKind::Columns),
    required("rows", FieldKind::Rows),
    optional("defaultRowHeight", FieldKind::Number),
];

const BOX_FIELDS: &[Field] = &[required("children", FieldKind::Node)];

const STACK_FIELDS: &[Field] = &[
    required("children", FieldKind::Nodes),
    optional("alignItems", FieldKind::OneOf(ALIGN_ITEMS)),
    optional("justifyContent", FieldKind::OneOf(JUSTIFY_CONTENT)),
    optional("gap", FieldKind::Number),
];

const SHAPE_FIELDS: &[Field] = &[
    required("shapeType", FieldKind::String),
    optional("text", FieldKind::String),
    optional("fill", FieldKind::Fill),
    optional("line", FieldKind::Line),
    optional("shadow", FieldKind::Shadow),
    optional("fontPx", FieldKind::Number),
    optional("fontColor", FieldKind::String),
    optional("alignText", FieldKind::OneOf(TEXT_ALIGN)),
];

const CELL_FIELDS: &[Field] = &[
    required("text", FieldKind::String),
    optional("fontPx", FieldKind::Number),
    optional("color", FieldKind::String),
    optional("bold", FieldKind::Bool),
    optional("alignText", FieldKind::OneOf(TEXT_ALIGN)),
    optional("backgroundColor", FieldKind::String),
];

fn fields_for(kind: &str) -> &'static [Field] {
    match kind {
        "text" => TEXT_FIELDS,
        "image" => IMAGE_FIELDS,
        "table" => TABLE_FIELDS,
        "box" => BOX_FIELDS,
        "vstack" | "hstack" => STACK_FIELDS,
        "shape" => SHAPE_FIELDS,
        _ => &[],
    }
}

/// Short description of a JSON value's type, used in error messages.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate a candidate document and convert it into typed nodes.
///
/// The document must be a non-empty array with one root node per slide.
pub fn validate_document(value: Value) -> Result<Vec<PomNode>> {
    let slides = value.as_array().ok_or_else(|| {
        Prompt2PptxError::validation(
            "$",
            format!("expected an array of slide nodes, found {}", describe(&value)),
        )
    })?;

    if slides.is_empty() {
        return Err(Prompt2PptxError::validation("$", "document contains no slides"));
    }

    for (index, node) in slides.iter().enumerate() {
        validate_node(node, &format!("$[{}]", index))?;
    }

    serde_json::from_value(value).map_err(|e| Prompt2PptxError::validation("$", e.to_string()))
}

/// Validate one node and its subtree. Children are checked as they are
/// reached, so the reported path is the deepest failure.
pub fn validate_node(value: &Value, path: &str) -> Result<()> {
    let map = value.as_object().ok_or_else(|| {
        Prompt2PptxError::validation(path, format!("expected a node object, found {}", describe(value)))
    })?;

    let kind = match map.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        Some(other) => {
            return Err(Prompt2PptxError::validation(
                format!("{}.type", path),
                format!("expected a string, found {}", describe(other)),
            ))
        }
        None => {
            return Err(Prompt2PptxError::validation(
                path,
                "missing required field \"type\"",
            ))
        }
    };

    if !NODE_TYPES.contains(&kind) {
        return Err(Prompt2PptxError::validation(
            format!("{}.type", path),
            format!(
                "unknown node type \"{}\", expected one of {}",
                kind,
                NODE_TYPES.join(", ")
            ),
        ));
    }

    check_fields(map, kind, fields_for(kind), path)?;
    check_fields(map, kind, LAYOUT_FIELDS, path)
}

/// Deserialize a leaf object such as `border` or `shadow` in place.
fn check_object<'a, T: Deserialize<'a>>(value: &'a Value, path: &str) -> Result<()> {
    if !value.is_object() {
        return Err(Prompt2PptxError::validation(
            path,
            format!("expected an object, found {}", describe(value)),
        ));
    }
    T::deserialize(value)
        .map(|_| ())
        .map_err(|e| Prompt2PptxError::validation(path, e.to_string()))
}

fn check_fields(map: &Map<String, Value>, kind: &str, fields: &[Field], path: &str) -> Result<()> {
    for field in fields {
        let field_path = format!("{}.{}", path, field.name);
        match map.get(field.name) {
            None | Some(Value::Null) if field.required => {
                return Err(Prompt2PptxError::validation(
                    path,
                    format!("{} node is missing required field \"{}\"", kind, field.name),
                ));
            }
            None | Some(Value::Null) => {}
            Some(value) => check_field(value, field.kind, &field_path)?,
        }
    }
    Ok(())
}

fn check_field(value: &Value, kind: FieldKind, path: &str) -> Result<()> {
    let mismatch = |expected: &str| {
        Prompt2PptxError::validation(path, format!("expected {}, found {}", expected, describe(value)))
    };

    match kind {
        FieldKind::String if !value.is_string() => Err(mismatch("a string")),
        FieldKind::Number if !value.is_number() => Err(mismatch("a number")),
        FieldKind::Bool if !value.is_boolean() => Err(mismatch("a boolean")),
        FieldKind::Border => check_object::<Border>(value, path),
        FieldKind::Fill => check_object::<ShapeFill>(value, path),
        FieldKind::Line => check_object::<ShapeLine>(value, path),
        FieldKind::Shadow => check_object::<ShapeShadow>(value, path),
        FieldKind::Length => match value {
            Value::Number(_) => Ok(()),
            Value::String(text) => text
                .parse::<Length>()
                .map(|_| ())
                .map_err(|message| Prompt2PptxError::validation(path, message)),
            _ => Err(mismatch("a number, \"max\" or a percentage")),
        },
        FieldKind::OneOf(allowed) => match value.as_str() {
            Some(text) if allowed.contains(&text) => Ok(()),
            Some(text) => Err(Prompt2PptxError::validation(
                path,
                format!("unknown value \"{}\", expected one of {}", text, allowed.join(", ")),
            )),
            None => Err(mismatch("a string")),
        },
        FieldKind::Node => {
            if value.is_array() {
                return Err(Prompt2PptxError::validation(
                    path,
                    "box children must be a single node, found an array",
                ));
            }
            validate_node(value, path)
        }
        FieldKind::Nodes => {
            let children = value.as_array().ok_or_else(|| mismatch("an array of nodes"))?;
            for (index, child) in children.iter().enumerate() {
                validate_node(child, &format!("{}[{}]", path, index))?;
            }
            Ok(())
        }
        FieldKind::Columns => {
            let columns = value.as_array().ok_or_else(|| mismatch("an array of columns"))?;
            for (index, column) in columns.iter().enumerate() {
                let column_path = format!("{}[{}]", path, index);
                let column = column.as_object().ok_or_else(|| {
                    Prompt2PptxError::validation(
                        &column_path,
                        format!("expected a column object, found {}", describe(column)),
                    )
                })?;
                check_fields(column, "column", &[required("width", FieldKind::Number)], &column_path)?;
            }
            Ok(())
        }
        FieldKind::Rows => {
            let rows = value.as_array().ok_or_else(|| mismatch("an array of rows"))?;
            for (index, row) in rows.iter().enumerate() {
                let row_path = format!("{}[{}]", path, index);
                let row = row.as_object().ok_or_else(|| {
                    Prompt2PptxError::validation(
                        &row_path,
                        format!("expected a row object, found {}", describe(row)),
                    )
                })?;
                check_fields(row, "row", &[optional("height", FieldKind::Number)], &row_path)?;

                let cells_path = format!("{}.cells", row_path);
                let cells = match row.get("cells") {
                    Some(Value::Array(cells)) => cells,
                    Some(other) => {
                        return Err(Prompt2PptxError::validation(
                            cells_path,
                            format!("expected an array of cells, found {}", describe(other)),
                        ))
                    }
                    None => {
                        return Err(Prompt2PptxError::validation(
                            row_path,
                            "row is missing required field \"cells\"",
                        ))
                    }
                };

                for (cell_index, cell) in cells.iter().enumerate() {
                    let cell_path = format!("{}[{}]", cells_path, cell_index);
                    let cell = cell.as_object().ok_or_else(|| {
                        Prompt2PptxError::validation(
                            &cell_path,
                            format!("expected a cell object, found {}", describe(cell)),
                        )
                    })?;
                    check_fields(cell, "cell", CELL_FIELDS, &cell_path)?;
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
