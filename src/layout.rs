// ABOUTME: Layout rule checks for the prompt2pptx application
// ABOUTME: Reports generated slides that break the design contract given to the generator

use crate::pom::{Length, PomNode};
use std::fmt;

/// A non-fatal problem found in a generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Check every slide against the layout rules the generator prompt asks for.
pub fn check_layout(slides: &[PomNode]) -> Vec<LayoutIssue> {
    let mut issues = Vec::new();

    for (index, slide) in slides.iter().enumerate() {
        let path = format!("$[{}]", index);

        if !slide.is_stack() {
            issues.push(LayoutIssue {
                path: path.clone(),
                message: format!("slide root should be a vstack or hstack, found {}", slide.type_name()),
            });
        }

        let layout = slide.layout();
        if layout.w != Some(Length::Max) || layout.h != Some(Length::Max) {
            issues.push(LayoutIssue {
                path: path.clone(),
                message: "slide root should declare w: \"max\" and h: \"max\"".to_string(),
            });
        }

        check_node(slide, &path, true, &mut issues);
    }

    issues
}

fn check_node(node: &PomNode, path: &str, is_root: bool, issues: &mut Vec<LayoutIssue>) {
    let layout = node.layout();

    if !is_root && matches!(node, PomNode::VStack(_) | PomNode::HStack(_) | PomNode::Box(_)) {
        if let Some(Length::Px(px)) = layout.h {
            issues.push(LayoutIssue {
                path: path.to_string(),
                message: format!(
                    "nested {} should not have a fixed height ({}px); omit h",
                    node.type_name(),
                    px
                ),
            });
        }
    }

    let mut colors: Vec<(&str, &Option<String>)> = vec![("backgroundColor", &layout.background_color)];
    if let Some(border) = &layout.border {
        colors.push(("border.color", &border.color));
    }

    match node {
        PomNode::Image(_) => issues.push(LayoutIssue {
            path: path.to_string(),
            message: "image nodes are not supported in generated slides".to_string(),
        }),
        PomNode::Text(text) => colors.push(("color", &text.color)),
        PomNode::Shape(shape) => {
            colors.push(("fontColor", &shape.font_color));
            if let Some(fill) = &shape.fill {
                colors.push(("fill.color", &fill.color));
            }
            if let Some(line) = &shape.line {
                colors.push(("line.color", &line.color));
            }
            if let Some(shadow) = &shape.shadow {
                colors.push(("shadow.color", &shadow.color));
            }
        }
        PomNode::Table(table) => {
            for (row_index, row) in table.rows.iter().enumerate() {
                let row_path = format!("{}.rows[{}]", path, row_index);
                if row.cells.len() > table.columns.len() {
                    issues.push(LayoutIssue {
                        path: row_path.clone(),
                        message: format!(
                            "row has {} cells but the table declares {} columns",
                            row.cells.len(),
                            table.columns.len()
                        ),
                    });
                }
                for (cell_index, cell) in row.cells.iter().enumerate() {
                    let cell_path = format!("{}.cells[{}]", row_path, cell_index);
                    check_color(&cell_path, "color", &cell.color, issues);
                    check_color(&cell_path, "backgroundColor", &cell.background_color, issues);
                }
            }
        }
        _ => {}
    }

    for (field, color) in colors {
        check_color(path, field, color, issues);
    }

    match node {
        PomNode::Box(boxed) => {
            check_node(&boxed.children, &format!("{}.children", path), false, issues);
        }
        PomNode::VStack(stack) | PomNode::HStack(stack) => {
            for (index, child) in stack.children.iter().enumerate() {
                check_node(child, &format!("{}.children[{}]", path, index), false, issues);
            }
        }
        _ => {}
    }
}

fn check_color(path: &str, field: &str, color: &Option<String>, issues: &mut Vec<LayoutIssue>) {
    if let Some(color) = color {
        if !is_hex_color(color) {
            issues.push(LayoutIssue {
                path: format!("{}.{}", path, field),
                message: format!("color \"{}\" should be 6 hex digits without '#'", color),
            });
        }
    }
}

/// `2C3E50` style colour: six hex digits, no leading `#`.
pub fn is_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}
