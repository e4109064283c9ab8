//! Serializes the retained scene into an SVG document string.

use std::fmt::Write as FmtWrite;

use crate::render::scene::SvgNode;

/// Escapes XML special characters in text and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Renders `node` and its subtree, one element per line.
#[must_use]
pub fn write_svg(node: &SvgNode) -> String {
    let mut svg = String::with_capacity(4096);
    write_node(&mut svg, node, 0);
    svg
}

fn write_node(svg: &mut String, node: &SvgNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(svg, "{indent}<{}", node.tag());
    for (name, value) in node.attrs() {
        let _ = write!(svg, r#" {name}="{}""#, escape(value));
    }
    if !node.styles().is_empty() {
        let style = node
            .styles()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        let _ = write!(svg, r#" style="{}""#, escape(&style));
    }

    match (node.text(), node.children().is_empty()) {
        (None, true) => svg.push_str("/>\n"),
        (Some(text), true) => {
            let _ = writeln!(svg, ">{}</{}>", escape(text), node.tag());
        }
        (text, false) => {
            svg.push('>');
            if let Some(text) = text {
                svg.push_str(&escape(text));
            }
            svg.push('\n');
            for child in node.children() {
                write_node(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</{}>", node.tag());
        }
    }
}
