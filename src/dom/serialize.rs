//! Pretty HTML serialization.
//!
//! Layout: one tag or text run per line, indented one space per level.
//! Whitespace-only text between tags is dropped, other text is trimmed.
//! Preformatted elements are written on a single line exactly as parsed, and
//! the bodies of raw-text elements (`script`, `style`) are copied verbatim.

use std::fmt::Write;

use super::arena::{Dom, NodeData, NodeId};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text is not markup and must not be escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose whitespace is significant.
const PREFORMATTED_ELEMENTS: &[&str] = &["pre", "textarea"];

/// Serialize the tree from its root as indented HTML.
pub fn to_pretty_html(dom: &Dom) -> String {
    let mut out = String::new();
    let root = dom.root();
    match dom.get(root).map(|n| &n.data) {
        Some(NodeData::Document) => {
            for child in dom.children(root) {
                write_pretty(dom, child, 0, &mut out);
            }
        }
        Some(_) => write_pretty(dom, root, 0, &mut out),
        None => {}
    }
    out
}

/// Serialize a subtree without any added whitespace.
pub fn to_html(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_compact(dom, id, false, &mut out);
    out
}

fn indent(depth: usize, out: &mut String) {
    out.extend(std::iter::repeat_n(' ', depth));
}

fn write_pretty(dom: &Dom, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_pretty(dom, child, depth, out);
            }
        }
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref();

            if PREFORMATTED_ELEMENTS.contains(&tag) {
                indent(depth, out);
                write_compact(dom, id, false, out);
                out.push('\n');
                return;
            }

            indent(depth, out);
            write_start_tag(dom, id, out);
            out.push('\n');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            if RAW_TEXT_ELEMENTS.contains(&tag) {
                for child in dom.children(id) {
                    if let Some(text) = dom.text_content(child) {
                        out.push_str(text);
                        if !text.ends_with('\n') {
                            out.push('\n');
                        }
                    }
                }
            } else {
                for child in dom.children(id) {
                    write_pretty(dom, child, depth + 1, out);
                }
            }

            indent(depth, out);
            let _ = writeln!(out, "</{tag}>");
        }
        NodeData::Text(text) => {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                indent(depth, out);
                escape_text(trimmed, out);
                out.push('\n');
            }
        }
        NodeData::Comment(text) => {
            indent(depth, out);
            let _ = writeln!(out, "<!--{text}-->");
        }
        NodeData::Doctype { name, .. } => {
            let _ = writeln!(out, "<!DOCTYPE {name}>");
        }
    }
}

fn write_compact(dom: &Dom, id: NodeId, raw: bool, out: &mut String) {
    let Some(node) = dom.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for child in dom.children(id) {
                write_compact(dom, child, false, out);
            }
        }
        NodeData::Element { name, .. } => {
            let tag = name.local.as_ref();
            write_start_tag(dom, id, out);
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            // Parsers drop one newline right after these start tags.
            if PREFORMATTED_ELEMENTS.contains(&tag)
                && let Some(first) = dom.children(id).next()
                && dom.text_content(first).is_some_and(|t| t.starts_with('\n'))
            {
                out.push('\n');
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&tag);
            for child in dom.children(id) {
                write_compact(dom, child, raw, out);
            }
            let _ = write!(out, "</{tag}>");
        }
        NodeData::Text(text) if raw => out.push_str(text),
        NodeData::Text(text) => escape_text(text, out),
        NodeData::Comment(text) => {
            let _ = write!(out, "<!--{text}-->");
        }
        NodeData::Doctype { name, .. } => {
            let _ = write!(out, "<!DOCTYPE {name}>");
        }
    }
}

fn write_start_tag(dom: &Dom, id: NodeId, out: &mut String) {
    let Some(NodeData::Element { name, attrs }) = dom.get(id).map(|n| &n.data) else {
        return;
    };

    out.push('<');
    out.push_str(name.local.as_ref());
    for attr in attrs {
        out.push(' ');
        if let Some(prefix) = &attr.name.prefix {
            out.push_str(prefix.as_ref());
            out.push(':');
        }
        out.push_str(attr.name.local.as_ref());
        out.push_str("=\"");
        escape_attr(&attr.value, out);
        out.push('"');
    }
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
