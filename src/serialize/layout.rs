//! Whitespace bookkeeping for inserting and removing nodes.
//!
//! Generated whitespace always uses `\n`; the serializer normalizes line
//! endings once at the end.

use crate::xml::{XmlElement, XmlNode};

pub(crate) const DEFAULT_INDENT_UNIT: &str = "  ";

/// Indentation (text after the last newline) of a whitespace text node.
pub(crate) fn last_line(ws: &str) -> Option<&str> {
    ws.rfind('\n').map(|i| &ws[i + 1..])
}

/// Indentation of `children[index]`, read from the whitespace before it.
pub(crate) fn indent_at(children: &[XmlNode], index: usize) -> Option<String> {
    let previous = children.get(index.checked_sub(1)?)?;
    match previous {
        XmlNode::Text(ws) if previous.is_whitespace() => last_line(ws).map(str::to_string),
        _ => None,
    }
}

/// Indentation of the first non-whitespace child that sits on its own line.
pub(crate) fn first_child_indent(parent: &XmlElement) -> Option<String> {
    let children = parent.children();
    (0..children.len())
        .filter(|&i| !children[i].is_whitespace())
        .find_map(|i| indent_at(children, i))
}

/// Indentation unit of the document, derived from the first indented child
/// of the root; two spaces when nothing is indented.
pub(crate) fn detect_indent_unit(root: &XmlElement, root_indent: &str) -> String {
    let children = root.children();
    (0..children.len())
        .filter(|&i| children[i].as_element().is_some())
        .filter_map(|i| indent_at(children, i))
        .find_map(|indent| {
            indent
                .strip_prefix(root_indent)
                .filter(|unit| !unit.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_INDENT_UNIT.to_string())
}

fn newline_indent(indent: &str) -> XmlNode {
    XmlNode::Text(format!("\n{}", indent))
}

/// Append a node as the last child, on its own line, keeping the closing
/// tag of `parent` on its own line at `parent_indent`.
pub(crate) fn append_child(
    parent: &mut XmlElement,
    node: XmlNode,
    indent: &str,
    parent_indent: &str,
) {
    let children = parent.children_mut();
    let trailing_newline = children
        .last()
        .is_some_and(|last| last.is_whitespace() && matches!(last, XmlNode::Text(t) if t.contains('\n')));

    if trailing_newline {
        let at = children.len() - 1;
        children.insert(at, node);
        children.insert(at, newline_indent(indent));
    } else {
        children.push(newline_indent(indent));
        children.push(node);
        children.push(newline_indent(parent_indent));
    }
}

/// Insert a node on its own line right after `children[index]`.
pub(crate) fn insert_after(parent: &mut XmlElement, index: usize, node: XmlNode, indent: &str) {
    let children = parent.children_mut();
    children.insert(index + 1, node);
    children.insert(index + 1, newline_indent(indent));
}

/// Insert a node on its own line right before `children[index]`.
pub(crate) fn insert_before(parent: &mut XmlElement, index: usize, node: XmlNode, indent: &str) {
    let children = parent.children_mut();
    children.insert(index, newline_indent(indent));
    children.insert(index, node);
}

/// Remove `children[index]` together with the whitespace that indents it.
pub(crate) fn remove_child(parent: &mut XmlElement, index: usize) {
    let children = parent.children_mut();
    children.remove(index);
    if index > 0 && children[index - 1].is_whitespace() {
        children.remove(index - 1);
    }
}
