//! Serialization of the document model back to text.

use super::tree::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
use quick_xml::escape::escape;

const BOM: char = '\u{feff}';

/// Escape an attribute value, including both quote characters.
pub fn escape_attribute(value: &str) -> String {
    escape(value).into_owned()
}

impl XmlDocument {
    /// Serialize the document. An unmodified document reproduces its source exactly.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }
}

impl XmlElement {
    /// Serialize this element and its subtree.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        write_element(self, &mut out);
        out
    }
}

fn write_node(node: &XmlNode, out: &mut String) {
    match node {
        XmlNode::Element(e) => write_element(e, out),
        XmlNode::Text(raw)
        | XmlNode::Comment(raw)
        | XmlNode::CData(raw)
        | XmlNode::ProcessingInstruction(raw)
        | XmlNode::Declaration(raw)
        | XmlNode::DocType(raw) => out.push_str(raw),
    }
}

fn write_element(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        write_attribute(attr, out);
    }

    let self_close = element.is_self_closing();
    // A parsed tail belongs to the form it was written in; a self-closing
    // element that gained children gets a fresh open tag.
    let keeps_form = element.self_closing == self_close;
    match (&element.tag_tail, keeps_form) {
        (Some(tail), true) => out.push_str(tail),
        _ if self_close => out.push(' '),
        _ => {}
    }

    if self_close {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    match &element.raw_end {
        Some(end) => out.push_str(end),
        None => {
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

fn write_attribute(attr: &XmlAttribute, out: &mut String) {
    match &attr.raw {
        Some(raw) => out.push_str(raw),
        None => {
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            out.push_str(&escape_attribute(&attr.value));
            out.push('"');
        }
    }
}
