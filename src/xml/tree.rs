//! Node types of the lossless document model.

use quick_xml::escape::unescape;

/// A parsed XML document: a byte-order-mark flag plus the top-level nodes.
///
/// Top-level nodes include the declaration, comments, processing instructions,
/// whitespace, and exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlDocument {
    pub(crate) bom: bool,
    pub(crate) nodes: Vec<XmlNode>,
}

impl XmlDocument {
    /// The root element, if the document has one.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    /// Mutable access to the root element.
    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }

    /// All top-level nodes in document order.
    pub fn nodes(&self) -> &[XmlNode] {
        &self.nodes
    }

    /// Whether the source started with a UTF-8 byte-order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }
}

/// A single node. Everything except elements is kept as verbatim source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Character data with entity references left unexpanded.
    Text(String),
    /// `<!-- ... -->` including the delimiters.
    Comment(String),
    /// `<![CDATA[ ... ]]>` including the delimiters.
    CData(String),
    /// `<?target ... ?>`
    ProcessingInstruction(String),
    /// `<?xml ... ?>`
    Declaration(String),
    /// `<!DOCTYPE ... >`
    DocType(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True for text nodes that hold nothing but whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, XmlNode::Text(t) if t.chars().all(char::is_whitespace))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, XmlNode::Comment(_))
    }
}

/// An attribute with its unescaped value.
///
/// `raw` holds the exact source text (leading whitespace, name, quotes) while
/// the attribute is unchanged; it is dropped as soon as the value changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: String,
    pub value: String,
    pub(crate) raw: Option<String>,
}

impl XmlAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            raw: None,
        }
    }
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub(crate) attributes: Vec<XmlAttribute>,
    /// Whitespace between the last attribute and `>` or `/>`, when parsed.
    pub(crate) tag_tail: Option<String>,
    pub(crate) self_closing: bool,
    pub(crate) children: Vec<XmlNode>,
    /// `</name>` exactly as written, when parsed.
    pub(crate) raw_end: Option<String>,
}

impl XmlElement {
    /// Create a new, empty, self-closing element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            tag_tail: None,
            self_closing: true,
            children: Vec::new(),
            raw_end: None,
        }
    }

    /// Create a self-closing element with the given attributes in order.
    pub fn with_attributes(name: impl Into<String>, attributes: &[(&str, &str)]) -> Self {
        let mut element = Self::new(name);
        element.attributes = attributes
            .iter()
            .map(|(n, v)| XmlAttribute::new(*n, *v))
            .collect();
        element
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Set an attribute value. Setting the current value is a no-op, so the
    /// original source text of the attribute survives.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) if attr.value == value => {}
            Some(attr) => {
                attr.value = value.to_string();
                attr.raw = None;
            }
            None => self.attributes.push(XmlAttribute::new(name, value)),
        }
    }

    pub fn is_self_closing(&self) -> bool {
        self.self_closing && self.children.is_empty()
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<XmlNode> {
        &mut self.children
    }

    /// Child elements in document order, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// First child element with the given name.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Index into `children()` of the first child element with the given name.
    pub fn position_of_child(&self, name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(e) if e.name == name))
    }

    /// Concatenated character data of the direct children, unescaped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                XmlNode::Text(raw) => match unescape(raw) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(raw),
                },
                XmlNode::CData(raw) => {
                    let inner = raw
                        .strip_prefix("<![CDATA[")
                        .and_then(|s| s.strip_suffix("]]>"))
                        .unwrap_or(raw);
                    out.push_str(inner);
                }
                _ => {}
            }
        }
        out
    }
}
