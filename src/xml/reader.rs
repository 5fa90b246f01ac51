//! Builds the document model from quick-xml events.
//!
//! Every event is paired with the byte range it covers so that each node can
//! keep its exact source text.

use super::error::XmlError;
use super::tree::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

const BOM: char = '\u{feff}';

impl XmlDocument {
    /// Parse XML text into a lossless document.
    ///
    /// # Errors
    ///
    /// Returns an `XmlError` if the text is not a well-formed document with a
    /// single root element.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        let (bom, body) = match source.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, source),
        };
        let nodes = TreeBuilder::new(body).build()?;
        Ok(Self { bom, nodes })
    }
}

struct TreeBuilder<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    /// Open elements, innermost last.
    stack: Vec<XmlElement>,
    top_level: Vec<XmlNode>,
    seen_root: bool,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        Self {
            source,
            reader,
            stack: Vec::new(),
            top_level: Vec::new(),
            seen_root: false,
        }
    }

    fn build(mut self) -> Result<Vec<XmlNode>, XmlError> {
        let source = self.source;
        loop {
            let start = self.reader.buffer_position() as usize;
            let event = self.reader.read_event().map_err(|e| XmlError::Syntax {
                message: e.to_string(),
                position: self.reader.error_position(),
            })?;
            let end = self.reader.buffer_position() as usize;
            let raw = &source[start..end];

            match event {
                Event::Start(e) => {
                    let element = self.open_element(&e, raw, false)?;
                    self.stack.push(element);
                }
                Event::Empty(e) => {
                    let element = self.open_element(&e, raw, true)?;
                    self.attach(XmlNode::Element(element))?;
                }
                Event::End(_) => {
                    let mut element = self.stack.pop().ok_or_else(|| {
                        XmlError::InvalidStructure(format!("unexpected closing tag {}", raw))
                    })?;
                    element.raw_end = Some(raw.to_string());
                    self.attach(XmlNode::Element(element))?;
                }
                Event::Text(_) => self.attach(XmlNode::Text(raw.to_string()))?,
                Event::CData(_) => self.attach(XmlNode::CData(raw.to_string()))?,
                Event::Comment(_) => self.attach(XmlNode::Comment(raw.to_string()))?,
                Event::PI(_) => self.attach(XmlNode::ProcessingInstruction(raw.to_string()))?,
                Event::Decl(_) => self.attach(XmlNode::Declaration(raw.to_string()))?,
                Event::DocType(_) => self.attach(XmlNode::DocType(raw.to_string()))?,
                Event::Eof => break,
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(XmlError::UnclosedElement(open.name.clone()));
        }
        if !self.seen_root {
            return Err(XmlError::EmptyDocument);
        }
        Ok(self.top_level)
    }

    /// Append a finished node to the innermost open element, or to the
    /// document when no element is open.
    fn attach(&mut self, node: XmlNode) -> Result<(), XmlError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match &node {
            XmlNode::Element(e) => {
                if self.seen_root {
                    return Err(XmlError::MultipleRoots(e.name.clone()));
                }
                self.seen_root = true;
            }
            XmlNode::Text(t) if !node.is_whitespace() => {
                return Err(XmlError::InvalidStructure(format!(
                    "text outside the root element: {:?}",
                    t.trim()
                )));
            }
            XmlNode::CData(_) => {
                return Err(XmlError::InvalidStructure(
                    "CDATA outside the root element".to_string(),
                ));
            }
            _ => {}
        }
        self.top_level.push(node);
        Ok(())
    }

    fn open_element(
        &self,
        start: &BytesStart<'_>,
        raw: &str,
        self_closing: bool,
    ) -> Result<XmlElement, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let position = self.reader.buffer_position();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Syntax {
                message: e.to_string(),
                position,
            })?;
            let value = attr.unescape_value().map_err(|e| XmlError::Syntax {
                message: format!("invalid attribute value: {}", e),
                position,
            })?;
            attributes.push(XmlAttribute::new(
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }

        let mut tag_tail = None;
        if let Some(split) = split_start_tag(raw, &name, self_closing)
            && split.attributes.len() == attributes.len()
            && split
                .attributes
                .iter()
                .zip(&attributes)
                .all(|((n, _), a)| *n == a.name)
        {
            for ((_, raw_attr), attr) in split.attributes.into_iter().zip(attributes.iter_mut()) {
                attr.raw = Some(raw_attr);
            }
            tag_tail = Some(split.tail);
        }

        Ok(XmlElement {
            name,
            attributes,
            tag_tail,
            self_closing,
            children: Vec::new(),
            raw_end: None,
        })
    }
}

/// The source pieces of a start tag.
struct SplitStartTag {
    /// `(name, raw text including leading whitespace)` per attribute.
    attributes: Vec<(String, String)>,
    /// Whitespace before `>` or `/>`.
    tail: String,
}

/// Split a raw start tag into per-attribute source text.
///
/// Returns `None` for anything unexpected; the caller then regenerates the
/// tag instead of reusing source text.
fn split_start_tag(raw: &str, name: &str, self_closing: bool) -> Option<SplitStartTag> {
    let close = if self_closing { "/>" } else { ">" };
    let body = raw
        .strip_prefix('<')?
        .strip_prefix(name)?
        .strip_suffix(close)?;

    let mut attributes = Vec::new();
    let mut rest = body;
    loop {
        let ws_len = rest.len() - rest.trim_start().len();
        let after_ws = &rest[ws_len..];
        if after_ws.is_empty() {
            return Some(SplitStartTag {
                attributes,
                tail: rest.to_string(),
            });
        }
        if ws_len == 0 {
            return None;
        }

        let name_len = after_ws.find(|c: char| c == '=' || c.is_whitespace())?;
        let attr_name = &after_ws[..name_len];
        let after_name = after_ws[name_len..].trim_start();
        let after_eq = after_name.strip_prefix('=')?.trim_start();
        let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value_len = after_eq[1..].find(quote)?;

        // Offset of the closing quote within `rest`, then one past it.
        let consumed = rest.len() - after_eq.len() + 1 + value_len + 1;
        attributes.push((attr_name.to_string(), rest[..consumed].to_string()));
        rest = &rest[consumed..];
    }
}
