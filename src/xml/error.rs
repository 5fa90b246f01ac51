//! Errors raised while reading XML into the document model.

use thiserror::Error;

/// The input is not well-formed XML.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmlError {
    /// Syntax error reported by the tokenizer.
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { message: String, position: u64 },

    /// Input ended while elements were still open.
    #[error("unexpected end of input, expected closing tag </{0}>")]
    UnclosedElement(String),

    /// Markup that cannot appear where it was found.
    #[error("invalid XML structure: {0}")]
    InvalidStructure(String),

    /// No root element was found.
    #[error("empty XML document: no root element found")]
    EmptyDocument,

    /// More than one top-level element.
    #[error("multiple root elements: found <{0}> after the root element was closed")]
    MultipleRoots(String),
}
