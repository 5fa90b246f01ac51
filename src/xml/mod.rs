//! Lossless XML document model.
//!
//! nuget.config files are hand-edited, so every edit has to leave comments,
//! declarations, whitespace and unknown elements exactly as they were. This
//! module parses XML (via quick-xml events) into a small mutable tree where
//! every node remembers its original source text. Serializing an untouched
//! tree reproduces the input byte for byte; edits regenerate only the parts
//! that actually changed.
//!
//! ```text
//! XmlDocument
//! ├── Declaration   <?xml version="1.0"?>
//! ├── Text          "\n"
//! └── Element       <configuration> ... </configuration>
//!     ├── Text      "\n  "
//!     ├── Comment   <!-- feeds -->
//!     └── Element   <packageSources> ...
//! ```

mod error;
mod reader;
mod tree;
mod writer;

#[cfg(test)]
mod tests;

pub use error::XmlError;
pub use tree::{XmlAttribute, XmlDocument, XmlElement, XmlNode};
pub use writer::escape_attribute;
