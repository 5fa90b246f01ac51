//! nuget.config text to [`ConfigModel`].
//!
//! Parsing is tolerant of layout: missing sections yield empty lists, both
//! package source mapping schemas are understood, and element properties can
//! be written as attributes or as nested elements. Only malformed XML is an
//! error.


use crate::model::{ConfigModel, PackageSource, PackageSourceMapping};
use crate::schema::{
    ADD, DISABLED_PACKAGE_SOURCES, KEY, MappingVariant, PACKAGE_SOURCE_MAPPING,
    PACKAGE_SOURCES, PATTERN, VALUE, extract_attr, find_section,
};
use crate::xml::{XmlDocument, XmlElement, XmlError};
use std::collections::HashSet;

/// Parse nuget.config text into a model.
///
/// With `preserve_unknown`, the input text is kept verbatim in
/// `raw_unknown` for a later structural merge. Blank input yields an empty
/// model.
///
/// # Errors
///
/// Returns an `XmlError` when the text is not well-formed XML; no partial
/// model is produced.
pub fn parse_config(xml: &str, preserve_unknown: bool) -> Result<ConfigModel, XmlError> {
    let raw_unknown = preserve_unknown.then(|| xml.to_string());

    if xml.trim_start_matches('\u{feff}').trim().is_empty() {
        return Ok(ConfigModel {
            raw_unknown,
            ..ConfigModel::default()
        });
    }

    let document = XmlDocument::parse(xml)?;
    let Some(root) = document.root() else {
        return Err(XmlError::EmptyDocument);
    };

    Ok(ConfigModel {
        sources: read_sources(root),
        mappings: read_mappings(root),
        raw_unknown,
    })
}

fn read_sources(root: &XmlElement) -> Vec<PackageSource> {
    let mut sources: Vec<PackageSource> = find_section(root, PACKAGE_SOURCES)
        .map(|section| {
            section
                .child_elements()
                .filter(|e| e.name == ADD)
                .filter_map(|add| {
                    let key = extract_attr(add, KEY).filter(|k| !k.is_empty())?;
                    let url = extract_attr(add, VALUE).unwrap_or_default();
                    Some(PackageSource::new(key, url))
                })
                .collect()
        })
        .unwrap_or_default();

    // Disabled keys without a matching source are ignored.
    let disabled: HashSet<String> = find_section(root, DISABLED_PACKAGE_SOURCES)
        .map(|section| {
            section
                .child_elements()
                .filter(|e| e.name == ADD)
                .filter_map(|add| extract_attr(add, KEY).filter(|k| !k.is_empty()))
                .collect()
        })
        .unwrap_or_default();

    for source in &mut sources {
        if disabled.contains(&source.key) {
            source.enabled = false;
        }
    }
    sources
}

fn read_mappings(root: &XmlElement) -> Vec<PackageSourceMapping> {
    let Some(section) = find_section(root, PACKAGE_SOURCE_MAPPING) else {
        return Vec::new();
    };
    let Some(variant) = MappingVariant::detect(section) else {
        return Vec::new();
    };

    section
        .child_elements()
        .filter(|e| e.name == variant.block_tag())
        .filter_map(|block| {
            let source_key = variant.block_key(block).filter(|k| !k.is_empty())?;
            Some(PackageSourceMapping::new(source_key, read_patterns(block, variant)))
        })
        .collect()
}

fn read_patterns(block: &XmlElement, variant: MappingVariant) -> Vec<String> {
    block
        .child_elements()
        .filter(|e| e.name == variant.pattern_tag())
        .filter_map(|e| extract_attr(e, PATTERN).filter(|p| !p.is_empty()))
        .collect()
}

/// Count the sources of a document without keeping the model, for listings.
pub fn count_sources(xml: &str) -> Result<usize, XmlError> {
    parse_config(xml, false).map(|m| m.sources.len())
}
