//! Merging a model into an existing document, one managed section at a time.

use super::layout;
use super::reconcile::{Entries, reconcile};
use crate::model::{ConfigModel, PackageSource, PackageSourceMapping};
use crate::schema::{
    ADD, CONFIGURATION, DISABLED_PACKAGE_SOURCES, KEY, MANAGED_SECTIONS, MappingVariant,
    PACKAGE_SOURCE_MAPPING, PACKAGE_SOURCES, PATTERN, VALUE, extract_attr, is_managed_section,
};
use crate::xml::{XmlDocument, XmlElement, XmlNode, escape_attribute};

/// Why a document cannot take a structural merge.
#[derive(Debug, thiserror::Error)]
pub(crate) enum MergeError {
    #[error("document has no root element")]
    NoRoot,

    #[error("root element <{0}> is a section fragment")]
    FragmentRoot(String),
}

/// Merge `model` into `document` in place.
pub(crate) fn merge_document(
    document: &mut XmlDocument,
    model: &ConfigModel,
) -> Result<(), MergeError> {
    let root_index = document
        .nodes
        .iter()
        .position(|n| n.as_element().is_some())
        .ok_or(MergeError::NoRoot)?;
    let root_indent = layout::indent_at(&document.nodes, root_index).unwrap_or_default();

    let root = document.root_mut().ok_or(MergeError::NoRoot)?;
    if is_managed_section(&root.name) {
        return Err(MergeError::FragmentRoot(root.name.clone()));
    }

    merge_root(root, &root_indent, model);
    Ok(())
}

/// A `<configuration>` document containing only an XML declaration.
pub(crate) fn skeleton() -> XmlDocument {
    let mut root = XmlElement::new(CONFIGURATION);
    root.children_mut().push(XmlNode::Text("\n".to_string()));
    XmlDocument {
        bom: false,
        nodes: vec![
            XmlNode::Declaration(r#"<?xml version="1.0" encoding="utf-8"?>"#.to_string()),
            XmlNode::Text("\n".to_string()),
            XmlNode::Element(root),
            XmlNode::Text("\n".to_string()),
        ],
    }
}

fn merge_root(root: &mut XmlElement, root_indent: &str, model: &ConfigModel) {
    let unit = layout::detect_indent_unit(root, root_indent);
    let context = Context {
        root_indent: root_indent.to_string(),
        section_indent: section_indent(root, root_indent, &unit),
        unit,
    };

    // packageSources keeps unrelated children such as <clear/>, so it only
    // goes away once nothing at all is left in it.
    context.merge_section(root, PACKAGE_SOURCES, |section, indent| {
        reconcile(section, &SourceEntries, &model.sources, indent, &context.unit);
        !section.children().iter().all(XmlNode::is_whitespace)
    });

    let disabled: Vec<PackageSource> = model.disabled_sources().cloned().collect();
    context.merge_section(root, DISABLED_PACKAGE_SOURCES, |section, indent| {
        reconcile(section, &DisabledEntries, &disabled, indent, &context.unit);
        !disabled.is_empty()
    });

    context.merge_section(root, PACKAGE_SOURCE_MAPPING, |section, indent| {
        let blocks = BlockEntries {
            variant: MappingVariant::detect(section)
                .unwrap_or(MappingVariant::PackageSourcePackage),
            unit: &context.unit,
        };
        reconcile(section, &blocks, &model.mappings, indent, &context.unit);
        !model.mappings.is_empty()
    });
}

struct Context {
    root_indent: String,
    /// Indentation of the managed sections inside the root.
    section_indent: String,
    unit: String,
}

impl Context {
    /// Reconcile one section, creating it in canonical position when it is
    /// missing and removing it when `fill` reports nothing worth keeping.
    fn merge_section(
        &self,
        root: &mut XmlElement,
        name: &str,
        fill: impl FnOnce(&mut XmlElement, &str) -> bool,
    ) {
        if let Some(index) = root.position_of_child(name) {
            let indent = layout::indent_at(root.children(), index)
                .unwrap_or_else(|| self.section_indent.clone());
            let keep = match root.children_mut()[index].as_element_mut() {
                Some(section) => fill(section, &indent),
                None => true,
            };
            if !keep {
                layout::remove_child(root, index);
            }
            return;
        }

        let mut section = XmlElement::new(name);
        if fill(&mut section, &self.section_indent) {
            self.insert_section(root, section);
        }
    }

    /// Place a new section next to its closest existing sibling in the
    /// canonical order.
    fn insert_section(&self, root: &mut XmlElement, section: XmlElement) {
        let order = MANAGED_SECTIONS
            .iter()
            .position(|s| *s == section.name)
            .unwrap_or(MANAGED_SECTIONS.len());
        let before = MANAGED_SECTIONS[..order]
            .iter()
            .rev()
            .find_map(|s| root.position_of_child(s));
        let after = MANAGED_SECTIONS
            .get(order + 1..)
            .unwrap_or_default()
            .iter()
            .find_map(|s| root.position_of_child(s));
        let node = XmlNode::Element(section);

        match (before, after) {
            (Some(index), _) => layout::insert_after(root, index, node, &self.section_indent),
            (None, Some(index)) => {
                layout::insert_before(root, index, node, &self.section_indent)
            }
            (None, None) => {
                layout::append_child(root, node, &self.section_indent, &self.root_indent)
            }
        }
    }
}

fn section_indent(root: &XmlElement, root_indent: &str, unit: &str) -> String {
    let children = root.children();
    let managed = MANAGED_SECTIONS
        .iter()
        .filter_map(|s| root.position_of_child(s))
        .find_map(|i| layout::indent_at(children, i));
    managed
        .or_else(|| layout::first_child_indent(root))
        .unwrap_or_else(|| format!("{}{}", root_indent, unit))
}

/// Set a named property, writing to the nested `<name>` child when the
/// element already uses that form.
fn set_property(element: &mut XmlElement, name: &str, value: &str) {
    if extract_attr(element, name).as_deref() == Some(value) {
        return;
    }
    if element.attribute(name).is_none()
        && let Some(child) = element
            .children_mut()
            .iter_mut()
            .filter_map(XmlNode::as_element_mut)
            .find(|c| c.name == name)
    {
        *child.children_mut() = vec![XmlNode::Text(escape_attribute(value))];
        return;
    }
    element.set_attribute(name, value);
}

struct SourceEntries;

impl Entries for SourceEntries {
    type Item = PackageSource;

    fn key_of(&self, element: &XmlElement) -> Option<String> {
        (element.name == ADD).then(|| extract_attr(element, KEY)).flatten()
    }

    fn item_key<'a>(&self, item: &'a Self::Item) -> &'a str {
        &item.key
    }

    fn create(&self, item: &Self::Item, _indent: &str) -> XmlElement {
        XmlElement::with_attributes(ADD, &[(KEY, item.key.as_str()), (VALUE, item.url.as_str())])
    }

    fn update(&self, item: &Self::Item, element: &mut XmlElement, _indent: &str) {
        set_property(element, KEY, &item.key);
        set_property(element, VALUE, &item.url);
    }
}

/// Entries of `<disabledPackageSources>`: the key alone disables a source.
struct DisabledEntries;

impl Entries for DisabledEntries {
    type Item = PackageSource;

    fn key_of(&self, element: &XmlElement) -> Option<String> {
        (element.name == ADD).then(|| extract_attr(element, KEY)).flatten()
    }

    fn item_key<'a>(&self, item: &'a Self::Item) -> &'a str {
        &item.key
    }

    fn create(&self, item: &Self::Item, _indent: &str) -> XmlElement {
        XmlElement::with_attributes(ADD, &[(KEY, item.key.as_str()), (VALUE, "true")])
    }

    fn update(&self, item: &Self::Item, element: &mut XmlElement, _indent: &str) {
        set_property(element, KEY, &item.key);
        let truthy = extract_attr(element, VALUE).is_some_and(|v| v.eq_ignore_ascii_case("true"));
        if !truthy {
            set_property(element, VALUE, "true");
        }
    }
}

/// Per-source blocks of `<packageSourceMapping>` in the section's own variant.
/// Comments directly above a block belong to it.
struct BlockEntries<'u> {
    variant: MappingVariant,
    unit: &'u str,
}

impl Entries for BlockEntries<'_> {
    type Item = PackageSourceMapping;

    fn key_of(&self, element: &XmlElement) -> Option<String> {
        (element.name == self.variant.block_tag())
            .then(|| self.variant.block_key(element))
            .flatten()
    }

    fn item_key<'a>(&self, item: &'a Self::Item) -> &'a str {
        &item.source_key
    }

    fn create(&self, item: &Self::Item, indent: &str) -> XmlElement {
        let mut block =
            XmlElement::with_attributes(self.variant.block_tag(), &[(KEY, item.source_key.as_str())]);
        self.update_patterns(item, &mut block, indent);
        block
    }

    fn update(&self, item: &Self::Item, element: &mut XmlElement, indent: &str) {
        if self.variant.block_key(element).as_deref() != Some(item.source_key.as_str()) {
            set_property(element, KEY, &item.source_key);
        }
        self.update_patterns(item, element, indent);
    }

    fn attach_comments(&self) -> bool {
        true
    }
}

impl BlockEntries<'_> {
    fn update_patterns(&self, item: &PackageSourceMapping, block: &mut XmlElement, indent: &str) {
        let patterns = PatternEntries {
            tag: self.variant.pattern_tag(),
        };
        reconcile(block, &patterns, &item.patterns, indent, self.unit);
    }
}

/// Pattern elements inside a mapping block, keyed by the pattern itself.
struct PatternEntries {
    tag: &'static str,
}

impl Entries for PatternEntries {
    type Item = String;

    fn key_of(&self, element: &XmlElement) -> Option<String> {
        (element.name == self.tag)
            .then(|| extract_attr(element, PATTERN))
            .flatten()
    }

    fn item_key<'a>(&self, item: &'a Self::Item) -> &'a str {
        item
    }

    fn create(&self, item: &Self::Item, _indent: &str) -> XmlElement {
        XmlElement::with_attributes(self.tag, &[(PATTERN, item.as_str())])
    }

    fn update(&self, item: &Self::Item, element: &mut XmlElement, _indent: &str) {
        set_property(element, PATTERN, item);
    }
}
