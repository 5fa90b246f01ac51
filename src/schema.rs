//! Element and attribute names of the nuget.config format, and the lookups
//! shared by the parser and the serializer.

use crate::xml::XmlElement;

pub const CONFIGURATION: &str = "configuration";
pub const PACKAGE_SOURCES: &str = "packageSources";
pub const DISABLED_PACKAGE_SOURCES: &str = "disabledPackageSources";
pub const PACKAGE_SOURCE_MAPPING: &str = "packageSourceMapping";

pub const ADD: &str = "add";
pub const PACKAGE: &str = "package";
pub const PACKAGE_SOURCE: &str = "packageSource";

pub const KEY: &str = "key";
pub const VALUE: &str = "value";
pub const NAME: &str = "name";
pub const PATTERN: &str = "pattern";

/// The three sections this crate owns, in canonical document order.
pub const MANAGED_SECTIONS: [&str; 3] = [
    PACKAGE_SOURCES,
    DISABLED_PACKAGE_SOURCES,
    PACKAGE_SOURCE_MAPPING,
];

/// The two shapes of `packageSourceMapping` found in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingVariant {
    /// `<package key="src"><add pattern="..."/></package>`
    PackageAdd,
    /// `<packageSource key="src"><package pattern="..."/></packageSource>`
    PackageSourcePackage,
}

impl MappingVariant {
    /// Tag of the per-source block element.
    pub fn block_tag(self) -> &'static str {
        match self {
            MappingVariant::PackageAdd => PACKAGE,
            MappingVariant::PackageSourcePackage => PACKAGE_SOURCE,
        }
    }

    /// Tag of the per-pattern element inside a block.
    pub fn pattern_tag(self) -> &'static str {
        match self {
            MappingVariant::PackageAdd => ADD,
            MappingVariant::PackageSourcePackage => PACKAGE,
        }
    }

    /// Detect the variant of a mapping section from its first block element.
    pub fn detect(section: &XmlElement) -> Option<Self> {
        section.child_elements().find_map(|e| match e.name.as_str() {
            PACKAGE => Some(MappingVariant::PackageAdd),
            PACKAGE_SOURCE => Some(MappingVariant::PackageSourcePackage),
            _ => None,
        })
    }

    /// Key of a block element. Blocks of the `packageSource` shape may use `name`.
    pub fn block_key(self, block: &XmlElement) -> Option<String> {
        let key = extract_attr(block, KEY);
        match self {
            MappingVariant::PackageSourcePackage => key.or_else(|| extract_attr(block, NAME)),
            MappingVariant::PackageAdd => key,
        }
    }
}

/// Read a named property of an element.
///
/// Accepts both the attribute form `<add key="x"/>` and the nested form
/// `<add><key>x</key></add>`, attribute first.
pub fn extract_attr(element: &XmlElement, name: &str) -> Option<String> {
    if let Some(value) = element.attribute(name) {
        return Some(value.to_string());
    }
    element
        .find_child(name)
        .map(|child| child.text_content().trim().to_string())
}

/// Whether an element name is one of the managed section names.
pub fn is_managed_section(name: &str) -> bool {
    MANAGED_SECTIONS.contains(&name)
}

/// Locate a section relative to the document root.
///
/// The root normally is `<configuration>`, but any root is accepted as the
/// container, and a root that is itself the requested section is returned
/// directly.
pub fn find_section<'a>(root: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    if root.name == name {
        return Some(root);
    }
    root.find_child(name)
}
