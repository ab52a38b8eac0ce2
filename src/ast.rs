//! Tree types for parsed icons
//!
//! These types represent one icon's element tree after the literal has been read.

use indexmap::IndexMap;

/// Attribute map that keeps source order, so rendering is stable
pub type Attributes = IndexMap<String, String>;

/// One SVG element inside an icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconNode {
    /// Element name: `path`, `circle`, `g`, ...
    pub tag: String,
    pub attributes: Attributes,
    pub children: Vec<IconNode>,
}

impl IconNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute insertion, mostly for tests
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: IconNode) -> Self {
        self.children.push(child);
        self
    }

    /// Renders as `<tag .../>` when true
    pub fn is_self_closing(&self) -> bool {
        self.children.is_empty()
    }
}

/// Root of one parsed icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDefinition {
    /// Exported identifier, e.g. `FaHome`
    pub name: String,
    /// Attributes of the root `svg` (`viewBox`, `fill`, `fillRule`, ...)
    pub root_attributes: Attributes,
    pub children: Vec<IconNode>,
}

impl IconDefinition {
    /// Root attribute lookup that treats an empty value as absent
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root_attributes
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Icons read from a single bundle during one pass
#[derive(Debug, Clone, Default)]
pub struct IconGroup {
    /// Family identifier, e.g. `fa`
    pub name: String,
    pub icons: Vec<IconDefinition>,
}

impl IconGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icons: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&IconDefinition> {
        self.icons.iter().find(|icon| icon.name == name)
    }
}
