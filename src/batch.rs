//! Convert a whole bundle, one icon at a time
//!
//! Each icon goes through extract, parse and render on its own. A failure is
//! recorded against that icon and the pass moves on to the next definition.

use std::collections::HashSet;

use crate::ast::IconGroup;
use crate::errors::{ErrorKind, IconError};
use crate::extract::{ExtractOptions, Extractor};
use crate::parse::parse;
use crate::svg::{SvgOptions, render_with_options};

/// Why one icon was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFailure {
    pub name: String,
    pub kind: ErrorKind,
    pub detail: String,
    /// Byte offset into the bundle
    pub offset: usize,
    pub error: IconError,
}

impl IconFailure {
    /// A report over `source`, the bundle this failure came from, with the
    /// offending byte labelled.
    pub fn report(&self, source: &str) -> miette::Report {
        self.error.clone().with_source(source)
    }
}

impl From<IconError> for IconFailure {
    fn from(err: IconError) -> Self {
        Self {
            name: err.name().to_string(),
            kind: err.kind(),
            offset: err.offset(),
            detail: err.to_string(),
            error: err,
        }
    }
}

/// Result of converting one group
#[derive(Debug, Clone, Default)]
pub struct GroupReport {
    pub group: String,
    /// `(name, svg)` in bundle order
    pub icons: Vec<(String, String)>,
    pub failures: Vec<IconFailure>,
}

impl GroupReport {
    pub fn success_count(&self) -> usize {
        self.icons.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when the bundle had no definitions at all
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty() && self.failures.is_empty()
    }

    pub fn svg(&self, name: &str) -> Option<&str> {
        self.icons
            .iter()
            .find(|(icon, _)| icon == name)
            .map(|(_, svg)| svg.as_str())
    }
}

/// Read every definition in `source` into a group.
///
/// Definitions that fail to extract or parse are returned as failures, with
/// offsets into `source`; later definitions with an already seen name are
/// dropped.
pub fn read_group(
    group: &str,
    source: &str,
    options: &ExtractOptions,
) -> (IconGroup, Vec<IconFailure>) {
    let mut icons = IconGroup::new(group);
    let mut failures = Vec::new();
    let mut seen = HashSet::new();

    for item in Extractor::with_options(source, options) {
        let parsed = item
            .map_err(IconError::from)
            .and_then(|raw| {
                parse(raw.name, raw.literal).map_err(|err| err.rebased(raw.offset).into())
            });
        match parsed {
            Ok(icon) => {
                if seen.insert(icon.name.clone()) {
                    icons.icons.push(icon);
                } else {
                    crate::log::warn!(group, icon = %icon.name, "duplicate icon name, keeping the first");
                }
            }
            Err(err) => {
                crate::log::warn!(
                    group,
                    icon = err.name(),
                    kind = %err.kind(),
                    offset = err.offset(),
                    "skipping icon"
                );
                failures.push(IconFailure::from(err));
            }
        }
    }

    crate::log::debug!(
        group,
        icons = icons.len(),
        failures = failures.len(),
        "read group"
    );
    (icons, failures)
}

/// Extract, parse and render every icon in one bundle
pub fn convert_group(
    group: &str,
    source: &str,
    extract: &ExtractOptions,
    svg: &SvgOptions,
) -> GroupReport {
    let (icons, failures) = read_group(group, source, extract);
    let icons = icons
        .icons
        .iter()
        .map(|icon| (icon.name.clone(), render_with_options(icon, svg)))
        .collect();
    GroupReport {
        group: group.to_string(),
        icons,
        failures,
    }
}
