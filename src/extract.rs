//! Locate icon definitions inside bundle text
//!
//! A bundle is a generated JavaScript module with one export per icon:
//!
//! ```text
//! module.exports.FaHome = function FaHome (props) {
//!   return GenIcon({"tag":"svg","attr":{...},"child":[...]})(props);
//! };
//! ```
//!
//! The extractor finds each definition marker, reads the exported name, then
//! isolates the object literal passed to the constructor call with a
//! balanced-brace scan. The literal may nest attribute groups to any depth, so
//! a pattern match cannot find its end reliably.

use crate::errors::ExtractError;

/// How a bundle spells its exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `module.exports.Name = function Name (props) { ... }`
    #[default]
    CommonJs,
    /// `export function Name (props) { ... }`
    EsModule,
}

impl Dialect {
    /// Text that starts every definition
    pub fn marker(self) -> &'static str {
        match self {
            Dialect::CommonJs => "module.exports.",
            Dialect::EsModule => "export function ",
        }
    }

    /// Character that must follow the exported name
    fn name_terminator(self) -> char {
        match self {
            Dialect::CommonJs => '=',
            Dialect::EsModule => '(',
        }
    }
}

/// Extraction settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub dialect: Dialect,
    /// Name of the call that receives the icon literal
    pub constructor: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::CommonJs,
            constructor: "GenIcon".to_string(),
        }
    }
}

/// One definition cut out of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDefinition<'a> {
    pub name: &'a str,
    /// The literal, from its opening `{` to the matching `}`
    pub literal: &'a str,
    /// Byte offset of `literal` within the bundle
    pub offset: usize,
}

/// Single forward scan over a bundle.
///
/// Yields one item per definition marker that is followed by a name. Problems
/// with one definition are yielded as errors and never stop the scan.
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    source: &'a str,
    dialect: Dialect,
    constructor: String,
    cursor: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, &ExtractOptions::default())
    }

    pub fn with_options(source: &'a str, options: &ExtractOptions) -> Self {
        Self {
            source,
            dialect: options.dialect,
            constructor: options.constructor.clone(),
            cursor: 0,
        }
    }
}

impl<'a> Iterator for Extractor<'a> {
    type Item = Result<RawDefinition<'a>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let marker = self.dialect.marker();
        loop {
            let marker_at = self.cursor + self.source.get(self.cursor..)?.find(marker)?;
            let body_start = marker_at + marker.len();
            // A definition never extends into the next one.
            let body_end = self.source[body_start..]
                .find(marker)
                .map_or(self.source.len(), |i| body_start + i);
            self.cursor = body_end;

            let body = &self.source[body_start..body_end];
            let Some(name) = read_name(body, self.dialect.name_terminator()) else {
                crate::log::debug!(offset = marker_at, "marker without an exported name");
                continue;
            };

            let Some(open) = find_literal_start(body, &self.constructor) else {
                return Some(Err(ExtractError::MarkerNotFound {
                    name: name.to_string(),
                    constructor: self.constructor.clone(),
                    offset: marker_at,
                }));
            };
            let open = body_start + open;

            return Some(match balanced_len(&self.source[open..body_end]) {
                Some(len) => Ok(RawDefinition {
                    name,
                    literal: &self.source[open..open + len],
                    offset: open,
                }),
                None => Err(ExtractError::UnbalancedLiteral {
                    name: name.to_string(),
                    offset: open,
                }),
            });
        }
    }
}

/// Shorthand for `Extractor::new(source)`
pub fn extract(source: &str) -> Extractor<'_> {
    Extractor::new(source)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Read `Name` from `Name <terminator>` at the start of a definition body
fn read_name(body: &str, terminator: char) -> Option<&str> {
    let len = body.find(|c: char| !is_ident_char(c)).unwrap_or(body.len());
    if len == 0 {
        return None;
    }
    let rest = body[len..].trim_start();
    rest.starts_with(terminator).then(|| &body[..len])
}

/// Offset of the `{` in the first `<constructor>( {` call within `body`
fn find_literal_start(body: &str, constructor: &str) -> Option<usize> {
    body.match_indices(constructor).find_map(|(at, _)| {
        let standalone = !body[..at].chars().next_back().is_some_and(is_ident_char);
        if !standalone {
            return None;
        }
        let after_name = at + constructor.len();
        let rest = body[after_name..].trim_start();
        let rest = rest.strip_prefix('(')?;
        let trimmed = rest.trim_start();
        if !trimmed.starts_with('{') {
            return None;
        }
        Some(body.len() - trimmed.len())
    })
}

/// Length of the brace-balanced prefix of `text`, which starts with `{`.
///
/// Every brace counts, including ones inside strings. Returns `None` if depth
/// never returns to zero.
pub fn balanced_len(text: &str) -> Option<usize> {
    let mut depth: i64 = 0;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => continue,
        }
        if depth == 0 {
            return Some(i + 1);
        }
    }
    None
}
