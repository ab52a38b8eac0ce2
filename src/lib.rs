//! Turn react-icons style bundles into standalone SVG files.
//!
//! A bundle holds one generated definition per icon. Each one is taken
//! through three steps:
//!
//! 1. [`extract`] finds the definition and cuts out its object literal,
//! 2. [`parse`] reads the literal into an [`IconDefinition`] tree,
//! 3. [`svg`] renders the tree as SVG text.
//!
//! The literal is only ever read as data. [`batch`] runs all three steps over
//! a whole bundle and keeps failures local to the icon they belong to.

use pest_derive::Parser;

pub mod ast;
pub mod batch;
pub mod errors;
pub mod extract;
pub mod log;
pub mod parse;
pub mod svg;

pub use ast::{Attributes, IconDefinition, IconGroup, IconNode};
pub use batch::{GroupReport, IconFailure, convert_group, read_group};
pub use errors::{ErrorKind, ExtractError, IconError, ParseError};
pub use extract::{Dialect, ExtractOptions, Extractor, RawDefinition};
pub use svg::SvgOptions;

#[derive(Parser)]
#[grammar = "literal.pest"]
pub struct LiteralParser;

/// Convert one isolated literal straight to SVG text.
pub fn convert(name: &str, literal: &str) -> Result<String, ParseError> {
    let icon = parse::parse(name, literal)?;
    Ok(svg::render(&icon))
}
