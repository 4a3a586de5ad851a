//! The KV3 text encoding.
//!
//! - [`Lexer`] splits input into [`Token`]s
//! - [`Parser`] builds a [`Document`] from them
//! - [`Writer`] renders a document back in canonical form
//!
//! Most callers go through [`crate::from_str`] and [`crate::to_string`]
//! instead of using these directly.

mod lexer;
mod parser;
mod writer;

pub use lexer::{Lexer, Position, Token, TokenKind};
pub use parser::{Parser, Warning};
pub use writer::Writer;

use crate::{Document, Result, TextOptions, Value};

/// Parses a complete text document.
///
/// # Errors
///
/// See [`Parser::parse_document`].
pub fn parse(input: &str) -> Result<Document> {
    Parser::new(input).parse_document()
}

/// Renders a bare value without a header, using default layout.
pub(crate) fn value_to_string(value: &Value) -> Result<String> {
    Writer::new(&TextOptions::default()).write_document(value.into(), None)
}
