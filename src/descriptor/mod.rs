//! Project descriptor (`project.godot`) document model
//!
//! - [`parser`]: text → [`DescriptorDocument`], lossless
//! - [`document`]: sections, lines and key/value entries in file order
//! - [`value`]: [`TypedValue`] and its layout-preserving containers
//! - [`error`]: [`ParseError`] with line/column

pub mod document;
pub mod error;
pub mod parser;
pub mod value;

pub use document::{DescriptorDocument, Entry, KeyChange, Line, Section};
pub use error::{ParseError, ParseErrorReason};
pub use value::{Array, Lexeme, Mapping, TypedLiteral, TypedValue};

/// Parse descriptor text
pub fn parse(text: &str) -> Result<DescriptorDocument, ParseError> {
    parser::parse(text)
}

/// Serialize a document; `serialize(&parse(t)?) == t` for every valid `t`
pub fn serialize(document: &DescriptorDocument) -> String {
    document.to_text()
}
