//! Syntax layer: typed tree, parser, generic node view and printer.
//!
//! - [`parse`] turns source text into a [`CompilationUnit`] plus a [`SourceMap`]
//!   with the range of every node.
//! - [`NodeRef`] is a uniform read-only view used for id lookups, ancestor
//!   paths and selection.
//! - [`printer`] renders trees in canonical layout.

pub mod ast;
mod document;
mod lexer;
mod node;
mod parser;
pub mod printer;
mod source_map;
mod text;

pub use ast::*;
pub use document::Document;
pub use node::{NodeRef, Preorder, SyntaxKind};
pub use parser::{parse, Parse, ParseError};
pub use source_map::SourceMap;
pub use text::{FileId, TextRange};

/// Parses and re-prints `text` in canonical layout.
///
/// Useful for comparing programs modulo whitespace.
pub fn normalize(text: &str) -> String {
    printer::print_unit(&parse(text).unit)
}
