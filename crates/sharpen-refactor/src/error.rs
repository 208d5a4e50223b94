use sharpen_syntax::{FileId, NodeId, SyntaxKind};
use thiserror::Error;

use crate::edit::EditError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefactorError {
    #[error("refactoring was cancelled")]
    Cancelled,
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("declaration of `{0}` is not available in source")]
    MissingDeclaration(String),
}

/// Tree-shape violations detected while rewriting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RewriteError {
    #[error("a {kind:?} node cannot be removed or split in a single-child position")]
    InvalidRemoval { kind: SyntaxKind },
    #[error("node {0:?} not found")]
    MissingNode(NodeId),
    #[error("document {0} not found")]
    MissingDocument(FileId),
    #[error("type `{0}` cannot be written in source")]
    UnspellableType(String),
}
