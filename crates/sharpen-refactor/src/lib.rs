//! Behavior-preserving refactorings over a semantic oracle.
//!
//! A host asks [`applicable_actions`] (or [`applicable_action`] for a single
//! [`RefactoringKind`]) which refactorings apply to a selection, shows
//! [`Action::describe`] to the user and calls [`Action::apply`] to obtain the
//! rewritten documents as [`Changes`].
//!
//! Each refactoring is a checker that resolves the selection into a target and
//! a rewrite driven by the generic engine in [`rewrite`]. Trees are never
//! mutated in place; the rewritten tree is turned back into text by keeping
//! untouched regions verbatim and printing the rest.

mod action;
mod context;
mod edit;
mod error;
mod helpers;
mod make;
mod refactorings;
pub mod rewrite;
mod selection;
mod synth;

pub use action::{
    applicable_action, applicable_actions, Action, RefactoringKind, UnknownRefactoring,
};
pub use edit::{apply_text_edits, EditError, TextEdit, WorkspaceEdit};
pub use error::{RefactorError, RewriteError};
pub use synth::{Changes, UpdatedDocument};
pub use tokio_util::sync::CancellationToken;
