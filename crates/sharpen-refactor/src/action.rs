//! Host-facing entry points: which refactorings apply at a selection, and
//! the [`Action`] that performs one of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sharpen_config::SharpenConfig;
use sharpen_semantic::SemanticOracle;
use sharpen_syntax::{FileId, TextRange};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::error::RefactorError;
use crate::refactorings::*;
use crate::synth::Changes;

macro_rules! refactorings {
    ($($kind:ident => $module:ident, $id:literal;)*) => {
        /// Every refactoring the engine offers.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum RefactoringKind {
            $($kind,)*
        }

        impl RefactoringKind {
            pub const ALL: &'static [RefactoringKind] = &[$(RefactoringKind::$kind,)*];

            /// Stable kebab-case identifier, as used in configuration.
            pub fn id(self) -> &'static str {
                match self {
                    $(RefactoringKind::$kind => $id,)*
                }
            }
        }

        #[derive(Clone, Debug)]
        enum Target {
            $($kind($module::Target),)*
        }

        fn check(kind: RefactoringKind, ctx: &Context<'_>, span: TextRange) -> Option<Target> {
            match kind {
                $(RefactoringKind::$kind => $module::check(ctx, span).map(Target::$kind),)*
            }
        }

        fn describe(ctx: &Context<'_>, target: &Target) -> String {
            match target {
                $(Target::$kind(target) => $module::describe(ctx, target),)*
            }
        }

        fn apply(
            ctx: &Context<'_>,
            target: &Target,
            cancel: &CancellationToken,
        ) -> Result<Changes, RefactorError> {
            match target {
                $(Target::$kind(target) => $module::apply(ctx, target, cancel),)*
            }
        }
    };
}

refactorings! {
    ExtractMethod => extract_method, "extract-method";
    InlineMethod => inline_method, "inline-method";
    InlineLocal => inline_local, "inline-local";
    IntroduceLocal => introduce_local, "introduce-local";
    IntroduceExplainingVariable => introduce_explaining_variable, "introduce-explaining-variable";
    EncapsulateField => encapsulate_field, "encapsulate-field";
    IntroduceParameterObject => introduce_parameter_object, "introduce-parameter-object";
    MakeMethodStatic => make_method_static, "make-method-static";
    MakeSingleton => make_singleton, "make-singleton";
    PullUpField => pull_up_field, "pull-up-field";
    RemoveParameter => remove_parameter, "remove-parameter";
    RenameParameter => rename_parameter, "rename-parameter";
    RenameLocal => rename_local, "rename-local";
    ReverseConditional => reverse_conditional, "reverse-conditional";
    MakeConst => make_const, "make-const";
    RemoveAssignmentToParameter => remove_assignment_to_parameter, "remove-assignment-to-parameter";
    ReplaceConstructorWithFactory => replace_constructor_with_factory, "replace-constructor-with-factory";
    ReplaceMagicNumber => replace_magic_number, "replace-magic-number";
    GenerateClassFromUsage => generate_class_from_usage, "generate-class-from-usage";
}

impl fmt::Display for RefactoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown refactoring `{0}`")]
pub struct UnknownRefactoring(pub String);

impl FromStr for RefactoringKind {
    type Err = UnknownRefactoring;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RefactoringKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownRefactoring(s.to_string()))
    }
}

/// A refactoring found applicable at a selection.
///
/// Holds everything the checker resolved, so `apply` does not re-run the
/// applicability analysis.
pub struct Action<'a> {
    ctx: Context<'a>,
    kind: RefactoringKind,
    target: Target,
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("kind", &self.kind)
            .field("file", self.ctx.file)
            .field("target", &self.target)
            .finish()
    }
}

impl<'a> Action<'a> {
    pub fn kind(&self) -> RefactoringKind {
        self.kind
    }

    pub fn file(&self) -> &'a FileId {
        self.ctx.file
    }

    /// Short human-readable label, e.g. ``Inline method `Foo'``.
    pub fn describe(&self) -> String {
        describe(&self.ctx, &self.target)
    }

    /// Computes the rewritten documents. Input documents are never modified;
    /// a cancelled token yields [`RefactorError::Cancelled`].
    pub fn apply(&self, cancel: &CancellationToken) -> Result<Changes, RefactorError> {
        let _span = tracing::debug_span!("refactoring", kind = %self.kind, file = %self.ctx.file)
            .entered();
        if cancel.is_cancelled() {
            return Err(RefactorError::Cancelled);
        }
        let changes = apply(&self.ctx, &self.target, cancel)?;
        tracing::debug!(documents = changes.documents().count(), "refactoring applied");
        Ok(changes)
    }
}

/// The action for `kind` at `span` in `file`, or `None` when it does not
/// apply there (including disabled kinds, unknown or unparsable files and
/// spans outside the document).
pub fn applicable_action<'a>(
    oracle: &'a dyn SemanticOracle,
    config: &'a SharpenConfig,
    kind: RefactoringKind,
    file: &'a FileId,
    span: TextRange,
) -> Option<Action<'a>> {
    if !config.refactorings.is_enabled(kind.id()) {
        return None;
    }
    let ctx = Context::new(oracle, &config.names, file)?;
    if span.end > ctx.doc.text().len() {
        tracing::debug!(%kind, ?span, "selection is outside the document");
        return None;
    }
    let target = check(kind, &ctx, span)?;
    Some(Action { ctx, kind, target })
}

/// Every enabled refactoring that applies at `span`, in [`RefactoringKind::ALL`]
/// order.
pub fn applicable_actions<'a>(
    oracle: &'a dyn SemanticOracle,
    config: &'a SharpenConfig,
    file: &'a FileId,
    span: TextRange,
) -> Vec<Action<'a>> {
    RefactoringKind::ALL
        .iter()
        .filter_map(|&kind| applicable_action(oracle, config, kind, file, span))
        .collect()
}
