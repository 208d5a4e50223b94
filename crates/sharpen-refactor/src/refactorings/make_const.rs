//! Make Const: marks a local declaration `const` when every variable it
//! declares holds a compile-time constant that is never reassigned.

use sharpen_semantic::{FlowRegion, Type};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{const_compatible, is_constant, ReplaceStmt};
use crate::rewrite::rewrite_unit;
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "make-const";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) statement: NodeId,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let node = narrowest_containing(ctx.doc, span, |node| {
        matches!(
            node.as_stmt(),
            Some(Stmt {
                kind: StmtKind::Local(_),
                ..
            })
        )
    })?;
    let stmt = node.as_stmt()?;
    let StmtKind::Local(local) = &stmt.kind else {
        return None;
    };
    if local.is_const {
        return None;
    }
    if local.ty.is_var() {
        return reject(NAME, "implicitly typed locals cannot be const");
    }
    let facts = ctx
        .oracle
        .analyze_data_flow(ctx.file, FlowRegion::statement(stmt.id))?;
    for declarator in &local.declarators {
        let Some(init) = &declarator.init else {
            return reject(NAME, "a variable has no initializer");
        };
        if !is_constant(ctx.oracle, ctx.file, init) {
            return reject(NAME, "an initializer is not a compile-time constant");
        }
        let symbol = ctx.symbol_at(declarator.id)?;
        let declared = &ctx.symbol(symbol)?.ty;
        let value = ctx.type_of(init.id)?.static_type;
        if matches!(declared, Type::Unknown) || !const_compatible(&value, declared) {
            return reject(NAME, "initializer type cannot be stored in a constant");
        }
        if facts.written_outside.contains(&symbol) {
            return reject(NAME, "a variable is assigned after its declaration");
        }
    }
    Some(Target { statement: stmt.id })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Mark variables with `const'".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let missing = RewriteError::MissingNode(target.statement);
    let Some(stmt) = ctx.node(target.statement).and_then(|node| node.as_stmt()) else {
        return Err(missing.into());
    };
    let StmtKind::Local(local) = &stmt.kind else {
        return Err(missing.into());
    };
    let replacement = Stmt {
        kind: StmtKind::Local(LocalDecl {
            is_const: true,
            ..local.clone()
        }),
        ..stmt.clone()
    };
    let mut rewriter = ReplaceStmt {
        id: target.statement,
        replacement: Some(replacement),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}
