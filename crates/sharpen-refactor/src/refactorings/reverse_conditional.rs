//! Reverse Conditional: swaps the branches of an `if`/`else`, inverting the
//! condition, or swaps the two arms of an `if`/`else if`.

use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{invert_condition, ReplaceStmt};
use crate::make::Make;
use crate::rewrite::rewrite_unit;
use crate::synth::Changes;

const NAME: &str = "reverse-conditional";

/// Width of the `if` keyword.
const IF_KEYWORD: usize = 2;

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) statement: NodeId,
}

/// Whether `span` lies on the `if` keyword of `stmt` or inside its condition.
fn selects(ctx: &Context<'_>, stmt: &Stmt, cond: &Expr, span: TextRange) -> bool {
    let on_keyword = ctx.range(stmt.id).is_some_and(|range| {
        range.start <= span.start && span.end <= range.start + IF_KEYWORD
    });
    let in_condition = ctx
        .range(cond.id)
        .is_some_and(|range| range.start <= span.start && span.end <= range.end);
    on_keyword || in_condition
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    // Innermost wins: a nested `if` comes later in preorder.
    let (stmt, if_stmt) = ctx
        .doc
        .root()
        .preorder()
        .filter_map(|node| match node.as_stmt()? {
            stmt @ Stmt {
                kind: StmtKind::If(if_stmt),
                ..
            } => Some((stmt, if_stmt)),
            _ => None,
        })
        .filter(|(stmt, if_stmt)| selects(ctx, stmt, &if_stmt.cond, span))
        .last()?;
    let Some(else_branch) = &if_stmt.else_branch else {
        return reject(NAME, "`if` has no `else`");
    };
    if let StmtKind::If(nested) = &else_branch.kind {
        if nested.else_branch.is_some() {
            return reject(NAME, "chains of more than two conditions are not reversed");
        }
    }
    Some(Target { statement: stmt.id })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Reverse conditional".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let missing = || RewriteError::MissingNode(target.statement);
    let stmt = ctx
        .node(target.statement)
        .and_then(|node| node.as_stmt())
        .ok_or_else(missing)?;
    let StmtKind::If(if_stmt) = &stmt.kind else {
        return Err(missing().into());
    };
    let else_branch = if_stmt.else_branch.as_deref().ok_or_else(missing)?;
    let mut make = Make::new(ctx.ids());

    let reversed = match &else_branch.kind {
        // if (a) A else if (b) B  =>  if (b) B else if (a) A
        StmtKind::If(nested) => {
            let inner = Stmt {
                kind: StmtKind::If(IfStmt {
                    cond: if_stmt.cond.clone(),
                    then_branch: if_stmt.then_branch.clone(),
                    else_branch: None,
                }),
                ..else_branch.clone()
            };
            IfStmt {
                cond: nested.cond.clone(),
                then_branch: nested.then_branch.clone(),
                else_branch: Some(Box::new(inner)),
            }
        }
        _ => IfStmt {
            cond: invert_condition(&mut make, &if_stmt.cond),
            then_branch: Box::new(else_branch.clone()),
            else_branch: Some(if_stmt.then_branch.clone()),
        },
    };
    let mut rewriter = ReplaceStmt {
        id: target.statement,
        replacement: Some(Stmt {
            kind: StmtKind::If(reversed),
            ..stmt.clone()
        }),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}
