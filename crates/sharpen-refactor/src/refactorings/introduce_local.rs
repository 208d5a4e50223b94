//! Introduce Local: evaluates a selected expression into a new local declared
//! just before the statement that contains it.

use sharpen_semantic::Type;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::make::{can_spell, Make};
use crate::refactorings::extract_method;
use crate::rewrite::{rewrite_stmt, rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "introduce-local";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) expr: NodeId,
    statement: NodeId,
    ty: Type,
    /// The expression is the whole of an expression statement.
    replaces_statement: bool,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let (expr, path) = extract_method::select(ctx, span, NAME)?;
    let Some(info) = ctx.type_of(expr.id) else {
        return reject(NAME, "expression has no type");
    };
    if info.static_type == Type::Void {
        return reject(NAME, "expression has no value");
    }
    if !can_spell(&info.static_type) {
        return reject(NAME, "expression type cannot be written in source");
    }
    let statement = path.iter().rev().find_map(|node| node.as_stmt())?;
    let replaces_statement = matches!(&statement.kind, StmtKind::Expr(value) if value.id == expr.id);
    Some(Target {
        expr: expr.id,
        statement: statement.id,
        ty: info.static_type,
        replaces_statement,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Introduce variable".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let expr = ctx
        .node(target.expr)
        .and_then(NodeRef::as_expr)
        .ok_or(RewriteError::MissingNode(target.expr))?;
    let statement = ctx
        .node(target.statement)
        .and_then(NodeRef::as_stmt)
        .ok_or(RewriteError::MissingNode(target.statement))?;
    let name = ctx.names.introduced_local.as_str();
    let mut make = Make::new(ctx.ids());

    let ty = make.spell(&target.ty)?;
    let mut replacement = vec![make.local(false, ty, name, expr.clone())];
    if !target.replaces_statement {
        let mut reference = ReplaceExpr {
            expr: target.expr,
            with: Some(make.name(name)),
        };
        replacement.push(rewrite_stmt(statement, &mut reference, cancel)?);
    }

    let mut rewriter = Insert::new(target.statement, replacement, make);
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct ReplaceExpr {
    expr: NodeId,
    with: Option<Expr>,
}

impl Rewriter for ReplaceExpr {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        if expr.id == self.expr {
            if let Some(with) = self.with.take() {
                return Step::Replace(with);
            }
        }
        Step::Descend
    }
}

/// Puts the declaration in front of the statement, wrapping both in a block
/// when the statement is embedded in another one.
pub(crate) struct Insert {
    statement: NodeId,
    replacement: Option<Vec<Stmt>>,
    make: Make,
}

impl Insert {
    pub(crate) fn new(statement: NodeId, replacement: Vec<Stmt>, make: Make) -> Self {
        Insert {
            statement,
            replacement: Some(replacement),
            make,
        }
    }
}

impl Rewriter for Insert {
    fn stmt(&mut self, stmt: &Stmt, path: &[Ancestor]) -> Step<Stmt> {
        if stmt.id != self.statement {
            return Step::Descend;
        }
        let Some(replacement) = self.replacement.take() else {
            return Step::Descend;
        };
        if path
            .last()
            .is_some_and(|parent| matches!(parent.kind, SyntaxKind::Block))
        {
            Step::Splice(replacement)
        } else {
            Step::Replace(self.make.block_stmt(replacement))
        }
    }
}
