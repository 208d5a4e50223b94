//! Introduce Explaining Variable: names every comparison of an `if`
//! condition with a `bool` local declared before the `if`.

use std::collections::BTreeSet;

use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::make::Make;
use crate::refactorings::introduce_local::Insert;
use crate::rewrite::{rewrite_expr, rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "introduce-explaining-variable";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) statement: NodeId,
    operands: BTreeSet<NodeId>,
}

/// Non-logical operands reachable through `&&`, `||`, `!` and parentheses.
fn collect_operands(expr: &Expr, out: &mut BTreeSet<NodeId>) {
    match &expr.kind {
        ExprKind::Binary(op, lhs, rhs) if op.is_logical() => {
            collect_operands(lhs, out);
            collect_operands(rhs, out);
        }
        ExprKind::Binary(..) => {
            out.insert(expr.id);
        }
        ExprKind::Unary(UnaryOp::Not, operand) => collect_operands(operand, out),
        ExprKind::Paren(_) => collect_operands(expr.unparenthesized(), out),
        _ => {}
    }
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let span = if span.is_empty() {
        TextRange::new(span.start, span.start + 1)
    } else {
        span
    };
    let mut found = None;
    for node in ctx.doc.root().preorder() {
        let Some(stmt @ Stmt {
            kind: StmtKind::If(if_stmt),
            ..
        }) = node.as_stmt()
        else {
            continue;
        };
        if ctx
            .range(if_stmt.cond.id)
            .is_some_and(|range| range.contains_range(span))
        {
            found = Some((stmt, if_stmt));
        }
    }
    let Some((stmt, if_stmt)) = found else {
        return reject(NAME, "selection is not inside an `if` condition");
    };
    let mut operands = BTreeSet::new();
    collect_operands(&if_stmt.cond, &mut operands);
    if operands.is_empty() {
        return reject(NAME, "condition has no operand to name");
    }
    Some(Target {
        statement: stmt.id,
        operands,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Introduce explaining variables".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(Stmt {
        kind: StmtKind::If(if_stmt),
        trivia,
        ..
    }) = ctx.node(target.statement).and_then(NodeRef::as_stmt)
    else {
        return Err(RewriteError::MissingNode(target.statement).into());
    };
    let mut make = Make::new(ctx.ids());
    let mut explain = Explain {
        operands: &target.operands,
        prefix: &ctx.names.explaining_variable_prefix,
        make: &mut make,
        declarations: Vec::new(),
    };
    let cond = rewrite_expr(&if_stmt.cond, &mut explain, cancel)?;
    let mut replacement = explain.declarations;
    tracing::debug!(variables = replacement.len(), "explaining condition operands");
    replacement.push(Stmt {
        id: target.statement,
        trivia: trivia.clone(),
        kind: StmtKind::If(IfStmt {
            cond,
            then_branch: if_stmt.then_branch.clone(),
            else_branch: if_stmt.else_branch.clone(),
        }),
    });

    let mut rewriter = Insert::new(target.statement, replacement, make);
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct Explain<'a> {
    operands: &'a BTreeSet<NodeId>,
    prefix: &'a str,
    make: &'a mut Make,
    declarations: Vec<Stmt>,
}

impl Explain<'_> {
    fn introduce(&mut self, operand: &Expr) -> Expr {
        let name = format!("{}{}", self.prefix, self.declarations.len() + 1);
        let ty = self.make.predefined(PredefinedType::Bool);
        let declaration = self.make.local(false, ty, &name, operand.clone());
        self.declarations.push(declaration);
        self.make.name(&name)
    }
}

impl Rewriter for Explain<'_> {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        if self.operands.contains(&expr.id) {
            return Step::Replace(self.introduce(expr));
        }
        // `(a == b)` becomes `isVar1`, not `(isVar1)`.
        if let ExprKind::Paren(inner) = &expr.kind {
            if self.operands.contains(&inner.id) {
                return Step::Replace(self.introduce(inner));
            }
        }
        Step::Descend
    }
}
