//! Remove Assignment To Parameter: copies a by-value parameter into a local
//! at the start of the body and moves every write, and every read that may
//! observe one, over to the local.

use std::collections::BTreeSet;

use sharpen_semantic::{FlowRegion, SymbolId, SymbolKind};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::make::Make;
use crate::refactorings::rename_parameter::declares;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "remove-assignment-to-parameter";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) param: SymbolId,
    decl: NodeId,
    body: NodeId,
}

/// The parameter declaration under `span`, or the one assigned by the
/// assignment under it.
fn selected_param<'a>(ctx: &Context<'a>, span: TextRange) -> Option<&'a Param> {
    let is_param = |node: NodeRef<'_>| matches!(node, NodeRef::Param(_));
    if let Some(NodeRef::Param(param)) = narrowest_containing(ctx.doc, span, is_param) {
        return Some(param);
    }
    let is_assignment = |node: NodeRef<'_>| {
        matches!(
            node.as_expr(),
            Some(Expr {
                kind: ExprKind::Assign(..),
                ..
            })
        )
    };
    let assignment = narrowest_containing(ctx.doc, span, is_assignment)?.as_expr()?;
    let ExprKind::Assign(_, lhs, _) = &assignment.kind else {
        return None;
    };
    let symbol = ctx.symbol(ctx.symbol_at(lhs.unparenthesized().id)?)?;
    if symbol.kind != SymbolKind::Parameter {
        return None;
    }
    let location = symbol.declaration.as_ref()?;
    if location.file != *ctx.file {
        return None;
    }
    match ctx.node(location.node)? {
        NodeRef::Param(param) => Some(param),
        _ => None,
    }
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let param = selected_param(ctx, span)?;
    if param.modifier.is_some() {
        return reject(NAME, "only by-value parameters are handled");
    }
    let path = ctx.path_to(param.id)?;
    let owner = path.len().checked_sub(2).map(|idx| path[idx])?;
    let body = match owner {
        NodeRef::Method(decl) => decl.body.as_ref(),
        NodeRef::Constructor(decl) => decl.body.as_ref(),
        _ => return reject(NAME, "parameter does not belong to a method or constructor"),
    }?;
    let (first, last) = (body.stmts.first()?, body.stmts.last()?);
    let symbol = ctx.symbol_at(param.id)?;
    let facts = ctx.oracle.analyze_data_flow(
        ctx.file,
        FlowRegion::Statements {
            first: first.id,
            last: last.id,
        },
    )?;
    if !facts.written_inside.contains(&symbol) {
        return reject(NAME, "parameter is never assigned");
    }
    if declares(owner, &ctx.names.temp_variable) {
        return reject(NAME, "the temporary name is already taken");
    }
    Some(Target {
        param: symbol,
        decl: param.id,
        body: body.id,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Remove assignment to parameter".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Param(param)) = ctx.node(target.decl) else {
        return Err(RewriteError::MissingNode(target.decl).into());
    };
    let Some(body) = ctx.node(target.body) else {
        return Err(RewriteError::MissingNode(target.body).into());
    };

    let mut redirected = BTreeSet::new();
    for node in body.preorder() {
        let NodeRef::Expr(expr) = node else {
            continue;
        };
        if !matches!(expr.kind, ExprKind::Name(_))
            || ctx.symbol_at(expr.id) != Some(target.param)
        {
            continue;
        }
        let path = ctx.path_to(expr.id).ok_or(RewriteError::MissingNode(expr.id))?;
        if is_write_target(&path) || follows_write(ctx, &path, target.param) {
            redirected.insert(expr.id);
        }
    }
    tracing::debug!(
        parameter = %param.name.text,
        references = redirected.len(),
        "redirecting parameter to a local"
    );

    let temp = ctx.names.temp_variable.as_str();
    let mut make = Make::new(ctx.ids());
    let value = make.name(&param.name.text);
    let declaration = make.local(false, param.ty.clone(), temp, value);
    let mut rewriter = Redirect {
        body: target.body,
        redirected,
        temp,
        declaration: Some(declaration),
        make,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// Whether the last node of `path` is the operand that an assignment, increment
/// or `ref`/`out` argument writes.
fn is_write_target(path: &[NodeRef<'_>]) -> bool {
    let Some((node, ancestors)) = path.split_last() else {
        return false;
    };
    let mut child = node.id();
    for ancestor in ancestors.iter().rev() {
        match ancestor {
            NodeRef::Expr(Expr {
                kind: ExprKind::Paren(_),
                ..
            }) => child = ancestor.id(),
            NodeRef::Expr(expr) => return writes_operand(expr, child),
            NodeRef::Arg(arg) => return arg.modifier.is_some() && arg.value.id == child,
            _ => return false,
        }
    }
    false
}

/// Whether `expr` writes its direct operand `child`.
fn writes_operand(expr: &Expr, child: NodeId) -> bool {
    match &expr.kind {
        ExprKind::Assign(_, lhs, _) => lhs.id == child,
        ExprKind::Unary(UnaryOp::PreInc | UnaryOp::PreDec, operand)
        | ExprKind::Postfix(_, operand) => operand.id == child,
        _ => false,
    }
}

/// Whether anything under `node` writes `param`.
fn writes(ctx: &Context<'_>, node: NodeRef<'_>, param: SymbolId) -> bool {
    let bound = |expr: &Expr| ctx.symbol_at(expr.unparenthesized().id) == Some(param);
    node.preorder().any(|node| match node {
        NodeRef::Expr(expr) => match &expr.kind {
            ExprKind::Assign(_, lhs, _) => bound(lhs),
            ExprKind::Unary(UnaryOp::PreInc | UnaryOp::PreDec, operand)
            | ExprKind::Postfix(_, operand) => bound(operand),
            _ => false,
        },
        NodeRef::Arg(arg) => arg.modifier.is_some() && bound(&arg.value),
        _ => false,
    })
}

/// Whether the reference at the end of `path` can observe a value written to
/// `param` earlier: a preceding statement of an enclosing block writes it,
/// an enclosing condition or loop writes it, or its own statement does.
fn follows_write(ctx: &Context<'_>, path: &[NodeRef<'_>], param: SymbolId) -> bool {
    for (idx, node) in path.iter().enumerate().skip(1) {
        let Some(stmt) = node.as_stmt() else {
            continue;
        };
        let siblings = match path[idx - 1] {
            NodeRef::Block(block) => Some(&block.stmts),
            NodeRef::Stmt(Stmt {
                kind: StmtKind::Block(block),
                ..
            }) => Some(&block.stmts),
            _ => None,
        };
        let preceding_write = siblings.is_some_and(|stmts| {
            stmts
                .iter()
                .take_while(|sibling| sibling.id != stmt.id)
                .any(|sibling| writes(ctx, NodeRef::Stmt(sibling), param))
        });
        if preceding_write {
            return true;
        }
        let own_write = match &stmt.kind {
            StmtKind::Block(_) => false,
            StmtKind::If(if_stmt) => writes(ctx, NodeRef::Expr(&if_stmt.cond), param),
            // A loop writing anywhere carries the value into the next
            // iteration.
            _ => writes(ctx, *node, param),
        };
        if own_write {
            return true;
        }
    }
    false
}

struct Redirect<'t> {
    body: NodeId,
    redirected: BTreeSet<NodeId>,
    temp: &'t str,
    declaration: Option<Stmt>,
    make: Make,
}

impl Rewriter for Redirect<'_> {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        if !self.redirected.contains(&expr.id) {
            return Step::Descend;
        }
        let ident = self.make.ident(self.temp);
        Step::Replace(Expr::new(
            expr.id,
            ExprKind::Name(NameRef {
                ident,
                type_args: Vec::new(),
            }),
        ))
    }

    fn finish_block(&mut self, original: &Block, block: &mut Block, _path: &[Ancestor]) {
        if original.id != self.body {
            return;
        }
        if let Some(declaration) = self.declaration.take() {
            block.stmts.insert(0, declaration);
        }
    }
}
