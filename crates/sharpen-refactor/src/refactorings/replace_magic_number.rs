//! Replace Magic Number: names a numeric literal with a local constant
//! declared at the start of the innermost enclosing block.

use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::enclosing_member;
use crate::make::Make;
use crate::refactorings::rename_parameter::declares;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "replace-magic-number";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) literal: NodeId,
    block: NodeId,
}

/// Same kind and same value: `0123` equals `123`, `123d` equals `123.0`.
fn same_number(a: &Literal, b: &Literal) -> bool {
    a.kind == b.kind && a.numeric_value().is_some() && a.numeric_value() == b.numeric_value()
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let literal = ctx.doc.root().preorder().find_map(|node| {
        let expr = node.as_expr()?;
        let ExprKind::Literal(lit) = &expr.kind else {
            return None;
        };
        let range = ctx.range(expr.id)?;
        (lit.is_numeric() && range.start <= span.start && span.end <= range.end)
            .then_some(expr)
    })?;
    let path = ctx.path_to(literal.id)?;
    let Some(block) = path.iter().rev().find_map(|node| match node {
        NodeRef::Block(block) => Some(block.id),
        NodeRef::Stmt(Stmt {
            id,
            kind: StmtKind::Block(_),
            ..
        }) => Some(*id),
        _ => None,
    }) else {
        return reject(NAME, "literal is not inside a block");
    };
    let member = enclosing_member(&path)?;
    if declares(member, &ctx.names.magic_number_constant) {
        return reject(NAME, "the constant name is already taken");
    }
    Some(Target {
        literal: literal.id,
        block,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Replace magic number with symbolic constant".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let missing = RewriteError::MissingNode(target.literal);
    let Some(expr) = ctx.node(target.literal).and_then(|node| node.as_expr()) else {
        return Err(missing.into());
    };
    let ExprKind::Literal(literal) = &expr.kind else {
        return Err(missing.into());
    };
    let ty = ctx.type_of(expr.id).ok_or(missing)?.static_type;
    let mut make = Make::new(ctx.ids());
    let ty = make.spell(&ty)?;
    let name = ctx.names.magic_number_constant.as_str();
    let value = make.literal(literal.kind, &literal.text);
    let declaration = make.local(true, ty, name, value);
    tracing::debug!(literal = %literal.text, "introducing symbolic constant");

    let mut rewriter = ReplaceMagicNumber {
        block: target.block,
        literal,
        name,
        declaration: Some(declaration),
        make,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct ReplaceMagicNumber<'t> {
    block: NodeId,
    literal: &'t Literal,
    name: &'t str,
    declaration: Option<Stmt>,
    make: Make,
}

impl Rewriter for ReplaceMagicNumber<'_> {
    fn expr(&mut self, expr: &Expr, path: &[Ancestor]) -> Step<Expr> {
        let ExprKind::Literal(literal) = &expr.kind else {
            return Step::Descend;
        };
        let in_block = path.iter().any(|ancestor| ancestor.id == self.block);
        if !in_block || !same_number(literal, self.literal) {
            return Step::Descend;
        }
        let ident = self.make.ident(self.name);
        Step::Replace(Expr::new(
            expr.id,
            ExprKind::Name(NameRef {
                ident,
                type_args: Vec::new(),
            }),
        ))
    }

    fn finish_block(&mut self, original: &Block, block: &mut Block, _path: &[Ancestor]) {
        if original.id != self.block {
            return;
        }
        if let Some(declaration) = self.declaration.take() {
            block.stmts.insert(0, declaration);
        }
    }
}
