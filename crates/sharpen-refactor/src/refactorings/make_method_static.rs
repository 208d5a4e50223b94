//! Make Method Static: turns an instance method into a static one taking its
//! receiver as the first parameter.

use sharpen_semantic::{SymbolId, SymbolKind};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::enclosing_type;
use crate::make::Make;
use crate::rewrite::{rewrite_block, rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "make-method-static";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) method: SymbolId,
    decl: NodeId,
    type_name: String,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let decl = ctx.doc.root().preorder().find_map(|node| match node {
        NodeRef::Method(decl) => ctx
            .range(decl.name.id)
            .filter(|range| range.start <= span.start && span.end <= range.end)
            .map(|_| decl),
        _ => None,
    })?;
    if decl.modifiers.is_static() {
        return reject(NAME, "method is already static");
    }
    let Some(body) = &decl.body else {
        return reject(NAME, "method has no body");
    };
    let uses_base = NodeRef::Block(body)
        .preorder()
        .any(|node| matches!(node, NodeRef::Expr(Expr { kind: ExprKind::Base, .. })));
    if uses_base {
        return reject(NAME, "`base` access has no static equivalent");
    }
    let method = ctx.symbol_at(decl.id)?;
    if ctx.symbol(method)?.flags.is_polymorphic() {
        return reject(NAME, "method takes part in dynamic dispatch");
    }
    let path = ctx.path_to(decl.id)?;
    let type_decl = enclosing_type(&path)?;
    if !type_decl.type_params.is_empty() {
        return reject(NAME, "generic type cannot be named at call sites");
    }
    Some(Target {
        method,
        decl: decl.id,
        type_name: type_decl.name.text.clone(),
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Make method static".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Method(decl)) = ctx.node(target.decl) else {
        return Err(RewriteError::MissingNode(target.decl).into());
    };
    tracing::debug!(method = %decl.name.text, ty = %target.type_name, "making method static");
    let mut make = Make::new(ctx.ids());
    let replacement = static_method(ctx, target, decl, &mut make, cancel)?;
    let mut rewriter = MakeStatic {
        ctx,
        target,
        make,
        replacement: Some(replacement),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// The method made static, with its body routed through the receiver
/// parameter.
fn static_method(
    ctx: &Context<'_>,
    target: &Target,
    decl: &MethodDecl,
    make: &mut Make,
    cancel: &CancellationToken,
) -> Result<Member, RefactorError> {
    let receiver = ctx.names.receiver_parameter.as_str();
    let body = decl
        .body
        .as_ref()
        .ok_or(RewriteError::MissingNode(decl.id))?;
    let mut qualify = Qualify {
        ctx,
        method: target.method,
        receiver,
        make: &mut *make,
    };
    let body = rewrite_block(body, &mut qualify, cancel)?;

    let ty = make.type_named(&target.type_name);
    let mut params = vec![make.param(None, ty, receiver)];
    params.extend(decl.params.iter().cloned());
    Ok(Member::Method(MethodDecl {
        modifiers: decl.modifiers.with_first(Modifier::Static),
        params,
        body: Some(body),
        ..decl.clone()
    }))
}

/// `receiver` as the first argument of `args`.
fn prepend(make: &mut Make, receiver: Expr, args: &mut Vec<Arg>) {
    let arg = make.arg(None, receiver);
    args.insert(0, arg);
}

/// Rewrites the body of the method: instance members and `this` go through
/// the receiver parameter, recursive calls pass it explicitly.
struct Qualify<'a, 'm> {
    ctx: &'m Context<'a>,
    method: SymbolId,
    receiver: &'m str,
    make: &'m mut Make,
}

impl Rewriter for Qualify<'_, '_> {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        match &expr.kind {
            ExprKind::This => Step::Replace(self.make.name(self.receiver)),
            ExprKind::Name(name) => {
                let instance_member = self
                    .ctx
                    .symbol_at(expr.id)
                    .and_then(|symbol| self.ctx.symbol(symbol))
                    .is_some_and(|symbol| {
                        matches!(
                            symbol.kind,
                            SymbolKind::Field | SymbolKind::Method | SymbolKind::Property
                        ) && !symbol.flags.is_static
                    });
                if !instance_member {
                    return Step::Descend;
                }
                let receiver = self.make.name(self.receiver);
                Step::Replace(Expr::new(
                    expr.id,
                    ExprKind::Member(MemberAccess {
                        receiver: Box::new(receiver),
                        name: name.ident.clone(),
                        type_args: name.type_args.clone(),
                    }),
                ))
            }
            _ => Step::Descend,
        }
    }

    fn finish_expr(&mut self, original: &Expr, expr: &mut Expr, _path: &[Ancestor]) {
        if !matches!(original.kind, ExprKind::Call(_))
            || self.ctx.symbol_at(original.id) != Some(self.method)
        {
            return;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return;
        };
        // `receiver.M(args)` becomes `M(receiver, args)`.
        let ExprKind::Member(access) = &call.callee.kind else {
            return;
        };
        let callee = Expr::new(
            call.callee.id,
            ExprKind::Name(NameRef {
                ident: access.name.clone(),
                type_args: access.type_args.clone(),
            }),
        );
        let receiver = (*access.receiver).clone();
        call.callee = Box::new(callee);
        prepend(self.make, receiver, &mut call.args);
    }
}

/// Rewrites calls outside the method to `Type.M(receiver, args)`.
struct MakeStatic<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
    make: Make,
    replacement: Option<Member>,
}

impl Rewriter for MakeStatic<'_, '_> {
    fn member(&mut self, member: &Member, _path: &[Ancestor]) -> Step<Member> {
        if member.id() == self.target.decl {
            if let Some(replacement) = self.replacement.take() {
                return Step::Replace(replacement);
            }
        }
        Step::Descend
    }

    fn finish_expr(&mut self, original: &Expr, expr: &mut Expr, _path: &[Ancestor]) {
        if !matches!(original.kind, ExprKind::Call(_))
            || self.ctx.symbol_at(original.id) != Some(self.target.method)
        {
            return;
        }
        let ExprKind::Call(call) = &mut expr.kind else {
            return;
        };
        let (receiver, name, type_args) = match &call.callee.kind {
            ExprKind::Member(access) => (
                (*access.receiver).clone(),
                access.name.clone(),
                access.type_args.clone(),
            ),
            ExprKind::Name(name) => (self.make.this(), name.ident.clone(), name.type_args.clone()),
            _ => return,
        };
        let ty = self.make.name(&self.target.type_name);
        call.callee = Box::new(Expr::new(
            call.callee.id,
            ExprKind::Member(MemberAccess {
                receiver: Box::new(ty),
                name,
                type_args,
            }),
        ));
        prepend(&mut self.make, receiver, &mut call.args);
    }
}
