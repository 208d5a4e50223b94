//! Introduce Parameter Object: replaces a run of parameters by one parameter
//! of a new class holding them as properties.

use std::collections::BTreeSet;

use sharpen_semantic::SymbolId;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::make::Make;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "introduce-parameter-object";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) owner: NodeId,
    callable: SymbolId,
    /// Selected parameter nodes, in declaration order.
    params: Vec<NodeId>,
    symbols: BTreeSet<SymbolId>,
}

/// Parameters of the declaration being invoked as `owner`, when they can be
/// changed without touching another signature.
pub(crate) fn owned_params<'a>(owner: NodeRef<'a>) -> Option<&'a [Param]> {
    match owner {
        NodeRef::Method(decl) if decl.explicit_interface.is_none() => Some(&decl.params),
        NodeRef::Constructor(decl) => Some(&decl.params),
        _ => None,
    }
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let selected: Vec<&Param> = ctx
        .doc
        .root()
        .preorder()
        .filter_map(|node| match node {
            NodeRef::Param(param) => Some(param),
            _ => None,
        })
        .filter(|param| {
            ctx.range(param.id).is_some_and(|range| {
                range.intersects(span) || (span.is_empty() && range.contains_inclusive(span.start))
            })
        })
        .collect();
    let first = selected.first()?;
    let path = ctx.path_to(first.id)?;
    let owner = path.len().checked_sub(2).map(|idx| path[idx])?;
    let Some(params) = owned_params(owner) else {
        return reject(NAME, "parameters do not belong to a method or constructor");
    };
    if !selected
        .iter()
        .all(|param| params.iter().any(|candidate| candidate.id == param.id))
    {
        return reject(NAME, "selection spans several parameter lists");
    }
    if selected
        .iter()
        .any(|param| matches!(param.modifier, Some(modifier) if modifier.is_by_ref()))
    {
        return reject(NAME, "ref and out parameters cannot be stored in an object");
    }
    let callable = ctx.symbol_at(owner.id())?;
    let symbol = ctx.symbol(callable)?;
    if symbol.flags.is_override || symbol.flags.is_explicit_impl {
        return reject(NAME, "parameters are part of an inherited signature");
    }
    let symbols = selected
        .iter()
        .map(|param| ctx.symbol_at(param.id))
        .collect::<Option<BTreeSet<_>>>()?;
    Some(Target {
        owner: owner.id(),
        callable,
        params: selected.iter().map(|param| param.id).collect(),
        symbols,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Introduce parameter object".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let owner = ctx
        .node(target.owner)
        .ok_or(RewriteError::MissingNode(target.owner))?;
    let params = owned_params(owner).ok_or(RewriteError::MissingNode(target.owner))?;
    let selected: Vec<&Param> = params
        .iter()
        .filter(|param| target.params.contains(&param.id))
        .collect();
    let type_name = ctx.names.parameter_object_type.as_str();
    let param_name = ctx.names.parameter_object_parameter.as_str();
    tracing::debug!(
        parameters = selected.len(),
        class = type_name,
        "introducing parameter object"
    );

    let mut make = Make::new(ctx.ids());
    let ty = make.type_named(type_name);
    let param = make.param(None, ty, param_name);
    let class = parameter_class(&mut make, type_name, &selected);
    let mut rewriter = Compress {
        ctx,
        target,
        make,
        type_name,
        param_name,
        declaration: Some((param, class)),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// `class ParameterObject` with one auto-property per parameter and a
/// constructor assigning them.
fn parameter_class(make: &mut Make, name: &str, params: &[&Param]) -> TypeDecl {
    let mut members = Vec::with_capacity(params.len() + 1);
    let mut ctor_params = Vec::with_capacity(params.len());
    let mut assignments = Vec::with_capacity(params.len());
    for param in params {
        let field = param.name.text.as_str();
        let getter = make.accessor(AccessorKind::Get, None);
        let setter = make.accessor(AccessorKind::Set, None);
        members.push(make.property(
            Modifiers::new(vec![Modifier::Public]),
            param.ty.clone(),
            field,
            vec![getter, setter],
        ));
        ctor_params.push(make.param(None, param.ty.clone(), field));
        let this = make.this();
        let target = make.member(this, field);
        let value = make.name(field);
        let assign = make.assign(target, value);
        assignments.push(make.expr_stmt(assign));
    }
    members.push(make.constructor(
        Modifiers::new(vec![Modifier::Public]),
        name,
        ctor_params,
        assignments,
    ));
    make.class(Modifiers::default(), name, members)
}

struct Compress<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
    make: Make,
    type_name: &'t str,
    param_name: &'t str,
    /// The replacement parameter and the new class.
    declaration: Option<(Param, TypeDecl)>,
}

impl Compress<'_, '_> {
    fn is_compressed(&self, arg: &Arg) -> bool {
        self.ctx
            .symbol_at(arg.id)
            .is_some_and(|param| self.target.symbols.contains(&param))
    }

    /// Moves the arguments of the selected parameters into a `new
    /// ParameterObject(..)` standing where the first of them was.
    fn compress(&mut self, args: Vec<Arg>) -> Vec<Arg> {
        let ctor_args: Vec<Arg> = args
            .iter()
            .filter(|arg| self.is_compressed(arg))
            .cloned()
            .collect();
        let Some(first) = ctor_args.first().map(|arg| arg.id) else {
            return args;
        };
        let first_named = ctor_args[0].name.is_some();
        let ty = self.make.type_named(self.type_name);
        let creation = self.make.new_object(ty, ctor_args);
        let mut object = self.make.arg(None, creation);
        if first_named {
            object.name = Some(self.make.ident(self.param_name));
        }

        let mut out = Vec::with_capacity(args.len());
        let mut object = Some(object);
        for arg in args {
            if arg.id == first {
                out.extend(object.take());
            } else if !self.is_compressed(&arg) {
                out.push(arg);
            }
        }
        out
    }
}

impl Rewriter for Compress<'_, '_> {
    fn param(&mut self, param: &Param, _path: &[Ancestor]) -> Step<Param> {
        if !self.target.params.contains(&param.id) {
            return Step::Descend;
        }
        if self.target.params.first() == Some(&param.id) {
            if let Some((replacement, _)) = &self.declaration {
                return Step::Replace(replacement.clone());
            }
        }
        Step::Remove
    }

    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        if !matches!(expr.kind, ExprKind::Name(_)) {
            return Step::Descend;
        }
        let Some(symbol) = self.ctx.symbol_at(expr.id) else {
            return Step::Descend;
        };
        if !self.target.symbols.contains(&symbol) {
            return Step::Descend;
        }
        let ExprKind::Name(name) = &expr.kind else {
            return Step::Descend;
        };
        let receiver = self.make.name(self.param_name);
        Step::Replace(Expr::new(
            expr.id,
            ExprKind::Member(MemberAccess {
                receiver: Box::new(receiver),
                name: name.ident.clone(),
                type_args: Vec::new(),
            }),
        ))
    }

    fn finish_expr(&mut self, original: &Expr, expr: &mut Expr, _path: &[Ancestor]) {
        if !matches!(original.kind, ExprKind::Call(_) | ExprKind::New(_)) {
            return;
        }
        if self.ctx.symbol_at(original.id) != Some(self.target.callable) {
            return;
        }
        match &mut expr.kind {
            ExprKind::Call(call) => call.args = self.compress(std::mem::take(&mut call.args)),
            ExprKind::New(creation) => {
                creation.args = self.compress(std::mem::take(&mut creation.args));
            }
            _ => {}
        }
    }

    fn finish_unit(&mut self, unit: &mut CompilationUnit) {
        if let Some((_, class)) = self.declaration.take() {
            unit.items.push(Item::Type(class));
        }
    }
}

