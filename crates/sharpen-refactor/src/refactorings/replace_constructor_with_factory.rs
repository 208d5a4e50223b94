//! Replace Constructor With Factory Method: hides a constructor behind a
//! static `CreateT` method and routes its object creations through it.

use sharpen_semantic::SymbolId;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::enclosing_type;
use crate::make::Make;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter};
use crate::synth::Changes;

const NAME: &str = "replace-constructor-with-factory";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) constructor: SymbolId,
    decl: NodeId,
    type_decl: NodeId,
    type_name: String,
    factory: String,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let ctor = ctx.doc.root().preorder().find_map(|node| match node {
        NodeRef::Constructor(ctor) => ctx
            .range(ctor.name.id)
            .filter(|range| range.start <= span.start && span.end <= range.end)
            .map(|_| ctor),
        _ => None,
    })?;
    if ctor.modifiers.has(Modifier::Static) {
        return reject(NAME, "static constructors are never called explicitly");
    }
    let path = ctx.path_to(ctor.id)?;
    let type_decl = enclosing_type(&path)?;
    if type_decl.kind != TypeKind::Class {
        return reject(NAME, "only class constructors are replaced");
    }
    if !type_decl.type_params.is_empty() {
        return reject(NAME, "generic classes are not supported");
    }
    let factory = format!("{}{}", ctx.names.factory_method_prefix, type_decl.name.text);
    let class = ctx.symbol_at(type_decl.id)?;
    let taken = ctx
        .oracle
        .members(class)
        .into_iter()
        .any(|member| ctx.oracle.symbol_name(member) == Some(factory.as_str()));
    if taken {
        return reject(NAME, "class already has a member with the factory name");
    }
    Some(Target {
        constructor: ctx.symbol_at(ctor.id)?,
        decl: ctor.id,
        type_decl: type_decl.id,
        type_name: type_decl.name.text.clone(),
        factory,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Replace constructor with factory method".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Constructor(ctor)) = ctx.node(target.decl) else {
        return Err(RewriteError::MissingNode(target.decl).into());
    };
    let mut make = Make::new(ctx.ids());
    let factory = factory_method(&mut make, target, ctor);
    let mut rewriter = Factory {
        ctx,
        target,
        make,
        factory: Some(factory),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// `static T CreateT(params) { return new T(args); }` with the constructor's
/// access.
fn factory_method(make: &mut Make, target: &Target, ctor: &ConstructorDecl) -> Member {
    let mut modifiers: Vec<Modifier> = ctor.modifiers.iter().filter(|m| m.is_access()).collect();
    modifiers.push(Modifier::Static);

    let mut params = Vec::with_capacity(ctor.params.len());
    let mut args = Vec::with_capacity(ctor.params.len());
    for param in &ctor.params {
        params.push(Param {
            default: param.default.clone(),
            ..make.param(param.modifier, param.ty.clone(), &param.name.text)
        });
        let modifier = match param.modifier {
            Some(ParamModifier::Ref) => Some(ArgModifier::Ref),
            Some(ParamModifier::Out) => Some(ArgModifier::Out),
            _ => None,
        };
        let value = make.name(&param.name.text);
        args.push(make.arg(modifier, value));
    }
    let ty = make.type_named(&target.type_name);
    let creation = make.new_object(ty, args);
    let body = make.return_stmt(Some(creation));
    let return_type = make.type_named(&target.type_name);
    Member::Method(make.method(
        Modifiers::new(modifiers),
        return_type,
        &target.factory,
        params,
        vec![body],
    ))
}

struct Factory<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
    make: Make,
    factory: Option<Member>,
}

impl Rewriter for Factory<'_, '_> {
    fn finish_expr(&mut self, original: &Expr, expr: &mut Expr, _path: &[Ancestor]) {
        if !matches!(original.kind, ExprKind::New(_))
            || self.ctx.symbol_at(original.id) != Some(self.target.constructor)
        {
            return;
        }
        let ExprKind::New(creation) = &mut expr.kind else {
            return;
        };
        let args = std::mem::take(&mut creation.args);
        let receiver = self.make.name(&self.target.type_name);
        let callee = self.make.member(receiver, &self.target.factory);
        let call = self.make.call(callee, args);
        *expr = Expr::new(expr.id, call.kind);
    }

    fn finish_member(&mut self, original: &Member, member: &mut Member, _path: &[Ancestor]) {
        if original.id() != self.target.decl {
            return;
        }
        if let Member::Constructor(ctor) = member {
            ctor.modifiers = ctor.modifiers.with_access(Modifier::Private);
        }
    }

    fn finish_type(&mut self, original: &TypeDecl, decl: &mut TypeDecl, _path: &[Ancestor]) {
        if original.id == self.target.type_decl {
            decl.members.extend(self.factory.take());
        }
    }
}
