//! Extract Method: moves a selected expression into a new method of the
//! containing type and calls it in place.
//!
//! Variables written by the expression become `ref`/`out` parameters,
//! variables it only reads become by-value parameters.

use sharpen_semantic::{FlowRegion, SymbolId, SymbolKind, Type};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{enclosing_member, enclosing_type};
use crate::make::{can_spell, Make};
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::selection::widest_contained;
use crate::synth::Changes;

const NAME: &str = "extract-method";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) expr: NodeId,
    return_type: Type,
    type_decl: NodeId,
    is_static: bool,
    type_params: Vec<TypeParam>,
    constraints: Vec<Constraint>,
    pub(crate) params: Vec<Parameter>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Parameter {
    pub(crate) symbol: SymbolId,
    pub(crate) name: String,
    pub(crate) mode: Option<ArgModifier>,
    ty: Type,
}

/// Selects the widest expression in `span` that can be evaluated on its own
/// inside a statement. Rejections are logged under `refactoring`.
pub(crate) fn select<'a>(
    ctx: &Context<'a>,
    span: TextRange,
    refactoring: &'static str,
) -> Option<(&'a Expr, Vec<NodeRef<'a>>)> {
    let node = widest_contained(ctx.doc, span, |node| node.as_expr().is_some())?;
    let expr = node.as_expr()?;
    let path = ctx.path_to(expr.id)?;
    if !path.iter().any(|node| node.as_stmt().is_some()) {
        return reject(refactoring, "expression is not inside a statement");
    }
    let parent = path.len().checked_sub(2).map(|idx| path[idx]);
    match parent {
        Some(NodeRef::Expr(Expr {
            kind: ExprKind::Call(call),
            ..
        })) if call.callee.id == expr.id => {
            return reject(refactoring, "expression is the callee of an invocation");
        }
        Some(NodeRef::Expr(Expr {
            kind: ExprKind::Assign(_, lhs, _),
            ..
        })) if lhs.id == expr.id => {
            return reject(refactoring, "expression is the target of an assignment");
        }
        Some(NodeRef::Expr(Expr {
            kind:
                ExprKind::Postfix(_, operand)
                | ExprKind::Unary(UnaryOp::PreInc | UnaryOp::PreDec, operand),
            ..
        })) if operand.id == expr.id => {
            return reject(refactoring, "expression is incremented or decremented");
        }
        Some(NodeRef::Arg(arg)) if arg.modifier.is_some() => {
            return reject(refactoring, "expression is a ref or out argument");
        }
        _ => {}
    }
    if matches!(expr.kind, ExprKind::Base) {
        return reject(refactoring, "`base` cannot be evaluated on its own");
    }
    if let Some(symbol) = ctx.symbol_at(expr.id).and_then(|id| ctx.symbol(id)) {
        if matches!(
            expr.kind,
            ExprKind::Name(_) | ExprKind::Member(_)
        ) && matches!(symbol.kind, SymbolKind::Type | SymbolKind::Method)
        {
            return reject(refactoring, "expression names a type or method group");
        }
    }
    Some((expr, path))
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let (expr, path) = select(ctx, span, NAME)?;
    let Some(ty) = ctx.type_of(expr.id) else {
        return reject(NAME, "expression has no type");
    };
    if !can_spell(&ty.static_type) {
        return reject(NAME, "expression type cannot be written in source");
    }
    let Some(type_decl) = enclosing_type(&path) else {
        return reject(NAME, "expression is not inside a type");
    };
    if type_decl.kind == TypeKind::Interface {
        return reject(NAME, "methods cannot be added to an interface");
    }
    let member = enclosing_member(&path)?;
    let is_static = match member {
        NodeRef::Method(decl) => decl.modifiers.is_static(),
        NodeRef::Constructor(decl) => decl.modifiers.is_static(),
        NodeRef::Property(decl) => decl.modifiers.is_static(),
        NodeRef::Operator(_) | NodeRef::Conversion(_) => true,
        NodeRef::Field(decl) => decl.modifiers.is_static(),
        _ => false,
    };
    let (type_params, constraints) = match member {
        NodeRef::Method(decl) => (decl.type_params.clone(), decl.constraints.clone()),
        _ => (Vec::new(), Vec::new()),
    };
    let params = infer_parameters(ctx, expr)?;
    Some(Target {
        expr: expr.id,
        return_type: ty.static_type,
        type_decl: type_decl.id,
        is_static,
        type_params,
        constraints,
        params,
    })
}

/// Parameters needed to evaluate `expr` elsewhere: written variables first
/// (`out` when their first reference is an assignment target, `ref`
/// otherwise), then variables that are only read.
pub(crate) fn infer_parameters(ctx: &Context<'_>, expr: &Expr) -> Option<Vec<Parameter>> {
    let Some(flow) = ctx
        .oracle
        .analyze_data_flow(ctx.file, FlowRegion::Expr(expr.id))
    else {
        return reject(NAME, "no data flow for expression");
    };
    let mut params = Vec::new();
    for &id in &flow.written_inside {
        let Some(symbol) = ctx.symbol(id) else {
            continue;
        };
        if symbol.kind == SymbolKind::Receiver {
            continue;
        }
        let Some(first) = first_reference(ctx, expr, id) else {
            continue;
        };
        let mode = first.argument.or(if first.is_assignment_target {
            Some(ArgModifier::Out)
        } else {
            Some(ArgModifier::Ref)
        });
        if !can_spell(&symbol.ty) {
            return reject(NAME, "parameter type cannot be written in source");
        }
        params.push(Parameter {
            symbol: id,
            name: symbol.name.clone(),
            mode,
            ty: symbol.ty.clone(),
        });
    }
    for &id in &flow.read_inside {
        if flow.written_inside.contains(&id) {
            continue;
        }
        let Some(symbol) = ctx.symbol(id) else {
            continue;
        };
        if symbol.kind == SymbolKind::Receiver || first_reference(ctx, expr, id).is_none() {
            continue;
        }
        if !can_spell(&symbol.ty) {
            return reject(NAME, "parameter type cannot be written in source");
        }
        params.push(Parameter {
            symbol: id,
            name: symbol.name.clone(),
            mode: None,
            ty: symbol.ty.clone(),
        });
    }
    Some(params)
}

struct FirstReference {
    is_assignment_target: bool,
    /// `ref`/`out` of the closest enclosing argument that has one.
    argument: Option<ArgModifier>,
}

/// The first name in `root` (preorder) bound to `symbol`.
fn first_reference(ctx: &Context<'_>, root: &Expr, symbol: SymbolId) -> Option<FirstReference> {
    let name = NodeRef::Expr(root).preorder().find(|node| {
        matches!(node, NodeRef::Expr(Expr { kind: ExprKind::Name(_), .. }))
            && ctx.symbol_at(node.id()) == Some(symbol)
    })?;
    let path = NodeRef::Expr(root).path_to(name.id())?;
    let is_assignment_target = path.len() >= 2
        && matches!(path[path.len() - 2], NodeRef::Expr(Expr {
            kind: ExprKind::Assign(_, lhs, _),
            ..
        }) if lhs.id == name.id());
    let argument = path.iter().rev().find_map(|node| match node {
        NodeRef::Arg(arg) => Some(arg.modifier),
        _ => None,
    });
    Some(FirstReference {
        is_assignment_target,
        argument: argument.flatten(),
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Extract method".to_string()
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
    let mut make = Make::new(ctx.ids());
    let name = ctx.names.extracted_method.as_str();

    let mut params = Vec::with_capacity(target.params.len());
    let mut args = Vec::with_capacity(target.params.len());
    for param in &target.params {
        let ty = make.spell(&param.ty)?;
        let modifier = param.mode.map(|mode| match mode {
            ArgModifier::Ref => ParamModifier::Ref,
            ArgModifier::Out => ParamModifier::Out,
        });
        params.push(make.param(modifier, ty, &param.name));
        let value = make.name(&param.name);
        args.push(make.arg(param.mode, value));
    }

    let body = if target.return_type == Type::Void {
        make.expr_stmt(expr.clone())
    } else {
        make.return_stmt(Some(expr.clone()))
    };
    let return_type = make.spell(&target.return_type)?;
    let modifiers = if target.is_static {
        Modifiers::new(vec![Modifier::Static])
    } else {
        Modifiers::default()
    };
    let mut method = make.method(modifiers, return_type, name, params, vec![body]);
    method.type_params = target.type_params.clone();
    method.constraints = target.constraints.clone();

    let type_args = target
        .type_params
        .iter()
        .map(|param| make.type_named(&param.name.text))
        .collect();
    let callee = make.generic_name(name, type_args);
    let call = make.call(callee, args);

    let mut rewriter = Extract {
        target,
        call: Some(call),
        method: Some(Member::Method(method)),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct Extract<'t> {
    target: &'t Target,
    call: Option<Expr>,
    method: Option<Member>,
}

impl Rewriter for Extract<'_> {
    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        if expr.id == self.target.expr {
            if let Some(call) = self.call.take() {
                return Step::Replace(call);
            }
        }
        Step::Descend
    }

    fn finish_type(&mut self, original: &TypeDecl, decl: &mut TypeDecl, _path: &[Ancestor]) {
        if original.id == self.target.type_decl {
            decl.members.extend(self.method.take());
        }
    }
}
