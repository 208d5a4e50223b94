//! Inline Method: replaces a call by the single returned expression of the
//! called method, with arguments substituted for parameters.

use std::collections::HashMap;

use sharpen_semantic::{FlowRegion, SemanticOracle, SymbolId, SymbolKind, Type};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{parent_kind, substitute};
use crate::make::{can_spell, Make};
use crate::rewrite::{rewrite_expr, rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "inline-method";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) call: NodeId,
    method: SymbolId,
    decl_file: FileId,
    decl: NodeId,
}

/// The invocation whose method name covers `span`.
fn select<'a>(ctx: &Context<'a>, span: TextRange) -> Option<(&'a Expr, &'a Invocation)> {
    let mut found = None;
    for node in ctx.doc.root().preorder() {
        let Some(expr @ Expr {
            kind: ExprKind::Call(call),
            ..
        }) = node.as_expr()
        else {
            continue;
        };
        let name = match &call.callee.kind {
            ExprKind::Name(name) => &name.ident,
            ExprKind::Member(access) => &access.name,
            _ => continue,
        };
        let Some(range) = ctx.range(name.id) else {
            continue;
        };
        if range.start <= span.start && span.end <= range.end {
            found = Some((expr, call));
        }
    }
    found
}

/// The method declaration of `method` and its single `return` statement.
fn single_return<'o>(
    oracle: &'o dyn SemanticOracle,
    method: SymbolId,
) -> Option<(FileId, &'o MethodDecl, &'o Stmt, &'o Expr)> {
    let location = oracle.locate_declaration(method)?;
    let doc = oracle.document(&location.file)?;
    let Some(NodeRef::Method(decl)) = doc.node(location.node) else {
        return None;
    };
    let body = decl.body.as_ref()?;
    let [stmt] = body.stmts.as_slice() else {
        return None;
    };
    let StmtKind::Return(Some(value)) = &stmt.kind else {
        return None;
    };
    Some((location.file, decl, stmt, value))
}

/// Expressions that still do something when their value is discarded.
fn is_independent(expr: &Expr) -> bool {
    matches!(
        expr.unparenthesized().kind,
        ExprKind::Assign(..)
            | ExprKind::Call(_)
            | ExprKind::New(_)
            | ExprKind::Postfix(..)
            | ExprKind::Unary(UnaryOp::PreInc | UnaryOp::PreDec, _)
    )
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let (expr, call) = select(ctx, span)?;
    let Some(method) = ctx.symbol_at(expr.id) else {
        return reject(NAME, "invocation does not resolve");
    };
    let symbol = ctx.symbol(method)?;
    if symbol.kind != SymbolKind::Method {
        return reject(NAME, "callee is not a method");
    }
    if symbol.flags.is_polymorphic() {
        return reject(NAME, "method takes part in dynamic dispatch");
    }
    if let ExprKind::Member(access) = &call.callee.kind {
        if !symbol.flags.is_static && !matches!(access.receiver.kind, ExprKind::This) {
            return reject(NAME, "instance method called through another receiver");
        }
    }
    let Some((decl_file, decl, stmt, value)) = single_return(ctx.oracle, method) else {
        return reject(NAME, "method is not a single return statement in source");
    };
    if decl.explicit_interface.is_some() {
        return reject(NAME, "method is an explicit interface implementation");
    }

    let path = ctx.path_to(expr.id)?;
    let parent = path.len().checked_sub(2).map(|idx| path[idx]);
    if let Some(NodeRef::Stmt(Stmt {
        kind: StmtKind::Expr(_),
        ..
    })) = parent
    {
        if !is_independent(value) {
            return reject(NAME, "returned expression would be discarded");
        }
    }

    let Some(flow) = ctx
        .oracle
        .analyze_data_flow(&decl_file, FlowRegion::statement(stmt.id))
    else {
        return reject(NAME, "no data flow for method body");
    };
    let writes_by_value = symbol.params.iter().any(|param| {
        flow.written_inside.contains(param)
            && ctx
                .symbol(*param)
                .is_some_and(|param| !param.is_by_ref_param())
    });
    if writes_by_value {
        return reject(NAME, "method assigns a by-value parameter");
    }

    Some(Target {
        call: expr.id,
        method,
        decl_file,
        decl: decl.id,
    })
}

pub(crate) fn describe(ctx: &Context<'_>, target: &Target) -> String {
    let name = ctx.oracle.symbol_name(target.method).unwrap_or_default();
    format!("Inline method `{name}'")
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let call = match ctx.node(target.call).and_then(NodeRef::as_expr) {
        Some(Expr {
            kind: ExprKind::Call(call),
            ..
        }) => call,
        _ => return Err(RewriteError::MissingNode(target.call).into()),
    };
    let symbol = ctx
        .symbol(target.method)
        .ok_or_else(|| RefactorError::MissingDeclaration(target.method.0.to_string()))?;
    let (decl_file, decl, _, value) = single_return(ctx.oracle, target.method)
        .ok_or_else(|| RefactorError::MissingDeclaration(symbol.name.clone()))?;
    if decl.id != target.decl {
        return Err(RewriteError::MissingNode(target.decl).into());
    }
    let decl_doc = ctx.document(&decl_file)?;
    let mut make = Make::new(ctx.ids());

    let mut types: HashMap<SymbolId, TypeRef> = HashMap::new();
    let explicit = match &call.callee.kind {
        ExprKind::Name(name) => name.type_args.as_slice(),
        ExprKind::Member(access) => access.type_args.as_slice(),
        _ => &[],
    };
    for (param, arg) in decl.type_params.iter().zip(explicit) {
        if let Some(param) = ctx.oracle.resolve_symbol(&decl_file, param.id) {
            types.insert(param, arg.clone());
        }
    }

    let mut values: HashMap<SymbolId, (Expr, Option<TypeRef>)> = HashMap::new();
    for arg in &call.args {
        let Some(param) = ctx.symbol_at(arg.id) else {
            continue;
        };
        let Some(param_symbol) = ctx.symbol(param) else {
            continue;
        };
        let arg_ty = ctx.type_of(arg.value.id).map(|info| info.static_type);
        let cast_to = match (&param_symbol.ty, arg_ty) {
            (Type::TypeParam { symbol, .. }, Some(arg_ty)) => {
                if !types.contains_key(symbol) {
                    if let Some(spelled) = make.type_ref(&arg_ty) {
                        types.insert(*symbol, spelled);
                    }
                }
                None
            }
            (declared, Some(arg_ty)) if *declared != arg_ty && can_spell(declared) => {
                make.type_ref(declared)
            }
            _ => None,
        };
        values.insert(param, (arg.value.clone(), cast_to));
    }
    for param in &decl.params {
        let Some(param_symbol) = ctx.oracle.resolve_symbol(&decl_file, param.id) else {
            continue;
        };
        if values.contains_key(&param_symbol) {
            continue;
        }
        if let Some(default) = &param.default {
            values.insert(param_symbol, (default.clone(), None));
        }
    }

    let mut bind = Bind {
        oracle: ctx.oracle,
        file: &decl_file,
        make: &mut make,
        values: &values,
        types: &types,
    };
    let body = rewrite_expr(value, &mut bind, cancel)?;

    let return_cast = match (&symbol.ty, ctx.oracle.type_of(&decl_file, value.id)) {
        (Type::TypeParam { .. }, _) => None,
        (_, Some(info)) if matches!(info.static_type, Type::Unknown) => None,
        (declared, Some(info)) if *declared != info.static_type && can_spell(declared) => {
            make.type_ref(declared)
        }
        _ => None,
    };
    tracing::debug!(
        method = %symbol.name,
        file = %decl_doc.file,
        substituted = values.len(),
        "inlining method body"
    );

    let mut rewriter = Inline {
        call: target.call,
        make,
        body: Some(body),
        cast: return_cast,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

/// Substitutes arguments for parameters and type arguments for type
/// parameters in the returned expression.
struct Bind<'a> {
    oracle: &'a dyn SemanticOracle,
    file: &'a FileId,
    make: &'a mut Make,
    values: &'a HashMap<SymbolId, (Expr, Option<TypeRef>)>,
    types: &'a HashMap<SymbolId, TypeRef>,
}

impl Rewriter for Bind<'_> {
    fn expr(&mut self, expr: &Expr, path: &[Ancestor]) -> Step<Expr> {
        if !matches!(expr.kind, ExprKind::Name(_)) {
            return Step::Descend;
        }
        let value = self
            .oracle
            .resolve_symbol(self.file, expr.id)
            .and_then(|symbol| self.values.get(&symbol));
        match value {
            Some((value, cast_to)) => Step::Replace(substitute(
                self.make,
                value.clone(),
                cast_to.clone(),
                parent_kind(path),
            )),
            None => Step::Descend,
        }
    }

    fn type_ref(&mut self, ty: &TypeRef, _path: &[Ancestor]) -> Step<TypeRef> {
        let replacement = self
            .oracle
            .resolve_symbol(self.file, ty.id)
            .and_then(|symbol| self.types.get(&symbol));
        match replacement {
            Some(replacement) => Step::Replace(replacement.clone()),
            None => Step::Descend,
        }
    }
}

struct Inline {
    call: NodeId,
    make: Make,
    body: Option<Expr>,
    cast: Option<TypeRef>,
}

impl Rewriter for Inline {
    fn expr(&mut self, expr: &Expr, path: &[Ancestor]) -> Step<Expr> {
        if expr.id != self.call {
            return Step::Descend;
        }
        match self.body.take() {
            Some(body) => Step::Replace(substitute(&mut self.make, body, self.cast.take(), parent_kind(path))),
            None => Step::Descend,
        }
    }
}
