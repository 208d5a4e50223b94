//! Rename Parameter: gives a parameter the configured new name, updating its
//! references and the named arguments passed for it.

use sharpen_semantic::{SymbolId, SymbolKind};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::RefactorError;
use crate::helpers::{references_by_file, RenameIdents};
use crate::refactorings::introduce_parameter_object::owned_params;
use crate::rewrite::rewrite_unit;
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "rename-parameter";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) param: SymbolId,
    name: String,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let node = narrowest_containing(ctx.doc, span, |node| matches!(node, NodeRef::Param(_)))?;
    let NodeRef::Param(param) = node else {
        return None;
    };
    let path = ctx.path_to(param.id)?;
    let owner = path.len().checked_sub(2).map(|idx| path[idx])?;
    if owned_params(owner).is_none() {
        return reject(NAME, "parameter does not belong to a method or constructor");
    }
    let symbol = ctx.symbol_at(param.id)?;
    if ctx.symbol(symbol)?.kind != SymbolKind::Parameter {
        return None;
    }
    let new_name = ctx.names.renamed_parameter.as_str();
    if param.name.text == new_name {
        return None;
    }
    if declares(owner, new_name) || visible_variable(ctx, owner, symbol, new_name) {
        return reject(NAME, "a local or parameter already has the new name");
    }
    Some(Target {
        param: symbol,
        name: param.name.text.clone(),
    })
}

/// Whether a parameter, local or lambda parameter named `name` is declared
/// anywhere inside `owner`.
pub(crate) fn declares(owner: NodeRef<'_>, name: &str) -> bool {
    owner.preorder().any(|node| match node {
        NodeRef::Param(param) => param.name.text == name,
        NodeRef::Declarator(decl) => decl.name.text == name,
        NodeRef::LambdaParam(param) => param.name.text == name,
        _ => false,
    })
}

/// Whether a local or parameter other than `symbol` named `name` is in scope
/// at the start of `owner`'s body.
fn visible_variable(ctx: &Context<'_>, owner: NodeRef<'_>, symbol: SymbolId, name: &str) -> bool {
    let body = match owner {
        NodeRef::Method(decl) => decl.body.as_ref(),
        NodeRef::Constructor(decl) => decl.body.as_ref(),
        _ => None,
    };
    let Some(position) = body.and_then(|body| ctx.range(body.id)) else {
        return false;
    };
    ctx.oracle
        .lookup_visible(ctx.file, position.start, name, None)
        .into_iter()
        .filter(|other| *other != symbol)
        .filter_map(|other| ctx.symbol(other))
        .any(|other| other.kind.is_variable())
}

pub(crate) fn describe(ctx: &Context<'_>, target: &Target) -> String {
    format!(
        "Rename parameter `{}' to `{}'",
        target.name, ctx.names.renamed_parameter
    )
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let references = references_by_file(ctx.oracle, target.param);
    let mut rewriter = RenameIdents {
        idents: references.get(ctx.file),
        to: &ctx.names.renamed_parameter,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}
