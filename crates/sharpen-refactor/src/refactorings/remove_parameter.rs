//! Remove Parameter: drops a parameter the body never uses, together with
//! the matching argument at every call site.

use sharpen_semantic::{FlowRegion, SymbolId};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::RefactorError;
use crate::refactorings::introduce_parameter_object::owned_params;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "remove-parameter";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) param: SymbolId,
    decl: NodeId,
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
    if matches!(param.modifier, Some(modifier) if modifier.is_by_ref()) {
        return reject(NAME, "ref and out parameters are not removed");
    }
    let (body, initializer) = match owner {
        NodeRef::Method(decl) => (decl.body.as_ref(), None),
        NodeRef::Constructor(decl) => (decl.body.as_ref(), decl.initializer.as_ref()),
        _ => return None,
    };
    let Some(body) = body else {
        return reject(NAME, "declaration has no body");
    };
    let callable = ctx.symbol(ctx.symbol_at(owner.id())?)?;
    if callable.flags.is_override || callable.flags.is_explicit_impl {
        return reject(NAME, "parameter is part of an inherited signature");
    }
    let symbol = ctx.symbol_at(param.id)?;
    if let (Some(first), Some(last)) = (body.stmts.first(), body.stmts.last()) {
        let region = FlowRegion::Statements {
            first: first.id,
            last: last.id,
        };
        let facts = ctx.oracle.analyze_data_flow(ctx.file, region)?;
        if facts.read_inside.contains(&symbol) || facts.written_inside.contains(&symbol) {
            return reject(NAME, "parameter is used in the body");
        }
    }
    let used_by_initializer = initializer.is_some_and(|init| {
        init.args.iter().any(|arg| {
            NodeRef::Expr(&arg.value)
                .preorder()
                .any(|node| ctx.symbol_at(node.id()) == Some(symbol))
        })
    });
    if used_by_initializer {
        return reject(NAME, "parameter is passed to the chained constructor");
    }
    Some(Target {
        param: symbol,
        decl: param.id,
        name: param.name.text.clone(),
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, target: &Target) -> String {
    format!("Remove parameter `{}'", target.name)
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let mut rewriter = RemoveParameter { ctx, target };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct RemoveParameter<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
}

impl Rewriter for RemoveParameter<'_, '_> {
    fn param(&mut self, param: &Param, _path: &[Ancestor]) -> Step<Param> {
        if param.id == self.target.decl {
            Step::Remove
        } else {
            Step::Descend
        }
    }

    // Arguments are bound to parameters by name when named, else by
    // position, so a named argument for another parameter never matches.
    fn arg(&mut self, arg: &Arg, _path: &[Ancestor]) -> Step<Arg> {
        if self.ctx.symbol_at(arg.id) == Some(self.target.param) {
            Step::Remove
        } else {
            Step::Descend
        }
    }
}
