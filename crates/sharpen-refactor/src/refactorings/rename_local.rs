//! Rename Local: gives a local variable the configured new name, qualifying
//! member references that the new name would otherwise shadow.

use std::collections::BTreeMap;

use sharpen_semantic::{SymbolId, SymbolKind};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{enclosing_member, references_by_file, RenameIdents};
use crate::make::Make;
use crate::refactorings::rename_parameter::declares;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::Changes;

const NAME: &str = "rename-local";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) local: SymbolId,
    /// The member whose body declares the local.
    scope: NodeId,
    name: String,
}

fn covers(range: TextRange, span: TextRange) -> bool {
    range.start <= span.start && span.end <= range.end
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let site = ctx.doc.root().preorder().find_map(|node| {
        let ident = match node {
            NodeRef::Declarator(decl) => decl.name.id,
            NodeRef::Expr(Expr {
                id,
                kind: ExprKind::Name(_),
            }) => *id,
            _ => return None,
        };
        ctx.range(ident)
            .filter(|range| covers(*range, span))
            .map(|_| node.id())
    })?;
    let local = ctx.symbol_at(site)?;
    let symbol = ctx.symbol(local)?;
    if symbol.kind != SymbolKind::Local {
        return None;
    }
    let path = ctx.path_to(site)?;
    let scope = enclosing_member(&path)?;
    let new_name = ctx.names.renamed_local.as_str();
    if symbol.name == new_name {
        return None;
    }
    let start = ctx.range(site)?.start;
    let visible = ctx
        .oracle
        .lookup_visible(ctx.file, start, new_name, None)
        .into_iter()
        .filter_map(|other| ctx.symbol(other))
        .any(|other| other.id != local && other.kind.is_variable());
    if visible || declares(scope, new_name) {
        return reject(NAME, "a local or parameter already has the new name");
    }
    Some(Target {
        local,
        scope: scope.id(),
        name: symbol.name.clone(),
    })
}

pub(crate) fn describe(ctx: &Context<'_>, target: &Target) -> String {
    format!(
        "Rename local variable `{}' to `{}'",
        target.name, ctx.names.renamed_local
    )
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let scope = ctx
        .node(target.scope)
        .ok_or(RewriteError::MissingNode(target.scope))?;
    let new_name = ctx.names.renamed_local.as_str();

    // Unqualified member references spelled like the new name, with the
    // qualifier each needs: the type for static members, else `this`.
    let mut shadowed = BTreeMap::new();
    for node in scope.preorder() {
        let NodeRef::Expr(expr) = node else {
            continue;
        };
        let ExprKind::Name(name) = &expr.kind else {
            continue;
        };
        if name.ident.text != new_name {
            continue;
        }
        let Some(member) = ctx.symbol_at(expr.id).and_then(|id| ctx.symbol(id)) else {
            continue;
        };
        if !member.kind.is_member() {
            continue;
        }
        let owner = member
            .flags
            .is_static
            .then(|| member.container.and_then(|ty| ctx.oracle.symbol_name(ty)))
            .flatten()
            .map(str::to_string);
        shadowed.insert(expr.id, owner);
    }
    if !shadowed.is_empty() {
        tracing::debug!(count = shadowed.len(), "qualifying shadowed member references");
    }

    let references = references_by_file(ctx.oracle, target.local);
    let mut rewriter = RenameLocal {
        rename: RenameIdents {
            idents: references.get(ctx.file),
            to: new_name,
        },
        shadowed,
        make: Make::new(ctx.ids()),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct RenameLocal<'t> {
    rename: RenameIdents<'t>,
    /// Name expressions to qualify, with the static owner type if any.
    shadowed: BTreeMap<NodeId, Option<String>>,
    make: Make,
}

impl Rewriter for RenameLocal<'_> {
    fn ident(&mut self, ident: &Ident, path: &[Ancestor]) -> Option<String> {
        self.rename.ident(ident, path)
    }

    fn expr(&mut self, expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        let Some(owner) = self.shadowed.get(&expr.id) else {
            return Step::Descend;
        };
        let ExprKind::Name(name) = &expr.kind else {
            return Step::Descend;
        };
        let receiver = match owner {
            Some(ty) => self.make.name(ty),
            None => self.make.this(),
        };
        Step::Replace(Expr::new(
            expr.id,
            ExprKind::Member(MemberAccess {
                receiver: Box::new(receiver),
                name: name.ident.clone(),
                type_args: name.type_args.clone(),
            }),
        ))
    }
}
