//! Inline Local: replaces every read of a local by its initializer and drops
//! the declaration.

use sharpen_semantic::{FlowRegion, SymbolId};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{parent_kind, substitute};
use crate::make::{can_spell, Make};
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::selection::narrowest_containing;
use crate::synth::Changes;

const NAME: &str = "inline-local";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) declarator: NodeId,
    statement: NodeId,
    local: SymbolId,
    /// Declared type to convert the initializer to at each use.
    cast: Option<sharpen_semantic::Type>,
    sole_declarator: bool,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let node = narrowest_containing(ctx.doc, span, |node| node.kind() == SyntaxKind::Declarator)?;
    let NodeRef::Declarator(declarator) = node else {
        return None;
    };
    let Some(init) = &declarator.init else {
        return reject(NAME, "local has no initializer");
    };
    let path = ctx.path_to(declarator.id)?;
    // Declarators of a local statement sit directly under the statement.
    let statement = match path.len().checked_sub(2).map(|idx| path[idx]) {
        Some(NodeRef::Stmt(stmt @ Stmt {
            kind: StmtKind::Local(decl),
            ..
        })) => (stmt, decl),
        _ => return reject(NAME, "declarator is not part of a local declaration statement"),
    };
    let (stmt, decl) = statement;
    let block = match path.len().checked_sub(3).map(|idx| path[idx]) {
        Some(NodeRef::Block(block))
        | Some(NodeRef::Stmt(Stmt {
            kind: StmtKind::Block(block),
            ..
        })) => block,
        _ => return reject(NAME, "declaration is not directly inside a block"),
    };
    let local = ctx.symbol_at(declarator.id)?;

    let flow = ctx
        .oracle
        .analyze_data_flow(ctx.file, FlowRegion::statement(stmt.id))?;
    if flow.written_outside.contains(&local) {
        return reject(NAME, "local is assigned after its declaration");
    }
    if !flow.read_outside.contains(&local) {
        return reject(NAME, "local is never read");
    }

    let last = block.stmts.last()?;
    let rest = ctx.oracle.analyze_data_flow(
        ctx.file,
        FlowRegion::Statements {
            first: stmt.id,
            last: last.id,
        },
    )?;
    let inputs = ctx
        .oracle
        .analyze_data_flow(ctx.file, FlowRegion::Expr(init.id))?;
    if inputs
        .read_inside
        .iter()
        .any(|symbol| rest.written_inside.contains(symbol))
    {
        return reject(NAME, "initializer reads a variable that is written later");
    }

    let cast = if decl.ty.is_var() {
        None
    } else {
        ctx.type_of(init.id)
            .filter(|info| info.static_type != info.converted_type)
            .map(|info| info.converted_type)
    };
    if cast.as_ref().is_some_and(|ty| !can_spell(ty)) {
        return reject(NAME, "declared type cannot be written in source");
    }

    Some(Target {
        declarator: declarator.id,
        statement: stmt.id,
        local,
        cast,
        sole_declarator: decl.declarators.len() == 1,
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, _target: &Target) -> String {
    "Inline variable".to_string()
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Declarator(declarator)) = ctx.node(target.declarator) else {
        return Err(RewriteError::MissingNode(target.declarator).into());
    };
    let init = declarator
        .init
        .clone()
        .ok_or(RewriteError::MissingNode(target.declarator))?;
    let mut make = Make::new(ctx.ids());
    let cast = target.cast.as_ref().map(|ty| make.spell(ty)).transpose()?;
    let mut rewriter = InlineLocal {
        ctx,
        target,
        make,
        init,
        cast,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct InlineLocal<'a, 't> {
    ctx: &'t Context<'a>,
    target: &'t Target,
    make: Make,
    init: Expr,
    cast: Option<TypeRef>,
}

impl Rewriter for InlineLocal<'_, '_> {
    fn stmt(&mut self, stmt: &Stmt, _path: &[Ancestor]) -> Step<Stmt> {
        if stmt.id == self.target.statement && self.target.sole_declarator {
            return Step::Remove;
        }
        Step::Descend
    }

    fn declarator(&mut self, decl: &Declarator, _path: &[Ancestor]) -> Step<Declarator> {
        if decl.id == self.target.declarator {
            return Step::Remove;
        }
        Step::Descend
    }

    fn expr(&mut self, expr: &Expr, path: &[Ancestor]) -> Step<Expr> {
        if matches!(expr.kind, ExprKind::Name(_))
            && self.ctx.symbol_at(expr.id) == Some(self.target.local)
        {
            return Step::Replace(substitute(
                &mut self.make,
                self.init.clone(),
                self.cast.clone(),
                parent_kind(path),
            ));
        }
        Step::Descend
    }
}
