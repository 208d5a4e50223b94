//! Pull Up Field: moves a field declaration into the base class, which may
//! live in another document.

use sharpen_semantic::{DeclLocation, SymbolId};
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::enclosing_type;
use crate::make::Make;
use crate::refactorings::encapsulate_field::select;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter, Step};
use crate::synth::{synthesize, Changes};

const NAME: &str = "pull-up-field";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) field: SymbolId,
    declaration: NodeId,
    base: DeclLocation,
    base_name: String,
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let (field_decl, declarator) = select(ctx, span)?;
    let field = ctx.symbol_at(declarator.id)?;
    let path = ctx.path_to(field_decl.id)?;
    let type_decl = enclosing_type(&path)?;
    if type_decl.kind != TypeKind::Class {
        return reject(NAME, "only class fields can be pulled up");
    }
    let class = ctx.symbol_at(type_decl.id)?;
    let Some(base) = ctx.oracle.base_types(class).into_iter().find(|base| {
        ctx.symbol(*base)
            .is_some_and(|symbol| symbol.type_kind == Some(TypeKind::Class))
    }) else {
        return reject(NAME, "type has no base class");
    };
    let Some(location) = ctx.oracle.locate_declaration(base) else {
        return reject(NAME, "base class is not declared in source");
    };
    let clash = ctx.oracle.members(base).into_iter().any(|member| {
        let name = ctx.oracle.symbol_name(member);
        field_decl
            .declarators
            .iter()
            .any(|declarator| name == Some(declarator.name.text.as_str()))
    });
    if clash {
        return reject(NAME, "base class already declares a member with that name");
    }
    Some(Target {
        field,
        declaration: field_decl.id,
        base: location,
        base_name: ctx.symbol(base)?.name.clone(),
    })
}

pub(crate) fn describe(_ctx: &Context<'_>, target: &Target) -> String {
    format!("Move field to the super class `{}'", target.base_name)
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Field(field_decl)) = ctx.node(target.declaration) else {
        return Err(RewriteError::MissingNode(target.declaration).into());
    };
    let base_doc = ctx.document(&target.base.file)?;
    tracing::debug!(
        base = %target.base_name,
        file = %target.base.file,
        "pulling field up"
    );
    let moved = moved_field(
        &mut Make::new(NodeIds::starting_at(base_doc.source_map().next_id())),
        field_decl,
    );

    let mut changes = Changes::default();
    if target.base.file == *ctx.file {
        let mut rewriter = PullUp {
            target,
            remove: true,
            moved: Some(moved),
        };
        let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
        changes.insert(synthesize(ctx.doc, unit)?);
        return Ok(changes);
    }

    let mut remove = PullUp {
        target,
        remove: true,
        moved: None,
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut remove, cancel)?;
    changes.insert(synthesize(ctx.doc, unit)?);
    let mut insert = PullUp {
        target,
        remove: false,
        moved: Some(moved),
    };
    let unit = rewrite_unit(base_doc.unit(), &mut insert, cancel)?;
    changes.insert(synthesize(base_doc, unit)?);
    Ok(changes)
}

/// The declaration as it appears in the base class: `private` becomes
/// `protected`, and the declaration and its declarators get ids of the
/// receiving document.
fn moved_field(make: &mut Make, decl: &FieldDecl) -> Member {
    let modifiers = if decl.modifiers.has(Modifier::Private) {
        decl.modifiers.with_access(Modifier::Protected)
    } else {
        decl.modifiers.clone()
    };
    let declarators = decl
        .declarators
        .iter()
        .map(|declarator| Declarator {
            id: make.id(),
            name: make.ident(&declarator.name.text),
            init: declarator.init.clone(),
        })
        .collect();
    Member::Field(FieldDecl {
        id: make.id(),
        trivia: decl.trivia.clone(),
        modifiers,
        ty: decl.ty.clone(),
        declarators,
    })
}

struct PullUp<'t> {
    target: &'t Target,
    /// Whether the rewritten document is the one declaring the field; node
    /// ids are only unique within a document.
    remove: bool,
    /// Appended to the base class when it is in the rewritten document.
    moved: Option<Member>,
}

impl Rewriter for PullUp<'_> {
    fn member(&mut self, member: &Member, _path: &[Ancestor]) -> Step<Member> {
        if self.remove && member.id() == self.target.declaration {
            Step::Remove
        } else {
            Step::Descend
        }
    }

    fn finish_type(&mut self, original: &TypeDecl, decl: &mut TypeDecl, _path: &[Ancestor]) {
        if original.id == self.target.base.node {
            decl.members.extend(self.moved.take());
        }
    }
}
