//! Encapsulate Field: makes a field private and routes every access through a
//! new read/write property.

use std::collections::BTreeSet;

use sharpen_semantic::SymbolId;
use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::context::{reject, Context};
use crate::error::{RefactorError, RewriteError};
use crate::helpers::{capitalize, references_by_file};
use crate::make::Make;
use crate::rewrite::{rewrite_unit, Ancestor, Rewriter};
use crate::synth::Changes;

const NAME: &str = "encapsulate-field";

#[derive(Clone, Debug)]
pub(crate) struct Target {
    pub(crate) field: SymbolId,
    declaration: NodeId,
    declarator: NodeId,
    type_decl: NodeId,
    property: String,
}

/// The field declarator whose name covers `span`.
pub(crate) fn select<'a>(ctx: &Context<'a>, span: TextRange) -> Option<(&'a FieldDecl, &'a Declarator)> {
    ctx.doc.root().preorder().find_map(|node| {
        let NodeRef::Field(field) = node else {
            return None;
        };
        field.declarators.iter().find_map(|declarator| {
            let range = ctx.range(declarator.name.id)?;
            (range.start <= span.start && span.end <= range.end).then_some((field, declarator))
        })
    })
}

/// Whether `block` is exactly `return <field>;`.
fn returns_field(ctx: &Context<'_>, block: Option<&Block>, field: SymbolId) -> bool {
    let Some([Stmt {
        kind: StmtKind::Return(Some(value)),
        ..
    }]) = block.map(|block| block.stmts.as_slice())
    else {
        return false;
    };
    ctx.symbol_at(value.unparenthesized().id) == Some(field)
}

pub(crate) fn check(ctx: &Context<'_>, span: TextRange) -> Option<Target> {
    let (field_decl, declarator) = select(ctx, span)?;
    if field_decl.modifiers.has(Modifier::Const) {
        return reject(NAME, "constants cannot be assigned through a property");
    }
    let field = ctx.symbol_at(declarator.id)?;
    let path = ctx.path_to(field_decl.id)?;
    let type_decl = path.iter().rev().find_map(|node| node.as_type_decl())?;
    if type_decl.kind == TypeKind::Interface {
        return None;
    }

    let has_getter = type_decl.members.iter().any(|member| match member {
        Member::Property(property) => property.accessors.iter().any(|accessor| {
            accessor.kind == AccessorKind::Get && returns_field(ctx, accessor.body.as_ref(), field)
        }),
        Member::Method(method) => returns_field(ctx, method.body.as_ref(), field),
        _ => false,
    });
    if has_getter {
        return reject(NAME, "a getter for the field already exists");
    }

    let property = format!(
        "{}{}",
        ctx.names.property_prefix,
        capitalize(&declarator.name.text)
    );
    let taken = ctx.symbol_at(type_decl.id).is_some_and(|ty| {
        ctx.oracle
            .members(ty)
            .into_iter()
            .any(|member| ctx.oracle.symbol_name(member) == Some(property.as_str()))
    });
    if taken {
        return reject(NAME, "type already has a member with the property name");
    }

    Some(Target {
        field,
        declaration: field_decl.id,
        declarator: declarator.id,
        type_decl: type_decl.id,
        property,
    })
}

pub(crate) fn describe(ctx: &Context<'_>, target: &Target) -> String {
    let name = ctx.oracle.symbol_name(target.field).unwrap_or_default();
    format!("Encapsulate field `{name}'")
}

pub(crate) fn apply(
    ctx: &Context<'_>,
    target: &Target,
    cancel: &CancellationToken,
) -> Result<Changes, RefactorError> {
    let Some(NodeRef::Field(field_decl)) = ctx.node(target.declaration) else {
        return Err(RewriteError::MissingNode(target.declaration).into());
    };
    let Some(NodeRef::Declarator(declarator)) = ctx.node(target.declarator) else {
        return Err(RewriteError::MissingNode(target.declarator).into());
    };
    let mut make = Make::new(ctx.ids());
    let field_name = declarator.name.text.as_str();

    let getter = {
        let value = make.name(field_name);
        let body = make.return_stmt(Some(value));
        make.accessor(AccessorKind::Get, Some(vec![body]))
    };
    let setter = {
        let target = make.name(field_name);
        let value = make.name("value");
        let assign = make.assign(target, value);
        let body = make.expr_stmt(assign);
        make.accessor(AccessorKind::Set, Some(vec![body]))
    };
    let mut modifiers = vec![Modifier::Public];
    if field_decl.modifiers.has(Modifier::Static) {
        modifiers.push(Modifier::Static);
    }
    let property = make.property(
        Modifiers::new(modifiers),
        field_decl.ty.clone(),
        &target.property,
        vec![getter, setter],
    );

    let references = references_by_file(ctx.oracle, target.field);
    let mut rewriter = Encapsulate {
        target,
        references: references.get(ctx.file),
        property: Some(property),
    };
    let unit = rewrite_unit(ctx.doc.unit(), &mut rewriter, cancel)?;
    ctx.finish(unit)
}

struct Encapsulate<'t> {
    target: &'t Target,
    references: Option<&'t BTreeSet<NodeId>>,
    property: Option<Member>,
}

impl Rewriter for Encapsulate<'_> {
    fn ident(&mut self, ident: &Ident, path: &[Ancestor]) -> Option<String> {
        let is_declaration = path
            .last()
            .is_some_and(|parent| parent.id == self.target.declarator);
        let is_reference = self
            .references
            .is_some_and(|references| references.contains(&ident.id));
        (is_reference && !is_declaration).then(|| self.target.property.clone())
    }

    fn finish_member(&mut self, original: &Member, member: &mut Member, _path: &[Ancestor]) {
        if original.id() != self.target.declaration {
            return;
        }
        if let Member::Field(field) = member {
            field.modifiers = field.modifiers.with_access(Modifier::Private);
        }
    }

    fn finish_type(&mut self, original: &TypeDecl, decl: &mut TypeDecl, _path: &[Ancestor]) {
        if original.id == self.target.type_decl {
            decl.members.extend(self.property.take());
        }
    }
}
