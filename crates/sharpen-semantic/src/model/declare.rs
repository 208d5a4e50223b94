use sharpen_syntax::{
    Document, FileId, Item, Member, Modifier, Param, TypeDecl, TypeKind, TypeRef, TypeRefKind,
};

use super::{FileFacts, Tables};
use crate::symbol::{DeclLocation, Symbol, SymbolFlags, SymbolId, SymbolKind};
use crate::types::Type;

/// Type parameters in scope, innermost last.
pub(super) type TypeScope = Vec<(String, SymbolId)>;

pub(super) fn new_symbol(kind: SymbolKind, name: impl Into<String>, ty: Type) -> Symbol {
    Symbol {
        id: SymbolId(0),
        kind,
        name: name.into(),
        ty,
        container: None,
        param_mode: None,
        ordinal: None,
        flags: SymbolFlags::default(),
        params: Vec::new(),
        type_kind: None,
        declaration: None,
    }
}

fn located(mut symbol: Symbol, file: &FileId, node: sharpen_syntax::NodeId) -> Symbol {
    symbol.declaration = Some(DeclLocation {
        file: file.clone(),
        node,
    });
    symbol
}

pub(super) fn type_decls(items: &[Item]) -> Vec<&TypeDecl> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Item::Namespace(ns) => out.extend(type_decls(&ns.items)),
            Item::Type(decl) => out.push(decl),
        }
    }
    out
}

// ---- pass 1: types -------------------------------------------------------

pub(super) fn declare_types(tables: &mut Tables, facts: &mut FileFacts, doc: &Document) {
    for decl in type_decls(&doc.unit().items) {
        declare_type(tables, facts, &doc.file, decl, None);
    }
}

fn declare_type(
    tables: &mut Tables,
    facts: &mut FileFacts,
    file: &FileId,
    decl: &TypeDecl,
    outer: Option<SymbolId>,
) {
    let mut symbol = located(
        new_symbol(SymbolKind::Type, decl.name.text.clone(), Type::Unknown),
        file,
        decl.id,
    );
    symbol.container = outer;
    symbol.type_kind = Some(decl.kind);
    symbol.flags = SymbolFlags::from_modifiers(&decl.modifiers);
    let id = tables.alloc(symbol);
    facts.bind(decl.id, id);
    facts.bind_ident(decl.name.id, id, true);

    let mut params = Vec::new();
    for tp in &decl.type_params {
        let param = declare_type_param(tables, facts, file, tp, id);
        params.push(param);
    }
    let args = params
        .iter()
        .filter_map(|param| tables.get(*param).map(|s| s.ty.clone()))
        .collect();
    let ty = Type::Named {
        name: decl.name.text.clone(),
        symbol: Some(id),
        args,
    };
    tables.symbols[id.0 as usize].ty = ty.clone();
    tables.type_params.insert(id, params);

    let mut receiver = new_symbol(SymbolKind::Receiver, "this", ty);
    receiver.container = Some(id);
    let receiver = tables.alloc(receiver);
    tables.receivers.insert(id, receiver);
    tables
        .types_by_name
        .entry(decl.name.text.clone())
        .or_default()
        .push(id);

    for member in &decl.members {
        match member {
            Member::Type(nested) => declare_type(tables, facts, file, nested, Some(id)),
            Member::Delegate(delegate) => {
                let mut symbol = located(
                    new_symbol(SymbolKind::Type, delegate.name.text.clone(), Type::Unknown),
                    file,
                    delegate.id,
                );
                symbol.container = Some(id);
                symbol.flags = SymbolFlags::from_modifiers(&delegate.modifiers);
                let delegate_id = tables.alloc(symbol);
                tables.symbols[delegate_id.0 as usize].ty = Type::Named {
                    name: delegate.name.text.clone(),
                    symbol: Some(delegate_id),
                    args: Vec::new(),
                };
                facts.bind(delegate.id, delegate_id);
                facts.bind_ident(delegate.name.id, delegate_id, true);
                tables
                    .types_by_name
                    .entry(delegate.name.text.clone())
                    .or_default()
                    .push(delegate_id);
                tables.members.entry(id).or_default().push(delegate_id);
            }
            _ => {}
        }
    }
}

fn declare_type_param(
    tables: &mut Tables,
    facts: &mut FileFacts,
    file: &FileId,
    tp: &sharpen_syntax::TypeParam,
    owner: SymbolId,
) -> SymbolId {
    let mut symbol = located(
        new_symbol(SymbolKind::TypeParameter, tp.name.text.clone(), Type::Unknown),
        file,
        tp.id,
    );
    symbol.container = Some(owner);
    let id = tables.alloc(symbol);
    tables.symbols[id.0 as usize].ty = Type::TypeParam {
        name: tp.name.text.clone(),
        symbol: id,
    };
    facts.bind(tp.id, id);
    facts.bind_ident(tp.name.id, id, true);
    id
}

// ---- pass 2: members -----------------------------------------------------

pub(super) fn declare_members(tables: &mut Tables, facts: &mut FileFacts, doc: &Document) {
    for decl in type_decls(&doc.unit().items) {
        declare_type_members(tables, facts, &doc.file, decl, &TypeScope::new());
    }
}

pub(super) fn scope_of(tables: &Tables, owner: SymbolId, outer: &TypeScope) -> TypeScope {
    let mut scope = outer.clone();
    if let Some(params) = tables.type_params.get(&owner) {
        for param in params {
            if let Some(symbol) = tables.get(*param) {
                scope.push((symbol.name.clone(), *param));
            }
        }
    }
    scope
}

fn declare_type_members(
    tables: &mut Tables,
    facts: &mut FileFacts,
    file: &FileId,
    decl: &TypeDecl,
    outer: &TypeScope,
) {
    let Some(type_id) = facts.bindings.get(&decl.id).copied() else {
        return;
    };
    let scope = scope_of(tables, type_id, outer);
    let bases = decl
        .bases
        .iter()
        .map(|base| resolve_type(tables, facts, base, &scope))
        .collect();
    tables.bases.insert(type_id, bases);
    let is_interface = decl.kind == TypeKind::Interface;

    for member in &decl.members {
        let mut flags = SymbolFlags::from_modifiers(member.modifiers());
        if is_interface {
            flags.is_abstract = true;
            flags.access = Some(Modifier::Public);
        }
        match member {
            Member::Field(field) => {
                let ty = resolve_type(tables, facts, &field.ty, &scope);
                for (idx, declarator) in field.declarators.iter().enumerate() {
                    let mut symbol = located(
                        new_symbol(SymbolKind::Field, declarator.name.text.clone(), ty.clone()),
                        file,
                        declarator.id,
                    );
                    symbol.container = Some(type_id);
                    symbol.flags = flags;
                    let id = tables.alloc(symbol);
                    facts.bind(declarator.id, id);
                    facts.bind_ident(declarator.name.id, id, true);
                    if idx == 0 {
                        facts.bind(field.id, id);
                    }
                    tables.members.entry(type_id).or_default().push(id);
                }
            }
            Member::Method(method) => {
                let mut symbol = located(
                    new_symbol(SymbolKind::Method, method.name.text.clone(), Type::Unknown),
                    file,
                    method.id,
                );
                symbol.container = Some(type_id);
                flags.is_explicit_impl = method.explicit_interface.is_some();
                symbol.flags = flags;
                let id = tables.alloc(symbol);
                let mut type_params = Vec::new();
                for tp in &method.type_params {
                    type_params.push(declare_type_param(tables, facts, file, tp, id));
                }
                tables.type_params.insert(id, type_params);
                let method_scope = scope_of(tables, id, &scope);
                let ret = resolve_type(tables, facts, &method.return_type, &method_scope);
                if let Some(iface) = &method.explicit_interface {
                    resolve_type(tables, facts, iface, &method_scope);
                }
                for constraint in &method.constraints {
                    bind_constraint(tables, facts, constraint, &method_scope);
                }
                let params = declare_params(tables, facts, file, id, &method.params, &method_scope);
                let symbol = &mut tables.symbols[id.0 as usize];
                symbol.ty = ret;
                symbol.params = params;
                facts.bind(method.id, id);
                facts.bind_ident(method.name.id, id, true);
                tables.members.entry(type_id).or_default().push(id);
            }
            Member::Constructor(ctor) => {
                let ty = tables
                    .get(type_id)
                    .map(|s| s.ty.clone())
                    .unwrap_or(Type::Unknown);
                let mut symbol = located(
                    new_symbol(SymbolKind::Constructor, ctor.name.text.clone(), ty),
                    file,
                    ctor.id,
                );
                symbol.container = Some(type_id);
                symbol.flags = flags;
                let id = tables.alloc(symbol);
                let params = declare_params(tables, facts, file, id, &ctor.params, &scope);
                tables.symbols[id.0 as usize].params = params;
                facts.bind(ctor.id, id);
                facts.bind_ident(ctor.name.id, id, true);
                tables.members.entry(type_id).or_default().push(id);
            }
            Member::Property(prop) => {
                let ty = resolve_type(tables, facts, &prop.ty, &scope);
                if let Some(iface) = &prop.explicit_interface {
                    resolve_type(tables, facts, iface, &scope);
                }
                let mut symbol = located(
                    new_symbol(SymbolKind::Property, prop.name.text.clone(), ty),
                    file,
                    prop.id,
                );
                symbol.container = Some(type_id);
                flags.is_explicit_impl = prop.explicit_interface.is_some();
                symbol.flags = flags;
                let id = tables.alloc(symbol);
                facts.bind(prop.id, id);
                facts.bind_ident(prop.name.id, id, true);
                tables.members.entry(type_id).or_default().push(id);
            }
            Member::Operator(op) => {
                let ret = resolve_type(tables, facts, &op.return_type, &scope);
                let mut symbol = located(
                    new_symbol(SymbolKind::Method, format!("operator {}", op.op), ret),
                    file,
                    op.id,
                );
                symbol.container = Some(type_id);
                symbol.flags = flags;
                let id = tables.alloc(symbol);
                let params = declare_params(tables, facts, file, id, &op.params, &scope);
                tables.symbols[id.0 as usize].params = params;
                facts.bind(op.id, id);
                tables.members.entry(type_id).or_default().push(id);
            }
            Member::Conversion(conv) => {
                let target = resolve_type(tables, facts, &conv.target, &scope);
                let keyword = if conv.implicit { "implicit" } else { "explicit" };
                let mut symbol = located(
                    new_symbol(SymbolKind::Method, format!("{keyword} operator"), target),
                    file,
                    conv.id,
                );
                symbol.container = Some(type_id);
                symbol.flags = flags;
                let id = tables.alloc(symbol);
                let params = declare_params(tables, facts, file, id, &conv.params, &scope);
                tables.symbols[id.0 as usize].params = params;
                facts.bind(conv.id, id);
                tables.members.entry(type_id).or_default().push(id);
            }
            Member::Delegate(delegate) => {
                if let Some(id) = facts.bindings.get(&delegate.id).copied() {
                    // The symbol's type is the delegate type itself, so the
                    // return type is only resolved for its bindings.
                    resolve_type(tables, facts, &delegate.return_type, &scope);
                    let params = declare_params(tables, facts, file, id, &delegate.params, &scope);
                    tables.symbols[id.0 as usize].params = params;
                }
            }
            Member::Type(nested) => declare_type_members(tables, facts, file, nested, &scope),
        }
    }
    for constraint in &decl.constraints {
        bind_constraint(tables, facts, constraint, &scope);
    }
}

fn bind_constraint(
    tables: &Tables,
    facts: &mut FileFacts,
    constraint: &sharpen_syntax::Constraint,
    scope: &TypeScope,
) {
    if let Some((_, param)) = scope
        .iter()
        .rev()
        .find(|(name, _)| *name == constraint.param.text)
    {
        facts.bind_ident(constraint.param.id, *param, false);
    }
    for bound in &constraint.bounds {
        if let sharpen_syntax::ConstraintBound::Type(ty) = bound {
            resolve_type(tables, facts, ty, scope);
        }
    }
}

pub(super) fn declare_params(
    tables: &mut Tables,
    facts: &mut FileFacts,
    file: &FileId,
    owner: SymbolId,
    params: &[Param],
    scope: &TypeScope,
) -> Vec<SymbolId> {
    let mut out = Vec::with_capacity(params.len());
    for (ordinal, param) in params.iter().enumerate() {
        let ty = resolve_type(tables, facts, &param.ty, scope);
        let mut symbol = located(
            new_symbol(SymbolKind::Parameter, param.name.text.clone(), ty),
            file,
            param.id,
        );
        symbol.container = Some(owner);
        symbol.param_mode = param.modifier;
        symbol.ordinal = Some(ordinal);
        let id = tables.alloc(symbol);
        if param.default.is_some() {
            tables.optional.insert(id);
        }
        facts.bind(param.id, id);
        facts.bind_ident(param.name.id, id, true);
        out.push(id);
    }
    out
}

pub(super) fn lookup_type(tables: &Tables, name: &str, arity: usize) -> Option<SymbolId> {
    let candidates = tables.types_by_name.get(name)?;
    candidates
        .iter()
        .copied()
        .find(|ty| tables.type_params.get(ty).map_or(0, Vec::len) == arity)
        .or_else(|| candidates.first().copied())
}

/// Resolves a type reference, recording bindings for its identifiers.
pub(super) fn resolve_type(
    tables: &Tables,
    facts: &mut FileFacts,
    ty: &TypeRef,
    scope: &TypeScope,
) -> Type {
    match &ty.kind {
        TypeRefKind::Predefined(predefined) => Type::from_predefined(*predefined),
        TypeRefKind::Array(element) => {
            Type::Array(Box::new(resolve_type(tables, facts, element, scope)))
        }
        TypeRefKind::Named(segments) => {
            let Some(last) = segments.last() else {
                return Type::Unknown;
            };
            for segment in &segments[..segments.len() - 1] {
                for arg in &segment.args {
                    resolve_type(tables, facts, arg, scope);
                }
            }
            let args: Vec<Type> = last
                .args
                .iter()
                .map(|arg| resolve_type(tables, facts, arg, scope))
                .collect();
            if segments.len() == 1 && args.is_empty() {
                if let Some((_, param)) = scope.iter().rev().find(|(name, _)| *name == last.name.text)
                {
                    facts.bind(ty.id, *param);
                    facts.bind_ident(last.name.id, *param, false);
                    return Type::TypeParam {
                        name: last.name.text.clone(),
                        symbol: *param,
                    };
                }
            }
            if let Some(symbol) = lookup_type(tables, &last.name.text, args.len()) {
                facts.bind(ty.id, symbol);
                facts.bind_ident(last.name.id, symbol, false);
                return Type::Named {
                    name: last.name.text.clone(),
                    symbol: Some(symbol),
                    args,
                };
            }
            let name = segments
                .iter()
                .map(|segment| segment.name.text.as_str())
                .collect::<Vec<_>>()
                .join(".");
            Type::Named {
                name,
                symbol: None,
                args,
            }
        }
    }
}
