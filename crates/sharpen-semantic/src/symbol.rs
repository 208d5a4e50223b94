use serde::{Deserialize, Serialize};
use sharpen_syntax::{FileId, Modifier, Modifiers, NodeId, ParamModifier, TypeKind};

use crate::types::Type;

/// Identity of a declaration.
///
/// Ids are handed out in declaration order (types and members first, then
/// locals in source order), so sorting by id sorts by declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Method,
    Property,
    Constructor,
    Type,
    TypeParameter,
    /// The implicit `this` of a type.
    Receiver,
}

impl SymbolKind {
    /// Locals and parameters: the symbols data-flow analysis tracks by name.
    pub fn is_variable(self) -> bool {
        matches!(self, SymbolKind::Local | SymbolKind::Parameter)
    }

    pub fn is_member(self) -> bool {
        matches!(
            self,
            SymbolKind::Field | SymbolKind::Method | SymbolKind::Property | SymbolKind::Constructor
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolFlags {
    pub is_static: bool,
    pub is_const: bool,
    pub is_readonly: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_abstract: bool,
    pub is_explicit_impl: bool,
    pub access: Option<Modifier>,
}

impl SymbolFlags {
    pub fn from_modifiers(modifiers: &Modifiers) -> Self {
        SymbolFlags {
            is_static: modifiers.is_static(),
            is_const: modifiers.has(Modifier::Const),
            is_readonly: modifiers.has(Modifier::Readonly),
            is_virtual: modifiers.has(Modifier::Virtual),
            is_override: modifiers.has(Modifier::Override),
            is_abstract: modifiers.has(Modifier::Abstract),
            is_explicit_impl: false,
            access: modifiers.iter().find(|m| m.is_access()),
        }
    }

    /// Members that take part in dynamic dispatch.
    pub fn is_polymorphic(&self) -> bool {
        self.is_virtual || self.is_override || self.is_abstract || self.is_explicit_impl
    }
}

/// Where a source symbol is declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclLocation {
    pub file: FileId,
    /// The declaring node: a declarator, parameter, member, type or type
    /// parameter, or the loop variable identifier of a `foreach`.
    pub node: NodeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    pub name: String,
    /// Declared type; for methods the return type, for types the type itself.
    pub ty: Type,
    /// Enclosing type for members and receivers, enclosing member for locals
    /// and parameters.
    pub container: Option<SymbolId>,
    pub param_mode: Option<ParamModifier>,
    pub ordinal: Option<usize>,
    pub flags: SymbolFlags,
    /// Parameters of methods and constructors, in order.
    pub params: Vec<SymbolId>,
    pub type_kind: Option<TypeKind>,
    pub declaration: Option<DeclLocation>,
}

impl Symbol {
    pub fn is_by_ref_param(&self) -> bool {
        self.kind == SymbolKind::Parameter && self.param_mode.is_some_and(ParamModifier::is_by_ref)
    }

    pub fn in_source(&self) -> bool {
        self.declaration.is_some()
    }
}
