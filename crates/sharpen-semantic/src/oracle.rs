use std::collections::BTreeSet;

use sharpen_syntax::{Document, FileId, NodeId, TextRange};

use crate::symbol::{DeclLocation, Symbol, SymbolId};
use crate::types::Type;

/// Static type of an expression and the type it is implicitly converted to
/// by its context.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeInfo {
    pub static_type: Type,
    /// Equal to `static_type` when the context imposes no conversion.
    pub converted_type: Type,
}

impl TypeInfo {
    pub fn same(ty: Type) -> Self {
        TypeInfo {
            static_type: ty.clone(),
            converted_type: ty,
        }
    }
}

/// Region for data-flow analysis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowRegion {
    Expr(NodeId),
    /// An inclusive range of sibling statements.
    Statements { first: NodeId, last: NodeId },
}

impl FlowRegion {
    pub fn statement(id: NodeId) -> Self {
        FlowRegion::Statements {
            first: id,
            last: id,
        }
    }
}

/// Read/write summaries for a region. Sets iterate in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataFlowFacts {
    pub read_inside: BTreeSet<SymbolId>,
    pub written_inside: BTreeSet<SymbolId>,
    pub read_outside: BTreeSet<SymbolId>,
    pub written_outside: BTreeSet<SymbolId>,
}

/// A resolved identifier occurrence.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reference {
    pub file: FileId,
    /// The identifier node.
    pub ident: NodeId,
    pub range: TextRange,
    /// `true` for the name in the symbol's own declaration.
    pub is_declaration: bool,
}

/// Everything the refactoring core needs to know about the meaning of a
/// program.
///
/// The reference implementation is [`crate::SemanticModel`]; hosts with their
/// own compiler front end implement this trait over it instead.
pub trait SemanticOracle {
    fn files(&self) -> Vec<FileId>;

    fn document(&self, file: &FileId) -> Option<&Document>;

    fn symbol(&self, id: SymbolId) -> Option<&Symbol>;

    /// Symbol a node refers to or declares.
    ///
    /// Accepts identifier nodes, name/member-access/invocation/object-creation
    /// expressions, type references and declaration nodes.
    fn resolve_symbol(&self, file: &FileId, node: NodeId) -> Option<SymbolId>;

    fn type_of(&self, file: &FileId, expr: NodeId) -> Option<TypeInfo>;

    fn analyze_data_flow(&self, file: &FileId, region: FlowRegion) -> Option<DataFlowFacts>;

    /// Symbols named `name` visible at `position`: locals and parameters in
    /// scope there, plus members of `container` and its base types.
    fn lookup_visible(
        &self,
        file: &FileId,
        position: usize,
        name: &str,
        container: Option<SymbolId>,
    ) -> Vec<SymbolId>;

    /// Declaring node of a source symbol; `None` for predefined or metadata
    /// symbols.
    fn locate_declaration(&self, symbol: SymbolId) -> Option<DeclLocation>;

    /// Members of a type in declaration order (not including inherited ones).
    fn members(&self, ty: SymbolId) -> Vec<SymbolId>;

    /// Source base types of a type, in base-list order.
    fn base_types(&self, ty: SymbolId) -> Vec<SymbolId>;

    /// Every identifier bound to `symbol`, ordered by file and position.
    fn references(&self, symbol: SymbolId) -> Vec<Reference>;

    /// Whether `from` implicitly converts to `to`.
    fn converts(&self, from: &Type, to: &Type) -> bool {
        from.converts_builtin(to)
    }

    fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.symbol(id).map(|symbol| symbol.name.as_str())
    }
}
