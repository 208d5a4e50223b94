//! Reference implementation of [`SemanticOracle`] over a set of parsed
//! documents.
//!
//! Construction runs three passes: declare types, declare members (with their
//! signatures), then bind every body. Bodies are bound and typed in a single
//! walk, which also records the variable accesses data-flow queries need.

mod bind;
mod declare;
mod flow;

use std::collections::{BTreeMap, HashMap, HashSet};

use sharpen_syntax::{Document, FileId, NodeId, TextRange};

use crate::oracle::{DataFlowFacts, FlowRegion, Reference, SemanticOracle, TypeInfo};
use crate::symbol::{DeclLocation, Symbol, SymbolId, SymbolKind};
use crate::types::Type;

/// Tables shared by every file.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) symbols: Vec<Symbol>,
    types_by_name: HashMap<String, Vec<SymbolId>>,
    members: HashMap<SymbolId, Vec<SymbolId>>,
    bases: HashMap<SymbolId, Vec<Type>>,
    receivers: HashMap<SymbolId, SymbolId>,
    type_params: HashMap<SymbolId, Vec<SymbolId>>,
    /// Parameters declared with a default value.
    optional: HashSet<SymbolId>,
}

impl Tables {
    pub(crate) fn alloc(&mut self, mut symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        symbol.id = id;
        self.symbols.push(symbol);
        id
    }

    pub(crate) fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.get(id).map(|symbol| symbol.kind)
    }

    /// Source base types of `ty`.
    fn base_symbols(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.bases
            .get(&ty)
            .map(|bases| bases.iter().filter_map(Type::symbol).collect())
            .unwrap_or_default()
    }

    /// `ty` followed by its source ancestors, breadth first, without repeats.
    fn ancestry(&self, ty: SymbolId) -> Vec<SymbolId> {
        let mut out = vec![ty];
        let mut idx = 0;
        while idx < out.len() {
            for base in self.base_symbols(out[idx]) {
                if !out.contains(&base) {
                    out.push(base);
                }
            }
            idx += 1;
        }
        out
    }

    /// Members named `name` declared in `ty` or its ancestors; nearest first.
    fn members_named(&self, ty: SymbolId, name: &str) -> Vec<SymbolId> {
        let mut out = Vec::new();
        for owner in self.ancestry(ty) {
            if let Some(members) = self.members.get(&owner) {
                out.extend(members.iter().copied().filter(|member| {
                    self.get(*member).is_some_and(|symbol| {
                        symbol.name == name && symbol.kind != SymbolKind::Constructor
                    })
                }));
            }
        }
        out
    }

    fn constructors(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.members
            .get(&ty)
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|member| self.kind(*member) == Some(SymbolKind::Constructor))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn converts(&self, from: &Type, to: &Type) -> bool {
        if from.converts_builtin(to) {
            return true;
        }
        match (from, to) {
            (Type::Named { symbol: Some(from), .. }, Type::Named { symbol: Some(to), .. }) => {
                self.ancestry(*from).contains(to)
            }
            (Type::Named { symbol: Some(from), .. }, Type::Named { symbol: None, name, .. }) => {
                // Metadata interfaces/classes named in a base list.
                self.ancestry(*from).iter().any(|ty| {
                    self.bases.get(ty).is_some_and(|bases| {
                        bases
                            .iter()
                            .any(|base| matches!(base, Type::Named { name: n, .. } if n == name))
                    })
                })
            }
            (Type::TypeParam { .. }, Type::Object) => true,
            _ => false,
        }
    }
}

/// Per-file binding results.
#[derive(Debug, Default)]
pub(crate) struct FileFacts {
    bindings: HashMap<NodeId, SymbolId>,
    /// Identifier nodes bound to a symbol; the flag marks declaration names.
    idents: HashMap<NodeId, (SymbolId, bool)>,
    types: HashMap<NodeId, TypeInfo>,
    visible: Vec<(SymbolId, TextRange)>,
    bodies: Vec<flow::BodyFlow>,
}

impl FileFacts {
    fn bind(&mut self, node: NodeId, symbol: SymbolId) {
        self.bindings.insert(node, symbol);
    }

    fn bind_ident(&mut self, ident: NodeId, symbol: SymbolId, is_declaration: bool) {
        self.bindings.insert(ident, symbol);
        self.idents.insert(ident, (symbol, is_declaration));
    }
}

#[derive(Debug)]
pub struct SemanticModel {
    documents: BTreeMap<FileId, Document>,
    tables: Tables,
    files: BTreeMap<FileId, FileFacts>,
}

impl SemanticModel {
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let documents: BTreeMap<FileId, Document> = documents
            .into_iter()
            .map(|doc| (doc.file.clone(), doc))
            .collect();
        let mut tables = Tables::default();
        let mut files: BTreeMap<FileId, FileFacts> = documents
            .keys()
            .map(|file| (file.clone(), FileFacts::default()))
            .collect();

        for (file, doc) in &documents {
            if let Some(facts) = files.get_mut(file) {
                declare::declare_types(&mut tables, facts, doc);
            }
        }
        for (file, doc) in &documents {
            if let Some(facts) = files.get_mut(file) {
                declare::declare_members(&mut tables, facts, doc);
            }
        }
        for (file, doc) in &documents {
            if let Some(facts) = files.get_mut(file) {
                bind::bind_document(&mut tables, facts, doc);
            }
        }
        tracing::debug!(
            documents = documents.len(),
            symbols = tables.symbols.len(),
            "built semantic model"
        );
        SemanticModel {
            documents,
            tables,
            files,
        }
    }

    /// Looks up a source type by simple name.
    pub fn type_named(&self, name: &str) -> Option<SymbolId> {
        self.tables
            .types_by_name
            .get(name)
            .and_then(|types| types.first().copied())
    }

    /// The implicit receiver symbol of a type.
    pub fn receiver(&self, ty: SymbolId) -> Option<SymbolId> {
        self.tables.receivers.get(&ty).copied()
    }

    pub fn type_params(&self, owner: SymbolId) -> Vec<SymbolId> {
        self.tables
            .type_params
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }
}

impl SemanticOracle for SemanticModel {
    fn files(&self) -> Vec<FileId> {
        self.documents.keys().cloned().collect()
    }

    fn document(&self, file: &FileId) -> Option<&Document> {
        self.documents.get(file)
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.tables.get(id)
    }

    fn resolve_symbol(&self, file: &FileId, node: NodeId) -> Option<SymbolId> {
        self.files.get(file)?.bindings.get(&node).copied()
    }

    fn type_of(&self, file: &FileId, expr: NodeId) -> Option<TypeInfo> {
        self.files.get(file)?.types.get(&expr).cloned()
    }

    fn analyze_data_flow(&self, file: &FileId, region: FlowRegion) -> Option<DataFlowFacts> {
        let doc = self.documents.get(file)?;
        let facts = self.files.get(file)?;
        flow::analyze(facts, doc, region)
    }

    fn lookup_visible(
        &self,
        file: &FileId,
        position: usize,
        name: &str,
        container: Option<SymbolId>,
    ) -> Vec<SymbolId> {
        let mut out = Vec::new();
        if let Some(facts) = self.files.get(file) {
            for (symbol, range) in &facts.visible {
                if range.contains_inclusive(position)
                    && self.tables.get(*symbol).is_some_and(|s| s.name == name)
                {
                    out.push(*symbol);
                }
            }
        }
        if let Some(container) = container {
            out.extend(self.tables.members_named(container, name));
        }
        out
    }

    fn locate_declaration(&self, symbol: SymbolId) -> Option<DeclLocation> {
        self.tables.get(symbol)?.declaration.clone()
    }

    fn members(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.tables.members.get(&ty).cloned().unwrap_or_default()
    }

    fn base_types(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.tables.base_symbols(ty)
    }

    fn references(&self, symbol: SymbolId) -> Vec<Reference> {
        let mut out = Vec::new();
        for (file, facts) in &self.files {
            let Some(doc) = self.documents.get(file) else {
                continue;
            };
            for (ident, (bound, is_declaration)) in &facts.idents {
                if *bound != symbol {
                    continue;
                }
                if let Some(range) = doc.range(*ident) {
                    out.push(Reference {
                        file: file.clone(),
                        ident: *ident,
                        range,
                        is_declaration: *is_declaration,
                    });
                }
            }
        }
        out.sort_by(|a, b| (&a.file, a.range.start).cmp(&(&b.file, b.range.start)));
        out
    }

    fn converts(&self, from: &Type, to: &Type) -> bool {
        self.tables.converts(from, to)
    }
}
