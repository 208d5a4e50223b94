use sharpen_config::NamesConfig;
use sharpen_semantic::{SemanticOracle, Symbol, SymbolId, TypeInfo};
use sharpen_syntax::{CompilationUnit, Document, FileId, NodeId, NodeIds, NodeRef, TextRange};

use crate::error::{RefactorError, RewriteError};
use crate::synth::{synthesize, Changes};

/// Everything a refactoring may consult for one invocation.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    pub(crate) oracle: &'a dyn SemanticOracle,
    pub(crate) names: &'a NamesConfig,
    pub(crate) file: &'a FileId,
    pub(crate) doc: &'a Document,
}

impl<'a> Context<'a> {
    /// `None` when the file is unknown to the oracle or does not parse.
    pub(crate) fn new(
        oracle: &'a dyn SemanticOracle,
        names: &'a NamesConfig,
        file: &'a FileId,
    ) -> Option<Self> {
        let doc = oracle.document(file)?;
        if doc.has_errors() {
            tracing::debug!(file = %file, "document has parse errors; no refactorings offered");
            return None;
        }
        Some(Context {
            oracle,
            names,
            file,
            doc,
        })
    }

    pub(crate) fn range(&self, id: NodeId) -> Option<TextRange> {
        self.doc.range(id)
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<NodeRef<'a>> {
        self.doc.node(id)
    }

    /// Ancestor chain from the compilation unit down to `id`.
    pub(crate) fn path_to(&self, id: NodeId) -> Option<Vec<NodeRef<'a>>> {
        self.doc.root().path_to(id)
    }

    pub(crate) fn symbol(&self, id: SymbolId) -> Option<&'a Symbol> {
        self.oracle.symbol(id)
    }

    /// Symbol referenced or declared by `node` in this file.
    pub(crate) fn symbol_at(&self, node: NodeId) -> Option<SymbolId> {
        self.oracle.resolve_symbol(self.file, node)
    }

    pub(crate) fn type_of(&self, expr: NodeId) -> Option<TypeInfo> {
        self.oracle.type_of(self.file, expr)
    }

    /// Allocator for nodes added to this document.
    pub(crate) fn ids(&self) -> NodeIds {
        NodeIds::starting_at(self.doc.source_map().next_id())
    }

    pub(crate) fn document(&self, file: &FileId) -> Result<&'a Document, RefactorError> {
        self.oracle
            .document(file)
            .ok_or_else(|| RewriteError::MissingDocument(file.clone()).into())
    }

    /// Synthesizes the new text of this document.
    pub(crate) fn finish(&self, unit: CompilationUnit) -> Result<Changes, RefactorError> {
        let mut changes = Changes::default();
        changes.insert(synthesize(self.doc, unit)?);
        Ok(changes)
    }
}

/// Logs why `refactoring` is not offered and returns `None`.
pub(crate) fn reject<T>(refactoring: &'static str, reason: &'static str) -> Option<T> {
    tracing::debug!(refactoring, reason, "not applicable");
    None
}
