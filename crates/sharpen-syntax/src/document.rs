use std::sync::Arc;

use crate::ast::{CompilationUnit, NodeId};
use crate::node::NodeRef;
use crate::parser::{parse, Parse, ParseError};
use crate::source_map::SourceMap;
use crate::text::{FileId, TextRange};

/// One parsed source file.
///
/// Documents are immutable snapshots; refactorings produce new text rather than
/// mutating a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file: FileId,
    text: Arc<str>,
    parse: Arc<Parse>,
}

impl Document {
    pub fn new(file: FileId, text: impl Into<String>) -> Self {
        let text: String = text.into();
        let parse = parse(&text);
        if !parse.errors.is_empty() {
            tracing::debug!(file = %file, errors = parse.errors.len(), "document has parse errors");
        }
        Self {
            file,
            text: Arc::from(text),
            parse: Arc::new(parse),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.parse.unit
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::Unit(&self.parse.unit)
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.parse.source_map
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.parse.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.parse.errors.is_empty()
    }

    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.parse.source_map.range(id)
    }

    /// Source text of a parsed node.
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        let range = self.range(id)?;
        self.text.get(range.start..range.end)
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.root().find(id)
    }
}
