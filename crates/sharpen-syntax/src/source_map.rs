use crate::ast::NodeId;
use crate::text::TextRange;

/// Side table from parsed node ids to their source ranges.
///
/// Only nodes produced by the parser have an entry; synthesized nodes do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMap {
    ranges: Vec<TextRange>,
}

impl SourceMap {
    pub(crate) fn new(ranges: Vec<TextRange>) -> Self {
        Self { ranges }
    }

    pub fn range(&self, id: NodeId) -> Option<TextRange> {
        self.ranges.get(id.index()).copied()
    }

    /// First id that the parser did not hand out.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.ranges.len() as u32)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn is_original(&self, id: NodeId) -> bool {
        id.index() < self.ranges.len()
    }
}
