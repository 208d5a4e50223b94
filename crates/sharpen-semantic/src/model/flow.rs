//! Region data flow over the accesses recorded while binding.
//!
//! Every member body (and every field initializer) keeps the list of reads
//! and writes of locals, parameters and the receiver in source order. A
//! region is classified by range: accesses inside the region's span count as
//! inside, the rest of the enclosing body as outside.

use sharpen_syntax::{Document, TextRange};

use super::FileFacts;
use crate::oracle::{DataFlowFacts, FlowRegion};
use crate::symbol::SymbolId;

#[derive(Clone, Debug)]
pub(super) struct Access {
    pub(super) symbol: SymbolId,
    pub(super) range: TextRange,
    pub(super) read: bool,
    pub(super) write: bool,
}

#[derive(Clone, Debug)]
pub(super) struct BodyFlow {
    pub(super) range: TextRange,
    pub(super) accesses: Vec<Access>,
}

pub(super) fn analyze(facts: &FileFacts, doc: &Document, region: FlowRegion) -> Option<DataFlowFacts> {
    let range = match region {
        FlowRegion::Expr(expr) => doc.range(expr)?,
        FlowRegion::Statements { first, last } => doc.range(first)?.cover(doc.range(last)?),
    };
    let body = facts
        .bodies
        .iter()
        .filter(|body| body.range.contains_range(range))
        .min_by_key(|body| body.range.len())?;

    let mut out = DataFlowFacts::default();
    for access in &body.accesses {
        let inside = range.contains_range(access.range);
        if access.read {
            if inside {
                out.read_inside.insert(access.symbol);
            } else {
                out.read_outside.insert(access.symbol);
            }
        }
        if access.write {
            if inside {
                out.written_inside.insert(access.symbol);
            } else {
                out.written_outside.insert(access.symbol);
            }
        }
    }
    tracing::trace!(
        accesses = body.accesses.len(),
        read_inside = out.read_inside.len(),
        written_inside = out.written_inside.len(),
        "analyzed data flow"
    );
    Some(out)
}
