//! Semantic layer consumed by the refactoring core.
//!
//! The core only talks to [`SemanticOracle`]. [`SemanticModel`] is the
//! reference implementation: it binds names, types expressions and answers
//! data-flow queries over a set of parsed [`sharpen_syntax::Document`]s.

mod model;
mod oracle;
mod symbol;
mod types;

pub use model::SemanticModel;
pub use oracle::{DataFlowFacts, FlowRegion, Reference, SemanticOracle, TypeInfo};
pub use symbol::{DeclLocation, Symbol, SymbolFlags, SymbolId, SymbolKind};
pub use types::Type;
