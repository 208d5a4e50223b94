//! Shared helpers for the Sharpen test suites.

pub mod fixtures;

pub use fixtures::{extract_caret, extract_range, Fixture};
