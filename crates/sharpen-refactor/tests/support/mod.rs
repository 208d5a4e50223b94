//! Helpers shared by the refactoring test suites.
#![allow(dead_code)]

use pretty_assertions::assert_eq;
use sharpen_config::SharpenConfig;
use sharpen_refactor::{applicable_action, CancellationToken, Changes, RefactoringKind};
use sharpen_syntax::normalize;
use sharpen_test_utils::Fixture;

/// Applies `kind` at the fixture's selection with the default configuration.
pub fn apply(kind: RefactoringKind, fixture: &Fixture) -> Changes {
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    let action = applicable_action(&fixture.model, &config, kind, &file, span)
        .unwrap_or_else(|| panic!("{kind} is not offered at {span:?}"));
    action
        .apply(&CancellationToken::new())
        .unwrap_or_else(|err| panic!("{kind} failed: {err}"))
}

/// Asserts that `kind` turns the selected file of `before` into `after`,
/// modulo layout.
#[track_caller]
pub fn check(kind: RefactoringKind, before: &str, after: &str) {
    let fixture = Fixture::parse(before);
    let (file, _) = fixture.selection();
    let changes = apply(kind, &fixture);
    let text = changes
        .text(&file)
        .unwrap_or_else(|| panic!("{kind} did not change {file}"));
    assert_eq!(normalize(text), normalize(after));
}

/// Asserts that `kind` is not offered at the fixture's selection.
#[track_caller]
pub fn check_not_applicable(kind: RefactoringKind, before: &str) {
    let fixture = Fixture::parse(before);
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    let action = applicable_action(&fixture.model, &config, kind, &file, span);
    assert!(action.is_none(), "{kind} unexpectedly offered: {action:?}");
}

/// Description of the action offered at the fixture's selection.
#[track_caller]
pub fn description(kind: RefactoringKind, before: &str) -> String {
    let fixture = Fixture::parse(before);
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    applicable_action(&fixture.model, &config, kind, &file, span)
        .unwrap_or_else(|| panic!("{kind} is not offered"))
        .describe()
}
