mod support;

use pretty_assertions::assert_eq;
use sharpen_config::SharpenConfig;
use sharpen_refactor::{
    applicable_action, applicable_actions, CancellationToken, RefactorError, RefactoringKind,
    UnknownRefactoring,
};
use sharpen_syntax::{normalize, TextRange};
use sharpen_test_utils::Fixture;
use support::apply;

const EXPRESSION: &str = r#"
class A
{
    void foo()
    {
        int a = 1;
        int b = 2;
        int c = /*start*/a + b/*end*/;
    }
}
"#;

#[test]
fn kinds_round_trip_through_their_ids() {
    for &kind in RefactoringKind::ALL {
        assert_eq!(kind.id().parse::<RefactoringKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.id());
    }
    assert_eq!(RefactoringKind::ALL.len(), 19);
    assert_eq!(
        "extract-everything".parse::<RefactoringKind>(),
        Err(UnknownRefactoring("extract-everything".to_string()))
    );
}

#[test]
fn kinds_serialize_as_kebab_case() {
    let json = serde_json::to_string(&RefactoringKind::ReplaceConstructorWithFactory).unwrap();
    assert_eq!(json, r#""replace-constructor-with-factory""#);
    let kind: RefactoringKind = serde_json::from_str(r#""make-const""#).unwrap();
    assert_eq!(kind, RefactoringKind::MakeConst);
}

#[test]
fn lists_every_applicable_refactoring_in_order() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    let kinds: Vec<_> = applicable_actions(&fixture.model, &config, &file, span)
        .iter()
        .map(|action| action.kind())
        .collect();
    assert_eq!(
        kinds,
        [RefactoringKind::ExtractMethod, RefactoringKind::IntroduceLocal]
    );
}

#[test]
fn disabled_refactorings_are_not_offered() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::load_from_str(
        r#"
[refactorings]
disabled = ["extract-method"]
"#,
    )
    .unwrap();
    let (file, span) = fixture.selection();
    assert!(applicable_action(
        &fixture.model,
        &config,
        RefactoringKind::ExtractMethod,
        &file,
        span
    )
    .is_none());
    let kinds: Vec<_> = applicable_actions(&fixture.model, &config, &file, span)
        .iter()
        .map(|action| action.kind())
        .collect();
    assert_eq!(kinds, [RefactoringKind::IntroduceLocal]);
}

#[test]
fn configured_names_are_used() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::load_from_str(
        r#"
[names]
extracted_method = "Sum"
"#,
    )
    .unwrap();
    let (file, span) = fixture.selection();
    let changes = applicable_action(
        &fixture.model,
        &config,
        RefactoringKind::ExtractMethod,
        &file,
        span,
    )
    .unwrap()
    .apply(&CancellationToken::new())
    .unwrap();
    assert_eq!(
        normalize(changes.text(&file).unwrap()),
        normalize(
            r#"
class A
{
    void foo()
    {
        int a = 1;
        int b = 2;
        int c = Sum(a, b);
    }

    int Sum(int a, int b)
    {
        return a + b;
    }
}
"#
        )
    );
}

#[test]
fn cancelled_token_yields_no_changes() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    let action = applicable_action(
        &fixture.model,
        &config,
        RefactoringKind::ExtractMethod,
        &file,
        span,
    )
    .unwrap();
    let token = CancellationToken::new();
    token.cancel();
    assert_eq!(action.apply(&token).unwrap_err(), RefactorError::Cancelled);
}

#[test]
fn selection_past_the_end_is_not_offered() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::default();
    let (file, _) = fixture.selection();
    let len = fixture.text(&file).len();
    let span = TextRange::new(len, len + 4);
    assert!(applicable_actions(&fixture.model, &config, &file, span).is_empty());
}

#[test]
fn resolving_the_same_selection_twice_gives_the_same_action() {
    let fixture = Fixture::parse(EXPRESSION);
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    let first = applicable_action(
        &fixture.model,
        &config,
        RefactoringKind::IntroduceLocal,
        &file,
        span,
    )
    .unwrap();
    let second = applicable_action(
        &fixture.model,
        &config,
        RefactoringKind::IntroduceLocal,
        &file,
        span,
    )
    .unwrap();
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
    let token = CancellationToken::new();
    assert_eq!(
        first.apply(&token).unwrap().text(&file),
        second.apply(&token).unwrap().text(&file)
    );
}

#[test]
fn applying_leaves_the_input_untouched() {
    let fixture = Fixture::parse(EXPRESSION);
    let (file, _) = fixture.selection();
    let before = fixture.text(&file).to_string();
    let changes = apply(RefactoringKind::ExtractMethod, &fixture);
    assert_eq!(fixture.text(&file), before);
    let document = changes.document(&file).unwrap();
    assert_eq!(document.original, before);
    assert!(!document.edits.is_empty());
}

#[test]
fn extracting_then_inlining_restores_the_expression() {
    let fixture = Fixture::parse(EXPRESSION);
    let (file, _) = fixture.selection();
    let extracted = apply(RefactoringKind::ExtractMethod, &fixture);
    let text = extracted.text(&file).unwrap();
    assert!(text.contains("NewMethod(a, b)"));

    let marked = text.replacen("NewMethod(", "/*start*/NewMethod/*end*/(", 1);
    let fixture = Fixture::parse(&marked);
    let inlined = apply(RefactoringKind::InlineMethod, &fixture);
    assert_eq!(
        normalize(inlined.text(&file).unwrap()),
        normalize(
            r#"
class A
{
    void foo()
    {
        int a = 1;
        int b = 2;
        int c = a + b;
    }

    int NewMethod(int a, int b)
    {
        return a + b;
    }
}
"#
        )
    );
}
