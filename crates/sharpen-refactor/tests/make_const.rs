mod support;

use sharpen_refactor::RefactoringKind::MakeConst;
use support::{check, check_not_applicable, description};

#[test]
fn literal_initializer() {
    check(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/VAR = 1;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int VAR = 1;
    }
}
"#,
    );
}

#[test]
fn string_initializer() {
    check(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        string /*caret*/VAR = "test";
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const string VAR = "test";
    }
}
"#,
    );
}

#[test]
fn every_declarator_constant() {
    check(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1, b = 2 * 3;
        int c = a + b;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int a = 1, b = 2 * 3;
        int c = a + b;
    }
}
"#,
    );
}

#[test]
fn initializer_from_other_constant() {
    check(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        const int size = 4;
        long /*caret*/total = size * 2;
        long t = total;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int size = 4;
        const long total = size * 2;
        long t = total;
    }
}
"#,
    );
}

#[test]
fn already_const_is_not_offered() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        const int /*caret*/VAR = 1;
    }
}
"#,
    );
}

#[test]
fn implicitly_typed_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        var /*caret*/VAR = 1;
    }
}
"#,
    );
}

#[test]
fn reassigned_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/VAR = 1;
        VAR = 2;
    }
}
"#,
    );
}

#[test]
fn passed_by_reference_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/VAR = 1;
        bar(ref VAR);
    }

    void bar(ref int i)
    {
        i = 2;
    }
}
"#,
    );
}

#[test]
fn string_stored_as_object_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        object /*caret*/VAR = "test";
    }
}
"#,
    );
}

#[test]
fn non_constant_initializer_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int x = 1;
        int /*caret*/VAR = x;
    }
}
"#,
    );
}

#[test]
fn missing_initializer_is_rejected() {
    check_not_applicable(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1, b;
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        MakeConst,
        r#"
class A
{
    void foo()
    {
        int /*caret*/VAR = 1;
    }
}
"#,
    );
    assert_eq!(text, "Mark variables with `const'");
}
