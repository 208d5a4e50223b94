mod support;

use sharpen_refactor::RefactoringKind::RenameParameter;
use support::{check, check_not_applicable, description};

#[test]
fn renames_references_and_named_arguments() {
    check(
        RenameParameter,
        r#"
class A
{
    int foo(int a, /*start*/int b/*end*/)
    {
        int c = b;
        return c + b;
    }

    void bar()
    {
        foo(b: foo(a: foo(1, 2), b: foo(b: 5, a: 1)), a: foo(5, 2));
    }
}
"#,
        r#"
class A
{
    int foo(int a, int newParameterName)
    {
        int c = newParameterName;
        return c + newParameterName;
    }

    void bar()
    {
        foo(newParameterName: foo(a: foo(1, 2), newParameterName: foo(newParameterName: 5, a: 1)), a: foo(5, 2));
    }
}
"#,
    );
}

#[test]
fn constructor_parameter() {
    check(
        RenameParameter,
        r#"
class A
{
    public A(A a, /*start*/A b/*end*/)
    {
        A c = b;
    }

    void bar()
    {
        new A(b: new A(a: new A(null, null), b: new A(b: null, a: null)), a: new A(null, null));
    }
}
"#,
        r#"
class A
{
    public A(A a, A newParameterName)
    {
        A c = newParameterName;
    }

    void bar()
    {
        new A(newParameterName: new A(a: new A(null, null), newParameterName: new A(newParameterName: null, a: null)), a: new A(null, null));
    }
}
"#,
    );
}

#[test]
fn caret_on_parameter_name() {
    check(
        RenameParameter,
        r#"
class A
{
    int x;

    int foo(A /*caret*/other)
    {
        return other.x + x;
    }
}
"#,
        r#"
class A
{
    int x;

    int foo(A newParameterName)
    {
        return newParameterName.x + x;
    }
}
"#,
    );
}

#[test]
fn name_reserved_by_local_is_rejected() {
    check_not_applicable(
        RenameParameter,
        r#"
class A
{
    int foo(int a, /*start*/int b/*end*/)
    {
        int newParameterName = a;
        return 123;
    }
}
"#,
    );
}

#[test]
fn name_reserved_by_parameter_is_rejected() {
    check_not_applicable(
        RenameParameter,
        r#"
class A
{
    int foo(int newParameterName, /*start*/int b/*end*/)
    {
        int c = b;
        return 123;
    }
}
"#,
    );
}

#[test]
fn parameter_already_named_is_not_offered() {
    check_not_applicable(
        RenameParameter,
        r#"
class A
{
    void foo(int /*caret*/newParameterName)
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        RenameParameter,
        r#"
class A
{
    void foo(int /*caret*/p)
    {
    }
}
"#,
    );
    assert_eq!(text, "Rename parameter `p' to `newParameterName'");
}
