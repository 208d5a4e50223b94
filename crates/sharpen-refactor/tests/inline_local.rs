mod support;

use sharpen_refactor::RefactoringKind::InlineLocal;
use support::{check, check_not_applicable, description};

#[test]
fn inserts_cast_to_declared_type() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        float /*caret*/f = 5;
        float a = 1 / f;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        float a = 1 / (float)5;
    }
}
"#,
    );
}

#[test]
fn parenthesizes_conditional_under_operator() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo(bool c)
    {
        int /*caret*/a = c == true ? 1 : 4;
        int b = a + 3;
    }
}
"#,
        r#"
class A
{
    void foo(bool c)
    {
        int b = (c == true ? 1 : 4) + 3;
    }
}
"#,
    );
}

#[test]
fn parenthesizes_binary_under_operator() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1 + 2;
        int b = a * 3;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int b = (1 + 2) * 3;
    }
}
"#,
    );
}

#[test]
fn keeps_other_declarators() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1 + 2, b = 4;
        int c = a;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int b = 4;
        int c = 1 + 2;
    }
}
"#,
    );
}

#[test]
fn parenthesizes_member_access_receiver() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1 + 2;
        a.ToString();
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        (1 + 2).ToString();
    }
}
"#,
    );
}

#[test]
fn implicitly_typed_local_needs_no_cast() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        var /*caret*/d = 2.5;
        double e = d * 2;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        double e = 2.5 * 2;
    }
}
"#,
    );
}

#[test]
fn inlines_inside_nested_block() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo(bool c)
    {
        if (c)
        {
            int /*caret*/a = 3;
            int b = a + a;
        }
    }
}
"#,
        r#"
class A
{
    void foo(bool c)
    {
        if (c)
        {
            int b = 3 + 3;
        }
    }
}
"#,
    );
}

#[test]
fn local_without_initializer_is_rejected() {
    check_not_applicable(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/local;
        local = 1;
    }
}
"#,
    );
}

#[test]
fn local_written_again_is_rejected() {
    check_not_applicable(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1;
        a = 2;
        int b = a;
    }
}
"#,
    );
}

#[test]
fn unread_local_is_rejected() {
    check_not_applicable(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1;
    }
}
"#,
    );
}

#[test]
fn initializer_input_written_before_use_is_rejected() {
    check_not_applicable(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int x = 1;
        int /*caret*/a = x;
        x = 2;
        int b = a;
    }
}
"#,
    );
}

#[test]
fn for_initializer_is_rejected() {
    check_not_applicable(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        for (int /*caret*/i = 0; i < 10; i++)
        {
        }
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/a = 1;
        int b = a;
    }
}
"#,
    );
    assert_eq!(text, "Inline variable");
}

#[test]
fn parenthesizes_negation_as_receiver() {
    check(
        InlineLocal,
        r#"
class A
{
    string foo(int a)
    {
        int /*caret*/n = -a;
        return n.ToString();
    }
}
"#,
        r#"
class A
{
    string foo(int a)
    {
        return (-a).ToString();
    }
}
"#,
    );
}

#[test]
fn parenthesizes_cast_as_receiver() {
    check(
        InlineLocal,
        r#"
class A
{
    string foo(double a)
    {
        var /*caret*/n = (int)a;
        return n.ToString();
    }
}
"#,
        r#"
class A
{
    string foo(double a)
    {
        return ((int)a).ToString();
    }
}
"#,
    );
}

#[test]
fn parenthesizes_negation_under_negation() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo(int a)
    {
        int /*caret*/n = -a;
        int m = -n;
    }
}
"#,
        r#"
class A
{
    void foo(int a)
    {
        int m = -(-a);
    }
}
"#,
    );
}
