mod support;

use sharpen_refactor::RefactoringKind::ReplaceMagicNumber;
use support::{check, check_not_applicable, description};

#[test]
fn replaces_every_occurrence_in_the_block() {
    check(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int a = /*caret*/123;
        int b = 123 + a;
        bar(123);
    }

    void bar(double x)
    {
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int MAGIC_NUMBER = 123;
        int a = MAGIC_NUMBER;
        int b = MAGIC_NUMBER + a;
        bar(MAGIC_NUMBER);
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn suffixes_and_decimal_points_compare_by_value() {
    check(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        double a = /*start*/123d/*end*/;
        double b = 123.0 + a;
        bar(123.0d);
        bar(123);
    }

    void bar(double x)
    {
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const double MAGIC_NUMBER = 123d;
        double a = MAGIC_NUMBER;
        double b = MAGIC_NUMBER + a;
        bar(MAGIC_NUMBER);
        bar(123);
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn leading_zeroes_compare_by_value() {
    check(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/0123/*end*/ + 00123;
    }

    void bar(double x)
    {
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int MAGIC_NUMBER = 0123;
        int a = MAGIC_NUMBER + MAGIC_NUMBER;
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn nested_blocks_are_covered() {
    check(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int a = /*caret*/7;
        if (a > 1)
        {
            a = 7 * 2;
        }
    }

    void bar(double x)
    {
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        const int MAGIC_NUMBER = 7;
        int a = MAGIC_NUMBER;
        if (a > 1)
        {
            a = MAGIC_NUMBER * 2;
        }
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn innermost_block_only() {
    check(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int a = 7;
        if (a > 1)
        {
            a = /*caret*/7 * 2;
        }
    }

    void bar(double x)
    {
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 7;
        if (a > 1)
        {
            const int MAGIC_NUMBER = 7;
            a = MAGIC_NUMBER * 2;
        }
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn string_literal_is_not_offered() {
    check_not_applicable(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        string s = /*caret*/"123";
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn field_initializer_is_rejected() {
    check_not_applicable(
        ReplaceMagicNumber,
        r#"
class A
{
    int x = /*caret*/42;
}
"#,
    );
}

#[test]
fn taken_constant_name_is_rejected() {
    check_not_applicable(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int MAGIC_NUMBER = 1;
        int a = /*caret*/42;
    }

    void bar(double x)
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        ReplaceMagicNumber,
        r#"
class A
{
    void foo()
    {
        int a = /*caret*/42;
    }
}
"#,
    );
    assert_eq!(text, "Replace magic number with symbolic constant");
}
