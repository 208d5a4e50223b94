//! End-to-end walkthroughs of the most common refactorings.

mod support;

use sharpen_refactor::RefactoringKind::*;
use support::{check, check_not_applicable};

#[test]
fn extracting_a_constant_sum() {
    check(
        ExtractMethod,
        r#"
class A
{
    int x;

    void foo()
    {
        x = /*start*/1 + 2/*end*/;
    }
}
"#,
        r#"
class A
{
    int x;

    void foo()
    {
        x = NewMethod();
    }

    int NewMethod()
    {
        return 1 + 2;
    }
}
"#,
    );
}

#[test]
fn extracting_an_assignment_passes_the_target_out() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        int a;
        int c = /*start*/(a = 1)/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a;
        int c = NewMethod(out a);
    }

    int NewMethod(out int a)
    {
        return (a = 1);
    }
}
"#,
    );
}

#[test]
fn pulling_up_an_initialized_field_widens_private_access() {
    check(
        PullUpField,
        r#"
class Base
{
    public int y;
}

class Derived : Base
{
    private int /*caret*/x = 10;

    int twice()
    {
        return x * 2;
    }
}
"#,
        r#"
class Base
{
    public int y;
    protected int x = 10;
}

class Derived : Base
{
    int twice()
    {
        return x * 2;
    }
}
"#,
    );
}

#[test]
fn reversing_a_relational_conditional() {
    check(
        ReverseConditional,
        r#"
class A
{
    void foo(int a, int b)
    {
        int p;
        if (/*start*/a == b/*end*/) p = 4; else p = 5;
    }
}
"#,
        r#"
class A
{
    void foo(int a, int b)
    {
        int p;
        if (a != b) p = 5; else p = 4;
    }
}
"#,
    );
}

#[test]
fn inlining_a_converted_literal_keeps_its_type() {
    check(
        InlineLocal,
        r#"
class A
{
    void foo()
    {
        float /*caret*/f = 5;
        float g = 1 / f;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        float g = 1 / (float)5;
    }
}
"#,
    );
}

#[test]
fn callee_name_never_offers_extraction() {
    check_not_applicable(
        ExtractMethod,
        r#"
class A
{
    int bar()
    {
        return 1;
    }

    void foo()
    {
        int a = /*start*/bar/*end*/();
    }
}
"#,
    );
}
