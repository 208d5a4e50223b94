mod support;

use sharpen_refactor::RefactoringKind::IntroduceExplainingVariable;
use support::{check, check_not_applicable, description};

#[test]
fn names_each_comparison() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2, c = 3;
        if (/*start*/a == 1/*end*/ && b == 2 && 3 == c) { }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2, c = 3;
        bool isVar1 = a == 1;
        bool isVar2 = b == 2;
        bool isVar3 = 3 == c;
        if (isVar1 && isVar2 && isVar3) { }
    }
}
"#,
    );
}

#[test]
fn numbers_nested_operands_left_to_right() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2, c = 3, d = 4;
        if ((/*start*/a < 1/*end*/ && b != 2) || (3 == c || d > 2)) { }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2, c = 3, d = 4;
        bool isVar1 = a < 1;
        bool isVar2 = b != 2;
        bool isVar3 = 3 == c;
        bool isVar4 = d > 2;
        if ((isVar1 && isVar2) || (isVar3 || isVar4)) { }
    }
}
"#,
    );
}

#[test]
fn wraps_if_embedded_in_loop() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        for (;;)
            if (/*start*/a == 1/*end*/ && b == 2) { }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        for (;;)
        {
            bool isVar1 = a == 1;
            bool isVar2 = b == 2;
            if (isVar1 && isVar2) { }
        }
    }
}
"#,
    );
}

#[test]
fn wraps_if_embedded_in_if() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        if (true)
            if (/*start*/a == 1/*end*/ && b == 2) { }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        if (true)
        {
            bool isVar1 = a == 1;
            bool isVar2 = b == 2;
            if (isVar1 && isVar2) { }
        }
    }
}
"#,
    );
}

#[test]
fn else_if_gets_its_own_block() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        if (true)
        {
        }
        else if (/*start*/a == 1/*end*/ && b == 2)
        {
        }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        if (true)
        {
        }
        else
        {
            bool isVar1 = a == 1;
            bool isVar2 = b == 2;
            if (isVar1 && isVar2)
            {
            }
        }
    }
}
"#,
    );
}

#[test]
fn drops_one_pair_of_parentheses() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        if (/*start*/(((a == 1)))/*end*/)
        {
        }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        bool isVar1 = a == 1;
        if (((isVar1)))
        {
        }
    }
}
"#,
    );
}

#[test]
fn looks_through_negation() {
    check(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo(int a)
    {
        if (!(/*start*/a > 1/*end*/))
        {
        }
    }
}
"#,
        r#"
class A
{
    void foo(int a)
    {
        bool isVar1 = a > 1;
        if (!isVar1)
        {
        }
    }
}
"#,
    );
}

#[test]
fn do_while_condition_is_rejected() {
    check_not_applicable(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo()
    {
        int a = 1, b = 2;
        do
        {
        }
        while (/*start*/a == 1/*end*/ && b == 2);
    }
}
"#,
    );
}

#[test]
fn condition_without_comparison_is_rejected() {
    check_not_applicable(
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo(bool a)
    {
        if (/*caret*/a)
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
        IntroduceExplainingVariable,
        r#"
class A
{
    void foo(int a)
    {
        if (/*caret*/a == 1) { }
    }
}
"#,
    );
    assert_eq!(text, "Introduce explaining variables");
}
