mod support;

use sharpen_refactor::RefactoringKind::IntroduceLocal;
use support::{check, check_not_applicable, description};

#[test]
fn declares_local_before_statement() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/1 + 2/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int newVariable = 1 + 2;
        int a = newVariable;
    }
}
"#,
    );
}

#[test]
fn stays_inside_nested_block() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        {
            int a = /*start*/1 + 2 * 3/*end*/;
        }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        {
            int newVariable = 1 + 2 * 3;
            int a = newVariable;
        }
    }
}
"#,
    );
}

#[test]
fn wraps_embedded_if_branch_in_block() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        if (a == 1)
            a = /*start*/1 + 2/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        if (a == 1)
        {
            int newVariable = 1 + 2;
            a = newVariable;
        }
    }
}
"#,
    );
}

#[test]
fn wraps_embedded_loop_body_in_block() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        for (int i = 0; i < 10; ++i)
            a = /*start*/i * 10/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        for (int i = 0; i < 10; ++i)
        {
            int newVariable = i * 10;
            a = newVariable;
        }
    }
}
"#,
    );
}

#[test]
fn inserts_before_loop_header() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        if (true)
            for (int i = 0; i < /*start*/10 * 20/*end*/; ++i) { }
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        if (true)
        {
            int newVariable = 10 * 20;
            for (int i = 0; i < newVariable; ++i) { }
        }
    }
}
"#,
    );
}

#[test]
fn whole_expression_statement_becomes_declaration() {
    check(
        IntroduceLocal,
        r#"
class A
{
    int foo()
    {
        /*start*/foo()/*end*/;
    }
}
"#,
        r#"
class A
{
    int foo()
    {
        int newVariable = foo();
    }
}
"#,
    );
}

#[test]
fn increment_statement_becomes_declaration() {
    check(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        int i = 0;
        /*start*/++i/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int i = 0;
        int newVariable = ++i;
    }
}
"#,
    );
}

#[test]
fn receiver_of_assigned_member() {
    check(
        IntroduceLocal,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        /*start*/b.a/*end*/.x = 123;
    }
}
"#,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        A newVariable = b.a;
        newVariable.x = 123;
    }
}
"#,
    );
}

#[test]
fn receiver_of_read_member() {
    check(
        IntroduceLocal,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        int z = /*start*/b.a/*end*/.x;
    }
}
"#,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        A newVariable = b.a;
        int z = newVariable.x;
    }
}
"#,
    );
}

#[test]
fn void_invocation_is_rejected() {
    check_not_applicable(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        /*start*/foo()/*end*/;
    }
}
"#,
    );
}

#[test]
fn assignment_target_is_rejected() {
    check_not_applicable(
        IntroduceLocal,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        /*start*/b.a.x/*end*/ = 123;
    }
}
"#,
    );
}

#[test]
fn member_name_is_rejected() {
    check_not_applicable(
        IntroduceLocal,
        r#"
class A
{
    public int x;
}

class B
{
    A a;
    void foo()
    {
        B b = new B();
        int z = b./*start*/a/*end*/.x;
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        IntroduceLocal,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/1 + 2/*end*/;
    }
}
"#,
    );
    assert_eq!(text, "Introduce variable");
}

#[test]
fn postfix_increment_operand_is_rejected() {
    check_not_applicable(
        IntroduceLocal,
        r#"
class A
{
    void foo(int i)
    {
        /*start*/i/*end*/++;
    }
}
"#,
    );
}

#[test]
fn prefix_decrement_operand_is_rejected() {
    check_not_applicable(
        IntroduceLocal,
        r#"
class A
{
    void foo(int i)
    {
        int j = --/*start*/i/*end*/;
    }
}
"#,
    );
}
