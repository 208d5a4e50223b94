mod support;

use sharpen_refactor::RefactoringKind::ExtractMethod;
use support::{check, check_not_applicable, description};

#[test]
fn extracts_constant_expression() {
    check(
        ExtractMethod,
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
        int a = NewMethod();
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
fn read_locals_become_value_parameters() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        int b = 2;
        int c = /*start*/a + b/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1;
        int b = 2;
        int c = NewMethod(a, b);
    }

    int NewMethod(int a, int b)
    {
        return a + b;
    }
}
"#,
    );
}

#[test]
fn assigned_before_read_becomes_out_parameter() {
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
fn read_before_assigned_becomes_ref_parameter() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        int a;
        int b = 2;
        int c = /*start*/b + (a = 1) + (b = 3)/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a;
        int b = 2;
        int c = NewMethod(out a, ref b);
    }

    int NewMethod(out int a, ref int b)
    {
        return b + (a = 1) + (b = 3);
    }
}
"#,
    );
}

#[test]
fn keeps_existing_argument_modifiers() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        int a;
        int b = 2;
        int c = /*start*/bar(out a, ref b)/*end*/;
    }

    int bar(out int a, ref int b)
    {
        return (a = b);
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a;
        int b = 2;
        int c = NewMethod(out a, ref b);
    }

    int bar(out int a, ref int b)
    {
        return (a = b);
    }

    int NewMethod(out int a, ref int b)
    {
        return bar(out a, ref b);
    }
}
"#,
    );
}

#[test]
fn static_context_gives_static_method() {
    check(
        ExtractMethod,
        r#"
class A
{
    static void foo()
    {
        int a = /*start*/1 + 2/*end*/;
    }
}
"#,
        r#"
class A
{
    static void foo()
    {
        int a = NewMethod();
    }

    static int NewMethod()
    {
        return 1 + 2;
    }
}
"#,
    );
}

#[test]
fn copies_method_type_parameters_and_constraints() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo<T, U>(T a) where T : new()
    {
        T b = /*start*/a/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo<T, U>(T a) where T : new()
    {
        T b = NewMethod<T, U>(a);
    }

    T NewMethod<T, U>(T a) where T : new()
    {
        return a;
    }
}
"#,
    );
}

#[test]
fn class_type_parameters_are_not_copied() {
    check(
        ExtractMethod,
        r#"
class A<V>
{
    void foo<T>(V a)
    {
        V b = /*start*/(V)a/*end*/;
    }
}
"#,
        r#"
class A<V>
{
    void foo<T>(V a)
    {
        V b = NewMethod<T>(a);
    }

    V NewMethod<T>(V a)
    {
        return (V)a;
    }
}
"#,
    );
}

#[test]
fn void_invocation_becomes_expression_statement() {
    check(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        /*start*/foo()/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        NewMethod();
    }

    void NewMethod()
    {
        foo();
    }
}
"#,
    );
}

#[test]
fn receiver_of_assigned_member_is_extractable() {
    check(
        ExtractMethod,
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
        NewMethod(b).x = 123;
    }

    A NewMethod(B b)
    {
        return b.a;
    }
}
"#,
    );
}

#[test]
fn assignment_target_is_not_extracted() {
    check_not_applicable(
        ExtractMethod,
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
fn member_name_of_access_is_not_extracted() {
    check_not_applicable(
        ExtractMethod,
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
        int z = b./*start*/a.x/*end*/;
    }
}
"#,
    );
}

#[test]
fn callee_name_is_not_extracted() {
    check_not_applicable(
        ExtractMethod,
        r#"
class A
{
    void foo()
    {
        /*start*/foo/*end*/();
    }
}
"#,
    );
}

#[test]
fn field_initializer_is_not_inside_a_statement() {
    check_not_applicable(
        ExtractMethod,
        r#"
class A
{
    int x = /*start*/1 + 2/*end*/;
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        ExtractMethod,
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
    assert_eq!(text, "Extract method");
}

#[test]
fn postfix_increment_operand_is_rejected() {
    check_not_applicable(
        ExtractMethod,
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
        ExtractMethod,
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
