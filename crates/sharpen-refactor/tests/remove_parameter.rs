mod support;

use sharpen_refactor::RefactoringKind::RemoveParameter;
use support::{check, check_not_applicable, description};

#[test]
fn unused_parameter_is_removed() {
    check(
        RemoveParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int a = 123;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 123;
    }
}
"#,
    );
}

#[test]
fn matching_arguments_are_removed_in_nested_calls() {
    check(
        RemoveParameter,
        r#"
class A
{
    int foo(int a, /*start*/int b/*end*/)
    {
        return a;
    }

    void bar()
    {
        foo(b: foo(a: 1, b: 2), a: foo(foo(b: 2, a: 1), 2));
    }
}
"#,
        r#"
class A
{
    int foo(int a)
    {
        return a;
    }

    void bar()
    {
        foo(a: foo(foo(a: 1)));
    }
}
"#,
    );
}

#[test]
fn constructor_parameter() {
    check(
        RemoveParameter,
        r#"
class A
{
    public A(int a, /*start*/A b/*end*/)
    {
        int c = a;
    }

    void bar()
    {
        new A(b: new A(a: 1, b: new A(1, null)), a: 2);
    }
}
"#,
        r#"
class A
{
    public A(int a)
    {
        int c = a;
    }

    void bar()
    {
        new A(a: 2);
    }
}
"#,
    );
}

#[test]
fn used_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int a = p;
    }
}
"#,
    );
}

#[test]
fn written_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        p = 1;
    }
}
"#,
    );
}

#[test]
fn override_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class B
{
    public virtual bool Same(object obj)
    {
        return false;
    }
}

class A : B
{
    public override bool Same(/*start*/object obj/*end*/)
    {
        return false;
    }
}
"#,
    );
}

#[test]
fn explicit_interface_implementation_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
interface I
{
    int foo(int a);
}

class A : I
{
    int I.foo(/*start*/int a/*end*/)
    {
        return 123;
    }
}
"#,
    );
}

#[test]
fn abstract_method_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
abstract class A
{
    public abstract void foo(/*start*/int a/*end*/);
}
"#,
    );
}

#[test]
fn parameter_passed_to_chained_constructor_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    public A(int a)
    {
    }

    public A(int a, /*start*/int b/*end*/) : this(b)
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        RemoveParameter,
        r#"
class A
{
    void foo(int /*caret*/p)
    {
    }
}
"#,
    );
    assert_eq!(text, "Remove parameter `p'");
}

#[test]
fn operator_parameters_are_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    public static int operator +(/*start*/A lhs/*end*/, A rhs)
    {
        return 123;
    }
}
"#,
    );
}

#[test]
fn conversion_operator_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    public static implicit operator int(/*start*/A lhs/*end*/)
    {
        return 123;
    }
}
"#,
    );
}

#[test]
fn lambda_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    void foo()
    {
        System.Func<int, int> bar = (/*caret*/a) => 1;
    }
}
"#,
    );
}

#[test]
fn delegate_declaration_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    public delegate void Handler(/*start*/int a/*end*/, int b);
}
"#,
    );
}

#[test]
fn ref_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    void foo(ref int /*caret*/x)
    {
    }
}
"#,
    );
}

#[test]
fn out_parameter_is_rejected() {
    check_not_applicable(
        RemoveParameter,
        r#"
class A
{
    void foo(int a, out int /*caret*/x)
    {
    }
}
"#,
    );
}
