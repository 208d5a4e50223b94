mod support;

use sharpen_refactor::RefactoringKind::IntroduceParameterObject;
use support::{check, check_not_applicable, description};

#[test]
fn all_parameters() {
    check(
        IntroduceParameterObject,
        r#"
class A
{
    int foo(/*start*/int a, float f/*end*/)
    {
        int b = a;
        float d = f;
        return 123;
    }

    void bar()
    {
        foo(5, 3.14f);
        foo(5, f: 3.14f);
        foo(f: 3.14f, a: 5);
    }
}
"#,
        r#"
class A
{
    int foo(ParameterObject parameterObject)
    {
        int b = parameterObject.a;
        float d = parameterObject.f;
        return 123;
    }

    void bar()
    {
        foo(new ParameterObject(5, 3.14f));
        foo(new ParameterObject(5, f: 3.14f));
        foo(parameterObject: new ParameterObject(f: 3.14f, a: 5));
    }
}

class ParameterObject
{
    public int a { get; set; }
    public float f { get; set; }

    public ParameterObject(int a, float f)
    {
        this.a = a;
        this.f = f;
    }
}
"#,
    );
}

#[test]
fn selected_parameters() {
    check(
        IntroduceParameterObject,
        r#"
class A
{
    int foo(int i, /*start*/A a, string s/*end*/, float f)
    {
        int b = i;
        float d = f;
        A c = a;
        s = "";
        return 123;
    }

    void bar()
    {
        foo(5, null, "test", 3.14f);
        foo(5, null, s: "test", f: 3.14f);
        foo(f: 3.14f, a: null, i: 5, s: "test");
    }
}
"#,
        r#"
class A
{
    int foo(int i, ParameterObject parameterObject, float f)
    {
        int b = i;
        float d = f;
        A c = parameterObject.a;
        parameterObject.s = "";
        return 123;
    }

    void bar()
    {
        foo(5, new ParameterObject(null, "test"), 3.14f);
        foo(5, new ParameterObject(null, s: "test"), f: 3.14f);
        foo(f: 3.14f, parameterObject: new ParameterObject(a: null, s: "test"), i: 5);
    }
}

class ParameterObject
{
    public A a { get; set; }
    public string s { get; set; }

    public ParameterObject(A a, string s)
    {
        this.a = a;
        this.s = s;
    }
}
"#,
    );
}

#[test]
fn nested_calls() {
    check(
        IntroduceParameterObject,
        r#"
class A
{
    int foo(int i, /*start*/A a, string s/*end*/, float f)
    {
        return i;
    }

    void bar()
    {
        foo(f: 3.14f, a: null, i: foo(1, null, f: 3.14f, s: "test"), s: "test");
    }
}
"#,
        r#"
class A
{
    int foo(int i, ParameterObject parameterObject, float f)
    {
        return i;
    }

    void bar()
    {
        foo(f: 3.14f, parameterObject: new ParameterObject(a: null, s: "test"), i: foo(1, new ParameterObject(null, s: "test"), f: 3.14f));
    }
}

class ParameterObject
{
    public A a { get; set; }
    public string s { get; set; }

    public ParameterObject(A a, string s)
    {
        this.a = a;
        this.s = s;
    }
}
"#,
    );
}

#[test]
fn constructor_and_nested_creations() {
    check(
        IntroduceParameterObject,
        r#"
class A
{
    public A(int i, /*start*/A a, string s/*end*/, float f)
    {
        string z = s;
    }

    void bar()
    {
        new A(f: 3.14f, a: new A(1, null, f: 3.14f, s: "test"), i: 3, s: "test");
    }
}
"#,
        r#"
class A
{
    public A(int i, ParameterObject parameterObject, float f)
    {
        string z = parameterObject.s;
    }

    void bar()
    {
        new A(f: 3.14f, parameterObject: new ParameterObject(a: new A(1, new ParameterObject(null, s: "test"), f: 3.14f), s: "test"), i: 3);
    }
}

class ParameterObject
{
    public A a { get; set; }
    public string s { get; set; }

    public ParameterObject(A a, string s)
    {
        this.a = a;
        this.s = s;
    }
}
"#,
    );
}

#[test]
fn ref_parameter_is_rejected() {
    check_not_applicable(
        IntroduceParameterObject,
        r#"
class A
{
    int foo(int i, /*start*/A a, ref string s/*end*/, float f)
    {
        return i;
    }
}
"#,
    );
}

#[test]
fn out_parameter_is_rejected() {
    check_not_applicable(
        IntroduceParameterObject,
        r#"
class A
{
    int foo(int i, /*start*/A a, out string s/*end*/, float f)
    {
        s = "";
        return i;
    }
}
"#,
    );
}

#[test]
fn explicit_interface_implementation_is_rejected() {
    check_not_applicable(
        IntroduceParameterObject,
        r#"
interface I
{
    int foo(int a);
}

class A : I
{
    int I.foo(int /*caret*/a)
    {
        return 123;
    }
}
"#,
    );
}

#[test]
fn override_is_rejected() {
    check_not_applicable(
        IntroduceParameterObject,
        r#"
class B
{
    public virtual void foo(int a)
    {
    }
}

class A : B
{
    public override void foo(int /*caret*/a)
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        IntroduceParameterObject,
        r#"
class A
{
    void foo(int /*caret*/a)
    {
    }
}
"#,
    );
    assert_eq!(text, "Introduce parameter object");
}

#[test]
fn operator_parameters_are_rejected() {
    check_not_applicable(
        IntroduceParameterObject,
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
        IntroduceParameterObject,
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
        IntroduceParameterObject,
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
        IntroduceParameterObject,
        r#"
class A
{
    public delegate void Handler(/*start*/int a/*end*/, int b);
}
"#,
    );
}
