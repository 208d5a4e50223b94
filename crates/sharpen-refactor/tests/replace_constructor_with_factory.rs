mod support;

use sharpen_refactor::RefactoringKind::ReplaceConstructorWithFactory;
use support::{check, check_not_applicable, description};

#[test]
fn parameterless_constructor() {
    check(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    public /*caret*/A()
    {
    }
}

class B
{
    void foo()
    {
        new A();
    }
}
"#,
        r#"
class A
{
    private A()
    {
    }

    public static A CreateA()
    {
        return new A();
    }
}

class B
{
    void foo()
    {
        A.CreateA();
    }
}
"#,
    );
}

#[test]
fn parameters_keep_their_modes() {
    check(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    public /*caret*/A(ref int a, out float f, string s)
    {
        f = 1;
    }
}

class B
{
    void foo()
    {
        int i = 1;
        float f;
        new A(ref i, out f, "test");
    }
}
"#,
        r#"
class A
{
    private A(ref int a, out float f, string s)
    {
        f = 1;
    }

    public static A CreateA(ref int a, out float f, string s)
    {
        return new A(ref a, out f, s);
    }
}

class B
{
    void foo()
    {
        int i = 1;
        float f;
        A.CreateA(ref i, out f, "test");
    }
}
"#,
    );
}

#[test]
fn only_creations_of_the_chosen_constructor() {
    check(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    internal /*caret*/A(int x)
    {
    }

    public A()
    {
    }
}

class B
{
    void foo()
    {
        A a = new A(new A(2) == null ? 1 : 3);
        A b = new A();
    }
}
"#,
        r#"
class A
{
    private A(int x)
    {
    }

    public A()
    {
    }

    internal static A CreateA(int x)
    {
        return new A(x);
    }
}

class B
{
    void foo()
    {
        A a = A.CreateA(A.CreateA(2) == null ? 1 : 3);
        A b = new A();
    }
}
"#,
    );
}

#[test]
fn static_constructor_is_rejected() {
    check_not_applicable(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    static /*caret*/A()
    {
    }
}
"#,
    );
}

#[test]
fn taken_factory_name_is_rejected() {
    check_not_applicable(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    public /*caret*/A()
    {
    }

    static A CreateA(int x)
    {
        return null;
    }
}
"#,
    );
}

#[test]
fn generic_class_is_rejected() {
    check_not_applicable(
        ReplaceConstructorWithFactory,
        r#"
class A<T>
{
    public /*caret*/A()
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        ReplaceConstructorWithFactory,
        r#"
class A
{
    public /*caret*/A()
    {
    }
}
"#,
    );
    assert_eq!(text, "Replace constructor with factory method");
}
