mod support;

use sharpen_refactor::RefactoringKind::RenameLocal;
use support::{check, check_not_applicable, description};

#[test]
fn renames_declaration_and_references() {
    check(
        RenameLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
        bar(ref local);
        bar(p: ref local);
    }

    void bar(ref int p)
    {
        p = 1;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
        bar(ref newVariableName);
        bar(p: ref newVariableName);
    }

    void bar(ref int p)
    {
        p = 1;
    }
}
"#,
    );
}

#[test]
fn caret_on_a_reference() {
    check(
        RenameLocal,
        r#"
class A
{
    void foo()
    {
        int local = 1;
        int a = /*caret*/local;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
    }
}
"#,
    );
}

#[test]
fn nested_type_with_the_name_is_allowed() {
    check(
        RenameLocal,
        r#"
class A
{
    class newVariableName { }

    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
        newVariableName c;
    }
}
"#,
        r#"
class A
{
    class newVariableName { }

    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
        newVariableName c;
    }
}
"#,
    );
}

#[test]
fn unreferenced_field_with_the_name_is_allowed() {
    check(
        RenameLocal,
        r#"
class A
{
    int newVariableName;

    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
    }
}
"#,
        r#"
class A
{
    int newVariableName;

    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
    }
}
"#,
    );
}

#[test]
fn shadowed_field_is_qualified_with_this() {
    check(
        RenameLocal,
        r#"
class A
{
    int newVariableName;

    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
        int b = newVariableName;
    }
}
"#,
        r#"
class A
{
    int newVariableName;

    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
        int b = this.newVariableName;
    }
}
"#,
    );
}

#[test]
fn shadowed_static_field_is_qualified_with_type() {
    check(
        RenameLocal,
        r#"
class A
{
    static int newVariableName;

    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
        int b = newVariableName;
    }
}
"#,
        r#"
class A
{
    static int newVariableName;

    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
        int b = A.newVariableName;
    }
}
"#,
    );
}

#[test]
fn shadowed_method_is_qualified() {
    check(
        RenameLocal,
        r#"
class A
{
    int newVariableName()
    {
        return 123;
    }

    void foo()
    {
        int /*caret*/local = 1;
        int a = local;
        int b = newVariableName();
    }
}
"#,
        r#"
class A
{
    int newVariableName()
    {
        return 123;
    }

    void foo()
    {
        int newVariableName = 1;
        int a = newVariableName;
        int b = this.newVariableName();
    }
}
"#,
    );
}

#[test]
fn member_access_names_are_left_alone() {
    check(
        RenameLocal,
        r#"
class A
{
    B b = new B();

    void foo()
    {
        int /*caret*/local = 1;
        int x = local;
        b.newVariableName = 123;
        A a = new A();
        a.b.newVariableName = 456;
    }
}

class B
{
    public int newVariableName;
}
"#,
        r#"
class A
{
    B b = new B();

    void foo()
    {
        int newVariableName = 1;
        int x = newVariableName;
        b.newVariableName = 123;
        A a = new A();
        a.b.newVariableName = 456;
    }
}

class B
{
    public int newVariableName;
}
"#,
    );
}

#[test]
fn name_reserved_by_local_is_rejected() {
    check_not_applicable(
        RenameLocal,
        r#"
class A
{
    void foo()
    {
        int newVariableName = 1;
        int /*caret*/local = 1;
        int a = local;
    }
}
"#,
    );
}

#[test]
fn name_reserved_by_later_local_is_rejected() {
    check_not_applicable(
        RenameLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/local = 1;
        {
            int newVariableName = 2;
        }
    }
}
"#,
    );
}

#[test]
fn name_reserved_by_parameter_is_rejected() {
    check_not_applicable(
        RenameLocal,
        r#"
class A
{
    void foo(int newVariableName)
    {
        int /*caret*/local = 1;
        int a = local;
    }
}
"#,
    );
}

#[test]
fn parameter_is_not_a_local() {
    check_not_applicable(
        RenameLocal,
        r#"
class A
{
    void foo(int p)
    {
        int a = /*caret*/p;
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        RenameLocal,
        r#"
class A
{
    void foo()
    {
        int /*caret*/local = 1;
    }
}
"#,
    );
    assert_eq!(text, "Rename local variable `local' to `newVariableName'");
}
