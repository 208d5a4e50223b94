mod support;

use sharpen_refactor::RefactoringKind::EncapsulateField;
use support::{check, check_not_applicable, description};

#[test]
fn public_field_becomes_private_with_property() {
    check(
        EncapsulateField,
        r#"
class A
{
    public int /*caret*/field = 1;
}
"#,
        r#"
class A
{
    private int field = 1;

    public int GetField
    {
        get
        {
            return field;
        }

        set
        {
            field = value;
        }
    }
}
"#,
    );
}

#[test]
fn internal_protected_access_is_replaced() {
    check(
        EncapsulateField,
        r#"
class A
{
    internal protected int /*caret*/field = 1;
}
"#,
        r#"
class A
{
    private int field = 1;

    public int GetField
    {
        get
        {
            return field;
        }

        set
        {
            field = value;
        }
    }
}
"#,
    );
}

#[test]
fn references_go_through_the_property() {
    check(
        EncapsulateField,
        r#"
class A
{
    public int /*caret*/field = 1;
}

class B
{
    void foo()
    {
        A a = new A();
        a.field = 1;
        int b = a.field;
    }
}
"#,
        r#"
class A
{
    private int field = 1;

    public int GetField
    {
        get
        {
            return field;
        }

        set
        {
            field = value;
        }
    }
}

class B
{
    void foo()
    {
        A a = new A();
        a.GetField = 1;
        int b = a.GetField;
    }
}
"#,
    );
}

#[test]
fn static_field_gets_static_property() {
    check(
        EncapsulateField,
        r#"
class A
{
    public static int /*caret*/count;
}
"#,
        r#"
class A
{
    private static int count;

    public static int GetCount
    {
        get
        {
            return count;
        }

        set
        {
            count = value;
        }
    }
}
"#,
    );
}

#[test]
fn existing_getter_property_is_rejected() {
    check_not_applicable(
        EncapsulateField,
        r#"
class A
{
    int /*caret*/field = 1;

    public int Field
    {
        get { return this.field; }
    }
}
"#,
    );
}

#[test]
fn existing_getter_method_is_rejected() {
    check_not_applicable(
        EncapsulateField,
        r#"
class A
{
    int /*caret*/field = 1;

    public int GetField()
    {
        return this.field;
    }
}
"#,
    );
}

#[test]
fn constant_is_rejected() {
    check_not_applicable(
        EncapsulateField,
        r#"
class A
{
    public const int /*caret*/field = 1;
}
"#,
    );
}

#[test]
fn taken_property_name_is_rejected() {
    check_not_applicable(
        EncapsulateField,
        r#"
class A
{
    public int /*caret*/field = 1;

    void GetField(int x)
    {
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        EncapsulateField,
        r#"
class A
{
    public int /*caret*/field = 1;
}
"#,
    );
    assert_eq!(text, "Encapsulate field `field'");
}
