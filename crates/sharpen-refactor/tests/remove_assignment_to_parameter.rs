mod support;

use sharpen_refactor::RefactoringKind::RemoveAssignmentToParameter;
use support::{check, check_not_applicable, description};

#[test]
fn reads_before_first_write_keep_the_parameter() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int a = p + 1;
        p = 2;
        int b = p;
    }
}
"#,
        r#"
class A
{
    void foo(int p)
    {
        int tempVariable = p;
        int a = p + 1;
        tempVariable = 2;
        int b = tempVariable;
    }
}
"#,
    );
}

#[test]
fn compound_assignment() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int a = p + 1;
        p += 2;
        int b = p;
    }
}
"#,
        r#"
class A
{
    void foo(int p)
    {
        int tempVariable = p;
        int a = p + 1;
        tempVariable += 2;
        int b = tempVariable;
    }
}
"#,
    );
}

#[test]
fn selected_from_the_assignment() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(int p)
    {
        int a = 123;
        /*start*/p = 2/*end*/;
    }
}
"#,
        r#"
class A
{
    void foo(int p)
    {
        int tempVariable = p;
        int a = 123;
        tempVariable = 2;
    }
}
"#,
    );
}

#[test]
fn nested_blocks() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(int p)
    {
        int a = p;
        {
            int b = p;
            /*start*/p = 2/*end*/;
            int c = p;
        }
    }
}
"#,
        r#"
class A
{
    void foo(int p)
    {
        int tempVariable = p;
        int a = p;
        {
            int b = p;
            tempVariable = 2;
            int c = tempVariable;
        }
    }
}
"#,
    );
}

#[test]
fn if_else_chain() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    int foo(/*start*/int p/*end*/)
    {
        int a = p;
        if (p == 1) p = 2;
        else if (p == 2) p = 3;
        else p = 4;
        int b = p;
        return p;
    }
}
"#,
        r#"
class A
{
    int foo(int p)
    {
        int tempVariable = p;
        int a = p;
        if (p == 1) tempVariable = 2;
        else if (p == 2) tempVariable = 3;
        else tempVariable = 4;
        int b = tempVariable;
        return tempVariable;
    }
}
"#,
    );
}

#[test]
fn for_loop_writing_in_its_header() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    int foo(/*start*/int p/*end*/)
    {
        int a = p;
        for (int i = p; i < 10; ++i, ++p)
        {
            int b = p;
        }
        return p;
    }
}
"#,
        r#"
class A
{
    int foo(int p)
    {
        int tempVariable = p;
        int a = p;
        for (int i = tempVariable; i < 10; ++i, ++tempVariable)
        {
            int b = tempVariable;
        }
        return tempVariable;
    }
}
"#,
    );
}

#[test]
fn while_loop_carries_the_write_into_earlier_reads() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    int foo(/*start*/int p/*end*/)
    {
        int sum = 0;
        while (sum < 10)
        {
            sum += p;
            p = p * 2;
        }
        return sum;
    }
}
"#,
        r#"
class A
{
    int foo(int p)
    {
        int tempVariable = p;
        int sum = 0;
        while (sum < 10)
        {
            sum += tempVariable;
            tempVariable = tempVariable * 2;
        }
        return sum;
    }
}
"#,
    );
}

#[test]
fn write_in_if_condition() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    int foo(/*start*/int p/*end*/)
    {
        int b = p;
        if (++p == 123)
        {
            int c = p;
        }
        return p;
    }
}
"#,
        r#"
class A
{
    int foo(int p)
    {
        int tempVariable = p;
        int b = p;
        if (++tempVariable == 123)
        {
            int c = tempVariable;
        }
        return tempVariable;
    }
}
"#,
    );
}

#[test]
fn write_in_call_argument() {
    check(
        RemoveAssignmentToParameter,
        r#"
class A
{
    int foo(/*start*/int p/*end*/)
    {
        int b = p;
        foo(++p);
        return p;
    }
}
"#,
        r#"
class A
{
    int foo(int p)
    {
        int tempVariable = p;
        int b = p;
        foo(++tempVariable);
        return tempVariable;
    }
}
"#,
    );
}

#[test]
fn parameter_never_assigned_is_rejected() {
    check_not_applicable(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int a = p + 1;
        int b = p;
        bar(p);
    }

    void bar(int a)
    {
    }
}
"#,
    );
}

#[test]
fn ref_parameter_is_rejected() {
    check_not_applicable(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(/*start*/ref int p/*end*/)
    {
        p = 2;
    }
}
"#,
    );
}

#[test]
fn taken_temporary_name_is_rejected() {
    check_not_applicable(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(/*start*/int p/*end*/)
    {
        int tempVariable = 1;
        p = 2;
    }
}
"#,
    );
}

#[test]
fn assignment_to_local_is_not_offered() {
    check_not_applicable(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(int p)
    {
        int a = 1;
        /*start*/a = 2/*end*/;
    }
}
"#,
    );
}

#[test]
fn describes_itself() {
    let text = description(
        RemoveAssignmentToParameter,
        r#"
class A
{
    void foo(int /*caret*/p)
    {
        p = 1;
    }
}
"#,
    );
    assert_eq!(text, "Remove assignment to parameter");
}
