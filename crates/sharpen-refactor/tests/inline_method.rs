mod support;

use sharpen_config::SharpenConfig;
use sharpen_refactor::applicable_action;
use sharpen_refactor::RefactoringKind::InlineMethod;
use sharpen_semantic::{
    DataFlowFacts, DeclLocation, FlowRegion, Reference, SemanticModel, SemanticOracle, Symbol,
    SymbolId, Type, TypeInfo,
};
use sharpen_syntax::{Document, FileId, NodeId};
use sharpen_test_utils::Fixture;
use support::{check, check_not_applicable, description};

/// Answers like the model but knows no declaration sites, as for methods
/// that only exist in referenced metadata.
struct MetadataOnly<'a>(&'a SemanticModel);

impl SemanticOracle for MetadataOnly<'_> {
    fn files(&self) -> Vec<FileId> {
        self.0.files()
    }

    fn document(&self, file: &FileId) -> Option<&Document> {
        self.0.document(file)
    }

    fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.0.symbol(id)
    }

    fn resolve_symbol(&self, file: &FileId, node: NodeId) -> Option<SymbolId> {
        self.0.resolve_symbol(file, node)
    }

    fn type_of(&self, file: &FileId, expr: NodeId) -> Option<TypeInfo> {
        self.0.type_of(file, expr)
    }

    fn analyze_data_flow(&self, file: &FileId, region: FlowRegion) -> Option<DataFlowFacts> {
        self.0.analyze_data_flow(file, region)
    }

    fn lookup_visible(
        &self,
        file: &FileId,
        position: usize,
        name: &str,
        container: Option<SymbolId>,
    ) -> Vec<SymbolId> {
        self.0.lookup_visible(file, position, name, container)
    }

    fn locate_declaration(&self, _symbol: SymbolId) -> Option<DeclLocation> {
        None
    }

    fn members(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.0.members(ty)
    }

    fn base_types(&self, ty: SymbolId) -> Vec<SymbolId> {
        self.0.base_types(ty)
    }

    fn references(&self, symbol: SymbolId) -> Vec<Reference> {
        self.0.references(symbol)
    }

    fn converts(&self, from: &Type, to: &Type) -> bool {
        self.0.converts(from, to)
    }
}

#[test]
fn inlines_single_return_expression() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/();
    }

    int bar()
    {
        return 1 + 2;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1 + 2;
    }

    int bar()
    {
        return 1 + 2;
    }
}
"#,
    );
}

#[test]
fn maps_arguments_to_parameters() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int b = 1, c = 2;
        int a = /*start*/bar/*end*/(b, c);
    }

    int bar(int a, int b)
    {
        return a + b;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int b = 1, c = 2;
        int a = b + c;
    }

    int bar(int a, int b)
    {
        return a + b;
    }
}
"#,
    );
}

#[test]
fn named_arguments_map_by_name() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/(b: 1, a: 2);
    }

    int bar(int a, int b)
    {
        return a - b;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 2 - 1;
    }

    int bar(int a, int b)
    {
        return a - b;
    }
}
"#,
    );
}

#[test]
fn casts_result_to_declared_return_type() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        double a = 1 / /*start*/bar/*end*/();
    }

    double bar()
    {
        return 5;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        double a = 1 / (double)5;
    }

    double bar()
    {
        return 5;
    }
}
"#,
    );
}

#[test]
fn parenthesizes_under_binary_operator() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = 1 * /*start*/bar/*end*/();
    }

    int bar()
    {
        return 2 + 3;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1 * (2 + 3);
    }

    int bar()
    {
        return 2 + 3;
    }
}
"#,
    );
}

#[test]
fn out_parameter_is_assigned_through_argument() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int x;
        int a = 1 * /*start*/bar/*end*/(out x);
    }

    int bar(out int a)
    {
        return a = 1;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int x;
        int a = 1 * (x = 1);
    }

    int bar(out int a)
    {
        return a = 1;
    }
}
"#,
    );
}

#[test]
fn ref_parameter_is_assigned_through_argument() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int x = 2;
        int a = 1 * /*start*/bar/*end*/(ref x);
    }

    int bar(ref int a)
    {
        return a = 1;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int x = 2;
        int a = 1 * (x = 1);
    }

    int bar(ref int a)
    {
        return a = 1;
    }
}
"#,
    );
}

#[test]
fn casts_both_arguments_and_result() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        double a = /*start*/bar/*end*/(1 + 2, 3) / 2;
    }

    double bar(float a, int b)
    {
        return a / (b + 4);
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        double a = (double)((float)(1 + 2) / (3 + 4)) / 2;
    }

    double bar(float a, int b)
    {
        return a / (b + 4);
    }
}
"#,
    );
}

#[test]
fn field_references_stay_unqualified() {
    check(
        InlineMethod,
        r#"
class A
{
    int x;

    void foo()
    {
        int a = /*start*/bar/*end*/();
    }

    int bar()
    {
        return x;
    }
}
"#,
        r#"
class A
{
    int x;

    void foo()
    {
        int a = x;
    }

    int bar()
    {
        return x;
    }
}
"#,
    );
}

#[test]
fn omitted_arguments_use_default_values() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/(1);
    }

    int bar(int a, int b = 2, int c = 4)
    {
        return a + b * c;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 1 + 2 * 4;
    }

    int bar(int a, int b = 2, int c = 4)
    {
        return a + b * c;
    }
}
"#,
    );
}

#[test]
fn array_parameter_keeps_element_access() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int[] a = new int[10];
        int b = /*start*/bar/*end*/(a);
    }

    int bar(int[] c)
    {
        return c[1] + c[2];
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int[] a = new int[10];
        int b = a[1] + a[2];
    }

    int bar(int[] c)
    {
        return c[1] + c[2];
    }
}
"#,
    );
}

#[test]
fn substitutes_inferred_type_arguments() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int b = /*start*/bar/*end*/(1);
    }

    T bar<T>(T c)
    {
        return (T)c;
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int b = (int)1;
    }

    T bar<T>(T c)
    {
        return (T)c;
    }
}
"#,
    );
}

#[test]
fn independent_expression_may_be_a_statement() {
    check(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        /*start*/bar/*end*/(1);
    }

    A bar(int c)
    {
        return new A();
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        new A();
    }

    A bar(int c)
    {
        return new A();
    }
}
"#,
    );
}

#[test]
fn inlines_from_another_document() {
    check(
        InlineMethod,
        r#"
//- /Helper.cs
class Helper
{
    public static int Twice(int x)
    {
        return x * 2;
    }
}
//- /Main.cs
class A
{
    void foo()
    {
        int a = Helper./*start*/Twice/*end*/(3);
    }
}
"#,
        r#"
class A
{
    void foo()
    {
        int a = 3 * 2;
    }
}
"#,
    );
}

#[test]
fn by_value_parameter_assigned_in_body_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int x = 2;
        int a = 1 * /*start*/bar/*end*/(x);
    }

    int bar(int a)
    {
        return a = 1;
    }
}
"#,
    );
}

#[test]
fn discarded_side_effect_free_value_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        /*start*/bar/*end*/(1);
    }

    int bar(int c)
    {
        return c;
    }
}
"#,
    );
}

#[test]
fn virtual_method_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int z = /*start*/bar/*end*/();
    }

    public virtual int bar()
    {
        return 123;
    }
}
"#,
    );
}

#[test]
fn overriding_method_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class B
{
    public virtual int bar()
    {
        return 123;
    }
}

class A : B
{
    void foo()
    {
        int z = /*start*/bar/*end*/();
    }

    public override int bar()
    {
        return 456;
    }
}
"#,
    );
}

#[test]
fn method_with_several_statements_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int z = /*start*/bar/*end*/();
    }

    int bar()
    {
        int y = 1;
        return y;
    }
}
"#,
    );
}

#[test]
fn explicit_interface_implementation_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
interface I
{
    int bar();
}

class A : I
{
    void foo()
    {
        int z = this./*start*/bar/*end*/();
    }

    int I.bar()
    {
        return 1;
    }
}
"#,
    );
}

#[test]
fn describes_with_method_name() {
    let text = description(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/();
    }

    int bar()
    {
        return 1;
    }
}
"#,
    );
    assert_eq!(text, "Inline method `bar'");
}

#[test]
fn method_without_source_declaration_is_rejected() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/();
    }

    int bar()
    {
        return 1;
    }
}
"#,
    );
    let config = SharpenConfig::default();
    let (file, span) = fixture.selection();
    assert!(applicable_action(&fixture.model, &config, InlineMethod, &file, span).is_some());

    let oracle = MetadataOnly(&fixture.model);
    let action = applicable_action(&oracle, &config, InlineMethod, &file, span);
    assert!(action.is_none(), "offered without a declaration: {action:?}");
}

#[test]
fn extern_method_without_body_is_rejected() {
    check_not_applicable(
        InlineMethod,
        r#"
class A
{
    void foo()
    {
        int a = /*start*/bar/*end*/();
    }

    static extern int bar();
}
"#,
    );
}

#[test]
fn parenthesizes_negated_argument_as_receiver() {
    check(
        InlineMethod,
        r#"
class A
{
    string foo(int a)
    {
        return /*start*/Show/*end*/(-a);
    }

    string Show(int x)
    {
        return x.ToString();
    }
}
"#,
        r#"
class A
{
    string foo(int a)
    {
        return (-a).ToString();
    }

    string Show(int x)
    {
        return x.ToString();
    }
}
"#,
    );
}
