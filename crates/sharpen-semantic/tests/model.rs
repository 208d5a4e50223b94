use pretty_assertions::assert_eq;
use sharpen_semantic::{FlowRegion, SemanticModel, SemanticOracle, SymbolId, SymbolKind, Type};
use sharpen_syntax::{FileId, NodeId, TextRange};
use sharpen_test_utils::Fixture;

/// The outermost expression spanning exactly the selection.
fn selected_expr(fixture: &Fixture) -> (FileId, NodeId) {
    let (file, range) = fixture.selection();
    let doc = fixture.model.document(&file).expect("document");
    let id = doc
        .root()
        .preorder()
        .find(|node| node.as_expr().is_some() && doc.range(node.id()) == Some(range))
        .map(|node| node.id())
        .expect("no expression matches the selection");
    (file, id)
}

/// The statement whose range starts at the selection.
fn selected_stmt(fixture: &Fixture) -> (FileId, NodeId) {
    let (file, range) = fixture.selection();
    let doc = fixture.model.document(&file).expect("document");
    let id = doc
        .root()
        .preorder()
        .find(|node| {
            node.kind().is_stmt() && doc.range(node.id()).map(|r| r.start) == Some(range.start)
        })
        .map(|node| node.id())
        .expect("no statement starts at the selection");
    (file, id)
}

fn names(model: &SemanticModel, ids: impl IntoIterator<Item = SymbolId>) -> Vec<String> {
    ids.into_iter()
        .filter_map(|id| model.symbol_name(id).map(str::to_string))
        .collect()
}

#[test]
fn local_references_include_the_declaration() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void M()
    {
        int a = 1;
        int b = /*start*/a/*end*/ + a;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let model = &fixture.model;
    let symbol = model.resolve_symbol(&file, expr).expect("resolved");
    assert_eq!(model.symbol(symbol).map(|s| s.kind), Some(SymbolKind::Local));

    let refs = model.references(symbol);
    assert_eq!(refs.len(), 3);
    assert!(refs[0].is_declaration);
    assert!(refs[1..].iter().all(|r| !r.is_declaration));
    assert_eq!(&fixture.text(&file)[refs[0].range.start..refs[0].range.end], "a");
}

#[test]
fn int_literal_is_converted_in_float_division() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void M()
    {
        float f = 5;
        float g = /*start*/1/*end*/ / f;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let info = fixture.model.type_of(&file, expr).expect("typed");
    assert_eq!(info.static_type, Type::Int);
    assert_eq!(info.converted_type, Type::Float);
}

#[test]
fn initializer_is_converted_to_the_declared_type() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void M()
    {
        float f = /*start*/5/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let info = fixture.model.type_of(&file, expr).expect("typed");
    assert_eq!(info.static_type, Type::Int);
    assert_eq!(info.converted_type, Type::Float);
}

#[test]
fn assignment_inside_parentheses_is_a_write() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void M()
    {
        int a;
        int c = /*start*/(a = 1)/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let model = &fixture.model;
    let flow = model
        .analyze_data_flow(&file, FlowRegion::Expr(expr))
        .expect("flow");
    assert_eq!(names(model, flow.written_inside), vec!["a"]);
    assert!(flow.read_inside.is_empty());
    assert_eq!(names(model, flow.written_outside), vec!["c"]);
}

#[test]
fn statement_flow_separates_inside_from_outside() {
    let fixture = Fixture::parse(
        r#"
class A
{
    int M(int p)
    {
        int x = p;
        /*start*/x = x + 1;/*end*/
        return x;
    }
}
"#,
    );
    let (file, stmt) = selected_stmt(&fixture);
    let model = &fixture.model;
    let flow = model
        .analyze_data_flow(&file, FlowRegion::statement(stmt))
        .expect("flow");
    assert_eq!(names(model, flow.read_inside), vec!["x"]);
    assert_eq!(names(model, flow.written_inside), vec!["x"]);
    assert_eq!(names(model, flow.read_outside), vec!["p", "x"]);
    assert_eq!(names(model, flow.written_outside), vec!["p", "x"]);
}

#[test]
fn implicit_field_access_reads_the_receiver() {
    let fixture = Fixture::parse(
        r#"
class A
{
    int field;

    int M()
    {
        return /*start*/field + 1/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let model = &fixture.model;
    let flow = model
        .analyze_data_flow(&file, FlowRegion::Expr(expr))
        .expect("flow");
    let receivers: Vec<_> = flow
        .read_inside
        .iter()
        .filter(|id| model.symbol(**id).map(|s| s.kind) == Some(SymbolKind::Receiver))
        .collect();
    assert_eq!(receivers.len(), 1);
}

#[test]
fn out_argument_is_written_and_ref_argument_is_read_and_written() {
    let fixture = Fixture::parse(
        r#"
class A
{
    void Fill(out int a, ref int b)
    {
        a = 1;
        b = b + 1;
    }

    void M()
    {
        int x;
        int y = 0;
        /*start*/Fill(out x, ref y);/*end*/
    }
}
"#,
    );
    let (file, stmt) = selected_stmt(&fixture);
    let model = &fixture.model;
    let flow = model
        .analyze_data_flow(&file, FlowRegion::statement(stmt))
        .expect("flow");
    assert_eq!(names(model, flow.written_inside), vec!["x", "y"]);
    assert!(names(model, flow.read_inside.iter().copied()).contains(&"y".to_string()));
    assert!(!names(model, flow.read_inside.iter().copied()).contains(&"x".to_string()));
}

#[test]
fn invocation_resolves_overload_by_argument_count() {
    let fixture = Fixture::parse(
        r#"
class A
{
    int F(int a) { return a; }
    int F(int a, int b) { return a + b; }

    void M()
    {
        int r = /*start*/F(1, 2)/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let model = &fixture.model;
    let method = model.resolve_symbol(&file, expr).expect("resolved");
    assert_eq!(model.symbol(method).map(|s| s.params.len()), Some(2));
}

#[test]
fn generic_method_return_type_is_inferred_from_arguments() {
    let fixture = Fixture::parse(
        r#"
class A
{
    T Id<T>(T value) { return value; }

    void M()
    {
        var r = /*start*/Id(2.5)/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let info = fixture.model.type_of(&file, expr).expect("typed");
    assert_eq!(info.static_type, Type::Double);
}

#[test]
fn member_access_through_another_type() {
    let fixture = Fixture::parse(
        r#"
//- /Point.cs
class Point
{
    public int X;
}
//- /Main.cs
class A
{
    int M(Point p)
    {
        return /*start*/p.X/*end*/;
    }
}
"#,
    );
    let (file, expr) = selected_expr(&fixture);
    let model = &fixture.model;
    let field = model.resolve_symbol(&file, expr).expect("resolved");
    let decl = model.locate_declaration(field).expect("declared in source");
    assert_eq!(decl.file, fixture.file("/Point.cs"));
    assert_eq!(model.type_of(&file, expr).map(|t| t.static_type), Some(Type::Int));
}

#[test]
fn lookup_visible_sees_locals_parameters_and_members() {
    let fixture = Fixture::parse(
        r#"
class Base
{
    protected int value;
}

class A : Base
{
    void M(int p)
    {
        int local = p;
        /*caret*/local = local + 1;
    }
}
"#,
    );
    let (file, range) = fixture.selection();
    let model = &fixture.model;
    let a = model.type_named("A").expect("type A");
    let position = range.start;

    assert_eq!(model.lookup_visible(&file, position, "local", None).len(), 1);
    assert_eq!(model.lookup_visible(&file, position, "p", None).len(), 1);
    assert!(model.lookup_visible(&file, position, "value", None).is_empty());
    assert_eq!(model.lookup_visible(&file, position, "value", Some(a)).len(), 1);
    assert!(model.lookup_visible(&file, 0, "local", None).is_empty());
}

#[test]
fn base_types_follow_the_base_list() {
    let fixture = Fixture::parse(
        r#"
interface I { }
class Base { }
class A : Base, I { }
"#,
    );
    let model = &fixture.model;
    let a = model.type_named("A").expect("A");
    let bases = names(model, model.base_types(a));
    assert_eq!(bases, vec!["Base", "I"]);
    assert!(model.converts(
        &model.symbol(a).expect("A").ty,
        &model.symbol(model.type_named("I").expect("I")).expect("I").ty,
    ));
}

#[test]
fn selection_range_helper_matches_marker_positions() {
    let fixture = Fixture::parse("class A { int x = /*start*/1/*end*/; }");
    let (_, range) = fixture.selection();
    assert_eq!(range, TextRange::new(18, 19));
}
