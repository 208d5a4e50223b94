use pretty_assertions::assert_eq;
use sharpen_syntax::printer::{print_expr, print_unit};
use sharpen_syntax::{parse, ExprKind, Item, Member, NodeRef, NumericValue, StmtKind, SyntaxKind};

fn roundtrip(text: &str) -> String {
    let parse = parse(text);
    assert!(parse.errors.is_empty(), "unexpected errors: {:?}", parse.errors);
    print_unit(&parse.unit)
}

fn first_method_stmt_expr(text: &str) -> String {
    let parse = parse(text);
    let Item::Type(decl) = &parse.unit.items[0] else {
        panic!("expected type");
    };
    let Member::Method(method) = &decl.members[0] else {
        panic!("expected method");
    };
    let stmt = &method.body.as_ref().unwrap().stmts[0];
    match &stmt.kind {
        StmtKind::Expr(expr) => print_expr(expr),
        StmtKind::Local(local) => print_expr(local.declarators[0].init.as_ref().unwrap()),
        other => panic!("unexpected statement {other:?}"),
    }
}

#[test]
fn canonical_print_is_a_fixed_point() {
    let text = r#"
using System;
using System.Collections.Generic;

namespace Demo.Inner
{
    // A class with a bit of everything.
    public class A<T> : Base, IFoo where T : class, new()
    {
        private int x = 1, y;
        const double Pi = 3.14;

        public A(int x) : base(x)
        {
            this.x = x;
        }

        public int X { get { return x; } set { x = value; } }

        void IFoo.Run() { }

        public static A<T> operator +(A<T> a, A<T> b) { return a; }

        public static implicit operator int(A<T> a) { return a.x; }

        public delegate void Handler(object sender);

        protected virtual T Get<U>(ref int a, out U b, params int[] rest) where U : struct
        {
            b = default(U);
            for (int i = 0; i < rest.Length; i++)
            {
                a += rest[i];
            }
            foreach (var item in rest)
                a -= item;
            do { a--; } while (a > 10);
            while (a < 0) a++;
            Func<int, int> f = v => v * 2;
            Action g = delegate (int q) { Console.WriteLine(q); };
            var list = new List<int>();
            var arr = new int[3];
            if (a == 1) return null; else if (a == 2) throw new Exception("two"); else { }
            return (T)Make(typeof(T), name: "x");
        }
    }
}
"#;
    let once = roundtrip(text);
    let twice = roundtrip(&once);
    assert_eq!(once, twice);
}

#[test]
fn keeps_comments_before_statements() {
    let printed = roundtrip("class C { void M() {\n // note\n x = 1; } }");
    assert_eq!(
        printed,
        "class C\n{\n    void M()\n    {\n        // note\n        x = 1;\n    }\n}\n"
    );
}

#[test]
fn binary_precedence_is_left_associative() {
    let parse = parse("class C { void M() { x = a - b - c * d; } }");
    let root = NodeRef::Unit(&parse.unit);
    let binary = root
        .preorder()
        .find(|node| node.kind() == SyntaxKind::Binary)
        .and_then(NodeRef::as_expr)
        .unwrap();
    let ExprKind::Binary(_, lhs, rhs) = &binary.kind else {
        panic!("expected binary");
    };
    assert_eq!(print_expr(lhs), "a - b");
    assert_eq!(print_expr(rhs), "c * d");
}

#[test]
fn distinguishes_casts_from_parenthesized_expressions() {
    let cast = first_method_stmt_expr("class C { void M() { x = (int)y; } }");
    assert_eq!(cast, "x = (int)y");
    let parse = parse("class C { void M() { x = (a) + b; } }");
    let root = NodeRef::Unit(&parse.unit);
    assert!(root.preorder().any(|node| node.kind() == SyntaxKind::Paren));
    assert!(!root.preorder().any(|node| node.kind() == SyntaxKind::Cast));
}

#[test]
fn generic_invocation_versus_comparison() {
    assert_eq!(
        first_method_stmt_expr("class C { void M() { Foo<int>(a); } }"),
        "Foo<int>(a)"
    );
    assert_eq!(
        first_method_stmt_expr("class C { void M() { bool r = a < b && c > d; } }"),
        "a < b && c > d"
    );
}

#[test]
fn shift_operators_are_assembled_from_angle_brackets() {
    assert_eq!(
        first_method_stmt_expr("class C { void M() { x = a >> 2; } }"),
        "x = a >> 2"
    );
    assert_eq!(
        first_method_stmt_expr("class C { void M() { x >>= 1; } }"),
        "x >>= 1"
    );
    let printed = roundtrip("class C { List<List<int>> f; }");
    assert_eq!(printed, "class C\n{\n    List<List<int>> f;\n}\n");
}

#[test]
fn node_ranges_cover_their_source_text() {
    let text = "class C { int M() { return 1 + 2; } }";
    let parse = parse(text);
    let root = NodeRef::Unit(&parse.unit);
    let binary = root
        .preorder()
        .find(|node| node.kind() == SyntaxKind::Binary)
        .unwrap();
    let range = parse.source_map.range(binary.id()).unwrap();
    assert_eq!(&text[range.start..range.end], "1 + 2");
}

#[test]
fn indexers_are_reported_and_skipped() {
    let parse = parse("class C { int this[int i] { get { return i; } } int f; }");
    assert_eq!(parse.errors.len(), 1);
    let Item::Type(decl) = &parse.unit.items[0] else {
        panic!("expected type");
    };
    assert_eq!(decl.members.len(), 1);
    assert!(matches!(decl.members[0], Member::Field(_)));
}

#[test]
fn numeric_literals_compare_by_value() {
    let parse = parse(
        "class C { void f() { double a = 123d + 123.0 + 1e2; long b = 0x1FL + 031L + 3_1L; } }",
    );
    let values: Vec<_> = NodeRef::Unit(&parse.unit)
        .preorder()
        .filter_map(|node| match &node.as_expr()?.kind {
            ExprKind::Literal(literal) => Some(literal.numeric_value()),
            _ => None,
        })
        .collect();
    assert_eq!(
        values,
        [
            Some(NumericValue::Real(123.0)),
            Some(NumericValue::Real(123.0)),
            Some(NumericValue::Real(100.0)),
            Some(NumericValue::Integer(31)),
            Some(NumericValue::Integer(31)),
            Some(NumericValue::Integer(31)),
        ]
    );
}
