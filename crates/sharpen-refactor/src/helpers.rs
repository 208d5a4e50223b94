//! Classification and rewrite helpers shared by several refactorings.

use std::collections::{BTreeMap, BTreeSet};

use sharpen_semantic::{SemanticOracle, SymbolId, SymbolKind, Type};
use sharpen_syntax::*;

use crate::make::Make;
use crate::rewrite::{Ancestor, Rewriter, Step};

/// Kind of the direct parent in a rewrite path.
pub(crate) fn parent_kind(path: &[Ancestor]) -> Option<SyntaxKind> {
    path.last().map(|ancestor| ancestor.kind)
}

/// Wraps `value` so it can stand where a reference with parent `parent` was.
///
/// With `cast_to`, the value is converted explicitly first. Binary,
/// conditional, assignment and lambda values are parenthesized under any
/// operator. Other non-primary values (unary, cast, array creation) are
/// parenthesized in receiver and callee positions, and a unary value under
/// another unary operator.
pub(crate) fn substitute(
    make: &mut Make,
    value: Expr,
    cast_to: Option<TypeRef>,
    parent: Option<SyntaxKind>,
) -> Expr {
    let receiver = matches!(
        parent,
        Some(
            SyntaxKind::ElementAccess
                | SyntaxKind::MemberAccess
                | SyntaxKind::Postfix
                | SyntaxKind::Invocation
        )
    );
    let operand = receiver || matches!(parent, Some(SyntaxKind::Binary | SyntaxKind::Unary | SyntaxKind::Cast));
    let loose = matches!(
        value.kind,
        ExprKind::Binary(..)
            | ExprKind::Conditional(..)
            | ExprKind::Assign(..)
            | ExprKind::Lambda(_)
            | ExprKind::AnonymousMethod(_)
    );
    let wrap = if loose {
        operand || cast_to.is_some()
    } else if value.is_primary() {
        false
    } else {
        (receiver && cast_to.is_none())
            || (matches!(value.kind, ExprKind::Unary(..)) && parent == Some(SyntaxKind::Unary))
    };
    let mut out = if wrap { make.paren(value) } else { value };
    if let Some(ty) = cast_to {
        out = make.cast(ty, out);
        if receiver {
            out = make.paren(out);
        }
    }
    out
}

/// The logical negation of `cond`, simplified where the shape allows.
pub(crate) fn invert_condition(make: &mut Make, cond: &Expr) -> Expr {
    match &cond.kind {
        ExprKind::Literal(lit) if lit.kind == LiteralKind::True => make.bool_literal(false),
        ExprKind::Literal(lit) if lit.kind == LiteralKind::False => make.bool_literal(true),
        ExprKind::Unary(UnaryOp::Not, operand) => operand.unparenthesized().clone(),
        ExprKind::Binary(op, lhs, rhs) if op.is_relational() => {
            let inverted = match op {
                BinaryOp::Eq => BinaryOp::Ne,
                BinaryOp::Ne => BinaryOp::Eq,
                BinaryOp::Lt => BinaryOp::Ge,
                BinaryOp::Ge => BinaryOp::Lt,
                BinaryOp::Gt => BinaryOp::Le,
                _ => BinaryOp::Gt,
            };
            Expr::new(cond.id, ExprKind::Binary(inverted, lhs.clone(), rhs.clone()))
        }
        ExprKind::Binary(op, lhs, rhs)
            if op.is_logical() && !is_logical(lhs) && !is_logical(rhs) =>
        {
            let dual = if *op == BinaryOp::And {
                BinaryOp::Or
            } else {
                BinaryOp::And
            };
            let lhs = invert_operand(make, lhs);
            let rhs = invert_operand(make, rhs);
            Expr::new(cond.id, ExprKind::Binary(dual, Box::new(lhs), Box::new(rhs)))
        }
        ExprKind::Name(_) => make.not(cond.clone()),
        _ => {
            let inner = make.paren(cond.clone());
            make.not(inner)
        }
    }
}

/// Inverts one operand of a De Morgan rewrite, keeping it an operand.
fn invert_operand(make: &mut Make, operand: &Expr) -> Expr {
    let inverted = invert_condition(make, operand);
    if is_logical(&inverted) || matches!(inverted.kind, ExprKind::Conditional(..) | ExprKind::Assign(..)) {
        make.paren(inverted)
    } else {
        inverted
    }
}

fn is_logical(expr: &Expr) -> bool {
    matches!(&expr.kind, ExprKind::Binary(op, ..) if op.is_logical())
}

/// Whether `expr` is a compile-time constant: literals, `const` symbols and
/// operators over constants.
pub(crate) fn is_constant(oracle: &dyn SemanticOracle, file: &FileId, expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) => true,
        ExprKind::Name(_) | ExprKind::Member(_) => oracle
            .resolve_symbol(file, expr.id)
            .and_then(|symbol| oracle.symbol(symbol))
            .is_some_and(|symbol| {
                symbol.flags.is_const
                    && matches!(symbol.kind, SymbolKind::Local | SymbolKind::Field)
            }),
        ExprKind::Paren(inner) => is_constant(oracle, file, inner),
        ExprKind::Unary(op, operand) => {
            !matches!(op, UnaryOp::PreInc | UnaryOp::PreDec) && is_constant(oracle, file, operand)
        }
        ExprKind::Binary(_, lhs, rhs) => {
            is_constant(oracle, file, lhs) && is_constant(oracle, file, rhs)
        }
        ExprKind::Conditional(cond, then_expr, else_expr) => {
            is_constant(oracle, file, cond)
                && is_constant(oracle, file, then_expr)
                && is_constant(oracle, file, else_expr)
        }
        ExprKind::Cast(ty, operand) => {
            !matches!(ty.kind, TypeRefKind::Named(_)) && is_constant(oracle, file, operand)
        }
        _ => false,
    }
}

/// Whether a value of type `ty` may be stored in a `const` of `declared`.
pub(crate) fn const_compatible(ty: &Type, declared: &Type) -> bool {
    match ty {
        Type::String => *declared == Type::String,
        Type::Null => declared.is_reference(),
        _ => !matches!(declared, Type::Named { .. } | Type::Array(_) | Type::Object),
    }
}

/// `text` with its first character upper-cased.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Identifier nodes bound to `symbol`, grouped by file.
pub(crate) fn references_by_file(
    oracle: &dyn SemanticOracle,
    symbol: SymbolId,
) -> BTreeMap<FileId, BTreeSet<NodeId>> {
    let mut out: BTreeMap<FileId, BTreeSet<NodeId>> = BTreeMap::new();
    for reference in oracle.references(symbol) {
        out.entry(reference.file).or_default().insert(reference.ident);
    }
    out
}

/// Gives the identifiers in `idents` the text `to`.
pub(crate) struct RenameIdents<'a> {
    pub(crate) idents: Option<&'a BTreeSet<NodeId>>,
    pub(crate) to: &'a str,
}

impl Rewriter for RenameIdents<'_> {
    fn ident(&mut self, ident: &Ident, _path: &[Ancestor]) -> Option<String> {
        self.idents
            .is_some_and(|idents| idents.contains(&ident.id))
            .then(|| self.to.to_string())
    }
}

/// Puts `replacement` where the statement `id` was.
pub(crate) struct ReplaceStmt {
    pub(crate) id: NodeId,
    pub(crate) replacement: Option<Stmt>,
}

impl Rewriter for ReplaceStmt {
    fn stmt(&mut self, stmt: &Stmt, _path: &[Ancestor]) -> Step<Stmt> {
        if stmt.id != self.id {
            return Step::Descend;
        }
        match self.replacement.take() {
            Some(replacement) => Step::Replace(replacement),
            None => Step::Descend,
        }
    }
}

/// The innermost node of `kind` on an ancestor path.
pub(crate) fn enclosing<'a>(path: &[NodeRef<'a>], kind: SyntaxKind) -> Option<NodeRef<'a>> {
    path.iter().rev().copied().find(|node| node.kind() == kind)
}

/// The innermost member-like node (method, constructor, property, operator,
/// conversion) on `path`.
pub(crate) fn enclosing_member<'a>(path: &[NodeRef<'a>]) -> Option<NodeRef<'a>> {
    path.iter()
        .rev()
        .copied()
        .find(|node| node.kind().is_member())
}

pub(crate) fn enclosing_type<'a>(path: &[NodeRef<'a>]) -> Option<&'a TypeDecl> {
    path.iter().rev().find_map(|node| node.as_type_decl())
}
