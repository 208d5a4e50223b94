//! Canonical pretty printer.
//!
//! Output uses four-space indentation and braces on their own line. The
//! printer never inserts parentheses: precedence is the tree's responsibility
//! (explicit [`ExprKind::Paren`] nodes).

use crate::ast::*;

const INDENT: &str = "    ";

pub fn print_unit(unit: &CompilationUnit) -> String {
    let mut p = Printer::new(0);
    p.unit(unit);
    p.finish()
}

/// Prints a member at the given indentation level, without a trailing newline.
pub fn print_member(member: &Member, level: usize) -> String {
    let mut p = Printer::new(level);
    p.member(member);
    p.finish_trimmed()
}

/// Prints a namespace or type declaration, trimmed like [`print_member`].
pub fn print_item(item: &Item, level: usize) -> String {
    let mut p = Printer::new(level);
    match item {
        Item::Namespace(ns) => p.namespace(ns),
        Item::Type(decl) => p.type_decl(decl),
    }
    p.finish_trimmed()
}

pub fn print_type_decl(decl: &TypeDecl, level: usize) -> String {
    let mut p = Printer::new(level);
    p.type_decl(decl);
    p.finish_trimmed()
}

pub fn print_stmt(stmt: &Stmt, level: usize) -> String {
    let mut p = Printer::new(level);
    p.stmt(stmt);
    p.finish_trimmed()
}

pub fn print_expr(expr: &Expr) -> String {
    let mut p = Printer::new(0);
    p.expr(expr);
    p.out
}

pub fn print_type(ty: &TypeRef) -> String {
    let mut p = Printer::new(0);
    p.type_ref(ty);
    p.out
}

struct Printer {
    out: String,
    level: usize,
}

impl Printer {
    fn new(level: usize) -> Self {
        Printer {
            out: String::new(),
            level,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn finish_trimmed(mut self) -> String {
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        let start = self.out.len() - self.out.trim_start_matches(' ').len();
        self.out.split_off(start)
    }

    fn w(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.push_str(INDENT);
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.w(text);
        self.w("\n");
    }

    fn open_brace(&mut self) {
        self.line("{");
        self.level += 1;
    }

    fn close_brace(&mut self) {
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    fn trivia(&mut self, trivia: &Trivia) {
        for comment in &trivia.comments {
            self.indent();
            self.w("//");
            self.w(comment);
            self.w("\n");
        }
    }

    fn modifiers(&mut self, modifiers: &Modifiers) {
        for modifier in modifiers.iter() {
            self.w(modifier.keyword());
            self.w(" ");
        }
    }

    fn comma_sep<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.w(", ");
            }
            f(self, item);
        }
    }

    // ---- declarations --------------------------------------------------

    fn unit(&mut self, unit: &CompilationUnit) {
        self.usings(&unit.usings);
        if !unit.usings.is_empty() && !unit.items.is_empty() {
            self.w("\n");
        }
        self.items(&unit.items);
    }

    fn usings(&mut self, usings: &[UsingDirective]) {
        for using in usings {
            self.indent();
            self.w("using ");
            self.w(&using.name);
            self.w(";\n");
        }
    }

    fn items(&mut self, items: &[Item]) {
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.w("\n");
            }
            match item {
                Item::Namespace(ns) => self.namespace(ns),
                Item::Type(decl) => self.type_decl(decl),
            }
        }
    }

    fn namespace(&mut self, ns: &NamespaceDecl) {
        self.line(&format!("namespace {}", ns.name));
        self.open_brace();
        self.usings(&ns.usings);
        if !ns.usings.is_empty() && !ns.items.is_empty() {
            self.w("\n");
        }
        self.items(&ns.items);
        self.close_brace();
    }

    fn type_decl(&mut self, decl: &TypeDecl) {
        self.trivia(&decl.trivia);
        self.indent();
        self.modifiers(&decl.modifiers);
        self.w(decl.kind.keyword());
        self.w(" ");
        self.w(&decl.name.text);
        self.type_params(&decl.type_params);
        if !decl.bases.is_empty() {
            self.w(" : ");
            self.comma_sep(&decl.bases, |p, ty| p.type_ref(ty));
        }
        self.w("\n");
        self.constraints(&decl.constraints);
        self.open_brace();
        let mut prev: Option<&Member> = None;
        for member in &decl.members {
            if let Some(prev) = prev {
                let both_fields =
                    matches!(prev, Member::Field(_)) && matches!(member, Member::Field(_));
                if !both_fields {
                    self.w("\n");
                }
            }
            self.member(member);
            prev = Some(member);
        }
        self.close_brace();
    }

    fn type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.w("<");
        self.comma_sep(params, |p, param| p.w(&param.name.text));
        self.w(">");
    }

    fn constraints(&mut self, constraints: &[Constraint]) {
        self.level += 1;
        for constraint in constraints {
            self.indent();
            self.w("where ");
            self.w(&constraint.param.text);
            self.w(" : ");
            self.comma_sep(&constraint.bounds, |p, bound| match bound {
                ConstraintBound::Class => p.w("class"),
                ConstraintBound::Struct => p.w("struct"),
                ConstraintBound::New => p.w("new()"),
                ConstraintBound::Type(ty) => p.type_ref(ty),
            });
            self.w("\n");
        }
        self.level -= 1;
    }

    fn member(&mut self, member: &Member) {
        match member {
            Member::Field(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.type_ref(&decl.ty);
                self.w(" ");
                self.declarators(&decl.declarators);
                self.w(";\n");
            }
            Member::Method(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.type_ref(&decl.return_type);
                self.w(" ");
                if let Some(iface) = &decl.explicit_interface {
                    self.type_ref(iface);
                    self.w(".");
                }
                self.w(&decl.name.text);
                self.type_params(&decl.type_params);
                self.params(&decl.params);
                self.w("\n");
                self.constraints(&decl.constraints);
                self.body(decl.body.as_ref());
            }
            Member::Constructor(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.w(&decl.name.text);
                self.params(&decl.params);
                if let Some(init) = &decl.initializer {
                    self.w(" : ");
                    self.w(match init.kind {
                        CtorInitializerKind::Base => "base",
                        CtorInitializerKind::This => "this",
                    });
                    self.args("(", &init.args, ")");
                }
                self.w("\n");
                self.body(decl.body.as_ref());
            }
            Member::Property(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.type_ref(&decl.ty);
                self.w(" ");
                if let Some(iface) = &decl.explicit_interface {
                    self.type_ref(iface);
                    self.w(".");
                }
                self.w(&decl.name.text);
                if decl.accessors.iter().all(|acc| acc.body.is_none()) {
                    self.w(" { ");
                    for accessor in &decl.accessors {
                        self.modifiers(&accessor.modifiers);
                        self.w(accessor_keyword(accessor.kind));
                        self.w("; ");
                    }
                    self.w("}\n");
                } else {
                    self.w("\n");
                    self.open_brace();
                    for accessor in &decl.accessors {
                        self.indent();
                        self.modifiers(&accessor.modifiers);
                        self.w(accessor_keyword(accessor.kind));
                        self.w("\n");
                        self.body(accessor.body.as_ref());
                    }
                    self.close_brace();
                }
            }
            Member::Operator(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.type_ref(&decl.return_type);
                self.w(" operator ");
                self.w(&decl.op);
                self.params(&decl.params);
                self.w("\n");
                self.body(decl.body.as_ref());
            }
            Member::Conversion(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.w(if decl.implicit { "implicit" } else { "explicit" });
                self.w(" operator ");
                self.type_ref(&decl.target);
                self.params(&decl.params);
                self.w("\n");
                self.body(decl.body.as_ref());
            }
            Member::Delegate(decl) => {
                self.trivia(&decl.trivia);
                self.indent();
                self.modifiers(&decl.modifiers);
                self.w("delegate ");
                self.type_ref(&decl.return_type);
                self.w(" ");
                self.w(&decl.name.text);
                self.type_params(&decl.type_params);
                self.params(&decl.params);
                self.w(";\n");
            }
            Member::Type(decl) => self.type_decl(decl),
        }
    }

    /// Body on its own lines, or `;` appended to the (already printed) header.
    fn body(&mut self, body: Option<&Block>) {
        match body {
            Some(block) => self.block(block),
            None => {
                // Header ended with a newline; pull the `;` back onto it.
                if self.out.ends_with('\n') {
                    self.out.pop();
                }
                self.w(";\n");
            }
        }
    }

    fn params(&mut self, params: &[Param]) {
        self.w("(");
        self.comma_sep(params, |p, param| p.param(param));
        self.w(")");
    }

    fn param(&mut self, param: &Param) {
        if let Some(modifier) = param.modifier {
            self.w(modifier.keyword());
            self.w(" ");
        }
        self.type_ref(&param.ty);
        self.w(" ");
        self.w(&param.name.text);
        if let Some(default) = &param.default {
            self.w(" = ");
            self.expr(default);
        }
    }

    fn declarators(&mut self, declarators: &[Declarator]) {
        self.comma_sep(declarators, |p, decl| {
            p.w(&decl.name.text);
            if let Some(init) = &decl.init {
                p.w(" = ");
                p.expr(init);
            }
        });
    }

    fn type_ref(&mut self, ty: &TypeRef) {
        match &ty.kind {
            TypeRefKind::Predefined(predefined) => self.w(predefined.keyword()),
            TypeRefKind::Named(segments) => {
                for (idx, segment) in segments.iter().enumerate() {
                    if idx > 0 {
                        self.w(".");
                    }
                    self.w(&segment.name.text);
                    self.type_args(&segment.args);
                }
            }
            TypeRefKind::Array(element) => {
                self.type_ref(element);
                self.w("[]");
            }
        }
    }

    fn type_args(&mut self, args: &[TypeRef]) {
        if args.is_empty() {
            return;
        }
        self.w("<");
        self.comma_sep(args, |p, ty| p.type_ref(ty));
        self.w(">");
    }

    // ---- statements ----------------------------------------------------

    fn block(&mut self, block: &Block) {
        self.open_brace();
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.close_brace();
    }

    fn embedded(&mut self, stmt: &Stmt) {
        if stmt.as_block().is_some() {
            self.stmt(stmt);
        } else {
            self.level += 1;
            self.stmt(stmt);
            self.level -= 1;
        }
    }

    fn local_decl(&mut self, decl: &LocalDecl) {
        if decl.is_const {
            self.w("const ");
        }
        self.type_ref(&decl.ty);
        self.w(" ");
        self.declarators(&decl.declarators);
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.trivia(&stmt.trivia);
        match &stmt.kind {
            StmtKind::Block(block) => self.block(block),
            StmtKind::Local(decl) => {
                self.indent();
                self.local_decl(decl);
                self.w(";\n");
            }
            StmtKind::Expr(expr) => {
                self.indent();
                self.expr(expr);
                self.w(";\n");
            }
            StmtKind::Return(value) => self.keyword_stmt("return", value.as_ref()),
            StmtKind::Throw(value) => self.keyword_stmt("throw", value.as_ref()),
            StmtKind::If(if_stmt) => {
                self.indent();
                self.if_chain(if_stmt);
            }
            StmtKind::While(while_stmt) => {
                self.indent();
                self.w("while (");
                self.expr(&while_stmt.cond);
                self.w(")\n");
                self.embedded(&while_stmt.body);
            }
            StmtKind::Do(do_stmt) => {
                self.line("do");
                self.embedded(&do_stmt.body);
                self.indent();
                self.w("while (");
                self.expr(&do_stmt.cond);
                self.w(");\n");
            }
            StmtKind::For(for_stmt) => {
                self.indent();
                self.w("for (");
                match &for_stmt.init {
                    ForInit::Decl(decl) => self.local_decl(decl),
                    ForInit::Exprs(exprs) => self.comma_sep(exprs, |p, e| p.expr(e)),
                }
                self.w(";");
                if let Some(cond) = &for_stmt.cond {
                    self.w(" ");
                    self.expr(cond);
                }
                self.w(";");
                if !for_stmt.step.is_empty() {
                    self.w(" ");
                    self.comma_sep(&for_stmt.step, |p, e| p.expr(e));
                }
                self.w(")\n");
                self.embedded(&for_stmt.body);
            }
            StmtKind::Foreach(foreach) => {
                self.indent();
                self.w("foreach (");
                self.type_ref(&foreach.ty);
                self.w(" ");
                self.w(&foreach.name.text);
                self.w(" in ");
                self.expr(&foreach.iterable);
                self.w(")\n");
                self.embedded(&foreach.body);
            }
            StmtKind::Break => self.line("break;"),
            StmtKind::Continue => self.line("continue;"),
            StmtKind::Empty => self.line(";"),
        }
    }

    fn keyword_stmt(&mut self, keyword: &str, value: Option<&Expr>) {
        self.indent();
        self.w(keyword);
        if let Some(value) = value {
            self.w(" ");
            self.expr(value);
        }
        self.w(";\n");
    }

    /// Prints `if (...) ... else if (...) ...`; the caller has indented.
    fn if_chain(&mut self, if_stmt: &IfStmt) {
        self.w("if (");
        self.expr(&if_stmt.cond);
        self.w(")\n");
        self.embedded(&if_stmt.then_branch);
        if let Some(else_branch) = &if_stmt.else_branch {
            self.indent();
            if let StmtKind::If(nested) = &else_branch.kind {
                if else_branch.trivia.is_empty() {
                    self.w("else ");
                    self.if_chain(nested);
                    return;
                }
            }
            self.w("else\n");
            self.embedded(else_branch);
        }
    }

    // ---- expressions ---------------------------------------------------

    fn args(&mut self, open: &str, args: &[Arg], close: &str) {
        self.w(open);
        self.comma_sep(args, |p, arg| {
            if let Some(name) = &arg.name {
                p.w(&name.text);
                p.w(": ");
            }
            if let Some(modifier) = arg.modifier {
                p.w(modifier.keyword());
                p.w(" ");
            }
            p.expr(&arg.value);
        });
        self.w(close);
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(lit) => self.w(&lit.text),
            ExprKind::Name(name) => {
                self.w(&name.ident.text);
                self.type_args(&name.type_args);
            }
            ExprKind::This => self.w("this"),
            ExprKind::Base => self.w("base"),
            ExprKind::Member(access) => {
                self.expr(&access.receiver);
                self.w(".");
                self.w(&access.name.text);
                self.type_args(&access.type_args);
            }
            ExprKind::Call(call) => {
                self.expr(&call.callee);
                self.args("(", &call.args, ")");
            }
            ExprKind::Index(access) => {
                self.expr(&access.receiver);
                self.args("[", &access.args, "]");
            }
            ExprKind::New(creation) => {
                self.w("new ");
                self.type_ref(&creation.ty);
                self.args("(", &creation.args, ")");
            }
            ExprKind::NewArray(creation) => {
                self.w("new ");
                self.type_ref(&creation.element);
                self.w("[");
                self.comma_sep(&creation.sizes, |p, e| p.expr(e));
                self.w("]");
            }
            ExprKind::Unary(op, operand) => {
                self.w(op.token());
                self.expr(operand);
            }
            ExprKind::Postfix(op, operand) => {
                self.expr(operand);
                self.w(op.token());
            }
            ExprKind::Binary(op, lhs, rhs) => {
                self.expr(lhs);
                self.w(" ");
                self.w(op.token());
                self.w(" ");
                self.expr(rhs);
            }
            ExprKind::Assign(op, lhs, rhs) => {
                self.expr(lhs);
                self.w(" ");
                self.w(op.token());
                self.w(" ");
                self.expr(rhs);
            }
            ExprKind::Conditional(cond, then_expr, else_expr) => {
                self.expr(cond);
                self.w(" ? ");
                self.expr(then_expr);
                self.w(" : ");
                self.expr(else_expr);
            }
            ExprKind::Cast(ty, operand) => {
                self.w("(");
                self.type_ref(ty);
                self.w(")");
                self.expr(operand);
            }
            ExprKind::Paren(inner) => {
                self.w("(");
                self.expr(inner);
                self.w(")");
            }
            ExprKind::Lambda(lambda) => {
                let simple = lambda.params.len() == 1 && lambda.params[0].ty.is_none();
                if simple {
                    self.w(&lambda.params[0].name.text);
                } else {
                    self.w("(");
                    self.comma_sep(&lambda.params, |p, param| {
                        if let Some(ty) = &param.ty {
                            p.type_ref(ty);
                            p.w(" ");
                        }
                        p.w(&param.name.text);
                    });
                    self.w(")");
                }
                self.w(" => ");
                match &lambda.body {
                    LambdaBody::Expr(body) => self.expr(body),
                    LambdaBody::Block(block) => self.inline_block(block),
                }
            }
            ExprKind::AnonymousMethod(method) => {
                self.w("delegate");
                if !method.params.is_empty() {
                    self.w(" ");
                    self.params(&method.params);
                }
                self.w(" ");
                self.inline_block(&method.body);
            }
            ExprKind::TypeOf(ty) => {
                self.w("typeof(");
                self.type_ref(ty);
                self.w(")");
            }
            ExprKind::Default(ty) => {
                self.w("default(");
                self.type_ref(ty);
                self.w(")");
            }
        }
    }

    /// A block in expression position: opening brace on the current line.
    fn inline_block(&mut self, block: &Block) {
        self.w("{\n");
        self.level += 1;
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.level -= 1;
        self.indent();
        self.w("}");
    }
}

fn accessor_keyword(kind: AccessorKind) -> &'static str {
    match kind {
        AccessorKind::Get => "get",
        AccessorKind::Set => "set",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn prints_allman_layout() {
        let parse = parse("class C{void M(){if(a)b();else{c();}}}");
        assert_eq!(
            print_unit(&parse.unit),
            "class C\n{\n    void M()\n    {\n        if (a)\n            b();\n        else\n        {\n            c();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn prints_bodiless_members_on_one_line() {
        let parse = parse("interface I { int P { get; set; } void M(); }");
        assert_eq!(
            print_unit(&parse.unit),
            "interface I\n{\n    int P { get; set; }\n\n    void M();\n}\n"
        );
    }
}
