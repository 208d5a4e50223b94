//! Uniform, read-only view over the typed tree.
//!
//! [`NodeRef`] lets generic code (selection, lookup by id, ancestor paths)
//! walk any node without matching on every concrete type.

use crate::ast::*;

/// Flat classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    CompilationUnit,
    UsingDirective,
    Namespace,
    TypeDecl,
    TypeParam,
    Constraint,
    Field,
    Method,
    Constructor,
    CtorInitializer,
    Property,
    Accessor,
    Operator,
    Conversion,
    Delegate,
    Param,
    Declarator,
    TypeRef,
    Block,
    BlockStmt,
    LocalDeclStmt,
    ExprStmt,
    ReturnStmt,
    IfStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    ForeachStmt,
    BreakStmt,
    ContinueStmt,
    ThrowStmt,
    EmptyStmt,
    Literal,
    Name,
    This,
    Base,
    MemberAccess,
    Invocation,
    ElementAccess,
    ObjectCreation,
    ArrayCreation,
    Unary,
    Postfix,
    Binary,
    Assign,
    Conditional,
    Cast,
    Paren,
    Lambda,
    AnonymousMethod,
    TypeOf,
    Default,
    Arg,
    LambdaParam,
    Ident,
}

impl SyntaxKind {
    pub fn is_stmt(self) -> bool {
        matches!(
            self,
            SyntaxKind::BlockStmt
                | SyntaxKind::LocalDeclStmt
                | SyntaxKind::ExprStmt
                | SyntaxKind::ReturnStmt
                | SyntaxKind::IfStmt
                | SyntaxKind::WhileStmt
                | SyntaxKind::DoStmt
                | SyntaxKind::ForStmt
                | SyntaxKind::ForeachStmt
                | SyntaxKind::BreakStmt
                | SyntaxKind::ContinueStmt
                | SyntaxKind::ThrowStmt
                | SyntaxKind::EmptyStmt
        )
    }

    pub fn is_member(self) -> bool {
        matches!(
            self,
            SyntaxKind::Field
                | SyntaxKind::Method
                | SyntaxKind::Constructor
                | SyntaxKind::Property
                | SyntaxKind::Operator
                | SyntaxKind::Conversion
                | SyntaxKind::Delegate
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Unit(&'a CompilationUnit),
    Using(&'a UsingDirective),
    Namespace(&'a NamespaceDecl),
    Type(&'a TypeDecl),
    TypeParam(&'a TypeParam),
    Constraint(&'a Constraint),
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
    CtorInitializer(&'a CtorInitializer),
    Property(&'a PropertyDecl),
    Accessor(&'a Accessor),
    Operator(&'a OperatorDecl),
    Conversion(&'a ConversionDecl),
    Delegate(&'a DelegateDecl),
    Param(&'a Param),
    Declarator(&'a Declarator),
    TypeRef(&'a TypeRef),
    Block(&'a Block),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    Arg(&'a Arg),
    LambdaParam(&'a LambdaParam),
    Ident(&'a Ident),
}

impl<'a> From<&'a Member> for NodeRef<'a> {
    fn from(member: &'a Member) -> Self {
        match member {
            Member::Field(decl) => NodeRef::Field(decl),
            Member::Method(decl) => NodeRef::Method(decl),
            Member::Constructor(decl) => NodeRef::Constructor(decl),
            Member::Property(decl) => NodeRef::Property(decl),
            Member::Operator(decl) => NodeRef::Operator(decl),
            Member::Conversion(decl) => NodeRef::Conversion(decl),
            Member::Delegate(decl) => NodeRef::Delegate(decl),
            Member::Type(decl) => NodeRef::Type(decl),
        }
    }
}

impl<'a> From<&'a Item> for NodeRef<'a> {
    fn from(item: &'a Item) -> Self {
        match item {
            Item::Namespace(ns) => NodeRef::Namespace(ns),
            Item::Type(decl) => NodeRef::Type(decl),
        }
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        match self {
            NodeRef::Unit(n) => n.id,
            NodeRef::Using(n) => n.id,
            NodeRef::Namespace(n) => n.id,
            NodeRef::Type(n) => n.id,
            NodeRef::TypeParam(n) => n.id,
            NodeRef::Constraint(n) => n.id,
            NodeRef::Field(n) => n.id,
            NodeRef::Method(n) => n.id,
            NodeRef::Constructor(n) => n.id,
            NodeRef::CtorInitializer(n) => n.id,
            NodeRef::Property(n) => n.id,
            NodeRef::Accessor(n) => n.id,
            NodeRef::Operator(n) => n.id,
            NodeRef::Conversion(n) => n.id,
            NodeRef::Delegate(n) => n.id,
            NodeRef::Param(n) => n.id,
            NodeRef::Declarator(n) => n.id,
            NodeRef::TypeRef(n) => n.id,
            NodeRef::Block(n) => n.id,
            NodeRef::Stmt(n) => n.id,
            NodeRef::Expr(n) => n.id,
            NodeRef::Arg(n) => n.id,
            NodeRef::LambdaParam(n) => n.id,
            NodeRef::Ident(n) => n.id,
        }
    }

    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeRef::Unit(_) => SyntaxKind::CompilationUnit,
            NodeRef::Using(_) => SyntaxKind::UsingDirective,
            NodeRef::Namespace(_) => SyntaxKind::Namespace,
            NodeRef::Type(_) => SyntaxKind::TypeDecl,
            NodeRef::TypeParam(_) => SyntaxKind::TypeParam,
            NodeRef::Constraint(_) => SyntaxKind::Constraint,
            NodeRef::Field(_) => SyntaxKind::Field,
            NodeRef::Method(_) => SyntaxKind::Method,
            NodeRef::Constructor(_) => SyntaxKind::Constructor,
            NodeRef::CtorInitializer(_) => SyntaxKind::CtorInitializer,
            NodeRef::Property(_) => SyntaxKind::Property,
            NodeRef::Accessor(_) => SyntaxKind::Accessor,
            NodeRef::Operator(_) => SyntaxKind::Operator,
            NodeRef::Conversion(_) => SyntaxKind::Conversion,
            NodeRef::Delegate(_) => SyntaxKind::Delegate,
            NodeRef::Param(_) => SyntaxKind::Param,
            NodeRef::Declarator(_) => SyntaxKind::Declarator,
            NodeRef::TypeRef(_) => SyntaxKind::TypeRef,
            NodeRef::Block(_) => SyntaxKind::Block,
            NodeRef::Stmt(stmt) => match &stmt.kind {
                StmtKind::Block(_) => SyntaxKind::BlockStmt,
                StmtKind::Local(_) => SyntaxKind::LocalDeclStmt,
                StmtKind::Expr(_) => SyntaxKind::ExprStmt,
                StmtKind::Return(_) => SyntaxKind::ReturnStmt,
                StmtKind::If(_) => SyntaxKind::IfStmt,
                StmtKind::While(_) => SyntaxKind::WhileStmt,
                StmtKind::Do(_) => SyntaxKind::DoStmt,
                StmtKind::For(_) => SyntaxKind::ForStmt,
                StmtKind::Foreach(_) => SyntaxKind::ForeachStmt,
                StmtKind::Break => SyntaxKind::BreakStmt,
                StmtKind::Continue => SyntaxKind::ContinueStmt,
                StmtKind::Throw(_) => SyntaxKind::ThrowStmt,
                StmtKind::Empty => SyntaxKind::EmptyStmt,
            },
            NodeRef::Expr(expr) => match &expr.kind {
                ExprKind::Literal(_) => SyntaxKind::Literal,
                ExprKind::Name(_) => SyntaxKind::Name,
                ExprKind::This => SyntaxKind::This,
                ExprKind::Base => SyntaxKind::Base,
                ExprKind::Member(_) => SyntaxKind::MemberAccess,
                ExprKind::Call(_) => SyntaxKind::Invocation,
                ExprKind::Index(_) => SyntaxKind::ElementAccess,
                ExprKind::New(_) => SyntaxKind::ObjectCreation,
                ExprKind::NewArray(_) => SyntaxKind::ArrayCreation,
                ExprKind::Unary(..) => SyntaxKind::Unary,
                ExprKind::Postfix(..) => SyntaxKind::Postfix,
                ExprKind::Binary(..) => SyntaxKind::Binary,
                ExprKind::Assign(..) => SyntaxKind::Assign,
                ExprKind::Conditional(..) => SyntaxKind::Conditional,
                ExprKind::Cast(..) => SyntaxKind::Cast,
                ExprKind::Paren(_) => SyntaxKind::Paren,
                ExprKind::Lambda(_) => SyntaxKind::Lambda,
                ExprKind::AnonymousMethod(_) => SyntaxKind::AnonymousMethod,
                ExprKind::TypeOf(_) => SyntaxKind::TypeOf,
                ExprKind::Default(_) => SyntaxKind::Default,
            },
            NodeRef::Arg(_) => SyntaxKind::Arg,
            NodeRef::LambdaParam(_) => SyntaxKind::LambdaParam,
            NodeRef::Ident(_) => SyntaxKind::Ident,
        }
    }

    pub fn as_expr(self) -> Option<&'a Expr> {
        match self {
            NodeRef::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_stmt(self) -> Option<&'a Stmt> {
        match self {
            NodeRef::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn as_type_decl(self) -> Option<&'a TypeDecl> {
        match self {
            NodeRef::Type(decl) => Some(decl),
            _ => None,
        }
    }

    /// Direct children, in source order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Unit(unit) => {
                out.extend(unit.usings.iter().map(NodeRef::Using));
                out.extend(unit.items.iter().map(NodeRef::from));
            }
            NodeRef::Using(_) | NodeRef::Ident(_) => {}
            NodeRef::Namespace(ns) => {
                out.extend(ns.usings.iter().map(NodeRef::Using));
                out.extend(ns.items.iter().map(NodeRef::from));
            }
            NodeRef::Type(decl) => {
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.type_params.iter().map(NodeRef::TypeParam));
                out.extend(decl.bases.iter().map(NodeRef::TypeRef));
                out.extend(decl.constraints.iter().map(NodeRef::Constraint));
                out.extend(decl.members.iter().map(NodeRef::from));
            }
            NodeRef::TypeParam(param) => out.push(NodeRef::Ident(&param.name)),
            NodeRef::Constraint(constraint) => {
                out.push(NodeRef::Ident(&constraint.param));
                for bound in &constraint.bounds {
                    if let ConstraintBound::Type(ty) = bound {
                        out.push(NodeRef::TypeRef(ty));
                    }
                }
            }
            NodeRef::Field(decl) => {
                out.push(NodeRef::TypeRef(&decl.ty));
                out.extend(decl.declarators.iter().map(NodeRef::Declarator));
            }
            NodeRef::Method(decl) => {
                out.push(NodeRef::TypeRef(&decl.return_type));
                out.extend(decl.explicit_interface.iter().map(NodeRef::TypeRef));
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.type_params.iter().map(NodeRef::TypeParam));
                out.extend(decl.params.iter().map(NodeRef::Param));
                out.extend(decl.constraints.iter().map(NodeRef::Constraint));
                out.extend(decl.body.iter().map(NodeRef::Block));
            }
            NodeRef::Constructor(decl) => {
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.params.iter().map(NodeRef::Param));
                out.extend(decl.initializer.iter().map(NodeRef::CtorInitializer));
                out.extend(decl.body.iter().map(NodeRef::Block));
            }
            NodeRef::CtorInitializer(init) => out.extend(init.args.iter().map(NodeRef::Arg)),
            NodeRef::Property(decl) => {
                out.push(NodeRef::TypeRef(&decl.ty));
                out.extend(decl.explicit_interface.iter().map(NodeRef::TypeRef));
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.accessors.iter().map(NodeRef::Accessor));
            }
            NodeRef::Accessor(accessor) => out.extend(accessor.body.iter().map(NodeRef::Block)),
            NodeRef::Operator(decl) => {
                out.push(NodeRef::TypeRef(&decl.return_type));
                out.extend(decl.params.iter().map(NodeRef::Param));
                out.extend(decl.body.iter().map(NodeRef::Block));
            }
            NodeRef::Conversion(decl) => {
                out.push(NodeRef::TypeRef(&decl.target));
                out.extend(decl.params.iter().map(NodeRef::Param));
                out.extend(decl.body.iter().map(NodeRef::Block));
            }
            NodeRef::Delegate(decl) => {
                out.push(NodeRef::TypeRef(&decl.return_type));
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.type_params.iter().map(NodeRef::TypeParam));
                out.extend(decl.params.iter().map(NodeRef::Param));
            }
            NodeRef::Param(param) => {
                out.push(NodeRef::TypeRef(&param.ty));
                out.push(NodeRef::Ident(&param.name));
                out.extend(param.default.iter().map(NodeRef::Expr));
            }
            NodeRef::Declarator(decl) => {
                out.push(NodeRef::Ident(&decl.name));
                out.extend(decl.init.iter().map(NodeRef::Expr));
            }
            NodeRef::TypeRef(ty) => match &ty.kind {
                TypeRefKind::Predefined(_) => {}
                TypeRefKind::Named(segments) => {
                    for segment in segments {
                        out.push(NodeRef::Ident(&segment.name));
                        out.extend(segment.args.iter().map(NodeRef::TypeRef));
                    }
                }
                TypeRefKind::Array(element) => out.push(NodeRef::TypeRef(element)),
            },
            NodeRef::Block(block) => out.extend(block.stmts.iter().map(NodeRef::Stmt)),
            NodeRef::Stmt(stmt) => stmt_children(stmt, &mut out),
            NodeRef::Expr(expr) => expr_children(expr, &mut out),
            NodeRef::Arg(arg) => {
                out.extend(arg.name.iter().map(NodeRef::Ident));
                out.push(NodeRef::Expr(&arg.value));
            }
            NodeRef::LambdaParam(param) => {
                out.extend(param.ty.iter().map(NodeRef::TypeRef));
                out.push(NodeRef::Ident(&param.name));
            }
        }
        out
    }

    /// All nodes of this subtree in preorder, starting with `self`.
    pub fn preorder(self) -> Preorder<'a> {
        Preorder { stack: vec![self] }
    }

    /// Finds the node with `id` in this subtree.
    pub fn find(self, id: NodeId) -> Option<NodeRef<'a>> {
        self.preorder().find(|node| node.id() == id)
    }

    /// Ancestor chain from `self` down to (and including) the node with `id`.
    pub fn path_to(self, id: NodeId) -> Option<Vec<NodeRef<'a>>> {
        let mut path = vec![self];
        if self.id() == id {
            return Some(path);
        }
        if descend_to(self, id, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

fn descend_to<'a>(node: NodeRef<'a>, id: NodeId, path: &mut Vec<NodeRef<'a>>) -> bool {
    for child in node.children() {
        path.push(child);
        if child.id() == id || descend_to(child, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn local_decl_children<'a>(decl: &'a LocalDecl, out: &mut Vec<NodeRef<'a>>) {
    out.push(NodeRef::TypeRef(&decl.ty));
    out.extend(decl.declarators.iter().map(NodeRef::Declarator));
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match &stmt.kind {
        StmtKind::Block(block) => out.extend(block.stmts.iter().map(NodeRef::Stmt)),
        StmtKind::Local(decl) => local_decl_children(decl, out),
        StmtKind::Expr(expr) => out.push(NodeRef::Expr(expr)),
        StmtKind::Return(value) | StmtKind::Throw(value) => {
            out.extend(value.iter().map(NodeRef::Expr))
        }
        StmtKind::If(if_stmt) => {
            out.push(NodeRef::Expr(&if_stmt.cond));
            out.push(NodeRef::Stmt(&if_stmt.then_branch));
            out.extend(if_stmt.else_branch.iter().map(|s| NodeRef::Stmt(s)));
        }
        StmtKind::While(while_stmt) => {
            out.push(NodeRef::Expr(&while_stmt.cond));
            out.push(NodeRef::Stmt(&while_stmt.body));
        }
        StmtKind::Do(do_stmt) => {
            out.push(NodeRef::Stmt(&do_stmt.body));
            out.push(NodeRef::Expr(&do_stmt.cond));
        }
        StmtKind::For(for_stmt) => {
            match &for_stmt.init {
                ForInit::Decl(decl) => local_decl_children(decl, out),
                ForInit::Exprs(exprs) => out.extend(exprs.iter().map(NodeRef::Expr)),
            }
            out.extend(for_stmt.cond.iter().map(NodeRef::Expr));
            out.extend(for_stmt.step.iter().map(NodeRef::Expr));
            out.push(NodeRef::Stmt(&for_stmt.body));
        }
        StmtKind::Foreach(foreach) => {
            out.push(NodeRef::TypeRef(&foreach.ty));
            out.push(NodeRef::Ident(&foreach.name));
            out.push(NodeRef::Expr(&foreach.iterable));
            out.push(NodeRef::Stmt(&foreach.body));
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match &expr.kind {
        ExprKind::Literal(_) | ExprKind::This | ExprKind::Base => {}
        ExprKind::Name(name) => {
            // Error recovery may reuse the expression id for the identifier.
            if name.ident.id != expr.id {
                out.push(NodeRef::Ident(&name.ident));
            }
            out.extend(name.type_args.iter().map(NodeRef::TypeRef));
        }
        ExprKind::Member(access) => {
            out.push(NodeRef::Expr(&access.receiver));
            out.push(NodeRef::Ident(&access.name));
            out.extend(access.type_args.iter().map(NodeRef::TypeRef));
        }
        ExprKind::Call(call) => {
            out.push(NodeRef::Expr(&call.callee));
            out.extend(call.args.iter().map(NodeRef::Arg));
        }
        ExprKind::Index(access) => {
            out.push(NodeRef::Expr(&access.receiver));
            out.extend(access.args.iter().map(NodeRef::Arg));
        }
        ExprKind::New(creation) => {
            out.push(NodeRef::TypeRef(&creation.ty));
            out.extend(creation.args.iter().map(NodeRef::Arg));
        }
        ExprKind::NewArray(creation) => {
            out.push(NodeRef::TypeRef(&creation.element));
            out.extend(creation.sizes.iter().map(NodeRef::Expr));
        }
        ExprKind::Unary(_, operand) | ExprKind::Postfix(_, operand) | ExprKind::Paren(operand) => {
            out.push(NodeRef::Expr(operand))
        }
        ExprKind::Binary(_, lhs, rhs) | ExprKind::Assign(_, lhs, rhs) => {
            out.push(NodeRef::Expr(lhs));
            out.push(NodeRef::Expr(rhs));
        }
        ExprKind::Conditional(cond, then_expr, else_expr) => {
            out.push(NodeRef::Expr(cond));
            out.push(NodeRef::Expr(then_expr));
            out.push(NodeRef::Expr(else_expr));
        }
        ExprKind::Cast(ty, operand) => {
            out.push(NodeRef::TypeRef(ty));
            out.push(NodeRef::Expr(operand));
        }
        ExprKind::Lambda(lambda) => {
            out.extend(lambda.params.iter().map(NodeRef::LambdaParam));
            match &lambda.body {
                LambdaBody::Expr(body) => out.push(NodeRef::Expr(body)),
                LambdaBody::Block(block) => out.push(NodeRef::Block(block)),
            }
        }
        ExprKind::AnonymousMethod(method) => {
            out.extend(method.params.iter().map(NodeRef::Param));
            out.push(NodeRef::Block(&method.body));
        }
        ExprKind::TypeOf(ty) | ExprKind::Default(ty) => out.push(NodeRef::TypeRef(ty)),
    }
}

/// Preorder iterator returned by [`NodeRef::preorder`].
pub struct Preorder<'a> {
    stack: Vec<NodeRef<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = node.children();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}
