//! Generic depth-first tree substitution.
//!
//! A [`Rewriter`] is offered every node of the kinds it cares about before
//! the engine looks at the node's children. It either lets the engine descend
//! (the node is rebuilt from its rewritten children) or answers with a
//! replacement. Nodes in list positions (items, members, statements,
//! declarators, parameters, arguments) may also be removed or split into
//! several nodes; in single-child positions that is an error.
//!
//! The input tree is never modified. The ancestor path of the node being
//! visited is passed to every hook, so rewriters never need parent pointers.

use sharpen_syntax::*;
use tokio_util::sync::CancellationToken;

use crate::error::{RefactorError, RewriteError};

/// What to do with a visited node.
#[derive(Debug)]
pub enum Step<T> {
    /// Rebuild the node from its rewritten children.
    Descend,
    Replace(T),
    /// Replace the node by zero or more nodes (list positions only).
    Splice(Vec<T>),
    /// Drop the node (list positions only).
    Remove,
}

/// One entry of the ancestor path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ancestor {
    pub id: NodeId,
    pub kind: SyntaxKind,
}

/// Per-refactoring substitution table. Every hook defaults to "descend".
///
/// `path` lists the ancestors of the visited node, outermost first; the last
/// entry is the direct parent.
pub trait Rewriter {
    fn item(&mut self, _item: &Item, _path: &[Ancestor]) -> Step<Item> {
        Step::Descend
    }

    fn member(&mut self, _member: &Member, _path: &[Ancestor]) -> Step<Member> {
        Step::Descend
    }

    fn stmt(&mut self, _stmt: &Stmt, _path: &[Ancestor]) -> Step<Stmt> {
        Step::Descend
    }

    fn expr(&mut self, _expr: &Expr, _path: &[Ancestor]) -> Step<Expr> {
        Step::Descend
    }

    fn declarator(&mut self, _decl: &Declarator, _path: &[Ancestor]) -> Step<Declarator> {
        Step::Descend
    }

    fn param(&mut self, _param: &Param, _path: &[Ancestor]) -> Step<Param> {
        Step::Descend
    }

    fn arg(&mut self, _arg: &Arg, _path: &[Ancestor]) -> Step<Arg> {
        Step::Descend
    }

    fn type_ref(&mut self, _ty: &TypeRef, _path: &[Ancestor]) -> Step<TypeRef> {
        Step::Descend
    }

    /// New text for an identifier token, or `None` to keep it.
    fn ident(&mut self, _ident: &Ident, _path: &[Ancestor]) -> Option<String> {
        None
    }

    /// Called with the rebuilt expression after its children were rewritten.
    fn finish_expr(&mut self, _original: &Expr, _expr: &mut Expr, _path: &[Ancestor]) {}

    fn finish_block(&mut self, _original: &Block, _block: &mut Block, _path: &[Ancestor]) {}

    fn finish_member(&mut self, _original: &Member, _member: &mut Member, _path: &[Ancestor]) {}

    fn finish_type(&mut self, _original: &TypeDecl, _decl: &mut TypeDecl, _path: &[Ancestor]) {}

    fn finish_unit(&mut self, _unit: &mut CompilationUnit) {}
}

/// Rewrites a whole compilation unit.
pub fn rewrite_unit<R: Rewriter + ?Sized>(
    unit: &CompilationUnit,
    rewriter: &mut R,
    cancel: &CancellationToken,
) -> Result<CompilationUnit, RefactorError> {
    let mut engine = Engine::new(rewriter, cancel);
    engine.enter(unit.id, SyntaxKind::CompilationUnit);
    let items = engine.list(&unit.items, Engine::item_hook, Engine::descend_item)?;
    engine.leave();
    let mut out = CompilationUnit {
        id: unit.id,
        usings: unit.usings.clone(),
        items,
    };
    engine.rewriter.finish_unit(&mut out);
    Ok(out)
}

/// Rewrites a detached expression (for example a copied method body).
pub fn rewrite_expr<R: Rewriter + ?Sized>(
    expr: &Expr,
    rewriter: &mut R,
    cancel: &CancellationToken,
) -> Result<Expr, RefactorError> {
    Engine::new(rewriter, cancel).expr(expr)
}

/// Rewrites a detached statement; it may not be removed or split.
pub fn rewrite_stmt<R: Rewriter + ?Sized>(
    stmt: &Stmt,
    rewriter: &mut R,
    cancel: &CancellationToken,
) -> Result<Stmt, RefactorError> {
    Ok(*Engine::new(rewriter, cancel).embedded(stmt)?)
}

pub fn rewrite_block<R: Rewriter + ?Sized>(
    block: &Block,
    rewriter: &mut R,
    cancel: &CancellationToken,
) -> Result<Block, RefactorError> {
    Engine::new(rewriter, cancel).block(block)
}

type Hook<E, T> = fn(&mut E, &T) -> Result<Step<T>, RefactorError>;
type Descend<E, T> = fn(&mut E, &T) -> Result<T, RefactorError>;

struct Engine<'a, R: ?Sized> {
    rewriter: &'a mut R,
    cancel: &'a CancellationToken,
    path: Vec<Ancestor>,
}

impl<'a, R: Rewriter + ?Sized> Engine<'a, R> {
    fn new(rewriter: &'a mut R, cancel: &'a CancellationToken) -> Self {
        Engine {
            rewriter,
            cancel,
            path: Vec::new(),
        }
    }

    fn poll(&self) -> Result<(), RefactorError> {
        if self.cancel.is_cancelled() {
            tracing::trace!(depth = self.path.len(), "rewrite cancelled");
            return Err(RefactorError::Cancelled);
        }
        Ok(())
    }

    fn enter(&mut self, id: NodeId, kind: SyntaxKind) {
        self.path.push(Ancestor { id, kind });
    }

    fn leave(&mut self) {
        self.path.pop();
    }

    fn parent(&self) -> Option<NodeId> {
        self.path.last().map(|ancestor| ancestor.id)
    }

    fn list<T>(
        &mut self,
        items: &[T],
        hook: Hook<Self, T>,
        descend: Descend<Self, T>,
    ) -> Result<Vec<T>, RefactorError> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match hook(self, item)? {
                Step::Descend => out.push(descend(self, item)?),
                Step::Replace(new) => {
                    tracing::trace!(parent = ?self.parent(), "replaced list element");
                    out.push(new);
                }
                Step::Splice(new) => {
                    tracing::trace!(parent = ?self.parent(), count = new.len(), "spliced list element");
                    out.extend(new);
                }
                Step::Remove => {
                    tracing::trace!(parent = ?self.parent(), "removed list element");
                }
            }
        }
        Ok(out)
    }

    fn one<T>(
        &mut self,
        item: &T,
        kind: SyntaxKind,
        hook: Hook<Self, T>,
        descend: Descend<Self, T>,
    ) -> Result<T, RefactorError> {
        match hook(self, item)? {
            Step::Descend => descend(self, item),
            Step::Replace(new) => {
                tracing::trace!(parent = ?self.parent(), ?kind, "replaced node");
                Ok(new)
            }
            Step::Splice(mut new) if new.len() == 1 => Ok(new.remove(0)),
            Step::Splice(_) | Step::Remove => Err(RewriteError::InvalidRemoval { kind }.into()),
        }
    }

    // ---- hooks ---------------------------------------------------------

    fn item_hook(&mut self, item: &Item) -> Result<Step<Item>, RefactorError> {
        Ok(self.rewriter.item(item, &self.path))
    }

    fn member_hook(&mut self, member: &Member) -> Result<Step<Member>, RefactorError> {
        self.poll()?;
        Ok(self.rewriter.member(member, &self.path))
    }

    fn stmt_hook(&mut self, stmt: &Stmt) -> Result<Step<Stmt>, RefactorError> {
        self.poll()?;
        Ok(self.rewriter.stmt(stmt, &self.path))
    }

    fn expr_hook(&mut self, expr: &Expr) -> Result<Step<Expr>, RefactorError> {
        Ok(self.rewriter.expr(expr, &self.path))
    }

    fn declarator_hook(&mut self, decl: &Declarator) -> Result<Step<Declarator>, RefactorError> {
        Ok(self.rewriter.declarator(decl, &self.path))
    }

    fn param_hook(&mut self, param: &Param) -> Result<Step<Param>, RefactorError> {
        Ok(self.rewriter.param(param, &self.path))
    }

    fn arg_hook(&mut self, arg: &Arg) -> Result<Step<Arg>, RefactorError> {
        Ok(self.rewriter.arg(arg, &self.path))
    }

    fn type_hook(&mut self, ty: &TypeRef) -> Result<Step<TypeRef>, RefactorError> {
        Ok(self.rewriter.type_ref(ty, &self.path))
    }

    fn ident(&mut self, ident: &Ident) -> Ident {
        match self.rewriter.ident(ident, &self.path) {
            Some(text) => Ident { id: ident.id, text },
            None => ident.clone(),
        }
    }

    // ---- declarations --------------------------------------------------

    fn descend_item(&mut self, item: &Item) -> Result<Item, RefactorError> {
        match item {
            Item::Namespace(ns) => {
                self.enter(ns.id, SyntaxKind::Namespace);
                let items = self.list(&ns.items, Self::item_hook, Self::descend_item)?;
                self.leave();
                Ok(Item::Namespace(NamespaceDecl {
                    id: ns.id,
                    name: ns.name.clone(),
                    usings: ns.usings.clone(),
                    items,
                }))
            }
            Item::Type(decl) => Ok(Item::Type(self.type_decl(decl)?)),
        }
    }

    fn type_decl(&mut self, decl: &TypeDecl) -> Result<TypeDecl, RefactorError> {
        self.enter(decl.id, SyntaxKind::TypeDecl);
        let mut out = TypeDecl {
            id: decl.id,
            trivia: decl.trivia.clone(),
            modifiers: decl.modifiers.clone(),
            kind: decl.kind,
            name: self.ident(&decl.name),
            type_params: decl.type_params.clone(),
            bases: self.type_refs(&decl.bases)?,
            constraints: decl.constraints.clone(),
            members: self.list(&decl.members, Self::member_hook, Self::descend_member)?,
        };
        self.leave();
        self.rewriter.finish_type(decl, &mut out, &self.path);
        Ok(out)
    }

    fn descend_member(&mut self, member: &Member) -> Result<Member, RefactorError> {
        // Type declarations record their own ancestor entry.
        let nested_type = matches!(member, Member::Type(_));
        if !nested_type {
            self.enter(member.id(), NodeRef::from(member).kind());
        }
        let mut out = match member {
            Member::Field(decl) => Member::Field(FieldDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                ty: self.type_ref(&decl.ty)?,
                declarators: self.declarators(&decl.declarators)?,
            }),
            Member::Method(decl) => Member::Method(MethodDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                return_type: self.type_ref(&decl.return_type)?,
                explicit_interface: self.opt_type(decl.explicit_interface.as_ref())?,
                name: self.ident(&decl.name),
                type_params: decl.type_params.clone(),
                params: self.params(&decl.params)?,
                constraints: decl.constraints.clone(),
                body: self.opt_block(decl.body.as_ref())?,
            }),
            Member::Constructor(decl) => Member::Constructor(ConstructorDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                name: self.ident(&decl.name),
                params: self.params(&decl.params)?,
                initializer: match &decl.initializer {
                    Some(init) => Some(self.ctor_initializer(init)?),
                    None => None,
                },
                body: self.opt_block(decl.body.as_ref())?,
            }),
            Member::Property(decl) => Member::Property(PropertyDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                ty: self.type_ref(&decl.ty)?,
                explicit_interface: self.opt_type(decl.explicit_interface.as_ref())?,
                name: self.ident(&decl.name),
                accessors: decl
                    .accessors
                    .iter()
                    .map(|accessor| self.accessor(accessor))
                    .collect::<Result<_, _>>()?,
            }),
            Member::Operator(decl) => Member::Operator(OperatorDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                return_type: self.type_ref(&decl.return_type)?,
                op: decl.op.clone(),
                params: self.params(&decl.params)?,
                body: self.opt_block(decl.body.as_ref())?,
            }),
            Member::Conversion(decl) => Member::Conversion(ConversionDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                implicit: decl.implicit,
                target: self.type_ref(&decl.target)?,
                params: self.params(&decl.params)?,
                body: self.opt_block(decl.body.as_ref())?,
            }),
            Member::Delegate(decl) => Member::Delegate(DelegateDecl {
                id: decl.id,
                trivia: decl.trivia.clone(),
                modifiers: decl.modifiers.clone(),
                return_type: self.type_ref(&decl.return_type)?,
                name: self.ident(&decl.name),
                type_params: decl.type_params.clone(),
                params: self.params(&decl.params)?,
            }),
            Member::Type(decl) => Member::Type(self.type_decl(decl)?),
        };
        if !nested_type {
            self.leave();
        }
        self.rewriter.finish_member(member, &mut out, &self.path);
        Ok(out)
    }

    fn ctor_initializer(&mut self, init: &CtorInitializer) -> Result<CtorInitializer, RefactorError> {
        self.enter(init.id, SyntaxKind::CtorInitializer);
        let args = self.args(&init.args)?;
        self.leave();
        Ok(CtorInitializer {
            id: init.id,
            kind: init.kind,
            args,
        })
    }

    fn accessor(&mut self, accessor: &Accessor) -> Result<Accessor, RefactorError> {
        self.enter(accessor.id, SyntaxKind::Accessor);
        let body = self.opt_block(accessor.body.as_ref())?;
        self.leave();
        Ok(Accessor {
            id: accessor.id,
            modifiers: accessor.modifiers.clone(),
            kind: accessor.kind,
            body,
        })
    }

    fn params(&mut self, params: &[Param]) -> Result<Vec<Param>, RefactorError> {
        self.list(params, Self::param_hook, Self::descend_param)
    }

    fn descend_param(&mut self, param: &Param) -> Result<Param, RefactorError> {
        self.enter(param.id, SyntaxKind::Param);
        let out = Param {
            id: param.id,
            modifier: param.modifier,
            ty: self.type_ref(&param.ty)?,
            name: self.ident(&param.name),
            default: self.opt_expr(param.default.as_ref())?,
        };
        self.leave();
        Ok(out)
    }

    fn declarators(&mut self, declarators: &[Declarator]) -> Result<Vec<Declarator>, RefactorError> {
        let out = self.list(declarators, Self::declarator_hook, Self::descend_declarator)?;
        if out.is_empty() && !declarators.is_empty() {
            return Err(RewriteError::InvalidRemoval {
                kind: SyntaxKind::Declarator,
            }
            .into());
        }
        Ok(out)
    }

    fn descend_declarator(&mut self, decl: &Declarator) -> Result<Declarator, RefactorError> {
        self.enter(decl.id, SyntaxKind::Declarator);
        let out = Declarator {
            id: decl.id,
            name: self.ident(&decl.name),
            init: self.opt_expr(decl.init.as_ref())?,
        };
        self.leave();
        Ok(out)
    }

    fn type_ref(&mut self, ty: &TypeRef) -> Result<TypeRef, RefactorError> {
        self.one(ty, SyntaxKind::TypeRef, Self::type_hook, Self::descend_type)
    }

    fn opt_type(&mut self, ty: Option<&TypeRef>) -> Result<Option<TypeRef>, RefactorError> {
        ty.map(|ty| self.type_ref(ty)).transpose()
    }

    fn type_refs(&mut self, types: &[TypeRef]) -> Result<Vec<TypeRef>, RefactorError> {
        types.iter().map(|ty| self.type_ref(ty)).collect()
    }

    fn descend_type(&mut self, ty: &TypeRef) -> Result<TypeRef, RefactorError> {
        self.enter(ty.id, SyntaxKind::TypeRef);
        let kind = match &ty.kind {
            TypeRefKind::Predefined(predefined) => TypeRefKind::Predefined(*predefined),
            TypeRefKind::Named(segments) => {
                let mut out = Vec::with_capacity(segments.len());
                for segment in segments {
                    out.push(TypeSegment {
                        name: self.ident(&segment.name),
                        args: self.type_refs(&segment.args)?,
                    });
                }
                TypeRefKind::Named(out)
            }
            TypeRefKind::Array(element) => TypeRefKind::Array(Box::new(self.type_ref(element)?)),
        };
        self.leave();
        Ok(TypeRef { id: ty.id, kind })
    }

    // ---- statements ----------------------------------------------------

    fn block(&mut self, block: &Block) -> Result<Block, RefactorError> {
        self.enter(block.id, SyntaxKind::Block);
        let stmts = self.list(&block.stmts, Self::stmt_hook, Self::descend_stmt)?;
        self.leave();
        let mut out = Block { id: block.id, stmts };
        self.rewriter.finish_block(block, &mut out, &self.path);
        Ok(out)
    }

    fn opt_block(&mut self, block: Option<&Block>) -> Result<Option<Block>, RefactorError> {
        block.map(|block| self.block(block)).transpose()
    }

    fn embedded(&mut self, stmt: &Stmt) -> Result<Box<Stmt>, RefactorError> {
        let kind = NodeRef::Stmt(stmt).kind();
        Ok(Box::new(self.one(stmt, kind, Self::stmt_hook, Self::descend_stmt)?))
    }

    fn local_decl(&mut self, decl: &LocalDecl) -> Result<LocalDecl, RefactorError> {
        Ok(LocalDecl {
            is_const: decl.is_const,
            ty: self.type_ref(&decl.ty)?,
            declarators: self.declarators(&decl.declarators)?,
        })
    }

    fn descend_stmt(&mut self, stmt: &Stmt) -> Result<Stmt, RefactorError> {
        self.enter(stmt.id, NodeRef::Stmt(stmt).kind());
        let kind = match &stmt.kind {
            StmtKind::Block(block) => StmtKind::Block(self.block(block)?),
            StmtKind::Local(decl) => StmtKind::Local(self.local_decl(decl)?),
            StmtKind::Expr(expr) => StmtKind::Expr(self.expr(expr)?),
            StmtKind::Return(value) => StmtKind::Return(self.opt_expr(value.as_ref())?),
            StmtKind::Throw(value) => StmtKind::Throw(self.opt_expr(value.as_ref())?),
            StmtKind::If(if_stmt) => StmtKind::If(IfStmt {
                cond: self.expr(&if_stmt.cond)?,
                then_branch: self.embedded(&if_stmt.then_branch)?,
                else_branch: match &if_stmt.else_branch {
                    Some(branch) => Some(self.embedded(branch)?),
                    None => None,
                },
            }),
            StmtKind::While(while_stmt) => StmtKind::While(WhileStmt {
                cond: self.expr(&while_stmt.cond)?,
                body: self.embedded(&while_stmt.body)?,
            }),
            StmtKind::Do(do_stmt) => StmtKind::Do(DoStmt {
                body: self.embedded(&do_stmt.body)?,
                cond: self.expr(&do_stmt.cond)?,
            }),
            StmtKind::For(for_stmt) => StmtKind::For(ForStmt {
                init: match &for_stmt.init {
                    ForInit::Decl(decl) => ForInit::Decl(self.local_decl(decl)?),
                    ForInit::Exprs(exprs) => ForInit::Exprs(self.exprs(exprs)?),
                },
                cond: self.opt_expr(for_stmt.cond.as_ref())?,
                step: self.exprs(&for_stmt.step)?,
                body: self.embedded(&for_stmt.body)?,
            }),
            StmtKind::Foreach(foreach) => StmtKind::Foreach(ForeachStmt {
                ty: self.type_ref(&foreach.ty)?,
                name: self.ident(&foreach.name),
                iterable: self.expr(&foreach.iterable)?,
                body: self.embedded(&foreach.body)?,
            }),
            StmtKind::Break => StmtKind::Break,
            StmtKind::Continue => StmtKind::Continue,
            StmtKind::Empty => StmtKind::Empty,
        };
        self.leave();
        Ok(Stmt {
            id: stmt.id,
            trivia: stmt.trivia.clone(),
            kind,
        })
    }

    // ---- expressions ---------------------------------------------------

    fn expr(&mut self, expr: &Expr) -> Result<Expr, RefactorError> {
        let kind = NodeRef::Expr(expr).kind();
        self.one(expr, kind, Self::expr_hook, Self::descend_expr)
    }

    fn boxed(&mut self, expr: &Expr) -> Result<Box<Expr>, RefactorError> {
        Ok(Box::new(self.expr(expr)?))
    }

    fn opt_expr(&mut self, expr: Option<&Expr>) -> Result<Option<Expr>, RefactorError> {
        expr.map(|expr| self.expr(expr)).transpose()
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Result<Vec<Expr>, RefactorError> {
        self.list(exprs, Self::expr_hook, Self::descend_expr)
    }

    fn args(&mut self, args: &[Arg]) -> Result<Vec<Arg>, RefactorError> {
        self.list(args, Self::arg_hook, Self::descend_arg)
    }

    fn descend_arg(&mut self, arg: &Arg) -> Result<Arg, RefactorError> {
        self.enter(arg.id, SyntaxKind::Arg);
        let out = Arg {
            id: arg.id,
            name: arg.name.as_ref().map(|name| self.ident(name)),
            modifier: arg.modifier,
            value: self.expr(&arg.value)?,
        };
        self.leave();
        Ok(out)
    }

    fn lambda_param(&mut self, param: &LambdaParam) -> Result<LambdaParam, RefactorError> {
        self.enter(param.id, SyntaxKind::LambdaParam);
        let out = LambdaParam {
            id: param.id,
            ty: self.opt_type(param.ty.as_ref())?,
            name: self.ident(&param.name),
        };
        self.leave();
        Ok(out)
    }

    fn descend_expr(&mut self, expr: &Expr) -> Result<Expr, RefactorError> {
        self.enter(expr.id, NodeRef::Expr(expr).kind());
        let kind = match &expr.kind {
            ExprKind::Literal(lit) => ExprKind::Literal(lit.clone()),
            ExprKind::Name(name) => ExprKind::Name(NameRef {
                ident: self.ident(&name.ident),
                type_args: self.type_refs(&name.type_args)?,
            }),
            ExprKind::This => ExprKind::This,
            ExprKind::Base => ExprKind::Base,
            ExprKind::Member(access) => ExprKind::Member(MemberAccess {
                receiver: self.boxed(&access.receiver)?,
                name: self.ident(&access.name),
                type_args: self.type_refs(&access.type_args)?,
            }),
            ExprKind::Call(call) => ExprKind::Call(Invocation {
                callee: self.boxed(&call.callee)?,
                args: self.args(&call.args)?,
            }),
            ExprKind::Index(access) => ExprKind::Index(ElementAccess {
                receiver: self.boxed(&access.receiver)?,
                args: self.args(&access.args)?,
            }),
            ExprKind::New(creation) => ExprKind::New(ObjectCreation {
                ty: self.type_ref(&creation.ty)?,
                args: self.args(&creation.args)?,
            }),
            ExprKind::NewArray(creation) => ExprKind::NewArray(ArrayCreation {
                element: self.type_ref(&creation.element)?,
                sizes: self.exprs(&creation.sizes)?,
            }),
            ExprKind::Unary(op, operand) => ExprKind::Unary(*op, self.boxed(operand)?),
            ExprKind::Postfix(op, operand) => ExprKind::Postfix(*op, self.boxed(operand)?),
            ExprKind::Binary(op, lhs, rhs) => {
                ExprKind::Binary(*op, self.boxed(lhs)?, self.boxed(rhs)?)
            }
            ExprKind::Assign(op, lhs, rhs) => {
                ExprKind::Assign(*op, self.boxed(lhs)?, self.boxed(rhs)?)
            }
            ExprKind::Conditional(cond, then_expr, else_expr) => ExprKind::Conditional(
                self.boxed(cond)?,
                self.boxed(then_expr)?,
                self.boxed(else_expr)?,
            ),
            ExprKind::Cast(ty, operand) => ExprKind::Cast(self.type_ref(ty)?, self.boxed(operand)?),
            ExprKind::Paren(inner) => ExprKind::Paren(self.boxed(inner)?),
            ExprKind::Lambda(lambda) => {
                let params = lambda
                    .params
                    .iter()
                    .map(|param| self.lambda_param(param))
                    .collect::<Result<_, _>>()?;
                let body = match &lambda.body {
                    LambdaBody::Expr(body) => LambdaBody::Expr(self.boxed(body)?),
                    LambdaBody::Block(block) => LambdaBody::Block(self.block(block)?),
                };
                ExprKind::Lambda(Lambda { params, body })
            }
            ExprKind::AnonymousMethod(method) => ExprKind::AnonymousMethod(AnonymousMethod {
                params: self.params(&method.params)?,
                body: self.block(&method.body)?,
            }),
            ExprKind::TypeOf(ty) => ExprKind::TypeOf(self.type_ref(ty)?),
            ExprKind::Default(ty) => ExprKind::Default(self.type_ref(ty)?),
        };
        self.leave();
        let mut out = Expr::new(expr.id, kind);
        self.rewriter.finish_expr(expr, &mut out, &self.path);
        Ok(out)
    }
}
