//! Factory for synthesized nodes.
//!
//! Every node gets a fresh id above the document's parsed ids, so the edit
//! synthesizer treats it as new.

use sharpen_semantic::Type;
use sharpen_syntax::*;

use crate::error::RewriteError;

/// Whether [`Make::type_ref`] can produce syntax for `ty`.
pub(crate) fn can_spell(ty: &Type) -> bool {
    match ty {
        Type::Null | Type::Unknown => false,
        Type::Named { args, .. } => args.iter().all(can_spell),
        Type::Array(element) => can_spell(element),
        _ => true,
    }
}

pub(crate) struct Make {
    ids: NodeIds,
}

impl Make {
    pub(crate) fn new(ids: NodeIds) -> Self {
        Make { ids }
    }

    pub(crate) fn id(&mut self) -> NodeId {
        self.ids.alloc()
    }

    pub(crate) fn ident(&mut self, text: &str) -> Ident {
        Ident {
            id: self.id(),
            text: text.to_string(),
        }
    }

    fn expr(&mut self, kind: ExprKind) -> Expr {
        Expr::new(self.id(), kind)
    }

    pub(crate) fn name(&mut self, text: &str) -> Expr {
        self.generic_name(text, Vec::new())
    }

    pub(crate) fn generic_name(&mut self, text: &str, type_args: Vec<TypeRef>) -> Expr {
        let ident = self.ident(text);
        self.expr(ExprKind::Name(NameRef { ident, type_args }))
    }

    pub(crate) fn this(&mut self) -> Expr {
        self.expr(ExprKind::This)
    }

    pub(crate) fn member(&mut self, receiver: Expr, name: &str) -> Expr {
        let name = self.ident(name);
        self.expr(ExprKind::Member(MemberAccess {
            receiver: Box::new(receiver),
            name,
            type_args: Vec::new(),
        }))
    }

    pub(crate) fn call(&mut self, callee: Expr, args: Vec<Arg>) -> Expr {
        self.expr(ExprKind::Call(Invocation {
            callee: Box::new(callee),
            args,
        }))
    }

    pub(crate) fn arg(&mut self, modifier: Option<ArgModifier>, value: Expr) -> Arg {
        Arg {
            id: self.id(),
            name: None,
            modifier,
            value,
        }
    }

    pub(crate) fn paren(&mut self, inner: Expr) -> Expr {
        self.expr(ExprKind::Paren(Box::new(inner)))
    }

    pub(crate) fn cast(&mut self, ty: TypeRef, operand: Expr) -> Expr {
        self.expr(ExprKind::Cast(ty, Box::new(operand)))
    }

    pub(crate) fn not(&mut self, operand: Expr) -> Expr {
        self.expr(ExprKind::Unary(UnaryOp::Not, Box::new(operand)))
    }

    pub(crate) fn binary(&mut self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    pub(crate) fn assign(&mut self, target: Expr, value: Expr) -> Expr {
        self.expr(ExprKind::Assign(AssignOp::Assign, Box::new(target), Box::new(value)))
    }

    pub(crate) fn literal(&mut self, kind: LiteralKind, text: &str) -> Expr {
        self.expr(ExprKind::Literal(Literal {
            kind,
            text: text.to_string(),
        }))
    }

    pub(crate) fn bool_literal(&mut self, value: bool) -> Expr {
        if value {
            self.literal(LiteralKind::True, "true")
        } else {
            self.literal(LiteralKind::False, "false")
        }
    }

    pub(crate) fn new_object(&mut self, ty: TypeRef, args: Vec<Arg>) -> Expr {
        self.expr(ExprKind::New(ObjectCreation { ty, args }))
    }

    pub(crate) fn predefined(&mut self, ty: PredefinedType) -> TypeRef {
        TypeRef {
            id: self.id(),
            kind: TypeRefKind::Predefined(ty),
        }
    }

    /// A possibly dotted type name without type arguments.
    pub(crate) fn type_named(&mut self, name: &str) -> TypeRef {
        self.type_with_args(name, Vec::new())
    }

    fn type_with_args(&mut self, name: &str, args: Vec<TypeRef>) -> TypeRef {
        let mut segments: Vec<TypeSegment> = name
            .split('.')
            .map(|part| TypeSegment {
                name: self.ident(part),
                args: Vec::new(),
            })
            .collect();
        if let Some(last) = segments.last_mut() {
            last.args = args;
        }
        TypeRef {
            id: self.id(),
            kind: TypeRefKind::Named(segments),
        }
    }

    /// Syntax for a semantic type; `None` for types that cannot be spelled.
    pub(crate) fn type_ref(&mut self, ty: &Type) -> Option<TypeRef> {
        let predefined = match ty {
            Type::Void => PredefinedType::Void,
            Type::Bool => PredefinedType::Bool,
            Type::Char => PredefinedType::Char,
            Type::Byte => PredefinedType::Byte,
            Type::Short => PredefinedType::Short,
            Type::Int => PredefinedType::Int,
            Type::Long => PredefinedType::Long,
            Type::Float => PredefinedType::Float,
            Type::Double => PredefinedType::Double,
            Type::Decimal => PredefinedType::Decimal,
            Type::String => PredefinedType::String,
            Type::Object => PredefinedType::Object,
            Type::Named { name, args, .. } => {
                let args = args
                    .iter()
                    .map(|arg| self.type_ref(arg))
                    .collect::<Option<Vec<_>>>()?;
                return Some(self.type_with_args(name, args));
            }
            Type::TypeParam { name, .. } => return Some(self.type_named(name)),
            Type::Array(element) => {
                let element = self.type_ref(element)?;
                return Some(TypeRef {
                    id: self.id(),
                    kind: TypeRefKind::Array(Box::new(element)),
                });
            }
            Type::Null | Type::Unknown => return None,
        };
        Some(self.predefined(predefined))
    }

    pub(crate) fn spell(&mut self, ty: &Type) -> Result<TypeRef, RewriteError> {
        self.type_ref(ty)
            .ok_or_else(|| RewriteError::UnspellableType(ty.to_string()))
    }

    pub(crate) fn stmt(&mut self, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.id(),
            trivia: Trivia::default(),
            kind,
        }
    }

    pub(crate) fn expr_stmt(&mut self, expr: Expr) -> Stmt {
        self.stmt(StmtKind::Expr(expr))
    }

    pub(crate) fn return_stmt(&mut self, value: Option<Expr>) -> Stmt {
        self.stmt(StmtKind::Return(value))
    }

    pub(crate) fn local(&mut self, is_const: bool, ty: TypeRef, name: &str, init: Expr) -> Stmt {
        let declarator = self.declarator(name, Some(init));
        self.stmt(StmtKind::Local(LocalDecl {
            is_const,
            ty,
            declarators: vec![declarator],
        }))
    }

    pub(crate) fn declarator(&mut self, name: &str, init: Option<Expr>) -> Declarator {
        Declarator {
            id: self.id(),
            name: self.ident(name),
            init,
        }
    }

    pub(crate) fn block(&mut self, stmts: Vec<Stmt>) -> Block {
        Block {
            id: self.id(),
            stmts,
        }
    }

    /// A block statement; the block shares the statement's id.
    pub(crate) fn block_stmt(&mut self, stmts: Vec<Stmt>) -> Stmt {
        let block = self.block(stmts);
        Stmt {
            id: block.id,
            trivia: Trivia::default(),
            kind: StmtKind::Block(block),
        }
    }

    pub(crate) fn param(&mut self, modifier: Option<ParamModifier>, ty: TypeRef, name: &str) -> Param {
        Param {
            id: self.id(),
            modifier,
            ty,
            name: self.ident(name),
            default: None,
        }
    }

    pub(crate) fn field(&mut self, modifiers: Modifiers, ty: TypeRef, name: &str, init: Option<Expr>) -> Member {
        let declarator = self.declarator(name, init);
        Member::Field(FieldDecl {
            id: self.id(),
            trivia: Trivia::default(),
            modifiers,
            ty,
            declarators: vec![declarator],
        })
    }

    pub(crate) fn method(
        &mut self,
        modifiers: Modifiers,
        return_type: TypeRef,
        name: &str,
        params: Vec<Param>,
        body: Vec<Stmt>,
    ) -> MethodDecl {
        let body = self.block(body);
        MethodDecl {
            id: self.id(),
            trivia: Trivia::default(),
            modifiers,
            return_type,
            explicit_interface: None,
            name: self.ident(name),
            type_params: Vec::new(),
            params,
            constraints: Vec::new(),
            body: Some(body),
        }
    }

    pub(crate) fn accessor(&mut self, kind: AccessorKind, body: Option<Vec<Stmt>>) -> Accessor {
        let body = body.map(|stmts| self.block(stmts));
        Accessor {
            id: self.id(),
            modifiers: Modifiers::default(),
            kind,
            body,
        }
    }

    pub(crate) fn property(
        &mut self,
        modifiers: Modifiers,
        ty: TypeRef,
        name: &str,
        accessors: Vec<Accessor>,
    ) -> Member {
        Member::Property(PropertyDecl {
            id: self.id(),
            trivia: Trivia::default(),
            modifiers,
            ty,
            explicit_interface: None,
            name: self.ident(name),
            accessors,
        })
    }

    pub(crate) fn constructor(
        &mut self,
        modifiers: Modifiers,
        name: &str,
        params: Vec<Param>,
        body: Vec<Stmt>,
    ) -> Member {
        let body = self.block(body);
        Member::Constructor(ConstructorDecl {
            id: self.id(),
            trivia: Trivia::default(),
            modifiers,
            name: self.ident(name),
            params,
            initializer: None,
            body: Some(body),
        })
    }

    pub(crate) fn class(&mut self, modifiers: Modifiers, name: &str, members: Vec<Member>) -> TypeDecl {
        TypeDecl {
            id: self.id(),
            trivia: Trivia::default(),
            modifiers,
            kind: TypeKind::Class,
            name: self.ident(name),
            type_params: Vec::new(),
            bases: Vec::new(),
            constraints: Vec::new(),
            members,
        }
    }
}
