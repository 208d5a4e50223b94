//! Body binding: name resolution, expression typing and access recording.

use std::collections::HashMap;

use sharpen_syntax::{
    AccessorKind, Arg, ArgModifier, BinaryOp, Block, CtorInitializer, CtorInitializerKind,
    Document, Expr, ExprKind, ForInit, LambdaBody, LiteralKind, LocalDecl, Member, MemberAccess,
    NameRef, NodeId, Param, ParamModifier, Stmt, StmtKind, TextRange, TypeDecl, TypeKind, UnaryOp,
};

use super::declare::{self, TypeScope};
use super::flow::{Access, BodyFlow};
use super::{FileFacts, Tables};
use crate::oracle::TypeInfo;
use crate::symbol::{DeclLocation, SymbolId, SymbolKind};
use crate::types::Type;

pub(super) fn bind_document(tables: &mut Tables, facts: &mut FileFacts, doc: &Document) {
    let mut binder = Binder {
        tables,
        facts,
        doc,
        scopes: Vec::new(),
        block_ends: Vec::new(),
        type_scope: TypeScope::new(),
        current_type: None,
        current_member: None,
        is_static: false,
        returns: Vec::new(),
        accesses: Vec::new(),
    };
    for decl in declare::type_decls(&doc.unit().items) {
        binder.type_decl(decl);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
    ReadWrite,
}

impl Mode {
    fn reads(self) -> bool {
        self != Mode::Write
    }

    fn writes(self) -> bool {
        self != Mode::Read
    }
}

type Subst = HashMap<SymbolId, Type>;

struct Binder<'a> {
    tables: &'a mut Tables,
    facts: &'a mut FileFacts,
    doc: &'a Document,
    /// Local scopes, innermost last.
    scopes: Vec<Vec<(String, SymbolId)>>,
    block_ends: Vec<usize>,
    type_scope: TypeScope,
    current_type: Option<SymbolId>,
    current_member: Option<SymbolId>,
    is_static: bool,
    /// Expected return types of the enclosing callables.
    returns: Vec<Type>,
    accesses: Vec<Access>,
}

impl<'a> Binder<'a> {
    // ---- declarations ----------------------------------------------------

    fn type_decl(&mut self, decl: &TypeDecl) {
        let Some(ty) = self.facts.bindings.get(&decl.id).copied() else {
            return;
        };
        let scope = declare::scope_of(self.tables, ty, &self.type_scope);
        let saved_scope = std::mem::replace(&mut self.type_scope, scope);
        let saved_type = self.current_type.replace(ty);
        for member in &decl.members {
            self.member(member);
        }
        self.current_type = saved_type;
        self.type_scope = saved_scope;
    }

    fn member(&mut self, member: &Member) {
        let Some(range) = self.doc.range(member.id()) else {
            return;
        };
        let symbol = self.facts.bindings.get(&member.id()).copied();
        self.is_static = member.modifiers().is_static();
        self.current_member = symbol;
        match member {
            Member::Field(field) => {
                for declarator in &field.declarators {
                    let Some(init) = &declarator.init else {
                        continue;
                    };
                    let field_symbol = self.facts.bindings.get(&declarator.id).copied();
                    let ty = self.symbol_type(field_symbol);
                    self.current_member = field_symbol;
                    self.begin_body();
                    self.expr_to(init, &ty);
                    let range = self.doc.range(declarator.id).unwrap_or(range);
                    self.end_body(range);
                }
            }
            Member::Method(method) => {
                let saved = self.type_scope.clone();
                if let Some(symbol) = symbol {
                    self.type_scope = declare::scope_of(self.tables, symbol, &saved);
                }
                let ret = self.symbol_type(symbol);
                self.callable(range, &method.params, ret, method.body.as_ref(), None);
                self.type_scope = saved;
            }
            Member::Constructor(ctor) => self.callable(
                range,
                &ctor.params,
                Type::Void,
                ctor.body.as_ref(),
                ctor.initializer.as_ref(),
            ),
            Member::Operator(op) => {
                let ret = self.symbol_type(symbol);
                self.callable(range, &op.params, ret, op.body.as_ref(), None);
            }
            Member::Conversion(conv) => {
                let ret = self.symbol_type(symbol);
                self.callable(range, &conv.params, ret, conv.body.as_ref(), None);
            }
            Member::Property(prop) => {
                let ty = self.symbol_type(symbol);
                for accessor in &prop.accessors {
                    let Some(body) = &accessor.body else {
                        continue;
                    };
                    let accessor_range = self.doc.range(accessor.id).unwrap_or(range);
                    self.begin_body();
                    self.scopes.push(Vec::new());
                    let ret = match accessor.kind {
                        AccessorKind::Get => ty.clone(),
                        AccessorKind::Set => {
                            let mut value =
                                declare::new_symbol(SymbolKind::Parameter, "value", ty.clone());
                            value.container = symbol;
                            let value = self.tables.alloc(value);
                            self.record(
                                value,
                                TextRange::empty(accessor_range.start),
                                Mode::Write,
                            );
                            self.declare_visible("value", value, accessor_range);
                            Type::Void
                        }
                    };
                    self.returns.push(ret);
                    self.block(body);
                    self.returns.pop();
                    self.scopes.pop();
                    self.end_body(accessor_range);
                }
            }
            Member::Delegate(_) => {}
            Member::Type(nested) => self.type_decl(nested),
        }
    }

    fn callable(
        &mut self,
        range: TextRange,
        params: &[Param],
        ret: Type,
        body: Option<&Block>,
        initializer: Option<&CtorInitializer>,
    ) {
        self.begin_body();
        self.scopes.push(Vec::new());
        for param in params {
            let Some(symbol) = self.facts.bindings.get(&param.id).copied() else {
                continue;
            };
            self.declare_visible(&param.name.text, symbol, range);
            if let Some(param_range) = self.doc.range(param.id) {
                self.record(symbol, param_range, Mode::Write);
            }
            if let Some(default) = &param.default {
                let ty = self.symbol_type(Some(symbol));
                self.expr_to(default, &ty);
            }
        }
        if let Some(init) = initializer {
            self.ctor_initializer(init);
        }
        if let Some(body) = body {
            self.returns.push(ret);
            self.block(body);
            self.returns.pop();
        }
        self.scopes.pop();
        self.end_body(range);
    }

    fn ctor_initializer(&mut self, init: &CtorInitializer) {
        let target = match init.kind {
            CtorInitializerKind::This => self.current_type,
            CtorInitializerKind::Base => self.current_type.and_then(|ty| {
                self.tables.base_symbols(ty).into_iter().find(|base| {
                    self.tables
                        .get(*base)
                        .is_some_and(|s| s.type_kind != Some(TypeKind::Interface))
                })
            }),
        };
        let ctor = target.and_then(|ty| {
            let ctors = self.tables.constructors(ty);
            self.select_overload(&ctors, &init.args)
        });
        if let Some(ctor) = ctor {
            self.facts.bind(init.id, ctor);
        }
        self.args(&init.args, ctor, &mut Subst::new());
    }

    // ---- scopes and accesses ---------------------------------------------

    fn begin_body(&mut self) {
        self.accesses.clear();
    }

    fn end_body(&mut self, range: TextRange) {
        let accesses = std::mem::take(&mut self.accesses);
        self.facts.bodies.push(BodyFlow { range, accesses });
    }

    fn declare_visible(&mut self, name: &str, symbol: SymbolId, range: TextRange) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((name.to_string(), symbol));
        }
        self.facts.visible.push((symbol, range));
    }

    fn record(&mut self, symbol: SymbolId, range: TextRange, mode: Mode) {
        self.accesses.push(Access {
            symbol,
            range,
            read: mode.reads(),
            write: mode.writes(),
        });
    }

    /// Records a read of the implicit receiver, if there is one.
    fn read_receiver(&mut self, range: Option<TextRange>) {
        if self.is_static {
            return;
        }
        let receiver = self
            .current_type
            .and_then(|ty| self.tables.receivers.get(&ty).copied());
        if let (Some(receiver), Some(range)) = (receiver, range) {
            self.record(receiver, range, Mode::Read);
        }
    }

    fn symbol_type(&self, symbol: Option<SymbolId>) -> Type {
        symbol
            .and_then(|symbol| self.tables.get(symbol))
            .map(|symbol| symbol.ty.clone())
            .unwrap_or(Type::Unknown)
    }

    fn local_symbol(
        &mut self,
        kind: SymbolKind,
        name: &str,
        ty: Type,
        node: NodeId,
        ordinal: Option<usize>,
    ) -> SymbolId {
        let mut symbol = declare::new_symbol(kind, name, ty);
        symbol.container = self.current_member;
        symbol.ordinal = ordinal;
        symbol.declaration = Some(DeclLocation {
            file: self.doc.file.clone(),
            node,
        });
        self.tables.alloc(symbol)
    }

    fn resolve_type(&mut self, ty: &sharpen_syntax::TypeRef) -> Type {
        declare::resolve_type(self.tables, self.facts, ty, &self.type_scope)
    }

    // ---- lookup ----------------------------------------------------------

    fn scoped(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(n, _)| n == name)
            .map(|(_, symbol)| *symbol)
    }

    /// The current type followed by its lexically enclosing types.
    fn enclosing_types(&self) -> Vec<SymbolId> {
        let mut out = Vec::new();
        let mut next = self.current_type;
        while let Some(ty) = next {
            out.push(ty);
            next = self
                .tables
                .get(ty)
                .and_then(|symbol| symbol.container)
                .filter(|outer| self.tables.kind(*outer) == Some(SymbolKind::Type));
        }
        out
    }

    fn lookup(&self, name: &str, arity: usize) -> Option<SymbolId> {
        if arity == 0 {
            if let Some(symbol) = self.scoped(name) {
                return Some(symbol);
            }
        }
        for owner in self.enclosing_types() {
            if let Some(member) = self.tables.members_named(owner, name).first() {
                return Some(*member);
            }
        }
        if arity == 0 {
            if let Some((_, param)) = self.type_scope.iter().rev().find(|(n, _)| n == name) {
                return Some(*param);
            }
        }
        declare::lookup_type(self.tables, name, arity)
    }

    fn methods_in(&self, owner: SymbolId, name: &str) -> Vec<SymbolId> {
        self.tables
            .members_named(owner, name)
            .into_iter()
            .filter(|member| self.tables.kind(*member) == Some(SymbolKind::Method))
            .collect()
    }

    fn implicit_methods(&self, name: &str) -> Vec<SymbolId> {
        for owner in self.enclosing_types() {
            let methods = self.methods_in(owner, name);
            if !methods.is_empty() {
                return methods;
            }
        }
        Vec::new()
    }

    /// First candidate whose parameter list accepts `args` by count.
    fn select_overload(&self, candidates: &[SymbolId], args: &[Arg]) -> Option<SymbolId> {
        candidates.iter().copied().find(|candidate| {
            let Some(symbol) = self.tables.get(*candidate) else {
                return false;
            };
            let params: Vec<_> = symbol
                .params
                .iter()
                .filter_map(|param| self.tables.get(*param))
                .collect();
            let has_params_array = params
                .last()
                .is_some_and(|param| param.param_mode == Some(ParamModifier::Params));
            let required = params
                .iter()
                .filter(|param| {
                    !self.tables.optional.contains(&param.id)
                        && param.param_mode != Some(ParamModifier::Params)
                })
                .count();
            args.len() >= required && (has_params_array || args.len() <= params.len())
        })
    }

    fn receiver_subst(&self, receiver: &Type) -> Subst {
        let mut out = Subst::new();
        if let Type::Named {
            symbol: Some(owner),
            args,
            ..
        } = receiver
        {
            if let Some(params) = self.tables.type_params.get(owner) {
                for (param, arg) in params.iter().zip(args) {
                    out.insert(*param, arg.clone());
                }
            }
        }
        out
    }

    // ---- statements ------------------------------------------------------

    fn block(&mut self, block: &Block) {
        let end = self
            .doc
            .range(block.id)
            .map(|range| range.end)
            .unwrap_or_default();
        self.scopes.push(Vec::new());
        self.block_ends.push(end);
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.block_ends.pop();
        self.scopes.pop();
    }

    /// A statement in its own scope, such as a branch of an `if`.
    fn embedded(&mut self, stmt: &Stmt) {
        self.scopes.push(Vec::new());
        self.stmt(stmt);
        self.scopes.pop();
    }

    fn stmt(&mut self, stmt: &Stmt) {
        let stmt_end = self
            .doc
            .range(stmt.id)
            .map(|range| range.end)
            .unwrap_or_default();
        match &stmt.kind {
            StmtKind::Block(block) => self.block(block),
            StmtKind::Local(decl) => {
                let end = self.block_ends.last().copied().unwrap_or(stmt_end);
                self.local_decl(decl, end);
            }
            StmtKind::Expr(expr) => {
                self.expr(expr, Mode::Read);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    let ret = self.returns.last().cloned().unwrap_or(Type::Unknown);
                    self.expr_to(value, &ret);
                }
            }
            StmtKind::If(if_stmt) => {
                self.expr_to(&if_stmt.cond, &Type::Bool);
                self.embedded(&if_stmt.then_branch);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.embedded(else_branch);
                }
            }
            StmtKind::While(while_stmt) => {
                self.expr_to(&while_stmt.cond, &Type::Bool);
                self.embedded(&while_stmt.body);
            }
            StmtKind::Do(do_stmt) => {
                self.embedded(&do_stmt.body);
                self.expr_to(&do_stmt.cond, &Type::Bool);
            }
            StmtKind::For(for_stmt) => {
                self.scopes.push(Vec::new());
                match &for_stmt.init {
                    ForInit::Decl(decl) => self.local_decl(decl, stmt_end),
                    ForInit::Exprs(exprs) => {
                        for expr in exprs {
                            self.expr(expr, Mode::Read);
                        }
                    }
                }
                if let Some(cond) = &for_stmt.cond {
                    self.expr_to(cond, &Type::Bool);
                }
                for step in &for_stmt.step {
                    self.expr(step, Mode::Read);
                }
                self.embedded(&for_stmt.body);
                self.scopes.pop();
            }
            StmtKind::Foreach(foreach) => {
                let iterable = self.expr(&foreach.iterable, Mode::Read);
                let element = match &iterable {
                    Type::Array(element) => (**element).clone(),
                    Type::String => Type::Char,
                    Type::Named { args, .. } if args.len() == 1 => args[0].clone(),
                    _ => Type::Unknown,
                };
                let ty = if foreach.ty.is_var() {
                    element
                } else {
                    self.resolve_type(&foreach.ty)
                };
                let local = self.local_symbol(
                    SymbolKind::Local,
                    &foreach.name.text,
                    ty,
                    foreach.name.id,
                    None,
                );
                self.facts.bind_ident(foreach.name.id, local, true);
                self.scopes.push(Vec::new());
                if let Some(range) = self.doc.range(foreach.name.id) {
                    self.record(local, range, Mode::Write);
                }
                if let Some(range) = self.doc.range(stmt.id) {
                    self.declare_visible(&foreach.name.text, local, range);
                }
                self.embedded(&foreach.body);
                self.scopes.pop();
            }
            StmtKind::Throw(value) => {
                if let Some(value) = value {
                    self.expr(value, Mode::Read);
                }
            }
            StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        }
    }

    fn local_decl(&mut self, decl: &LocalDecl, scope_end: usize) {
        let declared = if decl.ty.is_var() {
            None
        } else {
            Some(self.resolve_type(&decl.ty))
        };
        for declarator in &decl.declarators {
            let init_ty = declarator.init.as_ref().map(|init| match &declared {
                Some(ty) => {
                    self.expr_to(init, ty);
                    ty.clone()
                }
                None => self.expr(init, Mode::Read),
            });
            let ty = match declared.clone().or(init_ty) {
                Some(Type::Null) => Type::Object,
                Some(ty) => ty,
                None => Type::Unknown,
            };
            let local = self.local_symbol(
                SymbolKind::Local,
                &declarator.name.text,
                ty,
                declarator.id,
                None,
            );
            if decl.is_const {
                self.tables.symbols[local.0 as usize].flags.is_const = true;
            }
            self.facts.bind(declarator.id, local);
            self.facts.bind_ident(declarator.name.id, local, true);
            let Some(range) = self.doc.range(declarator.id) else {
                continue;
            };
            if declarator.init.is_some() {
                self.record(local, range, Mode::Write);
            }
            let visible = TextRange::new(range.start, scope_end.max(range.end));
            self.declare_visible(&declarator.name.text, local, visible);
        }
    }

    // ---- expressions -----------------------------------------------------

    fn expr_to(&mut self, expr: &Expr, expected: &Type) -> Type {
        let ty = self.expr(expr, Mode::Read);
        self.convert(expr, expected);
        ty
    }

    /// Records that the context converts `expr` to `target`.
    fn convert(&mut self, expr: &Expr, target: &Type) {
        if !target.is_known() || *target == Type::Void {
            return;
        }
        let mut current = expr;
        loop {
            if let Some(info) = self.facts.types.get_mut(&current.id) {
                if info.static_type != *target && self.tables.converts(&info.static_type, target) {
                    info.converted_type = target.clone();
                }
            }
            match &current.kind {
                ExprKind::Paren(inner) => current = inner,
                _ => break,
            }
        }
    }

    fn record_type(&mut self, expr: NodeId, ty: Type) {
        self.facts.types.insert(expr, TypeInfo::same(ty));
    }

    fn expr(&mut self, expr: &Expr, mode: Mode) -> Type {
        let ty = self.expr_kind(expr, mode);
        self.record_type(expr.id, ty.clone());
        ty
    }

    fn expr_kind(&mut self, expr: &Expr, mode: Mode) -> Type {
        match &expr.kind {
            ExprKind::Literal(literal) => match literal.kind {
                LiteralKind::Int => Type::Int,
                LiteralKind::Long => Type::Long,
                LiteralKind::Float => Type::Float,
                LiteralKind::Double => Type::Double,
                LiteralKind::Decimal => Type::Decimal,
                LiteralKind::String => Type::String,
                LiteralKind::Char => Type::Char,
                LiteralKind::True | LiteralKind::False => Type::Bool,
                LiteralKind::Null => Type::Null,
            },
            ExprKind::Name(name) => self.name(expr, name, mode),
            ExprKind::This | ExprKind::Base => {
                self.read_receiver(self.doc.range(expr.id));
                let Some(ty) = self.current_type else {
                    return Type::Unknown;
                };
                if let Some(receiver) = self.tables.receivers.get(&ty).copied() {
                    self.facts.bind(expr.id, receiver);
                }
                if matches!(expr.kind, ExprKind::This) {
                    self.symbol_type(Some(ty))
                } else {
                    self.tables
                        .bases
                        .get(&ty)
                        .and_then(|bases| bases.first().cloned())
                        .unwrap_or(Type::Object)
                }
            }
            ExprKind::Member(access) => self.member_access(expr, access),
            ExprKind::Call(call) => self.call(expr, &call.callee, &call.args),
            ExprKind::Index(access) => {
                let receiver = self.expr(&access.receiver, Mode::Read);
                for arg in &access.args {
                    self.expr(&arg.value, Mode::Read);
                }
                match receiver {
                    Type::Array(element) => *element,
                    Type::String => Type::Char,
                    _ => Type::Unknown,
                }
            }
            ExprKind::New(creation) => {
                let ty = self.resolve_type(&creation.ty);
                let ctor = ty
                    .symbol()
                    .filter(|owner| self.tables.kind(*owner) == Some(SymbolKind::Type))
                    .and_then(|owner| {
                        let ctors = self.tables.constructors(owner);
                        self.select_overload(&ctors, &creation.args)
                    });
                if let Some(ctor) = ctor {
                    self.facts.bind(expr.id, ctor);
                }
                let mut subst = self.receiver_subst(&ty);
                self.args(&creation.args, ctor, &mut subst);
                ty
            }
            ExprKind::NewArray(creation) => {
                let element = self.resolve_type(&creation.element);
                for size in &creation.sizes {
                    self.expr_to(size, &Type::Int);
                }
                Type::Array(Box::new(element))
            }
            ExprKind::Unary(op, operand) => match op {
                UnaryOp::Not => {
                    self.expr_to(operand, &Type::Bool);
                    Type::Bool
                }
                UnaryOp::PreInc | UnaryOp::PreDec => self.expr(operand, Mode::ReadWrite),
                UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot => {
                    let ty = self.expr(operand, Mode::Read);
                    let promoted = Type::promote_unary(&ty);
                    self.convert(operand, &promoted);
                    promoted
                }
            },
            ExprKind::Postfix(_, operand) => self.expr(operand, Mode::ReadWrite),
            ExprKind::Binary(op, lhs, rhs) => {
                let lt = self.expr(lhs, Mode::Read);
                let rt = self.expr(rhs, Mode::Read);
                self.binary(*op, lhs, rhs, &lt, &rt)
            }
            ExprKind::Assign(op, target, value) => {
                if op.is_compound() {
                    let target_ty = self.expr(target, Mode::ReadWrite);
                    let value_ty = self.expr(value, Mode::Read);
                    if target_ty.is_numeric() && value_ty.is_numeric() {
                        let promoted = Type::promote(&target_ty, &value_ty);
                        self.convert(value, &promoted);
                    }
                    target_ty
                } else {
                    let target_ty = self.expr(target, Mode::Write);
                    self.expr_to(value, &target_ty);
                    target_ty
                }
            }
            ExprKind::Conditional(cond, then_expr, else_expr) => {
                self.expr_to(cond, &Type::Bool);
                let a = self.expr(then_expr, Mode::Read);
                let b = self.expr(else_expr, Mode::Read);
                let ty = if a == b {
                    a
                } else if self.tables.converts(&a, &b) {
                    b
                } else if self.tables.converts(&b, &a) {
                    a
                } else {
                    Type::Unknown
                };
                self.convert(then_expr, &ty);
                self.convert(else_expr, &ty);
                ty
            }
            ExprKind::Cast(ty, operand) => {
                let ty = self.resolve_type(ty);
                self.expr(operand, Mode::Read);
                ty
            }
            ExprKind::Paren(inner) => self.expr(inner, mode),
            ExprKind::Lambda(lambda) => {
                let range = self.doc.range(expr.id).unwrap_or_default();
                self.scopes.push(Vec::new());
                for (ordinal, param) in lambda.params.iter().enumerate() {
                    let ty = match &param.ty {
                        Some(ty) => self.resolve_type(ty),
                        None => Type::Unknown,
                    };
                    let symbol = self.local_symbol(
                        SymbolKind::Parameter,
                        &param.name.text,
                        ty,
                        param.id,
                        Some(ordinal),
                    );
                    self.bind_param(param.id, param.name.id, &param.name.text, symbol, range);
                }
                match &lambda.body {
                    LambdaBody::Expr(body) => {
                        self.expr(body, Mode::Read);
                    }
                    LambdaBody::Block(body) => {
                        self.returns.push(Type::Unknown);
                        self.block(body);
                        self.returns.pop();
                    }
                }
                self.scopes.pop();
                Type::Unknown
            }
            ExprKind::AnonymousMethod(method) => {
                let range = self.doc.range(expr.id).unwrap_or_default();
                self.scopes.push(Vec::new());
                for (ordinal, param) in method.params.iter().enumerate() {
                    let ty = self.resolve_type(&param.ty);
                    let symbol = self.local_symbol(
                        SymbolKind::Parameter,
                        &param.name.text,
                        ty,
                        param.id,
                        Some(ordinal),
                    );
                    self.tables.symbols[symbol.0 as usize].param_mode = param.modifier;
                    self.bind_param(param.id, param.name.id, &param.name.text, symbol, range);
                }
                self.returns.push(Type::Unknown);
                self.block(&method.body);
                self.returns.pop();
                self.scopes.pop();
                Type::Unknown
            }
            ExprKind::TypeOf(ty) => {
                self.resolve_type(ty);
                Type::Named {
                    name: "Type".to_string(),
                    symbol: None,
                    args: Vec::new(),
                }
            }
            ExprKind::Default(ty) => self.resolve_type(ty),
        }
    }

    fn bind_param(
        &mut self,
        node: NodeId,
        ident: NodeId,
        name: &str,
        symbol: SymbolId,
        visible: TextRange,
    ) {
        self.facts.bind(node, symbol);
        self.facts.bind_ident(ident, symbol, true);
        if let Some(range) = self.doc.range(node) {
            self.record(symbol, range, Mode::Write);
        }
        self.declare_visible(name, symbol, visible);
    }

    fn name(&mut self, expr: &Expr, name: &NameRef, mode: Mode) -> Type {
        for arg in &name.type_args {
            self.resolve_type(arg);
        }
        let Some(symbol) = self.lookup(&name.ident.text, name.type_args.len()) else {
            return Type::Unknown;
        };
        self.facts.bind(expr.id, symbol);
        self.facts.bind_ident(name.ident.id, symbol, false);
        let range = self.doc.range(name.ident.id);
        let Some(resolved) = self.tables.get(symbol) else {
            return Type::Unknown;
        };
        let (kind, is_static, ty) = (resolved.kind, resolved.flags.is_static, resolved.ty.clone());
        match kind {
            SymbolKind::Local | SymbolKind::Parameter => {
                if let Some(range) = range {
                    self.record(symbol, range, mode);
                }
                ty
            }
            SymbolKind::Field | SymbolKind::Property => {
                if !is_static {
                    self.read_receiver(range);
                }
                ty
            }
            SymbolKind::Method => {
                if !is_static {
                    self.read_receiver(range);
                }
                Type::Unknown
            }
            _ => ty,
        }
    }

    fn member_access(&mut self, expr: &Expr, access: &MemberAccess) -> Type {
        let receiver = self.expr(&access.receiver, Mode::Read);
        for arg in &access.type_args {
            self.resolve_type(arg);
        }
        let name = access.name.text.as_str();
        let Some(owner) = receiver.symbol() else {
            return match (&receiver, name) {
                (Type::Array(_) | Type::String, "Length") => Type::Int,
                _ => Type::Unknown,
            };
        };
        let Some(member) = self.tables.members_named(owner, name).first().copied() else {
            return Type::Unknown;
        };
        self.facts.bind(expr.id, member);
        self.facts.bind_ident(access.name.id, member, false);
        if self.tables.kind(member) == Some(SymbolKind::Method) {
            return Type::Unknown;
        }
        let subst = self.receiver_subst(&receiver);
        self.symbol_type(Some(member))
            .substitute(&|param| subst.get(&param).cloned())
    }

    fn call(&mut self, expr: &Expr, callee: &Expr, args: &[Arg]) -> Type {
        let (candidates, mut subst, type_args, ident, implicit) = match &callee.kind {
            ExprKind::Name(name) if self.scoped(&name.ident.text).is_none() => (
                self.implicit_methods(&name.ident.text),
                Subst::new(),
                &name.type_args,
                &name.ident,
                true,
            ),
            ExprKind::Member(access) => {
                let receiver = self.expr(&access.receiver, Mode::Read);
                let candidates = receiver
                    .symbol()
                    .map(|owner| self.methods_in(owner, &access.name.text))
                    .unwrap_or_default();
                (
                    candidates,
                    self.receiver_subst(&receiver),
                    &access.type_args,
                    &access.name,
                    false,
                )
            }
            _ => {
                // Delegate invocation or an unsupported callee shape.
                self.expr(callee, Mode::Read);
                self.args(args, None, &mut Subst::new());
                return Type::Unknown;
            }
        };
        let explicit: Vec<Type> = type_args.iter().map(|ty| self.resolve_type(ty)).collect();
        self.record_type(callee.id, Type::Unknown);
        let Some(method) = self.select_overload(&candidates, args) else {
            self.args(args, None, &mut subst);
            return Type::Unknown;
        };
        self.facts.bind(callee.id, method);
        self.facts.bind_ident(ident.id, method, false);
        self.facts.bind(expr.id, method);
        let is_static = self
            .tables
            .get(method)
            .is_some_and(|symbol| symbol.flags.is_static);
        if implicit && !is_static {
            self.read_receiver(self.doc.range(ident.id));
        }
        if let Some(params) = self.tables.type_params.get(&method) {
            for (param, arg) in params.iter().zip(explicit) {
                subst.insert(*param, arg);
            }
        }
        self.args(args, Some(method), &mut subst);
        self.symbol_type(Some(method))
            .substitute(&|param| subst.get(&param).cloned())
    }

    /// Binds arguments against the parameters of `target`, inferring type
    /// arguments into `subst`.
    fn args(&mut self, args: &[Arg], target: Option<SymbolId>, subst: &mut Subst) {
        let params = target
            .and_then(|target| self.tables.get(target))
            .map(|symbol| symbol.params.clone())
            .unwrap_or_default();
        let mut typed = Vec::new();
        for (idx, arg) in args.iter().enumerate() {
            let param = match &arg.name {
                Some(name) => params.iter().copied().find(|param| {
                    self.tables
                        .get(*param)
                        .is_some_and(|symbol| symbol.name == name.text)
                }),
                None => params.get(idx).copied().or_else(|| {
                    params.last().copied().filter(|param| {
                        self.tables
                            .get(*param)
                            .is_some_and(|symbol| symbol.param_mode == Some(ParamModifier::Params))
                    })
                }),
            };
            if let Some(param) = param {
                self.facts.bind(arg.id, param);
                if let Some(name) = &arg.name {
                    self.facts.bind_ident(name.id, param, false);
                }
            }
            let mode = match arg.modifier {
                Some(ArgModifier::Ref) => Mode::ReadWrite,
                Some(ArgModifier::Out) => Mode::Write,
                None => Mode::Read,
            };
            let ty = self.expr(&arg.value, mode);
            let Some(param) = param.and_then(|param| self.tables.get(param)) else {
                continue;
            };
            let mut param_ty = param.ty.clone();
            if param.param_mode == Some(ParamModifier::Params) && !matches!(ty, Type::Array(_)) {
                if let Type::Array(element) = param_ty {
                    param_ty = *element;
                }
            }
            infer(&param_ty, &ty, subst);
            if arg.modifier.is_none() {
                typed.push((&arg.value, param_ty));
            }
        }
        for (value, param_ty) in typed {
            let target = param_ty.substitute(&|param| subst.get(&param).cloned());
            self.convert(value, &target);
        }
    }

    fn binary(&mut self, op: BinaryOp, lhs: &Expr, rhs: &Expr, lt: &Type, rt: &Type) -> Type {
        let operator = format!("operator {}", op.token());
        for operand in [lt, rt] {
            if let Some(owner) = operand.symbol() {
                if let Some(user) = self.tables.members_named(owner, &operator).first() {
                    return self.symbol_type(Some(*user));
                }
            }
        }
        match op {
            BinaryOp::And | BinaryOp::Or => {
                self.convert(lhs, &Type::Bool);
                self.convert(rhs, &Type::Bool);
                Type::Bool
            }
            BinaryOp::Add if *lt == Type::String || *rt == Type::String => Type::String,
            BinaryOp::Shl | BinaryOp::Shr => Type::promote_unary(lt),
            BinaryOp::Eq | BinaryOp::Ne if !(lt.is_numeric() && rt.is_numeric()) => Type::Bool,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
                if *lt == Type::Bool && *rt == Type::Bool =>
            {
                Type::Bool
            }
            _ => {
                let promoted = Type::promote(lt, rt);
                if promoted.is_known() {
                    self.convert(lhs, &promoted);
                    self.convert(rhs, &promoted);
                }
                if op.is_relational() {
                    Type::Bool
                } else {
                    promoted
                }
            }
        }
    }
}

/// Infers type parameters of `param` from the argument type `arg`.
fn infer(param: &Type, arg: &Type, subst: &mut Subst) {
    match (param, arg) {
        (Type::TypeParam { symbol, .. }, arg) if arg.is_known() && *arg != Type::Null => {
            subst.entry(*symbol).or_insert_with(|| arg.clone());
        }
        (Type::Array(param), Type::Array(arg)) => infer(param, arg, subst),
        (Type::Named { args: params, .. }, Type::Named { args, .. }) => {
            for (param, arg) in params.iter().zip(args) {
                infer(param, arg, subst);
            }
        }
        _ => {}
    }
}
