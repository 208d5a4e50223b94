//! Typed syntax tree.
//!
//! Every node that a refactoring may need to address carries a [`NodeId`]. Ids
//! are assigned densely by the parser and are stable for the lifetime of a
//! parse; synthesized nodes get fresh ids from a [`NodeIds`] allocator. Source
//! ranges are not stored on nodes, they live in the document's `SourceMap`.

use serde::{Deserialize, Serialize};

/// Stable identity of a syntax node within one document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Allocator for fresh node ids.
///
/// Starts above the highest id handed out by the parser so synthesized nodes
/// never collide with original ones.
#[derive(Debug, Clone)]
pub struct NodeIds {
    next: u32,
}

impl NodeIds {
    pub fn starting_at(next: NodeId) -> Self {
        Self { next: next.0 }
    }

    pub fn alloc(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> NodeId {
        NodeId(self.next)
    }
}

/// Comments attached in front of a statement or member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    /// Line comments, without the leading `//`.
    pub comments: Vec<String>,
}

impl Trivia {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub id: NodeId,
    pub usings: Vec<UsingDirective>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub id: NodeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

impl Item {
    pub fn id(&self) -> NodeId {
        match self {
            Item::Namespace(ns) => ns.id,
            Item::Type(ty) => ty.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub id: NodeId,
    pub name: String,
    pub usings: Vec<UsingDirective>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Public,
    Protected,
    Internal,
    Private,
    New,
    Static,
    Const,
    Readonly,
    Virtual,
    Override,
    Abstract,
    Sealed,
    Extern,
    Partial,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Private => "private",
            Modifier::New => "new",
            Modifier::Static => "static",
            Modifier::Const => "const",
            Modifier::Readonly => "readonly",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::Abstract => "abstract",
            Modifier::Sealed => "sealed",
            Modifier::Extern => "extern",
            Modifier::Partial => "partial",
        }
    }

    pub fn from_keyword(text: &str) -> Option<Modifier> {
        Some(match text {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "internal" => Modifier::Internal,
            "private" => Modifier::Private,
            "new" => Modifier::New,
            "static" => Modifier::Static,
            "const" => Modifier::Const,
            "readonly" => Modifier::Readonly,
            "virtual" => Modifier::Virtual,
            "override" => Modifier::Override,
            "abstract" => Modifier::Abstract,
            "sealed" => Modifier::Sealed,
            "extern" => Modifier::Extern,
            "partial" => Modifier::Partial,
            _ => return None,
        })
    }

    pub fn is_access(self) -> bool {
        matches!(
            self,
            Modifier::Public | Modifier::Protected | Modifier::Internal | Modifier::Private
        )
    }
}

/// Ordered modifier list; order is preserved when printing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers(pub Vec<Modifier>);

impl Modifiers {
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        Self(modifiers)
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn is_static(&self) -> bool {
        self.has(Modifier::Static) || self.has(Modifier::Const)
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }

    /// Returns a copy with `modifier` inserted first (no-op when present).
    pub fn with_first(&self, modifier: Modifier) -> Modifiers {
        if self.has(modifier) {
            return self.clone();
        }
        let mut out = vec![modifier];
        out.extend(self.0.iter().copied());
        Modifiers(out)
    }

    /// Returns a copy with `modifier` appended (no-op when present).
    pub fn with_last(&self, modifier: Modifier) -> Modifiers {
        if self.has(modifier) {
            return self.clone();
        }
        let mut out = self.0.clone();
        out.push(modifier);
        Modifiers(out)
    }

    /// Returns a copy where all access modifiers are replaced by `access`,
    /// which takes the position of the first access modifier (or goes first).
    pub fn with_access(&self, access: Modifier) -> Modifiers {
        let mut out = Vec::with_capacity(self.0.len() + 1);
        let mut placed = false;
        for modifier in self.iter() {
            if modifier.is_access() {
                if !placed {
                    out.push(access);
                    placed = true;
                }
            } else {
                out.push(modifier);
            }
        }
        if !placed {
            out.insert(0, access);
        }
        Modifiers(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub kind: TypeKind,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub bases: Vec<TypeRef>,
    pub constraints: Vec<Constraint>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub id: NodeId,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub id: NodeId,
    pub param: Ident,
    pub bounds: Vec<ConstraintBound>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintBound {
    Class,
    Struct,
    New,
    Type(TypeRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Property(PropertyDecl),
    Operator(OperatorDecl),
    Conversion(ConversionDecl),
    Delegate(DelegateDecl),
    Type(TypeDecl),
}

impl Member {
    pub fn id(&self) -> NodeId {
        match self {
            Member::Field(decl) => decl.id,
            Member::Method(decl) => decl.id,
            Member::Constructor(decl) => decl.id,
            Member::Property(decl) => decl.id,
            Member::Operator(decl) => decl.id,
            Member::Conversion(decl) => decl.id,
            Member::Delegate(decl) => decl.id,
            Member::Type(decl) => decl.id,
        }
    }

    pub fn modifiers(&self) -> &Modifiers {
        match self {
            Member::Field(decl) => &decl.modifiers,
            Member::Method(decl) => &decl.modifiers,
            Member::Constructor(decl) => &decl.modifiers,
            Member::Property(decl) => &decl.modifiers,
            Member::Operator(decl) => &decl.modifiers,
            Member::Conversion(decl) => &decl.modifiers,
            Member::Delegate(decl) => &decl.modifiers,
            Member::Type(decl) => &decl.modifiers,
        }
    }

    pub fn trivia(&self) -> &Trivia {
        match self {
            Member::Field(decl) => &decl.trivia,
            Member::Method(decl) => &decl.trivia,
            Member::Constructor(decl) => &decl.trivia,
            Member::Property(decl) => &decl.trivia,
            Member::Operator(decl) => &decl.trivia,
            Member::Conversion(decl) => &decl.trivia,
            Member::Delegate(decl) => &decl.trivia,
            Member::Type(decl) => &decl.trivia,
        }
    }

    /// Parameter list of method-like members.
    pub fn params(&self) -> Option<&[Param]> {
        match self {
            Member::Method(decl) => Some(&decl.params),
            Member::Constructor(decl) => Some(&decl.params),
            Member::Operator(decl) => Some(&decl.params),
            Member::Conversion(decl) => Some(&decl.params),
            Member::Delegate(decl) => Some(&decl.params),
            Member::Field(_) | Member::Property(_) | Member::Type(_) => None,
        }
    }

    /// Body of method-like members that have one.
    pub fn body(&self) -> Option<&Block> {
        match self {
            Member::Method(decl) => decl.body.as_ref(),
            Member::Constructor(decl) => decl.body.as_ref(),
            Member::Operator(decl) => decl.body.as_ref(),
            Member::Conversion(decl) => decl.body.as_ref(),
            Member::Field(_) | Member::Property(_) | Member::Delegate(_) | Member::Type(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declarator {
    pub id: NodeId,
    pub name: Ident,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub return_type: TypeRef,
    /// `IFoo` in `void IFoo.Bar()`.
    pub explicit_interface: Option<TypeRef>,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub constraints: Vec<Constraint>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub params: Vec<Param>,
    pub initializer: Option<CtorInitializer>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorInitializerKind {
    Base,
    This,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorInitializer {
    pub id: NodeId,
    pub kind: CtorInitializerKind,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub explicit_interface: Option<TypeRef>,
    pub name: Ident,
    pub accessors: Vec<Accessor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub kind: AccessorKind,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub return_type: TypeRef,
    /// Operator token text, e.g. `+` or `==`.
    pub op: String,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub implicit: bool,
    pub target: TypeRef,
    pub params: Vec<Param>,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateDecl {
    pub id: NodeId,
    pub trivia: Trivia,
    pub modifiers: Modifiers,
    pub return_type: TypeRef,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamModifier {
    Ref,
    Out,
    Params,
    This,
}

impl ParamModifier {
    pub fn keyword(self) -> &'static str {
        match self {
            ParamModifier::Ref => "ref",
            ParamModifier::Out => "out",
            ParamModifier::Params => "params",
            ParamModifier::This => "this",
        }
    }

    pub fn is_by_ref(self) -> bool {
        matches!(self, ParamModifier::Ref | ParamModifier::Out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub id: NodeId,
    pub modifier: Option<ParamModifier>,
    pub ty: TypeRef,
    pub name: Ident,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedType {
    Void,
    Bool,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Object,
}

impl PredefinedType {
    pub fn keyword(self) -> &'static str {
        match self {
            PredefinedType::Void => "void",
            PredefinedType::Bool => "bool",
            PredefinedType::Byte => "byte",
            PredefinedType::Char => "char",
            PredefinedType::Short => "short",
            PredefinedType::Int => "int",
            PredefinedType::Long => "long",
            PredefinedType::Float => "float",
            PredefinedType::Double => "double",
            PredefinedType::Decimal => "decimal",
            PredefinedType::String => "string",
            PredefinedType::Object => "object",
        }
    }

    pub fn from_keyword(text: &str) -> Option<PredefinedType> {
        Some(match text {
            "void" => PredefinedType::Void,
            "bool" => PredefinedType::Bool,
            "byte" => PredefinedType::Byte,
            "char" => PredefinedType::Char,
            "short" => PredefinedType::Short,
            "int" => PredefinedType::Int,
            "long" => PredefinedType::Long,
            "float" => PredefinedType::Float,
            "double" => PredefinedType::Double,
            "decimal" => PredefinedType::Decimal,
            "string" => PredefinedType::String,
            "object" => PredefinedType::Object,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub id: NodeId,
    pub kind: TypeRefKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Predefined(PredefinedType),
    /// Possibly qualified, possibly generic name: `N1.N2.A<T>`.
    Named(Vec<TypeSegment>),
    Array(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSegment {
    pub name: Ident,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// `var` is parsed as an ordinary single-segment name.
    pub fn is_var(&self) -> bool {
        matches!(&self.kind, TypeRefKind::Named(segments)
            if segments.len() == 1 && segments[0].name.text == "var" && segments[0].args.is_empty())
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeRefKind::Predefined(PredefinedType::Void))
    }

    /// Last segment of a named type.
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            TypeRefKind::Named(segments) => segments.last().map(|seg| seg.name.text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub id: NodeId,
    pub trivia: Trivia,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    /// A nested block; the block shares the statement's id.
    Block(Block),
    Local(LocalDecl),
    Expr(Expr),
    Return(Option<Expr>),
    If(IfStmt),
    While(WhileStmt),
    Do(DoStmt),
    For(ForStmt),
    Foreach(ForeachStmt),
    Break,
    Continue,
    Throw(Option<Expr>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDecl {
    pub is_const: bool,
    pub ty: TypeRef,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStmt {
    pub body: Box<Stmt>,
    pub cond: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForInit {
    Decl(LocalDecl),
    Exprs(Vec<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub init: ForInit,
    pub cond: Option<Expr>,
    pub step: Vec<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachStmt {
    pub ty: TypeRef,
    /// The loop variable; `id` doubles as its declaration id.
    pub name: Ident,
    pub iterable: Expr,
    pub body: Box<Stmt>,
}

impl Stmt {
    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            StmtKind::Block(block) => Some(block),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Literal(Literal),
    Name(NameRef),
    This,
    Base,
    Member(MemberAccess),
    Call(Invocation),
    Index(ElementAccess),
    New(ObjectCreation),
    NewArray(ArrayCreation),
    Unary(UnaryOp, Box<Expr>),
    Postfix(PostfixOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Assign(AssignOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
    Cast(TypeRef, Box<Expr>),
    Paren(Box<Expr>),
    Lambda(Lambda),
    AnonymousMethod(AnonymousMethod),
    TypeOf(TypeRef),
    Default(TypeRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Char,
    True,
    False,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Source text of the literal token.
    pub text: String,
}

/// Numeric value of a literal, used to compare literals by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(i128),
    Real(f64),
}

impl Literal {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind,
            LiteralKind::Int
                | LiteralKind::Long
                | LiteralKind::Float
                | LiteralKind::Double
                | LiteralKind::Decimal
        )
    }

    pub fn numeric_value(&self) -> Option<NumericValue> {
        let text: String = self.text.chars().filter(|c| *c != '_').collect();
        let hex = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .map(|hex| hex.trim_end_matches(['l', 'L', 'u', 'U']));
        let digits =
            text.trim_end_matches(['f', 'F', 'd', 'D', 'm', 'M', 'l', 'L', 'u', 'U']);
        match self.kind {
            LiteralKind::Int | LiteralKind::Long => {
                let value = match hex {
                    Some(hex) => i128::from_str_radix(hex, 16),
                    None => digits.parse::<i128>(),
                };
                value.ok().map(NumericValue::Integer)
            }
            LiteralKind::Float | LiteralKind::Double | LiteralKind::Decimal => {
                digits.parse::<f64>().ok().map(NumericValue::Real)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub ident: Ident,
    pub type_args: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccess {
    pub receiver: Box<Expr>,
    pub name: Ident,
    pub type_args: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub callee: Box<Expr>,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAccess {
    pub receiver: Box<Expr>,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreation {
    pub ty: TypeRef,
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCreation {
    pub element: TypeRef,
    pub sizes: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgModifier {
    Ref,
    Out,
}

impl ArgModifier {
    pub fn keyword(self) -> &'static str {
        match self {
            ArgModifier::Ref => "ref",
            ArgModifier::Out => "out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub id: NodeId,
    /// `name:` of a named argument.
    pub name: Option<Ident>,
    pub modifier: Option<ArgModifier>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub params: Vec<LambdaParam>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParam {
    pub id: NodeId,
    pub ty: Option<TypeRef>,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymousMethod {
    pub params: Vec<Param>,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    PreInc,
    PreDec,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    Inc,
    Dec,
}

impl PostfixOp {
    pub fn token(self) -> &'static str {
        match self {
            PostfixOp::Inc => "++",
            PostfixOp::Dec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
            BinaryOp::Add | BinaryOp::Sub => 9,
            BinaryOp::Shl | BinaryOp::Shr => 8,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => 7,
            BinaryOp::Eq | BinaryOp::Ne => 6,
            BinaryOp::BitAnd => 5,
            BinaryOp::BitXor => 4,
            BinaryOp::BitOr => 3,
            BinaryOp::And => 2,
            BinaryOp::Or => 1,
        }
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        }
    }

    pub fn is_compound(self) -> bool {
        self != AssignOp::Assign
    }
}

impl Expr {
    pub fn new(id: NodeId, kind: ExprKind) -> Self {
        Self { id, kind }
    }

    /// Strips any number of enclosing parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    pub fn as_name(&self) -> Option<&NameRef> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Binds at least as tightly as a member access: can be a receiver
    /// without parentheses.
    pub fn is_primary(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Literal(_)
                | ExprKind::Name(_)
                | ExprKind::This
                | ExprKind::Base
                | ExprKind::Member(_)
                | ExprKind::Call(_)
                | ExprKind::Index(_)
                | ExprKind::New(_)
                | ExprKind::Postfix(..)
                | ExprKind::Paren(_)
                | ExprKind::TypeOf(_)
                | ExprKind::Default(_)
        )
    }

    pub fn is_binary_or_conditional(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Binary(..) | ExprKind::Conditional(..) | ExprKind::Assign(..)
        )
    }
}
