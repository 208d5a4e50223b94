//! Recursive-descent parser for the supported language subset.
//!
//! The parser is error tolerant in the same coarse way as the lexer: a member
//! or statement that cannot be parsed is recorded as a [`ParseError`] and
//! skipped, and parsing continues with the next one.

use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::source_map::SourceMap;
use crate::text::TextRange;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {}..{}", range.start, range.end)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub unit: CompilationUnit,
    pub source_map: SourceMap,
    pub errors: Vec<ParseError>,
}

#[must_use]
pub fn parse(text: &str) -> Parse {
    let tokens = Lexer::new(text).collect();
    let mut parser = Parser::new(tokens, text.len());
    let unit = parser.parse_compilation_unit();
    tracing::trace!(
        nodes = parser.ranges.len(),
        errors = parser.errors.len(),
        "parsed compilation unit"
    );
    Parse {
        unit,
        source_map: SourceMap::new(parser.ranges),
        errors: parser.errors,
    }
}

const RESERVED: &[&str] = &[
    "abstract", "as", "base", "break", "case", "catch", "checked", "class", "const", "continue",
    "default", "delegate", "do", "else", "explicit", "extern", "false", "finally", "for",
    "foreach", "goto", "if", "implicit", "in", "interface", "internal", "is", "lock",
    "namespace", "new", "null", "operator", "out", "override", "params", "private", "protected",
    "public", "readonly", "ref", "return", "sealed", "static", "struct", "switch", "this",
    "throw", "true", "try", "typeof", "using", "virtual", "volatile", "while",
];

fn is_reserved(text: &str) -> bool {
    RESERVED.contains(&text)
}

struct Checkpoint {
    pos: usize,
    ranges: usize,
    errors: usize,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ranges: Vec<TextRange>,
    errors: Vec<ParseError>,
    text_len: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, text_len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            ranges: Vec::new(),
            errors: Vec::new(),
            text_len,
        }
    }

    // ---- token helpers -------------------------------------------------

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn nth_kind(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_n(n).is_some_and(|token| token.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    fn at_plain_ident(&self) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && !is_reserved(&token.text))
    }

    fn bump(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let tok = self.tokens[self.pos].clone();
        self.pos += 1;
        Some(tok)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at_kind(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {what}"));
        false
    }

    fn current_start(&self) -> usize {
        self.peek().map_or(self.text_len, |tok| tok.range.start)
    }

    fn leading_start(&self) -> usize {
        self.peek().map_or(self.text_len, |tok| tok.leading_start)
    }

    fn prev_end(&self) -> usize {
        if self.pos == 0 {
            return 0;
        }
        self.tokens
            .get(self.pos - 1)
            .map_or(self.text_len, |tok| tok.range.end)
    }

    fn take_trivia(&self) -> Trivia {
        Trivia {
            comments: self
                .peek()
                .map(|tok| tok.comments.clone())
                .unwrap_or_default(),
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .peek()
            .map_or(TextRange::empty(self.text_len), |tok| tok.range);
        self.errors.push(ParseError {
            message: message.into(),
            range,
        });
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            ranges: self.ranges.len(),
            errors: self.errors.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.ranges.truncate(checkpoint.ranges);
        self.errors.truncate(checkpoint.errors);
    }

    // ---- node ids ------------------------------------------------------

    fn alloc(&mut self, start: usize) -> NodeId {
        let id = NodeId(self.ranges.len() as u32);
        self.ranges.push(TextRange::empty(start));
        id
    }

    fn finish(&mut self, id: NodeId, start: usize) {
        let end = self.prev_end().max(start);
        self.ranges[id.index()] = TextRange::new(start, end);
    }

    fn range_start(&self, id: NodeId) -> usize {
        self.ranges[id.index()].start
    }

    fn ident(&mut self) -> Ident {
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident => {
                let tok = tok.clone();
                self.pos += 1;
                let id = self.alloc(tok.range.start);
                self.ranges[id.index()] = tok.range;
                Ident { id, text: tok.text }
            }
            _ => {
                self.error("expected identifier");
                let start = self.current_start();
                let id = self.alloc(start);
                Ident {
                    id,
                    text: String::new(),
                }
            }
        }
    }

    fn qualified_name(&mut self) -> String {
        let mut name = self.ident().text;
        while self.at_kind(TokenKind::Dot) && self.nth_kind(1, TokenKind::Ident) {
            self.bump();
            name.push('.');
            name.push_str(&self.ident().text);
        }
        name
    }

    // ---- compilation unit ---------------------------------------------

    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let id = self.alloc(0);
        let usings = self.parse_usings();
        let items = self.parse_items(false);
        self.ranges[id.index()] = TextRange::new(0, self.text_len);
        CompilationUnit { id, usings, items }
    }

    fn parse_usings(&mut self) -> Vec<UsingDirective> {
        let mut usings = Vec::new();
        while self.at_keyword("using") {
            let start = self.current_start();
            let id = self.alloc(start);
            self.bump();
            let name = self.qualified_name();
            self.expect(TokenKind::Semi, "`;`");
            self.finish(id, start);
            usings.push(UsingDirective { id, name });
        }
        usings
    }

    fn parse_items(&mut self, nested: bool) -> Vec<Item> {
        let mut items = Vec::new();
        loop {
            if self.is_eof() || (nested && self.at_kind(TokenKind::RBrace)) {
                break;
            }
            let before = self.pos;
            if self.at_keyword("namespace") {
                items.push(Item::Namespace(self.parse_namespace()));
                continue;
            }
            let start = self.leading_start();
            let trivia = self.take_trivia();
            let id = self.alloc(start);
            let modifiers = self.parse_modifiers();
            if let Some(kind) = self.at_type_keyword() {
                let decl = self.parse_type_decl(id, start, trivia, modifiers, kind);
                items.push(Item::Type(decl));
            } else {
                self.ranges.truncate(id.index());
                self.error("expected type declaration");
                if self.pos == before {
                    self.bump();
                }
            }
        }
        items
    }

    fn parse_namespace(&mut self) -> NamespaceDecl {
        let start = self.current_start();
        let id = self.alloc(start);
        self.bump();
        let name = self.qualified_name();
        self.expect(TokenKind::LBrace, "`{`");
        let usings = self.parse_usings();
        let items = self.parse_items(true);
        self.expect(TokenKind::RBrace, "`}`");
        self.finish(id, start);
        NamespaceDecl {
            id,
            name,
            usings,
            items,
        }
    }

    fn at_type_keyword(&self) -> Option<TypeKind> {
        if self.at_keyword("class") {
            Some(TypeKind::Class)
        } else if self.at_keyword("struct") {
            Some(TypeKind::Struct)
        } else if self.at_keyword("interface") {
            Some(TypeKind::Interface)
        } else {
            None
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut out = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.kind != TokenKind::Ident {
                break;
            }
            let Some(modifier) = Modifier::from_keyword(&tok.text) else {
                break;
            };
            self.bump();
            out.push(modifier);
        }
        Modifiers::new(out)
    }

    fn parse_type_decl(
        &mut self,
        id: NodeId,
        start: usize,
        trivia: Trivia,
        modifiers: Modifiers,
        kind: TypeKind,
    ) -> TypeDecl {
        self.bump();
        let name = self.ident();
        let type_params = self.parse_type_params();
        let mut bases = Vec::new();
        if self.eat(TokenKind::Colon) {
            loop {
                bases.push(self.parse_type());
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let constraints = self.parse_constraints();
        self.expect(TokenKind::LBrace, "`{`");
        let mut members = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            if let Some(member) = self.parse_member(&name.text) {
                members.push(member);
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
        self.eat(TokenKind::Semi);
        self.finish(id, start);
        TypeDecl {
            id,
            trivia,
            modifiers,
            kind,
            name,
            type_params,
            bases,
            constraints,
            members,
        }
    }

    fn parse_type_params(&mut self) -> Vec<TypeParam> {
        let mut params = Vec::new();
        if !self.eat(TokenKind::Lt) {
            return params;
        }
        loop {
            let start = self.current_start();
            let id = self.alloc(start);
            let name = self.ident();
            self.finish(id, start);
            params.push(TypeParam { id, name });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>`");
        params
    }

    fn parse_constraints(&mut self) -> Vec<Constraint> {
        let mut constraints = Vec::new();
        while self.at_keyword("where") {
            let start = self.current_start();
            let id = self.alloc(start);
            self.bump();
            let param = self.ident();
            self.expect(TokenKind::Colon, "`:`");
            let mut bounds = Vec::new();
            loop {
                if self.eat_keyword("class") {
                    bounds.push(ConstraintBound::Class);
                } else if self.eat_keyword("struct") {
                    bounds.push(ConstraintBound::Struct);
                } else if self.at_keyword("new") && self.nth_kind(1, TokenKind::LParen) {
                    self.bump();
                    self.bump();
                    self.expect(TokenKind::RParen, "`)`");
                    bounds.push(ConstraintBound::New);
                } else {
                    bounds.push(ConstraintBound::Type(self.parse_type()));
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.finish(id, start);
            constraints.push(Constraint { id, param, bounds });
        }
        constraints
    }

    // ---- members -------------------------------------------------------

    fn recover_member(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_member(&mut self, type_name: &str) -> Option<Member> {
        let start = self.leading_start();
        let trivia = self.take_trivia();
        let checkpoint = self.checkpoint();
        let id = self.alloc(start);
        let modifiers = self.parse_modifiers();

        if let Some(kind) = self.at_type_keyword() {
            let decl = self.parse_type_decl(id, start, trivia, modifiers, kind);
            return Some(Member::Type(decl));
        }

        if self.eat_keyword("delegate") {
            let return_type = self.parse_type();
            let name = self.ident();
            let type_params = self.parse_type_params();
            let params = self.parse_params();
            self.expect(TokenKind::Semi, "`;`");
            self.finish(id, start);
            return Some(Member::Delegate(DelegateDecl {
                id,
                trivia,
                modifiers,
                return_type,
                name,
                type_params,
                params,
            }));
        }

        if self.at_keyword("implicit") || self.at_keyword("explicit") {
            let implicit = self.at_keyword("implicit");
            self.bump();
            if !self.eat_keyword("operator") {
                self.error("expected `operator`");
            }
            let target = self.parse_type();
            let params = self.parse_params();
            let body = self.parse_body();
            self.finish(id, start);
            return Some(Member::Conversion(ConversionDecl {
                id,
                trivia,
                modifiers,
                implicit,
                target,
                params,
                body,
            }));
        }

        if self.at_keyword(type_name) && self.nth_kind(1, TokenKind::LParen) {
            let name = self.ident();
            let params = self.parse_params();
            let initializer = self.parse_ctor_initializer();
            let body = self.parse_body();
            self.finish(id, start);
            return Some(Member::Constructor(ConstructorDecl {
                id,
                trivia,
                modifiers,
                name,
                params,
                initializer,
                body,
            }));
        }

        if !self.at_kind(TokenKind::Ident) {
            self.rewind(checkpoint);
            self.error("expected member declaration");
            self.recover_member();
            return None;
        }

        let ty = self.parse_type();

        if self.eat_keyword("operator") {
            let op = match self.bump() {
                Some(tok) => tok.text,
                None => String::new(),
            };
            let params = self.parse_params();
            let body = self.parse_body();
            self.finish(id, start);
            return Some(Member::Operator(OperatorDecl {
                id,
                trivia,
                modifiers,
                return_type: ty,
                op,
                params,
                body,
            }));
        }

        if self.at_keyword("this") {
            self.rewind(checkpoint);
            self.error("indexers are not supported");
            self.recover_member();
            return None;
        }

        let (explicit_interface, name) = self.parse_member_name();

        if self.at_kind(TokenKind::LParen) || self.at_kind(TokenKind::Lt) {
            let type_params = self.parse_type_params();
            let params = self.parse_params();
            let constraints = self.parse_constraints();
            let body = self.parse_body();
            self.finish(id, start);
            return Some(Member::Method(MethodDecl {
                id,
                trivia,
                modifiers,
                return_type: ty,
                explicit_interface,
                name,
                type_params,
                params,
                constraints,
                body,
            }));
        }

        if self.at_kind(TokenKind::LBrace) {
            let accessors = self.parse_accessors();
            self.finish(id, start);
            return Some(Member::Property(PropertyDecl {
                id,
                trivia,
                modifiers,
                ty,
                explicit_interface,
                name,
                accessors,
            }));
        }

        let mut declarators = Vec::new();
        let mut first = Some(name);
        loop {
            let decl_start = first
                .as_ref()
                .map_or_else(|| self.current_start(), |name| self.range_start(name.id));
            let name = match first.take() {
                Some(name) => name,
                None => self.ident(),
            };
            declarators.push(self.parse_declarator_rest(name, decl_start));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semi, "`;`");
        self.finish(id, start);
        Some(Member::Field(FieldDecl {
            id,
            trivia,
            modifiers,
            ty,
            declarators,
        }))
    }

    /// Parses `Name` or `IFoo.Name` (explicit interface implementation).
    fn parse_member_name(&mut self) -> (Option<TypeRef>, Ident) {
        let start = self.current_start();
        let mut segments = vec![self.ident()];
        while self.at_kind(TokenKind::Dot) && self.nth_kind(1, TokenKind::Ident) {
            self.bump();
            segments.push(self.ident());
        }
        let name = segments.pop().unwrap_or(Ident {
            id: NodeId(0),
            text: String::new(),
        });
        if segments.is_empty() {
            return (None, name);
        }
        let id = self.alloc(start);
        let end = segments
            .last()
            .map_or(start, |seg| self.ranges[seg.id.index()].end);
        self.ranges[id.index()] = TextRange::new(start, end);
        let segments = segments
            .into_iter()
            .map(|name| TypeSegment {
                name,
                args: Vec::new(),
            })
            .collect();
        (
            Some(TypeRef {
                id,
                kind: TypeRefKind::Named(segments),
            }),
            name,
        )
    }

    fn parse_ctor_initializer(&mut self) -> Option<CtorInitializer> {
        if !self.at_kind(TokenKind::Colon) {
            return None;
        }
        self.bump();
        let start = self.current_start();
        let id = self.alloc(start);
        let kind = if self.eat_keyword("base") {
            CtorInitializerKind::Base
        } else if self.eat_keyword("this") {
            CtorInitializerKind::This
        } else {
            self.error("expected `base` or `this`");
            CtorInitializerKind::Base
        };
        let args = self.parse_args(TokenKind::LParen, TokenKind::RParen);
        self.finish(id, start);
        Some(CtorInitializer { id, kind, args })
    }

    fn parse_body(&mut self) -> Option<Block> {
        if self.eat(TokenKind::Semi) {
            return None;
        }
        if self.at_kind(TokenKind::LBrace) {
            return Some(self.parse_block());
        }
        self.error("expected method body");
        None
    }

    fn parse_accessors(&mut self) -> Vec<Accessor> {
        let mut accessors = Vec::new();
        self.expect(TokenKind::LBrace, "`{`");
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let start = self.current_start();
            let id = self.alloc(start);
            let modifiers = self.parse_modifiers();
            let kind = if self.eat_keyword("get") {
                AccessorKind::Get
            } else if self.eat_keyword("set") {
                AccessorKind::Set
            } else {
                self.ranges.truncate(id.index());
                self.error("expected `get` or `set`");
                self.bump();
                continue;
            };
            let body = self.parse_body();
            self.finish(id, start);
            accessors.push(Accessor {
                id,
                modifiers,
                kind,
                body,
            });
        }
        self.expect(TokenKind::RBrace, "`}`");
        accessors
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if !self.expect(TokenKind::LParen, "`(`") {
            return params;
        }
        if self.eat(TokenKind::RParen) {
            return params;
        }
        loop {
            params.push(self.parse_param());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`");
        params
    }

    fn parse_param(&mut self) -> Param {
        let start = self.current_start();
        let id = self.alloc(start);
        let modifier = if self.eat_keyword("ref") {
            Some(ParamModifier::Ref)
        } else if self.eat_keyword("out") {
            Some(ParamModifier::Out)
        } else if self.eat_keyword("params") {
            Some(ParamModifier::Params)
        } else if self.eat_keyword("this") {
            Some(ParamModifier::This)
        } else {
            None
        };
        let ty = self.parse_type();
        let name = self.ident();
        let default = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.finish(id, start);
        Param {
            id,
            modifier,
            ty,
            name,
            default,
        }
    }

    fn parse_declarator_rest(&mut self, name: Ident, start: usize) -> Declarator {
        // Declarator ids are allocated after the name so that the name token is
        // addressable on its own; the range still covers the name.
        let id = self.alloc(start);
        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr())
        } else {
            None
        };
        self.finish(id, start);
        Declarator { id, name, init }
    }

    // ---- types ---------------------------------------------------------

    fn parse_type(&mut self) -> TypeRef {
        let checkpoint = self.checkpoint();
        match self.try_parse_type() {
            Some(ty) => ty,
            None => {
                self.rewind(checkpoint);
                self.error("expected type");
                let start = self.current_start();
                let id = self.alloc(start);
                let name = Ident {
                    id: self.alloc(start),
                    text: String::new(),
                };
                TypeRef {
                    id,
                    kind: TypeRefKind::Named(vec![TypeSegment {
                        name,
                        args: Vec::new(),
                    }]),
                }
            }
        }
    }

    fn try_parse_type(&mut self) -> Option<TypeRef> {
        let tok = self.peek()?;
        if tok.kind != TokenKind::Ident {
            return None;
        }
        let start = tok.range.start;
        let mut ty = if let Some(predefined) = PredefinedType::from_keyword(&tok.text) {
            let id = self.alloc(start);
            self.bump();
            self.finish(id, start);
            TypeRef {
                id,
                kind: TypeRefKind::Predefined(predefined),
            }
        } else {
            if is_reserved(&tok.text) {
                return None;
            }
            let id = self.alloc(start);
            let mut segments = Vec::new();
            loop {
                let name = self.ident();
                let args = if self.at_kind(TokenKind::Lt) {
                    self.try_parse_type_args()?
                } else {
                    Vec::new()
                };
                segments.push(TypeSegment { name, args });
                if self.at_kind(TokenKind::Dot)
                    && self
                        .peek_n(1)
                        .is_some_and(|t| t.kind == TokenKind::Ident && !is_reserved(&t.text))
                {
                    self.bump();
                    continue;
                }
                break;
            }
            self.finish(id, start);
            TypeRef {
                id,
                kind: TypeRefKind::Named(segments),
            }
        };
        while self.at_kind(TokenKind::LBracket) && self.nth_kind(1, TokenKind::RBracket) {
            self.bump();
            self.bump();
            let id = self.alloc(start);
            self.finish(id, start);
            ty = TypeRef {
                id,
                kind: TypeRefKind::Array(Box::new(ty)),
            };
        }
        Some(ty)
    }

    /// Parses `<T, U>`; returns `None` (without consuming a sensible amount of
    /// input) when the tokens do not form a type argument list.
    fn try_parse_type_args(&mut self) -> Option<Vec<TypeRef>> {
        if !self.eat(TokenKind::Lt) {
            return None;
        }
        let mut args = Vec::new();
        loop {
            args.push(self.try_parse_type()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        if !self.eat(TokenKind::Gt) {
            return None;
        }
        Some(args)
    }

    /// Speculatively parses generic arguments after a name in expression
    /// position (`Foo<T>(x)` vs. `a < b`).
    fn speculate_expr_type_args(&mut self) -> Vec<TypeRef> {
        if !self.at_kind(TokenKind::Lt) {
            return Vec::new();
        }
        let checkpoint = self.checkpoint();
        if let Some(args) = self.try_parse_type_args() {
            let follows = self.peek().map(|t| t.kind);
            if matches!(
                follows,
                None | Some(
                    TokenKind::LParen
                        | TokenKind::RParen
                        | TokenKind::Dot
                        | TokenKind::Semi
                        | TokenKind::Comma
                        | TokenKind::RBracket
                        | TokenKind::RBrace
                        | TokenKind::Colon
                        | TokenKind::Question
                        | TokenKind::EqEq
                        | TokenKind::BangEq
                )
            ) {
                return args;
            }
        }
        self.rewind(checkpoint);
        Vec::new()
    }

    // ---- statements ----------------------------------------------------

    fn parse_block(&mut self) -> Block {
        let start = self.current_start();
        let id = self.alloc(start);
        let stmts = self.parse_block_contents();
        self.finish(id, start);
        Block { id, stmts }
    }

    fn parse_block_contents(&mut self) -> Vec<Stmt> {
        self.expect(TokenKind::LBrace, "`{`");
        let mut stmts = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            stmts.push(self.parse_stmt());
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
        stmts
    }

    fn parse_embedded_stmt(&mut self) -> Box<Stmt> {
        Box::new(self.parse_stmt())
    }

    fn parse_stmt(&mut self) -> Stmt {
        let start = self.leading_start();
        let trivia = self.take_trivia();
        let id = self.alloc(start);
        let kind = self.parse_stmt_kind(id);
        self.finish(id, start);
        Stmt { id, trivia, kind }
    }

    fn parse_stmt_kind(&mut self, id: NodeId) -> StmtKind {
        if self.at_kind(TokenKind::LBrace) {
            let stmts = self.parse_block_contents();
            return StmtKind::Block(Block { id, stmts });
        }
        if self.eat(TokenKind::Semi) {
            return StmtKind::Empty;
        }
        if self.eat_keyword("if") {
            self.expect(TokenKind::LParen, "`(`");
            let cond = self.parse_expr();
            self.expect(TokenKind::RParen, "`)`");
            let then_branch = self.parse_embedded_stmt();
            let else_branch = if self.eat_keyword("else") {
                Some(self.parse_embedded_stmt())
            } else {
                None
            };
            return StmtKind::If(IfStmt {
                cond,
                then_branch,
                else_branch,
            });
        }
        if self.eat_keyword("while") {
            self.expect(TokenKind::LParen, "`(`");
            let cond = self.parse_expr();
            self.expect(TokenKind::RParen, "`)`");
            let body = self.parse_embedded_stmt();
            return StmtKind::While(WhileStmt { cond, body });
        }
        if self.eat_keyword("do") {
            let body = self.parse_embedded_stmt();
            if !self.eat_keyword("while") {
                self.error("expected `while`");
            }
            self.expect(TokenKind::LParen, "`(`");
            let cond = self.parse_expr();
            self.expect(TokenKind::RParen, "`)`");
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Do(DoStmt { body, cond });
        }
        if self.eat_keyword("for") {
            self.expect(TokenKind::LParen, "`(`");
            let init = if self.at_kind(TokenKind::Semi) {
                ForInit::Exprs(Vec::new())
            } else if let Some(decl) = self.try_parse_local_decl() {
                ForInit::Decl(decl)
            } else {
                ForInit::Exprs(self.parse_expr_list(TokenKind::Semi))
            };
            self.expect(TokenKind::Semi, "`;`");
            let cond = if self.at_kind(TokenKind::Semi) {
                None
            } else {
                Some(self.parse_expr())
            };
            self.expect(TokenKind::Semi, "`;`");
            let step = self.parse_expr_list(TokenKind::RParen);
            self.expect(TokenKind::RParen, "`)`");
            let body = self.parse_embedded_stmt();
            return StmtKind::For(ForStmt {
                init,
                cond,
                step,
                body,
            });
        }
        if self.eat_keyword("foreach") {
            self.expect(TokenKind::LParen, "`(`");
            let ty = self.parse_type();
            let name = self.ident();
            if !self.eat_keyword("in") {
                self.error("expected `in`");
            }
            let iterable = self.parse_expr();
            self.expect(TokenKind::RParen, "`)`");
            let body = self.parse_embedded_stmt();
            return StmtKind::Foreach(ForeachStmt {
                ty,
                name,
                iterable,
                body,
            });
        }
        if self.eat_keyword("return") {
            let value = if self.at_kind(TokenKind::Semi) {
                None
            } else {
                Some(self.parse_expr())
            };
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Return(value);
        }
        if self.eat_keyword("throw") {
            let value = if self.at_kind(TokenKind::Semi) {
                None
            } else {
                Some(self.parse_expr())
            };
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Throw(value);
        }
        if self.eat_keyword("break") {
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Break;
        }
        if self.eat_keyword("continue") {
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Continue;
        }
        if let Some(decl) = self.try_parse_local_decl() {
            self.expect(TokenKind::Semi, "`;`");
            return StmtKind::Local(decl);
        }
        let expr = self.parse_expr();
        self.expect(TokenKind::Semi, "`;`");
        StmtKind::Expr(expr)
    }

    fn try_parse_local_decl(&mut self) -> Option<LocalDecl> {
        let checkpoint = self.checkpoint();
        let is_const = self.eat_keyword("const");
        let Some(ty) = self.try_parse_type() else {
            self.rewind(checkpoint);
            return None;
        };
        let looks_like_decl = self.at_plain_ident()
            && matches!(
                self.peek_n(1).map(|t| t.kind),
                Some(TokenKind::Eq | TokenKind::Semi | TokenKind::Comma)
            );
        if !looks_like_decl {
            self.rewind(checkpoint);
            return None;
        }
        let mut declarators = Vec::new();
        loop {
            let start = self.current_start();
            let name = self.ident();
            declarators.push(self.parse_declarator_rest(name, start));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Some(LocalDecl {
            is_const,
            ty,
            declarators,
        })
    }

    fn parse_expr_list(&mut self, terminator: TokenKind) -> Vec<Expr> {
        let mut exprs = Vec::new();
        if self.at_kind(terminator) {
            return exprs;
        }
        loop {
            exprs.push(self.parse_expr());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        exprs
    }

    // ---- expressions ---------------------------------------------------

    fn parse_expr(&mut self) -> Expr {
        if let Some(lambda) = self.try_parse_lambda() {
            return lambda;
        }
        let lhs = self.parse_conditional();
        let Some(op) = self.peek_assign_op() else {
            return lhs;
        };
        let start = self.range_start(lhs.id);
        let id = self.alloc(start);
        let rhs = self.parse_expr();
        self.finish(id, start);
        Expr::new(id, ExprKind::Assign(op, Box::new(lhs), Box::new(rhs)))
    }

    /// Consumes an assignment operator if one is next.
    fn peek_assign_op(&mut self) -> Option<AssignOp> {
        let tok = self.peek()?;
        let op = match tok.kind {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Rem,
            TokenKind::AmpEq => AssignOp::BitAnd,
            TokenKind::PipeEq => AssignOp::BitOr,
            TokenKind::CaretEq => AssignOp::BitXor,
            TokenKind::ShlEq => AssignOp::Shl,
            TokenKind::Gt => {
                let end = tok.range.end;
                let next = self.peek_n(1)?;
                if next.kind == TokenKind::GtEq && next.range.start == end {
                    self.pos += 2;
                    return Some(AssignOp::Shr);
                }
                return None;
            }
            _ => return None,
        };
        self.pos += 1;
        Some(op)
    }

    fn try_parse_lambda(&mut self) -> Option<Expr> {
        let start = self.current_start();
        if self.at_plain_ident() && self.nth_kind(1, TokenKind::Arrow) {
            let id = self.alloc(start);
            let param_start = self.current_start();
            let param_id = self.alloc(param_start);
            let name = self.ident();
            self.finish(param_id, param_start);
            self.bump();
            let body = self.parse_lambda_body();
            self.finish(id, start);
            return Some(Expr::new(
                id,
                ExprKind::Lambda(Lambda {
                    params: vec![LambdaParam {
                        id: param_id,
                        ty: None,
                        name,
                    }],
                    body,
                }),
            ));
        }
        if !self.at_kind(TokenKind::LParen) {
            return None;
        }
        // Find the matching `)` and check for `=>` after it.
        let mut depth = 0usize;
        let mut idx = self.pos;
        loop {
            let tok = self.tokens.get(idx)?;
            match tok.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Semi | TokenKind::LBrace | TokenKind::RBrace => return None,
                _ => {}
            }
            idx += 1;
        }
        if !self
            .tokens
            .get(idx + 1)
            .is_some_and(|tok| tok.kind == TokenKind::Arrow)
        {
            return None;
        }
        let id = self.alloc(start);
        self.bump();
        let mut params = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            let param_start = self.current_start();
            let param_id = self.alloc(param_start);
            let implicit = self.at_plain_ident()
                && matches!(
                    self.peek_n(1).map(|t| t.kind),
                    Some(TokenKind::Comma | TokenKind::RParen)
                );
            let ty = if implicit {
                None
            } else {
                Some(self.parse_type())
            };
            let name = self.ident();
            self.finish(param_id, param_start);
            params.push(LambdaParam {
                id: param_id,
                ty,
                name,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)`");
        self.expect(TokenKind::Arrow, "`=>`");
        let body = self.parse_lambda_body();
        self.finish(id, start);
        Some(Expr::new(id, ExprKind::Lambda(Lambda { params, body })))
    }

    fn parse_lambda_body(&mut self) -> LambdaBody {
        if self.at_kind(TokenKind::LBrace) {
            LambdaBody::Block(self.parse_block())
        } else {
            LambdaBody::Expr(Box::new(self.parse_expr()))
        }
    }

    fn parse_conditional(&mut self) -> Expr {
        let cond = self.parse_binary(1);
        if !self.at_kind(TokenKind::Question) {
            return cond;
        }
        self.bump();
        let start = self.range_start(cond.id);
        let id = self.alloc(start);
        let then_expr = self.parse_expr();
        self.expect(TokenKind::Colon, "`:`");
        let else_expr = self.parse_expr();
        self.finish(id, start);
        Expr::new(
            id,
            ExprKind::Conditional(Box::new(cond), Box::new(then_expr), Box::new(else_expr)),
        )
    }

    /// Returns the binary operator at the cursor and how many tokens it spans.
    fn peek_binary_op(&self) -> Option<(BinaryOp, usize)> {
        let tok = self.peek()?;
        let op = match tok.kind {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Shl => BinaryOp::Shl,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::Le,
            TokenKind::GtEq => BinaryOp::Ge,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::BangEq => BinaryOp::Ne,
            TokenKind::Amp => BinaryOp::BitAnd,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::AmpAmp => BinaryOp::And,
            TokenKind::PipePipe => BinaryOp::Or,
            TokenKind::Gt => {
                if let Some(next) = self.peek_n(1) {
                    if next.range.start == tok.range.end {
                        match next.kind {
                            TokenKind::Gt => return Some((BinaryOp::Shr, 2)),
                            // `>>=` is an assignment operator.
                            TokenKind::GtEq => return None,
                            _ => {}
                        }
                    }
                }
                BinaryOp::Gt
            }
            _ => return None,
        };
        Some((op, 1))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let Some((op, width)) = self.peek_binary_op() else {
                break;
            };
            if op.precedence() < min_prec {
                break;
            }
            self.pos += width;
            let start = self.range_start(lhs.id);
            let id = self.alloc(start);
            let rhs = self.parse_binary(op.precedence() + 1);
            self.finish(id, start);
            lhs = Expr::new(id, ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)));
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        let start = self.current_start();
        let op = match self.peek().map(|t| t.kind) {
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Plus) => Some(UnaryOp::Plus),
            Some(TokenKind::Tilde) => Some(UnaryOp::BitNot),
            Some(TokenKind::PlusPlus) => Some(UnaryOp::PreInc),
            Some(TokenKind::MinusMinus) => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            let id = self.alloc(start);
            self.bump();
            let operand = self.parse_unary();
            self.finish(id, start);
            return Expr::new(id, ExprKind::Unary(op, Box::new(operand)));
        }
        if self.at_kind(TokenKind::LParen) {
            if let Some(cast) = self.try_parse_cast() {
                return cast;
            }
        }
        let primary = self.parse_primary();
        self.parse_postfix(primary)
    }

    fn try_parse_cast(&mut self) -> Option<Expr> {
        let checkpoint = self.checkpoint();
        let start = self.current_start();
        let id = self.alloc(start);
        self.bump();
        let ty = match self.try_parse_type() {
            Some(ty) if self.at_kind(TokenKind::RParen) => ty,
            _ => {
                self.rewind(checkpoint);
                return None;
            }
        };
        self.bump();
        let predefined = matches!(ty.kind, TypeRefKind::Predefined(_) | TypeRefKind::Array(_));
        let operand_follows = self.peek().is_some_and(|tok| match tok.kind {
            TokenKind::Ident => !matches!(tok.text.as_str(), "is" | "as" | "in"),
            TokenKind::IntLiteral
            | TokenKind::RealLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral
            | TokenKind::LParen
            | TokenKind::Bang
            | TokenKind::Tilde => true,
            TokenKind::Minus | TokenKind::Plus | TokenKind::PlusPlus | TokenKind::MinusMinus => {
                predefined
            }
            _ => false,
        });
        if !operand_follows {
            self.rewind(checkpoint);
            return None;
        }
        let operand = self.parse_unary();
        self.finish(id, start);
        Some(Expr::new(id, ExprKind::Cast(ty, Box::new(operand))))
    }

    fn parse_primary(&mut self) -> Expr {
        let start = self.current_start();
        let Some(tok) = self.peek().cloned() else {
            self.error("expected expression");
            let id = self.alloc(start);
            return missing_expr(id);
        };
        match tok.kind {
            TokenKind::IntLiteral | TokenKind::RealLiteral => {
                let id = self.alloc(start);
                self.bump();
                self.finish(id, start);
                Expr::new(
                    id,
                    ExprKind::Literal(Literal {
                        kind: numeric_literal_kind(&tok.text, tok.kind),
                        text: tok.text,
                    }),
                )
            }
            TokenKind::StringLiteral | TokenKind::CharLiteral => {
                let id = self.alloc(start);
                self.bump();
                self.finish(id, start);
                let kind = if tok.kind == TokenKind::StringLiteral {
                    LiteralKind::String
                } else {
                    LiteralKind::Char
                };
                Expr::new(id, ExprKind::Literal(Literal { kind, text: tok.text }))
            }
            TokenKind::LParen => {
                let id = self.alloc(start);
                self.bump();
                let inner = self.parse_expr();
                self.expect(TokenKind::RParen, "`)`");
                self.finish(id, start);
                Expr::new(id, ExprKind::Paren(Box::new(inner)))
            }
            TokenKind::Ident => self.parse_ident_primary(tok, start),
            _ => {
                self.error("expected expression");
                let id = self.alloc(start);
                self.bump();
                self.finish(id, start);
                missing_expr(id)
            }
        }
    }

    fn parse_ident_primary(&mut self, tok: Token, start: usize) -> Expr {
        let literal = match tok.text.as_str() {
            "true" => Some(LiteralKind::True),
            "false" => Some(LiteralKind::False),
            "null" => Some(LiteralKind::Null),
            _ => None,
        };
        if let Some(kind) = literal {
            let id = self.alloc(start);
            self.bump();
            self.finish(id, start);
            return Expr::new(id, ExprKind::Literal(Literal { kind, text: tok.text }));
        }
        match tok.text.as_str() {
            "this" | "base" => {
                let id = self.alloc(start);
                self.bump();
                self.finish(id, start);
                let kind = if tok.text == "this" {
                    ExprKind::This
                } else {
                    ExprKind::Base
                };
                Expr::new(id, kind)
            }
            "new" => self.parse_new(start),
            "typeof" | "default" if self.nth_kind(1, TokenKind::LParen) => {
                let id = self.alloc(start);
                self.bump();
                self.bump();
                let ty = self.parse_type();
                self.expect(TokenKind::RParen, "`)`");
                self.finish(id, start);
                let kind = if tok.text == "typeof" {
                    ExprKind::TypeOf(ty)
                } else {
                    ExprKind::Default(ty)
                };
                Expr::new(id, kind)
            }
            "delegate" => {
                let id = self.alloc(start);
                self.bump();
                let params = if self.at_kind(TokenKind::LParen) {
                    self.parse_params()
                } else {
                    Vec::new()
                };
                let body = self.parse_block();
                self.finish(id, start);
                Expr::new(id, ExprKind::AnonymousMethod(AnonymousMethod { params, body }))
            }
            _ => {
                let id = self.alloc(start);
                let ident = self.ident();
                let type_args = self.speculate_expr_type_args();
                self.finish(id, start);
                Expr::new(id, ExprKind::Name(NameRef { ident, type_args }))
            }
        }
    }

    fn parse_new(&mut self, start: usize) -> Expr {
        let id = self.alloc(start);
        self.bump();
        let ty = self.parse_type();
        if self.at_kind(TokenKind::LBracket) {
            self.bump();
            let sizes = self.parse_expr_list(TokenKind::RBracket);
            self.expect(TokenKind::RBracket, "`]`");
            self.finish(id, start);
            return Expr::new(
                id,
                ExprKind::NewArray(ArrayCreation { element: ty, sizes }),
            );
        }
        let args = if self.at_kind(TokenKind::LParen) {
            self.parse_args(TokenKind::LParen, TokenKind::RParen)
        } else {
            self.error("expected `(`");
            Vec::new()
        };
        self.finish(id, start);
        Expr::new(id, ExprKind::New(ObjectCreation { ty, args }))
    }

    fn parse_postfix(&mut self, mut expr: Expr) -> Expr {
        loop {
            let start = self.range_start(expr.id);
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Dot) => {
                    self.bump();
                    let id = self.alloc(start);
                    let name = self.ident();
                    let type_args = self.speculate_expr_type_args();
                    self.finish(id, start);
                    expr = Expr::new(
                        id,
                        ExprKind::Member(MemberAccess {
                            receiver: Box::new(expr),
                            name,
                            type_args,
                        }),
                    );
                }
                Some(TokenKind::LParen) => {
                    let id = self.alloc(start);
                    let args = self.parse_args(TokenKind::LParen, TokenKind::RParen);
                    self.finish(id, start);
                    expr = Expr::new(
                        id,
                        ExprKind::Call(Invocation {
                            callee: Box::new(expr),
                            args,
                        }),
                    );
                }
                Some(TokenKind::LBracket) => {
                    let id = self.alloc(start);
                    let args = self.parse_args(TokenKind::LBracket, TokenKind::RBracket);
                    self.finish(id, start);
                    expr = Expr::new(
                        id,
                        ExprKind::Index(ElementAccess {
                            receiver: Box::new(expr),
                            args,
                        }),
                    );
                }
                Some(TokenKind::PlusPlus) | Some(TokenKind::MinusMinus) => {
                    let op = if self.at_kind(TokenKind::PlusPlus) {
                        PostfixOp::Inc
                    } else {
                        PostfixOp::Dec
                    };
                    self.bump();
                    let id = self.alloc(start);
                    self.finish(id, start);
                    expr = Expr::new(id, ExprKind::Postfix(op, Box::new(expr)));
                }
                _ => return expr,
            }
        }
    }

    fn parse_args(&mut self, open: TokenKind, close: TokenKind) -> Vec<Arg> {
        let mut args = Vec::new();
        if !self.expect(open, "argument list") {
            return args;
        }
        if self.eat(close) {
            return args;
        }
        loop {
            let start = self.current_start();
            let id = self.alloc(start);
            let name = if self.at_plain_ident() && self.nth_kind(1, TokenKind::Colon) {
                let name = self.ident();
                self.bump();
                Some(name)
            } else {
                None
            };
            let modifier = if self.eat_keyword("ref") {
                Some(ArgModifier::Ref)
            } else if self.eat_keyword("out") {
                Some(ArgModifier::Out)
            } else {
                None
            };
            let value = self.parse_expr();
            self.finish(id, start);
            args.push(Arg {
                id,
                name,
                modifier,
                value,
            });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(close, "closing delimiter");
        args
    }
}

fn missing_expr(id: NodeId) -> Expr {
    Expr::new(
        id,
        ExprKind::Name(NameRef {
            ident: Ident {
                id,
                text: String::new(),
            },
            type_args: Vec::new(),
        }),
    )
}

fn numeric_literal_kind(text: &str, kind: TokenKind) -> LiteralKind {
    let lower = text.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    if !is_hex && lower.ends_with('f') {
        LiteralKind::Float
    } else if !is_hex && lower.ends_with('m') {
        LiteralKind::Decimal
    } else if !is_hex && (lower.ends_with('d') || kind == TokenKind::RealLiteral) {
        LiteralKind::Double
    } else if lower.ends_with('l') {
        LiteralKind::Long
    } else {
        LiteralKind::Int
    }
}
