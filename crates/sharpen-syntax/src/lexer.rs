use crate::text::TextRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) text: String,
    pub(crate) range: TextRange,
    /// Line comments (without `//`) between the previous token and this one.
    pub(crate) comments: Vec<String>,
    /// Start of the first leading comment, or the token start.
    pub(crate) leading_start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    IntLiteral,
    RealLiteral,
    StringLiteral,
    CharLiteral,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Colon,
    Question,
    Arrow,
    Eq,
    EqEq,
    Bang,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    Tilde,
    ShlEq,
    Unknown,
}

pub(crate) struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Lexer { text, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.bump_char();
            true
        } else {
            false
        }
    }

    /// Skips whitespace and comments, returning the line comments seen and the
    /// offset of the first one.
    fn skip_trivia(&mut self) -> (Vec<String>, Option<usize>) {
        let mut comments = Vec::new();
        let mut first = None;
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.bump_char();
            }

            let rem = self.remaining();
            if rem.starts_with("//") {
                let start = self.pos;
                first.get_or_insert(start);
                while let Some(c) = self.peek_char() {
                    if c == '\n' {
                        break;
                    }
                    self.bump_char();
                }
                let body = self.text[start + 2..self.pos].trim_end_matches('\r');
                comments.push(body.to_string());
                continue;
            }

            if rem.starts_with("/*") {
                self.bump_char();
                self.bump_char();
                while !self.remaining().is_empty() && !self.remaining().starts_with("*/") {
                    self.bump_char();
                }
                if self.remaining().starts_with("*/") {
                    self.bump_char();
                    self.bump_char();
                }
                continue;
            }

            break;
        }
        (comments, first)
    }

    fn lex_identifier(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' {
                self.bump_char();
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let mut kind = TokenKind::IntLiteral;
        if first == '0' && matches!(self.peek_char(), Some('x' | 'X')) {
            self.bump_char();
            while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit() || c == '_') {
                self.bump_char();
            }
        } else {
            while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump_char();
            }
            let rem = self.remaining();
            let mut chars = rem.chars();
            if chars.next() == Some('.') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
                kind = TokenKind::RealLiteral;
                self.bump_char();
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit() || c == '_') {
                    self.bump_char();
                }
            }
            if matches!(self.peek_char(), Some('e' | 'E')) {
                kind = TokenKind::RealLiteral;
                self.bump_char();
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.bump_char();
                }
                while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
                    self.bump_char();
                }
            }
        }
        while let Some(c) = self.peek_char() {
            match c {
                'f' | 'F' | 'd' | 'D' | 'm' | 'M' => {
                    kind = TokenKind::RealLiteral;
                    self.bump_char();
                }
                'l' | 'L' | 'u' | 'U' => {
                    self.bump_char();
                }
                _ => break,
            }
        }
        kind
    }

    fn lex_quoted(&mut self, quote: char) {
        // opening quote already consumed
        while let Some(c) = self.bump_char() {
            match c {
                '\\' => {
                    self.bump_char();
                }
                '\n' => break,
                c if c == quote => break,
                _ => {}
            }
        }
    }

    fn lex_verbatim_string(&mut self) {
        // `@"` already consumed; `""` is an escaped quote.
        while let Some(c) = self.bump_char() {
            if c == '"' {
                if self.peek_char() == Some('"') {
                    self.bump_char();
                    continue;
                }
                break;
            }
        }
    }

    pub(crate) fn next_token(&mut self) -> Option<Token> {
        let (comments, first_comment) = self.skip_trivia();
        if self.remaining().is_empty() {
            return None;
        }

        let start = self.pos;
        let ch = self.bump_char()?;

        let kind = match ch {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,
            '.' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number('.');
                TokenKind::RealLiteral
            }
            '.' => TokenKind::Dot,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Eq
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else if self.eat('<') {
                    if self.eat('=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else {
                    TokenKind::Lt
                }
            }
            // `>>` and `>>=` are assembled by the parser so nested generic
            // argument lists stay unambiguous.
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEq
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpAmp
                } else if self.eat('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::PipePipe
                } else if self.eat('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }
            '"' => {
                self.lex_quoted('"');
                TokenKind::StringLiteral
            }
            '\'' => {
                self.lex_quoted('\'');
                TokenKind::CharLiteral
            }
            '@' if self.peek_char() == Some('"') => {
                self.bump_char();
                self.lex_verbatim_string();
                TokenKind::StringLiteral
            }
            '@' if self.peek_char().is_some_and(|c| c.is_alphabetic() || c == '_') => {
                self.lex_identifier();
                TokenKind::Ident
            }
            c if c.is_ascii_digit() => self.lex_number(c),
            c if c.is_alphabetic() || c == '_' => {
                self.lex_identifier();
                TokenKind::Ident
            }
            _ => TokenKind::Unknown,
        };

        let range = TextRange::new(start, self.pos);
        Some(Token {
            kind,
            text: self.text[start..self.pos].to_string(),
            range,
            comments,
            leading_start: first_comment.unwrap_or(start),
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        Lexer::new(text).map(|tok| tok.kind).collect()
    }

    #[test]
    fn lexes_compound_operators() {
        assert_eq!(
            kinds("a += b && c >= 1.5f"),
            vec![
                TokenKind::Ident,
                TokenKind::PlusEq,
                TokenKind::Ident,
                TokenKind::AmpAmp,
                TokenKind::Ident,
                TokenKind::GtEq,
                TokenKind::RealLiteral,
            ]
        );
    }

    #[test]
    fn keeps_line_comments_as_leading_trivia() {
        let tokens: Vec<_> = Lexer::new("  // first\n  // second\n  x").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].comments, vec![" first", " second"]);
        assert_eq!(tokens[0].leading_start, 2);
    }
}
