// ----------------------------
// File: src/front/parser/mod.rs
// ----------------------------
//! Parser for the C89 expression grammar plus simple object declarations.

mod stream;
mod expr;
mod tyname;

pub use stream::TokenStream;

use std::fmt;

use crate::front::ast::Expr;
use crate::front::lexer::Lexer;
use crate::front::semantics::types::Type;
use crate::front::token::{LexError, Span, TokenKind as K};

#[derive(Debug, Clone)]
pub struct ParseError {
    pub msg: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(span: Span, msg: impl Into<String>) -> Self {
        Self { msg: msg.into(), span }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        Self { msg: e.msg, span: e.span }
    }
}

pub type PResult<T> = Result<T, ParseError>;

/// One top-level item of the driver grammar: `type ident;` or `expr;`.
#[derive(Debug, Clone)]
pub enum Item {
    Decl(Decl),
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct Decl { pub name: String, pub ty: Type, pub span: Span }

pub struct Parser<'a> {
    pub ts: TokenStream<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, file: &str) -> Self {
        Self { ts: TokenStream::new(Lexer::new(src, file)) }
    }

    #[inline]
    fn error<T>(&self, span: Span, msg: impl Into<String>) -> PResult<T> {
        Err(ParseError::new(span, msg))
    }

    pub fn parse_program(&mut self) -> PResult<Vec<Item>> {
        let mut items = Vec::new();
        loop {
            while self.ts.matches(K::Semicolon)? {}
            if self.ts.check(K::Eof)? { break; }
            items.push(self.parse_item()?);
        }
        Ok(items)
    }

    /// One item, consuming the trailing ';'.
    pub fn parse_item(&mut self) -> PResult<Item> {
        let item = if self.is_type_start()? {
            Item::Decl(self.parse_decl()?)
        } else {
            Item::Expr(self.parse_expr()?)
        };
        let _ = self.ts.expect_kind(K::Semicolon)?;
        Ok(item)
    }

    /// Skip to just past the next ';' (statement-boundary recovery).
    pub fn recover_to_semicolon(&mut self) {
        loop {
            match self.ts.peek(0) {
                Ok(t) if t.kind == K::Eof => break,
                Ok(t) if t.kind == K::Semicolon => { let _ = self.ts.bump(); break; }
                Ok(_) => { let _ = self.ts.bump(); }
                Err(_) => break,
            }
        }
    }
}
