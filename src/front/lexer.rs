// ----------------------------
// File: src/front/lexer.rs
// ----------------------------
//! Lexer: a logos token table wrapped with spans, line/col tracking and a
//! synthesized EOF token.

use logos::Logos;

use super::token::{LexError, Span, Token, TokenKind as K};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\n\r]+")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
enum RawTok {
    #[token("void")] Void,
    #[token("char")] Char,
    #[token("short")] Short,
    #[token("int")] Int,
    #[token("long")] Long,
    #[token("signed")] Signed,
    #[token("unsigned")] Unsigned,
    #[token("float")] Float,
    #[token("double")] Double,
    #[token("const")] Const,
    #[token("volatile")] Volatile,
    #[token("sizeof")] Sizeof,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    #[regex(r"0[xX][0-9a-fA-F]+[uUlL]*")]
    #[regex(r"0[0-7]*[uUlL]*")]
    #[regex(r"[1-9][0-9]*[uUlL]*")]
    IntLit,
    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+\.([eE][+-]?[0-9]+)?[fFlL]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFlL]?")]
    FloatLit,
    #[regex(r"'([^'\\\n]|\\.)+'")]
    CharLit,

    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("==")] Eq,
    #[token("!=")] Ne,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("<")] Lt,
    #[token(">")] Gt,
    #[token("&&")] And,
    #[token("||")] Or,
    #[token("!")] Not,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("=")] Assign,

    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBracket,
    #[token("]")] RBracket,
    #[token(";")] Semicolon,
    #[token(",")] Comma,
    #[token(":")] Colon,
    #[token("?")] Question,
}

fn kind_of(raw: RawTok) -> K {
    match raw {
        RawTok::Void => K::Void,
        RawTok::Char => K::Char,
        RawTok::Short => K::Short,
        RawTok::Int => K::Int,
        RawTok::Long => K::Long,
        RawTok::Signed => K::Signed,
        RawTok::Unsigned => K::Unsigned,
        RawTok::Float => K::Float,
        RawTok::Double => K::Double,
        RawTok::Const => K::Const,
        RawTok::Volatile => K::Volatile,
        RawTok::Sizeof => K::Sizeof,
        RawTok::Ident => K::Ident,
        RawTok::IntLit => K::IntLit,
        RawTok::FloatLit => K::FloatLit,
        RawTok::CharLit => K::CharLit,
        RawTok::Shl => K::Shl,
        RawTok::Shr => K::Shr,
        RawTok::Plus => K::Plus,
        RawTok::Minus => K::Minus,
        RawTok::Star => K::Star,
        RawTok::Slash => K::Slash,
        RawTok::Percent => K::Percent,
        RawTok::Eq => K::Eq,
        RawTok::Ne => K::Ne,
        RawTok::Le => K::Le,
        RawTok::Ge => K::Ge,
        RawTok::Lt => K::Lt,
        RawTok::Gt => K::Gt,
        RawTok::And => K::And,
        RawTok::Or => K::Or,
        RawTok::Not => K::Not,
        RawTok::Amp => K::Amp,
        RawTok::Pipe => K::Pipe,
        RawTok::Caret => K::Caret,
        RawTok::Tilde => K::Tilde,
        RawTok::Assign => K::Assign,
        RawTok::LParen => K::LParen,
        RawTok::RParen => K::RParen,
        RawTok::LBracket => K::LBracket,
        RawTok::RBracket => K::RBracket,
        RawTok::Semicolon => K::Semicolon,
        RawTok::Comma => K::Comma,
        RawTok::Colon => K::Colon,
        RawTok::Question => K::Question,
    }
}

pub struct Lexer<'a> {
    raw: logos::Lexer<'a, RawTok>,
    file: String,
    line_starts: Vec<usize>,
    done_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str, file: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in src.bytes().enumerate() {
            if b == b'\n' { line_starts.push(i + 1); }
        }
        Self { raw: RawTok::lexer(src), file: file.to_string(), line_starts, done_eof: false }
    }

    fn line_col(&self, off: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&off) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line as u32 + 1, (off - self.line_starts[line]) as u32 + 1)
    }

    fn span_at(&self, lo: usize, hi: usize) -> Span {
        let (line, col) = self.line_col(lo);
        Span { lo, hi, line, col }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.done_eof { return None; }
        match self.raw.next() {
            Some(Ok(raw)) => {
                let r = self.raw.span();
                let span = self.span_at(r.start, r.end);
                Some(Ok(Token { kind: kind_of(raw), lexeme: self.raw.slice().to_string(), span }))
            }
            Some(Err(())) => {
                let r = self.raw.span();
                let span = self.span_at(r.start, r.end);
                Some(Err(LexError { file: self.file.clone(), msg: format!("unexpected character '{}'", self.raw.slice()), span }))
            }
            None => {
                self.done_eof = true;
                let end = self.raw.source().len();
                let span = self.span_at(end, end);
                Some(Ok(Token { kind: K::Eof, lexeme: String::new(), span }))
            }
        }
    }
}
