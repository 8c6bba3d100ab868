// ----------------------------
// File: src/front/parser/expr.rs
// ----------------------------
//! Pratt parser for C89 expressions.

use super::*;
use crate::front::ast::{BinaryOp, Expr, UnaryOp};
use crate::front::token::{Span, TokenKind as K};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Prec {
    Comma,
    Assign,
    Cond,
    LogOr,
    LogAnd,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Rel,
    Shift,
    Add,
    Mul,
    Unary,
}

impl Prec { fn next(self) -> Prec { use Prec::*; match self { Comma => Assign, Assign => Cond, Cond => LogOr, LogOr => LogAnd, LogAnd => BitOr, BitOr => BitXor, BitXor => BitAnd, BitAnd => Eq, Eq => Rel, Rel => Shift, Shift => Add, Add => Mul, Mul => Unary, Unary => Unary } } }

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> PResult<Expr> { self.parse_prec(Prec::Comma) }

    pub fn parse_assign_expr(&mut self) -> PResult<Expr> {
        // Expression excluding the comma operator (array sizes, ?: arms)
        self.parse_prec(Prec::Assign)
    }

    fn parse_prec(&mut self, prec: Prec) -> PResult<Expr> {
        if prec == Prec::Unary { return self.parse_unary(); }
        let mut lhs = self.parse_prec(prec.next())?;
        loop {
            let t = self.ts.peek(0)?.clone();
            let expr = match t.kind {
                // , sequence
                K::Comma if prec <= Prec::Comma => {
                    let _ = self.ts.bump()?;
                    let rhs = self.parse_prec(Prec::Comma.next())?;
                    let span = join(lhs.span(), rhs.span());
                    Expr::Binary { op: BinaryOp::Comma, lhs: Box::new(lhs), rhs: Box::new(rhs), span }
                }
                // ?: conditional
                K::Question if prec <= Prec::Cond => {
                    let _ = self.ts.bump()?;
                    let texpr = self.parse_expr()?;
                    let _ = self.ts.expect_kind(K::Colon)?;
                    let eexpr = self.parse_prec(Prec::Cond)?;
                    let span = join(lhs.span(), eexpr.span());
                    Expr::Cond { c: Box::new(lhs), t: Box::new(texpr), e: Box::new(eexpr), span }
                }
                // simple assignment
                K::Assign if prec <= Prec::Assign => {
                    let _ = self.ts.bump()?;
                    let rhs = self.parse_prec(Prec::Assign)?;
                    let span = join(lhs.span(), rhs.span());
                    Expr::Assign { lhs: Box::new(lhs), rhs: Box::new(rhs), span }
                }
                // || && | ^ &
                K::Or if prec <= Prec::LogOr => bin!(self, lhs, Prec::LogOr, BinaryOp::LogOr),
                K::And if prec <= Prec::LogAnd => bin!(self, lhs, Prec::LogAnd, BinaryOp::LogAnd),
                K::Pipe if prec <= Prec::BitOr => bin!(self, lhs, Prec::BitOr, BinaryOp::BitOr),
                K::Caret if prec <= Prec::BitXor => bin!(self, lhs, Prec::BitXor, BinaryOp::BitXor),
                K::Amp if prec <= Prec::BitAnd => bin!(self, lhs, Prec::BitAnd, BinaryOp::BitAnd),
                // == != < <= > >=
                K::Eq if prec <= Prec::Eq => bin!(self, lhs, Prec::Eq, BinaryOp::Eq),
                K::Ne if prec <= Prec::Eq => bin!(self, lhs, Prec::Eq, BinaryOp::Ne),
                K::Lt if prec <= Prec::Rel => bin!(self, lhs, Prec::Rel, BinaryOp::Lt),
                K::Le if prec <= Prec::Rel => bin!(self, lhs, Prec::Rel, BinaryOp::Le),
                K::Gt if prec <= Prec::Rel => bin!(self, lhs, Prec::Rel, BinaryOp::Gt),
                K::Ge if prec <= Prec::Rel => bin!(self, lhs, Prec::Rel, BinaryOp::Ge),
                // << >> + - * / %
                K::Shl if prec <= Prec::Shift => bin!(self, lhs, Prec::Shift, BinaryOp::Shl),
                K::Shr if prec <= Prec::Shift => bin!(self, lhs, Prec::Shift, BinaryOp::Shr),
                K::Plus if prec <= Prec::Add => bin!(self, lhs, Prec::Add, BinaryOp::Add),
                K::Minus if prec <= Prec::Add => bin!(self, lhs, Prec::Add, BinaryOp::Sub),
                K::Star if prec <= Prec::Mul => bin!(self, lhs, Prec::Mul, BinaryOp::Mul),
                K::Slash if prec <= Prec::Mul => bin!(self, lhs, Prec::Mul, BinaryOp::Div),
                K::Percent if prec <= Prec::Mul => bin!(self, lhs, Prec::Mul, BinaryOp::Mod),
                _ => break,
            };
            lhs = expr;
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let t = self.ts.peek(0)?.clone();
        match t.kind {
            // sizeof
            K::Sizeof => {
                let tsz = self.ts.bump()?;
                if self.ts.check(K::LParen)? && self.is_type_start_at(1)? {
                    let _ = self.ts.bump()?;
                    let ty = self.parse_type_name()?;
                    let _ = self.ts.expect_kind(K::RParen)?;
                    Ok(Expr::SizeOfType { ty, span: tsz.span })
                } else {
                    let e = self.parse_unary()?;
                    Ok(Expr::SizeOfExpr { expr: Box::new(e), span: tsz.span })
                }
            }
            // cast (type-name) unary, or grouped expression
            K::LParen => {
                let lp = self.ts.bump()?;
                if self.is_type_start()? {
                    let ty = self.parse_type_name()?;
                    let _ = self.ts.expect_kind(K::RParen)?;
                    let e = self.parse_unary()?;
                    Ok(Expr::Cast { ty, expr: Box::new(e), span: lp.span })
                } else {
                    let e = self.parse_expr()?;
                    let _ = self.ts.expect_kind(K::RParen)?;
                    Ok(e)
                }
            }
            // primaries
            K::Ident => { let t = self.ts.bump()?; Ok(Expr::Ident(t.lexeme, t.span)) }
            K::IntLit => { let t = self.ts.bump()?; Ok(Expr::IntLit(t.lexeme, t.span)) }
            K::FloatLit => { let t = self.ts.bump()?; Ok(Expr::FloatLit(t.lexeme, t.span)) }
            K::CharLit => { let t = self.ts.bump()?; Ok(Expr::CharLit(t.lexeme, t.span)) }
            // prefix operators
            K::Plus => self.unary(UnaryOp::Plus),
            K::Minus => self.unary(UnaryOp::Minus),
            K::Tilde => self.unary(UnaryOp::BitNot),
            K::Not => self.unary(UnaryOp::LogNot),
            K::Amp => self.unary(UnaryOp::AddrOf),
            K::Star => self.unary(UnaryOp::Deref),
            _ => self.error(t.span, "expected expression"),
        }
    }

    fn unary(&mut self, op: UnaryOp) -> PResult<Expr> {
        let t = self.ts.bump()?;
        let e = self.parse_unary()?;
        Ok(Expr::Unary { op, expr: Box::new(e), span: t.span })
    }
}

fn join(a: Span, b: Span) -> Span { Span { lo: a.lo.min(b.lo), hi: a.hi.max(b.hi), line: a.line, col: a.col } }

macro_rules! bin {
    ($self:ident, $lhs:ident, $prec:expr, $op:expr) => {{
        let _ = $self.ts.bump()?;
        let rhs = $self.parse_prec(($prec).next())?;
        let span = join($lhs.span(), rhs.span());
        Expr::Binary { op: $op, lhs: Box::new($lhs), rhs: Box::new(rhs), span }
    }};
}
use bin;
