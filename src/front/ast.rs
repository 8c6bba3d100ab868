// ----------------------------
// File: src/front/ast.rs
// ----------------------------
//! Surface expression AST (C89 expression grammar, untyped).

use crate::front::semantics::types::Type;
use crate::front::token::Span;

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(String, Span),
    IntLit(String, Span),
    FloatLit(String, Span),
    CharLit(String, Span),

    Unary { op: UnaryOp, expr: Box<Expr>, span: Span },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr>, span: Span },
    Cond { c: Box<Expr>, t: Box<Expr>, e: Box<Expr>, span: Span },
    Assign { lhs: Box<Expr>, rhs: Box<Expr>, span: Span },

    // Casts (C89): the type-name is parsed straight into the semantic model
    Cast { ty: Type, expr: Box<Expr>, span: Span },

    SizeOfExpr { expr: Box<Expr>, span: Span },
    SizeOfType { ty: Type, span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp { Plus, Minus, BitNot, LogNot, AddrOf, Deref }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul, Div, Mod,
    Add, Sub,
    Shl, Shr,
    Lt, Gt, Le, Ge,
    Eq, Ne,
    BitAnd, BitXor, BitOr,
    LogAnd, LogOr,
    Comma,
}

// Helpers
impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(_, s)
            | Expr::IntLit(_, s)
            | Expr::FloatLit(_, s)
            | Expr::CharLit(_, s)
            | Expr::Unary { span: s, .. }
            | Expr::Binary { span: s, .. }
            | Expr::Cond { span: s, .. }
            | Expr::Assign { span: s, .. }
            | Expr::Cast { span: s, .. }
            | Expr::SizeOfExpr { span: s, .. }
            | Expr::SizeOfType { span: s, .. }
            => *s,
        }
    }
}
