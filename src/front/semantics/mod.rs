// ----------------------------
// File: src/front/semantics/mod.rs
// ----------------------------
//! Semantic analysis: the type model, typed expressions, the conversion
//! engine, and the elaborator that applies them to the surface AST.

pub mod cast;
pub mod const_eval;
pub mod convert;
pub mod env;
pub mod error;
pub mod texpr;
pub mod types;

pub use cast::{from_pointer, make_cast, make_cast_in, to_pointer};
pub use convert::{integral_promotion, usual_arithmetic_conversion, usual_scalar_conversion};
pub use env::Env;
pub use error::SemError;
pub use texpr::{CastOp, TExpr, TExprKind};
pub use types::{equal_type, ArithKind, Quals, Type, TypeKind};

use crate::front::ast::{BinaryOp, Expr, UnaryOp};
use crate::front::token::Span;

#[derive(Debug, Clone)]
pub struct Diag { pub span: Span, pub msg: String }

#[derive(Debug, Default)]
pub struct Diagnostics { pub errors: Vec<Diag> }

impl Diagnostics {
    pub fn error<S: Into<String>>(&mut self, span: Span, msg: S) { self.errors.push(Diag { span, msg: msg.into() }); }
    pub fn is_empty(&self) -> bool { self.errors.is_empty() }
}

/// Turns surface expressions into typed expressions, invoking the
/// conversion engine at every operator seam. Errors are fatal for the
/// expression; the caller recovers at the next statement.
pub struct Elaborator {
    env: Env,
}

impl Default for Elaborator {
    fn default() -> Self { Self::new() }
}

impl Elaborator {
    pub fn new() -> Self { Self { env: Env::global() } }

    pub fn declare(&mut self, name: &str, ty: Type, span: Span) -> Result<(), Diag> {
        if ty.is_void() {
            return Err(Diag { span, msg: format!("'{}' declared void", name) });
        }
        if !self.env.declare(name, ty) {
            return Err(Diag { span, msg: format!("redefinition of '{}'", name) });
        }
        Ok(())
    }

    fn err(&self, span: Span, e: SemError) -> Diag {
        Diag { span, msg: e.to_string() }
    }

    /// Array and function operands decay to pointers in value context.
    fn decay(&self, e: TExpr, span: Span) -> Result<TExpr, Diag> {
        let dest = match &e.ty.kind {
            TypeKind::Array(elem, _) => Type::pointer_to((**elem).clone()),
            TypeKind::IncompleteArray(elem) => Type::pointer_to((**elem).clone()),
            TypeKind::Function(_) => Type::pointer_to(e.ty.clone()),
            _ => return Ok(e),
        };
        cast::to_pointer(e, &dest).map_err(|er| self.err(span, er))
    }

    pub fn elab(&self, e: &Expr) -> Result<TExpr, Diag> {
        match e {
            Expr::IntLit(s, sp) => const_eval::int_lit_expr(s, &self.env).map_err(|m| Diag { span: *sp, msg: m }),
            Expr::FloatLit(s, sp) => const_eval::float_lit_expr(s, &self.env).map_err(|m| Diag { span: *sp, msg: m }),
            Expr::CharLit(s, sp) => const_eval::char_lit_expr(s, &self.env).map_err(|m| Diag { span: *sp, msg: m }),

            Expr::Ident(name, sp) => {
                let ty = self.env.lookup(name).ok_or_else(|| self.err(*sp, SemError::Undeclared { name: name.clone() }))?;
                let lv = !ty.is_function() && !ty.is_array();
                Ok(TExpr { ty, env: self.env.clone(), is_lvalue: lv, is_const: false, kind: TExprKind::Ident(name.clone()) })
            }

            Expr::Unary { op, expr, span } => self.elab_unary(*op, expr, *span),
            Expr::Binary { op, lhs, rhs, span } => self.elab_binary(*op, lhs, rhs, *span),

            Expr::Cond { c, t, e, span } => self.elab_cond(c, t, e, *span),

            Expr::Assign { lhs, rhs, span } => {
                let l = self.elab(lhs)?;
                if !l.is_lvalue {
                    return Err(Diag { span: *span, msg: "assignment to non-lvalue".into() });
                }
                let r = self.decay(self.elab(rhs)?, *span)?;
                let r = make_cast(r, &l.ty).map_err(|er| self.err(*span, er))?;
                let ty = l.ty.clone();
                Ok(TExpr { ty, env: self.env.clone(), is_lvalue: false, is_const: false, kind: TExprKind::Assign(Box::new(l), Box::new(r)) })
            }

            Expr::Cast { ty, expr, span } => {
                let v = self.decay(self.elab(expr)?, *span)?;
                let r = make_cast(v, ty).map_err(|er| self.err(*span, er))?;
                // an explicit cast is never an lvalue, even when it is a no-op
                Ok(TExpr { is_lvalue: false, ..r })
            }

            Expr::SizeOfType { ty, span } => {
                let n = ty.size_of().map_err(|er| self.err(*span, er))?;
                Ok(TExpr::const_ulong(n as u32, &self.env))
            }
            Expr::SizeOfExpr { expr, span } => {
                // sizeof does not decay its operand
                let v = self.elab(expr)?;
                let n = v.ty.size_of().map_err(|er| self.err(*span, er))?;
                Ok(TExpr::const_ulong(n as u32, &self.env))
            }
        }
    }

    fn elab_unary(&self, op: UnaryOp, expr: &Expr, span: Span) -> Result<TExpr, Diag> {
        match op {
            UnaryOp::Plus | UnaryOp::Minus => {
                let v = self.decay(self.elab(expr)?, span)?;
                if !v.ty.is_arith() {
                    return Err(self.err(span, SemError::InvalidOperand { op: if op == UnaryOp::Minus { "-" } else { "+" }, ty: v.ty.clone() }));
                }
                let v = if v.ty.is_integral() {
                    convert::integral_promotion(v).map_err(|er| self.err(span, er))?.0
                } else { v };
                if let Some(f) = const_eval::fold_unary(op, &v) { return Ok(f); }
                let ty = v.ty.clone();
                Ok(self.rvalue(ty, TExprKind::Unary(op, Box::new(v))))
            }
            UnaryOp::BitNot => {
                let v = self.decay(self.elab(expr)?, span)?;
                let (v, _) = convert::integral_promotion(v).map_err(|er| self.err(span, er))?;
                if let Some(f) = const_eval::fold_unary(op, &v) { return Ok(f); }
                let ty = v.ty.clone();
                Ok(self.rvalue(ty, TExprKind::Unary(op, Box::new(v))))
            }
            UnaryOp::LogNot => {
                let v = self.decay(self.elab(expr)?, span)?;
                if !v.ty.is_scalar() {
                    return Err(self.err(span, SemError::InvalidOperand { op: "!", ty: v.ty.clone() }));
                }
                if let Some(f) = const_eval::fold_unary(op, &v) { return Ok(f); }
                Ok(self.rvalue(Type::new(TypeKind::Long), TExprKind::Unary(op, Box::new(v))))
            }
            UnaryOp::AddrOf => {
                let v = self.elab(expr)?;
                if !v.is_lvalue && !v.ty.is_function() && !v.ty.is_array() {
                    return Err(Diag { span, msg: "cannot take the address of an rvalue".into() });
                }
                let ty = Type::pointer_to(v.ty.clone());
                Ok(self.rvalue(ty, TExprKind::Unary(op, Box::new(v))))
            }
            UnaryOp::Deref => {
                let v = self.decay(self.elab(expr)?, span)?;
                let referent = v.ty.ref_type().map_err(|er| self.err(span, er))?.clone();
                Ok(TExpr { ty: referent, env: self.env.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Unary(op, Box::new(v)) })
            }
        }
    }

    fn elab_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr, span: Span) -> Result<TExpr, Diag> {
        use BinaryOp::*;
        let a = self.decay(self.elab(lhs)?, span)?;
        let b = self.decay(self.elab(rhs)?, span)?;
        match op {
            Mul | Div => self.arith_binary(op, a, b, span, false),
            Mod | BitAnd | BitOr | BitXor => self.arith_binary(op, a, b, span, true),

            Add | Sub => {
                if a.ty.is_pointer() && b.ty.is_integral() {
                    let ty = a.ty.clone();
                    return Ok(self.rvalue(ty, TExprKind::Binary(op, Box::new(a), Box::new(b))));
                }
                if op == Add && a.ty.is_integral() && b.ty.is_pointer() {
                    let ty = b.ty.clone();
                    return Ok(self.rvalue(ty, TExprKind::Binary(op, Box::new(a), Box::new(b))));
                }
                if op == Sub && a.ty.is_pointer() && b.ty.is_pointer() {
                    let ra = a.ty.ref_type().map_err(|er| self.err(span, er))?;
                    let rb = b.ty.ref_type().map_err(|er| self.err(span, er))?;
                    if !equal_type(ra, rb) {
                        return Err(Diag { span, msg: "pointer subtraction over different referent types".into() });
                    }
                    return Ok(self.rvalue(Type::new(TypeKind::Long), TExprKind::Binary(op, Box::new(a), Box::new(b))));
                }
                self.arith_binary(op, a, b, span, false)
            }

            Shl | Shr => {
                if !a.ty.is_integral() || !b.ty.is_integral() {
                    let bad = if a.ty.is_integral() { b.ty.clone() } else { a.ty.clone() };
                    return Err(self.err(span, SemError::InvalidOperand { op: if op == Shl { "<<" } else { ">>" }, ty: bad }));
                }
                // the result kind is the promoted left operand's
                let (a, _) = convert::integral_promotion(a).map_err(|er| self.err(span, er))?;
                let (b, _) = convert::integral_promotion(b).map_err(|er| self.err(span, er))?;
                if let Some(f) = const_eval::fold_binary(op, &a, &b) { return Ok(f); }
                let ty = a.ty.clone();
                Ok(self.rvalue(ty, TExprKind::Binary(op, Box::new(a), Box::new(b))))
            }

            Lt | Gt | Le | Ge | Eq | Ne => {
                let (a, b, _) = convert::usual_scalar_conversion(a, b).map_err(|er| self.err(span, er))?;
                if let Some(f) = const_eval::fold_binary(op, &a, &b) { return Ok(f); }
                Ok(self.rvalue(Type::new(TypeKind::Long), TExprKind::Binary(op, Box::new(a), Box::new(b))))
            }

            LogAnd | LogOr => {
                if !a.ty.is_scalar() || !b.ty.is_scalar() {
                    let bad = if a.ty.is_scalar() { b.ty.clone() } else { a.ty.clone() };
                    return Err(self.err(span, SemError::InvalidOperand { op: if op == LogAnd { "&&" } else { "||" }, ty: bad }));
                }
                if let Some(f) = const_eval::fold_binary(op, &a, &b) { return Ok(f); }
                Ok(self.rvalue(Type::new(TypeKind::Long), TExprKind::Binary(op, Box::new(a), Box::new(b))))
            }

            Comma => {
                let ty = b.ty.clone();
                Ok(self.rvalue(ty, TExprKind::Binary(op, Box::new(a), Box::new(b))))
            }
        }
    }

    /// The shared arithmetic-operator path: balance, fold, or build a node
    /// at the common kind.
    fn arith_binary(&self, op: BinaryOp, a: TExpr, b: TExpr, span: Span, integral_only: bool) -> Result<TExpr, Diag> {
        let name = op_name(op);
        if !a.ty.is_arith() || !b.ty.is_arith() || (integral_only && (!a.ty.is_integral() || !b.ty.is_integral())) {
            let bad = if a.ty.is_arith() && !(integral_only && !a.ty.is_integral()) { b.ty.clone() } else { a.ty.clone() };
            return Err(self.err(span, SemError::InvalidOperand { op: name, ty: bad }));
        }
        let (a, b, kind) = convert::usual_arithmetic_conversion(a, b).map_err(|er| self.err(span, er))?;
        if let Some(f) = const_eval::fold_binary(op, &a, &b) { return Ok(f); }
        Ok(self.rvalue(Type::new(kind.to_kind()), TExprKind::Binary(op, Box::new(a), Box::new(b))))
    }

    fn elab_cond(&self, c: &Expr, t: &Expr, e: &Expr, span: Span) -> Result<TExpr, Diag> {
        let c = self.decay(self.elab(c)?, span)?;
        if !c.ty.is_scalar() {
            return Err(self.err(span, SemError::InvalidOperand { op: "?:", ty: c.ty.clone() }));
        }
        let t = self.decay(self.elab(t)?, span)?;
        let e = self.decay(self.elab(e)?, span)?;
        let (t, e, ty) = if t.ty.is_arith() && e.ty.is_arith() {
            let (t, e, kind) = convert::usual_arithmetic_conversion(t, e).map_err(|er| self.err(span, er))?;
            let ty = Type::new(kind.to_kind());
            (t, e, ty)
        } else if t.ty.is_pointer() && e.ty.is_pointer() && equal_type(&t.ty, &e.ty) {
            let ty = t.ty.clone();
            (t, e, ty)
        } else if t.ty.is_pointer() && e.is_const && matches!(e.kind, TExprKind::ConstLong(0)) {
            let ty = t.ty.clone();
            let e = make_cast(e, &ty).map_err(|er| self.err(span, er))?;
            (t, e, ty)
        } else if e.ty.is_pointer() && t.is_const && matches!(t.kind, TExprKind::ConstLong(0)) {
            let ty = e.ty.clone();
            let t = make_cast(t, &ty).map_err(|er| self.err(span, er))?;
            (t, e, ty)
        } else {
            return Err(Diag { span, msg: "incompatible operands to '?:'".into() });
        };
        // a constant condition selects its arm at translation time
        if c.is_const {
            let taken = match c.kind {
                TExprKind::ConstLong(v) => v != 0,
                TExprKind::ConstULong(v) => v != 0,
                TExprKind::ConstFloat(v) => v != 0.0,
                TExprKind::ConstDouble(v) => v != 0.0,
                TExprKind::ConstPtr(v) => v != 0,
                _ => return Ok(self.rvalue(ty, TExprKind::Cond(Box::new(c), Box::new(t), Box::new(e)))),
            };
            return Ok(if taken { t } else { e });
        }
        Ok(self.rvalue(ty, TExprKind::Cond(Box::new(c), Box::new(t), Box::new(e))))
    }

    fn rvalue(&self, ty: Type, kind: TExprKind) -> TExpr {
        TExpr { ty, env: self.env.clone(), is_lvalue: false, is_const: false, kind }
    }
}

fn op_name(op: BinaryOp) -> &'static str {
    use BinaryOp::*;
    match op {
        Mul => "*", Div => "/", Mod => "%", Add => "+", Sub => "-",
        Shl => "<<", Shr => ">>", Lt => "<", Gt => ">", Le => "<=", Ge => ">=",
        Eq => "==", Ne => "!=", BitAnd => "&", BitXor => "^", BitOr => "|",
        LogAnd => "&&", LogOr => "||", Comma => ",",
    }
}
