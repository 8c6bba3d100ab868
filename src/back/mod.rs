// ----------------------------
// File: src/back/mod.rs
// ----------------------------
//! Cast emission for i386. The semantic core talks to the assembler through
//! the narrow `CastEmit` contract; each cast primitive maps to at most one
//! emitter call. `X86Emitter` is the textual AT&T-syntax implementation,
//! with the value in %eax or on the FPU stack top.

use crate::front::semantics::texpr::{CastOp, TExpr, TExprKind};
use crate::front::semantics::types::{Type, TypeKind};

/// Where a value lives after a primitive runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    /// General-purpose register (%eax).
    Gpr,
    /// FPU stack top (%st(0)).
    Fpu,
}

/// The six operations the assembler exposes to the cast core.
pub trait CastEmit {
    fn movsbl(&mut self);
    fn movswl(&mut self);
    fn movzbl(&mut self);
    fn movzwl(&mut self);
    /// Push the GPR word onto the FPU stack as an integer load.
    fn long_to_float(&mut self);
    /// Pop the FPU stack top into the GPR, truncating toward zero.
    fn float_to_long(&mut self);
}

/// Lower one cast primitive. NOP and the PRESERVE reinterpretations emit
/// nothing; FLOAT<->DOUBLE emit nothing because both widths live as
/// extended precision on the FPU stack and narrow at store time.
pub fn emit_cast<E: CastEmit>(op: CastOp, src: Reg, out: &mut E) -> Reg {
    use CastOp::*;
    match op {
        Nop | PreserveInt8 | PreserveInt16 => src,
        Int8ToInt16 | Int8ToInt32 => { out.movsbl(); Reg::Gpr }
        Int16ToInt32 => { out.movswl(); Reg::Gpr }
        Uint8ToUint16 | Uint8ToUint32 => { out.movzbl(); Reg::Gpr }
        Uint16ToUint32 => { out.movzwl(); Reg::Gpr }
        Int32ToFloat | Int32ToDouble => { out.long_to_float(); Reg::Fpu }
        FloatToInt32 | DoubleToInt32 => { out.float_to_long(); Reg::Gpr }
        FloatToDouble | DoubleToFloat => Reg::Fpu,
    }
}

/// Register class a value of this type occupies once loaded.
pub fn value_reg(ty: &Type) -> Reg {
    match ty.kind {
        TypeKind::Float | TypeKind::Double => Reg::Fpu,
        _ => Reg::Gpr,
    }
}

/// Walk the cast spine of `e` and emit its primitives innermost-first,
/// returning the register class holding the final value.
pub fn emit_cast_chain<E: CastEmit>(e: &TExpr, out: &mut E) -> Reg {
    match &e.kind {
        TExprKind::Cast(op, inner) => {
            let src = emit_cast_chain(inner, out);
            emit_cast(*op, src, out)
        }
        _ => value_reg(&e.ty),
    }
}

pub struct X86Emitter {
    buf: Vec<String>,
}

impl Default for X86Emitter {
    fn default() -> Self { Self::new() }
}

impl X86Emitter {
    pub fn new() -> Self { Self { buf: Vec::new() } }

    fn emit<S: Into<String>>(&mut self, s: S) { self.buf.push(s.into()); }

    pub fn lines(&self) -> &[String] { &self.buf }

    pub fn finish(self) -> String {
        let mut out = String::new();
        for line in &self.buf {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

impl CastEmit for X86Emitter {
    fn movsbl(&mut self) { self.emit("\tmovsbl %al, %eax"); }
    fn movswl(&mut self) { self.emit("\tmovswl %ax, %eax"); }
    fn movzbl(&mut self) { self.emit("\tmovzbl %al, %eax"); }
    fn movzwl(&mut self) { self.emit("\tmovzwl %ax, %eax"); }

    fn long_to_float(&mut self) {
        self.emit("\tpushl %eax");
        self.emit("\tfildl (%esp)");
        self.emit("\taddl $4, %esp");
    }

    fn float_to_long(&mut self) {
        // fistpl rounds by the control word; force truncation toward zero
        self.emit("\tsubl $8, %esp");
        self.emit("\tfnstcw 4(%esp)");
        self.emit("\tmovzwl 4(%esp), %eax");
        self.emit("\torl $0x0c00, %eax");
        self.emit("\tmovw %ax, 6(%esp)");
        self.emit("\tfldcw 6(%esp)");
        self.emit("\tfistpl (%esp)");
        self.emit("\tfldcw 4(%esp)");
        self.emit("\tpopl %eax");
        self.emit("\taddl $4, %esp");
    }
}
