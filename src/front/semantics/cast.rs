// ----------------------------
// File: src/front/semantics/cast.rs
// ----------------------------
//! The conversion engine: lowers every legal C conversion to a chain of
//! cast primitives, folding constants before any primitive is wrapped.
//!
//! Decision order of `make_cast`: identical types pass through untouched;
//! pointer sources and pointer destinations take the pointer paths; the
//! rest dispatches on the source's arithmetic kind. Integer/float crossings
//! stage through the 32-bit word (LONG or ULONG), matching what the i386
//! can do in one instruction.

use super::env::Env;
use super::error::SemError;
use super::texpr::{CastOp, TExpr, TExprKind};
use super::types::{equal_type, Type, TypeKind};

pub fn make_cast(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    make_cast_in(e, dest, &env)
}

/// `make_cast` with an explicit target environment, for conversions that
/// cross a declaration boundary.
pub fn make_cast_in(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    if equal_type(&e.ty, dest) {
        return Ok(e);
    }
    if e.ty.is_pointer() {
        return from_pointer_in(e, dest, env);
    }
    if dest.is_pointer() {
        return to_pointer_in(e, dest, env);
    }
    match e.ty.kind {
        TypeKind::Char | TypeKind::Short | TypeKind::Long => signed_to_arith(e, dest, env),
        TypeKind::UChar | TypeKind::UShort | TypeKind::ULong => unsigned_to_arith(e, dest, env),
        TypeKind::Float | TypeKind::Double => floating_to_arith(e, dest, env),
        _ => Err(SemError::UnsupportedSource(e.ty.clone())),
    }
}

pub fn signed_integral_to_arith(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    signed_to_arith(e, dest, &env)
}

pub fn unsigned_integral_to_arith(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    unsigned_to_arith(e, dest, &env)
}

pub fn float_to_arith(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    floating_to_arith(e, dest, &env)
}

pub fn from_pointer(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    from_pointer_in(e, dest, &env)
}

pub fn to_pointer(e: TExpr, dest: &Type) -> Result<TExpr, SemError> {
    let env = e.env.clone();
    to_pointer_in(e, dest, &env)
}

// --- signed integral sources -------------------------------------------

fn signed_to_arith(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    if e.is_const {
        if let Some(raw) = const_int_bits(&e) {
            return fold_int(raw, &e.ty, dest, env);
        }
    }
    use CastOp::*;
    use TypeKind as K;
    let t = dest.clone();
    Ok(match (&e.ty.kind, &dest.kind) {
        (K::Char, K::UChar) => TExpr::cast_in(Nop, e, t, env),
        (K::Char, K::Short) | (K::Char, K::UShort) => TExpr::cast_in(Int8ToInt16, e, t, env),
        (K::Char, K::Long) | (K::Char, K::ULong) => TExpr::cast_in(Int8ToInt32, e, t, env),
        (K::Char, K::Float) => through_long(Int8ToInt32, Int32ToFloat, e, t, env),
        (K::Char, K::Double) => through_long(Int8ToInt32, Int32ToDouble, e, t, env),

        (K::Short, K::Char) | (K::Short, K::UChar) => TExpr::cast_in(PreserveInt8, e, t, env),
        (K::Short, K::UShort) => TExpr::cast_in(Nop, e, t, env),
        (K::Short, K::Long) | (K::Short, K::ULong) => TExpr::cast_in(Int16ToInt32, e, t, env),
        (K::Short, K::Float) => through_long(Int16ToInt32, Int32ToFloat, e, t, env),
        (K::Short, K::Double) => through_long(Int16ToInt32, Int32ToDouble, e, t, env),

        (K::Long, K::Char) | (K::Long, K::UChar) => TExpr::cast_in(PreserveInt8, e, t, env),
        (K::Long, K::Short) | (K::Long, K::UShort) => TExpr::cast_in(PreserveInt16, e, t, env),
        (K::Long, K::ULong) => TExpr::cast_in(Nop, e, t, env),
        (K::Long, K::Float) => TExpr::cast_in(Int32ToFloat, e, t, env),
        (K::Long, K::Double) => TExpr::cast_in(Int32ToDouble, e, t, env),

        _ => return Err(SemError::UnsupportedConversion(e.ty.clone(), dest.clone())),
    })
}

// --- unsigned integral sources -----------------------------------------

fn unsigned_to_arith(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    if e.is_const {
        if let Some(raw) = const_int_bits(&e) {
            return fold_int(raw, &e.ty, dest, env);
        }
    }
    use CastOp::*;
    use TypeKind as K;
    let t = dest.clone();
    Ok(match (&e.ty.kind, &dest.kind) {
        // bitwise identity
        (K::UChar, K::Char) => TExpr::cast_in(Nop, e, t, env),
        (K::UChar, K::Short) | (K::UChar, K::UShort) => TExpr::cast_in(Uint8ToUint16, e, t, env),
        (K::UChar, K::Long) | (K::UChar, K::ULong) => TExpr::cast_in(Uint8ToUint32, e, t, env),
        (K::UChar, K::Float) => through_ulong(Uint8ToUint32, Int32ToFloat, e, t, env),
        (K::UChar, K::Double) => through_ulong(Uint8ToUint32, Int32ToDouble, e, t, env),

        (K::UShort, K::Char) | (K::UShort, K::UChar) => TExpr::cast_in(PreserveInt8, e, t, env),
        (K::UShort, K::Short) => TExpr::cast_in(Nop, e, t, env),
        (K::UShort, K::Long) | (K::UShort, K::ULong) => TExpr::cast_in(Uint16ToUint32, e, t, env),
        (K::UShort, K::Float) => through_ulong(Uint16ToUint32, Int32ToFloat, e, t, env),
        (K::UShort, K::Double) => through_ulong(Uint16ToUint32, Int32ToDouble, e, t, env),

        (K::ULong, K::Char) | (K::ULong, K::UChar) => TExpr::cast_in(PreserveInt8, e, t, env),
        (K::ULong, K::Short) | (K::ULong, K::UShort) => TExpr::cast_in(PreserveInt16, e, t, env),
        (K::ULong, K::Long) => TExpr::cast_in(Nop, e, t, env),
        // No unsigned-to-float primitive exists on this target; the signed
        // one is reused, which misconverts values with the high bit set.
        (K::ULong, K::Float) => TExpr::cast_in(Int32ToFloat, e, t, env),
        (K::ULong, K::Double) => TExpr::cast_in(Int32ToDouble, e, t, env),

        _ => return Err(SemError::UnsupportedConversion(e.ty.clone(), dest.clone())),
    })
}

// --- floating sources ---------------------------------------------------

fn floating_to_arith(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    match e.kind {
        TExprKind::ConstFloat(f) if e.is_const => return fold_from_f32(f, &e.ty, dest, env),
        TExprKind::ConstDouble(d) if e.is_const => return fold_from_f64(d, &e.ty, dest, env),
        _ => {}
    }
    use CastOp::*;
    use TypeKind as K;
    let t = dest.clone();
    Ok(match (&e.ty.kind, &dest.kind) {
        (K::Float, K::Char) => through_long(FloatToInt32, PreserveInt8, e, t, env),
        (K::Float, K::Short) | (K::Float, K::UShort) => through_long(FloatToInt32, PreserveInt16, e, t, env),
        (K::Float, K::Long) | (K::Float, K::ULong) => TExpr::cast_in(FloatToInt32, e, t, env),
        (K::Float, K::Double) => TExpr::cast_in(FloatToDouble, e, t, env),

        // The narrow signed destinations go through FLOAT first.
        (K::Double, K::Char) | (K::Double, K::Short) => {
            let f = TExpr::cast_in(DoubleToFloat, e, Type::new(K::Float), env);
            return floating_to_arith(f, dest, env);
        }
        (K::Double, K::UChar) => through_long(DoubleToInt32, PreserveInt8, e, t, env),
        (K::Double, K::UShort) => through_long(DoubleToInt32, PreserveInt16, e, t, env),
        (K::Double, K::Long) | (K::Double, K::ULong) => TExpr::cast_in(DoubleToInt32, e, t, env),
        (K::Double, K::Float) => TExpr::cast_in(DoubleToFloat, e, t, env),

        _ => return Err(SemError::UnsupportedConversion(e.ty.clone(), dest.clone())),
    })
}

// --- pointer paths ------------------------------------------------------

pub fn from_pointer_in(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    if !e.ty.is_pointer() {
        return Err(SemError::UnsupportedSource(e.ty.clone()));
    }
    if dest.is_pointer() {
        if let TExprKind::ConstPtr(addr) = e.kind {
            return Ok(TExpr::const_ptr(addr, dest.clone(), env));
        }
        return Ok(TExpr::cast_in(CastOp::Nop, e, dest.clone(), env));
    }
    if dest.is_integral() {
        let ulong = Type::new(TypeKind::ULong);
        let word = if let TExprKind::ConstPtr(addr) = e.kind {
            TExpr::const_ulong_of(addr, ulong, env)
        } else {
            TExpr::cast_in(CastOp::Nop, e, ulong, env)
        };
        return make_cast_in(word, dest, env);
    }
    Err(SemError::UnsupportedConversion(e.ty.clone(), dest.clone()))
}

pub fn to_pointer_in(e: TExpr, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    match &e.ty.kind {
        TypeKind::Pointer(_) => {
            if let TExprKind::ConstPtr(addr) = e.kind {
                return Ok(TExpr::const_ptr(addr, dest.clone(), env));
            }
            Ok(TExpr::cast_in(CastOp::Nop, e, dest.clone(), env))
        }
        _ if e.ty.is_integral() => {
            let word = make_cast_in(e, &Type::new(TypeKind::ULong), env)?;
            if let TExprKind::ConstULong(addr) = word.kind {
                return Ok(TExpr::const_ptr(addr, dest.clone(), env));
            }
            Ok(TExpr::cast_in(CastOp::Nop, word, dest.clone(), env))
        }
        TypeKind::Function(_) => {
            let referent = dest.ref_type()?;
            if equal_type(referent, &e.ty) {
                Ok(TExpr::cast_in(CastOp::Nop, e, dest.clone(), env))
            } else {
                Err(SemError::IncompatibleFunctionPointer { found: e.ty.clone(), want: referent.clone() })
            }
        }
        // array-to-pointer decay
        TypeKind::Array(..) | TypeKind::IncompleteArray(_) => Ok(TExpr::cast_in(CastOp::Nop, e, dest.clone(), env)),
        _ => Err(SemError::UnsupportedConversion(e.ty.clone(), dest.clone())),
    }
}

// --- constant folding ---------------------------------------------------

/// Raw 32-bit payload of an integral or pointer constant, widened so signed
/// values keep their sign and unsigned values their magnitude.
fn const_int_bits(e: &TExpr) -> Option<i64> {
    match e.kind {
        TExprKind::ConstLong(v) => Some(v as i64),
        TExprKind::ConstULong(v) => Some(v as i64),
        TExprKind::ConstPtr(a) => Some(a as i64),
        _ => None,
    }
}

/// Fold an integral constant into `dest`. Narrowing truncates to the low
/// bits with the destination's signedness; float destinations stage through
/// i32 exactly like the INT32_TO_* primitives (so the unsigned-source quirk
/// reproduces in the folded value).
fn fold_int(raw: i64, src: &Type, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    let t = dest.clone();
    Ok(match dest.kind {
        TypeKind::Char => TExpr::const_long_of((raw as i8) as i32, t, env),
        TypeKind::UChar => TExpr::const_ulong_of((raw as u8) as u32, t, env),
        TypeKind::Short => TExpr::const_long_of((raw as i16) as i32, t, env),
        TypeKind::UShort => TExpr::const_ulong_of((raw as u16) as u32, t, env),
        TypeKind::Long => TExpr::const_long_of(raw as i32, t, env),
        TypeKind::ULong => TExpr::const_ulong_of(raw as u32, t, env),
        TypeKind::Float => TExpr::const_float_of((raw as i32) as f32, t, env),
        TypeKind::Double => TExpr::const_double_of((raw as i32) as f64, t, env),
        _ => return Err(SemError::UnsupportedConversion(src.clone(), dest.clone())),
    })
}

fn fold_from_f32(f: f32, src: &Type, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    let t = dest.clone();
    let trunc = f as i32;
    Ok(match dest.kind {
        TypeKind::Char => TExpr::const_long_of((trunc as i8) as i32, t, env),
        TypeKind::Short => TExpr::const_long_of((trunc as i16) as i32, t, env),
        TypeKind::UShort => TExpr::const_ulong_of((trunc as u16) as u32, t, env),
        TypeKind::Long => TExpr::const_long_of(trunc, t, env),
        TypeKind::ULong => TExpr::const_ulong_of(trunc as u32, t, env),
        TypeKind::Double => TExpr::const_double_of(f as f64, t, env),
        // no FLOAT -> UCHAR conversion is defined
        _ => return Err(SemError::UnsupportedConversion(src.clone(), dest.clone())),
    })
}

fn fold_from_f64(d: f64, src: &Type, dest: &Type, env: &Env) -> Result<TExpr, SemError> {
    let t = dest.clone();
    Ok(match dest.kind {
        // narrowed through f32 first, like the emitted chain
        TypeKind::Char | TypeKind::Short => return fold_from_f32(d as f32, src, dest, env),
        TypeKind::UChar => TExpr::const_ulong_of(((d as i32) as u8) as u32, t, env),
        TypeKind::UShort => TExpr::const_ulong_of(((d as i32) as u16) as u32, t, env),
        TypeKind::Long => TExpr::const_long_of(d as i32, t, env),
        TypeKind::ULong => TExpr::const_ulong_of((d as i32) as u32, t, env),
        TypeKind::Float => TExpr::const_float_of(d as f32, t, env),
        _ => return Err(SemError::UnsupportedConversion(src.clone(), dest.clone())),
    })
}

// --- small builders -----------------------------------------------------

fn through_long(first: CastOp, second: CastOp, e: TExpr, dest: Type, env: &Env) -> TExpr {
    let word = TExpr::cast_in(first, e, Type::new(TypeKind::Long), env);
    TExpr::cast_in(second, word, dest, env)
}

fn through_ulong(first: CastOp, second: CastOp, e: TExpr, dest: Type, env: &Env) -> TExpr {
    let word = TExpr::cast_in(first, e, Type::new(TypeKind::ULong), env);
    TExpr::cast_in(second, word, dest, env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::semantics::types::ArithKind;

    fn ident(kind: TypeKind, env: &Env) -> TExpr {
        TExpr { ty: Type::new(kind), env: env.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("x".into()) }
    }

    const ARITH: [ArithKind; 8] = [
        ArithKind::Char, ArithKind::UChar, ArithKind::Short, ArithKind::UShort,
        ArithKind::Long, ArithKind::ULong, ArithKind::Float, ArithKind::Double,
    ];

    #[test]
    fn identity_returns_the_expression_unchanged() {
        let env = Env::global();
        let x = ident(TypeKind::Short, &env);
        let r = make_cast(x.clone(), &Type::new(TypeKind::Short)).unwrap();
        assert_eq!(r, x);
        // qualifiers are not part of the identity check
        let r = make_cast(x.clone(), &Type::with_quals(TypeKind::Short, crate::front::semantics::types::Quals::const_())).unwrap();
        assert_eq!(r, x);
    }

    #[test]
    fn arithmetic_cross_product_is_total_except_float_to_uchar() {
        let env = Env::global();
        for src in ARITH {
            for dst in ARITH {
                let e = ident(src.to_kind(), &env);
                let r = make_cast(e, &Type::new(dst.to_kind()));
                if src == ArithKind::Float && dst == ArithKind::UChar {
                    assert!(matches!(r, Err(SemError::UnsupportedConversion(..))), "float->uchar must be rejected");
                } else {
                    let r = r.unwrap_or_else(|e| panic!("{:?} -> {:?} failed: {}", src, dst, e));
                    assert!(!r.is_lvalue, "{:?} -> {:?} produced an lvalue", src, dst);
                }
            }
        }
    }

    #[test]
    fn constants_always_fold_to_const_variants() {
        let env = Env::global();
        for dst in ARITH {
            if dst == ArithKind::UChar { continue; } // float source rejected
            let r = make_cast(TExpr::const_float(1.5, &env), &Type::new(dst.to_kind())).unwrap();
            assert!(!matches!(r.kind, TExprKind::Cast(..)), "float const -> {:?} did not fold", dst);
            assert!(r.is_const);
        }
        for dst in ARITH {
            let r = make_cast(TExpr::const_long(-7, &env), &Type::new(dst.to_kind())).unwrap();
            assert!(!matches!(r.kind, TExprKind::Cast(..)), "long const -> {:?} did not fold", dst);
        }
    }

    #[test]
    fn narrowing_folds_truncate_with_destination_signedness() {
        let env = Env::global();
        let r = make_cast(TExpr::const_long(-1, &env), &Type::new(TypeKind::Char)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstLong(-1));
        assert!(matches!(r.ty.kind, TypeKind::Char));

        let r = make_cast(TExpr::const_long(257, &env), &Type::new(TypeKind::Char)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstLong(1));

        let r = make_cast(TExpr::const_ulong(0xFFFF_FFFF, &env), &Type::new(TypeKind::UShort)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstULong(0xFFFF));

        let r = make_cast(TExpr::const_long(-2, &env), &Type::new(TypeKind::ULong)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstULong(0xFFFF_FFFE));
    }

    #[test]
    fn short_to_double_is_extend_then_fpu_load() {
        let env = Env::global();
        let x = ident(TypeKind::Short, &env);
        let r = make_cast(x, &Type::new(TypeKind::Double)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::Int16ToInt32, CastOp::Int32ToDouble]);
        // the staging word is a LONG
        if let TExprKind::Cast(_, inner) = &r.kind {
            assert!(matches!(inner.ty.kind, TypeKind::Long));
        } else {
            panic!("expected a cast node");
        }
    }

    #[test]
    fn nop_retyping_is_visible_in_the_tree() {
        let env = Env::global();
        let x = ident(TypeKind::Char, &env);
        let r = make_cast(x, &Type::new(TypeKind::UChar)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::Nop]);
        assert!(matches!(r.ty.kind, TypeKind::UChar));
    }

    #[test]
    fn double_to_narrow_signed_detours_through_float() {
        let env = Env::global();
        let x = ident(TypeKind::Double, &env);
        let r = make_cast(x, &Type::new(TypeKind::Char)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::DoubleToFloat, CastOp::FloatToInt32, CastOp::PreserveInt8]);

        let x = ident(TypeKind::Double, &env);
        let r = make_cast(x, &Type::new(TypeKind::UChar)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::DoubleToInt32, CastOp::PreserveInt8]);
    }

    #[test]
    fn unsigned_word_reuses_the_signed_fpu_load() {
        let env = Env::global();
        let x = ident(TypeKind::ULong, &env);
        let r = make_cast(x, &Type::new(TypeKind::Float)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::Int32ToFloat]);

        // ...and the fold reproduces the high-bit misconversion bit-exactly
        let c = make_cast(TExpr::const_ulong(0x8000_0000, &env), &Type::new(TypeKind::Float)).unwrap();
        assert_eq!(c.kind, TExprKind::ConstFloat((0x8000_0000u32 as i32) as f32));
    }

    #[test]
    fn float_folds_stage_through_i32() {
        let env = Env::global();
        let r = make_cast(TExpr::const_float(257.9, &env), &Type::new(TypeKind::Char)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstLong(1)); // trunc to 257, low byte 1

        let r = make_cast(TExpr::const_float(-2.5, &env), &Type::new(TypeKind::ULong)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstULong(0xFFFF_FFFE));

        let r = make_cast(TExpr::const_double(1.25, &env), &Type::new(TypeKind::Float)).unwrap();
        assert_eq!(r.kind, TExprKind::ConstFloat(1.25));
    }

    #[test]
    fn pointer_to_integral_stages_through_ulong() {
        let env = Env::global();
        let p = TExpr { ty: Type::pointer_to(Type::new(TypeKind::Char)), env: env.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("p".into()) };
        let r = make_cast(p, &Type::new(TypeKind::Short)).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::Nop, CastOp::PreserveInt16]);
    }

    #[test]
    fn integral_zero_becomes_a_pointer_constant() {
        let env = Env::global();
        let dest = Type::pointer_to(Type::new(TypeKind::Char));
        let r = make_cast(TExpr::const_long(0, &env), &dest).unwrap();
        assert_eq!(r.kind, TExprKind::ConstPtr(0));
        assert!(equal_type(&r.ty, &dest));
    }

    #[test]
    fn pointer_round_trips_through_ulong() {
        let env = Env::global();
        let dest = Type::pointer_to(Type::new(TypeKind::Double));
        let p = TExpr::const_ptr(0xdead_b000, dest.clone(), &env);
        let word = make_cast(p.clone(), &Type::new(TypeKind::ULong)).unwrap();
        assert_eq!(word.kind, TExprKind::ConstULong(0xdead_b000));
        let back = make_cast(word, &dest).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn function_to_pointer_requires_matching_referent() {
        let env = Env::global();
        let fty = Type::function(Type::new(TypeKind::Long), vec![Type::new(TypeKind::Double)], false);
        let f = TExpr { ty: fty.clone(), env: env.clone(), is_lvalue: false, is_const: false, kind: TExprKind::Ident("f".into()) };
        let good = Type::pointer_to(fty.clone());
        assert!(to_pointer(f.clone(), &good).is_ok());

        let other = Type::pointer_to(Type::function(Type::new(TypeKind::Void), vec![], false));
        assert!(matches!(to_pointer(f, &other), Err(SemError::IncompatibleFunctionPointer { .. })));
    }

    #[test]
    fn array_decays_to_pointer_with_a_nop() {
        let env = Env::global();
        let aty = Type::array_of(Type::new(TypeKind::Long), 4);
        let a = TExpr { ty: aty, env: env.clone(), is_lvalue: false, is_const: false, kind: TExprKind::Ident("a".into()) };
        let r = make_cast(a, &Type::pointer_to(Type::new(TypeKind::Long))).unwrap();
        assert_eq!(r.cast_chain(), vec![CastOp::Nop]);
    }

    #[test]
    fn non_convertible_sources_are_rejected() {
        let env = Env::global();
        let v = TExpr { ty: Type::new(TypeKind::Void), env: env.clone(), is_lvalue: false, is_const: false, kind: TExprKind::Ident("v".into()) };
        assert!(matches!(make_cast(v, &Type::new(TypeKind::Long)), Err(SemError::UnsupportedSource(_))));

        let fty = Type::function(Type::new(TypeKind::Void), vec![], false);
        let f = TExpr { ty: fty, env: env.clone(), is_lvalue: false, is_const: false, kind: TExprKind::Ident("f".into()) };
        assert!(matches!(make_cast(f, &Type::new(TypeKind::Long)), Err(SemError::UnsupportedSource(_))));
    }

    #[test]
    fn cross_scope_casts_carry_the_target_environment() {
        let outer = Env::global();
        let inner = outer.nested();
        let p = TExpr { ty: Type::pointer_to(Type::new(TypeKind::Char)), env: inner.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("p".into()) };
        let r = make_cast_in(p, &Type::new(TypeKind::ULong), &outer).unwrap();
        assert!(r.env.same(&outer));
    }
}
