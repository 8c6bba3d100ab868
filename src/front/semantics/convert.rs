// ----------------------------
// File: src/front/semantics/convert.rs
// ----------------------------
//! Integral promotion and the usual arithmetic/scalar conversions — the
//! standard balancing rules applied at every operator seam.

use super::cast::{from_pointer_in, make_cast};
use super::env::Env;
use super::error::SemError;
use super::texpr::TExpr;
use super::types::{ArithKind, Type, TypeKind};

/// Promote a small integer to the 32-bit word of matching signedness.
/// Qualifiers stay with the operand. LONG and ULONG are their own fixpoints.
pub fn integral_promotion(e: TExpr) -> Result<(TExpr, ArithKind), SemError> {
    let kind = match e.ty.kind {
        TypeKind::Char | TypeKind::Short | TypeKind::Long => ArithKind::Long,
        TypeKind::UChar | TypeKind::UShort | TypeKind::ULong => ArithKind::ULong,
        _ => return Err(SemError::NonIntegralPromotion(e.ty.clone())),
    };
    let dest = Type::with_quals(kind.to_kind(), e.ty.quals);
    let e = make_cast(e, &dest)?;
    Ok((e, kind))
}

/// Balance two arithmetic operands to a common kind:
/// DOUBLE beats FLOAT beats ULONG beats LONG.
pub fn usual_arithmetic_conversion(e1: TExpr, e2: TExpr) -> Result<(TExpr, TExpr, ArithKind), SemError> {
    let kind = common_arith_kind(&e1.ty, &e2.ty)?;
    let d1 = Type::with_quals(kind.to_kind(), e1.ty.quals);
    let d2 = Type::with_quals(kind.to_kind(), e2.ty.quals);
    let e1 = make_cast(e1, &d1)?;
    let e2 = make_cast(e2, &d2)?;
    Ok((e1, e2, kind))
}

/// Like `usual_arithmetic_conversion`, but pointer operands are first
/// coerced to ULONG. The coercion is tagged with the *other* operand's
/// environment: a pointer-to-integer inside a binary expression is typed in
/// the expression's shared scope.
pub fn usual_scalar_conversion(e1: TExpr, e2: TExpr) -> Result<(TExpr, TExpr, ArithKind), SemError> {
    let (e1, e2) = match (e1.ty.is_pointer(), e2.ty.is_pointer()) {
        (false, false) => (e1, e2),
        (true, false) => {
            let env = e2.env.clone();
            (pointer_word(e1, &env)?, e2)
        }
        (false, true) => {
            let env = e1.env.clone();
            (e1, pointer_word(e2, &env)?)
        }
        (true, true) => {
            let env2 = e2.env.clone();
            let env1 = e1.env.clone();
            (pointer_word(e1, &env2)?, pointer_word(e2, &env1)?)
        }
    };
    usual_arithmetic_conversion(e1, e2)
}

fn pointer_word(e: TExpr, env: &Env) -> Result<TExpr, SemError> {
    from_pointer_in(e, &Type::new(TypeKind::ULong), env)
}

fn common_arith_kind(a: &Type, b: &Type) -> Result<ArithKind, SemError> {
    let ka = a.arith_kind().ok_or_else(|| SemError::UnsupportedSource(a.clone()))?;
    let kb = b.arith_kind().ok_or_else(|| SemError::UnsupportedSource(b.clone()))?;
    Ok(if ka == ArithKind::Double || kb == ArithKind::Double {
        ArithKind::Double
    } else if ka == ArithKind::Float || kb == ArithKind::Float {
        ArithKind::Float
    } else if ka == ArithKind::ULong || kb == ArithKind::ULong {
        ArithKind::ULong
    } else {
        ArithKind::Long
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front::semantics::texpr::TExprKind;
    use crate::front::semantics::types::Quals;

    fn ident(kind: TypeKind, env: &Env) -> TExpr {
        TExpr { ty: Type::new(kind), env: env.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("x".into()) }
    }

    #[test]
    fn small_integers_promote_to_the_word() {
        let env = Env::global();
        let (e, k) = integral_promotion(ident(TypeKind::Char, &env)).unwrap();
        assert_eq!(k, ArithKind::Long);
        assert!(matches!(e.ty.kind, TypeKind::Long));
        let (_, k) = integral_promotion(ident(TypeKind::UShort, &env)).unwrap();
        assert_eq!(k, ArithKind::ULong);
    }

    #[test]
    fn promotion_is_a_fixpoint() {
        let env = Env::global();
        let (once, k1) = integral_promotion(ident(TypeKind::Short, &env)).unwrap();
        let (twice, k2) = integral_promotion(once.clone()).unwrap();
        assert_eq!(k1, k2);
        assert_eq!(once, twice);
    }

    #[test]
    fn promotion_preserves_qualifiers() {
        let env = Env::global();
        let e = TExpr { ty: Type::with_quals(TypeKind::Char, Quals::const_()), env: env.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("c".into()) };
        let (e, _) = integral_promotion(e).unwrap();
        assert!(e.ty.quals.is_const);
    }

    #[test]
    fn promotion_rejects_non_integral_operands() {
        let env = Env::global();
        assert!(matches!(integral_promotion(ident(TypeKind::Float, &env)), Err(SemError::NonIntegralPromotion(_))));
    }

    #[test]
    fn balancing_priority_is_double_float_ulong_long() {
        let env = Env::global();
        let cases = [
            (TypeKind::Long, TypeKind::Double, ArithKind::Double),
            (TypeKind::Float, TypeKind::ULong, ArithKind::Float),
            (TypeKind::ULong, TypeKind::Char, ArithKind::ULong),
            (TypeKind::Short, TypeKind::Char, ArithKind::Long),
        ];
        for (a, b, want) in cases {
            let (_, _, k) = usual_arithmetic_conversion(ident(a.clone(), &env), ident(b.clone(), &env)).unwrap();
            assert_eq!(k, want, "{:?} op {:?}", a, b);
        }
    }

    #[test]
    fn balancing_is_symmetric_in_the_common_kind() {
        let env = Env::global();
        let kinds = [TypeKind::Char, TypeKind::UChar, TypeKind::Short, TypeKind::UShort, TypeKind::Long, TypeKind::ULong, TypeKind::Float, TypeKind::Double];
        for a in &kinds {
            for b in &kinds {
                let (_, _, kab) = usual_arithmetic_conversion(ident(a.clone(), &env), ident(b.clone(), &env)).unwrap();
                let (_, _, kba) = usual_arithmetic_conversion(ident(b.clone(), &env), ident(a.clone(), &env)).unwrap();
                assert_eq!(kab, kba, "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn constants_balance_by_folding() {
        let env = Env::global();
        let (a, b, k) = usual_arithmetic_conversion(TExpr::const_long(3, &env), TExpr::const_double(2.5, &env)).unwrap();
        assert_eq!(k, ArithKind::Double);
        assert_eq!(a.kind, TExprKind::ConstDouble(3.0));
        assert_eq!(b.kind, TExprKind::ConstDouble(2.5));
    }

    #[test]
    fn scalar_conversion_coerces_pointers_in_the_other_operands_scope() {
        let outer = Env::global();
        let inner = outer.nested();
        let p = TExpr { ty: Type::pointer_to(Type::new(TypeKind::Char)), env: inner.clone(), is_lvalue: true, is_const: false, kind: TExprKind::Ident("p".into()) };
        let n = ident(TypeKind::ULong, &outer);
        let (p2, _, k) = usual_scalar_conversion(p, n).unwrap();
        assert_eq!(k, ArithKind::ULong);
        assert!(p2.env.same(&outer));
    }
}
