// End-to-end tests: parse C89 expression statements, elaborate them and
// inspect the typed trees, folded constants and emitted cast chains.

use cc386::back::{emit_cast_chain, Reg, X86Emitter};
use cc386::front::parser::{Item, Parser};
use cc386::front::semantics::{CastOp, Elaborator, TExpr, TExprKind, TypeKind};

/// Run a program of declarations and expression statements; return the
/// typed form of the last expression.
fn elab_last(src: &str) -> Result<TExpr, String> {
    let mut parser = Parser::new(src, "test.c");
    let items = parser.parse_program().map_err(|e| e.msg)?;
    let mut elab = Elaborator::new();
    let mut last = None;
    for item in items {
        match item {
            Item::Decl(d) => elab.declare(&d.name, d.ty, d.span).map_err(|diag| diag.msg)?,
            Item::Expr(e) => last = Some(elab.elab(&e).map_err(|diag| diag.msg)?),
        }
    }
    last.ok_or_else(|| "no expression in program".into())
}

fn elab_ok(src: &str) -> TExpr {
    elab_last(src).unwrap_or_else(|m| panic!("elaboration of {:?} failed: {}", src, m))
}

#[test]
fn explicit_narrowing_casts_fold() {
    let e = elab_ok("(char)257;");
    assert_eq!(e.kind, TExprKind::ConstLong(1));
    assert!(matches!(e.ty.kind, TypeKind::Char));

    let e = elab_ok("(char)-1;");
    assert_eq!(e.kind, TExprKind::ConstLong(-1));

    let e = elab_ok("(unsigned short)0xffffffffu;");
    assert_eq!(e.kind, TExprKind::ConstULong(0xFFFF));
}

#[test]
fn widening_a_short_variable_to_double_needs_two_primitives() {
    let e = elab_ok("short x; (double)x;");
    assert_eq!(e.cast_chain(), vec![CastOp::Int16ToInt32, CastOp::Int32ToDouble]);
    assert!(matches!(e.ty.kind, TypeKind::Double));
    assert!(!e.is_lvalue);
}

#[test]
fn float_to_unsigned_char_is_rejected() {
    let err = elab_last("float f; (unsigned char)f;").unwrap_err();
    assert!(err.contains("no conversion"), "unexpected message: {}", err);
}

#[test]
fn usual_arithmetic_conversion_balances_literals() {
    let e = elab_ok("3 + 2.5;");
    assert_eq!(e.kind, TExprKind::ConstDouble(5.5));

    let e = elab_ok("1u + 2;");
    assert_eq!(e.kind, TExprKind::ConstULong(3));

    let e = elab_ok("1 << 4;");
    assert_eq!(e.kind, TExprKind::ConstLong(16));
}

#[test]
fn small_integer_operands_promote_to_the_word() {
    let e = elab_ok("char c; c + 1;");
    assert!(matches!(e.ty.kind, TypeKind::Long));
    let TExprKind::Binary(_, lhs, _) = &e.kind else { panic!("expected a binary node") };
    assert_eq!(lhs.cast_chain(), vec![CastOp::Int8ToInt32]);
}

#[test]
fn comparisons_against_pointers_use_the_scalar_conversion() {
    let e = elab_ok("char *p; p == 0;");
    assert!(matches!(e.ty.kind, TypeKind::Long));
}

#[test]
fn pointers_convert_to_integers_through_ulong() {
    let e = elab_ok("char *p; (unsigned long)p;");
    assert_eq!(e.cast_chain(), vec![CastOp::Nop]);
    assert!(matches!(e.ty.kind, TypeKind::ULong));

    let e = elab_ok("char *p; (short)p;");
    assert_eq!(e.cast_chain(), vec![CastOp::Nop, CastOp::PreserveInt16]);
}

#[test]
fn the_null_pointer_constant_folds() {
    let e = elab_ok("(char *)0;");
    assert_eq!(e.kind, TExprKind::ConstPtr(0));
    let TypeKind::Pointer(referent) = &e.ty.kind else { panic!("expected a pointer type") };
    assert!(matches!(referent.kind, TypeKind::Char));
}

#[test]
fn arrays_decay_to_element_pointers() {
    let e = elab_ok("long a[4]; a + 1;");
    let TypeKind::Pointer(referent) = &e.ty.kind else { panic!("expected a pointer type") };
    assert!(matches!(referent.kind, TypeKind::Long));
}

#[test]
fn sizeof_yields_unsigned_long_constants() {
    let e = elab_ok("sizeof(double);");
    assert_eq!(e.kind, TExprKind::ConstULong(8));
    assert!(matches!(e.ty.kind, TypeKind::ULong));

    let e = elab_ok("short s[3]; sizeof s;");
    assert_eq!(e.kind, TExprKind::ConstULong(6));

    let e = elab_ok("sizeof(char *);");
    assert_eq!(e.kind, TExprKind::ConstULong(4));
}

#[test]
fn assignment_converts_the_right_hand_side() {
    let e = elab_ok("int x; x = 2.5;");
    let TExprKind::Assign(_, rhs) = &e.kind else { panic!("expected an assignment") };
    assert_eq!(rhs.kind, TExprKind::ConstLong(2));
    assert!(!e.is_lvalue);
}

#[test]
fn constant_conditions_select_their_arm() {
    let e = elab_ok("1 ? 3 : 4;");
    assert_eq!(e.kind, TExprKind::ConstLong(3));

    let e = elab_ok("0 ? 3.0 : 4;");
    assert_eq!(e.kind, TExprKind::ConstDouble(4.0));
}

#[test]
fn char_literals_are_ints() {
    let e = elab_ok("-'0';");
    assert_eq!(e.kind, TExprKind::ConstLong(-48));
    assert!(matches!(e.ty.kind, TypeKind::Long));
}

#[test]
fn division_by_zero_stays_a_runtime_expression() {
    let e = elab_ok("1 / 0;");
    assert!(!e.is_const);
    assert!(matches!(e.kind, TExprKind::Binary(..)));
}

#[test]
fn undeclared_identifiers_are_diagnosed() {
    let err = elab_last("y + 1;").unwrap_err();
    assert!(err.contains("undeclared"), "unexpected message: {}", err);
}

#[test]
fn emitted_assembly_truncates_floats_via_the_fpu() {
    let e = elab_ok("float g; (long)g;");
    assert_eq!(e.cast_chain(), vec![CastOp::FloatToInt32]);
    let mut em = X86Emitter::new();
    let reg = emit_cast_chain(&e, &mut em);
    assert_eq!(reg, Reg::Gpr);
    let text = em.finish();
    assert!(text.contains("fistpl (%esp)"));
    assert!(text.contains("orl $0x0c00, %eax"));
}

#[test]
fn qualified_declarations_keep_their_qualifiers() {
    let e = elab_ok("const char c; c + 0;");
    let TExprKind::Binary(_, lhs, _) = &e.kind else { panic!("expected a binary node") };
    assert!(lhs.ty.quals.is_const);
    assert!(matches!(lhs.ty.kind, TypeKind::Long));
}
