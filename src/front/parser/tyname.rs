// ----------------------------
// File: src/front/parser/tyname.rs
// ----------------------------
//! Declaration specifiers, type-names and (simple) declarators.

use super::*;
use crate::front::semantics::types::{Quals, Type, TypeKind};
use crate::front::token::TokenKind as K;

/// Accumulated declaration-specifier state.
#[derive(Default)]
struct SpecSet {
    void: bool,
    char_: bool,
    int_: bool,
    float_: bool,
    double_: bool,
    short_: bool,
    long_: bool,
    signed_: Option<bool>, // Some(true)=signed, Some(false)=unsigned
    quals: Quals,
}

impl<'a> Parser<'a> {
    pub fn is_type_start(&mut self) -> PResult<bool> {
        self.is_type_start_at(0)
    }

    pub fn is_type_start_at(&mut self, n: usize) -> PResult<bool> {
        Ok(matches!(
            self.ts.peek(n)?.kind,
            K::Void | K::Char | K::Short | K::Int | K::Long | K::Signed | K::Unsigned
                | K::Float | K::Double | K::Const | K::Volatile
        ))
    }

    /// type-name: specifier-qualifier run plus an abstract declarator
    /// (pointer levels only, as in a cast).
    pub fn parse_type_name(&mut self) -> PResult<Type> {
        let base = self.parse_specifiers()?;
        self.parse_pointer_suffix(base)
    }

    /// `specifiers declarator ;` — one named object declaration.
    pub fn parse_decl(&mut self) -> PResult<Decl> {
        let base = self.parse_specifiers()?;
        let ty = self.parse_pointer_suffix(base)?;
        let t = self.ts.expect_kind(K::Ident)?;
        let ty = self.parse_array_suffix(ty)?;
        Ok(Decl { name: t.lexeme, ty, span: t.span })
    }

    fn parse_specifiers(&mut self) -> PResult<Type> {
        let mut s = SpecSet::default();
        let first = self.ts.peek(0)?.span;
        loop {
            let t = self.ts.peek(0)?.clone();
            match t.kind {
                K::Void => { s.void = true; }
                K::Char => { s.char_ = true; }
                K::Int => { s.int_ = true; }
                K::Float => { s.float_ = true; }
                K::Double => { s.double_ = true; }
                K::Short => { s.short_ = true; }
                K::Long => { s.long_ = true; }
                K::Signed => { s.signed_ = Some(true); }
                K::Unsigned => { s.signed_ = Some(false); }
                K::Const => { s.quals.is_const = true; }
                K::Volatile => { s.quals.is_volatile = true; }
                _ => break,
            }
            let _ = self.ts.bump()?;
        }
        self.resolve_specifiers(s, first)
    }

    fn resolve_specifiers(&mut self, s: SpecSet, span: crate::front::token::Span) -> PResult<Type> {
        let unsigned = s.signed_ == Some(false);
        let kind = if s.void {
            if s.char_ || s.int_ || s.float_ || s.double_ || s.short_ || s.long_ || s.signed_.is_some() {
                return self.error(span, "invalid type specifier combination with 'void'");
            }
            TypeKind::Void
        } else if s.char_ {
            if s.int_ || s.float_ || s.double_ || s.short_ || s.long_ {
                return self.error(span, "invalid type specifier combination with 'char'");
            }
            if unsigned { TypeKind::UChar } else { TypeKind::Char }
        } else if s.float_ {
            if s.int_ || s.double_ || s.short_ || s.long_ || s.signed_.is_some() {
                return self.error(span, "invalid type specifier combination with 'float'");
            }
            TypeKind::Float
        } else if s.double_ {
            if s.int_ || s.short_ || s.signed_.is_some() {
                return self.error(span, "invalid type specifier combination with 'double'");
            }
            if s.long_ {
                return self.error(span, "'long double' is not supported on this target");
            }
            TypeKind::Double
        } else if s.short_ {
            if s.long_ { return self.error(span, "invalid type: short long"); }
            if unsigned { TypeKind::UShort } else { TypeKind::Short }
        } else if s.int_ || s.long_ || s.signed_.is_some() {
            // int, long, signed, unsigned all denote the 32-bit word on i386
            if unsigned { TypeKind::ULong } else { TypeKind::Long }
        } else {
            return self.error(span, "expected type specifier");
        };
        Ok(Type::with_quals(kind, s.quals))
    }

    /// Zero or more `* [const] [volatile]` levels wrapping `base`.
    fn parse_pointer_suffix(&mut self, base: Type) -> PResult<Type> {
        let mut ty = base;
        while self.ts.matches(K::Star)? {
            let mut quals = Quals::default();
            loop {
                if self.ts.matches(K::Const)? { quals.is_const = true; continue; }
                if self.ts.matches(K::Volatile)? { quals.is_volatile = true; continue; }
                break;
            }
            ty = Type::with_quals(TypeKind::Pointer(Box::new(ty)), quals);
        }
        Ok(ty)
    }

    /// Zero or more `[N]` / `[]` suffixes; `[]` yields an incomplete array.
    fn parse_array_suffix(&mut self, elem: Type) -> PResult<Type> {
        let mut dims: Vec<Option<usize>> = Vec::new();
        while self.ts.matches(K::LBracket)? {
            if self.ts.matches(K::RBracket)? {
                dims.push(None);
                continue;
            }
            let t = self.ts.expect_kind(K::IntLit)?;
            let n: usize = t.lexeme.parse().map_err(|_| ParseError::new(t.span, "array length must be a decimal integer"))?;
            if n == 0 { return self.error(t.span, "zero-sized arrays are not allowed in C89"); }
            let _ = self.ts.expect_kind(K::RBracket)?;
            dims.push(Some(n));
        }
        // innermost dimension binds last
        let mut ty = elem;
        for d in dims.into_iter().rev() {
            ty = match d {
                Some(n) => Type::new(TypeKind::Array(Box::new(ty), n)),
                None => Type::new(TypeKind::IncompleteArray(Box::new(ty))),
            };
        }
        Ok(ty)
    }
}
