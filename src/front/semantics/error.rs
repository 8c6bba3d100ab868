// ----------------------------
// File: src/front/semantics/error.rs
// ----------------------------

use thiserror::Error;

use super::types::Type;

/// Errors raised by the semantic core. All are fatal for the expression in
/// which they occur; recovery happens at the next statement boundary.
#[derive(Debug, Clone, Error)]
pub enum SemError {
    #[error("expression of type '{0}' cannot be converted")]
    UnsupportedSource(Type),

    #[error("no conversion from '{0}' to '{1}'")]
    UnsupportedConversion(Type, Type),

    #[error("function of type '{found}' cannot be converted to pointer to '{want}'")]
    IncompatibleFunctionPointer { found: Type, want: Type },

    #[error("integral promotion applied to non-integral type '{0}'")]
    NonIntegralPromotion(Type),

    #[error("invalid type: {0}")]
    InvalidType(String),

    #[error("invalid operand of type '{ty}' to '{op}'")]
    InvalidOperand { op: &'static str, ty: Type },

    #[error("'{name}' undeclared")]
    Undeclared { name: String },
}
