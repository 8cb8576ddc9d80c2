//! The code generator's error taxonomy.
//!
//! Every variant carries the span of the offending node. Errors are
//! raised at the deepest point of detection and propagate via `Result`;
//! the [`crate::module::ModuleAssembler`] aggregates them per function —
//! one malformed function does not abort the others.

use glint_ast::Span;
use glint_types::Type;

#[derive(Clone, Debug, thiserror::Error)]
pub enum CodegenError {
    /// No code-generator registered for this syntactic category.
    #[error("no code generator registered for `{category}` at {span:?}")]
    UnsupportedSyntacticCategory { category: &'static str, span: Span },
    /// Operand types not accepted by this binary operator.
    #[error("operator `{op}` does not accept operands of type {left:?} and {right:?} at {span:?}")]
    UnsupportedBinaryOperator {
        op: &'static str,
        left: Type,
        right: Type,
        span: Span,
    },
    /// Operand type not accepted by this unary operator.
    #[error("operator `{op}` does not accept an operand of type {operand:?} at {span:?}")]
    UnsupportedUnaryOperator { op: &'static str, operand: Type, span: Span },
    /// Assignment or argument coercion failed.
    #[error("type mismatch: expected {expected:?}, found {found:?} at {span:?}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        span: Span,
    },
    /// Assignment to a non-assignable `Value`.
    #[error("cannot assign to a non-assignable value at {span:?}")]
    ReadOnlyTarget { span: Span },
    /// Identifier without a bound slot — indicates an upstream resolver bug.
    #[error("identifier has no bound storage slot at {span:?} (resolver bug)")]
    UnresolvedSymbol { span: Span },
    /// `break` / `continue` / `return` in an illegal position.
    #[error("`{keyword}` outside any enclosing loop or switch at {span:?}")]
    UnstructuredControlFlow { keyword: &'static str, span: Span },
    /// The SSA verifier rejected the emitted function.
    #[error("function `{function}` failed SSA verification: {reason}")]
    MalformedFunction { function: String, reason: String },
    /// Two references to the same extern name disagree on signature.
    #[error("extern `{name}` re-declared with an incompatible signature")]
    ExternSignatureConflict { name: String },
}

pub type Result<T> = std::result::Result<T, CodegenError>;
