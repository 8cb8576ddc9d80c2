//! The type-resolver boundary.
//!
//! Wraps the front-end type checker: the codegen core never infers or
//! checks types itself, it only queries this trait. A real compiler
//! implements `TypeResolver` over its checker's symbol table and type
//! pool; tests implement it over a small fixture map.

use glint_ast::{ExprId, Symbol};
use glint_types::{FunctionType, Type};

pub trait TypeResolver {
    /// The static type the checker assigned to this node.
    fn type_of(&self, node: ExprId) -> Type;

    /// The resolved symbol identity of an identifier node. Panics (a
    /// resolver bug, not a codegen bug) if called on a non-identifier.
    fn symbol_of(&self, node: ExprId) -> Symbol;

    /// The signature of a callable node (a function reference or a
    /// callee expression whose type is `Type::Function`).
    fn signature_of(&self, node: ExprId) -> FunctionType;

    /// `int32 ⊂ number_like`: callers must test this *before*
    /// `is_number_like`.
    fn is_int_like(&self, ty: &Type) -> bool {
        ty.is_int_like()
    }

    fn is_number_like(&self, ty: &Type) -> bool {
        ty.is_number_like()
    }

    fn is_bool(&self, ty: &Type) -> bool {
        ty.is_bool()
    }

    fn is_ref(&self, ty: &Type) -> bool {
        ty.is_ref()
    }
}
