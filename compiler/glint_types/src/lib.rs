//! The static type lattice classified by the (external) front-end type
//! checker and consumed by the code generator.
//!
//! This crate is deliberately tiny: it owns only the *representation* of
//! the lattice, not the checker that produces it. The checker itself —
//! symbol resolution, inference, structural typing — is an external
//! collaborator (see `glint_codegen::resolver` for the boundary trait the
//! codegen core assumes).

#![allow(clippy::module_name_repetitions)]

use std::fmt;

/// One leaf of the type lattice every expression is classified into.
///
/// `int_like` is a strict subset of `number_like`: callers that dispatch
/// on numeric kind must test `is_int_like` *before* `is_number_like` or
/// an `int32` value will incorrectly take the float path.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum Type {
    Int32,
    Float64,
    Bool,
    Void,
    /// Tagged pointer to a heap object owned by the runtime.
    Object,
    /// Fat pointer (or runtime handle) to an array of the given element
    /// type. Element types are restricted to the scalar/ref leaves.
    Array(Box<Type>),
    /// A callable value: parameter types plus return type. First-class
    /// only in the limited positions the surface language allows (direct
    /// calls, not stored in arbitrary l-values).
    Function(FunctionType),
}

/// Parameter and return types of a callable, independent of how it's
/// eventually passed at the ABI level (that's `glint_codegen::abi`'s job).
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct FunctionType {
    pub params: Vec<Type>,
    pub ret: Box<Type>,
}

impl Type {
    /// `int32 ⊂ number_like`; this predicate alone does not distinguish
    /// `int32` from `float64` — see the ordering rule on `is_int_like`.
    #[must_use]
    pub fn is_number_like(&self) -> bool {
        matches!(self, Type::Int32 | Type::Float64)
    }

    /// True only for the explicitly-annotated 32-bit integer type.
    #[must_use]
    pub fn is_int_like(&self) -> bool {
        matches!(self, Type::Int32)
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    #[must_use]
    pub fn is_ref(&self) -> bool {
        matches!(self, Type::Object | Type::Array(_))
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int32 => write!(f, "int32"),
            Type::Float64 => write!(f, "float64"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Object => write!(f, "ref(object)"),
            Type::Array(elem) => write!(f, "ref(array<{elem:?}>)"),
            Type::Function(sig) => {
                write!(f, "fn(")?;
                for (i, p) in sig.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p:?}")?;
                }
                write!(f, ") -> {:?}", sig.ret)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_like_is_number_like() {
        assert!(Type::Int32.is_int_like());
        assert!(Type::Int32.is_number_like());
    }

    #[test]
    fn float_is_number_like_not_int_like() {
        assert!(Type::Float64.is_number_like());
        assert!(!Type::Float64.is_int_like());
    }

    #[test]
    fn bool_and_void_are_neither() {
        for t in [Type::Bool, Type::Void] {
            assert!(!t.is_number_like());
            assert!(!t.is_int_like());
        }
    }

    #[test]
    fn array_and_object_are_ref() {
        assert!(Type::Object.is_ref());
        assert!(Type::Array(Box::new(Type::Int32)).is_ref());
        assert!(!Type::Int32.is_ref());
    }
}
