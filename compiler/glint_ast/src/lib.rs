//! Typed-AST node definitions for the glint code generator.
//!
//! Everything in this crate is produced by an external front-end type
//! checker, not implemented here: fully resolved symbols, fully assigned
//! types, and a fixed set of syntactic categories restricted to the
//! compilable subset of the language.

mod ast;
mod name;
mod span;
mod symbol;

pub use ast::{
    BinaryOp, ExprArena, ExprId, ExprKind, Function, Node, Param, UnaryOp,
};
pub use name::{Name, StringInterner};
pub use span::Span;
pub use symbol::Symbol;
