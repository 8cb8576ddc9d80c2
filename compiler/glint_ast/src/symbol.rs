//! Symbol identity, as resolved by the (external) front-end.
//!
//! A `Symbol` is opaque and distinct from `Name`: two identifiers with the
//! same text in different scopes (shadowing) resolve to different
//! `Symbol`s, while a `Name` is purely textual. The type checker hands
//! codegen nodes that already carry resolved `Symbol`s; codegen never
//! performs its own name resolution.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Symbol(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}
