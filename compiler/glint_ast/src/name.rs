//! Interned string identifiers.

use std::fmt;
use rustc_hash::FxHashMap;

/// Interned string identifier. Cheap to copy, compare and hash.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string, always index 0.
    pub const EMPTY: Name = Name(0);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Interns strings to [`Name`] handles; owns the backing storage.
///
/// A `Vec<Box<str>>` for reverse lookup plus a map for dedup on
/// insertion.
#[derive(Default)]
pub struct StringInterner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Name>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            lookup: FxHashMap::default(),
        };
        interner.intern("");
        interner
    }

    /// Intern a string, returning its stable `Name`. Repeated interning of
    /// the same text returns the same `Name`.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.lookup.get(s) {
            return name;
        }
        let idx = u32::try_from(self.strings.len()).expect("interner overflow");
        let name = Name::from_raw(idx);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, name);
        name
    }

    /// Resolve a `Name` back to its text. Panics if the name was not
    /// produced by this interner.
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.raw() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_dedups() {
        let mut interner = StringInterner::new();
        let a = interner.intern("add");
        let b = interner.intern("add");
        let c = interner.intern("sub");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.lookup(a), "add");
    }

    #[test]
    fn empty_is_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }
}
