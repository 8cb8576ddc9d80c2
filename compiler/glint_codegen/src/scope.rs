//! Lexical scoping for the emission context.
//!
//! An `im::HashMap` gives child scopes O(1) structural-sharing clones, so
//! entering an `if`/`while`/`for` body never walks or copies the parent's
//! bindings. The RAII guards around scope/loop entry save and restore
//! these stacks automatically, rather than at every call site by hand —
//! a guard makes the restore happen on every exit path (including
//! `?`-propagated errors) without relying on each lowering function to
//! remember it.

use im::HashMap;

use glint_ast::Symbol;
use glint_types::FunctionType;

use crate::ir::FunctionId;
use crate::value::LoopLandingPad;

/// How a symbol is bound in scope — a local variable's storage, or a
/// declared function's callable identity.
#[derive(Clone, Debug)]
pub enum ScopeBinding {
    /// SSA value in a virtual register.
    Immutable(crate::ir::ValueId),
    /// Stack slot — every `var` local and parameter is given one
    /// uniformly, so in practice this is the only variant produced by
    /// the function compiler; `Immutable` remains available for
    /// compiler-introduced temporaries that are never reassigned.
    Mutable {
        ptr: crate::ir::ValueId,
        llvm_ty: crate::ir::LLVMTypeId,
        ty: glint_types::Type,
    },
    /// A declared (compiled) function, bound into the module-level base
    /// scope every function body is lowered against — this is what lets
    /// an identifier referencing a function name resolve to a callable
    /// [`crate::value::Value::FunctionRef`].
    Function { func: FunctionId, sig: FunctionType },
}

#[derive(Clone, Default)]
pub struct Scope {
    bindings: HashMap<Symbol, ScopeBinding>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    #[must_use]
    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn bind(&mut self, symbol: Symbol, binding: ScopeBinding) {
        self.bindings.insert(symbol, binding);
    }

    #[must_use]
    pub fn lookup(&self, symbol: Symbol) -> Option<ScopeBinding> {
        self.bindings.get(&symbol).cloned()
    }
}

/// The stack of enclosing lexical scopes and loop landing pads carried by
/// [`crate::context::EmissionContext`]. Kept as its own struct so the RAII
/// guards below can borrow it independently of the rest of the context.
#[derive(Default)]
pub struct ScopeStack {
    current: Scope,
    loop_stack: Vec<LoopLandingPad>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self { current: Scope::new(), loop_stack: Vec::new() }
    }

    /// Start from a pre-populated base scope (the module-level function
    /// bindings) instead of an empty one — this is the root of the
    /// stack, not a pushed child, so it is never restored away.
    #[must_use]
    pub fn with_base(base: Scope) -> Self {
        Self { current: base, loop_stack: Vec::new() }
    }

    #[must_use]
    pub fn current(&self) -> &Scope {
        &self.current
    }

    pub fn bind(&mut self, symbol: Symbol, binding: ScopeBinding) {
        self.current.bind(symbol, binding);
    }

    #[must_use]
    pub fn lookup(&self, symbol: Symbol) -> Option<ScopeBinding> {
        self.current.lookup(symbol)
    }

    #[must_use]
    pub fn innermost_loop(&self) -> Option<&LoopLandingPad> {
        self.loop_stack.last()
    }

    pub fn innermost_loop_mut(&mut self) -> Option<&mut LoopLandingPad> {
        self.loop_stack.last_mut()
    }
}

/// Enters a child scope on construction, restores the parent on drop.
pub struct ScopeGuard<'a> {
    stack: &'a mut ScopeStack,
    parent: Scope,
}

impl<'a> ScopeGuard<'a> {
    pub fn enter(stack: &'a mut ScopeStack) -> Self {
        let parent = stack.current.clone();
        stack.current = stack.current.child();
        Self { stack, parent }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.stack.current = std::mem::take(&mut self.parent);
    }
}

/// Pushes a loop landing pad on construction, pops it on drop — so a
/// `break`/`continue` that exits via `?` still leaves the stack balanced.
pub struct LoopGuard<'a> {
    stack: &'a mut ScopeStack,
}

impl<'a> LoopGuard<'a> {
    pub fn enter(stack: &'a mut ScopeStack, pad: LoopLandingPad) -> Self {
        stack.loop_stack.push(pad);
        Self { stack }
    }

    /// The accumulated break values, consumed once the loop body is done
    /// and its exit block is about to be sealed.
    #[must_use]
    pub fn pad(&self) -> &LoopLandingPad {
        self.stack.loop_stack.last().expect("LoopGuard invariant: pad present while guard is alive")
    }
}

impl Drop for LoopGuard<'_> {
    fn drop(&mut self) {
        self.stack.loop_stack.pop();
    }
}
