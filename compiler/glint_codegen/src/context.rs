//! The emission context: everything a per-category generator needs to
//! lower one expression, bundled into a single struct — the
//! builder, the active scope chain, the loop landing-pad stack, and the
//! type resolver. Scope/loop entry goes through the RAII guards in
//! [`crate::scope`] instead of manual push/pop at every call site.

use glint_ast::{ExprArena, StringInterner, Symbol};
use glint_types::Type;

use crate::ir::{BlockId, FunctionId, IrBuilder, ValueId};
use crate::resolver::TypeResolver;
use crate::scope::{LoopGuard, Scope, ScopeBinding, ScopeGuard, ScopeStack};
use crate::value::LoopLandingPad;

pub struct EmissionContext<'a, 'scx, 'ctx, R: TypeResolver> {
    pub builder: &'a mut IrBuilder<'scx, 'ctx>,
    pub arena: &'a ExprArena,
    pub interner: &'a StringInterner,
    pub resolver: &'a R,
    pub current_function: FunctionId,
    /// The function's single exit block. Every `return` branches here
    /// instead of emitting its own `ret`, so the function ends with
    /// exactly one return instruction (a phi over `return_incoming` when
    /// more than one path returns a value).
    epilogue: BlockId,
    return_incoming: Vec<(ValueId, BlockId)>,
    scopes: ScopeStack,
}

impl<'a, 'scx, 'ctx, R: TypeResolver> EmissionContext<'a, 'scx, 'ctx, R> {
    /// `base_scope` seeds the root of the scope stack with every declared
    /// function in the module (see [`crate::module::ModuleAssembler`]),
    /// so a call to a sibling function resolves without this function's
    /// body needing its own notion of "global" bindings.
    pub fn new(
        builder: &'a mut IrBuilder<'scx, 'ctx>,
        arena: &'a ExprArena,
        interner: &'a StringInterner,
        resolver: &'a R,
        current_function: FunctionId,
        epilogue: BlockId,
        base_scope: Scope,
    ) -> Self {
        Self {
            builder,
            arena,
            interner,
            resolver,
            current_function,
            epilogue,
            return_incoming: Vec::new(),
            scopes: ScopeStack::with_base(base_scope),
        }
    }

    #[must_use]
    pub fn epilogue_block(&self) -> BlockId {
        self.epilogue
    }

    /// Record one reachable `return <value>;`'s contribution to the
    /// epilogue phi. The recorded block is the current insertion block —
    /// the caller still owes the branch into the epilogue itself.
    pub fn record_return_value(&mut self, value: ValueId) {
        if let Some(block) = self.builder.current_block() {
            self.return_incoming.push((value, block));
        }
    }

    #[must_use]
    pub fn return_incoming(&self) -> &[(ValueId, BlockId)] {
        &self.return_incoming
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        self.scopes.current()
    }

    pub fn bind(&mut self, symbol: Symbol, binding: ScopeBinding) {
        self.scopes.bind(symbol, binding);
    }

    #[must_use]
    pub fn lookup(&self, symbol: Symbol) -> Option<ScopeBinding> {
        self.scopes.lookup(symbol)
    }

    /// Enter a child lexical scope for the duration of the returned guard.
    #[must_use]
    pub fn enter_scope(&mut self) -> ScopeGuard<'_> {
        ScopeGuard::enter(&mut self.scopes)
    }

    /// Enter a loop landing pad for the duration of the returned guard.
    #[must_use]
    pub fn enter_loop(&mut self, continue_block: BlockId, break_block: BlockId) -> LoopGuard<'_> {
        let pad = LoopLandingPad { continue_block, break_block };
        LoopGuard::enter(&mut self.scopes, pad)
    }

    #[must_use]
    pub fn innermost_loop(&self) -> Option<&LoopLandingPad> {
        self.scopes.innermost_loop()
    }

    pub fn innermost_loop_mut(&mut self) -> Option<&mut LoopLandingPad> {
        self.scopes.innermost_loop_mut()
    }

    #[must_use]
    pub fn is_int_like(&self, ty: &Type) -> bool {
        self.resolver.is_int_like(ty)
    }

    #[must_use]
    pub fn is_number_like(&self, ty: &Type) -> bool {
        self.resolver.is_number_like(ty)
    }
}
