//! The Module Assembler: gathers a compilation unit's annotated
//! functions, declares the runtime extern table, drives each function
//! through the [`crate::function_compiler`] in two passes, and reports
//! per-function failures without aborting the rest.
//!
//! The full runtime ABI (`glint_rt_abi::all`) is declared eagerly at
//! assembly start rather than at each call site, so every later reference
//! from a per-category generator (`gen::rt::call_extern`) is a pure
//! lookup. "First reference wins" still holds — "first" is now "first at
//! assembly time" for every name the ABI enumerates.

use rustc_hash::FxHashMap;

use glint_ast::{ExprArena, Function, StringInterner};
use glint_types::{FunctionType, Type};

use crate::error::{CodegenError, Result};
use crate::function_compiler;
use crate::ir::{FunctionId, IrBuilder, ModuleCx};
use crate::resolver::TypeResolver;
use crate::scope::{Scope, ScopeBinding};

/// Tracks the signature each extern name was first declared with. A
/// second registration under the same name with a different signature is
/// `ExternSignatureConflict`. Within the fixed runtime ABI
/// this can never fire in practice — `glint_rt_abi`'s `names_are_unique`
/// test guarantees every name is distinct, and `gen::rt::call_extern`
/// always looks its signature up from that same table — but the table
/// makes that guarantee load-bearing instead of merely assumed.
#[derive(Default)]
pub struct ExternTable {
    declared: FxHashMap<String, (Vec<Type>, Option<Type>)>,
}

impl ExternTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, params: &[Type], ret: Option<Type>) -> Result<()> {
        match self.declared.get(name) {
            Some((p, r)) if p.as_slice() == params && *r == ret => Ok(()),
            Some(_) => Err(CodegenError::ExternSignatureConflict { name: name.to_owned() }),
            None => {
                self.declared.insert(name.to_owned(), (params.to_vec(), ret));
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }
}

/// One function that failed compilation. One malformed function does not
/// abort the others — [`ModuleAssembler::assemble`] keeps going and
/// reports every failure it collects.
#[derive(Debug)]
pub struct FunctionFailure {
    pub function: String,
    pub error: CodegenError,
}

pub struct ModuleAssembler<'scx, 'ctx> {
    builder: IrBuilder<'scx, 'ctx>,
    externs: ExternTable,
}

impl<'scx, 'ctx> ModuleAssembler<'scx, 'ctx> {
    #[must_use]
    pub fn new(cx: &'scx ModuleCx<'ctx>) -> Self {
        let mut builder = IrBuilder::new(cx);
        let mut externs = ExternTable::new();

        for rt_extern in glint_rt_abi::all() {
            externs
                .register(rt_extern.name, rt_extern.params, rt_extern.ret.clone())
                .expect("glint_rt_abi::all() names are unique by construction");
            let param_types: Vec<_> = rt_extern.params.iter().map(|t| builder.lower_type(t)).collect();
            let ret_type = rt_extern.ret.as_ref().map(|t| builder.lower_type(t));
            builder.declare_extern_function(rt_extern.name, &param_types, ret_type);
        }

        Self { builder, externs }
    }

    #[must_use]
    pub fn externs(&self) -> &ExternTable {
        &self.externs
    }

    /// Compile every function `directive_text` marks as a candidate.
    /// Declares every candidate's signature before defining any body
    /// (see [`function_compiler`]), then lowers bodies in `functions`'
    /// order — assembler visitation order is deterministic.
    #[tracing::instrument(skip_all)]
    pub fn assemble<R: TypeResolver>(
        mut self,
        arena: &ExprArena,
        interner: &StringInterner,
        resolver: &R,
        functions: &[Function],
        directive_text: &str,
    ) -> std::result::Result<(IrBuilder<'scx, 'ctx>, Vec<FunctionId>), Vec<FunctionFailure>> {
        let candidates: Vec<&Function> =
            functions.iter().filter(|f| f.is_annotated(interner, directive_text)).collect();
        tracing::debug!(candidates = candidates.len(), "selected annotated functions");

        let declared: Vec<FunctionId> = candidates
            .iter()
            .map(|function| function_compiler::declare(&mut self.builder, interner, function))
            .collect();

        // Bind every declared function's symbol into a shared base scope
        // before any body is lowered, so a call — forward, backward, or
        // mutually recursive — resolves to a real `FunctionId` regardless
        // of source order.
        let mut base_scope = Scope::new();
        for (function, func_id) in candidates.iter().zip(declared.iter()) {
            let sig = FunctionType {
                params: function.params.iter().map(|p| p.ty.clone()).collect(),
                ret: Box::new(function.ret.clone()),
            };
            base_scope.bind(function.symbol, ScopeBinding::Function { func: *func_id, sig });
        }

        let mut compiled = Vec::with_capacity(candidates.len());
        let mut failures = Vec::new();

        for (function, func_id) in candidates.iter().zip(declared) {
            let name = interner.lookup(function.name).to_owned();
            match function_compiler::define(&mut self.builder, arena, interner, resolver, func_id, function, &base_scope) {
                Ok(()) => compiled.push(func_id),
                Err(error) => {
                    tracing::warn!(function = %name, %error, "function failed to compile");
                    failures.push(FunctionFailure { function: name, error });
                }
            }
        }

        if failures.is_empty() {
            Ok((self.builder, compiled))
        } else {
            Err(failures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflicting_signature_is_rejected() {
        let mut externs = ExternTable::new();
        externs.register("glint_rt_array_len", &[Type::Int32], Some(Type::Int32)).unwrap();
        let err = externs
            .register("glint_rt_array_len", &[Type::Float64], Some(Type::Int32))
            .unwrap_err();
        assert!(matches!(err, CodegenError::ExternSignatureConflict { .. }));
    }

    #[test]
    fn repeated_identical_registration_is_idempotent() {
        let mut externs = ExternTable::new();
        externs.register("glint_rt_new_object", &[Type::Int32], Some(Type::Object)).unwrap();
        externs.register("glint_rt_new_object", &[Type::Int32], Some(Type::Object)).unwrap();
        assert!(externs.is_declared("glint_rt_new_object"));
    }

    #[test]
    fn seeding_from_the_runtime_abi_never_conflicts() {
        let mut externs = ExternTable::new();
        for rt_extern in glint_rt_abi::all() {
            externs.register(rt_extern.name, rt_extern.params, rt_extern.ret).unwrap();
        }
    }
}
