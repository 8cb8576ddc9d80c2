//! The Function Compiler: orchestrates compilation of a single annotated
//! function — prologue, parameter materialization, body lowering via the
//! dispatcher, epilogue, verification.
//!
//! Split into [`declare`] and [`define`] rather than one combined step:
//! [`crate::module::ModuleAssembler`] declares every candidate function's
//! signature before defining any body, so a forward reference or a
//! mutually-recursive call resolves to a real `FunctionId` regardless of
//! source order.

use glint_ast::{ExprArena, Function, StringInterner};
use glint_types::Type;

use crate::context::EmissionContext;
use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::ir::{FunctionId, IrBuilder};
use crate::resolver::TypeResolver;
use crate::scope::{Scope, ScopeBinding};

/// Create the SSA function symbol for `function`, lowering its declared
/// parameter and return types. Does not touch the body.
pub fn declare(builder: &mut IrBuilder<'_, '_>, interner: &StringInterner, function: &Function) -> FunctionId {
    let name = interner.lookup(function.name);
    let param_types: Vec<_> = function.params.iter().map(|p| builder.lower_type(&p.ty)).collect();

    if function.ret.is_void() {
        builder.declare_void_function(name, &param_types)
    } else {
        let ret_type = builder.lower_type(&function.ret);
        builder.declare_function(name, &param_types, ret_type)
    }
}

/// Lower `function`'s body into the already-declared `func_id`: entry
/// block, parameter slots (every parameter is a stack slot, uniformly
/// mutable), the body itself via the dispatcher, the epilogue, and the
/// SSA verifier. `base_scope` is the module-level scope binding every
/// declared function's symbol to its callable [`ScopeBinding::Function`],
/// shared read-only by every function compiled in this module.
#[tracing::instrument(skip_all, fields(function = %interner.lookup(function.name)))]
pub fn define<R: TypeResolver>(
    builder: &mut IrBuilder<'_, '_>,
    arena: &ExprArena,
    interner: &StringInterner,
    resolver: &R,
    func_id: FunctionId,
    function: &Function,
    base_scope: &Scope,
) -> Result<()> {
    builder.set_current_function(func_id);
    let entry = builder.append_block(func_id, "entry");
    let epilogue = builder.append_block(func_id, "epilogue");
    builder.position_at_end(entry);

    let mut ctx = EmissionContext::new(builder, arena, interner, resolver, func_id, epilogue, base_scope.clone());

    for (index, param) in function.params.iter().enumerate() {
        let llvm_ty = ctx.builder.lower_type(&param.ty);
        let index = u32::try_from(index).expect("parameter count fits u32");
        let raw = ctx.builder.get_param(func_id, index);
        let ptr = ctx.builder.alloca(llvm_ty, "param");
        ctx.builder.store(raw, ptr);
        ctx.bind(param.symbol, ScopeBinding::Mutable { ptr, llvm_ty, ty: param.ty.clone() });
    }

    dispatcher::generate(&mut ctx, function.body)?;

    seal_epilogue(&mut ctx, &function.ret);

    ctx.builder.verify_function(func_id).map_err(|reason| CodegenError::MalformedFunction {
        function: interner.lookup(function.name).to_owned(),
        reason,
    })
}

/// Every `return` branches to the epilogue instead of emitting its own
/// `ret` (see [`EmissionContext::record_return_value`]), so this is the
/// only place in a compiled function that emits a return instruction —
/// `void` functions get `ret void`, `non-void` functions get a phi over
/// every reachable return's value (no phi at all when only one path
/// returns).
///
/// Every control-flow path must still reach a terminator. A `void`
/// function falling off the end of its body branches into the epilogue
/// here; a non-`void` function that does the same has no value to
/// contribute, so the epilogue is left without a terminator and the SSA
/// verifier rejects it as [`CodegenError::MalformedFunction`] — same for
/// a non-`void` function whose body never reaches a `return` at all (the
/// epilogue then has no predecessors and no terminator either).
fn seal_epilogue<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, ret: &Type) {
    let epilogue = ctx.epilogue_block();

    if let Some(block) = ctx.builder.current_block() {
        if !ctx.builder.block_has_terminator(block) && ret.is_void() {
            ctx.builder.br(epilogue);
        }
    }

    ctx.builder.position_at_end(epilogue);

    if ret.is_void() {
        ctx.builder.ret_void();
        return;
    }

    let incoming = ctx.return_incoming().to_vec();
    if incoming.is_empty() {
        return;
    }

    let llvm_ty = ctx.builder.lower_type(ret);
    let value = ctx
        .builder
        .phi_from_incoming(llvm_ty, &incoming, "ret_phi")
        .expect("non-empty incoming always yields a value");
    ctx.builder.ret(value);
}
