//! Shared helper for calling into the runtime ABI from the
//! per-category generators.

use glint_types::Type;

use crate::ir::ValueId;
use crate::resolver::TypeResolver;
use crate::EmissionContext;

/// Declare (idempotently) and call a runtime extern by its stable name.
/// Panics if `name` is not present in [`glint_rt_abi::all`] — that would
/// be a bug in a generator, not a user-facing error.
pub fn call_extern<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    name: &str,
    args: &[ValueId],
) -> Option<ValueId> {
    let sig = glint_rt_abi::all()
        .into_iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("unknown runtime extern `{name}`"));

    let param_ids: Vec<_> = sig.params.iter().map(|t| ctx.builder.lower_type(t)).collect();
    let ret_id = sig.ret.as_ref().map(|t| ctx.builder.lower_type(t));

    let func = ctx.builder.declare_extern_function(name, &param_ids, ret_id);
    ctx.builder.call(func, args, name)
}

/// The lattice type a runtime extern returns, defaulting to `Void` for
/// extern calls with no return value (traps).
pub fn return_type(name: &str) -> Type {
    glint_rt_abi::all()
        .into_iter()
        .find(|e| e.name == name)
        .and_then(|e| e.ret)
        .unwrap_or(Type::Void)
}
