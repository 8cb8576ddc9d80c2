//! Local variable declarations — every declared
//! local is a stack slot, uninitialized scalars get the language-defined
//! zero value.

use glint_ast::{ExprId, ExprKind};
use glint_types::Type;

use crate::dispatcher;
use crate::error::Result;
use crate::resolver::TypeResolver;
use crate::scope::ScopeBinding;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<()> {
    let node = ctx.arena.get(id);
    let ExprKind::VarDecl { symbol, ty, init } = &node.kind else {
        unreachable!("dispatcher only routes VarDecl here");
    };
    let (symbol, ty, init) = (*symbol, ty.clone(), *init);

    let llvm_ty = ctx.builder.lower_type(&ty);
    let ptr = ctx.builder.alloca(llvm_ty, "local");

    let initial = match init {
        Some(init_id) => {
            let value = dispatcher::generate_value(ctx, init_id)?;
            let raw = value.as_ssa(ctx.builder);
            if ty == Type::Float64 && value.ty() == Type::Int32 {
                ctx.builder.si_to_fp(raw, "coerce_init")
            } else {
                raw
            }
        }
        None => zero_value(ctx, &ty),
    };
    ctx.builder.store(initial, ptr);

    ctx.bind(symbol, ScopeBinding::Mutable { ptr, llvm_ty, ty });
    Ok(())
}

fn zero_value<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, ty: &Type) -> crate::ir::ValueId {
    match ty {
        Type::Int32 => ctx.builder.const_i32(0),
        Type::Float64 => ctx.builder.const_f64(0.0),
        Type::Bool => ctx.builder.const_bool(false),
        Type::Object | Type::Array(_) | Type::Function(_) => {
            let zero = ctx.builder.const_i32(0);
            ctx.builder.int_to_ptr(zero, "null_ref")
        }
        Type::Void => unreachable!("a void-typed local cannot be declared"),
    }
}
