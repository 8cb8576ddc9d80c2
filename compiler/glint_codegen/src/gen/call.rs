//! Call expressions. Arguments are evaluated
//! strictly left to right before the call is emitted, and each is
//! widened from `int32` to `float64` when the callee's declared
//! parameter type demands it (narrowing is never inserted implicitly).

use glint_ast::{ExprId, ExprKind};
use glint_types::Type;

use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Option<Value>> {
    let node = ctx.arena.get(id);
    let span = node.span;
    let ExprKind::Call { callee, args } = node.kind.clone() else {
        unreachable!("dispatcher only routes Call here");
    };

    let callee_value = dispatcher::generate_value(ctx, callee)?;
    let sig = callee_value.signature(span)?;

    if args.len() != sig.params.len() {
        return Err(CodegenError::TypeMismatch {
            expected: Type::Function(sig.clone()),
            found: Type::Void,
            span,
        });
    }

    let mut arg_ssas = Vec::with_capacity(args.len());
    for (arg_id, param_ty) in args.iter().zip(sig.params.iter()) {
        let arg = dispatcher::generate_value(ctx, *arg_id)?;
        let arg_ty = arg.ty();
        let ssa = arg.as_ssa(ctx.builder);

        let coerced = if &arg_ty == param_ty {
            ssa
        } else if *param_ty == Type::Float64 && arg_ty == Type::Int32 {
            ctx.builder.si_to_fp(ssa, "widen_arg")
        } else {
            return Err(CodegenError::TypeMismatch {
                expected: param_ty.clone(),
                found: arg_ty,
                span,
            });
        };
        arg_ssas.push(coerced);
    }

    let result = callee_value.emit_call(ctx.builder, &arg_ssas, "call");
    Ok(result.map(|ssa| Value::rvalue(ssa, (*sig.ret).clone())))
}
