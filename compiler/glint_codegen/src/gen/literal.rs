//! Literal constants.

use glint_ast::{ExprId, ExprKind};
use glint_types::Type;

use crate::error::Result;
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let node = ctx.arena.get(id);
    match &node.kind {
        ExprKind::IntLiteral(&n) => {
            let ssa = ctx.builder.const_i32(n);
            Ok(Value::rvalue(ssa, Type::Int32))
        }
        ExprKind::FloatLiteral(&n) => {
            let ssa = ctx.builder.const_f64(n);
            Ok(Value::rvalue(ssa, Type::Float64))
        }
        ExprKind::BoolLiteral(&b) => {
            let ssa = ctx.builder.const_bool(b);
            Ok(Value::rvalue(ssa, Type::Bool))
        }
        ExprKind::StringLiteral(&name) => {
            let text = ctx.interner.lookup(name).to_owned();
            let ssa = crate::gen::object::emit_string_new(ctx, &text);
            Ok(Value::rvalue(ssa, Type::Object))
        }
        _ => unreachable!("dispatcher only routes literal kinds here"),
    }
}
