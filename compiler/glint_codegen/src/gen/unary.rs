//! Unary operator lowering. Prefix/postfix
//! increment and decrement read through the operand's l-value, so they
//! only accept assignable operands; everything else accepts r-values.

use glint_ast::{ExprId, ExprKind, UnaryOp};
use glint_types::Type;

use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let node = ctx.arena.get(id);
    let span = node.span;
    let ExprKind::Unary { op, operand } = &node.kind else {
        unreachable!("dispatcher only routes Unary here");
    };
    let (op, operand) = (*op, *operand);

    if op.is_increment_or_decrement() {
        return generate_increment_decrement(ctx, op, operand, span);
    }

    let value = dispatcher::generate_value(ctx, operand)?;
    let ty = value.ty();

    match op {
        UnaryOp::Typeof => Ok(Value::rvalue(value.as_ssa(ctx.builder), Type::Int32)),
        UnaryOp::Plus if ctx.is_number_like(&ty) => Ok(value),
        UnaryOp::Neg if ctx.is_int_like(&ty) => {
            let ssa = value.as_ssa(ctx.builder);
            Ok(Value::rvalue(ctx.builder.neg(ssa, "ineg"), Type::Int32))
        }
        UnaryOp::Neg if ctx.is_number_like(&ty) => {
            let ssa = value.as_ssa(ctx.builder);
            Ok(Value::rvalue(ctx.builder.fneg(ssa, "fneg"), Type::Float64))
        }
        UnaryOp::Not if ctx.resolver.is_bool(&ty) => {
            let ssa = value.as_ssa(ctx.builder);
            let t = ctx.builder.const_bool(true);
            Ok(Value::rvalue(ctx.builder.xor(ssa, t, "lnot"), Type::Bool))
        }
        UnaryOp::BitNot if ctx.is_int_like(&ty) => {
            let ssa = value.as_ssa(ctx.builder);
            let neg_one = ctx.builder.const_i32(-1);
            Ok(Value::rvalue(ctx.builder.xor(ssa, neg_one, "bnot"), Type::Int32))
        }
        _ => Err(CodegenError::UnsupportedUnaryOperator {
            op: op_name(op),
            operand: ty,
            span,
        }),
    }
}

fn generate_increment_decrement<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    op: UnaryOp,
    operand: ExprId,
    span: glint_ast::Span,
) -> Result<Value> {
    let target = dispatcher::generate_value(ctx, operand)?;
    if !target.is_assignable() {
        return Err(CodegenError::ReadOnlyTarget { span });
    }

    let ty = target.ty();
    let before = target.load(ctx.builder);
    let before_ssa = before.as_ssa(ctx.builder);

    let is_increment = matches!(op, UnaryOp::PreInc | UnaryOp::PostInc);
    let after_ssa = match ty {
        Type::Int32 => {
            let one = ctx.builder.const_i32(1);
            if is_increment {
                ctx.builder.add(before_ssa, one, "inc")
            } else {
                ctx.builder.sub(before_ssa, one, "dec")
            }
        }
        Type::Float64 => {
            let one = ctx.builder.const_f64(1.0);
            if is_increment {
                ctx.builder.fadd(before_ssa, one, "finc")
            } else {
                ctx.builder.fsub(before_ssa, one, "fdec")
            }
        }
        _ => {
            return Err(CodegenError::UnsupportedUnaryOperator {
                op: op_name(op),
                operand: ty,
                span,
            })
        }
    };

    target.store(ctx.builder, after_ssa, span)?;

    let result_ssa = if op.is_prefix() { after_ssa } else { before_ssa };
    Ok(Value::rvalue(result_ssa, ty))
}

fn op_name(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Plus => "+",
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::PreInc | UnaryOp::PostInc => "++",
        UnaryOp::PreDec | UnaryOp::PostDec => "--",
        UnaryOp::Typeof => "typeof",
    }
}
