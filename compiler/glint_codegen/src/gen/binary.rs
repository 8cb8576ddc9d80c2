//! Binary operator lowering — the emission table and its
//! dispatch-order invariant: `int_like` is tested *before* `number_like`,
//! since `int32 ⊂ number_like` and testing the wider predicate first
//! would silently route integer arithmetic through the float path.

use glint_ast::{BinaryOp, ExprId, ExprKind};
use glint_types::Type;

use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::gen::rt;
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let node = ctx.arena.get(id);
    let span = node.span;
    let ExprKind::Binary { op, left, right } = &node.kind else {
        unreachable!("dispatcher only routes Binary here");
    };
    let (op, left, right) = (*op, *left, *right);

    if op == BinaryOp::Assign {
        return generate_assign(ctx, left, right, span);
    }

    match op {
        BinaryOp::And => return generate_and(ctx, left, right),
        BinaryOp::Or => return generate_or(ctx, left, right),
        BinaryOp::Coalesce => return generate_coalesce(ctx, left, right),
        _ => {}
    }

    // The `x | 0` truncation idiom: a float-typed left operand ORed with
    // literal zero asks for a round-toward-zero conversion to int32, not
    // a bitwise operation.
    if op == BinaryOp::BitOr {
        if let Some(truncated) = try_truncation_idiom(ctx, left, right)? {
            return Ok(truncated);
        }
    }

    let lhs = dispatcher::generate_value(ctx, left)?;
    let rhs = dispatcher::generate_value(ctx, right)?;
    let lhs_ty = lhs.ty();
    let rhs_ty = rhs.ty();

    if ctx.is_int_like(&lhs_ty) && ctx.is_int_like(&rhs_ty) {
        return generate_int_op(ctx, op, lhs, rhs, span);
    }

    if ctx.is_number_like(&lhs_ty) && ctx.is_number_like(&rhs_ty) {
        return generate_float_op(ctx, op, lhs, rhs, span);
    }

    Err(CodegenError::UnsupportedBinaryOperator {
        op: op_name(op),
        left: lhs_ty,
        right: rhs_ty,
        span,
    })
}

fn try_truncation_idiom<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    left: ExprId,
    right: ExprId,
) -> Result<Option<Value>> {
    let is_literal_zero = matches!(ctx.arena.get(right).kind, ExprKind::IntLiteral(0));
    if !is_literal_zero {
        return Ok(None);
    }

    let lhs = dispatcher::generate_value(ctx, left)?;
    if lhs.ty() != Type::Float64 {
        return Ok(None);
    }

    let ssa = lhs.as_ssa(ctx.builder);
    let truncated = ctx.builder.fp_to_si(ssa, "truncate_or_zero");
    Ok(Some(Value::rvalue(truncated, Type::Int32)))
}

fn generate_int_op<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
    span: glint_ast::Span,
) -> Result<Value> {
    let l = lhs.as_ssa(ctx.builder);
    let r = rhs.as_ssa(ctx.builder);
    let b = &mut *ctx.builder;

    let (ssa, ty) = match op {
        BinaryOp::Add => (b.add(l, r, "iadd"), Type::Int32),
        BinaryOp::Sub => (b.sub(l, r, "isub"), Type::Int32),
        BinaryOp::Mul => (b.mul(l, r, "imul"), Type::Int32),
        BinaryOp::Div => (b.sdiv(l, r, "idiv"), Type::Int32),
        BinaryOp::Mod => (b.srem(l, r, "irem"), Type::Int32),
        BinaryOp::FloorDiv => (emit_floor_div(b, l, r), Type::Int32),
        BinaryOp::BitOr => (b.or(l, r, "ior"), Type::Int32),
        BinaryOp::BitAnd => (b.and(l, r, "iand"), Type::Int32),
        BinaryOp::BitXor => (b.xor(l, r, "ixor"), Type::Int32),
        BinaryOp::Shl => (b.shl(l, r, "ishl"), Type::Int32),
        BinaryOp::Shr => (b.ashr(l, r, "iashr"), Type::Int32),
        BinaryOp::UShr => (b.lshr(l, r, "ilshr"), Type::Int32),
        BinaryOp::Lt => (b.icmp_slt(l, r, "ilt"), Type::Bool),
        BinaryOp::Gt => (b.icmp_sgt(l, r, "igt"), Type::Bool),
        BinaryOp::Le => (b.icmp_sle(l, r, "ile"), Type::Bool),
        BinaryOp::Ge => (b.icmp_sge(l, r, "ige"), Type::Bool),
        BinaryOp::StrictEq => (b.icmp_eq(l, r, "ieq"), Type::Bool),
        BinaryOp::StrictNotEq => (b.icmp_ne(l, r, "ine"), Type::Bool),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce | BinaryOp::Assign => {
            unreachable!("short-circuit and assignment are handled before reaching here")
        }
    };

    let _ = span;
    Ok(Value::rvalue(ssa, ty))
}

/// `a // b` for integers: truncating `sdiv` rounds toward zero, but floor
/// division must round toward negative infinity. Correct by subtracting
/// one whenever there's a nonzero remainder whose sign disagrees with the
/// divisor's sign — the xor-of-signs/select trick.
fn emit_floor_div(b: &mut crate::ir::IrBuilder<'_, '_>, l: crate::ir::ValueId, r: crate::ir::ValueId) -> crate::ir::ValueId {
    let zero = b.const_i32(0);
    let one = b.const_i32(1);

    let q = b.sdiv(l, r, "fdiv_q");
    let rem = b.srem(l, r, "fdiv_r");

    let rem_nonzero = b.icmp_ne(rem, zero, "fdiv_rem_nonzero");
    let l_neg = b.icmp_slt(l, zero, "fdiv_l_neg");
    let r_neg = b.icmp_slt(r, zero, "fdiv_r_neg");
    let signs_differ = b.xor(l_neg, r_neg, "fdiv_signs_differ");
    let needs_correction = b.and(rem_nonzero, signs_differ, "fdiv_needs_correction");

    let q_minus_one = b.sub(q, one, "fdiv_q_minus_one");
    b.select(needs_correction, q_minus_one, q, "fdiv_result")
}

fn generate_float_op<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    op: BinaryOp,
    lhs: Value,
    rhs: Value,
    span: glint_ast::Span,
) -> Result<Value> {
    let l = widen_to_float(ctx, lhs);
    let r = widen_to_float(ctx, rhs);
    let b = &mut *ctx.builder;

    let (ssa, ty) = match op {
        BinaryOp::Add => (b.fadd(l, r, "fadd"), Type::Float64),
        BinaryOp::Sub => (b.fsub(l, r, "fsub"), Type::Float64),
        BinaryOp::Mul => (b.fmul(l, r, "fmul"), Type::Float64),
        BinaryOp::Div => (b.fdiv(l, r, "fdiv"), Type::Float64),
        BinaryOp::Mod => (b.frem(l, r, "frem"), Type::Float64),
        BinaryOp::FloorDiv => {
            let q = b.fdiv(l, r, "fdiv_q");
            drop(b);
            let floored = rt::call_extern(ctx, "glint_rt_math_floor", &[q])
                .expect("glint_rt_math_floor returns a value");
            return Ok(Value::rvalue(floored, Type::Float64));
        }
        BinaryOp::Lt => (b.fcmp_olt(l, r, "flt"), Type::Bool),
        BinaryOp::Gt => (b.fcmp_ogt(l, r, "fgt"), Type::Bool),
        BinaryOp::Le => (b.fcmp_ole(l, r, "fle"), Type::Bool),
        BinaryOp::Ge => (b.fcmp_oge(l, r, "fge"), Type::Bool),
        BinaryOp::StrictEq => (b.fcmp_oeq(l, r, "feq"), Type::Bool),
        BinaryOp::StrictNotEq => (b.fcmp_one(l, r, "fne"), Type::Bool),
        BinaryOp::BitOr | BinaryOp::BitAnd | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => {
            return Err(CodegenError::UnsupportedBinaryOperator {
                op: op_name(op),
                left: Type::Float64,
                right: Type::Float64,
                span,
            })
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Coalesce | BinaryOp::Assign => {
            unreachable!("short-circuit and assignment are handled before reaching here")
        }
    };

    Ok(Value::rvalue(ssa, ty))
}

fn widen_to_float<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, val: Value) -> crate::ir::ValueId {
    let ty = val.ty();
    let ssa = val.as_ssa(ctx.builder);
    if ty == Type::Float64 {
        ssa
    } else {
        ctx.builder.si_to_fp(ssa, "widen")
    }
}

/// Short-circuit `&&`: evaluate left; if falsy, the result is left's
/// value without evaluating right. Implemented with branch+phi, not
/// eager evaluation, so `right` is never lowered on the false path.
fn generate_and<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, left: ExprId, right: ExprId) -> Result<Value> {
    generate_short_circuit(ctx, left, right, true)
}

fn generate_or<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, left: ExprId, right: ExprId) -> Result<Value> {
    generate_short_circuit(ctx, left, right, false)
}

/// `short_on_false == true` implements `&&` (short-circuits when the left
/// operand is false); `false` implements `||`.
fn generate_short_circuit<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    left: ExprId,
    right: ExprId,
    short_on_false: bool,
) -> Result<Value> {
    let lhs = dispatcher::generate_value(ctx, left)?;
    let l = lhs.as_ssa(ctx.builder);
    let entry_block = ctx.builder.current_block().expect("inside a function body");

    let func = ctx.current_function;
    let rhs_block = ctx.builder.append_block(func, "sc_rhs");
    let merge_block = ctx.builder.append_block(func, "sc_merge");

    if short_on_false {
        ctx.builder.cond_br(l, rhs_block, merge_block);
    } else {
        ctx.builder.cond_br(l, merge_block, rhs_block);
    }

    ctx.builder.position_at_end(rhs_block);
    let rhs = dispatcher::generate_value(ctx, right)?;
    let r = rhs.as_ssa(ctx.builder);
    let rhs_exit_block = ctx.builder.current_block().expect("rhs_block has no terminator yet");
    ctx.builder.br(merge_block);

    ctx.builder.position_at_end(merge_block);
    let bool_ty = ctx.builder.bool_type();
    let incoming = [(l, entry_block), (r, rhs_exit_block)];
    let merged = ctx
        .builder
        .phi_from_incoming(bool_ty, &incoming, "sc_result")
        .expect("two incoming edges always produce a phi");

    Ok(Value::rvalue(merged, Type::Bool))
}

/// `a ?? b`: if `a` is non-null, use it; otherwise evaluate and use `b`.
/// Reference types use a null pointer check; non-reference types can
/// never be null and always take the left branch.
fn generate_coalesce<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    left: ExprId,
    right: ExprId,
) -> Result<Value> {
    let lhs = dispatcher::generate_value(ctx, left)?;
    let lhs_ty = lhs.ty();
    let l = lhs.as_ssa(ctx.builder);

    if !ctx.resolver.is_ref(&lhs_ty) {
        return Ok(Value::rvalue(l, lhs_ty));
    }

    let entry_block = ctx.builder.current_block().expect("inside a function body");
    let func = ctx.current_function;
    let rhs_block = ctx.builder.append_block(func, "coalesce_rhs");
    let merge_block = ctx.builder.append_block(func, "coalesce_merge");

    let zero = ctx.builder.const_i32(0);
    let as_int = ctx.builder.ptr_to_int(l, "coalesce_as_int");
    let is_null = ctx.builder.icmp_eq(as_int, zero, "coalesce_is_null");
    ctx.builder.cond_br(is_null, rhs_block, merge_block);

    ctx.builder.position_at_end(rhs_block);
    let rhs = dispatcher::generate_value(ctx, right)?;
    let r = rhs.as_ssa(ctx.builder);
    let rhs_exit_block = ctx.builder.current_block().expect("rhs_block has no terminator yet");
    ctx.builder.br(merge_block);

    ctx.builder.position_at_end(merge_block);
    let ptr_ty = ctx.builder.ptr_type();
    let incoming = [(l, entry_block), (r, rhs_exit_block)];
    let merged = ctx
        .builder
        .phi_from_incoming(ptr_ty, &incoming, "coalesce_result")
        .expect("two incoming edges always produce a phi");

    Ok(Value::rvalue(merged, lhs_ty))
}

/// `array[index] = value` has no lvalue slot to route through
/// [`Value::store`] — it is lowered straight to the runtime setter extern
/// by `gen::object::generate_element_store`, which preserves left-to-right
/// evaluation (object, then index, then the right-hand side).
fn generate_assign<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    left: ExprId,
    right: ExprId,
    span: glint_ast::Span,
) -> Result<Value> {
    if let ExprKind::Element { object, index } = ctx.arena.get(left).kind.clone() {
        return crate::gen::object::generate_element_store(ctx, object, index, right, span);
    }

    let target = dispatcher::generate_value(ctx, left)?;
    let target_ty = target.ty();
    let rhs = dispatcher::generate_value(ctx, right)?;

    let coerced = if target_ty == Type::Float64 && rhs.ty() == Type::Int32 {
        let raw = rhs.as_ssa(ctx.builder);
        ctx.builder.si_to_fp(raw, "coerce_assign")
    } else {
        rhs.as_ssa(ctx.builder)
    };

    target.store(ctx.builder, coerced, span)
}

fn op_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::FloorDiv => "//",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
        BinaryOp::StrictEq => "===",
        BinaryOp::StrictNotEq => "!==",
        BinaryOp::BitOr => "|",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::UShr => ">>>",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::Coalesce => "??",
        BinaryOp::Assign => "=",
    }
}
