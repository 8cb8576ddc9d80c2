//! Reference-type construction and access —
//! marshaled to the runtime ABI rather than opened up as inline
//! aggregate IR, since the `Type` lattice has no struct layout to
//! compile against: `Object`/`Array<T>` are opaque refs.

use glint_ast::{ExprId, ExprKind, Name};
use glint_types::Type;

use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::gen::rt;
use crate::ir::ValueId;
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn emit_string_new<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, text: &str) -> ValueId {
    let (ptr, len) = ctx.builder.global_string(text, "str_lit");
    let ptr_as_int = ctx.builder.ptr_to_int(ptr, "str_ptr_as_int");
    let len_ssa = ctx.builder.const_i32(len);
    rt::call_extern(ctx, "glint_rt_string_new", &[ptr_as_int, len_ssa])
        .expect("glint_rt_string_new returns an Object")
}

/// `object.name` and `object[index]`. Property access is narrowed to the
/// one case the runtime ABI actually supports: `.length` on an array.
/// Anything else is `UnsupportedSyntacticCategory` — the Type lattice
/// carries no per-object field schema to dispatch a general property
/// lookup against.
pub fn generate_access<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let node = ctx.arena.get(id);
    let span = node.span;

    match node.kind.clone() {
        ExprKind::Property { object, name } => generate_property(ctx, object, name, span),
        ExprKind::Element { object, index } => generate_element_get(ctx, object, index, span),
        _ => unreachable!("dispatcher only routes Property/Element here"),
    }
}

fn generate_property<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    object: ExprId,
    name: Name,
    span: glint_ast::Span,
) -> Result<Value> {
    let name_text = ctx.interner.lookup(name).to_owned();
    let obj_value = dispatcher::generate_value(ctx, object)?;

    if name_text == "length" && matches!(obj_value.ty(), Type::Array(_)) {
        let ptr = obj_value.as_ssa(ctx.builder);
        let len = rt::call_extern(ctx, "glint_rt_array_len", &[ptr])
            .expect("glint_rt_array_len returns a value");
        return Ok(Value::rvalue(len, Type::Int32));
    }

    Err(CodegenError::UnsupportedSyntacticCategory {
        category: "object property access other than array `.length`",
        span,
    })
}

fn generate_element_get<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    object: ExprId,
    index: ExprId,
    span: glint_ast::Span,
) -> Result<Value> {
    let obj_value = dispatcher::generate_value(ctx, object)?;
    let idx_value = dispatcher::generate_value(ctx, index)?;

    let elem_ty = match obj_value.ty() {
        Type::Array(elem) => *elem,
        other => {
            return Err(CodegenError::UnsupportedBinaryOperator {
                op: "[]",
                left: other,
                right: idx_value.ty(),
                span,
            })
        }
    };

    let ptr = obj_value.as_ssa(ctx.builder);
    let idx = idx_value.as_ssa(ctx.builder);
    let extern_name = match elem_ty {
        Type::Int32 => "glint_rt_array_get_i32",
        Type::Float64 => "glint_rt_array_get_f64",
        _ => {
            return Err(CodegenError::UnsupportedSyntacticCategory {
                category: "array element type other than int32/float64",
                span,
            })
        }
    };

    let ssa = rt::call_extern(ctx, extern_name, &[ptr, idx]).expect("array getter returns a value");
    Ok(Value::rvalue(ssa, elem_ty))
}

/// `object[index] = value` — elements have no addressable memory slot in
/// this lowering, so assignment bypasses [`Value::store`] and emits the
/// setter extern directly. Called from `gen::binary::generate_assign`.
///
/// `object` and `index` (the target's address parts) are lowered before
/// `right` so the left-to-right evaluation order holds regardless of
/// which side has observable side effects.
pub fn generate_element_store<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    object: ExprId,
    index: ExprId,
    right: ExprId,
    span: glint_ast::Span,
) -> Result<Value> {
    let obj_value = dispatcher::generate_value(ctx, object)?;
    let idx_value = dispatcher::generate_value(ctx, index)?;

    let elem_ty = match obj_value.ty() {
        Type::Array(elem) => *elem,
        other => {
            return Err(CodegenError::UnsupportedBinaryOperator {
                op: "[]=",
                left: other,
                right: idx_value.ty(),
                span,
            })
        }
    };

    let rhs = dispatcher::generate_value(ctx, right)?;
    let rhs_ssa = if elem_ty == Type::Float64 && rhs.ty() == Type::Int32 {
        let raw = rhs.as_ssa(ctx.builder);
        ctx.builder.si_to_fp(raw, "coerce_assign")
    } else {
        rhs.as_ssa(ctx.builder)
    };

    let ptr = obj_value.as_ssa(ctx.builder);
    let idx = idx_value.as_ssa(ctx.builder);
    let extern_name = match elem_ty {
        Type::Int32 => "glint_rt_array_set_i32",
        Type::Float64 => "glint_rt_array_set_f64",
        _ => {
            return Err(CodegenError::UnsupportedSyntacticCategory {
                category: "array element type other than int32/float64",
                span,
            })
        }
    };

    rt::call_extern(ctx, extern_name, &[ptr, idx, rhs_ssa]);
    Ok(Value::rvalue(rhs_ssa, elem_ty))
}

/// `new Callee(args)`, array literals, and object literals. Array
/// literals marshal their elements into the allocated array through the
/// typed setter externs. `new`/object-literal construction has no such
/// extern — the runtime ABI allocates an opaque `Object` with no settable
/// field slots — so both are narrowed to their only representable form,
/// a zero-argument/zero-field construction; anything else is
/// `UnsupportedSyntacticCategory` rather than silently dropping the
/// evaluated values (see `DESIGN.md`).
pub fn generate_construct<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let node = ctx.arena.get(id);
    let ty = node.ty.clone();

    match node.kind.clone() {
        ExprKind::New { args, .. } => {
            if !args.is_empty() {
                return Err(CodegenError::UnsupportedSyntacticCategory {
                    category: "constructor arguments (no runtime field-initialization ABI)",
                    span: node.span,
                });
            }
            let size_hint = ctx.builder.const_i32(0);
            let ssa = rt::call_extern(ctx, "glint_rt_new_object", &[size_hint])
                .expect("glint_rt_new_object returns an Object");
            Ok(Value::rvalue(ssa, ty))
        }
        ExprKind::ArrayLiteral(elems) => {
            let elem_ty = match &ty {
                Type::Array(elem) => (**elem).clone(),
                _ => Type::Int32,
            };
            let len = ctx.builder.const_i32(i32::try_from(elems.len()).unwrap_or(i32::MAX));
            let kind = ctx.builder.const_i32(if elem_ty == Type::Float64 { 1 } else { 0 });
            let arr = rt::call_extern(ctx, "glint_rt_array_alloc", &[len, kind])
                .expect("glint_rt_array_alloc returns an Array");

            let setter = if elem_ty == Type::Float64 { "glint_rt_array_set_f64" } else { "glint_rt_array_set_i32" };
            for (i, elem_id) in elems.iter().enumerate() {
                let elem = dispatcher::generate_value(ctx, *elem_id)?;
                let elem_ssa = elem.as_ssa(ctx.builder);
                let idx = ctx.builder.const_i32(i32::try_from(i).expect("array literal too large"));
                rt::call_extern(ctx, setter, &[arr, idx, elem_ssa]);
            }
            Ok(Value::rvalue(arr, ty))
        }
        ExprKind::ObjectLiteral(fields) => {
            if !fields.is_empty() {
                return Err(CodegenError::UnsupportedSyntacticCategory {
                    category: "object literal fields (no runtime field-initialization ABI)",
                    span: node.span,
                });
            }
            let size_hint = ctx.builder.const_i32(0);
            let ssa = rt::call_extern(ctx, "glint_rt_new_object", &[size_hint])
                .expect("glint_rt_new_object returns an Object");
            Ok(Value::rvalue(ssa, ty))
        }
        _ => unreachable!("dispatcher only routes New/ArrayLiteral/ObjectLiteral here"),
    }
}
