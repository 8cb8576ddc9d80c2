//! The value abstraction.
//!
//! Modeled as a closed sum type rather than a single struct with an
//! `is_lvalue` predicate and ad hoc `ValueId` passing: a node either
//! carries a usable SSA value, a mutable memory slot, or a reference to a
//! callable. Collapsing these into one struct would let an l-value leak
//! into an operator that expects an r-value without the type system
//! catching it.

use glint_ast::Span;
use glint_types::{FunctionType, Type};

use crate::error::{CodegenError, Result};
use crate::ir::{BlockId, FunctionId, IrBuilder, LLVMTypeId, ValueId};

/// A stack-allocated, assignable memory location: parameters and
/// `var`-declared locals are uniformly l-values.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub ptr: ValueId,
    pub llvm_ty: LLVMTypeId,
    pub ty: Type,
}

/// The result of lowering an expression. Not `Copy` — a `FunctionRef`
/// carries a [`FunctionType`], which owns a `Vec`/`Box` and so cannot be.
#[derive(Clone, Debug)]
pub enum Value {
    /// A usable SSA register.
    RValue { ssa: ValueId, ty: Type },
    /// A mutable stack slot — the result of lowering an assignable
    /// expression (an identifier bound to a local, a property, an
    /// element).
    LValue(Slot),
    /// A reference to a declared function, not yet called.
    FunctionRef { func: FunctionId, sig: FunctionType },
}

impl Value {
    #[must_use]
    pub fn rvalue(ssa: ValueId, ty: Type) -> Self {
        Value::RValue { ssa, ty }
    }

    #[must_use]
    pub fn lvalue(ptr: ValueId, llvm_ty: LLVMTypeId, ty: Type) -> Self {
        Value::LValue(Slot { ptr, llvm_ty, ty })
    }

    /// The static type this value carries.
    #[must_use]
    pub fn ty(&self) -> Type {
        match self {
            Value::RValue { ty, .. } | Value::LValue(Slot { ty, .. }) => ty.clone(),
            Value::FunctionRef { sig, .. } => Type::Function(sig.clone()),
        }
    }

    #[must_use]
    pub fn is_assignable(&self) -> bool {
        matches!(self, Value::LValue(_))
    }

    /// Load an l-value to an r-value; r-values and function references
    /// pass through unchanged (reading a function reference yields itself
    /// — it has no memory representation to load from).
    pub fn load(&self, builder: &mut IrBuilder<'_, '_>) -> Value {
        match self {
            Value::LValue(slot) => {
                let ssa = builder.load(slot.llvm_ty, slot.ptr, "load");
                Value::RValue { ssa, ty: slot.ty.clone() }
            }
            other => other.clone(),
        }
    }

    /// Extract the SSA value, loading through an l-value first.
    pub fn as_ssa(&self, builder: &mut IrBuilder<'_, '_>) -> ValueId {
        match self.load(builder) {
            Value::RValue { ssa, .. } => ssa,
            Value::LValue(_) | Value::FunctionRef { .. } => {
                unreachable!("load() always resolves l-values to r-values")
            }
        }
    }

    /// Store `rhs` through this l-value. Returns the assignment's result
    /// value: `x = y` resolves to the type of the left operand's declared
    /// slot, not the right operand's type (already coerced by the caller
    /// before reaching here).
    pub fn store(&self, builder: &mut IrBuilder<'_, '_>, rhs: ValueId, span: Span) -> Result<Value> {
        match self {
            Value::LValue(slot) => {
                builder.store(rhs, slot.ptr);
                Ok(Value::RValue { ssa: rhs, ty: slot.ty.clone() })
            }
            Value::RValue { .. } | Value::FunctionRef { .. } => {
                Err(CodegenError::ReadOnlyTarget { span })
            }
        }
    }

    /// The signature of a callable value.
    pub fn signature(&self, span: Span) -> Result<FunctionType> {
        match self {
            Value::FunctionRef { sig, .. } => Ok(sig.clone()),
            Value::RValue { ty: Type::Function(sig), .. } => Ok(sig.clone()),
            _ => Err(CodegenError::UnsupportedSyntacticCategory {
                category: "call target",
                span,
            }),
        }
    }

    /// Emit a direct call against a `FunctionRef`.
    pub fn emit_call(
        &self,
        builder: &mut IrBuilder<'_, '_>,
        args: &[ValueId],
        name: &str,
    ) -> Option<ValueId> {
        match self {
            Value::FunctionRef { func, .. } => builder.call(*func, args, name),
            _ => unreachable!("emit_call requires a FunctionRef; check signature() first"),
        }
    }
}

/// The break/continue landing pad in scope while lowering a loop body.
/// `break`/`continue` carry no expression in this language, so there is
/// nothing to merge at the exit block.
#[derive(Clone, Copy, Debug)]
pub struct LoopLandingPad {
    pub continue_block: BlockId,
    pub break_block: BlockId,
}
