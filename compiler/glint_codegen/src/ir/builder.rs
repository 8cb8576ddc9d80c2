//! ID-based LLVM instruction builder: the concrete implementation of the
//! host SSA/IR library boundary.
//!
//! Wraps inkwell's `Builder`; every LLVM value, type, block and function
//! is stored in a [`ValueArena`] and referenced by a `Copy` ID, so the
//! `'ctx` lifetime never leaks past this module into the rest of the
//! codegen crate.

use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder as InkwellBuilder;
use inkwell::module::Linkage;
use inkwell::types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum};
use inkwell::values::{BasicValue, BasicValueEnum};
use inkwell::{FloatPredicate, IntPredicate};

use super::context::ModuleCx;
use super::value_id::{BlockId, FunctionId, LLVMTypeId, ValueArena, ValueId};

pub struct IrBuilder<'scx, 'ctx> {
    builder: InkwellBuilder<'ctx>,
    cx: &'scx ModuleCx<'ctx>,
    arena: ValueArena<'ctx>,
    current_function: Option<FunctionId>,
    current_block: Option<BlockId>,
}

impl<'scx, 'ctx> IrBuilder<'scx, 'ctx> {
    #[must_use]
    pub fn new(cx: &'scx ModuleCx<'ctx>) -> Self {
        Self {
            builder: cx.llcx.create_builder(),
            cx,
            arena: ValueArena::new(),
            current_function: None,
            current_block: None,
        }
    }

    #[must_use]
    pub fn cx(&self) -> &'scx ModuleCx<'ctx> {
        self.cx
    }

    // -----------------------------------------------------------------------
    // Constants
    // -----------------------------------------------------------------------

    pub fn const_i32(&mut self, val: i32) -> ValueId {
        let v = self.cx.type_i32().const_int(val as u64, true);
        self.arena.push_value(v.into())
    }

    pub fn const_f64(&mut self, val: f64) -> ValueId {
        let v = self.cx.type_f64().const_float(val);
        self.arena.push_value(v.into())
    }

    pub fn const_bool(&mut self, val: bool) -> ValueId {
        let v = self.cx.type_i1().const_int(u64::from(val), false);
        self.arena.push_value(v.into())
    }

    // -----------------------------------------------------------------------
    // Memory
    // -----------------------------------------------------------------------

    /// Allocate a stack slot in the current block (the entry block, by
    /// convention — the function compiler positions here before emitting
    /// parameter/local allocas).
    pub fn alloca(&mut self, ty: LLVMTypeId, name: &str) -> ValueId {
        let llvm_ty = self.arena.get_type(ty);
        let ptr = self.builder.build_alloca(llvm_ty, name).expect("alloca");
        self.arena.push_value(ptr.into())
    }

    pub fn load(&mut self, ty: LLVMTypeId, ptr: ValueId, name: &str) -> ValueId {
        let llvm_ty = self.arena.get_type(ty);
        let p = self.arena.get_value(ptr).into_pointer_value();
        let v = self.builder.build_load(llvm_ty, p, name).expect("load");
        self.arena.push_value(v)
    }

    pub fn store(&mut self, val: ValueId, ptr: ValueId) {
        let v = self.arena.get_value(val);
        let p = self.arena.get_value(ptr).into_pointer_value();
        self.builder.build_store(p, v).expect("store");
    }

    // -----------------------------------------------------------------------
    // Integer arithmetic
    // -----------------------------------------------------------------------

    pub fn add(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_int_add(l, r, name).expect("add");
        self.arena.push_value(v.into())
    }

    pub fn sub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_int_sub(l, r, name).expect("sub");
        self.arena.push_value(v.into())
    }

    pub fn mul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_int_mul(l, r, name).expect("mul");
        self.arena.push_value(v.into())
    }

    /// Signed integer division.
    pub fn sdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self
            .builder
            .build_int_signed_div(l, r, name)
            .expect("sdiv");
        self.arena.push_value(v.into())
    }

    /// Signed integer remainder.
    pub fn srem(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self
            .builder
            .build_int_signed_rem(l, r, name)
            .expect("srem");
        self.arena.push_value(v.into())
    }

    pub fn neg(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val).into_int_value();
        let result = self.builder.build_int_neg(v, name).expect("neg");
        self.arena.push_value(result.into())
    }

    // -----------------------------------------------------------------------
    // Float arithmetic
    // -----------------------------------------------------------------------

    pub fn fadd(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self.builder.build_float_add(l, r, name).expect("fadd");
        self.arena.push_value(v.into())
    }

    pub fn fsub(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self.builder.build_float_sub(l, r, name).expect("fsub");
        self.arena.push_value(v.into())
    }

    pub fn fmul(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self.builder.build_float_mul(l, r, name).expect("fmul");
        self.arena.push_value(v.into())
    }

    pub fn fdiv(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self.builder.build_float_div(l, r, name).expect("fdiv");
        self.arena.push_value(v.into())
    }

    pub fn frem(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self.builder.build_float_rem(l, r, name).expect("frem");
        self.arena.push_value(v.into())
    }

    pub fn fneg(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val).into_float_value();
        let result = self.builder.build_float_neg(v, name).expect("fneg");
        self.arena.push_value(result.into())
    }

    // -----------------------------------------------------------------------
    // Bitwise / shifts
    // -----------------------------------------------------------------------

    pub fn and(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_and(l, r, name).expect("and");
        self.arena.push_value(v.into())
    }

    pub fn or(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_or(l, r, name).expect("or");
        self.arena.push_value(v.into())
    }

    pub fn xor(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_xor(l, r, name).expect("xor");
        self.arena.push_value(v.into())
    }

    pub fn shl(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_left_shift(l, r, name).expect("shl");
        self.arena.push_value(v.into())
    }

    /// Arithmetic (sign-extending) right shift.
    pub fn ashr(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self
            .builder
            .build_right_shift(l, r, true, name)
            .expect("ashr");
        self.arena.push_value(v.into())
    }

    /// Logical (zero-extending) right shift — `>>>`.
    pub fn lshr(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self
            .builder
            .build_right_shift(l, r, false, name)
            .expect("lshr");
        self.arena.push_value(v.into())
    }

    // -----------------------------------------------------------------------
    // Integer comparisons (all signed)
    // -----------------------------------------------------------------------

    fn icmp(&mut self, pred: IntPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.int_operands(lhs, rhs);
        let v = self.builder.build_int_compare(pred, l, r, name).expect("icmp");
        self.arena.push_value(v.into())
    }

    pub fn icmp_eq(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::EQ, lhs, rhs, name)
    }

    pub fn icmp_ne(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::NE, lhs, rhs, name)
    }

    pub fn icmp_slt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::SLT, lhs, rhs, name)
    }

    pub fn icmp_sgt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::SGT, lhs, rhs, name)
    }

    pub fn icmp_sle(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::SLE, lhs, rhs, name)
    }

    pub fn icmp_sge(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.icmp(IntPredicate::SGE, lhs, rhs, name)
    }

    // -----------------------------------------------------------------------
    // Float comparisons — ordered only: any comparison involving NaN is
    // false, never three-valued or trapping.
    // -----------------------------------------------------------------------

    fn fcmp(&mut self, pred: FloatPredicate, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        let (l, r) = self.float_operands(lhs, rhs);
        let v = self
            .builder
            .build_float_compare(pred, l, r, name)
            .expect("fcmp");
        self.arena.push_value(v.into())
    }

    pub fn fcmp_oeq(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::OEQ, lhs, rhs, name)
    }

    pub fn fcmp_one(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::ONE, lhs, rhs, name)
    }

    pub fn fcmp_olt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::OLT, lhs, rhs, name)
    }

    pub fn fcmp_ogt(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::OGT, lhs, rhs, name)
    }

    pub fn fcmp_ole(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::OLE, lhs, rhs, name)
    }

    pub fn fcmp_oge(&mut self, lhs: ValueId, rhs: ValueId, name: &str) -> ValueId {
        self.fcmp(FloatPredicate::OGE, lhs, rhs, name)
    }

    // -----------------------------------------------------------------------
    // Conversions — the `| 0` truncation idiom and explicit widening
    // -----------------------------------------------------------------------

    /// `int32 -> float64` widening (implicit at call sites).
    pub fn si_to_fp(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val).into_int_value();
        let result = self
            .builder
            .build_signed_int_to_float(v, self.cx.type_f64(), name)
            .expect("si_to_fp");
        self.arena.push_value(result.into())
    }

    /// `float64 -> int32` truncation toward zero — the `| 0` idiom
    /// (the canonical truncation idiom, not a bitwise-or).
    pub fn fp_to_si(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val).into_float_value();
        let result = self
            .builder
            .build_float_to_signed_int(v, self.cx.type_i32(), name)
            .expect("fp_to_si");
        self.arena.push_value(result.into())
    }

    /// Truncate a pointer to wasm32's 32-bit address space, for runtime
    /// externs whose signature is expressed over the `Type` lattice (no
    /// `ptr` leaf) rather than raw LLVM pointers.
    pub fn ptr_to_int(&mut self, val: ValueId, name: &str) -> ValueId {
        let p = self.arena.get_value(val).into_pointer_value();
        let v = self
            .builder
            .build_ptr_to_int(p, self.cx.type_i32(), name)
            .expect("ptr_to_int");
        self.arena.push_value(v.into())
    }

    pub fn int_to_ptr(&mut self, val: ValueId, name: &str) -> ValueId {
        let v = self.arena.get_value(val).into_int_value();
        let p = self
            .builder
            .build_int_to_ptr(v, self.cx.type_ptr(), name)
            .expect("int_to_ptr");
        self.arena.push_value(p.into())
    }

    // -----------------------------------------------------------------------
    // Control flow
    // -----------------------------------------------------------------------

    pub fn br(&mut self, dest: BlockId) {
        let bb = self.arena.get_block(dest);
        self.builder.build_unconditional_branch(bb).expect("br");
    }

    pub fn cond_br(&mut self, cond: ValueId, then_bb: BlockId, else_bb: BlockId) {
        let c = self.arena.get_value(cond).into_int_value();
        let t = self.arena.get_block(then_bb);
        let e = self.arena.get_block(else_bb);
        self.builder.build_conditional_branch(c, t, e).expect("cond_br");
    }

    pub fn select(&mut self, cond: ValueId, then_val: ValueId, else_val: ValueId, name: &str) -> ValueId {
        let c = self.arena.get_value(cond).into_int_value();
        let t = self.arena.get_value(then_val);
        let e = self.arena.get_value(else_val);
        let v = self.builder.build_select(c, t, e, name).expect("select");
        self.arena.push_value(v)
    }

    pub fn ret(&mut self, val: ValueId) {
        let v = self.arena.get_value(val);
        self.builder.build_return(Some(&v)).expect("ret");
    }

    pub fn ret_void(&mut self) {
        self.builder.build_return(None).expect("ret_void");
    }

    pub fn unreachable(&mut self) {
        self.builder.build_unreachable().expect("unreachable");
    }

    // -----------------------------------------------------------------------
    // Phi nodes — the deferred-merge pattern used by `if`/loop lowering
    // -----------------------------------------------------------------------

    pub fn phi(&mut self, ty: LLVMTypeId, name: &str) -> ValueId {
        let llvm_ty = self.arena.get_type(ty);
        let phi = self.builder.build_phi(llvm_ty, name).expect("phi");
        self.arena.push_value(phi.as_basic_value())
    }

    pub fn add_phi_incoming(&mut self, phi: ValueId, incoming: &[(ValueId, BlockId)]) {
        use inkwell::values::AsValueRef;

        let phi_val = self.arena.get_value(phi);
        // SAFETY: `phi_val` was produced by `Self::phi` and stored via
        // `as_basic_value()`; the underlying LLVMValueRef is still a phi.
        let raw_phi = unsafe { inkwell::values::PhiValue::new(phi_val.as_value_ref()) };

        let vals: Vec<BasicValueEnum<'ctx>> =
            incoming.iter().map(|&(v, _)| self.arena.get_value(v)).collect();
        let blocks: Vec<BasicBlock<'ctx>> =
            incoming.iter().map(|&(_, b)| self.arena.get_block(b)).collect();
        let refs: Vec<(&dyn BasicValue<'ctx>, BasicBlock<'ctx>)> = vals
            .iter()
            .zip(blocks.iter())
            .map(|(v, &b)| (v as &dyn BasicValue<'ctx>, b))
            .collect();
        raw_phi.add_incoming(&refs);
    }

    /// `0` incoming -> `None`; `1` incoming -> that value directly (no
    /// phi instruction emitted); `2+` -> a real phi.
    pub fn phi_from_incoming(
        &mut self,
        ty: LLVMTypeId,
        incoming: &[(ValueId, BlockId)],
        name: &str,
    ) -> Option<ValueId> {
        match incoming.len() {
            0 => None,
            1 => Some(incoming[0].0),
            _ => {
                let phi_id = self.phi(ty, name);
                self.add_phi_incoming(phi_id, incoming);
                Some(phi_id)
            }
        }
    }

    /// Materialize a string literal as a module-level constant and return
    /// a pointer to its first byte plus its UTF-8 byte length.
    pub fn global_string(&mut self, s: &str, name: &str) -> (ValueId, i32) {
        let global = self
            .builder
            .build_global_string_ptr(s, name)
            .expect("global_string");
        let ptr = self.arena.push_value(global.as_pointer_value().into());
        (ptr, i32::try_from(s.len()).expect("string literal too large"))
    }

    // -----------------------------------------------------------------------
    // Calls
    // -----------------------------------------------------------------------

    /// Build a direct function call. Returns `None` for void-returning
    /// functions.
    pub fn call(&mut self, callee: FunctionId, args: &[ValueId], name: &str) -> Option<ValueId> {
        let func = self.arena.get_function(callee);
        let arg_vals: Vec<inkwell::values::BasicMetadataValueEnum<'ctx>> =
            args.iter().map(|&id| self.arena.get_value(id).into()).collect();
        let call_val = self.builder.build_call(func, &arg_vals, name).expect("call");
        call_val
            .try_as_basic_value()
            .basic()
            .map(|v| self.arena.push_value(v))
    }

    // -----------------------------------------------------------------------
    // Types
    // -----------------------------------------------------------------------

    pub fn register_type(&mut self, ty: BasicTypeEnum<'ctx>) -> LLVMTypeId {
        self.arena.push_type(ty)
    }

    pub fn bool_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.cx.type_i1().into())
    }

    pub fn i32_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.cx.type_i32().into())
    }

    pub fn f64_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.cx.type_f64().into())
    }

    pub fn ptr_type(&mut self) -> LLVMTypeId {
        self.arena.push_type(self.cx.type_ptr().into())
    }

    /// Register the LLVM type the given lattice leaf lowers to.
    pub fn lower_type(&mut self, ty: &glint_types::Type) -> LLVMTypeId {
        let llvm_ty = self.cx.lower_type(ty);
        self.register_type(llvm_ty)
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    pub fn append_block(&mut self, function: FunctionId, name: &str) -> BlockId {
        let func = self.arena.get_function(function);
        let bb = self.cx.llcx.append_basic_block(func, name);
        self.arena.push_block(bb)
    }

    pub fn position_at_end(&mut self, block: BlockId) {
        let bb = self.arena.get_block(block);
        self.builder.position_at_end(bb);
        self.current_block = Some(block);
    }

    #[must_use]
    pub fn current_block(&self) -> Option<BlockId> {
        self.current_block
    }

    /// Spec §8, invariant 3: zero terminators in a non-epilogue block, at
    /// most one otherwise.
    #[must_use]
    pub fn block_has_terminator(&self, block: BlockId) -> bool {
        self.arena.get_block(block).get_terminator().is_some()
    }

    // -----------------------------------------------------------------------
    // Functions
    // -----------------------------------------------------------------------

    pub fn declare_function(
        &mut self,
        name: &str,
        param_types: &[LLVMTypeId],
        return_type: LLVMTypeId,
    ) -> FunctionId {
        let ret_ty = self.arena.get_type(return_type);
        let param_tys: Vec<BasicMetadataTypeEnum<'ctx>> =
            param_types.iter().map(|&id| self.arena.get_type(id).into()).collect();
        let fn_type = ret_ty.fn_type(&param_tys, false);
        let func = self.cx.llmod.add_function(name, fn_type, None);
        self.arena.push_function(func)
    }

    /// Declare a function returning `void`.
    pub fn declare_void_function(&mut self, name: &str, param_types: &[LLVMTypeId]) -> FunctionId {
        let param_tys: Vec<BasicMetadataTypeEnum<'ctx>> =
            param_types.iter().map(|&id| self.arena.get_type(id).into()).collect();
        let fn_type = self.cx.type_void_func(&param_tys);
        let func = self.cx.llmod.add_function(name, fn_type, None);
        self.arena.push_function(func)
    }

    /// Declare (or, if already present, reuse) an external-linkage
    /// function — used for runtime library externs. First
    /// reference wins identity; callers are responsible for checking
    /// signature compatibility against prior declarations before calling
    /// this (see `crate::module::ExternTable`).
    pub fn declare_extern_function(
        &mut self,
        name: &str,
        param_types: &[LLVMTypeId],
        return_type: Option<LLVMTypeId>,
    ) -> FunctionId {
        if let Some(func) = self.cx.llmod.get_function(name) {
            return self.arena.push_function(func);
        }

        let param_tys: Vec<BasicMetadataTypeEnum<'ctx>> =
            param_types.iter().map(|&id| self.arena.get_type(id).into()).collect();
        let fn_type = match return_type {
            Some(ret_id) => self.arena.get_type(ret_id).fn_type(&param_tys, false),
            None => self.cx.type_void_func(&param_tys),
        };
        let func = self.cx.llmod.add_function(name, fn_type, Some(Linkage::External));
        self.arena.push_function(func)
    }

    pub fn set_current_function(&mut self, func: FunctionId) {
        self.current_function = Some(func);
    }

    #[must_use]
    pub fn current_function(&self) -> Option<FunctionId> {
        self.current_function
    }

    /// Fetch the `index`-th parameter of a declared function as a `ValueId`.
    pub fn get_param(&mut self, func: FunctionId, param_index: u32) -> ValueId {
        let f = self.arena.get_function(func);
        let p = f
            .get_nth_param(param_index)
            .expect("parameter index out of range");
        self.arena.push_value(p)
    }

    /// Run LLVM's function verifier. Returns `Err` with the verifier's
    /// diagnostic text on failure (surfaced as `MalformedFunction`).
    pub fn verify_function(&self, func: FunctionId) -> Result<(), String> {
        let f = self.arena.get_function(func);
        if f.verify(false) {
            Ok(())
        } else {
            Err(format!(
                "LLVM verifier rejected function `{}`",
                f.get_name().to_string_lossy()
            ))
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn int_operands(
        &self,
        lhs: ValueId,
        rhs: ValueId,
    ) -> (inkwell::values::IntValue<'ctx>, inkwell::values::IntValue<'ctx>) {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        debug_assert!(l.is_int_value() && r.is_int_value(), "expected int operands");
        (l.into_int_value(), r.into_int_value())
    }

    fn float_operands(
        &self,
        lhs: ValueId,
        rhs: ValueId,
    ) -> (inkwell::values::FloatValue<'ctx>, inkwell::values::FloatValue<'ctx>) {
        let l = self.arena.get_value(lhs);
        let r = self.arena.get_value(rhs);
        debug_assert!(l.is_float_value() && r.is_float_value(), "expected float operands");
        (l.into_float_value(), r.into_float_value())
    }
}
