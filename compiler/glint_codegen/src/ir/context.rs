//! Minimal LLVM context: the module plus commonly-used types.
//!
//! A thin wrapper around LLVM's `Context` + `Module`, isize word size
//! fixed to wasm32's 32-bit pointers (this backend targets
//! `wasm32-unknown-unknown`, not a 64-bit host).

use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::types::{BasicType, BasicTypeEnum, IntType, PointerType};
use inkwell::AddressSpace;

pub struct ModuleCx<'ll> {
    pub llcx: &'ll Context,
    pub llmod: Module<'ll>,
    pub ptr_type: PointerType<'ll>,
    /// wasm32's machine word: 32-bit.
    pub isize_ty: IntType<'ll>,
}

impl<'ll> ModuleCx<'ll> {
    #[must_use]
    pub fn new(context: &'ll Context, module_name: &str) -> Self {
        let llmod = context.create_module(module_name);
        llmod.set_triple(&inkwell::targets::TargetTriple::create(
            "wasm32-unknown-unknown",
        ));
        let ptr_type = context.ptr_type(AddressSpace::default());
        let isize_ty = context.i32_type();

        Self {
            llcx: context,
            llmod,
            ptr_type,
            isize_ty,
        }
    }

    #[must_use]
    pub fn into_module(self) -> Module<'ll> {
        self.llmod
    }

    #[inline]
    #[must_use]
    pub fn type_i1(&self) -> IntType<'ll> {
        self.llcx.bool_type()
    }

    #[inline]
    #[must_use]
    pub fn type_i32(&self) -> IntType<'ll> {
        self.llcx.i32_type()
    }

    #[inline]
    #[must_use]
    pub fn type_f64(&self) -> inkwell::types::FloatType<'ll> {
        self.llcx.f64_type()
    }

    #[inline]
    #[must_use]
    pub fn type_ptr(&self) -> PointerType<'ll> {
        self.ptr_type
    }

    #[must_use]
    pub fn type_void_func(
        &self,
        params: &[inkwell::types::BasicMetadataTypeEnum<'ll>],
    ) -> inkwell::types::FunctionType<'ll> {
        self.llcx.void_type().fn_type(params, false)
    }

    /// LLVM basic type for a single [`glint_types::Type`] leaf of the lattice.
    #[must_use]
    pub fn lower_type(&self, ty: &glint_types::Type) -> BasicTypeEnum<'ll> {
        use glint_types::Type;
        match ty {
            Type::Int32 => self.type_i32().into(),
            Type::Float64 => self.type_f64().into(),
            Type::Bool => self.type_i1().into(),
            Type::Object | Type::Array(_) | Type::Function(_) => self.type_ptr().into(),
            Type::Void => {
                unreachable!("void has no storage representation; callers must check is_void first")
            }
        }
    }
}
