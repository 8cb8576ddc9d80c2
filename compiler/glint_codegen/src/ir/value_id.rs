//! Opaque ID newtypes and the arena backing [`super::builder::IrBuilder`].
//!
//! These IDs decouple the rest of the codegen crate from inkwell's `'ctx`
//! lifetime: every LLVM value, type, block and function is stored in a
//! [`ValueArena`] and referenced by a `Copy` ID handle.

use inkwell::basic_block::BasicBlock;
use inkwell::types::BasicTypeEnum;
use inkwell::values::{BasicValueEnum, FunctionValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValueId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LLVMTypeId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

macro_rules! id_sentinel {
    ($ty:ty) => {
        impl $ty {
            pub const NONE: Self = Self(u32::MAX);

            #[inline]
            #[must_use]
            pub fn is_none(self) -> bool {
                self.0 == u32::MAX
            }

            #[inline]
            #[must_use]
            pub fn raw(self) -> u32 {
                self.0
            }
        }
    };
}

id_sentinel!(ValueId);
id_sentinel!(LLVMTypeId);
id_sentinel!(BlockId);
id_sentinel!(FunctionId);

/// Stores LLVM values behind opaque IDs, hiding the `'ctx` lifetime.
/// Internal to [`super::builder::IrBuilder`].
pub(crate) struct ValueArena<'ctx> {
    values: Vec<BasicValueEnum<'ctx>>,
    types: Vec<BasicTypeEnum<'ctx>>,
    blocks: Vec<BasicBlock<'ctx>>,
    functions: Vec<FunctionValue<'ctx>>,
}

impl<'ctx> ValueArena<'ctx> {
    pub(crate) fn new() -> Self {
        Self {
            values: Vec::new(),
            types: Vec::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn push_value(&mut self, val: BasicValueEnum<'ctx>) -> ValueId {
        let id = self.values.len();
        self.values.push(val);
        ValueId(id as u32)
    }

    #[inline]
    pub(crate) fn get_value(&self, id: ValueId) -> BasicValueEnum<'ctx> {
        debug_assert!((id.0 as usize) < self.values.len(), "ValueId {} out of bounds", id.0);
        self.values[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_type(&mut self, ty: BasicTypeEnum<'ctx>) -> LLVMTypeId {
        let id = self.types.len();
        self.types.push(ty);
        LLVMTypeId(id as u32)
    }

    #[inline]
    pub(crate) fn get_type(&self, id: LLVMTypeId) -> BasicTypeEnum<'ctx> {
        debug_assert!((id.0 as usize) < self.types.len(), "LLVMTypeId {} out of bounds", id.0);
        self.types[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_block(&mut self, bb: BasicBlock<'ctx>) -> BlockId {
        let id = self.blocks.len();
        self.blocks.push(bb);
        BlockId(id as u32)
    }

    #[inline]
    pub(crate) fn get_block(&self, id: BlockId) -> BasicBlock<'ctx> {
        debug_assert!((id.0 as usize) < self.blocks.len(), "BlockId {} out of bounds", id.0);
        self.blocks[id.0 as usize]
    }

    #[inline]
    pub(crate) fn push_function(&mut self, func: FunctionValue<'ctx>) -> FunctionId {
        let id = self.functions.len();
        self.functions.push(func);
        FunctionId(id as u32)
    }

    #[inline]
    pub(crate) fn get_function(&self, id: FunctionId) -> FunctionValue<'ctx> {
        debug_assert!((id.0 as usize) < self.functions.len(), "FunctionId {} out of bounds", id.0);
        self.functions[id.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell::context::Context;

    #[test]
    fn none_sentinels() {
        assert!(ValueId::NONE.is_none());
        assert!(LLVMTypeId::NONE.is_none());
        assert!(BlockId::NONE.is_none());
        assert!(FunctionId::NONE.is_none());
        assert!(!ValueId(0).is_none());
    }

    #[test]
    fn value_arena_push_get_roundtrip() {
        let ctx = Context::create();
        let mut arena = ValueArena::new();
        let i64_val = ctx.i64_type().const_int(42, false);
        let id = arena.push_value(i64_val.into());
        assert_eq!(arena.get_value(id).into_int_value(), i64_val);
    }
}
