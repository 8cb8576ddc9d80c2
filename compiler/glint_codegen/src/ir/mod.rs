//! The host SSA/IR library boundary: everything above this module talks
//! to LLVM only through [`builder::IrBuilder`] and the ID types in
//! [`value_id`]. Nothing outside `ir` imports `inkwell` directly.

pub mod builder;
pub mod context;
pub mod value_id;

pub use builder::IrBuilder;
pub use context::ModuleCx;
pub use value_id::{BlockId, FunctionId, LLVMTypeId, ValueId};
