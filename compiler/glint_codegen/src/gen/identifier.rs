//! Identifier references — look up the bound scope slot.

use glint_ast::ExprId;

use crate::error::{CodegenError, Result};
use crate::resolver::TypeResolver;
use crate::scope::ScopeBinding;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Value> {
    let span = ctx.arena.get(id).span;
    let symbol = ctx.resolver.symbol_of(id);

    match ctx.lookup(symbol) {
        Some(ScopeBinding::Immutable(ssa)) => Ok(Value::rvalue(ssa, ctx.resolver.type_of(id))),
        Some(ScopeBinding::Mutable { ptr, llvm_ty, ty }) => Ok(Value::lvalue(ptr, llvm_ty, ty)),
        Some(ScopeBinding::Function { func, sig }) => Ok(Value::FunctionRef { func, sig }),
        None => Err(CodegenError::UnresolvedSymbol { span }),
    }
}
