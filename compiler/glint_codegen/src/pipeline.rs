//! Whole-compilation-unit entry point: owns the LLVM `Context` so callers
//! outside this crate (the `glintc` CLI collaborator) never need to depend
//! on `inkwell` directly — they see bytes in, diagnostics and bitcode out.
//!
//! One `Context` per compilation, torn down when the module's bitcode
//! has been serialized.

use glint_ast::{ExprArena, Function, StringInterner};

use crate::module::{FunctionFailure, ModuleAssembler};
use crate::resolver::TypeResolver;

/// Compile every annotated function in `functions` into a single module,
/// returning the serialized LLVM bitcode on success.
///
/// One failing function does not prevent others from compiling, but the
/// final artifact is always suppressed if any function errored — the
/// bitcode is withheld and every collected failure is returned instead.
#[tracing::instrument(skip_all, fields(module = module_name))]
pub fn compile_module<R: TypeResolver>(
    module_name: &str,
    arena: &ExprArena,
    interner: &StringInterner,
    resolver: &R,
    functions: &[Function],
    directive_text: &str,
) -> std::result::Result<Vec<u8>, Vec<FunctionFailure>> {
    let llcx = inkwell::context::Context::create();
    let cx = crate::ir::ModuleCx::new(&llcx, module_name);
    let assembler = ModuleAssembler::new(&cx);

    let (builder, compiled) =
        assembler.assemble(arena, interner, resolver, functions, directive_text)?;
    tracing::info!(functions = compiled.len(), "module assembled");
    drop(builder);

    let module = cx.into_module();
    let buffer = module.write_bitcode_to_memory();
    Ok(buffer.as_slice().to_vec())
}

#[cfg(test)]
mod tests {
    use glint_ast::{ExprArena, ExprKind, Function, Node, Param, Span, StringInterner, Symbol};
    use glint_types::{FunctionType, Type};

    use super::compile_module;
    use crate::resolver::TypeResolver;

    struct FixtureResolver;

    impl TypeResolver for FixtureResolver {
        fn type_of(&self, _node: glint_ast::ExprId) -> Type {
            Type::Int32
        }
        fn symbol_of(&self, _node: glint_ast::ExprId) -> Symbol {
            Symbol::from_raw(0)
        }
        fn signature_of(&self, _node: glint_ast::ExprId) -> FunctionType {
            FunctionType { params: vec![], ret: Box::new(Type::Int32) }
        }
    }

    /// `"use glint"; return 42;` — scenario-shaped enough to exercise the
    /// full declare -> define -> verify -> bitcode pipeline end to end.
    #[test]
    fn compiles_a_trivial_function_to_nonempty_bitcode() {
        let mut arena = ExprArena::new();
        let mut interner = StringInterner::new();

        let literal = arena.push(Node { kind: ExprKind::IntLiteral(42), ty: Type::Int32, span: Span::DUMMY });
        let ret = arena.push(Node { kind: ExprKind::Return(Some(literal)), ty: Type::Void, span: Span::DUMMY });
        let body = arena.push(Node { kind: ExprKind::Block(vec![ret]), ty: Type::Void, span: Span::DUMMY });

        let directive = interner.intern("use glint");
        let name = interner.intern("answer");
        let function = Function {
            name,
            symbol: Symbol::from_raw(1),
            params: Vec::<Param>::new(),
            ret: Type::Int32,
            directive: Some(directive),
            body,
            span: Span::DUMMY,
        };

        let bitcode =
            compile_module("fixture", &arena, &interner, &FixtureResolver, &[function], "use glint")
                .expect("a single well-formed function compiles");
        assert!(!bitcode.is_empty());
    }

    #[test]
    fn unannotated_functions_are_skipped_entirely() {
        let mut arena = ExprArena::new();
        let mut interner = StringInterner::new();
        let body = arena.push(Node { kind: ExprKind::Block(vec![]), ty: Type::Void, span: Span::DUMMY });
        let name = interner.intern("not_compiled");
        let function = Function {
            name,
            symbol: Symbol::from_raw(2),
            params: Vec::<Param>::new(),
            ret: Type::Void,
            directive: None,
            body,
            span: Span::DUMMY,
        };

        let bitcode =
            compile_module("fixture", &arena, &interner, &FixtureResolver, &[function], "use glint")
                .expect("an empty module with no candidates still compiles");
        assert!(!bitcode.is_empty(), "module header/target triple alone still serializes");
    }
}
