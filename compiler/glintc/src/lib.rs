//! The CLI collaborator: drives input file selection, emits diagnostics,
//! and invokes the linker. Not part of the codegen core; its interface is
//! `compile(files, options) -> (artifacts, diagnostics)`.
//!
//! This crate owns only that boundary. The front-end type checker that
//! turns source text into a typed AST is itself an external collaborator,
//! out of scope here — [`compile`] takes an already-typed [`Program`]
//! rather than source text, so this driver never re-derives types itself.

mod diagnostic;
mod options;

use glint_ast::{ExprArena, Function, StringInterner};
use glint_codegen::TypeResolver;

pub use diagnostic::Diagnostic;
pub use options::{CompileOptions, KeepGoing, OptLevel};

/// One already-typed compilation unit: everything
/// [`glint_codegen::pipeline::compile_module`] needs, bundled for the
/// driver. Produced by the (external) front end.
pub struct Program<'a, R: TypeResolver> {
    pub name: &'a str,
    pub arena: &'a ExprArena,
    pub interner: &'a StringInterner,
    pub resolver: &'a R,
    pub functions: &'a [Function],
}

/// A successfully compiled module: its source name and serialized
/// bitcode, ready for the (external) linker/optimizer toolchain driver
/// to turn into a `.wasm` artifact.
#[derive(Clone)]
pub struct Artifact {
    pub name: String,
    pub bitcode: Vec<u8>,
}

/// Compile one typed program. Never panics on a malformed function —
/// every [`glint_codegen::CodegenError`] becomes a [`Diagnostic`] instead,
/// raised at the deepest point and aggregated per function.
///
/// With [`KeepGoing::Yes`] (the default), a failing module still returns
/// whatever diagnostics were collected and no artifact — the final
/// artifact is always suppressed if any function errored; the option
/// only controls whether the *caller* (driving many files) keeps going
/// to the next one, not whether this module is partially emitted.
#[tracing::instrument(skip_all, fields(module = program.name))]
pub fn compile<R: TypeResolver>(program: &Program<'_, R>, options: &CompileOptions) -> (Option<Artifact>, Vec<Diagnostic>) {
    let directive = options.directive_text();
    match glint_codegen::compile_module(
        program.name,
        program.arena,
        program.interner,
        program.resolver,
        program.functions,
        directive,
    ) {
        Ok(bitcode) => {
            tracing::info!(bytes = bitcode.len(), "module compiled");
            (Some(Artifact { name: program.name.to_owned(), bitcode }), Vec::new())
        }
        Err(failures) => {
            let diagnostics = failures.into_iter().map(Diagnostic::from_failure).collect();
            (None, diagnostics)
        }
    }
}

/// Compile several programs, one module each, in order (deterministic
/// assembler visitation order carries up to multi-module driving too).
/// Under [`KeepGoing::No`] the first failing module stops
/// the whole batch; under [`KeepGoing::Yes`] every program is attempted
/// and all diagnostics are collected.
pub fn compile_all<R: TypeResolver>(
    programs: &[Program<'_, R>],
    options: &CompileOptions,
) -> (Vec<Artifact>, Vec<Diagnostic>) {
    let mut artifacts = Vec::new();
    let mut diagnostics = Vec::new();

    for program in programs {
        let (artifact, mut module_diagnostics) = compile(program, options);
        let failed = artifact.is_none();
        artifacts.extend(artifact);
        diagnostics.append(&mut module_diagnostics);

        if failed && options.keep_going == KeepGoing::No {
            break;
        }
    }

    (artifacts, diagnostics)
}

#[cfg(test)]
mod tests {
    use glint_ast::{ExprArena, ExprKind, Function, Node, Param, Span, StringInterner, Symbol};
    use glint_types::{FunctionType, Type};

    use super::{compile, compile_all, CompileOptions, KeepGoing, Program};

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

    use glint_codegen::TypeResolver;

    fn trivial_function(interner: &mut StringInterner, arena: &mut ExprArena, directive_text: &str) -> Function {
        let literal = arena.push(Node { kind: ExprKind::IntLiteral(7), ty: Type::Int32, span: Span::DUMMY });
        let ret = arena.push(Node { kind: ExprKind::Return(Some(literal)), ty: Type::Void, span: Span::DUMMY });
        let body = arena.push(Node { kind: ExprKind::Block(vec![ret]), ty: Type::Void, span: Span::DUMMY });
        let directive = interner.intern(directive_text);
        let name = interner.intern("seven");
        Function {
            name,
            symbol: Symbol::from_raw(1),
            params: Vec::<Param>::new(),
            ret: Type::Int32,
            directive: Some(directive),
            body,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn compile_emits_an_artifact_for_a_well_formed_program() {
        let mut arena = ExprArena::new();
        let mut interner = StringInterner::new();
        let options = CompileOptions::default();
        let function = trivial_function(&mut interner, &mut arena, options.directive_text());
        let functions = [function];

        let program = Program {
            name: "fixture",
            arena: &arena,
            interner: &interner,
            resolver: &FixtureResolver,
            functions: &functions,
        };

        let (artifact, diagnostics) = compile(&program, &options);
        assert!(diagnostics.is_empty());
        assert!(artifact.is_some());
    }

    #[test]
    fn compile_all_stops_early_under_keep_going_no() {
        let mut arena = ExprArena::new();
        let mut interner = StringInterner::new();
        let mut options = CompileOptions::default();
        options.keep_going = KeepGoing::No;

        // A function body referencing an identifier with no bound scope
        // slot fails with `UnresolvedSymbol` — an easy, deterministic way
        // to force module compilation to fail without a real front end.
        let unresolved = arena.push(Node {
            kind: ExprKind::Identifier(Symbol::from_raw(99)),
            ty: Type::Int32,
            span: Span::DUMMY,
        });
        let ret = arena.push(Node { kind: ExprKind::Return(Some(unresolved)), ty: Type::Void, span: Span::DUMMY });
        let body = arena.push(Node { kind: ExprKind::Block(vec![ret]), ty: Type::Void, span: Span::DUMMY });
        let directive = interner.intern(options.directive_text());
        let name = interner.intern("broken");
        let broken = Function {
            name,
            symbol: Symbol::from_raw(2),
            params: Vec::<Param>::new(),
            ret: Type::Int32,
            directive: Some(directive),
            body,
            span: Span::DUMMY,
        };
        let broken_functions = [broken];

        let mut arena2 = ExprArena::new();
        let mut interner2 = StringInterner::new();
        let good = trivial_function(&mut interner2, &mut arena2, options.directive_text());
        let good_functions = [good];

        let programs = [
            Program {
                name: "broken_module",
                arena: &arena,
                interner: &interner,
                resolver: &FixtureResolver,
                functions: &broken_functions,
            },
            Program {
                name: "good_module",
                arena: &arena2,
                interner: &interner2,
                resolver: &FixtureResolver,
                functions: &good_functions,
            },
        ];

        let (artifacts, diagnostics) = compile_all(&programs, &options);
        assert!(artifacts.is_empty());
        assert!(!diagnostics.is_empty());
    }
}
