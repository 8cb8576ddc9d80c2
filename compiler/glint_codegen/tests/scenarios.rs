//! Whole-function scenario tests, driven end to end through
//! [`glint_codegen::compile_module`] against a real LLVM context rather
//! than a recording double: the SSA verifier running for real is itself
//! part of what these scenarios check.

use glint_ast::{BinaryOp, ExprArena, ExprId, ExprKind, Function, Node, Param, Span, StringInterner, Symbol};
use glint_codegen::TypeResolver;
use glint_types::{FunctionType, Type};

struct FixtureResolver<'a> {
    arena: &'a ExprArena,
}

impl TypeResolver for FixtureResolver<'_> {
    fn type_of(&self, node: ExprId) -> Type {
        self.arena.get(node).ty.clone()
    }
    fn symbol_of(&self, node: ExprId) -> Symbol {
        match self.arena.get(node).kind {
            ExprKind::Identifier(symbol) => symbol,
            _ => unreachable!(),
        }
    }
    fn signature_of(&self, _node: ExprId) -> FunctionType {
        unreachable!("no scenario here contains a call expression")
    }
}

fn n(arena: &mut ExprArena, kind: ExprKind, ty: Type) -> ExprId {
    arena.push(Node { kind, ty, span: Span::DUMMY })
}

const DIRECTIVE: &str = "use glint";

/// `return a + b;` over `(float64, float64) -> float64`.
#[test]
fn float_add_compiles_and_verifies() {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let a = Symbol::from_raw(0);
    let b = Symbol::from_raw(1);
    let a_ref = n(&mut arena, ExprKind::Identifier(a), Type::Float64);
    let b_ref = n(&mut arena, ExprKind::Identifier(b), Type::Float64);
    let sum = n(&mut arena, ExprKind::Binary { op: BinaryOp::Add, left: a_ref, right: b_ref }, Type::Float64);
    let ret = n(&mut arena, ExprKind::Return(Some(sum)), Type::Void);
    let body = n(&mut arena, ExprKind::Block(vec![ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("fadd");
    let function = Function {
        name,
        symbol: Symbol::from_raw(10),
        params: vec![
            Param { symbol: a, ty: Type::Float64, span: Span::DUMMY },
            Param { symbol: b, ty: Type::Float64, span: Span::DUMMY },
        ],
        ret: Type::Float64,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    let resolver = FixtureResolver { arena: &arena };
    let bitcode = glint_codegen::compile_module("scenario2", &arena, &interner, &resolver, &[function], DIRECTIVE)
        .expect("float add over two float64 params verifies");
    assert!(!bitcode.is_empty());
}

/// `return x | 0;` over `(float64) -> int32` — the canonical
/// truncation idiom, not a bitwise-or.
#[test]
fn truncation_idiom_compiles_and_verifies() {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let x = Symbol::from_raw(0);
    let x_ref = n(&mut arena, ExprKind::Identifier(x), Type::Float64);
    let zero = n(&mut arena, ExprKind::IntLiteral(0), Type::Int32);
    let truncated =
        n(&mut arena, ExprKind::Binary { op: BinaryOp::BitOr, left: x_ref, right: zero }, Type::Int32);
    let ret = n(&mut arena, ExprKind::Return(Some(truncated)), Type::Void);
    let body = n(&mut arena, ExprKind::Block(vec![ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("truncate");
    let function = Function {
        name,
        symbol: Symbol::from_raw(11),
        params: vec![Param { symbol: x, ty: Type::Float64, span: Span::DUMMY }],
        ret: Type::Int32,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    let resolver = FixtureResolver { arena: &arena };
    let bitcode = glint_codegen::compile_module("scenario3", &arena, &interner, &resolver, &[function], DIRECTIVE)
        .expect("the `| 0` idiom lowers to a float-to-int truncation, not a bitwise op");
    assert!(!bitcode.is_empty());
}

/// `x = y = 3;` with `x: int32`, `y: int32` — both slots
/// store 3; the overall expression value is 3 (chained assignment
/// right-associates: `x = (y = 3)`).
#[test]
fn chained_assignment_stores_both_slots() {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let x = Symbol::from_raw(0);
    let y = Symbol::from_raw(1);

    let x_decl = n(&mut arena, ExprKind::VarDecl { symbol: x, ty: Type::Int32, init: None }, Type::Void);
    let y_decl = n(&mut arena, ExprKind::VarDecl { symbol: y, ty: Type::Int32, init: None }, Type::Void);

    let three = n(&mut arena, ExprKind::IntLiteral(3), Type::Int32);
    let y_target = n(&mut arena, ExprKind::Identifier(y), Type::Int32);
    let inner_assign =
        n(&mut arena, ExprKind::Binary { op: BinaryOp::Assign, left: y_target, right: three }, Type::Int32);

    let x_target = n(&mut arena, ExprKind::Identifier(x), Type::Int32);
    let outer_assign = n(
        &mut arena,
        ExprKind::Binary { op: BinaryOp::Assign, left: x_target, right: inner_assign },
        Type::Int32,
    );

    let body = n(&mut arena, ExprKind::Block(vec![x_decl, y_decl, outer_assign]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("chained_assign");
    let function = Function {
        name,
        symbol: Symbol::from_raw(12),
        params: vec![],
        ret: Type::Void,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    let resolver = FixtureResolver { arena: &arena };
    let bitcode =
        glint_codegen::compile_module("scenario6", &arena, &interner, &resolver, &[function], DIRECTIVE)
            .expect("chained assignment through two int32 locals verifies");
    assert!(!bitcode.is_empty());
}

/// `if (a<b) return a; return b;` over `(int32, int32) -> int32` — an
/// `if` with no `else` branch, followed by a second `return` that falls
/// through the merge block. Both returns branch into the function's
/// epilogue, which merges them with a two-way phi.
#[test]
fn if_without_else_followed_by_fallthrough_return_verifies() {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let a = Symbol::from_raw(0);
    let b = Symbol::from_raw(1);

    let a_ref_cond = n(&mut arena, ExprKind::Identifier(a), Type::Int32);
    let b_ref_cond = n(&mut arena, ExprKind::Identifier(b), Type::Int32);
    let cond =
        n(&mut arena, ExprKind::Binary { op: BinaryOp::Lt, left: a_ref_cond, right: b_ref_cond }, Type::Bool);

    let a_ref_ret = n(&mut arena, ExprKind::Identifier(a), Type::Int32);
    let then_ret = n(&mut arena, ExprKind::Return(Some(a_ref_ret)), Type::Void);
    let if_expr = n(&mut arena, ExprKind::If { cond, then_branch: then_ret, else_branch: None }, Type::Void);

    let b_ref_ret = n(&mut arena, ExprKind::Identifier(b), Type::Int32);
    let fallthrough_ret = n(&mut arena, ExprKind::Return(Some(b_ref_ret)), Type::Void);

    let body = n(&mut arena, ExprKind::Block(vec![if_expr, fallthrough_ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("min");
    let function = Function {
        name,
        symbol: Symbol::from_raw(13),
        params: vec![
            Param { symbol: a, ty: Type::Int32, span: Span::DUMMY },
            Param { symbol: b, ty: Type::Int32, span: Span::DUMMY },
        ],
        ret: Type::Int32,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    let resolver = FixtureResolver { arena: &arena };
    let bitcode = glint_codegen::compile_module("scenario5", &arena, &interner, &resolver, &[function], DIRECTIVE)
        .expect("an `if` with no `else` does not leave a dangling, unterminated block");
    assert!(!bitcode.is_empty());
}

/// A malformed function (return type/value mismatch the verifier should
/// catch) does not prevent a well-formed sibling from compiling — spec
/// §7: "one malformed function does not abort other functions'
/// compilation."
#[test]
fn one_failing_function_does_not_block_the_module() {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    // Well-formed: `fn ok() -> int32 { return 1; }`
    let one = n(&mut arena, ExprKind::IntLiteral(1), Type::Int32);
    let ok_ret = n(&mut arena, ExprKind::Return(Some(one)), Type::Void);
    let ok_body = n(&mut arena, ExprKind::Block(vec![ok_ret]), Type::Void);
    let directive = interner.intern(DIRECTIVE);
    let ok_name = interner.intern("ok");
    let ok_fn = Function {
        name: ok_name,
        symbol: Symbol::from_raw(20),
        params: vec![],
        ret: Type::Int32,
        directive: Some(directive),
        body: ok_body,
        span: Span::DUMMY,
    };

    // Broken: references an identifier with no bound scope slot.
    let dangling = n(&mut arena, ExprKind::Identifier(Symbol::from_raw(999)), Type::Int32);
    let broken_ret = n(&mut arena, ExprKind::Return(Some(dangling)), Type::Void);
    let broken_body = n(&mut arena, ExprKind::Block(vec![broken_ret]), Type::Void);
    let broken_name = interner.intern("broken");
    let broken_fn = Function {
        name: broken_name,
        symbol: Symbol::from_raw(21),
        params: vec![],
        ret: Type::Int32,
        directive: Some(directive),
        body: broken_body,
        span: Span::DUMMY,
    };

    let resolver = FixtureResolver { arena: &arena };
    let failures = glint_codegen::compile_module(
        "scenario_partial_failure",
        &arena,
        &interner,
        &resolver,
        &[ok_fn, broken_fn],
        DIRECTIVE,
    )
    .expect_err("a module containing any failing function withholds its artifact");

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].function, "broken");
    assert!(matches!(failures[0].error, glint_codegen::CodegenError::UnresolvedSymbol { .. }));
}
