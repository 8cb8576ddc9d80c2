//! Hand-built typed-AST programs standing in for a real front end's
//! output (see the module doc on `main.rs`). Each one exercises a
//! distinct control-flow/operator path, so running
//! `glintc compile <name>` demonstrates exactly that path end to end.

use glint_ast::{ExprArena, ExprId, ExprKind, Function, Node, Param, Span, StringInterner, Symbol};
use glint_codegen::TypeResolver;
use glint_types::{FunctionType, Type};

use glintc::Program;

/// Reads a node's static type directly off the arena rather than
/// re-deriving it — exactly what a real `TypeResolver` does over a
/// checker's symbol table, except the "table" here is the node itself:
/// every node is already classified before codegen sees it.
pub struct ArenaResolver<'a> {
    arena: &'a ExprArena,
}

impl<'a> ArenaResolver<'a> {
    #[must_use]
    pub fn new(arena: &'a ExprArena) -> Self {
        Self { arena }
    }
}

impl TypeResolver for ArenaResolver<'_> {
    fn type_of(&self, node: ExprId) -> Type {
        self.arena.get(node).ty.clone()
    }

    fn symbol_of(&self, node: ExprId) -> Symbol {
        match self.arena.get(node).kind {
            ExprKind::Identifier(symbol) => symbol,
            _ => unreachable!("symbol_of called on a non-identifier node (resolver bug)"),
        }
    }

    fn signature_of(&self, node: ExprId) -> FunctionType {
        unreachable!("no fixture program contains a call expression; node {node:?}")
    }
}

/// An owned typed-AST program plus the resolver over it, bundled so the
/// CLI can build one and hand a borrow of it to [`glintc::compile_all`].
pub struct FixtureProgram {
    name: &'static str,
    arena: ExprArena,
    interner: StringInterner,
    functions: Vec<Function>,
}

impl FixtureProgram {
    #[must_use]
    pub fn as_program(&self) -> Program<'_, ArenaResolver<'_>> {
        // Leaked once per process invocation, not per call: the CLI
        // compiles exactly one fixture per run, so this trades a
        // one-time allocation for a resolver whose lifetime can be tied
        // to `&self` instead of needing a self-referential struct.
        let resolver = Box::leak(Box::new(ArenaResolver::new(&self.arena)));
        Program {
            name: self.name,
            arena: &self.arena,
            interner: &self.interner,
            resolver,
            functions: &self.functions,
        }
    }
}

#[must_use]
pub fn names() -> &'static [&'static str] {
    &["add_i32", "sum_loop", "min"]
}

#[must_use]
pub fn by_name(name: &str) -> Option<FixtureProgram> {
    match name {
        "add_i32" => Some(add_i32()),
        "sum_loop" => Some(sum_loop()),
        "min" => Some(min()),
        _ => None,
    }
}

const DIRECTIVE: &str = "use glint";

fn node(arena: &mut ExprArena, kind: ExprKind, ty: Type) -> ExprId {
    arena.push(Node { kind, ty, span: Span::DUMMY })
}

/// `return a + b;` over `(int32, int32) -> int32`.
fn add_i32() -> FixtureProgram {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let a = Symbol::from_raw(0);
    let b = Symbol::from_raw(1);

    let a_ref = node(&mut arena, ExprKind::Identifier(a), Type::Int32);
    let b_ref = node(&mut arena, ExprKind::Identifier(b), Type::Int32);
    let sum = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Add, left: a_ref, right: b_ref },
        Type::Int32,
    );
    let ret = node(&mut arena, ExprKind::Return(Some(sum)), Type::Void);
    let body = node(&mut arena, ExprKind::Block(vec![ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("add_i32");
    let function = Function {
        name,
        symbol: Symbol::from_raw(100),
        params: vec![
            Param { symbol: a, ty: Type::Int32, span: Span::DUMMY },
            Param { symbol: b, ty: Type::Int32, span: Span::DUMMY },
        ],
        ret: Type::Int32,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    FixtureProgram { name: "add_i32", arena, interner, functions: vec![function] }
}

/// `let s=0; for(let i=0;i<n;i=i+1) s=s+i; return s;` over
/// `(int32) -> int32`; result is `n*(n-1)/2` for `n >= 0`.
fn sum_loop() -> FixtureProgram {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let n = Symbol::from_raw(0);
    let s = Symbol::from_raw(1);
    let i = Symbol::from_raw(2);

    let zero = node(&mut arena, ExprKind::IntLiteral(0), Type::Int32);
    let s_decl = node(&mut arena, ExprKind::VarDecl { symbol: s, ty: Type::Int32, init: Some(zero) }, Type::Void);

    let i_init_lit = node(&mut arena, ExprKind::IntLiteral(0), Type::Int32);
    let i_decl =
        node(&mut arena, ExprKind::VarDecl { symbol: i, ty: Type::Int32, init: Some(i_init_lit) }, Type::Void);

    let i_ref_cond = node(&mut arena, ExprKind::Identifier(i), Type::Int32);
    let n_ref = node(&mut arena, ExprKind::Identifier(n), Type::Int32);
    let cond = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Lt, left: i_ref_cond, right: n_ref },
        Type::Bool,
    );

    let s_ref_body = node(&mut arena, ExprKind::Identifier(s), Type::Int32);
    let i_ref_body = node(&mut arena, ExprKind::Identifier(i), Type::Int32);
    let s_plus_i = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Add, left: s_ref_body, right: i_ref_body },
        Type::Int32,
    );
    let s_target = node(&mut arena, ExprKind::Identifier(s), Type::Int32);
    let body_assign = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Assign, left: s_target, right: s_plus_i },
        Type::Int32,
    );

    let i_ref_update = node(&mut arena, ExprKind::Identifier(i), Type::Int32);
    let one = node(&mut arena, ExprKind::IntLiteral(1), Type::Int32);
    let i_plus_one = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Add, left: i_ref_update, right: one },
        Type::Int32,
    );
    let i_target = node(&mut arena, ExprKind::Identifier(i), Type::Int32);
    let update = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Assign, left: i_target, right: i_plus_one },
        Type::Int32,
    );

    let for_loop = node(
        &mut arena,
        ExprKind::For { init: Some(i_decl), cond: Some(cond), update: Some(update), body: body_assign },
        Type::Void,
    );

    let s_ref_ret = node(&mut arena, ExprKind::Identifier(s), Type::Int32);
    let ret = node(&mut arena, ExprKind::Return(Some(s_ref_ret)), Type::Void);
    let body = node(&mut arena, ExprKind::Block(vec![s_decl, for_loop, ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("sum_loop");
    let function = Function {
        name,
        symbol: Symbol::from_raw(101),
        params: vec![Param { symbol: n, ty: Type::Int32, span: Span::DUMMY }],
        ret: Type::Int32,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    FixtureProgram { name: "sum_loop", arena, interner, functions: vec![function] }
}

/// `if (a<b) return a; return b;` over `(int32, int32) ->
/// int32` — returns the minimum; both `return`s branch into the function's
/// single epilogue block, which merges their values with a two-way phi
/// rather than emitting a `ret` from each block directly.
fn min() -> FixtureProgram {
    let mut arena = ExprArena::new();
    let mut interner = StringInterner::new();

    let a = Symbol::from_raw(0);
    let b = Symbol::from_raw(1);

    let a_ref_cond = node(&mut arena, ExprKind::Identifier(a), Type::Int32);
    let b_ref_cond = node(&mut arena, ExprKind::Identifier(b), Type::Int32);
    let cond = node(
        &mut arena,
        ExprKind::Binary { op: glint_ast::BinaryOp::Lt, left: a_ref_cond, right: b_ref_cond },
        Type::Bool,
    );

    let a_ref_ret = node(&mut arena, ExprKind::Identifier(a), Type::Int32);
    let then_ret = node(&mut arena, ExprKind::Return(Some(a_ref_ret)), Type::Void);
    let if_expr = node(&mut arena, ExprKind::If { cond, then_branch: then_ret, else_branch: None }, Type::Void);

    let b_ref_ret = node(&mut arena, ExprKind::Identifier(b), Type::Int32);
    let fallthrough_ret = node(&mut arena, ExprKind::Return(Some(b_ref_ret)), Type::Void);

    let body = node(&mut arena, ExprKind::Block(vec![if_expr, fallthrough_ret]), Type::Void);

    let directive = interner.intern(DIRECTIVE);
    let name = interner.intern("min");
    let function = Function {
        name,
        symbol: Symbol::from_raw(102),
        params: vec![
            Param { symbol: a, ty: Type::Int32, span: Span::DUMMY },
            Param { symbol: b, ty: Type::Int32, span: Span::DUMMY },
        ],
        ret: Type::Int32,
        directive: Some(directive),
        body,
        span: Span::DUMMY,
    };

    FixtureProgram { name: "min", arena, interner, functions: vec![function] }
}
