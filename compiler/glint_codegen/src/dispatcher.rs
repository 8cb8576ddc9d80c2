//! The syntactic dispatcher: a closed match over every `ExprKind`
//! variant, each arm delegating to a focused generator in [`crate::gen`].
//! One exhaustive arm per variant, no catch-all — the surface language
//! here is closed by design, so a registry would only buy extensibility
//! the language doesn't have, and this stays a plain `match` rather than
//! a dynamic dispatch table.

use glint_ast::{ExprId, ExprKind};

use crate::error::{CodegenError, Result};
use crate::gen;
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

pub fn generate<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Option<Value>> {
    let node = ctx.arena.get(id);
    let span = node.span;

    match &node.kind {
        ExprKind::IntLiteral(_) | ExprKind::FloatLiteral(_) | ExprKind::BoolLiteral(_) | ExprKind::StringLiteral(_) => {
            gen::literal::generate(ctx, id).map(Some)
        }
        ExprKind::Identifier(_) => gen::identifier::generate(ctx, id).map(Some),
        ExprKind::Binary { .. } => gen::binary::generate(ctx, id).map(Some),
        ExprKind::Unary { .. } => gen::unary::generate(ctx, id).map(Some),
        ExprKind::Call { .. } => gen::call::generate(ctx, id),
        ExprKind::Property { .. } | ExprKind::Element { .. } => gen::object::generate_access(ctx, id).map(Some),
        ExprKind::New { .. } | ExprKind::ArrayLiteral(_) | ExprKind::ObjectLiteral(_) => {
            gen::object::generate_construct(ctx, id).map(Some)
        }
        ExprKind::VarDecl { .. } => gen::var_decl::generate(ctx, id).map(|()| None),
        ExprKind::If { .. } => gen::control_flow::generate_if(ctx, id),
        ExprKind::While { .. } => gen::control_flow::generate_while(ctx, id).map(|()| None),
        ExprKind::DoWhile { .. } => gen::control_flow::generate_do_while(ctx, id).map(|()| None),
        ExprKind::For { .. } => gen::control_flow::generate_for(ctx, id).map(|()| None),
        ExprKind::Break => gen::control_flow::generate_break(ctx, span).map(|()| None),
        ExprKind::Continue => gen::control_flow::generate_continue(ctx, span).map(|()| None),
        ExprKind::Return(_) => gen::control_flow::generate_return(ctx, id).map(|()| None),
        ExprKind::Block(_) => gen::control_flow::generate_block(ctx, id),
    }
}

/// Lower a required (non-void) subexpression — the common case for
/// operator operands and call arguments.
pub fn generate_value<R: TypeResolver>(
    ctx: &mut EmissionContext<'_, '_, '_, R>,
    id: ExprId,
) -> Result<Value> {
    generate(ctx, id)?.ok_or_else(|| CodegenError::UnsupportedSyntacticCategory {
        category: "void expression used as a value",
        span: ctx.arena.get(id).span,
    })
}
