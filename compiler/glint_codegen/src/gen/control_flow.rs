//! Structured control flow. Every loop shape funnels
//! through a header/body/latch/exit block layout so `break` and
//! `continue` always have a single, unambiguous landing pad; entering a
//! loop or a nested block pushes a guard (see [`crate::scope`]) so the
//! pad/scope stack unwinds correctly even when a lowering call below
//! returns early via `?`.

use glint_ast::{ExprId, ExprKind};

use crate::dispatcher;
use crate::error::{CodegenError, Result};
use crate::resolver::TypeResolver;
use crate::value::Value;
use crate::EmissionContext;

/// `if`/`else` — an epilogue phi merges branch results when both arms
/// produce a value of the same type; a value-less `if` (no `else`, or
/// either arm is a statement) returns `None`.
pub fn generate_if<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Option<Value>> {
    let node = ctx.arena.get(id);
    let ExprKind::If { cond, then_branch, else_branch } = &node.kind else {
        unreachable!("dispatcher only routes If here");
    };
    let (cond, then_branch, else_branch) = (*cond, *then_branch, *else_branch);

    let cond_value = dispatcher::generate_value(ctx, cond)?;
    let cond_ssa = cond_value.as_ssa(ctx.builder);

    let func = ctx.current_function;
    let then_bb = ctx.builder.append_block(func, "if_then");
    let else_bb = else_branch.map(|_| ctx.builder.append_block(func, "if_else"));
    let merge_bb = ctx.builder.append_block(func, "if_merge");

    ctx.builder.cond_br(cond_ssa, then_bb, else_bb.unwrap_or(merge_bb));

    ctx.builder.position_at_end(then_bb);
    let then_result = {
        let _guard = ctx.enter_scope();
        dispatcher::generate(ctx, then_branch)?
    };
    let then_exit = ctx.builder.current_block();
    if !then_exit.is_some_and(|b| ctx.builder.block_has_terminator(b)) {
        ctx.builder.br(merge_bb);
    }

    let mut else_result = None;
    let mut else_exit = None;
    if let Some(else_branch) = else_branch {
        let else_bb = else_bb.expect("else_bb created when else_branch is Some");
        ctx.builder.position_at_end(else_bb);
        else_result = {
            let _guard = ctx.enter_scope();
            dispatcher::generate(ctx, else_branch)?
        };
        else_exit = ctx.builder.current_block();
        if !else_exit.is_some_and(|b| ctx.builder.block_has_terminator(b)) {
            ctx.builder.br(merge_bb);
        }
    }

    ctx.builder.position_at_end(merge_bb);

    match (then_result, else_result) {
        (Some(then_val), Some(else_val)) if then_val.ty() == else_val.ty() => {
            let ty = then_val.ty();
            let llvm_ty = ctx.builder.lower_type(&ty);
            let then_ssa = then_val.as_ssa(ctx.builder);
            let else_ssa = else_val.as_ssa(ctx.builder);
            let incoming = [
                (then_ssa, then_exit.expect("then branch produced a value from some block")),
                (else_ssa, else_exit.expect("else branch produced a value from some block")),
            ];
            let merged = ctx
                .builder
                .phi_from_incoming(llvm_ty, &incoming, "if_result")
                .expect("two incoming edges always produce a phi");
            Ok(Some(Value::rvalue(merged, ty)))
        }
        _ => Ok(None),
    }
}

pub fn generate_block<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<Option<Value>> {
    let node = ctx.arena.get(id);
    let ExprKind::Block(stmts) = &node.kind else {
        unreachable!("dispatcher only routes Block here");
    };
    let stmts = stmts.clone();

    let _guard = ctx.enter_scope();
    let mut last = None;
    for (i, stmt_id) in stmts.iter().enumerate() {
        let result = dispatcher::generate(ctx, *stmt_id)?;
        if i == stmts.len() - 1 {
            last = result;
        }
    }
    Ok(last)
}

pub fn generate_while<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<()> {
    let node = ctx.arena.get(id);
    let ExprKind::While { cond, body } = &node.kind else {
        unreachable!("dispatcher only routes While here");
    };
    let (cond, body) = (*cond, *body);

    let func = ctx.current_function;
    let header_bb = ctx.builder.append_block(func, "while_header");
    let body_bb = ctx.builder.append_block(func, "while_body");
    let exit_bb = ctx.builder.append_block(func, "while_exit");

    ctx.builder.br(header_bb);
    ctx.builder.position_at_end(header_bb);
    let cond_value = dispatcher::generate_value(ctx, cond)?;
    let cond_ssa = cond_value.as_ssa(ctx.builder);
    ctx.builder.cond_br(cond_ssa, body_bb, exit_bb);

    ctx.builder.position_at_end(body_bb);
    {
        let _loop_guard = ctx.enter_loop(header_bb, exit_bb);
        let _scope_guard = ctx.enter_scope();
        dispatcher::generate(ctx, body)?;
    }
    if !ctx.builder.current_block().is_some_and(|b| ctx.builder.block_has_terminator(b)) {
        ctx.builder.br(header_bb);
    }

    ctx.builder.position_at_end(exit_bb);
    Ok(())
}

pub fn generate_do_while<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<()> {
    let node = ctx.arena.get(id);
    let ExprKind::DoWhile { body, cond } = &node.kind else {
        unreachable!("dispatcher only routes DoWhile here");
    };
    let (body, cond) = (*body, *cond);

    let func = ctx.current_function;
    let body_bb = ctx.builder.append_block(func, "do_body");
    let latch_bb = ctx.builder.append_block(func, "do_latch");
    let exit_bb = ctx.builder.append_block(func, "do_exit");

    ctx.builder.br(body_bb);
    ctx.builder.position_at_end(body_bb);
    {
        let _loop_guard = ctx.enter_loop(latch_bb, exit_bb);
        let _scope_guard = ctx.enter_scope();
        dispatcher::generate(ctx, body)?;
    }
    if !ctx.builder.current_block().is_some_and(|b| ctx.builder.block_has_terminator(b)) {
        ctx.builder.br(latch_bb);
    }

    ctx.builder.position_at_end(latch_bb);
    let cond_value = dispatcher::generate_value(ctx, cond)?;
    let cond_ssa = cond_value.as_ssa(ctx.builder);
    ctx.builder.cond_br(cond_ssa, body_bb, exit_bb);

    ctx.builder.position_at_end(exit_bb);
    Ok(())
}

pub fn generate_for<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<()> {
    let node = ctx.arena.get(id);
    let ExprKind::For { init, cond, update, body } = &node.kind else {
        unreachable!("dispatcher only routes For here");
    };
    let (init, cond, update, body) = (*init, *cond, *update, *body);

    let _init_scope = ctx.enter_scope();
    if let Some(init) = init {
        dispatcher::generate(ctx, init)?;
    }

    let func = ctx.current_function;
    let header_bb = ctx.builder.append_block(func, "for_header");
    let body_bb = ctx.builder.append_block(func, "for_body");
    let latch_bb = ctx.builder.append_block(func, "for_latch");
    let exit_bb = ctx.builder.append_block(func, "for_exit");

    ctx.builder.br(header_bb);
    ctx.builder.position_at_end(header_bb);
    match cond {
        Some(cond) => {
            let cond_value = dispatcher::generate_value(ctx, cond)?;
            let cond_ssa = cond_value.as_ssa(ctx.builder);
            ctx.builder.cond_br(cond_ssa, body_bb, exit_bb);
        }
        None => ctx.builder.br(body_bb),
    }

    ctx.builder.position_at_end(body_bb);
    {
        // `continue` targets the latch so the update expression always
        // runs before the next header check.
        let _loop_guard = ctx.enter_loop(latch_bb, exit_bb);
        let _scope_guard = ctx.enter_scope();
        dispatcher::generate(ctx, body)?;
    }
    if !ctx.builder.current_block().is_some_and(|b| ctx.builder.block_has_terminator(b)) {
        ctx.builder.br(latch_bb);
    }

    ctx.builder.position_at_end(latch_bb);
    if let Some(update) = update {
        dispatcher::generate(ctx, update)?;
    }
    ctx.builder.br(header_bb);

    ctx.builder.position_at_end(exit_bb);
    Ok(())
}

pub fn generate_break<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, span: glint_ast::Span) -> Result<()> {
    let pad = *ctx
        .innermost_loop()
        .ok_or(CodegenError::UnstructuredControlFlow { keyword: "break", span })?;
    ctx.builder.br(pad.break_block);
    Ok(())
}

pub fn generate_continue<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, span: glint_ast::Span) -> Result<()> {
    let pad = *ctx
        .innermost_loop()
        .ok_or(CodegenError::UnstructuredControlFlow { keyword: "continue", span })?;
    ctx.builder.br(pad.continue_block);
    Ok(())
}

/// Every `return` branches to the epilogue rather than emitting its own
/// terminator — see [`crate::function_compiler`] for where the epilogue
/// turns the accumulated values into the function's single `ret`.
pub fn generate_return<R: TypeResolver>(ctx: &mut EmissionContext<'_, '_, '_, R>, id: ExprId) -> Result<()> {
    let node = ctx.arena.get(id);
    let ExprKind::Return(value) = &node.kind else {
        unreachable!("dispatcher only routes Return here");
    };
    let value = *value;

    if let Some(value_id) = value {
        let value = dispatcher::generate_value(ctx, value_id)?;
        let ssa = value.as_ssa(ctx.builder);
        ctx.record_return_value(ssa);
    }
    ctx.builder.br(ctx.epilogue_block());
    Ok(())
}
