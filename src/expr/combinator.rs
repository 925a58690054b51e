//! Sequence, Choice, Repetition, AndPredicate, NotPredicate — spec §4.D.
//!
//! Grounded on `peglib`'s `SequenceExpr`, `AlternationExpr`, `Repetition`,
//! `AndExpr`, `NotExpr` (`Parser.h`). All combinators restore the context
//! snapshot on failure, matching that file's `context.state(state)` calls.

use super::Expr;
use crate::context::Context;
use crate::input::Element;

pub(super) fn eval_sequence<E: Element>(children: &[Expr<E>], ctx: &mut Context<E>) -> bool {
    let snapshot = ctx.snapshot();
    for child in children {
        if !super::eval(child, ctx) {
            ctx.restore(snapshot);
            return false;
        }
    }
    true
}

pub(super) fn eval_choice<E: Element>(children: &[Expr<E>], ctx: &mut Context<E>) -> bool {
    for child in children {
        if super::eval(child, ctx) {
            return true;
        }
    }
    false
}

/// `max = None` means unbounded. Construction-time invariant
/// (`max.is_none() || max >= Some(min)`) is enforced by the factory
/// functions in `super`, not here.
pub(super) fn eval_repetition<E: Element>(
    child: &Expr<E>,
    min: usize,
    max: Option<usize>,
    ctx: &mut Context<E>,
) -> bool {
    let outer_snapshot = ctx.snapshot();
    let mut count = 0usize;
    loop {
        if let Some(max) = max {
            if count >= max {
                break;
            }
        }
        let before = ctx.snapshot();
        if !super::eval(child, ctx) {
            break;
        }
        count += 1;
        if ctx.snapshot() == before {
            // Matched without consuming: stop so the loop can't spin forever.
            break;
        }
    }
    if count < min {
        ctx.restore(outer_snapshot);
        return false;
    }
    true
}

pub(super) fn eval_and_predicate<E: Element>(child: &Expr<E>, ctx: &mut Context<E>) -> bool {
    let snapshot = ctx.snapshot();
    let result = super::eval(child, ctx);
    ctx.restore(snapshot);
    result
}

pub(super) fn eval_not_predicate<E: Element>(child: &Expr<E>, ctx: &mut Context<E>) -> bool {
    let snapshot = ctx.snapshot();
    let result = super::eval(child, ctx);
    ctx.restore(snapshot);
    !result
}
