//! Terminal, TerminalSequence, Empty and Cut — spec §4.C.
//!
//! Grounded on `peglib`'s `TerminalExpr`/`EmptyExpr` (`Parser.h`) and
//! `cut()` (`Rule.h`), minus the debug `std::cout` tracing that revision
//! left in — this crate uses `tracing` spans instead (see `SPEC_FULL.md`).

use std::rc::Rc;

use crate::context::Context;
use crate::input::Element;

/// What a [`super::Expr::Terminal`] matches against: a single value, a
/// finite set (membership), an inclusive range, or a predicate.
#[derive(Clone)]
pub enum ValueSpec<E: Element> {
    Single(E),
    /// Linear membership test — kept to a `Vec` rather than a `HashSet` so
    /// `ValueSpec` only needs `Element`'s `PartialEq`/`PartialOrd`, not
    /// `Eq + Hash`.
    Set(Vec<E>),
    /// Inclusive `[lo, hi]`.
    Range(E, E),
    Predicate(Rc<dyn Fn(&E) -> bool>),
}

impl<E: Element> ValueSpec<E> {
    fn matches(&self, value: &E) -> bool {
        match self {
            ValueSpec::Single(v) => value == v,
            ValueSpec::Set(vs) => vs.iter().any(|v| v == value),
            ValueSpec::Range(lo, hi) => lo <= value && value <= hi,
            ValueSpec::Predicate(f) => f(value),
        }
    }
}

pub(super) fn eval_terminal<E: Element>(spec: &ValueSpec<E>, ctx: &mut Context<E>) -> bool {
    if ctx.at_end() {
        return false;
    }
    match ctx.peek() {
        Some(value) if spec.matches(&value) => {
            ctx.advance();
            true
        }
        _ => false,
    }
}

pub(super) fn eval_terminal_seq<E: Element>(seq: &[E], ctx: &mut Context<E>) -> bool {
    let snapshot = ctx.snapshot();
    for expected in seq {
        if ctx.at_end() {
            ctx.restore(snapshot);
            return false;
        }
        match ctx.peek() {
            Some(value) if &value == expected => ctx.advance(),
            _ => {
                ctx.restore(snapshot);
                return false;
            }
        }
    }
    true
}

pub(super) fn eval_empty<E: Element>(_ctx: &mut Context<E>) -> bool {
    true
}

pub(super) fn eval_cut<E: Element>(ctx: &mut Context<E>) -> bool {
    ctx.set_cut();
    true
}
