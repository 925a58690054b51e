//! Non-terminal (named rule): the recursion/memoization protocol — spec
//! §4.E, the core of this crate (§2 table gives it 30% of the budget).
//!
//! Grounded on `peglib`'s `NonTerminal::parse` (`Parser.h`) for the
//! seed/grow-the-seed shape, and on the teacher crate's
//! `backtracking_parser.rs` for two idioms carried forward as-is:
//! `by_address::ByAddress` as the memo key (rule identity, not structural
//! equality) and `stacker::maybe_grow` guarding the recursive descent so a
//! deep or pathological grammar doesn't blow the host stack.

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::context::Context;
use crate::expr::{contains_cut, Expr};
use crate::input::{Element, Position};

/// Per-`(rule, start-pos)` memo cell (spec §3). `last_pos` is the end of
/// the best match found so far; `last_return` is its outcome. Seeded to
/// `{last_pos: start_pos, last_return: false}` — "fail at the start
/// position" — which is exactly the value a left-recursive re-entry
/// needs to see in order to take its non-recursive alternative first.
#[derive(Debug, Clone, Copy)]
pub struct RuleState {
    pub last_pos: Position,
    pub last_return: bool,
}

/// A semantic action: invoked at most once per successful rule match,
/// with a read-only view of the context (so it structurally cannot
/// mutate position or memo, per spec §4.E's contract) and the matched
/// range `[start, end)`.
pub type Action<E> = Box<dyn Fn(&Context<E>, Range<Position>)>;

/// An immutable, shared expression tree rooted at a child expression plus
/// an optional semantic action (spec §3's "Rule object"). Cloning a
/// `Rule` clones the `Rc` — all clones refer to the same grammar node,
/// which is what makes `by_address::ByAddress<Rule<E>>` a correct memo
/// key. Recursive and mutually-recursive references go through
/// `expr::rule_ref`'s `Weak` handle instead of a strong `Rc` clone, so a
/// grammar's rule graph has no reference cycle (spec §3: "without
/// lifetime cycles") — whatever owns the grammar's rules is responsible
/// for keeping every one of them alive for as long as it parses.
pub type Rule<E> = Rc<RuleInner<E>>;

pub struct RuleInner<E: Element> {
    name: Option<String>,
    body: RefCell<Option<Expr<E>>>,
    action: RefCell<Option<Action<E>>>,
    contains_cut: Cell<bool>,
}

/// Produces a named non-terminal whose body is assigned later via
/// [`RuleInner::set_body`], permitting forward and recursive references
/// (spec §6's `rule()` factory, §9's "forward references").
pub fn rule<E: Element>() -> Rule<E> {
    RuleInner::new(None)
}

pub fn named_rule<E: Element>(name: impl Into<String>) -> Rule<E> {
    RuleInner::new(Some(name.into()))
}

/// Registers (or replaces) `rule`'s semantic action (spec §6's
/// `set_action`).
pub fn set_action<E: Element>(rule: &Rule<E>, action: impl Fn(&Context<E>, Range<Position>) + 'static) {
    rule.set_action(action);
}

impl<E: Element> RuleInner<E> {
    fn new(name: Option<String>) -> Rule<E> {
        Rc::new(RuleInner {
            name,
            body: RefCell::new(None),
            action: RefCell::new(None),
            contains_cut: Cell::new(false),
        })
    }

    /// Assigns (or replaces) the rule's body. Also recomputes whether the
    /// body contains a `cut`, so `invoke` knows up front whether it needs
    /// to push a cut frame on entry (spec §4.B, §9).
    pub fn set_body(self: &Rc<Self>, body: Expr<E>) {
        self.contains_cut.set(contains_cut(&body));
        *self.body.borrow_mut() = Some(body);
    }

    pub fn set_action(self: &Rc<Self>, action: impl Fn(&Context<E>, Range<Position>) + 'static) {
        *self.action.borrow_mut() = Some(Box::new(action));
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invokes this rule at the context's current position (spec §4.E).
    /// Guarded by `stacker::maybe_grow` per spec §5's reentrancy note:
    /// implementers should offer an explicit-stack fallback for deep
    /// grammars, since grammar-level recursion is otherwise bounded only
    /// by the host stack.
    pub fn invoke(self: &Rc<Self>, ctx: &mut Context<E>) -> bool {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.invoke_inner(ctx))
    }

    fn invoke_inner(self: &Rc<Self>, ctx: &mut Context<E>) -> bool {
        let start_pos = ctx.position();
        let (fresh, seed) = ctx.rule_state(self, start_pos);

        if !fresh {
            // Already being evaluated (or completed): this is exactly the
            // re-entry a left-recursive rule hits mid-evaluation. Expose
            // the current best — initially the seed's "fail at start" —
            // and let the caller's sequence/choice continue from there.
            ctx.seek(seed.last_pos);
            return seed.last_return;
        }

        trace!(rule = self.name(), pos = start_pos, "entering rule");
        let has_cut = self.contains_cut.get();
        if has_cut {
            ctx.enter_cut_frame();
        }

        let mut state = seed;
        loop {
            ctx.seek(start_pos);
            let body_ref = self.body.borrow();
            let body = body_ref.as_ref().expect("rule invoked before its body was assigned");
            let result = crate::expr::eval(body, ctx);
            drop(body_ref);
            let end_pos = ctx.position();

            if result && end_pos > state.last_pos {
                state = RuleState { last_pos: end_pos, last_return: true };
                ctx.update_rule_state(self, start_pos, state);
                debug!(rule = self.name(), pos = start_pos, end = end_pos, "seed grew");
                continue;
            } else if result {
                // Matched, but no further than last time: stop growing.
                state.last_return = true;
                ctx.update_rule_state(self, start_pos, state);
                break;
            } else {
                // Body failed outright; keep whatever growth was achieved.
                break;
            }
        }

        if has_cut {
            ctx.leave_cut_frame();
        }

        ctx.seek(state.last_pos);
        let result = state.last_return;
        if result {
            if let Some(action) = self.action.borrow().as_ref() {
                action(ctx, start_pos..state.last_pos);
            }
        }
        result
    }
}
