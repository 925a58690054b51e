//! The expression tree: spec §3's "discriminated tree whose nodes are the
//! variants listed in §2(C,D,E)". Implemented as a tagged union per
//! spec §9's design note ("a tagged union of node variants, or a
//! trait/interface, whichever the target language makes zero-cost") —
//! an enum is the zero-cost choice in Rust, reserving `Rc`/`dyn` only for
//! the genuinely shared/open-ended leaves (rule references, predicates).

pub mod combinator;
pub mod primitive;

use std::rc::{Rc, Weak};

use crate::context::Context;
use crate::input::Element;
use crate::rule::{Rule, RuleInner};
use primitive::ValueSpec;

/// One node of a grammar's expression tree (spec §4.C, §4.D, plus the
/// `NonTerminalRef` leaf that lets a sequence/choice/repetition refer to
/// a named, possibly-recursive [`Rule`]).
///
/// `NonTerminalRef` holds a non-owning [`Weak`] handle rather than cloning
/// the rule's `Rc`. A recursive or mutually-recursive rule graph is built
/// entirely out of such back-references (spec §3: "rules are shared and
/// may be recursively referenced without lifetime cycles"); a strong
/// `Rc` clone here would make every left-recursive grammar a reference
/// cycle that never deallocates. See `peglib`'s `Rule.h`/`Parser.h`,
/// which wrap a recursive reference as a non-owning C++ reference for the
/// same reason.
pub enum Expr<E: Element> {
    Terminal(ValueSpec<E>),
    TerminalSeq(Vec<E>),
    Empty,
    Cut,
    Sequence(Vec<Expr<E>>),
    Choice(Vec<Expr<E>>),
    Repetition { child: Box<Expr<E>>, min: usize, max: Option<usize> },
    AndPredicate(Box<Expr<E>>),
    NotPredicate(Box<Expr<E>>),
    NonTerminalRef(Weak<RuleInner<E>>),
}

/// Evaluates one expression node against `ctx`. This is the single
/// recursive entry point every combinator and [`Rule::invoke`] calls back
/// into; `stacker`-guarded deep recursion lives at the rule-invocation
/// boundary (`rule.rs`), not here, since that's the only place recursion
/// can be unbounded (grammar cycles go through named rules).
pub fn eval<E: Element>(expr: &Expr<E>, ctx: &mut Context<E>) -> bool {
    match expr {
        Expr::Terminal(spec) => primitive::eval_terminal(spec, ctx),
        Expr::TerminalSeq(seq) => primitive::eval_terminal_seq(seq, ctx),
        Expr::Empty => primitive::eval_empty(ctx),
        Expr::Cut => primitive::eval_cut(ctx),
        Expr::Sequence(children) => combinator::eval_sequence(children, ctx),
        Expr::Choice(children) => combinator::eval_choice(children, ctx),
        Expr::Repetition { child, min, max } => combinator::eval_repetition(child, *min, *max, ctx),
        Expr::AndPredicate(child) => combinator::eval_and_predicate(child, ctx),
        Expr::NotPredicate(child) => combinator::eval_not_predicate(child, ctx),
        Expr::NonTerminalRef(weak) => {
            let rule = weak.upgrade().expect(
                "non-terminal reference outlived the rule it points to — the grammar's owning \
                 Rule must stay alive for the duration of the parse",
            );
            rule.invoke(ctx)
        }
    }
}

/// Does this expression tree contain a `cut`, without crossing into any
/// named rule it references? Computed once when a rule's body is
/// assigned (`Rule::set_body`) so `Rule::invoke` knows whether to push a
/// cut frame — spec §9's resolution of the "cut frames vs. rule
/// boundaries" open question. This is a structural walk, not a grammar
/// analysis: it never needs to resolve left-recursive cycles because it
/// stops the instant it reaches a `NonTerminalRef`.
pub(crate) fn contains_cut<E: Element>(expr: &Expr<E>) -> bool {
    match expr {
        Expr::Cut => true,
        Expr::Terminal(_) | Expr::TerminalSeq(_) | Expr::Empty | Expr::NonTerminalRef(_) => false,
        Expr::Sequence(children) | Expr::Choice(children) => children.iter().any(contains_cut),
        Expr::Repetition { child, .. } | Expr::AndPredicate(child) | Expr::NotPredicate(child) => {
            contains_cut(child)
        }
    }
}

// ---- Grammar construction factory API (spec §6) ----

pub fn terminal<E: Element>(value: E) -> Expr<E> {
    Expr::Terminal(ValueSpec::Single(value))
}

pub fn terminal_in_set<E: Element>(values: Vec<E>) -> Expr<E> {
    Expr::Terminal(ValueSpec::Set(values))
}

pub fn terminal_in_range<E: Element>(lo: E, hi: E) -> Expr<E> {
    Expr::Terminal(ValueSpec::Range(lo, hi))
}

pub fn terminal_matching<E: Element>(predicate: impl Fn(&E) -> bool + 'static) -> Expr<E> {
    Expr::Terminal(ValueSpec::Predicate(Rc::new(predicate)))
}

pub fn terminal_seq<E: Element>(seq: Vec<E>) -> Expr<E> {
    Expr::TerminalSeq(seq)
}

pub fn empty<E: Element>() -> Expr<E> {
    Expr::Empty
}

pub fn cut_point<E: Element>() -> Expr<E> {
    Expr::Cut
}

/// A non-terminal back-reference to `rule`, for building recursive and
/// mutually-recursive grammars (spec §6, §9's "forward references"). Holds
/// a [`Weak`] handle — see `Expr::NonTerminalRef`'s doc comment for why a
/// strong clone here would leak every left-recursive grammar.
pub fn rule_ref<E: Element>(rule: &Rule<E>) -> Expr<E> {
    Expr::NonTerminalRef(Rc::downgrade(rule))
}

pub fn sequence<E: Element>(children: Vec<Expr<E>>) -> Expr<E> {
    Expr::Sequence(children)
}

pub fn choice<E: Element>(children: Vec<Expr<E>>) -> Expr<E> {
    Expr::Choice(children)
}

pub fn and_predicate<E: Element>(child: Expr<E>) -> Expr<E> {
    Expr::AndPredicate(Box::new(child))
}

pub fn not_predicate<E: Element>(child: Expr<E>) -> Expr<E> {
    Expr::NotPredicate(Box::new(child))
}

/// Builds a bounded repetition, validating `min <= max` up front — spec
/// §7's "Grammar configuration error": `min > max` fails construction
/// loudly rather than silently misbehaving at parse time.
pub fn n_times<E: Element>(n: usize, child: Expr<E>) -> Expr<E> {
    repetition(child, n, Some(n)).expect("n_times(n, _) bounds are always min==max")
}

pub fn zero_or_more<E: Element>(child: Expr<E>) -> Expr<E> {
    repetition(child, 0, None).expect("zero_or_more bounds are always valid")
}

pub fn one_or_more<E: Element>(child: Expr<E>) -> Expr<E> {
    repetition(child, 1, None).expect("one_or_more bounds are always valid")
}

pub fn optional<E: Element>(child: Expr<E>) -> Expr<E> {
    repetition(child, 0, Some(1)).expect("optional bounds are always valid")
}

pub fn repetition<E: Element>(
    child: Expr<E>,
    min: usize,
    max: Option<usize>,
) -> crate::error::Result<Expr<E>> {
    if let Some(max) = max {
        if max < min {
            return Err(crate::error::Error::InvalidRepetitionBounds { min, max });
        }
    }
    Ok(Expr::Repetition { child: Box::new(child), min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_cut_stops_at_rule_boundary() {
        let plain: Expr<char> = sequence(vec![terminal('a'), cut_point(), terminal('b')]);
        assert!(contains_cut(&plain));

        let none: Expr<char> = sequence(vec![terminal('a'), terminal('b')]);
        assert!(!contains_cut(&none));
    }

    #[test]
    fn invalid_repetition_bounds_rejected_at_construction() {
        let err = repetition(terminal('a'), 3, Some(1)).unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidRepetitionBounds { min: 3, max: 1 }));
    }
}
