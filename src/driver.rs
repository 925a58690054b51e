//! The driver (spec §4.F): the only component that owns a [`Context`] and
//! knows how to wire it to an [`InputSource`]. Grounded on the teacher
//! crate's `main.rs`, which plays the same role (`parser.parse_string(...)`
//! as the single top-level entry point into the recognition engine).

use crate::context::Context;
use crate::input::{Element, InputSource, Position};
use crate::rule::Rule;

/// `{matched, final_position, at_end}` from spec §6's driver result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverResult {
    pub matched: bool,
    pub final_position: Position,
    pub at_end: bool,
}

/// Runs `root` against `source` and reports completion status. Performs
/// no I/O beyond what `source` itself does (spec §4.F) — opening a file
/// source, if that's what's passed in, already happened in the caller.
pub fn run<E: Element>(root: &Rule<E>, source: Box<dyn InputSource<E>>) -> DriverResult {
    let mut ctx = Context::new(source);
    let matched = root.invoke(&mut ctx);
    DriverResult { matched, final_position: ctx.position(), at_end: ctx.at_end() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::*;
    use crate::input::slice::SliceSource;
    use crate::rule::rule;

    /// Scenario #5 from spec §8: `2 * terminal('a')` (here: `n_times(2, ...)`)
    /// over `"a"` fails and does not advance.
    #[test]
    fn n_times_requires_exact_count() {
        let r = rule();
        r.set_body(n_times(2, terminal('a')));
        let result = run(&r, Box::new(SliceSource::from_str("a")));
        assert!(!result.matched);
        assert_eq!(result.final_position, 0);
    }

    /// Scenario #6: `terminal_seq("int")` over `"int"`.
    #[test]
    fn terminal_sequence_consumes_whole_literal() {
        let r = rule();
        r.set_body(terminal_seq(vec!['i', 'n', 't']));
        let result = run(&r, Box::new(SliceSource::from_str("int")));
        assert!(result.matched);
        assert!(result.at_end);
    }

    /// Scenario #7: `and_predicate('a')` over `"a"` succeeds without
    /// consuming.
    #[test]
    fn and_predicate_succeeds_without_consuming() {
        let r = rule();
        r.set_body(and_predicate(terminal('a')));
        let result = run(&r, Box::new(SliceSource::from_str("a")));
        assert!(result.matched);
        assert_eq!(result.final_position, 0);
    }

    /// Scenario #8: ordered choice picks the first matching alternative.
    #[test]
    fn choice_order_is_respected() {
        let r = rule();
        r.set_body(choice(vec![
            terminal_seq(vec!['a', 'b', 'b']),
            terminal_seq(vec!['a', 'b', 'c']),
        ]));
        let result = run(&r, Box::new(SliceSource::from_str("abc")));
        assert!(result.matched);
        assert!(result.at_end);
    }

    /// Scenario #2: a three-level arithmetic grammar with direct left
    /// recursion at every binary level.
    #[test]
    fn arithmetic_grammar_with_parens_and_precedence() {
        let add = rule();
        let mul = rule();
        let num = rule();

        num.set_body(choice(vec![
            one_or_more(terminal_in_range('0', '9')),
            sequence(vec![
                terminal('('),
                rule_ref(&add),
                terminal(')'),
            ]),
        ]));
        mul.set_body(choice(vec![
            sequence(vec![rule_ref(&mul), terminal('*'), rule_ref(&num)]),
            sequence(vec![rule_ref(&mul), terminal('/'), rule_ref(&num)]),
            rule_ref(&num),
        ]));
        add.set_body(choice(vec![
            sequence(vec![rule_ref(&add), terminal('+'), rule_ref(&mul)]),
            sequence(vec![rule_ref(&add), terminal('-'), rule_ref(&mul)]),
            rule_ref(&mul),
        ]));

        let result = run(&add, Box::new(SliceSource::from_str("(1*(2+3))*4")));
        assert!(result.matched);
        assert!(result.at_end);
    }

    #[test]
    fn failed_root_rule_reports_start_position_not_an_error() {
        let r = rule();
        r.set_body(n_times(2, terminal('a')));
        let result = run(&r, Box::new(SliceSource::from_str("a")));
        assert!(!result.matched);
        assert_eq!(result.final_position, 0);
        assert!(!result.at_end);
    }
}
