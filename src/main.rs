use peg_recognize::expr::*;
use peg_recognize::input::slice::SliceSource;
use peg_recognize::rule::rule;
use peg_recognize::{driver, Rule};

/// Builds the same `PlusMinusExpr`/`MultDivExpr`/`AtomicExpr`/`Literal`
/// grammar the teacher crate's demo parsed from a textual grammar string,
/// using this engine's factory API instead — the textual surface syntax
/// is out of scope for this crate (`SPEC_FULL.md` §0).
///
/// Returns the root alongside every other rule it recursively references.
/// `Expr::NonTerminalRef` (built via `rule_ref`) holds a non-owning `Weak`
/// handle, so the caller must keep every rule in the cycle alive itself —
/// dropping `mult_div`/`atomic`/`literal`/`opt_whitespace` here and
/// returning only the root would leave the root's back-references
/// dangling.
fn build_grammar() -> (Rule<char>, [Rule<char>; 4]) {
    let plus_minus = rule();
    let mult_div = rule();
    let atomic = rule();
    let literal = rule();
    let opt_whitespace = rule();

    literal.set_body(choice(vec![terminal('a'), terminal('b'), terminal('c'), terminal('d')]));

    opt_whitespace.set_body(zero_or_more(terminal(' ')));

    atomic.set_body(sequence(vec![
        rule_ref(&opt_whitespace),
        choice(vec![
            rule_ref(&literal),
            sequence(vec![
                terminal('('),
                rule_ref(&plus_minus),
                terminal(')'),
            ]),
        ]),
        rule_ref(&opt_whitespace),
    ]));

    mult_div.set_body(choice(vec![
        sequence(vec![
            rule_ref(&mult_div),
            terminal('*'),
            rule_ref(&atomic),
        ]),
        sequence(vec![
            rule_ref(&mult_div),
            terminal('/'),
            rule_ref(&atomic),
        ]),
        rule_ref(&atomic),
    ]));

    plus_minus.set_body(choice(vec![
        sequence(vec![
            rule_ref(&plus_minus),
            terminal('+'),
            rule_ref(&mult_div),
        ]),
        sequence(vec![
            rule_ref(&plus_minus),
            terminal('-'),
            rule_ref(&mult_div),
        ]),
        rule_ref(&mult_div),
    ]));

    (plus_minus, [mult_div, atomic, literal, opt_whitespace])
}

fn main() {
    let (grammar, _rules) = build_grammar();
    let input = "   ( a + b)*( c +   a  *  (  d )+ c  )";
    let result = driver::run(&grammar, Box::new(SliceSource::from_str(input)));

    println!(
        "matched={} final_position={} at_end={}",
        result.matched, result.final_position, result.at_end
    );
}
