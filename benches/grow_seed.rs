use criterion::*;
use peg_recognize::expr::*;
use peg_recognize::input::slice::SliceSource;
use peg_recognize::rule::rule;
use peg_recognize::{driver, Rule};

/// `add = add '+' mul | add '-' mul | mul ; mul = mul '*' num | mul '/' num
/// | num ; num = digit+ | '(' add ')'` — the same left-recursive
/// arithmetic grammar as spec §8 scenario #2, built fresh each call so the
/// memo table starts empty (worst case for a left-recursive grammar).
///
/// Returns `add` alongside `mul`/`num`: back-references built with
/// `rule_ref` are non-owning `Weak` handles, so the caller has to hold
/// every rule in the cycle alive itself for as long as it parses.
fn build_arithmetic_grammar() -> (Rule<char>, [Rule<char>; 2]) {
    let add = rule();
    let mul = rule();
    let num = rule();

    num.set_body(choice(vec![
        one_or_more(terminal_in_range('0', '9')),
        sequence(vec![terminal('('), rule_ref(&add), terminal(')')]),
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

    (add, [mul, num])
}

fn repeated_sum_expression(terms: usize) -> String {
    let mut s = String::from("1");
    for _ in 1..terms {
        s.push_str("+1");
    }
    s
}

fn bench_flat_left_recursive_chain(c: &mut Criterion) {
    let input = repeated_sum_expression(200);
    c.bench_function("grow_seed_flat_chain_200_terms", move |b| {
        b.iter(|| {
            let (grammar, _rules) = build_arithmetic_grammar();
            let result = driver::run(&grammar, Box::new(SliceSource::from_str(&input)));
            black_box(result)
        })
    });
}

fn bench_nested_parentheses(c: &mut Criterion) {
    let depth = 40;
    let input = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    c.bench_function("grow_seed_nested_parens_depth_40", move |b| {
        b.iter(|| {
            let (grammar, _rules) = build_arithmetic_grammar();
            let result = driver::run(&grammar, Box::new(SliceSource::from_str(&input)));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_flat_left_recursive_chain, bench_nested_parentheses);
criterion_main!(benches);
