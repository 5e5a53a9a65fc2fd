use std::num::NonZeroUsize;

use pretty_assertions::assert_eq;
use seqcalc::{
    Evaluation, evaluate, evaluate_with,
    interpreter::{evaluator::Options, value::Value},
};

fn with_workers(src: &str, workers: usize) -> Evaluation {
    let workers = NonZeroUsize::new(workers).expect("worker count must not be zero");
    evaluate_with(src, &Options::with_workers(workers))
}

/// Runs `src` and checks that it reports nothing and prints `expected`.
fn assert_output(src: &str, expected: &[&str]) {
    let evaluation = evaluate(src);
    assert!(evaluation.diagnostics.is_empty(),
            "Script reported errors: {:?}",
            evaluation.messages());
    assert_eq!(evaluation.rendered_output(), expected);
}

/// Runs `src` and checks both its output and its diagnostic messages.
fn assert_failure(src: &str, expected_output: &[&str], expected_messages: &[&str]) {
    let evaluation = evaluate(src);
    assert_eq!(evaluation.messages(), expected_messages);
    assert_eq!(evaluation.rendered_output(), expected_output);
}

#[test]
fn assignment_and_output() {
    let evaluation = evaluate("var x = 5\nout x");
    let values: Vec<_> = evaluation.output.into_iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].0.line, 2);
    assert_eq!(values[0].1, Value::Int(5));
}

#[test]
fn division_promotes_only_when_uneven() {
    assert_output("out 4/2", &["2"]);
    assert_output("out 1/2", &["0.5"]);
    assert_output("out -9/3", &["-3"]);
    assert_output("out 7/-2", &["-3.5"]);
}

#[test]
fn float_arithmetic() {
    assert_output("out 1.5 * 2", &["3.0"]);
    assert_output("out .5 + 1", &["1.5"]);
    assert_output("out 3. - 1", &["2.0"]);
}

#[test]
fn exponentiation() {
    assert_output("out 2 ^ 10", &["1024"]);
    assert_output("out 2 ^ -1", &["0.5"]);
    assert_output("out 4 ^ 0.5", &["2.0"]);
}

#[test]
fn precedence_and_associativity() {
    assert_output("out 2 + 3 * 4 ^ 2", &["50"]);
    assert_output("out (2 + 3) * 4", &["20"]);
    assert_output("out 10 - 4 - 3", &["3"]);
    assert_output("out 2 ^ 3 ^ 2", &["64"]);
    assert_output("out 12 / 2 / 3", &["2"]);
}

#[test]
fn negative_literals() {
    assert_output("out 8-3", &["5"]);
    assert_output("out -1", &["-1"]);
    assert_output("var y = -3\nout y * -2", &["6"]);
    assert_output("out {-2, 1}", &["{-2, -1, 0, 1}"]);
}

#[test]
fn print_statements() {
    assert_output("print \"hello\"\nout 1", &["hello", "1"]);
    assert_output("print \"a\\tb \\\"quoted\\\"\"", &["a\tb \"quoted\""]);
}

#[test]
fn comments_are_ignored() {
    assert_output("# header\nvar x = 2 # the base\nout x ^ 2 # square", &["4"]);
}

#[test]
fn ranges() {
    assert_output("out {1, 5}", &["{1, 2, 3, 4, 5}"]);
    assert_output("out {3, 3}", &["{3}"]);
    assert_output("var lo = 2\nout {lo, lo * 2}", &["{2, 3, 4}"]);
}

#[test]
fn inverted_range_is_an_error() {
    let evaluation = evaluate("out {5,1}");
    assert_eq!(evaluation.rendered_output(), ["<error>"]);
    let message = evaluation.messages().concat().to_lowercase();
    for word in ["range", "upper bound", "smaller", "lower bound"] {
        assert!(message.contains(word), "{message:?} does not mention {word:?}");
    }
}

#[test]
fn range_bounds_must_be_ints_at_runtime() {
    assert_failure("out {1.5, 3}",
                   &["<error>"],
                   &["Lower bound of a range must be an integer and not 'Float'"]);
    assert_failure("out {1, 4/8}",
                   &["<error>"],
                   &["Upper bound of a range must be an integer and not 'Float'"]);
}

#[test]
fn division_by_zero() {
    assert_failure("out 1/0", &["<error>"], &["Division by 0"]);
    assert_failure("out 1.0/0", &["<error>"], &["Division by 0"]);

    let evaluation = evaluate("out 1/0");
    assert_eq!(evaluation.diagnostics[0].to_string(), "1:5 - 1:8: Division by 0");
}

#[test]
fn error_value_poisons_without_new_diagnostics() {
    assert_failure("var e = 1/0\nout e + 1\nout {e, 3}\nout 2",
                   &["<error>", "<error>", "2"],
                   &["Division by 0"]);
}

#[test]
fn integer_overflow_is_reported() {
    assert_failure("out 9223372036854775807 + 1",
                   &["<error>"],
                   &["Integer overflow while evaluating '+'"]);
    assert_failure("out 3 ^ 64", &["<error>"], &["Integer overflow while evaluating '^'"]);
}

#[test]
fn undeclared_variable_has_no_output() {
    let evaluation = evaluate("out z");
    assert!(evaluation.output.is_empty());
    assert_eq!(evaluation.messages(), ["Variable 'z' referenced before declaration"]);
}

#[test]
fn self_reference_and_redeclaration() {
    assert_failure("var x = x\nout 1", &["1"], &["Variable 'x' referenced before declaration"]);
    assert_failure("var x = 1\nvar x = 2\nout x",
                   &["1"],
                   &["Variable 'x' has already been declared"]);
}

#[test]
fn ill_typed_statements_are_dropped() {
    assert_failure("out {1, 2} + 1\nout 3",
                   &["3"],
                   &["Arithmetic operator '+' can only be used on number types and not on \
                      'Sequence<Number>' and 'Number'"]);
}

#[test]
fn parse_errors_skip_to_next_statement() {
    assert_failure("out (1 + 2\nout 3", &["3"], &["Expected ')' but found 'out'"]);
    assert_failure("x = 1\nout 2",
                   &["2"],
                   &["Unexpected start of statements. Statements must start with 'var', 'out' or \
                      'print' but found 'x'"]);
    assert_failure("out 99999999999999999999", &[], &["Integer literal '99999999999999999999' is \
                                                        too large"]);
}

#[test]
fn lexical_errors_are_reported() {
    let evaluation = evaluate("out 1.2.3\nout 4");
    assert_eq!(evaluation.messages()[0], "A number literal can only contain one '.'");
    assert_eq!(evaluation.rendered_output().last().map(String::as_str), Some("4"));
}

#[test]
fn map_shadows_without_corrupting_outer_variable() {
    assert_output("var x = 1\nout map({1,3}, x -> x*2)\nout x", &["{2, 4, 6}", "1"]);
}

#[test]
fn map_sees_global_variables() {
    assert_output("var k = 10\nout map({1, 3}, x -> x + k)", &["{11, 12, 13}"]);
    assert_output("out map({1, 3}, x -> {1, x})", &["{{1}, {1, 2}, {1, 2, 3}}"]);
}

#[test]
fn map_fails_as_a_whole() {
    for workers in 1..=4 {
        let evaluation = with_workers("out map({0, 2}, x -> 1 / x)", workers);
        assert_eq!(evaluation.rendered_output(), ["<error>"]);
        assert_eq!(evaluation.messages(), ["Division by 0"]);
    }
}

#[test]
fn reduce_sums() {
    assert_output("out reduce({1,4}, 0, x y -> x + y)", &["10"]);
    assert_output("out reduce({1, 4}, 0.5, a b -> a + b)", &["10.5"]);
    assert_output("out reduce({1, 5}, 1, a b -> a * b)", &["120"]);
}

#[test]
fn reduce_is_worker_count_invariant_for_addition() {
    for workers in 1..=8 {
        let evaluation = with_workers("out reduce({1,4}, 0, x y -> x + y)", workers);
        assert_eq!(evaluation.output.values().collect::<Vec<_>>(), [&Value::Int(10)]);
    }
}

#[test]
fn reduce_with_failing_base() {
    assert_failure("out reduce({1, 3}, 1/0, a b -> a)", &["<error>"], &["Division by 0"]);
}

#[test]
fn reduce_lambda_must_return_base_type() {
    assert_failure("out reduce({1, 3}, 0, a b -> {a, b})\nout 1",
                   &["1"],
                   &["The lambda of 'reduce' must return the same type as the base element \
                      ('Number'). Got 'Sequence<Number>'"]);
}

#[test]
fn pi_approximation() {
    let src = "var n = 500\n\
               var seq = map({0, n}, i -> (-1)^i / (2 * i + 1))\n\
               var pi = 4 * reduce(seq, 0, x y -> x + y)\n\
               out pi";
    let evaluation = evaluate(src);
    assert!(evaluation.diagnostics.is_empty(), "{:?}", evaluation.messages());
    let Some(Value::Float(pi)) = evaluation.output.values().next() else {
        panic!("expected a float, got {:?}", evaluation.output);
    };
    assert!((pi.0 - std::f64::consts::PI).abs() < 0.01, "{pi}");
}

#[test]
fn evaluation_is_idempotent() {
    let src = "var s = map({1, 50}, x -> x / 3)\nout reduce(s, 0, a b -> a + b)\nout 1/0\nout q";
    assert_eq!(evaluate(src), evaluate(src));
}
