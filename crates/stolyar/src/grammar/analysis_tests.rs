use crate::{Grammar, GrammarError, Matcher, Value};

fn build<const N: usize>(root: &str, rules: [(&str, Matcher); N]) -> Grammar {
    Grammar::new(root, rules).unwrap()
}

fn build_err<const N: usize>(root: &str, rules: [(&str, Matcher); N]) -> GrammarError {
    Grammar::<Value>::new(root, rules).unwrap_err()
}

#[test]
fn nullability_propagates_through_references() {
    let grammar = build(
        "padded",
        [
            ("ws", Matcher::star(Matcher::literal(" "))),
            (
                "padded",
                Matcher::seq([Matcher::rule("ws"), Matcher::literal("x"), Matcher::rule("ws")]),
            ),
        ],
    );

    insta::assert_snapshot!(grammar.dump_analysis(), @r"
    ws: nullable=true first={}
    padded: nullable=false first={ws}
    ");
}

#[test]
fn nullability_reaches_fixpoint_over_mutual_references() {
    // b is nullable only via a, which is nullable only via its empty arm;
    // one pass over the map in order is not enough, the fixpoint is.
    let grammar = build(
        "b",
        [
            ("b", Matcher::rule("a")),
            ("a", Matcher::choice([Matcher::literal("x"), Matcher::empty()])),
        ],
    );

    insta::assert_snapshot!(grammar.dump_analysis(), @r"
    b: nullable=true first={a}
    a: nullable=true first={}
    ");
}

#[test]
fn first_set_extends_only_through_nullable_prefixes() {
    let grammar = build(
        "s",
        [
            ("opt", Matcher::choice([Matcher::literal("-"), Matcher::empty()])),
            ("num", Matcher::regex("[0-9]+")),
            ("unit", Matcher::literal("px")),
            (
                "s",
                Matcher::seq([
                    Matcher::rule("opt"),
                    Matcher::rule("num"),
                    Matcher::rule("unit"),
                ]),
            ),
        ],
    );

    // `opt` is nullable so `num` is also a first-position entry; `num` is
    // not, so `unit` never is.
    insta::assert_snapshot!(grammar.dump_analysis(), @r"
    opt: nullable=true first={}
    num: nullable=false first={}
    unit: nullable=false first={}
    s: nullable=false first={opt, num}
    ");
}

#[test]
fn regex_that_can_match_empty_is_nullable() {
    let grammar = build("a", [("a", Matcher::regex("x*"))]);

    insta::assert_snapshot!(grammar.dump_analysis(), @"a: nullable=true first={}");
}

#[test]
fn direct_left_recursion_is_rejected() {
    let err = build_err("S", [("S", Matcher::seq([Matcher::rule("S")]))]);

    assert_eq!(err, GrammarError::LeftRecursion { cycle: vec!["S".into()] });
    insta::assert_snapshot!(err, @"left-recursive cycle `S` → `S`");
}

#[test]
fn left_recursion_through_a_nullable_prefix_is_rejected() {
    // Only left-recursive because B is nullable: A -> B A.
    let err = build_err(
        "A",
        [
            (
                "A",
                Matcher::choice([
                    Matcher::literal("Y"),
                    Matcher::seq([Matcher::rule("B"), Matcher::rule("A")]),
                ]),
            ),
            ("B", Matcher::empty()),
        ],
    );

    assert_eq!(err, GrammarError::LeftRecursion { cycle: vec!["A".into()] });
}

#[test]
fn long_left_recursion_chains_are_rejected() {
    // Left-recursive through A -> B -> D -> A; no two-rule shortcut exists.
    let err = build_err(
        "A",
        [
            ("A", Matcher::seq([Matcher::rule("B")])),
            ("B", Matcher::choice([Matcher::rule("C"), Matcher::rule("D")])),
            ("C", Matcher::seq([Matcher::literal("C")])),
            ("D", Matcher::choice([Matcher::rule("C"), Matcher::rule("A")])),
        ],
    );

    assert_eq!(
        err,
        GrammarError::LeftRecursion {
            cycle: vec!["A".into(), "B".into(), "D".into()],
        }
    );
    insta::assert_snapshot!(err, @"left-recursive cycle `A` → `B` → `D` → `A`");
}

#[test]
fn guarded_recursion_is_accepted() {
    // Recursion behind a consumed "(" terminates fine.
    let grammar = build(
        "list",
        [(
            "list",
            Matcher::seq([
                Matcher::literal("("),
                Matcher::star(Matcher::rule("list")),
                Matcher::literal(")"),
            ]),
        )],
    );

    insta::assert_snapshot!(grammar.dump_analysis(), @"list: nullable=false first={}");
}

#[test]
fn unbounded_repetition_over_a_nullable_rule_is_rejected() {
    let err = build_err(
        "S",
        [
            ("S", Matcher::repeat(Matcher::rule("A"), 7, None)),
            ("A", Matcher::empty()),
        ],
    );

    assert_eq!(err, GrammarError::NullableRepetition { rule: "S".into() });
}

#[test]
fn unbounded_repetition_over_nested_stars_is_rejected() {
    // The inner star is itself nullable, so the outer one can spin forever.
    let err = build_err(
        "S",
        [
            ("S", Matcher::star(Matcher::rule("A"))),
            ("A", Matcher::star(Matcher::rule("B"))),
            ("B", Matcher::empty()),
        ],
    );

    assert_eq!(err, GrammarError::NullableRepetition { rule: "S".into() });
}

#[test]
fn unbounded_repetition_over_an_inline_nullable_body_is_rejected() {
    let err = build_err("S", [("S", Matcher::star(Matcher::star(Matcher::literal("x"))))]);

    assert_eq!(err, GrammarError::NullableRepetition { rule: "S".into() });
}

#[test]
fn unbounded_repetition_over_an_empty_matching_regex_is_rejected() {
    let err = build_err("S", [("S", Matcher::star(Matcher::regex("a*")))]);

    assert_eq!(err, GrammarError::NullableRepetition { rule: "S".into() });
}

#[test]
fn bounded_repetition_over_a_nullable_body_is_accepted() {
    // Bounded application count terminates regardless of body width; the
    // greedy loop applies the zero-width body the full four times.
    let grammar = build("S", [("S", Matcher::repeat(Matcher::empty(), 0, Some(4)))]);

    assert_eq!(grammar.parse("").unwrap(), Value::List(vec![Value::Empty; 4]));
}

#[test]
fn unbounded_repetition_over_a_consuming_body_is_accepted() {
    let grammar = build("S", [("S", Matcher::star(Matcher::regex("a+")))]);

    assert!(grammar.parse("aaa").is_ok());
}
