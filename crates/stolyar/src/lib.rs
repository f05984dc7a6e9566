//! Stolyar: validated grammars with recursive-descent matching.
//!
//! A [`Grammar`] is a map of named rules, each rule a tree of [`Matcher`]s.
//! Rules refer to each other by name ([`Matcher::rule`]), so recursive and
//! mutually recursive grammars are built as a flat map with no forward
//! declarations. Construction validates the whole rule set once (undefined
//! references, left-recursive cycles and unbounded repetition over nullable
//! bodies are all rejected up front), after which matching is guaranteed to
//! terminate on every input.
//!
//! # Example
//!
//! ```
//! use stolyar::{Grammar, Matcher};
//!
//! let grammar: Grammar = Grammar::new(
//!     "list",
//!     [
//!         // list  <- "(" items ")"
//!         (
//!             "list",
//!             Matcher::seq([
//!                 Matcher::literal("("),
//!                 Matcher::rule("items"),
//!                 Matcher::literal(")"),
//!             ]),
//!         ),
//!         // items <- item*
//!         ("items", Matcher::star(Matcher::rule("item"))),
//!         // item  <- list | atom
//!         (
//!             "item",
//!             Matcher::choice([Matcher::rule("list"), Matcher::regex("[a-z]+")]),
//!         ),
//!     ],
//! )?;
//!
//! let value = grammar.parse("(a(bc)d)")?;
//! assert_eq!(value.flatten(), "(a(bc)d)");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Matching is a plain recursive descent: ordered choice takes the first
//! alternative that succeeds, repetition is greedy and never gives
//! applications back. There is no lookahead table and no backtracking beyond
//! what those two rules imply, which keeps the behavior easy to predict from
//! the grammar text alone.

pub mod grammar;
pub mod matcher;
pub mod value;

pub use grammar::Grammar;
pub use matcher::{Action, Matcher};
pub use value::{SyntaxValue, Value};

/// Errors detected while building a [`Grammar`].
///
/// All of these are fatal: the grammar value is never constructed. They are
/// reported in validation order, structure before termination checks, so a
/// single error is always the first problem a reader should fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// The rule map has no entries.
    #[error("rule map is empty")]
    EmptyRules,

    /// The designated root name is not a key of the rule map.
    #[error("root rule `{0}` is not defined")]
    MissingRoot(String),

    /// The same rule name was supplied twice.
    #[error("duplicate rule `{0}`")]
    DuplicateRule(String),

    /// A rule body references a name with no entry in the map.
    #[error("rule `{rule}` references undefined rule `{referenced}`")]
    UndefinedReference { rule: String, referenced: String },

    /// A bounded repetition has `max < min` and could never succeed.
    #[error("rule `{rule}` repeats between {min} and {max} times")]
    InvalidRepeatBounds { rule: String, min: usize, max: usize },

    /// A regex primitive failed to compile.
    #[error("rule `{rule}` has an invalid regex `{pattern}`: {message}")]
    BadRegex {
        rule: String,
        pattern: String,
        message: String,
    },

    /// Some rule can re-enter itself before any input is consumed.
    #[error("left-recursive cycle {}", fmt_cycle(.cycle))]
    LeftRecursion { cycle: Vec<String> },

    /// An unbounded repetition wraps a body that can match the empty string,
    /// so it could apply forever without advancing.
    #[error("unbounded repetition in rule `{rule}` has a body that can match the empty string")]
    NullableRepetition { rule: String },
}

/// Errors from [`Grammar::parse`]. The grammar itself stays valid; a failed
/// parse only describes this input.
///
/// Both variants carry the furthest byte offset reached by any attempted
/// match, which is usually the most useful place to point a user at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The root rule did not match.
    #[error("no match (failed after byte {furthest})")]
    NoMatch { furthest: usize },

    /// The root rule matched a strict prefix of the input.
    #[error("trailing input from byte {end}")]
    TrailingInput { end: usize, furthest: usize },
}

fn fmt_cycle(cycle: &[String]) -> String {
    let mut names: Vec<String> = cycle.iter().map(|n| format!("`{n}`")).collect();
    if let Some(first) = names.first().cloned() {
        names.push(first);
    }
    names.join(" → ")
}
