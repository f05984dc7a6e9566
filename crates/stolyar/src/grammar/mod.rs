//! Grammar construction and matching pipeline.
//!
//! `Grammar::new` runs the validation stages in order: structure →
//! regex compilation → nullability fixpoint → first-sets → left recursion →
//! repetition safety. Each stage may assume the previous one passed. The
//! analysis tables are kept on the grammar but only validation reads them;
//! matching is a plain recursive descent with no lookahead dispatch.

mod analysis;
mod dump;
mod matching;
mod regex_table;

#[cfg(test)]
mod analysis_tests;

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::matcher::{Action, Matcher};
use crate::value::{SyntaxValue, Value};
use crate::{GrammarError, ParseError};

use matching::Cursor;
use regex_table::RegexTable;

/// A validated, immutable rule set.
///
/// Construction runs every static check; a `Grammar` that exists is
/// guaranteed to terminate on any input. It holds no per-parse state, so one
/// instance can serve any number of [`parse`](Self::parse) calls, from any
/// number of threads.
pub struct Grammar<V = Value> {
    root: String,
    rules: IndexMap<String, Matcher<V>>,
    root_action: Option<Action<V>>,
    regexes: RegexTable,
    /// Per rule: can it match zero characters. Fixpoint over the rule graph.
    nullable: IndexMap<String, bool>,
    /// Per rule: rule names reachable in first position, through nullable
    /// prefixes. The left-recursion pass walks these edges.
    first_refs: IndexMap<String, IndexSet<String>>,
}

impl<V> Grammar<V> {
    /// Validate `rules` and build a grammar rooted at `root`.
    ///
    /// The rule map is taken as an ordered sequence of `(name, body)` pairs;
    /// order is preserved in [`dump`](Self::dump) output and error reporting.
    pub fn new<S, I>(root: impl Into<String>, rules: I) -> Result<Self, GrammarError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, Matcher<V>)>,
    {
        let mut map = IndexMap::new();
        for (name, matcher) in rules {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(GrammarError::DuplicateRule(name));
            }
            map.insert(name, matcher);
        }

        let mut grammar = Grammar {
            root: root.into(),
            rules: map,
            root_action: None,
            regexes: RegexTable::default(),
            nullable: IndexMap::new(),
            first_refs: IndexMap::new(),
        };

        grammar.check_structure()?;
        grammar.compile_regexes()?;
        grammar.compute_nullability();
        grammar.compute_first_refs();
        grammar.check_left_recursion()?;
        grammar.check_repetition()?;

        Ok(grammar)
    }

    /// Attach a callback applied to the root rule's value on every
    /// successful parse. Receives that value as its only element.
    pub fn with_root_action(mut self, f: impl Fn(Vec<V>) -> V + Send + Sync + 'static) -> Self {
        self.root_action = Some(Arc::new(f));
        self
    }

    /// Name of the root rule.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Render every rule as `name -> body`, in rule-map order.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (name, matcher) in &self.rules {
            let _ = writeln!(out, "{name} -> {matcher}");
        }
        out
    }
}

impl<V: SyntaxValue> Grammar<V> {
    /// Match `input` in full against the root rule.
    ///
    /// Succeeds only when the root rule matches and consumes every byte of
    /// `input`; a matched prefix with trailing input is a failure. The error
    /// carries the furthest byte offset reached by any attempted match.
    pub fn parse(&self, input: &str) -> Result<V, ParseError> {
        let mut cursor = Cursor::new(input);
        let root = self
            .rules
            .get(&self.root)
            .expect("root rule is checked at construction");

        match self.match_at(root, &mut cursor, 0) {
            Some(result) if result.end == input.len() => Ok(match &self.root_action {
                Some(action) => action(vec![result.value]),
                None => result.value,
            }),
            Some(result) => Err(ParseError::TrailingInput {
                end: result.end,
                furthest: cursor.furthest,
            }),
            None => Err(ParseError::NoMatch {
                furthest: cursor.furthest,
            }),
        }
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("root", &self.root)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
