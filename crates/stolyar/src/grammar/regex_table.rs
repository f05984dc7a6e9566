//! Compile-once regex table.
//!
//! Every regex primitive in the rule set is compiled here during grammar
//! construction, deduplicated by pattern text. Matching looks patterns up by
//! string; nothing is compiled on the hot path.

use indexmap::IndexMap;
use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};

use crate::GrammarError;

struct RegexEntry {
    re: Regex,
    /// Whether the pattern can match a zero-length span, decided
    /// structurally from the parsed HIR (minimum match length of zero).
    nullable: bool,
}

#[derive(Default)]
pub(super) struct RegexTable {
    entries: IndexMap<String, RegexEntry>,
}

impl RegexTable {
    /// Compile and intern `pattern`. Repeated patterns compile once.
    pub(super) fn intern(&mut self, rule: &str, pattern: &str) -> Result<(), GrammarError> {
        if self.entries.contains_key(pattern) {
            return Ok(());
        }

        let bad_regex = |message: String| GrammarError::BadRegex {
            rule: rule.to_owned(),
            pattern: pattern.to_owned(),
            message,
        };

        let hir = regex_syntax::Parser::new()
            .parse(pattern)
            .map_err(|e| bad_regex(e.to_string()))?;
        let nullable = hir.properties().minimum_len() == Some(0);

        let re = Regex::new(pattern).map_err(|e| bad_regex(e.to_string()))?;

        self.entries
            .insert(pattern.to_owned(), RegexEntry { re, nullable });
        Ok(())
    }

    pub(super) fn nullable(&self, pattern: &str) -> bool {
        self.entries
            .get(pattern)
            .expect("regexes are compiled at construction")
            .nullable
    }

    /// Anchored search at byte offset `at`; returns the match's end offset.
    pub(super) fn find_at(&self, pattern: &str, input: &str, at: usize) -> Option<usize> {
        let entry = self
            .entries
            .get(pattern)
            .expect("regexes are compiled at construction");

        let search = Input::new(input).range(at..).anchored(Anchored::Yes);
        entry.re.find(search).map(|m| m.end())
    }
}
