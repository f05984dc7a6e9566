//! Recursive-descent matching.
//!
//! One function per call: `match_at` dispatches on the matcher variant and
//! recurses into children, threading byte offsets. Ordered choice commits to
//! the first alternative that matches; repetition is greedy and never gives
//! applications back. The cursor carries the furthest offset reached, which
//! is all a failed parse reports.

use crate::matcher::{Action, Matcher};
use crate::value::SyntaxValue;

use super::Grammar;

/// Per-parse state: the input and the furthest byte offset any attempt
/// reached. Matching itself is stateless beyond this.
pub(super) struct Cursor<'a> {
    input: &'a str,
    pub(super) furthest: usize,
}

impl<'a> Cursor<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Cursor { input, furthest: 0 }
    }

    fn note(&mut self, at: usize) {
        if at > self.furthest {
            self.furthest = at;
        }
    }
}

/// A successful match: where it ended and what it produced.
pub(super) struct MatchResult<V> {
    pub(super) end: usize,
    pub(super) value: V,
}

impl<V: SyntaxValue> Grammar<V> {
    pub(super) fn match_at(
        &self,
        matcher: &Matcher<V>,
        cursor: &mut Cursor<'_>,
        at: usize,
    ) -> Option<MatchResult<V>> {
        cursor.note(at);

        match matcher {
            Matcher::Literal { text, action } => {
                if !cursor.input[at..].starts_with(text.as_str()) {
                    return None;
                }
                let end = at + text.len();
                cursor.note(end);
                Some(MatchResult {
                    end,
                    value: text_value(action, &cursor.input[at..end]),
                })
            }

            Matcher::Regex { pattern, action } => {
                let end = self.regexes.find_at(pattern, cursor.input, at)?;
                cursor.note(end);
                Some(MatchResult {
                    end,
                    value: text_value(action, &cursor.input[at..end]),
                })
            }

            Matcher::Char { except, action } => {
                let c = cursor.input[at..].chars().next()?;
                if except.contains(&c) {
                    return None;
                }
                let end = at + c.len_utf8();
                cursor.note(end);
                Some(MatchResult {
                    end,
                    value: text_value(action, &cursor.input[at..end]),
                })
            }

            Matcher::Empty { action } => Some(MatchResult {
                end: at,
                value: match action {
                    Some(f) => f(Vec::new()),
                    None => V::empty(),
                },
            }),

            Matcher::Ref { name } => {
                let rule = self
                    .rules
                    .get(name)
                    .expect("rule references are checked at construction");
                self.match_at(rule, cursor, at)
            }

            Matcher::Seq { children, action } => {
                let mut end = at;
                let mut values = Vec::with_capacity(children.len());
                for child in children {
                    let result = self.match_at(child, cursor, end)?;
                    end = result.end;
                    values.push(result.value);
                }
                Some(MatchResult {
                    end,
                    value: list_value(action, values),
                })
            }

            Matcher::Choice {
                alternatives,
                action,
            } => {
                for alt in alternatives {
                    if let Some(result) = self.match_at(alt, cursor, at) {
                        return Some(MatchResult {
                            end: result.end,
                            value: match action {
                                Some(f) => f(vec![result.value]),
                                None => result.value,
                            },
                        });
                    }
                }
                None
            }

            Matcher::Repeat {
                body,
                min,
                max,
                action,
            } => {
                let mut end = at;
                let mut values = Vec::new();
                while max.is_none_or(|max| values.len() < max) {
                    let Some(result) = self.match_at(body, cursor, end) else {
                        break;
                    };
                    end = result.end;
                    values.push(result.value);
                }
                if values.len() < *min {
                    return None;
                }
                Some(MatchResult {
                    end,
                    value: list_value(action, values),
                })
            }
        }
    }
}

fn text_value<V: SyntaxValue>(action: &Option<Action<V>>, text: &str) -> V {
    let value = V::text(text);
    match action {
        Some(f) => f(vec![value]),
        None => value,
    }
}

fn list_value<V: SyntaxValue>(action: &Option<Action<V>>, values: Vec<V>) -> V {
    match action {
        Some(f) => f(values),
        None => V::list(values),
    }
}
