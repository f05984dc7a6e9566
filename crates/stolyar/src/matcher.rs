//! Matching primitives and combinators.
//!
//! A [`Matcher`] is one node of a rule body: a primitive (literal text,
//! anchored regex, single character, empty), a combinator over child
//! matchers (sequence, ordered choice, repetition), or a by-name reference
//! to another rule. References are plain names resolved against the owning
//! grammar's rule map, so rule bodies never own each other and recursive
//! definitions need no cyclic data structures.
//!
//! Every node except a reference can carry an [`Action`]: a callback that
//! receives the child values in match order and builds the node's value.
//! Without one, a structural default is produced (see
//! [`SyntaxValue`](crate::SyntaxValue)).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;

/// Transformation callback: ordered child values in, node value out.
///
/// One argument per child: sequence and repetition pass one value per
/// element/application, choice passes the single winning value, primitives
/// pass their matched text, `empty` passes nothing.
pub type Action<V> = Arc<dyn Fn(Vec<V>) -> V + Send + Sync>;

/// One node of a rule body. Build with the constructor functions; attach a
/// callback with [`action`](Matcher::action).
pub enum Matcher<V = crate::Value> {
    /// Exact text at the current position.
    Literal {
        text: String,
        action: Option<Action<V>>,
    },
    /// Anchored regular expression at the current position. Compiled once,
    /// at grammar construction.
    Regex {
        pattern: String,
        action: Option<Action<V>>,
    },
    /// Any single Unicode scalar not in `except`. Never matches at end of
    /// input.
    Char {
        except: IndexSet<char>,
        action: Option<Action<V>>,
    },
    /// Matches nothing, always succeeds.
    Empty { action: Option<Action<V>> },
    /// All children in order, each starting where the previous one ended.
    Seq {
        children: Vec<Matcher<V>>,
        action: Option<Action<V>>,
    },
    /// Alternatives in priority order; the first that matches wins.
    Choice {
        alternatives: Vec<Matcher<V>>,
        action: Option<Action<V>>,
    },
    /// Greedy repetition of `body`, at least `min` and at most `max`
    /// applications (`None` = unbounded). Never gives applications back.
    Repeat {
        body: Box<Matcher<V>>,
        min: usize,
        max: Option<usize>,
        action: Option<Action<V>>,
    },
    /// Reference to a rule by name, resolved against the grammar's rule map.
    Ref { name: String },
}

impl<V> Matcher<V> {
    /// Match `text` exactly. The empty literal is the same as [`empty`](Self::empty).
    pub fn literal(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::empty();
        }
        Matcher::Literal { text, action: None }
    }

    /// Match an anchored regular expression. Pattern validity is checked at
    /// grammar construction, not here.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Matcher::Regex {
            pattern: pattern.into(),
            action: None,
        }
    }

    /// Match any single character.
    pub fn any_char() -> Self {
        Matcher::Char {
            except: IndexSet::new(),
            action: None,
        }
    }

    /// Match any single character outside `except`.
    pub fn char_except(except: impl IntoIterator<Item = char>) -> Self {
        Matcher::Char {
            except: except.into_iter().collect(),
            action: None,
        }
    }

    /// Match nothing and succeed.
    pub fn empty() -> Self {
        Matcher::Empty { action: None }
    }

    /// Match every child in order.
    pub fn seq(children: impl IntoIterator<Item = Matcher<V>>) -> Self {
        Matcher::Seq {
            children: children.into_iter().collect(),
            action: None,
        }
    }

    /// Try alternatives in order, keep the first match.
    pub fn choice(alternatives: impl IntoIterator<Item = Matcher<V>>) -> Self {
        Matcher::Choice {
            alternatives: alternatives.into_iter().collect(),
            action: None,
        }
    }

    /// Match `body` greedily between `min` and `max` times.
    pub fn repeat(body: Matcher<V>, min: usize, max: Option<usize>) -> Self {
        Matcher::Repeat {
            body: Box::new(body),
            min,
            max,
            action: None,
        }
    }

    /// Zero-or-more preset: `repeat(body, 0, None)`.
    pub fn star(body: Matcher<V>) -> Self {
        Self::repeat(body, 0, None)
    }

    /// Reference the rule registered under `name`.
    pub fn rule(name: impl Into<String>) -> Self {
        Matcher::Ref { name: name.into() }
    }

    /// Attach a transformation callback.
    ///
    /// On a rule reference this wraps the reference in a single-child
    /// sequence, so the callback receives the referenced rule's value as its
    /// only element.
    pub fn action(self, f: impl Fn(Vec<V>) -> V + Send + Sync + 'static) -> Self {
        let action = Some(Arc::new(f) as Action<V>);
        match self {
            Matcher::Literal { text, .. } => Matcher::Literal { text, action },
            Matcher::Regex { pattern, .. } => Matcher::Regex { pattern, action },
            Matcher::Char { except, .. } => Matcher::Char { except, action },
            Matcher::Empty { .. } => Matcher::Empty { action },
            Matcher::Seq { children, .. } => Matcher::Seq { children, action },
            Matcher::Choice { alternatives, .. } => Matcher::Choice {
                alternatives,
                action,
            },
            Matcher::Repeat { body, min, max, .. } => Matcher::Repeat {
                body,
                min,
                max,
                action,
            },
            reference @ Matcher::Ref { .. } => Matcher::Seq {
                children: vec![reference],
                action,
            },
        }
    }
}

/// Compact grammar-notation rendering, used by [`Grammar::dump`](crate::Grammar::dump)
/// and error output.
impl<V> fmt::Display for Matcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Literal { text, .. } => write!(f, "{text:?}"),
            Matcher::Regex { pattern, .. } => write!(f, "/{pattern}/"),
            Matcher::Char { except, .. } => {
                if except.is_empty() {
                    return f.write_str(".");
                }
                f.write_str("[^")?;
                for c in except {
                    write!(f, "{}", c.escape_debug())?;
                }
                f.write_str("]")
            }
            Matcher::Empty { .. } => f.write_str("ε"),
            Matcher::Seq { children, .. } => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
            Matcher::Choice { alternatives, .. } => {
                f.write_str("(")?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alt}")?;
                }
                f.write_str(")")
            }
            Matcher::Repeat { body, min, max, .. } => {
                write!(f, "{body}")?;
                match (min, max) {
                    (0, None) => f.write_str("*"),
                    (1, None) => f.write_str("+"),
                    (0, Some(1)) => f.write_str("?"),
                    (min, None) => write!(f, "{{{min},}}"),
                    (min, Some(max)) => write!(f, "{{{min},{max}}}"),
                }
            }
            Matcher::Ref { name } => f.write_str(name),
        }
    }
}

impl<V> fmt::Debug for Matcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
