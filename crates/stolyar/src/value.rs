//! Syntax values produced by matching.
//!
//! The engine is generic over the value type: every transformation callback
//! returns a `V`, and the structural defaults (what a matcher produces when
//! no callback is attached) are expressed through the [`SyntaxValue`] trait.
//! [`Value`] is the built-in implementation and the default type parameter
//! of [`Grammar`](crate::Grammar).

use serde::{Deserialize, Serialize};

/// Constructors the engine needs from a caller-defined syntax value.
///
/// Only the structural defaults go through this trait; callbacks are free to
/// build values however they like.
pub trait SyntaxValue: Sized {
    /// Value of a zero-width match.
    fn empty() -> Self;

    /// Value of a matched piece of input text.
    fn text(text: &str) -> Self;

    /// Value of a sequence or repetition: one entry per child, in order.
    fn list(items: Vec<Self>) -> Self;
}

/// Built-in structural syntax value.
///
/// Serializes without tags: `Empty` becomes `null`, `Text` a string, `List`
/// an array, so a structurally parsed input reads naturally as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Empty,
    Text(String),
    List(Vec<Value>),
}

impl Value {
    /// Concatenate every `Text` leaf in tree order.
    ///
    /// For a grammar with no callbacks this reconstructs exactly the consumed
    /// input, since structural values keep all matched text in match order.
    pub fn flatten(&self) -> String {
        let mut out = String::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut String) {
        match self {
            Value::Empty => {}
            Value::Text(text) => out.push_str(text),
            Value::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

impl SyntaxValue for Value {
    fn empty() -> Self {
        Value::Empty
    }

    fn text(text: &str) -> Self {
        Value::Text(text.to_owned())
    }

    fn list(items: Vec<Self>) -> Self {
        Value::List(items)
    }
}
