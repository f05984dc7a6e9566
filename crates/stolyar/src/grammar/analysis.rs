//! Static validation passes.
//!
//! Structure and regex compilation reject malformed rule sets; nullability,
//! first-sets and the two termination checks (left recursion, unbounded
//! repetition over nullable bodies) reject rule sets whose matching could
//! run forever. Termination of matching is entirely established here; the
//! descent itself never re-checks.

use indexmap::{IndexMap, IndexSet};

use crate::GrammarError;
use crate::matcher::Matcher;

use super::Grammar;
use super::regex_table::RegexTable;

impl<V> Grammar<V> {
    /// Rule map is non-empty, the root exists, every reference resolves,
    /// repeat bounds are ordered.
    pub(super) fn check_structure(&self) -> Result<(), GrammarError> {
        if self.rules.is_empty() {
            return Err(GrammarError::EmptyRules);
        }
        if !self.rules.contains_key(&self.root) {
            return Err(GrammarError::MissingRoot(self.root.clone()));
        }
        for (name, matcher) in &self.rules {
            self.check_matcher(name, matcher)?;
        }
        Ok(())
    }

    fn check_matcher(&self, rule: &str, matcher: &Matcher<V>) -> Result<(), GrammarError> {
        match matcher {
            Matcher::Ref { name } => {
                if !self.rules.contains_key(name) {
                    return Err(GrammarError::UndefinedReference {
                        rule: rule.to_owned(),
                        referenced: name.clone(),
                    });
                }
                Ok(())
            }
            Matcher::Seq { children, .. }
            | Matcher::Choice {
                alternatives: children,
                ..
            } => children.iter().try_for_each(|c| self.check_matcher(rule, c)),
            Matcher::Repeat { body, min, max, .. } => {
                if let Some(max) = max
                    && max < min
                {
                    return Err(GrammarError::InvalidRepeatBounds {
                        rule: rule.to_owned(),
                        min: *min,
                        max: *max,
                    });
                }
                self.check_matcher(rule, body)
            }
            Matcher::Literal { .. }
            | Matcher::Regex { .. }
            | Matcher::Char { .. }
            | Matcher::Empty { .. } => Ok(()),
        }
    }

    pub(super) fn compile_regexes(&mut self) -> Result<(), GrammarError> {
        let mut table = RegexTable::default();
        for (name, matcher) in &self.rules {
            collect_regexes(name, matcher, &mut table)?;
        }
        self.regexes = table;
        Ok(())
    }

    /// Fixpoint over the whole rule graph. Starts from "nothing is
    /// nullable"; entries only flip false → true, so iteration terminates.
    pub(super) fn compute_nullability(&mut self) {
        let mut nullable: IndexMap<String, bool> =
            self.rules.keys().map(|k| (k.clone(), false)).collect();

        loop {
            let mut changed = false;
            for (name, matcher) in &self.rules {
                if nullable[name.as_str()] {
                    continue;
                }
                if self.matcher_nullable(matcher, &nullable) {
                    nullable[name.as_str()] = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        self.nullable = nullable;
    }

    fn matcher_nullable(&self, matcher: &Matcher<V>, table: &IndexMap<String, bool>) -> bool {
        match matcher {
            Matcher::Literal { text, .. } => text.is_empty(),
            Matcher::Regex { pattern, .. } => self.regexes.nullable(pattern),
            Matcher::Char { .. } => false,
            Matcher::Empty { .. } => true,
            Matcher::Ref { name } => table.get(name.as_str()).copied().unwrap_or(false),
            Matcher::Seq { children, .. } => {
                children.iter().all(|c| self.matcher_nullable(c, table))
            }
            Matcher::Choice { alternatives, .. } => {
                alternatives.iter().any(|a| self.matcher_nullable(a, table))
            }
            Matcher::Repeat { body, min, .. } => {
                *min == 0 || self.matcher_nullable(body, table)
            }
        }
    }

    pub(super) fn compute_first_refs(&mut self) {
        let mut table = IndexMap::new();
        for (name, matcher) in &self.rules {
            let mut refs = IndexSet::new();
            self.collect_first_refs(matcher, &mut refs);
            table.insert(name.clone(), refs);
        }
        self.first_refs = table;
    }

    fn collect_first_refs(&self, matcher: &Matcher<V>, out: &mut IndexSet<String>) {
        match matcher {
            Matcher::Ref { name } => {
                out.insert(name.clone());
            }
            Matcher::Seq { children, .. } => {
                // Walk past a child only while everything before it is
                // nullable: a cycle can enter the sequence through a later
                // child without consuming input.
                for child in children {
                    self.collect_first_refs(child, out);
                    if !self.matcher_nullable(child, &self.nullable) {
                        break;
                    }
                }
            }
            Matcher::Choice { alternatives, .. } => {
                for alt in alternatives {
                    self.collect_first_refs(alt, out);
                }
            }
            Matcher::Repeat { body, .. } => self.collect_first_refs(body, out),
            Matcher::Literal { .. }
            | Matcher::Regex { .. }
            | Matcher::Char { .. }
            | Matcher::Empty { .. } => {}
        }
    }

    /// Cycle search over the rule → first-set edge graph. A cycle means some
    /// rule can reach itself before any input is guaranteed to be consumed.
    pub(super) fn check_left_recursion(&self) -> Result<(), GrammarError> {
        let mut visited = IndexSet::new();
        let mut stack = IndexSet::new();

        for name in self.rules.keys() {
            if let Some(target) = self.find_cycle(name, &mut visited, &mut stack) {
                let start = stack
                    .get_index_of(target.as_str())
                    .expect("cycle target is on the stack");
                let cycle = stack.iter().skip(start).cloned().collect();
                return Err(GrammarError::LeftRecursion { cycle });
            }
        }
        Ok(())
    }

    fn find_cycle(
        &self,
        node: &str,
        visited: &mut IndexSet<String>,
        stack: &mut IndexSet<String>,
    ) -> Option<String> {
        if stack.contains(node) {
            return Some(node.to_owned());
        }
        if visited.contains(node) {
            return None;
        }

        visited.insert(node.to_owned());
        stack.insert(node.to_owned());

        for next in &self.first_refs[node] {
            if let Some(target) = self.find_cycle(next, visited, stack) {
                return Some(target);
            }
        }

        stack.pop();
        None
    }

    /// Reject every unbounded repetition whose body can match zero
    /// characters; it could apply forever without advancing.
    pub(super) fn check_repetition(&self) -> Result<(), GrammarError> {
        for (name, matcher) in &self.rules {
            self.check_repeat_bodies(name, matcher)?;
        }
        Ok(())
    }

    fn check_repeat_bodies(&self, rule: &str, matcher: &Matcher<V>) -> Result<(), GrammarError> {
        match matcher {
            Matcher::Repeat { body, max, .. } => {
                if max.is_none() && self.matcher_nullable(body, &self.nullable) {
                    return Err(GrammarError::NullableRepetition {
                        rule: rule.to_owned(),
                    });
                }
                self.check_repeat_bodies(rule, body)
            }
            Matcher::Seq { children, .. }
            | Matcher::Choice {
                alternatives: children,
                ..
            } => children
                .iter()
                .try_for_each(|c| self.check_repeat_bodies(rule, c)),
            Matcher::Literal { .. }
            | Matcher::Regex { .. }
            | Matcher::Char { .. }
            | Matcher::Empty { .. }
            | Matcher::Ref { .. } => Ok(()),
        }
    }
}

fn collect_regexes<V>(
    rule: &str,
    matcher: &Matcher<V>,
    table: &mut RegexTable,
) -> Result<(), GrammarError> {
    match matcher {
        Matcher::Regex { pattern, .. } => table.intern(rule, pattern),
        Matcher::Seq { children, .. }
        | Matcher::Choice {
            alternatives: children,
            ..
        } => children
            .iter()
            .try_for_each(|c| collect_regexes(rule, c, table)),
        Matcher::Repeat { body, .. } => collect_regexes(rule, body, table),
        Matcher::Literal { .. }
        | Matcher::Char { .. }
        | Matcher::Empty { .. }
        | Matcher::Ref { .. } => Ok(()),
    }
}
