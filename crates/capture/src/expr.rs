// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Value expressions used by generic capture conditions.
//!
//! An expression is literal text interleaved with variable references:
//! - `$name` - name made of ASCII letters, digits and `_`
//! - `${name}` - braced form, for references followed by name characters
//!
//! Expressions are compiled when a scope is activated, so syntax errors never
//! surface at request time. Evaluation resolves variables through a
//! [`VariableSource`]; any unresolvable variable makes the whole expression
//! evaluate to the empty string.

use crate::error::ConfigError;
use std::borrow::Cow;
use std::fmt;

/// Provider of variable values at request time.
pub trait VariableSource {
    /// Resolve `name`, or `None` when the variable is unknown or unavailable.
    fn variable(&self, name: &str) -> Option<Cow<'_, str>>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A compiled expression.
#[derive(Clone, PartialEq, Eq)]
pub struct Expression {
    source: String,
    segments: Vec<Segment>,
}

impl Expression {
    /// Compile an expression.
    pub fn compile(source: &str) -> Result<Self, ConfigError> {
        let err = |reason| ConfigError::Expression {
            expr: source.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }

            let name = if chars.peek().is_some_and(|c| *c == '{') {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(err("unterminated ${"));
                }
                if name.is_empty() || !name.chars().all(is_name_char) {
                    return Err(err("invalid variable name"));
                }
                name
            } else {
                let mut name = String::new();
                while let Some(c) = chars.peek() {
                    if !is_name_char(*c) {
                        break;
                    }
                    name.push(*c);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(err("expected variable name after $"));
                }
                name
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Variable(name));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The source text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the variables referenced, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Evaluate against `vars`.
    ///
    /// Returns the empty string when any referenced variable cannot be
    /// resolved.
    pub fn evaluate(&self, vars: &dyn VariableSource) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => match vars.variable(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        tracing::trace!(
                            variable = %name,
                            expr = %self.source,
                            "unresolved variable"
                        );
                        return String::new();
                    }
                },
            }
        }
        out
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.source).finish()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl VariableSource for std::collections::HashMap<String, String> {
    fn variable(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|v| Cow::Borrowed(v.as_str()))
    }
}

#[cfg(test)]
#[path = "expr_tests.rs"]
mod tests;
