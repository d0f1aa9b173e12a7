//! Single-token names and values.
//!
//! The loader splits on whitespace and treats braces as block markers, so every
//! name or free-form value written in one field must be one token.

use std::borrow::Cow;

use crate::error::Condition;

/// `text` as one token: whitespace and braces become `_`, empty text becomes `fallback`.
pub fn token<'a>(text: &'a str, fallback: &'static str) -> Cow<'a, str> {
    if text.is_empty() {
        return Cow::Borrowed(fallback);
    }
    if !text.chars().any(breaks_token) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if breaks_token(c) { '_' } else { c })
            .collect(),
    )
}

fn breaks_token(c: char) -> bool {
    c.is_whitespace() || c == '{' || c == '}'
}

/// Rewrites fields in place, recording a [`Condition::RewrittenToken`] for each change.
pub struct TokenFixer<'a> {
    conditions: &'a mut Vec<Condition>,
}

impl<'a> TokenFixer<'a> {
    pub fn new(conditions: &'a mut Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn fix(&mut self, field: &'static str, value: &mut String, fallback: &'static str) {
        let written = match token(value, fallback) {
            Cow::Borrowed(t) if t == value.as_str() => return,
            t => t.into_owned(),
        };
        tracing::warn!("{} {:?} is not a single token, writing '{}'", field, value, written);
        let original = std::mem::replace(value, written.clone());
        self.conditions.push(Condition::RewrittenToken {
            field,
            original,
            written,
        });
    }
}
