//! Placeholder substitution.
//!
//! A placeholder is an exact `{{KEY}}` span whose key contains no braces.
//! Substitution is a single left-to-right pass: replacement text is never
//! rescanned, unknown keys are copied through with their delimiters, and any
//! brace that does not open a known placeholder is literal text. That makes
//! `{{{AGENT}}}` render as `{` + value + `}`.
use serde_json::Value;

use super::context::TemplateContext;
use crate::error::TemplateError;

/// Substitute every known `{{KEY}}` in `template`.
#[must_use]
pub fn render_text(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let (literal, tail) = rest.split_at(open);
        out.push_str(literal);
        if let Some((value, consumed)) = placeholder_at(tail, ctx) {
            out.push_str(value);
            rest = tail.get(consumed..).unwrap_or_default();
        } else {
            out.push('{');
            rest = tail.get(1..).unwrap_or_default();
        }
    }

    out.push_str(rest);
    out
}

/// Substitute placeholders in JSON source text, then parse the result.
///
/// # Errors
///
/// Returns [`TemplateError::MalformedTemplate`] if the substituted text is
/// not valid JSON, for example when a placeholder sits outside quotes.
pub fn render_structured(json_text: &str, ctx: &TemplateContext) -> Result<Value, TemplateError> {
    let rendered = render_text(json_text, ctx);
    Ok(serde_json::from_str(&rendered)?)
}

/// If `tail` starts with a known placeholder, return its value and the
/// number of bytes it spans.
fn placeholder_at<'c>(tail: &str, ctx: &'c TemplateContext) -> Option<(&'c str, usize)> {
    let body = tail.strip_prefix("{{")?;
    let end = body.find(['{', '}'])?;
    let (key, after) = body.split_at(end);
    if !after.starts_with("}}") {
        return None;
    }
    ctx.get(key).map(|value| (value, key.len() + 4))
}
