//! Response body templating.
//!
//! Every string inside a response body template is scanned for two kinds of
//! placeholders:
//!
//! - `{{body.<key>}}`, `{{header.<key>}}`, `{{query.<key>}}`, `{{path.<key>}}`:
//!   replaced by the value from that request scope
//! - `{{faker.<generator>}}`: replaced by freshly generated fake data
//!   (see [`faker::Generator`])
//!
//! Scoped placeholders are substituted first. A placeholder that cannot be
//! resolved (missing key, unknown generator) is left in the output verbatim
//! so the caller can see what failed to bind.
//!
//! # Example
//!
//! ```json
//! {
//!   "id": "{{path.id}}",
//!   "greeting": "Hello {{body.name}}",
//!   "requestId": "{{header.X-Request-Id}}",
//!   "email": "{{faker.email}}",
//!   "tags": ["{{query.tag}}", "static"]
//! }
//! ```

pub mod faker;

use crate::context::RequestContext;
use crate::predicate::RuleTarget;
use faker::Generator;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::OnceLock;

static SCOPED_REGEX: OnceLock<Regex> = OnceLock::new();
static FAKER_REGEX: OnceLock<Regex> = OnceLock::new();

fn scoped_regex() -> &'static Regex {
    SCOPED_REGEX.get_or_init(|| {
        Regex::new(r"\{\{(body|header|query|path)\.([a-zA-Z0-9_-]+)\}\}").unwrap()
    })
}

fn faker_regex() -> &'static Regex {
    FAKER_REGEX.get_or_init(|| Regex::new(r"\{\{faker\.([a-zA-Z0-9_]+)\}\}").unwrap())
}

/// Render a template value against the request scopes.
///
/// The result has the same shape as the input. New containers are built at
/// every object and list, so a shared template is never mutated and
/// concurrent renders cannot observe each other.
pub fn render(template: &Value, ctx: &RequestContext) -> Value {
    match template {
        Value::String(s) => Value::String(render_str(s, ctx).into_owned()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render(v, ctx)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| render(v, ctx)).collect()),
        other => other.clone(),
    }
}

/// Render a single template string.
pub fn render_str<'a>(template: &'a str, ctx: &RequestContext) -> Cow<'a, str> {
    if !has_placeholders(template) {
        return Cow::Borrowed(template);
    }

    let scoped = substitute_scoped(template, ctx);
    if let Cow::Owned(expanded) = substitute_faker(&scoped) {
        return Cow::Owned(expanded);
    }
    scoped
}

fn substitute_scoped<'a>(template: &'a str, ctx: &RequestContext) -> Cow<'a, str> {
    scoped_regex().replace_all(template, |caps: &Captures| {
        let target = RuleTarget::from(&caps[1]);
        match ctx.lookup(&target, &caps[2]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn substitute_faker(template: &str) -> Cow<'_, str> {
    faker_regex().replace_all(template, |caps: &Captures| {
        match Generator::from_name(&caps[1]) {
            Some(generator) => generator.generate(),
            None => caps[0].to_string(),
        }
    })
}

/// Whether `s` contains a scoped or faker placeholder. Strings without one
/// are returned from [`render_str`] unchanged and unallocated.
pub fn has_placeholders(s: &str) -> bool {
    scoped_regex().is_match(s) || faker_regex().is_match(s)
}
