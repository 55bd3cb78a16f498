//! Type definitions for route configurations.
//!
//! The JSON shape follows the routes file format:
//!
//! ```json
//! {
//!   "name": "get user",
//!   "method": "GET",
//!   "path": "/users/:id",
//!   "responses": [{
//!     "name": "first user",
//!     "rules": [{"target": "path", "field": "id", "operator": "equals", "value": "1"}],
//!     "ruleOperator": "AND",
//!     "response": {"statusCode": 200, "body": {"name": "{{faker.name}}"}}
//!   }],
//!   "defaultResponse": {"statusCode": 404, "body": {"error": "not found"}}
//! }
//! ```

use crate::predicate::{RuleCombinator, RuleOperator, RuleTarget};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// Route Configuration
// ============================================================================

/// A declared method + path mapping to one or more candidate responses.
///
/// When `responses` is non-empty it is authoritative. The legacy fields
/// (`requestHeaders`, `requestBody`, `responseHeaders`, `responseBody`,
/// `statusCode`, `timeoutMs`) are used when `responses` is empty, and also
/// as a last fallback when no conditional response and no default matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    /// Informational only
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub method: String,
    /// Path pattern, e.g. `/users/:id/posts/:post_id`
    #[serde(default)]
    pub path: String,

    // ===== Legacy single-response fields =====
    /// Headers that must be present and non-empty (values are ignored)
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_headers: BTreeMap<String, String>,
    /// Keys that must be present in the parsed body of POST/PUT requests.
    /// `None` (absent or `null`) disables body validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub response_body: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_code: u16,
    #[serde(default, alias = "timeout", deserialize_with = "null_as_default")]
    pub timeout_ms: u64,

    // ===== Conditional responses =====
    #[serde(default, deserialize_with = "null_as_default")]
    pub responses: Vec<ConditionalResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_response: Option<Response>,
}

impl RouteConfig {
    /// Build the legacy tier as a [`Response`] so it shares the rendering path
    /// with conditional responses.
    pub fn legacy_response(&self) -> Response {
        Response {
            headers: self.response_headers.clone(),
            body: self.response_body.clone(),
            status_code: self.status_code,
            timeout_ms: self.timeout_ms,
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.path
        } else {
            &self.name
        }
    }
}

/// A response guarded by a rule set. The first satisfied one wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalResponse {
    #[serde(default)]
    pub name: String,
    /// Empty list means unconditional match
    #[serde(default, deserialize_with = "null_as_default")]
    pub rules: Vec<Rule>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_operator: RuleCombinator,
    #[serde(default)]
    pub response: Response,
}

/// A single condition evaluated against one request scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub target: RuleTarget,
    #[serde(default)]
    pub field: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operator: RuleOperator,
    /// Expected value. Scalars (`18`, `true`) are accepted and kept as text.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Rule {
    pub fn new(
        target: impl Into<RuleTarget>,
        field: impl Into<String>,
        operator: impl Into<RuleOperator>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A concrete response: headers, a body template, status, and simulated delay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    /// Nested template value (string, object, list, or scalar)
    #[serde(default)]
    pub body: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_code: u16,
    #[serde(default, alias = "timeout", deserialize_with = "null_as_default")]
    pub timeout_ms: u64,
}

impl Response {
    /// Status code to send; an unset (zero) status is served as 200.
    pub fn effective_status(&self) -> u16 {
        if self.status_code == 0 {
            200
        } else {
            self.status_code
        }
    }
}

// ============================================================================
// Deserialization helpers
// ============================================================================

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "rule value must be a scalar, got {other}"
        ))),
    }
}
