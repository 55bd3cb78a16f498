//! The transport-neutral result of dispatching one request.

use crate::context::RequestContext;
use crate::route::Response;
use crate::template;
use bytes::Bytes;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Which part of a route produced the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// A conditional response, by index in the route's `responses`
    Conditional(usize),
    Default,
    Legacy,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Conditional(_) => "conditional",
            Tier::Default => "default",
            Tier::Legacy => "legacy",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Conditional(index) => write!(f, "conditional[{index}]"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// The route and tier that served a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// Route name, or its path pattern when unnamed
    pub route: String,
    pub tier: Tier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeBody {
    Json(Value),
    Text(String),
}

impl OutcomeBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutcomeBody::Json(_) => "application/json",
            OutcomeBody::Text(_) => "text/plain; charset=utf-8",
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            OutcomeBody::Json(value) => Bytes::from(value.to_string()),
            OutcomeBody::Text(text) => Bytes::from(text.clone()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            OutcomeBody::Json(value) => Some(value),
            OutcomeBody::Text(_) => None,
        }
    }
}

/// Everything needed to write the HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: u16,
    /// Declared response headers, sorted by name
    pub headers: Vec<(String, String)>,
    pub body: OutcomeBody,
    /// Simulated latency to apply before the response is written
    pub delay: Duration,
    /// `None` when no route served the request
    pub matched: Option<Matched>,
}

impl Outcome {
    /// Render `response` against the request scopes.
    pub fn render(response: &Response, ctx: &RequestContext, matched: Matched) -> Self {
        Self {
            status: response.effective_status(),
            headers: response
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body: OutcomeBody::Json(template::render(&response.body, ctx)),
            delay: Duration::from_millis(response.timeout_ms),
            matched: Some(matched),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_render_applies_status_delay_and_headers() {
        let response = Response {
            headers: BTreeMap::from([
                ("X-Mock".to_string(), "yes".to_string()),
                ("Cache-Control".to_string(), "no-store".to_string()),
            ]),
            body: json!({"id": "{{path.id}}"}),
            status_code: 0,
            timeout_ms: 40,
        };
        let ctx = RequestContext {
            path: HashMap::from([("id".to_string(), "9".to_string())]),
            ..Default::default()
        };

        let outcome = Outcome::render(
            &response,
            &ctx,
            Matched {
                route: "/users/:id".to_string(),
                tier: Tier::Default,
            },
        );

        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.delay, Duration::from_millis(40));
        assert_eq!(outcome.header("x-mock"), Some("yes"));
        let names: Vec<&str> = outcome.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["Cache-Control", "X-Mock"]);
        assert_eq!(outcome.body, OutcomeBody::Json(json!({"id": "9"})));
    }

    #[test]
    fn test_body_bytes() {
        assert_eq!(
            OutcomeBody::Json(json!({"a": 1})).to_bytes(),
            Bytes::from_static(br#"{"a":1}"#)
        );
        assert_eq!(OutcomeBody::Json(Value::Null).to_bytes(), Bytes::from_static(b"null"));
        assert_eq!(
            OutcomeBody::Text("Mock not found".to_string()).to_bytes(),
            Bytes::from_static(b"Mock not found")
        );
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::Conditional(2).to_string(), "conditional[2]");
        assert_eq!(Tier::Conditional(2).as_str(), "conditional");
        assert_eq!(Tier::Legacy.to_string(), "legacy");
    }
}
