//! Dispatch failures and their HTTP rendering.

use super::outcome::{Outcome, OutcomeBody};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Ways a request can fail to produce a configured response.
///
/// None of these escape to the transport: each one becomes a well-formed
/// [`Outcome`] through [`DispatchError::into_outcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no route matches {method} {path}")]
    NoRouteMatch { method: String, path: String },
    #[error("missing header: {0}")]
    MissingRequiredHeader(String),
    #[error("missing body field: {0}")]
    MissingRequiredBodyField(String),
    #[error("invalid body")]
    MalformedRequestBody,
}

impl DispatchError {
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NoRouteMatch { .. } => 404,
            DispatchError::MissingRequiredHeader(_)
            | DispatchError::MissingRequiredBodyField(_)
            | DispatchError::MalformedRequestBody => 400,
        }
    }

    /// NoRouteMatch answers in plain text; validation failures as
    /// `{"error": "<message>"}`.
    pub fn body(&self) -> OutcomeBody {
        match self {
            DispatchError::NoRouteMatch { .. } => OutcomeBody::Text("Mock not found".to_string()),
            other => OutcomeBody::Json(json!({ "error": other.to_string() })),
        }
    }

    pub fn into_outcome(self) -> Outcome {
        Outcome {
            status: self.status(),
            headers: Vec::new(),
            body: self.body(),
            delay: Duration::ZERO,
            matched: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statuses() {
        let not_found = DispatchError::NoRouteMatch {
            method: "GET".to_string(),
            path: "/x".to_string(),
        };
        assert_eq!(not_found.status(), 404);
        assert_eq!(DispatchError::MalformedRequestBody.status(), 400);
        assert_eq!(
            DispatchError::MissingRequiredHeader("X-Key".to_string()).status(),
            400
        );
    }

    #[test]
    fn test_bodies_name_the_missing_item() {
        assert_eq!(
            DispatchError::MissingRequiredHeader("Authorization".to_string()).body(),
            OutcomeBody::Json(json!({"error": "missing header: Authorization"}))
        );
        assert_eq!(
            DispatchError::MissingRequiredBodyField("username".to_string()).body(),
            OutcomeBody::Json(json!({"error": "missing body field: username"}))
        );
        assert_eq!(
            DispatchError::MalformedRequestBody.body(),
            OutcomeBody::Json(json!({"error": "invalid body"}))
        );
    }

    #[test]
    fn test_not_found_is_plain_text() {
        let outcome = DispatchError::NoRouteMatch {
            method: "GET".to_string(),
            path: "/nowhere".to_string(),
        }
        .into_outcome();
        assert_eq!(outcome.status, 404);
        assert_eq!(outcome.body, OutcomeBody::Text("Mock not found".to_string()));
        assert!(outcome.matched.is_none());
    }
}
