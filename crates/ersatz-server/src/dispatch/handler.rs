//! hyper adapter: HTTP request in, dispatched HTTP response out.

use super::{Dispatcher, Outcome};
use crate::context::IncomingRequest;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use tracing::{debug, warn};

/// Handle one request against the dispatcher.
pub async fn handle_request(
    req: Request<Incoming>,
    dispatcher: Dispatcher,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("Failed to read request body: {}", e);
            Bytes::new()
        }
    };

    let request = IncomingRequest::from_parts(&parts, body);
    let outcome = dispatcher.dispatch(&request).await;
    Ok(into_response(outcome))
}

/// Build the HTTP response for an outcome.
///
/// `Content-Type` defaults from the body kind; a declared `Content-Type`
/// replaces it. Header names or values hyper rejects are skipped.
pub fn into_response(outcome: Outcome) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(outcome.status).unwrap_or_else(|_| {
        warn!("Invalid status code {}, serving 500", outcome.status);
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut response = Response::new(Full::new(outcome.body.to_bytes()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(outcome.body.content_type()),
    );
    for (name, value) in &outcome.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => debug!("Skipping invalid response header {:?}: {:?}", name, value),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DispatchError, OutcomeBody};
    use serde_json::json;
    use std::time::Duration;

    fn outcome(headers: &[(&str, &str)]) -> Outcome {
        Outcome {
            status: 201,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: OutcomeBody::Json(json!({"ok": true})),
            delay: Duration::ZERO,
            matched: None,
        }
    }

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_json_response() {
        let response = into_response(outcome(&[("X-Custom", "1")]));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "application/json");
        assert_eq!(response.headers()["x-custom"], "1");
        assert_eq!(body_text(response).await, r#"{"ok":true}"#);
    }

    #[test]
    fn test_declared_content_type_wins() {
        let response = into_response(outcome(&[("Content-Type", "application/vnd.api+json")]));
        assert_eq!(
            response.headers()["content-type"],
            "application/vnd.api+json"
        );
        assert_eq!(response.headers().get_all("content-type").iter().count(), 1);
    }

    #[test]
    fn test_invalid_headers_skipped() {
        let response = into_response(outcome(&[("bad header", "x"), ("X-Ok", "line\nbreak"), ("X-Fine", "y")]));
        assert!(response.headers().get("x-ok").is_none());
        assert_eq!(response.headers()["x-fine"], "y");
    }

    #[tokio::test]
    async fn test_not_found_is_plain_text() {
        let response = into_response(
            DispatchError::NoRouteMatch {
                method: "GET".to_string(),
                path: "/nope".to_string(),
            }
            .into_outcome(),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(body_text(response).await, "Mock not found");
    }

    #[test]
    fn test_out_of_range_status_served_as_500() {
        let mut o = outcome(&[]);
        o.status = 1000;
        assert_eq!(
            into_response(o).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
