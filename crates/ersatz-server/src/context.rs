//! Request scopes used by rule evaluation and response templating.
//!
//! An [`IncomingRequest`] is the transport-neutral view of one HTTP request.
//! [`RequestContext`] flattens it into four string maps, one per scope:
//!
//! - `body`: top-level fields of a JSON object or form-encoded body
//!   (POST/PUT/PATCH only)
//! - `headers`: header values keyed by lowercase name
//! - `query`: decoded query-string parameters
//! - `path`: parameters bound by the route's path pattern

use crate::predicate::RuleTarget;
use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::HeaderMap;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;

/// A normalized inbound request
#[derive(Debug, Clone, Default)]
pub struct IncomingRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IncomingRequest {
    /// Create a request from a method and a path that may carry a query string.
    pub fn new(method: impl Into<String>, path_and_query: &str) -> Self {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (path_and_query.to_string(), None),
        };
        Self {
            method: method.into(),
            path,
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Build from hyper request parts and an already collected body.
    pub fn from_parts(parts: &hyper::http::request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Append a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value by case-insensitive name. Bytes that are not valid
    /// UTF-8 are replaced rather than dropping the value.
    pub fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers.get(name).map(header_text)
    }

    /// POST, PUT and PATCH carry a body worth parsing into the body scope.
    pub fn carries_body(&self) -> bool {
        matches!(
            self.method.to_ascii_uppercase().as_str(),
            "POST" | "PUT" | "PATCH"
        )
    }

    fn is_form_encoded(&self) -> bool {
        self.header(CONTENT_TYPE.as_str())
            .map(|ct| ct.contains("application/x-www-form-urlencoded"))
            .unwrap_or(false)
    }

    /// Parse the body as a structured object.
    ///
    /// Form-encoded bodies (by Content-Type) become string fields; anything
    /// else must be a JSON object.
    pub fn parse_body_object(&self) -> Result<Map<String, Value>, BodyError> {
        if self.body.is_empty() {
            return Err(BodyError::Empty);
        }

        if self.is_form_encoded() {
            let text = std::str::from_utf8(&self.body).map_err(|_| BodyError::NotUtf8)?;
            return Ok(parse_pairs(text)
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect());
        }

        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(BodyError::NotAnObject),
            Err(e) => Err(BodyError::Json(e.to_string())),
        }
    }
}

/// Reasons a body could not be read as an object
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("request body is empty")]
    Empty,
    #[error("request body is not valid UTF-8")]
    NotUtf8,
    #[error("request body is not an object")]
    NotAnObject,
    #[error("request body is not valid JSON: {0}")]
    Json(String),
}

/// The four string scopes of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub body: HashMap<String, String>,
    /// Keyed by lowercase header name
    pub headers: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub path: HashMap<String, String>,
}

impl RequestContext {
    /// Build the scopes for `request` with the path parameters bound by the
    /// matched route. Body parsing is best effort: an unreadable body leaves
    /// the body scope empty.
    pub fn from_request(request: &IncomingRequest, path_params: HashMap<String, String>) -> Self {
        let body = if request.carries_body() {
            request
                .parse_body_object()
                .map(|map| stringify_fields(&map))
                .unwrap_or_default()
        } else {
            HashMap::new()
        };

        let headers = request
            .headers
            .iter()
            .map(|(k, v)| (k.as_str().to_lowercase(), header_text(v).into_owned()))
            .collect();

        Self {
            body,
            headers,
            query: parse_query_string(request.query.as_deref()),
            path: path_params,
        }
    }

    /// Look up `field` in the scope named by `target`.
    ///
    /// Header names are matched case-insensitively. Unknown targets have no
    /// values.
    pub fn lookup(&self, target: &RuleTarget, field: &str) -> Option<&str> {
        let value = match target {
            RuleTarget::Body => self.body.get(field),
            RuleTarget::Header => self.headers.get(&field.to_lowercase()),
            RuleTarget::Query => self.query.get(field),
            RuleTarget::Path => self.path.get(field),
            RuleTarget::Unknown(_) => None,
        };
        value.map(String::as_str)
    }
}

fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}

/// Flatten top-level object fields into strings.
///
/// Strings are kept as-is. Integral floats lose their fraction (`21.0` reads
/// as `21`); every other value becomes its compact JSON text.
pub fn stringify_fields(map: &Map<String, Value>) -> HashMap<String, String> {
    map.iter()
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => number_text(n),
                other => other.to_string(),
            };
            (k.clone(), text)
        })
        .collect()
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Parse query string into a HashMap
pub fn parse_query_string(query: Option<&str>) -> HashMap<String, String> {
    query.map(parse_pairs).unwrap_or_default()
}

fn parse_pairs(encoded: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in encoded.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }
    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}
