//! Closed enumerations for rule targets, comparison operators, and the
//! combinator joining a rule list.
//!
//! All three are (de)serialized through plain strings. Parsing is
//! case-insensitive and never fails: text that names no known variant is
//! kept in an `Unknown` variant so the evaluator can degrade it to `false`
//! while the raw text still round-trips through serialization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Request scope a rule reads its actual value from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RuleTarget {
    Body,
    Header,
    Query,
    Path,
    Unknown(String),
}

impl RuleTarget {
    pub fn as_str(&self) -> &str {
        match self {
            RuleTarget::Body => "body",
            RuleTarget::Header => "header",
            RuleTarget::Query => "query",
            RuleTarget::Path => "path",
            RuleTarget::Unknown(raw) => raw,
        }
    }
}

impl Default for RuleTarget {
    fn default() -> Self {
        RuleTarget::Unknown(String::new())
    }
}

impl From<&str> for RuleTarget {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "body" => RuleTarget::Body,
            "header" => RuleTarget::Header,
            "query" => RuleTarget::Query,
            "path" => RuleTarget::Path,
            _ => RuleTarget::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for RuleTarget {
    fn from(raw: String) -> Self {
        RuleTarget::from(raw.as_str())
    }
}

impl From<RuleTarget> for String {
    fn from(target: RuleTarget) -> Self {
        target.as_str().to_string()
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison applied between a rule's actual and expected values.
///
/// Each operator has a word form and a symbolic alias:
///
/// | operator     | alias |
/// |--------------|-------|
/// | `equals`     | `==`  |
/// | `not_equals` | `!=`  |
/// | `contains`   | `~`   |
/// | `regex`      | `.*`  |
/// | `exists`     | `?`   |
/// | `gt`         | `>`   |
/// | `lt`         | `<`   |
/// | `gte`        | `>=`  |
/// | `lte`        | `<=`  |
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RuleOperator {
    Equals,
    NotEquals,
    Contains,
    Regex,
    Exists,
    Gt,
    Lt,
    Gte,
    Lte,
    Unknown(String),
}

impl RuleOperator {
    pub fn as_str(&self) -> &str {
        match self {
            RuleOperator::Equals => "equals",
            RuleOperator::NotEquals => "not_equals",
            RuleOperator::Contains => "contains",
            RuleOperator::Regex => "regex",
            RuleOperator::Exists => "exists",
            RuleOperator::Gt => "gt",
            RuleOperator::Lt => "lt",
            RuleOperator::Gte => "gte",
            RuleOperator::Lte => "lte",
            RuleOperator::Unknown(raw) => raw,
        }
    }
}

impl Default for RuleOperator {
    fn default() -> Self {
        RuleOperator::Unknown(String::new())
    }
}

impl From<&str> for RuleOperator {
    fn from(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "equals" | "==" => RuleOperator::Equals,
            "not_equals" | "!=" => RuleOperator::NotEquals,
            "contains" | "~" => RuleOperator::Contains,
            "regex" | ".*" => RuleOperator::Regex,
            "exists" | "?" => RuleOperator::Exists,
            "gt" | ">" => RuleOperator::Gt,
            "lt" | "<" => RuleOperator::Lt,
            "gte" | ">=" => RuleOperator::Gte,
            "lte" | "<=" => RuleOperator::Lte,
            _ => RuleOperator::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for RuleOperator {
    fn from(raw: String) -> Self {
        RuleOperator::from(raw.as_str())
    }
}

impl From<RuleOperator> for String {
    fn from(operator: RuleOperator) -> Self {
        operator.as_str().to_string()
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the rules of one conditional response are combined.
///
/// Anything other than `OR` (any case) is treated as `AND`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RuleCombinator {
    #[default]
    And,
    Or,
}

impl From<&str> for RuleCombinator {
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("or") {
            RuleCombinator::Or
        } else {
            RuleCombinator::And
        }
    }
}

impl From<String> for RuleCombinator {
    fn from(raw: String) -> Self {
        RuleCombinator::from(raw.as_str())
    }
}

impl From<RuleCombinator> for String {
    fn from(combinator: RuleCombinator) -> Self {
        match combinator {
            RuleCombinator::And => "AND".to_string(),
            RuleCombinator::Or => "OR".to_string(),
        }
    }
}
