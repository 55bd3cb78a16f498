//! Rule evaluation.
//!
//! A rule reads one value from the request context and compares it with
//! its expected value. Rules never fail: a missing field reads as the empty
//! string, and an unknown target or operator, or an invalid regex, makes the
//! rule false.

use super::operator::{RuleCombinator, RuleOperator, RuleTarget};
use super::regex_cache::cached_regex;
use crate::context::RequestContext;
use crate::route::Rule;
use std::cmp::Ordering;
use tracing::trace;

/// Evaluate a rule list with the given combinator.
///
/// An empty list is always true, which is what lets a rule-less conditional
/// response act as a catch-all.
pub fn evaluate_rules(rules: &[Rule], combinator: RuleCombinator, ctx: &RequestContext) -> bool {
    if rules.is_empty() {
        return true;
    }

    match combinator {
        RuleCombinator::And => rules.iter().all(|rule| evaluate_rule(rule, ctx)),
        RuleCombinator::Or => rules.iter().any(|rule| evaluate_rule(rule, ctx)),
    }
}

/// Evaluate a single rule against the request context.
pub fn evaluate_rule(rule: &Rule, ctx: &RequestContext) -> bool {
    if let RuleTarget::Unknown(ref raw) = rule.target {
        trace!("Unknown rule target {:?}", raw);
        return false;
    }
    let actual = ctx.lookup(&rule.target, &rule.field).unwrap_or("");
    let expected = rule.value.as_str();

    let result = match rule.operator {
        RuleOperator::Equals => actual == expected,
        RuleOperator::NotEquals => actual != expected,
        RuleOperator::Contains => actual.contains(expected),
        RuleOperator::Regex => cached_regex(expected).is_some_and(|re| re.is_match(actual)),
        RuleOperator::Exists => {
            let exists = !actual.is_empty();
            let expect_exists = !expected.eq_ignore_ascii_case("false");
            exists == expect_exists
        }
        RuleOperator::Gt => compare(actual, expected).is_gt(),
        RuleOperator::Lt => compare(actual, expected).is_lt(),
        RuleOperator::Gte => compare(actual, expected).is_ge(),
        RuleOperator::Lte => compare(actual, expected).is_le(),
        RuleOperator::Unknown(ref raw) => {
            trace!("Unknown rule operator {:?}", raw);
            false
        }
    };

    trace!(
        "rule {}.{} {} {:?} against {:?} -> {}",
        rule.target,
        rule.field,
        rule.operator,
        expected,
        actual,
        result
    );
    result
}

/// Numeric comparison when both sides parse as floats, byte-wise string
/// comparison otherwise.
fn compare(actual: &str, expected: &str) -> ComparisonResult {
    match (actual.parse::<f64>(), expected.parse::<f64>()) {
        (Ok(a), Ok(e)) => ComparisonResult(a.partial_cmp(&e)),
        _ => ComparisonResult(Some(actual.cmp(expected))),
    }
}

/// `Option<Ordering>` with float semantics: `None` (NaN involved) satisfies
/// no operator.
struct ComparisonResult(Option<Ordering>);

impl ComparisonResult {
    fn is_gt(&self) -> bool {
        self.0.is_some_and(Ordering::is_gt)
    }

    fn is_lt(&self) -> bool {
        self.0.is_some_and(Ordering::is_lt)
    }

    fn is_ge(&self) -> bool {
        self.0.is_some_and(Ordering::is_ge)
    }

    fn is_le(&self) -> bool {
        self.0.is_some_and(Ordering::is_le)
    }
}
