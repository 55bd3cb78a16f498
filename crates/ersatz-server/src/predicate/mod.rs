//! Request matching: path patterns and rule evaluation.
//!
//! - `path_matcher`: `/users/:id` patterns with named parameters
//! - `operator`: rule targets, operators and combinators
//! - `rule`: evaluation of rules against a [`RequestContext`](crate::context::RequestContext)
//! - `regex_cache`: process-wide cache of compiled `regex` rule patterns

mod operator;
mod path_matcher;
mod regex_cache;
mod rule;

pub use operator::{RuleCombinator, RuleOperator, RuleTarget};
pub use path_matcher::match_path;
pub use regex_cache::cached_regex;
pub use rule::{evaluate_rule, evaluate_rules};
