//! Ersatz: a rule-driven HTTP mock server.
//!
//! An incoming request is matched against an ordered collection of route
//! configurations. The first route whose method and path pattern match is
//! selected, its conditional responses are evaluated against the request,
//! and the chosen response body is rendered with request values and fake
//! data before being returned.
//!
//! The pipeline is split into small pure pieces:
//!
//! - [`predicate`]: `/users/:id` style path patterns and rule evaluation
//!   over body/header/query/path scopes
//! - [`template`]: `{{body.x}}` and `{{faker.name}}` rendering
//! - [`context`]: request scopes extracted from the raw request
//! - [`dispatch`]: orchestration against a [`route::RouteStore`] snapshot
//! - [`server`]: the hyper accept loop serving dispatched responses

pub mod config;
pub mod context;
pub mod dispatch;
pub mod metrics;
pub mod predicate;
pub mod route;
pub mod server;
pub mod template;

pub use context::{IncomingRequest, RequestContext};
pub use dispatch::{DispatchError, Dispatcher, Matched, Outcome, OutcomeBody, Tier};
pub use route::{ConditionalResponse, Response, RouteConfig, RouteSnapshot, RouteStore, Rule};
pub use server::MockServer;
