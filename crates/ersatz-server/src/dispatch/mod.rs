//! Request dispatch.
//!
//! For each request the dispatcher:
//!
//! 1. takes a snapshot of the route collection
//! 2. selects the first route whose method (case-insensitive) and path
//!    pattern match
//! 3. builds the request scopes with the bound path parameters
//! 4. picks a response: the first conditional response whose rules hold,
//!    then the route's default response, then the legacy single-response
//!    fields (after validating required headers and body fields)
//! 5. renders the body template and waits out the simulated delay
//!
//! Selection and rendering are synchronous and lock-free once the snapshot
//! is taken. The delay is awaited without holding anything, so slow routes
//! never hold up other requests or configuration updates.

mod error;
pub mod handler;
mod outcome;


pub use error::DispatchError;
pub use outcome::{Matched, Outcome, OutcomeBody, Tier};

use crate::context::{IncomingRequest, RequestContext};
use crate::metrics;
use crate::predicate::{evaluate_rules, match_path};
use crate::route::{RouteConfig, RouteStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info_span, warn, Instrument};

/// Dispatches requests against a shared [`RouteStore`].
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<RouteStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<RouteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RouteStore> {
        &self.store
    }

    /// Produce the response for `request`, including the simulated delay.
    pub async fn dispatch(&self, request: &IncomingRequest) -> Outcome {
        let span = info_span!("dispatch", method = %request.method, path = %request.path);
        async {
            let started = Instant::now();
            let outcome = self.resolve(request);
            metrics::record_dispatch_duration(
                &request.method,
                started.elapsed().as_secs_f64() * 1000.0,
            );

            match &outcome.matched {
                Some(matched) => {
                    metrics::record_route_match(&matched.route, matched.tier.as_str());
                    if !outcome.delay.is_zero() {
                        metrics::record_simulated_delay(
                            &matched.route,
                            outcome.delay.as_millis() as u64,
                        );
                        debug!("Delaying response by {:?}", outcome.delay);
                        tokio::time::sleep(outcome.delay).await;
                    }
                }
                None if outcome.status == 404 => metrics::record_unmatched(&request.method),
                None => {}
            }

            metrics::record_request(&request.method, outcome.status);
            debug!("Responded {} in {:?}", outcome.status, started.elapsed());
            outcome
        }
        .instrument(span)
        .await
    }

    /// Select and render a response without applying the delay.
    pub fn resolve(&self, request: &IncomingRequest) -> Outcome {
        let snapshot = self.store.snapshot();
        match resolve_routes(snapshot.routes(), request) {
            Ok(outcome) => outcome,
            Err(e @ DispatchError::NoRouteMatch { .. }) => {
                debug!("{}", e);
                e.into_outcome()
            }
            Err(e) => e.into_outcome(),
        }
    }
}

/// Run selection over a fixed route list.
pub fn resolve_routes(
    routes: &[RouteConfig],
    request: &IncomingRequest,
) -> Result<Outcome, DispatchError> {
    for route in routes {
        if !route.method.eq_ignore_ascii_case(&request.method) {
            continue;
        }
        let Some(params) = match_path(&route.path, &request.path) else {
            continue;
        };

        debug!("Matched route {} ({} {})", route.label(), route.method, route.path);
        let ctx = RequestContext::from_request(request, params);
        return respond(route, request, &ctx);
    }

    Err(DispatchError::NoRouteMatch {
        method: request.method.clone(),
        path: request.path.clone(),
    })
}

fn respond(
    route: &RouteConfig,
    request: &IncomingRequest,
    ctx: &RequestContext,
) -> Result<Outcome, DispatchError> {
    if !route.responses.is_empty() {
        for (index, conditional) in route.responses.iter().enumerate() {
            if evaluate_rules(&conditional.rules, conditional.rule_operator, ctx) {
                debug!(
                    "Conditional response {} ({:?}) matched",
                    index, conditional.name
                );
                return Ok(Outcome::render(
                    &conditional.response,
                    ctx,
                    matched(route, Tier::Conditional(index)),
                ));
            }
        }

        if let Some(default) = &route.default_response {
            debug!("No conditional response matched, using default response");
            return Ok(Outcome::render(default, ctx, matched(route, Tier::Default)));
        }

        debug!("No conditional or default response matched, falling back to legacy fields");
    }

    if let Err(e) = validate_legacy(route, request) {
        warn!("Rejected request for {}: {}", route.label(), e);
        return Err(e);
    }
    Ok(Outcome::render(
        &route.legacy_response(),
        ctx,
        matched(route, Tier::Legacy),
    ))
}

/// Required headers must be present and non-empty. Required body fields are
/// only checked on POST and PUT, and only when the route declares them.
fn validate_legacy(route: &RouteConfig, request: &IncomingRequest) -> Result<(), DispatchError> {
    for name in route.request_headers.keys() {
        if request.header(name).map_or(true, |value| value.is_empty()) {
            return Err(DispatchError::MissingRequiredHeader(name.clone()));
        }
    }

    let Some(required) = &route.request_body else {
        return Ok(());
    };
    if !matches!(request.method.to_ascii_uppercase().as_str(), "POST" | "PUT") {
        return Ok(());
    }

    let body = request.parse_body_object().map_err(|e| {
        debug!("Unreadable body: {}", e);
        DispatchError::MalformedRequestBody
    })?;
    for key in required.keys() {
        if !body.contains_key(key) {
            return Err(DispatchError::MissingRequiredBodyField(key.clone()));
        }
    }
    Ok(())
}

fn matched(route: &RouteConfig, tier: Tier) -> Matched {
    Matched {
        route: route.label().to_string(),
        tier,
    }
}
