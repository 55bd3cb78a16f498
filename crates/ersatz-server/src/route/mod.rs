//! Route configurations and the shared store dispatch reads from.
//!
//! - `types`: RouteConfig, ConditionalResponse, Rule, Response
//! - `store`: RouteStore and its immutable RouteSnapshot

mod store;
mod types;

pub use store::{RouteSnapshot, RouteStore, StoreError};
pub use types::{ConditionalResponse, Response, RouteConfig, Rule};
