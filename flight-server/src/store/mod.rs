//! Read-only access to the airport, route and visa-policy graph.
//!
//! The planner only ever reads through the [`FlightStore`] trait, so it can
//! be driven by the snapshot-backed [`MemoryStore`], the caching
//! [`CachedStore`] decorator, or a test double.

mod cache;
mod error;
#[cfg(test)]
pub(crate) mod fixtures;
mod memory;

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Airport, CountryCode, Iata, Route, VisaPolicy};

pub use cache::{CacheConfig, CachedStore};
pub use error::StoreError;
pub use memory::{MemoryStore, MemoryStoreBuilder, RouteRow, Snapshot};

/// Lookups the planner needs from the graph store.
///
/// Every method is a suspension point. Implementations must be safe to
/// share across concurrently running leg searches.
pub trait FlightStore: Send + Sync {
    /// Resolve an airport by IATA code. `Ok(None)` if unknown.
    fn resolve_airport(
        &self,
        iata: &Iata,
    ) -> impl Future<Output = Result<Option<Arc<Airport>>, StoreError>> + Send;

    /// The route flying directly `from` -> `to`, if one exists.
    fn find_direct_route(
        &self,
        from: &Iata,
        to: &Iata,
    ) -> impl Future<Output = Result<Option<Arc<Route>>, StoreError>> + Send;

    /// All routes departing `from`.
    fn routes_from(
        &self,
        from: &Iata,
    ) -> impl Future<Output = Result<Vec<Arc<Route>>, StoreError>> + Send;

    /// All routes arriving at `to`.
    fn routes_to(&self, to: &Iata)
    -> impl Future<Output = Result<Vec<Arc<Route>>, StoreError>> + Send;

    /// Visa policy for holders of `issuer` documents entering `target`.
    fn visa_policy(
        &self,
        issuer: &CountryCode,
        target: &CountryCode,
    ) -> impl Future<Output = Result<Option<Arc<VisaPolicy>>, StoreError>> + Send;
}
