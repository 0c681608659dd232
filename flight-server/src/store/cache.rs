//! Caching decorator for flight graph lookups.
//!
//! Leg searches on the same itinerary, and repeated requests, hit the same
//! departure lists and visa policies over and over. `CachedStore` keeps the
//! answers in moka caches with a shared TTL and capacity.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Airport, CountryCode, Iata, Route, VisaPolicy};

use super::{FlightStore, StoreError};

type RouteList = Arc<Vec<Arc<Route>>>;

/// Configuration for the lookup caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// A [`FlightStore`] that caches another store's answers.
///
/// Misses (unknown airport, no direct route, no policy) are cached too.
/// Errors are never cached.
pub struct CachedStore<S> {
    inner: S,
    airports: MokaCache<Iata, Option<Arc<Airport>>>,
    direct: MokaCache<(Iata, Iata), Option<Arc<Route>>>,
    departures: MokaCache<Iata, RouteList>,
    arrivals: MokaCache<Iata, RouteList>,
    policies: MokaCache<(CountryCode, CountryCode), Option<Arc<VisaPolicy>>>,
}

fn build_cache<K, V>(config: &CacheConfig) -> MokaCache<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    MokaCache::builder()
        .time_to_live(config.ttl)
        .max_capacity(config.max_capacity)
        .build()
}

impl<S: FlightStore> CachedStore<S> {
    /// Wrap a store.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            airports: build_cache(config),
            direct: build_cache(config),
            departures: build_cache(config),
            arrivals: build_cache(config),
            policies: build_cache(config),
        }
    }

    /// Access the underlying store for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.airports.invalidate_all();
        self.direct.invalidate_all();
        self.departures.invalidate_all();
        self.arrivals.invalidate_all();
        self.policies.invalidate_all();
    }
}

impl<S: FlightStore> FlightStore for CachedStore<S> {
    async fn resolve_airport(&self, iata: &Iata) -> Result<Option<Arc<Airport>>, StoreError> {
        if let Some(cached) = self.airports.get(iata).await {
            return Ok(cached);
        }
        let airport = self.inner.resolve_airport(iata).await?;
        self.airports.insert(*iata, airport.clone()).await;
        Ok(airport)
    }

    async fn find_direct_route(
        &self,
        from: &Iata,
        to: &Iata,
    ) -> Result<Option<Arc<Route>>, StoreError> {
        let key = (*from, *to);
        if let Some(cached) = self.direct.get(&key).await {
            return Ok(cached);
        }
        let route = self.inner.find_direct_route(from, to).await?;
        self.direct.insert(key, route.clone()).await;
        Ok(route)
    }

    async fn routes_from(&self, from: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
        if let Some(cached) = self.departures.get(from).await {
            trace!(airport = %from, "departures cache hit");
            return Ok(cached.as_ref().clone());
        }
        let routes = Arc::new(self.inner.routes_from(from).await?);
        self.departures.insert(*from, routes.clone()).await;
        Ok(routes.as_ref().clone())
    }

    async fn routes_to(&self, to: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
        if let Some(cached) = self.arrivals.get(to).await {
            trace!(airport = %to, "arrivals cache hit");
            return Ok(cached.as_ref().clone());
        }
        let routes = Arc::new(self.inner.routes_to(to).await?);
        self.arrivals.insert(*to, routes.clone()).await;
        Ok(routes.as_ref().clone())
    }

    async fn visa_policy(
        &self,
        issuer: &CountryCode,
        target: &CountryCode,
    ) -> Result<Option<Arc<VisaPolicy>>, StoreError> {
        let key = (*issuer, *target);
        if let Some(cached) = self.policies.get(&key).await {
            return Ok(cached);
        }
        let policy = self.inner.visa_policy(issuer, target).await?;
        self.policies.insert(key, policy.clone()).await;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::store::MemoryStore;
    use crate::store::fixtures::sample_network;

    /// Counts calls reaching the wrapped store.
    struct Counting {
        inner: MemoryStore,
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                inner: sample_network(),
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn hit(&self) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StoreError::Unavailable("offline".into()))
            } else {
                Ok(())
            }
        }
    }

    impl FlightStore for Counting {
        async fn resolve_airport(&self, iata: &Iata) -> Result<Option<Arc<Airport>>, StoreError> {
            self.hit()?;
            self.inner.resolve_airport(iata).await
        }

        async fn find_direct_route(
            &self,
            from: &Iata,
            to: &Iata,
        ) -> Result<Option<Arc<Route>>, StoreError> {
            self.hit()?;
            self.inner.find_direct_route(from, to).await
        }

        async fn routes_from(&self, from: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
            self.hit()?;
            self.inner.routes_from(from).await
        }

        async fn routes_to(&self, to: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
            self.hit()?;
            self.inner.routes_to(to).await
        }

        async fn visa_policy(
            &self,
            issuer: &CountryCode,
            target: &CountryCode,
        ) -> Result<Option<Arc<VisaPolicy>>, StoreError> {
            self.hit()?;
            self.inner.visa_policy(issuer, target).await
        }
    }

    fn iata(s: &str) -> Iata {
        Iata::parse(s).unwrap()
    }

    #[tokio::test]
    async fn repeated_lookups_hit_inner_once() {
        let store = CachedStore::new(Counting::new(false), &CacheConfig::default());
        let hkg = iata("HKG");

        let first = store.routes_from(&hkg).await.unwrap();
        let second = store.routes_from(&hkg).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);

        // Misses are cached as well.
        assert!(store.resolve_airport(&iata("ZZZ")).await.unwrap().is_none());
        assert!(store.resolve_airport(&iata("ZZZ")).await.unwrap().is_none());
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);

        store.invalidate_all();
        store.routes_from(&hkg).await.unwrap();
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let store = CachedStore::new(Counting::new(true), &CacheConfig::default());
        let hkg = iata("HKG");

        assert!(store.routes_to(&hkg).await.is_err());
        assert!(store.routes_to(&hkg).await.is_err());
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cached_answers_match_inner() {
        let store = CachedStore::new(sample_network(), &CacheConfig::default());
        let hkg = CountryCode::parse("HKG").unwrap();
        let mex = CountryCode::parse("MEX").unwrap();

        let policy = store.visa_policy(&hkg, &mex).await.unwrap().unwrap();
        assert_eq!(policy.special_arrangements.len(), 1);

        let route = store
            .find_direct_route(&iata("LAX"), &iata("MEX"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(route.distance_km, 2500);
    }
}
