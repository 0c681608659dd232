//! In-memory flight graph loaded from a JSON snapshot.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Airport, CountryCode, Iata, Route, VisaPolicy, VisaRequirement};

use super::{FlightStore, StoreError};

/// One route as stored in a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRow {
    pub from: Iata,
    pub to: Iata,
    pub distance_km: u32,
    #[serde(default)]
    pub duration_mins: u32,
}

/// Serialized form of the whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub airports: Vec<Airport>,
    #[serde(default)]
    pub routes: Vec<RouteRow>,
    #[serde(default)]
    pub visa_policies: Vec<VisaPolicy>,
}

/// Flight graph held entirely in memory.
///
/// Departure and arrival lists keep snapshot order, so searches over the
/// same snapshot see candidates in the same order every time.
#[derive(Debug, Default)]
pub struct MemoryStore {
    airports: HashMap<Iata, Arc<Airport>>,
    routes: HashMap<(Iata, Iata), Arc<Route>>,
    departures: HashMap<Iata, Vec<Arc<Route>>>,
    arrivals: HashMap<Iata, Vec<Arc<Route>>>,
    policies: HashMap<(CountryCode, CountryCode), Arc<VisaPolicy>>,
}

impl MemoryStore {
    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StoreError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: Snapshot = serde_json::from_str(json).map_err(|e| StoreError::Parse {
            message: e.to_string(),
        })?;
        Self::from_snapshot(snapshot)
    }

    /// Build a store from a parsed snapshot.
    ///
    /// Fails if a route references an airport missing from the snapshot, or
    /// if two routes share an ordered airport pair. A later duplicate visa
    /// policy replaces an earlier one.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        let mut store = Self::default();

        for airport in snapshot.airports {
            store.airports.insert(airport.iata, Arc::new(airport));
        }

        for row in snapshot.routes {
            let from = store
                .airports
                .get(&row.from)
                .cloned()
                .ok_or(StoreError::UnknownAirport(row.from))?;
            let to = store
                .airports
                .get(&row.to)
                .cloned()
                .ok_or(StoreError::UnknownAirport(row.to))?;

            let key = (row.from, row.to);
            if store.routes.contains_key(&key) {
                return Err(StoreError::DuplicateRoute {
                    from: row.from,
                    to: row.to,
                });
            }

            let route = Arc::new(Route::new(from, to, row.distance_km, row.duration_mins));
            store
                .departures
                .entry(row.from)
                .or_default()
                .push(route.clone());
            store
                .arrivals
                .entry(row.to)
                .or_default()
                .push(route.clone());
            store.routes.insert(key, route);
        }

        for policy in snapshot.visa_policies {
            store
                .policies
                .insert((policy.from, policy.to), Arc::new(policy));
        }

        debug!(
            airports = store.airports.len(),
            routes = store.routes.len(),
            policies = store.policies.len(),
            "Loaded flight graph"
        );

        Ok(store)
    }

    /// Start building a store in code.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::default()
    }

    /// Airports with at least one departing route, sorted by IATA code.
    pub fn airports(&self) -> Vec<Arc<Airport>> {
        let mut served: Vec<Arc<Airport>> = self
            .departures
            .keys()
            .filter_map(|iata| self.airports.get(iata).cloned())
            .collect();
        served.sort_by(|a, b| a.iata.cmp(&b.iata));
        served
    }

    /// Countries that issue at least one visa policy, sorted.
    pub fn countries(&self) -> Vec<CountryCode> {
        let mut issuers: Vec<CountryCode> = self.policies.keys().map(|(from, _)| *from).collect();
        issuers.sort();
        issuers.dedup();
        issuers
    }

    /// Look up one airport, served or not.
    pub fn airport(&self, iata: &Iata) -> Option<Arc<Airport>> {
        self.airports.get(iata).cloned()
    }

    /// Number of routes in the graph.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl FlightStore for MemoryStore {
    async fn resolve_airport(&self, iata: &Iata) -> Result<Option<Arc<Airport>>, StoreError> {
        Ok(self.airports.get(iata).cloned())
    }

    async fn find_direct_route(
        &self,
        from: &Iata,
        to: &Iata,
    ) -> Result<Option<Arc<Route>>, StoreError> {
        Ok(self.routes.get(&(*from, *to)).cloned())
    }

    async fn routes_from(&self, from: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
        Ok(self.departures.get(from).cloned().unwrap_or_default())
    }

    async fn routes_to(&self, to: &Iata) -> Result<Vec<Arc<Route>>, StoreError> {
        Ok(self.arrivals.get(to).cloned().unwrap_or_default())
    }

    async fn visa_policy(
        &self,
        issuer: &CountryCode,
        target: &CountryCode,
    ) -> Result<Option<Arc<VisaPolicy>>, StoreError> {
        Ok(self.policies.get(&(*issuer, *target)).cloned())
    }
}

/// Builder for assembling a [`MemoryStore`] from string codes.
///
/// Code parse errors are reported by [`MemoryStoreBuilder::build`].
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    airports: Vec<(String, String, String, f64, f64)>,
    routes: Vec<(String, String, u32, u32)>,
    policies: Vec<(String, String, VisaRequirement, Vec<(String, String)>)>,
}

impl MemoryStoreBuilder {
    /// Add an airport.
    pub fn airport(mut self, iata: &str, country: &str, latitude: f64, longitude: f64) -> Self {
        self.airports.push((
            iata.to_string(),
            country.to_string(),
            String::new(),
            latitude,
            longitude,
        ));
        self
    }

    /// Add an airport with a display name.
    pub fn named_airport(
        mut self,
        iata: &str,
        name: &str,
        country: &str,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        self.airports.push((
            iata.to_string(),
            country.to_string(),
            name.to_string(),
            latitude,
            longitude,
        ));
        self
    }

    /// Add a route.
    pub fn route(mut self, from: &str, to: &str, distance_km: u32, duration_mins: u32) -> Self {
        self.routes
            .push((from.to_string(), to.to_string(), distance_km, duration_mins));
        self
    }

    /// Add a visa policy.
    pub fn visa(mut self, from: &str, to: &str, requirement: VisaRequirement) -> Self {
        self.policies
            .push((from.to_string(), to.to_string(), requirement, Vec::new()));
        self
    }

    /// Add a visa policy waived by holding a visa of `waiver_country`.
    pub fn visa_with_arrangement(
        mut self,
        from: &str,
        to: &str,
        requirement: VisaRequirement,
        waiver_country: &str,
        waiver_type: &str,
    ) -> Self {
        self.policies.push((
            from.to_string(),
            to.to_string(),
            requirement,
            vec![(waiver_country.to_string(), waiver_type.to_string())],
        ));
        self
    }

    /// Validate codes and build the store.
    pub fn build(self) -> Result<MemoryStore, StoreError> {
        let mut snapshot = Snapshot::default();

        for (iata, country, name, latitude, longitude) in self.airports {
            let airport = Airport::new(parse_iata(&iata)?, parse_country(&country)?, latitude, longitude);
            snapshot.airports.push(airport.with_name(name, String::new()));
        }

        for (from, to, distance_km, duration_mins) in self.routes {
            snapshot.routes.push(RouteRow {
                from: parse_iata(&from)?,
                to: parse_iata(&to)?,
                distance_km,
                duration_mins,
            });
        }

        for (from, to, requirement, arrangements) in self.policies {
            let mut policy =
                VisaPolicy::new(parse_country(&from)?, parse_country(&to)?, requirement);
            for (country, visa_type) in arrangements {
                policy = policy.with_arrangement(parse_country(&country)?, visa_type);
            }
            snapshot.visa_policies.push(policy);
        }

        MemoryStore::from_snapshot(snapshot)
    }
}

fn parse_iata(s: &str) -> Result<Iata, StoreError> {
    Iata::parse(s).map_err(|e| StoreError::Parse {
        message: e.to_string(),
    })
}

fn parse_country(s: &str) -> Result<CountryCode, StoreError> {
    CountryCode::parse(s).map_err(|e| StoreError::Parse {
        message: e.to_string(),
    })
}
