//! Multi-leg itinerary planning.

use std::sync::Arc;

use futures::future::try_join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::domain::{
    Airport, DomainError, HeldVisa, Iata, ItineraryResult, LegPath, TravelDocument,
};
use crate::store::{FlightStore, StoreError};

use super::config::SearchConfig;
use super::search::{LegSearch, SearchError};

/// Error from itinerary planning.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanError {
    /// Request failed validation
    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    /// A waypoint code names no known airport
    #[error("airport {0} not found")]
    NotFound(Iata),

    /// A leg has no path
    #[error("no route found from {from} to {to}")]
    RouteNotFound { from: Iata, to: Iata },

    /// Search bookkeeping produced a broken path
    #[error("internal consistency error: {0}")]
    Inconsistent(String),

    /// Store lookup failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SearchError> for PlanError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Store(e) => PlanError::Store(e),
            SearchError::Inconsistent(message) => PlanError::Inconsistent(message),
        }
    }
}

impl From<DomainError> for PlanError {
    fn from(err: DomainError) -> Self {
        PlanError::Inconsistent(err.to_string())
    }
}

/// A request to plan an itinerary.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub origin: Iata,
    pub destination: Iata,
    /// Airports to pass through, in order.
    pub stops: Vec<Iata>,
    pub documents: Vec<TravelDocument>,
    pub held_visas: Vec<HeldVisa>,
}

impl RouteRequest {
    /// Create a request with no required stops or held visas.
    pub fn new(origin: Iata, destination: Iata, documents: Vec<TravelDocument>) -> Self {
        Self {
            origin,
            destination,
            stops: Vec::new(),
            documents,
            held_visas: Vec::new(),
        }
    }

    pub fn with_stops(mut self, stops: Vec<Iata>) -> Self {
        self.stops = stops;
        self
    }

    pub fn with_held_visas(mut self, held_visas: Vec<HeldVisa>) -> Self {
        self.held_visas = held_visas;
        self
    }

    /// `[origin, ...stops, destination]`.
    pub fn waypoints(&self) -> Vec<Iata> {
        let mut waypoints = Vec::with_capacity(self.stops.len() + 2);
        waypoints.push(self.origin);
        waypoints.extend(self.stops.iter().copied());
        waypoints.push(self.destination);
        waypoints
    }
}

/// Plans itineraries against a flight store.
pub struct Planner<'a, S> {
    store: &'a S,
    config: &'a SearchConfig,
}

impl<'a, S: FlightStore> Planner<'a, S> {
    /// Create a new planner.
    pub fn new(store: &'a S, config: &'a SearchConfig) -> Self {
        Self { store, config }
    }

    /// Plan every leg of `request`.
    ///
    /// Legs are planned concurrently. The first leg to fail fails the whole
    /// itinerary.
    pub async fn calculate_route(&self, request: &RouteRequest) -> Result<ItineraryResult, PlanError> {
        let waypoints = request.waypoints();
        let airports = try_join_all(waypoints.iter().map(|code| self.resolve(code))).await?;

        debug!(
            waypoints = ?waypoints,
            legs = airports.len() - 1,
            "Planning itinerary"
        );

        let legs = try_join_all(
            airports
                .windows(2)
                .enumerate()
                .map(|(index, pair)| self.plan_leg(index, &pair[0], &pair[1], request)),
        )
        .await?;

        Ok(ItineraryResult::from_legs(legs)?)
    }

    async fn resolve(&self, code: &Iata) -> Result<Arc<Airport>, PlanError> {
        self.store
            .resolve_airport(code)
            .await?
            .ok_or(PlanError::NotFound(*code))
    }

    async fn plan_leg(
        &self,
        index: usize,
        from: &Arc<Airport>,
        to: &Arc<Airport>,
        request: &RouteRequest,
    ) -> Result<(usize, LegPath), PlanError> {
        // A leg that starts where it ends has no hop to fly.
        if from.iata == to.iata {
            warn!(leg = index, airport = %from.iata, "Leg returns to its own origin");
            return Err(PlanError::RouteNotFound {
                from: from.iata,
                to: to.iata,
            });
        }

        if let Some(route) = self.store.find_direct_route(&from.iata, &to.iata).await? {
            debug!(leg = index, from = %from.iata, to = %to.iata, "Direct route");
            return Ok((index, LegPath::direct(route)));
        }

        // Only the search prices visas, so only it needs documents.
        if request.documents.is_empty() {
            return Err(PlanError::InvalidRequest(format!(
                "leg {} -> {} needs a connection, which requires at least one travel document",
                from.iata, to.iata
            )));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_os_rng(),
        };

        let search = LegSearch::new(
            self.store,
            self.config,
            &request.documents,
            &request.held_visas,
        );

        match search.find_path(from, to, &mut rng).await? {
            Some(path) => Ok((index, path)),
            None => {
                warn!(leg = index, from = %from.iata, to = %to.iata, "No route for leg");
                Err(PlanError::RouteNotFound {
                    from: from.iata,
                    to: to.iata,
                })
            }
        }
    }
}
