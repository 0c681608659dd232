//! Leg paths and itinerary results.
//!
//! A `LegPath` is the ordered list of hops that flies one leg of an
//! itinerary; an `ItineraryResult` maps each leg index to its path.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;

use super::{Airport, DomainError, Iata, Route};

/// One direct flight inside a leg.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    /// Departure airport.
    pub from: Arc<Airport>,
    /// Arrival airport.
    pub to: Arc<Airport>,
    /// Route flown.
    pub route: Arc<Route>,
}

impl Hop {
    /// Create a hop flying `route` between its own endpoints.
    pub fn from_route(route: Arc<Route>) -> Self {
        Self {
            from: route.from.clone(),
            to: route.to.clone(),
            route,
        }
    }

    /// Checks that the route flies exactly between this hop's airports.
    fn validate(&self) -> Result<(), DomainError> {
        if self.route.connects(&self.from.iata, &self.to.iata) {
            Ok(())
        } else {
            Err(DomainError::RouteMismatch {
                hop_from: self.from.iata,
                hop_to: self.to.iata,
                route_from: self.route.from.iata,
                route_to: self.route.to.iata,
            })
        }
    }
}

/// The flights that make up one leg, origin to destination.
///
/// # Invariants
///
/// - At least one hop
/// - Every hop's route connects that hop's airports
/// - Consecutive hops connect (arrival of one = departure of next)
#[derive(Debug, Clone, PartialEq)]
pub struct LegPath {
    hops: Vec<Hop>,
}

impl LegPath {
    /// Constructs a leg path from hops, validating contiguity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty, a hop's route does not match its
    /// airports, or consecutive hops don't share an airport.
    pub fn new(hops: Vec<Hop>) -> Result<Self, DomainError> {
        if hops.is_empty() {
            return Err(DomainError::EmptyPath);
        }

        for hop in &hops {
            hop.validate()?;
        }

        for window in hops.windows(2) {
            let arrived = &window[0].to.iata;
            let departing = &window[1].from.iata;
            if arrived != departing {
                return Err(DomainError::Disconnected(*arrived, *departing));
            }
        }

        Ok(Self { hops })
    }

    /// A single-hop path flying one direct route.
    pub fn direct(route: Arc<Route>) -> Self {
        Self {
            hops: vec![Hop::from_route(route)],
        }
    }

    /// Returns all hops in order.
    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// Returns the number of flights.
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// Returns true if the leg is a single direct flight.
    pub fn is_direct(&self) -> bool {
        self.hops.len() == 1
    }

    /// Returns the departure airport of the leg.
    pub fn origin(&self) -> &Arc<Airport> {
        // Validated non-empty at construction
        &self.hops[0].from
    }

    /// Returns the arrival airport of the leg.
    pub fn destination(&self) -> &Arc<Airport> {
        &self.hops[self.hops.len() - 1].to
    }

    /// Returns every airport touched, in flying order.
    pub fn airports(&self) -> Vec<Iata> {
        let mut codes = Vec::with_capacity(self.hops.len() + 1);
        codes.push(self.origin().iata);
        codes.extend(self.hops.iter().map(|hop| hop.to.iata));
        codes
    }

    /// Returns the total flown distance.
    pub fn total_distance_km(&self) -> u64 {
        self.hops
            .iter()
            .map(|hop| u64::from(hop.route.distance_km))
            .sum()
    }

    /// Returns the total scheduled flying time (excluding connections).
    pub fn flying_time(&self) -> Duration {
        self.hops.iter().map(|hop| hop.route.duration()).sum()
    }
}

/// Paths for every leg of an itinerary, keyed by leg index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItineraryResult {
    legs: BTreeMap<usize, LegPath>,
}

impl ItineraryResult {
    /// Assemble a result from indexed legs, in any completion order.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the indices are not exactly `0..legs.len()`.
    pub fn from_legs(legs: impl IntoIterator<Item = (usize, LegPath)>) -> Result<Self, DomainError> {
        let legs: BTreeMap<usize, LegPath> = legs.into_iter().collect();

        for (expected, index) in legs.keys().enumerate() {
            if *index != expected {
                return Err(DomainError::MissingLeg(expected));
            }
        }

        Ok(Self { legs })
    }

    /// Returns the number of legs.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Returns true if there are no legs.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Returns the path of leg `index`.
    pub fn leg(&self, index: usize) -> Option<&LegPath> {
        self.legs.get(&index)
    }

    /// Iterates legs in index order.
    pub fn legs(&self) -> impl Iterator<Item = (usize, &LegPath)> {
        self.legs.iter().map(|(index, path)| (*index, path))
    }

    /// Iterates every hop of every leg in flying order.
    pub fn hops(&self) -> impl Iterator<Item = &Hop> {
        self.legs.values().flat_map(|path| path.hops())
    }

    /// Returns every airport touched, in flying order, without repeating
    /// the shared airport between consecutive legs.
    pub fn airports(&self) -> Vec<Iata> {
        let mut codes: Vec<Iata> = Vec::new();
        for path in self.legs.values() {
            for code in path.airports() {
                if codes.last() != Some(&code) {
                    codes.push(code);
                }
            }
        }
        codes
    }

    /// Returns the total flown distance over all legs.
    pub fn total_distance_km(&self) -> u64 {
        self.legs.values().map(LegPath::total_distance_km).sum()
    }
}
