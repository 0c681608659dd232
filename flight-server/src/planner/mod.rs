//! Flight route planner.
//!
//! This module implements the core planning algorithm that answers:
//! "How do I fly from here to there, through these stops, with these
//! passports and visas?"
//!
//! Each leg between consecutive waypoints is either a single direct route or
//! the result of an A* search that orders its frontier by hop count before
//! cost. Neighbor lists from busy hubs are cut down by a small genetic
//! optimizer, and every hop is priced with a visa-aware cost function.

mod config;
mod cost;
mod heuristic;
mod itinerary;
mod neighbors;
mod node;
mod optimizer;
mod search;
mod visa;

pub use config::{CostWeights, SearchConfig};
pub use heuristic::haversine_km;
pub use itinerary::{PlanError, Planner, RouteRequest};
pub use search::{LegSearch, SearchError};
pub use visa::{MINIMAL_FRICTION, VisaScorer};
