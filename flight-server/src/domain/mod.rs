//! Domain types for the flight route planner.
//!
//! This module contains the core domain model types that represent
//! validated airport, route and visa data. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod airport;
mod codes;
mod error;
mod path;
mod visa;

pub use airport::{Airport, Route};
pub use codes::{CountryCode, Iata, InvalidCode};
pub use error::DomainError;
pub use path::{Hop, ItineraryResult, LegPath};
pub use visa::{HeldVisa, SpecialArrangement, TravelDocument, VisaPolicy, VisaRequirement};
