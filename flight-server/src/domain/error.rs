//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from store/IO errors.

use super::Iata;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Leg path has no hops
    #[error("leg path must have at least one hop")]
    EmptyPath,

    /// Consecutive hops don't share an airport
    #[error("hops are not contiguous: {0} does not connect to {1}")]
    Disconnected(Iata, Iata),

    /// A hop's route doesn't fly between the hop's own airports
    #[error("route {route_from}->{route_to} does not match hop {hop_from}->{hop_to}")]
    RouteMismatch {
        hop_from: Iata,
        hop_to: Iata,
        route_from: Iata,
        route_to: Iata,
    },

    /// A leg result is keyed to the wrong leg index
    #[error("leg {0} is missing from the itinerary")]
    MissingLeg(usize),
}
