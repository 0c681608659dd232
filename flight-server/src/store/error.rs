//! Store error types.

use crate::domain::Iata;

/// Errors from loading or querying the flight graph store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Snapshot file could not be read
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// Snapshot content is not valid JSON for the expected shape
    #[error("snapshot parse error: {message}")]
    Parse { message: String },

    /// A route references an airport that is not in the snapshot
    #[error("route references unknown airport {0}")]
    UnknownAirport(Iata),

    /// Two routes share the same ordered airport pair
    #[error("duplicate route {from}->{to}")]
    DuplicateRoute { from: Iata, to: Iata },

    /// Backing store could not answer
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
