//! Neighbor generation for the leg search.

use std::collections::HashMap;
use std::sync::Arc;

use futures::try_join;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::domain::{Iata, Route};
use crate::store::{FlightStore, StoreError};

use super::config::SearchConfig;
use super::cost::CostModel;
use super::node::{Candidate, NodeId, SearchNode};
use super::optimizer::optimize;

/// Produce the scored, reduced neighbor list of `node`, sorted by `f`.
///
/// Neighbors with a direct route on to `destination` ("closing") and the
/// rest ("continuing") are reduced separately, so a large pool of
/// continuing candidates cannot crowd out the closing ones.
pub async fn expand<S: FlightStore>(
    store: &S,
    model: &CostModel<'_, S>,
    config: &SearchConfig,
    id: NodeId,
    node: &SearchNode,
    destination: &Iata,
    rng: &mut StdRng,
) -> Result<Vec<Candidate>, StoreError> {
    let (departures, arrivals) = try_join!(
        store.routes_from(&node.airport.iata),
        store.routes_to(destination)
    )?;

    let closing_routes: HashMap<Iata, Arc<Route>> = arrivals
        .into_iter()
        .map(|route| (route.from.iata, route))
        .collect();

    let (closing, continuing): (Vec<Candidate>, Vec<Candidate>) = departures
        .into_iter()
        .map(|route| Candidate {
            parent: id,
            route_to_destination: closing_routes.get(&route.to.iata).cloned(),
            hops: node.hops + 1,
            distance_km: node.distance_km + f64::from(route.distance_km),
            scores: Default::default(),
            route,
        })
        .partition(|candidate| candidate.route_to_destination.is_some());

    trace!(
        airport = %node.airport.iata,
        closing = closing.len(),
        continuing = continuing.len(),
        "Expanding node"
    );

    // Each population gets its own stream, drawn in a fixed order.
    let mut closing_rng = StdRng::seed_from_u64(rng.random());
    let mut continuing_rng = StdRng::seed_from_u64(rng.random());

    let mut candidates = if closing.is_empty() {
        optimize(continuing, model, config, &mut continuing_rng).await?
    } else {
        let (mut closing, continuing) = try_join!(
            optimize(closing, model, config, &mut closing_rng),
            optimize(continuing, model, config, &mut continuing_rng)
        )?;
        closing.extend(continuing);
        closing
    };

    candidates.sort_by(|a, b| a.scores.f.total_cmp(&b.scores.f));
    Ok(candidates)
}
