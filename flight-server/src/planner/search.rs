//! A* search for a single leg.
//!
//! The frontier is ordered by hop count first and estimated cost `f`
//! second, so the search returns the fewest-hop path it finds and only
//! uses cost to choose among paths with equal hops.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::domain::{Airport, HeldVisa, Hop, Iata, LegPath, Route, TravelDocument};
use crate::store::{FlightStore, StoreError};

use super::config::SearchConfig;
use super::cost::CostModel;
use super::neighbors::expand;
use super::node::{NodeId, NodeTable};
use super::visa::VisaScorer;

/// Error from leg search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// Store lookup failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Node bookkeeping produced a path that does not hold together
    #[error("inconsistent search state: {0}")]
    Inconsistent(String),
}

/// A frontier entry. Ordered so that `BinaryHeap` pops the fewest hops,
/// then the lowest `f`, then the earliest pushed.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    hops: usize,
    f: f64,
    seq: u64,
    node: NodeId,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .hops
            .cmp(&self.hops)
            .then_with(|| other.f.total_cmp(&self.f))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Min-first frontier with insertion-order tie breaking.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    pushed: u64,
}

impl Frontier {
    fn push(&mut self, node: NodeId, hops: usize, f: f64) {
        self.heap.push(FrontierEntry {
            hops,
            f,
            seq: self.pushed,
            node,
        });
        self.pushed += 1;
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }
}

/// Searches one leg for one traveller.
pub struct LegSearch<'a, S> {
    store: &'a S,
    config: &'a SearchConfig,
    documents: &'a [TravelDocument],
    held_visas: &'a [HeldVisa],
}

impl<'a, S: FlightStore> LegSearch<'a, S> {
    pub fn new(
        store: &'a S,
        config: &'a SearchConfig,
        documents: &'a [TravelDocument],
        held_visas: &'a [HeldVisa],
    ) -> Self {
        Self {
            store,
            config,
            documents,
            held_visas,
        }
    }

    /// Find a path from `origin` to `destination`.
    ///
    /// Returns `Ok(None)` if the frontier empties without reaching the
    /// destination. Once an airport has been reached with a cost no better
    /// than the one recorded for it, it is abandoned and never reopened.
    pub async fn find_path(
        &self,
        origin: &Arc<Airport>,
        destination: &Arc<Airport>,
        rng: &mut StdRng,
    ) -> Result<Option<LegPath>, SearchError> {
        let model = CostModel::new(
            VisaScorer::new(self.store, self.documents, self.held_visas),
            destination,
            self.config.weights,
        );

        let origin_scores = model.origin_scores(origin);
        let (mut table, root) = NodeTable::new(origin.clone(), origin_scores);
        let mut frontier = Frontier::default();
        frontier.push(root, 0, origin_scores.f);

        let mut abandoned: HashSet<Iata> = HashSet::new();
        let mut expanded = 0usize;

        while let Some(entry) = frontier.pop() {
            let node = table
                .get(entry.node)
                .ok_or_else(|| SearchError::Inconsistent("frontier names an unknown node".into()))?
                .clone();

            // Improved in place since this entry was pushed.
            if node.hops != entry.hops || node.scores.f != entry.f {
                continue;
            }

            if node.airport.iata == destination.iata {
                let path = reconstruct(&table, entry.node, None)?;
                debug!(
                    from = %origin.iata,
                    to = %destination.iata,
                    hops = path.hop_count(),
                    expanded,
                    "Leg search reached destination"
                );
                return Ok(Some(path));
            }

            if let Some(final_route) = node.route_to_destination.clone() {
                let path = reconstruct(&table, entry.node, Some(final_route))?;
                debug!(
                    from = %origin.iata,
                    to = %destination.iata,
                    hops = path.hop_count(),
                    expanded,
                    "Leg search closed on direct route"
                );
                return Ok(Some(path));
            }

            expanded += 1;
            trace!(
                airport = %node.airport.iata,
                hops = node.hops,
                f = node.scores.f,
                "Expanding"
            );

            let candidates = expand(
                self.store,
                &model,
                self.config,
                entry.node,
                &node,
                &destination.iata,
                rng,
            )
            .await?;

            for candidate in candidates {
                let code = candidate.iata();

                if abandoned.contains(&code) {
                    continue;
                }

                if !candidate.scores.f.is_finite() || table.is_on_path(entry.node, &code) {
                    abandoned.insert(code);
                    continue;
                }

                let improves = match table.lookup(&code).and_then(|id| table.get(id)) {
                    None => true,
                    Some(known) => candidate.scores.f < known.scores.f,
                };

                if improves {
                    let id = table.upsert(&candidate);
                    frontier.push(id, candidate.hops, candidate.scores.f);
                } else {
                    abandoned.insert(code);
                }
            }
        }

        debug!(
            from = %origin.iata,
            to = %destination.iata,
            expanded,
            "Leg search exhausted frontier"
        );
        Ok(None)
    }
}

/// Walk parent links back from `goal` to the root and build the path,
/// appending `final_route` if the goal closes on a direct route.
fn reconstruct(
    table: &NodeTable,
    goal: NodeId,
    final_route: Option<Arc<Route>>,
) -> Result<LegPath, SearchError> {
    let missing = || SearchError::Inconsistent("parent link names an unknown node".into());

    let mut hops = Vec::new();
    let mut current = table.get(goal).ok_or_else(missing)?;

    while let Some(parent_id) = current.parent {
        if hops.len() >= table.len() {
            return Err(SearchError::Inconsistent(format!(
                "parent links from {} form a cycle",
                current.airport.iata
            )));
        }

        let parent = table.get(parent_id).ok_or_else(missing)?;
        let route = current.route_to_parent.clone().ok_or_else(|| {
            SearchError::Inconsistent(format!("{} has a parent but no route", current.airport.iata))
        })?;

        if !route.connects(&parent.airport.iata, &current.airport.iata) {
            return Err(SearchError::Inconsistent(format!(
                "route {}->{} does not join {} to {}",
                route.from.iata, route.to.iata, parent.airport.iata, current.airport.iata
            )));
        }

        hops.push(Hop {
            from: parent.airport.clone(),
            to: current.airport.clone(),
            route,
        });
        current = parent;
    }

    hops.reverse();

    if let Some(route) = final_route {
        let goal_airport = table.get(goal).ok_or_else(missing)?;
        if route.from.iata != goal_airport.airport.iata {
            return Err(SearchError::Inconsistent(format!(
                "closing route {}->{} does not leave {}",
                route.from.iata, route.to.iata, goal_airport.airport.iata
            )));
        }
        hops.push(Hop::from_route(route));
    }

    LegPath::new(hops).map_err(|e| SearchError::Inconsistent(e.to_string()))
}
