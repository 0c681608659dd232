//! Search nodes and the per-leg node table.
//!
//! Nodes live in an index-based arena owned by one leg search. Parent links
//! are `NodeId`s into the same arena, so a node never owns its ancestors.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Airport, Iata, Route};

/// Index of a node inside its [`NodeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Cost scores used to order the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scores {
    /// Normalized distance flown so far.
    pub g: f64,
    /// Normalized estimate of the distance left.
    pub h: f64,
    /// Total estimated cost.
    pub f: f64,
}

/// "Being at an airport having arrived via some path."
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub airport: Arc<Airport>,
    pub parent: Option<NodeId>,
    pub route_to_parent: Option<Arc<Route>>,
    /// Direct route from this airport to the leg destination, if any.
    pub route_to_destination: Option<Arc<Route>>,
    pub hops: usize,
    pub distance_km: f64,
    pub scores: Scores,
}

/// A proposed neighbor of an expanded node, not yet in the table.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub parent: NodeId,
    /// Route flown from the parent to this candidate.
    pub route: Arc<Route>,
    pub route_to_destination: Option<Arc<Route>>,
    pub hops: usize,
    pub distance_km: f64,
    pub scores: Scores,
}

impl Candidate {
    /// The airport this candidate arrives at.
    pub fn airport(&self) -> &Arc<Airport> {
        &self.route.to
    }

    /// IATA code of the airport this candidate arrives at.
    pub fn iata(&self) -> Iata {
        self.route.to.iata
    }
}

/// At most one live node per airport.
#[derive(Debug)]
pub struct NodeTable {
    nodes: Vec<SearchNode>,
    by_airport: HashMap<Iata, NodeId>,
}

impl NodeTable {
    /// Create a table holding only the leg origin.
    pub fn new(origin: Arc<Airport>, scores: Scores) -> (Self, NodeId) {
        let id = NodeId(0);
        let mut by_airport = HashMap::new();
        by_airport.insert(origin.iata, id);

        let root = SearchNode {
            airport: origin,
            parent: None,
            route_to_parent: None,
            route_to_destination: None,
            hops: 0,
            distance_km: 0.0,
            scores,
        };

        (
            Self {
                nodes: vec![root],
                by_airport,
            },
            id,
        )
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }

    /// The live node for an airport.
    pub fn lookup(&self, iata: &Iata) -> Option<NodeId> {
        self.by_airport.get(iata).copied()
    }

    /// Record `candidate` as the best known node for its airport, replacing
    /// the existing node in place if there is one.
    pub fn upsert(&mut self, candidate: &Candidate) -> NodeId {
        let node = SearchNode {
            airport: candidate.airport().clone(),
            parent: Some(candidate.parent),
            route_to_parent: Some(candidate.route.clone()),
            route_to_destination: candidate.route_to_destination.clone(),
            hops: candidate.hops,
            distance_km: candidate.distance_km,
            scores: candidate.scores,
        };

        match self.by_airport.get(&node.airport.iata) {
            Some(&id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                self.by_airport.insert(node.airport.iata, id);
                self.nodes.push(node);
                id
            }
        }
    }

    /// Whether `iata` is `id` itself or one of its ancestors.
    pub fn is_on_path(&self, id: NodeId, iata: &Iata) -> bool {
        let mut current = Some(id);
        // Bounded walk: a corrupted parent chain must not spin forever.
        for _ in 0..=self.nodes.len() {
            let Some(node) = current.and_then(|id| self.get(id)) else {
                return false;
            };
            if &node.airport.iata == iata {
                return true;
            }
            current = node.parent;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
