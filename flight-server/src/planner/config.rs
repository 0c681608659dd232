//! Search configuration for the route planner.

/// Multipliers applied when folding cost components into `f`.
///
/// Only the relative ordering they produce matters: visa-free beats any visa
/// penalty, and fewer hops beat a shorter distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Weight of the normalized distance flown so far (`g`).
    pub distance: f64,

    /// Weight of the normalized remaining-distance estimate (`h`).
    pub heuristic: f64,

    /// Weight of the normalized visa friction.
    pub visa: f64,

    /// Weight of the hop count.
    pub hops: f64,

    /// Multiplier applied to the combined visa and hop terms.
    pub rules: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            distance: 5.0,
            heuristic: 5.0,
            visa: 1.0,
            hops: 1.0,
            rules: 50.0,
        }
    }
}

/// Configuration parameters for leg search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of candidates kept by the optimizer per population.
    pub population_size: usize,

    /// Generations the optimizer runs.
    /// Zero scores and ranks the candidates once, with no breeding.
    pub generations: usize,

    /// Probability that a child is jittered after crossover.
    pub mutation_probability: f64,

    /// Maximum relative jitter applied to a mutated child's costs.
    pub mutation_rate: f64,

    /// Cost function weights.
    pub weights: CostWeights,

    /// Seed for the optimizer's random source.
    /// `None` draws a fresh seed from the OS for every search.
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Create a new configuration with the given optimizer parameters.
    pub fn new(
        population_size: usize,
        generations: usize,
        mutation_probability: f64,
        mutation_rate: f64,
    ) -> Self {
        Self {
            population_size,
            generations,
            mutation_probability,
            mutation_rate,
            ..Self::default()
        }
    }

    /// Default configuration with a fixed seed, for reproducible searches.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Returns a copy with the optimizer disabled.
    pub fn without_evolution(mut self) -> Self {
        self.generations = 0;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 10,
            mutation_probability: 0.8,
            mutation_rate: 0.02,
            weights: CostWeights::default(),
            seed: None,
        }
    }
}
