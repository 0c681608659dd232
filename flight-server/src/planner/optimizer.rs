//! Genetic reduction of a candidate population.
//!
//! Scoring a candidate needs a visa lookup per travel document, so rather
//! than score every neighbor of a busy hub exactly, a bounded population is
//! evolved for a few generations towards lower `f`. The result is biased
//! towards cheap candidates; it is not an exact top-k.

use futures::future::try_join_all;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::trace;

use crate::store::{FlightStore, StoreError};

use super::config::SearchConfig;
use super::cost::CostModel;
use super::node::Candidate;

/// Evolve `candidates` and return a population of at most
/// `config.population_size`.
pub async fn optimize<S: FlightStore>(
    mut population: Vec<Candidate>,
    model: &CostModel<'_, S>,
    config: &SearchConfig,
    rng: &mut StdRng,
) -> Result<Vec<Candidate>, StoreError> {
    let size = config.population_size.max(1);
    population.truncate(size);

    if population.is_empty() {
        return Ok(population);
    }

    if config.generations == 0 {
        score_and_rank(&mut population, model).await?;
        return Ok(population);
    }

    let mutation_probability = config.mutation_probability.clamp(0.0, 1.0);

    for generation in 0..config.generations {
        score_and_rank(&mut population, model).await?;

        let parents = &population[..(size / 2).clamp(1, population.len())];
        let mut next = Vec::with_capacity(size);

        while next.len() < size {
            let first = rng.random_range(0..parents.len());
            let second = rng.random_range(0..parents.len());

            // Parents are ranked, so the lower index is the fitter one.
            let mut child = crossover(
                &parents[first.min(second)],
                &parents[first.max(second)],
            );
            if rng.random_bool(mutation_probability) {
                mutate(&mut child, config.mutation_rate, rng);
            }
            next.push(child);
        }

        trace!(
            generation,
            parents = parents.len(),
            best_f = population[0].scores.f,
            "Bred generation"
        );

        population = next;
    }

    Ok(population)
}

/// Score every individual concurrently, then sort ascending by `f`.
///
/// The sort is stable, so equally scored candidates keep their input order.
async fn score_and_rank<S: FlightStore>(
    population: &mut [Candidate],
    model: &CostModel<'_, S>,
) -> Result<(), StoreError> {
    let scores = try_join_all(population.iter().map(|candidate| model.score(candidate))).await?;

    for (candidate, scores) in population.iter_mut().zip(scores) {
        candidate.scores = scores;
    }
    population.sort_by(|a, b| a.scores.f.total_cmp(&b.scores.f));

    Ok(())
}

/// The child flies the fitter parent's route with its costs, the fewer of
/// the two hop counts, and the other parent's heuristic score.
fn crossover(fitter: &Candidate, other: &Candidate) -> Candidate {
    let mut child = fitter.clone();
    child.hops = fitter.hops.min(other.hops);
    child.scores.h = other.scores.h;
    child
}

/// Multiplicative jitter of up to `rate` on the child's cost fields.
fn mutate(child: &mut Candidate, rate: f64, rng: &mut StdRng) {
    child.scores.g *= 1.0 + rng.random::<f64>() * rate;
    child.scores.h *= 1.0 + rng.random::<f64>() * rate;
    child.distance_km *= 1.0 + rng.random::<f64>() * rate;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    use crate::domain::{Airport, CountryCode, Iata, Route, TravelDocument};
    use crate::planner::config::CostWeights;
    use crate::planner::node::{NodeTable, Scores};
    use crate::planner::visa::VisaScorer;
    use crate::store::MemoryStore;

    fn airport(code: &str, latitude: f64, longitude: f64) -> Arc<Airport> {
        Arc::new(Airport::new(
            Iata::parse(code).unwrap(),
            CountryCode::parse("XXX").unwrap(),
            latitude,
            longitude,
        ))
    }

    /// `n` candidates fanning out east of the origin. The destination lies
    /// west, so later candidates are both longer and further away.
    fn fan_out(n: usize) -> Vec<Candidate> {
        let origin = airport("AAA", 0.0, 0.0);
        let (_, root) = NodeTable::new(origin.clone(), Scores::default());

        (0..n)
            .map(|i| {
                let code = format!(
                    "B{}{}",
                    (b'A' + (i / 26 % 26) as u8) as char,
                    (b'A' + (i % 26) as u8) as char,
                );
                let to = airport(&code, 0.0, i as f64 * 0.5);
                let distance = 100 + 50 * i as u32;
                Candidate {
                    parent: root,
                    route: Arc::new(Route::new(origin.clone(), to, distance, 60)),
                    route_to_destination: None,
                    hops: 1,
                    distance_km: f64::from(distance),
                    scores: Scores::default(),
                }
            })
            .collect()
    }

    fn fixtures() -> (MemoryStore, [TravelDocument; 1], Arc<Airport>) {
        let store = MemoryStore::default();
        let docs = [TravelDocument::ordinary(CountryCode::parse("XXX").unwrap())];
        (store, docs, airport("ZZZ", 0.0, -90.0))
    }

    #[tokio::test]
    async fn empty_population_stays_empty() {
        let (store, docs, dest) = fixtures();
        let model = CostModel::new(VisaScorer::new(&store, &docs, &[]), &dest, CostWeights::default());
        let mut rng = StdRng::seed_from_u64(7);

        let result = optimize(Vec::new(), &model, &SearchConfig::default(), &mut rng)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn disabled_evolution_only_ranks() {
        let (store, docs, dest) = fixtures();
        let model = CostModel::new(VisaScorer::new(&store, &docs, &[]), &dest, CostWeights::default());
        let mut rng = StdRng::seed_from_u64(7);

        let mut input = fan_out(5);
        input.reverse();
        let config = SearchConfig::default().without_evolution();
        let result = optimize(input, &model, &config, &mut rng).await.unwrap();

        assert_eq!(result.len(), 5);
        assert!(result.windows(2).all(|w| w[0].scores.f <= w[1].scores.f));
        assert_eq!(result[0].distance_km, 100.0);
    }

    #[tokio::test]
    async fn seeded_runs_are_identical() {
        let (store, docs, dest) = fixtures();
        let model = CostModel::new(VisaScorer::new(&store, &docs, &[]), &dest, CostWeights::default());
        let config = SearchConfig::new(20, 5, 0.8, 0.02);

        let first = optimize(fan_out(30), &model, &config, &mut StdRng::seed_from_u64(11))
            .await
            .unwrap();
        let second = optimize(fan_out(30), &model, &config, &mut StdRng::seed_from_u64(11))
            .await
            .unwrap();

        let codes = |pop: &[Candidate]| pop.iter().map(Candidate::iata).collect::<Vec<_>>();
        assert_eq!(codes(&first), codes(&second));
        assert_eq!(
            first.iter().map(|c| c.scores.f).collect::<Vec<_>>(),
            second.iter().map(|c| c.scores.f).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn evolution_favours_cheap_candidates() {
        let (store, docs, dest) = fixtures();
        let model = CostModel::new(VisaScorer::new(&store, &docs, &[]), &dest, CostWeights::default());
        let config = SearchConfig::new(20, 10, 0.8, 0.02);

        let input = fan_out(20);
        let worst = input.iter().map(|c| c.distance_km).fold(0.0, f64::max);
        let result = optimize(input, &model, &config, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();

        // Only the better half ever breeds, so the worst candidate is gone.
        assert!(result.iter().all(|c| c.route.distance_km as f64 != worst));
    }

    #[test]
    fn crossover_mixes_parents() {
        let mut pop = fan_out(2);
        pop[0].scores = Scores { g: 1.0, h: 2.0, f: 3.0 };
        pop[0].hops = 3;
        pop[1].scores = Scores { g: 4.0, h: 5.0, f: 9.0 };
        pop[1].hops = 2;

        let child = crossover(&pop[0], &pop[1]);
        assert_eq!(child.iata(), pop[0].iata());
        assert_eq!(child.scores, Scores { g: 1.0, h: 5.0, f: 3.0 });
        assert_eq!(child.hops, 2);
    }

    #[test]
    fn mutation_is_small_and_upward() {
        let mut child = fan_out(1).remove(0);
        child.scores = Scores { g: 1.0, h: 1.0, f: 2.0 };
        let before = child.clone();

        mutate(&mut child, 0.02, &mut StdRng::seed_from_u64(5));

        for (after, before) in [
            (child.scores.g, before.scores.g),
            (child.scores.h, before.scores.h),
            (child.distance_km, before.distance_km),
        ] {
            assert!(after >= before && after <= before * 1.02);
        }
        assert_eq!(child.scores.f, before.scores.f);
    }

    proptest! {
        #[test]
        fn never_exceeds_population_size(
            n in 0usize..60,
            size in 1usize..30,
            generations in 0usize..4,
            seed in any::<u64>(),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (store, docs, dest) = fixtures();
            let model = CostModel::new(VisaScorer::new(&store, &docs, &[]), &dest, CostWeights::default());
            let config = SearchConfig::new(size, generations, 0.8, 0.02);

            let result = runtime
                .block_on(optimize(fan_out(n), &model, &config, &mut StdRng::seed_from_u64(seed)))
                .unwrap();

            prop_assert!(result.len() <= size);
            prop_assert_eq!(result.is_empty(), n == 0);
        }
    }
}
