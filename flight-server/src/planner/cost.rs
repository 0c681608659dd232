//! Cost function for candidate nodes.

use crate::domain::Airport;
use crate::store::{FlightStore, StoreError};

use super::config::CostWeights;
use super::heuristic::remaining_km;
use super::node::{Candidate, Scores};
use super::visa::VisaScorer;

/// Half the Earth's circumference; the longest possible great-circle hop.
const MAX_DISTANCE_KM: f64 = 20_037.0;

/// Raw visa friction is divided by this before weighting.
const VISA_SCALE: f64 = 1000.0;

/// Scores candidates for one leg.
pub struct CostModel<'a, S> {
    visa: VisaScorer<'a, S>,
    destination: &'a Airport,
    weights: CostWeights,
}

impl<'a, S: FlightStore> CostModel<'a, S> {
    pub fn new(visa: VisaScorer<'a, S>, destination: &'a Airport, weights: CostWeights) -> Self {
        Self {
            visa,
            destination,
            weights,
        }
    }

    /// Scores of the leg origin, before any hop.
    pub fn origin_scores(&self, origin: &Airport) -> Scores {
        let h = remaining_km(origin, self.destination, None) / MAX_DISTANCE_KM
            * self.weights.heuristic;
        Scores { g: 0.0, h, f: h }
    }

    /// Score a candidate.
    ///
    /// Visa friction only counts when the hop crosses into another country
    /// or lands in the destination's country. `f` is infinite when entry is
    /// refused.
    pub async fn score(&self, candidate: &Candidate) -> Result<Scores, StoreError> {
        let weights = &self.weights;
        let airport = candidate.airport();

        let g = candidate.distance_km / MAX_DISTANCE_KM * weights.distance;
        let h = remaining_km(
            airport,
            self.destination,
            candidate.route_to_destination.as_deref(),
        ) / MAX_DISTANCE_KM
            * weights.heuristic;

        let crosses_border = candidate.route.from.country != airport.country;
        let visa = if crosses_border || airport.country == self.destination.country {
            self.visa.friction(&airport.country).await? / VISA_SCALE
        } else {
            0.0
        };

        let rules = (visa * weights.visa + candidate.hops as f64 * weights.hops) * weights.rules;
        Ok(Scores { g, h, f: g + h + rules })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{CountryCode, Iata, Route, TravelDocument, VisaRequirement};
    use crate::planner::node::NodeTable;
    use crate::store::MemoryStore;

    fn airport(code: &str, country: &str, latitude: f64, longitude: f64) -> Arc<Airport> {
        Arc::new(Airport::new(
            Iata::parse(code).unwrap(),
            CountryCode::parse(country).unwrap(),
            latitude,
            longitude,
        ))
    }

    fn store() -> MemoryStore {
        MemoryStore::builder()
            .visa("HKG", "USA", VisaRequirement::VisaRequired)
            .visa("HKG", "JPN", VisaRequirement::VisaFree)
            .visa("HKG", "PRK", VisaRequirement::NoAdmission)
            .build()
            .unwrap()
    }

    fn candidate(from: &Arc<Airport>, to: &Arc<Airport>, hops: usize) -> Candidate {
        let (_, root) = NodeTable::new(from.clone(), Scores::default());
        Candidate {
            parent: root,
            route: Arc::new(Route::new(from.clone(), to.clone(), 3000, 240)),
            route_to_destination: None,
            hops,
            distance_km: 3000.0,
            scores: Scores::default(),
        }
    }

    #[tokio::test]
    async fn visa_penalty_outweighs_distance() {
        let store = store();
        let docs = [TravelDocument::ordinary(CountryCode::parse("HKG").unwrap())];
        let dest = airport("MEX", "MEX", 19.44, -99.07);
        let model = CostModel::new(
            VisaScorer::new(&store, &docs, &[]),
            &dest,
            CostWeights::default(),
        );

        let hkg = airport("HKG", "HKG", 22.31, 113.91);
        let nrt = airport("NRT", "JPN", 35.76, 140.39);
        let lax = airport("LAX", "USA", 33.94, -118.41);

        // LAX is much closer to MEX but needs a visa.
        let via_nrt = model.score(&candidate(&hkg, &nrt, 1)).await.unwrap();
        let via_lax = model.score(&candidate(&hkg, &lax, 1)).await.unwrap();
        assert!(via_lax.h < via_nrt.h);
        assert!(via_lax.f > via_nrt.f);
    }

    #[tokio::test]
    async fn extra_hop_outweighs_distance() {
        let store = store();
        let docs = [TravelDocument::ordinary(CountryCode::parse("HKG").unwrap())];
        let dest = airport("MEX", "MEX", 19.44, -99.07);
        let model = CostModel::new(
            VisaScorer::new(&store, &docs, &[]),
            &dest,
            CostWeights::default(),
        );

        let hkg = airport("HKG", "HKG", 22.31, 113.91);
        let nrt = airport("NRT", "JPN", 35.76, 140.39);

        let one = model.score(&candidate(&hkg, &nrt, 1)).await.unwrap();
        let two = model.score(&candidate(&hkg, &nrt, 2)).await.unwrap();
        assert!((two.f - one.f - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn domestic_hop_skips_visa() {
        let store = store();
        let docs = [TravelDocument::ordinary(CountryCode::parse("HKG").unwrap())];
        let dest = airport("MEX", "MEX", 19.44, -99.07);
        let model = CostModel::new(
            VisaScorer::new(&store, &docs, &[]),
            &dest,
            CostWeights::default(),
        );

        let jfk = airport("JFK", "USA", 40.64, -73.78);
        let lax = airport("LAX", "USA", 33.94, -118.41);
        let scores = model.score(&candidate(&jfk, &lax, 1)).await.unwrap();

        // Only the hop term contributes to the rule score.
        assert!((scores.f - scores.g - scores.h - 50.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn refused_entry_is_infinite() {
        let store = store();
        let docs = [TravelDocument::ordinary(CountryCode::parse("HKG").unwrap())];
        let dest = airport("MEX", "MEX", 19.44, -99.07);
        let model = CostModel::new(
            VisaScorer::new(&store, &docs, &[]),
            &dest,
            CostWeights::default(),
        );

        let hkg = airport("HKG", "HKG", 22.31, 113.91);
        let fnj = airport("FNJ", "PRK", 39.22, 125.67);
        let scores = model.score(&candidate(&hkg, &fnj, 1)).await.unwrap();
        assert!(scores.f.is_infinite());
    }

    #[test]
    fn origin_has_only_heuristic() {
        let store = store();
        let dest = airport("NRT", "JPN", 35.76, 140.39);
        let model = CostModel::new(
            VisaScorer::new(&store, &[], &[]),
            &dest,
            CostWeights::default(),
        );

        let origin = model.origin_scores(&airport("HKG", "HKG", 22.31, 113.91));
        assert_eq!(origin.g, 0.0);
        assert_eq!(origin.f, origin.h);
        assert!(origin.h > 0.0);
    }
}
