//! Visa friction scoring.
//!
//! Friction is the numeric proxy for how hard it is to enter a country with
//! the traveller's documents and held visas. Lower is easier; entering with
//! no visa needed scores [`MINIMAL_FRICTION`], refused entry scores infinity.

use futures::future::try_join_all;

use crate::domain::{CountryCode, HeldVisa, TravelDocument, VisaRequirement};
use crate::store::{FlightStore, StoreError};

/// Friction of a country that needs no visa.
pub const MINIMAL_FRICTION: f64 = 1.0;

/// Friction when no policy is known for a document. Ranks between
/// visa-on-arrival and visa-required.
pub const UNKNOWN_FRICTION: f64 = 100.0;

/// Penalty for entering under a requirement class.
pub fn class_penalty(requirement: VisaRequirement) -> f64 {
    match requirement {
        VisaRequirement::FreedomOfMovement | VisaRequirement::VisaFree => MINIMAL_FRICTION,
        VisaRequirement::EVisa => 10.0,
        VisaRequirement::VisaOnArrival => 50.0,
        VisaRequirement::VisaRequired => 1000.0,
        VisaRequirement::NoAdmission => f64::INFINITY,
    }
}

/// Scores visa friction for one traveller against the store's policies.
pub struct VisaScorer<'a, S> {
    store: &'a S,
    documents: &'a [TravelDocument],
    held_visas: &'a [HeldVisa],
}

impl<'a, S: FlightStore> VisaScorer<'a, S> {
    /// Create a scorer for the given documents and held visas.
    pub fn new(store: &'a S, documents: &'a [TravelDocument], held_visas: &'a [HeldVisa]) -> Self {
        Self {
            store,
            documents,
            held_visas,
        }
    }

    fn holds_visa_for(&self, country: &CountryCode) -> bool {
        self.held_visas.iter().any(|visa| &visa.country == country)
    }

    /// Friction of entering `country` with the easiest available document.
    ///
    /// Holding a document of that nationality, or any visa issued by it,
    /// waives friction entirely, as does any document whose policy is
    /// visa-free or whose special arrangement a held visa satisfies.
    /// Otherwise the cheapest document's class penalty is used.
    pub async fn friction(&self, country: &CountryCode) -> Result<f64, StoreError> {
        if self.documents.iter().any(|doc| &doc.nationality == country) {
            return Ok(MINIMAL_FRICTION);
        }
        if self.holds_visa_for(country) {
            return Ok(MINIMAL_FRICTION);
        }

        let policies = try_join_all(
            self.documents
                .iter()
                .map(|doc| self.store.visa_policy(&doc.nationality, country)),
        )
        .await?;

        let cleared = policies.iter().flatten().any(|policy| {
            policy.requirement.is_visa_free() || policy.waived_by(self.held_visas)
        });
        if cleared {
            return Ok(MINIMAL_FRICTION);
        }

        let cheapest = policies
            .iter()
            .map(|policy| match policy {
                Some(policy) => class_penalty(policy.requirement),
                None => UNKNOWN_FRICTION,
            })
            .fold(f64::INFINITY, f64::min);

        Ok(cheapest)
    }

    /// Whether `document` alone needs a visa to enter `country`.
    ///
    /// A missing policy is assumed to need one unless a visa for the country
    /// is already held. Only the `visa required` class counts as needing a
    /// visa; e-visas and visas on arrival do not.
    pub async fn requires_visa(
        &self,
        document: &TravelDocument,
        country: &CountryCode,
    ) -> Result<bool, StoreError> {
        if &document.nationality == country {
            return Ok(false);
        }

        let policy = self.store.visa_policy(&document.nationality, country).await?;
        Ok(match policy {
            None => !self.holds_visa_for(country),
            Some(policy) if policy.requirement == VisaRequirement::VisaRequired => {
                !policy.waived_by(self.held_visas) && !self.holds_visa_for(country)
            }
            Some(_) => false,
        })
    }
}
