//! Visa policies, travel documents and held visas.

use serde::{Deserialize, Serialize};

use super::CountryCode;

/// Entry requirement for holders of one nationality visiting one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaRequirement {
    #[serde(rename = "freedom of movement")]
    FreedomOfMovement,
    #[serde(rename = "visa free")]
    VisaFree,
    #[serde(rename = "e-visa")]
    EVisa,
    #[serde(rename = "visa on arrival")]
    VisaOnArrival,
    #[serde(rename = "visa required")]
    VisaRequired,
    #[serde(rename = "no admission")]
    NoAdmission,
}

impl VisaRequirement {
    /// Returns true if no visa of any kind is needed.
    pub fn is_visa_free(&self) -> bool {
        matches!(
            self,
            VisaRequirement::FreedomOfMovement | VisaRequirement::VisaFree
        )
    }
}

/// A policy exception: holding a visa of `country` with `visa_type`
/// waives the requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialArrangement {
    /// Country that issued the qualifying visa.
    pub country: CountryCode,

    /// Type of the qualifying visa (e.g. "Tourist", "Permanent Resident").
    pub visa_type: String,

    /// Permitted stay under the arrangement, in days.
    #[serde(default)]
    pub stay_days: Option<u32>,
}

impl SpecialArrangement {
    /// Returns true if any held visa satisfies this arrangement.
    pub fn is_satisfied_by(&self, held: &[HeldVisa]) -> bool {
        held.iter()
            .any(|visa| visa.country == self.country && visa.visa_type == self.visa_type)
    }
}

/// Visa policy from an issuing nationality to a destination country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaPolicy {
    /// Nationality of the travel document.
    pub from: CountryCode,

    /// Destination country.
    pub to: CountryCode,

    /// Requirement class.
    pub requirement: VisaRequirement,

    /// Exceptions that waive the requirement.
    #[serde(default)]
    pub special_arrangements: Vec<SpecialArrangement>,

    /// Permitted stay in days, where the policy grants one.
    #[serde(default)]
    pub stay_days: Option<u32>,
}

impl VisaPolicy {
    /// Create a policy without special arrangements.
    pub fn new(from: CountryCode, to: CountryCode, requirement: VisaRequirement) -> Self {
        Self {
            from,
            to,
            requirement,
            special_arrangements: Vec::new(),
            stay_days: None,
        }
    }

    /// Add a special arrangement.
    pub fn with_arrangement(mut self, country: CountryCode, visa_type: impl Into<String>) -> Self {
        self.special_arrangements.push(SpecialArrangement {
            country,
            visa_type: visa_type.into(),
            stay_days: None,
        });
        self
    }

    /// Returns true if a held visa satisfies any special arrangement.
    pub fn waived_by(&self, held: &[HeldVisa]) -> bool {
        self.special_arrangements
            .iter()
            .any(|arrangement| arrangement.is_satisfied_by(held))
    }
}

/// A travel document (passport or equivalent) held by the traveller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelDocument {
    /// Nationality printed on the document.
    pub nationality: CountryCode,

    /// Document type, "Ordinary" by default.
    #[serde(rename = "type", default = "default_document_type")]
    pub doc_type: String,
}

fn default_document_type() -> String {
    "Ordinary".to_string()
}

impl TravelDocument {
    /// An ordinary passport of the given nationality.
    pub fn ordinary(nationality: CountryCode) -> Self {
        Self {
            nationality,
            doc_type: default_document_type(),
        }
    }
}

/// A visa already held by the traveller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldVisa {
    /// Issuing country.
    pub country: CountryCode,

    /// Visa type, "Tourist" by default.
    #[serde(rename = "type", default = "default_visa_type")]
    pub visa_type: String,
}

fn default_visa_type() -> String {
    "Tourist".to_string()
}

impl HeldVisa {
    /// Create a held visa.
    pub fn new(country: CountryCode, visa_type: impl Into<String>) -> Self {
        Self {
            country,
            visa_type: visa_type.into(),
        }
    }
}
