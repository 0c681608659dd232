//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Airport, Route, TravelDocument};

/// Request to search for a flight route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSearchRequest {
    /// Origin IATA code
    pub from: String,

    /// Destination IATA code
    pub to: String,

    /// Airports to pass through, in order
    #[serde(default)]
    pub transit_through: Vec<String>,

    /// Passports held by the traveller
    pub travel_docs: Vec<TravelDocInput>,

    /// Visas already held by the traveller
    #[serde(default)]
    pub visa_infos: Vec<VisaInfoInput>,
}

/// A travel document as submitted.
#[derive(Debug, Deserialize)]
pub struct TravelDocInput {
    /// Nationality (ISO alpha-3)
    pub nationality: String,

    /// Document type, "Ordinary" if omitted
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

/// A held visa as submitted.
#[derive(Debug, Deserialize)]
pub struct VisaInfoInput {
    /// Issuing country (ISO alpha-3)
    pub country: String,

    /// Visa type, "Tourist" if omitted
    #[serde(rename = "type")]
    pub visa_type: Option<String>,
}

/// An airport in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportResult {
    pub iata: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportResult {
    pub fn from_airport(airport: &Airport) -> Self {
        Self {
            iata: airport.iata.to_string(),
            name: airport.name.clone(),
            city: airport.city.clone(),
            country: airport.country.to_string(),
            latitude: airport.latitude,
            longitude: airport.longitude,
        }
    }
}

/// A route in responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub from: String,
    pub to: String,
    pub distance_km: u32,
    pub duration_mins: u32,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            from: route.from.iata.to_string(),
            to: route.to.iata.to_string(),
            distance_km: route.distance_km,
            duration_mins: route.duration_mins,
        }
    }
}

/// One flight of the planned itinerary, annotated for the traveller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HopResult {
    /// Index of the leg this hop belongs to
    pub leg: usize,

    pub from: AirportResult,
    pub to: AirportResult,
    pub route: RouteResult,

    /// Scheduled flying time of the whole leg, in minutes
    pub leg_flying_mins: i64,

    /// The hop lands at the destination or a requested stop
    pub is_to: bool,

    /// Every document needs a visa to enter the arrival country
    pub is_visa_required: bool,

    /// Documents that can enter the arrival country without a visa
    pub suggest_travel_docs: Vec<TravelDocument>,
}

/// Airport list response.
#[derive(Debug, Serialize)]
pub struct AirportsResponse {
    pub airports: Vec<AirportResult>,
}

/// Country list response.
#[derive(Debug, Serialize)]
pub struct CountriesResponse {
    pub countries: Vec<String>,
}

/// Query for a single airport.
#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub iata: String,
}

/// Query for a visa policy.
#[derive(Debug, Deserialize)]
pub struct VisaQuery {
    pub from: String,
    pub to: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_uses_camel_case() {
        let json = r#"{
            "from": "hkg",
            "to": "NRT",
            "transitThrough": ["TPE"],
            "travelDocs": [{"nationality": "HKG", "type": "Ordinary"}],
            "visaInfos": [{"country": "USA"}]
        }"#;
        let req: RouteSearchRequest = serde_json::from_str(json).unwrap();

        assert_eq!(req.from, "hkg");
        assert_eq!(req.transit_through, vec!["TPE"]);
        assert_eq!(req.travel_docs[0].doc_type.as_deref(), Some("Ordinary"));
        assert_eq!(req.visa_infos[0].visa_type, None);
    }

    #[test]
    fn optional_lists_default_empty() {
        let json = r#"{"from": "HKG", "to": "NRT", "travelDocs": []}"#;
        let req: RouteSearchRequest = serde_json::from_str(json).unwrap();
        assert!(req.transit_through.is_empty());
        assert!(req.visa_infos.is_empty());
    }

    #[test]
    fn hop_result_serializes_camel_case() {
        let airport = AirportResult {
            iata: "HKG".into(),
            name: String::new(),
            city: String::new(),
            country: "HKG".into(),
            latitude: 22.31,
            longitude: 113.91,
        };
        let hop = HopResult {
            leg: 0,
            from: airport.clone(),
            to: airport,
            route: RouteResult {
                from: "HKG".into(),
                to: "HKG".into(),
                distance_km: 0,
                duration_mins: 0,
            },
            leg_flying_mins: 0,
            is_to: true,
            is_visa_required: false,
            suggest_travel_docs: Vec::new(),
        };

        let json = serde_json::to_value(&hop).unwrap();
        assert_eq!(json["isTo"], true);
        assert_eq!(json["isVisaRequired"], false);
        assert!(json["suggestTravelDocs"].as_array().unwrap().is_empty());
        assert_eq!(json["route"]["distanceKm"], 0);
        assert_eq!(json["legFlyingMins"], 0);
    }
}
