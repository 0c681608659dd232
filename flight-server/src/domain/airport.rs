//! Airports and the flight routes between them.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{CountryCode, Iata};

/// An airport record. Identity is the IATA code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code, unique per airport.
    pub iata: Iata,

    /// Display name (English).
    #[serde(default)]
    pub name: String,

    /// City served (English).
    #[serde(default)]
    pub city: String,

    /// Country the airport is located in.
    pub country: CountryCode,

    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

impl Airport {
    /// Create an airport with empty display names.
    pub fn new(iata: Iata, country: CountryCode, latitude: f64, longitude: f64) -> Self {
        Self {
            iata,
            name: String::new(),
            city: String::new(),
            country,
            latitude,
            longitude,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>, city: impl Into<String>) -> Self {
        self.name = name.into();
        self.city = city.into();
        self
    }
}

/// A scheduled flight route between two airports.
///
/// At most one route exists per ordered (origin, destination) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Departure airport.
    pub from: Arc<Airport>,

    /// Arrival airport.
    pub to: Arc<Airport>,

    /// Flown distance in kilometres.
    pub distance_km: u32,

    /// Scheduled block time in minutes.
    pub duration_mins: u32,
}

impl Route {
    /// Create a route between two airports.
    pub fn new(from: Arc<Airport>, to: Arc<Airport>, distance_km: u32, duration_mins: u32) -> Self {
        Self {
            from,
            to,
            distance_km,
            duration_mins,
        }
    }

    /// The (origin, destination) identity key.
    pub fn key(&self) -> (Iata, Iata) {
        (self.from.iata, self.to.iata)
    }

    /// Returns true if this route flies exactly `from` -> `to`.
    pub fn connects(&self, from: &Iata, to: &Iata) -> bool {
        &self.from.iata == from && &self.to.iata == to
    }

    /// Returns true if the route crosses a national border.
    pub fn is_international(&self) -> bool {
        self.from.country != self.to.country
    }

    /// Scheduled block time as a Duration.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_mins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(iata: &str, country: &str) -> Arc<Airport> {
        Arc::new(Airport::new(
            Iata::parse(iata).unwrap(),
            CountryCode::parse(country).unwrap(),
            0.0,
            0.0,
        ))
    }

    #[test]
    fn route_key_and_connects() {
        let route = Route::new(airport("HKG", "HKG"), airport("NRT", "JPN"), 2950, 270);

        let hkg = Iata::parse("HKG").unwrap();
        let nrt = Iata::parse("NRT").unwrap();
        assert_eq!(route.key(), (hkg, nrt));
        assert!(route.connects(&hkg, &nrt));
        assert!(!route.connects(&nrt, &hkg));
    }

    #[test]
    fn international_and_duration() {
        let domestic = Route::new(airport("NRT", "JPN"), airport("ITM", "JPN"), 480, 75);
        let abroad = Route::new(airport("NRT", "JPN"), airport("TPE", "TWN"), 2180, 225);

        assert!(!domestic.is_international());
        assert!(abroad.is_international());
        assert_eq!(domestic.duration(), Duration::minutes(75));
    }

    #[test]
    fn airport_deserializes_without_names() {
        let json = r#"{"iata":"BKK","country":"THA","latitude":13.69,"longitude":100.75}"#;
        let airport: Airport = serde_json::from_str(json).unwrap();

        assert_eq!(airport.iata.as_str(), "BKK");
        assert_eq!(airport.country.as_str(), "THA");
        assert!(airport.name.is_empty());
    }
}
