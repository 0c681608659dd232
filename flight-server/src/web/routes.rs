//! HTTP route handlers.

use std::collections::HashSet;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use futures::future::try_join_all;
use tracing::{debug, error, warn};

use crate::domain::{
    CountryCode, HeldVisa, Iata, ItineraryResult, TravelDocument, VisaPolicy,
};
use crate::planner::{PlanError, Planner, RouteRequest, VisaScorer};
use crate::store::{FlightStore, StoreError};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/flightroute/search", post(search_route))
        .route("/data/allairports", get(all_airports))
        .route("/data/allcountries", get(all_countries))
        .route("/data/airport", get(airport))
        .route("/data/visa", get(visa_policy))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_iata(field: &str, value: &str) -> Result<Iata, AppError> {
    Iata::parse_normalized(value).map_err(|_| AppError::BadRequest {
        message: format!("Invalid {field} airport code: {value}"),
    })
}

fn parse_country(field: &str, value: &str) -> Result<CountryCode, AppError> {
    CountryCode::parse_normalized(value).map_err(|_| AppError::BadRequest {
        message: format!("Invalid {field} country code: {value}"),
    })
}

impl RouteSearchRequest {
    /// Parse into a planner request.
    fn to_route_request(&self) -> Result<RouteRequest, AppError> {
        let origin = parse_iata("origin", &self.from)?;
        let destination = parse_iata("destination", &self.to)?;
        let stops = self
            .transit_through
            .iter()
            .map(|code| parse_iata("transit", code))
            .collect::<Result<Vec<_>, _>>()?;

        let documents = self
            .travel_docs
            .iter()
            .map(|doc| {
                let mut document =
                    TravelDocument::ordinary(parse_country("nationality", &doc.nationality)?);
                if let Some(doc_type) = &doc.doc_type {
                    document.doc_type = doc_type.clone();
                }
                Ok(document)
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let held_visas = self
            .visa_infos
            .iter()
            .map(|visa| {
                Ok(HeldVisa::new(
                    parse_country("visa", &visa.country)?,
                    visa.visa_type.as_deref().unwrap_or("Tourist"),
                ))
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(RouteRequest::new(origin, destination, documents)
            .with_stops(stops)
            .with_held_visas(held_visas))
    }
}

/// Plan a route and annotate each hop with visa advice.
async fn search_route(
    State(state): State<AppState>,
    Json(req): Json<RouteSearchRequest>,
) -> Result<Json<Vec<HopResult>>, AppError> {
    let request = req.to_route_request()?;

    let result = Planner::new(state.store.as_ref(), &state.config)
        .calculate_route(&request)
        .await?;

    let hops = annotate(state.store.as_ref(), &request, &result).await?;

    debug!(
        from = %request.origin,
        to = %request.destination,
        path = ?result.airports(),
        "Route search complete"
    );

    Ok(Json(hops))
}

/// Flatten an itinerary into hops, in leg order.
///
/// Hops landing at a requested airport are marked `is_to` and not checked.
/// International hops elsewhere get a per-document visa check.
async fn annotate<S: FlightStore>(
    store: &S,
    request: &RouteRequest,
    result: &ItineraryResult,
) -> Result<Vec<HopResult>, StoreError> {
    let targets: HashSet<Iata> = request
        .stops
        .iter()
        .copied()
        .chain(std::iter::once(request.destination))
        .collect();
    let scorer = VisaScorer::new(store, &request.documents, &request.held_visas);

    let mut hops = Vec::new();
    for (leg, path) in result.legs() {
        let leg_flying_mins = path.flying_time().num_minutes();
        for hop in path.hops() {
            let mut annotated = HopResult {
                leg,
                from: AirportResult::from_airport(&hop.from),
                to: AirportResult::from_airport(&hop.to),
                route: RouteResult::from_route(&hop.route),
                leg_flying_mins,
                is_to: false,
                is_visa_required: false,
                suggest_travel_docs: Vec::new(),
            };

            if targets.contains(&hop.to.iata) {
                annotated.is_to = true;
            } else if hop.route.is_international() {
                let country = hop.to.country;
                let required = try_join_all(
                    request
                        .documents
                        .iter()
                        .map(|doc| scorer.requires_visa(doc, &country)),
                )
                .await?;

                annotated.is_visa_required = required.iter().all(|r| *r);
                annotated.suggest_travel_docs = request
                    .documents
                    .iter()
                    .zip(&required)
                    .filter(|(_, required)| !**required)
                    .map(|(doc, _)| doc.clone())
                    .collect();
            }

            hops.push(annotated);
        }
    }

    Ok(hops)
}

/// All airports with at least one departure.
async fn all_airports(State(state): State<AppState>) -> Json<AirportsResponse> {
    let airports = state
        .store
        .inner()
        .airports()
        .iter()
        .map(|airport| AirportResult::from_airport(airport))
        .collect();

    Json(AirportsResponse { airports })
}

/// All countries that issue travel documents with a known visa policy.
async fn all_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    let countries = state
        .store
        .inner()
        .countries()
        .iter()
        .map(ToString::to_string)
        .collect();

    Json(CountriesResponse { countries })
}

/// Look up one airport.
async fn airport(
    State(state): State<AppState>,
    Query(query): Query<AirportQuery>,
) -> Result<Json<AirportResult>, AppError> {
    let iata = parse_iata("query", &query.iata)?;

    let airport = state
        .store
        .resolve_airport(&iata)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("Airport {iata} not found"),
        })?;

    Ok(Json(AirportResult::from_airport(&airport)))
}

/// Look up the visa policy between two countries.
async fn visa_policy(
    State(state): State<AppState>,
    Query(query): Query<VisaQuery>,
) -> Result<Json<VisaPolicy>, AppError> {
    let from = parse_country("issuer", &query.from)?;
    let to = parse_country("destination", &query.to)?;

    let policy = state
        .store
        .visa_policy(&from, &to)
        .await?
        .ok_or_else(|| AppError::NotFound {
            message: format!("No visa policy from {from} to {to}"),
        })?;

    Ok(Json(policy.as_ref().clone()))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            PlanError::NotFound(_) | PlanError::RouteNotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            PlanError::Inconsistent(_) | PlanError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
