use std::error::Error;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flight_server::config::ServerConfig;
use flight_server::planner::SearchConfig;
use flight_server::store::{CacheConfig, CachedStore, MemoryStore};
use flight_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Load the flight graph (fail fast if unreadable)
    info!(path = %config.data_path.display(), "Loading flight network");
    let store = MemoryStore::from_json_file(&config.data_path)?;
    info!(
        airports = store.airports().len(),
        routes = store.route_count(),
        "Flight network loaded"
    );

    let cached = CachedStore::new(store, &CacheConfig::default());

    let search_config = SearchConfig {
        seed: config.seed,
        ..SearchConfig::default()
    };

    let state = AppState::new(cached, search_config);
    let app = create_router(state);

    let addr = config.addr;
    info!("Flight Route Planner listening on http://{addr}");
    info!("  GET  /health               - Health check");
    info!("  POST /flightroute/search   - Plan a route");
    info!("  GET  /data/allairports     - Airports with departures");
    info!("  GET  /data/allcountries    - Document-issuing countries");
    info!("  GET  /data/airport?iata=   - Airport details");
    info!("  GET  /data/visa?from=&to=  - Visa policy");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
