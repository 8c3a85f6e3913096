//! Datrix · Assessment Scoring Backend
//!
//! - Axum HTTP API: catalog delivery, submission scoring, result retrieval
//! - Pure scoring engine (see `scoring`); all I/O stays at the boundary
//! - Optional remote datastore (via environment variables)
//!
//! Important env variables:
//!   PORT          : u16 (default 3000)
//!   STORE_BASE_URL    : enables the remote catalog/result store if present
//!   STORE_API_KEY    : key sent as apikey + bearer headers
//!   CATALOG_CONFIG_PATH  : path to TOML catalog (categories/questions/actions)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod scoring;
mod config;
mod seeds;
mod store;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (resolved catalog, result store, remote client).
  let state = Arc::new(AppState::init().await);

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "datrix_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
