#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the library checkouts dashboard.
//!
//! Holds a single [`Dashboard`] backed by the Seattle Public Library
//! checkouts dataset and exposes its operations as a small REST API for
//! the frontend.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use library_checkouts_dashboard::Dashboard;
use library_checkouts_source::dataset::DatasetDefinition;
use library_checkouts_source::socrata::SocrataGateway;

/// Shared application state.
pub struct AppState {
    /// Dashboard state shared by every request.
    pub dashboard: Arc<Dashboard>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/checkouts", web::get().to(handlers::checkouts))
            .route("/view", web::get().to(handlers::view))
            .route("/sort/{column}", web::post().to(handlers::sort))
            .route("/types", web::get().to(handlers::types))
            .route("/popularity", web::get().to(handlers::popularity)),
    );
}

/// Starts the library checkouts API server.
///
/// Loads the embedded dataset definition, builds the Socrata gateway and
/// serves the API on `BIND_ADDR:PORT` (default `127.0.0.1:8080`). The
/// caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the dataset definition is
/// invalid, or if the HTTP server fails to bind or encounters a runtime
/// error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let dataset = DatasetDefinition::seattle_checkouts().map_err(std::io::Error::other)?;
    log::info!("Browsing {} ({})", dataset.name, dataset.api_url);

    let gateway = Arc::new(SocrataGateway::new(dataset));
    let state = web::Data::new(AppState {
        dashboard: Arc::new(Dashboard::new(gateway)),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
