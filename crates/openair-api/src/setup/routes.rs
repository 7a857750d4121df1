//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use openair_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // The HEAD route gets its own handler so metadata requests never pull
    // the payload stream from storage.
    let prerecordings = Router::new()
        .route("/{event}", get(handlers::prerecordings::list))
        .route(
            "/{event}/{start}",
            get(handlers::prerecordings::download)
                .head(handlers::prerecordings::head_download)
                .put(handlers::prerecordings::upload)
                .delete(handlers::prerecordings::delete),
        );

    let app = Router::new()
        .route("/ping", get(handlers::ping::ping))
        .nest("/prerecordings", prerecordings)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let trusted = config.server.trusted.trim();

    if trusted == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = trusted
        .split(',')
        .map(|origin| origin.trim().parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}
