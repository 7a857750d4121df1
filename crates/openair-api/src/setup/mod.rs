//! Application setup

pub mod routes;
pub mod server;

use crate::state::AppState;
use axum::Router;
use openair_core::Config;
use openair_services::PrerecordingsService;
use openair_shows::HttpShowsClient;
use openair_storage::S3Storage;
use std::sync::Arc;

/// Wire up collaborators, services, and routes.
pub fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let storage = Arc::new(S3Storage::new(&config.s3));
    let shows = Arc::new(HttpShowsClient::new(config.shows.url()));
    let prerecordings = PrerecordingsService::new(shows, storage);

    let state = Arc::new(AppState {
        config: config.clone(),
        prerecordings,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
