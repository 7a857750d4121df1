//! Shared application state

use openair_core::Config;
use openair_services::PrerecordingsService;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub prerecordings: PrerecordingsService,
}
