//! HTTP surface of the prerecordings service.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use state::AppState;
