//! Liveness endpoint

use axum::http::StatusCode;

/// GET/HEAD /ping - empty 200 when the server is up.
pub async fn ping() -> StatusCode {
    StatusCode::OK
}
