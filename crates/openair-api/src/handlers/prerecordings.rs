//! Prerecordings endpoints
//!
//! Payloads stream in both directions: downloads forward the storage stream
//! into the response body, uploads forward the request body into storage.
//! The HEAD route has its own handler so no payload bytes ever move for it.

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use futures::TryStreamExt;
use openair_core::models::ListOrder;
use openair_core::AppError;
use openair_services::ListParams;
use openair_storage::ObjectStat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio_util::io::StreamReader;
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub after: Option<NaiveDateTime>,
    pub before: Option<NaiveDateTime>,
    #[serde(default = "default_limit")]
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub order: Option<ListOrder>,
}

fn default_limit() -> Option<usize> {
    Some(DEFAULT_LIST_LIMIT)
}

#[derive(Debug, Serialize)]
pub struct PrerecordingResponse {
    pub event: Uuid,
    pub start: NaiveDateTime,
}

#[derive(Debug, Serialize)]
pub struct PrerecordingListResponse {
    pub count: usize,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub prerecordings: Vec<PrerecordingResponse>,
}

/// GET /prerecordings/{event} - list prerecordings of an event.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(event): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PrerecordingListResponse>, HttpAppError> {
    let params = ListParams {
        after: query.after,
        before: query.before,
        limit: query.limit,
        offset: query.offset,
        order: query.order,
    };

    let outcome = state.prerecordings.list(event, params).await?;

    Ok(Json(PrerecordingListResponse {
        count: outcome.count,
        limit: outcome.limit,
        offset: outcome.offset,
        prerecordings: outcome
            .prerecordings
            .into_iter()
            .map(|p| PrerecordingResponse {
                event: p.event,
                start: p.start,
            })
            .collect(),
    }))
}

/// GET /prerecordings/{event}/{start} - download a prerecording.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path((event, start)): Path<(Uuid, String)>,
) -> Result<Response, HttpAppError> {
    let start = parse_start(&start)?;

    let (stat, data) = state.prerecordings.download(event, start).await?;

    build_response(&stat, Body::from_stream(data))
}

/// HEAD /prerecordings/{event}/{start} - prerecording metadata headers only.
pub async fn head_download(
    State(state): State<Arc<AppState>>,
    Path((event, start)): Path<(Uuid, String)>,
) -> Result<Response, HttpAppError> {
    let start = parse_start(&start)?;

    let stat = state.prerecordings.head_download(event, start).await?;

    build_response(&stat, Body::empty())
}

/// PUT /prerecordings/{event}/{start} - upload a prerecording.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path((event, start)): Path<(Uuid, String)>,
    headers: HeaderMap,
    body: Body,
) -> Result<StatusCode, HttpAppError> {
    let start = parse_start(&start)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| HttpAppError(AppError::BadRequest("Missing Content-Type header".into())))?;

    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    // A client disconnect surfaces as an IO error from the reader and aborts
    // the storage write.
    let stream = body.into_data_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(stream);

    state
        .prerecordings
        .upload(event, start, &content_type, content_length, Box::pin(reader))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /prerecordings/{event}/{start} - delete a prerecording.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((event, start)): Path<(Uuid, String)>,
) -> Result<StatusCode, HttpAppError> {
    let start = parse_start(&start)?;

    state.prerecordings.delete(event, start).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_start(start: &str) -> Result<NaiveDateTime, HttpAppError> {
    start
        .parse()
        .map_err(|_| HttpAppError(AppError::BadRequest(format!("Invalid start time: {start}"))))
}

fn build_response(stat: &ObjectStat, body: Body) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, stat.content_type.as_str())
        .header(header::CONTENT_LENGTH, stat.size.to_string())
        .header(header::ETAG, stat.tag.as_str())
        .header(header::LAST_MODIFIED, http_date(stat.modified))
        .body(body)
        .map_err(|e| HttpAppError(AppError::Internal(e.to_string())))
}

/// RFC 7231 HTTP-date (always GMT).
fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_date_renders_rfc7231() {
        let time: DateTime<Utc> = "2024-06-01T10:30:00Z".parse().unwrap();
        assert_eq!(http_date(time), "Sat, 01 Jun 2024 10:30:00 GMT");
    }

    #[test]
    fn parse_start_accepts_iso_with_and_without_fraction() {
        assert!(parse_start("2024-06-01T10:00:00").is_ok());
        assert!(parse_start("2024-06-01T10:00:00.123456").is_ok());
        assert!(parse_start("today").is_err());
    }
}
