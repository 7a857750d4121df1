//! Shows service client
//!
//! Thin HTTP client over the shows service's `/events` and `/schedule`
//! endpoints. Requests are retried a bounded number of times with
//! exponential backoff; only transport failures and 5xx responses are
//! retried, 4xx responses are terminal.

use crate::error::ShowsError;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use openair_core::models::{Event, ScheduleList};
use std::time::Duration;
use uuid::Uuid;

const RETRY_MAX_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const RETRY_DELAY_MODIFIER: u32 = 2;

/// Client contract for the shows service.
#[async_trait]
pub trait ShowsClient: Send + Sync {
    /// Get an event by id. A 404 from the service maps to `Ok(None)`.
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, ShowsError>;

    /// List schedules of an event whose instances fall inside `[start, end)`,
    /// both naive UTC.
    async fn list_schedules(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        event: Uuid,
    ) -> Result<ScheduleList, ShowsError>;
}

/// reqwest-backed shows service client.
#[derive(Clone)]
pub struct HttpShowsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpShowsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send a request, retrying transport failures and 5xx responses.
    ///
    /// The last attempt's response is returned as-is; the caller decides how
    /// to treat its status.
    async fn send_with_retry(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ShowsError> {
        let mut delay = RETRY_BASE_DELAY;

        for attempt in 1..=RETRY_MAX_ATTEMPTS {
            let cloned = request.try_clone().ok_or_else(|| {
                ShowsError::Transport("Request body is not cloneable".to_string())
            })?;

            match cloned.send().await {
                Ok(response) => {
                    if !response.status().is_server_error() || attempt == RETRY_MAX_ATTEMPTS {
                        return Ok(response);
                    }
                    tracing::warn!(
                        status = response.status().as_u16(),
                        attempt,
                        "Shows service request failed, retrying"
                    );
                }
                Err(e) => {
                    if attempt == RETRY_MAX_ATTEMPTS {
                        return Err(ShowsError::Transport(e.to_string()));
                    }
                    tracing::warn!(
                        error = %e,
                        attempt,
                        "Shows service request failed, retrying"
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay *= RETRY_DELAY_MODIFIER;
        }

        // The loop always returns on its last attempt.
        Err(ShowsError::Transport("Retry loop exhausted".to_string()))
    }

    fn format_time(time: NaiveDateTime) -> String {
        time.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

#[async_trait]
impl ShowsClient for HttpShowsClient {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, ShowsError> {
        let url = format!("{}/events/{id}", self.base_url);

        let response = self.send_with_retry(self.client.get(&url)).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShowsError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let event = response
            .json::<Event>()
            .await
            .map_err(|e| ShowsError::Decode(e.to_string()))?;

        Ok(Some(event))
    }

    async fn list_schedules(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        event: Uuid,
    ) -> Result<ScheduleList, ShowsError> {
        let url = format!("{}/schedule", self.base_url);
        let filter = serde_json::json!({ "id": event }).to_string();

        let request = self.client.get(&url).query(&[
            ("start", Self::format_time(start)),
            ("end", Self::format_time(end)),
            ("where", filter),
        ]);

        let response = self.send_with_retry(request).await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ShowsError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ScheduleList>()
            .await
            .map_err(|e| ShowsError::Decode(e.to_string()))
    }
}
