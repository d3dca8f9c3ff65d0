use crate::adapters::map_request_error;
use crate::core::slots::generate_slots;
use crate::domain::model::{BookingRequest, BusinessHours, Service, TimeSlot};
use crate::domain::ports::BookingTransport;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct ScriptResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    message: Option<String>,
}

/// Public calendar script: no availability lookup, so slots come from the
/// shop's standard hours and the calendar owner confirms by hand.
#[derive(Debug, Clone)]
pub struct AppsScriptTransport {
    client: Client,
    script_url: String,
    hours: BusinessHours,
    timeout: Duration,
    clock: fn() -> DateTime<Utc>,
}

impl AppsScriptTransport {
    pub fn new(script_url: impl Into<String>, hours: BusinessHours, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            script_url: script_url.into(),
            hours,
            timeout,
            clock: Utc::now,
        })
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl BookingTransport for AppsScriptTransport {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn fetch_slots(&self, date: NaiveDate, service: &Service) -> Result<Vec<TimeSlot>> {
        Ok(generate_slots(date, service.duration, &(self.clock)(), &self.hours))
    }

    async fn submit_booking(&self, request: &BookingRequest) -> Result<Option<String>> {
        tracing::debug!("Posting booking to calendar script {}", self.script_url);

        let response = self
            .client
            .post(&self.script_url)
            .json(request)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| map_request_error(e, self.timeout))?;
        tracing::debug!("Calendar script answered {} ({} bytes)", status, text.len());

        if !status.is_success() {
            return Err(SiteError::BackendError {
                status: status.as_u16(),
                message: if text.trim().is_empty() {
                    "Error desconocido".to_string()
                } else {
                    text
                },
            });
        }

        // The script sometimes answers with plain text; a 2xx then means the
        // event was created.
        let body = match serde_json::from_str::<ScriptResponse>(&text) {
            Ok(body) => body,
            Err(_) => {
                tracing::debug!("Non-JSON script response treated as success");
                return Ok(None);
            }
        };

        if body.success {
            Ok(body.message)
        } else {
            Err(SiteError::BackendError {
                status: status.as_u16(),
                message: body
                    .error
                    .or(body.message)
                    .unwrap_or_else(|| "Error desconocido".to_string()),
            })
        }
    }
}
