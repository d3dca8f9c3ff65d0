use crate::adapters::map_request_error;
use crate::domain::model::{BookingRequest, Service, TimeSlot};
use crate::domain::ports::BookingTransport;
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const PRODUCTION_BACKEND_URL: &str = "https://johanstyle-backend.onrender.com";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

#[derive(Debug, Deserialize)]
struct AuthStatus {
    #[serde(default)]
    authenticated: bool,
}

#[derive(Debug, Deserialize)]
struct AuthUrl {
    #[serde(rename = "authUrl")]
    auth_url: String,
}

#[derive(Debug, Serialize)]
struct AvailabilityQuery {
    date: String,
    duration: u32,
}

#[derive(Debug, Deserialize)]
struct RemoteSlot {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    display: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityResponse {
    #[serde(default)]
    available_slots: Vec<RemoteSlot>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    #[serde(default)]
    needs_reauth: bool,
}

#[derive(Debug, Deserialize)]
struct BookingResponse {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    message: Option<String>,
}

/// Authenticated scheduling backend (Google Calendar behind a small REST API).
#[derive(Debug, Clone)]
pub struct BackendApiTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BackendApiTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Explicit configuration wins, then the `BACKEND_URL` environment
    /// override, then the production deployment.
    pub fn resolve_base_url(configured: Option<&str>) -> String {
        configured
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(BACKEND_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .unwrap_or_else(|| PRODUCTION_BACKEND_URL.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Any failure counts as "not authenticated".
    pub async fn check_auth(&self) -> bool {
        let url = self.url("/auth/status");
        tracing::debug!("Checking backend authorization at {}", url);

        let response = match self
            .client
            .get(&url)
            .query(&[("t", Utc::now().timestamp_millis())])
            .header("Cache-Control", "no-cache")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Authorization check failed: {}", e);
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::error!("Authorization check returned {}", response.status());
            return false;
        }

        match response.json::<AuthStatus>().await {
            Ok(status) => {
                if !status.authenticated {
                    tracing::warn!("Backend is not authorized; the calendar owner must grant access");
                }
                status.authenticated
            }
            Err(e) => {
                tracing::error!("Malformed authorization status: {}", e);
                false
            }
        }
    }

    pub async fn authorization_url(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url("/auth"))
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout))?;
        let body: AuthUrl = response.json().await?;
        Ok(body.auth_url)
    }

    async fn require_auth(&self) -> Result<()> {
        if self.check_auth().await {
            return Ok(());
        }
        let auth_url = match self.authorization_url().await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!("Could not fetch authorization URL: {}", e);
                None
            }
        };
        Err(SiteError::AuthorizationRequired { auth_url })
    }

    async fn error_from(response: Response, fallback: &str) -> SiteError {
        let status = response.status().as_u16();
        let body: ErrorBody = response.json().await.unwrap_or_default();
        if body.needs_reauth {
            return SiteError::NeedsReauth;
        }
        SiteError::BackendError {
            status,
            message: body
                .error
                .or(body.message)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

#[async_trait]
impl BookingTransport for BackendApiTransport {
    fn name(&self) -> &'static str {
        "backend"
    }

    async fn fetch_slots(&self, date: NaiveDate, service: &Service) -> Result<Vec<TimeSlot>> {
        self.require_auth().await?;

        let query = AvailabilityQuery {
            date: date.format("%Y-%m-%d").to_string(),
            duration: service.duration,
        };
        tracing::debug!(
            "Requesting availability for {} ({} min)",
            query.date,
            query.duration
        );

        let response = self
            .client
            .post(self.url("/api/availability"))
            .json(&query)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Error al obtener disponibilidad").await);
        }

        let body: AvailabilityResponse = response.json().await?;
        Ok(body
            .available_slots
            .into_iter()
            .map(|slot| TimeSlot {
                time: slot.display.clone(),
                display: slot.display,
                start: slot.start,
                end: slot.end,
            })
            .collect())
    }

    async fn submit_booking(&self, request: &BookingRequest) -> Result<Option<String>> {
        self.require_auth().await?;

        tracing::debug!(
            "Posting booking for {} on {} at {}",
            request.service_name,
            request.date,
            request.time
        );

        let response = self
            .client
            .post(self.url("/api/bookings"))
            .json(request)
            .send()
            .await
            .map_err(|e| map_request_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from(response, "Error al crear la reserva").await);
        }

        let body: BookingResponse = response.json().await?;
        if body.success {
            Ok(body.message)
        } else {
            Err(SiteError::BackendError {
                status: status.as_u16(),
                message: body
                    .error
                    .unwrap_or_else(|| "Error desconocido".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_url_prefers_configuration() {
        assert_eq!(
            BackendApiTransport::resolve_base_url(Some("http://localhost:3000")),
            "http://localhost:3000"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let transport =
            BackendApiTransport::new("http://localhost:3000/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000");
        assert_eq!(transport.url("/auth"), "http://localhost:3000/auth");
    }
}
