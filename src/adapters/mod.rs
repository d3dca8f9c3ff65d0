// Adapters layer: concrete implementations for external systems (storage, booking backends).

pub mod apps_script;
pub mod backend_api;
pub mod storage;

use crate::utils::error::SiteError;
use std::time::Duration;

pub use apps_script::AppsScriptTransport;
pub use backend_api::BackendApiTransport;
pub use storage::{FileStorage, MemoryStorage};

pub(crate) fn map_request_error(error: reqwest::Error, timeout: Duration) -> SiteError {
    if error.is_timeout() {
        tracing::error!("Request timed out after {:?}", timeout);
        SiteError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        tracing::error!("Request failed: {}", error);
        SiteError::HttpError(error)
    }
}
