use crate::adapters::apps_script::{AppsScriptTransport, DEFAULT_SCRIPT_TIMEOUT};
use crate::adapters::backend_api::BackendApiTransport;
use crate::core::booking::DEFAULT_LOCATION;
use crate::core::reviews::ReviewSettings;
use crate::domain::model::BusinessHours;
use crate::domain::ports::{BookingTransport, ConfigProvider};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub booking: BookingSection,
    pub hours: BusinessHours,
    pub reviews: ReviewSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub location: String,
    pub storage_path: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Johan Style".to_string(),
            location: DEFAULT_LOCATION.to_string(),
            storage_path: "./.johanstyle".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Backend,
    Script,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Backend => f.write_str("backend"),
            TransportKind::Script => f.write_str("script"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "backend" => Ok(TransportKind::Backend),
            "script" => Ok(TransportKind::Script),
            other => Err(SiteError::InvalidConfigValueError {
                field: "booking.transport".to_string(),
                value: other.to_string(),
                reason: "Valid transports: backend, script".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingSection {
    pub transport: TransportKind,
    pub backend_url: Option<String>,
    pub script_url: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for BookingSection {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            backend_url: None,
            script_url: None,
            timeout_seconds: DEFAULT_SCRIPT_TIMEOUT.as_secs(),
        }
    }
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| SiteError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        static VAR: OnceLock<Regex> = OnceLock::new();
        let re = VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty("site.location", &self.site.location)?;
        validation::validate_path("site.storage_path", &self.site.storage_path)?;

        validation::validate_range("booking.timeout_seconds", self.booking.timeout_seconds, 1, 300)?;
        if let Some(url) = &self.booking.backend_url {
            validation::validate_url("booking.backend_url", url)?;
        }
        if self.booking.transport == TransportKind::Script {
            let url = validation::validate_required_field("booking.script_url", &self.booking.script_url)?;
            validation::validate_url("booking.script_url", url)?;
        }

        validation::validate_range("hours.open_hour", self.hours.open_hour, 0, 23)?;
        validation::validate_range("hours.close_hour", self.hours.close_hour, 1, 23)?;
        if self.hours.open_hour >= self.hours.close_hour {
            return Err(SiteError::InvalidConfigValueError {
                field: "hours.close_hour".to_string(),
                value: self.hours.close_hour.to_string(),
                reason: "Closing hour must be after opening hour".to_string(),
            });
        }
        validation::validate_range("hours.interval_minutes", self.hours.interval_minutes, 1, 60)?;
        validation::validate_range("hours.utc_offset_hours", self.hours.utc_offset_hours, -12, 14)?;

        validation::validate_range("reviews.max_stored", self.reviews.max_stored, 1, 1000)?;
        validation::validate_range("reviews.page_size", self.reviews.page_size, 1, 100)?;

        Ok(())
    }

    /// Backend base URL after the `BACKEND_URL` override and the production fallback.
    pub fn backend_url(&self) -> String {
        BackendApiTransport::resolve_base_url(self.booking.backend_url.as_deref())
    }

    pub fn build_transport(&self) -> Result<Box<dyn BookingTransport>> {
        self.build_transport_of(self.booking.transport)
    }

    pub fn build_transport_of(&self, kind: TransportKind) -> Result<Box<dyn BookingTransport>> {
        let timeout = self.request_timeout();
        tracing::debug!("Using {} booking transport", kind);

        match kind {
            TransportKind::Backend => Ok(Box::new(BackendApiTransport::new(self.backend_url(), timeout)?)),
            TransportKind::Script => {
                let url = validation::validate_required_field("booking.script_url", &self.booking.script_url)?;
                Ok(Box::new(AppsScriptTransport::new(url.clone(), self.hours, timeout)?))
            }
        }
    }
}

impl ConfigProvider for SiteConfig {
    fn location(&self) -> &str {
        &self.site.location
    }

    fn business_hours(&self) -> BusinessHours {
        self.hours
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.booking.timeout_seconds)
    }

    fn storage_path(&self) -> &str {
        &self.site.storage_path
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
