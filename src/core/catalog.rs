use crate::domain::model::{Category, Service};
use crate::utils::error::{Result, SiteError};
use serde::Deserialize;

const EMBEDDED_SERVICES: &str = include_str!("../../data/services.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    services: Vec<Service>,
}

/// Immutable service table, looked up by id.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// The catalog shipped with the site.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_SERVICES)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;

        for (i, service) in file.services.iter().enumerate() {
            if file.services[..i].iter().any(|s| s.id == service.id) {
                return Err(SiteError::ConfigError {
                    message: format!("duplicate service id '{}'", service.id),
                });
            }
            if service.duration == 0 {
                return Err(SiteError::InvalidConfigValueError {
                    field: format!("services.{}.duration", service.id),
                    value: "0".to_string(),
                    reason: "Duration must be at least one minute".to_string(),
                });
            }
        }

        Ok(Self {
            services: file.services,
        })
    }

    pub fn get(&self, id: &str) -> Result<&Service> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| SiteError::ServiceNotFound { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Service> {
        self.services.iter().filter(move |s| s.category == category)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
