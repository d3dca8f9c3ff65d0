pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{SiteConfig, TransportKind};

pub use adapters::{AppsScriptTransport, BackendApiTransport, FileStorage, MemoryStorage};
pub use crate::core::{
    booking::{BookingModal, SlotListing},
    catalog::ServiceCatalog,
    i18n::Translator,
    reviews::ReviewBoard,
};
pub use utils::error::{Result, SiteError};
