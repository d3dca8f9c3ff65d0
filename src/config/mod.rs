#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, LangCommand, ReviewCommand};
pub use toml_config::{SiteConfig, TransportKind};
