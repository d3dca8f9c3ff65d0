use crate::config::toml_config::{SiteConfig, TransportKind};
use crate::domain::model::{Category, Locale};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "johanstyle")]
#[command(about = "Booking, reviews and language tools for the Johan Style site")]
pub struct CliConfig {
    /// Site configuration file (TOML)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for reviews and language preference, overrides the config file
    #[arg(long, global = true)]
    pub storage_path: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the service catalog
    Services {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show the bookable times of a service on a date
    Slots {
        service: String,
        /// Date as YYYY-MM-DD
        date: NaiveDate,
        #[arg(long)]
        transport: Option<TransportKind>,
    },
    /// Book an appointment
    Book {
        service: String,
        date: NaiveDate,
        /// Slot time as listed by `slots`
        time: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        transport: Option<TransportKind>,
    },
    /// Customer reviews
    Review {
        #[command(subcommand)]
        action: ReviewCommand,
    },
    /// Site language preference
    Lang {
        #[command(subcommand)]
        action: LangCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReviewCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: String,
    },
    List {
        /// How many "load more" pages of stored reviews to reveal
        #[arg(long, default_value = "1")]
        pages: usize,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum LangCommand {
    Get,
    Set { locale: Locale },
    Toggle,
}

impl CliConfig {
    /// The site configuration: the `--config` file or the defaults, with
    /// command-line overrides applied.
    pub fn site_config(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading site config from {}", path.display());
                SiteConfig::from_file(path)?
            }
            None => SiteConfig::default(),
        };

        if let Some(storage_path) = &self.storage_path {
            config.site.storage_path = storage_path.clone();
        }
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.site_config()?.validate()
    }
}
