use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::{ScoringWeights, SignalSettings};
use crate::services::FileFormat;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub document: Option<DocumentSettings>,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Which upstream system provider records are loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Static,
    Postgres,
    Document,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    pub kind: SourceKind,
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub format: FileFormat,
    /// Seconds between snapshot reloads; 0 disables refreshing
    #[serde(default)]
    pub refresh_secs: u64,
}

fn default_catalog_path() -> PathBuf { PathBuf::from("sample_data/nurses.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    #[serde(default)]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_collection() -> String { "nurses".to_string() }
fn default_page_size() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_distance_decay_km")]
    pub distance_decay_km: f64,
    #[serde(default = "default_slot_mismatch_credit")]
    pub slot_mismatch_credit: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            distance_decay_km: default_distance_decay_km(),
            slot_mismatch_credit: default_slot_mismatch_credit(),
        }
    }
}

impl ScoringSettings {
    pub fn signal_settings(&self) -> SignalSettings {
        SignalSettings {
            distance_decay_km: self.distance_decay_km,
            slot_mismatch_credit: self.slot_mismatch_credit,
        }
    }
}

fn default_distance_decay_km() -> f64 { 25.0 }
fn default_slot_mismatch_credit() -> f64 { 0.25 }

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_geography_weight")]
    pub geography: f64,
    #[serde(default = "default_services_weight")]
    pub services: f64,
    #[serde(default = "default_expertise_weight")]
    pub expertise: f64,
    #[serde(default = "default_availability_weight")]
    pub availability: f64,
    #[serde(default = "default_reputation_weight")]
    pub reputation: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            geography: default_geography_weight(),
            services: default_services_weight(),
            expertise: default_expertise_weight(),
            availability: default_availability_weight(),
            reputation: default_reputation_weight(),
        }
    }
}

impl From<WeightsConfig> for ScoringWeights {
    fn from(w: WeightsConfig) -> Self {
        ScoringWeights {
            geography: w.geography,
            services: w.services,
            expertise: w.expertise,
            availability: w.availability,
            reputation: w.reputation,
        }
    }
}

fn default_geography_weight() -> f64 { 0.30 }
fn default_services_weight() -> f64 { 0.30 }
fn default_expertise_weight() -> f64 { 0.15 }
fn default_availability_weight() -> f64 { 0.15 }
fn default_reputation_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with WONDERCARE_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., WONDERCARE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("WONDERCARE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known unprefixed variables on top of the layered config
///
/// `DATABASE_URL` wins over `database.url`; `LOG_LEVEL` and `LOG_FORMAT`
/// win over the `logging` section.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
