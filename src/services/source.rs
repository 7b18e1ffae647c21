use thiserror::Error;

use crate::config::{Settings, SourceKind};
use crate::models::Provider;
use super::{DocumentStoreSource, PostgresSource, StaticFileSource};

/// Errors that can occur while loading providers from a source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Where provider records come from
///
/// Every variant yields canonical providers; which upstream system produced
/// them is invisible to the matcher.
pub enum ProviderSource {
    Static(StaticFileSource),
    Postgres(PostgresSource),
    Document(DocumentStoreSource),
}

impl ProviderSource {
    /// Build the source named by the configuration
    pub async fn from_settings(settings: &Settings) -> Result<Self, SourceError> {
        match settings.source.kind {
            SourceKind::Static => Ok(ProviderSource::Static(StaticFileSource::new(
                settings.source.path.clone(),
                settings.source.format,
            ))),
            SourceKind::Postgres => {
                let db = settings.database.as_ref().ok_or_else(|| {
                    SourceError::Unsupported("postgres source needs a [database] section".to_string())
                })?;
                let source = PostgresSource::new(
                    &db.url,
                    db.max_connections.unwrap_or(10),
                    db.min_connections.unwrap_or(1),
                    db.run_migrations,
                )
                .await?;
                Ok(ProviderSource::Postgres(source))
            }
            SourceKind::Document => {
                let doc = settings.document.as_ref().ok_or_else(|| {
                    SourceError::Unsupported("document source needs a [document] section".to_string())
                })?;
                let source = DocumentStoreSource::new(
                    doc.endpoint.clone(),
                    doc.api_key.clone(),
                    doc.project_id.clone(),
                    doc.database_id.clone(),
                    doc.collection.clone(),
                    doc.page_size,
                )?;
                Ok(ProviderSource::Document(source))
            }
        }
    }

    pub async fn load(&self) -> Result<Vec<Provider>, SourceError> {
        match self {
            ProviderSource::Static(source) => source.load().await,
            ProviderSource::Postgres(source) => source.load().await,
            ProviderSource::Document(source) => source.load().await,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderSource::Static(_) => "static",
            ProviderSource::Postgres(_) => "postgres",
            ProviderSource::Document(_) => "document",
        }
    }
}
