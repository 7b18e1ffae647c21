use serde::Deserialize;
use std::path::PathBuf;

use crate::core::normalize_row;
use crate::models::{Provider, RawProviderRow};
use super::SourceError;

/// Shape of the records in a static catalog file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Already-canonical providers
    #[default]
    Canonical,
    /// Raw ingestion rows, normalized on load
    Raw,
}

/// Provider catalog stored as a JSON array on disk
pub struct StaticFileSource {
    path: PathBuf,
    format: FileFormat,
}

impl StaticFileSource {
    pub fn new(path: impl Into<PathBuf>, format: FileFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub async fn load(&self) -> Result<Vec<Provider>, SourceError> {
        let json = tokio::fs::read_to_string(&self.path).await?;
        let providers = parse_catalog(&json, self.format)?;

        tracing::debug!(
            "Loaded {} providers from {} ({:?})",
            providers.len(),
            self.path.display(),
            self.format
        );

        Ok(providers)
    }
}

/// Parse a catalog document in the given format
pub fn parse_catalog(json: &str, format: FileFormat) -> Result<Vec<Provider>, SourceError> {
    match format {
        FileFormat::Canonical => Ok(serde_json::from_str(json)?),
        FileFormat::Raw => {
            let rows: Vec<RawProviderRow> = serde_json::from_str(json)?;
            Ok(rows.into_iter().map(normalize_row).collect())
        }
    }
}
