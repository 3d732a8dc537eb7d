//! Dataset definition loaded from an embedded TOML config.

use serde::Deserialize;

use crate::SourceError;

/// TOML config of the dataset the dashboard browses, embedded at compile
/// time.
const SEATTLE_CHECKOUTS_TOML: &str = include_str!("../datasets/seattle_checkouts.toml");

/// Everything needed to query one Socrata checkouts dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"spl_checkouts_by_title"`).
    pub id: String,
    /// Human-readable name, used in log messages.
    pub name: String,
    /// SODA resource endpoint.
    pub api_url: String,
    /// Human-facing portal page for attribution.
    pub portal_url: Option<String>,
    /// Environment variable holding the `X-App-Token` credential.
    pub app_token_env: String,
    /// Maximum number of rows fetched for one period.
    pub max_rows: u32,
    /// Rows below this checkout count are not fetched for a period.
    pub min_checkouts: u32,
}

impl DatasetDefinition {
    /// The built-in Seattle Public Library dataset.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is malformed.
    pub fn seattle_checkouts() -> Result<Self, SourceError> {
        parse_dataset_toml(SEATTLE_CHECKOUTS_TOML)
    }

    /// Reads the app token from [`Self::app_token_env`]. Empty values count
    /// as missing.
    #[must_use]
    pub fn app_token_from_env(&self) -> Option<String> {
        std::env::var(&self.app_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty())
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}
