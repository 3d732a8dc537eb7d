#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Remote data gateway for the library checkouts open dataset.
//!
//! The dashboard only ever reads two slices of the dataset: every row of a
//! reporting month, and every row of a single title. The [`CheckoutGateway`]
//! trait captures exactly those two queries so that callers can swap in a
//! fake in tests. [`socrata::SocrataGateway`] is the production
//! implementation.

pub mod dataset;
pub mod socrata;

use async_trait::async_trait;
use library_checkouts_checkout_models::{CheckoutRecord, Period};

/// Errors that can occur while talking to the open-data API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status (e.g. a rejected app
    /// token).
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset definition is malformed.
    #[error("Invalid dataset definition: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read access to the checkouts dataset.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// Fetches the rows of `period` that meet the dataset's minimum
    /// checkout threshold, capped at its row limit.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the response cannot
    /// be parsed.
    async fn fetch_by_period(&self, period: Period) -> Result<Vec<CheckoutRecord>, SourceError>;

    /// Fetches every row whose title equals `title` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the response cannot
    /// be parsed.
    async fn fetch_by_title(&self, title: &str) -> Result<Vec<CheckoutRecord>, SourceError>;
}
