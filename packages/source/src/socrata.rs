//! Socrata SODA API gateway.
//!
//! Builds `$where`/`$limit` queries against the dataset's resource endpoint
//! and decodes the JSON row array into [`CheckoutRecord`]s. Query values are
//! percent-encoded by `reqwest`. There is no retry and no explicit timeout:
//! a failed request is reported once and the caller decides how to degrade.

use async_trait::async_trait;
use library_checkouts_checkout_models::{CheckoutRecord, Period};

use crate::dataset::DatasetDefinition;
use crate::{CheckoutGateway, SourceError};

/// Header carrying the Socrata application token.
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Query parameters selecting the rows of one reporting period.
#[must_use]
pub fn period_query(dataset: &DatasetDefinition, period: Period) -> Vec<(&'static str, String)> {
    vec![
        ("$limit", dataset.max_rows.to_string()),
        (
            "$where",
            format!(
                "checkouts >= {} AND checkoutyear = {} AND checkoutmonth = {}",
                dataset.min_checkouts,
                period.year(),
                period.month()
            ),
        ),
    ]
}

/// Query parameters selecting every row with exactly `title`.
#[must_use]
pub fn title_query(title: &str) -> Vec<(&'static str, String)> {
    vec![("$where", format!("title = {}", soql_string(title)))]
}

/// Quotes `value` as a `SoQL` string literal, doubling embedded quotes.
fn soql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// [`CheckoutGateway`] backed by a Socrata dataset.
pub struct SocrataGateway {
    client: reqwest::Client,
    dataset: DatasetDefinition,
    app_token: Option<String>,
}

impl SocrataGateway {
    /// Creates a gateway for `dataset`, reading the app token from the
    /// environment variable the dataset names.
    #[must_use]
    pub fn new(dataset: DatasetDefinition) -> Self {
        let app_token = dataset.app_token_from_env();
        if app_token.is_none() {
            log::warn!(
                "{} is not set; querying {} without an app token",
                dataset.app_token_env,
                dataset.name
            );
        }
        Self::with_app_token(dataset, app_token)
    }

    /// Creates a gateway with an explicit app token.
    #[must_use]
    pub fn with_app_token(dataset: DatasetDefinition, app_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            dataset,
            app_token,
        }
    }

    /// The dataset this gateway queries.
    #[must_use]
    pub const fn dataset(&self) -> &DatasetDefinition {
        &self.dataset
    }

    fn request(&self, params: &[(&'static str, String)]) -> reqwest::RequestBuilder {
        let request = self.client.get(&self.dataset.api_url).query(params);
        match &self.app_token {
            Some(token) => request.header(APP_TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn fetch(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Vec<CheckoutRecord>, SourceError> {
        let response = self.request(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let text = response.text().await?;
        let records: Vec<CheckoutRecord> = serde_json::from_str(&text)?;
        Ok(records)
    }
}

#[async_trait]
impl CheckoutGateway for SocrataGateway {
    async fn fetch_by_period(&self, period: Period) -> Result<Vec<CheckoutRecord>, SourceError> {
        log::info!("Fetching {} rows for {period}", self.dataset.name);
        let records = self.fetch(&period_query(&self.dataset, period)).await?;
        log::info!("Fetched {} rows for {period}", records.len());
        Ok(records)
    }

    async fn fetch_by_title(&self, title: &str) -> Result<Vec<CheckoutRecord>, SourceError> {
        log::debug!("Fetching {} rows for title {title:?}", self.dataset.name);
        let records = self.fetch(&title_query(title)).await?;
        log::debug!("Fetched {} rows for title {title:?}", records.len());
        Ok(records)
    }
}
