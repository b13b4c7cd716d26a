// Adapters layer: one module per upstream format, plus the shared HTTP and
// HTML helpers they use.

pub mod bcb;
pub mod bi;
pub mod fgv;
pub mod fipe;
pub mod html;

use crate::config::{AppConfig, IndicatorConfig, SourceKind};
use crate::core::retry::{with_retry, RetryPolicy};
use crate::domain::model::{IndicatorSeries, ValueScale};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, Response};
use std::sync::Arc;

pub use bcb::BcbAdapter;
pub use bi::BiAdapter;
pub use fgv::FgvAdapter;
pub use fipe::FipeAdapter;

/// What every adapter needs to know about the indicator it produces.
#[derive(Debug, Clone)]
pub struct SourceTarget {
    pub name: String,
    pub url: String,
    pub scale: ValueScale,
    pub limit: Option<usize>,
}

impl SourceTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            scale: ValueScale::Percent,
            limit: Some(12),
        }
    }

    pub fn with_scale(mut self, scale: ValueScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    fn from_config(indicator: &IndicatorConfig, limit: Option<usize>) -> Self {
        Self::new(&indicator.name, &indicator.url)
            .with_scale(indicator.scale)
            .with_limit(limit)
    }
}

pub fn build_client(config: &AppConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.request_timeout())
        .user_agent(config.http.user_agent.clone())
        .build()?;
    Ok(client)
}

pub fn build_adapter(
    indicator: &IndicatorConfig,
    client: Client,
    config: &AppConfig,
) -> Arc<dyn SourceAdapter> {
    let target = SourceTarget::from_config(indicator, config.entry_limit());
    match indicator.source {
        SourceKind::Bcb => Arc::new(BcbAdapter::new(client, target)),
        SourceKind::Bi => Arc::new(BiAdapter::new(client, target, config.reference_year())),
        SourceKind::Fgv => Arc::new(FgvAdapter::new(client, target, config.reference_year())),
        SourceKind::Fipe => Arc::new(FipeAdapter::new(client, target)),
    }
}

/// GET `url`, turning non-2xx answers into `HttpStatusError`.
pub(crate) async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!("Requesting {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    tracing::debug!("Response status from {}: {}", url, status);

    if !status.is_success() {
        return Err(EtlError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

pub(crate) async fn fetch_table(client: &Client, url: &str) -> Result<html::HtmlTable> {
    let body = get_checked(client, url).await?.text().await?;
    html::parse_first_table(&body)
}

/// Runs one adapter under `policy` and degrades to an empty series once
/// every attempt has failed. Nothing escapes this boundary.
pub async fn fetch_or_empty(adapter: &dyn SourceAdapter, policy: RetryPolicy) -> IndicatorSeries {
    match with_retry(policy, || adapter.try_fetch()).await {
        Ok(series) => {
            tracing::info!("{}: {} rows", adapter.name(), series.len());
            series
        }
        Err(e) => {
            tracing::error!(
                "Error fetching data for {} from {}: {} (Category: {:?})",
                adapter.name(),
                adapter.url(),
                e,
                e.category()
            );
            IndicatorSeries::empty(adapter.name())
        }
    }
}
