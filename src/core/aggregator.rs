use crate::adapters::{build_adapter, build_client, fetch_or_empty};
use crate::config::AppConfig;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{IndicatorMap, IndicatorSeries};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::Result;
use std::sync::Arc;

/// Fetches every indicator, one task each. A failing source only ever
/// leaves its own entry empty.
pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    policy: RetryPolicy,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, policy: RetryPolicy) -> Self {
        Self { adapters, policy }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(config)?;
        let adapters = config
            .enabled_indicators()
            .map(|indicator| build_adapter(indicator, client.clone(), config))
            .collect();
        Ok(Self::new(adapters, config.retry_policy()))
    }

    pub fn indicator_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub async fn fetch_all(&self) -> IndicatorMap {
        let handles: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| {
                let name = adapter.name().to_string();
                let adapter = Arc::clone(adapter);
                let policy = self.policy;
                let handle =
                    tokio::spawn(async move { fetch_or_empty(adapter.as_ref(), policy).await });
                (name, handle)
            })
            .collect();

        let mut results = IndicatorMap::new();
        for (name, handle) in handles {
            let series = match handle.await {
                Ok(series) => series,
                Err(e) => {
                    tracing::error!("Fetch task for {} did not finish: {}", name, e);
                    IndicatorSeries::empty(&name)
                }
            };
            results.insert(name, series);
        }

        let empty = results.values().filter(|s| s.is_empty()).count();
        tracing::info!("Fetched {} indicators ({} empty)", results.len(), empty);
        results
    }
}
