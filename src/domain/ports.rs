use crate::domain::model::IndicatorSeries;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Where `path` ends up, for reporting.
    fn locate(&self, path: &str) -> String;
}

/// One upstream indicator source.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;

    fn url(&self) -> &str;

    /// A single fetch-and-normalize attempt. Callers wanting the
    /// never-fail contract go through `adapters::fetch_or_empty`.
    async fn try_fetch(&self) -> Result<IndicatorSeries>;
}
