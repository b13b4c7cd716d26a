use crate::config::AppConfig;
use crate::config::cli::LocalStorage;
use crate::core::aggregator::Aggregator;
use crate::domain::model::{IndicatorMap, RunReport};
use crate::domain::ports::Storage;
use crate::load::{save_all_tables, save_indicator_data};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Fetch every indicator, then write the CSV files and, optionally, the
/// rendered tables.
pub struct EtlEngine<S: Storage> {
    aggregator: Aggregator,
    csv_storage: S,
    table_storage: Option<S>,
}

impl EtlEngine<LocalStorage> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let table_storage = config
            .run
            .render_tables
            .then(|| LocalStorage::new(config.run.tables_path.clone()));

        Ok(Self::new(
            Aggregator::from_config(config)?,
            LocalStorage::new(config.run.output_path.clone()),
            table_storage,
        ))
    }
}

impl<S: Storage> EtlEngine<S> {
    pub fn new(aggregator: Aggregator, csv_storage: S, table_storage: Option<S>) -> Self {
        Self {
            aggregator,
            csv_storage,
            table_storage,
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        self.run_on(chrono::Local::now().date_naive()).await
    }

    /// Same as `run`, with the date stamped into CSV file names fixed.
    pub async fn run_on(&self, run_date: NaiveDate) -> Result<RunReport> {
        tracing::info!(
            "Fetching {} indicators: {}",
            self.aggregator.indicator_names().len(),
            self.aggregator.indicator_names().join(", ")
        );
        let data = self.aggregator.fetch_all().await;

        self.persist(&data, run_date).await
    }

    pub async fn persist(&self, data: &IndicatorMap, run_date: NaiveDate) -> Result<RunReport> {
        let csv_files = save_indicator_data(&self.csv_storage, data, run_date).await?;
        tracing::info!("All indicator data fetched and saved");

        let table_files = match &self.table_storage {
            Some(storage) => {
                let files = save_all_tables(storage, data).await?;
                tracing::info!("All indicator tables rendered");
                files
            }
            None => {
                tracing::debug!("Table rendering disabled");
                Vec::new()
            }
        };

        let empty_indicators = data
            .iter()
            .filter(|(_, series)| series.is_empty())
            .map(|(name, _)| name.clone())
            .collect();

        Ok(RunReport {
            csv_files,
            table_files,
            empty_indicators,
        })
    }
}
