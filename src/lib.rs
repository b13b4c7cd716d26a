pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod load;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
pub use crate::config::{cli::LocalStorage, AppConfig};

pub use crate::core::{aggregator::Aggregator, etl::EtlEngine, retry::RetryPolicy};
pub use crate::domain::model::{IndicatorMap, IndicatorSeries, Observation, RunReport, ValueScale};
pub use crate::utils::error::{EtlError, Result};
