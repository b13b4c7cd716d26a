pub mod aggregator;
pub mod etl;
pub mod normalize;
pub mod retry;

pub use crate::domain::model::{IndicatorMap, IndicatorSeries, Observation};
pub use crate::domain::ports::{SourceAdapter, Storage};
pub use crate::utils::error::Result;
