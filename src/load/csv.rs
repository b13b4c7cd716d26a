use crate::domain::model::{IndicatorMap, IndicatorSeries};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

pub const DATE_COLUMN: &str = "data";

/// `<indicator>_<YYYYMMDD>.csv`, indicator lowercased.
pub fn csv_file_name(indicator: &str, run_date: NaiveDate) -> String {
    format!(
        "{}_{}.csv",
        indicator.to_lowercase(),
        run_date.format("%Y%m%d")
    )
}

/// Two columns: `data` (ISO date) and one named after the indicator.
/// An empty series gives a header-only file.
pub fn series_to_csv(series: &IndicatorSeries) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record([DATE_COLUMN, series.value_column()])?;

    for obs in series.observations() {
        writer.write_record([obs.date.format("%Y-%m-%d").to_string(), obs.value.to_string()])?;
    }

    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// Writes one CSV per indicator and returns where each landed.
pub async fn save_indicator_data<S: Storage>(
    storage: &S,
    data: &IndicatorMap,
    run_date: NaiveDate,
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(data.len());

    for (indicator, series) in data {
        let file_name = csv_file_name(indicator, run_date);
        let bytes = series_to_csv(series)?;
        storage.write_file(&file_name, &bytes).await?;

        let location = storage.locate(&file_name);
        tracing::info!("Data saved to {}", location);
        written.push(location);
    }

    Ok(written)
}
