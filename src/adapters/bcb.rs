use super::{get_checked, SourceTarget};
use crate::core::normalize::parse_locale_percent;
use crate::domain::model::{IndicatorSeries, Observation};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

/// One row of the Banco Central SGS API (`/dados?formato=json`).
#[derive(Debug, Clone, Deserialize)]
pub struct BcbRecord {
    pub data: String,
    pub valor: String,
}

impl BcbRecord {
    fn to_observation(&self) -> Result<Observation> {
        let date = NaiveDate::parse_from_str(self.data.trim(), "%d/%m/%Y").map_err(|e| {
            EtlError::parse(format!("invalid SGS date '{}': {}", self.data, e))
        })?;
        let value = parse_locale_percent(&self.valor)?;
        Ok(Observation { date, value })
    }
}

/// IPCA, INPC and any other SGS series.
pub struct BcbAdapter {
    client: Client,
    target: SourceTarget,
}

impl BcbAdapter {
    pub fn new(client: Client, target: SourceTarget) -> Self {
        Self { client, target }
    }

    pub fn parse_records(&self, records: &[BcbRecord]) -> Result<IndicatorSeries> {
        let observations = records
            .iter()
            .map(|record| -> Result<Observation> {
                let mut obs = record.to_observation()?;
                obs.value = self.target.scale.from_percent(obs.value);
                Ok(obs)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IndicatorSeries::from_observations(
            &self.target.name,
            self.target.scale,
            observations,
            self.target.limit,
        ))
    }
}

#[async_trait]
impl SourceAdapter for BcbAdapter {
    fn name(&self) -> &str {
        &self.target.name
    }

    fn url(&self) -> &str {
        &self.target.url
    }

    async fn try_fetch(&self) -> Result<IndicatorSeries> {
        let body = get_checked(&self.client, &self.target.url).await?.text().await?;
        let records: Vec<BcbRecord> = serde_json::from_str(&body)
            .map_err(|e| EtlError::parse(format!("unexpected SGS payload: {}", e)))?;
        self.parse_records(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ValueScale;

    fn record(data: &str, valor: &str) -> BcbRecord {
        BcbRecord {
            data: data.to_string(),
            valor: valor.to_string(),
        }
    }

    fn adapter(limit: Option<usize>) -> BcbAdapter {
        BcbAdapter::new(
            Client::new(),
            SourceTarget::new("IPCA", "http://localhost/ipca").with_limit(limit),
        )
    }

    #[test]
    fn test_parse_records_sorted_and_limited() {
        let records = vec![
            record("01/02/2024", "0.83"),
            record("01/01/2024", "0.42"),
            record("01/03/2024", "0.16"),
        ];

        let series = adapter(Some(2)).parse_records(&records).unwrap();

        assert_eq!(series.name(), "IPCA");
        assert_eq!(series.len(), 2);
        assert_eq!(series.observations()[0].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(series.observations()[1].value, 0.16);
    }

    #[test]
    fn test_negative_and_comma_values() {
        let records = vec![record("01/06/2023", "-0.08"), record("01/07/2023", "0,12")];
        let series = adapter(None).parse_records(&records).unwrap();
        assert_eq!(series.observations()[0].value, -0.08);
        assert_eq!(series.observations()[1].value, 0.12);
    }

    #[test]
    fn test_fraction_scale() {
        let adapter = BcbAdapter::new(
            Client::new(),
            SourceTarget::new("IPCA", "http://localhost/ipca").with_scale(ValueScale::Fraction),
        );
        let series = adapter.parse_records(&[record("01/01/2024", "0.50")]).unwrap();
        assert!((series.observations()[0].value - 0.005).abs() < 1e-12);
        assert_eq!(series.scale(), ValueScale::Fraction);
    }

    #[test]
    fn test_bad_date_is_parse_error() {
        let result = adapter(None).parse_records(&[record("2024-01-01", "0.50")]);
        assert!(matches!(result, Err(EtlError::ParseError { .. })));
    }

    #[test]
    fn test_bad_value_is_malformed_number() {
        let result = adapter(None).parse_records(&[record("01/01/2024", "")]);
        assert!(matches!(result, Err(EtlError::MalformedNumberError { .. })));
    }
}
