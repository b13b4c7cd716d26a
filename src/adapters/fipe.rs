use super::html::HtmlTable;
use super::{fetch_table, SourceTarget};
use crate::core::normalize::{parse_locale_percent, parse_month_year};
use crate::domain::model::{IndicatorSeries, Observation};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// IPC-FIPE: first column `"<month>/<year>"`, second column the rate.
pub struct FipeAdapter {
    client: Client,
    target: SourceTarget,
}

impl FipeAdapter {
    pub fn new(client: Client, target: SourceTarget) -> Self {
        Self { client, target }
    }

    pub fn parse_table(&self, table: &HtmlTable) -> Result<IndicatorSeries> {
        let observations = table
            .rows
            .iter()
            .filter(|row| row.len() >= 2)
            .map(|row| -> Result<Observation> {
                let date = parse_month_year(&row[0])?;
                let value = self.target.scale.from_percent(parse_locale_percent(&row[1])?);
                Ok(Observation { date, value })
            })
            .collect::<Result<Vec<_>>>()?;

        if observations.is_empty() {
            return Err(EtlError::parse("IPC-FIPE table has no rows"));
        }

        Ok(IndicatorSeries::from_observations(
            &self.target.name,
            self.target.scale,
            observations,
            self.target.limit,
        ))
    }
}

#[async_trait]
impl SourceAdapter for FipeAdapter {
    fn name(&self) -> &str {
        &self.target.name
    }

    fn url(&self) -> &str {
        &self.target.url
    }

    async fn try_fetch(&self) -> Result<IndicatorSeries> {
        let table = fetch_table(&self.client, &self.target.url).await?;
        self.parse_table(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::html::parse_first_table;
    use chrono::NaiveDate;

    fn adapter() -> FipeAdapter {
        FipeAdapter::new(Client::new(), SourceTarget::new("IPC_FIPE", "http://localhost/fipe"))
    }

    #[test]
    fn test_parse_descending_table() {
        let html = r#"
            <table>
              <tr><th>Mês/Ano</th><th>Taxa</th></tr>
              <tr><td>março/2024</td><td>0,26</td></tr>
              <tr><td>fevereiro/2024</td><td>0,46</td></tr>
              <tr><td>janeiro/2024</td><td>0,46</td></tr>
              <tr><td>dezembro/2023</td><td>0,38</td></tr>
            </table>
        "#;

        let series = adapter().parse_table(&parse_first_table(html).unwrap()).unwrap();

        assert_eq!(series.len(), 4);
        assert_eq!(series.observations()[0].date, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(series.latest().unwrap().value, 0.26);
    }

    #[test]
    fn test_mangled_month_rejected() {
        let table = HtmlTable {
            headers: vec![],
            rows: vec![vec!["mar√ßo/2024".to_string(), "0,26".to_string()]],
        };
        assert!(matches!(
            adapter().parse_table(&table),
            Err(EtlError::UnknownMonthError { .. })
        ));
    }
}
