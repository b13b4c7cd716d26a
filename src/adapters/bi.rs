use super::html::HtmlTable;
use super::{fetch_table, SourceTarget};
use crate::core::normalize::{parse_locale_percent, parse_month_year};
use crate::domain::model::{IndicatorSeries, Observation};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Monthly rate tables (TR, Poupança) whose first column holds a bare
/// month name and second column the rate. The year is not on the page,
/// so it comes from configuration.
pub struct BiAdapter {
    client: Client,
    target: SourceTarget,
    year: i32,
}

impl BiAdapter {
    pub fn new(client: Client, target: SourceTarget, year: i32) -> Self {
        Self {
            client,
            target,
            year,
        }
    }

    pub fn parse_table(&self, table: &HtmlTable) -> Result<IndicatorSeries> {
        let mut observations = Vec::new();
        for row in table.rows.iter().filter(|row| row.len() >= 2) {
            let label = format!("{}/{}", row[0], self.year);
            let date = parse_month_year(&label)?;
            let value = self.target.scale.from_percent(parse_locale_percent(&row[1])?);
            observations.push(Observation { date, value });
        }

        if observations.is_empty() {
            return Err(EtlError::parse(format!(
                "no month rows in {} table",
                self.target.name
            )));
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
impl SourceAdapter for BiAdapter {
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

    fn tr_adapter() -> BiAdapter {
        BiAdapter::new(Client::new(), SourceTarget::new("TR", "http://localhost/tr"), 2024)
    }

    #[test]
    fn test_parse_tr_table() {
        let html = r#"
            <table>
              <tr><th>Mês</th><th>TR</th><th>Acumulado</th></tr>
              <tr><td>Março</td><td>0,0413%</td><td>0,1%</td></tr>
              <tr><td>Janeiro</td><td>0,0000%</td><td>0,0%</td></tr>
              <tr><td>Fevereiro</td><td>0,0579%</td><td>0,05%</td></tr>
            </table>
        "#;

        let series = tr_adapter().parse_table(&parse_first_table(html).unwrap()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.observations()[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(series.observations()[2].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!((series.observations()[1].value - 0.0579).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_month_fails_whole_table() {
        let table = HtmlTable {
            headers: vec![],
            rows: vec![
                vec!["janeiro".to_string(), "0,01%".to_string()],
                vec!["Acumulado".to_string(), "0,12%".to_string()],
            ],
        };
        assert!(matches!(
            tr_adapter().parse_table(&table),
            Err(EtlError::UnknownMonthError { .. })
        ));
    }

    #[test]
    fn test_empty_table_is_parse_error() {
        let table = HtmlTable::default();
        assert!(matches!(tr_adapter().parse_table(&table), Err(EtlError::ParseError { .. })));
    }
}
