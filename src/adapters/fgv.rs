use super::html::HtmlTable;
use super::{fetch_table, SourceTarget};
use crate::core::normalize::{month_number, parse_locale_percent, parse_month_year};
use crate::domain::model::{IndicatorSeries, Observation};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const YEAR_COLUMN: &str = "Ano/Mês";

/// Cells meaning "not published yet".
const PLACEHOLDERS: [&str; 4] = ["-", "—", "n/d", "..."];

fn is_unpublished(cell: &str) -> bool {
    cell.is_empty() || PLACEHOLDERS.contains(&cell.to_lowercase().as_str())
}

/// FGV grids (IGP-M, IGP-DI): one row per year, one column per month.
///
/// Rows for the reference year and the year before it are melted into
/// monthly readings so the trailing window spans a year boundary.
pub struct FgvAdapter {
    client: Client,
    target: SourceTarget,
    year: i32,
}

impl FgvAdapter {
    pub fn new(client: Client, target: SourceTarget, year: i32) -> Self {
        Self {
            client,
            target,
            year,
        }
    }

    pub fn parse_table(&self, table: &HtmlTable) -> Result<IndicatorSeries> {
        let year_col = table.column_index(YEAR_COLUMN).ok_or_else(|| {
            EtlError::parse(format!(
                "{} table has no '{}' column",
                self.target.name, YEAR_COLUMN
            ))
        })?;

        let month_cols: Vec<(usize, &str)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| *idx != year_col && month_number(header).is_some())
            .map(|(idx, header)| (idx, header.as_str()))
            .collect();
        if month_cols.is_empty() {
            return Err(EtlError::parse(format!(
                "{} table has no month columns",
                self.target.name
            )));
        }

        let wanted_years = [self.year - 1, self.year];
        let mut observations = Vec::new();

        for row in &table.rows {
            let row_year = match row.get(year_col).and_then(|y| y.trim().parse::<i32>().ok()) {
                Some(y) if wanted_years.contains(&y) => y,
                _ => continue,
            };

            for (idx, header) in &month_cols {
                let cell = match row.get(*idx).map(|c| c.trim()) {
                    Some(c) if !is_unpublished(c) => c,
                    _ => continue,
                };
                let date = parse_month_year(&format!("{}/{}", header, row_year))?;
                let value = self.target.scale.from_percent(parse_locale_percent(cell)?);
                observations.push(Observation { date, value });
            }
        }

        if observations.is_empty() {
            return Err(EtlError::parse(format!(
                "{} table has no readings for {} or {}",
                self.target.name, wanted_years[0], wanted_years[1]
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
impl SourceAdapter for FgvAdapter {
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

    const GRID: &str = r#"
        <table>
          <thead>
            <tr><th>Ano/Mês</th><th>Janeiro</th><th>Fevereiro</th><th>Março</th><th>Abril</th>
                <th>Maio</th><th>Junho</th><th>Julho</th><th>Agosto</th><th>Setembro</th>
                <th>Outubro</th><th>Novembro</th><th>Dezembro</th><th>Acumulado</th></tr>
          </thead>
          <tbody>
            <tr><td>2022</td><td>1,82%</td><td>1,83%</td><td>1,74%</td><td>1,41%</td><td>0,52%</td>
                <td>0,59%</td><td>0,21%</td><td>(0,70%)</td><td>(0,95%)</td><td>(0,97%)</td>
                <td>(0,56%)</td><td>0,45%</td><td>5,45%</td></tr>
            <tr><td>2023</td><td>0,21%</td><td>(0,06%)</td><td>0,05%</td><td>(0,95%)</td><td>(1,84%)</td>
                <td>(1,93%)</td><td>(0,72%)</td><td>(0,14%)</td><td>0,37%</td><td>0,50%</td>
                <td>0,59%</td><td>0,74%</td><td>(3,18%)</td></tr>
            <tr><td>2024</td><td>0,07%</td><td>(0,52%)</td><td>(0,47%)</td><td>-</td><td></td>
                <td></td><td></td><td></td><td></td><td></td><td></td><td></td><td>(0,92%)</td></tr>
          </tbody>
        </table>
    "#;

    fn igpm_adapter(year: i32) -> FgvAdapter {
        FgvAdapter::new(Client::new(), SourceTarget::new("IGP_M", "http://localhost/igpm"), year)
    }

    #[test]
    fn test_trailing_twelve_months_across_years() {
        let table = parse_first_table(GRID).unwrap();
        let series = igpm_adapter(2024).parse_table(&table).unwrap();

        assert_eq!(series.len(), 12);
        assert_eq!(series.observations()[0].date, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        let latest = series.latest().unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!((latest.value + 0.47).abs() < 1e-12);
        assert!(series
            .observations()
            .windows(2)
            .all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_parenthesized_values_are_negative() {
        let table = parse_first_table(GRID).unwrap();
        let adapter = FgvAdapter::new(
            Client::new(),
            SourceTarget::new("IGP_M", "http://localhost/igpm").with_limit(None),
            2023,
        );
        let series = adapter.parse_table(&table).unwrap();

        assert_eq!(series.len(), 24);

        let august_2022 = series
            .observations()
            .iter()
            .find(|o| o.date == NaiveDate::from_ymd_opt(2022, 8, 1).unwrap())
            .unwrap();
        assert!((august_2022.value + 0.70).abs() < 1e-12);
    }

    #[test]
    fn test_missing_year_column_is_parse_error() {
        let table = HtmlTable {
            headers: vec!["Ano".to_string(), "Janeiro".to_string()],
            rows: vec![vec!["2024".to_string(), "0,1".to_string()]],
        };
        assert!(matches!(
            igpm_adapter(2024).parse_table(&table),
            Err(EtlError::ParseError { .. })
        ));
    }

    #[test]
    fn test_no_rows_for_reference_year() {
        let table = parse_first_table(GRID).unwrap();
        assert!(matches!(
            igpm_adapter(2030).parse_table(&table),
            Err(EtlError::ParseError { .. })
        ));
    }
}
