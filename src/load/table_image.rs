use crate::domain::model::{IndicatorMap, IndicatorSeries};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

const COLUMN_WIDTH: u32 = 160;
const ROW_HEIGHT: u32 = 32;
const HEADER_FILL: &str = "#CCCCCC";
const ROW_FILLS: [&str; 2] = ["#FFFFFF", "#F0F0F0"];
const BORDER: &str = "#999999";

/// `"0.42%"`, or `"-"` when there is no reading.
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v),
        _ => "-".to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_row(svg: &mut String, y: u32, fill: &str, cells: [&str; 2]) {
    svg.push_str(&format!(
        r#"<rect x="0" y="{y}" width="{w}" height="{h}" fill="{fill}" stroke="{BORDER}"/>"#,
        w = COLUMN_WIDTH * 2,
        h = ROW_HEIGHT,
    ));
    for (col, text) in cells.iter().enumerate() {
        let x = COLUMN_WIDTH * col as u32;
        svg.push_str(&format!(
            r#"<line x1="{x}" y1="{y}" x2="{x}" y2="{y2}" stroke="{BORDER}"/><text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle">{t}</text>"#,
            y2 = y + ROW_HEIGHT,
            cx = x + COLUMN_WIDTH / 2,
            cy = y + ROW_HEIGHT / 2,
            t = escape(text),
        ));
    }
}

/// Two-column table (date, value in percentage points) as a standalone SVG
/// document. Grey header, zebra-striped rows.
pub fn render_svg(series: &IndicatorSeries) -> String {
    let rows = series.len() as u32 + 1;
    let width = COLUMN_WIDTH * 2;
    let height = ROW_HEIGHT * rows;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="14">"#
    ));
    push_row(&mut svg, 0, HEADER_FILL, ["data", series.value_column()]);

    for (idx, obs) in series.observations().iter().enumerate() {
        let date = obs.date.format("%Y-%m-%d").to_string();
        let value = format_percentage(Some(series.scale().to_percent(obs.value)));
        push_row(
            &mut svg,
            ROW_HEIGHT * (idx as u32 + 1),
            ROW_FILLS[idx % ROW_FILLS.len()],
            [&date, &value],
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes `<indicator>.svg` for every non-empty series.
pub async fn save_all_tables<S: Storage>(storage: &S, data: &IndicatorMap) -> Result<Vec<String>> {
    let mut written = Vec::new();

    for (indicator, series) in data {
        if series.is_empty() {
            tracing::warn!("{} has no data, table not rendered", indicator);
            continue;
        }

        let file_name = format!("{}.svg", indicator);
        storage
            .write_file(&file_name, render_svg(series).as_bytes())
            .await?;

        let location = storage.locate(&file_name);
        tracing::info!("{} table saved to {}", indicator, location);
        written.push(location);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Observation, ValueScale};
    use chrono::NaiveDate;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(Some(0.5)), "0.50%");
        assert_eq!(format_percentage(Some(-1.2)), "-1.20%");
        assert_eq!(format_percentage(Some(f64::NAN)), "-");
        assert_eq!(format_percentage(None), "-");
    }

    #[test]
    fn test_render_svg_rows_and_stripes() {
        let series = IndicatorSeries::from_observations(
            "IGP_M",
            ValueScale::Fraction,
            vec![
                Observation {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    value: 0.0007,
                },
                Observation {
                    date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    value: -0.0052,
                },
            ],
            None,
        );

        let svg = render_svg(&series);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">IGP_M</text>"));
        assert!(svg.contains(">2024-02-01</text>"));
        assert!(svg.contains(">0.07%</text>"));
        assert!(svg.contains(">-0.52%</text>"));
        assert!(svg.contains(HEADER_FILL));
        assert!(svg.contains(ROW_FILLS[1]));
        assert_eq!(svg.matches("<rect").count(), 3);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("A&B <x>"), "A&amp;B &lt;x&gt;");
    }
}
