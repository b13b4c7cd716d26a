use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a series stores its values: percentage points (`0.34` for 0.34%)
/// or a plain fraction (`0.0034`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueScale {
    #[default]
    Percent,
    Fraction,
}

impl ValueScale {
    /// Converts a percentage-point reading into this scale.
    pub fn from_percent(self, percent: f64) -> f64 {
        match self {
            ValueScale::Percent => percent,
            ValueScale::Fraction => crate::core::normalize::to_fraction(percent),
        }
    }

    /// Converts a stored value back to percentage points.
    pub fn to_percent(self, value: f64) -> f64 {
        match self {
            ValueScale::Percent => value,
            ValueScale::Fraction => value * 100.0,
        }
    }
}

/// One monthly reading. `date` is always the first day of its month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    name: String,
    scale: ValueScale,
    observations: Vec<Observation>,
}

impl IndicatorSeries {
    /// The failure sentinel: no rows at all.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: ValueScale::default(),
            observations: Vec::new(),
        }
    }

    /// Builds a series from raw readings in any order.
    ///
    /// Dates are snapped to the first of their month, non-finite values are
    /// dropped, and for a month seen twice the later reading wins. The result
    /// is sorted ascending and, when `limit` is set, cut down to the most
    /// recent `limit` months.
    pub fn from_observations<I>(
        name: impl Into<String>,
        scale: ValueScale,
        observations: I,
        limit: Option<usize>,
    ) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for obs in observations {
            if !obs.value.is_finite() {
                continue;
            }
            let month_start = obs.date.with_day(1).unwrap_or(obs.date);
            by_month.insert(month_start, obs.value);
        }

        let mut observations: Vec<Observation> = by_month
            .into_iter()
            .map(|(date, value)| Observation { date, value })
            .collect();

        if let Some(limit) = limit {
            if observations.len() > limit {
                observations.drain(..observations.len() - limit);
            }
        }

        Self {
            name: name.into(),
            scale,
            observations,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header of the value column; always the indicator name.
    pub fn value_column(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> ValueScale {
        self.scale
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Everything one run produced, keyed by indicator name.
pub type IndicatorMap = BTreeMap<String, IndicatorSeries>;

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub csv_files: Vec<String>,
    pub table_files: Vec<String>,
    pub empty_indicators: Vec<String>,
}
