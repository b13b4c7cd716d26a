//! Turns upstream cells such as `"março/2024"` or `"(0,34%)"` into a
//! first-of-month date and an `f64`.

use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

/// Portuguese month names, lowercase, in calendar order.
pub const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Month number (1-12) for a Portuguese month name. Exact match after
/// trimming and lowercasing only.
pub fn month_number(name: &str) -> Option<u32> {
    let needle = name.trim().to_lowercase();
    MONTHS_PT
        .iter()
        .position(|month| *month == needle)
        .map(|idx| idx as u32 + 1)
}

/// Parses `"<month-name>/<year>"` into the first day of that month.
pub fn parse_month_year(label: &str) -> Result<NaiveDate> {
    let mut parts = label.trim().split('/');
    let (month, year) = match (parts.next(), parts.next(), parts.next()) {
        (Some(month), Some(year), None) => (month, year),
        _ => {
            return Err(EtlError::parse(format!(
                "expected '<month>/<year>', got '{}'",
                label
            )))
        }
    };

    let month = month_number(month).ok_or_else(|| EtlError::UnknownMonthError {
        label: label.to_string(),
    })?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| EtlError::parse(format!("invalid year in '{}'", label)))?;

    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EtlError::parse(format!("date out of range: '{}'", label)))
}

/// Parses a pt-BR formatted percentage into percentage points.
///
/// `"0,34%"` gives `0.34`. A value wrapped in parentheses is negative no
/// matter what sign it carries inside, so `"(1,20%)"` and `"(-1,20%)"` both
/// give `-1.20`, as does `"(1,20)%"`. Parentheses count only as one
/// balanced outer pair. When a comma is present any dot is a thousands
/// separator; otherwise a dot is the decimal point (`"0.50"` from the
/// central bank API).
pub fn parse_locale_percent(raw: &str) -> Result<f64> {
    let malformed = || EtlError::MalformedNumberError {
        raw: raw.to_string(),
    };

    let unsuffixed = raw.trim().replace('\u{2212}', "-").replace('%', "");
    let unsuffixed = unsuffixed.trim();

    let (body, parenthesized) = match unsuffixed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (unsuffixed, false),
    };
    if body.contains(|c: char| matches!(c, '(' | ')')) {
        return Err(malformed());
    }
    let mut cleaned = body.trim().to_string();

    if let Some(rest) = cleaned.strip_prefix('-') {
        cleaned = format!("-{}", rest.trim_start());
    }
    if cleaned.contains(',') {
        cleaned = cleaned.replace('.', "").replace(',', ".");
    }

    if cleaned.is_empty() || cleaned == "-" {
        return Err(malformed());
    }

    let value: f64 = cleaned.parse().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }

    Ok(if parenthesized { -value.abs() } else { value })
}

pub fn to_fraction(percent: f64) -> f64 {
    percent / 100.0
}
