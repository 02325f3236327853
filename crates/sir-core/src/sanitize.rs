//! Locale-tolerant numeric parsing for metric columns.
//!
//! Spreadsheets exported from pt-BR tooling mix `1.234,5`, `12,3%`, `45`,
//! non-breaking spaces and stray dashes in the same column. Every value is
//! reduced to an optional `f64`; nothing here fails.
//!
//! Percentage-flavored columns end up as fractions in `[0, 1]`. Rounding to
//! one decimal happens in the column's natural scale, so a percentage keeps
//! one decimal of percentage points (`12,3%` becomes `0.123`).

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::NAME_COLUMN;
use crate::table::{Cell, Column, Table};

/// `1.234` / `1.234.567,89`: dot-grouped thousands with optional comma decimals.
static THOUSANDS_GROUPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(\.\d{3})+(,\d+)?$").expect("valid thousands regex"));

/// Column names that always go through numeric sanitization.
static NUMERIC_METRIC_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(presence|fans|posts|likes|comments|shares|engagement|views|mentions|var_fans|var_(likes|comments|shares)|var_engagement)_",
    )
    .expect("valid metric column regex")
});

/// Returns `true` when `column` holds a rate that should be stored as a
/// fraction.
#[must_use]
pub fn is_percent_column(column: &str) -> bool {
    let c = column.to_lowercase();
    c.starts_with("engagement_")
        || c.starts_with("var_engagement_")
        || c.ends_with("_pct")
        || c.contains("rate")
}

/// Returns `true` when `column` is a known metric column by name.
#[must_use]
pub fn is_numeric_metric_column(column: &str) -> bool {
    NUMERIC_METRIC_COLUMN.is_match(column)
}

/// Rounds half away from zero to one decimal place.
#[must_use]
pub fn round_one(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Outcome of parsing a single text value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedValue {
    pub value: Option<f64>,
    /// A literal `%` was present before stripping.
    pub had_percent: bool,
    /// The text was non-empty but still could not be read as a number.
    pub unparsable: bool,
}

/// Parses one locale-ambiguous text value.
///
/// Handles `"1.234,5"` → `1234.5`, `"12,3%"` → `12.3` (with
/// `had_percent`), `"\u{a0}7"` → `7`, and treats `""` / `"-"` as missing.
#[must_use]
pub fn parse_locale_number(raw: &str) -> ParsedValue {
    let trimmed = raw.trim();
    let had_percent = trimmed.contains('%');
    let mut s = trimmed.replace('%', "");

    if THOUSANDS_GROUPED.is_match(&s) {
        s = s.replace('.', "");
    }
    let s = s.replace(',', ".").replace('\u{a0}', "");
    let s = s.trim();

    if s.is_empty() || s == "-" {
        return ParsedValue {
            value: None,
            had_percent,
            unparsable: false,
        };
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => ParsedValue {
            value: Some(v),
            had_percent,
            unparsable: false,
        },
        _ => ParsedValue {
            value: None,
            had_percent,
            unparsable: true,
        },
    }
}

/// A column after sanitization.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedColumn {
    pub values: Vec<Option<f64>>,
    /// Number of non-blank cells that could not be parsed.
    pub unparsable: usize,
    /// The whole column was divided by 100.
    pub percent_scaled: bool,
}

/// Sanitizes one column of cells.
///
/// When `percent` is set, the column is divided by 100 if any cell carried a
/// literal `%`, or else if every value lies in `[0, 100]` and the maximum
/// exceeds 1. The decision is column-wide. A count column that happens to
/// range over `(1, 100]` under a percent-flavored name is rescaled too; there
/// is no per-column opt-out.
#[must_use]
pub fn sanitize_column(cells: &[Cell], percent: bool) -> SanitizedColumn {
    let mut any_percent_sign = false;
    let mut unparsable = 0usize;

    let raw: Vec<Option<f64>> = cells
        .iter()
        .map(|cell| match cell {
            Cell::Missing => None,
            Cell::Number(v) => v.is_finite().then_some(*v),
            Cell::Text(text) => {
                let parsed = parse_locale_number(text);
                any_percent_sign |= parsed.had_percent;
                if parsed.unparsable {
                    unparsable += 1;
                }
                parsed.value
            }
        })
        .collect();

    let percent_scaled = percent && (any_percent_sign || looks_like_percent_points(&raw));

    let values = raw
        .into_iter()
        .map(|v| {
            v.map(|v| match (percent, percent_scaled) {
                (true, true) => round_one(v) / 100.0,
                (true, false) => round_one(v * 100.0) / 100.0,
                (false, _) => round_one(v),
            })
        })
        .collect();

    SanitizedColumn {
        values,
        unparsable,
        percent_scaled,
    }
}

/// All present values in `[0, 100]` with a maximum above 1.
fn looks_like_percent_points(values: &[Option<f64>]) -> bool {
    let present = values.iter().flatten();
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    let mut any = false;
    for &v in present {
        any = true;
        min = min.min(v);
        max = max.max(v);
    }
    any && min >= 0.0 && max <= 100.0 && max > 1.0
}

/// Returns `true` when every cell is numeric or missing and at least one is
/// numeric.
fn is_already_numeric(cells: &[Cell]) -> bool {
    cells.iter().all(|c| matches!(c, Cell::Missing | Cell::Number(_)))
        && cells.iter().any(Cell::is_number)
}

/// Sanitizes every metric column of `table` (recognized by name) and every
/// other column that is already fully numeric. The identifier column and
/// free-text columns pass through untouched.
#[must_use]
pub fn sanitize_table(table: Table) -> Table {
    let row_count = table.row_count();
    let columns: Vec<Column> = table
        .into_columns()
        .into_iter()
        .map(|column| {
            if column.name == NAME_COLUMN
                || !(is_numeric_metric_column(&column.name) || is_already_numeric(&column.cells))
            {
                return column;
            }

            let percent = is_percent_column(&column.name);
            let sanitized = sanitize_column(&column.cells, percent);

            if sanitized.unparsable > 0 {
                tracing::warn!(
                    column = %column.name,
                    count = sanitized.unparsable,
                    "unparsable numeric cells treated as missing"
                );
            }
            if sanitized.percent_scaled {
                tracing::debug!(column = %column.name, "percentage column scaled to fraction");
            }

            Column::new(
                column.name,
                sanitized.values.into_iter().map(Cell::from).collect(),
            )
        })
        .collect();

    Table::from_parts(columns, row_count)
}

#[cfg(test)]
#[path = "sanitize_test.rs"]
mod tests;
