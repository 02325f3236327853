//! Wide-to-long pivot of the canonical metric columns.

use crate::dimensions::entity_names;
use crate::schema::{MetricKind, Platform};
use crate::table::{Column, Table};
use crate::types::LongMetricRecord;

/// Recognized names for the period start column.
pub const PERIOD_START_COLUMNS: [&str; 4] = ["period_start", "date_from", "inicio_periodo", "start_date"];

/// Recognized names for the period end column.
pub const PERIOD_END_COLUMNS: [&str; 4] = ["period_end", "date_to", "fim_periodo", "end_date"];

/// First column of `table` whose name matches one of `candidates`,
/// ignoring case. Column order decides between several matches.
#[must_use]
pub fn find_period_column<'a>(table: &'a Table, candidates: &[&str]) -> Option<&'a Column> {
    table.columns().iter().find(|c| {
        candidates
            .iter()
            .any(|candidate| c.name.eq_ignore_ascii_case(candidate))
    })
}

fn period_at(column: Option<&Column>, row: usize) -> Option<String> {
    column.and_then(|c| c.cells.get(row)).and_then(|cell| cell.to_text())
}

/// Pivots every canonical `<metric>_<platform>` column present in `table`
/// into one record per entity. Platforms come first, then metric kinds in
/// export order, then entities in row order.
#[must_use]
pub fn export_metrics_long(table: &Table) -> Vec<LongMetricRecord> {
    let names = entity_names(table);

    let start = find_period_column(table, &PERIOD_START_COLUMNS);
    let end = find_period_column(table, &PERIOD_END_COLUMNS);

    let mut records = Vec::new();
    for platform in Platform::ALL {
        for metric in MetricKind::ALL {
            let Some(column) = table.column(&metric.column(platform)) else {
                continue;
            };
            for (row, cell) in column.cells.iter().enumerate() {
                records.push(LongMetricRecord {
                    name: names[row].clone(),
                    platform: platform.as_str().to_string(),
                    metric: metric.as_str().to_string(),
                    value: cell.as_f64(),
                    period_start: period_at(start, row),
                    period_end: period_at(end, row),
                });
            }
        }
    }

    if records.is_empty() {
        tracing::warn!("no canonical metric columns found; long export is empty");
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn table(columns: Vec<(&str, Vec<Cell>)>) -> Table {
        Table::from_columns(
            columns
                .into_iter()
                .map(|(name, cells)| Column::new(name, cells))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn single_fans_column_yields_one_row() {
        let t = table(vec![
            ("name", vec!["Acme".into()]),
            ("fans_facebook", vec![100.0.into()]),
        ]);
        assert_eq!(
            export_metrics_long(&t),
            vec![LongMetricRecord {
                name: "Acme".into(),
                platform: "facebook".into(),
                metric: "fans".into(),
                value: Some(100.0),
                period_start: None,
                period_end: None,
            }]
        );
    }

    #[test]
    fn no_metric_columns_yields_empty_export() {
        let t = table(vec![
            ("name", vec!["Acme".into()]),
            ("presence_facebook", vec![1.0.into()]),
            ("notes", vec!["hello".into()]),
        ]);
        assert!(export_metrics_long(&t).is_empty());
    }

    #[test]
    fn rows_are_ordered_platform_then_metric_then_entity() {
        let t = table(vec![
            ("name", vec!["a".into(), "b".into()]),
            ("posts_facebook", vec![1.0.into(), 2.0.into()]),
            ("fans_twitter", vec![3.0.into(), Cell::Missing]),
            ("fans_facebook", vec![4.0.into(), 5.0.into()]),
        ]);
        let keys: Vec<(String, String, String, Option<f64>)> = export_metrics_long(&t)
            .into_iter()
            .map(|r| (r.platform, r.metric, r.name, r.value))
            .collect();
        let expected: Vec<(String, String, String, Option<f64>)> = [
            ("facebook", "fans", "a", Some(4.0)),
            ("facebook", "fans", "b", Some(5.0)),
            ("facebook", "posts", "a", Some(1.0)),
            ("facebook", "posts", "b", Some(2.0)),
            ("twitter", "fans", "a", Some(3.0)),
            ("twitter", "fans", "b", None),
        ]
        .into_iter()
        .map(|(p, m, n, v)| (p.to_string(), m.to_string(), n.to_string(), v))
        .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn period_columns_are_found_case_insensitively() {
        let t = table(vec![
            ("name", vec!["Acme".into()]),
            ("Date_From", vec!["2024-01-01".into()]),
            ("FIM_PERIODO", vec!["2024-01-31".into()]),
            ("end_date", vec!["ignored".into()]),
            ("var_fans_tiktok", vec![12.0.into()]),
        ]);
        let rows = export_metrics_long(&t);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].metric, "var_fans");
        assert_eq!(rows[0].period_start.as_deref(), Some("2024-01-01"));
        assert_eq!(rows[0].period_end.as_deref(), Some("2024-01-31"));
    }
}
