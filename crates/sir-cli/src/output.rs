//! Output path derivation and the CSV/XLSX writers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use sir_core::sanitize::round_one;
use sir_core::{Dimension, LongMetricRecord, ScoreRecord, LONG_METRIC_COLUMNS, SCORE_COLUMNS};

/// Preferred output directory, relative to the working directory.
pub(crate) const PROCESSED_DIR: &str = "data/processed";

const RESULT_SUFFIX: &str = "__Resultado.csv";
const METRICS_SUFFIX: &str = "__MetricsExport.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputPaths {
    pub scores: PathBuf,
    pub metrics: PathBuf,
}

impl OutputPaths {
    /// Replaces derived paths with explicitly requested ones.
    #[must_use]
    pub(crate) fn with_overrides(self, scores: Option<PathBuf>, metrics: Option<PathBuf>) -> Self {
        Self {
            scores: scores.unwrap_or(self.scores),
            metrics: metrics.unwrap_or(self.metrics),
        }
    }
}

/// File-name-safe form of `s`: runs of characters outside
/// `[A-Za-z0-9-_.]` become a single `-`, with no leading or trailing dash.
#[must_use]
pub(crate) fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    for c in s.trim().chars() {
        let keep = c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
        let next = if keep { c } else { '-' };
        if next == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(next);
    }
    slug.trim_matches('-').to_string()
}

/// Derives both output paths from the input file name.
///
/// The directory is `out_dir` when given, else `processed_dir` when it
/// exists, else the input's own directory.
#[must_use]
pub(crate) fn derive_output_paths(
    input: &Path,
    out_dir: Option<&Path>,
    processed_dir: &Path,
) -> OutputPaths {
    let stem = input
        .file_stem()
        .map(|s| slugify(&s.to_string_lossy()))
        .unwrap_or_default();

    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None if processed_dir.is_dir() => processed_dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };

    OutputPaths {
        scores: dir.join(format!("{stem}{RESULT_SUFFIX}")),
        metrics: dir.join(format!("{stem}{METRICS_SUFFIX}")),
    }
}

/// One-decimal rendering used for previews; non-finite values are blank.
#[must_use]
pub(crate) fn format_one_decimal(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", round_one(value))
    } else {
        String::new()
    }
}

/// Writes the scored result table.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub(crate) fn write_scores(path: &Path, records: &[ScoreRecord]) -> anyhow::Result<()> {
    write_csv(path, &SCORE_COLUMNS, records)
}

/// Writes the long metrics export. The header is written even when
/// `records` is empty.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub(crate) fn write_metrics(path: &Path, records: &[LongMetricRecord]) -> anyhow::Result<()> {
    write_csv(path, &LONG_METRIC_COLUMNS, records)
}

/// Writes the scored result table as a single-sheet workbook. Values are
/// rounded to one decimal; `NaN` leaves the cell empty.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the
/// workbook cannot be saved.
pub(crate) fn write_scores_xlsx(path: &Path, records: &[ScoreRecord]) -> anyhow::Result<()> {
    create_parent_dir(path)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in SCORE_COLUMNS.iter().enumerate() {
        sheet.write_string(0, u16::try_from(col)?, *title)?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1).context("too many rows for a worksheet")?;
        sheet.write_string(row, 0, record.name.as_str())?;
        let values = Dimension::ALL
            .iter()
            .map(|d| record.dimension(*d))
            .chain(std::iter::once(record.sir_final_0_100));
        for (offset, value) in values.enumerate() {
            if value.is_finite() {
                sheet.write_number(row, u16::try_from(offset + 1)?, round_one(value))?;
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = records.len(), "xlsx written");
    Ok(())
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> anyhow::Result<()> {
    create_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), rows = records.len(), "csv written");
    Ok(())
}
