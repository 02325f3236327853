//! Input loading: spreadsheets through `calamine`, everything else as CSV.

use std::path::Path;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use sir_core::{Cell, Table};

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Loads `path` into a [`Table`]. `sheet` picks the worksheet of a
/// spreadsheet: an all-digit value is a zero-based index, anything else a
/// sheet name. CSV input ignores it.
///
/// # Errors
///
/// Returns an error if the file does not exist, cannot be read or parsed, or
/// the requested sheet is absent.
pub(crate) fn load_table(path: &Path, sheet: &str) -> anyhow::Result<Table> {
    if !path.is_file() {
        anyhow::bail!("input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => load_spreadsheet(path, sheet)?,
        _ => load_csv(path)?,
    };

    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.columns().len(),
        "input loaded"
    );
    Ok(table)
}

fn text_cell(raw: &str) -> Cell {
    if raw.trim().is_empty() {
        Cell::Missing
    } else {
        Cell::Text(raw.to_string())
    }
}

fn load_spreadsheet(path: &Path, sheet: &str) -> anyhow::Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open workbook {}", path.display()))?;

    let range = if !sheet.is_empty() && sheet.chars().all(|c| c.is_ascii_digit()) {
        let index: usize = sheet.parse().context("sheet index out of range")?;
        workbook
            .worksheet_range_at(index)
            .with_context(|| format!("workbook has no sheet at index {index}"))?
            .with_context(|| format!("failed to read sheet {index}"))?
    } else {
        workbook
            .worksheet_range(sheet)
            .with_context(|| format!("failed to read sheet '{sheet}'"))?
    };

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };
    let headers = header_row
        .iter()
        .map(|cell| match cell {
            Data::String(s) => s.trim().to_string(),
            Data::Empty => String::new(),
            other => other.to_string(),
        })
        .collect();
    let cells = rows
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    Ok(Table::from_rows(headers, cells)?)
}

#[allow(clippy::cast_precision_loss)]
fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => text_cell(s),
        Data::DateTime(dt) => date_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
    }
}

/// Dates become ISO text (`2024-01-31`, or `2024-01-31 12:30:00` when a
/// time is set); durations keep their day count.
fn date_cell(dt: &ExcelDateTime) -> Cell {
    if dt.is_duration() {
        return Cell::Number(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(moment) if moment.time() == NaiveTime::MIN => {
            Cell::Text(moment.format("%Y-%m-%d").to_string())
        }
        Some(moment) => Cell::Text(moment.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => Cell::Number(dt.as_f64()),
    }
}

/// Decodes `bytes` as UTF-8, falling back to Latin-1.
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("input is not valid UTF-8; decoding as Latin-1");
            err.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// `;` when it outnumbers `,` on the header line, else `,`.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let semicolons = header.matches(';').count();
    let commas = header.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn load_csv(path: &Path) -> anyhow::Result<Table> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let decoded = decode_text(bytes);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(decoded.as_str());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(text))
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV record at line {}", idx + 2))?;
        let mut row: Vec<Cell> = record.iter().map(text_cell).collect();
        if row.len() > headers.len() {
            tracing::warn!(line = idx + 2, extra = row.len() - headers.len(), "extra CSV fields ignored");
        }
        row.resize(headers.len(), Cell::Missing);
        rows.push(row);
    }

    Ok(Table::from_rows(headers, rows)?)
}
