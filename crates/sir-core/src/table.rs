//! Column-oriented in-memory table passed between pipeline stages.
//!
//! Loaders build a [`Table`] from whatever they read (CSV text, spreadsheet
//! cells); every stage consumes one table and returns a new one.

use crate::error::TableError;

/// A single cell as handed over by a loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Returns the numeric value when the cell holds a finite number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Renders the cell as text, treating missing and blank cells as absent.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Number(v) if v.is_finite() => Some(v.to_string()),
            Cell::Number(_) => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Cell::Missing, Cell::Number)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table from a header row and row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowWidth`] if any row is not exactly as wide as
    /// the header.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, TableError> {
        let width = headers.len();
        let row_count = rows.len();
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(row_count)))
            .collect();

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableError::RowWidth {
                    row: idx,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.cells.push(cell);
            }
        }

        Ok(Self { columns, row_count })
    }

    /// Builds a table from whole columns.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnLength`] if the columns differ in length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, |c| c.cells.len());
        if let Some(bad) = columns.iter().find(|c| c.cells.len() != row_count) {
            return Err(TableError::ColumnLength {
                column: bad.name.clone(),
                expected: row_count,
                found: bad.cells.len(),
            });
        }
        Ok(Self { columns, row_count })
    }

    /// Reassembles columns taken from a table of `row_count` rows. Stages
    /// that rewrite cells one-for-one use this instead of revalidating.
    #[must_use]
    pub(crate) fn from_parts(columns: Vec<Column>, row_count: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.cells.len() == row_count));
        Self { columns, row_count }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric view of a column with missing or non-numeric cells as `0.0`.
    #[must_use]
    pub fn numeric_or_zero(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name).map(|c| {
            c.cells
                .iter()
                .map(|cell| cell.as_f64().unwrap_or(0.0))
                .collect()
        })
    }
}
