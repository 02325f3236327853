use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::error::TableError;
use crate::sanitize::round_one;

/// Column order of the scored result table.
pub const SCORE_COLUMNS: [&str; 7] = [
    "name",
    "presenca_100",
    "popularidade_100",
    "atividade_100",
    "engajamento_100",
    "difusao_100",
    "sir_final_0_100",
];

/// Column order of the long-format metrics export.
pub const LONG_METRIC_COLUMNS: [&str; 6] = [
    "name",
    "platform",
    "metric",
    "value",
    "period_start",
    "period_end",
];

/// Unbounded per-entity aggregates computed from the canonical table.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDimensionRecord {
    pub name: String,
    /// Sum of `fans_*`.
    pub pop_raw: f64,
    /// Growth blend in `[0, 1]` from the `var_*` columns.
    pub score_crescimento: f64,
    /// Popularity blended with growth; this is what gets normalized.
    pub pop_final_raw: f64,
    /// Sum of `posts_*`.
    pub ativ_raw: f64,
    /// Mean of the tracked `engagement_*` columns.
    pub eng_media: f64,
    pub eng_raw: f64,
    /// Off-platform resharing: facebook, twitter and tiktok shares.
    pub dif_raw: f64,
    /// Platforms with a positive `presence_*` value.
    pub platforms_present: usize,
}

/// Which presence columns the aggregator found. Travels next to the raw
/// records instead of being attached to the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceMetadata {
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDimensions {
    pub records: Vec<RawDimensionRecord>,
    pub presence: PresenceMetadata,
}

/// The five measured facets of influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Presenca,
    Popularidade,
    Atividade,
    Engajamento,
    Difusao,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Presenca,
        Dimension::Popularidade,
        Dimension::Atividade,
        Dimension::Engajamento,
        Dimension::Difusao,
    ];

    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Presenca => "presenca_100",
            Dimension::Popularidade => "popularidade_100",
            Dimension::Atividade => "atividade_100",
            Dimension::Engajamento => "engajamento_100",
            Dimension::Difusao => "difusao_100",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Normalized dimension columns keyed by [`Dimension`]. A dimension that was
/// never inserted reads as absent, and the combiner turns it into `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionTable {
    names: Vec<String>,
    columns: BTreeMap<Dimension, Vec<f64>>,
}

impl DimensionTable {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            columns: BTreeMap::new(),
        }
    }

    /// Adds or replaces one dimension column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ColumnLength`] if `values` does not have one
    /// entry per entity.
    pub fn insert(&mut self, dimension: Dimension, values: Vec<f64>) -> Result<(), TableError> {
        if values.len() != self.names.len() {
            return Err(TableError::ColumnLength {
                column: dimension.column_name().to_string(),
                expected: self.names.len(),
                found: values.len(),
            });
        }
        self.columns.insert(dimension, values);
        Ok(())
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn column(&self, dimension: Dimension) -> Option<&[f64]> {
        self.columns.get(&dimension).map(Vec::as_slice)
    }

    /// Value for one entity, `NaN` when the dimension is absent.
    #[must_use]
    pub fn value(&self, dimension: Dimension, row: usize) -> f64 {
        self.column(dimension)
            .and_then(|c| c.get(row).copied())
            .unwrap_or(f64::NAN)
    }
}

/// One row of the scored result table. Serializes in [`SCORE_COLUMNS`]
/// order with one decimal; `NaN` becomes an empty field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub name: String,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub presenca_100: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub popularidade_100: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub atividade_100: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub engajamento_100: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub difusao_100: f64,
    #[serde(serialize_with = "serialize_one_decimal")]
    pub sir_final_0_100: f64,
}

impl ScoreRecord {
    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Presenca => self.presenca_100,
            Dimension::Popularidade => self.popularidade_100,
            Dimension::Atividade => self.atividade_100,
            Dimension::Engajamento => self.engajamento_100,
            Dimension::Difusao => self.difusao_100,
        }
    }
}

/// One row of the long-format metrics export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongMetricRecord {
    pub name: String,
    pub platform: String,
    pub metric: String,
    #[serde(serialize_with = "serialize_opt_one_decimal")]
    pub value: Option<f64>,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_one_decimal<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_some(&round_one(*value))
    } else {
        serializer.serialize_none()
    }
}

#[allow(clippy::ref_option)]
fn serialize_opt_one_decimal<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_one_decimal(v, serializer),
        None => serializer.serialize_none(),
    }
}
