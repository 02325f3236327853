//! Social influence scoring engine: canonicalizes loosely named metric
//! tables, cleans locale-ambiguous numbers, and turns them into five 0–100
//! dimension scores plus a weighted final score.

pub mod app_config;
pub mod canonicalize;
pub mod combine;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod platform;
pub mod sanitize;
pub mod schema;
pub mod table;
pub mod types;

pub use app_config::{DimensionWeights, NormalizationParams, PlatformWeights, ScoringConfig};
pub use canonicalize::{
    canonicalize_columns, CanonicalizationReport, Canonicalized, ColumnGroup, ColumnRename,
    RuleSet, SynonymRule,
};
pub use combine::{normalize_dimensions, weighted_final_score};
pub use config::{
    apply_env_overrides, load_scoring_config, load_scoring_profile, validate_scoring_config,
};
pub use dimensions::{compute_dimensions_raw, min_max_preserving_zero, presence_scores};
pub use error::{ConfigError, TableError};
pub use export::export_metrics_long;
pub use normalize::normalize_floor_cap;
pub use pipeline::{run_pipeline, PipelineOutput};
pub use platform::apply_platform_weights;
pub use sanitize::{parse_locale_number, sanitize_column, sanitize_table};
pub use schema::{MetricKind, Platform, NAME_COLUMN};
pub use table::{Cell, Column, Table};
pub use types::{
    Dimension, DimensionTable, LongMetricRecord, RawDimensionRecord, RawDimensions, ScoreRecord,
    LONG_METRIC_COLUMNS, SCORE_COLUMNS,
};
