use crate::app_config::ScoringConfig;
use crate::canonicalize::{canonicalize_columns, CanonicalizationReport, RuleSet};
use crate::combine::{normalize_dimensions, weighted_final_score};
use crate::dimensions::compute_dimensions_raw;
use crate::error::TableError;
use crate::export::export_metrics_long;
use crate::platform::apply_platform_weights;
use crate::sanitize::sanitize_table;
use crate::table::Table;
use crate::types::{LongMetricRecord, ScoreRecord};

/// Everything one scoring run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: CanonicalizationReport,
    pub scores: Vec<ScoreRecord>,
    pub metrics: Vec<LongMetricRecord>,
}

/// Runs the whole engine on a freshly loaded table.
///
/// Canonicalize, sanitize, then split: the long metrics export reads the
/// sanitized table while the scoring branch aggregates, normalizes and
/// combines it.
///
/// # Errors
///
/// Returns [`TableError`] only if an internal stage produced columns of
/// inconsistent length. Malformed cells never fail a run.
pub fn run_pipeline(
    table: Table,
    rules: &RuleSet,
    config: &ScoringConfig,
) -> Result<PipelineOutput, TableError> {
    let canonical = canonicalize_columns(table, rules);
    log_report(&canonical.report);

    let sanitized = sanitize_table(canonical.table);
    let metrics = export_metrics_long(&sanitized);

    let weighted = apply_platform_weights(sanitized, &config.platform_weights);
    let raw = compute_dimensions_raw(&weighted);
    let dimensions = normalize_dimensions(&raw, &config.normalization)?;
    let scores = weighted_final_score(&dimensions, &config.weights);

    tracing::info!(
        entities = scores.len(),
        metric_rows = metrics.len(),
        "scoring run complete"
    );

    Ok(PipelineOutput {
        report: canonical.report,
        scores,
        metrics,
    })
}

fn log_report(report: &CanonicalizationReport) {
    for rename in &report.applied {
        tracing::info!(from = %rename.from, to = %rename.to, "column renamed");
    }
    for group in &report.missing_groups {
        tracing::warn!(group = %group, "no columns for group; contributes zero");
    }
    if report.synthesized_name {
        tracing::warn!("no identifier column found; names built from row order");
    }
    tracing::info!(
        renamed = report.applied.len(),
        dropped = report.dropped_duplicates.len(),
        missing_groups = report.missing_groups.len(),
        "column canonicalization finished"
    );
}
