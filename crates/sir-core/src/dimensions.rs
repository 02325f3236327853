//! Raw per-entity dimension aggregation over the canonical, sanitized table.
//!
//! Absent canonical columns contribute zero; missing cells count as zero.

use crate::normalize::is_close;
use crate::schema::{canonical_column, platform_columns, Platform, NAME_COLUMN};
use crate::table::Table;
use crate::types::{PresenceMetadata, RawDimensionRecord, RawDimensions};

/// Reaction metrics summed for engagement and growth.
const REACTION_METRICS: [&str; 3] = ["likes", "comments", "shares"];

/// Platforms whose shares count as diffusion. Instagram shares stay on the
/// platform and are left out.
const DIFFUSION_PLATFORMS: [Platform; 3] = [Platform::Facebook, Platform::Twitter, Platform::Tiktok];

/// Min-max scales `values` onto `[0, 1]`. A constant column maps non-zero
/// entries to exactly 0.5 and zeros to 0.
#[must_use]
pub fn min_max_preserving_zero(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if values.is_empty() || is_close(max, min) {
        return values
            .iter()
            .map(|v| if *v == 0.0 { 0.0 } else { 0.5 })
            .collect();
    }

    let span = max - min;
    values.iter().map(|v| (v - min) / span).collect()
}

/// Entity identifiers, falling back to row positions for blank cells.
pub(crate) fn entity_names(table: &Table) -> Vec<String> {
    match table.column(NAME_COLUMN) {
        Some(column) => column
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| cell.to_text().unwrap_or_else(|| i.to_string()))
            .collect(),
        None => (0..table.row_count()).map(|i| i.to_string()).collect(),
    }
}

/// Canonical columns from `candidates` that exist in `table`.
fn present_columns(table: &Table, candidates: impl IntoIterator<Item = String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|c| table.has_column(c))
        .collect()
}

/// Row-wise sum over `columns`.
fn row_sums(table: &Table, columns: &[String]) -> Vec<f64> {
    let mut sums = vec![0.0; table.row_count()];
    for name in columns {
        if let Some(values) = table.numeric_or_zero(name) {
            for (sum, v) in sums.iter_mut().zip(values) {
                *sum += v;
            }
        }
    }
    sums
}

fn reaction_columns(prefix: &str) -> Vec<String> {
    REACTION_METRICS
        .iter()
        .flat_map(|m| platform_columns(&format!("{prefix}{m}")))
        .collect()
}

/// Computes the raw dimensions for every entity of `table`.
#[must_use]
pub fn compute_dimensions_raw(table: &Table) -> RawDimensions {
    let names = entity_names(table);
    let rows = table.row_count();

    let pop_raw = row_sums(table, &present_columns(table, platform_columns("fans")));

    let var_fans = row_sums(table, &present_columns(table, platform_columns("var_fans")));
    let var_reactions = row_sums(table, &present_columns(table, reaction_columns("var_")));
    let var_engagement = row_sums(
        table,
        &present_columns(table, platform_columns("var_engagement")),
    );
    let vf = min_max_preserving_zero(&var_fans);
    let vr = min_max_preserving_zero(&var_reactions);
    let ve = min_max_preserving_zero(&var_engagement);
    let growth: Vec<f64> = (0..rows)
        .map(|i| (3.0 * vf[i] + vr[i] + 2.0 * ve[i]) / 8.0)
        .collect();

    let max_pop = pop_raw
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let ativ_raw = row_sums(table, &present_columns(table, platform_columns("posts")));

    let engagement_columns = present_columns(table, platform_columns("engagement"));
    let eng_media: Vec<f64> = if engagement_columns.is_empty() {
        vec![0.0; rows]
    } else {
        #[allow(clippy::cast_precision_loss)]
        let tracked = engagement_columns.len() as f64;
        row_sums(table, &engagement_columns)
            .into_iter()
            .map(|s| s / tracked)
            .collect()
    };
    let reactions = row_sums(table, &present_columns(table, reaction_columns("")));
    let reactions_n01 = min_max_preserving_zero(&reactions);

    let dif_raw = row_sums(
        table,
        &present_columns(
            table,
            DIFFUSION_PLATFORMS
                .iter()
                .map(|p| canonical_column("shares", *p)),
        ),
    );

    let presence_columns = present_columns(table, platform_columns("presence"));
    let presence_values: Vec<Vec<f64>> = presence_columns
        .iter()
        .filter_map(|c| table.numeric_or_zero(c))
        .collect();

    let records = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| RawDimensionRecord {
            name,
            pop_raw: pop_raw[i],
            score_crescimento: growth[i],
            pop_final_raw: 0.9 * pop_raw[i] + 0.1 * growth[i] * max_pop,
            ativ_raw: ativ_raw[i],
            eng_media: eng_media[i],
            eng_raw: eng_media[i] + 0.1 * reactions_n01[i],
            dif_raw: dif_raw[i],
            platforms_present: presence_values.iter().filter(|col| col[i] > 0.0).count(),
        })
        .collect();

    RawDimensions {
        records,
        presence: PresenceMetadata {
            columns: presence_columns,
        },
    }
}

/// Presence on a 0–100 scale: share of tracked presence columns with a
/// positive value. Zero for everyone when no presence column exists.
#[must_use]
pub fn presence_scores(dims: &RawDimensions) -> Vec<f64> {
    let tracked = dims.presence.columns.len();
    if tracked == 0 {
        return vec![0.0; dims.records.len()];
    }
    #[allow(clippy::cast_precision_loss)]
    dims.records
        .iter()
        .map(|r| r.platforms_present as f64 / tracked as f64 * 100.0)
        .collect()
}

#[cfg(test)]
#[path = "dimensions_test.rs"]
mod tests;
