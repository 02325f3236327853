//! Normalized dimension table and the weighted final score.

use crate::app_config::{DimensionWeights, NormalizationParams};
use crate::dimensions::presence_scores;
use crate::error::TableError;
use crate::normalize::normalize_floor_cap;
use crate::types::{Dimension, DimensionTable, RawDimensionRecord, RawDimensions, ScoreRecord};

/// Puts every dimension on the 0–100 scale. Presence is already a
/// percentage and bypasses the floor/cap normalizer.
///
/// # Errors
///
/// Returns [`TableError::ColumnLength`] if a dimension column does not line
/// up with the entity list.
pub fn normalize_dimensions(
    raw: &RawDimensions,
    params: &NormalizationParams,
) -> Result<DimensionTable, TableError> {
    let names = raw.records.iter().map(|r| r.name.clone()).collect();
    let mut table = DimensionTable::new(names);

    let column = |f: fn(&RawDimensionRecord) -> f64| -> Vec<f64> {
        raw.records.iter().map(f).collect()
    };

    table.insert(Dimension::Presenca, presence_scores(raw))?;
    table.insert(
        Dimension::Popularidade,
        normalize_floor_cap(&column(|r| r.pop_final_raw), params),
    )?;
    table.insert(
        Dimension::Atividade,
        normalize_floor_cap(&column(|r| r.ativ_raw), params),
    )?;
    table.insert(
        Dimension::Engajamento,
        normalize_floor_cap(&column(|r| r.eng_raw), params),
    )?;
    table.insert(
        Dimension::Difusao,
        normalize_floor_cap(&column(|r| r.dif_raw), params),
    )?;

    Ok(table)
}

/// Weighted sum of the five dimensions per entity, with weights rescaled to
/// sum to 1 and the result clamped to `[0, 100]`. An absent dimension yields
/// `NaN` in its column and in the final score.
#[must_use]
pub fn weighted_final_score(table: &DimensionTable, weights: &DimensionWeights) -> Vec<ScoreRecord> {
    let weights = weights.normalized();

    for dimension in Dimension::ALL {
        if table.column(dimension).is_none() {
            tracing::warn!(dimension = %dimension, "dimension missing before scoring");
        }
    }

    table
        .names()
        .iter()
        .enumerate()
        .map(|(row, name)| {
            let value = |d: Dimension| table.value(d, row);
            let sum: f64 = Dimension::ALL
                .iter()
                .map(|d| weights.get(*d) * value(*d))
                .sum();
            // Rescaled weights may add up to slightly more than 1.
            let sir_final_0_100 = if sum.is_nan() { sum } else { sum.clamp(0.0, 100.0) };
            ScoreRecord {
                name: name.clone(),
                presenca_100: value(Dimension::Presenca),
                popularidade_100: value(Dimension::Popularidade),
                atividade_100: value(Dimension::Atividade),
                engajamento_100: value(Dimension::Engajamento),
                difusao_100: value(Dimension::Difusao),
                sir_final_0_100,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::types::PresenceMetadata;

    fn raw_record(name: &str, pop: f64, ativ: f64, eng: f64, dif: f64, present: usize) -> RawDimensionRecord {
        RawDimensionRecord {
            name: name.to_string(),
            pop_raw: pop,
            score_crescimento: 0.0,
            pop_final_raw: pop,
            ativ_raw: ativ,
            eng_media: eng,
            eng_raw: eng,
            dif_raw: dif,
            platforms_present: present,
        }
    }

    fn full_table(rows: &[[f64; 5]]) -> DimensionTable {
        let mut table = DimensionTable::new((0..rows.len()).map(|i| i.to_string()).collect());
        for (idx, dim) in Dimension::ALL.iter().enumerate() {
            table
                .insert(*dim, rows.iter().map(|r| r[idx]).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn normalize_dimensions_routes_presence_directly() {
        let raw = RawDimensions {
            records: vec![
                raw_record("a", 10.0, 0.0, 0.5, 2.0, 1),
                raw_record("b", 1.0, 0.0, 0.5, 0.0, 2),
            ],
            presence: PresenceMetadata {
                columns: vec!["presence_facebook".into(), "presence_twitter".into()],
            },
        };
        let table = normalize_dimensions(&raw, &NormalizationParams::default()).unwrap();
        assert_eq!(table.column(Dimension::Presenca).unwrap(), &[50.0, 100.0]);
        assert_eq!(table.column(Dimension::Popularidade).unwrap(), &[100.0, 1.0]);
        assert_eq!(table.column(Dimension::Atividade).unwrap(), &[0.0, 0.0]);
        assert_eq!(table.column(Dimension::Engajamento).unwrap(), &[49.5, 49.5]);
        assert_eq!(table.column(Dimension::Difusao).unwrap(), &[49.5, 0.0]);
    }

    #[test]
    fn final_score_uses_normalized_weights() {
        let table = full_table(&[[100.0, 50.0, 0.0, 10.0, 20.0]]);
        let weights = DimensionWeights {
            presenca: 1.0,
            popularidade: 1.0,
            atividade: 0.0,
            engajamento: 0.0,
            difusao: 2.0,
        };
        let scores = weighted_final_score(&table, &weights);
        assert_relative_eq!(scores[0].sir_final_0_100, (100.0 + 50.0 + 40.0) / 4.0);
    }

    #[test]
    fn final_score_is_zero_when_every_dimension_is_zero() {
        let table = full_table(&[[0.0; 5]]);
        let scores = weighted_final_score(&table, &DimensionWeights::default());
        assert_eq!(scores[0].sir_final_0_100, 0.0);
    }

    #[test]
    fn final_score_stays_within_bounds() {
        let table = full_table(&[[100.0; 5], [1.0, 98.0, 49.5, 0.0, 100.0], [0.0, 0.0, 0.0, 0.0, 100.0]]);
        for record in weighted_final_score(&table, &DimensionWeights::default()) {
            assert!(
                (0.0..=100.0).contains(&record.sir_final_0_100),
                "out of range: {}",
                record.sir_final_0_100
            );
        }
    }

    #[test]
    fn uneven_weights_never_push_a_perfect_row_past_100() {
        let table = full_table(&[[100.0; 5]]);
        for a in 1..=12 {
            for b in 1..=12 {
                for c in 1..=12 {
                    let weights = DimensionWeights {
                        presenca: f64::from(a) / 7.0,
                        popularidade: f64::from(b) / 3.0,
                        atividade: f64::from(c) / 11.0,
                        engajamento: 0.3,
                        difusao: 0.7,
                    };
                    let score = weighted_final_score(&table, &weights)[0].sir_final_0_100;
                    assert!((0.0..=100.0).contains(&score), "out of range: {score}");
                }
            }
        }
    }

    #[test]
    fn all_zero_weights_score_zero() {
        let table = full_table(&[[80.0; 5]]);
        let weights = DimensionWeights {
            presenca: 0.0,
            popularidade: 0.0,
            atividade: 0.0,
            engajamento: 0.0,
            difusao: 0.0,
        };
        assert_eq!(weighted_final_score(&table, &weights)[0].sir_final_0_100, 0.0);
    }

    #[test]
    fn missing_dimension_propagates_nan() {
        let mut table = DimensionTable::new(vec!["Acme".into()]);
        table.insert(Dimension::Presenca, vec![50.0]).unwrap();
        let scores = weighted_final_score(&table, &DimensionWeights::default());
        assert_eq!(scores[0].presenca_100, 50.0);
        assert!(scores[0].difusao_100.is_nan());
        assert!(scores[0].sir_final_0_100.is_nan());
    }
}
