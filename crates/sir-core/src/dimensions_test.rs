use approx::assert_relative_eq;

use super::*;
use crate::table::{Cell, Column, Table};

fn table(columns: Vec<(&str, Vec<Cell>)>) -> Table {
    Table::from_columns(
        columns
            .into_iter()
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    )
    .unwrap()
}

fn nums(values: &[f64]) -> Vec<Cell> {
    values.iter().copied().map(Cell::Number).collect()
}

// ---------------------------------------------------------------------------
// min_max_preserving_zero
// ---------------------------------------------------------------------------

#[test]
fn min_max_scales_onto_unit_interval() {
    assert_eq!(min_max_preserving_zero(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
}

#[test]
fn min_max_constant_column_maps_non_zero_to_half() {
    assert_eq!(min_max_preserving_zero(&[7.0, 7.0]), vec![0.5, 0.5]);
    assert_eq!(min_max_preserving_zero(&[0.0, 0.0]), vec![0.0, 0.0]);
    assert_eq!(min_max_preserving_zero(&[3.0]), vec![0.5]);
}

#[test]
fn min_max_empty_is_empty() {
    assert!(min_max_preserving_zero(&[]).is_empty());
}

// ---------------------------------------------------------------------------
// compute_dimensions_raw
// ---------------------------------------------------------------------------

#[test]
fn popularity_and_activity_sum_platform_columns() {
    let t = table(vec![
        ("name", vec!["a".into(), "b".into()]),
        ("fans_facebook", nums(&[100.0, 10.0])),
        ("fans_tiktok", vec![Cell::Number(50.0), Cell::Missing]),
        ("posts_twitter", nums(&[3.0, 4.0])),
        ("posts_instagram", nums(&[1.0, 0.0])),
    ]);
    let dims = compute_dimensions_raw(&t);
    assert_eq!(dims.records[0].pop_raw, 150.0);
    assert_eq!(dims.records[1].pop_raw, 10.0);
    assert_eq!(dims.records[0].ativ_raw, 4.0);
    assert_eq!(dims.records[1].ativ_raw, 4.0);
}

#[test]
fn missing_groups_contribute_zero() {
    let t = table(vec![("name", vec!["solo".into()])]);
    let dims = compute_dimensions_raw(&t);
    let r = &dims.records[0];
    assert_eq!(r.name, "solo");
    assert_eq!(r.pop_raw, 0.0);
    assert_eq!(r.score_crescimento, 0.0);
    assert_eq!(r.pop_final_raw, 0.0);
    assert_eq!(r.ativ_raw, 0.0);
    assert_eq!(r.eng_raw, 0.0);
    assert_eq!(r.dif_raw, 0.0);
    assert_eq!(r.platforms_present, 0);
    assert!(dims.presence.columns.is_empty());
}

#[test]
fn growth_blends_normalized_variations() {
    let t = table(vec![
        ("name", vec!["a".into(), "b".into()]),
        ("fans_facebook", nums(&[200.0, 100.0])),
        ("var_fans_facebook", nums(&[10.0, 0.0])),
        ("var_likes_instagram", nums(&[0.0, 5.0])),
        ("var_engagement_twitter", nums(&[0.2, 0.1])),
    ]);
    let dims = compute_dimensions_raw(&t);
    let a = &dims.records[0];
    let b = &dims.records[1];

    // a: vf = 1, vr = 0, ve = 1 => 5/8; b: vf = 0, vr = 1, ve = 0 => 1/8.
    assert_relative_eq!(a.score_crescimento, 5.0 / 8.0, epsilon = 1e-12);
    assert_relative_eq!(b.score_crescimento, 1.0 / 8.0, epsilon = 1e-12);
    assert_relative_eq!(a.pop_final_raw, 0.9 * 200.0 + 0.1 * (5.0 / 8.0) * 200.0, epsilon = 1e-12);
    assert_relative_eq!(b.pop_final_raw, 0.9 * 100.0 + 0.1 * (1.0 / 8.0) * 200.0, epsilon = 1e-12);
}

#[test]
fn growth_uses_unit_scale_when_popularity_is_tiny() {
    let t = table(vec![
        ("name", vec!["a".into()]),
        ("var_fans_tiktok", nums(&[4.0])),
    ]);
    let r = &compute_dimensions_raw(&t).records[0];
    // lone non-zero variation => 0.5, growth = 1.5 / 8, pop max floored at 1.
    assert_relative_eq!(r.score_crescimento, 1.5 / 8.0, epsilon = 1e-12);
    assert_relative_eq!(r.pop_final_raw, 0.1 * (1.5 / 8.0), epsilon = 1e-12);
}

#[test]
fn engagement_averages_tracked_columns_and_adds_reactions() {
    let t = table(vec![
        ("name", vec!["a".into(), "b".into()]),
        ("engagement_facebook", nums(&[0.4, 0.1])),
        ("engagement_instagram", vec![Cell::Number(0.2), Cell::Missing]),
        ("likes_facebook", nums(&[30.0, 10.0])),
        ("comments_tiktok", nums(&[0.0, 0.0])),
    ]);
    let dims = compute_dimensions_raw(&t);
    assert_relative_eq!(dims.records[0].eng_media, 0.3, epsilon = 1e-12);
    assert_relative_eq!(dims.records[1].eng_media, 0.05, epsilon = 1e-12);
    assert_relative_eq!(dims.records[0].eng_raw, 0.3 + 0.1, epsilon = 1e-12);
    assert_relative_eq!(dims.records[1].eng_raw, 0.05, epsilon = 1e-12);
}

#[test]
fn diffusion_excludes_instagram_shares() {
    let t = table(vec![
        ("name", vec!["a".into()]),
        ("shares_facebook", nums(&[5.0])),
        ("shares_instagram", nums(&[1000.0])),
        ("shares_twitter", nums(&[2.0])),
        ("shares_tiktok", nums(&[3.0])),
    ]);
    assert_eq!(compute_dimensions_raw(&t).records[0].dif_raw, 10.0);
}

#[test]
fn blank_names_fall_back_to_row_position() {
    let t = table(vec![
        ("name", vec!["Acme".into(), "  ".into(), Cell::Missing]),
        ("fans_facebook", nums(&[1.0, 2.0, 3.0])),
    ]);
    let names: Vec<_> = compute_dimensions_raw(&t)
        .records
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Acme", "1", "2"]);
}

// ---------------------------------------------------------------------------
// presence_scores
// ---------------------------------------------------------------------------

#[test]
fn two_of_four_platforms_present_scores_fifty() {
    let t = table(vec![
        ("name", vec!["a".into(), "b".into()]),
        ("presence_facebook", nums(&[1.0, 0.0])),
        ("presence_instagram", nums(&[1.0, 0.0])),
        ("presence_twitter", nums(&[0.0, 1.0])),
        ("presence_tiktok", vec![Cell::Missing, Cell::Missing]),
    ]);
    let dims = compute_dimensions_raw(&t);
    assert_eq!(dims.presence.columns.len(), 4);
    assert_eq!(presence_scores(&dims), vec![50.0, 25.0]);
}

#[test]
fn presence_without_columns_is_zero() {
    let t = table(vec![
        ("name", vec!["a".into()]),
        ("fans_facebook", nums(&[9.0])),
    ]);
    assert_eq!(presence_scores(&compute_dimensions_raw(&t)), vec![0.0]);
}
