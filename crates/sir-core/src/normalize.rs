//! Adaptive floor/cap normalization onto `[0, 100]`.
//!
//! Non-positive raw values score 0. Positive values rescale linearly from
//! `[min_pos, max_pos]` onto `[floor, cap]`, where `cap` grows from
//! `cap_min` towards 100 as the top value pulls away from the runner-up. A
//! lone standout can reach 100 while a tight cluster stays inside
//! `[floor, cap_min]`.

use crate::app_config::NormalizationParams;

/// Approximate equality of `a` and `b`: within an absolute tolerance of
/// `1e-8` plus a relative tolerance of `1e-5` of `b`.
#[must_use]
pub(crate) fn is_close(a: f64, b: f64) -> bool {
    const RTOL: f64 = 1e-5;
    const ATOL: f64 = 1e-8;
    (a - b).abs() <= ATOL + RTOL * b.abs()
}

/// Second-highest positive value, counting ties; `0.0` with fewer than two
/// positives.
#[must_use]
pub fn second_largest_positive(values: &[f64]) -> f64 {
    let mut top = 0.0_f64;
    let mut second = 0.0_f64;
    let mut count = 0usize;
    for &v in values.iter().filter(|v| **v > 0.0) {
        count += 1;
        if v > top {
            second = top;
            top = v;
        } else if v > second {
            second = v;
        }
    }
    if count < 2 {
        0.0
    } else {
        second
    }
}

/// Ceiling for the positive range given the top two positive values.
#[must_use]
pub fn dominance_cap(max_pos: f64, second_pos: f64, params: &NormalizationParams) -> f64 {
    let ratio = if second_pos > 0.0 {
        max_pos / second_pos
    } else {
        1.0
    };

    if ratio >= params.dominance_factor {
        return 100.0;
    }

    let t = ((ratio - 1.0) / (params.dominance_factor - 1.0).max(1e-9)).clamp(0.0, 1.0);
    params.cap_min + t * (100.0 - params.cap_min)
}

/// Normalizes one raw dimension column. Non-finite inputs count as 0.
#[must_use]
pub fn normalize_floor_cap(raw: &[f64], params: &NormalizationParams) -> Vec<f64> {
    let values: Vec<f64> = raw
        .iter()
        .map(|v| if v.is_finite() { *v } else { 0.0 })
        .collect();

    let positives: Vec<f64> = values.iter().copied().filter(|v| *v > 0.0).collect();
    if positives.is_empty() {
        return vec![0.0; values.len()];
    }

    let min_pos = positives.iter().copied().fold(f64::INFINITY, f64::min);
    let max_pos = positives.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let second_pos = second_largest_positive(&positives);
    let cap = dominance_cap(max_pos, second_pos, params);

    tracing::debug!(min_pos, max_pos, second_pos, cap, "normalization range");

    if is_close(max_pos, min_pos) {
        let midpoint = 0.5 * (params.floor + cap);
        return values
            .iter()
            .map(|v| if *v > 0.0 { midpoint } else { 0.0 })
            .collect();
    }

    let span = max_pos - min_pos;
    values
        .iter()
        .map(|v| {
            if *v > 0.0 {
                params.floor + (v - min_pos) / span * (cap - params.floor)
            } else {
                0.0
            }
        })
        .collect()
}
