//! Shared descriptive statistics.

use crate::api::MetricSummary;

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation.
pub(crate) fn population_std(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Compute mean, population std, min and max for a set of values.
/// Returns `None` for an empty slice rather than a zero-filled summary.
pub(crate) fn compute_stats(values: &[f64]) -> Option<MetricSummary> {
    let mean = mean(values)?;
    let std = population_std(values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(MetricSummary {
        mean,
        std,
        min,
        max,
        count: values.len(),
    })
}

/// Linear-interpolated quantile of an ascending-sorted slice, `q` in [0, 1].
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

pub(crate) fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}
