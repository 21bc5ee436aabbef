//! Standard-deviation outlier detection

use crate::stats::{mean, sample_std};
use crate::types::SampleTable;

pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 3.0;

/// Row indices whose value lies more than `threshold` standard deviations from the mean
///
/// Missing cells are never anomalies. Fewer than two valid values, or zero
/// spread, yields no anomalies.
pub fn detect_anomalies(values: &[Option<f64>], threshold: f64) -> Vec<usize> {
    let valid: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    let (Some(mean), Some(std)) = (mean(&valid), sample_std(&valid)) else {
        return Vec::new();
    };
    if std <= 0.0 {
        return Vec::new();
    }
    let limit = threshold * std;

    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| match v {
            Some(v) if v.is_finite() && (v - mean).abs() > limit => Some(i),
            _ => None,
        })
        .collect()
}

/// Outliers found in one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyReport {
    pub parameter: String,
    pub threshold: f64,
    pub indices: Vec<usize>,
}

impl AnomalyReport {
    pub fn count(&self) -> usize {
        self.indices.len()
    }
}

/// Anomaly reports for every parameter with at least one outlier
pub fn detect_table_anomalies(table: &SampleTable, threshold: f64) -> Vec<AnomalyReport> {
    table
        .columns
        .iter()
        .filter_map(|c| {
            let indices = detect_anomalies(&c.values, threshold);
            (!indices.is_empty()).then(|| AnomalyReport {
                parameter: c.name().to_string(),
                threshold,
                indices,
            })
        })
        .collect()
}
