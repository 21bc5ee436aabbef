use crate::types::ParameterDescriptor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sensor column; `None` marks a missing or non-numeric cell
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    pub descriptor: ParameterDescriptor,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(descriptor: ParameterDescriptor, values: Vec<Option<f64>>) -> Self {
        Self { descriptor, values }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Finite values only, in row order
    pub fn valid_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| v.is_some_and(f64::is_finite))
            .count()
    }

    /// True when not a single cell parsed as a number
    pub fn has_no_data(&self) -> bool {
        self.valid_count() == 0
    }
}

/// Loaded flight-test file: raw timestamps, derived elapsed seconds and sensor columns
///
/// Every column holds exactly `timestamps.len()` values. The elapsed axis is
/// relative to the first row and is not checked for ordering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleTable {
    /// Header of the first column, e.g. "Description"
    pub timestamp_name: String,
    pub timestamp_unit: Option<String>,
    /// Timestamp strings exactly as read
    pub timestamps: Vec<String>,
    /// Seconds since the first row's timestamp
    pub elapsed: Vec<f64>,
    pub columns: Vec<Column>,
}

impl SampleTable {
    pub fn row_count(&self) -> usize {
        self.timestamps.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.descriptor.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.columns.iter().map(|c| &c.descriptor)
    }

    /// (min, max) of the elapsed axis
    pub fn elapsed_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.elapsed.iter().copied().filter(|v| v.is_finite());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn duration_seconds(&self) -> f64 {
        self.elapsed_range().map(|(lo, hi)| hi - lo).unwrap_or(0.0)
    }

    /// Average sample rate over the whole file, `None` for fewer than two rows
    /// or a zero-length time span
    pub fn sample_rate_hz(&self) -> Option<f64> {
        let duration = self.duration_seconds();
        if self.row_count() > 1 && duration > 0.0 {
            Some((self.row_count() - 1) as f64 / duration)
        } else {
            None
        }
    }

    /// (elapsed, value) pairs for a column, skipping missing cells
    pub fn series(&self, column: &Column) -> Vec<(f64, f64)> {
        self.elapsed
            .iter()
            .zip(&column.values)
            .filter_map(|(t, v)| v.filter(|v| v.is_finite()).map(|v| (*t, v)))
            .collect()
    }

    /// Rows where both columns have a value, with the row's elapsed time
    pub fn paired(&self, x: &Column, y: &Column) -> Vec<(f64, f64, f64)> {
        self.elapsed
            .iter()
            .zip(x.values.iter().zip(&y.values))
            .filter_map(|(t, (xv, yv))| match (xv, yv) {
                (Some(xv), Some(yv)) if xv.is_finite() && yv.is_finite() => Some((*xv, *yv, *t)),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> SampleTable {
        SampleTable {
            timestamp_name: "Description".to_string(),
            timestamp_unit: None,
            timestamps: vec![
                "198:09:40:00.000".to_string(),
                "198:09:40:00.500".to_string(),
                "198:09:40:01.000".to_string(),
            ],
            elapsed: vec![0.0, 0.5, 1.0],
            columns: vec![
                Column::new(
                    ParameterDescriptor::new("ALT", Some("ft".to_string())),
                    vec![Some(100.0), None, Some(120.0)],
                ),
                Column::new(
                    ParameterDescriptor::new("CAS", Some("kt".to_string())),
                    vec![Some(80.0), Some(85.0), Some(f64::NAN)],
                ),
            ],
        }
    }

    #[test]
    fn test_valid_values_skip_missing_and_nan() {
        let table = sample_table();
        assert_eq!(table.columns[0].valid_values(), vec![100.0, 120.0]);
        assert_eq!(table.columns[1].valid_count(), 2);
        assert!(!table.columns[1].has_no_data());
    }

    #[test]
    fn test_elapsed_range_and_rate() {
        let table = sample_table();
        assert_eq!(table.elapsed_range(), Some((0.0, 1.0)));
        assert_eq!(table.duration_seconds(), 1.0);
        assert_eq!(table.sample_rate_hz(), Some(2.0));
    }

    #[test]
    fn test_series_and_pairs() {
        let table = sample_table();
        let alt = &table.columns[0];
        let cas = &table.columns[1];
        assert_eq!(table.series(alt), vec![(0.0, 100.0), (1.0, 120.0)]);
        assert_eq!(table.paired(cas, alt), vec![(80.0, 100.0, 0.0)]);
        assert!(table.column("CAS").is_some());
        assert!(table.column("MACH").is_none());
    }
}
