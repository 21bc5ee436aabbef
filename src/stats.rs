//! Descriptive statistics and correlation for sensor columns
//!
//! Missing and non-finite cells are skipped everywhere. Statistics that cannot
//! be computed are `None` and the record is flagged through its status rather
//! than failing the run.

use crate::types::{Column, SampleTable, SummaryRecord, SummaryStatus};

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n - 1 denominator), `None` below two values
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Quantile of already sorted data with linear interpolation between ranks
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Summary record for one column
pub fn summarize_column(column: &Column) -> SummaryRecord {
    let mut values = column.valid_values();
    values.sort_by(f64::total_cmp);
    let count = values.len();

    let status = match count {
        0 => SummaryStatus::NoData,
        1 => SummaryStatus::InsufficientData,
        _ => SummaryStatus::Ok,
    };

    SummaryRecord {
        parameter: column.descriptor.name.clone(),
        unit: column.descriptor.unit.clone(),
        category: column.descriptor.category,
        count,
        mean: mean(&values),
        std: sample_std(&values),
        min: values.first().copied(),
        q25: quantile_sorted(&values, 0.25),
        median: quantile_sorted(&values, 0.5),
        q75: quantile_sorted(&values, 0.75),
        max: values.last().copied(),
        status,
    }
}

/// Summary records for every column in source order
pub fn summarize_table(table: &SampleTable) -> Vec<SummaryRecord> {
    table.columns.iter().map(summarize_column).collect()
}

/// Pearson correlation over rows where both series have a finite value
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Square matrix of pairwise correlations; `None` cells are undefined
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.names.iter().position(|n| n == row)?;
        let j = self.names.iter().position(|n| n == col)?;
        self.values[i][j]
    }
}

/// Correlation between every pair of columns with at least two valid values
pub fn correlation_matrix(table: &SampleTable) -> CorrelationMatrix {
    let columns: Vec<&Column> = table
        .columns
        .iter()
        .filter(|c| c.valid_count() >= 2)
        .collect();

    let values = columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| pearson(&a.values, &b.values))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        names: columns.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}

/// Bin count for distribution histograms
pub const HISTOGRAM_BINS: usize = 30;

/// Equal-width bins over `[min, max]`; the last bin includes `max`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// (lower, upper) edge of bin `i`
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let lo = self.min + i as f64 * self.bin_width;
        (lo, lo + self.bin_width)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Histogram of the finite values, `None` when there are none or `bins` is zero
///
/// A constant series gets a unit-wide range centred on its value.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return None;
    }
    let (lo, hi) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (min, max) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let bin_width = (max - min) / bins as f64;

    let mut counts = vec![0; bins];
    for v in finite {
        let idx = (((v - min) / bin_width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram {
        min,
        bin_width,
        counts,
    })
}

/// Whisker reach in interquartile ranges
pub const BOX_WHISKER_IQR: f64 = 1.5;

/// Five-number box-plot summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    /// Smallest value within `q25 - 1.5 * IQR`
    pub lower_whisker: f64,
    /// Largest value within `q75 + 1.5 * IQR`
    pub upper_whisker: f64,
    /// Values beyond the whiskers, ascending
    pub outliers: Vec<f64>,
}

pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let q25 = quantile_sorted(&sorted, 0.25)?;
    let median = quantile_sorted(&sorted, 0.5)?;
    let q75 = quantile_sorted(&sorted, 0.75)?;
    let reach = BOX_WHISKER_IQR * (q75 - q25);
    let (lo_fence, hi_fence) = (q25 - reach, q75 + reach);

    let within = |v: &f64| (lo_fence..=hi_fence).contains(v);
    let lower_whisker = sorted.iter().copied().find(within).unwrap_or(q25);
    let upper_whisker = sorted.iter().copied().rev().find(within).unwrap_or(q75);
    let outliers = sorted.iter().copied().filter(|v| !within(v)).collect();

    Some(BoxSummary {
        q25,
        median,
        q75,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, ParameterDescriptor};

    fn column(name: &str, values: Vec<Option<f64>>) -> Column {
        Column::new(ParameterDescriptor::new(name, None), values)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_summary_matches_describe() {
        let col = column(
            "CAS",
            vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)],
        );
        let rec = summarize_column(&col);
        assert_eq!(rec.count, 4);
        assert_eq!(rec.category, Category::Speed);
        assert_eq!(rec.mean, Some(2.5));
        assert!(approx(rec.std.unwrap(), 1.2909944487358056));
        assert_eq!(rec.min, Some(1.0));
        assert_eq!(rec.q25, Some(1.75));
        assert_eq!(rec.median, Some(2.5));
        assert_eq!(rec.q75, Some(3.25));
        assert_eq!(rec.max, Some(4.0));
        assert_eq!(rec.status, SummaryStatus::Ok);
        assert!(!rec.is_flagged());
    }

    #[test]
    fn test_single_value_has_no_std() {
        let rec = summarize_column(&column("ALT", vec![None, Some(7.0)]));
        assert_eq!(rec.count, 1);
        assert_eq!(rec.mean, Some(7.0));
        assert_eq!(rec.std, None);
        assert_eq!(rec.min, Some(7.0));
        assert_eq!(rec.max, Some(7.0));
        assert_eq!(rec.status, SummaryStatus::InsufficientData);
        assert!(rec.is_flagged());
    }

    #[test]
    fn test_all_missing_column_is_flagged_not_fatal() {
        let rec = summarize_column(&column("JUNK", vec![None, None, None]));
        assert_eq!(rec.count, 0);
        assert_eq!(rec.mean, None);
        assert_eq!(rec.std, None);
        assert_eq!(rec.min, None);
        assert_eq!(rec.max, None);
        assert_eq!(rec.median, None);
        assert_eq!(rec.status, SummaryStatus::NoData);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let rec = summarize_column(&column(
            "X",
            vec![Some(f64::NAN), Some(1.0), Some(f64::INFINITY), Some(3.0)],
        ));
        assert_eq!(rec.count, 2);
        assert_eq!(rec.mean, Some(2.0));
        assert_eq!(rec.max, Some(3.0));
    }

    #[test]
    fn test_variance_helpers() {
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(sample_variance(&[5.0]), None);
        assert_eq!(sample_variance(&[2.0, 4.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(quantile_sorted(&[1.0], 0.5), Some(1.0));
        assert_eq!(quantile_sorted(&[1.0, 2.0], 1.5), None);
    }

    #[test]
    fn test_pearson() {
        let x = vec![Some(1.0), Some(2.0), Some(3.0), None];
        let y = vec![Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        let z = vec![Some(3.0), Some(2.0), Some(1.0), Some(0.0)];
        assert!(approx(pearson(&x, &y).unwrap(), 1.0));
        assert!(approx(pearson(&x, &z).unwrap(), -1.0));

        let flat = vec![Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert_eq!(pearson(&x, &flat), None);
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }

    #[test]
    fn test_correlation_matrix_skips_empty_columns() {
        let table = SampleTable {
            timestamp_name: "Time".to_string(),
            timestamp_unit: None,
            timestamps: vec!["a".into(), "b".into(), "c".into()],
            elapsed: vec![0.0, 1.0, 2.0],
            columns: vec![
                column("A", vec![Some(1.0), Some(2.0), Some(3.0)]),
                column("EMPTY", vec![None, None, None]),
                column("B", vec![Some(3.0), Some(1.0), Some(2.0)]),
            ],
        };
        let matrix = correlation_matrix(&table);
        assert_eq!(matrix.names, vec!["A", "B"]);
        assert_eq!(matrix.len(), 2);
        assert!(approx(matrix.get("A", "A").unwrap(), 1.0));
        assert!(approx(matrix.get("A", "B").unwrap(), -0.5));
        assert_eq!(matrix.get("A", "EMPTY"), None);
    }

    #[test]
    fn test_histogram_bins_include_extremes() {
        let values: Vec<f64> = (0..=30).map(f64::from).collect();
        let hist = histogram(&values, HISTOGRAM_BINS).unwrap();
        assert_eq!(hist.counts.len(), 30);
        assert_eq!(hist.total(), 31);
        assert_eq!(hist.min, 0.0);
        assert!(approx(hist.bin_width, 1.0));
        // 29.0 and 30.0 both land in the last bin
        assert_eq!(hist.counts[29], 2);
        assert_eq!(hist.bin_edges(29), (29.0, 30.0));
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let hist = histogram(&[4.0, 4.0, f64::NAN], 10).unwrap();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.min, 3.5);
        assert_eq!(histogram(&[], 10), None);
        assert_eq!(histogram(&[1.0], 0), None);
    }

    #[test]
    fn test_box_summary_separates_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let b = box_summary(&values).unwrap();
        assert_eq!(b.q25, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q75, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(box_summary(&[]), None);
    }
}
