//! Per-file analysis pipeline and its console report

use crate::anomaly::{detect_table_anomalies, AnomalyReport, DEFAULT_ANOMALY_THRESHOLD};
use crate::categories::group_by_category;
use crate::metrics::{calculate_performance_metrics, time_analysis, FlightMetrics, TimeAnalysis};
use crate::stats::{correlation_matrix, summarize_table, CorrelationMatrix};
use crate::types::{Category, SampleTable, SummaryRecord};
use std::fmt::Write;

/// Tunables for [`analyze`]
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Outlier cutoff in standard deviations
    pub anomaly_threshold: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }
}

/// Everything derived from one loaded table
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub groups: Vec<(Category, Vec<String>)>,
    pub summaries: Vec<SummaryRecord>,
    pub correlation: CorrelationMatrix,
    pub metrics: FlightMetrics,
    pub time: Option<TimeAnalysis>,
    pub anomalies: Vec<AnomalyReport>,
}

impl AnalysisReport {
    /// Parameters reported without a full set of statistics
    pub fn flagged(&self) -> impl Iterator<Item = &SummaryRecord> {
        self.summaries.iter().filter(|s| s.is_flagged())
    }
}

pub fn analyze(table: &SampleTable, options: &AnalysisOptions) -> AnalysisReport {
    AnalysisReport {
        groups: group_by_category(table.columns.iter().map(|c| c.name())),
        summaries: summarize_table(table),
        correlation: correlation_matrix(table),
        metrics: calculate_performance_metrics(table),
        time: time_analysis(table),
        anomalies: detect_table_anomalies(table, options.anomaly_threshold),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    }
}

/// Human-readable summary printed after each file is analysed
pub fn format_report(table: &SampleTable, report: &AnalysisReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_report(&mut out, table, report);
    out
}

fn write_report(
    out: &mut String,
    table: &SampleTable,
    report: &AnalysisReport,
) -> std::fmt::Result {
    writeln!(out, "Rows       {:6}", table.row_count())?;
    writeln!(out, "Parameters {:6}", table.column_count())?;

    if let Some(time) = &report.time {
        writeln!(out, "\nTime Analysis")?;
        writeln!(out, "First      {:10.3}s", time.first_seconds)?;
        writeln!(out, "Last       {:10.3}s", time.last_seconds)?;
        writeln!(out, "Duration   {:10.3}s", time.duration_seconds)?;
        if let Some(interval) = time.first_interval_seconds {
            writeln!(out, "Interval   {:10.3}s", interval)?;
        }
        if let Some(rate) = time.sample_rate_hz {
            writeln!(out, "Rate       {:10.3}Hz", rate)?;
        }
        if time.backwards_steps > 0 {
            writeln!(
                out,
                "Warning: timestamps step backwards {} time(s)",
                time.backwards_steps
            )?;
        }
    }

    writeln!(out, "\nCategories")?;
    for (category, members) in report.groups.iter().filter(|(_, m)| !m.is_empty()) {
        writeln!(
            out,
            "{:<12} {:3}  {}",
            category.label(),
            members.len(),
            members.join(", ")
        )?;
    }

    writeln!(out, "\nStatistics")?;
    writeln!(
        out,
        "{:<28} {:>6} {:>12} {:>12} {:>12} {:>12}  status",
        "parameter", "count", "mean", "std", "min", "max"
    )?;
    for s in &report.summaries {
        writeln!(
            out,
            "{:<28} {:>6} {:>12} {:>12} {:>12} {:>12}  {}",
            s.parameter,
            s.count,
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.max),
            s.status
        )?;
    }

    let entries = report.metrics.entries();
    if !entries.is_empty() {
        writeln!(out, "\nPerformance")?;
        for (label, value) in entries {
            writeln!(out, "{:<24} {:12.3}", label, value)?;
        }
    }

    if !report.anomalies.is_empty() {
        writeln!(out, "\nAnomalies")?;
        for a in &report.anomalies {
            writeln!(
                out,
                "{:<28} {:5} sample(s) beyond {}σ",
                a.parameter,
                a.count(),
                a.threshold
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_table_from_str;
    use crate::types::SummaryStatus;

    const SAMPLE: &str = "Description,PRESSUREALTITUDE_FT,CAS_KT,JUNK\n\
EU,ft,kt,\n\
198:09:40:00.000,1000,100,x\n\
198:09:40:00.500,1010,105,\n\
198:09:40:01.000,1025,110,y\n";

    #[test]
    fn test_analyze_collects_every_section() {
        let table = load_table_from_str(SAMPLE).unwrap();
        let report = analyze(&table, &AnalysisOptions::default());

        assert_eq!(report.summaries.len(), 3);
        assert_eq!(report.summaries[2].status, SummaryStatus::NoData);
        assert_eq!(report.flagged().count(), 1);
        assert_eq!(report.correlation.names, vec!["PRESSUREALTITUDE_FT", "CAS_KT"]);
        assert_eq!(report.metrics.max_altitude, Some(1025.0));
        assert_eq!(report.time.as_ref().unwrap().duration_seconds, 1.0);
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn test_format_report_lists_parameters() {
        let table = load_table_from_str(SAMPLE).unwrap();
        let report = analyze(&table, &AnalysisOptions::default());
        let text = format_report(&table, &report);

        assert!(text.contains("Rows            3"));
        assert!(text.contains("PRESSUREALTITUDE_FT"));
        assert!(text.contains("no valid data"));
        assert!(text.contains("max_altitude"));
        assert!(!text.contains("Anomalies"));
    }
}
