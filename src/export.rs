//! Export of processed data, statistics, run summaries and plots
//!
//! Every file name carries the input file stem and a run stamp
//! (`YYYYmmdd_HHMMSS`) so repeated runs never overwrite each other.

use crate::report::AnalysisReport;
use crate::types::{SampleTable, SummaryRecord};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Derived elapsed-time column appended to the processed CSV
pub const ELAPSED_COLUMN: &str = "Elapsed_Seconds";
pub const ELAPSED_UNIT: &str = "s";
pub const DEFAULT_OUTPUT_DIR: &str = "processed_data";
pub const DEFAULT_PLOT_DIR: &str = "plots";
pub const DEFAULT_INPUT: &str = "data/234_01.csv";

/// Export options for controlling output formats
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub processed_csv: bool,
    pub statistics: bool,
    pub plots: bool,
    pub spectra: bool,
    pub json: bool,
    /// Directory for CSV/JSON output (default: `processed_data`)
    pub output_dir: Option<String>,
    /// Directory for HTML plots (default: `plots`)
    pub plot_dir: Option<String>,
    /// Output file stem (default: the input file stem)
    pub stem: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            processed_csv: true,
            statistics: true,
            plots: false,
            spectra: false,
            json: false,
            output_dir: None,
            plot_dir: None,
            stem: None,
        }
    }
}

/// Paths written by [`export_all`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub processed_csv: Option<PathBuf>,
    pub statistics_csv: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub plots: Vec<PathBuf>,
}

impl ExportReport {
    pub fn file_count(&self) -> usize {
        [&self.processed_csv, &self.statistics_csv, &self.summary_json]
            .iter()
            .filter(|p| p.is_some())
            .count()
            + self.plots.len()
    }
}

/// Output locations for one input file and run stamp
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub stem: String,
    pub stamp: String,
    pub output_dir: PathBuf,
    pub plot_dir: PathBuf,
    pub processed_csv: PathBuf,
    pub statistics_csv: PathBuf,
    pub summary_json: PathBuf,
}

impl ExportPaths {
    /// `<plot_dir>/<stem>_<name>_<stamp>.html`
    pub fn plot_file(&self, name: &str) -> PathBuf {
        self.plot_dir.join(format!(
            "{}_{}_{}.html",
            self.stem,
            sanitize_file_component(name),
            self.stamp
        ))
    }
}

/// Local wall-clock stamp used in output file names
pub fn run_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Replace characters that are unsafe in file names with `_`
pub fn sanitize_file_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

fn input_stem(input_path: &Path) -> String {
    input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(sanitize_file_component)
        .unwrap_or_else(|| "flight".to_string())
}

/// One output stem per input, unique within the run
///
/// Inputs sharing a stem get their extension appended (`f_csv`, `f_txt`);
/// any stem still taken gets a `_2`, `_3`, ... suffix in input order.
pub fn unique_output_stems(inputs: &[PathBuf]) -> Vec<String> {
    let stems: Vec<String> = inputs.iter().map(|p| input_stem(p)).collect();
    let mut used = HashSet::new();
    inputs
        .iter()
        .zip(&stems)
        .map(|(path, stem)| {
            let shared = stems.iter().filter(|s| *s == stem).count() > 1;
            let base = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if shared => {
                    format!("{stem}_{}", sanitize_file_component(&ext.to_ascii_lowercase()))
                }
                _ => stem.clone(),
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while !used.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// Compute every output path for `input_path` without touching the filesystem
pub fn compute_export_paths(input_path: &Path, options: &ExportOptions, stamp: &str) -> ExportPaths {
    let stem = match options.stem.as_deref() {
        Some(stem) => sanitize_file_component(stem),
        None => input_stem(input_path),
    };
    let output_dir = PathBuf::from(options.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR));
    let plot_dir = PathBuf::from(options.plot_dir.as_deref().unwrap_or(DEFAULT_PLOT_DIR));

    ExportPaths {
        processed_csv: output_dir.join(format!("{stem}_processed_{stamp}.csv")),
        statistics_csv: output_dir.join(format!("{stem}_statistics_{stamp}.csv")),
        summary_json: output_dir.join(format!("{stem}_summary_{stamp}.json")),
        stem,
        stamp: stamp.to_string(),
        output_dir,
        plot_dir,
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        log::debug!("Created output directory: {dir:?}");
    }
    Ok(())
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the table with both header rows and an appended elapsed-seconds column
///
/// A source column already named [`ELAPSED_COLUMN`] is replaced by the derived one.
pub fn export_processed_csv(table: &SampleTable, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));

    let columns: Vec<_> = table
        .columns
        .iter()
        .filter(|c| c.name() != ELAPSED_COLUMN)
        .collect();

    let mut names = vec![table.timestamp_name.as_str()];
    names.extend(columns.iter().map(|c| c.name()));
    names.push(ELAPSED_COLUMN);
    writer.write_record(&names)?;

    let mut units = vec![table.timestamp_unit.as_deref().unwrap_or("")];
    units.extend(columns.iter().map(|c| c.descriptor.unit_or_empty()));
    units.push(ELAPSED_UNIT);
    writer.write_record(&units)?;

    let mut row: Vec<String> = Vec::with_capacity(columns.len() + 2);
    for (i, timestamp) in table.timestamps.iter().enumerate() {
        row.clear();
        row.push(timestamp.clone());
        row.extend(
            columns
                .iter()
                .map(|c| format_number(c.values.get(i).copied().flatten())),
        );
        row.push(format_number(table.elapsed.get(i).copied()));
        writer.write_record(&row)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}

pub const STATISTICS_HEADER: [&str; 12] = [
    "parameter", "unit", "category", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    "status",
];

/// One row per parameter; undefined statistics are empty cells
pub fn export_statistics_csv(summaries: &[SummaryRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(file));
    writer.write_record(STATISTICS_HEADER)?;

    for s in summaries {
        writer.write_record([
            s.parameter.clone(),
            s.unit.clone().unwrap_or_default(),
            s.category.label().to_string(),
            s.count.to_string(),
            format_number(s.mean),
            format_number(s.std),
            format_number(s.min),
            format_number(s.q25),
            format_number(s.median),
            format_number(s.q75),
            format_number(s.max),
            s.status.label().to_string(),
        ])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}

#[cfg(feature = "json")]
mod summary_json {
    use super::*;
    use crate::metrics::FlightMetrics;
    use crate::types::Category;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct SensorEntry {
        pub name: String,
        pub unit: Option<String>,
        pub category: Category,
        pub valid_count: usize,
    }

    /// Run summary written next to the processed CSV
    #[derive(Debug, Serialize)]
    pub struct RunSummary {
        pub source_file: String,
        pub total_records: usize,
        pub elapsed_start: Option<f64>,
        pub elapsed_end: Option<f64>,
        pub duration_seconds: f64,
        pub sensors: Vec<SensorEntry>,
        pub flagged_parameters: Vec<String>,
        pub metrics: FlightMetrics,
        pub analysis_timestamp: String,
    }

    impl RunSummary {
        pub fn new(table: &SampleTable, report: &AnalysisReport, input_path: &Path) -> Self {
            let range = table.elapsed_range();
            Self {
                source_file: input_path.display().to_string(),
                total_records: table.row_count(),
                elapsed_start: range.map(|r| r.0),
                elapsed_end: range.map(|r| r.1),
                duration_seconds: table.duration_seconds(),
                sensors: table
                    .columns
                    .iter()
                    .map(|c| SensorEntry {
                        name: c.name().to_string(),
                        unit: c.descriptor.unit.clone(),
                        category: c.descriptor.category,
                        valid_count: c.valid_count(),
                    })
                    .collect(),
                flagged_parameters: report.flagged().map(|s| s.parameter.clone()).collect(),
                metrics: report.metrics.clone(),
                analysis_timestamp: chrono::Local::now().to_rfc3339(),
            }
        }
    }

    pub fn export_summary_json(summary: &RunSummary, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), summary)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        Ok(())
    }
}

#[cfg(feature = "json")]
pub use summary_json::{export_summary_json, RunSummary, SensorEntry};

/// Write every enabled output for one analysed file
pub fn export_all(
    table: &SampleTable,
    report: &AnalysisReport,
    input_path: &Path,
    options: &ExportOptions,
    stamp: &str,
) -> Result<ExportReport> {
    let paths = compute_export_paths(input_path, options, stamp);
    let mut exported = ExportReport::default();

    if options.processed_csv || options.statistics || options.json {
        ensure_dir(&paths.output_dir)?;
    }

    if options.processed_csv {
        export_processed_csv(table, &paths.processed_csv)?;
        println!("Exported processed data to: {}", paths.processed_csv.display());
        exported.processed_csv = Some(paths.processed_csv.clone());
    }

    if options.statistics {
        export_statistics_csv(&report.summaries, &paths.statistics_csv)?;
        println!("Exported statistics to: {}", paths.statistics_csv.display());
        exported.statistics_csv = Some(paths.statistics_csv.clone());
    }

    #[cfg(feature = "json")]
    if options.json {
        let summary = RunSummary::new(table, report, input_path);
        export_summary_json(&summary, &paths.summary_json)?;
        println!("Exported run summary to: {}", paths.summary_json.display());
        exported.summary_json = Some(paths.summary_json.clone());
    }
    #[cfg(not(feature = "json"))]
    if options.json {
        log::warn!("JSON summary requested but the `json` feature is disabled");
    }

    #[cfg(feature = "plot")]
    if options.plots {
        ensure_dir(&paths.plot_dir)?;
        exported.plots = crate::plot::render_all(table, report, &paths, options.spectra)?;
        println!(
            "Exported {} plot(s) to: {}",
            exported.plots.len(),
            paths.plot_dir.display()
        );
    }
    #[cfg(not(feature = "plot"))]
    if options.plots {
        log::warn!("Plots requested but the `plot` feature is disabled");
    }

    Ok(exported)
}
