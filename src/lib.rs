//! Flight Analyzer Library
//!
//! A Rust library for loading flight-test sensor CSV files, normalizing their
//! `DDD:HH:MM:SS.mmm` timestamps to elapsed seconds, categorizing parameters,
//! computing descriptive statistics and exporting processed data and plots.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//! - **`plot`** (default): Render HTML plots with inline SVG charts
//! - **`json`** (default): Write a JSON run summary
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Load a file and print its statistics:
//! ```rust,no_run
//! use flight_analyzer::{analyze, load_table, AnalysisOptions};
//! use std::path::Path;
//!
//! let table = load_table(Path::new("data/234_01.csv")).unwrap();
//! let report = analyze(&table, &AnalysisOptions::default());
//! for summary in &report.summaries {
//!     println!("{}: mean {:?} ({})", summary.parameter, summary.mean, summary.status);
//! }
//! ```
//!
//! Export the processed CSV and statistics:
//! ```rust,no_run
//! use flight_analyzer::{analyze, export_all, load_table, run_stamp, AnalysisOptions, ExportOptions};
//! use std::path::Path;
//!
//! let input = Path::new("data/234_01.csv");
//! let table = load_table(input).unwrap();
//! let report = analyze(&table, &AnalysisOptions::default());
//! let exported = export_all(&table, &report, input, &ExportOptions::default(), &run_stamp()).unwrap();
//! if let Some(path) = exported.processed_csv {
//!     println!("Exported to: {}", path.display());
//! }
//! ```
//!
//! # Public API
//!
//! ## Loading Functions
//! - [`load_table`] - Load a flight-test CSV/TSV file
//! - [`load_table_from_str`] - Load from in-memory text
//! - [`normalize_timestamps`] - Convert timestamp strings to elapsed seconds
//! - [`FlightTimestamp`] - One parsed `DDD:HH:MM:SS.mmm` stamp
//!
//! ## Data Types
//! - [`SampleTable`] - Timestamps, elapsed seconds and sensor columns
//! - [`ParameterDescriptor`] - Name, unit and category of a column
//! - [`SummaryRecord`] - Descriptive statistics for one column
//! - [`ExportOptions`] - Configuration for export operations
//! - [`ExportReport`] - Paths written by an export
//!
//! ## Analysis Functions
//! - [`categorize`] - Assign a parameter name to a [`Category`]
//! - [`group_by_category`] - Group parameter names by category
//! - [`summarize_table`] - Per-column statistics
//! - [`correlation_matrix`] - Pairwise Pearson correlation
//! - [`calculate_performance_metrics`] - Altitude, climb and speed figures
//! - [`detect_anomalies`] - Standard-deviation outliers
//! - [`histogram`] / [`box_summary`] - Value distribution of a column
//! - [`compute_spectrum`] - Magnitude spectrum of a column
//! - [`analyze`] - Run every analysis on a table
//!
//! ## Export Functions
//! - [`export_processed_csv`] - Table plus `Elapsed_Seconds` column
//! - [`export_statistics_csv`] - One statistics row per parameter
//! - [`export_all`] - Every enabled output for one file
//! - [`compute_export_paths`] - Helper for consistent path computation
//! - [`unique_output_stems`] - Distinct output stems for one run's inputs

// Module declarations
pub mod anomaly;
pub mod categories;
pub mod error;
pub mod export;
pub mod frequency;
pub mod metrics;
pub mod parser;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
pub mod stats;
pub mod types;

// Re-export everything from modules for convenience
pub use anomaly::*;
pub use categories::*;
pub use error::*;
pub use export::*;
pub use frequency::*;
pub use metrics::*;
pub use parser::*;
pub use report::*;
pub use stats::*;
pub use types::*;

/// Package version with the git commit it was built from, when known
pub fn crate_version() -> String {
    match option_env!("VERGEN_GIT_SHA") {
        Some(sha) if !sha.is_empty() => format!("{} ({})", env!("CARGO_PKG_VERSION"), sha),
        _ => env!("CARGO_PKG_VERSION").to_string(),
    }
}
