//! CLI binary for Flight Analyzer
//!
//! Loads flight-test CSV files, prints an analysis report and writes the
//! processed data, statistics and plots.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use flight_analyzer::{
    analyze, crate_version, export_all, format_report, load_table, run_stamp, unique_output_stems,
    AnalysisOptions, ExportOptions, DEFAULT_ANOMALY_THRESHOLD, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR,
    DEFAULT_PLOT_DIR,
};
use glob::glob;
use log::{debug, info};
use std::path::{Path, PathBuf};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

fn build_command() -> Command {
    let command = Command::new("flight_analyzer")
        .version(crate_version())
        .about("Analyze flight-test sensor CSV files: statistics, processed data and HTML plots.")
        .arg(
            Arg::new("files")
                .help("Flight-test files to analyze (.csv, .tsv, .txt, case-insensitive, supports globbing)")
                .num_args(1..)
                .default_value(DEFAULT_INPUT)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug logging (RUST_LOG still overrides)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for processed CSV and statistics files")
                .value_name("DIR")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .arg(
            Arg::new("plot-dir")
                .long("plot-dir")
                .help("Directory for HTML plots")
                .value_name("DIR")
                .default_value(DEFAULT_PLOT_DIR),
        )
        .arg(
            Arg::new("no-plots")
                .long("no-plots")
                .help("Skip rendering HTML plots")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("spectra")
                .long("spectra")
                .help("Also render a frequency spectrum plot per parameter")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("anomaly-threshold")
                .long("anomaly-threshold")
                .help("Outlier threshold in standard deviations")
                .value_name("SIGMA")
                .value_parser(parse_threshold)
                .default_value("3.0"),
        );

    #[cfg(feature = "json")]
    let command = command.arg(
        Arg::new("json")
            .long("json")
            .help("Write a JSON run summary next to the processed CSV")
            .action(ArgAction::SetTrue),
    );

    command
}

/// Positive, finite number of standard deviations
fn parse_threshold(value: &str) -> Result<f64, String> {
    let sigma: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if sigma.is_finite() && sigma > 0.0 {
        Ok(sigma)
    } else {
        Err(format!("must be a positive finite number, got {value}"))
    }
}

fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        })
        .unwrap_or(false)
}

/// Expand globs and drop missing files or unsupported extensions
fn collect_input_paths(file_patterns: &[&String]) -> Vec<PathBuf> {
    let mut valid_paths = Vec::new();
    for pattern in file_patterns {
        debug!("Processing pattern: {pattern}");

        let paths: Vec<PathBuf> = if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(glob_iter) => match glob_iter.collect::<Result<Vec<_>, _>>() {
                    Ok(paths) => {
                        debug!("Glob pattern '{pattern}' matched {} files", paths.len());
                        paths
                    }
                    Err(e) => {
                        eprintln!("Error expanding glob pattern '{pattern}': {e}");
                        continue;
                    }
                },
                Err(e) => {
                    eprintln!("Invalid glob pattern '{pattern}': {e}");
                    continue;
                }
            }
        } else {
            vec![PathBuf::from(pattern.as_str())]
        };

        for path in paths {
            if !path.exists() {
                eprintln!("Warning: File does not exist: {path:?}");
                continue;
            }
            if !has_supported_extension(&path) {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
                eprintln!("Warning: Skipping file with unsupported extension '{ext}': {path:?}");
                continue;
            }
            debug!("Added valid file: {path:?}");
            valid_paths.push(path);
        }
    }
    valid_paths
}

fn export_options_from(matches: &ArgMatches) -> ExportOptions {
    #[cfg(feature = "json")]
    let json = matches.get_flag("json");
    #[cfg(not(feature = "json"))]
    let json = false;

    ExportOptions {
        processed_csv: true,
        statistics: true,
        plots: !matches.get_flag("no-plots"),
        spectra: matches.get_flag("spectra"),
        json,
        output_dir: matches.get_one::<String>("output-dir").cloned(),
        plot_dir: matches.get_one::<String>("plot-dir").cloned(),
        stem: None,
    }
}

fn process_file(
    path: &Path,
    analysis_options: &AnalysisOptions,
    export_options: &ExportOptions,
    stamp: &str,
) -> Result<()> {
    let table = load_table(path).with_context(|| format!("Failed to load {}", path.display()))?;
    info!(
        "Loaded {} rows x {} parameters from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );

    let report = analyze(&table, analysis_options);
    print!("{}", format_report(&table, &report));

    let exported = export_all(&table, &report, path, export_options, stamp)?;
    debug!("Wrote {} file(s)", exported.file_count());
    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();
    let analysis_options = AnalysisOptions {
        anomaly_threshold: matches
            .get_one::<f64>("anomaly-threshold")
            .copied()
            .unwrap_or(DEFAULT_ANOMALY_THRESHOLD),
    };
    let export_options = export_options_from(&matches);
    debug!("Input patterns: {file_patterns:?}");

    let valid_paths = collect_input_paths(&file_patterns);
    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Supported extensions: .csv, .tsv, .txt (case-insensitive)");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let stamp = run_stamp();
    let stems = unique_output_stems(&valid_paths);
    let mut processed_files = 0;

    for (index, (path, stem)) in valid_paths.iter().zip(stems).enumerate() {
        if index > 0 {
            println!();
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        let file_options = ExportOptions {
            stem: Some(stem),
            ..export_options.clone()
        };
        match process_file(path, &analysis_options, &file_options, &stamp) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}
