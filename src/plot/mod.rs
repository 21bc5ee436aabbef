//! SVG charts wrapped in standalone HTML pages

pub mod anomalies;
pub mod distribution;
pub mod dual_axis;
pub mod envelope;
pub mod heatmap;
pub mod spectrum;
pub mod time_series;

use crate::error::AnalyzerError;
use crate::export::ExportPaths;
use crate::frequency::{compute_spectrum, infer_sample_rate};
use crate::metrics::{find_altitude_column, find_speed_column};
use crate::report::AnalysisReport;
use crate::types::{Column, SampleTable};
use crate::Result;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::full_palette::{
    AMBER, BLUE_700, BROWN, GREEN_700, ORANGE, PINK, PURPLE, RED_700, TEAL,
};
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1280;
pub const PLOT_HEIGHT: u32 = 720;
pub const HEATMAP_SIZE: u32 = 900;

pub const FONT_SIZE_CHART_TITLE: u32 = 24;
pub const FONT_SIZE_AXIS_LABEL: u32 = 14;
pub const FONT_SIZE_LEGEND: u32 = 13;
pub const FONT_SIZE_CELL: u32 = 12;

pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

/// Series colors, cycled for category overviews
pub const SERIES_PALETTE: [RGBColor; 9] = [
    BLUE_700, RED_700, GREEN_700, ORANGE, PURPLE, TEAL, BROWN, PINK, AMBER,
];

pub fn series_color(index: usize) -> RGBColor {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// Calculate plot range with padding.
/// Adds 5% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.05 };
    (min - padding, max + padding)
}

/// Padded (x, y) bounds over every point of every series
pub fn data_bounds<'a, I>(points: I) -> Option<((f64, f64), (f64, f64))>
where
    I: IntoIterator<Item = &'a (f64, f64)>,
{
    let mut iter = points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite());
    let &(x0, y0) = iter.next()?;
    let (x_lo, x_hi, y_lo, y_hi) = iter.fold((x0, x0, y0, y0), |(a, b, c, d), &(x, y)| {
        (a.min(x), b.max(x), c.min(y), d.max(y))
    });
    Some((calculate_range(x_lo, x_hi), calculate_range(y_lo, y_hi)))
}

fn plot_error(e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Plot(e.to_string())
}

/// Render into an in-memory SVG document
pub fn render_svg<F>(size: (u32, u32), draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> std::result::Result<(), Box<dyn Error>>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        draw(&root).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }
    Ok(svg)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Self-contained HTML page around one inline SVG chart
pub fn html_page(title: &str, svg: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{title}</title>\n\
<style>body{{font-family:sans-serif;margin:1em;}}svg{{max-width:100%;height:auto;}}</style>\n\
</head>\n<body>\n<h1>{title}</h1>\n{svg}\n</body>\n</html>\n"
    )
}

pub fn write_html_page(path: &Path, title: &str, svg: &str) -> Result<()> {
    std::fs::write(path, html_page(title, svg))?;
    debug!("Wrote plot {}", path.display());
    Ok(())
}

fn plottable(table: &SampleTable) -> Vec<&Column> {
    table.columns.iter().filter(|c| !c.has_no_data()).collect()
}

/// Plot file for `name`, suffixed `_2`, `_3`, ... when an earlier chart of the
/// run already took that path
pub fn claim_plot_file(paths: &ExportPaths, used: &mut HashSet<PathBuf>, name: &str) -> PathBuf {
    let mut path = paths.plot_file(name);
    let mut n = 2;
    while !used.insert(path.clone()) {
        path = paths.plot_file(&format!("{name}_{n}"));
        n += 1;
    }
    path
}

/// Render every plot for one analysed file, returning the written paths
///
/// Per-parameter charts are named `<kind>_<parameter>` so they never share a
/// file with the whole-file charts. A chart that fails to render is logged and
/// skipped; the remaining charts are still written.
pub fn render_all(
    table: &SampleTable,
    report: &AnalysisReport,
    paths: &ExportPaths,
    spectra: bool,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut used = HashSet::new();
    let source = paths.stem.as_str();

    let mut emit = |name: String, title: String, svg: Result<String>| -> Result<()> {
        match svg {
            Ok(svg) => {
                let path = claim_plot_file(paths, &mut used, &name);
                write_html_page(&path, &title, &svg)?;
                written.push(path);
            }
            Err(e) => warn!("Skipping plot '{name}': {e}"),
        }
        Ok(())
    };

    let columns = plottable(table);
    for column in &columns {
        emit(
            format!("series_{}", column.name()),
            format!("{source}: {}", column.descriptor.display_name()),
            time_series::render_parameter(table, column),
        )?;
        emit(
            format!("distribution_{}", column.name()),
            format!("{source}: {} distribution", column.descriptor.display_name()),
            distribution::render_distribution(column),
        )?;
    }

    for (category, members) in &report.groups {
        let in_category: Vec<&Column> = columns
            .iter()
            .copied()
            .filter(|c| members.iter().any(|m| m == c.name()))
            .collect();
        if in_category.is_empty() {
            continue;
        }
        emit(
            format!("category_{}", category.label()),
            format!("{source}: {} parameters", category.label()),
            time_series::render_category(table, *category, &in_category),
        )?;
    }

    for anomaly in &report.anomalies {
        let Some(column) = table.column(&anomaly.parameter) else {
            continue;
        };
        emit(
            format!("anomalies_{}", column.name()),
            format!("{source}: {} anomalies", column.descriptor.display_name()),
            anomalies::render_anomalies(table, column, anomaly),
        )?;
    }

    if report.correlation.len() >= 2 {
        emit(
            "correlation".to_string(),
            format!("{source}: parameter correlation"),
            heatmap::render_correlation(&report.correlation),
        )?;
    }

    if let (Some(alt), Some(speed)) = (find_altitude_column(table), find_speed_column(table)) {
        emit(
            "envelope".to_string(),
            format!("{source}: flight envelope"),
            envelope::render_envelope(table, alt, speed),
        )?;
        emit(
            "altitude_speed".to_string(),
            format!("{source}: altitude and speed"),
            dual_axis::render_dual_axis(table, alt, speed),
        )?;
    }

    if spectra {
        let rate = infer_sample_rate(table);
        for column in &columns {
            let Some(freq) = compute_spectrum(&column.values, rate) else {
                continue;
            };
            emit(
                format!("spectrum_{}", column.name()),
                format!("{source}: {} spectrum", column.name()),
                spectrum::render_spectrum(&column.descriptor.display_name(), &freq),
            )?;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_pads_and_orders() {
        assert_eq!(calculate_range(0.0, 100.0), (-5.0, 105.0));
        assert_eq!(calculate_range(100.0, 0.0), (-5.0, 105.0));
        assert_eq!(calculate_range(3.0, 3.0), (2.5, 3.5));
    }

    #[test]
    fn test_data_bounds_skips_non_finite() {
        let points = [(0.0, 1.0), (f64::NAN, 5.0), (10.0, 3.0)];
        let ((x0, x1), (y0, y1)) = data_bounds(points.iter()).unwrap();
        assert_eq!((x0, x1), (-0.5, 10.5));
        assert_eq!((y0, y1), (0.9, 3.1));
        assert!(data_bounds([].iter()).is_none());
    }

    #[test]
    fn test_claim_plot_file_suffixes_taken_names() {
        let paths = crate::export::compute_export_paths(
            Path::new("g.csv"),
            &crate::export::ExportOptions::default(),
            "s",
        );
        let mut used = HashSet::new();
        let first = claim_plot_file(&paths, &mut used, "series_A B");
        let second = claim_plot_file(&paths, &mut used, "series_A/B");
        let third = claim_plot_file(&paths, &mut used, "series_A_B");
        assert_eq!(first, Path::new("plots/g_series_A_B_s.html"));
        assert_eq!(second, Path::new("plots/g_series_A_B_2_s.html"));
        assert_eq!(third, Path::new("plots/g_series_A_B_3_s.html"));
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn test_html_page_escapes_title() {
        let page = html_page("A <b> & \"c\"", "<svg></svg>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>A &lt;b&gt; &amp; &quot;c&quot;</title>"));
        assert!(page.contains("<svg></svg>"));
    }

    #[test]
    fn test_render_svg_produces_document() {
        let svg = render_svg((200, 100), |area| {
            area.draw(&Rectangle::new([(10, 10), (50, 50)], RED.filled()))?;
            Ok(())
        })
        .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }
}
