// Value distribution: histogram next to a box plot

use super::{
    calculate_range, render_svg, series_color, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE,
    PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::error::AnalyzerError;
use crate::stats::{box_summary, histogram, BoxSummary, Histogram, HISTOGRAM_BINS};
use crate::types::Column;
use crate::Result;
use plotters::prelude::*;
use std::error::Error;

const BOX_LEFT: f64 = 0.3;
const BOX_RIGHT: f64 = 0.7;
const WHISKER_CAP: f64 = 0.08;
const OUTLIER_SIZE: u32 = 5;

type DrawResult = std::result::Result<(), Box<dyn Error>>;

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    hist: &Histogram,
    x_label: &str,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let (x_min, x_max) = calculate_range(hist.min, hist.bin_edges(hist.counts.len() - 1).1);
    let peak = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let color = series_color(0);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Histogram ({} bins)", hist.counts.len()),
            ("sans-serif", FONT_SIZE_AXIS_LABEL + 4),
        )
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..peak * 1.1)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    chart.draw_series(hist.counts.iter().enumerate().filter(|(_, c)| **c > 0).map(
        |(i, &count)| {
            let (lo, hi) = hist.bin_edges(i);
            Rectangle::new([(lo, 0.0), (hi, count as f64)], color.mix(0.7).filled())
        },
    ))?;
    Ok(())
}

fn draw_box<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    summary: &BoxSummary,
    y_label: &str,
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let lowest = summary
        .outliers
        .first()
        .copied()
        .unwrap_or(summary.lower_whisker)
        .min(summary.lower_whisker);
    let highest = summary
        .outliers
        .last()
        .copied()
        .unwrap_or(summary.upper_whisker)
        .max(summary.upper_whisker);
    let (y_min, y_max) = calculate_range(lowest, highest);
    let color = series_color(0);
    let center = (BOX_LEFT + BOX_RIGHT) / 2.0;

    let mut chart = ChartBuilder::on(area)
        .caption("Box plot", ("sans-serif", FONT_SIZE_AXIS_LABEL + 4))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..1.0, y_min..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(y_label)
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    chart.draw_series([
        Rectangle::new(
            [(BOX_LEFT, summary.q25), (BOX_RIGHT, summary.q75)],
            color.mix(0.3).filled(),
        ),
        Rectangle::new(
            [(BOX_LEFT, summary.q25), (BOX_RIGHT, summary.q75)],
            color.stroke_width(1),
        ),
    ])?;

    let segments = [
        [(BOX_LEFT, summary.median), (BOX_RIGHT, summary.median)],
        [(center, summary.q75), (center, summary.upper_whisker)],
        [(center, summary.q25), (center, summary.lower_whisker)],
        [
            (center - WHISKER_CAP, summary.upper_whisker),
            (center + WHISKER_CAP, summary.upper_whisker),
        ],
        [
            (center - WHISKER_CAP, summary.lower_whisker),
            (center + WHISKER_CAP, summary.lower_whisker),
        ],
    ];
    chart.draw_series(
        segments
            .iter()
            .map(|seg| PathElement::new(seg.to_vec(), BLACK.stroke_width(2))),
    )?;

    chart.draw_series(
        summary
            .outliers
            .iter()
            .map(|&v| Cross::new((center, v), OUTLIER_SIZE, RED.stroke_width(2))),
    )?;
    Ok(())
}

/// Histogram and box plot of one parameter's valid values
pub fn render_distribution(column: &Column) -> Result<String> {
    let values = column.valid_values();
    let label = column.descriptor.display_name();
    let (Some(hist), Some(summary)) = (histogram(&values, HISTOGRAM_BINS), box_summary(&values))
    else {
        return Err(AnalyzerError::Plot(format!("{}: no finite data", column.name())));
    };

    render_svg((PLOT_WIDTH, PLOT_HEIGHT), |root| -> DrawResult {
        let root = root.titled(
            &format!("{label} distribution"),
            ("sans-serif", FONT_SIZE_CHART_TITLE),
        )?;
        let (left, right) = root.split_horizontally(PLOT_WIDTH * 2 / 3);
        draw_histogram(&left, &hist, &label)?;
        draw_box(&right, &summary, &label)?;
        Ok(())
    })
}
