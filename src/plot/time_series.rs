// Line charts of parameters against elapsed time

use super::{
    data_bounds, render_svg, series_color, PlotSeries, FONT_SIZE_AXIS_LABEL,
    FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT, PLOT_HEIGHT,
    PLOT_WIDTH,
};
use crate::error::AnalyzerError;
use crate::types::{Category, Column, SampleTable};
use crate::Result;
use plotters::prelude::*;
use std::error::Error;

/// Draw one or more series sharing the elapsed-time x axis
pub fn draw_line_chart(title: &str, y_label: &str, series: &[PlotSeries]) -> Result<String> {
    draw_line_chart_with_axis(title, "Elapsed time (s)", y_label, series)
}

pub fn draw_line_chart_with_axis(
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[PlotSeries],
) -> Result<String> {
    let Some(((x_min, x_max), (y_min, y_max))) =
        data_bounds(series.iter().flat_map(|s| s.data.iter()))
    else {
        return Err(AnalyzerError::Plot(format!("{title}: no finite data")));
    };

    render_svg((PLOT_WIDTH, PLOT_HEIGHT), |root| -> std::result::Result<(), Box<dyn Error>> {
        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", FONT_SIZE_CHART_TITLE))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(12)
            .y_labels(10)
            .light_line_style(WHITE.mix(0.7))
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        for s in series {
            let color = s.color;
            chart
                .draw_series(LineSeries::new(
                    s.data.iter().copied(),
                    color.stroke_width(s.stroke_width),
                ))?
                .label(&s.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
                });
        }

        if series.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .label_font(("sans-serif", FONT_SIZE_LEGEND))
                .draw()?;
        }
        Ok(())
    })
}

/// Time series of a single parameter
pub fn render_parameter(table: &SampleTable, column: &Column) -> Result<String> {
    let label = column.descriptor.display_name();
    let series = PlotSeries {
        data: table.series(column),
        label: label.clone(),
        color: series_color(0),
        stroke_width: LINE_WIDTH_PLOT + 1,
    };
    draw_line_chart(&format!("{label} vs time"), &label, &[series])
}

/// Overview of every parameter in one category on a shared axis
pub fn render_category(
    table: &SampleTable,
    category: Category,
    columns: &[&Column],
) -> Result<String> {
    let series: Vec<PlotSeries> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| PlotSeries {
            data: table.series(c),
            label: c.descriptor.display_name(),
            color: series_color(i),
            stroke_width: LINE_WIDTH_PLOT,
        })
        .collect();
    draw_line_chart(
        &format!("{} parameters", category.label()),
        category.label(),
        &series,
    )
}
