// Time series with outlying samples marked

use super::{
    data_bounds, render_svg, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND,
    LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::anomaly::AnomalyReport;
use crate::error::AnalyzerError;
use crate::types::{Column, SampleTable};
use crate::Result;
use plotters::prelude::*;
use plotters::style::colors::full_palette::BLUE_700;
use std::collections::HashSet;
use std::error::Error;

const NORMAL_POINT_RADIUS: u32 = 2;
const ANOMALY_MARKER_SIZE: u32 = 7;

/// (normal, anomalous) (elapsed, value) points of a column
pub fn split_anomalies(
    table: &SampleTable,
    column: &Column,
    indices: &[usize],
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let flagged: HashSet<usize> = indices.iter().copied().collect();
    let mut normal = Vec::new();
    let mut anomalous = Vec::new();
    for (i, (t, v)) in table.elapsed.iter().zip(&column.values).enumerate() {
        let Some(v) = v.filter(|v| v.is_finite()) else {
            continue;
        };
        if flagged.contains(&i) {
            anomalous.push((*t, v));
        } else {
            normal.push((*t, v));
        }
    }
    (normal, anomalous)
}

/// Normal samples as a line with markers, anomalies as red crosses
pub fn render_anomalies(
    table: &SampleTable,
    column: &Column,
    report: &AnomalyReport,
) -> Result<String> {
    let (normal, anomalous) = split_anomalies(table, column, &report.indices);
    let Some(((x_min, x_max), (y_min, y_max))) = data_bounds(normal.iter().chain(&anomalous))
    else {
        return Err(AnalyzerError::Plot(format!("{}: no finite data", column.name())));
    };
    let label = column.descriptor.display_name();
    let title = format!(
        "Anomaly detection: {label} ({} beyond {}σ)",
        anomalous.len(),
        report.threshold
    );

    render_svg((PLOT_WIDTH, PLOT_HEIGHT), |root| -> std::result::Result<(), Box<dyn Error>> {
        let mut chart = ChartBuilder::on(root)
            .caption(&title, ("sans-serif", FONT_SIZE_CHART_TITLE))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Elapsed time (s)")
            .y_desc(label.as_str())
            .light_line_style(WHITE.mix(0.7))
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                normal.iter().copied(),
                BLUE_700.stroke_width(LINE_WIDTH_PLOT),
            ))?
            .label("Normal")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], BLUE_700.stroke_width(LINE_WIDTH_LEGEND))
            });
        chart.draw_series(
            normal
                .iter()
                .map(|&p| Circle::new(p, NORMAL_POINT_RADIUS, BLUE_700.filled())),
        )?;

        chart
            .draw_series(
                anomalous
                    .iter()
                    .map(|&p| Cross::new(p, ANOMALY_MARKER_SIZE, RED.stroke_width(2))),
            )?
            .label("Anomalies")
            .legend(|(x, y)| Cross::new((x + 10, y), ANOMALY_MARKER_SIZE, RED.stroke_width(2)));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::detect_anomalies;
    use crate::types::ParameterDescriptor;

    fn spiky_table() -> SampleTable {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some((i % 2) as f64)).collect();
        values[12] = Some(50.0);
        values[3] = None;
        SampleTable {
            timestamp_name: "Time".to_string(),
            timestamp_unit: None,
            timestamps: vec![String::new(); 20],
            elapsed: (0..20).map(|i| i as f64 * 0.1).collect(),
            columns: vec![Column::new(
                ParameterDescriptor::new("PITCHRATE_DPS", Some("deg/s".to_string())),
                values,
            )],
        }
    }

    #[test]
    fn test_split_anomalies_skips_missing_cells() {
        let table = spiky_table();
        let column = &table.columns[0];
        let indices = detect_anomalies(&column.values, 3.0);
        assert_eq!(indices, vec![12]);

        let (normal, anomalous) = split_anomalies(&table, column, &indices);
        assert_eq!(normal.len(), 18);
        assert_eq!(anomalous, vec![(table.elapsed[12], 50.0)]);
    }

    #[test]
    fn test_render_anomalies_titles_count() {
        let table = spiky_table();
        let column = &table.columns[0];
        let report = AnomalyReport {
            parameter: column.name().to_string(),
            threshold: 3.0,
            indices: detect_anomalies(&column.values, 3.0),
        };
        let svg = render_anomalies(&table, column, &report).unwrap();
        assert!(svg.contains("PITCHRATE_DPS (deg/s) (1 beyond 3σ)"));
        assert!(svg.contains("Anomalies"));
    }
}
