// Two parameters of different scale on primary and secondary y axes

use super::{
    data_bounds, render_svg, series_color, FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE,
    FONT_SIZE_LEGEND, LINE_WIDTH_LEGEND, LINE_WIDTH_PLOT, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::error::AnalyzerError;
use crate::types::{Column, SampleTable};
use crate::Result;
use plotters::prelude::*;
use std::error::Error;

pub fn render_dual_axis(table: &SampleTable, primary: &Column, secondary: &Column) -> Result<String> {
    let left = table.series(primary);
    let right = table.series(secondary);
    let (Some(((lx0, lx1), (y_min, y_max))), Some(((rx0, rx1), (y2_min, y2_max)))) =
        (data_bounds(left.iter()), data_bounds(right.iter()))
    else {
        return Err(AnalyzerError::Plot(format!(
            "{} / {}: no finite data",
            primary.name(),
            secondary.name()
        )));
    };
    let (x_min, x_max) = (lx0.min(rx0), lx1.max(rx1));
    let left_label = primary.descriptor.display_name();
    let right_label = secondary.descriptor.display_name();
    let left_color = series_color(0);
    let right_color = series_color(1);

    render_svg((PLOT_WIDTH, PLOT_HEIGHT), |root| -> std::result::Result<(), Box<dyn Error>> {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("{left_label} and {right_label} vs time"),
                ("sans-serif", FONT_SIZE_CHART_TITLE),
            )
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .right_y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?
            .set_secondary_coord(x_min..x_max, y2_min..y2_max);

        chart
            .configure_mesh()
            .x_desc("Elapsed time (s)")
            .y_desc(left_label.as_str())
            .light_line_style(WHITE.mix(0.7))
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc(right_label.as_str())
            .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
            .draw()?;

        chart
            .draw_series(LineSeries::new(
                left.iter().copied(),
                left_color.stroke_width(LINE_WIDTH_PLOT + 1),
            ))?
            .label(left_label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], left_color.stroke_width(LINE_WIDTH_LEGEND))
            });
        chart
            .draw_secondary_series(LineSeries::new(
                right.iter().copied(),
                right_color.stroke_width(LINE_WIDTH_PLOT + 1),
            ))?
            .label(format!("{right_label} (right axis)"))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], right_color.stroke_width(LINE_WIDTH_LEGEND))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
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
    use crate::types::ParameterDescriptor;

    #[test]
    fn test_render_dual_axis_labels_both_axes() {
        let alt = Column::new(
            ParameterDescriptor::new("PRESSUREALTITUDE_FT", Some("ft".to_string())),
            vec![Some(1000.0), Some(1200.0), Some(1400.0)],
        );
        let cas = Column::new(
            ParameterDescriptor::new("CAS_KT", Some("kt".to_string())),
            vec![Some(120.0), None, Some(130.0)],
        );
        let table = SampleTable {
            timestamp_name: "Time".to_string(),
            timestamp_unit: None,
            timestamps: vec![String::new(); 3],
            elapsed: vec![0.0, 1.0, 2.0],
            columns: vec![alt.clone(), cas.clone()],
        };
        let svg = render_dual_axis(&table, &alt, &cas).unwrap();
        assert!(svg.contains("PRESSUREALTITUDE_FT (ft) and CAS_KT (kt) vs time"));
        assert!(svg.contains("CAS_KT (kt) (right axis)"));
    }

    #[test]
    fn test_render_dual_axis_requires_both_series() {
        let alt = Column::new(ParameterDescriptor::new("ALT", None), vec![Some(1.0), Some(2.0)]);
        let empty = Column::new(ParameterDescriptor::new("CAS", None), vec![None, None]);
        let table = SampleTable {
            timestamp_name: "Time".to_string(),
            timestamp_unit: None,
            timestamps: vec![String::new(); 2],
            elapsed: vec![0.0, 1.0],
            columns: vec![alt.clone(), empty.clone()],
        };
        assert!(render_dual_axis(&table, &alt, &empty).is_err());
    }
}
