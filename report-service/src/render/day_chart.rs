use meter_client::DayProfile;
use plotters::prelude::*;
use time::Date;

use super::{colormap::series_color, RenderError};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

/// Overlay one line per source for a single day (hour on x, kWh on y).
///
/// Profiles without data are left out of the chart and its legend.
pub fn render_day_chart(day: Date, profiles: &[DayProfile]) -> Result<String, RenderError> {
    let series: Vec<(&str, Vec<(f64, f64)>)> = profiles
        .iter()
        .map(|p| (p.label.as_str(), p.points()))
        .filter(|(_, points)| !points.is_empty())
        .collect();

    let (lo, hi) = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, kwh)| *kwh))
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let hi = if hi > lo { hi + (hi - lo) * 0.1 } else { lo + 1.0 };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Consumption on {day}"), ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0f64..24.0, lo..hi)?;

        chart
            .configure_mesh()
            .x_desc("Hour")
            .y_desc("kWh")
            .x_labels(13)
            .light_line_style(BLACK.mix(0.1))
            .draw()?;

        for (idx, (label, points)) in series.into_iter().enumerate() {
            let color = series_color(idx);
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_client::Reading;
    use time::macros::{date, datetime};

    fn profile(label: &str, readings: Vec<Reading>) -> DayProfile {
        DayProfile {
            label: label.to_string(),
            readings,
        }
    }

    #[test]
    fn legend_lists_only_sources_with_data() {
        let profiles = vec![
            profile(
                "8882",
                vec![
                    Reading::new(datetime!(2024-01-05 00:00), Some(0.4)),
                    Reading::new(datetime!(2024-01-05 01:00), Some(0.6)),
                ],
            ),
            profile("no-data", Vec::new()),
            profile("4674", vec![Reading::new(datetime!(2024-01-05 00:00), Some(1.1))]),
        ];

        let svg = render_day_chart(date!(2024-01-05), &profiles).unwrap();
        assert!(svg.contains("Consumption on 2024-01-05"));
        assert!(svg.contains("8882"));
        assert!(svg.contains("4674"));
        assert!(!svg.contains("no-data"));
    }

    #[test]
    fn renders_axes_without_any_series() {
        let svg = render_day_chart(date!(2024-01-05), &[]).unwrap();
        assert!(svg.contains("<svg"));
    }
}
