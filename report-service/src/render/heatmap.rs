use meter_client::{DailyPivot, HOURS_PER_DAY};
use plotters::{coord::Shift, prelude::*};
use time::Date;

use super::{colormap::ylgnbu, RenderError};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 800;
const COLOR_BAR_WIDTH: u32 = 140;
const COLOR_BAR_STEPS: usize = 100;

/// Draw a date x hour grid, earliest date on top, colored by consumption.
pub fn render_heatmap(table: &DailyPivot, title: &str) -> Result<String, RenderError> {
    let (lo, hi) = table.value_range().ok_or(RenderError::Empty)?;
    let hi = if hi > lo { hi } else { lo + 1.0 };
    let rows: Vec<(Date, [f64; HOURS_PER_DAY])> = table.iter().map(|(d, row)| (d, *row)).collect();
    let n = rows.len() as u32;

    let row_label = |y: &u32| -> String {
        n.checked_sub(*y + 1)
            .and_then(|i| rows.get(i as usize))
            .map(|(day, _)| day.to_string())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let (grid_area, bar_area) = root.split_horizontally(WIDTH - COLOR_BAR_WIDTH);

        let mut chart = ChartBuilder::on(&grid_area)
            .caption(title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(100)
            .build_cartesian_2d(0u32..HOURS_PER_DAY as u32, 0u32..n)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Hour")
            .y_desc("Date")
            .x_labels(HOURS_PER_DAY)
            .y_labels((n as usize).min(25))
            .y_label_formatter(&row_label)
            .draw()?;

        chart.draw_series(rows.iter().enumerate().flat_map(move |(i, (_, values))| {
            let y = n - 1 - i as u32;
            values.iter().enumerate().map(move |(hour, v)| {
                let x = hour as u32;
                Rectangle::new(
                    [(x, y), (x + 1, y + 1)],
                    ylgnbu((*v - lo) / (hi - lo)).filled(),
                )
            })
        }))?;

        draw_color_bar(&bar_area, lo, hi)?;
        root.present()?;
    }

    Ok(svg)
}

fn draw_color_bar(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    lo: f64,
    hi: f64,
) -> Result<(), RenderError> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(50)
        .margin_bottom(50)
        .margin_right(20)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0f64..1.0, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("kWh")
        .y_labels(6)
        .y_label_formatter(&|v: &f64| format!("{v:.2}"))
        .draw()?;

    let step = (hi - lo) / COLOR_BAR_STEPS as f64;
    bar.draw_series((0..COLOR_BAR_STEPS).map(|k| {
        let v0 = lo + step * k as f64;
        Rectangle::new(
            [(0.0, v0), (1.0, v0 + step)],
            ylgnbu(k as f64 / (COLOR_BAR_STEPS - 1) as f64).filled(),
        )
    }))?;

    Ok(())
}
