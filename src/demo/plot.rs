use actor_freq::experiment::ExperimentReport;
use plotters::prelude::*;
use std::path::Path;

// matplotlib default cycle
const COLORS: [RGBColor; 9] = [
    RGBColor(31, 119, 180),  // blue
    RGBColor(255, 127, 14),  // orange
    RGBColor(44, 160, 44),   // green
    RGBColor(214, 39, 40),   // red
    RGBColor(148, 103, 189), // purple
    RGBColor(140, 86, 75),   // brown
    RGBColor(227, 119, 194), // pink
    RGBColor(127, 127, 127), // gray
    RGBColor(188, 189, 34),  // olive
];

/// Draws the Morris spread (left) and Frequent-Count recall by capacity
/// (right) side by side.
pub fn plot_comparison(
    report: &ExperimentReport,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, (1600, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, 2));

    // Left: exact count vs Morris estimate, min..max bars around the mean
    let rows = &report.morris.rows;
    let hi = rows
        .iter()
        .map(|r| r.exact.max(r.max) as f64)
        .fold(1.0f64, f64::max);
    let lo = rows
        .iter()
        .map(|r| (r.exact.min(r.min) as f64).max(1.0))
        .fold(f64::MAX, f64::min)
        .min(hi);

    let mut chart = ChartBuilder::on(&areas[0])
        .caption(
            format!("Morris, {} trials", report.morris.trials),
            ("sans-serif", 32).into_font(),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((lo * 0.5..hi * 2.0).log_scale(), (lo * 0.5..hi * 2.0).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("exact count")
        .y_desc("estimate")
        .label_style(("sans-serif", 18))
        .draw()?;

    // Draw the perfect counter line (y = x)
    chart.draw_series(LineSeries::new(
        vec![(lo * 0.5, lo * 0.5), (hi * 2.0, hi * 2.0)],
        ShapeStyle::from(&BLACK).stroke_width(2),
    ))?;

    chart.draw_series(rows.iter().map(|r| {
        ErrorBar::new_vertical(
            r.exact as f64,
            (r.min as f64).max(lo * 0.5),
            r.mean.max(lo * 0.5),
            r.max as f64,
            COLORS[0].filled(),
            10,
        )
    }))?;

    // Right: recall (estimate / exact) per top item as capacity grows
    let columns = &report.sweep.columns;
    let k_min = columns.iter().map(|c| c.capacity).min().unwrap_or(1) as f64;
    let k_max = columns.iter().map(|c| c.capacity).max().unwrap_or(1) as f64;

    let mut chart = ChartBuilder::on(&areas[1])
        .caption("Frequent-Count recall", ("sans-serif", 32).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((k_min * 0.8..k_max * 1.25).log_scale(), 0.0f64..1.05)?;

    chart
        .configure_mesh()
        .x_desc("capacity k")
        .y_desc("estimate / exact")
        .label_style(("sans-serif", 18))
        .draw()?;

    for (i, row) in report.sweep.rows.iter().enumerate() {
        let color = COLORS[i % COLORS.len()];
        let points: Vec<(f64, f64)> = columns
            .iter()
            .zip(&row.estimates)
            .map(|(c, &est)| (c.capacity as f64, est as f64 / row.exact.max(1) as f64))
            .collect();

        let series = LineSeries::new(points, color.stroke_width(3));
        if i < COLORS.len() {
            chart.draw_series(series)?.label(row.item.clone()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(3))
            });
        } else {
            chart.draw_series(series)?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .label_font(("sans-serif", 18))
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}
