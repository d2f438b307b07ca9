//! Plotters-powered scatter/trend chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A render-only chart description; all series and bounds are computed by the caller.
pub struct TrendChart<'a> {
    /// Sampled OLS line.
    pub line: &'a [(f64, f64)],
    /// One point per joined state.
    pub points: &'a [(f64, f64)],
    /// The currently selected state, drawn over `points`.
    pub highlight: Option<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.1}"))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255); // cyan
            let highlight_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.line.iter().copied(), &line_color))?;

            // `Circle` radii come out wrong through the ratatui backend, so
            // states are drawn as single pixels.
            chart.draw_series(self.points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;
            if let Some((x, y)) = self.highlight {
                chart.draw_series(std::iter::once(Pixel::new((x, y), highlight_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
