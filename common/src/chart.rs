//! Strip chart renderer.
//!
//! Draws a sequence of column values as a one-pixel-per-column line chart.
//! Each column is placed on its scaled row and joined to the previous column
//! by a vertical run. Every pixel of that run is colored by the value its row
//! represents (recovered through the inverse scale), so steep changes show
//! the full gradient between the two readings instead of a flat color.
//!
//! The vertical domain always contains the [`ReferenceBand`], so the healthy
//! range stays visible even when all readings are inside it.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use heapless::String;

use crate::colors::{BLACK, color_for_value};
use crate::config::CHART_LABEL_INSET;
use crate::rolling_window::RollingWindow;
use crate::scale::Scale;
use crate::styles::{BOTTOM_RIGHT, CHART_LABEL_STYLE, TOP_RIGHT};
use crate::thresholds::ReferenceBand;

/// Vertical value range of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDomain {
    /// Value at the bottom row.
    pub min: f32,
    /// Value at the top row.
    pub max: f32,
}

impl ChartDomain {
    /// Smallest range containing every column and the whole reference band.
    pub fn covering(
        columns: &[f32],
        band: ReferenceBand,
    ) -> Self {
        let mut min = band.low();
        let mut max = band.high();
        for &value in columns {
            if value < min {
                min = value;
            }
            if value > max {
                max = value;
            }
        }
        Self { min, max }
    }
}

/// Fixed-size strip chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripChart {
    size: Size,
    band: ReferenceBand,
}

impl StripChart {
    pub const fn new(
        size: Size,
        band: ReferenceBand,
    ) -> Self {
        Self { size, band }
    }

    /// Chart sized to a window's column count and height.
    pub fn for_window(
        window: &RollingWindow,
        band: ReferenceBand,
    ) -> Self {
        Self::new(Size::new(window.width() as u32, window.height()), band)
    }

    #[inline]
    pub const fn size(&self) -> Size { self.size }

    #[inline]
    pub const fn band(&self) -> ReferenceBand { self.band }

    /// Render `columns` (oldest first) into the chart area of `target`.
    ///
    /// The area `(0, 0)..size` is cleared to black first. With fewer than two
    /// columns nothing else is drawn and `None` is returned. Columns beyond
    /// the chart width are dropped from the oldest end.
    pub fn draw<D>(
        &self,
        target: &mut D,
        columns: &[f32],
    ) -> Option<ChartDomain>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        target
            .fill_solid(&Rectangle::new(Point::zero(), self.size), BLACK)
            .ok();

        let visible = &columns[columns.len().saturating_sub(self.size.width as usize)..];
        if visible.len() < 2 {
            return None;
        }

        let domain = ChartDomain::covering(visible, self.band);
        let bottom_row = self.size.height.saturating_sub(1) as f32;
        let scale = Scale::new(domain.min, domain.max, 0.0, bottom_row, true).ok()?;
        // Rows back to values; absent for a single-row chart where no run is drawn
        let inverse = scale.inverse().ok();

        let mut prev_row: Option<i32> = None;
        for (x, &value) in visible.iter().enumerate() {
            let x = x as i32;
            let row = scale.apply(value) as i32;

            Pixel(Point::new(x, row), color_for_value(value, self.band))
                .draw(target)
                .ok();

            if let (Some(prev), Some(inverse)) = (prev_row, inverse.as_ref()) {
                let (from, to) = if prev < row { (prev, row) } else { (row, prev) };
                for y in from..to {
                    let virtual_value = inverse.apply(y as f32);
                    Pixel(Point::new(x, y), color_for_value(virtual_value, self.band))
                        .draw(target)
                        .ok();
                }
            }

            prev_row = Some(row);
        }

        self.draw_labels(target, domain);
        Some(domain)
    }

    /// Draw the domain bounds, truncated to integers, in the right-hand corners.
    fn draw_labels<D>(
        &self,
        target: &mut D,
        domain: ChartDomain,
    ) where
        D: DrawTarget<Color = Rgb888>,
    {
        let right = self.size.width as i32 - CHART_LABEL_INSET;
        let bottom = self.size.height as i32 - CHART_LABEL_INSET;

        let mut label: String<16> = String::new();
        write!(label, "{}", domain.max as i32).ok();
        Text::with_text_style(&label, Point::new(right, CHART_LABEL_INSET), CHART_LABEL_STYLE, TOP_RIGHT)
            .draw(target)
            .ok();

        label.clear();
        write!(label, "{}", domain.min as i32).ok();
        Text::with_text_style(&label, Point::new(right, bottom), CHART_LABEL_STYLE, BOTTOM_RIGHT)
            .draw(target)
            .ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::RgbColor;

    use super::*;
    use crate::colors::{WHITE, color_for_score};
    use crate::test_support::Canvas;
    use crate::thresholds::CO2_BAND;

    const W: u32 = 60;
    const H: u32 = 20;

    fn chart() -> StripChart { StripChart::new(Size::new(W, H), CO2_BAND) }

    #[test]
    fn test_empty_columns_render_black() {
        let mut canvas = Canvas::new(W, H, WHITE);
        assert_eq!(chart().draw(&mut canvas, &[]), None);
        assert!(canvas.is_solid(BLACK));
    }

    #[test]
    fn test_single_column_renders_black() {
        let mut canvas = Canvas::new(W, H, WHITE);
        assert_eq!(chart().draw(&mut canvas, &[812.0]), None);
        assert!(canvas.is_solid(BLACK));
    }

    #[test]
    fn test_two_columns_draw_distinct_colors() {
        let mut canvas = Canvas::new(W, H, BLACK);
        let domain = chart().draw(&mut canvas, &[500.0, 1000.0]).unwrap();
        assert_eq!(domain, ChartDomain { min: 500.0, max: 1000.0 });
        assert!(canvas.distinct_non_black() >= 2);

        // Healthy value sits on the bottom row in green, unhealthy on the top row in red
        assert_eq!(canvas.pixel(0, H - 1), color_for_score(0));
        assert_eq!(canvas.pixel(1, 0), color_for_score(255));
    }

    #[test]
    fn test_reference_band_always_visible() {
        let domain = ChartDomain::covering(&[700.0; 8], CO2_BAND);
        assert_eq!(domain.min, 500.0);
        assert_eq!(domain.max, 1000.0);
    }

    #[test]
    fn test_domain_extends_beyond_band() {
        let domain = ChartDomain::covering(&[420.0, 700.0, 1350.0], CO2_BAND);
        assert_eq!(domain.min, 420.0);
        assert_eq!(domain.max, 1350.0);
    }

    #[test]
    fn test_connecting_run_is_gradient() {
        let mut canvas = Canvas::new(W, H, BLACK);
        chart().draw(&mut canvas, &[500.0, 1000.0]);

        // Column 1 is filled from the top row down to (excluding) the bottom row
        let column = canvas.column(1);
        for (y, &pixel) in column.iter().enumerate().take(H as usize - 1) {
            assert_ne!(pixel, BLACK, "row {y} should be part of the run");
        }
        assert_eq!(column[H as usize - 1], BLACK);

        // Red fades towards green moving down the run
        let top = column[0];
        let lower = column[H as usize - 2];
        assert!(top.g() < lower.g());
        let mut distinct: Vec<Rgb888> = column.clone();
        distinct.dedup();
        assert!(distinct.len() > 3);
    }

    #[test]
    fn test_flat_line_has_no_runs() {
        let mut canvas = Canvas::new(W, H, BLACK);
        chart().draw(&mut canvas, &[750.0, 750.0, 750.0]);

        // 750 sits mid-chart; each column has exactly one lit pixel
        for x in 0..3 {
            let lit = canvas.column(x).iter().filter(|&&p| p != BLACK).count();
            assert_eq!(lit, 1, "column {x}");
        }
    }

    #[test]
    fn test_higher_values_plot_higher() {
        let mut canvas = Canvas::new(W, H, BLACK);
        chart().draw(&mut canvas, &[600.0, 600.0, 900.0, 900.0]);

        let first_lit = |x: u32| canvas.column(x).iter().position(|&p| p != BLACK).unwrap();
        assert!(first_lit(3) < first_lit(0));
    }

    #[test]
    fn test_labels_drawn_in_white() {
        let mut canvas = Canvas::new(W, H, BLACK);
        chart().draw(&mut canvas, &[500.0, 1000.0]);

        let label_area_white = (30..W).any(|x| (0..H).any(|y| canvas.pixel(x, y) == WHITE));
        assert!(label_area_white);
    }

    #[test]
    fn test_only_newest_columns_fit() {
        let chart = StripChart::new(Size::new(4, H), CO2_BAND);
        let mut canvas = Canvas::new(4, H, BLACK);
        // The 2000 ppm outlier has scrolled off the left edge
        let domain = chart.draw(&mut canvas, &[2000.0, 600.0, 700.0, 800.0, 900.0]).unwrap();
        assert_eq!(domain.max, 1000.0);
    }

    #[test]
    fn test_for_window_uses_window_geometry() {
        let window = RollingWindow::new(240, 100, core::time::Duration::from_secs(60)).unwrap();
        let chart = StripChart::for_window(&window, CO2_BAND);
        assert_eq!(chart.size(), Size::new(240, 100));
    }
}
