//! Full-screen frame composition.
//!
//! A frame is painted back to front:
//!
//! 1. Background filled with the CO2 score color (black before the first reading)
//! 2. Strip chart drawn into its sub-region
//! 3. Readout lines in black or white, whichever contrasts with the background
//!
//! Readouts that have never been measured show `--`.

use core::fmt::Write;

use embedded_graphics::{mono_font::MonoTextStyle, pixelcolor::Rgb888, prelude::*, primitives::Rectangle, text::Text};
use heapless::String;

use crate::{
    chart::{ChartDomain, StripChart},
    colors::{BLACK, color_for_value, text_color_for_background},
    config::{AIR_QUALITY_POS, CHART_ORIGIN, CHART_SIZE, CLOCK_POS, CO2_POS, HUMIDITY_POS, TEMPERATURE_POS},
    styles::{LABEL_FONT, TOP_LEFT, VALUE_FONT},
    thresholds::CO2_BAND,
};

/// Capacity of the preformatted wall-clock text.
pub const CLOCK_TEXT_LEN: usize = 32;

/// Latest values shown as text on the frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readouts {
    pub co2_ppm: Option<f32>,
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub air_quality: Option<f32>,
    /// Wall-clock time, already formatted by the caller.
    pub clock: String<CLOCK_TEXT_LEN>,
}

/// Where the chart sits and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub chart_origin: Point,
    pub chart: StripChart,
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            chart_origin: CHART_ORIGIN,
            chart: StripChart::new(CHART_SIZE, CO2_BAND),
        }
    }
}

impl FrameLayout {
    /// Frame background for the given readouts.
    pub fn background(
        &self,
        readouts: &Readouts,
    ) -> Rgb888 {
        readouts
            .co2_ppm
            .map_or(BLACK, |ppm| color_for_value(ppm, self.chart.band()))
    }

    /// Paint one complete frame. Returns the chart domain, if a line was plotted.
    pub fn draw<D>(
        &self,
        target: &mut D,
        readouts: &Readouts,
        columns: &[f32],
    ) -> Option<ChartDomain>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let background = self.background(readouts);
        target.clear(background).ok();

        let mut chart_area = target.cropped(&Rectangle::new(self.chart_origin, self.chart.size()));
        let domain = self.chart.draw(&mut chart_area, columns);

        let text_color = text_color_for_background(background);
        draw_readouts(target, readouts, text_color);
        domain
    }
}

/// Append `value` with `decimals` places, or `--` when absent.
fn push_value<const N: usize>(
    out: &mut String<N>,
    value: Option<f32>,
    decimals: usize,
) {
    match value {
        Some(v) => write!(out, "{v:.decimals$}").ok(),
        None => out.push_str("--").ok(),
    };
}

fn draw_readouts<D>(
    target: &mut D,
    readouts: &Readouts,
    color: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let label_style = MonoTextStyle::new(LABEL_FONT, color);
    let value_style = MonoTextStyle::new(VALUE_FONT, color);

    let mut line: String<48> = String::new();
    line.push_str("CO2 ").ok();
    push_value(&mut line, readouts.co2_ppm, 0);
    Text::with_text_style(&line, CO2_POS, value_style, TOP_LEFT)
        .draw(target)
        .ok();

    let lines = [
        ("Temp ", readouts.temperature, TEMPERATURE_POS),
        ("Humidity ", readouts.humidity, HUMIDITY_POS),
        ("Air Quality ", readouts.air_quality, AIR_QUALITY_POS),
    ];
    for (label, value, position) in lines {
        line.clear();
        line.push_str(label).ok();
        push_value(&mut line, value, 2);
        Text::with_text_style(&line, position, label_style, TOP_LEFT)
            .draw(target)
            .ok();
    }

    line.clear();
    line.push_str("Time ").ok();
    line.push_str(&readouts.clock).ok();
    Text::with_text_style(&line, CLOCK_POS, label_style, TOP_LEFT)
        .draw(target)
        .ok();
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{WHITE, color_for_score};
    use crate::config::{CHART_TOP, SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::test_support::Canvas;

    fn screen() -> Canvas { Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT, WHITE) }

    fn count(
        canvas: &Canvas,
        color: Rgb888,
        rows: core::ops::Range<u32>,
    ) -> usize {
        rows.flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == color)
            .count()
    }

    #[test]
    fn test_background_follows_co2_score() {
        let layout = FrameLayout::default();
        let mut canvas = screen();
        let readouts = Readouts {
            co2_ppm: Some(1000.0),
            ..Readouts::default()
        };
        layout.draw(&mut canvas, &readouts, &[]);

        let red = color_for_score(255);
        assert_eq!(canvas.pixel(SCREEN_WIDTH - 1, 0), red);
        assert_eq!(canvas.pixel(SCREEN_WIDTH - 1, CHART_TOP as u32 - 1), red);
    }

    #[test]
    fn test_black_background_before_first_reading() {
        let layout = FrameLayout::default();
        let mut canvas = screen();
        layout.draw(&mut canvas, &Readouts::default(), &[]);

        assert_eq!(canvas.pixel(SCREEN_WIDTH - 1, 0), BLACK);
        // White "--" placeholders are drawn on black
        assert!(count(&canvas, WHITE, 0..CHART_TOP as u32) > 0);
    }

    #[test]
    fn test_chart_region_cleared_to_black() {
        let layout = FrameLayout::default();
        let mut canvas = screen();
        let readouts = Readouts {
            co2_ppm: Some(750.0),
            ..Readouts::default()
        };
        layout.draw(&mut canvas, &readouts, &[]);

        let chart_rows = CHART_TOP as u32..SCREEN_HEIGHT;
        assert_eq!(count(&canvas, BLACK, chart_rows), (SCREEN_WIDTH * CHART_SIZE.height) as usize);
    }

    #[test]
    fn test_chart_drawn_inside_region() {
        let layout = FrameLayout::default();
        let mut canvas = screen();
        let readouts = Readouts {
            co2_ppm: Some(1000.0),
            ..Readouts::default()
        };
        let domain = layout.draw(&mut canvas, &readouts, &[500.0, 1000.0]);
        assert_eq!(domain, Some(ChartDomain { min: 500.0, max: 1000.0 }));

        // Bottom chart row at x=0 holds the healthy sample, top chart row at x=1 the unhealthy one
        assert_eq!(canvas.pixel(0, SCREEN_HEIGHT - 1), color_for_score(0));
        assert_eq!(canvas.pixel(1, CHART_TOP as u32), color_for_score(255));
    }

    #[test]
    fn test_text_contrasts_with_light_background() {
        let layout = FrameLayout::default();
        let mut canvas = screen();
        // Mid-band CO2 gives a yellow background, which takes black text
        let readouts = Readouts {
            co2_ppm: Some(750.0),
            temperature: Some(21.5),
            humidity: Some(45.0),
            air_quality: Some(88.0),
            clock: String::try_from("Sun Oct 18 12:00:00 2026").unwrap(),
        };
        layout.draw(&mut canvas, &readouts, &[]);

        assert_eq!(text_color_for_background(layout.background(&readouts)), BLACK);
        assert!(count(&canvas, BLACK, 0..CHART_TOP as u32) > 0);
        assert_eq!(count(&canvas, WHITE, 0..CHART_TOP as u32), 0);
    }

    #[test]
    fn test_push_value_formats() {
        let mut s: String<16> = String::new();
        push_value(&mut s, Some(21.456), 2);
        assert_eq!(s.as_str(), "21.46");

        s.clear();
        push_value(&mut s, None, 2);
        assert_eq!(s.as_str(), "--");

        s.clear();
        push_value(&mut s, Some(812.7), 0);
        assert_eq!(s.as_str(), "813");
    }
}
