//! Color constants and the air-quality color gradient.
//!
//! # Rgb888 Color Format
//!
//! Everything is drawn in 24-bit `Rgb888`, the format the score gradient is
//! defined in. Display backends that need `Rgb565` (ST7789 panels) convert
//! at the sink with `Rgb565::from`.
//!
//! # Score Gradient
//!
//! A score is a 0-255 "badness" value. Score 0 is pure green, 255 is pure
//! red, and the midpoint is yellow-ish because both channels saturate at
//! twice the score:
//!
//! | Score | Red | Green |
//! |-------|-----|-------|
//! | 0     | 0   | 255   |
//! | 64    | 128 | 255   |
//! | 128   | 255 | 254   |
//! | 192   | 255 | 126   |
//! | 255   | 255 | 0     |

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::thresholds::ReferenceBand;

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Chart background and text on light backgrounds.
pub const BLACK: Rgb888 = Rgb888::BLACK;

/// Pure white. Chart labels and text on dark backgrounds.
pub const WHITE: Rgb888 = Rgb888::WHITE;

// =============================================================================
// Score Gradient
// =============================================================================

/// Highest score value.
pub const MAX_SCORE: u8 = 255;

/// Luminance above which black text is more legible than white.
pub const TEXT_LUMINANCE_THRESHOLD: f32 = 186.0;

/// Map a badness score onto the green-to-red gradient.
///
/// Scores outside `0..=255` clamp to the gradient ends, so `-50` is pure
/// green and `400` is pure red. Blue is always zero.
pub fn color_for_score(score: i32) -> Rgb888 {
    let red = (score.saturating_mul(2)).clamp(0, 255);
    let green = ((255 - score.clamp(-255, 510)) * 2).clamp(0, 255);
    Rgb888::new(red as u8, green as u8, 0)
}

/// Derive the 0-255 score for a raw reading relative to a reference band.
///
/// `band.low()` maps to 0 and `band.high()` (or anything above) maps to
/// 255. The fractional part is truncated. This is the single definition of
/// "how bad is this reading", shared by the chart and the frame background.
pub fn score_for_value(
    value: f32,
    band: ReferenceBand,
) -> u8 {
    let score = (value - band.low()) / band.span() * f32::from(MAX_SCORE);
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, f32::from(MAX_SCORE)) as u8
}

/// Color of a raw reading: [`score_for_value`] followed by [`color_for_score`].
#[inline]
pub fn color_for_value(
    value: f32,
    band: ReferenceBand,
) -> Rgb888 {
    color_for_score(i32::from(score_for_value(value, band)))
}

/// Pick black or white text for maximum contrast on `background`.
///
/// Uses the Rec. 601 luma weights: black when
/// `0.299R + 0.587G + 0.114B > 186`, white otherwise.
pub fn text_color_for_background(background: Rgb888) -> Rgb888 {
    let luminance = 0.299 * f32::from(background.r())
        + 0.587 * f32::from(background.g())
        + 0.114 * f32::from(background.b());

    if luminance > TEXT_LUMINANCE_THRESHOLD { BLACK } else { WHITE }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::CO2_BAND;

    #[test]
    fn test_score_zero_is_green() {
        assert_eq!(color_for_score(0), Rgb888::new(0, 255, 0));
    }

    #[test]
    fn test_score_max_is_red() {
        assert_eq!(color_for_score(255), Rgb888::new(255, 0, 0));
    }

    #[test]
    fn test_midpoint_mixes_both_channels() {
        let color = color_for_score(128);
        assert!(color.r() > 0);
        assert!(color.g() > 0);
        assert_eq!(color.b(), 0);
    }

    #[test]
    fn test_out_of_range_scores_clamp() {
        assert_eq!(color_for_score(-50), color_for_score(0));
        assert_eq!(color_for_score(400), color_for_score(255));
        assert_eq!(color_for_score(i32::MIN), color_for_score(0));
        assert_eq!(color_for_score(i32::MAX), color_for_score(255));
    }

    #[test]
    fn test_score_for_co2_values() {
        assert_eq!(score_for_value(500.0, CO2_BAND), 0);
        assert_eq!(score_for_value(400.0, CO2_BAND), 0);
        assert_eq!(score_for_value(750.0, CO2_BAND), 127);
        assert_eq!(score_for_value(1000.0, CO2_BAND), 255);
        assert_eq!(score_for_value(2500.0, CO2_BAND), 255);
    }

    #[test]
    fn test_score_for_nan_is_zero() {
        assert_eq!(score_for_value(f32::NAN, CO2_BAND), 0);
    }

    #[test]
    fn test_color_for_value_matches_composition() {
        for value in [450.0, 600.0, 820.0, 1200.0] {
            let expected = color_for_score(i32::from(score_for_value(value, CO2_BAND)));
            assert_eq!(color_for_value(value, CO2_BAND), expected);
        }
    }

    #[test]
    fn test_text_color_contrast() {
        // Pure green luma is ~150: white text
        assert_eq!(text_color_for_background(Rgb888::new(0, 255, 0)), WHITE);
        // Yellow luma is ~226: black text
        assert_eq!(text_color_for_background(Rgb888::new(255, 255, 0)), BLACK);
        assert_eq!(text_color_for_background(BLACK), WHITE);
        assert_eq!(text_color_for_background(WHITE), BLACK);
    }
}
