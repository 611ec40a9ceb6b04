//! Pre-computed text styles to avoid per-frame object construction.
//!
//! `TextStyle` values are `const`, so they live in read-only data and cost
//! nothing per frame. Colors that change at runtime (readout text follows
//! the background) are built with `MonoTextStyle::new(FONT, color)` from the
//! exposed font references.

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
    pixelcolor::Rgb888,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_24_POINT;

use crate::colors::WHITE;

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned, positioned by the top of the glyph box. Readout lines.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, positioned by the top of the glyph box. Chart max label.
pub const TOP_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Top)
    .build();

/// Right-aligned, positioned by the bottom of the glyph box. Chart min label.
pub const BOTTOM_RIGHT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Right)
    .baseline(Baseline::Bottom)
    .build();

// =============================================================================
// Font References (for dynamic color styles)
// =============================================================================

/// Small font (6x10 pixels) for readout lines and chart labels.
pub const LABEL_FONT: &MonoFont = &FONT_6X10;

/// Large font for the headline CO2 value.
pub const VALUE_FONT: &MonoFont = &PROFONT_24_POINT;

// =============================================================================
// Pre-computed Character Styles
// =============================================================================

/// White chart labels, legible on the black chart background.
pub const CHART_LABEL_STYLE: MonoTextStyle<'static, Rgb888> = MonoTextStyle::new(&FONT_6X10, WHITE);
