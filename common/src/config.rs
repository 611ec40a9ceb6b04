//! Display and layout configuration constants.
//!
//! Defaults for the reference panel (Pimoroni 1.3" 240x240 ST7789). The
//! monitor binary can override the chart geometry at runtime; text positions
//! are fixed offsets from the top-left corner of the frame.

use core::time::Duration;

use embedded_graphics::prelude::{Point, Size};

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 240;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

// =============================================================================
// Chart Configuration
// =============================================================================

/// Chart strip height in pixels.
pub const CHART_HEIGHT: u32 = 100;

/// Top edge of the chart strip. The strip sits at the bottom of the panel.
pub const CHART_TOP: i32 = 140;

/// Time span covered by the full chart width.
pub const CHART_WINDOW: Duration = Duration::from_secs(60);

const _: () = assert!(CHART_TOP as u32 + CHART_HEIGHT <= SCREEN_HEIGHT);

/// Chart strip origin inside the frame.
pub const CHART_ORIGIN: Point = Point::new(0, CHART_TOP);

/// Chart strip size.
pub const CHART_SIZE: Size = Size::new(SCREEN_WIDTH, CHART_HEIGHT);

// =============================================================================
// Readout Positions (top-left of each text line)
// =============================================================================

/// Large CO2 readout.
pub const CO2_POS: Point = Point::new(20, 20);

/// Temperature line.
pub const TEMPERATURE_POS: Point = Point::new(20, 60);

/// Humidity line.
pub const HUMIDITY_POS: Point = Point::new(20, 80);

/// Composite air-quality score line.
pub const AIR_QUALITY_POS: Point = Point::new(20, 100);

/// Wall-clock line.
pub const CLOCK_POS: Point = Point::new(20, 120);

/// Inset of the chart min/max labels from the chart's right edge.
pub const CHART_LABEL_INSET: i32 = 3;
