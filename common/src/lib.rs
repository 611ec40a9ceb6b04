//! Common types and drawing logic for the air-quality monitor.
//!
//! This crate contains the platform-agnostic core shared by the monitor
//! binary and its tests:
//!
//! - [`colors`]: score-to-color gradient and contrast text color
//! - [`thresholds`]: CO2 reference band and backlight hours
//! - [`config`]: Layout constants for the 240x240 panel
//! - [`scale`]: Linear value-to-row transform and its inverse
//! - [`rolling_window`]: Time-bucketed column history
//! - [`chart`]: Strip chart renderer
//! - [`frame`]: Full-screen frame composition
//! - [`backlight`]: Daytime backlight schedule
//! - [`air_quality`]: Gas/humidity composite score
//! - [`styles`]: Pre-computed text styles
//!
//! # no_std Compatibility
//!
//! This crate is `no_std` and never allocates. Timestamps are
//! `core::time::Duration` offsets from an arbitrary monotonic origin chosen
//! by the caller. Tests run with `std` enabled (via `cfg_attr`).

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod air_quality;
pub mod backlight;
pub mod chart;
pub mod colors;
pub mod config;
pub mod frame;
pub mod rolling_window;
pub mod scale;
pub mod styles;
pub mod thresholds;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used items
pub use backlight::BacklightSchedule;
pub use chart::{ChartDomain, StripChart};
pub use frame::{FrameLayout, Readouts};
pub use rolling_window::RollingWindow;
pub use scale::Scale;
pub use thresholds::ReferenceBand;
