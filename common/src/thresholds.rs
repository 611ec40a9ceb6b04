//! Centralized threshold configuration.
//!
//! All defaults are compile-time constants with validation assertions. If a
//! threshold pair is configured incorrectly (e.g. `HIGH < LOW`), compilation
//! fails.
//!
//! Runtime-configurable values are validated by the constructors of
//! [`ReferenceBand`] and [`BacklightSchedule`](crate::backlight::BacklightSchedule).

use thiserror::Error;

// =============================================================================
// CO2 Reference Band
// =============================================================================

/// CO2 concentration considered fully healthy (score 0, pure green).
/// Roughly fresh outdoor air plus a small indoor margin.
pub const CO2_HEALTHY_PPM: f32 = 500.0;

/// CO2 concentration considered fully unhealthy (score 255, pure red).
/// Above ~1000 ppm drowsiness and reduced concentration become noticeable.
pub const CO2_UNHEALTHY_PPM: f32 = 1000.0;

const _: () = assert!(CO2_HEALTHY_PPM < CO2_UNHEALTHY_PPM);

/// The default CO2 band.
pub const CO2_BAND: ReferenceBand = ReferenceBand {
    low: CO2_HEALTHY_PPM,
    high: CO2_UNHEALTHY_PPM,
};

// =============================================================================
// Backlight Hours
// =============================================================================

/// The backlight stays off up to and including this hour.
pub const BACKLIGHT_ON_AFTER_HOUR: u8 = 6;

/// The backlight is off from this hour onwards.
pub const BACKLIGHT_OFF_FROM_HOUR: u8 = 22;

const _: () = assert!(BACKLIGHT_ON_AFTER_HOUR < BACKLIGHT_OFF_FROM_HOUR);
const _: () = assert!(BACKLIGHT_OFF_FROM_HOUR <= 24);

// =============================================================================
// Reference Band
// =============================================================================

/// Errors from building a [`ReferenceBand`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BandError {
    /// One of the bounds is NaN or infinite.
    #[error("reference band bounds must be finite")]
    NonFinite,
    /// `low` is not strictly below `high`.
    #[error("reference band low ({low}) must be below high ({high})")]
    Empty { low: f32, high: f32 },
}

/// Healthy/unhealthy bounds of a physical reading.
///
/// The band drives scoring (low = score 0, high = score 255) and is always
/// kept visible on the strip chart. The invariant `low < high` makes the
/// band usable as a scale domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBand {
    low: f32,
    high: f32,
}

impl ReferenceBand {
    /// Create a band, rejecting empty or non-finite bounds.
    pub fn new(
        low: f32,
        high: f32,
    ) -> Result<Self, BandError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(BandError::NonFinite);
        }
        if low >= high {
            return Err(BandError::Empty { low, high });
        }
        Ok(Self { low, high })
    }

    /// Healthy bound.
    #[inline]
    pub const fn low(self) -> f32 { self.low }

    /// Unhealthy bound.
    #[inline]
    pub const fn high(self) -> f32 { self.high }

    /// Width of the band (always positive).
    #[inline]
    pub fn span(self) -> f32 { self.high - self.low }
}

impl Default for ReferenceBand {
    fn default() -> Self { CO2_BAND }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::assertions_on_constants)] // Intentional check of threshold ordering
mod tests {
    use super::*;

    #[test]
    fn test_co2_threshold_ordering() {
        assert!(CO2_HEALTHY_PPM < CO2_UNHEALTHY_PPM);
        assert_eq!(CO2_BAND.low(), 500.0);
        assert_eq!(CO2_BAND.high(), 1000.0);
    }

    #[test]
    fn test_backlight_hour_ordering() {
        assert!(BACKLIGHT_ON_AFTER_HOUR < BACKLIGHT_OFF_FROM_HOUR);
    }

    #[test]
    fn test_band_new_valid() {
        let band = ReferenceBand::new(400.0, 1500.0).unwrap();
        assert_eq!(band.low(), 400.0);
        assert_eq!(band.high(), 1500.0);
        assert!((band.span() - 1100.0).abs() < 0.001);
    }

    #[test]
    fn test_band_rejects_empty() {
        assert_eq!(
            ReferenceBand::new(700.0, 700.0),
            Err(BandError::Empty { low: 700.0, high: 700.0 })
        );
        assert!(ReferenceBand::new(1000.0, 500.0).is_err());
    }

    #[test]
    fn test_band_rejects_non_finite() {
        assert_eq!(ReferenceBand::new(f32::NAN, 1.0), Err(BandError::NonFinite));
        assert_eq!(ReferenceBand::new(0.0, f32::INFINITY), Err(BandError::NonFinite));
    }

    #[test]
    fn test_default_band_is_co2() {
        assert_eq!(ReferenceBand::default(), CO2_BAND);
    }
}
