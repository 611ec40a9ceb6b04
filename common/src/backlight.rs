//! Daytime backlight schedule.
//!
//! The panel is lit only strictly between two wall-clock hours. With the
//! defaults (6 and 22) that is 07:00 through 21:59.

use thiserror::Error;

use crate::thresholds::{BACKLIGHT_OFF_FROM_HOUR, BACKLIGHT_ON_AFTER_HOUR};

/// Errors from building a [`BacklightSchedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("hour {0} is not in 0..=23")]
    Hour(u8),
    #[error("backlight window ({on_after}, {off_from}) contains no hour")]
    Empty { on_after: u8, off_from: u8 },
}

/// Hours during which the backlight is on: `on_after_hour < hour < off_from_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacklightSchedule {
    on_after_hour: u8,
    off_from_hour: u8,
}

impl BacklightSchedule {
    pub fn new(
        on_after_hour: u8,
        off_from_hour: u8,
    ) -> Result<Self, ScheduleError> {
        for hour in [on_after_hour, off_from_hour] {
            if hour > 23 {
                return Err(ScheduleError::Hour(hour));
            }
        }
        if off_from_hour <= on_after_hour.saturating_add(1) {
            return Err(ScheduleError::Empty {
                on_after: on_after_hour,
                off_from: off_from_hour,
            });
        }
        Ok(Self {
            on_after_hour,
            off_from_hour,
        })
    }

    /// Whether the backlight should be on during `hour` (0..=23).
    #[inline]
    pub const fn is_lit(
        &self,
        hour: u32,
    ) -> bool {
        hour > self.on_after_hour as u32 && hour < self.off_from_hour as u32
    }

    #[inline]
    pub const fn on_after_hour(&self) -> u8 { self.on_after_hour }

    #[inline]
    pub const fn off_from_hour(&self) -> u8 { self.off_from_hour }
}

impl Default for BacklightSchedule {
    fn default() -> Self {
        Self {
            on_after_hour: BACKLIGHT_ON_AFTER_HOUR,
            off_from_hour: BACKLIGHT_OFF_FROM_HOUR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_daytime_window() {
        let schedule = BacklightSchedule::default();
        assert!(schedule.is_lit(12));
        assert!(schedule.is_lit(7));
        assert!(schedule.is_lit(21));
        assert!(!schedule.is_lit(23));
        assert!(!schedule.is_lit(0));
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let schedule = BacklightSchedule::default();
        assert!(!schedule.is_lit(6));
        assert!(!schedule.is_lit(22));
    }

    #[test]
    fn test_custom_window() {
        let schedule = BacklightSchedule::new(0, 23).unwrap();
        assert!(!schedule.is_lit(0));
        assert!(schedule.is_lit(1));
        assert!(schedule.is_lit(22));
    }

    #[test]
    fn test_rejects_invalid_hours() {
        assert_eq!(BacklightSchedule::new(6, 24), Err(ScheduleError::Hour(24)));
        assert_eq!(
            BacklightSchedule::new(10, 11),
            Err(ScheduleError::Empty { on_after: 10, off_from: 11 })
        );
        assert_eq!(
            BacklightSchedule::new(22, 6),
            Err(ScheduleError::Empty { on_after: 22, off_from: 6 })
        );
    }
}
