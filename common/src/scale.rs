//! Linear scale transform between a value domain and a target range.
//!
//! The strip chart uses one [`Scale`] to place readings on pixel rows
//! (inverted, so larger values sit higher on screen) and its
//! [`inverse`](Scale::inverse) to recover the value a given row stands for.
//!
//! Inversion mirrors within the target range: with `invert` set, `min_value`
//! maps to `max_target` and `max_value` to `min_target`. Because the mirror is
//! its own inverse, swapping source and target while keeping the same
//! `invert` flag gives the exact inverse transform.

use thiserror::Error;

/// Errors from building a [`Scale`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScaleError {
    /// A bound is NaN or infinite.
    #[error("scale bounds must be finite")]
    NonFinite,
    /// `min_value >= max_value`: there is no interval to interpolate over.
    #[error("scale domain [{min}, {max}] is empty")]
    EmptyDomain { min: f32, max: f32 },
}

/// A clamped linear mapping `[min_value, max_value] -> [min_target, max_target]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    min_value: f32,
    max_value: f32,
    min_target: f32,
    max_target: f32,
    invert: bool,
}

impl Scale {
    /// Build a transform.
    ///
    /// The source domain must be non-empty (`min_value < max_value`). A
    /// zero-width domain would divide by zero, so it is rejected here rather
    /// than producing a meaningless mapping. The target range may be empty or
    /// reversed; its inverse is then rejected instead.
    pub fn new(
        min_value: f32,
        max_value: f32,
        min_target: f32,
        max_target: f32,
        invert: bool,
    ) -> Result<Self, ScaleError> {
        if !(min_value.is_finite() && max_value.is_finite() && min_target.is_finite() && max_target.is_finite()) {
            return Err(ScaleError::NonFinite);
        }
        if min_value >= max_value {
            return Err(ScaleError::EmptyDomain {
                min: min_value,
                max: max_value,
            });
        }
        Ok(Self {
            min_value,
            max_value,
            min_target,
            max_target,
            invert,
        })
    }

    /// Map `value` into the target range.
    ///
    /// Values above the domain clamp to `max_target` (`min_target` when
    /// inverted); values below clamp to `min_target` (`max_target` when
    /// inverted).
    pub fn apply(
        &self,
        value: f32,
    ) -> f32 {
        if value > self.max_value {
            return if self.invert { self.min_target } else { self.max_target };
        }
        if value < self.min_value {
            return if self.invert { self.max_target } else { self.min_target };
        }

        let offset =
            (value - self.min_value) / (self.max_value - self.min_value) * (self.max_target - self.min_target);
        if self.invert {
            self.max_target - offset
        } else {
            self.min_target + offset
        }
    }

    /// The transform mapping targets back to values.
    ///
    /// Fails when the target range is empty (e.g. a one-pixel-high chart).
    pub fn inverse(&self) -> Result<Self, ScaleError> {
        Self::new(
            self.min_target,
            self.max_target,
            self.min_value,
            self.max_value,
            self.invert,
        )
    }

    /// Whether larger values map to smaller targets.
    #[inline]
    pub const fn is_inverted(&self) -> bool { self.invert }
}

/// One-shot form of [`Scale::new`] followed by [`Scale::apply`].
pub fn scale(
    value: f32,
    min_value: f32,
    max_value: f32,
    min_target: f32,
    max_target: f32,
    invert: bool,
) -> Result<f32, ScaleError> {
    Ok(Scale::new(min_value, max_value, min_target, max_target, invert)?.apply(value))
}

// =============================================================================
// Unit Tests
// =============================================================================
