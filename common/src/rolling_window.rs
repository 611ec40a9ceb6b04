//! Time-bucketed rolling history for the strip chart.
//!
//! Raw samples arrive at irregular times. They are grouped into fixed-length
//! buckets (`window_duration / width`), each bucket is averaged into one
//! column, and the most recent columns are kept in a fixed-capacity deque.
//!
//! # Bucket State Machine
//!
//! ```text
//!            first sample                 sample, elapsed <= bucket_duration
//!   Empty ───────────────▶ Open ◀──────────────────────────────────────────┐
//!                           │                                              │
//!                           └─ sample, elapsed > bucket_duration ──────────┘
//!                              (push mean as column, reopen with sample)
//! ```
//!
//! Closing is lazy: it only happens when the *next* sample arrives late, and
//! at most one bucket closes per sample. A gap spanning several bucket
//! durations still yields a single column; no placeholder columns are
//! inserted for the skipped time.

use core::time::Duration;

use heapless::{Deque, Vec};
use thiserror::Error;

// =============================================================================
// Configuration Constants
// =============================================================================

/// Maximum number of chart columns (widest supported panel).
pub const MAX_CHART_WIDTH: usize = 320;

/// Smallest usable chart dimension: a line needs two columns and two rows.
pub const MIN_CHART_DIMENSION: usize = 2;

/// Columns as handed to the renderer: finalized history plus the live value.
pub type PlotColumns = Vec<f32, MAX_CHART_WIDTH>;

// =============================================================================
// Errors
// =============================================================================

/// Errors from building a [`RollingWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Width is below [`MIN_CHART_DIMENSION`] or above [`MAX_CHART_WIDTH`].
    #[error("chart width {0} is outside 2..=320")]
    Width(usize),
    /// Height is below [`MIN_CHART_DIMENSION`].
    #[error("chart height {0} is below 2")]
    Height(u32),
    /// `window_duration / width` rounds down to zero.
    #[error("window duration too short for {width} columns")]
    Duration { width: usize },
}

// =============================================================================
// Bucket
// =============================================================================

/// The bucket currently collecting samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bucket {
    /// No samples since the last close (or since startup).
    #[default]
    Empty,
    /// At least one sample has been collected.
    Open {
        /// Timestamp of the first sample in this bucket.
        started_at: Duration,
        /// Sum of the collected samples.
        sum: f64,
        /// Number of collected samples.
        count: u32,
    },
}

impl Bucket {
    /// Mean of the collected samples, if any.
    pub fn mean(&self) -> Option<f32> {
        match *self {
            Self::Empty => None,
            Self::Open { sum, count, .. } => Some((sum / f64::from(count)) as f32),
        }
    }

    /// Whether this bucket has outlived `bucket_duration` at time `now`.
    ///
    /// Timestamps earlier than the bucket start never expire it.
    fn is_expired(
        &self,
        now: Duration,
        bucket_duration: Duration,
    ) -> bool {
        match *self {
            Self::Empty => false,
            Self::Open { started_at, .. } => now.saturating_sub(started_at) > bucket_duration,
        }
    }

    /// Add a sample, opening the bucket at `now` if it was empty.
    fn push(
        &mut self,
        value: f32,
        now: Duration,
    ) {
        *self = match *self {
            Self::Empty => Self::Open {
                started_at: now,
                sum: f64::from(value),
                count: 1,
            },
            Self::Open { started_at, sum, count } => Self::Open {
                started_at,
                sum: sum + f64::from(value),
                count: count.saturating_add(1),
            },
        };
    }
}

// =============================================================================
// Rolling Window
// =============================================================================

/// Bounded, time-bucketed history of one reading.
///
/// Finalized columns are capped at `width - 1` so that the history plus the
/// provisional live column fills at most `width` pixel columns.
pub struct RollingWindow {
    width: usize,
    height: u32,
    bucket_duration: Duration,

    /// Finalized column averages, oldest first.
    columns: Deque<f32, MAX_CHART_WIDTH>,

    /// Bucket currently collecting samples.
    bucket: Bucket,

    /// Most recent raw sample.
    latest: Option<f32>,
}

impl RollingWindow {
    /// Create a window spanning `window_duration` across `width` columns.
    pub fn new(
        width: usize,
        height: u32,
        window_duration: Duration,
    ) -> Result<Self, WindowError> {
        if !(MIN_CHART_DIMENSION..=MAX_CHART_WIDTH).contains(&width) {
            return Err(WindowError::Width(width));
        }
        if height < MIN_CHART_DIMENSION as u32 {
            return Err(WindowError::Height(height));
        }
        let bucket_duration = window_duration / width as u32;
        if bucket_duration.is_zero() {
            return Err(WindowError::Duration { width });
        }

        Ok(Self {
            width,
            height,
            bucket_duration,
            columns: Deque::new(),
            bucket: Bucket::Empty,
            latest: None,
        })
    }

    /// Ingest one raw sample taken at `now`.
    ///
    /// If the open bucket has outlived the bucket duration it is closed first
    /// and its mean becomes the newest column; the sample then starts a fresh
    /// bucket. Returns the column that was finalized, if any.
    ///
    /// Non-finite samples are ignored and leave the window untouched.
    pub fn add_sample(
        &mut self,
        value: f32,
        now: Duration,
    ) -> Option<f32> {
        if !value.is_finite() {
            return None;
        }

        let closed = if self.bucket.is_expired(now, self.bucket_duration) {
            self.close_bucket()
        } else {
            None
        };

        self.latest = Some(value);
        self.bucket.push(value, now);
        closed
    }

    fn close_bucket(&mut self) -> Option<f32> {
        let mean = self.bucket.mean()?;
        self.bucket = Bucket::Empty;

        while self.columns.len() >= self.width - 1 {
            self.columns.pop_front();
        }
        self.columns.push_back(mean).ok();
        Some(mean)
    }

    /// Finalized columns plus the latest raw value as a provisional column.
    ///
    /// Does not mutate the window, so the live value can be redrawn on
    /// every frame without waiting for its bucket to close.
    pub fn plot_columns(&self) -> PlotColumns {
        let mut out = PlotColumns::new();
        for &column in self.columns.iter() {
            out.push(column).ok();
        }
        if let Some(latest) = self.latest {
            out.push(latest).ok();
        }
        out
    }

    /// Finalized columns, oldest first.
    pub fn columns(&self) -> impl Iterator<Item = f32> + '_ { self.columns.iter().copied() }

    /// Number of finalized columns.
    #[inline]
    pub fn len(&self) -> usize { self.columns.len() }

    /// Whether no column has been finalized yet.
    #[inline]
    pub fn is_empty(&self) -> bool { self.columns.is_empty() }

    /// Most recent raw sample.
    #[inline]
    pub const fn latest(&self) -> Option<f32> { self.latest }

    /// Time span covered by one column.
    #[inline]
    pub const fn bucket_duration(&self) -> Duration { self.bucket_duration }

    /// Start of the open bucket, if one is open.
    pub const fn bucket_started_at(&self) -> Option<Duration> {
        match self.bucket {
            Bucket::Empty => None,
            Bucket::Open { started_at, .. } => Some(started_at),
        }
    }

    /// Number of samples waiting in the open bucket.
    pub const fn pending_len(&self) -> u32 {
        match self.bucket {
            Bucket::Empty => 0,
            Bucket::Open { count, .. } => count,
        }
    }

    /// Current bucket state.
    #[inline]
    pub const fn bucket(&self) -> &Bucket { &self.bucket }

    /// Chart width in columns.
    #[inline]
    pub const fn width(&self) -> usize { self.width }

    /// Chart height in rows.
    #[inline]
    pub const fn height(&self) -> u32 { self.height }
}

// =============================================================================
// Unit Tests
// =============================================================================
