//! Runtime configuration loaded from a TOML file.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) gives the reference deployment: a 240x240 panel with a 60 second
//! CO2 chart along the bottom, InfluxDB on localhost.
//!
//! ```toml
//! [display]
//! backend = "snapshot"
//! snapshot_path = "/run/airmon/frame.png"
//!
//! [chart]
//! window_secs = 300
//!
//! [store]
//! backend = "log"
//!
//! [store.tags]
//! room = "office"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use airmon_common::air_quality::{
    AirQualityWeights,
    DEFAULT_GAS_BASELINE,
    DEFAULT_HUMIDITY_BASELINE,
    DEFAULT_HUMIDITY_WEIGHTING,
};
use airmon_common::backlight::BacklightSchedule;
use airmon_common::config::{CHART_HEIGHT, CHART_ORIGIN, CHART_WINDOW, SCREEN_HEIGHT, SCREEN_WIDTH};
use airmon_common::thresholds::{
    BACKLIGHT_OFF_FROM_HOUR,
    BACKLIGHT_ON_AFTER_HOUR,
    CO2_HEALTHY_PPM,
    CO2_UNHEALTHY_PPM,
    ReferenceBand,
};
use clap::ValueEnum;
use embedded_graphics::prelude::{Point, Size};
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub display: DisplayConfig,
    pub chart: ChartConfig,
    pub reference_band: BandConfig,
    pub backlight: BacklightConfig,
    pub store: StoreConfig,
    pub sensors: SensorsConfig,
}

// =============================================================================
// Display
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayBackend {
    /// Rewrite a PNG file with every frame.
    #[default]
    Snapshot,
    /// Render and discard.
    Headless,
    /// Desktop window (requires the `simulator` feature).
    Simulator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub backend: DisplayBackend,
    pub snapshot_path: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            backend: DisplayBackend::default(),
            snapshot_path: PathBuf::from("airmon.png"),
        }
    }
}

impl DisplayConfig {
    #[inline]
    pub const fn size(&self) -> Size { Size::new(self.width, self.height) }
}

// =============================================================================
// Chart
// =============================================================================

/// Chart strip placement. The chart runs from its origin to the right edge of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub origin_x: i32,
    pub origin_y: i32,
    pub height: u32,
    pub window_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            origin_x: CHART_ORIGIN.x,
            origin_y: CHART_ORIGIN.y,
            height: CHART_HEIGHT,
            window_secs: CHART_WINDOW.as_secs(),
        }
    }
}

impl ChartConfig {
    #[inline]
    pub const fn origin(&self) -> Point { Point::new(self.origin_x, self.origin_y) }

    #[inline]
    pub const fn window(&self) -> Duration { Duration::from_secs(self.window_secs) }
}

// =============================================================================
// Thresholds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub low: f32,
    pub high: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            low: CO2_HEALTHY_PPM,
            high: CO2_UNHEALTHY_PPM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklightConfig {
    /// Backlight turns on after this hour ends.
    pub on_after_hour: u8,
    /// Backlight is off from the start of this hour.
    pub off_from_hour: u8,
}

impl Default for BacklightConfig {
    fn default() -> Self {
        Self {
            on_after_hour: BACKLIGHT_ON_AFTER_HOUR,
            off_from_hour: BACKLIGHT_OFF_FROM_HOUR,
        }
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// InfluxDB 1.x HTTP write endpoint.
    #[default]
    Influx,
    /// Emit records as log lines.
    Log,
    /// Drop records.
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub database: String,
    pub measurement: String,
    pub timeout_ms: u64,
    /// Tags attached to every record, e.g. `room = "office"`.
    pub tags: BTreeMap<String, String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: "http://localhost:8086".to_string(),
            database: "airquality".to_string(),
            measurement: "air_quality".to_string(),
            timeout_ms: 2_000,
            tags: BTreeMap::new(),
        }
    }
}

impl StoreConfig {
    #[inline]
    pub const fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_ms) }
}

// =============================================================================
// Sensors
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorsConfig {
    pub poll_interval_ms: u64,
    pub gas_baseline: f32,
    pub humidity_baseline: f32,
    pub humidity_weighting: f32,
    /// Simulated sensors fail every Nth read (0 never fails).
    pub fail_every: u32,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            gas_baseline: DEFAULT_GAS_BASELINE,
            humidity_baseline: DEFAULT_HUMIDITY_BASELINE,
            humidity_weighting: DEFAULT_HUMIDITY_WEIGHTING,
            fail_every: 0,
        }
    }
}

impl SensorsConfig {
    #[inline]
    pub const fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms) }

    pub const fn weights(&self) -> AirQualityWeights {
        AirQualityWeights {
            gas_baseline: self.gas_baseline,
            humidity_baseline: self.humidity_baseline,
            humidity_weighting: self.humidity_weighting,
        }
    }
}

// =============================================================================
// Loading and Validation
// =============================================================================

impl MonitorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(
        raw: &str,
        path: &Path,
    ) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|source| MonitorError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reference band from the `[reference_band]` section.
    pub fn band(&self) -> Result<ReferenceBand> {
        Ok(ReferenceBand::new(self.reference_band.low, self.reference_band.high)?)
    }

    /// Backlight schedule from the `[backlight]` section.
    pub fn schedule(&self) -> Result<BacklightSchedule> {
        Ok(BacklightSchedule::new(
            self.backlight.on_after_hour,
            self.backlight.off_from_hour,
        )?)
    }

    /// Chart width in columns: from the chart origin to the right edge.
    pub fn chart_width(&self) -> u32 { self.display.width.saturating_sub(self.chart.origin_x.max(0) as u32) }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.band()?;
        self.schedule()?;

        if self.display.width == 0 || self.display.height == 0 {
            return Err(MonitorError::InvalidConfig(format!(
                "display size {}x{} is empty",
                self.display.width, self.display.height
            )));
        }
        let chart_bottom = i64::from(self.chart.origin_y) + i64::from(self.chart.height);
        let fits = self.chart.origin_x >= 0
            && self.chart.origin_y >= 0
            && i64::from(self.chart.origin_x) < i64::from(self.display.width)
            && chart_bottom <= i64::from(self.display.height);
        if !fits {
            return Err(MonitorError::InvalidConfig(format!(
                "chart at ({}, {}) with height {} does not fit a {}x{} display",
                self.chart.origin_x, self.chart.origin_y, self.chart.height, self.display.width, self.display.height
            )));
        }
        if self.sensors.poll_interval_ms == 0 {
            return Err(MonitorError::InvalidConfig("poll_interval_ms must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.sensors.humidity_weighting) {
            return Err(MonitorError::InvalidConfig(format!(
                "humidity_weighting {} is outside 0..=1",
                self.sensors.humidity_weighting
            )));
        }
        let gas_ok = self.sensors.gas_baseline.is_finite() && self.sensors.gas_baseline > 0.0;
        let humidity_ok = self.sensors.humidity_baseline > 0.0 && self.sensors.humidity_baseline < 100.0;
        if !(gas_ok && humidity_ok) {
            return Err(MonitorError::InvalidConfig(
                "gas_baseline must be positive and humidity_baseline within (0, 100)".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from `path`, falling back to defaults when the file does not exist.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!("Config file not found at '{}'; using defaults.", path.display());
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| MonitorError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    MonitorConfig::from_toml(&raw, path)
}
