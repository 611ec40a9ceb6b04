//! Error types for the monitor binary.
//!
//! Startup problems surface as [`MonitorError`] and end the process. Sensor,
//! store and display errors are transient: the loop logs them and carries on.

use std::path::PathBuf;

use airmon_common::backlight::ScheduleError;
use airmon_common::rolling_window::WindowError;
use airmon_common::thresholds::BandError;
use thiserror::Error;

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("cannot read config '{}': {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in '{}': {source}", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid chart geometry: {0}")]
    Window(#[from] WindowError),

    #[error("invalid reference band: {0}")]
    Band(#[from] BandError),

    #[error("invalid backlight hours: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("display backend unavailable: {0}")]
    Display(#[from] DisplayError),
}

/// A single failed sensor read.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("{sensor}: no data ready")]
    NotReady { sensor: &'static str },

    #[error("{sensor}: bus error: {reason}")]
    Bus { sensor: &'static str, reason: String },
}

/// A failed time-series write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record has no fields")]
    EmptyRecord,

    #[error("store rejected write with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("store unreachable: {0}")]
    Transport(String),
}

impl From<ureq::Error> for StoreError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => Self::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

/// A failed display update.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("backend '{0}' is not compiled in")]
    Unsupported(&'static str),
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
