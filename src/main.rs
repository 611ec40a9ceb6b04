//! Air-quality monitor.
//!
//! Polls a gas sensor, an NO2 sensor and a CO2 sensor once per interval,
//! stores every reading in a time-series database and shows the current
//! values plus a rolling CO2 strip chart on a 240x240 panel.
//!
//! Run with: `RUST_LOG=info airmon --config airmon.toml`
//!
//! # Loop
//!
//! ```text
//! ┌──────────── every poll interval (default 1 s) ────────────┐
//! │ read gas ─▶ read NO2 ─▶ read CO2 ─▶ rolling window        │
//! │                                        │                  │
//! │ write record ◀─────────────────────────┤                  │
//! │ compose frame ◀────────────────────────┘                  │
//! │ sleep for the rest of the interval                        │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Sensor, store and display failures are logged and never stop the loop.
//! Configuration and geometry errors abort at startup.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod config;
mod display;
mod error;
mod monitor;
mod pipeline;
mod sensors;
mod store;
mod timing;

use std::path::PathBuf;
use std::time::Instant;

use airmon_common::frame::FrameLayout;
use airmon_common::{RollingWindow, StripChart};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{DisplayBackend, MonitorConfig, StoreBackend};
use crate::monitor::{Monitor, Sensors};
use crate::pipeline::DisplayPipeline;
use crate::sensors::{SimulatedCarbonDioxideSensor, SimulatedGasSensor, SimulatedNitrogenDioxideSensor};
use crate::timing::{MonotonicClock, sleep_remaining};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "airmon.toml")]
    config: PathBuf,

    /// Override the configured display backend.
    #[arg(long, value_enum)]
    display: Option<DisplayBackend>,

    /// Override the configured store backend.
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// Run a single iteration and exit.
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    info!("airmon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load(&cli.config).context("loading configuration")?;
    let clock = MonotonicClock::start();
    let mut monitor = build_monitor(&config, &cli, clock).context("initializing monitor")?;
    let poll_interval = config.sensors.poll_interval();

    loop {
        let iteration_start = Instant::now();

        let report = monitor.tick(clock.now(), chrono::Local::now());
        debug!(
            reads_ok = report.reads_ok,
            record_written = report.record_written,
            presented = ?report.presented,
            "iteration complete"
        );

        if cli.once || monitor.quit_requested() {
            info!(columns = monitor.window().len(), co2 = ?monitor.latest().co2, "stopping");
            return Ok(());
        }

        sleep_remaining(poll_interval, iteration_start.elapsed());
    }
}

/// Wire sensors, store and display into a [`Monitor`].
fn build_monitor(
    config: &MonitorConfig,
    cli: &Cli,
    clock: MonotonicClock,
) -> error::Result<Monitor<Box<dyn store::TimeSeriesSink>, Box<dyn display::DisplaySink>>> {
    let band = config.band()?;
    let schedule = config.schedule()?;

    let window = RollingWindow::new(config.chart_width() as usize, config.chart.height, config.chart.window())?;
    let layout = FrameLayout {
        chart_origin: config.chart.origin(),
        chart: StripChart::for_window(&window, band),
    };
    info!(
        columns = window.width(),
        bucket_ms = window.bucket_duration().as_millis() as u64,
        "chart window ready"
    );

    let sink = display::open(&config.display, cli.display)?;
    info!(backend = sink.name(), "display opened");
    let pipeline = DisplayPipeline::new(
        sink,
        config.display.size(),
        layout,
        schedule,
    );

    let store = store::open(&config.store, cli.store);
    info!(backend = store.name(), database = %config.store.database, "store opened");

    let fail_every = config.sensors.fail_every;
    let sensors = Sensors {
        gas: Box::new(SimulatedGasSensor::new(clock, fail_every)),
        nitrogen_dioxide: Box::new(SimulatedNitrogenDioxideSensor::new(clock, fail_every)),
        carbon_dioxide: Box::new(SimulatedCarbonDioxideSensor::new(clock, fail_every)),
    };

    Ok(Monitor::new(
        sensors,
        config.sensors.weights(),
        window,
        store,
        store::record_template(&config.store),
        pipeline,
    ))
}
