//! The polling loop body.
//!
//! One [`Monitor::tick`] reads every sensor once, feeds the CO2 reading into
//! the rolling window, stores a record and presents a frame. A failed sensor
//! only skips its own update: the previous values stay on screen and in the
//! next record.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use airmon_common::RollingWindow;
use airmon_common::air_quality::AirQualityWeights;
use airmon_common::frame::{CLOCK_TEXT_LEN, Readouts};
use chrono::{DateTime, Local, Timelike};
use tracing::{debug, warn};

use crate::display::DisplaySink;
use crate::error::SensorError;
use crate::pipeline::{DisplayPipeline, Presented};
use crate::sensors::{CarbonDioxideReading, GasReading, NitrogenDioxideReading, Sample, Sensor};
use crate::store::{Record, TimeSeriesSink};

/// `ctime`-style clock text, e.g. `Sun Oct 18 12:00:00 2026`.
const CLOCK_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// The three sensor capabilities.
pub struct Sensors {
    pub gas: Box<dyn Sensor<Reading = GasReading>>,
    pub nitrogen_dioxide: Box<dyn Sensor<Reading = NitrogenDioxideReading>>,
    pub carbon_dioxide: Box<dyn Sensor<Reading = CarbonDioxideReading>>,
}

/// Most recent value of every measured quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Latest {
    pub gas_score: Option<f32>,
    pub humidity: Option<f32>,
    pub air_quality_score: Option<f32>,
    pub oxidising: Option<f32>,
    pub reducing: Option<f32>,
    pub nh3: Option<f32>,
    pub adc: Option<f32>,
    pub co2: Option<f32>,
    pub temperature: Option<f32>,
    pub rel_humidity: Option<f32>,
}

/// Outcome of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Sensors that returned a reading.
    pub reads_ok: u8,
    /// Column finalized by this iteration's CO2 sample.
    pub closed_column: Option<f32>,
    pub record_written: bool,
    pub presented: Presented,
}

pub struct Monitor<S, D> {
    sensors: Sensors,
    weights: AirQualityWeights,
    window: RollingWindow,
    store: S,
    template: Record,
    pipeline: DisplayPipeline<D>,
    latest: Latest,
}

/// Epoch seconds of the monotonic instant `at`, anchored on the wall clock read at `now`.
fn epoch_seconds(
    wall_clock: &DateTime<Local>,
    now: Duration,
    at: Duration,
) -> f64 {
    wall_clock.timestamp_millis() as f64 / 1000.0 + (at.as_secs_f64() - now.as_secs_f64())
}

/// Read one sensor, logging how long it took and any failure.
fn timed_read<R>(sensor: &mut dyn Sensor<Reading = R>) -> Option<Sample<R>> {
    let started = Instant::now();
    let result: Result<Sample<R>, SensorError> = sensor.read();
    debug!(sensor = sensor.name(), elapsed_ms = started.elapsed().as_secs_f32() * 1000.0, "sensor read");

    match result {
        Ok(sample) => Some(sample),
        Err(e) => {
            warn!(sensor = sensor.name(), error = %e, "sensor read failed; keeping previous values");
            None
        }
    }
}

impl<S: TimeSeriesSink, D: DisplaySink> Monitor<S, D> {
    pub fn new(
        sensors: Sensors,
        weights: AirQualityWeights,
        window: RollingWindow,
        store: S,
        template: Record,
        pipeline: DisplayPipeline<D>,
    ) -> Self {
        Self {
            sensors,
            weights,
            window,
            store,
            template,
            pipeline,
            latest: Latest::default(),
        }
    }

    /// Run one iteration.
    ///
    /// `now` is the monotonic time of the iteration and `wall_clock` the
    /// local time read at the same moment. The record is stamped with the
    /// epoch time of the CO2 reading, or of `wall_clock` when the CO2 sensor
    /// produced nothing. `wall_clock` also drives the backlight schedule and
    /// the clock readout.
    pub fn tick(
        &mut self,
        now: Duration,
        wall_clock: DateTime<Local>,
    ) -> TickReport {
        let mut reads_ok = 0u8;
        let mut closed_column = None;
        let mut record_time = epoch_seconds(&wall_clock, now, now);

        if let Some(sample) = timed_read(self.sensors.gas.as_mut()) {
            reads_ok += 1;
            self.apply_gas(sample.reading);
        }

        if let Some(sample) = timed_read(self.sensors.nitrogen_dioxide.as_mut()) {
            reads_ok += 1;
            let r = sample.reading;
            self.latest.oxidising = Some(r.oxidising);
            self.latest.reducing = Some(r.reducing);
            self.latest.nh3 = Some(r.nh3);
            self.latest.adc = Some(r.adc);
        }

        if let Some(sample) = timed_read(self.sensors.carbon_dioxide.as_mut()) {
            reads_ok += 1;
            let r = sample.reading;
            self.latest.co2 = Some(r.co2_ppm);
            self.latest.temperature = Some(r.temperature);
            self.latest.rel_humidity = Some(r.humidity);
            record_time = epoch_seconds(&wall_clock, now, sample.taken_at);

            closed_column = self.window.add_sample(r.co2_ppm, sample.taken_at);
            if let Some(column) = closed_column {
                debug!(column, columns = self.window.len(), "chart bucket closed");
            }
        }

        let record_written = reads_ok > 0 && self.write_record(record_time);

        let readouts = self.readouts(&wall_clock);
        let presented = self
            .pipeline
            .present(wall_clock.hour(), &readouts, &self.window.plot_columns());

        TickReport {
            reads_ok,
            closed_column,
            record_written,
            presented,
        }
    }

    /// Update humidity and scores. Readings taken while the heater is settling are ignored.
    fn apply_gas(
        &mut self,
        reading: GasReading,
    ) {
        if !reading.heat_stable {
            debug!("gas heater not stable yet");
            return;
        }
        let aq = self.weights.score(reading.gas_resistance, reading.humidity);
        self.latest.humidity = Some(reading.humidity);
        self.latest.gas_score = Some(aq.gas_score);
        self.latest.air_quality_score = Some(aq.score());
    }

    /// Build a record from every known value, starting from the measurement/tag template.
    /// `time` is in seconds since the Unix epoch.
    pub fn record(
        &self,
        time: f64,
    ) -> Record {
        let l = &self.latest;
        let fields = [
            ("gas_score", l.gas_score),
            ("humidity", l.humidity),
            ("air_quality_score", l.air_quality_score),
            ("oxidising", l.oxidising),
            ("reducing", l.reducing),
            ("nh3", l.nh3),
            ("adc", l.adc),
            ("co2", l.co2),
            ("temp", l.temperature),
            ("rel_humidity", l.rel_humidity),
        ];
        fields
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .fold(self.template.clone(), |record, (name, v)| record.field(name, v))
            .field("time", time)
    }

    fn write_record(
        &mut self,
        time: f64,
    ) -> bool {
        let record = self.record(time);
        match self.store.write(&record) {
            Ok(()) => true,
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "record not stored");
                false
            }
        }
    }

    fn readouts(
        &self,
        wall_clock: &DateTime<Local>,
    ) -> Readouts {
        let mut clock: heapless::String<CLOCK_TEXT_LEN> = heapless::String::new();
        let _ = write!(clock, "{}", wall_clock.format(CLOCK_FORMAT));
        Readouts {
            co2_ppm: self.latest.co2,
            temperature: self.latest.temperature,
            humidity: self.latest.humidity,
            air_quality: self.latest.air_quality_score,
            clock,
        }
    }

    #[inline]
    pub fn latest(&self) -> &Latest { &self.latest }

    #[inline]
    pub fn window(&self) -> &RollingWindow { &self.window }

    #[cfg(test)]
    pub fn store(&self) -> &S { &self.store }

    #[cfg(test)]
    pub fn pipeline(&self) -> &DisplayPipeline<D> { &self.pipeline }

    /// Whether the display asked the loop to stop.
    pub fn quit_requested(&mut self) -> bool { self.pipeline.sink_mut().quit_requested() }
}
