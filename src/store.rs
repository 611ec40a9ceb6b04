//! Time-series persistence.
//!
//! Each monitor iteration produces one [`Record`]: a measurement name plus a
//! map of numeric fields. Records go to a [`TimeSeriesSink`]; the default
//! backend posts InfluxDB line protocol to a 1.x `/write` endpoint and lets
//! the server assign the timestamp.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use tracing::info;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;

// =============================================================================
// Record
// =============================================================================

/// One row of measurements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            ..Self::default()
        }
    }

    /// Add a field. Non-finite values are dropped since the store cannot represent them.
    pub fn field(
        mut self,
        name: &str,
        value: impl Into<f64>,
    ) -> Self {
        let value = value.into();
        if value.is_finite() {
            self.fields.insert(name.to_string(), value);
        }
        self
    }

    pub fn tag(
        mut self,
        key: &str,
        value: &str,
    ) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// Encode as a single line of InfluxDB line protocol, without a timestamp.
    pub fn to_line_protocol(&self) -> String {
        let mut line = String::new();
        push_escaped(&mut line, &self.measurement, &[',', ' ']);
        for (key, value) in &self.tags {
            line.push(',');
            push_escaped(&mut line, key, &[',', '=', ' ']);
            line.push('=');
            push_escaped(&mut line, value, &[',', '=', ' ']);
        }
        for (i, (name, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            push_escaped(&mut line, name, &[',', '=', ' ']);
            let _ = write!(line, "={value:?}");
        }
        line
    }
}

/// Backslash-escape `special` characters (and backslashes) while appending.
fn push_escaped(
    out: &mut String,
    raw: &str,
    special: &[char],
) {
    for c in raw.chars() {
        if c == '\\' || special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Append-only time-series store.
pub trait TimeSeriesSink {
    fn name(&self) -> &'static str;

    fn write(
        &mut self,
        record: &Record,
    ) -> Result<(), StoreError>;
}

impl<T: TimeSeriesSink + ?Sized> TimeSeriesSink for Box<T> {
    fn name(&self) -> &'static str { (**self).name() }

    fn write(
        &mut self,
        record: &Record,
    ) -> Result<(), StoreError> {
        (**self).write(record)
    }
}

/// InfluxDB 1.x HTTP write endpoint.
pub struct InfluxSink {
    write_url: String,
    database: String,
    timeout: Duration,
}

impl InfluxSink {
    pub fn new(
        base_url: &str,
        database: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            write_url: format!("{}/write", base_url.trim_end_matches('/')),
            database: database.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn write_url(&self) -> &str { &self.write_url }
}

impl TimeSeriesSink for InfluxSink {
    fn name(&self) -> &'static str { "influx" }

    fn write(
        &mut self,
        record: &Record,
    ) -> Result<(), StoreError> {
        if record.is_empty() {
            return Err(StoreError::EmptyRecord);
        }

        ureq::post(&self.write_url)
            .query("db", &self.database)
            .timeout(self.timeout)
            .send_string(&record.to_line_protocol())?;
        Ok(())
    }
}

/// Writes each record to the log at info level.
pub struct LogSink;

impl TimeSeriesSink for LogSink {
    fn name(&self) -> &'static str { "log" }

    fn write(
        &mut self,
        record: &Record,
    ) -> Result<(), StoreError> {
        if record.is_empty() {
            return Err(StoreError::EmptyRecord);
        }
        info!(target: "airmon::store", "{}", record.to_line_protocol());
        Ok(())
    }
}

/// Discards every record.
pub struct NullSink;

impl TimeSeriesSink for NullSink {
    fn name(&self) -> &'static str { "null" }

    fn write(
        &mut self,
        _record: &Record,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Empty record carrying the configured measurement name and tags.
pub fn record_template(config: &StoreConfig) -> Record {
    config
        .tags
        .iter()
        .fold(Record::new(config.measurement.as_str()), |record, (key, value)| record.tag(key, value))
}

/// Build the sink selected by `config`, with `backend` overriding the configured one.
pub fn open(
    config: &StoreConfig,
    backend: Option<StoreBackend>,
) -> Box<dyn TimeSeriesSink> {
    match backend.unwrap_or(config.backend) {
        StoreBackend::Influx => Box::new(InfluxSink::new(&config.url, &config.database, config.timeout())),
        StoreBackend::Log => Box::new(LogSink),
        StoreBackend::Null => Box::new(NullSink),
    }
}
