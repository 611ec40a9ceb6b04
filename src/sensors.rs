//! Sensor capabilities and simulated backends.
//!
//! The monitor talks to three sensors through the [`Sensor`] trait:
//!
//! | Sensor | Reading | Used for |
//! |--------|---------|----------|
//! | Gas (BME68x class) | resistance, humidity, heater state | Air-quality score |
//! | NO2 (MICS6814 class) | oxidising, reducing, NH3, ADC | Stored only |
//! | CO2 (SCD4x class) | CO2, temperature, humidity | Chart and background |
//!
//! The shipped backends generate smooth synthetic signals so the monitor can
//! run on any machine. They can be told to fail every Nth read to exercise
//! the fault path.

use std::time::Duration;

use crate::error::SensorError;
use crate::timing::MonotonicClock;

// =============================================================================
// Capability
// =============================================================================

/// One reading and the monotonic time it was taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<R> {
    pub reading: R,
    pub taken_at: Duration,
}

/// A device that produces readings on demand.
pub trait Sensor {
    type Reading;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Take one reading. Failures are transient; the caller simply tries again next poll.
    fn read(&mut self) -> Result<Sample<Self::Reading>, SensorError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasReading {
    /// Gas resistance in ohms.
    pub gas_resistance: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Whether the hot plate reached its target temperature.
    pub heat_stable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NitrogenDioxideReading {
    pub oxidising: f32,
    pub reducing: f32,
    pub nh3: f32,
    pub adc: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonDioxideReading {
    pub co2_ppm: f32,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

// =============================================================================
// Simulated Backends
// =============================================================================

/// Generate a sinusoidal signal oscillating between min and max values.
///
/// # Parameters
/// - `t`: Time in seconds
/// - `min`: Minimum output value
/// - `max`: Maximum output value
/// - `freq`: Angular frequency in radians per second
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}

/// Fails every `every`th read; `0` never fails.
#[derive(Debug, Clone, Copy)]
struct FaultInjector {
    every: u32,
    reads: u32,
}

impl FaultInjector {
    const fn new(every: u32) -> Self { Self { every, reads: 0 } }

    fn should_fail(&mut self) -> bool {
        self.reads = self.reads.wrapping_add(1);
        self.every != 0 && self.reads % self.every == 0
    }
}

/// Number of reads before the simulated gas heater is stable.
const GAS_WARMUP_READS: u32 = 3;

pub struct SimulatedGasSensor {
    clock: MonotonicClock,
    faults: FaultInjector,
    reads: u32,
}

impl SimulatedGasSensor {
    pub const fn new(
        clock: MonotonicClock,
        fail_every: u32,
    ) -> Self {
        Self {
            clock,
            faults: FaultInjector::new(fail_every),
            reads: 0,
        }
    }
}

impl Sensor for SimulatedGasSensor {
    type Reading = GasReading;

    fn name(&self) -> &'static str { "gas" }

    fn read(&mut self) -> Result<Sample<GasReading>, SensorError> {
        if self.faults.should_fail() {
            return Err(SensorError::NotReady { sensor: self.name() });
        }
        self.reads = self.reads.saturating_add(1);

        let taken_at = self.clock.now();
        let t = taken_at.as_secs_f32();
        Ok(Sample {
            reading: GasReading {
                gas_resistance: fake_signal(t, 60_000.0, 140_000.0, 0.05),
                humidity: fake_signal(t, 30.0, 60.0, 0.02),
                heat_stable: self.reads > GAS_WARMUP_READS,
            },
            taken_at,
        })
    }
}

pub struct SimulatedNitrogenDioxideSensor {
    clock: MonotonicClock,
    faults: FaultInjector,
}

impl SimulatedNitrogenDioxideSensor {
    pub const fn new(
        clock: MonotonicClock,
        fail_every: u32,
    ) -> Self {
        Self {
            clock,
            faults: FaultInjector::new(fail_every),
        }
    }
}

impl Sensor for SimulatedNitrogenDioxideSensor {
    type Reading = NitrogenDioxideReading;

    fn name(&self) -> &'static str { "no2" }

    fn read(&mut self) -> Result<Sample<NitrogenDioxideReading>, SensorError> {
        if self.faults.should_fail() {
            return Err(SensorError::Bus {
                sensor: self.name(),
                reason: "ADC conversion timed out".to_string(),
            });
        }

        let taken_at = self.clock.now();
        let t = taken_at.as_secs_f32();
        Ok(Sample {
            reading: NitrogenDioxideReading {
                oxidising: fake_signal(t, 5_000.0, 40_000.0, 0.07),
                reducing: fake_signal(t, 200_000.0, 900_000.0, 0.03),
                nh3: fake_signal(t, 50_000.0, 300_000.0, 0.04),
                adc: fake_signal(t, 0.5, 1.5, 0.11),
            },
            taken_at,
        })
    }
}

pub struct SimulatedCarbonDioxideSensor {
    clock: MonotonicClock,
    faults: FaultInjector,
}

impl SimulatedCarbonDioxideSensor {
    pub const fn new(
        clock: MonotonicClock,
        fail_every: u32,
    ) -> Self {
        Self {
            clock,
            faults: FaultInjector::new(fail_every),
        }
    }
}

impl Sensor for SimulatedCarbonDioxideSensor {
    type Reading = CarbonDioxideReading;

    fn name(&self) -> &'static str { "co2" }

    fn read(&mut self) -> Result<Sample<CarbonDioxideReading>, SensorError> {
        if self.faults.should_fail() {
            return Err(SensorError::NotReady { sensor: self.name() });
        }

        let taken_at = self.clock.now();
        let t = taken_at.as_secs_f32();
        Ok(Sample {
            reading: CarbonDioxideReading {
                co2_ppm: fake_signal(t, 420.0, 1_400.0, 0.1),
                temperature: fake_signal(t, 19.0, 25.0, 0.01),
                humidity: fake_signal(t, 35.0, 55.0, 0.02),
            },
            taken_at,
        })
    }
}
