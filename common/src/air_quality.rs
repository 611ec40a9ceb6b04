//! Composite air-quality score from gas resistance and relative humidity.
//!
//! The score is a 0..=100 percentage (higher is cleaner air). A weighted
//! share comes from how close humidity is to a comfortable baseline; the
//! remainder comes from gas resistance relative to a clean-air baseline.
//! Resistance drops as volatile compounds rise, so anything at or above the
//! baseline earns the full gas share.

/// Clean-air gas resistance in ohms.
pub const DEFAULT_GAS_BASELINE: f32 = 111_182.57;

/// Ideal relative humidity in percent.
pub const DEFAULT_HUMIDITY_BASELINE: f32 = 40.0;

/// Share of the score given to humidity (0.0..=1.0).
pub const DEFAULT_HUMIDITY_WEIGHTING: f32 = 0.25;

/// Baselines and weighting for [`AirQualityWeights::score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualityWeights {
    pub gas_baseline: f32,
    pub humidity_baseline: f32,
    pub humidity_weighting: f32,
}

impl Default for AirQualityWeights {
    fn default() -> Self {
        Self {
            gas_baseline: DEFAULT_GAS_BASELINE,
            humidity_baseline: DEFAULT_HUMIDITY_BASELINE,
            humidity_weighting: DEFAULT_HUMIDITY_WEIGHTING,
        }
    }
}

/// Breakdown of one air-quality computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQuality {
    /// Humidity share, `0..=weighting*100`.
    pub humidity_score: f32,
    /// Gas share, `0..=(1-weighting)*100`.
    pub gas_score: f32,
}

impl AirQuality {
    /// Combined score.
    #[inline]
    pub fn score(&self) -> f32 { self.humidity_score + self.gas_score }
}

impl AirQualityWeights {
    /// Score a gas resistance (ohms) and relative humidity (percent).
    pub fn score(
        &self,
        gas_resistance: f32,
        humidity: f32,
    ) -> AirQuality {
        let humidity_share = self.humidity_weighting * 100.0;
        let gas_share = 100.0 - humidity_share;

        let hb = self.humidity_baseline;
        let hum_offset = humidity - hb;
        let humidity_score = if hum_offset > 0.0 {
            (100.0 - hb - hum_offset) / (100.0 - hb) * humidity_share
        } else {
            (hb + hum_offset) / hb * humidity_share
        };

        let gas_offset = self.gas_baseline - gas_resistance;
        let gas_score = if gas_offset > 0.0 {
            gas_resistance / self.gas_baseline * gas_share
        } else {
            gas_share
        };

        AirQuality {
            humidity_score,
            gas_score,
        }
    }
}
