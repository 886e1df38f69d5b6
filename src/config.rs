//! System configuration parameters
//!
//! All tunable parameters for the ambilamp controller.  Thresholds are
//! expressed in the native unit of the selected [`SensorSource`]; there is
//! no global unit, so a config is only meaningful together with its source.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::Thresholds;

/// Which physical quantity is sampled as the light-intensity proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorSource {
    /// INA219 current register, milliamps (photodiode / solar-cell loop).
    Ina219Current,
    /// INA219 bus voltage register, volts (LDR divider).
    Ina219BusVoltage,
    /// Raw ADC counts (0 – 4095).
    AdcRaw,
}

impl SensorSource {
    /// Unit suffix for log lines.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Ina219Current => "mA",
            Self::Ina219BusVoltage => "V",
            Self::AdcRaw => "counts",
        }
    }
}

/// What happens to the pending state when the indicator action fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Keep the current state; the transition is retried on a later cycle.
    Withhold,
    /// Commit the target state anyway and report the failure.
    Commit,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Sensing ---
    pub sensor_source: SensorSource,
    /// Dark/Dim boundary (native unit).
    pub low_threshold: f32,
    /// Dim/Bright boundary (native unit).
    pub high_threshold: f32,
    /// Hysteresis half-width around each threshold (native unit, 0 = off).
    pub hysteresis: f32,

    // --- Control ---
    /// Cycles a state must be held before another transition is allowed.
    pub min_dwell_cycles: u32,
    pub commit_policy: CommitPolicy,

    // --- Indicator ---
    /// Pulse high time for `PulseOnce` (milliseconds).
    pub pulse_on_ms: u32,
    /// Pulse low time for `PulseOnce` (milliseconds).
    pub pulse_off_ms: u32,
    /// Output is asserted by driving the pin LOW.
    pub indicator_active_low: bool,

    // --- INA219 ---
    /// 7-bit I2C address.
    pub ina219_address: u8,
    /// CONFIG register: 32 V bus range, PGA /8, 12-bit ADCs, continuous.
    pub ina219_config: u16,
    /// CALIBRATION register value for a 0.1 Ω shunt.
    pub ina219_calibration: u16,
    /// Milliamps per current-register LSB (follows from the calibration).
    pub ina219_current_lsb_ma: f32,
    pub i2c_baudrate_hz: u32,

    // --- Timing / telemetry ---
    /// Fixed delay between cycles (milliseconds).
    pub poll_interval_ms: u32,
    /// Emit one `Sample` event per cycle.
    pub log_samples: bool,
    /// Emit a statistics event every N cycles (0 = never).
    pub stats_interval_cycles: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sensing
            sensor_source: SensorSource::Ina219Current,
            low_threshold: 0.33,
            high_threshold: 6.6,
            hysteresis: 0.0,

            // Control
            min_dwell_cycles: 0,
            commit_policy: CommitPolicy::Withhold,

            // Indicator
            pulse_on_ms: 150,
            pulse_off_ms: 150,
            indicator_active_low: false,

            // INA219
            ina219_address: 0x40,
            ina219_config: 0x019F,
            ina219_calibration: 4096,
            ina219_current_lsb_ma: 0.1,
            i2c_baudrate_hz: 100_000,

            // Timing
            poll_interval_ms: 500, // 2 Hz
            log_samples: true,
            stats_interval_cycles: 120, // 1/min at 2 Hz
        }
    }
}

impl SystemConfig {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.low_threshold, self.high_threshold)
    }

    /// Check that `next` can replace `self` on a running system.
    ///
    /// The sensor source, bus and polarity are fixed at bring-up; a
    /// runtime update that changes them would leave the thresholds in a
    /// different unit from the samples actually read.
    pub fn check_runtime_update(&self, next: &SystemConfig) -> Result<(), ConfigError> {
        if next.sensor_source != self.sensor_source {
            return Err(ConfigError::ValidationFailed(
                "sensor_source cannot change at runtime",
            ));
        }
        if next.ina219_address != self.ina219_address
            || next.ina219_config != self.ina219_config
            || next.ina219_calibration != self.ina219_calibration
            || next.ina219_current_lsb_ma.to_bits() != self.ina219_current_lsb_ma.to_bits()
            || next.i2c_baudrate_hz != self.i2c_baudrate_hz
        {
            return Err(ConfigError::ValidationFailed(
                "INA219 / I2C settings cannot change at runtime",
            ));
        }
        if next.indicator_active_low != self.indicator_active_low {
            return Err(ConfigError::ValidationFailed(
                "indicator_active_low cannot change at runtime",
            ));
        }
        next.validate()
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.low_threshold.is_finite() || !self.high_threshold.is_finite() {
            return Err(ConfigError::ValidationFailed("thresholds must be finite"));
        }
        if self.low_threshold >= self.high_threshold {
            return Err(ConfigError::ValidationFailed(
                "low_threshold >= high_threshold",
            ));
        }
        if !self.hysteresis.is_finite() || self.hysteresis < 0.0 {
            return Err(ConfigError::ValidationFailed("hysteresis must be >= 0"));
        }
        // Shifted bands must not cross: low + h < high - h.
        if self.hysteresis * 2.0 >= self.high_threshold - self.low_threshold {
            return Err(ConfigError::ValidationFailed(
                "hysteresis wider than half the dim band",
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if self.pulse_on_ms == 0 {
            return Err(ConfigError::ValidationFailed("pulse_on_ms must be > 0"));
        }
        if self.sensor_source != SensorSource::AdcRaw {
            if self.ina219_address > 0x7F {
                return Err(ConfigError::ValidationFailed("ina219_address is not 7-bit"));
            }
            if !(self.ina219_current_lsb_ma.is_finite() && self.ina219_current_lsb_ma > 0.0) {
                return Err(ConfigError::ValidationFailed(
                    "ina219_current_lsb_ma must be > 0",
                ));
            }
            if self.i2c_baudrate_hz == 0 {
                return Err(ConfigError::ValidationFailed("i2c_baudrate_hz must be > 0"));
            }
        }
        Ok(())
    }
}
