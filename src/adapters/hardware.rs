//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`LightSensor`] and the [`Indicator`], exposing them through
//! [`SensorPort`] and [`ActuatorPort`].  This is the only module in the
//! system that touches actual hardware; the bus, pin and delay types are
//! generic so the same adapter is assembled from `esp-idf-hal` drivers on
//! target and from mocks on the host.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::indicator::{Indicator, IndicatorLevel};
use crate::error::{ActuatorError, SensorError};
use crate::fsm::Action;
use crate::sensors::LightSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<I2C, P, D> {
    sensor: LightSensor<I2C>,
    indicator: Indicator<P, D>,
}

impl<I2C, P, D> HardwareAdapter<I2C, P, D>
where
    I2C: I2c,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(sensor: LightSensor<I2C>, indicator: Indicator<P, D>) -> Self {
        Self { sensor, indicator }
    }

    pub fn indicator_level(&self) -> IndicatorLevel {
        self.indicator.level()
    }

    /// Pick up the actuator-side fields of a new configuration.  Pair
    /// with `AppCommand::UpdateConfig`, which only reaches the service.
    pub fn reconfigure(&mut self, config: &SystemConfig) {
        self.indicator
            .set_pulse_timing(config.pulse_on_ms, config.pulse_off_ms);
    }

    pub fn pulse_count(&self) -> u32 {
        self.indicator.pulse_count()
    }

    /// Drive the indicator inactive outside the state machine.
    pub fn all_off(&mut self) -> Result<(), ActuatorError> {
        self.indicator.off()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<I2C, P, D> SensorPort for HardwareAdapter<I2C, P, D>
where
    I2C: I2c,
    P: OutputPin,
    D: DelayNs,
{
    fn read_sample(&mut self) -> Result<f32, SensorError> {
        self.sensor.read_sample()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I2C, P, D> ActuatorPort for HardwareAdapter<I2C, P, D>
where
    I2C: I2c,
    P: OutputPin,
    D: DelayNs,
{
    fn apply(&mut self, action: Action) -> Result<(), ActuatorError> {
        self.indicator.apply(action)
    }
}
