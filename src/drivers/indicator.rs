//! Indicator LED driver.
//!
//! One digital output, generic over [`OutputPin`] so it drives an
//! `esp-idf-hal` `PinDriver` on target and a recording pin in tests.
//! `PulseOnce` blocks for `pulse_on_ms + pulse_off_ms` using the injected
//! [`DelayNs`]; the pulse always ends at the inactive level.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::config::SystemConfig;
use crate::error::ActuatorError;
use crate::fsm::Action;

/// Last level the driver put the output in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorLevel {
    Off,
    On,
    /// A pulse completed; the output is at the inactive level.
    Pulsed,
}

pub struct Indicator<P, D> {
    pin: P,
    delay: D,
    active_low: bool,
    pulse_on_ms: u32,
    pulse_off_ms: u32,
    level: IndicatorLevel,
    pulse_count: u32,
}

impl<P: OutputPin, D: DelayNs> Indicator<P, D> {
    pub fn new(pin: P, delay: D, config: &SystemConfig) -> Self {
        Self {
            pin,
            delay,
            active_low: config.indicator_active_low,
            pulse_on_ms: config.pulse_on_ms,
            pulse_off_ms: config.pulse_off_ms,
            level: IndicatorLevel::Off,
            pulse_count: 0,
        }
    }

    /// Execute one transition action.
    pub fn apply(&mut self, action: Action) -> Result<(), ActuatorError> {
        match action {
            Action::AssertOff => self.off(),
            Action::AssertOn => self.on(),
            Action::PulseOnce => self.pulse_once(),
        }
    }

    pub fn on(&mut self) -> Result<(), ActuatorError> {
        self.drive(true)?;
        self.level = IndicatorLevel::On;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.drive(false)?;
        self.level = IndicatorLevel::Off;
        Ok(())
    }

    pub fn pulse_once(&mut self) -> Result<(), ActuatorError> {
        self.drive(true)?;
        self.delay.delay_ms(self.pulse_on_ms);
        self.drive(false)?;
        self.delay.delay_ms(self.pulse_off_ms);
        self.level = IndicatorLevel::Pulsed;
        self.pulse_count = self.pulse_count.wrapping_add(1);
        Ok(())
    }

    pub fn set_pulse_timing(&mut self, on_ms: u32, off_ms: u32) {
        self.pulse_on_ms = on_ms;
        self.pulse_off_ms = off_ms;
    }

    pub fn level(&self) -> IndicatorLevel {
        self.level
    }

    pub fn pulse_count(&self) -> u32 {
        self.pulse_count
    }

    fn drive(&mut self, active: bool) -> Result<(), ActuatorError> {
        let high = active != self.active_low;
        let result = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|e| {
            warn!("Indicator pin write failed: {:?}", e.kind());
            ActuatorError::GpioWriteFailed
        })
    }
}
