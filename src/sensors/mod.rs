//! Light sensor subsystem: the chip drivers and the [`LightSensor`]
//! front that produces one sample per cycle.
//!
//! The configured [`SensorSource`] picks both the driver and the unit of
//! the sample, which is also the unit of the classification thresholds:
//!
//! | Source             | Driver           | Unit   |
//! |--------------------|------------------|--------|
//! | `Ina219Current`    | [`ina219`]       | mA     |
//! | `Ina219BusVoltage` | [`ina219`]       | V      |
//! | `AdcRaw`           | [`adc`]          | counts |

pub mod adc;
pub mod ina219;

use embedded_hal::i2c::I2c;

use crate::app::ports::{ConfigError, SensorPort};
use crate::config::{SensorSource, SystemConfig};
use crate::drivers::hw_init;
use crate::error::{Error, SensorError};
use adc::AdcLightSensor;
use ina219::Ina219;

/// Which INA219 register provides the sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ina219Channel {
    Current,
    BusVoltage,
}

/// The configured light-intensity source.
pub enum LightSensor<I2C> {
    Ina219(Ina219<I2C>, Ina219Channel),
    Adc(AdcLightSensor),
}

impl<I2C: I2c> LightSensor<I2C> {
    /// Bring up the INA219 on `i2c` and select the register named by
    /// `config.sensor_source`.
    pub fn ina219(i2c: I2C, config: &SystemConfig) -> Result<Self, Error> {
        let channel = match config.sensor_source {
            SensorSource::Ina219Current => Ina219Channel::Current,
            SensorSource::Ina219BusVoltage => Ina219Channel::BusVoltage,
            SensorSource::AdcRaw => {
                return Err(ConfigError::ValidationFailed(
                    "sensor_source AdcRaw has no INA219 channel",
                )
                .into());
            }
        };
        let mut dev = Ina219::new(i2c, config.ina219_address, config.ina219_current_lsb_ma);
        dev.init(config.ina219_config, config.ina219_calibration)?;
        Ok(Self::Ina219(dev, channel))
    }

    /// Configure ADC1 `channel` and read the photoresistor from it.
    pub fn adc(channel: u32) -> Result<Self, Error> {
        hw_init::init_adc(channel)?;
        Ok(Self::Adc(AdcLightSensor::new(channel)))
    }

    /// One sample in the source's native unit.
    ///
    /// Non-finite conversions are reported as [`SensorError::OutOfRange`]
    /// so a corrupt reading is skipped like a failed one.
    pub fn read(&mut self) -> Result<f32, SensorError> {
        let value = match self {
            Self::Ina219(dev, Ina219Channel::Current) => dev.read_current_ma()?,
            Self::Ina219(dev, Ina219Channel::BusVoltage) => dev.read_bus_voltage_v()?,
            Self::Adc(adc) => adc.read()?,
        };
        if !value.is_finite() {
            return Err(SensorError::OutOfRange);
        }
        Ok(value)
    }
}

impl<I2C: I2c> SensorPort for LightSensor<I2C> {
    fn read_sample(&mut self) -> Result<f32, SensorError> {
        self.read()
    }
}
