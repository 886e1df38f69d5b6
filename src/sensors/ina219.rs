//! INA219 high-side current / bus-voltage monitor (I2C).
//!
//! Generic over any [`embedded_hal::i2c::I2c`] bus, so the same driver
//! runs on the ESP-IDF I2C master and on a mock bus in host tests.
//!
//! ## Register access
//!
//! Every register is 16 bits, big-endian.  A write is `[reg, hi, lo]`;
//! a read sets the register pointer and reads two bytes back with a
//! repeated start (`write_read`).
//!
//! ## Scaling
//!
//! | Register      | LSB                                   |
//! |---------------|---------------------------------------|
//! | SHUNT_VOLTAGE | 10 µV, signed                         |
//! | BUS_VOLTAGE   | 4 mV in bits 15:3, CNVR bit 1, OVF bit 0 |
//! | POWER         | `20 × current_lsb_ma` mW, unsigned    |
//! | CURRENT       | `current_lsb_ma`, signed (set by CALIBRATION) |

use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, info};

use crate::error::SensorError;

pub const REG_CONFIG: u8 = 0x00;
pub const REG_SHUNT_VOLTAGE: u8 = 0x01;
pub const REG_BUS_VOLTAGE: u8 = 0x02;
pub const REG_POWER: u8 = 0x03;
pub const REG_CURRENT: u8 = 0x04;
pub const REG_CALIBRATION: u8 = 0x05;

const BUS_VOLTAGE_LSB_MV: f32 = 4.0;
const SHUNT_VOLTAGE_LSB_MV: f32 = 0.01;
/// Power LSB as a multiple of the current LSB (fixed by the chip).
const POWER_LSB_FACTOR: f32 = 20.0;
/// Math overflow: current and power registers are meaningless.
const BUS_FLAG_OVF: u16 = 0b01;

pub struct Ina219<I2C> {
    i2c: I2C,
    address: u8,
    current_lsb_ma: f32,
}

impl<I2C: I2c> Ina219<I2C> {
    pub fn new(i2c: I2C, address: u8, current_lsb_ma: f32) -> Self {
        Self {
            i2c,
            address,
            current_lsb_ma,
        }
    }

    /// Write CONFIG then CALIBRATION.  The current register reads zero
    /// until calibration is programmed.
    pub fn init(&mut self, config: u16, calibration: u16) -> Result<(), SensorError> {
        self.write_register(REG_CONFIG, config)?;
        self.write_register(REG_CALIBRATION, calibration)?;
        info!(
            "INA219@0x{:02x}: config=0x{:04x} cal={} lsb={}mA",
            self.address, config, calibration, self.current_lsb_ma
        );
        Ok(())
    }

    pub fn write_register(&mut self, reg: u8, value: u16) -> Result<(), SensorError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[reg, hi, lo]).map_err(|e| {
            debug!("INA219 write 0x{:02x} failed: {:?}", reg, e.kind());
            SensorError::BusWriteFailed
        })
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(|e| {
                debug!("INA219 read 0x{:02x} failed: {:?}", reg, e.kind());
                SensorError::BusReadFailed
            })?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Current through the shunt, milliamps.
    pub fn read_current_ma(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(REG_CURRENT)? as i16;
        Ok(f32::from(raw) * self.current_lsb_ma)
    }

    /// Bus voltage, volts.  Fails with [`SensorError::Overflow`] when the
    /// chip reports a math overflow.
    pub fn read_bus_voltage_v(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(REG_BUS_VOLTAGE)?;
        if raw & BUS_FLAG_OVF != 0 {
            return Err(SensorError::Overflow);
        }
        Ok(f32::from(raw >> 3) * BUS_VOLTAGE_LSB_MV / 1000.0)
    }

    /// Voltage across the shunt, millivolts.
    pub fn read_shunt_voltage_mv(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(REG_SHUNT_VOLTAGE)? as i16;
        Ok(f32::from(raw) * SHUNT_VOLTAGE_LSB_MV)
    }

    /// Load power, milliwatts.
    pub fn read_power_mw(&mut self) -> Result<f32, SensorError> {
        let raw = self.read_register(REG_POWER)?;
        Ok(f32::from(raw) * POWER_LSB_FACTOR * self.current_lsb_ma)
    }

    /// Give the bus back (e.g. to share it with another device).
    pub fn release(self) -> I2C {
        self.i2c
    }
}
