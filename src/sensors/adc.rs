//! Photoresistor light input on an ADC1 channel.
//!
//! Reports raw counts (0 – 4095); thresholds for this source are
//! configured in counts as well.  Each sample averages a few oneshot
//! conversions to take the edge off ADC noise.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the channel via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Sentinel for "next read fails" in simulation.
const SIM_READ_ERROR: u16 = u16::MAX;

static SIM_LIGHT_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_light_adc(raw: u16) {
    SIM_LIGHT_ADC.store(raw, Ordering::Relaxed);
}

/// Make every simulated conversion fail until the next `sim_set_light_adc`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_fail_light_adc() {
    SIM_LIGHT_ADC.store(SIM_READ_ERROR, Ordering::Relaxed);
}

/// Conversions averaged per sample.
const OVERSAMPLE: u32 = 4;
/// 12-bit full scale.
pub const ADC_MAX: u16 = 4095;

pub struct AdcLightSensor {
    channel: u32,
    total_reads: u32,
}

impl AdcLightSensor {
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            total_reads: 0,
        }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn total_reads(&self) -> u32 {
        self.total_reads
    }

    /// Averaged raw counts.
    pub fn read(&mut self) -> Result<f32, SensorError> {
        self.total_reads = self.total_reads.saturating_add(1);
        let mut sum: u32 = 0;
        for _ in 0..OVERSAMPLE {
            sum += u32::from(self.read_adc()?.min(ADC_MAX));
        }
        Ok(sum as f32 / OVERSAMPLE as f32)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(self.channel).map_err(|rc| {
            log::debug!("ADC1 CH{} read failed (rc={})", self.channel, rc);
            SensorError::AdcReadFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        match SIM_LIGHT_ADC.load(Ordering::Relaxed) {
            SIM_READ_ERROR => Err(SensorError::AdcReadFailed),
            raw => Ok(raw),
        }
    }
}
