//! GPIO / peripheral pin assignments for the ambilamp board.
//!
//! Single source of truth. The binary references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I2C bus (INA219 current/voltage monitor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Analog light input (photoresistor divider, ADC1)
// ---------------------------------------------------------------------------

/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const LIGHT_ADC_GPIO: i32 = 4;
pub const LIGHT_ADC_CHANNEL: u32 = 3;

// ---------------------------------------------------------------------------
// Indicator output
// ---------------------------------------------------------------------------

/// Indicator LED, driven through a low-side transistor (active HIGH).
pub const INDICATOR_GPIO: i32 = 2;
