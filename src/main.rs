//! Ambilamp Firmware: Main Entry Point
//!
//! Hexagonal layout, single polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  HardwareAdapter        LogEventSink     JsonConfigSource  │
//! │  (Sensor + Actuator)    (EventSink)      (ConfigPort)      │
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ────────────────      │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │           IndicatorService (pure logic)              │  │
//! │  │     Classifier · Transition table · Dwell gate       │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use ambilamp::adapters::config_source::JsonConfigSource;
use ambilamp::adapters::hardware::HardwareAdapter;
use ambilamp::adapters::log_sink::LogEventSink;
use ambilamp::app::ports::ConfigPort;
use ambilamp::app::service::IndicatorService;
use ambilamp::config::{SensorSource, SystemConfig};
use ambilamp::drivers::indicator::Indicator;
use ambilamp::pins;
use ambilamp::sensors::LightSensor;

/// Flash-embedded configuration document.
const CONFIG_JSON: &str = include_str!("../config/ambilamp.json");

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Ambilamp v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config (or defaults) ──────────────────────────
    let config = match JsonConfigSource::new(CONFIG_JSON).load() {
        Ok(cfg) => {
            info!("Config loaded from flash");
            cfg
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    info!(
        "Source {:?}, thresholds {}/{} {}, dwell {} cycles, policy {:?}",
        config.sensor_source,
        config.low_threshold,
        config.high_threshold,
        config.sensor_source.unit(),
        config.min_dwell_cycles,
        config.commit_policy,
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let sensor = match config.sensor_source {
        SensorSource::Ina219Current | SensorSource::Ina219BusVoltage => {
            // SAFETY: GPIO numbers come from the board pin map and are not
            // claimed by any other driver.
            let (sda, scl) = unsafe {
                (
                    AnyIOPin::new(pins::I2C_SDA_GPIO),
                    AnyIOPin::new(pins::I2C_SCL_GPIO),
                )
            };
            let i2c_cfg = I2cConfig::new().baudrate(Hertz(config.i2c_baudrate_hz));
            let i2c = I2cDriver::new(peripherals.i2c0, sda, scl, &i2c_cfg)?;
            match LightSensor::ina219(i2c, &config) {
                Ok(s) => s,
                Err(e) => {
                    // Idle-task watchdog resets the chip from here.
                    error!("INA219 init failed: {}; halting", e);
                    #[allow(clippy::empty_loop)]
                    loop {}
                }
            }
        }
        SensorSource::AdcRaw => match LightSensor::<I2cDriver<'_>>::adc(pins::LIGHT_ADC_CHANNEL) {
            Ok(s) => s,
            Err(e) => {
                error!("ADC init failed: {}; halting", e);
                #[allow(clippy::empty_loop)]
                loop {}
            }
        },
    };

    // SAFETY: indicator GPIO is dedicated to this driver.
    let indicator_pin = PinDriver::output(unsafe { AnyOutputPin::new(pins::INDICATOR_GPIO) })?;
    let indicator = Indicator::new(indicator_pin, Delay::new_default(), &config);

    // ── 4. Adapters + service ─────────────────────────────────
    let mut hw = HardwareAdapter::new(sensor, indicator);
    let mut log_sink = LogEventSink::new(config.sensor_source.unit());

    let mut app = IndicatorService::new(config)?;
    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering polling loop.");

    // ── 5. Polling loop ───────────────────────────────────────
    app.run(&mut hw, &mut log_sink, &mut FreeRtos)
}
