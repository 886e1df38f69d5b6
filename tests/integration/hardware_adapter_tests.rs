//! End-to-end tests through the real `HardwareAdapter`: INA219 driver on
//! a simulated bus (or the simulated ADC) in, indicator pin levels out.

use super::mock_hw::{LogSink, NoDelay, SharedPin, SimIna219Bus};

use ambilamp::adapters::hardware::HardwareAdapter;
use ambilamp::app::events::AppEvent;
use ambilamp::app::service::{CycleOutcome, IndicatorService};
use ambilamp::config::{SensorSource, SystemConfig};
use ambilamp::drivers::indicator::{Indicator, IndicatorLevel};
use ambilamp::error::SensorError;
use ambilamp::fsm::State;
use ambilamp::sensors::LightSensor;
use ambilamp::sensors::adc::{sim_fail_light_adc, sim_set_light_adc};

type SimAdapter = HardwareAdapter<SimIna219Bus, SharedPin, NoDelay>;

fn ina219_adapter(config: &SystemConfig, current: &[Option<i16>], pin: &SharedPin) -> SimAdapter {
    let bus = SimIna219Bus::new().script_current(current);
    let sensor = LightSensor::ina219(bus, config).expect("sensor init");
    let indicator = Indicator::new(pin.clone(), NoDelay::default(), config);
    HardwareAdapter::new(sensor, indicator)
}

#[test]
fn ina219_current_drives_indicator_through_scenarios() {
    let config = SystemConfig::default();
    let pin = SharedPin::default();
    // Raw counts at 0.1 mA/LSB: 0.1, 1.0, 10.0, 0.1 mA, then a bus fault.
    let mut hw = ina219_adapter(&config, &[Some(1), Some(10), Some(100), Some(1), None], &pin);
    let mut sink = LogSink::new();
    let mut app = IndicatorService::new(config).unwrap();
    app.start(&mut hw, &mut sink);

    let mut states = Vec::new();
    for _ in 0..5 {
        app.cycle(&mut hw, &mut sink);
        states.push(app.state());
    }

    assert_eq!(
        states,
        vec![State::Off, State::Blinking, State::On, State::Off, State::Off]
    );
    // start: low; pulse: high, low; on: high; off: low.
    assert_eq!(*pin.levels.borrow(), vec![false, true, false, true, false]);
    assert_eq!(hw.indicator_level(), IndicatorLevel::Off);
    assert_eq!(app.stats().skipped, 1);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SensorReadFailed {
            error: SensorError::BusReadFailed,
            ..
        }
    )));
}

#[test]
fn pin_fault_withholds_transition() {
    let config = SystemConfig::default();
    let pin = SharedPin::default();
    let mut hw = ina219_adapter(&config, &[Some(100), Some(100)], &pin);
    let mut sink = LogSink::new();
    let mut app = IndicatorService::new(config).unwrap();
    app.start(&mut hw, &mut sink);

    *pin.fail.borrow_mut() = true;
    let outcome = app.cycle(&mut hw, &mut sink);
    assert!(matches!(
        outcome,
        CycleOutcome::ActuatorFailed {
            committed: false,
            ..
        }
    ));
    assert_eq!(app.state(), State::Off);

    *pin.fail.borrow_mut() = false;
    app.cycle(&mut hw, &mut sink);
    assert_eq!(app.state(), State::On);
    assert_eq!(hw.indicator_level(), IndicatorLevel::On);

    hw.all_off().unwrap();
    assert_eq!(hw.indicator_level(), IndicatorLevel::Off);
}

// The simulated ADC is a process-wide static; this is the only test in
// the integration binary that touches it.
#[test]
fn adc_source_classifies_raw_counts() {
    let config = SystemConfig {
        sensor_source: SensorSource::AdcRaw,
        low_threshold: 500.0,
        high_threshold: 2500.0,
        ..SystemConfig::default()
    };
    let pin = SharedPin::default();
    let sensor = LightSensor::<SimIna219Bus>::adc(3).unwrap();
    let indicator = Indicator::new(pin.clone(), NoDelay::default(), &config);
    let mut hw = HardwareAdapter::new(sensor, indicator);
    let mut sink = LogSink::new();
    let mut app = IndicatorService::new(config).unwrap();
    app.start(&mut hw, &mut sink);

    sim_set_light_adc(100);
    app.cycle(&mut hw, &mut sink);
    assert_eq!(app.state(), State::Off);

    sim_set_light_adc(1000);
    app.cycle(&mut hw, &mut sink);
    assert_eq!(app.state(), State::Blinking);

    sim_set_light_adc(3000);
    app.cycle(&mut hw, &mut sink);
    assert_eq!(app.state(), State::On);

    sim_fail_light_adc();
    let outcome = app.cycle(&mut hw, &mut sink);
    assert_eq!(outcome, CycleOutcome::Skipped(SensorError::AdcReadFailed));
    assert_eq!(app.state(), State::On);
}

#[test]
fn reconfigure_changes_pulse_timing() {
    let config = SystemConfig::default();
    let pin = SharedPin::default();
    let delay = NoDelay::default();
    let bus = SimIna219Bus::new().script_current(&[Some(10), Some(1), Some(10)]);
    let sensor = LightSensor::ina219(bus, &config).unwrap();
    let indicator = Indicator::new(pin.clone(), delay.clone(), &config);
    let mut hw = HardwareAdapter::new(sensor, indicator);
    let mut sink = LogSink::new();
    let mut app = IndicatorService::new(config.clone()).unwrap();
    app.start(&mut hw, &mut sink);

    // First pulse at the configured 150/150 ms.
    app.cycle(&mut hw, &mut sink);
    assert_eq!(delay.total_ns(), 300_000_000);

    let slower = SystemConfig {
        pulse_on_ms: 400,
        pulse_off_ms: 100,
        ..config
    };
    hw.reconfigure(&slower);

    // Dark → Off, then Dim → Blinking pulses at 400/100 ms.
    app.cycle(&mut hw, &mut sink);
    app.cycle(&mut hw, &mut sink);
    assert_eq!(app.state(), State::Blinking);
    assert_eq!(hw.pulse_count(), 2);
    assert_eq!(delay.total_ns(), 300_000_000 + 500_000_000);
    assert_eq!(*pin.levels.borrow(), vec![false, true, false, false, true, false]);
}
