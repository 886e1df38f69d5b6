//! Mock hardware for integration tests.
//!
//! `MockHardware` replays a scripted sample sequence and records every
//! indicator action.  `SimIna219Bus`, `SharedPin` and `NoDelay` stand in
//! for the `embedded-hal` peripherals so the real [`HardwareAdapter`]
//! can be assembled on the host.
//!
//! [`HardwareAdapter`]: ambilamp::adapters::hardware::HardwareAdapter

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use ambilamp::app::events::AppEvent;
use ambilamp::app::ports::{ActuatorPort, EventSink, SensorPort};
use ambilamp::error::{ActuatorError, SensorError};
use ambilamp::fsm::{Action, State};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind as PinErrorKind, ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    samples: VecDeque<Result<f32, SensorError>>,
    pub actions: Vec<Action>,
    /// Number of upcoming `apply` calls that fail.
    pub fail_next_actions: u32,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::new(),
            actions: Vec::new(),
            fail_next_actions: 0,
            reads: 0,
        }
    }

    pub fn with_samples(samples: &[f32]) -> Self {
        let mut hw = Self::new();
        for &s in samples {
            hw.push_sample(s);
        }
        hw
    }

    pub fn push_sample(&mut self, value: f32) {
        self.samples.push_back(Ok(value));
    }

    pub fn push_failure(&mut self, error: SensorError) {
        self.samples.push_back(Err(error));
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }

    pub fn last_action(&self) -> Option<Action> {
        self.actions.last().copied()
    }

    pub fn count(&self, action: Action) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_sample(&mut self) -> Result<f32, SensorError> {
        self.reads += 1;
        self.samples
            .pop_front()
            .unwrap_or(Err(SensorError::BusReadFailed))
    }
}

impl ActuatorPort for MockHardware {
    fn apply(&mut self, action: Action) -> Result<(), ActuatorError> {
        if self.fail_next_actions > 0 {
            self.fail_next_actions -= 1;
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.actions.push(action);
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn state_changes(&self) -> Vec<(State, State)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn count_matching(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── SimIna219Bus ──────────────────────────────────────────────

/// Register file of an INA219 behind a fake I2C bus.
///
/// Reads of the current register pop the next scripted raw value;
/// a `None` entry makes that transaction fail.
pub struct SimIna219Bus {
    pub regs: [u16; 6],
    current: VecDeque<Option<i16>>,
    pointer: usize,
}

#[allow(dead_code)]
impl SimIna219Bus {
    pub fn new() -> Self {
        Self {
            regs: [0; 6],
            current: VecDeque::new(),
            pointer: 0,
        }
    }

    pub fn script_current(mut self, raw: &[Option<i16>]) -> Self {
        self.current.extend(raw.iter().copied());
        self
    }
}

impl ErrorType for SimIna219Bus {
    type Error = ErrorKind;
}

impl I2c for SimIna219Bus {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    self.pointer = usize::from(bytes[0]);
                    if bytes.len() == 3 {
                        self.regs[self.pointer] = u16::from_be_bytes([bytes[1], bytes[2]]);
                    }
                }
                Operation::Read(buf) => {
                    if self.pointer == 0x04 {
                        match self.current.pop_front() {
                            Some(Some(raw)) => self.regs[0x04] = raw as u16,
                            Some(None) => return Err(ErrorKind::Other),
                            None => {}
                        }
                    }
                    buf.copy_from_slice(&self.regs[self.pointer].to_be_bytes());
                }
            }
        }
        Ok(())
    }
}

// ── SharedPin / NoDelay ───────────────────────────────────────

/// Output pin whose level history stays readable after the pin is moved
/// into a driver.
#[derive(Clone, Default)]
pub struct SharedPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
    pub fail: Rc<RefCell<bool>>,
}

impl SharedPin {
    fn set(&mut self, high: bool) -> Result<(), PinErrorKind> {
        if *self.fail.borrow() {
            return Err(PinErrorKind::Other);
        }
        self.levels.borrow_mut().push(high);
        Ok(())
    }
}

impl PinErrorType for SharedPin {
    type Error = PinErrorKind;
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true)
    }
}

/// Delay that returns immediately and counts the requested time.
/// Clones share the counter, so the total stays readable after the
/// delay is moved into a driver.
#[derive(Clone, Default)]
pub struct NoDelay {
    total_ns: Rc<Cell<u64>>,
}

impl NoDelay {
    pub fn total_ns(&self) -> u64 {
        self.total_ns.get()
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}
