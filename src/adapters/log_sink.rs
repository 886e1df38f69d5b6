//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger → UART / USB-CDC in production).
//! One line per event; per-cycle samples and no-op lookups go out at
//! `debug` so a release build at `info` only shows state changes.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink {
    unit: &'static str,
}

impl LogEventSink {
    /// `unit` is appended to sample values (see [`SensorSource::unit`](crate::config::SensorSource::unit)).
    pub fn new(unit: &'static str) -> Self {
        Self { unit }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::Sample {
                cycle,
                value,
                event,
            } => {
                debug!("SAMPLE | #{} | {:.4}{} -> {:?}", cycle, value, self.unit, event);
            }
            AppEvent::SensorReadFailed { cycle, error } => {
                warn!("SENSOR | #{} | read failed: {} | cycle skipped", cycle, error);
            }
            AppEvent::StateChanged {
                from,
                to,
                event,
                action,
            } => {
                info!("STATE | {:?} -> {:?} | event={:?} action={:?}", from, to, event, action);
            }
            AppEvent::UndefinedTransition { state, event } => {
                debug!("UNDEF | no transition for (state={:?}, event={:?})", state, event);
            }
            AppEvent::DwellSuppressed {
                state,
                event,
                cycles_in_state,
            } => {
                debug!(
                    "DWELL | {:?} on {:?} held, {} cycles in state",
                    state, event, cycles_in_state
                );
            }
            AppEvent::ActuatorFailed {
                action,
                error,
                committed,
            } => {
                warn!(
                    "ACT | {:?} failed: {} | state {}",
                    action,
                    error,
                    if *committed { "committed" } else { "held" }
                );
            }
            AppEvent::Stats(s) => {
                info!(
                    "STATS | cycles={} transitions={} skipped={} unclassified={} \
                     undefined={} suppressed={} act_fail={}",
                    s.cycles,
                    s.transitions,
                    s.skipped,
                    s.unclassified,
                    s.undefined,
                    s.suppressed,
                    s.actuator_failures,
                );
            }
        }
    }
}
