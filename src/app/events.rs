//! Outbound application events.
//!
//! The [`IndicatorService`](super::service::IndicatorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them (serial log, test capture).

use crate::diagnostics::CycleStats;
use crate::error::{ActuatorError, SensorError};
use crate::fsm::{Action, Event, State};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(State),

    /// One sample was read and classified.
    Sample { cycle: u64, value: f32, event: Event },

    /// The sensor could not produce a sample; cycle skipped.
    SensorReadFailed { cycle: u64, error: SensorError },

    /// A committed state change.
    StateChanged {
        from: State,
        to: State,
        event: Event,
        action: Action,
    },

    /// `(state, event)` has no table entry; state held.
    UndefinedTransition { state: State, event: Event },

    /// A defined transition was held back by the minimum dwell time.
    DwellSuppressed {
        state: State,
        event: Event,
        cycles_in_state: u32,
    },

    /// The indicator action failed.  `committed` tells whether the target
    /// state was taken anyway.
    ActuatorFailed {
        action: Action,
        error: ActuatorError,
        committed: bool,
    },

    /// Periodic statistics snapshot.
    Stats(CycleStats),
}
