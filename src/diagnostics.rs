//! Runtime diagnostics: cycle counters and recent transition history.
//!
//! Both live in RAM only and are reset on boot.  The history is a fixed
//! ring of the last [`HISTORY_CAP`] committed transitions, so flapping
//! around a threshold is visible without a debugger attached.

use heapless::Deque;
use serde::{Deserialize, Serialize};

use crate::fsm::{Event, State};

/// Number of transitions retained in [`TransitionLog`].
pub const HISTORY_CAP: usize = 16;

/// Monotonic per-outcome counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    /// Cycles executed (every outcome).
    pub cycles: u64,
    /// Cycles skipped because the sensor read failed.
    pub skipped: u64,
    /// Samples that could not be classified (NaN).
    pub unclassified: u64,
    /// Committed state changes.
    pub transitions: u64,
    /// Classified events with no table entry for the current state.
    pub undefined: u64,
    /// Defined transitions held back by the dwell gate.
    pub suppressed: u64,
    /// Indicator actions that returned an error.
    pub actuator_failures: u64,
}

/// One committed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub cycle: u64,
    pub from: State,
    pub to: State,
    pub event: Event,
}

/// Bounded history of committed transitions, oldest evicted first.
#[derive(Debug, Default)]
pub struct TransitionLog {
    entries: Deque<TransitionRecord, HISTORY_CAP>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.entries.push_back(record);
    }

    /// Oldest → newest.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Transitions recorded at or after `since_cycle`.  A high count over a
    /// short window means the thresholds need a hysteresis band.
    pub fn count_since(&self, since_cycle: u64) -> usize {
        self.entries.iter().filter(|r| r.cycle >= since_cycle).count()
    }
}
