//! Application service: the hexagonal core.
//!
//! [`IndicatorService`] owns the current [`State`], the classifier, and
//! the cycle counters.  One call to [`IndicatorService::cycle`] runs the
//! whole per-poll algorithm; [`IndicatorService::run`] repeats it forever
//! with a fixed delay in between.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │       IndicatorService       │
//! ActuatorPort ◀──│  classify · lookup · commit  │
//!                 └──────────────────────────────┘
//! ```
//!
//! Per cycle:
//!
//! 1. read one sample (failure → skip, hold state)
//! 2. classify it into an [`Event`]
//! 3. `Event::None` → skip
//! 4. look up `(state, event)` in the transition table
//! 5. defined → apply the action, then commit the target;
//!    undefined → report and hold

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{CommitPolicy, SystemConfig};
use crate::diagnostics::{CycleStats, TransitionLog, TransitionRecord};
use crate::error::{ActuatorError, Error, SensorError};
use crate::fsm::{Action, Classifier, Event, State, lookup};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, ConfigError, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Cycle outcome
// ───────────────────────────────────────────────────────────────

/// What a single cycle did.  Exactly one variant per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CycleOutcome {
    /// Sensor read failed; nothing else ran.
    Skipped(SensorError),
    /// Sample could not be classified (`Event::None`).
    Unclassified,
    /// No table entry for `(state, event)`.
    Undefined { state: State, event: Event },
    /// Defined transition held back by the dwell gate.
    Suppressed { state: State, event: Event },
    /// Action applied and target committed.
    Transitioned {
        from: State,
        to: State,
        action: Action,
    },
    /// Action failed.  `committed` follows the configured [`CommitPolicy`].
    ActuatorFailed {
        action: Action,
        error: ActuatorError,
        committed: bool,
    },
}

impl CycleOutcome {
    /// Whether the current state changed during this cycle.
    pub fn committed(&self) -> bool {
        matches!(
            self,
            Self::Transitioned { .. } | Self::ActuatorFailed { committed: true, .. }
        )
    }
}

// ───────────────────────────────────────────────────────────────
// IndicatorService
// ───────────────────────────────────────────────────────────────

/// The state machine driver.
pub struct IndicatorService {
    state: State,
    classifier: Classifier,
    config: SystemConfig,
    /// Completed cycles since the last commit (dwell gate input).
    cycles_in_state: u32,
    stats: CycleStats,
    history: TransitionLog,
}

impl IndicatorService {
    /// Construct the service in [`State::Off`].
    ///
    /// The configuration is validated here; call [`start`](Self::start)
    /// before the first cycle to bring the indicator to a known level.
    pub fn new(config: SystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = Classifier::new(config.thresholds(), config.hysteresis);
        Ok(Self {
            state: State::Off,
            classifier,
            config,
            cycles_in_state: 0,
            stats: CycleStats::default(),
            history: TransitionLog::new(),
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the indicator to the `Off` level and announce the start.
    ///
    /// An actuator failure here is reported but does not prevent the
    /// service from running; the state is `Off` either way.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if let Err(error) = hw.apply(Action::AssertOff) {
            warn!("Initial indicator reset failed: {}", error);
            sink.emit(&AppEvent::ActuatorFailed {
                action: Action::AssertOff,
                error,
                committed: false,
            });
        }
        sink.emit(&AppEvent::Started(self.state));
        info!(
            "IndicatorService started in {:?} (thresholds {}/{} {})",
            self.state,
            self.config.low_threshold,
            self.config.high_threshold,
            self.config.sensor_source.unit()
        );
    }

    /// Poll forever: one [`cycle`](Self::cycle), then a fixed delay.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
    ) -> ! {
        loop {
            self.cycle(hw, sink);
            delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    /// Bounded variant of [`run`](Self::run) for bring-up and tests.
    pub fn run_cycles(
        &mut self,
        count: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
    ) -> CycleStats {
        for _ in 0..count {
            self.cycle(hw, sink);
            delay.delay_ms(self.config.poll_interval_ms);
        }
        self.stats
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: read → classify → lookup → act → commit.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; the sensor and the indicator are usually owned by
    /// the same hardware adapter.
    pub fn cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.stats.cycles += 1;
        let cycle = self.stats.cycles;

        let outcome = match hw.read_sample() {
            Err(error) => {
                self.stats.skipped += 1;
                warn!("Cycle {}: sensor read failed ({}), holding {:?}", cycle, error, self.state);
                sink.emit(&AppEvent::SensorReadFailed { cycle, error });
                CycleOutcome::Skipped(error)
            }
            Ok(value) => {
                let event = self.classifier.classify(value);
                if self.config.log_samples {
                    sink.emit(&AppEvent::Sample { cycle, value, event });
                }
                self.step(event, hw, sink)
            }
        };

        if !outcome.committed() {
            self.cycles_in_state = self.cycles_in_state.saturating_add(1);
        }

        let interval = u64::from(self.config.stats_interval_cycles);
        if interval > 0 && cycle % interval == 0 {
            sink.emit(&AppEvent::Stats(self.stats));
        }

        outcome
    }

    /// Table lookup and action for an already classified event.
    fn step(
        &mut self,
        event: Event,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        if event == Event::None {
            self.stats.unclassified += 1;
            debug!("Sample unclassified, holding {:?}", self.state);
            return CycleOutcome::Unclassified;
        }

        let state = self.state;
        let Some(transition) = lookup(state, event) else {
            self.stats.undefined += 1;
            debug!("No defined transition for ({:?}, {:?})", state, event);
            sink.emit(&AppEvent::UndefinedTransition { state, event });
            return CycleOutcome::Undefined { state, event };
        };

        if self.cycles_in_state < self.config.min_dwell_cycles {
            self.stats.suppressed += 1;
            debug!(
                "{:?} -> {:?} held back: {} of {} dwell cycles",
                state, transition.target, self.cycles_in_state, self.config.min_dwell_cycles
            );
            sink.emit(&AppEvent::DwellSuppressed {
                state,
                event,
                cycles_in_state: self.cycles_in_state,
            });
            return CycleOutcome::Suppressed { state, event };
        }

        match hw.apply(transition.action) {
            Ok(()) => {
                self.commit(transition.target, event, transition.action, sink);
                CycleOutcome::Transitioned {
                    from: state,
                    to: transition.target,
                    action: transition.action,
                }
            }
            Err(error) => self.action_failed(transition.action, transition.target, event, error, sink),
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command between cycles.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Result<(), Error> {
        match cmd {
            AppCommand::ForceState(target) => {
                if target == self.state {
                    return Ok(());
                }
                let action = target.entry_action();
                match hw.apply(action) {
                    Ok(()) => {
                        self.commit(target, Event::None, action, sink);
                        Ok(())
                    }
                    Err(error) => {
                        self.action_failed(action, target, Event::None, error, sink);
                        Err(error.into())
                    }
                }
            }
            AppCommand::UpdateConfig(new_config) => {
                if let Err(e) = self.config.check_runtime_update(&new_config) {
                    warn!("Configuration update rejected: {}", e);
                    return Err(e.into());
                }
                self.classifier
                    .set_thresholds(new_config.thresholds(), new_config.hysteresis);
                self.config = new_config;
                info!(
                    "Configuration updated at runtime (thresholds {}/{})",
                    self.config.low_threshold, self.config.high_threshold
                );
                Ok(())
            }
            AppCommand::ResetStats => {
                self.stats = CycleStats::default();
                self.history.clear();
                Ok(())
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current indicator state.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Recent committed transitions, oldest first.
    pub fn history(&self) -> &TransitionLog {
        &self.history
    }

    pub fn cycles_in_state(&self) -> u32 {
        self.cycles_in_state
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn commit(&mut self, target: State, event: Event, action: Action, sink: &mut impl EventSink) {
        let from = self.state;
        self.state = target;
        self.cycles_in_state = 0;
        self.stats.transitions += 1;
        self.history.record(TransitionRecord {
            cycle: self.stats.cycles,
            from,
            to: target,
            event,
        });
        info!("Indicator transition: {} -> {} on {}", from.name(), target.name(), event.name());
        sink.emit(&AppEvent::StateChanged {
            from,
            to: target,
            event,
            action,
        });
    }

    fn action_failed(
        &mut self,
        action: Action,
        target: State,
        event: Event,
        error: ActuatorError,
        sink: &mut impl EventSink,
    ) -> CycleOutcome {
        self.stats.actuator_failures += 1;
        let committed = self.config.commit_policy == CommitPolicy::Commit;
        warn!(
            "Indicator action {:?} failed ({}); {:?} {}",
            action,
            error,
            target,
            if committed { "committed anyway" } else { "withheld" }
        );
        sink.emit(&AppEvent::ActuatorFailed {
            action,
            error,
            committed,
        });
        if committed {
            self.commit(target, event, action, sink);
        }
        CycleOutcome::ActuatorFailed {
            action,
            error,
            committed,
        }
    }
}
