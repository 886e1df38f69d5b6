//! Inbound commands to the application service.
//!
//! These represent requests from the outside world (serial console,
//! bring-up code, tests) that the [`IndicatorService`](super::service::IndicatorService)
//! interprets and acts upon between cycles.

use crate::config::SystemConfig;
use crate::fsm::State;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Drive the indicator into `State` outside the table (bring-up / test).
    ForceState(State),

    /// Hot-reload configuration.  Rejected if it fails validation.
    UpdateConfig(SystemConfig),

    /// Zero the cycle counters and transition history.
    ResetStats,
}
