//! Application core: pure control logic, zero I/O.
//!
//! This module contains the sample → classify → lookup → act cycle and
//! the ownership of the current indicator state.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
