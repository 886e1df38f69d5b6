//! Actuator drivers and one-shot peripheral bring-up.

pub mod hw_init;
pub mod indicator;
