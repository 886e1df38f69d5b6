//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements   | Connects to                     |
//! |-----------------|--------------|---------------------------------|
//! | `hardware`      | SensorPort   | INA219 over I2C, or ADC1        |
//! |                 | ActuatorPort | Indicator GPIO                  |
//! | `log_sink`      | EventSink    | Serial log output               |
//! | `config_source` | ConfigPort   | JSON document (flash-embedded)  |

pub mod config_source;
pub mod hardware;
pub mod log_sink;
