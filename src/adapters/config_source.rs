//! JSON configuration source.
//!
//! Implements [`ConfigPort`] over a JSON document (typically embedded in
//! the firmware image with `include_str!`).  Fields absent from the
//! document take their [`SystemConfig::default`] values; the result is
//! validated before it is handed out.

use log::warn;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub struct JsonConfigSource<'a> {
    document: &'a str,
}

impl<'a> JsonConfigSource<'a> {
    pub fn new(document: &'a str) -> Self {
        Self { document }
    }
}

impl ConfigPort for JsonConfigSource<'_> {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        if self.document.trim().is_empty() {
            return Err(ConfigError::NotFound);
        }
        let config: SystemConfig = serde_json::from_str(self.document).map_err(|e| {
            warn!("Config parse error at line {} column {}", e.line(), e.column());
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }
}
