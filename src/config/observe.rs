use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Observer relation settings
///
/// ```toml
/// [observe]
/// observer_buffer_size = 10
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObserveConfig {
    /// Buffer size for each observer's notification channel
    ///
    /// Notifications are sent with `try_send`; a full buffer drops the
    /// notification for that observer only, so a slow observer never stalls
    /// the refresh task.
    ///
    /// **Default**: 10
    #[serde(default = "default_observer_buffer_size")]
    pub observer_buffer_size: usize,
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            observer_buffer_size: default_observer_buffer_size(),
        }
    }
}

impl ObserveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.observer_buffer_size == 0 {
            return Err(Error::Config(ConfigError::Message(
                "observe.observer_buffer_size must be > 0".into(),
            )));
        }
        Ok(())
    }
}

fn default_observer_buffer_size() -> usize {
    10
}
