use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Range the simulated temperature readings are drawn from and clamped to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SensorConfig {
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,

    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.lower_bound.is_finite() || !self.upper_bound.is_finite() {
            return Err(Error::Config(ConfigError::Message(
                "sensor bounds must be finite numbers".into(),
            )));
        }

        if self.lower_bound >= self.upper_bound {
            return Err(Error::Config(ConfigError::Message(format!(
                "sensor.lower_bound {} must be less than sensor.upper_bound {}",
                self.lower_bound, self.upper_bound
            ))));
        }

        Ok(())
    }

    pub fn clamp(
        &self,
        value: f64,
    ) -> f64 {
        value.clamp(self.lower_bound, self.upper_bound)
    }
}

fn default_lower_bound() -> f64 {
    12.5
}
fn default_upper_bound() -> f64 {
    32.9
}
