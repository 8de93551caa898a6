use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Window a refresh delay is drawn from, in milliseconds (both ends inclusive)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct IntervalRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl IntervalRange {
    pub const fn new(
        min_ms: u64,
        max_ms: u64,
    ) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    pub fn validate(
        &self,
        name: &str,
    ) -> Result<()> {
        if self.min_ms == 0 {
            return Err(Error::Config(ConfigError::Message(format!(
                "{name}.min_ms cannot be 0"
            ))));
        }

        if self.min_ms > self.max_ms {
            return Err(Error::Config(ConfigError::Message(format!(
                "{name}.min_ms {}ms must not exceed {name}.max_ms {}ms",
                self.min_ms, self.max_ms
            ))));
        }

        Ok(())
    }
}

/// Refresh windows for each kind of observable resource.
///
/// Distinct windows keep resources of different kinds from waking together.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScheduleConfig {
    /// text/plain temperature resources
    #[serde(default = "default_plain_temperature")]
    pub plain_temperature: IntervalRange,

    /// application/json temperature resources
    #[serde(default = "default_json_temperature")]
    pub json_temperature: IntervalRange,

    /// the raw-reading "advanced" sensor
    #[serde(default = "default_advanced")]
    pub advanced: IntervalRange,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            plain_temperature: default_plain_temperature(),
            json_temperature: default_json_temperature(),
            advanced: default_advanced(),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<()> {
        self.plain_temperature.validate("schedule.plain_temperature")?;
        self.json_temperature.validate("schedule.json_temperature")?;
        self.advanced.validate("schedule.advanced")?;
        Ok(())
    }
}

fn default_plain_temperature() -> IntervalRange {
    IntervalRange::new(3_000, 6_000)
}
fn default_json_temperature() -> IntervalRange {
    IntervalRange::new(23_000, 27_000)
}
fn default_advanced() -> IntervalRange {
    IntervalRange::new(3_000, 10_900)
}
