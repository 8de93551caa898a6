use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Endpoint settings handed to the protocol engine.
///
/// The engine itself never opens a socket; the values are reported at
/// startup and passed through to whatever transport hosts the resources.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Join the all-CoAP-nodes multicast group
    #[serde(default)]
    pub multicast: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            multicast: false,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "server.host cannot be empty".into(),
            )));
        }

        if self.port == 0 {
            return Err(Error::Config(ConfigError::Message(
                "server.port cannot be 0".into(),
            )));
        }

        Ok(())
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5683
}
