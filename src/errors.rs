//! Resource engine error hierarchy
//!
//! Errors are grouped by who ends up seeing them: request errors are turned
//! into protocol status codes by the server, encoding errors stay inside the
//! refresh scheduler, configuration errors surface at startup.

use config::ConfigError;

use crate::server::Method;
use crate::server::Status;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No resource is registered at the path (4.04)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Malformed or semantically invalid write/create request (4.00)
    #[error("{0}")]
    BadRequest(String),

    /// A create collided with an already registered path
    #[error("Path already registered: {0}")]
    DuplicatePath(String),

    /// The resource does not expose the capability the method needs (4.05)
    #[error("{method:?} not allowed on {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// Payload re-encoding failed during a scheduled refresh.
    /// Transient: the tick is skipped, the next tick is unaffected.
    #[error("Payload encoding failed: {0}")]
    Encoding(String),

    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest(message.into())
    }

    /// Protocol status the error is surfaced as.
    ///
    /// Encoding, configuration and fatal errors never reach a requester in
    /// normal operation; they map to `BadRequest` only so the mapping is total.
    pub fn status(&self) -> Status {
        match self {
            Error::NotFound(_) => Status::NotFound,
            Error::MethodNotAllowed { .. } => Status::MethodNotAllowed,
            Error::BadRequest(_)
            | Error::DuplicatePath(_)
            | Error::Encoding(_)
            | Error::Config(_)
            | Error::Fatal(_) => Status::BadRequest,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Encoding(e.to_string())
    }
}
