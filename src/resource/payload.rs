use bytes::Bytes;
use serde_json::Value;

use super::ContentFormat;
use crate::Error;
use crate::Result;

/// Resource payload, decided by the resource kind rather than inspected at
/// runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Bytes delivered as they are
    Raw(Bytes),
    /// A value that is serialized on demand in `format`
    Structured { value: Value, format: ContentFormat },
}

impl Payload {
    pub fn text(s: impl Into<String>) -> Self {
        Payload::Raw(Bytes::from(s.into()))
    }

    /// Wire bytes of the payload.
    ///
    /// Structured values support JSON (serialized as is), XML (a scalar
    /// wrapped in `<value>`) and plain text (the scalar itself).
    pub fn encode(&self) -> Result<Bytes> {
        match self {
            Payload::Raw(bytes) => Ok(bytes.clone()),
            Payload::Structured { value, format } => match format {
                ContentFormat::Json => Ok(Bytes::from(serde_json::to_vec(value)?)),
                ContentFormat::Xml => Ok(Bytes::from(format!("<value>{}</value>", scalar(value)?))),
                ContentFormat::TextPlain => Ok(Bytes::from(scalar(value)?)),
                other => Err(Error::Encoding(format!(
                    "structured payload cannot be encoded as {other}"
                ))),
            },
        }
    }
}

fn scalar(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::Encoding(format!("{value} is not a scalar"))),
    }
}
