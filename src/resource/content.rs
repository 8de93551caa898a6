//! Content formats and per-request negotiation.

use serde::Deserialize;
use serde::Serialize;

/// Content formats the resources can be rendered in, with their CoAP
/// Content-Format registry numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentFormat {
    TextPlain,
    LinkFormat,
    Xml,
    OctetStream,
    Exi,
    Json,
}

impl ContentFormat {
    pub const fn code(&self) -> u16 {
        match self {
            ContentFormat::TextPlain => 0,
            ContentFormat::LinkFormat => 40,
            ContentFormat::Xml => 41,
            ContentFormat::OctetStream => 42,
            ContentFormat::Exi => 47,
            ContentFormat::Json => 50,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(ContentFormat::TextPlain),
            40 => Some(ContentFormat::LinkFormat),
            41 => Some(ContentFormat::Xml),
            42 => Some(ContentFormat::OctetStream),
            47 => Some(ContentFormat::Exi),
            50 => Some(ContentFormat::Json),
            _ => None,
        }
    }

    pub const fn mime(&self) -> &'static str {
        match self {
            ContentFormat::TextPlain => "text/plain",
            ContentFormat::LinkFormat => "application/link-format",
            ContentFormat::Xml => "application/xml",
            ContentFormat::OctetStream => "application/octet-stream",
            ContentFormat::Exi => "application/exi",
            ContentFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Picks the format a response is rendered in.
///
/// The requester's `accept` wins when the resource supports it; anything
/// else (no accept, or an unsupported one) falls back to `default`.
pub fn negotiate(
    accept: Option<ContentFormat>,
    supported: &[ContentFormat],
    default: ContentFormat,
) -> ContentFormat {
    match accept {
        Some(format) if supported.contains(&format) => format,
        _ => default,
    }
}
