//! Request/response values exchanged with the protocol engine.
//!
//! The protocol engine owns framing, options and retransmission; it hands the
//! server an already-parsed [`Request`] and serializes the returned
//! [`Response`].

use bytes::Bytes;

use crate::resource::ContentFormat;
use crate::resource::Representation;
use crate::tree::normalize_path;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Response codes the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 2.01
    Created,
    /// 2.02
    Deleted,
    /// 2.04
    Changed,
    /// 2.05
    Content,
    /// 4.00
    BadRequest,
    /// 4.04
    NotFound,
    /// 4.05
    MethodNotAllowed,
}

impl Status {
    /// CoAP code as `(class, detail)`, e.g. `(2, 5)` for 2.05 Content.
    pub const fn code(&self) -> (u8, u8) {
        match self {
            Status::Created => (2, 1),
            Status::Deleted => (2, 2),
            Status::Changed => (2, 4),
            Status::Content => (2, 5),
            Status::BadRequest => (4, 0),
            Status::NotFound => (4, 4),
            Status::MethodNotAllowed => (4, 5),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.code().0 == 2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    /// Raw URI query, `&`-separated
    pub query: String,
    pub payload: Bytes,
    /// Content-Format of `payload`
    pub content_format: Option<ContentFormat>,
    /// Accept option
    pub accept: Option<ContentFormat>,
}

impl Request {
    pub fn new(
        method: Method,
        path: &str,
    ) -> Self {
        Self {
            method,
            path: normalize_path(path),
            query: String::new(),
            payload: Bytes::new(),
            content_format: None,
            accept: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(
        mut self,
        query: &str,
    ) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_payload(
        mut self,
        payload: impl Into<Bytes>,
    ) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_content_format(
        mut self,
        format: ContentFormat,
    ) -> Self {
        self.content_format = Some(format);
        self
    }

    pub fn with_accept(
        mut self,
        format: ContentFormat,
    ) -> Self {
        self.accept = Some(format);
        self
    }

    /// Splits the query into `(key, value)` pairs in request order.
    ///
    /// A pair without `=` yields an empty value; empty segments are skipped.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.split_once('=').unwrap_or((segment, "")))
            .collect()
    }

    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: Status,
    pub payload: Bytes,
    pub content_format: Option<ContentFormat>,
    /// Location-Path of a created resource
    pub location: Option<String>,
}

impl Response {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            payload: Bytes::new(),
            content_format: None,
            location: None,
        }
    }

    pub fn content(representation: Representation) -> Self {
        Self {
            status: Status::Content,
            payload: representation.payload,
            content_format: Some(representation.format),
            location: None,
        }
    }

    pub fn changed(message: &str) -> Self {
        Self::new(Status::Changed).with_message(message)
    }

    pub fn created(
        message: &str,
        location: &str,
    ) -> Self {
        let mut response = Self::new(Status::Created).with_message(message);
        response.location = Some(location.to_string());
        response
    }

    pub fn deleted(message: &str) -> Self {
        Self::new(Status::Deleted).with_message(message)
    }

    pub fn with_message(
        mut self,
        message: &str,
    ) -> Self {
        self.payload = Bytes::from(message.to_string());
        self.content_format = Some(ContentFormat::TextPlain);
        self
    }

    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

impl From<&Error> for Response {
    fn from(e: &Error) -> Self {
        Response::new(e.status()).with_message(&e.to_string())
    }
}
