use std::sync::Arc;

use serde_json::json;
use serde_json::Value;

use super::leaf_name;
use super::negotiate;
use super::ContentFormat;
use super::CreateContext;
use super::Creatable;
use super::Created;
use super::Guarded;
use super::Payload;
use super::Readable;
use super::Representation;
use super::Resource;
use super::ResourceMeta;
use super::Writable;
use crate::server::Request;
use crate::server::Response;
use crate::Error;
use crate::Result;

/// Resource holding one canonical value, rendered per request in whichever
/// supported format the requester accepts.
#[derive(Debug)]
pub struct NegotiatedResource {
    meta: ResourceMeta,
    supported: Vec<ContentFormat>,
    value: Guarded<String>,
}

impl NegotiatedResource {
    /// The first entry of `supported` is the default format.
    ///
    /// # Panics
    /// Panics if `supported` is empty.
    pub fn new(
        name: &str,
        supported: Vec<ContentFormat>,
        value: &str,
    ) -> Self {
        assert!(!supported.is_empty(), "a negotiated resource needs at least one format");
        Self {
            meta: ResourceMeta::new(name).with_children(),
            supported,
            value: Guarded::new(value.to_string()),
        }
    }

    pub fn xml(name: &str) -> Self {
        Self::new(name, vec![ContentFormat::Xml], "0")
    }

    pub fn multiple_encoding(name: &str) -> Self {
        Self::new(
            name,
            vec![ContentFormat::Xml, ContentFormat::Json, ContentFormat::TextPlain],
            "0",
        )
    }

    pub fn default_format(&self) -> ContentFormat {
        self.supported[0]
    }

    pub fn supported(&self) -> &[ContentFormat] {
        &self.supported
    }

    pub fn value(&self) -> String {
        self.value.snapshot()
    }

    fn render(
        value: &str,
        format: ContentFormat,
    ) -> Result<Representation> {
        let payload = match format {
            ContentFormat::Json => Payload::Structured {
                value: json!({ "value": value }),
                format,
            },
            ContentFormat::Xml => Payload::Structured {
                value: Value::String(value.to_string()),
                format,
            },
            _ => Payload::text(value),
        };
        Ok(Representation {
            payload: payload.encode()?,
            format,
        })
    }
}

impl Resource for NegotiatedResource {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }

    fn readable(&self) -> Option<&dyn Readable> {
        Some(self)
    }

    fn writable(&self) -> Option<&dyn Writable> {
        Some(self)
    }

    fn creatable(&self) -> Option<&dyn Creatable> {
        Some(self)
    }
}

impl Readable for NegotiatedResource {
    fn read(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let format = negotiate(request.accept, &self.supported, self.default_format());
        let representation = self.value.read(|value| Self::render(value, format))?;
        Ok(Response::content(representation))
    }
}

impl Writable for NegotiatedResource {
    fn write(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let value = request
            .payload_str()
            .ok_or_else(|| Error::bad_request("payload must be UTF-8"))?;
        self.value.update(|v| *v = value.to_string());
        Ok(Response::changed("changed"))
    }
}

impl Creatable for NegotiatedResource {
    fn create(
        &self,
        ctx: &CreateContext,
        request: &Request,
    ) -> Result<Created> {
        let value = request
            .payload_str()
            .ok_or_else(|| Error::bad_request("payload must be UTF-8"))?;
        let path = ctx
            .target_path
            .clone()
            .unwrap_or_else(|| format!("{}/{}", ctx.parent_path, nanoid::nanoid!(8)));

        let child = NegotiatedResource::new(leaf_name(&path), self.supported.clone(), value);
        let response = Response::created(&format!("created resource {}", child.meta.name), &path);
        Ok(Created {
            path,
            resource: Arc::new(child),
            response,
        })
    }
}
