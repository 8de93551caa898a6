use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use super::leaf_name;
use super::ContentFormat;
use super::CreateContext;
use super::Creatable;
use super::Created;
use super::Deletable;
use super::Guarded;
use super::Readable;
use super::Representation;
use super::Resource;
use super::ResourceMeta;
use super::Writable;
use crate::server::Request;
use crate::server::Response;
use crate::Result;

/// Which of the CRUD operations a [`BasicResource`] accepts.
/// Reads are always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicCapabilities {
    pub write: bool,
    pub create: bool,
    pub delete: bool,
}

impl BasicCapabilities {
    pub const CRUD: Self = Self {
        write: true,
        create: true,
        delete: true,
    };
    pub const READ_ONLY: Self = Self {
        write: false,
        create: false,
        delete: false,
    };
    pub const READ_WRITE: Self = Self {
        write: true,
        create: false,
        delete: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
struct BasicState {
    payload: Bytes,
    format: ContentFormat,
}

/// Generic resource whose payload is overwritten wholesale by writes.
#[derive(Debug)]
pub struct BasicResource {
    meta: ResourceMeta,
    capabilities: BasicCapabilities,
    state: Guarded<BasicState>,
}

impl BasicResource {
    pub fn new(
        meta: ResourceMeta,
        capabilities: BasicCapabilities,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            meta,
            capabilities,
            state: Guarded::new(BasicState {
                payload: payload.into(),
                format: ContentFormat::TextPlain,
            }),
        }
    }

    /// Full CRUD resource that accepts children, `rt1`/`if1` attributes
    pub fn crud(
        name: &str,
        payload: &str,
    ) -> Self {
        Self::new(
            ResourceMeta::new(name)
                .with_children()
                .with_link_attributes("rt1", "if1"),
            BasicCapabilities::CRUD,
            payload.to_string(),
        )
    }

    pub fn hello() -> Self {
        Self::new(ResourceMeta::new("Hello"), BasicCapabilities::READ_ONLY, "HelloFriend")
    }

    /// Readable and writable; POST overwrites as PUT does
    pub fn hello_post() -> Self {
        Self::new(
            ResourceMeta::new("HelloPost"),
            BasicCapabilities::READ_WRITE,
            "Hello Friend",
        )
    }

    pub fn payload(&self) -> Bytes {
        self.state.read(|s| s.payload.clone())
    }

    pub fn capabilities(&self) -> BasicCapabilities {
        self.capabilities
    }
}

impl Resource for BasicResource {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }

    fn readable(&self) -> Option<&dyn Readable> {
        Some(self)
    }

    fn writable(&self) -> Option<&dyn Writable> {
        self.capabilities.write.then_some(self as &dyn Writable)
    }

    fn creatable(&self) -> Option<&dyn Creatable> {
        self.capabilities.create.then_some(self as &dyn Creatable)
    }

    fn deletable(&self) -> Option<&dyn Deletable> {
        self.capabilities.delete.then_some(self as &dyn Deletable)
    }
}

impl Readable for BasicResource {
    fn read(
        &self,
        _request: &Request,
    ) -> Result<Response> {
        let representation = self.state.read(|s| Representation {
            payload: s.payload.clone(),
            format: s.format,
        });
        Ok(Response::content(representation))
    }
}

impl Writable for BasicResource {
    fn write(
        &self,
        request: &Request,
    ) -> Result<Response> {
        self.state.update(|s| {
            s.payload = request.payload.clone();
            if let Some(format) = request.content_format {
                s.format = format;
            }
        });
        debug!(name = %self.meta.name, bytes = request.payload.len(), "payload overwritten");
        Ok(Response::changed("changed"))
    }
}

impl Creatable for BasicResource {
    fn create(
        &self,
        ctx: &CreateContext,
        request: &Request,
    ) -> Result<Created> {
        let path = ctx
            .target_path
            .clone()
            .unwrap_or_else(|| format!("{}/{}", ctx.parent_path, nanoid::nanoid!(8)));

        let mut meta = self.meta.clone();
        meta.name = leaf_name(&path).to_string();

        let child = BasicResource::new(meta, self.capabilities, request.payload.clone());
        if let Some(format) = request.content_format {
            child.state.update(|s| s.format = format);
        }

        let response = Response::created(&format!("created resource {}", child.meta.name), &path);
        Ok(Created {
            path,
            resource: Arc::new(child),
            response,
        })
    }
}

impl Deletable for BasicResource {
    fn delete(
        &self,
        _request: &Request,
    ) -> Result<Response> {
        Ok(Response::deleted("deleted"))
    }
}
