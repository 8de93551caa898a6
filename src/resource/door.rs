use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

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
use crate::Error;
use crate::Result;

const CREATE_QUERY: &str = "create";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for DoorStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DoorStatus::Open => f.write_str("OPEN"),
            DoorStatus::Closed => f.write_str("CLOSED"),
        }
    }
}

impl FromStr for DoorStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OPEN" => Ok(DoorStatus::Open),
            "CLOSED" => Ok(DoorStatus::Closed),
            _ => Err(Error::bad_request("invalid query value")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoorState {
    pub status: DoorStatus,
    pub color: String,
}

impl DoorState {
    fn render(&self) -> String {
        if self.color.is_empty() {
            self.status.to_string()
        } else {
            format!("{};color={}", self.status, self.color)
        }
    }
}

enum DoorKey {
    Status,
    Color,
}

/// Door whose status only changes through a validated query.
///
/// ```text
/// PUT  door?status=closed&color=red   -> 2.04
/// POST door?create  payload "garage"  -> 2.01, new door at door/garage
/// ```
#[derive(Debug)]
pub struct DoorResource {
    meta: ResourceMeta,
    state: Guarded<DoorState>,
}

impl DoorResource {
    pub fn new(name: &str) -> Self {
        Self {
            meta: ResourceMeta::new(name).with_children(),
            state: Guarded::new(DoorState::default()),
        }
    }

    pub fn state(&self) -> DoorState {
        self.state.snapshot()
    }
}

impl Resource for DoorResource {
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

    fn deletable(&self) -> Option<&dyn Deletable> {
        Some(self)
    }
}

impl Readable for DoorResource {
    fn read(
        &self,
        _request: &Request,
    ) -> Result<Response> {
        let body = self.state.read(DoorState::render);
        Ok(Response::content(Representation {
            payload: body.into(),
            format: ContentFormat::TextPlain,
        }))
    }
}

impl Writable for DoorResource {
    /// Every key is checked before anything is applied, so an unknown key
    /// leaves the door untouched. Values are then applied one key at a time
    /// in query order: an invalid value aborts the request but keys applied
    /// before it stay committed.
    fn write(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let pairs = request.query_pairs();
        if request.query.trim().is_empty() || pairs.is_empty() {
            return Err(Error::bad_request("empty query"));
        }

        let mut updates = Vec::new();
        for (key, value) in pairs {
            let key = match key.to_ascii_lowercase().as_str() {
                "status" => DoorKey::Status,
                "color" => DoorKey::Color,
                _ => return Err(Error::bad_request("invalid query key")),
            };
            updates.push((key, value));
        }

        for (key, value) in updates {
            match key {
                DoorKey::Status => {
                    let status = value.parse::<DoorStatus>()?;
                    self.state.update(|s| s.status = status);
                }
                DoorKey::Color => self.state.update(|s| s.color = value.to_string()),
            }
        }

        debug!(name = %self.meta.name, state = ?self.state(), "door updated");
        Ok(Response::changed("changed"))
    }
}

impl Creatable for DoorResource {
    fn create(
        &self,
        ctx: &CreateContext,
        request: &Request,
    ) -> Result<Created> {
        if request.query.trim().is_empty() {
            return Err(Error::bad_request("empty query"));
        }

        let name = request.payload_str().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(Error::bad_request("empty payload"));
        }

        if !request.query.eq_ignore_ascii_case(CREATE_QUERY) {
            return Err(Error::bad_request("invalid query"));
        }

        if name.contains('/') {
            return Err(Error::bad_request("invalid resource name"));
        }

        let path = format!("{}/{}", ctx.parent_path, name);
        debug!(%path, "create validated");

        Ok(Created {
            response: Response::created(&format!("created resource {name}"), &path),
            resource: Arc::new(DoorResource::new(name)),
            path,
        })
    }
}

impl Deletable for DoorResource {
    fn delete(
        &self,
        _request: &Request,
    ) -> Result<Response> {
        Ok(Response::deleted("deleted"))
    }
}
