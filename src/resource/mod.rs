//! Resource kinds and the capabilities they expose.
//!
//! A resource advertises what it can do through capability accessors on
//! [`Resource`]; the server dispatches a request by asking for the matching
//! capability rather than by resource type:
//!
//! | Method | Capability     |
//! |--------|----------------|
//! | GET    | [`Readable`]   |
//! | PUT    | [`Writable`]   |
//! | POST   | [`Creatable`], falling back to [`Writable`] |
//! | DELETE | [`Deletable`]  |
//!
//! Observable resources additionally expose [`Observable`], which the
//! scheduler drives on a jittered interval.

mod basic;
mod content;
mod door;
mod guarded;
mod negotiated;
mod payload;
mod sensor;

pub use basic::*;
pub use content::*;
pub use door::*;
pub use guarded::*;
pub use negotiated::*;
pub use payload::*;
pub use sensor::*;


use std::sync::Arc;

use bytes::Bytes;

use crate::config::IntervalRange;
use crate::server::Request;
use crate::server::Response;
use crate::Result;

/// Static description of a resource, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    pub name: String,
    /// `rt` link-format attribute
    pub resource_type: Option<String>,
    /// `if` link-format attribute
    pub interface_type: Option<String>,
    pub observable: bool,
    pub allows_children: bool,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: None,
            interface_type: None,
            observable: false,
            allows_children: false,
        }
    }

    pub fn observable(mut self) -> Self {
        self.observable = true;
        self
    }

    pub fn with_children(mut self) -> Self {
        self.allows_children = true;
        self
    }

    pub fn with_link_attributes(
        mut self,
        resource_type: &str,
        interface_type: &str,
    ) -> Self {
        self.resource_type = Some(resource_type.to_string());
        self.interface_type = Some(interface_type.to_string());
        self
    }
}

/// Encoded payload together with the format it was encoded in.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    pub payload: Bytes,
    pub format: ContentFormat,
}

pub trait Resource: Send + Sync + 'static {
    fn meta(&self) -> &ResourceMeta;

    fn readable(&self) -> Option<&dyn Readable> {
        None
    }

    fn writable(&self) -> Option<&dyn Writable> {
        None
    }

    fn creatable(&self) -> Option<&dyn Creatable> {
        None
    }

    fn deletable(&self) -> Option<&dyn Deletable> {
        None
    }

    fn observable(&self) -> Option<&dyn Observable> {
        None
    }
}

pub trait Readable: Send + Sync {
    /// Renders the current state. Never mutates it.
    fn read(
        &self,
        request: &Request,
    ) -> Result<Response>;
}

pub trait Writable: Send + Sync {
    fn write(
        &self,
        request: &Request,
    ) -> Result<Response>;
}

/// Where a create request landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContext {
    /// Path of the resource handling the create
    pub parent_path: String,
    /// The unregistered path the request targeted, when it addressed one
    /// below `parent_path`
    pub target_path: Option<String>,
}

/// A child produced by [`Creatable::create`], not yet inserted in the tree.
pub struct Created {
    pub path: String,
    pub resource: Arc<dyn Resource>,
    pub response: Response,
}

pub trait Creatable: Send + Sync {
    fn create(
        &self,
        ctx: &CreateContext,
        request: &Request,
    ) -> Result<Created>;
}

pub trait Deletable: Send + Sync {
    /// Validates the delete; detaching from the tree is done by the caller.
    fn delete(
        &self,
        request: &Request,
    ) -> Result<Response>;
}

/// Sensor-like state refreshed by the scheduler.
pub trait Observable: Send + Sync {
    /// Window the delay between refreshes is drawn from.
    fn interval(&self) -> IntervalRange;

    /// Samples new state and commits it if it changed.
    ///
    /// Returns the committed representation, or `None` when the sample was
    /// unchanged and nothing was committed. An `Err` means nothing was
    /// committed either.
    fn refresh(&self) -> Result<Option<Representation>>;

    /// Number of notifications dispatched so far.
    fn observe_counter(&self) -> u64;

    /// Records one dispatched notification.
    fn record_notification(&self);
}

/// Last segment of a normalized path.
pub(crate) fn leaf_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
