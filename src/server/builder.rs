//! Assembles a [`ResourceServer`] and its resource tree.
//!
//! ## Example
//! ```ignore
//! let shutdown = CancellationToken::new();
//! let server = ServerBuilder::new(settings, shutdown.clone())
//!     .with_default_resources()
//!     .build()?;
//! ```
//!
//! `build()` spawns one refresh task per observable resource and therefore
//! must run inside a tokio runtime.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::ResourceServer;
use crate::config::Settings;
use crate::observe::NotificationHub;
use crate::observe::ObserveRegistry;
use crate::resource::BasicCapabilities;
use crate::resource::BasicResource;
use crate::resource::DoorResource;
use crate::resource::NegotiatedResource;
use crate::resource::Resource;
use crate::resource::ResourceMeta;
use crate::resource::SensorEncoding;
use crate::resource::SensorResource;
use crate::Result;

const ROOM_DESCRIPTION: &str = "Available resources: Temperature, Door and Light";

pub struct ServerBuilder {
    settings: Settings,
    shutdown: CancellationToken,
    hub: Option<Arc<dyn NotificationHub>>,
    resources: Vec<(String, Arc<dyn Resource>)>,
}

impl ServerBuilder {
    pub fn new(
        settings: Settings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            settings,
            shutdown,
            hub: None,
            resources: Vec::new(),
        }
    }

    /// Routes notifications to `hub` instead of the in-process registry.
    pub fn with_hub(
        mut self,
        hub: Arc<dyn NotificationHub>,
    ) -> Self {
        self.hub = Some(hub);
        self
    }

    pub fn with_resource(
        mut self,
        path: &str,
        resource: Arc<dyn Resource>,
    ) -> Self {
        self.resources.push((path.to_string(), resource));
        self
    }

    /// Adds the rooms, doors, sensors and demo resources the server ships with.
    pub fn with_default_resources(self) -> Self {
        let bounds = self.settings.sensor;
        let schedule = self.settings.schedule.clone();

        let room = || {
            Arc::new(BasicResource::new(
                ResourceMeta::new("BasicResource")
                    .with_children()
                    .with_link_attributes("rt1", "if1"),
                BasicCapabilities::CRUD,
                ROOM_DESCRIPTION,
            ))
        };

        self.with_resource("basic", Arc::new(BasicResource::crud("BasicResource", "Basic Resource")))
            .with_resource("hello_world", Arc::new(BasicResource::hello()))
            .with_resource("hello_post", Arc::new(BasicResource::hello_post()))
            .with_resource("living_room", room())
            .with_resource(
                "living_room/temperature",
                Arc::new(SensorResource::new(
                    "Temp",
                    SensorEncoding::PlainText,
                    schedule.plain_temperature,
                    bounds,
                )),
            )
            .with_resource("living_room/door", Arc::new(DoorResource::new("living_room_door")))
            .with_resource("dinning_room", room())
            .with_resource(
                "dinning_room/temperature",
                Arc::new(SensorResource::new(
                    "dinning",
                    SensorEncoding::Json,
                    schedule.json_temperature,
                    bounds,
                )),
            )
            .with_resource("dinning_room/door", Arc::new(DoorResource::new("dinning_room_door")))
            .with_resource("main_door", Arc::new(DoorResource::new("main_door")))
            .with_resource(
                "test",
                Arc::new(SensorResource::new(
                    "test",
                    SensorEncoding::PlainText,
                    schedule.advanced,
                    bounds,
                )),
            )
            .with_resource("xml", Arc::new(NegotiatedResource::xml("XML")))
            .with_resource(
                "multiple_encoding",
                Arc::new(NegotiatedResource::multiple_encoding("MultipleEncoding")),
            )
    }

    /// Registers every queued resource and starts the refresh tasks.
    pub fn build(self) -> Result<ResourceServer> {
        let registry = ObserveRegistry::new(self.settings.observe.clone());
        let hub = match self.hub {
            Some(hub) => hub,
            None => Arc::new(registry.clone()),
        };

        let server = ResourceServer::with_hub(self.settings, registry, hub, self.shutdown);
        for (path, resource) in self.resources {
            server.register_resource(&path, resource)?;
        }

        info!(
            resources = server.tree().len(),
            refreshing = server.scheduler().active_entries(),
            "resource server built"
        );
        Ok(server)
    }
}
