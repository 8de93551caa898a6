use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;

use super::Method;
use super::Request;
use super::Response;
use crate::config::Settings;
use crate::observe::NotificationHub;
use crate::observe::ObserveRegistry;
use crate::observe::ObserverHandle;
use crate::resource::CreateContext;
use crate::resource::Resource;
use crate::scheduler::ScheduleEntry;
use crate::scheduler::Scheduler;
use crate::tree::normalize_path;
use crate::tree::ResourceTree;
use crate::Error;
use crate::Result;

/// Binds the resource tree, the observer registry and the refresh scheduler,
/// and dispatches requests to resource capabilities.
pub struct ResourceServer {
    settings: Arc<Settings>,
    tree: ResourceTree,
    registry: ObserveRegistry,
    scheduler: Scheduler,
}

impl std::fmt::Debug for ResourceServer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ResourceServer")
            .field("settings", &self.settings)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl ResourceServer {
    /// Uses the in-process [`ObserveRegistry`] as notification hub.
    pub fn new(
        settings: Settings,
        shutdown: CancellationToken,
    ) -> Self {
        let registry = ObserveRegistry::new(settings.observe.clone());
        let hub: Arc<dyn NotificationHub> = Arc::new(registry.clone());
        Self::with_hub(settings, registry, hub, shutdown)
    }

    /// Routes notifications to an external hub; `registry` still backs
    /// [`ResourceServer::observe`].
    pub fn with_hub(
        settings: Settings,
        registry: ObserveRegistry,
        hub: Arc<dyn NotificationHub>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            tree: ResourceTree::new(),
            registry,
            scheduler: Scheduler::new(hub, shutdown),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &ObserveRegistry {
        &self.registry
    }

    /// Binds `path` to `resource` and starts its refresh task if it is
    /// observable. Must be called from within a tokio runtime.
    pub fn register_resource(
        &self,
        path: &str,
        resource: Arc<dyn Resource>,
    ) -> Result<()> {
        let path = normalize_path(path);
        self.tree.insert(&path, resource.clone())?;
        if let Some(entry) = ScheduleEntry::new(&path, resource) {
            self.scheduler.schedule(entry);
        }
        Ok(())
    }

    /// Registers an observer relation on an existing resource.
    pub fn observe(
        &self,
        path: &str,
    ) -> Result<ObserverHandle> {
        let resource = self.tree.lookup(path)?;
        if !resource.meta().observable {
            return Err(Error::MethodNotAllowed {
                method: Method::Get,
                path: normalize_path(path),
            });
        }
        Ok(self.registry.register(path))
    }

    /// Handles one request; failures are turned into error responses.
    pub fn handle(
        &self,
        request: &Request,
    ) -> Response {
        let result = match request.method {
            Method::Get => self.read(request),
            Method::Put => self.write(request),
            Method::Post => self.post(request),
            Method::Delete => self.delete(request),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                debug!(path = %request.path, method = ?request.method, "request rejected: {}", e);
                Response::from(&e)
            }
        }
    }

    fn read(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let resource = self.tree.lookup(&request.path)?;
        match resource.readable() {
            Some(readable) => readable.read(request),
            None => Err(not_allowed(request)),
        }
    }

    fn write(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let resource = self.tree.lookup(&request.path)?;
        match resource.writable() {
            Some(writable) => writable.write(request),
            None => Err(not_allowed(request)),
        }
    }

    /// POST on an existing resource creates a child through its
    /// `Creatable` capability, or overwrites it when it is only writable.
    /// POST on an unregistered path is routed to its nearest registered
    /// ancestor, which creates the resource at that path. A creatable parent
    /// that does not accept children answers `MethodNotAllowed`.
    fn post(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let path = normalize_path(&request.path);
        let (ctx, parent) = match self.tree.lookup(&path) {
            Ok(resource) => (
                CreateContext {
                    parent_path: path.clone(),
                    target_path: None,
                },
                resource,
            ),
            Err(Error::NotFound(_)) => {
                let (parent_path, parent) = self
                    .tree
                    .nearest_ancestor(&path)
                    .ok_or_else(|| Error::NotFound(path.clone()))?;
                (
                    CreateContext {
                        parent_path,
                        target_path: Some(path.clone()),
                    },
                    parent,
                )
            }
            Err(e) => return Err(e),
        };

        if let Some(creatable) = parent.creatable() {
            if !parent.meta().allows_children {
                return Err(not_allowed(request));
            }
            let created = creatable.create(&ctx, request)?;
            self.register_resource(&created.path, created.resource)
                .map_err(|e| match e {
                    Error::DuplicatePath(p) => Error::bad_request(format!("resource {p} already exists")),
                    other => other,
                })?;
            info!(path = %created.path, "child resource created");
            return Ok(created.response);
        }

        match (ctx.target_path.is_none(), parent.writable()) {
            (true, Some(writable)) => writable.write(request),
            _ => Err(not_allowed(request)),
        }
    }

    fn delete(
        &self,
        request: &Request,
    ) -> Result<Response> {
        let resource = self.tree.lookup(&request.path)?;
        let deletable = resource.deletable().ok_or_else(|| not_allowed(request))?;
        let response = deletable.delete(request)?;

        for path in self.tree.remove(&request.path)? {
            self.scheduler.cancel(&path);
            self.registry.remove_path(&path);
        }
        Ok(response)
    }

    /// Stops every refresh task; in-flight ticks complete first.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        info!(resources = self.tree.len(), "resource server stopped");
    }
}

fn not_allowed(request: &Request) -> Error {
    Error::MethodNotAllowed {
        method: request.method,
        path: request.path.clone(),
    }
}
