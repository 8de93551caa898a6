use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::is_descendant;
use super::normalize_path;
use super::parent_path;
use crate::resource::Resource;
use crate::Error;
use crate::Result;

/// Mapping from path to resource.
///
/// Children are derived from path prefixes, so inserting `a/b` extends the
/// child set of `a` without `a` declaring anything (or even existing).
/// Removal detaches a resource together with all of its descendants.
///
/// The tree lock is independent of the per-resource state locks; the
/// refresh scheduler never takes it for writing.
#[derive(Default)]
pub struct ResourceTree {
    resources: RwLock<BTreeMap<String, Arc<dyn Resource>>>,
}

impl std::fmt::Debug for ResourceTree {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ResourceTree").field("paths", &self.paths()).finish()
    }
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        path: &str,
        resource: Arc<dyn Resource>,
    ) -> Result<()> {
        let path = normalize_path(path);
        let mut resources = self.resources.write();
        if resources.contains_key(&path) {
            return Err(Error::DuplicatePath(path));
        }
        debug!(%path, name = %resource.meta().name, "resource inserted");
        resources.insert(path, resource);
        Ok(())
    }

    pub fn lookup(
        &self,
        path: &str,
    ) -> Result<Arc<dyn Resource>> {
        let path = normalize_path(path);
        self.resources
            .read()
            .get(&path)
            .cloned()
            .ok_or(Error::NotFound(path))
    }

    pub fn contains(
        &self,
        path: &str,
    ) -> bool {
        self.resources.read().contains_key(&normalize_path(path))
    }

    /// Detaches `path` and every descendant, returning the removed paths
    /// (parent first).
    pub fn remove(
        &self,
        path: &str,
    ) -> Result<Vec<String>> {
        let path = normalize_path(path);
        let mut resources = self.resources.write();
        if !resources.contains_key(&path) {
            return Err(Error::NotFound(path));
        }

        let removed: Vec<String> = resources
            .keys()
            .filter(|p| **p == path || is_descendant(p, &path))
            .cloned()
            .collect();
        for p in &removed {
            resources.remove(p);
        }

        debug!(%path, removed = removed.len(), "resources removed");
        Ok(removed)
    }

    /// Direct children of `path`, sorted by path.
    pub fn children(
        &self,
        path: &str,
    ) -> Vec<String> {
        let path = normalize_path(path);
        self.resources
            .read()
            .keys()
            .filter(|p| is_descendant(p, &path) && parent_path(p) == Some(path.as_str()))
            .cloned()
            .collect()
    }

    /// Closest registered ancestor of an unregistered path.
    pub fn nearest_ancestor(
        &self,
        path: &str,
    ) -> Option<(String, Arc<dyn Resource>)> {
        let resources = self.resources.read();
        let mut current = normalize_path(path);
        while let Some(parent) = parent_path(&current) {
            if let Some(resource) = resources.get(parent) {
                return Some((parent.to_string(), resource.clone()));
            }
            current = parent.to_string();
        }
        None
    }

    pub fn paths(&self) -> Vec<String> {
        self.resources.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Indented listing of the tree, one resource per line.
    ///
    /// ```text
    /// living_room (BasicResource)
    ///   door (living_room_door) [children]
    ///   temperature (Temp) [observable, children]
    /// ```
    pub fn dump(&self) -> String {
        let resources = self.resources.read();
        let mut out = String::new();
        for (path, resource) in resources.iter() {
            let meta = resource.meta();
            let depth = path.matches('/').count();
            let leaf = path.rsplit('/').next().unwrap_or(path);

            let mut flags = Vec::new();
            if meta.observable {
                flags.push("observable");
            }
            if meta.allows_children {
                flags.push("children");
            }

            let _ = write!(out, "{}{} ({})", "  ".repeat(depth), leaf, meta.name);
            if !flags.is_empty() {
                let _ = write!(out, " [{}]", flags.join(", "));
            }
            out.push('\n');
        }
        out
    }
}
