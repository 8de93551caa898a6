//! Path-addressed resource registry.

mod resource_tree;
pub use resource_tree::*;

#[cfg(test)]
mod resource_tree_test;

/// Canonical form of a resource path: no leading or trailing `/`, no empty
/// segments. `"/living_room//door/"` becomes `"living_room/door"`.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path of the parent, `None` for a top-level resource.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

/// Whether `path` lies strictly below `ancestor`.
pub fn is_descendant(
    path: &str,
    ancestor: &str,
) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}
