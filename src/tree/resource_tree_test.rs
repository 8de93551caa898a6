use std::sync::Arc;

use super::*;
use crate::resource::BasicResource;
use crate::resource::DoorResource;
use crate::resource::Resource;
use crate::Error;

fn basic(name: &str) -> Arc<dyn Resource> {
    Arc::new(BasicResource::crud(name, name))
}

fn tree_with(paths: &[&str]) -> ResourceTree {
    let tree = ResourceTree::new();
    for path in paths {
        tree.insert(path, basic(path)).unwrap();
    }
    tree
}

#[test]
fn test_normalize_path() {
    assert_eq!(normalize_path("basic/"), "basic");
    assert_eq!(normalize_path("/living_room//door/"), "living_room/door");
    assert_eq!(normalize_path(""), "");
}

#[test]
fn test_parent_path() {
    assert_eq!(parent_path("living_room/door"), Some("living_room"));
    assert_eq!(parent_path("a/b/c"), Some("a/b"));
    assert_eq!(parent_path("main_door"), None);
}

#[test]
fn test_is_descendant() {
    assert!(is_descendant("living_room/door", "living_room"));
    assert!(is_descendant("a/b/c", "a"));
    assert!(!is_descendant("living_room", "living_room"));
    assert!(!is_descendant("living_room_door", "living_room"));
}

#[test]
fn test_insert_and_lookup() {
    let tree = ResourceTree::new();
    tree.insert("basic/", basic("basic")).unwrap();

    let found = tree.lookup("basic").unwrap();
    assert_eq!(found.meta().name, "basic");
    assert!(tree.contains("/basic"));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_insert_duplicate_path_fails() {
    let tree = tree_with(&["main_door"]);

    let result = tree.insert("main_door/", Arc::new(DoorResource::new("main_door")));

    assert!(matches!(result, Err(Error::DuplicatePath(p)) if p == "main_door"));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_lookup_missing_path() {
    let tree = ResourceTree::new();

    assert!(matches!(tree.lookup("nowhere"), Err(Error::NotFound(p)) if p == "nowhere"));
}

#[test]
fn test_children_derived_from_prefix() {
    let tree = tree_with(&[
        "living_room",
        "living_room/door",
        "living_room/temperature",
        "living_room/door/garage",
        "living_room_extra",
    ]);

    assert_eq!(
        tree.children("living_room"),
        vec!["living_room/door".to_string(), "living_room/temperature".to_string()]
    );
    assert_eq!(tree.children("living_room/door"), vec!["living_room/door/garage".to_string()]);
}

#[test]
fn test_insert_without_registered_parent() {
    let tree = tree_with(&["a/b/c"]);

    assert_eq!(tree.children("a/b"), vec!["a/b/c".to_string()]);
    assert!(!tree.contains("a/b"));
}

#[test]
fn test_remove_detaches_descendants() {
    let tree = tree_with(&[
        "living_room",
        "living_room/door",
        "living_room/door/garage",
        "living_room_extra",
    ]);

    let removed = tree.remove("living_room/door").unwrap();

    assert_eq!(
        removed,
        vec!["living_room/door".to_string(), "living_room/door/garage".to_string()]
    );
    assert_eq!(tree.paths(), vec!["living_room".to_string(), "living_room_extra".to_string()]);
}

#[test]
fn test_remove_missing_path() {
    let tree = tree_with(&["basic"]);

    assert!(matches!(tree.remove("basic/child"), Err(Error::NotFound(_))));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_nearest_ancestor() {
    let tree = tree_with(&["basic"]);

    let (path, _) = tree.nearest_ancestor("basic/x/y").unwrap();
    assert_eq!(path, "basic");
    assert!(tree.nearest_ancestor("other/x").is_none());
    assert!(tree.nearest_ancestor("basic").is_none());
}

#[test]
fn test_dump_indents_by_depth() {
    let tree = ResourceTree::new();
    tree.insert("living_room", basic("BasicResource")).unwrap();
    tree.insert("living_room/door", Arc::new(DoorResource::new("living_room_door")))
        .unwrap();

    let dump = tree.dump();

    assert_eq!(
        dump,
        "living_room (BasicResource) [children]\n  door (living_room_door) [children]\n"
    );
}
