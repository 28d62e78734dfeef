//! Path-addressed storage for raw configuration data.
//!
//! The tree holds exactly what was written: override namespaces
//! (`environment:*`, `component:*`) live here as ordinary branches and are
//! only interpreted by the resolver.

use super::value::{Map, Value};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Nested map store addressed by normalized path segments.
///
/// Writers are serialized by a single lock over the whole tree. Readers take
/// the shared side of the same lock, so a read never observes a half-applied
/// write.
#[derive(Debug, Default)]
pub struct PathTree {
    root: RwLock<Map>,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write leaves the map well-formed, so a panic in another thread
    // holding the guard does not invalidate the data.
    fn read(&self) -> RwLockReadGuard<'_, Map> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Walk to the parent of the last segment, creating intermediate maps,
    /// and run `f` with `(parent, leaf_key)` while the write lock is held.
    ///
    /// A scalar or list sitting on an intermediate segment is replaced by an
    /// empty map. Returns `None` for an empty path.
    pub fn ensure_path<R>(&self, path: &[String], f: impl FnOnce(&mut Map, &str) -> R) -> Option<R> {
        let mut root = self.write();
        let (parent, leaf) = ensure_parent(&mut root, path)?;
        Some(f(parent, leaf))
    }

    /// Overwrite whatever is stored at `path`.
    pub fn set(&self, path: &[String], value: Value) {
        self.ensure_path(path, |parent, leaf| {
            parent.insert(leaf.to_string(), value);
        });
    }

    /// Look up the value stored at `path`. Never creates nodes.
    pub fn get(&self, path: &[String]) -> Option<Value> {
        let root = self.read();
        lookup(&root, path).cloned()
    }

    /// Whether anything is stored at `path`.
    pub fn contains(&self, path: &[String]) -> bool {
        let root = self.read();
        lookup(&root, path).is_some()
    }

    /// Drop all stored data.
    pub fn reset(&self) {
        self.write().clear();
    }

    /// Copy of the whole raw tree.
    pub fn snapshot(&self) -> Value {
        Value::Map(self.read().clone())
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

fn promote_to_map(node: &mut Value) -> &mut Map {
    if !node.is_map() {
        debug!(kind = node.kind(), "Replacing non-map node with a map");
        *node = Value::map();
    }
    match node {
        Value::Map(map) => map,
        _ => unreachable!("node was promoted to a map"),
    }
}

fn ensure_parent<'t, 'p>(root: &'t mut Map, path: &'p [String]) -> Option<(&'t mut Map, &'p str)> {
    let (leaf, parents) = path.split_last()?;
    let mut node = root;
    for segment in parents {
        let child = node.entry(segment.clone()).or_insert_with(Value::map);
        node = promote_to_map(child);
    }
    Some((node, leaf.as_str()))
}

fn lookup<'t>(root: &'t Map, path: &[String]) -> Option<&'t Value> {
    let (leaf, parents) = path.split_last()?;
    let mut node = root;
    for segment in parents {
        match node.get(segment)? {
            Value::Map(map) => node = map,
            // Traversing through a leaf is a miss.
            _ => return None,
        }
    }
    node.get(leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::path::segments;

    #[test]
    fn test_set_and_get_single_segment() {
        let tree = PathTree::new();
        tree.set(&segments("key"), Value::from("value"));
        assert_eq!(tree.get(&segments("key")), Some(Value::from("value")));
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let tree = PathTree::new();
        tree.set(&segments("a:b:c"), Value::from("value"));
        assert_eq!(tree.get(&segments("a:b:c")), Some(Value::from("value")));
        assert!(tree.get(&segments("a:b")).unwrap().is_map());
    }

    #[test]
    fn test_set_through_scalar_promotes() {
        let tree = PathTree::new();
        tree.set(&segments("a"), Value::from("scalar"));
        tree.set(&segments("a:b"), Value::Int(1));
        assert_eq!(tree.get(&segments("a:b")), Some(Value::Int(1)));
        assert!(tree.get(&segments("a")).unwrap().is_map());
    }

    #[test]
    fn test_set_overwrites_map_with_scalar() {
        let tree = PathTree::new();
        tree.set(&segments("a:b"), Value::Int(1));
        tree.set(&segments("a"), Value::Bool(true));
        assert_eq!(tree.get(&segments("a")), Some(Value::Bool(true)));
        assert_eq!(tree.get(&segments("a:b")), None);
    }

    #[test]
    fn test_get_missing_intermediate() {
        let tree = PathTree::new();
        tree.set(&segments("a:b"), Value::Int(1));
        assert_eq!(tree.get(&segments("x:b")), None);
        assert_eq!(tree.get(&segments("a:c")), None);
    }

    #[test]
    fn test_get_through_leaf_is_miss() {
        let tree = PathTree::new();
        tree.set(&segments("a"), Value::from("leaf"));
        assert_eq!(tree.get(&segments("a:b")), None);
        assert!(!tree.contains(&segments("a:b")));
    }

    #[test]
    fn test_get_does_not_create_nodes() {
        let tree = PathTree::new();
        assert_eq!(tree.get(&segments("a:b:c")), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_ensure_path_empty() {
        let tree = PathTree::new();
        assert!(tree.ensure_path(&[], |_, _| ()).is_none());
    }

    #[test]
    fn test_reset_clears_everything() {
        let tree = PathTree::new();
        tree.set(&segments("a:b"), Value::Int(1));
        tree.set(&segments("c"), Value::Int(2));
        tree.reset();
        assert!(tree.is_empty());
        assert_eq!(tree.get(&segments("a:b")), None);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let tree = PathTree::new();
        tree.set(&segments("a"), Value::Int(1));
        let snap = tree.snapshot();
        tree.set(&segments("a"), Value::Int(2));
        assert_eq!(snap.as_map().unwrap()["a"], Value::Int(1));
    }
}
