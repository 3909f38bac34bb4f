// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed, indexed view over one snapshot of a flat node list.

use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::Node;

type ChildList = SmallVec<[usize; 4]>;

/// Read-only view over a snapshot of nodes.
///
/// The host owns the node list and may replace it on every render. A `NodeStore`
/// borrows one snapshot and builds id and child lookup tables for it so that the
/// resolvers do not rescan the list for every step.
///
/// Ids are expected to be unique. This is not validated: when an id occurs more
/// than once, the first occurrence in slice order is the one returned by lookups.
///
/// ## Example
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, NodeStore};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root(0, "Root", ()),
///     Node::child("A", 0, "A", ()),
/// ];
/// let store = NodeStore::new(&nodes);
///
/// assert_eq!(store.parent_of(&"A".into()).map(|n| n.label.as_str()), Some("Root"));
/// assert!(store.has_children(&0.into()));
/// ```
pub struct NodeStore<'a, K, T> {
    nodes: &'a [Node<K, T>],
    by_id: HashMap<&'a K, usize>,
    children: HashMap<&'a K, ChildList>,
}

impl<K: core::fmt::Debug, T> core::fmt::Debug for NodeStore<'_, K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeStore")
            .field("nodes", &self.nodes.len())
            .field("distinct_ids", &self.by_id.len())
            .finish_non_exhaustive()
    }
}

impl<'a, K: Eq + Hash, T> NodeStore<'a, K, T> {
    /// Index a snapshot.
    pub fn new(nodes: &'a [Node<K, T>]) -> Self {
        let mut by_id: HashMap<&'a K, usize> = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<&'a K, ChildList> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            by_id.entry(&node.id).or_insert(i);
            if let Some(parent) = node.parent.as_ref().filter(|p| **p != node.id) {
                children.entry(parent).or_default().push(i);
            }
        }
        Self {
            nodes,
            by_id,
            children,
        }
    }

    /// The underlying snapshot, in host order.
    pub fn nodes(&self) -> &'a [Node<K, T>] {
        self.nodes
    }

    /// Number of nodes in the snapshot (duplicates included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id.
    pub fn get(&self, id: &K) -> Option<&'a Node<K, T>> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// Returns `true` if a node with this id exists.
    pub fn contains(&self, id: &K) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns the parent of `id`.
    ///
    /// `None` when `id` is unknown, has no parent, or its parent link is
    /// dangling or points back at itself.
    pub fn parent_of(&self, id: &K) -> Option<&'a Node<K, T>> {
        let node = self.get(id)?;
        let parent = node.parent.as_ref()?;
        if *parent == node.id {
            return None;
        }
        self.get(parent)
    }

    /// Nodes whose parent link names `id`, in snapshot order.
    pub fn children_of(&self, id: &K) -> impl Iterator<Item = &'a Node<K, T>> + '_ {
        let nodes = self.nodes;
        self.children
            .get(id)
            .into_iter()
            .flat_map(|list| list.iter())
            .map(move |&i| &nodes[i])
    }

    /// Returns `true` if any node names `id` as its parent.
    pub fn has_children(&self, id: &K) -> bool {
        self.children.get(id).is_some_and(|c| !c.is_empty())
    }

    /// Returns `true` if `id` exists and has no resolvable parent.
    pub fn is_root(&self, id: &K) -> bool {
        self.contains(id) && self.parent_of(id).is_none()
    }

    /// Nodes without a resolvable parent, in snapshot order.
    pub fn roots(&self) -> impl Iterator<Item = &'a Node<K, T>> + '_ {
        self.nodes.iter().filter(move |n| match &n.parent {
            None => true,
            Some(p) => *p == n.id || !self.contains(p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identifier;
    use alloc::vec;
    use alloc::vec::Vec;

    fn ids<'a>(it: impl Iterator<Item = &'a Node<Identifier, u32>>) -> Vec<Identifier> {
        it.map(|n| n.id.clone()).collect()
    }

    #[test]
    fn dangling_and_self_parents_are_roots() {
        let nodes: Vec<Node<Identifier, u32>> = vec![
            Node::root(0, "Root", 0),
            Node::child("A", 0, "A", 1),
            Node::child("D", "missing", "Dangling", 2),
            Node::child("S", "S", "Selfish", 3),
        ];
        let store = NodeStore::new(&nodes);

        assert!(store.parent_of(&"D".into()).is_none());
        assert!(store.parent_of(&"S".into()).is_none());
        assert!(!store.has_children(&"S".into()));
        assert_eq!(
            ids(store.roots()),
            vec![Identifier::from(0), "D".into(), "S".into()]
        );
        assert!(store.is_root(&"S".into()));
        assert!(!store.is_root(&"A".into()));
        assert!(!store.is_root(&"missing".into()));
    }

    #[test]
    fn children_keep_snapshot_order() {
        let nodes: Vec<Node<Identifier, u32>> = vec![
            Node::child(3, 1, "Three", 0),
            Node::root(1, "One", 0),
            Node::child(2, 1, "Two", 0),
        ];
        let store = NodeStore::new(&nodes);
        assert_eq!(
            ids(store.children_of(&1.into())),
            vec![Identifier::from(3), Identifier::from(2)]
        );
        assert_eq!(store.children_of(&2.into()).count(), 0);
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let nodes: Vec<Node<Identifier, u32>> =
            vec![Node::root(1, "first", 0), Node::root(1, "second", 0)];
        let store = NodeStore::new(&nodes);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&1.into()).map(|n| n.label.as_str()), Some("first"));
    }
}
