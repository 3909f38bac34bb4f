// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Downward traversal: descendant closures.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::store::NodeStore;

/// Resolve `ids` plus every node transitively parented by one of them.
///
/// The query ids always come first, in input order, even when no node has that
/// id. Descendants follow generation by generation: each pass appends, in
/// snapshot order, the nodes whose parent was already collected before the
/// pass began. Passes repeat until one finds nothing new, which also bounds the
/// walk on cyclic parent links.
///
/// Repeated query ids are collapsed to their first occurrence.
///
/// ## Example
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, NodeStore, resolve_descendant_ids};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root("X", "Ex", ()),
///     Node::child("Y", "X", "Why?", ()),
///     Node::child("Z", "X", "Zed", ()),
/// ];
/// let store = NodeStore::new(&nodes);
///
/// let ids = resolve_descendant_ids([Identifier::from("X")], &store);
/// let expected: Vec<Identifier> = ["X", "Y", "Z"].into_iter().map(Identifier::from).collect();
/// assert_eq!(ids, expected);
///
/// // Unknown ids resolve to themselves.
/// let ids = resolve_descendant_ids([Identifier::from("Q")], &store);
/// assert_eq!(ids, vec![Identifier::from("Q")]);
/// ```
pub fn resolve_descendant_ids<K, T, I>(ids: I, store: &NodeStore<'_, K, T>) -> Vec<K>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut out: Vec<K> = Vec::new();
    let mut collected: HashSet<K> = HashSet::new();
    for id in ids {
        if collected.insert(id.clone()) {
            out.push(id);
        }
    }

    #[cfg(feature = "tracing")]
    let mut passes = 0_usize;

    loop {
        let found: Vec<&K> = {
            let mut in_pass: HashSet<&K> = HashSet::new();
            store
                .nodes()
                .iter()
                .filter(|n| {
                    n.parent.as_ref().is_some_and(|p| collected.contains(p))
                        && !collected.contains(&n.id)
                        && in_pass.insert(&n.id)
                })
                .map(|n| &n.id)
                .collect()
        };
        if found.is_empty() {
            break;
        }

        #[cfg(feature = "tracing")]
        {
            passes += 1;
        }

        for id in found {
            collected.insert(id.clone());
            out.push(id.clone());
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(descendants = out.len(), passes, "resolved descendants");

    out
}

impl<K: Clone + Eq + Hash, T> NodeStore<'_, K, T> {
    /// `id` followed by all of its descendants.
    ///
    /// Shorthand for [`resolve_descendant_ids`] with a single query id.
    pub fn descendant_ids(&self, id: &K) -> Vec<K> {
        resolve_descendant_ids([id.clone()], self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::mock_nodes;
    use crate::{Identifier, Node};
    use alloc::vec;

    #[test]
    fn unknown_returns_self() {
        let nodes = mock_nodes();
        let store = NodeStore::new(&nodes);
        assert_eq!(store.descendant_ids(&"Q".into()), keys!["Q"]);
    }

    #[test]
    fn leaf_returns_self() {
        let nodes = mock_nodes();
        let store = NodeStore::new(&nodes);
        assert_eq!(store.descendant_ids(&"Z".into()), keys!["Z"]);
    }

    #[test]
    fn children() {
        let nodes = mock_nodes();
        let store = NodeStore::new(&nodes);
        assert_eq!(store.descendant_ids(&"A".into()), keys!["A", "B"]);
        assert_eq!(store.descendant_ids(&"X".into()), keys!["X", "Y", "Z"]);
    }

    #[test]
    fn grandchildren_follow_generations() {
        let nodes = mock_nodes();
        let store = NodeStore::new(&nodes);
        let ids = store.descendant_ids(&0.into());
        assert_eq!(ids, keys![0, "A", 1, "B", 2, 3, 4]);
    }

    #[test]
    fn several_query_ids() {
        let nodes = mock_nodes();
        let store = NodeStore::new(&nodes);
        assert_eq!(
            resolve_descendant_ids(keys!["X", "A", "X"], &store),
            keys!["X", "A", "B", "Y", "Z"]
        );
    }

    #[test]
    fn parent_cycle_terminates() {
        let nodes: Vec<Node<Identifier, i32>> = vec![
            Node::child("P", "Q", "P", 0),
            Node::child("Q", "P", "Q", 0),
            Node::child("R", "Q", "R", 0),
        ];
        let store = NodeStore::new(&nodes);
        assert_eq!(store.descendant_ids(&"P".into()), keys!["P", "Q", "R"]);
    }

    #[test]
    fn duplicate_child_ids_appear_once() {
        let nodes: Vec<Node<Identifier, i32>> = vec![
            Node::root(0, "Root", 0),
            Node::child("A", 0, "A", 0),
            Node::child("A", 0, "A again", 0),
        ];
        let store = NodeStore::new(&nodes);
        assert_eq!(store.descendant_ids(&0.into()), keys![0, "A"]);
    }
}
