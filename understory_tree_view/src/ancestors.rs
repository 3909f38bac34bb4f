// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Upward traversal: ancestor chains for one or more nodes.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::store::NodeStore;
use crate::types::Node;

type Level<'a, K> = SmallVec<[&'a K; 8]>;

/// Resolve the ancestors of every id in `ids`, nearest first.
///
/// The walk proceeds one level at a time: the parents of all nodes at the
/// current level are appended to `included` (each node at most once, at the
/// position where it is first discovered), then those parents become the next
/// level. Ancestors that are already present in `included` are not appended
/// again but are still walked through, so a caller can pass the result of an
/// earlier call to extend it incrementally.
///
/// Unknown ids are dropped. Dangling and self-referential parent links end the
/// chain at that node. Parent cycles terminate because a node is never
/// expanded twice within one call.
///
/// ## Example
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, NodeStore, resolve_ancestors};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root(0, "Root", ()),
///     Node::child("A", 0, "A", ()),
///     Node::child("B", "A", "Be", ()),
/// ];
/// let store = NodeStore::new(&nodes);
///
/// let chain = resolve_ancestors([Identifier::from("B")], Vec::new(), &store);
/// let ids: Vec<_> = chain.iter().map(|n| n.id.clone()).collect();
/// assert_eq!(ids, vec![Identifier::from("A"), Identifier::from(0)]);
/// ```
pub fn resolve_ancestors<'a, K, T, I>(
    ids: I,
    included: Vec<&'a Node<K, T>>,
    store: &NodeStore<'a, K, T>,
) -> Vec<&'a Node<K, T>>
where
    K: Eq + Hash,
    I: IntoIterator,
    I::Item: Borrow<K>,
{
    let mut out = included;
    let mut seen: HashSet<&'a K> = out.iter().map(|n| &n.id).collect();
    let mut expanded: HashSet<&'a K> = HashSet::new();

    let mut level: Level<'a, K> = ids
        .into_iter()
        .filter_map(|id| store.get(Borrow::<K>::borrow(&id)))
        .map(|n| &n.id)
        .collect();

    loop {
        level.retain(|id| expanded.insert(*id));
        if level.is_empty() {
            break;
        }

        let mut next: Level<'a, K> = SmallVec::new();
        for id in &level {
            let Some(parent) = store.parent_of(id) else {
                continue;
            };
            next.push(&parent.id);
            if seen.insert(&parent.id) {
                out.push(parent);
            }
        }
        if next.is_empty() {
            break;
        }
        level = next;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(ancestors = out.len(), "resolved ancestors");

    out
}

impl<'a, K: Eq + Hash, T> NodeStore<'a, K, T> {
    /// Ancestors of `ids`, nearest first, without a seed.
    ///
    /// Shorthand for [`resolve_ancestors`] with an empty `included` list.
    pub fn ancestors<I>(&self, ids: I) -> Vec<&'a Node<K, T>>
    where
        I: IntoIterator,
        I::Item: Borrow<K>,
    {
        resolve_ancestors(ids, Vec::new(), self)
    }
}
