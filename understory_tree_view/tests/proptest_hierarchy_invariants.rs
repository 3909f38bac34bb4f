// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based invariant tests for hierarchy resolution over arbitrary,
//! possibly inconsistent node lists.
//!
//! Parent links are drawn from a small id space, so generated snapshots
//! routinely contain dangling parents, self parents, duplicate ids, and cycles.
//!
//! 1. Ancestor resolution terminates and never repeats a node.
//! 2. Ancestors of a node on a simple chain are exactly its parent chain.
//! 3. Descendant closures start with the query ids and never repeat an id.
//! 4. Every id in a descendant closure other than the query reaches the query by parent links.
//! 5. Toggling never produces duplicates and flips membership.
//! 6. Reconciliation is idempotent and only ever grows the expanded set.
//! 7. Visible rows never repeat a node, and unknown explicit roots are reported as pending.

use proptest::prelude::*;
use std::collections::HashSet;
use understory_tree_view::{
    Capabilities, ExpandedSet, Node, NodeStore, TreeView, TreeViewConfig, reconcile_expanded,
    resolve_ancestors, resolve_descendant_ids, toggle,
};

// ── Helpers ─────────────────────────────────────────────────────────────

const ID_SPACE: u32 = 12;

fn arbitrary_nodes(max_len: usize) -> impl Strategy<Value = Vec<Node<u32, ()>>> {
    proptest::collection::vec(
        (0..ID_SPACE, proptest::option::of(0..ID_SPACE + 2)),
        0..=max_len,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(id, parent)| Node {
                id,
                label: format!("n{id}"),
                parent,
                data: (),
            })
            .collect()
    })
}

fn chain(len: u32) -> Vec<Node<u32, ()>> {
    (0..len)
        .map(|i| Node {
            id: i,
            label: format!("n{i}"),
            parent: i.checked_sub(1),
            data: (),
        })
        .collect()
}

fn is_unique<T: std::hash::Hash + Eq>(items: impl IntoIterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    items.into_iter().all(|i| seen.insert(i))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Ancestors terminate without repeats
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ancestors_terminate_without_repeats(
        nodes in arbitrary_nodes(24),
        query in proptest::collection::vec(0..ID_SPACE, 0..4),
    ) {
        let store = NodeStore::new(&nodes);
        let chain = resolve_ancestors(&query, Vec::new(), &store);
        prop_assert!(is_unique(chain.iter().map(|n| n.id)));
        prop_assert!(chain.len() <= nodes.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Chains resolve nearest first
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn chain_ancestors_are_nearest_first(len in 1_u32..30, pick in 0_u32..30) {
        let nodes = chain(len);
        let store = NodeStore::new(&nodes);
        let leaf = pick % len;
        let ids: Vec<u32> = store.ancestors([leaf]).iter().map(|n| n.id).collect();
        let expected: Vec<u32> = (0..leaf).rev().collect();
        prop_assert_eq!(ids, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 + 4. Descendant closures
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn descendants_start_with_query_and_are_reachable(
        nodes in arbitrary_nodes(24),
        query in 0..ID_SPACE + 2,
    ) {
        let store = NodeStore::new(&nodes);
        let ids = resolve_descendant_ids([query], &store);
        prop_assert_eq!(ids.first().copied(), Some(query));
        prop_assert!(is_unique(ids.iter().copied()));

        // Each discovered id has some node whose parent was discovered earlier.
        for (pos, id) in ids.iter().enumerate().skip(1) {
            let earlier: HashSet<u32> = ids[..pos].iter().copied().collect();
            prop_assert!(
                nodes
                    .iter()
                    .any(|n| n.id == *id && n.parent.is_some_and(|p| earlier.contains(&p))),
                "{} at {} has no parent among {:?}", id, pos, &ids[..pos]
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Toggle
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_keeps_set_semantics(
        ops in proptest::collection::vec((0_u32..8, proptest::option::of(any::<bool>())), 0..40),
    ) {
        let mut current: Vec<u32> = Vec::new();
        for (id, force) in ops {
            let was = current.contains(&id);
            let next = toggle(&current, &id, force);
            prop_assert!(is_unique(next.iter().copied()));
            prop_assert_eq!(next.contains(&id), force.unwrap_or(!was));
            current = next;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Reconciliation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconcile_is_idempotent_and_monotone(
        nodes in arbitrary_nodes(24),
        selected in proptest::collection::vec(0..ID_SPACE, 0..4),
        expanded in proptest::collection::hash_set(0..ID_SPACE, 0..6),
    ) {
        let store = NodeStore::new(&nodes);
        let expanded: Vec<u32> = expanded.into_iter().collect();
        let once = reconcile_expanded(&store, &selected, &expanded);
        let again = reconcile_expanded(&store, &selected, &expanded);
        prop_assert_eq!(&once, &again);
        prop_assert!(expanded.iter().all(|e| once.contains(e)));
        prop_assert!(is_unique(once.iter().copied()));

        let settled = reconcile_expanded(&store, &selected, &once);
        prop_assert_eq!(settled, once);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Rows
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_rows_never_repeat(
        nodes in arbitrary_nodes(24),
        expanded in proptest::collection::vec(0..ID_SPACE, 0..12),
        roots in proptest::collection::vec(0..ID_SPACE, 0..4),
    ) {
        let mut view = TreeView::new(TreeViewConfig::default());
        for id in &expanded {
            view.handle_expand_click(id, Some(true));
        }
        prop_assert_eq!(view.expanded(), &ExpandedSet::from(expanded.clone()));

        let ctx = view.context(&nodes, &[], Capabilities::empty());
        prop_assert!(is_unique(ctx.visible_rows().iter().map(|r| r.node.id)));

        let ctx = ctx.with_roots(&roots);
        prop_assert!(is_unique(ctx.visible_rows().iter().map(|r| r.node.id)));

        // Every explicit root is either rendered or reported as pending.
        for id in &roots {
            let rendered = nodes.iter().any(|n| n.id == *id);
            prop_assert_eq!(ctx.pending_roots().any(|p| p == id), !rendered);
        }
    }
}
