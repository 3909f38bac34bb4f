// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanded-node bookkeeping: toggling, and reconciling with the selection.
//!
//! ## Overview
//!
//! A tree view only renders the children of nodes in its [`ExpandedSet`]. Two
//! things change that set:
//!
//! - Explicit expander clicks, handled by [`toggle`] / [`ExpandedSet::toggle`].
//! - Selection changes. When a selected node is hidden inside a collapsed
//!   subtree, [`reconcile_expanded`] grows the set by the missing ancestors so
//!   that the selection is visible. [`ShowSelected`] decides how often that runs.
//!
//! [`ExpansionState`] combines both for one tree instance.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Display;
use core::hash::Hash;

use crate::ancestors::resolve_ancestors;
use crate::store::NodeStore;

/// Returns `current` with the membership of `id` changed.
///
/// - `force == Some(true)`: `id` is present afterwards. It is appended if absent
///   and never duplicated.
/// - `force == Some(false)`: `id` is absent afterwards.
/// - `force == None`: membership is flipped; an absent id is appended.
///
/// The input is never modified.
///
/// ```rust
/// use understory_tree_view::toggle;
///
/// assert_eq!(toggle(&[], &"x", None), vec!["x"]);
/// assert_eq!(toggle(&["x"], &"x", None), Vec::<&str>::new());
/// assert_eq!(toggle(&["x"], &"x", Some(true)), vec!["x"]);
/// assert_eq!(toggle(&["x"], &"y", Some(false)), vec!["x"]);
/// ```
pub fn toggle<K: Clone + PartialEq>(current: &[K], id: &K, force: Option<bool>) -> Vec<K> {
    let present = current.contains(id);
    let open = force.unwrap_or(!present);
    let mut next: Vec<K> = current.iter().filter(|k| *k != id).cloned().collect();
    if open {
        if present {
            // Keep the existing position.
            return current.to_vec();
        }
        next.push(id.clone());
    }
    next
}

/// Grow `expanded` so that every node in `selected` is visible.
///
/// The ancestors of `selected` that are not already expanded are appended to
/// `expanded`, and the combined list is sorted by each id's string
/// representation (byte-wise, stable). The string order is deliberately simple
/// and total across mixed integer/string ids; it is not a numeric order.
///
/// The result is a pure function of the inputs; callers typically compare it
/// with their current set and only store it when something was added (see
/// [`ExpansionState::reconcile`]).
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, NodeStore, reconcile_expanded};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root(0, "Root", ()),
///     Node::child("A", 0, "A", ()),
///     Node::child("B", "A", "Be", ()),
/// ];
/// let store = NodeStore::new(&nodes);
///
/// let expanded = reconcile_expanded(&store, [Identifier::from("B")], &[]);
/// assert_eq!(expanded, vec![Identifier::from(0), Identifier::from("A")]);
/// ```
pub fn reconcile_expanded<K, T, I>(
    store: &NodeStore<'_, K, T>,
    selected: I,
    expanded: &[K],
) -> Vec<K>
where
    K: Clone + Eq + Hash + Display,
    I: IntoIterator,
    I::Item: Borrow<K>,
{
    let mut out = expanded.to_vec();
    out.extend(
        resolve_ancestors(selected, Vec::new(), store)
            .into_iter()
            .map(|n| &n.id)
            .filter(|id| !expanded.contains(id))
            .cloned(),
    );
    sort_by_display(&mut out);
    out
}

fn sort_by_display<K: Display>(ids: &mut [K]) {
    ids.sort_by_cached_key(|id| -> String { id.to_string() });
}

/// When a tree view grows its expanded set to reveal the selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShowSelected {
    /// Reconcile on every selection change.
    #[default]
    Always,
    /// Reconcile the first time the selection is non-empty, then never again.
    First,
    /// Never expand automatically.
    Never,
}

/// Ordered, duplicate-free set of expanded node ids.
///
/// Order is insertion order (or the sorted order produced by reconciliation);
/// it carries no meaning beyond determinism.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedSet<K> {
    ids: Vec<K>,
}

impl<K> Default for ExpandedSet<K> {
    fn default() -> Self {
        Self { ids: Vec::new() }
    }
}

impl<K: Clone + PartialEq> ExpandedSet<K> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` is expanded.
    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    /// Apply [`toggle`] and store the result.
    pub fn toggle(&mut self, id: &K, force: Option<bool>) {
        self.ids = toggle(&self.ids, id, force);
    }

    /// Expanded ids.
    pub fn as_slice(&self) -> &[K] {
        &self.ids
    }

    /// Iterate over expanded ids.
    pub fn iter(&self) -> core::slice::Iter<'_, K> {
        self.ids.iter()
    }

    /// Number of expanded ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Collapse everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl<K: Clone + PartialEq> From<Vec<K>> for ExpandedSet<K> {
    fn from(ids: Vec<K>) -> Self {
        let mut unique: Vec<K> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: unique }
    }
}

impl<'a, K> IntoIterator for &'a ExpandedSet<K> {
    type Item = &'a K;
    type IntoIter = core::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Expanded set of one tree view plus its [`ShowSelected`] bookkeeping.
#[derive(Clone, Debug)]
pub struct ExpansionState<K> {
    expanded: ExpandedSet<K>,
    policy: ShowSelected,
    shown_once: bool,
}

impl<K: Clone + PartialEq> ExpansionState<K> {
    /// Create an empty state with the given policy.
    pub fn new(policy: ShowSelected) -> Self {
        Self {
            expanded: ExpandedSet::new(),
            policy,
            shown_once: false,
        }
    }

    /// Current expanded set.
    pub fn expanded(&self) -> &ExpandedSet<K> {
        &self.expanded
    }

    /// Active policy.
    pub fn policy(&self) -> ShowSelected {
        self.policy
    }

    /// Change the policy. Switching to [`ShowSelected::First`] re-arms it.
    pub fn set_policy(&mut self, policy: ShowSelected) {
        if policy != self.policy {
            self.shown_once = false;
        }
        self.policy = policy;
    }

    /// Handle an expander click; see [`toggle`] for the meaning of `force`.
    pub fn handle_expand_click(&mut self, id: &K, force: Option<bool>) {
        self.expanded.toggle(id, force);

        #[cfg(feature = "tracing")]
        tracing::trace!(?force, expanded = self.expanded.len(), "expander click");
    }

    /// React to the current selection according to the policy.
    ///
    /// Returns `true` when the expanded set was replaced. An empty selection
    /// never changes anything and does not consume the one-shot
    /// [`ShowSelected::First`] reconciliation.
    pub fn reconcile<T>(&mut self, store: &NodeStore<'_, K, T>, selected: &[K]) -> bool
    where
        K: Eq + Hash + Display,
    {
        if selected.is_empty() {
            return false;
        }
        match self.policy {
            ShowSelected::Never => return false,
            ShowSelected::First if self.shown_once => return false,
            ShowSelected::First | ShowSelected::Always => {}
        }
        self.shown_once = true;

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "tree_view.reconcile",
            selected = selected.len(),
            expanded = self.expanded.len()
        )
        .entered();

        let next = reconcile_expanded(store, selected, self.expanded.as_slice());
        let grew = next.iter().any(|id| !self.expanded.contains(id));
        if grew {
            self.expanded = ExpandedSet { ids: next };
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(grew, expanded = self.expanded.len(), "reconciled expansion");

        grew
    }
}
