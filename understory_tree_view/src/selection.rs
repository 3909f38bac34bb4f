// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection gestures and the payloads they emit.
//!
//! ## Dispatch
//!
//! The selection itself is owned by the host. A tree view only reports what a
//! gesture asks for:
//!
//! - In [`SelectionMode::Single`], a click on a node emits [`Selection::One`]
//!   and the host replaces its whole selection with that id.
//! - In [`SelectionMode::Checkbox`], toggling a node's checkbox emits
//!   [`Selection::Group`] holding the node followed by all of its descendants.
//!   Whether the group is added or removed depends on whether the clicked node
//!   was already selected.
//!
//! [`apply_selection`] implements that host-side update so that hosts which do
//! not need anything special can use it directly.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::store::NodeStore;

/// How selection gestures are interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// One node at a time; a click replaces the selection.
    #[default]
    Single,
    /// Checkboxes; toggling a node toggles its whole subtree.
    Checkbox,
}

/// Payload of a selection gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection<K> {
    /// A single id (single-select click).
    One(K),
    /// The clicked id followed by its descendants (checkbox toggle).
    Group(Vec<K>),
}

impl<K> Selection<K> {
    /// The node the gesture was performed on.
    pub fn target(&self) -> Option<&K> {
        match self {
            Self::One(id) => Some(id),
            Self::Group(ids) => ids.first(),
        }
    }

    /// All ids carried by the payload.
    pub fn ids(&self) -> &[K] {
        match self {
            Self::One(id) => core::slice::from_ref(id),
            Self::Group(ids) => ids,
        }
    }

    /// Convert into a list of ids.
    pub fn into_vec(self) -> Vec<K> {
        match self {
            Self::One(id) => alloc::vec![id],
            Self::Group(ids) => ids,
        }
    }
}

impl<K> From<K> for Selection<K> {
    fn from(id: K) -> Self {
        Self::One(id)
    }
}

/// Build the payload for a selection gesture on `id`.
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, NodeStore, Selection, SelectionMode, select_gesture};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root("X", "Ex", ()),
///     Node::child("Y", "X", "Why?", ()),
/// ];
/// let store = NodeStore::new(&nodes);
///
/// let x = Identifier::from("X");
/// assert_eq!(select_gesture(SelectionMode::Single, &x, &store), Selection::One(x.clone()));
/// assert_eq!(
///     select_gesture(SelectionMode::Checkbox, &x, &store),
///     Selection::Group(vec![x.clone(), Identifier::from("Y")]),
/// );
/// ```
pub fn select_gesture<K, T>(
    mode: SelectionMode,
    id: &K,
    store: &NodeStore<'_, K, T>,
) -> Selection<K>
where
    K: Clone + Eq + Hash,
{
    match mode {
        SelectionMode::Single => Selection::One(id.clone()),
        SelectionMode::Checkbox => Selection::Group(store.descendant_ids(id)),
    }
}

/// Apply a gesture payload to the host's current selection.
///
/// - [`Selection::One`] replaces the selection.
/// - [`Selection::Group`] removes every group id when its first id is currently
///   selected, and otherwise appends the group ids that are missing, in group
///   order.
///
/// The input is never modified.
pub fn apply_selection<K: Clone + PartialEq>(current: &[K], payload: &Selection<K>) -> Vec<K> {
    match payload {
        Selection::One(id) => alloc::vec![id.clone()],
        Selection::Group(ids) => {
            let Some(head) = ids.first() else {
                return current.to_vec();
            };
            if current.contains(head) {
                current
                    .iter()
                    .filter(|k| !ids.contains(k))
                    .cloned()
                    .collect()
            } else {
                let mut next = current.to_vec();
                for id in ids {
                    if !next.contains(id) {
                        next.push(id.clone());
                    }
                }
                next
            }
        }
    }
}
