// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tri-state checkbox rollup.

use alloc::vec::Vec;
use core::hash::Hash;

use crate::store::NodeStore;

/// Visual state of a node's checkbox.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CheckState {
    /// The node itself is selected.
    pub checked: bool,
    /// The node is not selected, but at least one descendant is.
    pub indeterminate: bool,
}

impl CheckState {
    /// Neither checked nor indeterminate.
    pub const UNCHECKED: Self = Self {
        checked: false,
        indeterminate: false,
    };
    /// Checked.
    pub const CHECKED: Self = Self {
        checked: true,
        indeterminate: false,
    };
    /// Partially selected subtree.
    pub const INDETERMINATE: Self = Self {
        checked: false,
        indeterminate: true,
    };
}

/// Derive the checkbox state of `id`.
///
/// `descendants` may include `id` itself (as returned by
/// [`resolve_descendant_ids`](crate::resolve_descendant_ids)); it is ignored
/// for the indeterminate test.
///
/// ```rust
/// use understory_tree_view::{CheckState, rollup_state};
///
/// assert_eq!(rollup_state(&1, &[2, 3, 4], &[4]), CheckState::INDETERMINATE);
/// assert_eq!(rollup_state(&1, &[2, 3, 4], &[1]), CheckState::CHECKED);
/// assert_eq!(rollup_state(&1, &[2, 3, 4], &[]), CheckState::UNCHECKED);
/// ```
pub fn rollup_state<K: PartialEq>(id: &K, descendants: &[K], selected: &[K]) -> CheckState {
    if selected.contains(id) {
        CheckState::CHECKED
    } else if descendants.iter().any(|d| d != id && selected.contains(d)) {
        CheckState::INDETERMINATE
    } else {
        CheckState::UNCHECKED
    }
}

impl<K: Clone + Eq + Hash, T> NodeStore<'_, K, T> {
    /// Checkbox state of `id` for the given selection.
    pub fn check_state(&self, id: &K, selected: &[K]) -> CheckState {
        if selected.contains(id) {
            return CheckState::CHECKED;
        }
        let descendants: Vec<K> = self.descendant_ids(id);
        rollup_state(id, &descendants, selected)
    }
}
