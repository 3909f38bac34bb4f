// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-wide configuration and the per-render context value.
//!
//! ## Layering
//!
//! - [`TreeViewConfig`] holds the settings a host chooses once: selection mode,
//!   the [`ShowSelected`] policy, and which edit operations are permitted.
//! - [`TreeView`] is the state one tree instance owns across renders: its
//!   config and its [`ExpansionState`].
//! - [`TreeViewContext`] is built per render from the tree view plus the host's
//!   current node snapshot and selection. It is passed by reference to whatever
//!   needs tree-wide information (rows, menus, checkboxes); nothing is ambient.

use alloc::vec::Vec;
use core::fmt::Display;
use core::hash::Hash;

use hashbrown::HashSet;

use crate::edit::{EditError, EditKind, EditSession};
use crate::expansion::{ExpandedSet, ExpansionState, ShowSelected};
use crate::rollup::CheckState;
use crate::selection::{Selection, SelectionMode, select_gesture};
use crate::store::NodeStore;
use crate::types::Node;

bitflags::bitflags! {
    /// Edit operations the host permits, split by root and non-root nodes.
    ///
    /// All permissions are off by default.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EditPermissions: u8 {
        /// Root nodes may be renamed.
        const RENAME_ROOT     = 0b0000_0001;
        /// Root nodes may be removed.
        const REMOVE_ROOT     = 0b0000_0010;
        /// Any node may receive new children.
        const ADD_CHILDREN    = 0b0000_0100;
        /// Non-root nodes may be renamed.
        const RENAME_CHILDREN = 0b0000_1000;
        /// Non-root nodes may be removed.
        const REMOVE_CHILDREN = 0b0001_0000;
    }
}

bitflags::bitflags! {
    /// Persistence callbacks the host actually supplies.
    ///
    /// An operation is only offered when the matching capability is present,
    /// regardless of [`EditPermissions`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// An add-child callback is available.
        const ADD_CHILD = 0b001;
        /// A rename callback is available.
        const RENAME    = 0b010;
        /// A remove callback is available.
        const REMOVE    = 0b100;
    }
}

bitflags::bitflags! {
    /// Entries of a node's context menu.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MenuActions: u8 {
        /// "Add": start entering a new child.
        const ADD    = 0b001;
        /// "Rename": start renaming the node.
        const RENAME = 0b010;
        /// "Delete": remove the node.
        const DELETE = 0b100;
    }
}

/// Settings of one tree view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeViewConfig {
    /// How selection gestures are interpreted.
    pub selection_mode: SelectionMode,
    /// When the expanded set grows to reveal the selection.
    pub show_selected: ShowSelected,
    /// Which edit operations are permitted.
    pub permissions: EditPermissions,
}

impl TreeViewConfig {
    /// Default configuration: single selection, always reveal, no editing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selection mode.
    #[must_use]
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Set the reveal policy.
    #[must_use]
    pub fn with_show_selected(mut self, policy: ShowSelected) -> Self {
        self.show_selected = policy;
        self
    }

    /// Set the edit permissions.
    #[must_use]
    pub fn with_permissions(mut self, permissions: EditPermissions) -> Self {
        self.permissions = permissions;
        self
    }
}

/// One rendered row of a tree view.
#[derive(Clone, Debug)]
pub struct VisibleRow<'a, K, T> {
    /// The node shown on this row.
    pub node: &'a Node<K, T>,
    /// Nesting depth; roots are at 0.
    pub depth: usize,
    /// Whether the node's children are shown.
    pub expanded: bool,
    /// Whether the node has children (an expander is shown).
    pub has_children: bool,
    /// Whether the node is in the selection.
    pub selected: bool,
    /// Checkbox state, only in [`SelectionMode::Checkbox`].
    pub check: Option<CheckState>,
}

/// Read-only, per-render view of one tree.
pub struct TreeViewContext<'a, K, T> {
    store: NodeStore<'a, K, T>,
    roots: Option<&'a [K]>,
    selected: &'a [K],
    expanded: &'a ExpandedSet<K>,
    config: &'a TreeViewConfig,
    capabilities: Capabilities,
}

impl<K: core::fmt::Debug, T> core::fmt::Debug for TreeViewContext<'_, K, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeViewContext")
            .field("store", &self.store)
            .field("selected", &self.selected)
            .field("expanded", &self.expanded)
            .field("config", &self.config)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl<'a, K: Clone + Eq + Hash, T> TreeViewContext<'a, K, T> {
    /// Assemble a context from its parts.
    pub fn new(
        nodes: &'a [Node<K, T>],
        selected: &'a [K],
        expanded: &'a ExpandedSet<K>,
        config: &'a TreeViewConfig,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            store: NodeStore::new(nodes),
            roots: None,
            selected,
            expanded,
            config,
            capabilities,
        }
    }

    /// Render these ids as the top-level rows instead of the snapshot's roots.
    #[must_use]
    pub fn with_roots(mut self, roots: &'a [K]) -> Self {
        self.roots = Some(roots);
        self
    }

    /// The indexed node snapshot.
    pub fn store(&self) -> &NodeStore<'a, K, T> {
        &self.store
    }

    /// The host's current selection.
    pub fn selected(&self) -> &'a [K] {
        self.selected
    }

    /// The tree's expanded set.
    pub fn expanded(&self) -> &'a ExpandedSet<K> {
        self.expanded
    }

    /// Tree settings.
    pub fn config(&self) -> &'a TreeViewConfig {
        self.config
    }

    /// Supplied persistence callbacks.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Returns `true` if the children of `id` are shown.
    pub fn is_expanded(&self, id: &K) -> bool {
        self.expanded.contains(id)
    }

    /// Returns `true` if `id` is selected.
    pub fn is_selected(&self, id: &K) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` if `id` is rendered at the top level.
    pub fn is_root(&self, id: &K) -> bool {
        match self.roots {
            Some(roots) => roots.contains(id),
            None => self.store.is_root(id),
        }
    }

    /// Checkbox state of `id`.
    pub fn check_state(&self, id: &K) -> CheckState {
        self.store.check_state(id, self.selected)
    }

    /// Context menu entries offered for `id`.
    ///
    /// - Add: children may be added and an add-child callback exists.
    /// - Rename: renaming is permitted for this node's level and a rename
    ///   callback exists.
    /// - Delete: removal is permitted for this node's level, a remove callback
    ///   exists, and the node currently has no children.
    ///
    /// Unknown ids get no entries.
    pub fn menu_actions(&self, id: &K) -> MenuActions {
        let mut actions = MenuActions::empty();
        if !self.store.contains(id) {
            return actions;
        }
        let permissions = self.config.permissions;
        let caps = self.capabilities;
        let (rename, remove) = if self.is_root(id) {
            (EditPermissions::RENAME_ROOT, EditPermissions::REMOVE_ROOT)
        } else {
            (EditPermissions::RENAME_CHILDREN, EditPermissions::REMOVE_CHILDREN)
        };

        let add = permissions.contains(EditPermissions::ADD_CHILDREN);
        let leaf = !self.store.has_children(id);
        for (kind, permitted) in [
            (EditKind::AddChild, add),
            (EditKind::Rename, permissions.contains(rename)),
            (EditKind::Remove, permissions.contains(remove) && leaf),
        ] {
            if permitted && caps.contains(kind.capability()) {
                actions |= kind.menu_action();
            }
        }
        actions
    }

    /// Explicit root ids that are not in the snapshot yet.
    ///
    /// [`visible_rows`](Self::visible_rows) skips these. Hosts typically show a
    /// loading placeholder for them while an insert is still being persisted.
    pub fn pending_roots(&self) -> impl Iterator<Item = &'a K> + '_ {
        self.roots
            .unwrap_or_default()
            .iter()
            .filter(|id| !self.store.contains(id))
    }

    /// Rows to render, in depth-first pre-order.
    ///
    /// Starts from the explicit roots (or the snapshot's roots) and descends
    /// only into expanded nodes. Ids that are not in the snapshot are skipped
    /// (see [`pending_roots`](Self::pending_roots)), and a node is never emitted
    /// twice even if parent links are cyclic.
    pub fn visible_rows(&self) -> Vec<VisibleRow<'a, K, T>> {
        let mut stack: Vec<(&'a Node<K, T>, usize)> = match self.roots {
            Some(roots) => roots
                .iter()
                .rev()
                .filter_map(|id| self.store.get(id))
                .map(|n| (n, 0))
                .collect(),
            None => {
                let mut roots: Vec<_> = self.store.roots().map(|n| (n, 0)).collect();
                roots.reverse();
                roots
            }
        };
        let checkbox = self.config.selection_mode == SelectionMode::Checkbox;
        let mut emitted: HashSet<&'a K> = HashSet::new();
        let mut rows = Vec::new();

        while let Some((node, depth)) = stack.pop() {
            if !emitted.insert(&node.id) {
                continue;
            }
            let expanded = self.is_expanded(&node.id);
            let has_children = self.store.has_children(&node.id);
            rows.push(VisibleRow {
                node,
                depth,
                expanded,
                has_children,
                selected: self.is_selected(&node.id),
                check: checkbox.then(|| self.check_state(&node.id)),
            });
            if expanded && has_children {
                let children: Vec<_> = self.store.children_of(&node.id).collect();
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }
        rows
    }
}

/// State owned by one tree view instance across renders.
///
/// ## Example
///
/// ```rust
/// use understory_tree_view::{Identifier, Node, TreeView, TreeViewConfig};
///
/// let nodes: Vec<Node<Identifier, ()>> = vec![
///     Node::root(0, "Root", ()),
///     Node::child("A", 0, "A", ()),
///     Node::child("B", "A", "Be", ()),
/// ];
/// let mut view = TreeView::new(TreeViewConfig::default());
///
/// // The host selected B; the view reveals it.
/// let selected = vec![Identifier::from("B")];
/// assert!(view.sync_selection(&nodes, &selected));
/// assert_eq!(view.expanded().as_slice(), &[Identifier::from(0), Identifier::from("A")]);
///
/// // Collapsing the root hides everything below it.
/// view.handle_expand_click(&Identifier::from(0), None);
/// assert!(!view.expanded().contains(&Identifier::from(0)));
/// ```
#[derive(Clone, Debug)]
pub struct TreeView<K> {
    config: TreeViewConfig,
    expansion: ExpansionState<K>,
}

impl<K: Clone + Eq + Hash> TreeView<K> {
    /// Create a tree view with nothing expanded.
    pub fn new(config: TreeViewConfig) -> Self {
        let expansion = ExpansionState::new(config.show_selected);
        Self { config, expansion }
    }

    /// Current settings.
    pub fn config(&self) -> &TreeViewConfig {
        &self.config
    }

    /// Replace the settings. A changed reveal policy is re-armed.
    pub fn set_config(&mut self, config: TreeViewConfig) {
        self.expansion.set_policy(config.show_selected);
        self.config = config;
    }

    /// Current expanded set.
    pub fn expanded(&self) -> &ExpandedSet<K> {
        self.expansion.expanded()
    }

    /// Expander click on `id`; `force` as in [`toggle`](crate::toggle).
    pub fn handle_expand_click(&mut self, id: &K, force: Option<bool>) {
        self.expansion.handle_expand_click(id, force);
    }

    /// Selection gesture on `id`, producing the payload for the host.
    pub fn handle_select<T>(&self, id: &K, nodes: &[Node<K, T>]) -> Selection<K> {
        select_gesture(self.config.selection_mode, id, &NodeStore::new(nodes))
    }

    /// Reveal the host's selection according to the reveal policy.
    ///
    /// Returns `true` when the expanded set changed.
    pub fn sync_selection<T>(&mut self, nodes: &[Node<K, T>], selected: &[K]) -> bool
    where
        K: Display,
    {
        self.expansion.reconcile(&NodeStore::new(nodes), selected)
    }

    /// Start entering a new child under the session's node.
    ///
    /// On success the node is forced open so the entry row is visible.
    pub fn begin_add_child<T>(
        &mut self,
        session: &mut EditSession<K>,
        nodes: &[Node<K, T>],
        capabilities: Capabilities,
    ) -> Result<(), EditError> {
        let actions = self
            .context(nodes, &[], capabilities)
            .menu_actions(session.node());
        session.begin_add_child(actions)?;
        self.expansion.handle_expand_click(session.node(), Some(true));
        Ok(())
    }

    /// Build the per-render context.
    pub fn context<'a, T>(
        &'a self,
        nodes: &'a [Node<K, T>],
        selected: &'a [K],
        capabilities: Capabilities,
    ) -> TreeViewContext<'a, K, T> {
        TreeViewContext::new(
            nodes,
            selected,
            self.expansion.expanded(),
            &self.config,
            capabilities,
        )
    }
}
