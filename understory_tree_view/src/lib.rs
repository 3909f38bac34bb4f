// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tree_view --heading-base-level=0

//! Understory Tree View: headless state for tree-of-nodes widgets.
//!
//! This crate computes the view state behind an expandable, selectable tree of
//! labelled nodes. It does not render anything. The host owns the node list and
//! the selection, hands a fresh snapshot to this crate on every render, and gets
//! back what to show.
//!
//! - Nodes are a flat list with parent links ([`Node`]). The list is supplied by
//!   the host and may be inconsistent: unknown ids, dangling or self parents,
//!   and cycles are all tolerated and never cause errors or non-termination.
//! - [`NodeStore`] indexes one snapshot.
//! - [`resolve_ancestors`] and [`resolve_descendant_ids`] walk the hierarchy up
//!   and down.
//! - [`reconcile_expanded`] grows an expanded set so the selection is visible;
//!   [`toggle`] handles expander clicks.
//! - [`rollup_state`] derives tri-state checkbox visuals.
//! - [`select_gesture`] and [`apply_selection`] turn clicks into selection
//!   payloads.
//! - [`TreeView`] / [`TreeViewContext`] bundle these for one tree instance.
//! - [`EditSession`] tracks rename / add-child / remove against a
//!   host-supplied [`NodePersistence`].
//!
//! ## Where this fits
//!
//! In the widget / box / render tree split used across Understory, this crate is
//! widget-tree state: it decides *which* rows exist and how they look
//! (expanded, selected, checked). Laying those rows out and hit testing them is
//! left to the host.
//!
//! ## Example
//!
//! ```rust
//! use understory_tree_view::{
//!     Capabilities, Identifier, Node, SelectionMode, TreeView, TreeViewConfig, apply_selection,
//! };
//!
//! let nodes: Vec<Node<Identifier, u32>> = vec![
//!     Node::root(0, "Root", 0),
//!     Node::child("A", 0, "A", 3),
//!     Node::child("B", "A", "Be", 9),
//!     Node::child(1, 0, "One", 1),
//! ];
//!
//! let config = TreeViewConfig::new().with_selection_mode(SelectionMode::Checkbox);
//! let mut view = TreeView::new(config);
//!
//! // Ticking "A" selects its whole subtree...
//! let payload = view.handle_select(&"A".into(), &nodes);
//! let selected = apply_selection(&[], &payload);
//! assert_eq!(selected, vec![Identifier::from("A"), Identifier::from("B")]);
//!
//! // ...and the view expands whatever is needed to show it.
//! assert!(view.sync_selection(&nodes, &selected));
//!
//! let ctx = view.context(&nodes, &selected, Capabilities::empty());
//! let labels: Vec<_> = ctx.visible_rows().iter().map(|r| r.node.label.as_str()).collect();
//! assert_eq!(labels, ["Root", "A", "Be", "One"]);
//! assert!(ctx.check_state(&0.into()).indeterminate);
//! ```
//!
//! ## Identifiers
//!
//! All algorithms are generic over the key type `K`. [`Identifier`] is provided
//! for hosts that mix integer and string keys. Ids are expected to be unique
//! within a snapshot; this is the host's responsibility and is not validated
//! (lookups resolve to the first occurrence).
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` events and spans from resolvers, reconciliation,
//!   and edit sessions.
//! - `serde`: derive `Serialize`/`Deserialize` for [`Identifier`] and the
//!   configuration types.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
macro_rules! keys {
    ($($id:expr),* $(,)?) => {
        alloc::vec![$($crate::Identifier::from($id)),*]
    };
}

mod ancestors;
mod context;
mod descendants;
mod edit;
mod expansion;
mod rollup;
mod selection;
mod store;
mod types;

pub use ancestors::resolve_ancestors;
pub use context::{
    Capabilities, EditPermissions, MenuActions, TreeView, TreeViewConfig, TreeViewContext,
    VisibleRow,
};
pub use descendants::resolve_descendant_ids;
pub use edit::{
    EditError, EditKind, EditMode, EditOutcome, EditRequest, EditSession, NodePersistence,
    NodeUpdate, ReadOnly, UNKNOWN_ERROR_TEXT,
};
pub use expansion::{ExpandedSet, ExpansionState, ShowSelected, reconcile_expanded, toggle};
pub use rollup::{CheckState, rollup_state};
pub use selection::{Selection, SelectionMode, apply_selection, select_gesture};
pub use store::NodeStore;
pub use types::{Identifier, Node};
