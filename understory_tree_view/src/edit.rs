// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rename, add-child, and remove workflows.
//!
//! ## Overview
//!
//! Persisting an edit is the host's job. [`EditRequest::send`] hands a request
//! to the matching callback of a [`NodePersistence`] implementation, which
//! resolves to a [`NodeUpdate`]. The host applies a successful change to its
//! own node list and renders again with the new snapshot.
//!
//! This module tracks the per-node side of that exchange with an
//! [`EditSession`]:
//!
//! ```text
//! Idle ──begin_rename──▶ Renaming ──commit──▶ saving ──finish──▶ Idle
//!  │                        │                   ▲
//!  ├──begin_add_child──▶ AddingChild ──commit───┘
//!  │                        │
//!  │     cancel ◀───────────┘  (no request, nothing else changes)
//!  └──request_remove─────────────────────────▶ saving
//! ```
//!
//! Sessions only build requests and consume results; awaiting the callback is
//! left to the host.
//!
//! ## Example
//!
//! ```rust
//! use understory_tree_view::{EditOutcome, EditRequest, EditSession, MenuActions, NodeUpdate};
//!
//! let mut session = EditSession::new("A");
//! session.begin_rename(MenuActions::RENAME).unwrap();
//! let request = session.commit("Alpha").unwrap();
//! assert_eq!(request, EditRequest::Rename { id: "A", label: "Alpha".into() });
//!
//! // ...the host awaits its persistence callback and reports back:
//! let outcome = session.finish(NodeUpdate::failed("")).unwrap();
//! assert_eq!(outcome, EditOutcome::Failure("An unknown error has occured".into()));
//! assert_eq!(session.error_text(), Some("An unknown error has occured"));
//! ```

use alloc::string::String;
use core::fmt;
use core::future::Future;

use crate::context::{Capabilities, MenuActions};

/// Message shown when a failed update carries no text of its own.
pub const UNKNOWN_ERROR_TEXT: &str = "An unknown error has occured";

/// Result of a persistence callback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeUpdate {
    /// Whether the change was persisted.
    pub success: bool,
    /// Optional message to show on failure.
    pub error_text: Option<String>,
}

impl NodeUpdate {
    /// A successful update.
    pub fn ok() -> Self {
        Self {
            success: true,
            error_text: None,
        }
    }

    /// A failed update with a message.
    pub fn failed(text: impl Into<String>) -> Self {
        Self {
            success: false,
            error_text: Some(text.into()),
        }
    }

    /// Message to display for a failed update.
    ///
    /// `None` on success. Falls back to [`UNKNOWN_ERROR_TEXT`] when the update
    /// has no text or an empty one.
    pub fn failure_message(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        Some(
            self.error_text
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNKNOWN_ERROR_TEXT),
        )
    }
}

/// Kind of edit operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Insert a new child.
    AddChild,
    /// Relabel a node.
    Rename,
    /// Delete a node.
    Remove,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AddChild => "add child",
            Self::Rename => "rename",
            Self::Remove => "remove",
        })
    }
}

impl EditKind {
    /// The persistence capability this operation needs.
    pub const fn capability(self) -> Capabilities {
        match self {
            Self::AddChild => Capabilities::ADD_CHILD,
            Self::Rename => Capabilities::RENAME,
            Self::Remove => Capabilities::REMOVE,
        }
    }

    /// The menu entry that offers this operation.
    pub const fn menu_action(self) -> MenuActions {
        match self {
            Self::AddChild => MenuActions::ADD,
            Self::Rename => MenuActions::RENAME,
            Self::Remove => MenuActions::DELETE,
        }
    }
}

/// A change for the host to persist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditRequest<K> {
    /// Insert a child labelled `label` under `parent`.
    AddChild {
        /// Parent of the new node.
        parent: K,
        /// Label entered for the new node.
        label: String,
    },
    /// Relabel `id`.
    Rename {
        /// Node to relabel.
        id: K,
        /// New label.
        label: String,
    },
    /// Delete `id`.
    Remove {
        /// Node to delete.
        id: K,
    },
}

impl<K> EditRequest<K> {
    /// The operation requested.
    pub fn kind(&self) -> EditKind {
        match self {
            Self::AddChild { .. } => EditKind::AddChild,
            Self::Rename { .. } => EditKind::Rename,
            Self::Remove { .. } => EditKind::Remove,
        }
    }

    /// The node the request was made on.
    pub fn target(&self) -> &K {
        match self {
            Self::AddChild { parent, .. } => parent,
            Self::Rename { id, .. } | Self::Remove { id } => id,
        }
    }
}

/// Host-side persistence callbacks.
///
/// Each operation is optional: only those listed in
/// [`NodePersistence::capabilities`] are offered to the user, and the default
/// bodies of the others resolve to a failed [`NodeUpdate`]. Failures resolve to
/// an unsuccessful update rather than an error so they can be shown inline on
/// the node.
pub trait NodePersistence<K> {
    /// Operations this host can persist.
    fn capabilities(&self) -> Capabilities;

    /// Insert a child labelled `label` under `parent`.
    fn add_child(&mut self, parent: K, label: String) -> impl Future<Output = NodeUpdate> {
        let _ = (parent, label);
        core::future::ready(NodeUpdate::default())
    }

    /// Relabel `id`.
    fn rename(&mut self, id: K, label: String) -> impl Future<Output = NodeUpdate> {
        let _ = (id, label);
        core::future::ready(NodeUpdate::default())
    }

    /// Delete `id`.
    fn remove(&mut self, id: K) -> impl Future<Output = NodeUpdate> {
        let _ = id;
        core::future::ready(NodeUpdate::default())
    }
}

impl<K> EditRequest<K> {
    /// Hand the request to the matching persistence callback.
    pub async fn send<P: NodePersistence<K>>(self, persistence: &mut P) -> NodeUpdate {
        match self {
            Self::AddChild { parent, label } => persistence.add_child(parent, label).await,
            Self::Rename { id, label } => persistence.rename(id, label).await,
            Self::Remove { id } => persistence.remove(id).await,
        }
    }
}

/// [`NodePersistence`] for read-only trees.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReadOnly;

impl<K> NodePersistence<K> for ReadOnly {
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }
}

/// Per-node edit affordance, orthogonal to expansion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Not editing.
    #[default]
    Idle,
    /// Entering a new label for the node.
    Renaming,
    /// Entering the label of a new child.
    AddingChild,
}

/// How an edit ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The change was persisted.
    Success,
    /// The change failed; the message to display.
    Failure(String),
}

/// Misuse of an [`EditSession`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Another edit on this node is being entered or saved.
    #[error("an edit is already in progress for this node")]
    Busy,
    /// `commit` without an active rename or add-child.
    #[error("no rename or add-child is being entered")]
    NotEditing,
    /// `finish` without a request in flight.
    #[error("no request is awaiting a result")]
    NothingInFlight,
    /// The operation is not offered for this node.
    #[error("{0} is not available for this node")]
    Unavailable(EditKind),
}

/// Edit state of one node.
#[derive(Clone, Debug)]
pub struct EditSession<K> {
    node: K,
    mode: EditMode,
    in_flight: Option<EditKind>,
    error_text: Option<String>,
}

impl<K: Clone> EditSession<K> {
    /// Create an idle session for `node`.
    pub fn new(node: K) -> Self {
        Self {
            node,
            mode: EditMode::Idle,
            in_flight: None,
            error_text: None,
        }
    }

    /// The node this session edits.
    pub fn node(&self) -> &K {
        &self.node
    }

    /// Current edit mode.
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// The operation awaiting a [`NodeUpdate`], if any.
    pub fn in_flight(&self) -> Option<EditKind> {
        self.in_flight
    }

    /// Returns `true` while a request is being persisted.
    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Message of the last failed update, cleared by the next success.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    fn begin(&mut self, kind: EditKind, available: MenuActions) -> Result<(), EditError> {
        if self.mode != EditMode::Idle || self.in_flight.is_some() {
            return Err(EditError::Busy);
        }
        if !available.contains(kind.menu_action()) {
            return Err(EditError::Unavailable(kind));
        }
        Ok(())
    }

    /// Start renaming. `available` is the node's current menu.
    pub fn begin_rename(&mut self, available: MenuActions) -> Result<(), EditError> {
        self.begin(EditKind::Rename, available)?;
        self.mode = EditMode::Renaming;

        #[cfg(feature = "tracing")]
        tracing::debug!("begin rename");

        Ok(())
    }

    /// Start entering a new child. `available` is the node's current menu.
    ///
    /// Hosts should also force the node open; [`TreeView::begin_add_child`]
    /// does both.
    ///
    /// [`TreeView::begin_add_child`]: crate::TreeView::begin_add_child
    pub fn begin_add_child(&mut self, available: MenuActions) -> Result<(), EditError> {
        self.begin(EditKind::AddChild, available)?;
        self.mode = EditMode::AddingChild;

        #[cfg(feature = "tracing")]
        tracing::debug!("begin add child");

        Ok(())
    }

    /// Abandon the label being entered.
    ///
    /// No request is produced. Returns `false` when there was nothing to
    /// cancel (idle, or already saving).
    pub fn cancel(&mut self) -> bool {
        if self.mode == EditMode::Idle || self.in_flight.is_some() {
            return false;
        }
        self.mode = EditMode::Idle;

        #[cfg(feature = "tracing")]
        tracing::debug!("edit cancelled");

        true
    }

    /// Confirm the entered label and produce the request to persist.
    pub fn commit(&mut self, label: impl Into<String>) -> Result<EditRequest<K>, EditError> {
        if self.in_flight.is_some() {
            return Err(EditError::Busy);
        }
        let label = label.into();
        let request = match self.mode {
            EditMode::Idle => return Err(EditError::NotEditing),
            EditMode::Renaming => EditRequest::Rename {
                id: self.node.clone(),
                label,
            },
            EditMode::AddingChild => EditRequest::AddChild {
                parent: self.node.clone(),
                label,
            },
        };
        self.in_flight = Some(request.kind());

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = %request.kind(), "edit committed");

        Ok(request)
    }

    /// Request removal of the node. `available` is the node's current menu.
    pub fn request_remove(&mut self, available: MenuActions) -> Result<EditRequest<K>, EditError> {
        self.begin(EditKind::Remove, available)?;
        self.in_flight = Some(EditKind::Remove);

        #[cfg(feature = "tracing")]
        tracing::debug!("remove requested");

        Ok(EditRequest::Remove {
            id: self.node.clone(),
        })
    }

    /// Record the result of the request in flight and return to idle.
    pub fn finish(&mut self, update: NodeUpdate) -> Result<EditOutcome, EditError> {
        #[cfg_attr(
            not(feature = "tracing"),
            expect(unused_variables, reason = "only read by the tracing event")
        )]
        let Some(kind) = self.in_flight.take() else {
            return Err(EditError::NothingInFlight);
        };
        self.mode = EditMode::Idle;
        let outcome = match update.failure_message() {
            None => {
                self.error_text = None;
                EditOutcome::Success
            }
            Some(message) => {
                let message = String::from(message);
                self.error_text = Some(message.clone());
                EditOutcome::Failure(message)
            }
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            kind = %kind,
            success = matches!(outcome, EditOutcome::Success),
            "edit finished"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::pin::Pin;
    use core::task::{Context, Poll};
    use pollster::block_on;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<EditRequest<u32>>,
        reply: NodeUpdate,
    }

    impl NodePersistence<u32> for Recorder {
        fn capabilities(&self) -> Capabilities {
            Capabilities::RENAME | Capabilities::REMOVE
        }

        fn rename(&mut self, id: u32, label: String) -> impl Future<Output = NodeUpdate> {
            self.seen.push(EditRequest::Rename { id, label });
            core::future::ready(self.reply.clone())
        }

        fn remove(&mut self, id: u32) -> impl Future<Output = NodeUpdate> {
            self.seen.push(EditRequest::Remove { id });
            core::future::ready(self.reply.clone())
        }
    }

    /// Resolves on its second poll, after waking its task once.
    struct YieldOnce {
        yielded: bool,
        reply: Option<NodeUpdate>,
    }

    impl Future for YieldOnce {
        type Output = NodeUpdate;

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<NodeUpdate> {
            if !self.yielded {
                self.yielded = true;
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            Poll::Ready(self.reply.take().unwrap_or_default())
        }
    }

    /// Host whose add-child callback completes asynchronously.
    struct SlowHost {
        added: Vec<(u32, String)>,
    }

    impl NodePersistence<u32> for SlowHost {
        fn capabilities(&self) -> Capabilities {
            Capabilities::ADD_CHILD
        }

        fn add_child(&mut self, parent: u32, label: String) -> impl Future<Output = NodeUpdate> {
            self.added.push((parent, label));
            YieldOnce {
                yielded: false,
                reply: Some(NodeUpdate::ok()),
            }
        }
    }

    #[test]
    fn rename_success_round_trip() {
        let mut host = Recorder {
            reply: NodeUpdate::ok(),
            ..Recorder::default()
        };
        let mut session = EditSession::new(7_u32);
        session.begin_rename(MenuActions::all()).unwrap();
        assert_eq!(session.mode(), EditMode::Renaming);

        let request = session.commit("Seven").unwrap();
        assert!(session.is_saving());
        let update = block_on(request.send(&mut host));
        assert_eq!(session.finish(update), Ok(EditOutcome::Success));
        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(
            host.seen,
            [EditRequest::Rename {
                id: 7,
                label: "Seven".into()
            }]
        );
    }

    #[test]
    fn add_child_failure_uses_error_text() {
        let mut session = EditSession::new(1_u32);
        session.begin_add_child(MenuActions::ADD).unwrap();
        let request = session.commit("child").unwrap();
        assert_eq!(request.kind(), EditKind::AddChild);
        assert_eq!(request.target(), &1);

        let outcome = session.finish(NodeUpdate::failed("disk full")).unwrap();
        assert_eq!(outcome, EditOutcome::Failure("disk full".into()));
        assert_eq!(session.error_text(), Some("disk full"));

        // A later success clears the message.
        session.begin_rename(MenuActions::RENAME).unwrap();
        session.commit("x").unwrap();
        session.finish(NodeUpdate::ok()).unwrap();
        assert_eq!(session.error_text(), None);
    }

    #[test]
    fn failure_without_text_uses_fallback() {
        let update = NodeUpdate {
            success: false,
            error_text: None,
        };
        assert_eq!(update.failure_message(), Some(UNKNOWN_ERROR_TEXT));
        assert_eq!(NodeUpdate::ok().failure_message(), None);
    }

    #[test]
    fn cancel_produces_no_request() {
        let mut session = EditSession::new(3_u32);
        assert!(!session.cancel());
        session.begin_add_child(MenuActions::ADD).unwrap();
        assert!(session.cancel());
        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(session.commit("late"), Err(EditError::NotEditing));
        assert_eq!(session.finish(NodeUpdate::ok()), Err(EditError::NothingInFlight));
        assert_eq!(session.error_text(), None);
    }

    #[test]
    fn unavailable_and_busy() {
        let mut session = EditSession::new(3_u32);
        assert_eq!(
            session.begin_rename(MenuActions::ADD),
            Err(EditError::Unavailable(EditKind::Rename))
        );
        assert_eq!(
            session.request_remove(MenuActions::empty()),
            Err(EditError::Unavailable(EditKind::Remove))
        );
        session.begin_rename(MenuActions::all()).unwrap();
        assert_eq!(session.begin_add_child(MenuActions::all()), Err(EditError::Busy));
        session.commit("x").unwrap();
        assert!(!session.cancel());
        assert_eq!(session.commit("y"), Err(EditError::Busy));
        assert_eq!(session.request_remove(MenuActions::all()), Err(EditError::Busy));
    }

    #[test]
    fn remove_round_trip() {
        let mut host = Recorder {
            reply: NodeUpdate::ok(),
            ..Recorder::default()
        };
        let mut session = EditSession::new(9_u32);
        let request = session.request_remove(MenuActions::DELETE).unwrap();
        let update = block_on(request.send(&mut host));
        assert_eq!(session.finish(update), Ok(EditOutcome::Success));
        assert_eq!(host.seen, [EditRequest::Remove { id: 9 }]);
    }

    #[test]
    fn unsupported_callback_fails_without_being_recorded() {
        let mut host = Recorder::default();
        let mut session = EditSession::new(2_u32);
        session.begin_add_child(MenuActions::ADD).unwrap();
        let request = session.commit("orphan").unwrap();
        let update = block_on(request.send(&mut host));
        assert_eq!(
            session.finish(update),
            Ok(EditOutcome::Failure(UNKNOWN_ERROR_TEXT.into()))
        );
        assert!(host.seen.is_empty());
    }

    #[test]
    fn pending_callback_resolves_after_wake() {
        let mut host = SlowHost { added: Vec::new() };
        let mut session = EditSession::new(5_u32);
        session.begin_add_child(MenuActions::ADD).unwrap();
        let request = session.commit("Later").unwrap();
        let update = block_on(request.send(&mut host));
        assert!(session.is_saving());
        assert_eq!(session.finish(update), Ok(EditOutcome::Success));
        assert_eq!(host.added, [(5, String::from("Later"))]);
        assert!(!session.is_saving());
    }

    #[test]
    fn read_only_offers_nothing() {
        let mut host = ReadOnly;
        assert!(NodePersistence::<u32>::capabilities(&host).is_empty());
        let update = block_on(EditRequest::Remove { id: 1_u32 }.send(&mut host));
        assert!(!update.success);
        assert_eq!(update.failure_message(), Some(UNKNOWN_ERROR_TEXT));
    }

    #[test]
    fn error_messages() {
        use alloc::string::ToString;
        assert_eq!(
            EditError::Unavailable(EditKind::AddChild).to_string(),
            "add child is not available for this node"
        );
    }
}
