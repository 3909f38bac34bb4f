// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree view state driven by a small in-memory host.
//!
//! This example walks through:
//! - revealing a deep selection by reconciling the expanded set,
//! - checkbox selection with tri-state rollup,
//! - the context menu and an add-child / rename / remove round trip against a
//!   host-side [`NodePersistence`].
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example tree_view_walkthrough`

use std::future::{Future, ready};

use tracing_subscriber::EnvFilter;
use understory_tree_view::{
    Capabilities, EditOutcome, EditPermissions, EditSession, Identifier, Node, NodePersistence,
    NodeUpdate, SelectionMode, ShowSelected, TreeView, TreeViewConfig, TreeViewContext,
    apply_selection,
};

/// Host that owns the node list and applies persisted edits to it.
struct Host {
    nodes: Vec<Node<Identifier, i32>>,
    next_id: i64,
}

impl Host {
    fn new() -> Self {
        Self {
            nodes: vec![
                Node::root(0, "Root", 0),
                Node::child("A", 0, "A", 3),
                Node::child("B", "A", "Be", 9),
                Node::root("X", "Ex", 16),
                Node::child("Y", "X", "Why?", 18),
                Node::child("Z", "X", "Zed", -23),
                Node::child(1, 0, "One", 0),
                Node::child(2, 1, "One.Two", 32),
                Node::child(3, 1, "One.Three", 12),
                Node::child(4, 1, "One.Four", -1),
            ],
            next_id: 100,
        }
    }

    fn position(&self, id: &Identifier) -> Option<usize> {
        self.nodes.iter().position(|n| &n.id == id)
    }
}

impl NodePersistence<Identifier> for Host {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn add_child(&mut self, parent: Identifier, label: String) -> impl Future<Output = NodeUpdate> {
        let update = if label.trim().is_empty() {
            NodeUpdate::failed("Label must not be empty")
        } else {
            let id = Identifier::Int(self.next_id);
            self.next_id += 1;
            tracing::info!(%id, %parent, %label, "host: child added");
            self.nodes.push(Node::child(id, parent, label, 0));
            NodeUpdate::ok()
        };
        ready(update)
    }

    fn rename(&mut self, id: Identifier, label: String) -> impl Future<Output = NodeUpdate> {
        let update = match self.position(&id) {
            Some(i) => {
                tracing::info!(%id, %label, "host: node renamed");
                self.nodes[i].label = label;
                NodeUpdate::ok()
            }
            None => NodeUpdate::failed(format!("{id} no longer exists")),
        };
        ready(update)
    }

    fn remove(&mut self, id: Identifier) -> impl Future<Output = NodeUpdate> {
        let update = match self.position(&id) {
            Some(i) => {
                tracing::info!(%id, "host: node removed");
                self.nodes.remove(i);
                NodeUpdate::ok()
            }
            // No text: the session falls back to its default message.
            None => NodeUpdate::default(),
        };
        ready(update)
    }
}

fn print_rows(title: &str, ctx: &TreeViewContext<'_, Identifier, i32>) {
    println!("{title}");
    for row in ctx.visible_rows() {
        let marker = match (row.has_children, row.expanded) {
            (false, _) => ' ',
            (true, true) => 'v',
            (true, false) => '>',
        };
        let check = match row.check {
            Some(c) if c.indeterminate => "[-] ",
            Some(c) if c.checked => "[x] ",
            Some(_) => "[ ] ",
            None if row.selected => "*   ",
            None => "    ",
        };
        println!(
            "  {}{marker} {check}{} ({})",
            "  ".repeat(row.depth),
            row.node.label,
            row.node.data
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut host = Host::new();

    // Single selection: clicking "B" in a collapsed tree reveals it.
    let mut view = TreeView::new(TreeViewConfig::default());
    let payload = view.handle_select(&"B".into(), &host.nodes);
    let selected = apply_selection(&[], &payload);
    view.sync_selection(&host.nodes, &selected);
    print_rows(
        "single selection of B:",
        &view.context(&host.nodes, &selected, Capabilities::empty()),
    );

    // Checkbox selection with a one-shot reveal.
    let mut checks = TreeView::new(
        TreeViewConfig::new()
            .with_selection_mode(SelectionMode::Checkbox)
            .with_show_selected(ShowSelected::First),
    );
    let mut selected: Vec<Identifier> = Vec::new();
    for id in [Identifier::from(1), Identifier::from("Z")] {
        let payload = checks.handle_select(&id, &host.nodes);
        selected = apply_selection(&selected, &payload);
        checks.sync_selection(&host.nodes, &selected);
    }
    print_rows(
        "checkbox selection of 1 and Z (only the first reveal expands):",
        &checks.context(&host.nodes, &selected, Capabilities::empty()),
    );

    // Editing.
    let mut editor = TreeView::new(TreeViewConfig::new().with_permissions(
        EditPermissions::ADD_CHILDREN
            | EditPermissions::RENAME_CHILDREN
            | EditPermissions::REMOVE_CHILDREN,
    ));
    let caps = host.capabilities();

    for id in [
        Identifier::from(0),
        Identifier::from("A"),
        Identifier::from("B"),
    ] {
        let actions = editor
            .context(&host.nodes, &[], caps)
            .menu_actions(&id);
        println!("menu for {id}: {actions:?}");
    }

    let mut session = EditSession::new(Identifier::from("B"));
    if let Err(err) = editor.begin_add_child(&mut session, &host.nodes, caps) {
        println!("cannot add under B: {err}");
        return;
    }
    let request = match session.commit("   ") {
        Ok(request) => request,
        Err(err) => {
            println!("commit failed: {err}");
            return;
        }
    };
    let update = pollster::block_on(request.send(&mut host));
    if let Ok(EditOutcome::Failure(message)) = session.finish(update) {
        println!("add child rejected: {message}");
    }

    let actions = editor
        .context(&host.nodes, &[], caps)
        .menu_actions(session.node());
    if session.begin_add_child(actions).is_ok()
        && let Ok(request) = session.commit("Bee's child")
    {
        let update = pollster::block_on(request.send(&mut host));
        println!("add child: {:?}", session.finish(update));
    }

    let mut rename = EditSession::new(Identifier::from("A"));
    let actions = editor
        .context(&host.nodes, &[], caps)
        .menu_actions(rename.node());
    if rename.begin_rename(actions).is_ok()
        && let Ok(request) = rename.commit("Alpha")
    {
        let update = pollster::block_on(request.send(&mut host));
        println!("rename: {:?}", rename.finish(update));
    }

    let mut remove = EditSession::new(Identifier::from(4));
    let actions = editor
        .context(&host.nodes, &[], caps)
        .menu_actions(remove.node());
    if let Ok(request) = remove.request_remove(actions) {
        let update = pollster::block_on(request.send(&mut host));
        println!("remove 4: {:?}", remove.finish(update));
    }

    editor.handle_expand_click(&Identifier::from(0), Some(true));
    editor.handle_expand_click(&Identifier::from("A"), Some(true));
    editor.handle_expand_click(&Identifier::from(1), Some(true));
    print_rows("after editing:", &editor.context(&host.nodes, &[], caps));
}
