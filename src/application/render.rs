//! Renders the outline tree into a nested list view.
//!
//! Every pass walks the whole tree and overwrites each node's `parent` link
//! with the node it was rendered under. Links are never patched by tree
//! mutations; they are only ever as fresh as the last render.

use termtree::Tree;
use tracing::{instrument, trace};

use crate::domain::{KeyContext, NodeId, OutlineArena, Siblings};

/// One rendered node: its input line plus an optional nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem {
    pub value: String,
    /// Binding used when a key is pressed on this item
    pub context: KeyContext,
    pub children: Option<ViewList>,
}

impl ViewItem {
    pub fn node(&self) -> NodeId {
        self.context.node
    }
}

/// A rendered sibling sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewList {
    pub items: Vec<ViewItem>,
}

/// A view item flattened to a display line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLine<'a> {
    pub depth: usize,
    pub node: NodeId,
    pub value: &'a str,
}

impl ViewList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines in document order with their nesting depth (roots at 0).
    pub fn lines(&self) -> Vec<ViewLine<'_>> {
        let mut lines = Vec::new();
        self.collect_lines(0, &mut lines);
        lines
    }

    fn collect_lines<'a>(&'a self, depth: usize, lines: &mut Vec<ViewLine<'a>>) {
        for item in &self.items {
            lines.push(ViewLine {
                depth,
                node: item.node(),
                value: &item.value,
            });
            if let Some(children) = &item.children {
                children.collect_lines(depth + 1, lines);
            }
        }
    }

    /// Finds the binding captured for `node` in this view.
    pub fn context_of(&self, node: NodeId) -> Option<KeyContext> {
        self.items.iter().find_map(|item| {
            if item.node() == node {
                Some(item.context)
            } else {
                item.children.as_ref().and_then(|c| c.context_of(node))
            }
        })
    }

    /// Converts the view to a printable tree under `label`.
    pub fn to_tree(&self, label: &str) -> Tree<String> {
        Tree::new(label.to_string()).with_leaves(self.items.iter().map(ViewItem::to_tree))
    }
}

impl ViewItem {
    fn to_tree(&self) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .flat_map(|list| list.items.iter().map(ViewItem::to_tree))
            .collect();
        Tree::new(self.value.clone()).with_leaves(leaves)
    }
}

/// Renders the whole outline starting at the root list.
#[instrument(level = "debug", skip(tree))]
pub fn render(tree: &mut OutlineArena) -> ViewList {
    let roots = tree.roots().to_vec();
    render_tree(tree, &roots, None)
}

/// Renders `nodes` as the children of `parent` (None for the root list).
pub fn render_tree(tree: &mut OutlineArena, nodes: &[NodeId], parent: Option<NodeId>) -> ViewList {
    let siblings = match parent {
        Some(owner) => Siblings::Children(owner),
        None => Siblings::Roots,
    };
    let mut items = Vec::with_capacity(nodes.len());
    for (index, &node_idx) in nodes.iter().enumerate() {
        let Some(node) = tree.get_node_mut(node_idx) else {
            continue;
        };
        node.parent = parent;
        let value = node.data.value.clone();
        let children = node.children.clone();

        let children = if children.is_empty() {
            None
        } else {
            Some(render_tree(tree, &children, Some(node_idx)))
        };
        items.push(ViewItem {
            value,
            context: KeyContext {
                node: node_idx,
                index,
                siblings,
            },
            children,
        });
    }
    ViewList { items }
}

/// Runs the post-render hook of every rendered item.
///
/// An item whose node carries the focus flag takes focus and clears the flag.
/// Hooks run in render order, so the last flagged node wins.
pub fn run_post_render_hooks(tree: &mut OutlineArena, view: &ViewList) -> Option<NodeId> {
    let mut focused = None;
    for line in view.lines() {
        if let Some(node) = tree.get_node_mut(line.node) {
            if node.focus {
                node.focus = false;
                trace!(node = ?line.node, "post-render focus");
                focused = Some(line.node);
            }
        }
    }
    focused
}
