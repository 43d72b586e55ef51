//! Keyboard-driven outline editor.
//!
//! Owns the tree, the current focus and the frame queue. Keys pressed on the
//! focused node go through [`OutlineEditor::handle_keydown`]; whatever it does
//! not handle falls through to the node's text input.
//!
//! Structure keys:
//!
//! | Key       | Effect                                                        |
//! |-----------|---------------------------------------------------------------|
//! | Enter     | new empty sibling after the node, focused after render        |
//! | Tab       | node becomes last child of its previous sibling               |
//! | Backspace | on an empty node: remove it, refocus a neighbour next frame   |
//! | ArrowUp   | previous sibling, else parent                                 |
//! | ArrowDown | first child, else next sibling, else the parent's next sibling|

use tracing::{debug, instrument, trace};

use crate::application::error::ApplicationResult;
use crate::application::frame::{FrameQueue, FrameTask};
use crate::application::render::{self, ViewList};
use crate::application::text_input::{InputEffect, TextInput};
use crate::domain::{Key, KeyContext, KeyEvent, KeyOutcome, NodeId, OutlineArena, Siblings};

#[derive(Debug)]
pub struct OutlineEditor {
    tree: OutlineArena,
    view: ViewList,
    focused: Option<NodeId>,
    input: TextInput,
    frames: FrameQueue,
}

impl Default for OutlineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineEditor {
    /// Editor holding a single empty root that takes focus on first render.
    pub fn new() -> Self {
        let mut tree = OutlineArena::new();
        let root = tree.push_root("");
        if let Some(node) = tree.get_node_mut(root) {
            node.focus = true;
        }
        Self::with_tree(tree)
    }

    /// Editor over an existing tree. Nothing is focused until a render applies
    /// a focus flag or focus is set explicitly.
    pub fn with_tree(tree: OutlineArena) -> Self {
        Self {
            tree,
            view: ViewList::default(),
            focused: None,
            input: TextInput::default(),
            frames: FrameQueue::new(),
        }
    }

    pub fn tree(&self) -> &OutlineArena {
        &self.tree
    }

    /// View produced by the last render.
    pub fn view(&self) -> &ViewList {
        &self.view
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Caret of the focused node's input, in grapheme clusters.
    pub fn caret(&self) -> Option<(NodeId, usize)> {
        self.focused.map(|node| (node, self.input.caret()))
    }

    /// Terminal column of the caret within the focused node's value.
    pub fn caret_column(&self) -> Option<usize> {
        let node = self.focused?;
        let value = self.tree.value(node).ok()?;
        Some(self.input.display_column(value))
    }

    pub fn value(&self, node: NodeId) -> ApplicationResult<&str> {
        Ok(self.tree.value(node)?)
    }

    /// Replaces a node's value, as if the user had retyped its input.
    pub fn set_value(&mut self, node: NodeId, value: &str) -> ApplicationResult<()> {
        *self.tree.value_mut(node)? = value.to_string();
        if self.focused == Some(node) {
            self.input = TextInput::at_end(value);
        }
        Ok(())
    }

    /// Moves focus to `node` now. A node that no longer exists is skipped.
    pub fn focus(&mut self, node: NodeId) {
        match self.tree.value(node) {
            Ok(value) => {
                trace!(?node, "focus");
                self.input = TextInput::at_end(value);
                self.focused = Some(node);
            }
            Err(e) => debug!("focus skipped: {}", e),
        }
    }

    /// Renders the tree, runs post-render hooks, then the frame callbacks.
    #[instrument(level = "debug", skip(self))]
    pub fn render(&mut self) -> &ViewList {
        self.view = render::render(&mut self.tree);
        if let Some(node) = render::run_post_render_hooks(&mut self.tree, &self.view) {
            self.focus(node);
        }
        for task in self.frames.drain() {
            match task {
                FrameTask::Focus(node) => self.focus(node),
            }
        }
        &self.view
    }

    /// Dispatches a key to the focused node and renders when the tree changed.
    pub fn press(&mut self, event: impl Into<KeyEvent>) -> KeyOutcome {
        let outcome = self.key_down(&event.into());
        if outcome == KeyOutcome::Redraw {
            self.render();
        }
        outcome
    }

    /// Dispatches a key to the focused node without rendering.
    ///
    /// Keys the outline does not handle are applied to the focused input.
    #[instrument(level = "debug", skip(self))]
    pub fn key_down(&mut self, event: &KeyEvent) -> KeyOutcome {
        let Some(node) = self.focused else {
            return self.key_down_unfocused(event);
        };
        let Some(context) = self.view.context_of(node) else {
            debug!(?node, "focused node not in view");
            return KeyOutcome::Ignored;
        };
        let outcome = self.handle_keydown(event, context);
        if outcome.is_handled() {
            return outcome;
        }
        self.apply_text_input(node, event)
    }

    // Nothing left to focus once the last root is gone; Enter starts over.
    fn key_down_unfocused(&mut self, event: &KeyEvent) -> KeyOutcome {
        if event.key == Key::Enter && self.tree.is_empty() {
            debug!("seeding empty outline");
            let root = self.tree.push_root("");
            if let Some(node) = self.tree.get_node_mut(root) {
                node.focus = true;
            }
            return KeyOutcome::Redraw;
        }
        KeyOutcome::Ignored
    }

    fn apply_text_input(&mut self, node: NodeId, event: &KeyEvent) -> KeyOutcome {
        let value = match self.tree.value_mut(node) {
            Ok(value) => value,
            Err(e) => {
                debug!("input skipped: {}", e);
                return KeyOutcome::Ignored;
            }
        };
        match self.input.apply(value, event) {
            InputEffect::Edited => KeyOutcome::Redraw,
            InputEffect::Moved => KeyOutcome::Consumed,
            InputEffect::Unchanged => KeyOutcome::Ignored,
        }
    }

    /// Outline key handler for the node bound by `context`.
    ///
    /// Handled keys suppress the input's default behaviour; Backspace on a
    /// non-empty value and every other key are left to the input.
    #[instrument(level = "debug", skip(self))]
    pub fn handle_keydown(&mut self, event: &KeyEvent, context: KeyContext) -> KeyOutcome {
        if event.ctrl || event.alt {
            return KeyOutcome::Ignored;
        }
        match event.key {
            Key::Enter => self.insert_after(context),
            Key::Tab => self.indent(context),
            Key::Backspace if self.is_empty_node(context.node) => self.delete(context),
            Key::ArrowUp => {
                if let Some(target) = self.target_above(context) {
                    self.focus(target);
                }
                KeyOutcome::Consumed
            }
            Key::ArrowDown => {
                if let Some(target) = self.target_below(context) {
                    self.focus(target);
                }
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn is_empty_node(&self, node: NodeId) -> bool {
        self.tree.value(node).is_ok_and(str::is_empty)
    }

    fn sibling_at(&self, siblings: Siblings, index: usize) -> Option<NodeId> {
        self.tree.siblings(siblings)?.get(index).copied()
    }

    fn insert_after(&mut self, context: KeyContext) -> KeyOutcome {
        if self.sibling_at(context.siblings, context.index) != Some(context.node) {
            debug!(?context, "stale binding, insert skipped");
            return KeyOutcome::Consumed;
        }
        let created = self.tree.create_node("");
        if let Some(node) = self.tree.get_node_mut(created) {
            node.focus = true;
        }
        self.tree
            .insert_at(context.siblings, context.index + 1, created);
        debug!(?created, after = ?context.node, "node inserted");
        KeyOutcome::Redraw
    }

    fn indent(&mut self, context: KeyContext) -> KeyOutcome {
        if context.index == 0 {
            return KeyOutcome::Consumed;
        }
        let Some(previous) = self.sibling_at(context.siblings, context.index - 1) else {
            return KeyOutcome::Consumed;
        };
        if self.sibling_at(context.siblings, context.index) != Some(context.node) {
            debug!(?context, "stale binding, indent skipped");
            return KeyOutcome::Consumed;
        }
        if let Some(node) = self.tree.get_node_mut(context.node) {
            node.focus = true;
        }
        self.tree.detach(context.siblings, context.index);
        self.tree.append_child(previous, context.node);
        debug!(node = ?context.node, under = ?previous, "node indented");
        KeyOutcome::Redraw
    }

    fn delete(&mut self, context: KeyContext) -> KeyOutcome {
        let Some(siblings) = self.tree.siblings(context.siblings) else {
            return KeyOutcome::Consumed;
        };
        if siblings.get(context.index) != Some(&context.node) {
            debug!(?context, "stale binding, delete skipped");
            return KeyOutcome::Consumed;
        }
        let target = if siblings.len() == 1 {
            self.tree.parent(context.node)
        } else if context.index > 0 {
            siblings.get(context.index - 1).copied()
        } else {
            siblings.get(context.index + 1).copied()
        };

        let released = self.tree.remove(context.siblings, context.index);
        debug!(node = ?context.node, released, ?target, "node removed");
        if self.focused.is_some_and(|f| !self.tree.contains(f)) {
            self.focused = None;
        }
        if let Some(target) = target {
            self.frames.request(FrameTask::Focus(target));
        }
        KeyOutcome::Redraw
    }

    /// Focus target for ArrowUp.
    ///
    /// A parent handle always resolves while its child is alive, so the parent
    /// branch covers every non-root first child; the first root has no target.
    fn target_above(&self, context: KeyContext) -> Option<NodeId> {
        if context.index > 0 {
            return self.sibling_at(context.siblings, context.index - 1);
        }
        self.tree
            .parent(context.node)
            .filter(|&parent| self.tree.contains(parent))
    }

    /// Focus target for ArrowDown.
    fn target_below(&self, context: KeyContext) -> Option<NodeId> {
        let node = self.tree.get_node(context.node)?;
        if let Some(&first) = node.children.first() {
            return Some(first);
        }
        if let Some(next) = self.sibling_at(context.siblings, context.index + 1) {
            return Some(next);
        }
        // Only one level up: the parent's next sibling, when the parent itself
        // has a parent.
        let parent = node.parent?;
        let grandparent = self.tree.parent(parent)?;
        let uncles = self.tree.siblings(Siblings::Children(grandparent))?;
        let position = uncles.iter().position(|&n| n == parent)?;
        uncles.get(position + 1).copied()
    }
}
