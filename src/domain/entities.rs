//! Domain entities: key events and the per-node context the renderer captures.

use crate::domain::arena::{NodeId, Siblings};

/// Keys the outline understands, independent of the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Esc,
    Char(char),
    /// Anything without a binding
    Other,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::new(key)
        }
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// What the keyboard handler sees of the node owning the focused input.
///
/// Captured per node at render time, the same way a rendered input binds its
/// node, sibling index and sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub node: NodeId,
    /// Position of `node` within `siblings`
    pub index: usize,
    pub siblings: Siblings,
}

/// Result of dispatching a key to the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled; the tree changed and must be rendered again.
    Redraw,
    /// Handled without a tree change (default behaviour suppressed).
    Consumed,
    /// Not handled; the text input's default behaviour applies.
    Ignored,
}

impl KeyOutcome {
    pub fn is_handled(self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}
