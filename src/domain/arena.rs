//! Arena-backed outline tree.
//!
//! Nodes live in a generational arena and refer to each other by handle.
//! Ownership is purely through containment: a node belongs to exactly one
//! sibling sequence (the root list or a parent's `children`), and removing it
//! from that sequence via [`OutlineArena::remove`] frees its whole subtree.

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Handle of a node in the outline.
///
/// Generational: once a node is removed its handle never resolves again, even
/// if the slot gets reused, so ids are unique for the lifetime of the tree.
pub type NodeId = Index;

/// Text payload of an outline node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeData {
    pub value: String,
}

/// Node in the outline tree.
#[derive(Debug)]
pub struct OutlineNode {
    pub data: NodeData,
    /// One-shot request to grab input focus on the next render.
    pub focus: bool,
    /// Containing node, None for roots.
    ///
    /// Written by the renderer on every pass; tree mutations leave it alone.
    pub parent: Option<NodeId>,
    /// Child handles in display order
    pub children: Vec<NodeId>,
}

/// Addresses one sibling sequence of the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Siblings {
    /// The top-level node list
    Roots,
    /// Children of the given node
    Children(NodeId),
}

/// Outline tree: a sequence of root nodes, each owning its subtree.
#[derive(Debug)]
pub struct OutlineArena {
    arena: Arena<OutlineNode>,
    roots: Vec<NodeId>,
}

impl Default for OutlineArena {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            roots: Vec::new(),
        }
    }

    /// Allocates a node that is not yet part of any sibling sequence.
    #[instrument(level = "trace", skip(self))]
    pub fn create_node(&mut self, value: &str) -> NodeId {
        self.arena.insert(OutlineNode {
            data: NodeData {
                value: value.to_string(),
            },
            focus: false,
            parent: None,
            children: Vec::new(),
        })
    }

    /// Creates a node and appends it to the root list.
    #[instrument(level = "trace", skip(self))]
    pub fn push_root(&mut self, value: &str) -> NodeId {
        let idx = self.create_node(value);
        self.roots.push(idx);
        idx
    }

    /// Creates a node and appends it as last child of `parent`.
    ///
    /// Returns None (and allocates nothing) when `parent` is gone.
    #[instrument(level = "trace", skip(self))]
    pub fn push_child(&mut self, parent: NodeId, value: &str) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let idx = self.create_node(value);
        self.append_child(parent, idx);
        Some(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: NodeId) -> Option<&OutlineNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut OutlineNode> {
        self.arena.get_mut(idx)
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of live nodes across all subtrees.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn value(&self, idx: NodeId) -> DomainResult<&str> {
        self.get_node(idx)
            .map(|node| node.data.value.as_str())
            .ok_or(DomainError::NodeNotFound(idx))
    }

    pub fn value_mut(&mut self, idx: NodeId) -> DomainResult<&mut String> {
        self.get_node_mut(idx)
            .map(|node| &mut node.data.value)
            .ok_or(DomainError::NodeNotFound(idx))
    }

    /// Parent link as written by the last render.
    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    /// Handles of one sibling sequence, None if its owner is gone.
    pub fn siblings(&self, siblings: Siblings) -> Option<&[NodeId]> {
        match siblings {
            Siblings::Roots => Some(&self.roots),
            Siblings::Children(owner) => self.get_node(owner).map(|n| n.children.as_slice()),
        }
    }

    fn siblings_mut(&mut self, siblings: Siblings) -> Option<&mut Vec<NodeId>> {
        match siblings {
            Siblings::Roots => Some(&mut self.roots),
            Siblings::Children(owner) => self.get_node_mut(owner).map(|n| &mut n.children),
        }
    }

    /// Inserts `idx` into a sibling sequence, clamping `index` to its length.
    ///
    /// Returns false when the sequence no longer exists.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_at(&mut self, siblings: Siblings, index: usize, idx: NodeId) -> bool {
        match self.siblings_mut(siblings) {
            Some(seq) => {
                let at = index.min(seq.len());
                seq.insert(at, idx);
                true
            }
            None => false,
        }
    }

    /// Unlinks the node at `index` from a sibling sequence without freeing it.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, siblings: Siblings, index: usize) -> Option<NodeId> {
        let seq = self.siblings_mut(siblings)?;
        if index < seq.len() {
            Some(seq.remove(index))
        } else {
            None
        }
    }

    /// Appends `child` as the last child of `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        match self.get_node_mut(parent) {
            Some(node) => {
                node.children.push(child);
                true
            }
            None => false,
        }
    }

    /// Unlinks the node at `index` and frees it together with its subtree.
    ///
    /// Returns the number of nodes released.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, siblings: Siblings, index: usize) -> usize {
        match self.detach(siblings, index) {
            Some(idx) => self.free_subtree(idx),
            None => 0,
        }
    }

    fn free_subtree(&mut self, idx: NodeId) -> usize {
        let mut released = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
                released += 1;
            }
        }
        released
    }

    /// Number of levels below and including the deepest root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Pre-order walk over all roots, left to right.
    pub fn iter(&self) -> OutlineIterator<'_> {
        OutlineIterator::new(self)
    }
}

pub struct OutlineIterator<'a> {
    arena: &'a OutlineArena,
    stack: Vec<NodeId>,
}

impl<'a> OutlineIterator<'a> {
    fn new(arena: &'a OutlineArena) -> Self {
        let stack = arena.roots.iter().rev().copied().collect();
        Self { arena, stack }
    }
}

impl<'a> Iterator for OutlineIterator<'a> {
    type Item = (NodeId, &'a OutlineNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}
