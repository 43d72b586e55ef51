//! One-frame deferral of work until after the next render.
//!
//! Removing a node changes which lines exist, so moving focus onto a
//! neighbour has to wait until the tree has been rendered again. Tasks are
//! fire-and-forget: nothing cancels them, and a task whose target has
//! disappeared in the meantime does nothing when it runs.

use tracing::trace;

use crate::domain::NodeId;

/// Work scheduled for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Move input focus to the node, if it still exists.
    Focus(NodeId),
}

#[derive(Debug, Default)]
pub struct FrameQueue {
    tasks: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, task: FrameTask) {
        trace!(?task, "frame task requested");
        self.tasks.push(task);
    }

    /// Takes every pending task in request order.
    pub fn drain(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.tasks)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
