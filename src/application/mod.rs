//! Application layer: rendering, key handling and text input
//!
//! This layer drives the domain tree; it knows nothing about terminals.

pub mod editor;
pub mod error;
pub mod frame;
pub mod render;
pub mod text_input;

pub use editor::OutlineEditor;
pub use error::{ApplicationError, ApplicationResult};
pub use frame::{FrameQueue, FrameTask};
pub use render::{render, run_post_render_hooks, ViewItem, ViewLine, ViewList};
pub use text_input::{InputEffect, TextInput};
