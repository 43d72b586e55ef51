//! Domain layer: outline tree and key events
//!
//! This layer is independent of external concerns (no terminal, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;

pub use arena::{NodeData, NodeId, OutlineArena, OutlineNode, Siblings};
pub use entities::*;
pub use error::{DomainError, DomainResult};
