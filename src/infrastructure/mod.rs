//! Infrastructure layer: terminal I/O and the interactive session
//!
//! This layer implements the I/O boundary traits and runs the editor loop.

pub mod error;
pub mod session;
pub mod terminal;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use session::Session;
pub use terminal::TerminalScreen;
pub use traits::{Canvas, HostEvent, Screen};
