//! I/O boundary traits for testability
//!
//! The session talks to the terminal only through [`Screen`], so the whole
//! key-to-paint loop can run against an in-memory screen in tests.

use std::io;

use crate::domain::KeyEvent;

/// Input coming from the host terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Key(KeyEvent),
    /// New size in columns and rows
    Resize(u16, u16),
    /// Input stream ended (end of file on the terminal, or a scripted
    /// screen running out of events); no further events will arrive.
    Closed,
    /// Anything else (mouse, focus, paste); only triggers a repaint.
    Other,
}

/// A fully composed screen: text rows plus the caret position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Canvas {
    pub rows: Vec<String>,
    /// Caret as (column, row), None hides it
    pub cursor: Option<(u16, u16)>,
}

/// Terminal abstraction for testability.
pub trait Screen {
    /// Current size in columns and rows.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Replace the screen contents with `canvas`.
    fn draw(&mut self, canvas: &Canvas) -> io::Result<()>;

    /// Block until the next event.
    fn read_event(&mut self) -> io::Result<HostEvent>;
}
