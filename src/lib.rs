//! outliner: keyboard-driven outline editor
//!
//! Layers, innermost first:
//! - `domain`: the outline tree and key events
//! - `application`: renderer, keyboard handler, text input
//! - `infrastructure`: terminal screen and the interactive session
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
