//! Interactive editing session: paint, read a key, dispatch, repeat.

use tracing::{info, instrument, trace};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::application::OutlineEditor;
use crate::config::Settings;
use crate::domain::{Key, KeyEvent};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{Canvas, HostEvent, Screen};

/// Shown instead of the outline once every node has been deleted.
pub const EMPTY_HINT: &str = "(empty outline: Enter adds a node, Esc quits)";

pub struct Session<'a> {
    settings: &'a Settings,
    editor: OutlineEditor,
    /// First outline line shown on screen
    scroll: usize,
}

impl<'a> Session<'a> {
    pub fn new(settings: &'a Settings, editor: OutlineEditor) -> Self {
        Self {
            settings,
            editor,
            scroll: 0,
        }
    }

    pub fn editor(&self) -> &OutlineEditor {
        &self.editor
    }

    pub fn into_editor(self) -> OutlineEditor {
        self.editor
    }

    /// Runs until a quit key is pressed or input ends.
    #[instrument(level = "debug", skip_all)]
    pub fn run<S: Screen>(&mut self, screen: &mut S) -> InfraResult<()> {
        self.editor.render();
        info!("session started");
        loop {
            let (cols, rows) = screen
                .size()
                .map_err(|e| InfraError::io("query terminal size", e))?;
            let canvas = self.compose(cols, rows);
            screen
                .draw(&canvas)
                .map_err(|e| InfraError::io("draw outline", e))?;

            let event = screen
                .read_event()
                .map_err(|e| InfraError::io("read terminal event", e))?;
            match event {
                HostEvent::Key(key) if is_quit(&key) => break,
                HostEvent::Key(key) => {
                    let outcome = self.editor.press(key);
                    trace!(?key, ?outcome, "key dispatched");
                }
                HostEvent::Closed => break,
                HostEvent::Resize(..) | HostEvent::Other => {}
            }
        }
        let tree = self.editor.tree();
        let blank = tree.iter().filter(|(_, node)| node.data.value.is_empty()).count();
        info!(nodes = tree.len(), depth = tree.depth(), blank, "session finished");
        Ok(())
    }

    /// Lays the last rendered view out on a `cols` x `rows` screen.
    ///
    /// Scrolls just enough to keep the focused line visible.
    pub fn compose(&mut self, cols: u16, rows: u16) -> Canvas {
        let height = usize::from(rows).max(1);
        let width = usize::from(cols);
        let view = self.editor.view();
        if view.is_empty() {
            return Canvas {
                rows: vec![fit_width(EMPTY_HINT, width)],
                cursor: None,
            };
        }

        let lines = view.lines();
        let focused_row = self
            .editor
            .focused()
            .and_then(|focused| lines.iter().position(|line| line.node == focused));
        if let Some(row) = focused_row {
            if row < self.scroll {
                self.scroll = row;
            } else if row >= self.scroll + height {
                self.scroll = row + 1 - height;
            }
        }
        self.scroll = self.scroll.min(lines.len() - 1);

        let rows_out = lines
            .iter()
            .skip(self.scroll)
            .take(height)
            .map(|line| fit_width(&format!("{}{}", self.prefix(line.depth), line.value), width))
            .collect();

        let cursor = focused_row
            .filter(|row| (self.scroll..self.scroll + height).contains(row))
            .and_then(|row| {
                let depth = lines[row].depth;
                let column = self.prefix(depth).width() + self.editor.caret_column()?;
                let column = column.min(width.saturating_sub(1));
                Some((to_u16(column), to_u16(row - self.scroll)))
            });

        Canvas {
            rows: rows_out,
            cursor,
        }
    }

    fn prefix(&self, depth: usize) -> String {
        format!(
            "{}{} ",
            " ".repeat(depth * self.settings.indent),
            self.settings.bullet
        )
    }
}

/// Esc, Ctrl-C and Ctrl-Q end the session.
pub fn is_quit(event: &KeyEvent) -> bool {
    match event.key {
        Key::Esc => true,
        Key::Char('c') | Key::Char('q') => event.ctrl,
        _ => false,
    }
}

/// Cuts `text` to at most `width` terminal columns.
fn fit_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
