//! Crossterm-backed [`Screen`].
//!
//! Entering the screen switches the terminal to raw mode and the alternate
//! screen; dropping it (or panicking) restores the terminal.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute, queue};
use tracing::{debug, instrument};

use crate::domain::{Key, KeyEvent};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{Canvas, HostEvent, Screen};

static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK: Once = Once::new();

pub struct TerminalScreen {
    stdout: Stdout,
}

impl TerminalScreen {
    /// Enter raw mode and the alternate screen.
    #[instrument(level = "debug")]
    pub fn enter() -> InfraResult<Self> {
        terminal::enable_raw_mode().map_err(|e| InfraError::io("enable raw mode", e))?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All)
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(InfraError::io("enter alternate screen", e));
        }
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        install_panic_hook();

        debug!("terminal entered");
        Ok(Self { stdout })
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Chain a hook that restores the terminal before the panic message is
/// printed. Only the first call installs it; returns whether this one did.
fn install_panic_hook() -> bool {
    let mut installed = false;
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_terminal();
            previous(info);
        }));
        installed = true;
    });
    installed
}

fn restore_terminal() {
    if TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl Screen for TerminalScreen {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        queue!(self.stdout, cursor::Hide)?;
        let mut drawn: u16 = 0;
        for (row, line) in (0u16..).zip(&canvas.rows) {
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                Print(line),
                terminal::Clear(ClearType::UntilNewLine)
            )?;
            drawn = row + 1;
        }
        queue!(
            self.stdout,
            cursor::MoveTo(0, drawn),
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        if let Some((col, row)) = canvas.cursor {
            queue!(self.stdout, cursor::MoveTo(col, row), cursor::Show)?;
        }
        self.stdout.flush()
    }

    fn read_event(&mut self) -> io::Result<HostEvent> {
        loop {
            if let Some(event) = map_event(event::read())? {
                return Ok(event);
            }
        }
    }
}

/// Translate one crossterm read; None means "skip and read again".
///
/// A closed input stream surfaces as [`HostEvent::Closed`] instead of an error.
fn map_event(read: io::Result<Event>) -> io::Result<Option<HostEvent>> {
    let event = match read {
        Ok(event) => event,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            debug!("terminal input closed");
            return Ok(Some(HostEvent::Closed));
        }
        Err(e) => return Err(e),
    };
    Ok(match event {
        // Some platforms report releases too; only presses count
        Event::Key(key) if key.kind == KeyEventKind::Release => None,
        Event::Key(key) => Some(HostEvent::Key(map_key_event(key))),
        Event::Resize(cols, rows) => Some(HostEvent::Resize(cols, rows)),
        _ => Some(HostEvent::Other),
    })
}

/// Normalize a crossterm key event.
pub fn map_key_event(key_event: event::KeyEvent) -> KeyEvent {
    let modifiers = key_event.modifiers;
    let key = match key_event.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    };
    KeyEvent {
        key,
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
    }
}
