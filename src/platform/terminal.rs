//! Raw-mode terminal session and keyboard input

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::{ExecutableCommand, cursor, terminal};

use super::input::{InputEvent, InputSource};

/// Raw mode on the alternate screen, restored when dropped
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Built before the remaining setup so a failure below still restores raw mode
        let session = Self { _private: () };
        io::stdout()
            .execute(terminal::EnterAlternateScreen)?
            .execute(cursor::Hide)?;
        Ok(session)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let restored = io::stdout()
            .execute(cursor::Show)
            .and_then(|out| out.execute(terminal::LeaveAlternateScreen))
            .and_then(|_| terminal::disable_raw_mode());
        if let Err(e) = restored {
            log::warn!("Failed to restore terminal: {e}");
        }
    }
}

/// Key presses read without blocking, drained once per tick.
/// Expects a `TerminalSession` to be active.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    fn next_event() -> io::Result<Option<Event>> {
        if event::poll(Duration::ZERO)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        loop {
            match Self::next_event() {
                Ok(Some(Event::Key(key))) => events.extend(InputEvent::from_key_event(key)),
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Terminal input failed: {e}");
                    events.push(InputEvent::Quit);
                    break;
                }
            }
        }
        events
    }
}
