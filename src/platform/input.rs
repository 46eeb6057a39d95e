//! Input events and sources

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::sim::{Direction, TickInput};

/// A discrete player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Restart,
    ContinueAfterWin,
    Quit,
}

impl InputEvent {
    /// Map a key name to an event. Unrecognized keys yield `None` and never
    /// reach the game.
    pub fn from_key(key: &str) -> Option<Self> {
        let event = match key.to_lowercase().as_str() {
            "w" | "k" | "up" => InputEvent::Up,
            "s" | "j" | "down" => InputEvent::Down,
            "a" | "h" | "left" => InputEvent::Left,
            "d" | "l" | "right" => InputEvent::Right,
            "r" | " " | "space" | "restart" => InputEvent::Restart,
            "c" | "continue" => InputEvent::ContinueAfterWin,
            "q" | "quit" | "exit" => InputEvent::Quit,
            _ => return None,
        };
        Some(event)
    }

    /// Map a terminal key press. Releases and repeats are ignored.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(InputEvent::Quit);
        }
        match key.code {
            KeyCode::Up => Some(InputEvent::Up),
            KeyCode::Down => Some(InputEvent::Down),
            KeyCode::Left => Some(InputEvent::Left),
            KeyCode::Right => Some(InputEvent::Right),
            KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char(c) => Self::from_key(c.encode_utf8(&mut [0; 4])),
            _ => None,
        }
    }

    /// Parse a `--script` line: whole words first, otherwise one key per character
    pub fn parse_line(line: &str) -> Vec<Self> {
        let mut events = Vec::new();
        for word in line.split_whitespace() {
            match Self::from_key(word) {
                Some(event) => events.push(event),
                None => events.extend(
                    word.chars()
                        .filter_map(|c| Self::from_key(c.encode_utf8(&mut [0; 4]))),
                ),
            }
        }
        events
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            InputEvent::Up => Some(Direction::Up),
            InputEvent::Down => Some(Direction::Down),
            InputEvent::Left => Some(Direction::Left),
            InputEvent::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// The tick command for this event. Quit is handled by the run loop.
    pub fn to_tick_input(self) -> Option<TickInput> {
        match self {
            InputEvent::Restart => Some(TickInput::restart()),
            InputEvent::ContinueAfterWin => Some(TickInput::continue_after_win()),
            InputEvent::Quit => None,
            other => other.direction().map(TickInput::slide),
        }
    }
}

/// A source of player commands, drained once per tick
pub trait InputSource {
    /// Every event that arrived since the last poll
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Replays a fixed list of events, one every `spacing` ticks, then quits
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
    spacing: u32,
    wait: u32,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>, spacing: u32) -> Self {
        Self {
            events: events.into_iter().collect(),
            spacing,
            wait: 0,
        }
    }

    /// Spacing long enough for the longest possible slide to settle first
    pub fn settle_spacing(rows: usize, cols: usize, cell_size: i32, velocity: i32) -> u32 {
        let longest = (rows.max(cols).saturating_sub(1)) as u32 * cell_size.max(0) as u32;
        longest.div_ceil(velocity.max(1) as u32) + 1
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<InputEvent> {
        if self.wait > 0 {
            self.wait -= 1;
            return Vec::new();
        }
        match self.events.pop_front() {
            Some(event) => {
                self.wait = self.spacing;
                vec![event]
            }
            None => vec![InputEvent::Quit],
        }
    }
}
