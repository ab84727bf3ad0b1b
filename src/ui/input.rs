/// Terminal input: drains crossterm key and mouse events once per frame
/// and translates keys into session intents.
///
/// Only key presses (and repeats, so Backspace can be held) count. Mouse
/// clicks are reported in terminal cells; the renderer maps them onto the
/// canvas before they become `Intent::Click`.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::sim::intent::Intent;
use crate::sim::session::Phase;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RawInput {
    Key(KeyEvent),
    /// Left-button press at a terminal cell.
    Click { col: u16, row: u16 },
}

pub struct InputState {
    /// Events collected during the most recent `drain_events()`.
    pub raw_events: Vec<RawInput>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { raw_events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the controller tick.
    pub fn drain_events(&mut self) {
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.raw_events.push(RawInput::Key(key));
                }
                Ok(Event::Mouse(m)) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
                    self.raw_events.push(RawInput::Click { col: m.column, row: m.row });
                }
                _ => {}
            }
        }
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|e| match e {
            RawInput::Key(k) => {
                k.modifiers.contains(KeyModifiers::CONTROL)
                    && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
            }
            _ => false,
        })
    }
}

/// Map one key press to an intent for the current phase.
///
/// ┌──────────────┬──────────────────────────────────────────────┐
/// │ Key          │ Intent                                       │
/// ├──────────────┼──────────────────────────────────────────────┤
/// │ Enter        │ Confirm (Space too, outside typing phases)   │
/// │ Esc          │ Quit on map / failure screen, else Cancel    │
/// │ Backspace    │ Backspace                                    │
/// │ Tab, F1      │ RequestHint                                  │
/// │ r / q        │ Retry / Quit on the failure screen           │
/// │ other chars  │ TextChar                                     │
/// └──────────────┴──────────────────────────────────────────────┘
pub fn intent_for_key(phase: Phase, key: &KeyEvent) -> Option<Intent> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    let on_exit_screen = matches!(phase, Phase::MissionFailed { .. } | Phase::LevelSelect);
    match key.code {
        KeyCode::Enter => Some(Intent::Confirm),
        KeyCode::Esc if on_exit_screen => Some(Intent::Quit),
        KeyCode::Esc => Some(Intent::Cancel),
        KeyCode::Backspace => Some(Intent::Backspace),
        KeyCode::Tab | KeyCode::F(1) => Some(Intent::RequestHint),
        KeyCode::Char(c) => Some(char_intent(phase, c)),
        _ => None,
    }
}

fn char_intent(phase: Phase, c: char) -> Intent {
    match (phase, c.to_ascii_lowercase()) {
        (Phase::MissionFailed { .. }, 'r') => Intent::Retry,
        (Phase::MissionFailed { .. }, 'q') => Intent::Quit,
        (Phase::LaptopLogin, _) => Intent::TextChar(c),
        (_, ' ') => Intent::Confirm,
        _ => Intent::TextChar(c),
    }
}
