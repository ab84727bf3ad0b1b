/// Gamepad input using gilrs: a virtual pointer plus action buttons.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move pointer
///   A                     →  Click at pointer
///   Start / X             →  Confirm
///   B / Select            →  Cancel (Quit on the map and failure screen)
///   Y                     →  Hint
///   Start                 →  Retry (failure screen only)

use std::time::{Duration, Instant};

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::sim::intent::Intent;
use crate::sim::layout::{CANVAS_H, CANVAS_W};
use crate::sim::session::Phase;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Pointer repeat while a direction is held.
const POINTER_STEP: Duration = Duration::from_millis(35);

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug)]
struct ActionMap {
    click: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    hint: Vec<Btn>,
    retry: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            click:   vec![Btn::A],
            confirm: vec![Btn::Start, Btn::X],
            cancel:  vec![Btn::B, Btn::Select],
            hint:    vec![Btn::Y],
            retry:   vec![Btn::Start],
        }
    }
}

fn parse_list(names: &[String]) -> Vec<Btn> {
    names.iter().filter_map(|s| Btn::from_name(s)).collect()
}

/// Move the pointer one cell, clamped to the canvas.
pub fn step_pointer(pos: (i32, i32), dx: i32, dy: i32) -> (i32, i32) {
    (
        (pos.0 + dx).clamp(0, CANVAS_W - 1),
        (pos.1 + dy).clamp(0, CANVAS_H - 1),
    )
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update()`.
    pressed: [bool; BTN_COUNT],

    // Direction held: d-pad and stick combined
    dpad: (i32, i32),
    stick_x: f32,
    stick_y: f32,

    pointer: (i32, i32),
    last_step: Option<Instant>,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pressed: [false; BTN_COUNT],
            dpad: (0, 0),
            stick_x: 0.0,
            stick_y: 0.0,
            pointer: (CANVAS_W / 2, CANVAS_H / 2),
            last_step: None,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unknown lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let map = &mut self.action_map;
        let click = parse_list(&cfg.click);
        if !click.is_empty() { map.click = click; }
        let confirm = parse_list(&cfg.confirm);
        if !confirm.is_empty() { map.confirm = confirm; }
        let cancel = parse_list(&cfg.cancel);
        if !cancel.is_empty() { map.cancel = cancel; }
        let hint = parse_list(&cfg.hint);
        if !hint.is_empty() { map.hint = hint; }
        let retry = parse_list(&cfg.retry);
        if !retry.is_empty() { map.retry = retry; }
    }

    /// Poll the pad and move the pointer. Call once per frame.
    pub fn update(&mut self) {
        self.pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        self.move_pointer(Instant::now());
    }

    /// Pointer position in canvas cells while a pad is connected.
    pub fn pointer(&self) -> Option<(i32, i32)> {
        self.connected.then_some(self.pointer)
    }

    /// Intents for the buttons pressed this frame.
    pub fn intents(&self, phase: Phase) -> Vec<Intent> {
        let mut out = Vec::new();
        if self.any_pressed(&self.action_map.click) {
            out.push(Intent::Click { x: self.pointer.0, y: self.pointer.1 });
        }
        if self.any_pressed(&self.action_map.confirm) {
            out.push(Intent::Confirm);
        }
        if self.any_pressed(&self.action_map.hint) {
            out.push(Intent::RequestHint);
        }
        // Retry only exists on the failure screen
        if matches!(phase, Phase::MissionFailed { .. }) && self.any_pressed(&self.action_map.retry) {
            out.push(Intent::Retry);
        }
        if self.any_pressed(&self.action_map.cancel) {
            out.push(match phase {
                Phase::MissionFailed { .. } | Phase::LevelSelect => Intent::Quit,
                _ => Intent::Cancel,
            });
        }
        out
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.dpad = (0, 0);
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, down: bool) {
        let v = if down { 1 } else { 0 };
        match gilrs_btn {
            Button::DPadUp    => { self.dpad.1 = -v; return; }
            Button::DPadDown  => { self.dpad.1 = v; return; }
            Button::DPadLeft  => { self.dpad.0 = -v; return; }
            Button::DPadRight => { self.dpad.0 = v; return; }
            _ => {}
        }
        if down {
            if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
                self.pressed[btn as usize] = true;
            }
        }
    }

    fn direction(&self) -> (i32, i32) {
        let axis = |v: f32| if v > STICK_DEADZONE { 1 } else if v < -STICK_DEADZONE { -1 } else { 0 };
        // Stick Y is up-positive; canvas rows grow downward
        let dx = if self.dpad.0 != 0 { self.dpad.0 } else { axis(self.stick_x) };
        let dy = if self.dpad.1 != 0 { self.dpad.1 } else { -axis(self.stick_y) };
        (dx, dy)
    }

    fn move_pointer(&mut self, now: Instant) {
        let (dx, dy) = self.direction();
        if dx == 0 && dy == 0 {
            self.last_step = None;
            return;
        }
        let due = self.last_step.map_or(true, |t| now.duration_since(t) >= POINTER_STEP);
        if due {
            self.pointer = step_pointer(self.pointer, dx, dy);
            self.last_step = Some(now);
        }
    }

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.pressed[b as usize])
    }
}
