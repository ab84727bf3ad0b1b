/// SessionController: the single owner of all mutable game state.
///
/// ## Phase graph
///
///   Intro ──▶ DeskSearch ⇄ LaptopLogin ──▶ LevelComplete ──▶ LevelSelect
///                 │              │
///                 └──── timeout / attempts ──▶ MissionFailed ──retry──▶ Intro
///
///   LevelSelect ──▶ Level2Intro ──▶ Level2Phishing ──▶ Level2Quiz ──▶ Level2Complete
///                                         │
///                                         └── timeout ──▶ MissionFailed ──retry──▶ Level2Intro
///
/// ## Tick order
///
/// `tick(now)` first drains queued intents in arrival order, then runs the
/// time-driven checks (clock expiry, sticky-note reveal, delayed quiz
/// start). An intent the current phase cannot interpret is logged at debug
/// level and dropped without touching state.
///
/// Terminal phases (`LevelComplete`, `Level2Complete`, `MissionFailed`)
/// stop the level clock and compute the score exactly once, on entry.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use crate::config::{Level1Rules, Level2Rules, RulesConfig};
use crate::domain::classifier::{classify, ElementKind, Inbox, Verdict, VerdictError};
use crate::domain::clock::{Millis, MissionClock};
use crate::domain::hints::{AttemptBudget, HintEconomy, HintError};
use crate::domain::inventory::{Inventory, InventoryError, ItemRole, Penalties};
use crate::domain::quiz::Quiz;
use crate::domain::score::{score_level1, score_level2, Level1Stats, Level2Stats, ScoreResult};

use super::content::{self, LevelId, LevelPin};
use super::event::GameEvent;
use super::intent::Intent;
use super::layout;
use super::snapshot::{
    DeskView, DialogueView, EmailView, Feedback, HintView, InboxView, InspectView, ItemView,
    LoginView, MapView, PinView, QuizView, Snapshot, TimerView, Tone,
};

const NOTE_REVEALED: &str = "Something slipped out from under the monitor... a yellow sticky note!";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FailReason {
    Timeout,
    AttemptsExhausted,
}

impl FailReason {
    pub fn message(self) -> &'static str {
        match self {
            FailReason::Timeout => "TIME'S UP! The evidence is gone.",
            FailReason::AttemptsExhausted => "LOCKED OUT! Too many wrong passwords.",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Intro { line: usize },
    DeskSearch,
    LaptopLogin,
    LevelComplete,
    MissionFailed { reason: FailReason, level: u8 },
    LevelSelect,
    Level2Intro { line: usize },
    Level2Phishing,
    Level2Quiz,
    Level2Complete,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Intro { .. } => "intro",
            Phase::DeskSearch => "desk-search",
            Phase::LaptopLogin => "laptop-login",
            Phase::LevelComplete => "level-complete",
            Phase::MissionFailed { .. } => "mission-failed",
            Phase::LevelSelect => "level-select",
            Phase::Level2Intro { .. } => "level2-intro",
            Phase::Level2Phishing => "level2-phishing",
            Phase::Level2Quiz => "level2-quiz",
            Phase::Level2Complete => "level2-complete",
        }
    }

    /// Level this phase belongs to; `None` on the city map.
    pub fn level(self) -> Option<u8> {
        match self {
            Phase::Intro { .. } | Phase::DeskSearch | Phase::LaptopLogin | Phase::LevelComplete => Some(1),
            Phase::Level2Intro { .. } | Phase::Level2Phishing | Phase::Level2Quiz | Phase::Level2Complete => Some(2),
            Phase::MissionFailed { level, .. } => Some(level),
            Phase::LevelSelect => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::LevelComplete | Phase::Level2Complete | Phase::MissionFailed { .. })
    }
}

// ── Per-level state ──

#[derive(Clone, Debug)]
struct Level1State {
    inventory: Inventory,
    /// `None` while the tutorial overlay is up.
    clock: Option<MissionClock>,
    tutorial_line: Option<usize>,
    has_key: bool,
    password: String,
    password_wrong: bool,
    attempts: AttemptBudget,
    hints: HintEconomy,
}

impl Level1State {
    fn new(template: &Inventory, rules: &Level1Rules) -> Self {
        Level1State {
            inventory: template.clone(),
            clock: None,
            tutorial_line: None,
            has_key: false,
            password: String::new(),
            password_wrong: false,
            attempts: AttemptBudget::new(rules.password_attempts),
            hints: HintEconomy::new(content::LEVEL1_HINTS, rules.max_hints, rules.hint_penalty_secs),
        }
    }

    fn penalize(&mut self, secs: u32) {
        if let Some(clock) = self.clock.as_mut() {
            clock.penalize(secs);
        }
    }
}

#[derive(Clone, Debug)]
struct Level2State {
    inbox: Inbox,
    clock: Option<MissionClock>,
    selected: Option<usize>,
    /// (email index, element kind) pairs the player has probed successfully.
    spotted: BTreeSet<(usize, ElementKind)>,
    all_classified_at: Option<Millis>,
    hints: HintEconomy,
    quiz: Quiz,
}

impl Level2State {
    fn new(rules: &Level2Rules) -> Self {
        Level2State {
            inbox: Inbox::new(content::inbox_emails()),
            clock: None,
            selected: None,
            spotted: BTreeSet::new(),
            all_classified_at: None,
            hints: HintEconomy::new(content::LEVEL2_HINTS, rules.max_hints, rules.hint_penalty_secs),
            quiz: Quiz::new(content::QUIZ),
        }
    }

    /// Every element derived for every phishing email has been probed.
    fn all_elements_found(&self) -> bool {
        self.inbox.emails().iter().enumerate()
            .filter(|(_, e)| e.is_phishing)
            .all(|(i, e)| classify(e).iter().all(|el| self.spotted.contains(&(i, el.kind))))
    }
}

#[derive(Clone, Copy, Debug)]
struct PinState {
    pin: LevelPin,
    completed: bool,
}

// ── Controller ──

pub struct SessionController {
    rules: RulesConfig,
    phase: Phase,
    queue: VecDeque<Intent>,
    now: Millis,
    /// Validated once; cloned on every level-1 reset.
    desk_template: Inventory,
    level1: Level1State,
    level2: Level2State,
    pins: Vec<PinState>,
    cursor: usize,
    tutorial_seen: bool,
    feedback: Option<Feedback>,
    score: Option<ScoreResult>,
    exit_requested: bool,
    events: Vec<GameEvent>,
}

impl SessionController {
    /// Fails only if the built-in desk content is inconsistent.
    pub fn new(rules: RulesConfig) -> Result<Self, InventoryError> {
        let l1 = &rules.level1;
        let penalties = Penalties {
            miss_click_secs: l1.miss_click_penalty_secs,
            decoy_secs: l1.decoy_penalty_secs,
        };
        let desk_template = Inventory::new(content::desk_items(), penalties)?
            .with_gate(content::GATED_ITEM, l1.reveal_threshold)?;
        let level1 = Level1State::new(&desk_template, l1);
        let level2 = Level2State::new(&rules.level2);
        let pins = content::LEVEL_PINS.iter()
            .map(|&pin| PinState { pin, completed: false })
            .collect();

        Ok(SessionController {
            rules,
            phase: Phase::Intro { line: 0 },
            queue: VecDeque::new(),
            now: 0,
            desk_template,
            level1,
            level2,
            pins,
            cursor: 0,
            tutorial_seen: false,
            feedback: None,
            score: None,
            exit_requested: false,
            events: Vec::new(),
        })
    }

    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Advance the session to `now` (session milliseconds). Time never
    /// runs backwards: an older `now` is treated as the latest seen.
    pub fn tick(&mut self, now: Millis) -> Vec<GameEvent> {
        self.now = self.now.max(now);
        while let Some(intent) = self.queue.pop_front() {
            if self.exit_requested {
                self.queue.clear();
                break;
            }
            if !self.dispatch(intent) {
                debug!(?intent, phase = self.phase.name(), "intent dropped");
            }
        }
        self.update_timers();
        std::mem::take(&mut self.events)
    }

    // ── Dispatch ──

    /// Returns false when the intent means nothing in the current phase.
    fn dispatch(&mut self, intent: Intent) -> bool {
        match (self.phase, intent) {
            (Phase::Intro { line }, Intent::Confirm | Intent::Click { .. }) => {
                self.advance_intro(line);
                true
            }

            (Phase::DeskSearch, _) if self.level1.tutorial_line.is_some() => self.advance_tutorial(intent),
            (Phase::DeskSearch, Intent::Click { x, y }) => {
                self.desk_click(x, y);
                true
            }
            (Phase::DeskSearch, Intent::RequestHint) => {
                self.request_hint(1);
                true
            }

            (Phase::LaptopLogin, Intent::TextChar(c)) => self.type_char(c),
            (Phase::LaptopLogin, Intent::Backspace) => {
                self.level1.password_wrong = false;
                self.level1.password.pop().is_some()
            }
            (Phase::LaptopLogin, Intent::Confirm) => self.submit_password(),
            (Phase::LaptopLogin, Intent::Cancel) => {
                self.level1.password.clear();
                self.level1.password_wrong = false;
                self.enter(Phase::DeskSearch);
                true
            }

            (Phase::LevelComplete | Phase::Level2Complete, Intent::Confirm) => {
                self.feedback = None;
                self.enter(Phase::LevelSelect);
                true
            }
            (Phase::MissionFailed { level, .. }, Intent::Retry) => {
                self.retry(level);
                true
            }
            (Phase::MissionFailed { .. } | Phase::LevelSelect, Intent::Quit) => {
                info!(phase = self.phase.name(), "exit requested");
                self.exit_requested = true;
                true
            }

            (Phase::LevelSelect, Intent::Click { x, y }) => self.select_pin_at(x, y),
            (Phase::LevelSelect, Intent::TextChar(c)) => self.select_pin_digit(c),
            (Phase::LevelSelect, Intent::Confirm) => {
                self.start_selected();
                true
            }

            (Phase::Level2Intro { line }, Intent::Confirm | Intent::Click { .. }) => {
                self.advance_level2_intro(line);
                true
            }

            // Waiting for the quiz: the inbox is closed
            (Phase::Level2Phishing, _) if self.level2.all_classified_at.is_some() => false,
            (Phase::Level2Phishing, Intent::Click { x, y }) => self.inbox_click(x, y),
            (Phase::Level2Phishing, Intent::TextChar(c)) => match c.to_ascii_lowercase() {
                'p' => self.submit_verdict(Verdict::Phishing),
                's' => self.submit_verdict(Verdict::Safe),
                _ => false,
            },
            (Phase::Level2Phishing, Intent::Cancel) => self.level2.selected.take().is_some(),
            (Phase::Level2Phishing, Intent::RequestHint) => {
                self.request_hint(2);
                true
            }

            (Phase::Level2Quiz, Intent::TextChar(c)) => self.answer_quiz(c),
            (Phase::Level2Quiz, Intent::Click { x, y }) => match layout::quiz_choice_hit(x, y) {
                Some(letter) if self.level2.quiz.pending().is_none() => self.answer_quiz(letter),
                _ => self.next_question(),
            },
            (Phase::Level2Quiz, Intent::Confirm) => self.next_question(),

            _ => false,
        }
    }

    fn update_timers(&mut self) {
        let now = self.now;
        match self.phase {
            Phase::DeskSearch | Phase::LaptopLogin => {
                if self.phase == Phase::DeskSearch {
                    self.check_gate();
                }
                if self.level1.clock.map_or(false, |c| c.expired(now)) {
                    self.fail(FailReason::Timeout, 1);
                }
            }
            Phase::Level2Phishing => match self.level2.all_classified_at {
                Some(at) => {
                    if now - at >= self.rules.level2.quiz_delay_ms as Millis {
                        self.feedback = None;
                        self.enter(Phase::Level2Quiz);
                    }
                }
                None => {
                    if self.level2.clock.map_or(false, |c| c.expired(now)) {
                        self.fail(FailReason::Timeout, 2);
                    }
                }
            },
            _ => {}
        }
    }

    // ── Shared helpers ──

    fn enter(&mut self, to: Phase) {
        let from = self.phase;
        self.phase = to;
        info!(from = from.name(), to = to.name(), "phase transition");
    }

    fn say(&mut self, text: impl Into<String>, tone: Tone) {
        self.feedback = Some(Feedback { text: text.into(), tone, at: self.now });
    }

    fn request_hint(&mut self, level: u8) {
        let (hints, clock) = match level {
            1 => (&mut self.level1.hints, self.level1.clock.as_mut()),
            _ => (&mut self.level2.hints, self.level2.clock.as_mut()),
        };
        let max = hints.max();
        match hints.request() {
            Ok(hint) => {
                if let Some(clock) = clock {
                    clock.penalize(hint.penalty_secs);
                }
                info!(level, number = hint.number, max, "hint used");
                self.events.push(GameEvent::HintGiven { number: hint.number });
                self.say(
                    format!("HINT {}/{}: {} (-{}s)", hint.number, max, hint.text, hint.penalty_secs),
                    Tone::Info,
                );
            }
            Err(HintError::Exhausted) => {
                self.events.push(GameEvent::HintsExhausted);
                self.say("No hints left!", Tone::Warning);
            }
        }
    }

    fn fail(&mut self, reason: FailReason, level: u8) {
        let now = self.now;
        let score = if level == 1 {
            if let Some(clock) = self.level1.clock.as_mut() { clock.stop(now); }
            score_level1(&self.level1_stats())
        } else {
            if let Some(clock) = self.level2.clock.as_mut() { clock.stop(now); }
            score_level2(&self.level2_stats())
        };
        info!(level, ?reason, points = score.points, rank = %score.rank, "mission failed");
        self.score = Some(score);
        self.events.push(GameEvent::MissionFailed { level });
        self.say(reason.message(), Tone::Warning);
        self.enter(Phase::MissionFailed { reason, level });
    }

    fn retry(&mut self, level: u8) {
        self.feedback = None;
        self.reset_level(level);
        if level == 1 {
            self.enter(Phase::Intro { line: 0 });
        } else {
            self.enter(Phase::Level2Intro { line: 0 });
        }
    }

    /// Fresh per-level state, clock not started. The intro that follows
    /// shows a clean HUD.
    fn reset_level(&mut self, level: u8) {
        self.score = None;
        if level == 1 {
            self.level1 = Level1State::new(&self.desk_template, &self.rules.level1);
        } else {
            self.level2 = Level2State::new(&self.rules.level2);
        }
    }

    fn mark_completed(&mut self, level: LevelId) {
        if let Some(p) = self.pins.iter_mut().find(|p| p.pin.level == level) {
            p.completed = true;
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Level 1: the messy desk
// ══════════════════════════════════════════════════════════════

impl SessionController {
    fn advance_intro(&mut self, line: usize) {
        self.events.push(GameEvent::DialogueAdvanced);
        if line + 1 < content::INTRO_LINES.len() {
            self.phase = Phase::Intro { line: line + 1 };
            return;
        }
        self.start_level1();
    }

    /// Fresh level-1 state. The clock starts now unless the tutorial is due.
    fn start_level1(&mut self) {
        self.level1 = Level1State::new(&self.desk_template, &self.rules.level1);
        if self.rules.level1.tutorial && !self.tutorial_seen {
            self.level1.tutorial_line = Some(0);
        } else {
            self.level1.clock = Some(MissionClock::start(self.now, self.rules.level1.time_limit_secs));
        }
        self.score = None;
        self.feedback = None;
        self.enter(Phase::DeskSearch);
    }

    fn advance_tutorial(&mut self, intent: Intent) -> bool {
        if !matches!(intent, Intent::Confirm | Intent::Click { .. }) {
            return false;
        }
        let line = self.level1.tutorial_line.unwrap_or(0);
        self.events.push(GameEvent::DialogueAdvanced);
        if line + 1 < content::TUTORIAL_LINES.len() {
            self.level1.tutorial_line = Some(line + 1);
        } else {
            self.level1.tutorial_line = None;
            self.tutorial_seen = true;
            self.level1.clock = Some(MissionClock::start(self.now, self.rules.level1.time_limit_secs));
            info!(limit_secs = self.rules.level1.time_limit_secs, "mission clock started");
        }
        true
    }

    fn desk_click(&mut self, x: i32, y: i32) {
        let hit = self.level1.inventory.hit_test(x, y).map(|item| (item.id, item.role));
        match hit {
            None => {
                let penalty = self.level1.inventory.miss_click();
                self.level1.penalize(penalty);
                debug!(x, y, wrong_clicks = self.level1.inventory.wrong_clicks(), "miss click");
                self.events.push(GameEvent::MissClick { x, y });
                self.say(format!("Nothing there! -{penalty}s"), Tone::Penalty);
            }
            Some((_, ItemRole::Entry)) => {
                self.level1.password.clear();
                self.level1.password_wrong = false;
                self.events.push(GameEvent::LoginOpened);
                let text = if self.level1.has_key {
                    "The laptop is locked. Enter the password."
                } else {
                    "The laptop is locked. Do you know the password?"
                };
                self.say(text, Tone::Info);
                self.enter(Phase::LaptopLogin);
            }
            Some((id, _)) => self.discover(id),
        }
    }

    fn discover(&mut self, id: &'static str) {
        match self.level1.inventory.discover(id, self.now) {
            Ok(out) => {
                debug!(item = out.id, found = self.level1.inventory.found_count(), "item discovered");
                if out.is_decoy {
                    let penalty = self.level1.inventory.decoy_penalty();
                    self.level1.penalize(penalty);
                    self.events.push(GameEvent::DecoyFound { id: out.id });
                    self.say(format!("{} -{penalty}s", out.narrative), Tone::Penalty);
                } else {
                    if out.is_key {
                        self.level1.has_key = true;
                    }
                    self.events.push(GameEvent::ItemFound { id: out.id });
                    self.say(out.narrative, if out.is_key { Tone::Success } else { Tone::Info });
                }
                self.check_gate();
            }
            Err(InventoryError::AlreadyFound(name)) => {
                self.say(format!("Already investigated: {name}"), Tone::Info);
            }
            Err(e) => debug!(%e, "discovery ignored"),
        }
    }

    /// Reveal the sticky note the first time the threshold is met.
    fn check_gate(&mut self) {
        if !self.level1.inventory.update_gate() { return; }
        info!(found = self.level1.inventory.found_excluding_gated(), "sticky note revealed");
        self.events.push(GameEvent::NoteRevealed);
        let text = match self.feedback.take() {
            Some(f) if f.at == self.now => format!("{} {NOTE_REVEALED}", f.text),
            _ => NOTE_REVEALED.to_string(),
        };
        self.say(text, Tone::Success);
    }

    fn type_char(&mut self, c: char) -> bool {
        let l1 = &mut self.level1;
        if !c.is_ascii_alphanumeric() || l1.password.len() >= content::PASSWORD_MAX_LEN {
            return false;
        }
        l1.password.push(c);
        l1.password_wrong = false;
        true
    }

    fn submit_password(&mut self) -> bool {
        if self.level1.password.is_empty() { return false; }

        if self.level1.password.eq_ignore_ascii_case(content::PASSWORD) {
            self.complete_level1();
            return true;
        }

        let left = self.level1.attempts.consume();
        self.level1.password.clear();
        self.level1.password_wrong = true;
        debug!(attempts_left = left, "password rejected");
        self.events.push(GameEvent::PasswordRejected { attempts_left: left });
        if left == 0 {
            self.fail(FailReason::AttemptsExhausted, 1);
        } else {
            self.say(format!("WRONG PASSWORD! {left} attempt(s) left"), Tone::Penalty);
        }
        true
    }

    fn complete_level1(&mut self) {
        let now = self.now;
        if let Some(clock) = self.level1.clock.as_mut() {
            clock.stop(now);
        }
        let score = score_level1(&self.level1_stats());
        info!(points = score.points, rank = %score.rank, "level 1 complete");
        self.score = Some(score);
        self.mark_completed(LevelId::MessyDesk);
        self.events.push(GameEvent::LevelCleared { level: 1 });
        self.say("ACCESS GRANTED! Evidence secured.", Tone::Success);
        self.enter(Phase::LevelComplete);
    }

    fn level1_stats(&self) -> Level1Stats {
        let l1 = &self.level1;
        let (remaining_secs, elapsed_secs) = match l1.clock {
            Some(c) => (c.remaining_secs(self.now), c.elapsed_secs(self.now)),
            None => (self.rules.level1.time_limit_secs, 0),
        };
        Level1Stats {
            remaining_secs,
            wrong_clicks: l1.inventory.wrong_clicks(),
            total_objects: l1.inventory.len() as u32,
            hints_used: l1.hints.used(),
            attempts_used: l1.attempts.used(),
            elapsed_secs,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Level select
// ══════════════════════════════════════════════════════════════

impl SessionController {
    fn select_pin_at(&mut self, x: i32, y: i32) -> bool {
        match self.pins.iter().position(|p| p.pin.region.contains(x, y)) {
            Some(i) => {
                self.move_cursor(i);
                true
            }
            None => false,
        }
    }

    fn select_pin_digit(&mut self, c: char) -> bool {
        match c.to_digit(10) {
            Some(d) if d >= 1 && (d as usize) <= self.pins.len() => {
                self.move_cursor(d as usize - 1);
                true
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, index: usize) {
        self.cursor = index;
        let pin = self.pins[index].pin;
        if pin.unlocked {
            self.say(format!("{}: press Enter to start", pin.name), Tone::Info);
        } else {
            self.say(format!("Locked: {}", pin.name), Tone::Warning);
        }
    }

    fn start_selected(&mut self) {
        let pin = self.pins[self.cursor].pin;
        match pin.level {
            LevelId::MessyDesk if pin.unlocked => {
                self.feedback = None;
                self.reset_level(1);
                self.enter(Phase::Intro { line: 0 });
            }
            LevelId::PhishingLab if pin.unlocked => {
                self.feedback = None;
                self.reset_level(2);
                self.enter(Phase::Level2Intro { line: 0 });
            }
            _ => self.say(format!("Locked: {}", pin.name), Tone::Warning),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Level 2: the phishing lab
// ══════════════════════════════════════════════════════════════

impl SessionController {
    fn advance_level2_intro(&mut self, line: usize) {
        self.events.push(GameEvent::DialogueAdvanced);
        if line + 1 < content::LEVEL2_INTRO_LINES.len() {
            self.phase = Phase::Level2Intro { line: line + 1 };
            return;
        }
        self.level2 = Level2State::new(&self.rules.level2);
        self.level2.clock = Some(MissionClock::start(self.now, self.rules.level2.time_limit_secs));
        self.score = None;
        self.feedback = None;
        self.enter(Phase::Level2Phishing);
    }

    fn inbox_click(&mut self, x: i32, y: i32) -> bool {
        if let Some(index) = layout::inbox_hit(x, y, self.level2.inbox.len()) {
            debug!(email = index, "email opened");
            self.level2.selected = Some(index);
            return true;
        }
        if self.level2.selected.is_none() { return false; }
        if let Some(kind) = layout::probe_hit(x, y) {
            self.probe(kind);
            return true;
        }
        match layout::verdict_hit(x, y) {
            Some(verdict) => self.submit_verdict(verdict),
            None => false,
        }
    }

    fn probe(&mut self, kind: ElementKind) {
        let Some(index) = self.level2.selected else { return };
        let Some(email) = self.level2.inbox.get(index) else { return };
        match classify(email).into_iter().find(|el| el.kind == kind) {
            Some(element) => {
                if self.level2.spotted.insert((index, kind)) {
                    debug!(email = index, ?kind, "element spotted");
                    self.events.push(GameEvent::ElementSpotted { email: index, kind });
                }
                self.say(format!("{}: {}", kind.label(), element.explanation), Tone::Success);
            }
            None => self.say(format!("{}: nothing suspicious here.", kind.label()), Tone::Info),
        }
    }

    fn submit_verdict(&mut self, verdict: Verdict) -> bool {
        let Some(index) = self.level2.selected else {
            self.say("Open an email first.", Tone::Info);
            return true;
        };
        match self.level2.inbox.submit_verdict(index, verdict) {
            Ok(outcome) => {
                debug!(email = index, verdict = verdict.label(), correct = outcome.correct, "verdict");
                if outcome.correct {
                    self.events.push(GameEvent::VerdictCorrect { email: index });
                    self.say(format!("Correct! Marked as {}.", verdict.label()), Tone::Success);
                } else {
                    let penalty = self.rules.level2.wrong_verdict_penalty_secs;
                    if let Some(clock) = self.level2.clock.as_mut() {
                        clock.penalize(penalty);
                    }
                    let actual = if verdict == Verdict::Phishing { Verdict::Safe } else { Verdict::Phishing };
                    self.events.push(GameEvent::VerdictWrong { email: index });
                    self.say(format!("Wrong! That email was {}. -{penalty}s", actual.label()), Tone::Penalty);
                }
                if self.level2.inbox.all_classified() {
                    self.finish_inbox();
                }
                true
            }
            Err(VerdictError::AlreadyClassified) => {
                self.say("Already classified", Tone::Info);
                true
            }
            Err(e) => {
                debug!(%e, "verdict ignored");
                false
            }
        }
    }

    /// Freeze the clock; the quiz starts after the configured delay.
    fn finish_inbox(&mut self) {
        let now = self.now;
        if let Some(clock) = self.level2.clock.as_mut() {
            clock.stop(now);
        }
        self.level2.all_classified_at = Some(now);
        self.level2.selected = None;
        info!(
            correct = self.level2.inbox.correct_count(),
            total = self.level2.inbox.len(),
            "inbox classified",
        );
    }

    fn answer_quiz(&mut self, choice: char) -> bool {
        match self.level2.quiz.answer(choice) {
            Ok(outcome) => {
                debug!(question = self.level2.quiz.index(), correct = outcome.correct, "quiz answer");
                if outcome.correct {
                    self.events.push(GameEvent::QuizCorrect);
                    self.say("Correct!", Tone::Success);
                } else {
                    self.events.push(GameEvent::QuizWrong);
                    self.say(format!("Wrong! The answer was {}.", outcome.answer), Tone::Penalty);
                }
                true
            }
            Err(_) => false,
        }
    }

    fn next_question(&mut self) -> bool {
        if !self.level2.quiz.advance() { return false; }
        self.feedback = None;
        if self.level2.quiz.is_finished() {
            self.complete_level2();
        }
        true
    }

    fn complete_level2(&mut self) {
        let score = score_level2(&self.level2_stats());
        info!(points = score.points, rank = %score.rank, "level 2 complete");
        self.score = Some(score);
        self.mark_completed(LevelId::PhishingLab);
        self.events.push(GameEvent::LevelCleared { level: 2 });
        self.say("Phishing campaign neutralised!", Tone::Success);
        self.enter(Phase::Level2Complete);
    }

    fn level2_stats(&self) -> Level2Stats {
        let l2 = &self.level2;
        Level2Stats {
            correct: l2.inbox.correct_count() as u32,
            total_emails: l2.inbox.len() as u32,
            remaining_secs: l2.clock.map_or(0, |c| c.remaining_secs(self.now)),
            quiz_score: l2.quiz.score(),
            quiz_total: l2.quiz.total(),
            all_elements_found: l2.all_elements_found(),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Snapshot
// ══════════════════════════════════════════════════════════════

impl SessionController {
    pub fn snapshot(&self, now: Millis) -> Snapshot {
        let now = now.max(self.now);
        let l1 = &self.level1;
        let l2 = &self.level2;

        let dialogue = match self.phase {
            Phase::Intro { line } => dialogue_line(content::INTRO_LINES, line),
            Phase::Level2Intro { line } => dialogue_line(content::LEVEL2_INTRO_LINES, line),
            _ => None,
        };
        let tutorial = match (self.phase, l1.tutorial_line) {
            (Phase::DeskSearch, Some(line)) => dialogue_line(content::TUTORIAL_LINES, line),
            _ => None,
        };

        let (timer, hints) = match self.phase.level() {
            Some(1) => (
                Some(timer_view(l1.clock, self.rules.level1.time_limit_secs, now)),
                Some(hint_view(&l1.hints)),
            ),
            Some(_) => (
                Some(timer_view(l2.clock, self.rules.level2.time_limit_secs, now)),
                Some(hint_view(&l2.hints)),
            ),
            None => (None, None),
        };

        let desk = DeskView {
            items: l1.inventory.items().iter()
                .map(|i| ItemView {
                    id: i.id,
                    name: i.name,
                    region: i.region,
                    role: i.role,
                    found: i.is_found(),
                    visible: l1.inventory.is_visible(i.id),
                })
                .collect(),
            found: l1.inventory.found_count(),
            total: l1.inventory.len(),
            wrong_clicks: l1.inventory.wrong_clicks(),
            has_key: l1.has_key,
        };

        let login = LoginView {
            masked_len: l1.password.len(),
            wrong: l1.password_wrong,
            attempts_left: l1.attempts.left(),
            attempts_max: l1.attempts.max(),
        };

        let selected = l2.selected.and_then(|index| {
            let email = l2.inbox.get(index)?;
            let spotted = classify(email).into_iter()
                .filter(|el| l2.spotted.contains(&(index, el.kind)))
                .collect();
            Some(InspectView { index, spotted })
        });
        let inbox = InboxView {
            emails: l2.inbox.emails().iter()
                .map(|e| EmailView {
                    sender: e.sender,
                    subject: e.subject,
                    body: e.body,
                    classified_as: e.classified_as,
                    correct: e.is_correct(),
                })
                .collect(),
            selected,
            classified: l2.inbox.classified_count(),
            correct: l2.inbox.correct_count(),
            done: l2.all_classified_at.is_some(),
        };

        let quiz = l2.quiz.current().map(|q| QuizView {
            index: l2.quiz.index(),
            total: l2.quiz.total(),
            score: l2.quiz.score(),
            prompt: q.prompt,
            choices: q.choices,
            answered: l2.quiz.pending(),
            explanation: q.explanation,
        });

        let map = MapView {
            pins: self.pins.iter()
                .map(|p| PinView {
                    name: p.pin.name,
                    region: p.pin.region,
                    unlocked: p.pin.unlocked,
                    completed: p.completed,
                })
                .collect(),
            cursor: self.cursor,
        };

        Snapshot {
            now,
            phase: self.phase,
            dialogue,
            tutorial,
            timer,
            hints,
            desk,
            login,
            inbox,
            quiz,
            map,
            feedback: self.feedback.clone(),
            feedback_ms: self.rules.feedback_ms,
            score: if self.phase.is_terminal() { self.score } else { None },
        }
    }
}

fn dialogue_line(lines: &'static [&'static str], index: usize) -> Option<DialogueView> {
    lines.get(index).map(|&text| DialogueView { text, index, total: lines.len() })
}

/// An unstarted clock reports the full limit.
fn timer_view(clock: Option<MissionClock>, limit_secs: u32, now: Millis) -> TimerView {
    match clock {
        Some(c) => TimerView {
            remaining_secs: c.remaining_secs(now),
            elapsed_secs: c.elapsed_secs(now),
            limit_secs: c.limit_secs(),
            running: !c.is_stopped(),
        },
        None => TimerView { remaining_secs: limit_secs, elapsed_secs: 0, limit_secs, running: false },
    }
}

fn hint_view(hints: &HintEconomy) -> HintView {
    HintView { last: hints.last(), remaining: hints.remaining(), max: hints.max() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::score::Rank;

    fn rules() -> RulesConfig {
        let mut r = RulesConfig::default();
        r.level1.tutorial = false;
        r
    }

    fn controller(rules: RulesConfig) -> SessionController {
        SessionController::new(rules).unwrap()
    }

    fn run(ctl: &mut SessionController, intents: &[Intent], now: Millis) -> Vec<GameEvent> {
        for &i in intents {
            ctl.push(i);
        }
        ctl.tick(now)
    }

    fn confirms(n: usize) -> Vec<Intent> {
        vec![Intent::Confirm; n]
    }

    fn click_on(region: crate::domain::inventory::Region) -> Intent {
        Intent::Click { x: region.x + region.w / 2, y: region.y + region.h / 2 }
    }

    fn item(id: &str) -> Intent {
        let items = content::desk_items();
        let it = items.iter().find(|i| i.id == id).unwrap();
        click_on(it.region)
    }

    fn type_text(ctl: &mut SessionController, text: &str, now: Millis) {
        for c in text.chars() {
            ctl.push(Intent::TextChar(c));
        }
        ctl.push(Intent::Confirm);
        ctl.tick(now);
    }

    /// Intro lines, no tutorial: lands in DeskSearch with the clock at `now`.
    fn desk(now: Millis) -> SessionController {
        let mut ctl = controller(rules());
        run(&mut ctl, &confirms(content::INTRO_LINES.len()), now);
        assert_eq!(ctl.phase(), Phase::DeskSearch);
        ctl
    }

    fn to_level_select() -> SessionController {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop")], 0);
        type_text(&mut ctl, "admin123", 0);
        run(&mut ctl, &[Intent::Confirm], 0);
        assert_eq!(ctl.phase(), Phase::LevelSelect);
        ctl
    }

    fn phishing_lab(now: Millis) -> SessionController {
        let mut ctl = to_level_select();
        run(&mut ctl, &[Intent::TextChar('2'), Intent::Confirm], now);
        assert_eq!(ctl.phase(), Phase::Level2Intro { line: 0 });
        run(&mut ctl, &confirms(content::LEVEL2_INTRO_LINES.len()), now);
        assert_eq!(ctl.phase(), Phase::Level2Phishing);
        ctl
    }

    fn classify_email(ctl: &mut SessionController, index: usize, phishing: bool, now: Millis) -> Vec<GameEvent> {
        let key = if phishing { 'p' } else { 's' };
        run(ctl, &[click_on(layout::inbox_row(index)), Intent::TextChar(key)], now)
    }

    fn classify_all_correctly(ctl: &mut SessionController, now: Millis) {
        for (i, e) in content::inbox_emails().iter().enumerate() {
            classify_email(ctl, i, e.is_phishing, now);
        }
    }

    // ── Level 1 ──

    #[test]
    fn intro_advances_line_by_line() {
        let mut ctl = controller(rules());
        let events = run(&mut ctl, &[Intent::Confirm, Intent::Click { x: 0, y: 0 }], 0);
        assert_eq!(ctl.phase(), Phase::Intro { line: 2 });
        assert_eq!(events, vec![GameEvent::DialogueAdvanced; 2]);
        let snap = ctl.snapshot(0);
        assert_eq!(snap.dialogue.unwrap().text, content::INTRO_LINES[2]);
        assert_eq!(snap.timer.unwrap().remaining_secs, 90);
    }

    #[test]
    fn sticky_note_scenario_ends_in_lockout() {
        let mut ctl = desk(0);
        let note_hidden = |ctl: &SessionController| {
            !ctl.snapshot(0).desk.items.iter().find(|i| i.id == content::GATED_ITEM).unwrap().visible
        };

        run(&mut ctl, &[item("coffee-mug"), item("papers")], 1_000);
        assert!(note_hidden(&ctl));
        // Hidden note is not clickable: the click is a miss.
        let events = run(&mut ctl, &[item(content::GATED_ITEM)], 1_500);
        assert!(matches!(events[0], GameEvent::MissClick { .. }));

        let events = run(&mut ctl, &[item("smartphone")], 2_000);
        assert!(events.contains(&GameEvent::NoteRevealed));
        assert!(!note_hidden(&ctl));

        run(&mut ctl, &[item(content::GATED_ITEM)], 3_000);
        assert!(ctl.snapshot(3_000).desk.has_key);

        let events = run(&mut ctl, &[item("laptop")], 4_000);
        assert_eq!(events, vec![GameEvent::LoginOpened]);
        assert_eq!(ctl.phase(), Phase::LaptopLogin);

        type_text(&mut ctl, "letmein", 5_000);
        type_text(&mut ctl, "password", 6_000);
        assert_eq!(ctl.snapshot(6_000).login.attempts_left, 1);
        assert_eq!(ctl.snapshot(6_000).feedback.unwrap().text, "WRONG PASSWORD! 1 attempt(s) left");
        type_text(&mut ctl, "hunter2", 7_000);

        assert_eq!(
            ctl.phase(),
            Phase::MissionFailed { reason: FailReason::AttemptsExhausted, level: 1 }
        );
        let snap = ctl.snapshot(7_000);
        assert_eq!(snap.login.attempts_left, 0);
        assert!(snap.score.is_some());
    }

    #[test]
    fn correct_password_is_case_insensitive_and_scores_once() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop")], 10_000);
        type_text(&mut ctl, "ADMIN123", 20_000);
        assert_eq!(ctl.phase(), Phase::LevelComplete);

        // 70*10 + 9*50 + 500
        let snap = ctl.snapshot(60_000);
        assert_eq!(snap.score.unwrap().points, 1650);
        assert_eq!(snap.score.unwrap().rank, Rank::S);
        assert_eq!(snap.timer.unwrap().remaining_secs, 70, "clock frozen at completion");
        assert!(snap.map.pins[0].completed);

        run(&mut ctl, &[Intent::Confirm], 61_000);
        assert_eq!(ctl.phase(), Phase::LevelSelect);
        assert!(ctl.snapshot(61_000).score.is_none());
    }

    #[test]
    fn password_field_accepts_alphanumerics_only() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop")], 0);
        for c in ['a', '!', ' ', '1'] {
            ctl.push(Intent::TextChar(c));
        }
        ctl.tick(0);
        assert_eq!(ctl.snapshot(0).login.masked_len, 2);
        run(&mut ctl, &[Intent::Backspace], 0);
        assert_eq!(ctl.snapshot(0).login.masked_len, 1);
        for _ in 0..30 {
            ctl.push(Intent::TextChar('x'));
        }
        ctl.tick(0);
        assert_eq!(ctl.snapshot(0).login.masked_len, content::PASSWORD_MAX_LEN);
    }

    #[test]
    fn empty_submission_costs_nothing() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop"), Intent::Confirm], 0);
        assert_eq!(ctl.snapshot(0).login.attempts_left, 3);
    }

    #[test]
    fn cancel_login_keeps_attempts() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop")], 0);
        type_text(&mut ctl, "guess", 0);
        run(&mut ctl, &[Intent::Cancel], 0);
        assert_eq!(ctl.phase(), Phase::DeskSearch);
        let snap = ctl.snapshot(0);
        assert_eq!(snap.login.attempts_left, 2);
        assert_eq!(snap.login.masked_len, 0);
    }

    #[test]
    fn miss_click_and_decoy_cost_time() {
        let mut ctl = desk(0);
        run(&mut ctl, &[Intent::Click { x: 30, y: 4 }], 0);
        let snap = ctl.snapshot(0);
        assert_eq!(snap.timer.unwrap().remaining_secs, 87);
        assert_eq!(snap.desk.wrong_clicks, 1);

        let events = run(&mut ctl, &[item("usb-drive")], 0);
        assert_eq!(events, vec![GameEvent::DecoyFound { id: "usb-drive" }]);
        assert_eq!(ctl.snapshot(0).timer.unwrap().remaining_secs, 82);
        assert_eq!(ctl.snapshot(0).feedback.unwrap().tone, Tone::Penalty);
    }

    #[test]
    fn repeat_discovery_is_cosmetic() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("coffee-mug")], 0);
        let events = run(&mut ctl, &[item("coffee-mug")], 500);
        assert!(events.is_empty());
        let snap = ctl.snapshot(500);
        assert_eq!(snap.desk.found, 1);
        assert_eq!(snap.feedback.unwrap().text, "Already investigated: Coffee Mug");
        assert_eq!(snap.timer.unwrap().remaining_secs, 90);
    }

    #[test]
    fn timeout_fails_and_freezes_the_desk() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("coffee-mug")], 1_000);
        let events = ctl.tick(90_000);
        assert_eq!(events, vec![GameEvent::MissionFailed { level: 1 }]);
        assert_eq!(ctl.phase(), Phase::MissionFailed { reason: FailReason::Timeout, level: 1 });

        let before = ctl.snapshot(90_000);
        let events = run(&mut ctl, &[item("papers"), Intent::RequestHint, Intent::Click { x: 1, y: 1 }], 91_000);
        assert!(events.is_empty());
        let after = ctl.snapshot(91_000);
        assert_eq!(before.desk, after.desk);
        assert_eq!(before.timer.unwrap().remaining_secs, after.timer.unwrap().remaining_secs);
        assert_eq!(before.hints, after.hints);
    }

    #[test]
    fn timeout_during_login_also_fails() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("laptop")], 1_000);
        ctl.tick(95_000);
        assert_eq!(ctl.phase(), Phase::MissionFailed { reason: FailReason::Timeout, level: 1 });
    }

    #[test]
    fn hints_escalate_then_run_out() {
        let mut ctl = desk(0);
        let mut texts = vec![];
        for n in 1..=3 {
            let events = run(&mut ctl, &[Intent::RequestHint], 0);
            assert_eq!(events, vec![GameEvent::HintGiven { number: n }]);
            texts.push(ctl.snapshot(0).hints.unwrap().last.unwrap());
        }
        assert_eq!(texts, content::LEVEL1_HINTS.to_vec());
        assert_eq!(ctl.snapshot(0).timer.unwrap().remaining_secs, 60);

        let events = run(&mut ctl, &[Intent::RequestHint], 0);
        assert_eq!(events, vec![GameEvent::HintsExhausted]);
        let snap = ctl.snapshot(0);
        assert_eq!(snap.feedback.unwrap().text, "No hints left!");
        assert_eq!(snap.timer.unwrap().remaining_secs, 60);
        assert_eq!(snap.hints.unwrap().remaining, 0);
    }

    #[test]
    fn out_of_phase_intents_are_ignored() {
        let mut ctl = desk(0);
        let before = ctl.snapshot(0);
        let events = run(
            &mut ctl,
            &[Intent::TextChar('a'), Intent::Backspace, Intent::Retry, Intent::Quit, Intent::Confirm],
            0,
        );
        assert!(events.is_empty());
        assert_eq!(ctl.snapshot(0), before);
        assert!(!ctl.exit_requested());
    }

    #[test]
    fn tutorial_holds_the_clock_and_shows_once() {
        let mut ctl = controller(RulesConfig::default());
        run(&mut ctl, &confirms(content::INTRO_LINES.len()), 0);
        assert_eq!(ctl.phase(), Phase::DeskSearch);

        // Clicks while the overlay is up advance it, never search the desk.
        run(&mut ctl, &[item("coffee-mug")], 10_000);
        let snap = ctl.snapshot(10_000);
        assert_eq!(snap.tutorial.unwrap().index, 1);
        assert_eq!(snap.desk.found, 0);
        assert_eq!(snap.timer.unwrap().remaining_secs, 90);
        assert!(!snap.timer.unwrap().running);
        // Hints are not available yet.
        assert!(run(&mut ctl, &[Intent::RequestHint], 10_000).is_empty());

        run(&mut ctl, &confirms(2), 20_000);
        assert!(ctl.snapshot(20_000).tutorial.is_none());
        assert_eq!(ctl.snapshot(30_000).timer.unwrap().remaining_secs, 80);

        // Fail, retry: straight to the desk after the intro.
        ctl.tick(200_000);
        run(&mut ctl, &[Intent::Retry], 200_000);
        assert_eq!(ctl.phase(), Phase::Intro { line: 0 });
        run(&mut ctl, &confirms(content::INTRO_LINES.len()), 200_000);
        let snap = ctl.snapshot(200_000);
        assert!(snap.tutorial.is_none());
        assert!(snap.timer.unwrap().running);
    }

    #[test]
    fn retry_resets_the_level() {
        let mut ctl = desk(0);
        run(&mut ctl, &[item("coffee-mug"), item("laptop")], 0);
        for _ in 0..3 {
            type_text(&mut ctl, "nope", 0);
        }
        assert!(ctl.phase().is_terminal());
        run(&mut ctl, &[Intent::Retry], 0);
        run(&mut ctl, &confirms(content::INTRO_LINES.len()), 5_000);
        let snap = ctl.snapshot(5_000);
        assert_eq!(snap.desk.found, 0);
        assert_eq!(snap.login.attempts_left, 3);
        assert_eq!(snap.timer.unwrap().remaining_secs, 90);
        assert!(snap.score.is_none());
    }

    #[test]
    fn retry_clears_the_hud_before_the_intro() {
        let mut ctl = desk(0);
        run(&mut ctl, &[Intent::RequestHint, Intent::Click { x: 30, y: 4 }], 1_000);
        ctl.tick(100_000);
        assert!(matches!(ctl.phase(), Phase::MissionFailed { .. }));

        run(&mut ctl, &[Intent::Retry], 113_000);
        assert_eq!(ctl.phase(), Phase::Intro { line: 0 });
        let snap = ctl.snapshot(113_000);
        let timer = snap.timer.unwrap();
        assert_eq!(timer.remaining_secs, 90);
        assert_eq!(timer.elapsed_secs, 0);
        assert!(!timer.running);
        let hints = snap.hints.unwrap();
        assert_eq!(hints.last, None);
        assert_eq!(hints.remaining, 3);
        assert_eq!(snap.desk.wrong_clicks, 0);
        assert_eq!(snap.desk.found, 0);
        assert!(snap.score.is_none());
    }

    #[test]
    fn replaying_from_the_map_starts_clean() {
        let mut ctl = desk(0);
        run(&mut ctl, &[Intent::RequestHint, item("coffee-mug"), item("laptop")], 0);
        type_text(&mut ctl, "admin123", 2_000);
        run(&mut ctl, &[Intent::Confirm], 2_000);
        assert_eq!(ctl.phase(), Phase::LevelSelect);

        run(&mut ctl, &[Intent::TextChar('1'), Intent::Confirm], 3_000);
        assert_eq!(ctl.phase(), Phase::Intro { line: 0 });
        let snap = ctl.snapshot(3_000);
        assert_eq!(snap.desk.found, 0);
        assert!(!snap.desk.has_key);
        assert_eq!(snap.hints.unwrap().remaining, 3);
        assert_eq!(snap.timer.unwrap().remaining_secs, 90);
    }

    #[test]
    fn level2_retry_clears_the_inbox() {
        let mut ctl = phishing_lab(0);
        classify_email(&mut ctl, 0, true, 1_000);
        ctl.tick(61_000);
        assert_eq!(ctl.phase(), Phase::MissionFailed { reason: FailReason::Timeout, level: 2 });

        run(&mut ctl, &[Intent::Retry], 62_000);
        assert_eq!(ctl.phase(), Phase::Level2Intro { line: 0 });
        let snap = ctl.snapshot(62_000);
        assert_eq!(snap.inbox.classified, 0);
        assert!(snap.inbox.emails.iter().all(|e| e.classified_as.is_none()));
        assert_eq!(snap.timer.unwrap().remaining_secs, 60);
    }

    #[test]
    fn quit_from_failure_requests_exit() {
        let mut ctl = desk(0);
        ctl.tick(100_000);
        run(&mut ctl, &[Intent::Quit, Intent::Retry], 100_000);
        assert!(ctl.exit_requested());
        assert!(ctl.phase().is_terminal());
    }

    // ── Level select ──

    #[test]
    fn locked_pins_refuse_to_start() {
        let mut ctl = to_level_select();
        run(&mut ctl, &[Intent::TextChar('4'), Intent::Confirm], 0);
        assert_eq!(ctl.phase(), Phase::LevelSelect);
        let snap = ctl.snapshot(0);
        assert_eq!(snap.map.cursor, 3);
        assert_eq!(snap.feedback.unwrap().text, "Locked: CEO's Office");

        run(&mut ctl, &[click_on(content::LEVEL_PINS[0].region), Intent::Confirm], 0);
        assert_eq!(ctl.phase(), Phase::Intro { line: 0 });
    }

    #[test]
    fn quit_from_map() {
        let mut ctl = to_level_select();
        run(&mut ctl, &[Intent::Quit], 0);
        assert!(ctl.exit_requested());
    }

    // ── Level 2 ──

    #[test]
    fn perfect_phishing_lab_ranks_s() {
        let mut ctl = phishing_lab(0);
        classify_all_correctly(&mut ctl, 20_000);
        let snap = ctl.snapshot(20_000);
        assert!(snap.inbox.done);
        assert_eq!(snap.inbox.correct, 5);

        // Delay before the quiz; the clock is already frozen.
        ctl.tick(21_000);
        assert_eq!(ctl.phase(), Phase::Level2Phishing);
        ctl.tick(21_500);
        assert_eq!(ctl.phase(), Phase::Level2Quiz);

        for q in content::QUIZ {
            let events = run(&mut ctl, &[Intent::TextChar(q.answer.to_ascii_lowercase())], 30_000);
            assert_eq!(events, vec![GameEvent::QuizCorrect]);
            run(&mut ctl, &[Intent::Confirm], 30_000);
        }
        assert_eq!(ctl.phase(), Phase::Level2Complete);

        let score = ctl.snapshot(30_000).score.unwrap();
        assert_eq!(score.points, 5 * 200 + 40 * 5 + 4 * 100);
        assert_eq!(score.rank, Rank::S);
        assert!(ctl.snapshot(30_000).map.pins[1].completed);
    }

    #[test]
    fn probing_every_element_earns_thoroughness() {
        let mut ctl = phishing_lab(0);
        let mut spotted = 0;
        for (i, e) in content::inbox_emails().iter().enumerate() {
            run(&mut ctl, &[click_on(layout::inbox_row(i))], 1_000);
            for kind in ElementKind::ALL {
                let events = run(&mut ctl, &[click_on(layout::probe_button(kind))], 1_000);
                spotted += events.iter().filter(|ev| matches!(ev, GameEvent::ElementSpotted { .. })).count();
            }
            let verdict = if e.is_phishing { Verdict::Phishing } else { Verdict::Safe };
            run(&mut ctl, &[click_on(layout::verdict_button(verdict))], 1_000);
        }
        assert_eq!(spotted, 8);
        ctl.tick(10_000);
        for q in content::QUIZ {
            run(&mut ctl, &[Intent::TextChar(q.answer), Intent::Confirm], 10_000);
        }
        // 1000 + 59*5 + 400 + 500
        assert_eq!(ctl.snapshot(10_000).score.unwrap().points, 2195);
    }

    #[test]
    fn inspected_email_lists_only_spotted_elements() {
        let mut ctl = phishing_lab(0);
        run(&mut ctl, &[click_on(layout::inbox_row(0))], 0);
        assert!(ctl.snapshot(0).inbox.selected.unwrap().spotted.is_empty());
        run(&mut ctl, &[click_on(layout::probe_button(ElementKind::Link))], 0);
        let inspect = ctl.snapshot(0).inbox.selected.unwrap();
        assert_eq!(inspect.index, 0);
        assert_eq!(inspect.spotted.len(), 1);
        assert_eq!(inspect.spotted[0].kind, ElementKind::Link);

        // Safe email: probes find nothing.
        run(&mut ctl, &[click_on(layout::inbox_row(1)), click_on(layout::probe_button(ElementKind::Sender))], 0);
        assert!(ctl.snapshot(0).feedback.unwrap().text.contains("nothing suspicious"));

        run(&mut ctl, &[Intent::Cancel], 0);
        assert!(ctl.snapshot(0).inbox.selected.is_none());
    }

    #[test]
    fn wrong_verdict_costs_time_and_repeats_are_ignored() {
        let mut ctl = phishing_lab(0);
        let events = classify_email(&mut ctl, 0, false, 0);
        assert_eq!(events, vec![GameEvent::VerdictWrong { email: 0 }]);
        assert_eq!(ctl.snapshot(0).timer.unwrap().remaining_secs, 55);

        let events = run(&mut ctl, &[Intent::TextChar('p')], 0);
        assert!(events.is_empty());
        let snap = ctl.snapshot(0);
        assert_eq!(snap.feedback.unwrap().text, "Already classified");
        assert_eq!(snap.inbox.emails[0].classified_as, Some(Verdict::Safe));
        assert_eq!(snap.inbox.emails[0].correct, Some(false));
        assert_eq!(snap.timer.unwrap().remaining_secs, 55);
    }

    #[test]
    fn verdict_without_selection_is_harmless() {
        let mut ctl = phishing_lab(0);
        run(&mut ctl, &[Intent::TextChar('s')], 0);
        assert_eq!(ctl.snapshot(0).inbox.classified, 0);
    }

    #[test]
    fn level2_timeout_and_retry() {
        let mut ctl = phishing_lab(0);
        classify_email(&mut ctl, 0, true, 1_000);
        ctl.tick(60_000);
        assert_eq!(ctl.phase(), Phase::MissionFailed { reason: FailReason::Timeout, level: 2 });

        run(&mut ctl, &[Intent::Retry], 61_000);
        assert_eq!(ctl.phase(), Phase::Level2Intro { line: 0 });
        run(&mut ctl, &confirms(content::LEVEL2_INTRO_LINES.len()), 62_000);
        let snap = ctl.snapshot(62_000);
        assert_eq!(snap.inbox.classified, 0);
        assert_eq!(snap.timer.unwrap().remaining_secs, 60);
    }

    #[test]
    fn quiz_needs_an_answer_before_moving_on() {
        let mut ctl = phishing_lab(0);
        classify_all_correctly(&mut ctl, 0);
        ctl.tick(5_000);
        assert_eq!(ctl.phase(), Phase::Level2Quiz);

        assert!(run(&mut ctl, &[Intent::Confirm], 5_000).is_empty());
        assert_eq!(ctl.snapshot(5_000).quiz.unwrap().index, 0);

        let events = run(&mut ctl, &[Intent::TextChar('a'), Intent::TextChar('c')], 5_000);
        assert_eq!(events, vec![GameEvent::QuizWrong]);
        let quiz = ctl.snapshot(5_000).quiz.unwrap();
        assert_eq!(quiz.score, 0);
        assert_eq!(quiz.answered.unwrap().answer, 'C');

        run(&mut ctl, &[Intent::Confirm], 5_000);
        assert_eq!(ctl.snapshot(5_000).quiz.unwrap().index, 1);
    }

    #[test]
    fn level2_hints_are_separate() {
        let mut ctl = phishing_lab(0);
        run(&mut ctl, &[Intent::RequestHint, Intent::RequestHint], 0);
        let events = run(&mut ctl, &[Intent::RequestHint], 0);
        assert_eq!(events, vec![GameEvent::HintsExhausted]);
        assert_eq!(ctl.snapshot(0).timer.unwrap().remaining_secs, 40);
    }
}
