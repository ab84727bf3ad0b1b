/// Read-only view of the session, rebuilt after every tick.
///
/// Everything here is owned. The renderer gets a value it can keep for the
/// whole frame without holding a borrow into the live controller.

use crate::domain::classifier::{PhishingElement, Verdict};
use crate::domain::clock::Millis;
use crate::domain::inventory::{ItemRole, Region};
use crate::domain::quiz::QuizOutcome;
use crate::domain::score::ScoreResult;

use super::session::Phase;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Penalty,
}

/// Player-facing message. `at` lets the renderer fade it out.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
    pub at: Millis,
}

impl Feedback {
    pub fn visible(&self, now: Millis, ttl_ms: u64) -> bool {
        now - self.at < ttl_ms as Millis
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DialogueView {
    pub text: &'static str,
    pub index: usize,
    pub total: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerView {
    pub remaining_secs: u32,
    pub elapsed_secs: u32,
    pub limit_secs: u32,
    /// False before the clock starts and after it stops.
    pub running: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ItemView {
    pub id: &'static str,
    pub name: &'static str,
    pub region: Region,
    pub role: ItemRole,
    pub found: bool,
    pub visible: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeskView {
    pub items: Vec<ItemView>,
    pub found: usize,
    pub total: usize,
    pub wrong_clicks: u32,
    pub has_key: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LoginView {
    /// Characters typed so far; the text itself is never exposed.
    pub masked_len: usize,
    pub wrong: bool,
    pub attempts_left: u32,
    pub attempts_max: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct HintView {
    pub last: Option<&'static str>,
    pub remaining: u32,
    pub max: u32,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EmailView {
    pub sender: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
    pub classified_as: Option<Verdict>,
    pub correct: Option<bool>,
}

/// The email under inspection. Only elements the player has probed are
/// listed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InspectView {
    pub index: usize,
    pub spotted: Vec<PhishingElement>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InboxView {
    pub emails: Vec<EmailView>,
    pub selected: Option<InspectView>,
    pub classified: usize,
    pub correct: usize,
    /// All verdicts are in; the quiz is about to start.
    pub done: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QuizView {
    pub index: usize,
    pub total: u32,
    pub score: u32,
    pub prompt: &'static str,
    pub choices: [&'static str; 4],
    pub answered: Option<QuizOutcome>,
    pub explanation: [&'static str; 3],
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PinView {
    pub name: &'static str,
    pub region: Region,
    pub unlocked: bool,
    pub completed: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MapView {
    pub pins: Vec<PinView>,
    pub cursor: usize,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub now: Millis,
    pub phase: Phase,
    /// Intro or level-2 intro line.
    pub dialogue: Option<DialogueView>,
    /// Tutorial overlay, while it is up.
    pub tutorial: Option<DialogueView>,
    /// Clock of the level the phase belongs to.
    pub timer: Option<TimerView>,
    pub hints: Option<HintView>,
    pub desk: DeskView,
    pub login: LoginView,
    pub inbox: InboxView,
    pub quiz: Option<QuizView>,
    pub map: MapView,
    pub feedback: Option<Feedback>,
    pub feedback_ms: u64,
    /// Present only in `LevelComplete`, `Level2Complete` and `MissionFailed`.
    pub score: Option<ScoreResult>,
}
