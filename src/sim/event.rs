/// Events emitted by a controller tick.
/// The presentation layer consumes these for sound; they never feed back
/// into the controller.

use crate::domain::classifier::ElementKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    ItemFound { id: &'static str },
    DecoyFound { id: &'static str },
    MissClick { x: i32, y: i32 },
    NoteRevealed,
    HintGiven { number: u32 },
    HintsExhausted,
    PasswordRejected { attempts_left: u32 },
    LoginOpened,
    LevelCleared { level: u8 },
    MissionFailed { level: u8 },
    VerdictCorrect { email: usize },
    VerdictWrong { email: usize },
    ElementSpotted { email: usize, kind: ElementKind },
    QuizCorrect,
    QuizWrong,
    DialogueAdvanced,
}
