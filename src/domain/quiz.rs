/// Fixed-sequence multiple-choice quiz. Each question is answered once;
/// the player must acknowledge the feedback before the next one appears.

use thiserror::Error;

#[derive(Clone, Copy, Debug)]
pub struct Question {
    pub prompt: &'static str,
    pub choices: [&'static str; 4],
    /// 'A'..='D'
    pub answer: char,
    pub explanation: [&'static str; 3],
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QuizOutcome {
    pub correct: bool,
    pub answer: char,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuizError {
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("'{0}' is not one of A-D")]
    InvalidChoice(char),
    #[error("quiz finished")]
    Finished,
}

#[derive(Clone, Debug)]
pub struct Quiz {
    questions: &'static [Question],
    current: usize,
    /// Outcome for the current question, once answered.
    pending: Option<QuizOutcome>,
    score: u32,
}

impl Quiz {
    pub fn new(questions: &'static [Question]) -> Self {
        Quiz { questions, current: 0, pending: None, score: 0 }
    }

    pub fn current(&self) -> Option<&'static Question> {
        self.questions.get(self.current)
    }

    pub fn index(&self) -> usize { self.current }
    pub fn total(&self) -> u32 { self.questions.len() as u32 }
    pub fn score(&self) -> u32 { self.score }
    pub fn pending(&self) -> Option<QuizOutcome> { self.pending }

    pub fn is_finished(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn answer(&mut self, choice: char) -> Result<QuizOutcome, QuizError> {
        let q = self.current().ok_or(QuizError::Finished)?;
        if self.pending.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        let choice = choice.to_ascii_uppercase();
        if !('A'..='D').contains(&choice) {
            return Err(QuizError::InvalidChoice(choice));
        }
        let outcome = QuizOutcome { correct: choice == q.answer, answer: q.answer };
        if outcome.correct {
            self.score += 1;
        }
        self.pending = Some(outcome);
        Ok(outcome)
    }

    /// Move past an answered question. Returns false (and does nothing)
    /// while the current question is still open.
    pub fn advance(&mut self) -> bool {
        if self.pending.is_none() || self.is_finished() {
            return false;
        }
        self.pending = None;
        self.current += 1;
        true
    }
}
