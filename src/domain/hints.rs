/// Rationed resources: hints (traded for time) and password attempts.
///
/// Hints come from a fixed, ordered sequence that gets more specific with
/// each use. `used` only ever grows; nothing is handed back.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HintError {
    #[error("no hints left")]
    Exhausted,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Hint {
    pub text: &'static str,
    /// 1-based position in the sequence.
    pub number: u32,
    /// Seconds the caller must take off the mission clock.
    pub penalty_secs: u32,
}

#[derive(Clone, Debug)]
pub struct HintEconomy {
    sequence: &'static [&'static str],
    used: u32,
    max: u32,
    penalty_secs: u32,
    last: Option<&'static str>,
}

impl HintEconomy {
    /// `max` is capped by the sequence length.
    pub fn new(sequence: &'static [&'static str], max: u32, penalty_secs: u32) -> Self {
        HintEconomy {
            sequence,
            used: 0,
            max: max.min(sequence.len() as u32),
            penalty_secs,
            last: None,
        }
    }

    pub fn request(&mut self) -> Result<Hint, HintError> {
        if self.used >= self.max {
            return Err(HintError::Exhausted);
        }
        let text = self.sequence[self.used as usize];
        self.used += 1;
        self.last = Some(text);
        Ok(Hint { text, number: self.used, penalty_secs: self.penalty_secs })
    }

    pub fn used(&self) -> u32 { self.used }
    pub fn max(&self) -> u32 { self.max }
    pub fn remaining(&self) -> u32 { self.max - self.used }

    /// Most recently issued hint, if any.
    pub fn last(&self) -> Option<&'static str> {
        self.last
    }
}

// ── Password attempts ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AttemptBudget {
    left: u32,
    max: u32,
}

impl AttemptBudget {
    pub fn new(max: u32) -> Self {
        AttemptBudget { left: max, max }
    }

    /// Spend one attempt. Returns how many are left.
    pub fn consume(&mut self) -> u32 {
        self.left = self.left.saturating_sub(1);
        self.left
    }

    pub fn left(&self) -> u32 { self.left }
    pub fn max(&self) -> u32 { self.max }
    pub fn used(&self) -> u32 { self.max - self.left }
    pub fn exhausted(&self) -> bool { self.left == 0 }
}
