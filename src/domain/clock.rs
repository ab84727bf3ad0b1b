/// Mission countdown clock.
///
/// Remaining time is never stored. It is derived on every query from the
/// mission start epoch and "now", both in session milliseconds:
///
///   elapsed   = (stopped_at or now) - start_epoch
///   remaining = max(0, limit - elapsed)
///
/// Penalties move `start_epoch` backward. A penalty is a one-time shift of
/// the reference point, so it cannot be double-applied by a later tick and
/// the countdown never drifts from wall time.
///
/// The clock is created only when the mission actually begins. While a
/// tutorial overlay is up the session holds `None` instead of a paused clock.

/// Session-relative time in milliseconds. Supplied by the caller of
/// `SessionController::tick`; the domain never reads the wall clock.
pub type Millis = i64;

pub const MS_PER_SEC: Millis = 1000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MissionClock {
    start_epoch: Millis,
    limit_secs: u32,
    /// Set once at a terminal transition; freezes elapsed/remaining.
    stopped_at: Option<Millis>,
}

impl MissionClock {
    pub fn start(now: Millis, limit_secs: u32) -> Self {
        MissionClock { start_epoch: now, limit_secs, stopped_at: None }
    }

    pub fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    /// Make the mission look `secs` older. Ignored once stopped.
    pub fn penalize(&mut self, secs: u32) {
        if self.stopped_at.is_some() { return; }
        self.start_epoch -= secs as Millis * MS_PER_SEC;
    }

    /// Freeze the clock. Only the first call has an effect.
    pub fn stop(&mut self, now: Millis) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        let end = self.stopped_at.unwrap_or(now);
        (end - self.start_epoch).max(0)
    }

    pub fn elapsed_secs(&self, now: Millis) -> u32 {
        (self.elapsed_ms(now) / MS_PER_SEC) as u32
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        (self.limit_secs as Millis * MS_PER_SEC - self.elapsed_ms(now)).max(0)
    }

    /// Whole seconds left: `limit - floor(elapsed)`, clamped at zero.
    /// A penalty of `s` seconds lowers this by exactly `s`.
    pub fn remaining_secs(&self, now: Millis) -> u32 {
        let elapsed = self.elapsed_ms(now) / MS_PER_SEC;
        (self.limit_secs as Millis - elapsed).max(0) as u32
    }

    pub fn expired(&self, now: Millis) -> bool {
        self.remaining_ms(now) == 0
    }
}
