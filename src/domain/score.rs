/// Score and rank computation. Pure functions only.
///
/// ## Level 1
///
///   points = max(0, remaining*10 + (objects - wrong_clicks)*50
///                   + speed_bonus(elapsed) - hints*100 - attempts*200)
///
///   speed_bonus: elapsed < 45 → 500, < 60 → 300, < 75 → 100, else 0
///
/// ## Level 2
///
///   points = correct*200 + remaining*5 + quiz*100 + (500 if every
///            phishing element was spotted)
///
/// ## Rank bands (checked top to bottom, first match wins)
///
/// ┌──────┬──────────────────────────────────────────────────────┐
/// │ Rank │ Condition                                            │
/// ├──────┼──────────────────────────────────────────────────────┤
/// │ S    │ points ≥ 1500 and the level's perfection condition   │
/// │ A    │ points ≥ 1200                                        │
/// │ B    │ points ≥ 900                                         │
/// │ C    │ points ≥ 600                                         │
/// │ D    │ otherwise                                            │
/// └──────┴──────────────────────────────────────────────────────┘
///
/// Perfection: level 1 needs elapsed < 45 s and zero wrong clicks;
/// level 2 needs every email right and a perfect quiz. S is tested
/// first because its point threshold alone also lies inside A's band.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
}

impl Rank {
    pub fn title(self) -> &'static str {
        match self {
            Rank::S => "Master Detective",
            Rank::A => "Senior Investigator",
            Rank::B => "Field Agent",
            Rank::C => "Rookie",
            Rank::D => "Trainee",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ScoreResult {
    pub points: u32,
    pub rank: Rank,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Level1Stats {
    pub remaining_secs: u32,
    pub wrong_clicks: u32,
    pub total_objects: u32,
    pub hints_used: u32,
    pub attempts_used: u32,
    pub elapsed_secs: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Level2Stats {
    pub correct: u32,
    pub total_emails: u32,
    pub remaining_secs: u32,
    pub quiz_score: u32,
    pub quiz_total: u32,
    pub all_elements_found: bool,
}

const S_THRESHOLD: u32 = 1500;

pub fn speed_bonus(elapsed_secs: u32) -> i64 {
    match elapsed_secs {
        e if e < 45 => 500,
        e if e < 60 => 300,
        e if e < 75 => 100,
        _ => 0,
    }
}

fn band(points: u32, perfect: bool) -> Rank {
    if points >= S_THRESHOLD && perfect {
        Rank::S
    } else if points >= 1200 {
        Rank::A
    } else if points >= 900 {
        Rank::B
    } else if points >= 600 {
        Rank::C
    } else {
        Rank::D
    }
}

pub fn score_level1(s: &Level1Stats) -> ScoreResult {
    let raw = s.remaining_secs as i64 * 10
        + (s.total_objects as i64 - s.wrong_clicks as i64) * 50
        + speed_bonus(s.elapsed_secs)
        - s.hints_used as i64 * 100
        - s.attempts_used as i64 * 200;
    let points = raw.clamp(0, u32::MAX as i64) as u32;
    let perfect = s.elapsed_secs < 45 && s.wrong_clicks == 0;
    ScoreResult { points, rank: band(points, perfect) }
}

pub fn score_level2(s: &Level2Stats) -> ScoreResult {
    let thoroughness = if s.all_elements_found { 500 } else { 0 };
    let points = s.correct * 200 + s.remaining_secs * 5 + s.quiz_score * 100 + thoroughness;
    let perfect = s.correct == s.total_emails && s.quiz_score == s.quiz_total;
    ScoreResult { points, rank: band(points, perfect) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn l1(remaining: u32, wrong: u32, hints: u32, attempts: u32, elapsed: u32) -> Level1Stats {
        Level1Stats {
            remaining_secs: remaining,
            wrong_clicks: wrong,
            total_objects: 9,
            hints_used: hints,
            attempts_used: attempts,
            elapsed_secs: elapsed,
        }
    }

    #[test]
    fn speed_bonus_steps() {
        assert_eq!(speed_bonus(0), 500);
        assert_eq!(speed_bonus(44), 500);
        assert_eq!(speed_bonus(45), 300);
        assert_eq!(speed_bonus(59), 300);
        assert_eq!(speed_bonus(60), 100);
        assert_eq!(speed_bonus(74), 100);
        assert_eq!(speed_bonus(75), 0);
    }

    #[test]
    fn fast_clean_run_is_s() {
        // 600 + 450 + 500
        let r = score_level1(&l1(60, 0, 0, 0, 30));
        assert_eq!(r.points, 1550);
        assert_eq!(r.rank, Rank::S);
    }

    #[test]
    fn one_wrong_click_drops_to_a_despite_points() {
        // 600 + 400 + 500
        let r = score_level1(&l1(60, 1, 0, 0, 30));
        assert_eq!(r.points, 1500);
        assert_eq!(r.rank, Rank::A);
    }

    #[test]
    fn slow_run_bands() {
        // 400 + 450 + 300
        let r = score_level1(&l1(40, 0, 0, 0, 50));
        assert_eq!(r.points, 1150);
        assert_eq!(r.rank, Rank::B);

        // 100 + 450 + 0 - 100 - 200
        let r = score_level1(&l1(10, 0, 1, 1, 80));
        assert_eq!(r.points, 250);
        assert_eq!(r.rank, Rank::D);
    }

    #[test]
    fn hints_and_attempts_cost_points() {
        let base = score_level1(&l1(50, 2, 0, 0, 40)).points;
        let with = score_level1(&l1(50, 2, 2, 1, 40)).points;
        assert_eq!(base - with, 2 * 100 + 200);
    }

    #[test]
    fn level1_points_never_negative() {
        let r = score_level1(&l1(0, 30, 3, 3, 120));
        assert_eq!(r.points, 0);
        assert_eq!(r.rank, Rank::D);
    }

    #[test]
    fn perfect_phishing_lab_is_s() {
        let s = Level2Stats {
            correct: 5,
            total_emails: 5,
            remaining_secs: 40,
            quiz_score: 4,
            quiz_total: 4,
            all_elements_found: false,
        };
        let r = score_level2(&s);
        assert_eq!(r.points, 1600);
        assert_eq!(r.rank, Rank::S);
        assert_eq!(score_level2(&Level2Stats { all_elements_found: true, ..s }).points, 2100);
    }

    #[test]
    fn level2_s_needs_perfect_quiz() {
        let s = Level2Stats {
            correct: 5,
            total_emails: 5,
            remaining_secs: 40,
            quiz_score: 3,
            quiz_total: 4,
            all_elements_found: true,
        };
        let r = score_level2(&s);
        assert_eq!(r.points, 2000);
        assert_eq!(r.rank, Rank::A);
    }

    #[test]
    fn level2_lower_bands() {
        let s = Level2Stats {
            correct: 3,
            total_emails: 5,
            remaining_secs: 0,
            quiz_score: 2,
            quiz_total: 4,
            all_elements_found: false,
        };
        assert_eq!(score_level2(&s), ScoreResult { points: 800, rank: Rank::C });
    }

    #[test]
    fn rank_display() {
        assert_eq!(Rank::S.to_string(), "S");
        assert_eq!(Rank::D.to_string(), "D");
    }

    proptest! {
        #[test]
        fn level1_is_deterministic_and_s_first(
            remaining in 0u32..=90, wrong in 0u32..20, hints in 0u32..=3,
            attempts in 0u32..=3, elapsed in 0u32..=120,
        ) {
            let stats = l1(remaining, wrong, hints, attempts, elapsed);
            let a = score_level1(&stats);
            prop_assert_eq!(a, score_level1(&stats));
            let s_ok = a.points >= 1500 && elapsed < 45 && wrong == 0;
            prop_assert_eq!(a.rank == Rank::S, s_ok);
        }

        #[test]
        fn level2_is_deterministic(
            correct in 0u32..=5, remaining in 0u32..=60, quiz in 0u32..=4, all in any::<bool>(),
        ) {
            let stats = Level2Stats {
                correct, total_emails: 5, remaining_secs: remaining,
                quiz_score: quiz, quiz_total: 4, all_elements_found: all,
            };
            let a = score_level2(&stats);
            prop_assert_eq!(a, score_level2(&stats));
            if a.rank == Rank::S {
                prop_assert!(correct == 5 && quiz == 4 && a.points >= 1500);
            }
        }
    }
}
