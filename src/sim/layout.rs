/// Canvas layout shared by the controller (hit testing) and the renderer
/// (drawing). All coordinates are canvas cells; the renderer centres the
/// canvas in the terminal and converts mouse cells back before they reach
/// the controller.

use crate::domain::classifier::{ElementKind, Verdict};
use crate::domain::inventory::Region;

pub const CANVAS_W: i32 = 100;
pub const CANVAS_H: i32 = 32;

// ── Level 2: inbox ──

pub const INBOX_X: i32 = 2;
pub const INBOX_Y: i32 = 4;
pub const INBOX_ROW_W: i32 = 36;
pub const INBOX_ROW_H: i32 = 3;

pub fn inbox_row(index: usize) -> Region {
    Region::new(INBOX_X, INBOX_Y + index as i32 * INBOX_ROW_H, INBOX_ROW_W, INBOX_ROW_H)
}

/// Index of the inbox row under the point, if any.
pub fn inbox_hit(x: i32, y: i32, rows: usize) -> Option<usize> {
    (0..rows).find(|&i| inbox_row(i).contains(x, y))
}

/// Email detail pane (right half).
pub const DETAIL: Region = Region::new(41, 4, 57, 19);

const PROBE_Y: i32 = 24;

pub fn probe_button(kind: ElementKind) -> Region {
    match kind {
        ElementKind::Sender => Region::new(41, PROBE_Y, 12, 1),
        ElementKind::Link => Region::new(55, PROBE_Y, 12, 1),
        ElementKind::Urgency => Region::new(69, PROBE_Y, 12, 1),
    }
}

pub fn probe_hit(x: i32, y: i32) -> Option<ElementKind> {
    ElementKind::ALL.into_iter().find(|&k| probe_button(k).contains(x, y))
}

const VERDICT_Y: i32 = 26;

pub fn verdict_button(verdict: Verdict) -> Region {
    match verdict {
        Verdict::Phishing => Region::new(41, VERDICT_Y, 14, 1),
        Verdict::Safe => Region::new(58, VERDICT_Y, 10, 1),
    }
}

pub fn verdict_hit(x: i32, y: i32) -> Option<Verdict> {
    [Verdict::Phishing, Verdict::Safe]
        .into_iter()
        .find(|&v| verdict_button(v).contains(x, y))
}

// ── Level 2: quiz ──

const QUIZ_CHOICE_Y: i32 = 9;

/// Row of answer `index` (0 = A).
pub fn quiz_choice(index: usize) -> Region {
    Region::new(8, QUIZ_CHOICE_Y + index as i32 * 2, 84, 1)
}

pub fn quiz_choice_hit(x: i32, y: i32) -> Option<char> {
    (0..4).find(|&i| quiz_choice(i).contains(x, y))
        .map(|i| (b'A' + i as u8) as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_rows_map_to_letters() {
        let r = quiz_choice(2);
        assert_eq!(quiz_choice_hit(r.x + 3, r.y), Some('C'));
        assert_eq!(quiz_choice_hit(r.x, r.y + 1), None);
        assert_eq!(quiz_choice_hit(quiz_choice(0).x, quiz_choice(0).y), Some('A'));
    }

    #[test]
    fn inbox_rows_stack_without_gaps() {
        assert_eq!(inbox_hit(INBOX_X, INBOX_Y, 5), Some(0));
        assert_eq!(inbox_hit(INBOX_X + 5, INBOX_Y + 3, 5), Some(1));
        assert_eq!(inbox_hit(INBOX_X + 5, INBOX_Y + 14, 5), Some(4));
        assert_eq!(inbox_hit(INBOX_X + 5, INBOX_Y + 15, 5), None);
        assert_eq!(inbox_hit(INBOX_X - 1, INBOX_Y, 5), None);
    }

    #[test]
    fn buttons_are_distinct() {
        let probes: Vec<Region> = ElementKind::ALL.iter().map(|&k| probe_button(k)).collect();
        let verdicts = [verdict_button(Verdict::Phishing), verdict_button(Verdict::Safe)];
        let all: Vec<Region> = probes.into_iter().chain(verdicts).collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
            assert!(!a.overlaps(&inbox_row(0)));
        }
    }

    #[test]
    fn hits_map_back_to_buttons() {
        let r = probe_button(ElementKind::Link);
        assert_eq!(probe_hit(r.x, r.y), Some(ElementKind::Link));
        let r = verdict_button(Verdict::Safe);
        assert_eq!(verdict_hit(r.x + 1, r.y), Some(Verdict::Safe));
        assert_eq!(verdict_hit(0, 0), None);
    }
}
