/// Built-in narrative content: dialogue, desk items, hints, emails, quiz,
/// and the city map. Static data only; the rules live in `domain`.

use crate::domain::classifier::Email;
use crate::domain::inventory::{DeskItem, ItemRole, Region};
use crate::domain::quiz::Question;

pub const PASSWORD: &str = "admin123";
pub const PASSWORD_MAX_LEN: usize = 20;

pub const GATED_ITEM: &str = "sticky-note";

// ── Dialogue ──

pub const INTRO_LINES: &[&str] = &[
    "DISPATCH: \"Detective, we have a CODE RED situation.\"",
    "\"A suspect's computer contains critical evidence.\"",
    "\"The desk is a mess, but the password is hidden somewhere.\"",
    "\"You have 90 SECONDS. Search every object carefully.\"",
    "\"Warning: Wrong clicks waste time. Wrong passwords are limited.\"",
    "\"Find the password, unlock the laptop. The clock is TICKING!\"",
];

pub const TUTORIAL_LINES: &[&str] = &[
    "Click objects on the desk to investigate them.",
    "Clicking empty desk costs time. TAB asks for a hint, which also costs time.",
    "The laptop sits in the middle. Click it once you know the password.",
];

pub const LEVEL2_INTRO_LINES: &[&str] = &[
    "DISPATCH: \"Great work on Level 1, Detective!\"",
    "\"Now we have a new threat: A PHISHING CAMPAIGN.\"",
    "\"Employees are receiving suspicious emails.\"",
    "\"Your task: Analyze 5 emails and identify which are PHISHING attempts.\"",
    "\"You have 60 SECONDS. Each wrong answer costs time!\"",
    "\"Click on each email to examine it, then classify it. Good luck!\"",
];

// ── Level 1: the messy desk ──

/// Desk items in z-order (first match wins on overlap).
pub fn desk_items() -> Vec<DeskItem> {
    vec![
        DeskItem::new(
            GATED_ITEM, "Sticky Note", Region::new(70, 15, 9, 3),
            "A yellow sticky note! It reads: 'Password: admin123'",
            ItemRole::Key,
        ),
        DeskItem::new(
            "red-note", "Red Sticky Note", Region::new(8, 6, 9, 3),
            "A red sticky note reads: 'WiFi: office2024'. Not what you need!",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "blue-note", "Blue Sticky Note", Region::new(84, 19, 9, 3),
            "A blue note: 'login: guest / pass: welcome1'. Hmm, not for this laptop...",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "coffee-mug", "Coffee Mug", Region::new(14, 13, 7, 4),
            "A half-empty coffee mug. Still warm... Someone was here recently.",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "papers", "Scattered Papers", Region::new(36, 17, 16, 3),
            "Password Policy: 'DO NOT write passwords down!' Someone didn't listen...",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "usb-drive", "USB Drive", Region::new(57, 21, 6, 1),
            "A suspicious unmarked USB drive. Never plug in unknown USBs!",
            ItemRole::Decoy,
        ),
        DeskItem::new(
            "smartphone", "Smartphone", Region::new(26, 18, 6, 5),
            "2FA notifications DISABLED. The suspect clearly ignores security!",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "desk-drawer", "Desk Drawer", Region::new(4, 22, 14, 3),
            "A locked drawer. You hear something rattle inside. Key not found.",
            ItemRole::Clue,
        ),
        DeskItem::new(
            "laptop", "Laptop", Region::new(38, 5, 24, 9),
            "",
            ItemRole::Entry,
        ),
    ]
}

/// Highest reveal threshold the desk can satisfy: every discoverable item
/// except the gated note itself. The laptop is never "found".
pub fn max_reveal_threshold() -> usize {
    desk_items().iter()
        .filter(|i| i.id != GATED_ITEM && i.role != ItemRole::Entry)
        .count()
}

pub const LEVEL1_HINTS: &[&str] = &[
    "Every object on the desk is worth a look. Empty clicks only cost you time.",
    "People keep passwords close to where they type them. Search a few objects and watch the desk.",
    "A yellow sticky note drops near the right edge once three items are searched.",
];

// ── Level 2: the phishing lab ──

pub fn inbox_emails() -> Vec<Email> {
    vec![
        Email::new(
            "PayPal Security <security@paypa1.com>",
            "Unusual sign-in activity",
            "We detected unusual activity on your account. Verify your account \
             IMMEDIATELY or it will be suspended: http://paypa1.com/verify",
            true,
        ),
        Email::new(
            "IT Helpdesk <helpdesk@nexacorp.com>",
            "Scheduled maintenance on Saturday",
            "The file server will be offline Saturday 09:00-11:00 for patching. \
             No action is needed from you. Details are on the intranet: \
             https://intranet.nexacorp.com/maintenance",
            false,
        ),
        Email::new(
            "Microsoft 365 <no-reply@microsoft-support.xyz>",
            "Your mailbox is full",
            "Your mailbox has exceeded its storage limit. Act now to keep receiving \
             mail. Sign in within 24 hours: https://microsoft-support.xyz/login",
            true,
        ),
        Email::new(
            "Sarah Chen <sarah.chen@nexacorp.com>",
            "Notes from Monday's design review",
            "Hi team, the notes from Monday are on the shared drive. Please add your \
             comments before our next review on Thursday. Thanks, Sarah",
            false,
        ),
        Email::new(
            "Payroll Team <payroll@nexacorp-hr.top>",
            "Update your direct deposit",
            "FINAL NOTICE: payroll closes today. Confirm your bank details or your \
             salary will be delayed: http://192.168.77.14/payroll",
            true,
        ),
    ]
}

pub const LEVEL2_HINTS: &[&str] = &[
    "Read the sender's FULL domain letter by letter, then hunt for plain http:// links.",
    "Three of the five emails are phishing. Deadlines and look-alike domains give them away.",
];

pub const QUIZ: &[Question] = &[
    Question {
        prompt: "What's the safest action for a suspicious email?",
        choices: [
            "A) Click the link to check",
            "B) Delete it immediately",
            "C) Forward to IT department",
            "D) Reply and ask who sent it",
        ],
        answer: 'C',
        explanation: [
            "IT departments have tools to analyze suspicious emails safely.",
            "Clicking links or replying can expose you to malware or confirm",
            "your email to attackers. Deleting removes evidence IT needs.",
        ],
    },
    Question {
        prompt: "Which is a sign of a phishing email?",
        choices: [
            "A) Personalized greeting with your name",
            "B) Urgent request to verify account",
            "C) From a known colleague",
            "D) Proper grammar and spelling",
        ],
        answer: 'B',
        explanation: [
            "Phishers create urgency so you act without thinking.",
            "Phrases like 'IMMEDIATELY' or 'your account will be closed'",
            "are classic pressure tactics. Always verify through official channels.",
        ],
    },
    Question {
        prompt: "What should you check in an email sender address?",
        choices: [
            "A) It looks familiar",
            "B) The display name only",
            "C) Full email domain for misspellings",
            "D) It's from a popular service",
        ],
        answer: 'C',
        explanation: [
            "Attackers use look-alike domains like 'paypa1.com' or 'g00gle.com'.",
            "Display names can be faked easily. Always inspect the FULL email",
            "domain character by character. One wrong letter = phishing!",
        ],
    },
    Question {
        prompt: "If you clicked a phishing link, what should you do FIRST?",
        choices: [
            "A) Panic and do nothing",
            "B) Disconnect from network",
            "C) Keep browsing",
            "D) Shut down computer",
        ],
        answer: 'B',
        explanation: [
            "Disconnecting stops malware from spreading or sending your data.",
            "Then change passwords from a DIFFERENT device and report to IT.",
            "Shutting down may lose forensic evidence needed for investigation.",
        ],
    },
];

// ── City map ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelId {
    MessyDesk,
    PhishingLab,
    ServerRoom,
    CeoOffice,
    DarkWebCafe,
}

#[derive(Clone, Copy, Debug)]
pub struct LevelPin {
    pub level: LevelId,
    pub name: &'static str,
    pub region: Region,
    pub unlocked: bool,
}

pub const LEVEL_PINS: &[LevelPin] = &[
    LevelPin { level: LevelId::MessyDesk, name: "The Messy Desk", region: Region::new(10, 8, 22, 3), unlocked: true },
    LevelPin { level: LevelId::PhishingLab, name: "The Phishing Lab", region: Region::new(40, 5, 22, 3), unlocked: true },
    LevelPin { level: LevelId::ServerRoom, name: "Server Room", region: Region::new(70, 10, 22, 3), unlocked: false },
    LevelPin { level: LevelId::CeoOffice, name: "CEO's Office", region: Region::new(20, 18, 22, 3), unlocked: false },
    LevelPin { level: LevelId::DarkWebCafe, name: "The Dark Web Cafe", region: Region::new(56, 21, 22, 3), unlocked: false },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classifier::classify;
    use crate::sim::layout::{CANVAS_H, CANVAS_W};

    #[test]
    fn desk_regions_do_not_overlap_and_fit_canvas() {
        let items = desk_items();
        for (i, a) in items.iter().enumerate() {
            let r = a.region;
            assert!(r.x >= 0 && r.y >= 3 && r.x + r.w <= CANVAS_W && r.y + r.h <= CANVAS_H - 4, "{}", a.id);
            for b in &items[i + 1..] {
                assert!(!r.overlaps(&b.region), "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn desk_has_one_key_one_entry() {
        let items = desk_items();
        assert_eq!(items.iter().filter(|i| i.role == ItemRole::Key).count(), 1);
        assert_eq!(items.iter().filter(|i| i.role == ItemRole::Entry).count(), 1);
        assert!(items.iter().any(|i| i.id == GATED_ITEM && i.role == ItemRole::Key));
    }

    #[test]
    fn reveal_limit_counts_searchable_items() {
        assert_eq!(max_reveal_threshold(), 7);
    }

    #[test]
    fn password_is_on_the_key_note() {
        let items = desk_items();
        let key = items.iter().find(|i| i.role == ItemRole::Key).unwrap();
        assert!(key.narrative.contains(PASSWORD));
    }

    #[test]
    fn inbox_has_three_phishing_two_safe() {
        let emails = inbox_emails();
        assert_eq!(emails.len(), 5);
        assert_eq!(emails.iter().filter(|e| e.is_phishing).count(), 3);
    }

    #[test]
    fn rules_agree_with_the_dataset() {
        for e in inbox_emails() {
            let found = classify(&e);
            assert_eq!(!found.is_empty(), e.is_phishing, "{}", e.subject);
        }
    }

    #[test]
    fn quiz_answers_are_valid_letters() {
        for q in QUIZ {
            assert!(('A'..='D').contains(&q.answer));
            let idx = (q.answer as u8 - b'A') as usize;
            assert!(q.choices[idx].starts_with(q.answer));
        }
    }

    #[test]
    fn pins_do_not_overlap() {
        for (i, a) in LEVEL_PINS.iter().enumerate() {
            for b in &LEVEL_PINS[i + 1..] {
                assert!(!a.region.overlaps(&b.region), "{} overlaps {}", a.name, b.name);
            }
        }
    }
}
