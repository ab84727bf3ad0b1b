/// Level 2 email rules: phishing evidence and player verdicts.
///
/// `classify` is a pure function of the sender and body. Three independent
/// rules run against the text; each contributes at most one element of its
/// kind, and the result is a set ordered by kind, so evaluation order never
/// changes the outcome.
///
///   Sender : look-alike domain (digit swaps, brand name on a foreign
///             domain, throwaway TLD)
///   Link   : unencrypted `http://` link
///   Urgency: pressure phrases ("immediately", "act now", ...)

use std::collections::BTreeSet;

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    Phishing,
    Safe,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Phishing => "PHISHING",
            Verdict::Safe => "SAFE",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ElementKind {
    Sender,
    Link,
    Urgency,
}

impl ElementKind {
    pub const ALL: [ElementKind; 3] = [ElementKind::Sender, ElementKind::Link, ElementKind::Urgency];

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Sender => "Sender",
            ElementKind::Link => "Links",
            ElementKind::Urgency => "Tone",
        }
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct PhishingElement {
    pub kind: ElementKind,
    pub explanation: String,
}

#[derive(Clone, Debug)]
pub struct Email {
    pub sender: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
    pub is_phishing: bool,
    pub classified_as: Option<Verdict>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VerdictOutcome {
    pub correct: bool,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VerdictError {
    #[error("email already classified")]
    AlreadyClassified,
    #[error("no email at index {0}")]
    UnknownEmail(usize),
}

impl Email {
    pub const fn new(
        sender: &'static str, subject: &'static str,
        body: &'static str, is_phishing: bool,
    ) -> Self {
        Email { sender, subject, body, is_phishing, classified_as: None }
    }

    /// Record the player's verdict. The first verdict is final.
    pub fn submit_verdict(&mut self, verdict: Verdict) -> Result<VerdictOutcome, VerdictError> {
        if self.classified_as.is_some() {
            return Err(VerdictError::AlreadyClassified);
        }
        self.classified_as = Some(verdict);
        Ok(VerdictOutcome { correct: self.is_correct().unwrap_or(false) })
    }

    /// `None` until classified.
    pub fn is_correct(&self) -> Option<bool> {
        self.classified_as.map(|v| (v == Verdict::Phishing) == self.is_phishing)
    }
}

// ══════════════════════════════════════════════════════════════
// Rules
// ══════════════════════════════════════════════════════════════

/// Brands attackers like to imitate, with the domain each actually owns.
const BRANDS: &[(&str, &str)] = &[
    ("paypal", "paypal.com"),
    ("microsoft", "microsoft.com"),
    ("amazon", "amazon.com"),
    ("google", "google.com"),
    ("apple", "apple.com"),
    ("netflix", "netflix.com"),
];

const THROWAWAY_TLDS: &[&str] = &[".xyz", ".top", ".tk", ".zip", ".click"];

const URGENCY_PHRASES: &[&str] = &[
    "immediately",
    "urgent",
    "act now",
    "within 24 hours",
    "final notice",
    "suspended",
    "will be closed",
    "right away",
];

pub fn classify(email: &Email) -> BTreeSet<PhishingElement> {
    let mut found = BTreeSet::new();
    if let Some(e) = sender_rule(email.sender) { found.insert(e); }
    if let Some(e) = link_rule(email.body) { found.insert(e); }
    if let Some(e) = urgency_rule(email.body) { found.insert(e); }
    found
}

/// Domain part of `Name <user@host>` or `user@host`, lowercased.
fn sender_domain(sender: &str) -> Option<String> {
    let at = sender.rfind('@')?;
    let domain = sender[at + 1..].trim_end_matches('>').trim();
    if domain.is_empty() { return None; }
    Some(domain.to_ascii_lowercase())
}

/// Last two labels: `mail.paypal.com` → `paypal.com`.
fn registrable(domain: &str) -> &str {
    let mut dots = domain.rmatch_indices('.');
    match (dots.next(), dots.next()) {
        (Some(_), Some((i, _))) => &domain[i + 1..],
        _ => domain,
    }
}

fn unleet(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '7' => 't',
            other => other,
        })
        .collect()
}

fn sender_rule(sender: &str) -> Option<PhishingElement> {
    let domain = sender_domain(sender)?;
    let explanation = lookalike_brand(&domain)
        .or_else(|| borrowed_brand(&domain))
        .or_else(|| throwaway_tld(&domain))?;
    Some(PhishingElement { kind: ElementKind::Sender, explanation })
}

/// Fires only when the brand appears after undoing digit swaps but not in
/// the raw domain, so `office365.microsoft.com` stays clean.
fn lookalike_brand(domain: &str) -> Option<String> {
    let plain = unleet(domain);
    if plain == domain { return None; }
    let (brand, real) = BRANDS.iter()
        .find(|(b, _)| plain.contains(b) && !domain.contains(b))?;
    Some(format!(
        "'{domain}' swaps letters for digits to pass as {brand}. The real domain is {real}."
    ))
}

fn borrowed_brand(domain: &str) -> Option<String> {
    let reg = registrable(domain);
    let (brand, real) = BRANDS.iter().find(|(b, r)| domain.contains(b) && reg != *r)?;
    Some(format!(
        "'{domain}' uses the {brand} name, but {brand} only sends from {real}."
    ))
}

fn throwaway_tld(domain: &str) -> Option<String> {
    let tld = THROWAWAY_TLDS.iter().find(|t| domain.ends_with(*t))?;
    Some(format!(
        "'{domain}' sits on a cheap {tld} domain. Real companies mail from their own domain."
    ))
}

fn link_rule(body: &str) -> Option<PhishingElement> {
    let start = body.find("http://")?;
    let url: String = body[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    let url = url.trim_end_matches(|c: char| c == '.' || c == ',' || c == ')');
    Some(PhishingElement {
        kind: ElementKind::Link,
        explanation: format!(
            "'{url}' is plain http://. Anything you type there travels unencrypted."
        ),
    })
}

fn urgency_rule(body: &str) -> Option<PhishingElement> {
    let lower = body.to_ascii_lowercase();
    let phrase = URGENCY_PHRASES.iter().find(|p| lower.contains(*p))?;
    Some(PhishingElement {
        kind: ElementKind::Urgency,
        explanation: format!(
            "\"{phrase}\" is a pressure tactic. Attackers want you to act before you think."
        ),
    })
}

// ══════════════════════════════════════════════════════════════
// Inbox
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Inbox {
    emails: Vec<Email>,
}

impl Inbox {
    pub fn new(emails: Vec<Email>) -> Self {
        Inbox { emails }
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn get(&self, index: usize) -> Option<&Email> {
        self.emails.get(index)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn submit_verdict(&mut self, index: usize, verdict: Verdict) -> Result<VerdictOutcome, VerdictError> {
        self.emails
            .get_mut(index)
            .ok_or(VerdictError::UnknownEmail(index))?
            .submit_verdict(verdict)
    }

    pub fn classified_count(&self) -> usize {
        self.emails.iter().filter(|e| e.classified_as.is_some()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.emails.iter().filter(|e| e.is_correct() == Some(true)).count()
    }

    pub fn all_classified(&self) -> bool {
        self.emails.iter().all(|e| e.classified_as.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(email: &Email) -> Vec<ElementKind> {
        classify(email).into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn digit_swap_domain_flags_sender() {
        let e = Email::new("PayPal <service@paypa1.com>", "Hi", "Hello there.", true);
        let found = classify(&e);
        assert_eq!(found.len(), 1);
        let el = found.iter().next().unwrap();
        assert_eq!(el.kind, ElementKind::Sender);
        assert!(el.explanation.contains("paypa1.com"));
        assert!(el.explanation.contains("paypal.com"));
    }

    #[test]
    fn brand_on_foreign_domain_flags_sender() {
        let e = Email::new("no-reply@microsoft-support.net", "x", "ok", true);
        assert_eq!(kinds(&e), vec![ElementKind::Sender]);
    }

    #[test]
    fn brand_subdomain_of_real_domain_is_fine() {
        let e = Email::new("alerts@mail.paypal.com", "x", "ok", false);
        assert!(classify(&e).is_empty());
    }

    #[test]
    fn digits_in_a_real_brand_subdomain_are_fine() {
        let e = Email::new("Office <no-reply@office365.microsoft.com>", "x", "ok", false);
        assert!(classify(&e).is_empty());
        let e = Email::new("ops@status2.amazon.com", "x", "ok", false);
        assert!(classify(&e).is_empty());
    }

    #[test]
    fn digit_swap_on_a_brand_subdomain_still_flags() {
        let e = Email::new("security@micr0soft.example.com", "x", "ok", true);
        let found = classify(&e);
        assert_eq!(kinds(&e), vec![ElementKind::Sender]);
        assert!(found.iter().next().unwrap().explanation.contains("digits"));
    }

    #[test]
    fn throwaway_tld_flags_sender() {
        let e = Email::new("HR <hr@payroll-desk.top>", "x", "ok", true);
        assert_eq!(kinds(&e), vec![ElementKind::Sender]);
    }

    #[test]
    fn plain_http_link_flagged_https_not() {
        let bad = Email::new("a@corp.com", "x", "See http://10.0.0.9/login.", true);
        let found = classify(&bad);
        let link = found.iter().find(|e| e.kind == ElementKind::Link).unwrap();
        assert!(link.explanation.contains("'http://10.0.0.9/login'"));

        let good = Email::new("a@corp.com", "x", "See https://intranet.corp.com/page", false);
        assert!(classify(&good).is_empty());
    }

    #[test]
    fn urgency_is_case_insensitive() {
        let e = Email::new("a@corp.com", "x", "Reply IMMEDIATELY please", true);
        assert_eq!(kinds(&e), vec![ElementKind::Urgency]);
    }

    #[test]
    fn rules_are_additive() {
        let e = Email::new(
            "PayPal <security@paypa1.com>", "x",
            "Verify now or be suspended: http://paypa1.com/verify", true,
        );
        assert_eq!(
            kinds(&e),
            vec![ElementKind::Sender, ElementKind::Link, ElementKind::Urgency]
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let e = Email::new("x@amaz0n.top", "x", "Act now: http://amaz0n.top", true);
        assert_eq!(classify(&e), classify(&e));
    }

    #[test]
    fn verdict_recorded_once() {
        let mut e = Email::new("a@corp.com", "x", "ok", false);
        assert_eq!(e.is_correct(), None);
        let out = e.submit_verdict(Verdict::Safe).unwrap();
        assert!(out.correct);
        assert_eq!(e.submit_verdict(Verdict::Phishing), Err(VerdictError::AlreadyClassified));
        assert_eq!(e.classified_as, Some(Verdict::Safe));
        assert_eq!(e.is_correct(), Some(true));
    }

    #[test]
    fn wrong_verdict_is_a_normal_outcome() {
        let mut e = Email::new("a@paypa1.com", "x", "ok", true);
        let out = e.submit_verdict(Verdict::Safe).unwrap();
        assert!(!out.correct);
    }

    #[test]
    fn inbox_counts() {
        let mut inbox = Inbox::new(vec![
            Email::new("a@corp.com", "1", "ok", false),
            Email::new("b@paypa1.com", "2", "ok", true),
        ]);
        assert_eq!(inbox.submit_verdict(5, Verdict::Safe), Err(VerdictError::UnknownEmail(5)));
        inbox.submit_verdict(0, Verdict::Safe).unwrap();
        assert!(!inbox.all_classified());
        inbox.submit_verdict(1, Verdict::Safe).unwrap();
        assert!(inbox.all_classified());
        assert_eq!(inbox.classified_count(), 2);
        assert_eq!(inbox.correct_count(), 1);
    }
}
