//! PII guard for outgoing text.
//!
//! A synchronous scan for likely emails and phone numbers. A hit never blocks
//! or rewrites the message; it only asks the UI to get explicit confirmation
//! before the send proceeds.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern")
});

// Optional international prefix, optional ()/-/./space separators, 3-3-4
// digit grouping.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b")
        .expect("phone pattern")
});

/// What the scan flagged in an outgoing message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PiiFindings {
    pub email: bool,
    pub phone: bool,
}

impl PiiFindings {
    pub fn any(self) -> bool {
        self.email || self.phone
    }
}

pub fn scan(text: &str) -> PiiFindings {
    PiiFindings {
        email: EMAIL_PATTERN.is_match(text),
        phone: PHONE_PATTERN.is_match(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_phone_numbers() {
        assert!(scan("call me at 555-123-4567").phone);
        assert!(scan("call me at (555) 123 4567").phone);
        assert!(scan("+91 555 123 4567 anytime").phone);
        assert!(scan("5551234567").phone);
    }

    #[test]
    fn flags_emails() {
        let findings = scan("email me at a@b.com");
        assert!(findings.email);
        assert!(findings.any());
        assert!(scan("reach me: first.last+tag@mail.example.co").email);
    }

    #[test]
    fn plain_chat_passes() {
        let findings = scan("hello there");
        assert!(!findings.any());
        assert!(!scan("meet at 5pm? it's room 42").any());
    }

    #[test]
    fn short_digit_runs_are_not_phones() {
        assert!(!scan("the code is 1234").phone);
        assert!(!scan("born in 1994").phone);
    }
}
