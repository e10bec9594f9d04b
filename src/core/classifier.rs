use crate::utils::error::Result;
use regex::{Regex, RegexSet, RegexSetBuilder};

pub const RED_FLAG_PATTERNS: &[&str] = &[
    r"\bchest pain\b",
    r"\bdifficulty breathing\b",
    r"\bsevere bleeding\b",
    r"\bseizure\b",
    r"\bunconscious\b",
    r"\bsuspected stroke\b",
];

const EMAIL_PATTERN: &str = r"\b[\w.-]+@[\w.-]+\.\w{2,6}\b";
const LONG_NUMBER_PATTERN: &str = r"\b\d{7,15}\b";

pub const REDACTED_EMAIL: &str = "[redacted email]";
pub const REDACTED_NUMBER: &str = "[redacted number]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 清理後沒有任何內容
    Empty,
    Emergency(String),
    Clear(String),
}

/// Redacts identifying substrings and detects emergency phrasing.
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    email: Regex,
    long_number: Regex,
    whitespace: Regex,
    red_flags: RegexSet,
}

impl RequestClassifier {
    pub fn new() -> Result<Self> {
        Self::with_extra_patterns(&[])
    }

    /// 額外的紅旗樣式會與內建清單合併，一律不分大小寫
    pub fn with_extra_patterns(extra: &[String]) -> Result<Self> {
        let patterns = RED_FLAG_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(extra.iter().cloned());

        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            long_number: Regex::new(LONG_NUMBER_PATTERN)?,
            whitespace: Regex::new(r"\s+")?,
            red_flags: RegexSetBuilder::new(patterns)
                .case_insensitive(true)
                .build()?,
        })
    }

    pub fn sanitize(&self, text: &str) -> String {
        let text = self.email.replace_all(text, REDACTED_EMAIL);
        let text = self.long_number.replace_all(&text, REDACTED_NUMBER);
        self.whitespace.replace_all(&text, " ").trim().to_string()
    }

    pub fn is_red_flag(&self, text: &str) -> bool {
        self.red_flags.is_match(text)
    }

    pub fn classify(&self, raw: &str) -> Classification {
        let text = self.sanitize(raw);
        if text.is_empty() {
            Classification::Empty
        } else if self.is_red_flag(&text) {
            Classification::Emergency(text)
        } else {
            Classification::Clear(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RequestClassifier {
        RequestClassifier::new().unwrap()
    }

    #[test]
    fn test_sanitize_redacts_email_and_numbers() {
        let c = classifier();
        let out = c.sanitize("Reach me at jane.doe@example.com or 5551234567 please");
        assert_eq!(
            out,
            "Reach me at [redacted email] or [redacted number] please"
        );
    }

    #[test]
    fn test_sanitize_number_length_bounds() {
        let c = classifier();
        assert_eq!(c.sanitize("code 123456"), "code 123456");
        assert_eq!(c.sanitize("id 1234567"), "id [redacted number]");
        assert_eq!(c.sanitize("id 123456789012345"), "id [redacted number]");
        assert_eq!(c.sanitize("card 1234567890123456"), "card 1234567890123456");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        let c = classifier();
        assert_eq!(c.sanitize("  what\tis \n\n  a   fever  "), "what is a fever");
        assert_eq!(c.sanitize(" \t\n "), "");
    }

    #[test]
    fn test_sanitize_keeps_trailing_punctuation_after_email() {
        let c = classifier();
        assert_eq!(c.sanitize("mail bob@clinic.org."), "mail [redacted email].");
    }

    #[test]
    fn test_red_flags_case_insensitive() {
        let c = classifier();
        assert!(c.is_red_flag("I have CHEST PAIN since morning"));
        assert!(c.is_red_flag("my son had a Seizure"));
        assert!(c.is_red_flag("suspected stroke in grandmother"));
        assert!(!c.is_red_flag("I have a mild headache"));
        // 需要整詞比對
        assert!(!c.is_red_flag("seizures-like wording"));
    }

    #[test]
    fn test_classify() {
        let c = classifier();
        assert_eq!(c.classify("   "), Classification::Empty);
        assert_eq!(
            c.classify("chest    pain and my email is a@b.com"),
            Classification::Emergency("chest pain and my email is [redacted email]".to_string())
        );
        assert_eq!(
            c.classify("what helps a sore throat?"),
            Classification::Clear("what helps a sore throat?".to_string())
        );
    }

    #[test]
    fn test_extra_patterns() {
        let c = RequestClassifier::with_extra_patterns(&[r"\banaphyla\w*\b".to_string()]).unwrap();
        assert!(c.is_red_flag("possible Anaphylaxis after peanuts"));
        assert!(c.is_red_flag("chest pain"));
    }

    #[test]
    fn test_invalid_extra_pattern_is_rejected() {
        assert!(RequestClassifier::with_extra_patterns(&["(unclosed".to_string()]).is_err());
    }
}
