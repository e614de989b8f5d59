//! Verifier: line-numbered scan of a draft against a [`RuleCatalog`].
//!
//! Pure string/regex matching, no generation calls. An empty result means the draft passes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::RuleCatalog;

/// Markdown bold/italic opener (a lone `* ` bullet does not match).
static EMPHASIS_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,3}\S").expect("valid emphasis regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationCategory {
    Char,
    Word,
    Connector,
    Phrase,
    Semicolon,
    Asterisk,
    Emoji,
}

impl ViolationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationCategory::Char => "char",
            ViolationCategory::Word => "word",
            ViolationCategory::Connector => "connector",
            ViolationCategory::Phrase => "phrase",
            ViolationCategory::Semicolon => "semicolon",
            ViolationCategory::Asterisk => "asterisk",
            ViolationCategory::Emoji => "emoji",
        }
    }

    /// Heading used when the violations are fed back to the generation service.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationCategory::Char => "Banned characters (zero em/en dashes)",
            ViolationCategory::Word => "Banned AI words (replace with plain alternatives)",
            ViolationCategory::Connector => "Formal connectors (replace with natural language)",
            ViolationCategory::Phrase => "Banned AI phrases (remove or rewrite)",
            ViolationCategory::Semicolon => "Semicolons (use periods instead)",
            ViolationCategory::Asterisk => "Markdown asterisks (use CAPS for emphasis)",
            ViolationCategory::Emoji => "Decorative emoji (remove all except ✅ and ❌)",
        }
    }

    /// Categories the backstop removes for every input.
    pub fn is_mechanical(&self) -> bool {
        matches!(
            self,
            ViolationCategory::Char | ViolationCategory::Semicolon | ViolationCategory::Asterisk | ViolationCategory::Emoji
        )
    }
}

/// A single rule violation found in a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub category: ViolationCategory,
    /// The banned token, phrase or character that triggered the violation.
    pub matched: String,
    /// 1-indexed.
    pub line_number: usize,
}

impl Violation {
    pub fn new(category: ViolationCategory, matched: impl Into<String>, line_number: usize) -> Self {
        Self {
            category,
            matched: matched.into(),
            line_number,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.as_str(), self.matched)
    }
}

/// Check a draft against every rule in the catalog.
pub fn verify(catalog: &RuleCatalog, text: &str) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        let line_number = idx + 1;
        let line_lower = line.to_lowercase();

        for ch in catalog.banned_chars() {
            if line.contains(*ch) {
                violations.push(Violation::new(ViolationCategory::Char, ch.to_string(), line_number));
            }
        }

        if line.contains(';') {
            violations.push(Violation::new(ViolationCategory::Semicolon, ";", line_number));
        }

        if EMPHASIS_MARKER.is_match(line) {
            violations.push(Violation::new(ViolationCategory::Asterisk, "**", line_number));
        }

        for word in catalog.word_patterns() {
            if word.pattern.is_match(line) {
                violations.push(Violation::new(ViolationCategory::Word, word.term.as_str(), line_number));
            }
        }

        for connector in catalog.connector_patterns() {
            if connector.pattern.is_match(line) {
                violations.push(Violation::new(ViolationCategory::Connector, connector.term.as_str(), line_number));
            }
        }

        for phrase in catalog.banned_phrases() {
            if line_lower.contains(phrase.as_str()) {
                violations.push(Violation::new(ViolationCategory::Phrase, phrase.as_str(), line_number));
            }
        }

        let mut prev = None;
        for c in line.chars() {
            if catalog.is_decorative_after(prev, c) {
                violations.push(Violation::new(ViolationCategory::Emoji, c.to_string(), line_number));
                break;
            }
            prev = Some(c);
        }
    }

    violations
}

/// True when [`verify`] finds nothing.
pub fn is_clean(catalog: &RuleCatalog, text: &str) -> bool {
    verify(catalog, text).is_empty()
}

/// `category:matched` strings for the first `limit` violations, for log lines.
pub fn summarize(violations: &[Violation], limit: usize) -> Vec<String> {
    violations.iter().take(limit).map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RuleCatalog;

    fn check(text: &str) -> Vec<Violation> {
        verify(&RuleCatalog::shared_house_style(), text)
    }

    fn categories(text: &str) -> Vec<ViolationCategory> {
        check(text).into_iter().map(|v| v.category).collect()
    }

    fn matched(text: &str) -> Vec<String> {
        check(text).into_iter().map(|v| v.matched).collect()
    }

    #[test]
    fn clean_draft_passes() {
        assert_eq!(check("This is a clean draft with no issues."), vec![]);
    }

    #[test]
    fn detects_em_and_en_dash() {
        assert!(categories("work — life balance").contains(&ViolationCategory::Char));
        assert!(categories("work – life balance").contains(&ViolationCategory::Char));
    }

    #[test]
    fn one_char_violation_per_dash_type_per_line() {
        let v = check("a — b — c – d");
        let chars: Vec<&Violation> = v.iter().filter(|v| v.category == ViolationCategory::Char).collect();
        assert_eq!(chars.len(), 2);
    }

    #[test]
    fn dash_reported_on_its_own_line() {
        let v = check("Clean line.\nDirty line — with dash.");
        let dash: Vec<&Violation> = v.iter().filter(|v| v.category == ViolationCategory::Char).collect();
        assert_eq!(dash.len(), 1);
        assert_eq!(dash[0].line_number, 2);
    }

    #[test]
    fn banned_word_matches_case_insensitively() {
        assert!(matched("You should utilize this strategy.").contains(&"utilize".to_string()));
        assert!(matched("UTILIZE your skills.").contains(&"utilize".to_string()));
    }

    #[test]
    fn word_boundaries_prevent_partial_matches() {
        // "realm" must not fire inside "realms" or "overrealm"; "foster" not inside "fosters"
        assert!(check("The realms fosters overrealm.").is_empty());
        assert!(matched("A new realm.").contains(&"realm".to_string()));
    }

    #[test]
    fn hyphenated_word_detected() {
        assert!(matched("An ever-evolving field.").contains(&"ever-evolving".to_string()));
    }

    #[test]
    fn connectors_reported_separately() {
        let v = check("Furthermore, this approach works well.");
        assert_eq!(v, vec![Violation::new(ViolationCategory::Connector, "furthermore", 1)]);
    }

    #[test]
    fn phrases_match_as_substrings() {
        assert!(matched("In today's competitive market, you need to stand out.").contains(&"in today's".to_string()));
    }

    #[test]
    fn semicolon_and_asterisk() {
        assert!(categories("First point; second point.").contains(&ViolationCategory::Semicolon));
        assert!(categories("This is **bold** text.").contains(&ViolationCategory::Asterisk));
    }

    #[test]
    fn bullet_asterisk_is_not_emphasis() {
        assert!(check("* first item\n* second item").is_empty());
    }

    #[test]
    fn decorative_emoji_flagged_sentinels_exempt() {
        assert_eq!(
            check("Great job 🚀"),
            vec![Violation::new(ViolationCategory::Emoji, "🚀", 1)]
        );
        assert!(check("✅ Do this\n❌ Not that").is_empty());
    }

    #[test]
    fn sentinel_with_variation_selector_is_not_flagged() {
        assert!(check("✅\u{FE0F} Good\n❌\u{FE0F} Bad").is_empty());
        assert_eq!(
            check("Ship it 🚀\u{FE0F}"),
            vec![Violation::new(ViolationCategory::Emoji, "🚀", 1)]
        );
        assert_eq!(
            check("\u{FE0F} stray"),
            vec![Violation::new(ViolationCategory::Emoji, "\u{FE0F}", 1)]
        );
    }

    #[test]
    fn several_violations_on_one_line() {
        let cats = categories("Furthermore — utilize your robust network.");
        assert!(cats.contains(&ViolationCategory::Char));
        assert!(cats.contains(&ViolationCategory::Connector));
        assert_eq!(cats.iter().filter(|c| **c == ViolationCategory::Word).count(), 2);
    }

    #[test]
    fn summarize_caps_output() {
        let v = check("utilize;\nrobust;\nseamless;");
        assert_eq!(v.len(), 6);
        assert_eq!(summarize(&v, 3), vec!["semicolon:;", "word:utilize", "semicolon:;"]);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Violation::new(ViolationCategory::Connector, "moreover", 4)).unwrap();
        assert_eq!(json, r#"{"category":"connector","matched":"moreover","line_number":4}"#);
    }
}
