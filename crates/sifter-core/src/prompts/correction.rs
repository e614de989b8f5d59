//! Correction pass: one targeted retry listing the exact violations the verifier found.

/// System instruction for the correction pass. Reference excerpts may be appended.
pub const CORRECTION_SYSTEM: &str = r#"You are doing a correction pass on a content draft. The draft was already edited but still contains banned patterns. Fix every violation listed by the user. Keep the voice, tone and meaning. Change as little as possible. Return only the corrected draft.

Rules:
- No em dashes (—) or en dashes (–). Use a period, comma, colon or parentheses
- No markdown asterisks. Use CAPS for emphasis
- Replace every banned word with a plain alternative ("use" not "utilize")
- Remove every banned phrase or rewrite the sentence without it
- Replace formal connectors with natural ones ("and", "but", "so", "then")
- Replace semicolons with periods
- Remove decorative emoji. Keep only ✅ and ❌"#;

/// User prompt template: `{feedback}` is the violation list, `{draft}` the current draft.
pub const CORRECTION_USER_TEMPLATE: &str = r#"{feedback}

---

Fix all violations and return only the corrected draft:

{draft}"#;

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// System prompt with optional excerpts of the AI-tells guide and the voice print.
pub fn correction_system_prompt(ai_tells: Option<&str>, voice_print: Option<&str>, excerpt_chars: usize) -> String {
    let mut system = CORRECTION_SYSTEM.to_string();
    if let Some(doc) = ai_tells.filter(|d| !d.trim().is_empty()) {
        system.push_str("\n\n## AI Writing Reference (excerpt)\n\n");
        system.push_str(excerpt(doc, excerpt_chars));
    }
    if let Some(doc) = voice_print.filter(|d| !d.trim().is_empty()) {
        system.push_str("\n\n## Voice Reference (excerpt)\n\n");
        system.push_str(excerpt(doc, excerpt_chars));
    }
    system
}

/// Build the user prompt from the formatted violation feedback and the draft.
pub fn correction_user_prompt(feedback: &str, draft: &str) -> String {
    super::render(CORRECTION_USER_TEMPLATE, &[("feedback", feedback), ("draft", draft)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo wörld", 4), "héll");
        assert_eq!(excerpt("short", 100), "short");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn system_prompt_without_references_is_bare() {
        assert_eq!(correction_system_prompt(None, Some("  "), 2000), CORRECTION_SYSTEM);
    }

    #[test]
    fn system_prompt_truncates_references() {
        let guide = "x".repeat(50);
        let prompt = correction_system_prompt(Some(&guide), Some("Warm and direct."), 10);
        assert!(prompt.contains("## AI Writing Reference (excerpt)\n\nxxxxxxxxxx\n\n## Voice"));
        assert!(!prompt.contains(&"x".repeat(11)));
        assert!(prompt.ends_with("Warm and direct."));
    }

    #[test]
    fn placeholders_inside_values_stay_literal() {
        let prompt = correction_user_prompt("  - '{draft}' (line 1)", "Keep {feedback} as typed.");
        assert!(prompt.starts_with("  - '{draft}' (line 1)\n"));
        assert!(prompt.ends_with("Keep {feedback} as typed."));
        assert_eq!(prompt.matches("Keep").count(), 1);
    }

    #[test]
    fn user_prompt_orders_feedback_before_draft() {
        let prompt = correction_user_prompt("Fix: 'utilize'", "We utilize it.");
        let feedback_at = prompt.find("Fix: 'utilize'").unwrap();
        let draft_at = prompt.find("We utilize it.").unwrap();
        assert!(feedback_at < draft_at);
    }
}
