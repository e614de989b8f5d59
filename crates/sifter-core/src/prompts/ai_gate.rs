//! AI-tells gate: rewrite a draft so it stops reading like machine-generated text.
//!
//! The reference guide (a catalogue of AI writing tells) is appended to the system prompt.

/// System instruction for the AI-tells rewrite.
pub const AI_GATE_SYSTEM: &str = r#"You are a strict content editor. Your only job is to rewrite the draft so it does not read like AI-generated text.

You have a reference guide of AI writing tells: banned words, banned phrases, structural patterns and anti-patterns. Apply every rule in it to the draft.

Rules:
- Remove or replace every banned word and phrase from the reference
- No em dashes (—) or en dashes (–). Use a period, comma, colon or parentheses instead
- No markdown asterisks (**bold** or *italic*). Use CAPS for emphasis ("this is HUGE", not "this is **huge**")
- Remove emoji. Keep ✅ and ❌ only when they mark list items
- No semicolons. Use periods
- Cut hedging. Be direct
- Prefer plain words ("use" not "utilize", "help" not "empower")
- Vary sentence length and break up uniform list formatting
- Drop formulaic openings, closings and filler
- Use active voice
- Keep the same content, meaning, structure and approximate length
- Do not add information, commentary or notes. Return only the rewritten draft
- Preserve CAPS emphasis, line breaks and hashtags"#;

/// User prompt template: `{draft}` is replaced with the current draft.
pub const AI_GATE_USER_TEMPLATE: &str = r#"Rewrite this draft to remove every AI-sounding pattern:

{draft}"#;

/// System prompt with the AI-tells guide attached.
pub fn ai_gate_system_prompt(reference: &str) -> String {
    format!("{}\n\n## AI Writing Reference\n\n{}", AI_GATE_SYSTEM, reference)
}

/// Build the user prompt for the given draft.
pub fn ai_gate_user_prompt(draft: &str) -> String {
    AI_GATE_USER_TEMPLATE.replace("{draft}", draft)
}
