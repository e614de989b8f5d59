//! Voice gate: rewrite a draft to sound like the person described in a voice print.

/// System instruction for the voice-matching rewrite.
pub const VOICE_GATE_SYSTEM: &str = r#"You are a voice-matching editor. Your only job is to rewrite the draft so it sounds exactly like the person described in the voice print reference.

Do not reintroduce AI writing patterns while matching the voice: no em dashes, no markdown asterisks, no formal connectors (furthermore, moreover, additionally), no five-dollar words (utilize, leverage, harness).

Rules:
- Match the tone, vocabulary, sentence patterns and energy of the voice print
- Use signature phrases naturally, without forcing every one in
- Match the formatting habits for this content type (LinkedIn post, newsletter, email)
- Prefer collaborative "we/let's" framing over "you should"
- Keep a conversational register: contractions, fragments, casual connectors
- Preserve all factual content, structure and approximate length
- Do not add information, commentary or notes. Return only the rewritten draft
- Preserve hashtags"#;

/// User prompt template: `{draft}` is replaced with the current draft.
pub const VOICE_GATE_USER_TEMPLATE: &str = r#"Rewrite this draft to match the voice print:

{draft}"#;

/// System prompt with the voice print attached.
pub fn voice_gate_system_prompt(voice_print: &str) -> String {
    format!("{}\n\n## Voice Print Reference\n\n{}", VOICE_GATE_SYSTEM, voice_print)
}

/// Build the user prompt for the given draft.
pub fn voice_gate_user_prompt(draft: &str) -> String {
    VOICE_GATE_USER_TEMPLATE.replace("{draft}", draft)
}
