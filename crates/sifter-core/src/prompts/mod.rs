//! Prompt templates for the rewrite gates and the correction pass.

pub mod ai_gate;
pub mod correction;
pub mod voice_gate;

pub use ai_gate::{ai_gate_system_prompt, ai_gate_user_prompt, AI_GATE_SYSTEM, AI_GATE_USER_TEMPLATE};
pub use correction::{
    correction_system_prompt, correction_user_prompt, excerpt, CORRECTION_SYSTEM, CORRECTION_USER_TEMPLATE,
};
pub use voice_gate::{voice_gate_system_prompt, voice_gate_user_prompt, VOICE_GATE_SYSTEM, VOICE_GATE_USER_TEMPLATE};

/// Fill `{name}` placeholders in one left-to-right scan. Substituted values are never
/// rescanned, so a value containing `{draft}` stays literal.
pub(crate) fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(name, _)| tail.strip_prefix(*name).is_some_and(|r| r.starts_with('}')));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
