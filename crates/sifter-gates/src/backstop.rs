//! Backstop: deterministic cleanup that runs after every generation pass.
//!
//! One pass applies, in this order: phrase swaps (longest first), word swaps, banned-char
//! sentence breaks, semicolon sentence breaks, markdown emphasis strip, decorative emoji
//! strip, whitespace normalization. Later phases assume the earlier ones already ran.
//!
//! [`hard_cleanup`] repeats the pass until the text stops changing. Removing an emoji or an
//! emphasis marker can join two words into a swap-table phrase, and the next pass picks it up.
//!
//! After cleanup the verifier reports no `char`, `semicolon`, `asterisk` or `emoji` violation
//! and nothing covered by a swap table. Context-dependent vocabulary may remain.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::{CompiledSwap, RuleCatalog};

/// Passes always allowed, even for short input.
const MIN_PASS_BUDGET: usize = 8;

static SEMICOLON_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^\S\n]*;)+[^\S\n]*").expect("valid semicolon regex"));
static EMPHASIS_WRAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*{1,3}([^\s*](?:[^\n]*?[^\s*])?)\*{1,3}").expect("valid emphasis regex")
});
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid space regex"));
static BLANK_LINE_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").expect("valid blank line regex"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));

/// Clean `text` until it reaches a fixed point. Line endings are normalized to `\n` first.
///
/// Each pass either changes the text or ends the loop. Nested swap phrases
/// ("in order in order to to") unwind one level per pass, so the pass budget grows with
/// the input length rather than being a fixed count.
pub fn hard_cleanup(catalog: &RuleCatalog, text: &str) -> String {
    let text = normalize_line_endings(text);
    let budget = text.chars().count().max(MIN_PASS_BUDGET) + 1;
    let mut current = cleanup_pass(catalog, &text);
    for _ in 1..budget {
        let next = cleanup_pass(catalog, &current);
        if next == current {
            return current;
        }
        current = next;
    }
    tracing::warn!(target: "sifter::gates", passes = budget, "Backstop stopped before reaching a fixed point");
    current
}

fn normalize_line_endings(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

/// A single pass of all seven phases.
fn cleanup_pass(catalog: &RuleCatalog, text: &str) -> String {
    let text = apply_swaps(text, catalog.phrase_swap_order());
    let text = apply_swaps(&text, catalog.word_swap_order());
    let text = match catalog.break_pattern() {
        Some(pattern) => sentence_breaks(&text, pattern),
        None => text,
    };
    let text = sentence_breaks(&text, &SEMICOLON_RUN);
    let text = strip_emphasis(&text);
    let text = strip_decorative_emoji(catalog, &text);
    normalize_whitespace(&text)
}

/// Builds output text while tracking whether the next letter should be capitalized.
struct Splicer {
    out: String,
    capitalize_next: bool,
}

impl Splicer {
    fn new(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            capitalize_next: false,
        }
    }

    /// Append text. A pending capital applies to the first character after horizontal
    /// whitespace; it is consumed by that character whether or not it is a letter.
    fn push(&mut self, segment: &str) {
        if !self.capitalize_next {
            self.out.push_str(segment);
            return;
        }
        match segment.char_indices().find(|(_, c)| *c != ' ' && *c != '\t') {
            Some((idx, c)) => {
                self.out.push_str(&segment[..idx]);
                self.out.extend(c.to_uppercase());
                self.out.push_str(&segment[idx + c.len_utf8()..]);
                self.capitalize_next = false;
            }
            None => self.out.push_str(segment),
        }
    }

    fn last_char(&self) -> Option<char> {
        self.out.chars().last()
    }

    fn finish(self) -> String {
        self.out
    }
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Phases 1 and 2: swap-table substitution in table order.
fn apply_swaps(text: &str, swaps: &[CompiledSwap]) -> String {
    let mut text = text.to_string();
    for swap in swaps {
        if !swap.pattern.is_match(&text) {
            continue;
        }
        tracing::trace!(target: "sifter::gates", key = %swap.key, "Applying swap");
        let mut splicer = Splicer::new(text.len());
        let mut last = 0;
        for m in swap.pattern.find_iter(&text) {
            splicer.push(&text[last..m.start()]);
            if starts_uppercase(m.as_str()) {
                splicer.capitalize_next = true;
            }
            splicer.push(&swap.replacement);
            last = m.end();
        }
        splicer.push(&text[last..]);
        text = splicer.finish();
    }
    text
}

fn ends_sentence(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_clause_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ':' | ';')
}

fn is_trailing_punctuation(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ':' | ';' | ')' | ']' | '}' | '"' | '\'' | '\u{201D}' | '\u{2019}')
}

/// Phases 3 and 4: each match of `marker` becomes a sentence break.
///
/// - at line start the marker is dropped;
/// - before clause punctuation the marker is dropped;
/// - after `.`/`!`/`?` only a space is inserted (and the next letter capitalized);
/// - after `,`/`:` only a space is inserted;
/// - otherwise `. ` (or `.` at line end) is inserted and the next letter capitalized.
fn sentence_breaks(text: &str, marker: &Regex) -> String {
    if !marker.is_match(text) {
        return text.to_string();
    }
    let mut splicer = Splicer::new(text.len() + 8);
    let mut last = 0;
    for m in marker.find_iter(text) {
        splicer.push(&text[last..m.start()]);
        last = m.end();

        let next = text[m.end()..].chars().next();
        let at_line_end = matches!(next, None | Some('\n'));
        match splicer.last_char() {
            None | Some('\n') => {}
            _ if next.is_some_and(is_clause_punctuation) => {}
            Some(prev) if ends_sentence(prev) => {
                if !at_line_end {
                    splicer.push(" ");
                }
                splicer.capitalize_next = true;
            }
            Some(',') | Some(':') => {
                if !at_line_end {
                    splicer.push(" ");
                }
            }
            Some(_) => {
                splicer.push(if at_line_end { "." } else { ". " });
                splicer.capitalize_next = true;
            }
        }
    }
    splicer.push(&text[last..]);
    splicer.finish()
}

/// Phase 5: unwrap `*x*`, `**x**`, `***x***`, then drop every asterisk except a single
/// line-leading bullet marker followed by whitespace.
fn strip_emphasis(text: &str) -> String {
    let unwrapped = EMPHASIS_WRAP.replace_all(text, "$1");
    if !unwrapped.contains('*') {
        return unwrapped.into_owned();
    }
    unwrapped
        .split('\n')
        .map(strip_stray_asterisks)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_stray_asterisks(line: &str) -> String {
    let body = line.trim_start_matches([' ', '\t']);
    let (indent, body) = line.split_at(line.len() - body.len());
    let mut out = String::with_capacity(line.len());
    out.push_str(indent);

    let rest = match body.strip_prefix('*') {
        Some(after) if after.is_empty() || after.starts_with([' ', '\t']) => {
            out.push('*');
            after
        }
        _ => body,
    };
    out.extend(rest.chars().filter(|c| *c != '*'));
    out
}

/// Phase 6: remove decorative emoji clusters. Between two words a cluster and its
/// surrounding horizontal whitespace collapse to one space; at a line edge or before
/// closing punctuation it vanishes. A bullet asterisk keeps its following space.
fn strip_decorative_emoji(catalog: &RuleCatalog, text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let decorative_at = |i: usize| catalog.is_decorative_after(i.checked_sub(1).map(|p| chars[p]), chars[i]);
    if !(0..chars.len()).any(decorative_at) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if !decorative_at(i) {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        // Consume the cluster: decorative chars and the horizontal whitespace between/after them.
        while i < chars.len() && (decorative_at(i) || chars[i] == ' ' || chars[i] == '\t') {
            i += 1;
        }
        let trimmed_len = out.trim_end_matches([' ', '\t']).len();
        out.truncate(trimmed_len);

        let prev = out.chars().last();
        let next = chars.get(i).copied();
        let keep_space = match (prev, next) {
            (None, _) | (Some('\n'), _) | (_, None) | (_, Some('\n')) => false,
            (Some('*'), Some(_)) => true,
            (Some(_), Some(n)) => !is_trailing_punctuation(n),
        };
        if keep_space {
            out.push(' ');
        }
    }
    out
}

/// Phase 7: collapse spaces, blank out whitespace-only lines, cap blank runs at one, trim.
fn normalize_whitespace(text: &str) -> String {
    let text = MULTI_SPACE.replace_all(text, " ");
    let text = BLANK_LINE_SPACES.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
