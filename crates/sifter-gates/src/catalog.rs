//! Rule catalog: the house-style tables shared by the verifier and the backstop.
//!
//! A catalog is built once (see [`RuleCatalog::shared_house_style`]) and is read-only
//! afterwards, so any number of concurrent gate runs can hold the same `Arc`. Every regular
//! expression the verifier and backstop need is compiled here, at construction.
//!
//! Construction rejects inconsistent tables: a swap key that the verifier would never flag,
//! a replacement that would itself be flagged, or a sentinel listed as decorative.

use once_cell::sync::Lazy;
use regex::Regex;
use sifter_core::{SifterError, SifterResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// ✅ list marker. Never flagged or stripped.
pub const CHECK_MARK: char = '\u{2705}';
/// ❌ list marker. Never flagged or stripped.
pub const CROSS_MARK: char = '\u{274C}';
pub const SENTINELS: [char; 2] = [CHECK_MARK, CROSS_MARK];
/// Emoji presentation selector. Part of the sentinel when it directly follows one.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Em dash and en dash.
const HOUSE_BANNED_CHARS: &[char] = &['\u{2014}', '\u{2013}'];

const HOUSE_BANNED_WORDS: &[&str] = &[
    // verbs
    "delve", "delving", "harness", "harnessing", "leverage", "leveraging",
    "utilize", "utilizing", "facilitate", "augment", "embark",
    "illuminate", "underscore", "bolster", "spearhead",
    "foster", "cultivate", "streamline", "empower", "elevate",
    "amplify", "curate", "catalyze", "galvanize",
    // adjectives
    "robust", "seamless", "transformative",
    "groundbreaking", "exemplary", "invaluable", "commendable",
    "pivotal", "paramount", "multifaceted", "holistic", "synergistic",
    "ever-evolving", "thought-provoking",
    "unparalleled", "revolutionary", "unprecedented",
    // nouns
    "tapestry", "realm", "beacon", "paradigm", "synergy", "synergies",
    "stakeholder", "nexus", "plethora", "cacophony",
    // register
    "enlightening", "esteemed", "intricate", "elucidate",
];

const HOUSE_BANNED_CONNECTORS: &[&str] = &[
    "furthermore", "moreover", "additionally", "consequently",
    "nevertheless", "nonetheless", "notwithstanding", "subsequently",
    "accordingly", "hereby", "whereby",
    "undoubtedly", "arguably", "notably", "remarkably",
    "crucially", "importantly",
];

const HOUSE_BANNED_PHRASES: &[&str] = &[
    "it's important to note", "it's important to note that",
    "it's worth noting", "it's worth noting that",
    "it's worth mentioning", "it's worth mentioning that",
    "it's crucial to understand", "it is essential to consider",
    "in today's", "in the realm of", "serves as a",
    "at the end of the day", "in conclusion", "in closing", "in summary",
    "moving forward", "the bottom line", "the bottom line is",
    "navigate the", "embark on a journey",
    "unlock the potential", "harness the power",
    "at the forefront", "at the forefront of",
    "bridge the gap", "pave the way", "whether you're a seasoned",
    "as we navigate", "in an ever-evolving", "from a broader perspective",
    "generally speaking", "it could be argued", "it could be argued that",
    "needless to say", "it goes without saying", "for all intents and purposes",
    "at this point in time", "in order to", "due to the fact that",
    "has the ability to", "delve into", "shed light", "shed light on", "dive deep",
    "in a world where", "remains to be seen",
    // bridges
    "with that in mind", "on the flip side", "to put it simply",
    "to that end", "by the same token", "in the same vein", "along those lines",
    // closers
    "to sum up", "in essence", "all things considered", "to wrap things up",
    "as we've seen", "final thoughts",
    // hedging
    "perhaps you might want", "you may want to check", "one might argue",
    "it should be noted", "bearing in mind",
    "given the fact that", "as a matter of fact", "in light of the fact",
    // openers
    "in the world of", "have you ever wondered",
    "when it comes to", "at its core",
];

// Context-dependent words (landscape, dynamic, innovative...) stay out of both swap tables.
const HOUSE_WORD_SWAPS: &[(&str, &str)] = &[
    ("utilize", "use"), ("utilizing", "using"),
    ("leverage", "use"), ("leveraging", "using"),
    ("harness", "use"), ("harnessing", "using"),
    ("facilitate", "help"), ("empower", "help"),
    ("embark", "start"), ("illuminate", "show"),
    ("underscore", "highlight"), ("bolster", "support"),
    ("foster", "build"), ("cultivate", "build"),
    ("streamline", "simplify"), ("elevate", "raise"),
    ("amplify", "increase"), ("curate", "pick"),
    ("catalyze", "start"), ("galvanize", "push"),
    ("spearhead", "lead"), ("augment", "add to"),
    ("delve", "dig"), ("delving", "digging"),
    ("robust", "strong"), ("seamless", "smooth"),
    ("transformative", "big"), ("groundbreaking", "new"),
    ("pivotal", "key"), ("paramount", "top"),
    ("multifaceted", "complex"), ("holistic", "whole"),
    ("unparalleled", "rare"), ("unprecedented", "new"),
    ("revolutionary", "new"), ("elucidate", "explain"),
    ("ever-evolving", "changing"),
    // connectors
    ("furthermore", "and"), ("moreover", "and"),
    ("additionally", "also"), ("consequently", "so"),
    ("nevertheless", "but"), ("nonetheless", "but"),
    ("subsequently", "then"), ("accordingly", "so"),
    ("undoubtedly", ""), ("arguably", ""),
    ("notably", ""), ("remarkably", ""),
    ("crucially", ""), ("importantly", ""),
    ("hereby", ""), ("whereby", "where"),
    ("notwithstanding", "despite"),
    // nouns
    ("tapestry", "mix"), ("realm", "area"), ("beacon", "guide"),
    ("paradigm", "model"), ("synergy", "teamwork"), ("synergies", "gains"),
    ("stakeholder", "person"), ("nexus", "center"),
    ("plethora", "lot"), ("cacophony", "noise"),
];

const HOUSE_PHRASE_SWAPS: &[(&str, &str)] = &[
    ("in order to", "to"),
    ("due to the fact that", "because"),
    ("has the ability to", "can"),
    ("at this point in time", "now"),
    ("for all intents and purposes", ""),
    ("it goes without saying", ""),
    ("needless to say", ""),
    ("it's important to note that", ""),
    ("it's important to note", ""),
    ("it's worth noting that", ""),
    ("it's worth noting", ""),
    ("it's worth mentioning that", ""),
    ("it's worth mentioning", ""),
    ("from a broader perspective", ""),
    ("generally speaking", ""),
    ("it could be argued that", ""),
    ("it could be argued", ""),
    ("in conclusion", ""),
    ("in closing", ""),
    ("in summary", ""),
    ("moving forward", ""),
    ("the bottom line is", ""),
    ("the bottom line", ""),
    ("at the end of the day", ""),
    ("serves as a", "is a"),
    ("delve into", "dig into"),
    ("dive deep", "dig in"),
    ("shed light on", "show"),
    ("shed light", "show"),
    ("navigate the", "handle the"),
    ("harness the power", "use"),
    ("unlock the potential", "tap into"),
    ("in the realm of", "in"),
    ("in today's", "today,"),
    ("as we navigate", "as we work through"),
    ("bridge the gap", "close the gap"),
    ("pave the way", "open the door"),
    ("at the forefront of", "leading"),
    ("at the forefront", "leading"),
    ("all things considered", ""),
    ("to sum up", ""),
    ("to wrap things up", ""),
    ("final thoughts", ""),
    ("with that in mind", "so"),
    ("on the flip side", "but"),
    ("to put it simply", ""),
    ("to that end", "so"),
    ("by the same token", "similarly"),
    ("in the same vein", "similarly"),
    ("along those lines", "similarly"),
    ("in an ever-evolving", "in a changing"),
    ("remains to be seen", "is unclear"),
    ("in a world where", "when"),
    ("embark on a journey", "start"),
];

/// Decorative emoji, including the joiner, variation selector and sign code points that make
/// up the multi-code-point heart and shrug emoji.
const HOUSE_DECORATIVE_EMOJI: &[char] = &[
    '🚀', '💪', '✨', '🔥', '💡', '🎯', '🙌', '👏', '👇', '👆', '🤔', '💰', '🎉', '🏆',
    '🌟', '⭐', '💥', '🔑', '📌', '🙏', '❤', '🤝', '💼', '📈', '🧠', '👀', '🎁', '💎',
    '🫶', '🤷', '♀', '♂', '\u{200D}', '\u{FE0F}',
];

static HOUSE_STYLE: Lazy<Arc<RuleCatalog>> = Lazy::new(|| {
    Arc::new(RuleCatalog::house_style().expect("built-in house style tables are consistent"))
});

/// A banned term with its word-boundary pattern.
#[derive(Debug)]
pub(crate) struct CompiledTerm {
    pub term: String,
    pub pattern: Regex,
}

/// A swap-table entry with its match pattern.
#[derive(Debug)]
pub(crate) struct CompiledSwap {
    pub key: String,
    pub replacement: String,
    pub pattern: Regex,
}

/// Immutable house-style rule tables plus their compiled matchers.
#[derive(Debug)]
pub struct RuleCatalog {
    banned_chars: BTreeSet<char>,
    banned_words: BTreeSet<String>,
    banned_connectors: BTreeSet<String>,
    banned_phrases: Vec<String>,
    word_swaps: BTreeMap<String, String>,
    phrase_swaps: BTreeMap<String, String>,
    decorative_emoji: BTreeSet<char>,

    word_patterns: Vec<CompiledTerm>,
    connector_patterns: Vec<CompiledTerm>,
    phrase_swap_order: Vec<CompiledSwap>,
    word_swap_order: Vec<CompiledSwap>,
    break_pattern: Option<Regex>,
}

impl RuleCatalog {
    /// The built-in house style.
    pub fn house_style() -> SifterResult<Self> {
        RuleCatalogBuilder::house_style().build()
    }

    /// Process-wide house-style catalog, built on first use.
    pub fn shared_house_style() -> Arc<RuleCatalog> {
        Arc::clone(&HOUSE_STYLE)
    }

    pub fn builder() -> RuleCatalogBuilder {
        RuleCatalogBuilder::new()
    }

    pub fn banned_chars(&self) -> &BTreeSet<char> {
        &self.banned_chars
    }

    pub fn banned_words(&self) -> &BTreeSet<String> {
        &self.banned_words
    }

    pub fn banned_connectors(&self) -> &BTreeSet<String> {
        &self.banned_connectors
    }

    pub fn banned_phrases(&self) -> &[String] {
        &self.banned_phrases
    }

    pub fn word_swaps(&self) -> &BTreeMap<String, String> {
        &self.word_swaps
    }

    pub fn phrase_swaps(&self) -> &BTreeMap<String, String> {
        &self.phrase_swaps
    }

    pub fn decorative_emoji(&self) -> &BTreeSet<char> {
        &self.decorative_emoji
    }

    pub fn is_decorative(&self, c: char) -> bool {
        self.decorative_emoji.contains(&c)
    }

    /// Like [`is_decorative`](Self::is_decorative), but a variation selector right after a
    /// sentinel (`❌\u{FE0F}`) counts as part of the sentinel.
    pub fn is_decorative_after(&self, prev: Option<char>, c: char) -> bool {
        if c == VARIATION_SELECTOR && prev.is_some_and(|p| SENTINELS.contains(&p)) {
            return false;
        }
        self.is_decorative(c)
    }

    pub(crate) fn word_patterns(&self) -> &[CompiledTerm] {
        &self.word_patterns
    }

    pub(crate) fn connector_patterns(&self) -> &[CompiledTerm] {
        &self.connector_patterns
    }

    /// Phrase swaps, longest key first.
    pub(crate) fn phrase_swap_order(&self) -> &[CompiledSwap] {
        &self.phrase_swap_order
    }

    pub(crate) fn word_swap_order(&self) -> &[CompiledSwap] {
        &self.word_swap_order
    }

    /// Matches a run of banned chars with its surrounding horizontal whitespace.
    pub(crate) fn break_pattern(&self) -> Option<&Regex> {
        self.break_pattern.as_ref()
    }
}

/// Assembles a [`RuleCatalog`]. Terms are trimmed and lowercased; duplicates collapse.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalogBuilder {
    banned_chars: Vec<char>,
    banned_words: Vec<String>,
    banned_connectors: Vec<String>,
    banned_phrases: Vec<String>,
    word_swaps: Vec<(String, String)>,
    phrase_swaps: Vec<(String, String)>,
    decorative_emoji: Vec<char>,
}

impl RuleCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled with the built-in house style.
    pub fn house_style() -> Self {
        Self::new()
            .banned_chars(HOUSE_BANNED_CHARS.iter().copied())
            .banned_words(HOUSE_BANNED_WORDS.iter().copied())
            .banned_connectors(HOUSE_BANNED_CONNECTORS.iter().copied())
            .banned_phrases(HOUSE_BANNED_PHRASES.iter().copied())
            .word_swaps(HOUSE_WORD_SWAPS.iter().copied())
            .phrase_swaps(HOUSE_PHRASE_SWAPS.iter().copied())
            .decorative_emoji(HOUSE_DECORATIVE_EMOJI.iter().copied())
    }

    pub fn banned_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.banned_chars.extend(chars);
        self
    }

    pub fn banned_words<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.banned_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn banned_connectors<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.banned_connectors.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn banned_phrases<S: Into<String>>(mut self, phrases: impl IntoIterator<Item = S>) -> Self {
        self.banned_phrases.extend(phrases.into_iter().map(Into::into));
        self
    }

    pub fn word_swaps<K: Into<String>, V: Into<String>>(mut self, swaps: impl IntoIterator<Item = (K, V)>) -> Self {
        self.word_swaps
            .extend(swaps.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn phrase_swaps<K: Into<String>, V: Into<String>>(mut self, swaps: impl IntoIterator<Item = (K, V)>) -> Self {
        self.phrase_swaps
            .extend(swaps.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn decorative_emoji(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.decorative_emoji.extend(chars);
        self
    }

    /// Merge extra banned words from a term file (one per line; blank and `#` lines ignored).
    /// A missing file adds nothing.
    pub fn merge_words_from_path(self, path: &Path) -> std::io::Result<Self> {
        let extra = read_terms_from_path(path)?;
        Ok(self.banned_words(extra))
    }

    pub fn build(self) -> SifterResult<RuleCatalog> {
        let banned_chars: BTreeSet<char> = self.banned_chars.into_iter().collect();
        let banned_words = normalize_set(self.banned_words);
        let banned_connectors = normalize_set(self.banned_connectors);
        let mut banned_phrases: Vec<String> = Vec::new();
        for phrase in self.banned_phrases.into_iter().filter_map(normalize_term) {
            if !banned_phrases.contains(&phrase) {
                banned_phrases.push(phrase);
            }
        }
        let word_swaps = normalize_swaps(self.word_swaps);
        let phrase_swaps = normalize_swaps(self.phrase_swaps);
        let decorative_emoji: BTreeSet<char> = self.decorative_emoji.into_iter().collect();

        if let Some(s) = SENTINELS.iter().find(|s| decorative_emoji.contains(*s)) {
            return Err(catalog_error(format!("sentinel '{}' cannot be decorative", s)));
        }
        if banned_chars.iter().any(|c| SENTINELS.contains(c) || c.is_whitespace()) {
            return Err(catalog_error("banned chars cannot include sentinels or whitespace"));
        }
        for key in word_swaps.keys() {
            if !banned_words.contains(key) && !banned_connectors.contains(key) {
                return Err(catalog_error(format!("word swap '{}' is not a banned word or connector", key)));
            }
        }
        for key in phrase_swaps.keys() {
            if !banned_phrases.contains(key) {
                return Err(catalog_error(format!("phrase swap '{}' is not a banned phrase", key)));
            }
        }

        let word_patterns = compile_terms(&banned_words)?;
        let connector_patterns = compile_terms(&banned_connectors)?;

        let mut phrase_keys: Vec<&String> = phrase_swaps.keys().collect();
        phrase_keys.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        let phrase_swap_order = phrase_keys
            .into_iter()
            .map(|key| compile_swap(key, &phrase_swaps[key], phrase_pattern(key)))
            .collect::<SifterResult<Vec<_>>>()?;
        let word_swap_order = word_swaps
            .iter()
            .map(|(key, replacement)| compile_swap(key, replacement, word_pattern(key)))
            .collect::<SifterResult<Vec<_>>>()?;

        let break_pattern = if banned_chars.is_empty() {
            None
        } else {
            let class: String = banned_chars.iter().map(|c| regex::escape(&c.to_string())).collect();
            Some(compile(&format!(r"(?:[^\S\n]*[{}])+[^\S\n]*", class))?)
        };

        let catalog = RuleCatalog {
            banned_chars,
            banned_words,
            banned_connectors,
            banned_phrases,
            word_swaps,
            phrase_swaps,
            decorative_emoji,
            word_patterns,
            connector_patterns,
            phrase_swap_order,
            word_swap_order,
            break_pattern,
        };
        check_replacements(&catalog)?;
        Ok(catalog)
    }
}

/// Read terms from a file (one per line; empty and `#` lines ignored). Missing file = no terms.
pub fn read_terms_from_path(path: &Path) -> std::io::Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let f = fs::File::open(path)?;
    let mut terms = Vec::new();
    for line in std::io::BufReader::new(f).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        terms.push(line.to_string());
    }
    Ok(terms)
}

fn catalog_error(msg: impl Into<String>) -> SifterError {
    SifterError::Catalog(msg.into())
}

fn normalize_term(term: String) -> Option<String> {
    let t = term.trim().to_lowercase();
    (!t.is_empty()).then_some(t)
}

fn normalize_set(terms: Vec<String>) -> BTreeSet<String> {
    terms.into_iter().filter_map(normalize_term).collect()
}

fn normalize_swaps(swaps: Vec<(String, String)>) -> BTreeMap<String, String> {
    swaps
        .into_iter()
        .filter_map(|(k, v)| normalize_term(k).map(|k| (k, v.trim().to_string())))
        .collect()
}

fn compile(pattern: &str) -> SifterResult<Regex> {
    Regex::new(pattern).map_err(|e| catalog_error(format!("bad pattern {}: {}", pattern, e)))
}

fn word_pattern(word: &str) -> String {
    format!(r"(?i)\b{}\b", regex::escape(word))
}

/// Internal spaces match any run of horizontal whitespace.
fn phrase_pattern(phrase: &str) -> String {
    let parts: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    format!("(?i){}", parts.join(r"[^\S\n]+"))
}

fn compile_terms(terms: &BTreeSet<String>) -> SifterResult<Vec<CompiledTerm>> {
    terms
        .iter()
        .map(|term| {
            Ok(CompiledTerm {
                term: term.clone(),
                pattern: compile(&word_pattern(term))?,
            })
        })
        .collect()
}

/// A deletion also swallows one directly following comma ("Notably, it works" -> "it works").
fn compile_swap(key: &str, replacement: &str, pattern: String) -> SifterResult<CompiledSwap> {
    let pattern = if replacement.is_empty() {
        format!("{},?", pattern)
    } else {
        pattern
    };
    Ok(CompiledSwap {
        key: key.to_string(),
        replacement: replacement.to_string(),
        pattern: compile(&pattern)?,
    })
}

fn check_replacements(catalog: &RuleCatalog) -> SifterResult<()> {
    let replacements = catalog
        .word_swaps
        .iter()
        .chain(catalog.phrase_swaps.iter())
        .filter(|(_, r)| !r.is_empty());
    for (key, replacement) in replacements {
        let lower = replacement.to_lowercase();
        let offending_char = replacement
            .chars()
            .any(|c| c == ';' || c == '*' || catalog.banned_chars.contains(&c) || catalog.is_decorative(c));
        let offending_term = catalog
            .word_patterns
            .iter()
            .chain(catalog.connector_patterns.iter())
            .any(|t| t.pattern.is_match(replacement))
            || catalog.banned_phrases.iter().any(|p| lower.contains(p.as_str()));
        if offending_char || offending_term {
            return Err(catalog_error(format!(
                "replacement '{}' for '{}' would itself be flagged",
                replacement, key
            )));
        }
    }
    Ok(())
}
