use proptest::prelude::*;
use sifter_gates::{hard_cleanup, verify, RuleCatalog, ViolationCategory};

/// Fragments that exercise every backstop phase when glued together in random order.
const FRAGMENTS: &[&str] = &[
    "the", "plan", "works", "we", "team", "Today", "data", " ", " ", "  ", "\t", "\n", "\n\n\n",
    ".", ",", "!", "?", ":", "(", ")", "'", "utilize", "Robust", "seamless", "furthermore",
    "Notably,", "delve", "in order to", "delve into", "At the forefront of", "needless to say,",
    "—", "–", " — ", ";", "; ", "*", "* ", "**", "***", "🚀", "✨", " 💪 ", "🤷\u{200D}♀\u{FE0F}",
    "✅", "❌", "\r\n", "\u{FE0F}",
];

fn draft() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS.to_vec()), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn cleanup_is_idempotent(text in draft()) {
        let catalog = RuleCatalog::shared_house_style();
        let once = hard_cleanup(&catalog, &text);
        let twice = hard_cleanup(&catalog, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn mechanical_categories_always_converge(text in draft()) {
        let catalog = RuleCatalog::shared_house_style();
        let out = hard_cleanup(&catalog, &text);
        let leftover: Vec<_> = verify(&catalog, &out)
            .into_iter()
            .filter(|v| v.category.is_mechanical())
            .collect();
        prop_assert!(leftover.is_empty(), "{:?} -> {:?}: {:?}", text, out, leftover);
    }

    #[test]
    fn mechanical_categories_converge_on_arbitrary_text(text in "\\PC{0,80}") {
        let catalog = RuleCatalog::shared_house_style();
        let out = hard_cleanup(&catalog, &text);
        prop_assert!(verify(&catalog, &out).iter().all(|v| !v.category.is_mechanical()));
    }

    #[test]
    fn swap_table_vocabulary_never_survives(text in draft()) {
        let catalog = RuleCatalog::shared_house_style();
        let out = hard_cleanup(&catalog, &text);
        for v in verify(&catalog, &out) {
            let covered = match v.category {
                ViolationCategory::Word | ViolationCategory::Connector => catalog.word_swaps().contains_key(&v.matched),
                ViolationCategory::Phrase => catalog.phrase_swaps().contains_key(&v.matched),
                _ => false,
            };
            prop_assert!(!covered, "{:?} survived in {:?}", v, out);
        }
    }
}

#[test]
fn deeply_nested_swap_phrases_reach_a_fixed_point() {
    let catalog = RuleCatalog::shared_house_style();
    for depth in [9, 12, 20] {
        let nested = format!("{}to{}", "In order ".repeat(depth), " to".repeat(depth - 1));
        let once = hard_cleanup(&catalog, &nested);
        let twice = hard_cleanup(&catalog, &once);
        assert_eq!(once, twice, "depth {}", depth);
        assert!(verify(&catalog, &once).is_empty(), "depth {}: {:?}", depth, once);
        assert!(!once.to_lowercase().contains("in order"));
    }
}

#[test]
fn every_word_swap_key_is_cleared_on_its_own() {
    let catalog = RuleCatalog::shared_house_style();
    for key in catalog.word_swaps().keys() {
        for input in [key.clone(), capitalize(key), format!("We {} it.", key)] {
            let out = hard_cleanup(&catalog, &input);
            let hits: Vec<_> = verify(&catalog, &out)
                .into_iter()
                .filter(|v| matches!(v.category, ViolationCategory::Word | ViolationCategory::Connector))
                .collect();
            assert!(hits.is_empty(), "{:?} -> {:?}: {:?}", input, out, hits);
        }
    }
}

#[test]
fn every_phrase_swap_key_is_cleared_on_its_own() {
    let catalog = RuleCatalog::shared_house_style();
    for key in catalog.phrase_swaps().keys() {
        for input in [key.clone(), capitalize(key)] {
            let out = hard_cleanup(&catalog, &input);
            assert!(verify(&catalog, &out).is_empty(), "{:?} -> {:?}", input, out);
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
