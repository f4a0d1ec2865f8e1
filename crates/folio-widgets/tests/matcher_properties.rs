//! Property tests for the fuzzy matcher and suggestion ranking.

use folio_widgets::command_palette::{CommandRegistry, MatchPolicy, score, suggest};
use proptest::prelude::*;

proptest! {
    #[test]
    fn empty_query_always_scores_zero(text in ".{0,24}") {
        prop_assert_eq!(score("", &text), 0);
    }

    #[test]
    fn text_scores_itself_at_least_as_well_as_any_query(text in "[a-z]{1,12}", query in "[a-z]{1,12}") {
        prop_assert!(score(&text, &text) >= score(&query, &text));
    }

    #[test]
    fn prefix_match_beats_missing_first_char(text in "[a-z]{2,12}") {
        let prefix = &text[..1];
        prop_assert!(score(prefix, &text) >= 150);
    }

    #[test]
    fn suggestions_are_sorted_and_capped(query in "[a-z ]{0,6}") {
        let reg = CommandRegistry::default();
        let policy = MatchPolicy::default();
        let ranked = suggest(&reg, &query, policy);
        if !query.trim().is_empty() {
            prop_assert!(ranked.len() <= policy.max_suggestions);
            prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }
        for s in &ranked {
            prop_assert!(s.index < reg.len());
        }
    }

    #[test]
    fn every_key_prefix_suggests_its_command(idx in 0usize..15, cut in 1usize..6) {
        let reg = CommandRegistry::default();
        let key = reg.commands()[idx].key;
        let prefix = &key[..cut.min(key.len())];
        let ranked = suggest(&reg, prefix, MatchPolicy { threshold: 120, max_suggestions: 64 });
        prop_assert!(ranked.iter().any(|s| s.index == idx));
    }
}

#[test]
fn fuzzy_ordering_examples() {
    let exact = score("about", "about");
    let partial = score("abt", "about");
    let none = score("xyz", "about");
    assert!(exact > partial);
    assert!(partial > none);
    assert_eq!(none, 0);
}
