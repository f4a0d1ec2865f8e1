#![forbid(unsafe_code)]

//! Fuzzy scoring and suggestion ranking.
//!
//! # Scoring
//!
//! [`score`] compares lowercase characters:
//!
//! - empty query scores 0;
//! - `+100` if the text contains the query, `+50` more if it starts with it;
//! - walking the text left to right, each character that matches the next
//!   pending query character adds `2 × run`, where `run` counts the current
//!   streak of consecutive matches; any other character ends the streak;
//! - `+20` if every query character was matched in order.
//!
//! # Ranking
//!
//! A command's score is the better of its key score and its label score.
//! It is kept when its key starts with the query, its label contains the
//! query, or its score reaches the acceptance threshold. Kept commands are
//! sorted by descending score (ties keep catalogue order) and capped.

use serde::{Deserialize, Serialize};

use super::registry::CommandRegistry;

/// Acceptance threshold and result cap for suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub threshold: u32,
    pub max_suggestions: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            threshold: 120,
            max_suggestions: 8,
        }
    }
}

/// A ranked command, addressed by its catalogue index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub index: usize,
    pub score: u32,
}

/// Fuzzy score of `query` against `text`. Case-insensitive.
#[must_use]
pub fn score(query: &str, text: &str) -> u32 {
    if query.is_empty() {
        return 0;
    }
    let query = query.to_lowercase();
    let text = text.to_lowercase();

    let mut total = 0u32;
    if text.contains(query.as_str()) {
        total += 100;
        if text.starts_with(query.as_str()) {
            total += 50;
        }
    }

    let needle: Vec<char> = query.chars().collect();
    let mut matched = 0usize;
    let mut run = 0u32;
    for ch in text.chars() {
        if matched < needle.len() && ch == needle[matched] {
            matched += 1;
            run += 1;
            total = total.saturating_add(2 * run);
        } else {
            run = 0;
        }
    }

    if matched == needle.len() {
        total += 20;
    }
    total
}

/// Rank the catalogue against `query`.
///
/// The query is trimmed and lowercased first. An empty query returns every
/// command in catalogue order with score 0 and no cap.
#[must_use]
pub fn suggest(registry: &CommandRegistry, query: &str, policy: MatchPolicy) -> Vec<Suggestion> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return (0..registry.len())
            .map(|index| Suggestion { index, score: 0 })
            .collect();
    }

    let q_len = q.chars().count();
    let mut ranked: Vec<Suggestion> = registry
        .commands()
        .iter()
        .enumerate()
        .filter_map(|(index, cmd)| {
            let label = cmd.label.to_lowercase();
            let combined = score(&q, cmd.key).max(score(&q, &label));
            let key_prefix = q_len <= cmd.key.chars().count() && cmd.key.starts_with(q.as_str());
            let label_contains = label.contains(q.as_str());
            (key_prefix || label_contains || combined >= policy.threshold)
                .then_some(Suggestion { index, score: combined })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(policy.max_suggestions);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(reg: &CommandRegistry, s: &[Suggestion]) -> Vec<&'static str> {
        s.iter().map(|s| reg.commands()[s.index].key).collect()
    }

    #[test]
    fn exact_prefix_scores_highest() {
        assert_eq!(score("about", "about"), 200);
        assert_eq!(score("abt", "about"), 28);
        assert_eq!(score("xyz", "about"), 0);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert_eq!(score("", "about"), 0);
        assert_eq!(score("", ""), 0);
    }

    #[test]
    fn scoring_ignores_case() {
        assert_eq!(score("ABOUT", "About"), score("about", "about"));
    }

    #[test]
    fn substring_not_prefix() {
        // 100 contains, 2+4+6+8 run, 20 complete.
        assert_eq!(score("mode", "dark mode"), 140);
    }

    #[test]
    fn partial_in_order_without_completion() {
        // 'a','b' match then stall on 'z'.
        assert_eq!(score("abz", "about"), 6);
    }

    #[test]
    fn empty_query_lists_catalogue() {
        let reg = CommandRegistry::default();
        let all = suggest(&reg, "   ", MatchPolicy::default());
        assert_eq!(all.len(), reg.len());
        assert!(all.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn key_prefix_is_kept_and_ranked_first() {
        let reg = CommandRegistry::default();
        let s = suggest(&reg, "li", MatchPolicy::default());
        assert_eq!(keys(&reg, &s)[0], "light");
        assert!(keys(&reg, &s).contains(&"linkedin"));
    }

    #[test]
    fn label_only_match_is_kept() {
        let reg = CommandRegistry::default();
        let s = suggest(&reg, "portfolio", MatchPolicy::default());
        assert_eq!(keys(&reg, &s), ["projects"]);
    }

    #[test]
    fn results_are_capped() {
        let reg = CommandRegistry::default();
        let policy = MatchPolicy {
            threshold: 0,
            max_suggestions: 8,
        };
        assert_eq!(suggest(&reg, "e", policy).len(), 8);
    }

    #[test]
    fn unrelated_query_yields_nothing() {
        let reg = CommandRegistry::default();
        assert!(suggest(&reg, "qqq", MatchPolicy::default()).is_empty());
    }

    #[test]
    fn ranking_is_descending() {
        let reg = CommandRegistry::default();
        let s = suggest(&reg, "s", MatchPolicy::default());
        assert!(s.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
