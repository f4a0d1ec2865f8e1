#![no_main]

use folio_widgets::command_palette::{CommandRegistry, MatchPolicy, score, suggest};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(query) = std::str::from_utf8(data) else {
        return;
    };
    let registry = CommandRegistry::default();

    for command in registry.commands() {
        let _ = score(query, command.label);
    }

    let policy = MatchPolicy::default();
    let ranked = suggest(&registry, query, policy);
    if query.trim().is_empty() {
        assert_eq!(ranked.len(), registry.len());
    } else {
        assert!(ranked.len() <= policy.max_suggestions);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }
    assert!(ranked.iter().all(|s| s.index < registry.len()));
});
