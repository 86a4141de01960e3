//! Integration tests for the token-indexed Aho-Corasick automaton.
//!
//! Covers end-to-end pattern-to-token-to-trie-to-scan behavior across the
//! pattern families (hex, regex, ASCII/wide text, nocase) and the arena's
//! allocation-failure path.

use ac_automaton::arena::Arena;
use ac_automaton::pattern::{mask, Pattern, PatternFlags, RegexFirstBytes};
use ac_automaton::token::generate_tokens;
use ac_automaton::trie::add_pattern;
use ac_automaton::{Automaton, CoreError};

fn scan(ac: &Automaton, input: &[u8]) -> Vec<u32> {
    let mut state = ac.root();
    let mut matches = Vec::new();
    for &b in input {
        loop {
            if let Some(next) = ac.next_state(state, b) {
                state = next;
                break;
            }
            if state == ac.root() {
                break;
            }
            state = ac.failure_state(state).unwrap();
        }
        for rec in ac.outputs(state) {
            matches.push(rec.pattern_id);
        }
    }
    matches
}

#[test]
fn b1_hex_pattern_with_wildcard_run_tokenizes_past_it() {
    let bytes = vec![
        0x98, 0x56, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x34, 0xEB, 0x45, 0x97, 0x21,
    ];
    let mut m = vec![mask::LITERAL; bytes.len()];
    m[2] = 0x00;
    m[3] = 0x00;
    m.push(mask::END);
    let pattern = Pattern::hex(bytes, m);

    // The window first reaches full byte-distinctness at the boundary
    // between the homogeneous 00-run and the distinct run that follows it
    // (positions 7-10), one byte before the "clean" window a reader might
    // expect — see DESIGN.md, Open Question 6.
    let tokens = generate_tokens(&pattern);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].bytes, vec![0x00, 0x34, 0xEB, 0x45]);
    assert_eq!(tokens[0].backtrack, 7);
}

#[test]
fn b3_nocase_ascii_pattern_scans_any_casing() {
    let mut ac = Automaton::new();
    let pattern = Pattern::text(
        *b"Hi",
        PatternFlags {
            ascii: true,
            nocase: true,
            ..Default::default()
        },
    );
    ac.add_pattern(&pattern, 1).unwrap();
    ac.build_failure_links().unwrap();

    for variant in ["Hi", "HI", "hi", "hI"] {
        let matches = scan(&ac, variant.as_bytes());
        assert!(matches.contains(&1), "{} should match", variant);
    }
    assert!(!scan(&ac, b"yo").contains(&1));
}

#[test]
fn b5_regex_literal_prefix_used_as_token() {
    let pattern = Pattern::regex(*b"^abc*def", false, None);
    let tokens = generate_tokens(&pattern);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].bytes, b"ab".to_vec());
}

#[test]
fn b6_degenerate_regex_pattern_matches_via_root_attachment() {
    struct DigitsOnly;
    impl RegexFirstBytes for DigitsOnly {
        fn first_bytes(&self) -> Vec<u8> {
            (b'0'..=b'9').collect()
        }
    }

    let mut ac = Automaton::new();
    // No literal prefix at all: falls back to the first-byte set, which
    // still isn't empty, so it gets a token per candidate first byte
    // instead of being truly degenerate.
    let pattern = Pattern::regex(*b".*", false, Some(Box::new(DigitsOnly)));
    ac.add_pattern(&pattern, 1).unwrap();
    ac.build_failure_links().unwrap();

    assert!(scan(&ac, b"x5y").contains(&1));
    assert!(!scan(&ac, b"xyz").contains(&1));
}

#[test]
fn e1_overlapping_patterns_all_report_at_shared_endpoint() {
    // Classic Aho-Corasick multi-pattern demonstration.
    let mut ac = Automaton::new();
    for (text, id) in [("he", 1u32), ("she", 2), ("his", 3), ("hers", 4)] {
        ac.add_pattern(&Pattern::ascii(text.as_bytes().to_vec()), id)
            .unwrap();
    }
    ac.build_failure_links().unwrap();

    let matches = scan(&ac, b"ushers");
    assert!(matches.contains(&2), "'she' should match in 'ushers'");
    assert!(matches.contains(&1), "'he' should match as a suffix of 'she'");
    assert!(matches.contains(&4), "'hers' should match in 'ushers'");
    assert!(!matches.contains(&3), "'his' should not match in 'ushers'");
}

#[test]
fn e2_wide_and_ascii_variants_of_same_text_both_indexed() {
    let mut ac = Automaton::new();
    ac.add_pattern(
        &Pattern::text(
            *b"go",
            PatternFlags {
                ascii: true,
                wide: true,
                ..Default::default()
            },
        ),
        1,
    )
    .unwrap();
    ac.build_failure_links().unwrap();

    assert!(scan(&ac, b"go").contains(&1));
    assert!(scan(&ac, &[b'g', 0x00, b'o', 0x00]).contains(&1));
}

#[test]
fn e3_shared_prefix_patterns_both_match_independently() {
    let mut ac = Automaton::new();
    ac.add_pattern(&Pattern::ascii(*b"abcd"), 1).unwrap();
    ac.add_pattern(&Pattern::ascii(*b"abXY"), 2).unwrap();
    ac.build_failure_links().unwrap();

    assert_eq!(scan(&ac, b"abcd"), vec![1]);
    assert_eq!(scan(&ac, b"abXY"), vec![2]);
    assert!(scan(&ac, b"abqq").is_empty());
}

#[test]
fn e4_arena_budget_exhaustion_reports_insufficient_memory() {
    let mut arena = Arena::with_budget(2);
    let pattern = Pattern::ascii(*b"toolong");
    let result = add_pattern(&mut arena, &pattern, 1);
    match result {
        Err(CoreError::InsufficientMemory(_)) => {}
        other => panic!("expected InsufficientMemory, got {:?}", other),
    }
}

#[test]
fn empty_pattern_set_never_matches_anything() {
    let mut ac = Automaton::new();
    ac.build_failure_links().unwrap();
    assert!(scan(&ac, b"anything at all").is_empty());
}
