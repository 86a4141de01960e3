//! ac-automaton — a token-indexed Aho-Corasick automaton.
//!
//! This crate builds the matching core of a YARA-style multi-pattern
//! scanner: given a set of patterns (plain text, wide text, hex byte
//! strings with wildcards, or regular expressions), it extracts a short
//! anchor token per pattern, indexes those tokens in an Aho-Corasick trie,
//! and exposes a single-byte transition query a scanner loop can drive.
//!
//! The scanner loop itself, the arena's backing allocator, the regex
//! engine, the rule-file parser, and a CLI are all out of scope here — see
//! each module's docs for the boundary. What's here is the automaton core:
//!
//! - [`token`] — extracts candidate tokens from a pattern (C1)
//! - [`case_expand`] — expands a token into its case variants (C2)
//! - [`arena`] — the trie's node layer, index-based state/output arena,
//!   and the read-only transition query (C3, C6)
//! - [`trie`] — inserts a pattern's tokens into the trie (C4)
//! - [`failure`] — builds failure links and merges output chains (C5)
//! - [`automaton`] — the public [`Automaton`] type tying the above together
//! - [`pattern`] — the pattern data model the token generator reads from
//! - [`error`] — the crate's error type
//!
//! # Example
//!
//! ```
//! use ac_automaton::{Automaton, Pattern};
//!
//! let mut ac = Automaton::new();
//! ac.add_pattern(&Pattern::ascii(*b"he"), 1).unwrap();
//! ac.add_pattern(&Pattern::ascii(*b"she"), 2).unwrap();
//! ac.build_failure_links().unwrap();
//!
//! let mut state = ac.root();
//! state = ac.next_state(state, b's').unwrap();
//! state = ac.next_state(state, b'h').unwrap();
//! state = ac.next_state(state, b'e').unwrap();
//! let ids: Vec<u32> = ac.outputs(state).into_iter().map(|o| o.pattern_id).collect();
//! assert!(ids.contains(&2)); // "she" matched directly
//! assert!(ids.contains(&1)); // "he" matched as a suffix, via the failure link
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod automaton;
pub mod case_expand;
pub mod error;
pub mod failure;
pub mod pattern;
pub mod token;
pub mod trie;

pub use crate::automaton::Automaton;
pub use crate::error::{CoreError, Result};
pub use crate::pattern::{Pattern, PatternFlags, RegexFirstBytes};

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
