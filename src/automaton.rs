//! Public entry point tying together token generation (C1/C2), the trie
//! (C3/C4), failure-link construction (C5), and the read-only query (C6)
//! into the single `Automaton` type a caller builds once and then scans
//! with. Mirrors the top-level `yr_ac_create_automaton` /
//! `yr_ac_add_string` / `yr_ac_create_failure_links` / `yr_ac_next_state`
//! grouping in `examples/original_source/libyara/ahocorasick.c`, and the
//! builder-then-frozen-automaton shape of `ACBuilder` in
//! `examples/sethhall-matchy/src/ac_offset.rs`.

use crate::arena::{Arena, OutputRecord, StateRef};
use crate::error::Result;
use crate::failure::create_failure_links;
use crate::pattern::Pattern;
use crate::trie::add_pattern;

/// A token-indexed Aho-Corasick automaton.
///
/// Built in two phases: patterns are inserted with [`Automaton::add_pattern`]
/// in any order, then [`Automaton::build_failure_links`] is called exactly
/// once to finish the automaton before [`Automaton::next_state`] is used to
/// scan. Calling `add_pattern` again after `build_failure_links` leaves the
/// newly inserted states without failure links or inherited outputs — this
/// type does not guard against that misuse, matching the original's
/// unchecked two-phase build.
pub struct Automaton {
    arena: Arena,
    built: bool,
}

impl Automaton {
    /// An empty automaton backed by an unbounded arena.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            built: false,
        }
    }

    /// An empty automaton whose arena fails allocation past `budget`
    /// states/output records, for exercising the out-of-memory path.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            arena: Arena::with_budget(budget),
            built: false,
        }
    }

    /// C1+C2+C3+C4 — extracts `pattern`'s tokens (expanding case variants as
    /// needed) and inserts a trie path per token, tagging each with
    /// `pattern_id`. Returns the number of token paths inserted; `0` means
    /// `pattern` was degenerate and was attached directly to the root.
    pub fn add_pattern(&mut self, pattern: &Pattern, pattern_id: u32) -> Result<usize> {
        add_pattern(&mut self.arena, pattern, pattern_id)
    }

    /// C5 — computes every state's failure link and merges output chains.
    /// Must be called once, after all patterns have been added and before
    /// any call to `next_state`.
    pub fn build_failure_links(&mut self) -> Result<()> {
        create_failure_links(&mut self.arena)?;
        self.built = true;
        Ok(())
    }

    /// The trie root, the starting state for any scan.
    pub fn root(&self) -> StateRef {
        self.arena.root()
    }

    /// C6 — follows `byte` from `state` along a direct trie edge only. Does
    /// not fail back through failure links; a scanner loop built on top of
    /// this automaton is responsible for retrying at `failure_state(state)`
    /// when this returns `None` and `state` isn't the root (out of scope
    /// here — see `spec.md`'s Non-goals).
    pub fn next_state(&self, state: StateRef, byte: u8) -> Option<StateRef> {
        self.arena.next_state(state, byte)
    }

    /// The failure link computed for `state` by `build_failure_links`.
    pub fn failure_state(&self, state: StateRef) -> Option<StateRef> {
        self.arena.failure(state)
    }

    /// Walks the output chain attached to `state`, in chain order (own
    /// matches before inherited ones).
    pub fn outputs(&self, state: StateRef) -> Vec<OutputRecord> {
        let mut out = Vec::new();
        let mut cursor = self.arena.output_head(state);
        while let Some(r) = cursor {
            let rec = *self.arena.output_record(r);
            out.push(rec);
            cursor = rec.next;
        }
        out
    }

    /// Total number of states currently in the trie, root included.
    pub fn state_count(&self) -> usize {
        self.arena.state_count()
    }

    /// Whether [`Automaton::build_failure_links`] has run yet. A scanner
    /// should refuse to use an automaton that isn't built.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Debug dump of the automaton, one line per state, in preorder.
    ///
    /// Ported from `_yr_ac_print_automaton_state` in
    /// `examples/original_source/libyara/ahocorasick.c`: each line is
    /// indented by `depth` spaces, followed by the state's address, depth,
    /// and failure-link address, then one `identifier:backtrack` entry per
    /// record in the state's (already failure-merged) output chain —
    /// `<indent><addr> (<depth>) -> <failure-addr> [ identifier:backtrack
    /// ]*`, per `spec.md` §6. States have no real pointer identity here, so
    /// `StateRef`'s index stands in for the address; a match's caller-chosen
    /// `pattern_id` stands in for the original's string identifier. This
    /// crate has no logging dependency (`spec.md` scopes that out), so the
    /// dump is returned as a plain string for the caller to log, print, or
    /// assert against in tests, rather than calling `println!` directly.
    pub fn print(&self) -> String {
        let mut out = String::new();
        self.print_state(self.root(), &mut out);
        out
    }

    fn print_state(&self, state: StateRef, out: &mut String) {
        let depth = self.arena.depth(state);
        let failure = self.failure_state(state).unwrap_or(state);
        out.push_str(&" ".repeat(depth as usize));
        out.push_str(&format!(
            "{} ({}) -> {}",
            Self::addr(state),
            depth,
            Self::addr(failure)
        ));
        for rec in self.outputs(state) {
            out.push_str(&format!(" {}:{}", rec.pattern_id, rec.backtrack));
        }
        out.push('\n');

        let mut children = self.arena.children_with_labels(state);
        children.sort_by_key(|(byte, _)| *byte);
        for (_byte, child) in children {
            self.print_state(child, out);
        }
    }

    /// Stand-in for the original's `%p` pointer formatting: `StateRef`'s
    /// stable arena index, rendered like an address.
    fn addr(state: StateRef) -> String {
        format!("{:#06x}", state.0)
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}
