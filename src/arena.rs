//! C3 — trie node layer, plus C6's read-only transition query and the arena
//! that owns every state, transition, and output record.
//!
//! The original automaton (`examples/original_source/libyara/ahocorasick.c`)
//! allocates states out of a relocatable arena and addresses them with
//! offsets that get patched up whenever the arena grows
//! (`yr_arena_make_ptr_relocatable`). A `Vec`-backed arena has no such
//! problem — indices into a `Vec` stay valid across growth — so the
//! relocation machinery has no counterpart here; see `StateRef` and friends
//! below, which are exactly those stable indices with a type attached so a
//! state index can never be passed where an output index was expected.

use crate::error::{CoreError, Result};

/// Nodes at a depth greater than this are built `Sparse`; depth `0` (the
/// root) and depth `1` are built `Dense`. Fixed by `spec.md` C3 at `1`.
pub const DENSE_DEPTH_LIMIT: u32 = 1;

/// Index of a trie state within an [`Arena`]. `StateRef(0)` is always the
/// root, created by [`Arena::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateRef(pub(crate) u32);

/// Index of an output-chain record within an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputRef(pub(crate) u32);

/// One entry in a pattern's output chain: which pattern matched, and how far
/// back from the current position its start lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRecord {
    /// Caller-chosen identifier for the matched pattern.
    pub pattern_id: u32,
    /// Distance in bytes from the token's last matched byte back to the
    /// pattern's start: the terminal state's depth plus
    /// `TokenRecord::backtrack` (`spec.md` §4.4), set by
    /// `crate::trie::add_pattern`.
    pub backtrack: i64,
    /// Next record in the same state's output chain, or `None` at the end.
    /// Chains are shared, not copied, across states that need the same
    /// suffix of patterns (see `crate::failure`).
    pub next: Option<OutputRef>,
}

/// A trie edge: the byte it's labeled with, and the state it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    /// The input byte this edge is labeled with.
    pub byte: u8,
    /// The state this edge leads to.
    pub target: StateRef,
}

/// Transition table shape chosen once at creation time, by depth, and never
/// changed afterward (`spec.md` C3's "fixed, not reclassified" invariant).
#[derive(Debug, Clone)]
enum Transitions {
    /// One slot per possible byte value, used at depth `<= DENSE_DEPTH_LIMIT`.
    Dense(Box<[Option<StateRef>; 256]>),
    /// A short association list, used at depth `> DENSE_DEPTH_LIMIT`. Trie
    /// fan-out drops off quickly past the first byte or two, so a linear
    /// scan over a handful of entries beats a 256-entry table's memory cost.
    Sparse(Vec<TransitionRecord>),
}

/// A single trie state: its transitions, failure link, and output chain.
#[derive(Debug, Clone)]
struct State {
    transitions: Transitions,
    depth: u32,
    /// Failure link, set by `crate::failure::create_failure_links`. The
    /// root is its own failure state; every other state starts unset until
    /// the BFS pass reaches it.
    failure: Option<StateRef>,
    /// Head of this state's output chain, if any pattern ends here (or the
    /// chain was propagated from a failure-linked ancestor).
    output: Option<OutputRef>,
}

/// Owns every [`State`] and [`OutputRecord`] the trie contains.
///
/// Growth-only: states and output records are appended and never removed,
/// so a `StateRef`/`OutputRef` handed out earlier stays valid for the
/// arena's whole lifetime.
pub struct Arena {
    states: Vec<State>,
    outputs: Vec<OutputRecord>,
    /// Remaining allocation budget, or `None` for "unbounded". Exists to
    /// let tests exercise the automaton's out-of-memory path (`spec.md`
    /// E4) without needing to actually allocate gigabytes of trie.
    budget: Option<usize>,
}

impl Arena {
    /// Creates a new arena containing only the root state, with no
    /// allocation limit.
    pub fn new() -> Self {
        Self::with_budget_opt(None)
    }

    /// Creates a new arena that fails allocation once `n` state or output
    /// records have been handed out (`n` counts the root state itself).
    pub fn with_budget(n: usize) -> Self {
        Self::with_budget_opt(Some(n))
    }

    fn with_budget_opt(budget: Option<usize>) -> Self {
        let mut arena = Self {
            states: Vec::new(),
            outputs: Vec::new(),
            budget,
        };
        let root = State {
            transitions: Transitions::Dense(Box::new([None; 256])),
            depth: 0,
            failure: None,
            output: None,
        };
        arena.states.push(root);
        if let Some(b) = &mut arena.budget {
            *b = b.saturating_sub(1);
        }
        arena
    }

    /// The trie root, always `StateRef(0)`.
    pub fn root(&self) -> StateRef {
        StateRef(0)
    }

    /// Depth of `state` from the root (the root is depth `0`).
    pub fn depth(&self, state: StateRef) -> u32 {
        self.states[state.0 as usize].depth
    }

    /// `state`'s failure link, or `None` if `build_failure_links` hasn't
    /// run yet.
    pub fn failure(&self, state: StateRef) -> Option<StateRef> {
        self.states[state.0 as usize].failure
    }

    /// Sets `state`'s failure link.
    pub fn set_failure(&mut self, state: StateRef, failure: StateRef) {
        self.states[state.0 as usize].failure = Some(failure);
    }

    /// Head of `state`'s output chain, if any.
    pub fn output_head(&self, state: StateRef) -> Option<OutputRef> {
        self.states[state.0 as usize].output
    }

    /// Sets `state`'s output chain head directly.
    pub fn set_output_head(&mut self, state: StateRef, head: Option<OutputRef>) {
        self.states[state.0 as usize].output = head;
    }

    /// Looks up a single output record by reference.
    pub fn output_record(&self, output: OutputRef) -> &OutputRecord {
        &self.outputs[output.0 as usize]
    }

    /// C6 — the only read path the trie needs at scan time: follow `byte`
    /// from `state`, or `None` if there is no such edge.
    ///
    /// This never walks failure links; callers that want the full
    /// Aho-Corasick "next state" (advance-or-fail-back) behavior build it
    /// on top of this plus `failure`, exactly as `spec.md` C6 specifies.
    pub fn next_state(&self, state: StateRef, byte: u8) -> Option<StateRef> {
        match &self.states[state.0 as usize].transitions {
            Transitions::Dense(table) => table[byte as usize],
            Transitions::Sparse(edges) => edges
                .iter()
                .find(|e| e.byte == byte)
                .map(|e| e.target),
        }
    }

    /// All outgoing `(byte, target)` pairs of `state`, in no particular
    /// order. Used by `crate::failure`'s BFS to enumerate children.
    pub fn children_with_labels(&self, state: StateRef) -> Vec<(u8, StateRef)> {
        match &self.states[state.0 as usize].transitions {
            Transitions::Dense(table) => table
                .iter()
                .enumerate()
                .filter_map(|(b, t)| t.map(|s| (b as u8, s)))
                .collect(),
            Transitions::Sparse(edges) => edges.iter().map(|e| (e.byte, e.target)).collect(),
        }
    }

    /// C3 — follows or creates the child of `state` along `byte`, growing
    /// the trie by exactly one state when no such edge exists yet.
    pub fn create_child(&mut self, state: StateRef, byte: u8) -> Result<StateRef> {
        if let Some(existing) = self.next_state(state, byte) {
            return Ok(existing);
        }

        self.check_budget()?;

        let child_depth = self.depth(state) + 1;
        let child = State {
            transitions: if child_depth <= DENSE_DEPTH_LIMIT {
                Transitions::Dense(Box::new([None; 256]))
            } else {
                Transitions::Sparse(Vec::new())
            },
            depth: child_depth,
            failure: None,
            output: None,
        };
        let child_ref = StateRef(self.states.len() as u32);
        self.states.push(child);
        self.install_edge(state, byte, child_ref);
        Ok(child_ref)
    }

    fn install_edge(&mut self, state: StateRef, byte: u8, target: StateRef) {
        match &mut self.states[state.0 as usize].transitions {
            Transitions::Dense(table) => table[byte as usize] = Some(target),
            Transitions::Sparse(edges) => edges.push(TransitionRecord { byte, target }),
        }
    }

    /// Appends a single output record to the front of `state`'s chain,
    /// returning the new head.
    pub fn push_output(
        &mut self,
        state: StateRef,
        pattern_id: u32,
        backtrack: i64,
    ) -> Result<OutputRef> {
        self.check_budget()?;
        let next = self.output_head(state);
        let output_ref = OutputRef(self.outputs.len() as u32);
        self.outputs.push(OutputRecord {
            pattern_id,
            backtrack,
            next,
        });
        self.set_output_head(state, Some(output_ref));
        Ok(output_ref)
    }

    /// Prepends `head` (a whole existing chain, shared not copied) in front
    /// of `state`'s current chain — used by `crate::failure` to splice a
    /// failure-linked ancestor's outputs onto a state's own chain.
    pub fn splice_output_chain(&mut self, state: StateRef, head: Option<OutputRef>) {
        let Some(head) = head else { return };
        match self.output_head(state) {
            None => self.set_output_head(state, Some(head)),
            Some(own_head) => {
                // Find the tail of `state`'s own chain and link `head` after
                // it, so the state's directly-matched patterns are reported
                // before the ones inherited via failure.
                let mut cursor = own_head;
                loop {
                    let next = self.outputs[cursor.0 as usize].next;
                    match next {
                        Some(n) => cursor = n,
                        None => break,
                    }
                }
                self.outputs[cursor.0 as usize].next = Some(head);
            }
        }
    }

    fn check_budget(&mut self) -> Result<()> {
        match &mut self.budget {
            None => Ok(()),
            Some(remaining) => {
                if *remaining == 0 {
                    Err(CoreError::InsufficientMemory(
                        "arena allocation budget exhausted".to_string(),
                    ))
                } else {
                    *remaining -= 1;
                    Ok(())
                }
            }
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_starts_empty_with_no_transitions() {
        let arena = Arena::new();
        assert_eq!(arena.depth(arena.root()), 0);
        assert_eq!(arena.next_state(arena.root(), b'a'), None);
        assert_eq!(arena.state_count(), 1);
    }

    #[test]
    fn create_child_is_idempotent_on_existing_edge() {
        let mut arena = Arena::new();
        let a1 = arena.create_child(arena.root(), b'a').unwrap();
        let a2 = arena.create_child(arena.root(), b'a').unwrap();
        assert_eq!(a1, a2);
        assert_eq!(arena.state_count(), 2);
    }

    #[test]
    fn depth_one_child_is_dense_depth_two_is_sparse() {
        let mut arena = Arena::new();
        let depth1 = arena.create_child(arena.root(), b'a').unwrap();
        let depth2 = arena.create_child(depth1, b'b').unwrap();
        assert_eq!(arena.depth(depth1), 1);
        assert_eq!(arena.depth(depth2), 2);
        // Both should still answer next_state identically regardless of
        // their internal representation.
        assert_eq!(arena.next_state(depth1, b'b'), Some(depth2));
    }

    #[test]
    fn sparse_state_holds_multiple_children() {
        let mut arena = Arena::new();
        let depth1 = arena.create_child(arena.root(), b'a').unwrap();
        let x = arena.create_child(depth1, b'x').unwrap();
        let y = arena.create_child(depth1, b'y').unwrap();
        assert_ne!(x, y);
        assert_eq!(arena.next_state(depth1, b'x'), Some(x));
        assert_eq!(arena.next_state(depth1, b'y'), Some(y));
        assert_eq!(arena.next_state(depth1, b'z'), None);
    }

    #[test]
    fn budget_exhaustion_reports_insufficient_memory() {
        // root consumes 1, leaving room for exactly one more state.
        let mut arena = Arena::with_budget(2);
        assert!(arena.create_child(arena.root(), b'a').is_ok());
        let root = arena.root();
        let err = arena.create_child(root, b'b');
        assert!(err.is_err());
    }

    #[test]
    fn output_chain_push_and_splice_preserve_order() {
        let mut arena = Arena::new();
        let s = arena.create_child(arena.root(), b'a').unwrap();
        arena.push_output(s, 1, 0).unwrap();
        arena.push_output(s, 2, 0).unwrap();

        let other = arena.create_child(arena.root(), b'b').unwrap();
        let inherited = arena.push_output(other, 3, 5).unwrap();

        arena.splice_output_chain(s, Some(inherited));

        let mut ids = Vec::new();
        let mut cursor = arena.output_head(s);
        while let Some(r) = cursor {
            let rec = arena.output_record(r);
            ids.push(rec.pattern_id);
            cursor = rec.next;
        }
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn splice_onto_empty_chain_just_sets_the_head() {
        let mut arena = Arena::new();
        let s = arena.create_child(arena.root(), b'a').unwrap();
        let other = arena.create_child(arena.root(), b'b').unwrap();
        let inherited = arena.push_output(other, 9, 0).unwrap();

        arena.splice_output_chain(s, Some(inherited));
        assert_eq!(arena.output_head(s), Some(inherited));
    }
}
