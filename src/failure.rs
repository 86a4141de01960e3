//! C5 — failure-link construction and output-chain merging.
//!
//! A breadth-first walk over the trie built by `crate::trie::add_pattern`,
//! computing each state's failure link and splicing in whatever output
//! records it inherits along the way. Ported from
//! `yr_ac_create_failure_links` in
//! `examples/original_source/libyara/ahocorasick.c`.
//!
//! The original function calls `yr_ac_next_state(failure_state, i)` with `i`
//! left uninitialized on some code paths (`spec.md`'s flagged Open
//! Question) — a latent bug masked in practice by `i` usually holding the
//! loop variable from an earlier, unrelated pass over the same scope. Here
//! the BFS carries the edge's input byte explicitly as part of the work
//! queue, so `next_state` is always called with the byte that actually
//! labels the edge being processed.

use std::collections::VecDeque;

use crate::arena::{Arena, StateRef};
use crate::error::Result;

/// Computes failure links and merges output chains for every state
/// currently in `arena`.
///
/// Must run exactly once, after every pattern has been inserted
/// (`crate::trie::add_pattern`) and before the automaton is used to scan:
/// inserting more patterns afterward would leave the new states' failure
/// links unset.
pub fn create_failure_links(arena: &mut Arena) -> Result<()> {
    let root = arena.root();
    arena.set_failure(root, root);

    let mut queue: VecDeque<StateRef> = VecDeque::new();

    // Depth-1 states fail directly to the root (no proper suffix of a
    // single byte except the empty one), but still need to inherit any
    // degenerate (no-token) pattern attached straight to the root.
    for (_byte, child) in arena.children_with_labels(root) {
        arena.set_failure(child, root);
        if let Some(root_outputs) = arena.output_head(root) {
            arena.splice_output_chain(child, Some(root_outputs));
        }
        queue.push_back(child);
    }

    while let Some(state) = queue.pop_front() {
        for (byte, child) in arena.children_with_labels(state) {
            let failure_state = arena.failure(state).unwrap_or(root);
            let child_failure = next_failure_state(arena, failure_state, byte, root);
            arena.set_failure(child, child_failure);

            merge_inherited_outputs(arena, child, child_failure, root);

            queue.push_back(child);
        }
    }

    Ok(())
}

/// Follows `byte` from `failure_state`, falling further back through
/// failure links as needed, until an edge is found or the root is reached.
fn next_failure_state(
    arena: &Arena,
    mut failure_state: StateRef,
    byte: u8,
    root: StateRef,
) -> StateRef {
    loop {
        if let Some(target) = arena.next_state(failure_state, byte) {
            return target;
        }
        if failure_state == root {
            return root;
        }
        failure_state = arena.failure(failure_state).unwrap_or(root);
    }
}

/// Splices `child_failure`'s output chain onto `child`'s own, per
/// `spec.md` C5's merge rule: a state inherits its failure target's
/// matches outright, and additionally inherits the root's degenerate
/// (backtrack == 0 attached directly, `min_token_length == 0`) patterns
/// whenever its own chain is empty or its own chain's tail has a
/// backtrack greater than zero — mirroring the original's handling of
/// patterns with no extractable token, which must be tested for at every
/// state since they can match starting anywhere.
fn merge_inherited_outputs(arena: &mut Arena, child: StateRef, child_failure: StateRef, root: StateRef) {
    let inherited = arena.output_head(child_failure);
    arena.splice_output_chain(child, inherited);

    if child_failure != root {
        let needs_root_outputs = match arena.output_head(child) {
            None => true,
            Some(head) => {
                let mut cursor = head;
                loop {
                    let rec = arena.output_record(cursor);
                    match rec.next {
                        Some(n) => cursor = n,
                        None => break rec.backtrack > 0,
                    }
                }
            }
        };

        if needs_root_outputs {
            if let Some(root_outputs) = arena.output_head(root) {
                arena.splice_output_chain(child, Some(root_outputs));
            }
        }
    }
}
