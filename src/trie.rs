//! C4 — string insertion: walks a pattern's tokens into the trie, creating
//! states as needed and attaching an output record at the end of each
//! token's path. Ported from `_yr_ac_add_string` in
//! `examples/original_source/libyara/ahocorasick.c`, generalized to the
//! multi-token-per-pattern shape `crate::token::generate_tokens` produces
//! (one path per case variant, or per hex/regex alternative), rather than
//! the single fixed string the C function inserts.

use crate::arena::Arena;
use crate::error::Result;
use crate::pattern::Pattern;
use crate::token::generate_tokens;

/// Inserts every token `pattern` generates into `arena`, tagging each
/// resulting path's output record with `pattern_id`.
///
/// Returns the number of token paths inserted (normally the number of case
/// variants; `0` only in the degenerate case, §4.1.4, where no token could
/// be extracted and the pattern instead attaches directly to the root with
/// `backtrack == 0`).
pub fn add_pattern(arena: &mut Arena, pattern: &Pattern, pattern_id: u32) -> Result<usize> {
    let tokens = generate_tokens(pattern);

    if tokens.is_empty() {
        arena.push_output(arena.root(), pattern_id, 0)?;
        return Ok(0);
    }

    for token in &tokens {
        let mut state = arena.root();
        for &byte in &token.bytes {
            state = arena.create_child(state, byte)?;
        }
        // `spec.md` §4.4: the output record's backtrack is the terminal
        // state's depth plus the token's own backtrack, not the token's
        // backtrack alone — `_yr_ac_add_string` in
        // `examples/original_source/libyara/ahocorasick.c` computes this as
        // `state->depth + token_backtrack`.
        let match_backtrack = arena.depth(state) as i64 + token.backtrack;
        arena.push_output(state, pattern_id, match_backtrack)?;
    }

    Ok(tokens.len())
}
