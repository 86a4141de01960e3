//! C2 — case expander.
//!
//! Given a case-insensitive token, produces every case variant by
//! independently toggling each ASCII letter's case — `2^k` variants total
//! for `k` letters, including the token exactly as given. A pre-order
//! recursion over letter positions, flipping bit `0x20` of each letter in
//! turn, visits every combination exactly once; ported from the shape of
//! `_yr_ac_gen_case_combinations`, simplified to build immutable copies
//! instead of mutating a shared output buffer in place.

/// Returns every case variant of `token`, including `token` itself.
///
/// Non-letter bytes (e.g. the `0x00` high byte of a wide-string token) are
/// left untouched; only ASCII letters contribute to the `2^k` expansion.
pub fn case_combinations(token: &[u8]) -> Vec<Vec<u8>> {
    let letter_positions: Vec<usize> = token
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .collect();

    let mut out = Vec::with_capacity(1 << letter_positions.len().min(20));
    expand(token.to_vec(), &letter_positions, 0, &mut out);
    out
}

fn expand(token: Vec<u8>, letters: &[usize], next: usize, out: &mut Vec<Vec<u8>>) {
    if next == letters.len() {
        out.push(token);
        return;
    }

    // Leave this letter's case as-is for one branch...
    expand(token.clone(), letters, next + 1, out);

    // ...and toggle it for the other.
    let mut flipped = token;
    flipped[letters[next]] ^= 0x20;
    expand(flipped, letters, next + 1, out);
}
