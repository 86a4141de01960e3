//! C1 — token generator.
//!
//! Given a [`Pattern`], emits one or more short anchor tokens (`spec.md`
//! §4.1) paired with the backtrack distance from the token back to the
//! pattern's own start. Ported from `_yr_ac_gen_tokens` and its three
//! per-shape helpers in the original C automaton
//! (`examples/original_source/libyara/ahocorasick.c`); the length-prefixed,
//! zero-terminated scratch buffer that C code builds these into is replaced
//! here with a plain `Vec<TokenRecord>` — same token/backtrack values, no
//! unsafe pointer arithmetic required to produce them.

use crate::pattern::{mask, Pattern};

/// Tokens shorter than this are never extracted; `spec.md` fixes it at 4.
pub const MAX_TOKEN_LENGTH: usize = 4;

/// One candidate anchor substring plus the distance back to pattern start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// The token bytes, `1..=MAX_TOKEN_LENGTH` long.
    pub bytes: Vec<u8>,
    /// Distance in bytes from the token's last byte back to the pattern's
    /// start. Computed values are expected to be non-negative; see
    /// `spec.md` §3's output-record invariant.
    pub backtrack: i64,
}

/// Generates the tokens for `pattern`.
///
/// An empty result is the degenerate case (`spec.md` §4.1.4): no token could
/// be extracted, and the caller should attach the pattern directly to the
/// trie's root instead of inserting it along a token path.
pub fn generate_tokens(pattern: &Pattern) -> Vec<TokenRecord> {
    let flags = pattern.effective_flags();

    if flags.hex {
        return gen_hex_tokens(pattern);
    }

    if flags.regex {
        return gen_regexp_tokens(pattern);
    }

    let mut tokens = Vec::new();

    if flags.ascii {
        tokens.extend(gen_text_tokens(&pattern.bytes, flags.nocase, false));
    }
    if flags.wide {
        tokens.extend(gen_text_tokens(&pattern.bytes, flags.nocase, true));
    }

    tokens
}

/// §4.1.1 — plain ASCII/wide text tokens, with optional case expansion.
fn gen_text_tokens(bytes: &[u8], nocase: bool, wide: bool) -> Vec<TokenRecord> {
    let token = if wide {
        let token_length = (bytes.len() * 2).min(MAX_TOKEN_LENGTH);
        let mut out = Vec::with_capacity(token_length);
        let mut src = bytes.iter();
        for i in 0..token_length {
            if i % 2 == 0 {
                out.push(*src.next().unwrap_or(&0));
            } else {
                out.push(0);
            }
        }
        out
    } else {
        let token_length = bytes.len().min(MAX_TOKEN_LENGTH);
        bytes[..token_length].to_vec()
    };

    if token.is_empty() {
        return Vec::new();
    }

    if nocase {
        crate::case_expand::case_combinations(&token)
            .into_iter()
            .map(|bytes| TokenRecord { bytes, backtrack: 0 })
            .collect()
    } else {
        vec![TokenRecord {
            bytes: token,
            backtrack: 0,
        }]
    }
}

/// §4.1.3 — regular-expression prefix tokens, falling back to the regex
/// engine's first-byte set when no literal prefix exists.
fn gen_regexp_tokens(pattern: &Pattern) -> Vec<TokenRecord> {
    let src = &pattern.bytes;
    let mut i = 0usize;
    if src.first() == Some(&b'^') {
        i += 1;
    }

    let mut token = Vec::with_capacity(MAX_TOKEN_LENGTH);
    while i < src.len() && token.len() < MAX_TOKEN_LENGTH {
        let current = src[i];
        let next = src.get(i + 1).copied();

        if current == b'\\' && next.is_some_and(is_regex_escapable) {
            token.push(next.unwrap());
            i += 2;
        } else if is_regex_hashable(current) && !matches!(next, Some(b'*') | Some(b'{') | Some(b'?'))
        {
            token.push(current);
            i += 1;
        } else {
            break;
        }
    }

    if !token.is_empty() {
        if pattern.flags.nocase {
            crate::case_expand::case_combinations(&token)
                .into_iter()
                .map(|bytes| TokenRecord { bytes, backtrack: 0 })
                .collect()
        } else {
            vec![TokenRecord {
                bytes: token,
                backtrack: 0,
            }]
        }
    } else {
        let first_bytes = pattern
            .regex
            .as_ref()
            .map(|r| r.first_bytes())
            .unwrap_or_default();

        first_bytes
            .into_iter()
            .map(|b| TokenRecord {
                bytes: vec![b],
                backtrack: 0,
            })
            .collect()
    }
}

/// Characters that may appear escaped (`\x`) and still contribute `x`
/// itself as a literal token byte: the regex metacharacters, since escaping
/// one of them is exactly how a regex spells that byte literally.
fn is_regex_escapable(c: u8) -> bool {
    is_regex_metachar(c)
}

/// Characters that contribute themselves as a literal token byte when not
/// immediately followed by a quantifier: anything that isn't a regex
/// metacharacter.
fn is_regex_hashable(c: u8) -> bool {
    c.is_ascii_graphic() && !is_regex_metachar(c)
}

fn is_regex_metachar(c: u8) -> bool {
    matches!(c, b'.' | b'^' | b'$' | b'*' | b'+' | b'?' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'|' | b'\\')
}

/// §4.1.2 — hex pattern tokens: pick the substring of literal bytes (up to
/// `MAX_TOKEN_LENGTH`) with the most distinct bytes among its last
/// `MAX_TOKEN_LENGTH`, preferring the longer candidate on ties, bailing out
/// of a variable-width skip or an asymmetric alternation.
///
/// Ported directly from `_yr_ac_gen_hex_tokens`.
fn gen_hex_tokens(pattern: &Pattern) -> Vec<TokenRecord> {
    let bytes = &pattern.bytes;
    let Some(mask_stream) = pattern.mask.as_ref() else {
        return Vec::new();
    };

    let mut inside_or = false;
    let mut token_length: usize = 0;
    let mut backtrack: i64 = 0;
    let mut unique_bytes: usize = 0;
    let mut max_unique_bytes: usize = 0;
    let mut candidate_position: i64 = 0;
    let mut candidate_length: usize = 0;
    let mut candidate_backtrack: i64 = 0;
    let mut or_string_length: i64 = 0;
    let mut previous_or_string_length: i64 = 0;
    let mut string_position: i64 = 0;

    let mut last = [0u8; MAX_TOKEN_LENGTH];

    let mut idx = 0usize;
    while idx < mask_stream.len() && mask_stream[idx] != mask::END {
        let m = mask_stream[idx];

        if token_length == 0 {
            let sp = string_position as usize;
            let fill = bytes.get(sp).copied().unwrap_or(0);
            last = [fill; MAX_TOKEN_LENGTH];
        }

        if m == mask::OR {
            inside_or = true;
        }
        if m == mask::OR_END {
            inside_or = false;
        }

        if m == mask::LITERAL && !inside_or {
            token_length += 1;
            token_length = token_length.min(MAX_TOKEN_LENGTH);

            let sp = string_position as usize;
            last[sp % MAX_TOKEN_LENGTH] = bytes[sp];

            unique_bytes = 1;
            for i in 0..MAX_TOKEN_LENGTH - 1 {
                let mut unique = true;
                for j in (i + 1)..MAX_TOKEN_LENGTH {
                    if last[i] == last[j] {
                        unique = false;
                        break;
                    }
                }
                if unique {
                    unique_bytes += 1;
                }
            }

            if unique_bytes > max_unique_bytes || token_length > candidate_length {
                max_unique_bytes = unique_bytes;
                candidate_position = string_position - token_length as i64 + 1;
                candidate_backtrack = backtrack - token_length as i64 + 1;
                candidate_length = token_length;

                if candidate_length == MAX_TOKEN_LENGTH && max_unique_bytes == MAX_TOKEN_LENGTH {
                    break;
                }
            }
        } else {
            token_length = 0;
        }

        if m != mask::OR && m != mask::OR_END && m != mask::EXACT_SKIP && m != mask::RANGE_SKIP {
            string_position += 1;
            if inside_or {
                or_string_length += 1;
            } else {
                backtrack += 1;
            }
        }

        if m == mask::EXACT_SKIP {
            idx += 1;
            backtrack += mask_stream.get(idx).copied().unwrap_or(0) as i64;
        } else if m == mask::RANGE_SKIP {
            break;
        } else if m == mask::OR || m == mask::OR_END {
            if previous_or_string_length == 0 {
                previous_or_string_length = or_string_length;
            }

            // Asymmetric alternative lengths like `(01 | 02 03)` make the
            // backtrack value ambiguous: stop before it.
            if or_string_length != previous_or_string_length {
                break;
            }

            or_string_length = 0;

            if m == mask::OR_END {
                backtrack += previous_or_string_length;
                previous_or_string_length = 0;
            }
        }

        idx += 1;
    }

    if candidate_length == 0 {
        return Vec::new();
    }

    let start = candidate_position as usize;
    vec![TokenRecord {
        bytes: bytes[start..start + candidate_length].to_vec(),
        backtrack: candidate_backtrack,
    }]
}
