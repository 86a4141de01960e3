//! Error types for the token-indexed Aho-Corasick automaton.
use std::fmt;

/// Result type alias for automaton build operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors the automaton core can report.
///
/// Per the automaton's error-handling design, the only error *kind* that
/// exists is an allocation shortfall in the arena backing the trie. Every
/// other unusual condition (an empty pattern, a regex with no extractable
/// token, a variable-width hex skip, asymmetric alternatives) degrades
/// gracefully instead of erroring — see `token` and `trie` for where those
/// are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The arena could not satisfy an allocation request.
    InsufficientMemory(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InsufficientMemory(msg) => {
                write!(f, "insufficient memory: {}", msg)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<String> for CoreError {
    fn from(msg: String) -> Self {
        CoreError::InsufficientMemory(msg)
    }
}

impl From<&str> for CoreError {
    fn from(msg: &str) -> Self {
        CoreError::InsufficientMemory(msg.to_string())
    }
}
