//! Editor result and error types.

use crate::instruction::Label;
use thiserror::Error;

/// Editor error type encompassing all session, navigation, and search
/// failures.
///
/// Every error is a hard stop for the rewrite pass that triggered it: the
/// editor never retries or guesses an alternative location, and a failed
/// chain leaves the session in a partially edited state that the caller
/// must discard by re-attaching or abandoning the pass.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed construction arguments (empty initial sequence,
    /// zero-length pattern, empty insertion list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A navigation or removal would land outside `[0, last]`.
    #[error("index {index} is outside the valid range [0, {last}]")]
    OutOfRange {
        /// The offending index, possibly negative after a retreat.
        index: isize,
        /// The highest valid index in the current sequence.
        last: usize,
    },

    /// A rewind requested more pops than the cursor stack can give up.
    #[error("cannot pop {requested} entries from a cursor stack of depth {depth}")]
    EmptyStack { requested: usize, depth: usize },

    /// A pattern search found no match in the scanned range.
    #[error("pattern not found in {target}: [{pattern}]")]
    PatternNotFound {
        /// Description of the pattern that was searched for.
        pattern: String,
        /// Identity of the target method being rewritten.
        target: String,
        /// Formatted listing of the current sequence and the rewrite
        /// passes already applied to the same target.
        dump: Option<String>,
    },

    /// A label search found no carrier in the scanned range.
    #[error("label {label} not found in {target}")]
    LabelNotFound {
        label: Label,
        target: String,
        dump: Option<String>,
    },

    /// An operation was invoked before `attach` or after `flush`.
    #[error("no instruction sequence is attached")]
    NotAttached,
}

impl Error {
    /// Returns the diagnostic dump attached to a failed search, if any.
    pub fn dump(&self) -> Option<&str> {
        match self {
            Error::PatternNotFound { dump, .. } | Error::LabelNotFound { dump, .. } => {
                dump.as_deref()
            }
            _ => None,
        }
    }
}

/// Editor result type.
pub type Result<T> = std::result::Result<T, Error>;
