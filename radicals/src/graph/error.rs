//! Graph construction errors.
use smol_str::SmolStr;

/// Errors that abort building a decomposition graph. No partially built graph
/// is ever returned alongside one of these.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// Entry is shorter than `[strokes, composition, left]`
    #[error("Entry for '{character}' has {found} fields, expected at least 3")]
    TooFewFields {
        /// Character the entry belongs to
        character: SmolStr,
        /// Number of fields present
        found: usize,
    },

    /// Entry is not a JSON array
    #[error("Entry for '{0}' is not an array")]
    NotAnArray(SmolStr),

    /// Graph outgrew the arena index type
    #[error("Graph exceeds {0} nodes")]
    TooManyNodes(usize),
}

/// A node table that breaks the arena invariants, usually from a damaged
/// snapshot.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IntegrityError {
    /// A cross-reference points outside the arena
    #[error("Node '{character}' references missing node {index}")]
    DanglingIndex {
        /// Character holding the reference
        character: SmolStr,
        /// The out-of-range index
        index: crate::types::NodeIndex,
    },

    /// Two nodes share a character
    #[error("Character '{0}' appears more than once")]
    DuplicateCharacter(SmolStr),

    /// Node table outgrew the arena index type
    #[error("Graph exceeds {0} nodes")]
    TooManyNodes(usize),
}
