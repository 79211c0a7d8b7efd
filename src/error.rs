use crate::expr::ExprError;
use thiserror::Error;

/// Every failure mode the editing core can surface. The command layer above
/// is expected to catch these and turn them into user-facing messages; the
/// core never swallows one.
#[derive(Debug, Error)]
pub enum EditError {
    /// An invalid or degenerate region operation. Nothing was changed.
    #[error("region operation failed: {0}")]
    Geometry(String),

    /// The configured change limit was hit. The edit is partially applied
    /// and `affected` cells were changed before the stop.
    #[error("block change limit of {limit} reached after {affected} changes")]
    LimitExceeded { limit: u64, affected: u64 },

    /// An expression failed to parse or evaluate. Changes committed before
    /// the failing evaluation remain applied.
    #[error("expression error: {0}")]
    Expression(#[from] ExprError),

    /// A region was requested from a selector before enough defining points
    /// were chosen. Nothing was attempted.
    #[error("incomplete selection: {0}")]
    IncompleteSelection(String),

    /// Cooperative cancellation was observed. Changes applied before the
    /// stop remain in place and in the journal, so undo stays correct.
    #[error("operation cancelled after {affected} changes")]
    Cancelled { affected: u64 },

    /// A clipboard failed to serialize or deserialize.
    #[error("clipboard codec error: {0}")]
    Codec(String),
}

impl EditError {
    pub fn geometry(message: impl Into<String>) -> Self {
        EditError::Geometry(message.into())
    }

    /// Number of cells changed before the failure, when the failure mode is
    /// a partial completion.
    pub fn partial_count(&self) -> Option<u64> {
        match self {
            EditError::LimitExceeded { affected, .. } | EditError::Cancelled { affected } => {
                Some(*affected)
            }
            _ => None,
        }
    }
}
