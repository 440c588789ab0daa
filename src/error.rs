//! Fatal-error taxonomy for precondition violations.
//!
//! Every variant here corresponds to a programming error, not a recoverable
//! runtime condition: callers are expected to uphold these preconditions
//! themselves. The crate never returns a `Result` from its public API for
//! these cases; instead it panics immediately via [`fatal`], using this type
//! only so the message text is centralized and testable.

use thiserror::Error;

/// A precondition violation detected by this crate.
///
/// Constructing one of these does not panic by itself; see [`fatal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnifyError {
    /// An index was used that does not refer to a live element.
    #[error("index {index} out of bounds (len is {len})")]
    IndexOutOfBounds { index: usize, len: usize },
    /// `commit`/`rollback_to` was called with no snapshot open.
    #[error("no open snapshot to commit or roll back to")]
    NoOpenSnapshot,
    /// The snapshot refers to a point past the current log length — the log
    /// must have shrunk out from under it, which indicates corruption.
    #[error("snapshot {snapshot} is not valid against a log of length {log_len}")]
    SnapshotTooOld { snapshot: usize, log_len: usize },
    /// A root commit (the last open snapshot) was not to the start of the log.
    #[error("root snapshot commit must be to position 0, got {snapshot}")]
    RootCommitMismatch { snapshot: usize },
    /// While reversing a `NewElem` record, the index popped from the array
    /// did not match the index recorded in the undo log.
    #[error("undo log corruption: expected to pop index {expected}, found {found}")]
    RollbackIndexMismatch { expected: usize, found: usize },
}

/// Abort the current operation immediately; used at every fatal precondition
/// check in this crate so that no further mutation happens after a violation
/// is detected.
#[cold]
#[inline(never)]
pub(crate) fn fatal(err: UnifyError) -> ! {
    panic!("{err}")
}
