//! A transactional union-find (unification) table.
//!
//! Three layers, leaf first:
//!
//! - [`undo_log`] — an append-only log of reversible edits, with nested
//!   snapshot/rollback bookkeeping.
//! - [`snapshot_array`] — a growable indexed sequence whose mutations are
//!   journaled against an [`undo_log::UndoLog`] while a snapshot is open.
//! - [`unify`] — weighted union-find (rank heuristic + path compression) on
//!   top of a [`snapshot_array::SnapshotArray`], carrying an explicit,
//!   caller-assigned payload per equivalence class.
//!
//! The table is single-threaded and synchronous; every failure mode is a
//! fatal programmer error (see [`error`]), never a recoverable `Result`.
//! Callers needing concurrent access must layer their own mutual exclusion
//! around an entire table.

pub mod error;
pub mod snapshot_array;
pub mod undo_log;
pub mod unify;

pub use error::UnifyError;
pub use snapshot_array::SnapshotArray;
pub use undo_log::{Snapshot, UndoLog, UndoRecord};
pub use unify::{UnificationTable, VarIndex, VarValue};
