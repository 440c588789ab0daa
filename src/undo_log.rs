//! An append-only log of reversible edits, with nested snapshot/rollback
//! support.
//!
//! This is the leaf layer: it knows nothing about union-find or even about
//! arrays in particular. It just remembers, for a contiguous indexed
//! sequence maintained elsewhere, which positions were appended and which
//! were overwritten (and with what), so that the sequence can be replayed
//! backwards to any earlier snapshot.

use log::debug;

use crate::error::{fatal, UnifyError};

/// A single reversible edit to an indexed sequence of `T`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UndoRecord<T> {
    /// `NewElem(i)`: an element was appended at index `i`. Rollback removes
    /// it.
    NewElem(usize),
    /// `SetElem(i, old)`: the element at index `i` was overwritten; its
    /// pre-image was `old`. Rollback restores `old`.
    SetElem(usize, T),
}

impl<T: PartialEq> PartialEq for UndoRecord<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (UndoRecord::NewElem(a), UndoRecord::NewElem(b)) => a == b,
            (UndoRecord::SetElem(ia, va), UndoRecord::SetElem(ib, vb)) => ia == ib && va == vb,
            _ => false,
        }
    }
}

/// An opaque checkpoint token. Holding one lets the caller later either roll
/// back everything recorded since, or commit it.
///
/// Snapshots must be consumed linearly, with either [`UndoLog::rollback_to`]
/// or [`UndoLog::commit`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    undo_len: usize,
}

/// The undo log itself: a sequence of [`UndoRecord`]s plus a nesting counter
/// for open snapshots.
#[derive(Clone)]
pub struct UndoLog<T> {
    log: Vec<UndoRecord<T>>,
    open_snapshots: usize,
}

impl<T: std::fmt::Debug> std::fmt::Debug for UndoLog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UndoLogs[ ")?;
        for (i, record) in self.log.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{record:?}")?;
        }
        write!(f, " ]")
    }
}

impl<T> Default for UndoLog<T> {
    fn default() -> Self {
        UndoLog {
            log: Vec::new(),
            open_snapshots: 0,
        }
    }
}

impl<T> UndoLog<T> {
    /// An empty log with no open snapshots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any snapshot is currently open.
    #[inline]
    pub fn in_snapshot(&self) -> bool {
        self.open_snapshots > 0
    }

    /// The number of currently open (nested) snapshots.
    #[inline]
    pub fn num_open_snapshots(&self) -> usize {
        self.open_snapshots
    }

    /// The number of records currently held.
    #[inline]
    pub fn length(&self) -> usize {
        self.log.len()
    }

    /// Whether the log currently holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Append a record unconditionally.
    pub fn push(&mut self, record: UndoRecord<T>) {
        self.log.push(record);
    }

    /// Drop every record and reset the open-snapshot counter to zero.
    pub fn clear(&mut self) {
        self.log.clear();
        self.open_snapshots = 0;
    }

    /// Append each record from `iter`, in iteration order.
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = UndoRecord<T>>,
    {
        for record in iter {
            self.push(record);
        }
    }

    /// Remove and return the most recently pushed record, if any.
    pub fn pop(&mut self) -> Option<UndoRecord<T>> {
        self.log.pop()
    }

    /// Peek at the most recently pushed record without removing it.
    pub fn last(&self) -> Option<&UndoRecord<T>> {
        self.log.last()
    }

    /// Open a new (possibly nested) snapshot, returning a checkpoint that
    /// identifies the log's current length.
    pub fn start_snapshot(&mut self) -> Snapshot {
        self.open_snapshots += 1;
        Snapshot {
            undo_len: self.log.len(),
        }
    }

    /// A view of every record pushed since `snapshot` was opened.
    ///
    /// The returned slice borrows the log; it is invalidated by any
    /// subsequent mutation (`push`, `pop`, `clear`, `rollback_to`, `commit`).
    pub fn actions_since(&self, snapshot: &Snapshot) -> &[UndoRecord<T>] {
        &self.log[snapshot.undo_len..]
    }

    /// Whether any record has been pushed since `snapshot` was opened.
    pub fn has_changes(&self, snapshot: &Snapshot) -> bool {
        !self.actions_since(snapshot).is_empty()
    }

    fn assert_valid_snapshot(&self, snapshot: &Snapshot) {
        if self.open_snapshots == 0 {
            fatal(UnifyError::NoOpenSnapshot);
        }
        // Non-strict: a snapshot taken at the exact tail of the log (no
        // changes recorded since) is still valid to commit or roll back to
        // — only a checkpoint referring to a point *past* the current log
        // tail indicates corruption. This is what lets `rollback_to(s)`
        // immediately followed by `commit(s)` close a frame that turned out
        // to have nothing to undo. See the "strict vs. non-strict snapshot
        // bound" decision in DESIGN.md.
        if self.log.len() < snapshot.undo_len {
            fatal(UnifyError::SnapshotTooOld {
                snapshot: snapshot.undo_len,
                log_len: self.log.len(),
            });
        }
    }

    /// Pop records from the tail until the log's length is `snapshot`'s,
    /// returning the popped records in the order they were popped (newest
    /// first). Does not change `num_open_snapshots`.
    pub fn rollback_to(&mut self, snapshot: Snapshot) -> Vec<UndoRecord<T>> {
        debug!("rollback_to({})", snapshot.undo_len);
        self.assert_valid_snapshot(&snapshot);

        let mut popped = Vec::with_capacity(self.log.len() - snapshot.undo_len);
        while self.log.len() > snapshot.undo_len {
            popped.push(self.log.pop().expect("checked by loop condition"));
        }
        popped
    }

    /// Declare every record pushed since `snapshot` permanent relative to any
    /// outer frame. If `snapshot` was the outermost (last) open snapshot,
    /// the log is cleared. Decrements `num_open_snapshots` either way.
    pub fn commit(&mut self, snapshot: Snapshot) {
        debug!("commit({})", snapshot.undo_len);
        self.assert_valid_snapshot(&snapshot);

        if self.open_snapshots == 1 {
            if snapshot.undo_len != 0 {
                fatal(UnifyError::RootCommitMismatch {
                    snapshot: snapshot.undo_len,
                });
            }
            self.log.clear();
        }

        self.open_snapshots -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_log_is_idle() {
        let log: UndoLog<u32> = UndoLog::new();
        assert!(!log.in_snapshot());
        assert_eq!(log.length(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn push_pop_last() {
        let mut log: UndoLog<u32> = UndoLog::new();
        log.push(UndoRecord::NewElem(0));
        log.push(UndoRecord::SetElem(0, 7));
        assert_eq!(log.length(), 2);
        assert_eq!(log.last(), Some(&UndoRecord::SetElem(0, 7)));
        assert_eq!(log.pop(), Some(UndoRecord::SetElem(0, 7)));
        assert_eq!(log.pop(), Some(UndoRecord::NewElem(0)));
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn debug_rendering_matches_fixed_format() {
        let mut log: UndoLog<u32> = UndoLog::new();
        log.push(UndoRecord::NewElem(0));
        log.push(UndoRecord::SetElem(1, 9));
        assert_eq!(format!("{log:?}"), "UndoLogs[ NewElem(0), SetElem(1, 9) ]");
    }

    #[test]
    fn extend_appends_in_order() {
        let mut log: UndoLog<u32> = UndoLog::new();
        log.extend(vec![UndoRecord::NewElem(0), UndoRecord::NewElem(1)]);
        assert_eq!(log.length(), 2);
    }

    #[test]
    fn clear_resets_everything() {
        let mut log: UndoLog<u32> = UndoLog::new();
        let _s = log.start_snapshot();
        log.push(UndoRecord::NewElem(0));
        log.clear();
        assert_eq!(log.length(), 0);
        assert_eq!(log.num_open_snapshots(), 0);
    }

    #[test]
    fn rollback_pops_newest_first() {
        let mut log: UndoLog<u32> = UndoLog::new();
        let s = log.start_snapshot();
        log.push(UndoRecord::NewElem(0));
        log.push(UndoRecord::NewElem(1));
        let popped = log.rollback_to(s);
        assert_eq!(
            popped,
            vec![UndoRecord::NewElem(1), UndoRecord::NewElem(0)]
        );
        assert_eq!(log.num_open_snapshots(), 1);
    }

    #[test]
    fn rollback_then_commit_closes_a_no_op_frame() {
        // A frame that turns out to have nothing to undo can still be
        // closed by rolling back to its own checkpoint and then committing
        // that same checkpoint.
        let mut log: UndoLog<u32> = UndoLog::new();
        let outer = log.start_snapshot();
        log.push(UndoRecord::NewElem(0));
        let inner = log.start_snapshot();
        log.rollback_to(inner);
        log.commit(inner);
        assert_eq!(log.num_open_snapshots(), 1);
        log.commit(outer);
        assert_eq!(log.num_open_snapshots(), 0);
    }

    #[test]
    fn commit_root_clears_log() {
        let mut log: UndoLog<u32> = UndoLog::new();
        let s = log.start_snapshot();
        log.push(UndoRecord::NewElem(0));
        log.commit(s);
        assert_eq!(log.num_open_snapshots(), 0);
        assert_eq!(log.length(), 0);
    }

    #[test]
    fn commit_nested_keeps_records_for_outer_frame() {
        let mut log: UndoLog<u32> = UndoLog::new();
        let outer = log.start_snapshot();
        log.push(UndoRecord::NewElem(0));
        let inner = log.start_snapshot();
        log.push(UndoRecord::NewElem(1));
        log.commit(inner);
        assert_eq!(log.num_open_snapshots(), 1);
        assert_eq!(log.length(), 2);
        log.commit(outer);
        assert_eq!(log.num_open_snapshots(), 0);
        assert_eq!(log.length(), 0);
    }

    #[test]
    #[should_panic(expected = "no open snapshot")]
    fn commit_without_open_snapshot_is_fatal() {
        let mut log: UndoLog<u32> = UndoLog::new();
        log.push(UndoRecord::NewElem(0));
        // Fabricate a snapshot token without ever calling start_snapshot.
        let s = Snapshot { undo_len: 0 };
        log.commit(s);
    }

    #[test]
    fn has_changes_reflects_actions_since() {
        let mut log: UndoLog<u32> = UndoLog::new();
        let s = log.start_snapshot();
        assert!(!log.has_changes(&s));
        log.push(UndoRecord::NewElem(0));
        assert!(log.has_changes(&s));
        assert_eq!(log.actions_since(&s).len(), 1);
    }
}
