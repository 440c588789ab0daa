//! A growable, indexed sequence of `T` whose mutations are journaled against
//! an [`UndoLog`] while a snapshot is open.

use log::debug;

use crate::error::{fatal, UnifyError};
use crate::undo_log::{Snapshot, UndoLog, UndoRecord};

/// An indexed sequence of values paired with its own undo log.
#[derive(Clone)]
pub struct SnapshotArray<T> {
    values: Vec<T>,
    undo_log: UndoLog<T>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SnapshotArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SnapshotArray[ ")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value:?}")?;
        }
        write!(f, " ]")
    }
}

impl<T> Default for SnapshotArray<T> {
    fn default() -> Self {
        SnapshotArray {
            values: Vec::new(),
            undo_log: UndoLog::new(),
        }
    }
}

impl<T> SnapshotArray<T> {
    /// A new, empty array. `capacity` is an advisory hint, not a guarantee.
    pub fn new(capacity: usize) -> Self {
        SnapshotArray {
            values: Vec::with_capacity(capacity),
            undo_log: UndoLog::new(),
        }
    }

    /// The number of live elements.
    #[inline]
    pub fn length(&self) -> usize {
        self.values.len()
    }

    /// Whether the array currently holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether a snapshot is currently open.
    #[inline]
    pub fn in_snapshot(&self) -> bool {
        self.undo_log.in_snapshot()
    }

    fn bounds_check(&self, index: usize) {
        if index >= self.values.len() {
            fatal(UnifyError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            });
        }
    }

    /// A by-value copy of the element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.values.get(index).cloned()
    }

    /// Bounds-checked read access, fatal on an invalid index.
    pub fn op_get(&self, index: usize) -> &T {
        self.bounds_check(index);
        &self.values[index]
    }

    /// Bounds-checked write access that bypasses journaling. Prefer [`set`]
    /// for any mutation that must survive rollback.
    ///
    /// [`set`]: SnapshotArray::set
    pub fn op_set(&mut self, index: usize, value: T) {
        self.bounds_check(index);
        self.values[index] = value;
    }

    /// An iterator over the live elements, in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// Append `value`. If a snapshot is open, records a `NewElem` so the
    /// append can be reversed.
    pub fn push(&mut self, value: T) {
        let index = self.values.len();
        self.values.push(value);
        if self.undo_log.in_snapshot() {
            self.undo_log.push(UndoRecord::NewElem(index));
        }
    }

    /// Overwrite the element at `index`. If a snapshot is open, records the
    /// pre-image as a `SetElem` so the overwrite can be reversed.
    pub fn set(&mut self, index: usize, value: T) {
        self.bounds_check(index);
        let old = std::mem::replace(&mut self.values[index], value);
        if self.undo_log.in_snapshot() {
            self.undo_log.push(UndoRecord::SetElem(index, old));
        }
    }

    /// Apply `f` to every element, in index order. If a snapshot is open,
    /// each overwrite is journaled individually; otherwise the values are
    /// simply replaced.
    pub fn set_all(&mut self, mut f: impl FnMut(usize) -> T) {
        if self.undo_log.in_snapshot() {
            for i in 0..self.values.len() {
                let new_value = f(i);
                let old = std::mem::replace(&mut self.values[i], new_value);
                self.undo_log.push(UndoRecord::SetElem(i, old));
            }
        } else {
            for i in 0..self.values.len() {
                self.values[i] = f(i);
            }
        }
    }

    /// Append each value from `iter`, in order.
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.push(value);
        }
    }

    /// Clear both the values and the undo log. Invalidates every outstanding
    /// snapshot.
    pub fn reset(&mut self) {
        self.values.clear();
        self.undo_log.clear();
    }

    /// If a snapshot is open, append `record` to the log verbatim and return
    /// `true`; otherwise do nothing and return `false`.
    ///
    /// This lets a layer built on top of this array (such as the
    /// unification table) embed custom rollback actions without this array
    /// needing to know anything about them.
    pub fn record(&mut self, record: UndoRecord<T>) -> bool {
        if self.undo_log.in_snapshot() {
            self.undo_log.push(record);
            true
        } else {
            false
        }
    }

    /// Open a new (possibly nested) snapshot.
    pub fn start_snapshot(&mut self) -> Snapshot {
        self.undo_log.start_snapshot()
    }

    /// A view of every undo record pushed since `snapshot` was opened.
    pub fn actions_since(&self, snapshot: &Snapshot) -> &[UndoRecord<T>] {
        self.undo_log.actions_since(snapshot)
    }

    /// Reverse every mutation recorded since `snapshot`, restoring the array
    /// to exactly the state it had at that point. Records are reversed in
    /// strict LIFO order. Does not change the number of open snapshots.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        debug!("SnapshotArray::rollback_to");
        let popped = self.undo_log.rollback_to(snapshot);
        for record in popped {
            match record {
                UndoRecord::NewElem(index) => {
                    let popped_value = self.values.pop();
                    if popped_value.is_none() || self.values.len() != index {
                        fatal(UnifyError::RollbackIndexMismatch {
                            expected: index,
                            found: self.values.len(),
                        });
                    }
                }
                UndoRecord::SetElem(index, old) => {
                    self.values[index] = old;
                }
            }
        }
    }

    /// Delegates to the undo log: finalize every mutation since `snapshot`,
    /// discarding undo records entirely only if `snapshot` was the root
    /// (outermost) snapshot.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.undo_log.commit(snapshot);
    }

    /// Clear the undo log without touching the values — "forget I was
    /// recording." Used by [`crate::unify::UnificationTable::reset`] after it
    /// has already rewritten every node by hand.
    pub fn commit_all(&mut self) {
        self.undo_log.clear();
    }
}

impl<T> std::ops::Index<usize> for SnapshotArray<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        self.op_get(index)
    }
}
