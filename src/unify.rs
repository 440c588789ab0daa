//! Weighted union-find (rank heuristic + path compression) with an explicit,
//! caller-assigned payload per equivalence class, built on a
//! [`SnapshotArray`].

use log::{debug, trace};

use crate::snapshot_array::SnapshotArray;
use crate::undo_log::Snapshot;

/// A node's position in a [`UnificationTable`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarIndex(u32);

impl VarIndex {
    /// Wrap a raw index.
    pub fn new(index: u32) -> Self {
        VarIndex(index)
    }

    /// The wrapped raw index.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for VarIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VarIndex {{ index: {} }}", self.0)
    }
}

/// A union-find node: the user payload for the equivalence class this node
/// currently belongs to, a rank (meaningful only at roots), and a parent
/// pointer (a node is a root iff `parent` equals its own index).
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VarValue<T> {
    pub value: T,
    pub rank: u32,
    pub parent: VarIndex,
}

impl<T: PartialEq> PartialEq for VarValue<T> {
    // Rank is intentionally excluded: path compression and rank bumps are
    // implementation detail that snapshot round-trips must not be sensitive
    // to at non-root nodes, and the distilled invariant only pins rank
    // meaning at roots.
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.parent == other.parent
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for VarValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VarValue {{ value: {:?}, rank: {}, parent: {:?} }}",
            self.value, self.rank, self.parent
        )
    }
}

impl<T> VarValue<T> {
    fn root(index: VarIndex, value: T) -> Self {
        VarValue {
            value,
            rank: 0,
            parent: index,
        }
    }

    fn is_root_at(&self, index: VarIndex) -> bool {
        self.parent == index
    }
}

/// A union-find forest of [`VarValue<T>`] nodes with snapshot/rollback
/// support and a caller-assigned payload per equivalence class.
#[derive(Clone)]
pub struct UnificationTable<T> {
    values: SnapshotArray<VarValue<T>>,
}

impl<T> Default for UnificationTable<T> {
    fn default() -> Self {
        UnificationTable {
            values: SnapshotArray::default(),
        }
    }
}

impl<T: Clone> UnificationTable<T> {
    /// An empty table. `capacity` is an advisory hint.
    pub fn new(capacity: usize) -> Self {
        UnificationTable {
            values: SnapshotArray::new(capacity),
        }
    }

    /// Append a fresh singleton root node carrying `value`, returning its
    /// index.
    pub fn push(&mut self, value: T) -> VarIndex {
        let index = VarIndex::new(self.values.length() as u32);
        self.values.push(VarValue::root(index, value));
        index
    }

    /// Append `node` verbatim. An escape hatch for deserialization/testing;
    /// the caller is responsible for the union-find invariants (parent in
    /// range, acyclic, rank meaningful only at roots).
    pub fn push_var(&mut self, node: VarValue<T>) -> VarIndex {
        let index = VarIndex::new(self.values.length() as u32);
        self.values.push(node);
        index
    }

    /// The number of nodes.
    #[inline]
    pub fn length(&self) -> usize {
        self.values.length()
    }

    /// Alias of [`length`](Self::length); paired with [`is_empty`](Self::is_empty)
    /// for the idiomatic `len`/`is_empty` convention.
    #[inline]
    pub fn len(&self) -> usize {
        self.length()
    }

    /// Whether the table currently holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// An iterator over every node, in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, VarValue<T>> {
        self.values.iter()
    }

    /// A by-value copy of the node at `index`, if in bounds.
    pub fn get(&self, index: VarIndex) -> Option<VarValue<T>> {
        self.values.get(index.0 as usize)
    }

    /// The node at `index`. Fatal if out of range.
    pub fn value(&self, index: VarIndex) -> VarValue<T> {
        self.values.op_get(index.0 as usize).clone()
    }

    /// The parent field stored at `index`. Fatal if out of range.
    ///
    /// This is a coarse accessor that exposes implementation detail (the raw
    /// parent pointer, not the representative); callers typically use it
    /// only as a convenient source of further `VarIndex` values, e.g. when
    /// walking an explicit parent chain for diagnostics.
    pub fn index(&self, index: VarIndex) -> VarIndex {
        self.values.op_get(index.0 as usize).parent
    }

    /// Overwrite the node at `index`.
    pub fn set(&mut self, index: VarIndex, node: VarValue<T>) {
        self.values.set(index.0 as usize, node);
    }

    /// Read the node at `index`, apply `f`, and write the result back.
    pub fn update(&mut self, index: VarIndex, f: impl FnOnce(VarValue<T>) -> VarValue<T>) {
        let node = self.value(index);
        self.set(index, f(node));
    }

    /// Find the representative of `index`'s equivalence class, compressing
    /// the path walked along the way.
    pub fn find(&mut self, index: VarIndex) -> VarIndex {
        let node = self.value(index);
        if node.is_root_at(index) {
            return index;
        }

        let root = self.find(node.parent);
        if root != node.parent {
            trace!("find: compressing {:?} -> {:?}", index, root);
            let compressed = VarValue {
                parent: root,
                ..node
            };
            self.set(index, compressed);
        }
        root
    }

    /// Whether `a` and `b` are currently in the same equivalence class.
    pub fn unioned(&mut self, a: VarIndex, b: VarIndex) -> bool {
        self.find(a) == self.find(b)
    }

    /// The payload of the representative of `node`'s parent's class.
    ///
    /// (`node` is itself a [`VarValue`], not an index — this mirrors the
    /// convenience accessor of the same name in the layer this table is
    /// modeled on, used when the caller already has a node in hand and
    /// wants its class's current payload without re-deriving its own
    /// index.)
    pub fn find_root(&mut self, node: &VarValue<T>) -> T {
        let root = self.find(node.parent);
        self.value(root).value
    }

    /// Merge the equivalence classes of `a` and `b`, using `new_value` as the
    /// payload of the resulting class. If `a` and `b` are already in the
    /// same class, returns its representative unchanged and does not touch
    /// `new_value`. Otherwise the lower-rank root is redirected under the
    /// higher-rank one (ties broken by bumping rank), and the new root's
    /// payload becomes exactly `new_value` — the caller is responsible for
    /// merging the two discarded payloads beforehand if that's desired.
    pub fn union(&mut self, a: VarIndex, b: VarIndex, new_value: T) -> VarIndex {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        let rank_a = self.value(ra).rank;
        let rank_b = self.value(rb).rank;

        let new_root = if rank_a < rank_b {
            self.redirect_root(rank_b, ra, rb, new_value);
            rb
        } else if rank_a > rank_b {
            self.redirect_root(rank_a, rb, ra, new_value);
            ra
        } else {
            self.redirect_root(rank_a + 1, rb, ra, new_value);
            ra
        };
        debug!("union: new root is {:?}", new_root);
        new_root
    }

    /// The primitive two-write step behind [`union`](Self::union): redirect
    /// `old`'s parent pointer to `new`, then install `new_rank` and
    /// `new_value` at `new` (whose own parent is left pointing at itself).
    pub fn redirect_root(&mut self, new_rank: u32, old: VarIndex, new: VarIndex, new_value: T) {
        self.update(old, |node| VarValue { parent: new, ..node });
        self.update(new, |node| VarValue {
            value: new_value,
            rank: new_rank,
            ..node
        });
    }

    /// Reinitialize every node to a singleton root (preserving its payload)
    /// and discard all pending undo state. Invalidates every outstanding
    /// snapshot.
    pub fn reset(&mut self) {
        let len = self.values.length();
        for i in 0..len {
            let index = VarIndex::new(i as u32);
            let current = self.values.op_get(i).clone();
            self.values.op_set(
                i,
                VarValue {
                    value: current.value,
                    rank: 0,
                    parent: index,
                },
            );
        }
        self.values.commit_all();
    }

    /// Whether a snapshot is currently open.
    pub fn in_snapshot(&self) -> bool {
        self.values.in_snapshot()
    }

    /// Open a new (possibly nested) snapshot.
    pub fn start_snapshot(&mut self) -> Snapshot {
        self.values.start_snapshot()
    }

    /// Reverse every mutation recorded since `snapshot`.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        self.values.rollback_to(snapshot);
    }

    /// Finalize every mutation recorded since `snapshot`.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.values.commit(snapshot);
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UnificationTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UnificationTable[ ")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:?}")?;
        }
        write!(f, " ]")
    }
}
