//! End-to-end scenarios driven entirely through the public `UnificationTable`
//! API, the way a downstream consumer would use the crate.

use unify_table::{UnificationTable, VarIndex};

fn idx(i: u32) -> VarIndex {
    VarIndex::new(i)
}

#[test]
fn basic_union() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    for v in 0..5u32 {
        t.push(v);
    }

    assert!(!t.unioned(idx(1), idx(2)));
    t.union(idx(1), idx(2), 8);
    assert!(t.unioned(idx(1), idx(2)));
    assert!(t.unioned(idx(2), idx(1)));
    assert!(!t.unioned(idx(1), idx(3)));
    let root = t.find(idx(1));
    assert_eq!(t.value(root).value, 8);
}

#[test]
fn payload_overwrite_on_second_union() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    for v in 0..5u32 {
        t.push(v);
    }
    t.union(idx(1), idx(2), 8);
    t.union(idx(3), idx(1), 9);
    let root = t.find(idx(1));
    assert_eq!(t.value(root).value, 9);
}

#[test]
fn rollback_of_union() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    for v in 0..5u32 {
        t.push(v);
    }
    let s = t.start_snapshot();
    t.union(idx(1), idx(2), 8);
    assert!(t.unioned(idx(1), idx(2)));
    t.rollback_to(s);
    assert!(!t.unioned(idx(1), idx(2)));
    assert!(!t.unioned(idx(2), idx(1)));
    assert!(!t.unioned(idx(1), idx(3)));
}

#[test]
fn commit_preserves_growth() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    t.push(42);
    let s = t.start_snapshot();
    t.push(100);
    t.commit(s);
    assert_eq!(t.len(), 2);
}

#[test]
fn rollback_discards_growth() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    t.push(42);
    let s = t.start_snapshot();
    t.push(100);
    t.rollback_to(s);
    assert_eq!(t.len(), 1);
}

#[test]
fn redirect_root_primitive() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    t.push(0);
    t.push(0);
    t.redirect_root(1, idx(0), idx(1), 42);
    assert_eq!(t.find(idx(0)), idx(1));
    let new_root = t.value(idx(1));
    assert_eq!(new_root.value, 42);
    assert_eq!(new_root.rank, 1);
    assert_eq!(new_root.parent, idx(1));
}

#[test]
fn nested_snapshots_across_a_whole_session() {
    let mut t: UnificationTable<&'static str> = UnificationTable::new(0);
    for s in ["a", "b", "c", "d"] {
        t.push(s);
    }

    let outer = t.start_snapshot();
    t.union(idx(0), idx(1), "ab");

    let inner = t.start_snapshot();
    t.union(idx(2), idx(3), "cd");
    assert!(t.unioned(idx(2), idx(3)));
    t.rollback_to(inner);
    assert!(!t.unioned(idx(2), idx(3)));

    // The inner frame is still "open" per the rollback_to contract; it must
    // be explicitly committed (or rolled back again) before the outer frame
    // can be finalized.
    t.commit(inner);

    assert!(t.unioned(idx(0), idx(1)));
    t.commit(outer);
    assert!(t.unioned(idx(0), idx(1)));
    assert!(!t.in_snapshot());
}

#[test]
fn reset_after_heavy_use() {
    let mut t: UnificationTable<u32> = UnificationTable::new(0);
    for v in 0..6u32 {
        t.push(v * 10);
    }
    t.union(idx(0), idx(1), 999);
    t.union(idx(2), idx(3), 999);
    t.union(idx(0), idx(2), 999);

    t.reset();

    for i in 0..6u32 {
        let index = idx(i);
        assert_eq!(t.find(index), index);
        assert_eq!(t.value(index).rank, 0);
    }
    assert!(!t.in_snapshot());
}
