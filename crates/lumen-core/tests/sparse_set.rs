//! SparseSet generational handle tests.
//!
//! These cover generation bumps, stale-handle detection, slot reuse and the
//! optional live-value limit used to pre-size object storage.

use lumen_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_push_and_get() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    assert_eq!(*set.get(idx), 42);

    let idx2 = set.push(100);
    assert_eq!(*set.get(idx2), 100);
    assert_eq!(*set.get(idx), 42);
}

#[test]
fn test_try_get_invalid_returns_none() {
    let set = SparseSet::<i32>::new();
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_use_after_free_panics() {
    let mut set = SparseSet::new();

    let idx = set.push(42);
    set.remove(idx);
    let _ = set.get(idx);
}

#[test]
fn test_stale_handle_after_slot_reuse() {
    let mut set = SparseSet::new();

    let idx1 = set.push(1);
    set.remove(idx1);
    let idx2 = set.push(2);

    assert_eq!(idx2.index(), idx1.index());
    assert_eq!(idx2.generation(), 1);
    assert_eq!(set.try_get(idx1), None);
    assert!(!set.contains(idx1));
    assert!(set.contains(idx2));
}

#[test]
fn test_try_remove_twice() {
    let mut set = SparseSet::new();

    let idx = set.push("a");
    assert_eq!(set.try_remove(idx), Some("a"));
    assert_eq!(set.try_remove(idx), None);
    assert!(set.is_empty());
}

#[test]
fn test_clear_invalidates_handles() {
    let mut set = SparseSet::new();

    let a = set.push(1);
    let b = set.push(2);
    set.clear();

    assert_eq!(set.len(), 0);
    assert!(!set.contains(a));
    assert!(!set.contains(b));
    let c = set.push(3);
    assert_ne!(c, a);
    assert_ne!(c, b);
}

#[test]
fn test_iteration_skips_removed() {
    let mut set = SparseSet::new();

    set.push(10);
    let idx = set.push(20);
    set.push(30);
    set.remove(idx);

    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, vec![10, 30]);

    for v in set.iter_mut() {
        *v += 1;
    }
    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, vec![11, 31]);
}

#[test]
fn test_limit_is_live_count_not_slot_count() {
    let mut set = SparseSet::with_limit(3);

    let handles: Vec<_> = (0..3).map(|i| set.try_push(i).unwrap()).collect();
    assert!(set.try_push(3).is_err());

    set.remove(handles[1]);
    assert!(set.try_push(4).is_ok());
    assert!(set.try_push(5).is_err());
    assert_eq!(set.limit(), Some(3));
}
