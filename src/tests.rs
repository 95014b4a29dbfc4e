//! Integration tests exercising the invariants and worked scenarios.

use crate::{Allocator, OrderedSet, PoolError};

fn buffer(n: usize) -> Vec<u8> {
    vec![0u8; n]
}

#[test]
fn scenario_sorted_iteration_forward_and_reverse() {
    let mut buf = buffer(2048);
    let set_alloc = Allocator::new(&mut buf);
    let mut set = OrderedSet::new(set_alloc).unwrap();

    for k in [5, 3, 7, 20, 1, 44, 22, 8] {
        set.insert(k);
    }

    let forward: Vec<_> = set.iter().copied().collect();
    assert_eq!(forward, vec![1, 3, 5, 7, 8, 20, 22, 44]);

    let backward: Vec<_> = set.iter().rev().copied().collect();
    assert_eq!(backward, vec![44, 22, 20, 8, 7, 5, 3, 1]);

    assert_eq!(set.len(), 8);
    assert_eq!(set.count(&7), 1);
    assert_eq!(set.count(&9), 0);
}

#[test]
fn scenario_duplicate_inserts_are_rejected() {
    let mut buf = buffer(1024);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();

    let (first, inserted) = set.insert(5);
    assert!(inserted);

    let (second, inserted) = set.insert(5);
    assert!(!inserted);
    assert_eq!(first, second);

    let (third, inserted) = set.insert(5);
    assert!(!inserted);
    assert_eq!(first, third);

    assert_eq!(set.len(), 1);
}

#[test]
fn scenario_pool_exhaustion_then_clear_and_reuse() {
    // Header is 3 usize words; sized for 1 head block + 3 key blocks.
    let header = 3 * core::mem::size_of::<usize>();
    let node = core::mem::size_of::<usize>() * 4; // llink + rlink + tag(rounded) + key upper bound
    let mut buf = buffer(header + 4 * node.max(32));
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();

    assert!(set.insert(1).1);
    assert!(set.insert(2).1);
    assert!(set.insert(3).1);
    let (cursor, inserted) = set.insert(4);
    assert!(!inserted);
    assert_eq!(cursor, set.end());

    assert_eq!(set.count(&1), 1);
    assert_eq!(set.count(&2), 1);
    assert_eq!(set.count(&3), 1);

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);

    assert!(set.insert(10).1);
    assert!(set.insert(20).1);
    assert!(set.insert(30).1);
    let (cursor, inserted) = set.insert(40);
    assert!(!inserted);
    assert_eq!(cursor, set.end());

    let got: Vec<_> = set.iter().copied().collect();
    assert_eq!(got, vec![10, 20, 30]);
}

#[test]
fn scenario_copy_is_independent_of_source() {
    let mut buf_a = buffer(1024);
    let mut set_a = OrderedSet::new(Allocator::new(&mut buf_a)).unwrap();
    set_a.insert(1);
    set_a.insert(2);
    set_a.insert(3);

    let mut buf_b = buffer(1024);
    let set_b = OrderedSet::copy_from(&set_a, Allocator::new(&mut buf_b)).unwrap();

    set_a.clear();
    set_a.insert(99);

    let b_contents: Vec<_> = set_b.iter().copied().collect();
    assert_eq!(b_contents, vec![1, 2, 3]);

    let a_contents: Vec<_> = set_a.iter().copied().collect();
    assert_eq!(a_contents, vec![99]);
}

#[test]
fn boundary_buffer_for_exactly_two_data_blocks() {
    // 1 block is reserved for the head sentinel, 2 remain for keys.
    let header = 3 * core::mem::size_of::<usize>();
    let node = core::mem::size_of::<usize>() * 4;
    let mut buf = buffer(header + 3 * node);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();

    assert!(set.insert(1).1);
    assert!(set.insert(2).1);
    let (cursor, inserted) = set.insert(3);
    assert!(!inserted);
    assert_eq!(cursor, set.end());
}

#[test]
fn boundary_empty_tree_begin_end_rbegin_rend() {
    let mut buf = buffer(256);
    let set = OrderedSet::<i32>::new(Allocator::new(&mut buf)).unwrap();

    assert_eq!(set.begin(), set.end());
    assert_eq!(set.rbegin(), set.rend());
    assert!(set.is_empty());
}

#[test]
fn boundary_single_element_threads_to_head_both_sides() {
    let mut buf = buffer(256);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    set.insert(42);

    assert_eq!(set.begin(), set.rbegin());
    assert_eq!(set.advance(set.begin()), set.end());
    assert_eq!(set.retreat(set.rbegin()), set.rend());
}

#[test]
fn invariant_forward_reversed_equals_backward() {
    let mut buf = buffer(4096);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    for k in [50, 20, 80, 10, 30, 70, 90, 5, 15, 25, 35] {
        set.insert(k);
    }

    let forward: Vec<_> = set.iter().copied().collect();
    let mut backward: Vec<_> = set.iter().rev().copied().collect();
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn invariant_begin_advanced_size_times_reaches_end() {
    let mut buf = buffer(4096);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    for k in [4, 2, 6, 1, 3, 5, 7] {
        set.insert(k);
    }

    let mut cursor = set.begin();
    for _ in 0..set.len() {
        cursor = set.advance(cursor);
    }
    assert_eq!(cursor, set.end());
}

#[test]
fn invariant_tree_ordering_after_each_insert() {
    // A small deterministic LCG stands in for the original's
    // out-of-scope random-data generator; this crate doesn't depend on
    // `rand`, consistent with keeping auxiliary data generators external.
    struct Lcg(u64);
    impl Lcg {
        fn next(&mut self) -> i32 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((self.0 >> 33) % 2000) as i32 - 1000
        }
    }

    let mut rng = Lcg(0xDEAD_BEEF);
    let header = 3 * core::mem::size_of::<usize>();
    let node = core::mem::size_of::<usize>() * 4;
    // +1 block for the head sentinel, on top of the 1000 key blocks needed
    // for the worst case of 1000 distinct draws.
    let mut buf = buffer(header + 1001 * node);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();

    let mut inserted = std::collections::BTreeSet::new();
    for _ in 0..1000 {
        let k = rng.next();
        set.insert(k);
        inserted.insert(k);

        let got: Vec<_> = set.iter().copied().collect();
        let mut expected: Vec<_> = inserted.iter().copied().collect();
        expected.sort_unstable();
        assert_eq!(got, expected);
    }

    set.clear();
    assert!(set.is_empty());

    // Pool is reusable after clear with the same capacity as freshly inited.
    for k in 0..1000 {
        assert!(set.insert(k).1);
    }
    assert_eq!(set.len(), 1000);
}

#[test]
fn pool_rejects_undersized_buffer() {
    let mut buf = buffer(8); // smaller than header alone
    let result = OrderedSet::<i64>::new(Allocator::new(&mut buf));
    assert_eq!(result.err(), Some(PoolError::TooSmall));
}

#[test]
fn pool_rejects_small_non_poolable_type() {
    let mut buf = buffer(256);
    let result = OrderedSet::<u8>::new(Allocator::new(&mut buf));
    assert_eq!(result.err(), Some(PoolError::NotPoolable));
}

#[test]
fn elementwise_equality_matches_copy() {
    let mut buf_a = buffer(1024);
    let mut set_a = OrderedSet::new(Allocator::new(&mut buf_a)).unwrap();
    set_a.insert_all([3, 1, 4, 1, 5, 9, 2, 6]);

    let mut buf_b = buffer(1024);
    let set_b = OrderedSet::copy_from(&set_a, Allocator::new(&mut buf_b)).unwrap();

    assert_eq!(set_a, set_b);
    let a: Vec<_> = set_a.iter().copied().collect();
    let b: Vec<_> = set_b.iter().copied().collect();
    assert_eq!(a, b);
}

#[test]
fn swap_requires_shared_pool_by_default() {
    let mut buf_a = buffer(1024);
    let mut set_a = OrderedSet::new(Allocator::new(&mut buf_a)).unwrap();
    set_a.insert(1);

    let mut buf_b = buffer(1024);
    let mut set_b = OrderedSet::new(Allocator::new(&mut buf_b)).unwrap();
    set_b.insert(2);

    assert_eq!(set_a.swap(&mut set_b), Err(PoolError::PoolMismatch));
}

#[test]
fn swap_same_pool_exchanges_contents() {
    let mut buf = buffer(4096);
    let alloc = Allocator::new(&mut buf);
    let mut set_a = OrderedSet::new(alloc).unwrap();
    set_a.insert(1);
    set_a.insert(2);

    let mut set_b = OrderedSet::new(alloc).unwrap();
    set_b.insert(9);

    set_a.swap(&mut set_b).unwrap();

    let a: Vec<_> = set_a.iter().copied().collect();
    let b: Vec<_> = set_b.iter().copied().collect();
    assert_eq!(a, vec![9]);
    assert_eq!(b, vec![1, 2]);
}

#[test]
fn assign_reuses_destination_pool_not_source() {
    let mut buf_a = buffer(1024);
    let mut set_a = OrderedSet::new(Allocator::new(&mut buf_a)).unwrap();
    set_a.insert(1);
    set_a.insert(2);

    let mut buf_b = buffer(1024);
    let mut set_b = OrderedSet::new(Allocator::new(&mut buf_b)).unwrap();
    set_b.insert(999);

    set_b.assign_from(&set_a);

    let b: Vec<_> = set_b.iter().copied().collect();
    assert_eq!(b, vec![1, 2]);

    // set_b's pool, not set_a's, still backs it: inserting into set_b
    // doesn't touch set_a's buffer at all.
    set_b.insert(3);
    let a: Vec<_> = set_a.iter().copied().collect();
    assert_eq!(a, vec![1, 2]);
}

#[test]
fn debug_format_lists_keys_in_order() {
    let mut buf = buffer(1024);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    set.insert_all([3, 1, 2]);
    assert_eq!(format!("{:?}", set), "{1, 2, 3}");
}

#[test]
fn cursor_debug_does_not_panic() {
    let mut buf = buffer(256);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    set.insert(1);
    let _ = format!("{:?}", set.begin());
    let _ = format!("{:?}", set.end());
}

#[test]
fn into_iterator_over_reference_matches_iter() {
    let mut buf = buffer(1024);
    let mut set = OrderedSet::new(Allocator::new(&mut buf)).unwrap();
    set.insert_all([4, 2, 6]);

    let via_into_iter: Vec<_> = (&set).into_iter().copied().collect();
    let via_iter: Vec<_> = set.iter().copied().collect();
    assert_eq!(via_into_iter, via_iter);

    for x in &set {
        assert!(set.count(x) == 1);
    }
}

#[test]
fn from_iter_with_builds_and_inserts_in_one_step() {
    let mut buf = buffer(1024);
    let set =
        OrderedSet::from_iter_with(Allocator::new(&mut buf), crate::NaturalOrder, [5, 1, 3, 1])
            .unwrap();

    let got: Vec<_> = set.iter().copied().collect();
    assert_eq!(got, vec![1, 3, 5]);
}
