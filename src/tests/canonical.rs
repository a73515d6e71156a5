use super::shape;
use crate::FrozenMap;

fn build(pairs: &[(i32, i32)]) -> FrozenMap<i32, i32> {
    pairs
        .iter()
        .fold(FrozenMap::new(), |m, &(k, v)| m.insert(k, v))
}

/// Insertion order must not affect the resulting structure.
#[test]
fn insert_order_abc_cba_bca() {
    let maps = [
        build(&[(1, 10), (2, 20), (3, 30)]),
        build(&[(3, 30), (2, 20), (1, 10)]),
        build(&[(2, 20), (3, 30), (1, 10)]),
    ];

    assert_eq!(maps[0], maps[1]);
    assert_eq!(maps[1], maps[2]);
    assert_eq!(shape(&maps[0]), shape(&maps[1]));
    assert_eq!(shape(&maps[1]), shape(&maps[2]));
    assert_eq!(maps[0].content_hash(), maps[2].content_hash());
}

/// 1000 entries in three orderings.
#[test]
fn insert_order_1000_entries() {
    let entries: Vec<(u64, u64)> = (0..1000).map(|i| (i, i * 7)).collect();

    let forward: FrozenMap<u64, u64> = entries.iter().copied().collect();
    let backward: FrozenMap<u64, u64> = entries.iter().rev().copied().collect();
    let interleaved: FrozenMap<u64, u64> = entries
        .iter()
        .step_by(2)
        .chain(entries.iter().skip(1).step_by(2))
        .copied()
        .collect();

    assert_eq!(shape(&forward), shape(&backward));
    assert_eq!(shape(&forward), shape(&interleaved));
    assert_eq!(forward, backward);
    assert_eq!(forward.content_hash(), interleaved.content_hash());
    assert_eq!(forward.len(), 1000);
}

/// After overwrite, order independence still holds.
#[test]
fn overwrite_preserves_canonicity() {
    let map_a = build(&[(1, 10), (2, 20), (1, 11)]);
    let map_b = build(&[(2, 20), (1, 11)]);

    assert_eq!(map_a, map_b);
    assert_eq!(shape(&map_a), shape(&map_b));
}

/// After delete, the shape equals a map that never held the key.
#[test]
fn delete_preserves_canonicity() {
    let full: FrozenMap<u64, u64> = (0..500).map(|i| (i, i)).collect();
    let pruned = (250..500).fold(full, |m, k| m.remove(&k).unwrap());
    let fresh: FrozenMap<u64, u64> = (0..250).map(|i| (i, i)).collect();

    assert_eq!(pruned, fresh);
    assert_eq!(shape(&pruned), shape(&fresh));
}

/// Equal maps hash equally through `std::hash::Hash`.
#[test]
fn hash_trait_is_shape_independent() {
    use std::hash::{BuildHasher, RandomState};

    let a = build(&[(1, 1), (2, 2), (3, 3)]);
    let b = build(&[(3, 3), (1, 1), (2, 2)]);
    let state = RandomState::new();
    assert_eq!(state.hash_one(&a), state.hash_one(&b));
}

#[test]
fn different_values_are_not_equal() {
    let a = build(&[(1, 1), (2, 2)]);
    let b = build(&[(1, 1), (2, 3)]);
    let c = build(&[(1, 1), (3, 2)]);
    assert_ne!(a, b);
    assert_ne!(a, c);
}

/// Cached content hashes decide inequality; equal hashes still compare entries.
#[test]
fn equality_with_cached_content_hashes() {
    let a = build(&[(1, 1), (2, 2), (3, 3)]);
    let b = build(&[(1, 1), (2, 2), (3, 4)]);
    let c = build(&[(3, 3), (2, 2), (1, 1)]);
    assert_ne!(a.content_hash(), b.content_hash());
    assert_eq!(a.content_hash(), c.content_hash());

    assert_ne!(a, b);
    assert_eq!(a, c);
}
