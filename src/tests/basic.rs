use crate::{Error, FrozenMap};

#[test]
fn empty_map() {
    let map: FrozenMap<String, i32> = FrozenMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn insert_one() {
    let map = FrozenMap::new().insert("hello", 42);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
}

#[test]
fn insert_and_get() {
    let map = FrozenMap::new().insert("key", 100);
    assert_eq!(map.get(&"key"), Some(&100));
}

#[test]
fn get_missing_key() {
    let map = FrozenMap::new().insert("a", 1);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn lookup_missing_key_fails() {
    let map = FrozenMap::new().insert("a", 1);
    assert_eq!(map.lookup(&"a"), Ok(&1));
    assert_eq!(map.lookup(&"b"), Err(Error::KeyNotFound));
}

#[test]
fn insert_multiple() {
    let map: FrozenMap<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
    assert_eq!(map.len(), 10);
    for i in 0..10 {
        assert_eq!(map.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn overwrite_value() {
    let m1 = FrozenMap::new().insert("k", 1);
    let m2 = m1.insert("k", 2);
    assert_eq!(m2.len(), 1);
    assert_eq!(m2.get(&"k"), Some(&2));
    assert_eq!(m1.get(&"k"), Some(&1));
}

/// Including the same pair twice is the same as including it once.
#[test]
fn insert_is_idempotent() {
    let base: FrozenMap<i32, i32> = (0..50).map(|i| (i, i)).collect();
    let once = base.insert(7, 700);
    let twice = once.insert(7, 700);
    assert_eq!(once, twice);
    assert_eq!(twice.len(), 50);
}

#[test]
fn contains_key() {
    let map = FrozenMap::new().insert(42, "val");
    assert!(map.contains_key(&42));
    assert!(!map.contains_key(&2));
}

#[test]
fn remove_existing() {
    let map = FrozenMap::new().insert("a", 1).insert("b", 2);
    let removed = map.remove(&"a").unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed.get(&"a"), None);
    assert_eq!(removed.get(&"b"), Some(&2));
}

/// Removing an absent key is an error and leaves the map as it was.
#[test]
fn remove_missing_fails() {
    let map = FrozenMap::new().insert("a", 1);
    assert_eq!(map.remove(&"z").unwrap_err(), Error::KeyNotFound);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"a"), Some(&1));
}

#[test]
fn remove_from_empty_fails() {
    let map: FrozenMap<i32, i32> = FrozenMap::new();
    assert_eq!(map.remove(&1).unwrap_err(), Error::KeyNotFound);
}

#[test]
fn remove_all() {
    let map: FrozenMap<i32, i32> = [(1, 10), (2, 20), (3, 30)].into();
    let emptied = map
        .remove(&1)
        .and_then(|m| m.remove(&2))
        .and_then(|m| m.remove(&3))
        .unwrap();
    assert!(emptied.is_empty());
    assert_eq!(emptied, FrozenMap::new());
    assert_eq!(map.len(), 3);
}

#[test]
fn remove_among_many() {
    let map: FrozenMap<i32, i32> = (0..100).map(|i| (i, i * 10)).collect();
    let removed = map.remove(&50).unwrap();
    assert_eq!(removed.len(), 99);
    assert_eq!(removed.get(&50), None);
    assert_eq!(removed.remove(&50).unwrap_err(), Error::KeyNotFound);
    for i in (0..100).filter(|i| *i != 50) {
        assert_eq!(removed.get(&i), Some(&(i * 10)));
    }
}

/// `merge` is a right-biased union.
#[test]
fn merge_right_biased() {
    let left = FrozenMap::from([("a", 1), ("b", 2)]);
    let merged = left.merge([("b", 20), ("c", 30)]);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged.get(&"a"), Some(&1));
    assert_eq!(merged.get(&"b"), Some(&20));
    assert_eq!(merged.get(&"c"), Some(&30));
    assert_eq!(left.get(&"b"), Some(&2));
}

#[test]
fn merge_with_other_map() {
    let left: FrozenMap<i32, i32> = (0..20).map(|i| (i, 0)).collect();
    let right: FrozenMap<i32, i32> = (10..30).map(|i| (i, 1)).collect();
    let merged = left.merge(right.iter().map(|(k, v)| (*k, *v)));
    assert_eq!(merged.len(), 30);
    assert_eq!(merged.get(&5), Some(&0));
    assert_eq!(merged.get(&15), Some(&1));
    assert_eq!(merged.get(&25), Some(&1));
}

#[test]
fn bulk_construction_last_write_wins() {
    let map: FrozenMap<&str, i32> = vec![("k", 1), ("j", 2), ("k", 3)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&"k"), Some(&3));
}

#[test]
fn keys_and_values() {
    let map: FrozenMap<i32, i32> = (0..5).map(|i| (i, i * 2)).collect();
    let mut keys: Vec<i32> = map.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);
    let sum: i32 = map.values().sum();
    assert_eq!(sum, 20);
    assert_eq!(map.keys().len(), 5);
}
