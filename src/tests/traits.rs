use std::collections::{BTreeMap, HashMap};

use crate::FrozenMap;

#[test]
fn default_is_empty() {
    let map: FrozenMap<i32, i32> = FrozenMap::default();
    assert!(map.is_empty());
    assert_eq!(map.content_hash(), 0);
}

#[test]
fn debug_format_lists_entries() {
    let map = FrozenMap::new().insert(1, "one");
    assert_eq!(format!("{map:?}"), r#"{1: "one"}"#);
    let empty: FrozenMap<i32, i32> = FrozenMap::new();
    assert_eq!(format!("{empty:?}"), "{}");
}

#[test]
fn debug_format_mutation() {
    let map = FrozenMap::from([(1, 1)]);
    let mut view = map.mutate();
    assert!(format!("{view:?}").contains("MapMutation"));
    view.close();
    assert_eq!(format!("{view:?}"), "MapMutation(closed)");
}

#[test]
fn from_iterator() {
    let map: FrozenMap<i32, i32> = vec![(1, 10), (2, 20), (3, 30)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(&10));
}

#[test]
fn from_std_maps() {
    let hash: HashMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
    let btree: BTreeMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
    let from_hash = FrozenMap::from(hash);
    let from_btree = FrozenMap::from(btree);
    assert_eq!(from_hash, from_btree);
    assert_eq!(from_hash.len(), 2);
}

#[test]
fn into_iterator_by_ref() {
    let map: FrozenMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    let mut seen = 0;
    for (k, v) in &map {
        assert_eq!(k, v);
        seen += 1;
    }
    assert_eq!(seen, 10);
}

#[test]
fn iter_is_exact_size() {
    let map: FrozenMap<u32, u32> = (0..1000).map(|i| (i, i)).collect();
    let mut iter = map.iter();
    assert_eq!(iter.len(), 1000);
    iter.next();
    assert_eq!(iter.len(), 999);
    assert_eq!(iter.count(), 999);
}

#[test]
fn index_existing() {
    let map = FrozenMap::new().insert("key", 42);
    assert_eq!(map[&"key"], 42);
}

#[test]
#[should_panic(expected = "key not found")]
fn index_missing_panics() {
    let map: FrozenMap<i32, i32> = FrozenMap::new();
    let _ = map[&999];
}

#[test]
fn error_messages() {
    use crate::Error;

    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    assert_eq!(
        Error::NoValue { name: "user".into() }.to_string(),
        "context variable 'user' has no value"
    );
    assert_eq!(Error::Reentrancy.to_string(), "context is already entered");
}

#[test]
fn keys_and_values_are_fused() {
    fn fused<I: std::iter::FusedIterator>(_: &I) {}

    let map = FrozenMap::from([(1, 'a'), (2, 'b')]);

    let mut keys = map.keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.by_ref().count(), 2);
    assert_eq!(keys.next(), None);
    assert_eq!(keys.next(), None);

    let mut values = map.values();
    assert_eq!(values.by_ref().count(), 2);
    assert_eq!(values.next(), None);
    assert_eq!(values.next(), None);

    fused(&map.keys());
    fused(&map.values());
}
