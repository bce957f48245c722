use rbtree_arena::{
    Descending, Error, Identity, RedBlackTree, Result, TreeMap, TreeSet,
};
use rstest::{fixture, rstest};
use test_utils::{install_logger, random_with_duplicates, shuffled};

#[fixture]
fn words() -> Vec<&'static str> {
    install_logger();
    "the quick brown fox jumps over the lazy dog the end"
        .split(' ')
        .collect()
}

#[rstest]
fn word_count(words: Vec<&'static str>) -> Result<()> {
    let mut counts: TreeMap<&str, usize> = TreeMap::new();
    for &word in &words {
        *counts.get_or_insert_with(word, || 0)? += 1;
    }

    assert_eq!(counts[&"the"], 3);
    assert_eq!(counts.get(&"fox"), Some(&1));
    assert_eq!(counts.get(&"cat"), None);
    assert_eq!(
        counts.keys().copied().collect::<Vec<_>>(),
        vec![
            "brown", "dog", "end", "fox", "jumps", "lazy", "over", "quick",
            "the"
        ]
    );
    assert_eq!(counts.values().sum::<usize>(), words.len());
    counts.as_tree().check()?;
    Ok(())
}

#[rstest]
fn insert_keeps_existing_value() -> Result<()> {
    let mut map = TreeMap::<u32, &str>::new();
    assert!(map.insert(1, "one")?);
    assert!(!map.insert(1, "uno")?);
    assert_eq!(map[&1], "one");

    assert_eq!(map.insert_or_assign(1, "uno")?, Some("one"));
    assert_eq!(map.insert_or_assign(2, "dos")?, None);
    assert_eq!(map[&1], "uno");
    assert_eq!(map.len(), 2);
    Ok(())
}

#[rstest]
#[should_panic(expected = "key not found")]
fn index_missing_key_panics() {
    let map: TreeMap<u32, u32> = (0..4).map(|i| (i, i)).collect();
    let _ = map[&10];
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn map_matches_model(#[case] seed: u64) -> Result<()> {
    install_logger();
    let mut map = TreeMap::new();
    let mut model = std::collections::BTreeMap::new();

    let keys = random_with_duplicates(500, 100, seed);
    for (i, key) in keys.into_iter().enumerate() {
        if i % 3 == 0 {
            assert_eq!(map.remove(&key), model.remove(&key));
        } else {
            assert_eq!(map.insert_or_assign(key, i)?, model.insert(key, i));
        }
        map.as_tree().check()?;
    }

    assert!(map.iter().eq(model.iter()));
    assert_eq!(map.first_key_value(), model.first_key_value());
    assert_eq!(map.last_key_value(), model.last_key_value());
    assert!(map.range(&20, &60).eq(model.range(20..60)));
    Ok(())
}

#[rstest]
fn swap_and_clear() -> Result<()> {
    install_logger();
    let mut a: TreeMap<u32, String> =
        (0..3).map(|i| (i, i.to_string())).collect();
    let mut b = TreeMap::new();
    b.insert(10, "ten".to_string())?;

    a.swap(&mut b);
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 3);
    assert_eq!(b.get(&2).map(String::as_str), Some("2"));

    b.clear();
    assert!(b.is_empty());
    assert_eq!(b.as_tree().pooled(), 3);
    b.extend([(7, "seven".to_string())]);
    assert_eq!(b.as_tree().allocated(), 3);
    Ok(())
}

#[rstest]
fn set_with_descending_order() -> Result<()> {
    install_logger();
    let mut set = TreeSet::with_comparator(Descending);
    for key in shuffled(20, 42) {
        assert!(set.insert(key)?);
    }
    assert!(set.iter().copied().eq((0..20).rev()));
    assert_eq!(set.range(&15, &10).count(), 5);
    assert_eq!(set.range(&10, &15).count(), 0);

    let cursor = set.as_tree().find(&3);
    let mut other = set.clone();
    assert!(other.remove(&3));
    assert_eq!(set.as_tree().get(cursor), Some(&3));
    assert!(other < set);
    Ok(())
}

#[rstest]
fn erasing_the_end_cursor_fails() -> Result<()> {
    install_logger();
    let mut tree = RedBlackTree::<u32, Identity>::new();
    tree.insert(1)?;
    let end = tree.end();
    assert!(matches!(tree.remove(end), Err(Error::EndCursor)));
    assert_eq!(tree.len(), 1);
    Ok(())
}
