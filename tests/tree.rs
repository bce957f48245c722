use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rbtree_arena::{Descending, Identity, RedBlackTree, Result};
use rstest::{fixture, rstest};
use test_utils::{
    ascending, descending, install_logger, random_with_duplicates, shuffled,
};

type Tree = RedBlackTree<u32, Identity>;

#[fixture]
fn tree() -> Tree {
    install_logger();
    Tree::new()
}

fn sorted_unique(keys: &[u32]) -> Vec<u32> {
    let mut expected = keys.to_vec();
    expected.sort();
    expected.dedup();
    expected
}

#[rstest]
fn insert_in_order_example(mut tree: Tree) -> Result<()> {
    for key in [10, 20, 5, 15, 25, 3, 8] {
        tree.insert(key)?;
        tree.check()?;
    }
    assert_eq!(
        tree.iter().copied().collect::<Vec<_>>(),
        vec![3, 5, 8, 10, 15, 20, 25]
    );
    assert_eq!(
        tree.iter().rev().copied().collect::<Vec<_>>(),
        vec![25, 20, 15, 10, 8, 5, 3]
    );

    let ten = tree.find(&10);
    assert_eq!(tree.remove(ten)?, 10);
    tree.check()?;
    assert_eq!(
        tree.iter().copied().collect::<Vec<_>>(),
        vec![3, 5, 8, 15, 20, 25]
    );

    assert_eq!(tree.remove_key(&42), 0);
    assert_eq!(tree.len(), 6);
    Ok(())
}

#[rstest]
fn swap_example(mut tree: Tree) -> Result<()> {
    tree.try_extend([1, 2, 3])?;
    let mut other = Tree::new();
    other.try_extend([100, 200])?;
    let first = tree.begin();

    tree.swap(&mut other);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![100, 200]);
    assert_eq!(other.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(other.get(first), Some(&1));
    assert_eq!(other.begin(), first);
    tree.check()?;
    other.check()?;
    Ok(())
}

#[rstest]
#[case::ascending(ascending(512))]
#[case::descending(descending(512))]
#[case::shuffled(shuffled(512, 7))]
#[case::shuffled_other_seed(shuffled(1000, 1234))]
#[case::duplicates(random_with_duplicates(1000, 200, 99))]
fn insert_then_erase_everything(
    mut tree: Tree,
    #[case] keys: Vec<u32>,
) -> Result<()> {
    let expected = sorted_unique(&keys);
    for key in &keys {
        tree.insert(*key)?;
        tree.check()?;
    }
    assert_eq!(tree.len(), expected.len());
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);

    // n >= 2^bh - 1 for any red-black tree.
    let black_height = tree.check()?;
    let bits = (usize::BITS - expected.len().leading_zeros()) as usize;
    assert!(black_height <= bits);

    let mut erase_order = expected.clone();
    erase_order.shuffle(&mut StdRng::seed_from_u64(keys.len() as u64));
    for key in &erase_order {
        assert_eq!(tree.remove_key(key), 1);
        tree.check()?;
    }

    assert!(tree.is_empty());
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.allocated(), tree.pooled());
    Ok(())
}

#[rstest]
fn duplicate_insert_is_idempotent(mut tree: Tree) -> Result<()> {
    tree.try_extend(shuffled(64, 3))?;
    let before: Vec<u32> = tree.iter().copied().collect();

    for key in shuffled(64, 4) {
        let (cursor, inserted) = tree.insert(key)?;
        assert!(!inserted);
        assert_eq!(tree.get(cursor), Some(&key));
    }
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
    assert_eq!(tree.allocated(), 64);
    tree.check()?;
    Ok(())
}

#[rstest]
fn bounds_agree_with_sorted_vec(mut tree: Tree) -> Result<()> {
    let keys: Vec<u32> =
        shuffled(200, 11).into_iter().map(|k| k * 3).collect();
    tree.try_extend(keys.iter().copied())?;
    let sorted = sorted_unique(&keys);

    for probe in 0..610 {
        let lower = sorted.partition_point(|k| *k < probe);
        let upper = sorted.partition_point(|k| *k <= probe);
        assert_eq!(tree.get(tree.lower_bound(&probe)), sorted.get(lower));
        assert_eq!(tree.get(tree.upper_bound(&probe)), sorted.get(upper));
        assert_eq!(tree.contains(&probe), lower != upper);
        assert_eq!(tree.count(&probe), upper - lower);
    }
    Ok(())
}

#[rstest]
fn random_operations_stay_balanced(mut tree: Tree) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2023);
    let mut model = std::collections::BTreeSet::new();

    for _ in 0..4000 {
        let key = rng.gen_range(0..300);
        match rng.gen_range(0..4) {
            0 | 1 => {
                let (_, inserted) = tree.insert(key)?;
                assert_eq!(inserted, model.insert(key));
            }
            2 => {
                let hint = tree.lower_bound(&key);
                tree.insert_hint(hint, key)?;
                model.insert(key);
            }
            _ => {
                let removed = usize::from(model.remove(&key));
                assert_eq!(tree.remove_key(&key), removed);
            }
        }
        tree.check()?;
    }

    assert_eq!(tree.hint_misses(), 0);
    assert!(tree.iter().eq(model.iter()));
    assert_eq!(tree.allocated() - tree.pooled(), model.len());
    Ok(())
}

#[rstest]
fn churn_reuses_pooled_nodes(mut tree: Tree) -> Result<()> {
    tree.try_extend(0..128)?;
    for round in 0..8 {
        let first = tree.begin();
        let last = tree.lower_bound(&64);
        assert_eq!(tree.remove_range(first, last)?, 64);
        tree.check()?;
        assert_eq!(tree.try_extend(0..64)?, 64);
        assert_eq!(tree.remove_key(&(64 + round)), 1);
        tree.insert(64 + round)?;
        tree.check()?;
    }
    assert_eq!(tree.allocated(), 128);
    Ok(())
}

#[rstest]
fn clone_is_independent(mut tree: Tree) -> Result<()> {
    tree.try_extend(shuffled(100, 5))?;
    let copy = tree.clone();
    let mut copy_from = Tree::new();
    copy_from.clone_from(&tree);

    tree.clear();
    assert_eq!(copy.len(), 100);
    assert_eq!(copy, copy_from);
    assert!(copy.iter().copied().eq(0..100));
    copy.check()?;

    let empty = tree.try_clone()?;
    assert!(empty.is_empty());
    empty.check()?;
    Ok(())
}

#[rstest]
fn descending_comparator_reverses_order() -> Result<()> {
    install_logger();
    let mut tree: RedBlackTree<u32, Identity, Descending> =
        RedBlackTree::new();
    tree.try_extend(shuffled(50, 8))?;
    tree.check()?;
    assert!(tree.iter().copied().eq((0..50).rev()));
    assert_eq!(tree.get(tree.lower_bound(&10)), Some(&10));
    assert_eq!(tree.get(tree.upper_bound(&10)), Some(&9));
    Ok(())
}

#[rstest]
fn into_iter_yields_sorted_values(mut tree: Tree) -> Result<()> {
    tree.try_extend(shuffled(30, 6))?;
    assert!(tree.clone().into_iter().eq(0..30));
    assert!(tree.into_iter().rev().eq((0..30).rev()));
    Ok(())
}
