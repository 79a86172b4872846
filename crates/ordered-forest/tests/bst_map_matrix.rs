use std::panic::{catch_unwind, AssertUnwindSafe};

use ordered_forest::{BinarySearchTreeMap, Position, PositionFault, TreeError};

fn shape(map: &BinarySearchTreeMap<i32, i32>) -> String {
    fn go(map: &BinarySearchTreeMap<i32, i32>, p: Option<Position>) -> String {
        let Some(p) = p else {
            return "-".to_string();
        };
        let k = map.key(p).unwrap();
        let l = map.left(p).unwrap();
        let r = map.right(p).unwrap();
        if l.is_none() && r.is_none() {
            return k.to_string();
        }
        format!("{k}({},{})", go(map, l), go(map, r))
    }
    go(map, map.root())
}

fn build(keys: &[i32]) -> BinarySearchTreeMap<i32, i32> {
    let mut map = BinarySearchTreeMap::new();
    for &k in keys {
        assert_eq!(map.put(k, k * 10), None);
    }
    map
}

#[test]
fn bst_empty_map_matrix() {
    let mut map: BinarySearchTreeMap<i32, i32> = BinarySearchTreeMap::new();
    assert!(map.is_empty());
    assert_eq!(map.size(), 0);
    assert_eq!(map.get(&1), None);
    assert_eq!(map.remove(&1), None);
    assert_eq!(map.root(), None);
    assert_eq!(map.first(), None);
    assert_eq!(map.last(), None);
    assert_eq!(map.height(), -1);
    assert_eq!(map.entries().count(), 0);
    assert_eq!(map.to_string(), "BinarySearchTreeMap ∅");
    map.assert_valid().unwrap();
}

#[test]
fn bst_put_overwrite_matrix() {
    let mut map = build(&[5, 3, 8]);
    assert_eq!(map.put(3, 33), Some(30));
    assert_eq!(map.size(), 3);
    assert_eq!(map.get(&3), Some(&33));
    assert_eq!(shape(&map), "5(3,8)");

    *map.get_mut(&8).unwrap() += 1;
    assert_eq!(map.peek(&8), Some(&81));
    assert!(map.contains_key(&5));
    assert!(!map.contains_key(&6));
    map.assert_valid().unwrap();
}

#[test]
fn bst_removal_scenario_matrix() {
    let mut map = build(&[2, 6, 4, 9, 3, 5, 10]);
    assert_eq!(shape(&map), "2(-,6(4(3,5),9(-,10)))");

    // Root with only a right child.
    assert_eq!(map.remove(&2), Some(20));
    assert_eq!(shape(&map), "6(4(3,5),9(-,10))");

    // Only a right child.
    assert_eq!(map.remove(&9), Some(90));
    assert_eq!(shape(&map), "6(4(3,5),10)");

    // Two children: the successor's entry moves up.
    assert_eq!(map.remove(&4), Some(40));
    assert_eq!(shape(&map), "6(5(3,-),10)");

    // Only a left child.
    assert_eq!(map.remove(&5), Some(50));
    assert_eq!(shape(&map), "6(3,10)");

    assert_eq!(map.size(), 3);
    assert_eq!(map.remove(&5), None);
    assert_eq!(
        map.entries().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(),
        vec![(3, 30), (6, 60), (10, 100)]
    );
    map.assert_valid().unwrap();
}

#[test]
fn bst_introspection_matrix() {
    let map = build(&[40, 20, 60, 10, 30, 50]);
    let root = map.root().unwrap();
    assert_eq!(map.key(root), Ok(&40));
    assert_eq!(map.is_root(root), Ok(true));
    assert_eq!(map.parent(root), Ok(None));
    assert_eq!(map.sibling(root), Ok(None));
    assert_eq!(map.num_children(root), Ok(2));
    assert_eq!(
        map.children(root),
        Ok(vec![map.left(root).unwrap().unwrap(), map.right(root).unwrap().unwrap()])
    );

    let l = map.left(root).unwrap().unwrap();
    let r = map.right(root).unwrap().unwrap();
    assert_eq!(map.key(l), Ok(&20));
    assert_eq!(map.value(r), Ok(&600));
    assert_eq!(map.parent(l), Ok(Some(root)));
    assert_eq!(map.sibling(l), Ok(Some(r)));
    assert_eq!(map.sibling(r), Ok(Some(l)));
    assert_eq!(map.num_children(r), Ok(1));
    assert_eq!(map.is_internal(r), Ok(true));
    assert_eq!(map.is_root(r), Ok(false));

    let only = map.left(r).unwrap().unwrap();
    assert_eq!(map.key(only), Ok(&50));
    assert_eq!(map.sibling(only), Ok(None));
    assert_eq!(map.is_leaf(only), Ok(true));
    assert_eq!(map.children(only), Ok(vec![]));
    assert_eq!(map.children(r), Ok(vec![only]));
    assert_eq!(map.entry(only).map(|e| *e.value()), Ok(500));
}

#[test]
fn bst_traversal_positions_matrix() {
    let map = build(&[40, 20, 60, 10, 30, 50, 70]);
    let keys = |ps: Vec<Position>| -> Vec<i32> {
        ps.into_iter().map(|p| *map.key(p).unwrap()).collect()
    };
    assert_eq!(keys(map.in_order()), vec![10, 20, 30, 40, 50, 60, 70]);
    assert_eq!(keys(map.pre_order()), vec![40, 20, 10, 30, 60, 50, 70]);
    assert_eq!(keys(map.post_order()), vec![10, 30, 20, 50, 70, 60, 40]);
    assert_eq!(keys(map.level_order()), vec![40, 20, 60, 10, 30, 50, 70]);
    assert_eq!(map.height(), 2);
    assert_eq!(map.first(), Some((&10, &100)));
    assert_eq!(map.last(), Some((&70, &700)));
    assert_eq!(
        map.keys().rev().copied().collect::<Vec<_>>(),
        vec![70, 60, 50, 40, 30, 20, 10]
    );
    assert_eq!(map.values().len(), 7);
}

#[test]
fn bst_invalid_position_matrix() {
    let mut a = build(&[2, 1, 3]);
    let b = build(&[2, 1, 3]);

    let foreign = b.root().unwrap();
    assert_eq!(
        a.left(foreign),
        Err(TreeError::InvalidPosition(PositionFault::ForeignTree))
    );
    assert_eq!(
        a.validate(foreign),
        Err(TreeError::InvalidPosition(PositionFault::ForeignTree))
    );

    let one = a.left(a.root().unwrap()).unwrap().unwrap();
    assert_eq!(a.remove(&1), Some(10));
    for result in [
        a.is_leaf(one).map(|_| ()),
        a.parent(one).map(|_| ()),
        a.sibling(one).map(|_| ()),
        a.key(one).map(|_| ()),
    ] {
        assert_eq!(
            result,
            Err(TreeError::InvalidPosition(PositionFault::Removed))
        );
    }
    assert_eq!(
        TreeError::InvalidPosition(PositionFault::Removed).to_string(),
        "INVALID_POSITION: Removed"
    );
}

#[test]
fn bst_two_child_removal_moves_successor_entry_matrix() {
    let mut map = build(&[2, 1, 4, 3]);
    let two = map.root().unwrap();
    let three = map
        .in_order()
        .into_iter()
        .find(|&p| map.key(p) == Ok(&3))
        .unwrap();

    assert_eq!(map.remove(&2), Some(20));
    assert_eq!(map.key(two), Ok(&3));
    assert_eq!(
        map.key(three),
        Err(TreeError::InvalidPosition(PositionFault::Removed))
    );
    map.assert_valid().unwrap();
}

#[test]
fn bst_custom_comparator_matrix() {
    let mut map: BinarySearchTreeMap<i32, &str, _> =
        BinarySearchTreeMap::with_comparator(|a: &i32, b: &i32| b.cmp(a) as i32);
    map.put(1, "a");
    map.put(3, "c");
    map.put(2, "b");
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    assert_eq!(map.first(), Some((&3, &"c")));
    map.assert_valid().unwrap();
}

#[test]
fn bst_display_matrix() {
    let map = build(&[2, 1, 3]);
    assert_eq!(
        map.to_string(),
        "BinarySearchTreeMap\n└─ 2 = 20\n   ├─ ← 1 = 10\n   └─ → 3 = 30"
    );
    assert_eq!(format!("{map:?}"), "{1: 10, 2: 20, 3: 30}");
}

#[test]
fn bst_comparator_panic_leaves_tree_intact_matrix() {
    let mut map: BinarySearchTreeMap<i32, i32, _> =
        BinarySearchTreeMap::with_comparator(|a: &i32, b: &i32| {
            if *a == 13 || *b == 13 {
                panic!("unlucky key");
            }
            a.cmp(b) as i32
        });
    for k in [10, 5, 20] {
        map.put(k, k * 10);
    }
    let before = map.to_string();

    assert!(catch_unwind(AssertUnwindSafe(|| map.put(13, 130))).is_err());
    assert!(catch_unwind(AssertUnwindSafe(|| map.get(&13).copied())).is_err());
    assert!(catch_unwind(AssertUnwindSafe(|| map.remove(&13))).is_err());

    assert_eq!(map.size(), 3);
    assert_eq!(map.to_string(), before);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![5, 10, 20]);
    map.assert_valid().unwrap();
    assert_eq!(map.put(15, 150), None);
    assert_eq!(map.size(), 4);
}

#[test]
fn bst_ascending_chain_matrix() {
    let n = 3_000;
    let map: BinarySearchTreeMap<i32, i32> = (0..n).map(|k| (k, k)).collect();
    assert_eq!(map.height(), n - 1);
    map.assert_valid().unwrap();

    let out = map.to_string();
    assert_eq!(out.lines().count(), 2 * n as usize);
    assert!(out.ends_with(&format!("└─ → {} = {}", n - 1, n - 1)));
}
