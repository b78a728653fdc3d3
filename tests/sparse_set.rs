use sparse_ecs::engine::sparse::SparseSet;
use sparse_ecs::engine::types::EntityId;

#[derive(Clone, Copy, PartialEq, Debug)]
struct Value(pub i32);

fn seeded(pairs: &[(EntityId, i32)]) -> SparseSet<Value> {
    let mut set = SparseSet::new();
    for &(key, value) in pairs {
        assert!(set.insert(key, Value(value)));
    }
    set
}

#[test]
fn insert_then_lookup_until_removed() {
    let mut set = seeded(&[(3, 30)]);

    assert!(set.contains(3));
    assert_eq!(set.get(3), Some(&Value(30)));
    assert_eq!(set.len(), 1);

    assert!(set.remove(3));
    assert!(!set.contains(3));
    assert_eq!(set.get(3), None);
    assert!(set.is_empty());
}

#[test]
fn reinsert_after_remove_stores_the_new_value() {
    let mut set = seeded(&[(7, 1), (9, 2)]);
    let before = set.len();

    assert!(set.remove(7));
    assert!(set.insert(7, Value(99)));

    assert_eq!(set.get(7), Some(&Value(99)));
    assert_eq!(set.len(), before);
}

#[test]
fn insert_on_occupied_key_is_a_no_op_success() {
    let mut set = seeded(&[(5, 50)]);

    assert!(set.insert(5, Value(-1)));

    // First writer wins; size unchanged.
    assert_eq!(set.get(5), Some(&Value(50)));
    assert_eq!(set.len(), 1);
}

#[test]
fn remove_of_absent_key_reports_false() {
    let mut set = seeded(&[(2, 20)]);

    assert!(!set.remove(40));
    assert!(!set.remove(3));
    assert_eq!(set.len(), 1);

    assert!(set.remove(2));
    assert!(!set.remove(2));
}

#[test]
fn swap_removal_preserves_every_other_mapping() {
    let keys: &[(EntityId, i32)] = &[(10, 100), (20, 200), (30, 300), (40, 400)];
    let mut set = seeded(keys);

    // Remove from the middle so the last element gets rewired.
    assert!(set.remove(20));

    assert_eq!(set.len(), 3);
    for &(key, value) in keys {
        if key == 20 {
            assert!(!set.contains(key));
        } else {
            assert_eq!(set.get(key), Some(&Value(value)));
        }
    }

    // The dense arrays stay parallel and gap-free.
    assert_eq!(set.keys().len(), set.elements().len());
    for (slot, &key) in set.keys().iter().enumerate() {
        let expected = keys.iter().find(|&&(k, _)| k == key).unwrap().1;
        assert_eq!(set.elements()[slot], Value(expected));
    }
}

#[test]
fn removing_the_sole_element_degenerates_cleanly() {
    let mut set = seeded(&[(11, 1)]);

    assert!(set.remove(11));
    assert!(set.is_empty());
    assert!(!set.contains(11));

    // The slot is reusable afterwards.
    assert!(set.insert(11, Value(2)));
    assert_eq!(set.get(11), Some(&Value(2)));
}

#[test]
fn get_mut_writes_through() {
    let mut set = seeded(&[(4, 0)]);

    set.get_mut(4).unwrap().0 = 77;
    assert_eq!(set.get(4), Some(&Value(77)));
    assert_eq!(set.get_mut(999), None);
}

#[test]
fn sparse_index_grows_on_demand() {
    let mut set = SparseSet::new();
    assert!(set.insert(0, Value(1)));
    assert!(set.insert(100_000, Value(2)));

    assert_eq!(set.get(100_000), Some(&Value(2)));
    assert!(!set.contains(99_999));
}

#[test]
fn clear_empties_but_keys_remain_reusable() {
    let mut set = seeded(&[(1, 10), (2, 20), (3, 30)]);

    set.clear();
    assert!(set.is_empty());
    assert!(!set.contains(2));

    assert!(set.insert(2, Value(21)));
    assert_eq!(set.get(2), Some(&Value(21)));
    assert_eq!(set.len(), 1);
}

#[test]
fn sort_by_key_restores_ascending_order() {
    let mut set = seeded(&[(30, 3), (10, 1), (50, 5), (20, 2), (40, 4)]);

    // Scramble dense order with a couple of swap-removals and re-inserts.
    assert!(set.remove(10));
    assert!(set.remove(40));
    assert!(set.insert(10, Value(1)));
    assert!(set.insert(40, Value(4)));

    set.sort_by_key();

    assert_eq!(set.keys(), &[10, 20, 30, 40, 50]);
    let values: Vec<i32> = set.elements().iter().map(|v| v.0).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5]);

    // Lookups still resolve after the reorder.
    for key in [10u32, 20, 30, 40, 50] {
        assert_eq!(set.get(key).unwrap().0, (key / 10) as i32);
    }
}

#[test]
fn elements_mut_iterates_the_packed_values() {
    let mut set = seeded(&[(6, 1), (8, 2), (12, 3)]);

    for value in set.elements_mut() {
        value.0 *= 10;
    }

    assert_eq!(set.get(6), Some(&Value(10)));
    assert_eq!(set.get(8), Some(&Value(20)));
    assert_eq!(set.get(12), Some(&Value(30)));
}

#[test]
fn byte_size_accounts_for_all_three_arrays() {
    let empty = SparseSet::<Value>::new().byte_size();
    let mut set = SparseSet::new();
    for key in 0..64u32 {
        set.insert(key, Value(key as i32));
    }
    assert!(set.byte_size() > empty);
}
