//! Integration tests for delete by merging and delete by copying

use rstest::rstest;

use coursetree::domain::{DeleteStrategy, OrderedTree};
use coursetree::util::testing;

fn build(values: &[i32]) -> OrderedTree<i32> {
    values.iter().copied().collect()
}

fn in_order(tree: &OrderedTree<i32>) -> Vec<i32> {
    tree.in_order().copied().collect()
}

#[rstest]
#[case(DeleteStrategy::Merging)]
#[case(DeleteStrategy::Copying)]
fn given_each_key_when_deleting_then_only_that_key_disappears(#[case] strategy: DeleteStrategy) {
    testing::init_test_setup();
    let shapes: [&[i32]; 4] = [
        &[50, 30, 70, 20, 40, 60, 80, 35, 45, 65],
        &[1, 2, 3, 4, 5],
        &[5, 4, 3, 2, 1],
        &[8, 3, 10, 1, 6, 14, 4, 7, 13],
    ];

    for shape in shapes {
        let mut sorted = shape.to_vec();
        sorted.sort_unstable();

        for &key in shape {
            // Arrange
            let mut tree = build(shape);

            // Act
            let removed = tree.delete(&key, strategy);

            // Assert
            assert_eq!(removed, Some(key), "{strategy} {key} from {shape:?}");
            let expected: Vec<i32> = sorted.iter().copied().filter(|&k| k != key).collect();
            assert_eq!(in_order(&tree), expected, "{strategy} {key} from {shape:?}");
            assert!(!tree.contains(&key));
            assert_eq!(tree.len(), shape.len() - 1);
        }
    }
}

#[rstest]
#[case(DeleteStrategy::Merging)]
#[case(DeleteStrategy::Copying)]
fn given_absent_key_when_deleting_then_tree_is_unchanged(#[case] strategy: DeleteStrategy) {
    let mut tree = build(&[50, 30, 70, 20, 40]);
    let before = tree.clone();

    assert_eq!(tree.delete(&45, strategy), None);
    assert_eq!(tree, before);

    let mut empty = OrderedTree::<i32>::new();
    assert_eq!(empty.delete(&1, strategy), None);
    assert!(empty.is_empty());
}

#[test]
fn given_three_node_tree_when_merging_out_root_then_two_nodes_remain() {
    let mut tree = build(&[5, 3, 8]);

    assert_eq!(tree.delete(&5, DeleteStrategy::Merging), Some(5));

    assert_eq!(tree.len(), 2);
    assert_eq!(in_order(&tree), vec![3, 8]);
    assert_eq!(tree.root().map(|n| *n.value()), Some(3));
}

#[rstest]
#[case(DeleteStrategy::Merging)]
#[case(DeleteStrategy::Copying)]
fn given_deep_key_off_the_root_path_when_deleting_then_that_node_is_removed(
    #[case] strategy: DeleteStrategy,
) {
    // 45 sits below 30 -> 40, far from any comparison against the root alone
    let mut tree = build(&[50, 30, 70, 20, 40, 35, 45, 44]);

    assert_eq!(tree.delete(&45, strategy), Some(45));

    assert_eq!(in_order(&tree), vec![20, 30, 35, 40, 44, 50, 70]);
    assert_eq!(tree.parent_of(&44).map(|n| *n.value()), Some(40));
    assert_eq!(tree.root().map(|n| *n.value()), Some(50));
}

#[test]
fn given_two_children_when_copying_then_node_position_is_kept() {
    let mut tree = build(&[50, 30, 70, 20, 40, 60, 80]);

    tree.delete(&30, DeleteStrategy::Copying);

    // 20 is the largest key left of 30 and takes its place below the root
    let root = tree.root().unwrap();
    let left = root.left().unwrap();
    assert_eq!(*left.value(), 20);
    assert!(left.left().is_none());
    assert_eq!(left.right().map(|n| *n.value()), Some(40));
}

#[test]
fn given_two_children_when_merging_then_left_child_takes_place() {
    let mut tree = build(&[50, 30, 70, 20, 40, 60, 80]);

    tree.delete(&70, DeleteStrategy::Merging);

    // 60 replaces 70, and 80 hangs off the rightmost node of 60's subtree
    let right = tree.root().unwrap().right().unwrap();
    assert_eq!(*right.value(), 60);
    assert_eq!(right.right().map(|n| *n.value()), Some(80));
}

#[test]
fn given_only_node_when_deleting_then_tree_becomes_empty() {
    for strategy in [DeleteStrategy::Merging, DeleteStrategy::Copying] {
        let mut tree = build(&[1]);
        assert_eq!(tree.delete(&1, strategy), Some(1));
        assert!(tree.is_empty());
    }
}
