use std::collections::BTreeSet;

use approx::assert_relative_eq;
use proptest::prelude::*;

use super::*;
use crate::geometry::AxisAlignedBox;
use crate::partition::partition;

fn cube(size: f64) -> OrientedBox {
  OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::splat(size * 0.5))
}

fn assert_leaves_once(tree: &ChunkNode, leaves: &[OrientedBox]) {
  let mut found: Vec<ChunkId> = tree.leaves().map(|b| b.id).collect();
  found.sort_unstable();
  let mut expected: Vec<ChunkId> = leaves.iter().map(|b| b.id).collect();
  expected.sort_unstable();
  assert_eq!(found, expected);
}

#[test]
fn test_empty_input_is_an_error() {
  assert_eq!(build_tree(Vec::new()), Err(ChunkError::EmptyLeafSet));
}

#[test]
fn test_single_leaf_is_the_root() {
  let leaf = cube(4.0).with_id(3);
  let tree = build_tree(vec![leaf]).unwrap();
  assert!(tree.is_leaf());
  assert_eq!(tree.bounds, leaf);
}

#[test]
fn test_eight_leaves_merge_into_one_parent() {
  let leaves = partition(&cube(10.0), DVec3::splat(5.0)).unwrap();
  let tree = build_tree(leaves.clone()).unwrap();

  assert_eq!(tree.id(), 8);
  assert_eq!(tree.children.len(), 8);
  let child_ids: Vec<_> = tree.children.iter().map(ChunkNode::id).collect();
  assert_eq!(child_ids, (0..8).collect::<Vec<_>>());
  assert_relative_eq!(tree.bounds.extents.x, 5.0);
  assert_relative_eq!(tree.bounds.center.length(), 0.0);
  assert_leaves_once(&tree, &leaves);
}

#[test]
fn test_two_levels() {
  let leaves = partition(&cube(10.0), DVec3::splat(2.5)).unwrap();
  assert_eq!(leaves.len(), 64);

  let tree = build_tree(leaves.clone()).unwrap();
  assert_eq!(tree.depth(), 2);
  assert_eq!(tree.node_count(), 64 + 8 + 1);
  assert_eq!(tree.id(), 72);

  let parent_ids: BTreeSet<_> = tree.children.iter().map(ChunkNode::id).collect();
  assert_eq!(parent_ids, (64..72).collect());
  assert_leaves_once(&tree, &leaves);
}

#[test]
fn test_scattered_leaves_still_get_one_root() {
  let leaves = vec![
    OrientedBox::axis_aligned(5, DVec3::ZERO, DVec3::ONE),
    OrientedBox::axis_aligned(9, DVec3::splat(100.0), DVec3::ONE),
  ];
  let tree = build_tree(leaves.clone()).unwrap();
  assert_eq!(tree.id(), 10);
  assert_eq!(tree.leaf_count(), 2);
  assert!(tree.bounds.contains(DVec3::ZERO));
  assert!(tree.bounds.contains(DVec3::splat(100.0)));
  assert_leaves_once(&tree, &leaves);
}

#[test]
fn test_parents_keep_first_child_axes() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::new(40.0, 40.0, 10.0));
  let root = OrientedBox::from_aabb_rotated_z(&bounds, 30.0, 0);
  let leaves = partition(&root, DVec3::splat(10.0)).unwrap();
  let tree = build_tree(leaves.clone()).unwrap();

  for node in tree.iter() {
    assert_eq!(node.bounds.axes(), root.axes());
  }
  assert_relative_eq!(tree.bounds.extents.x, 20.0, epsilon = 1e-9);
  assert_relative_eq!(tree.bounds.extents.y, 20.0, epsilon = 1e-9);
  assert_leaves_once(&tree, &leaves);
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(48))]

  #[test]
  fn prop_one_root_every_leaf_once(
    ext in (2.0f64..30.0, 2.0f64..30.0, 2.0f64..10.0),
    size in (2.0f64..10.0, 2.0f64..10.0, 2.0f64..10.0),
    angle in 0.0f64..90.0,
    samples in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0), 1..8),
  ) {
    let bounds = AxisAlignedBox::from_center_half_extents(DVec3::ZERO, DVec3::new(ext.0, ext.1, ext.2));
    let root = OrientedBox::from_aabb_rotated_z(&bounds, angle, 0);
    let leaves = partition(&root, DVec3::new(size.0, size.1, size.2)).unwrap();
    let tree = build_tree(leaves.clone()).unwrap();

    let mut found: Vec<ChunkId> = tree.leaves().map(|b| b.id).collect();
    found.sort_unstable();
    prop_assert_eq!(found, (0..leaves.len() as ChunkId).collect::<Vec<_>>());

    let ids: BTreeSet<ChunkId> = tree.iter().map(ChunkNode::id).collect();
    prop_assert_eq!(ids.len(), tree.node_count());

    for (x, y, z) in samples {
      let p = root.to_world(DVec3::new(x, y, z) * root.extents * 0.999);
      prop_assert!(tree.find_leaf(p).is_some());
    }
  }
}
