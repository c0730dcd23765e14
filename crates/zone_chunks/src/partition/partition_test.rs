use approx::assert_relative_eq;
use proptest::prelude::*;

use super::*;

fn cube(size: f64) -> OrientedBox {
  OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::splat(size * 0.5))
}

#[test]
fn test_cell_equal_to_root_gives_one_leaf() {
  let root = cube(10.0);
  let cells = partition(&root, DVec3::splat(10.0)).unwrap();
  assert_eq!(cells.len(), 1);
  assert_eq!(cells[0], root);
}

#[test]
fn test_halving_gives_eight_leaves() {
  let cells = partition(&cube(10.0), DVec3::splat(5.0)).unwrap();
  assert_eq!(cells.len(), 8);
  for (expected_id, cell) in cells.iter().enumerate() {
    assert_eq!(cell.id, expected_id as ChunkId);
    assert_eq!(cell.extents, DVec3::splat(2.5));
  }
  // k innermost, i outermost
  assert_eq!(cells[0].center, DVec3::splat(-2.5));
  assert_eq!(cells[1].center, DVec3::new(-2.5, -2.5, 2.5));
  assert_eq!(cells[4].center, DVec3::new(2.5, -2.5, -2.5));
  assert_eq!(cells[7].center, DVec3::splat(2.5));
}

#[test]
fn test_boundary_cells_are_clipped() {
  // Span 20 along X with size 6: cells [0,6) [6,12) [12,18) [18,20].
  let root = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::new(10.0, 1.0, 1.0));
  let cells = partition(&root, DVec3::new(6.0, 2.0, 2.0)).unwrap();
  assert_eq!(cells.len(), 4);

  let last = cells[3];
  assert_relative_eq!(last.extents.x, 1.0);
  assert_relative_eq!(last.center.x, 9.0);
  for cell in &cells {
    assert!(root.contains_box(cell));
  }
}

#[test]
fn test_rotated_root_cells_inherit_axes() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::new(40.0, 20.0, 10.0));
  let root = OrientedBox::from_aabb_rotated_z(&bounds, 30.0, 0);
  let cells = partition(&root, DVec3::splat(10.0)).unwrap();
  assert_eq!(cells.len(), 4 * 2);
  for cell in &cells {
    assert_eq!(cell.axes(), root.axes());
  }
}

#[test]
fn test_invalid_cell_size() {
  let root = cube(10.0);
  assert!(matches!(
    partition(&root, DVec3::new(1.0, 0.0, 1.0)),
    Err(ChunkError::InvalidCellSize(_))
  ));
  assert!(partition(&root, DVec3::new(1.0, -1.0, 1.0)).is_err());
  assert!(partition(&root, DVec3::new(f64::NAN, 1.0, 1.0)).is_err());
}

#[test]
fn test_degenerate_root_yields_no_cells() {
  let flat = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::new(5.0, 5.0, 0.0));
  assert!(partition(&flat, DVec3::ONE).unwrap().is_empty());
}

#[test]
fn test_oversized_grid_is_rejected() {
  let root = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::splat(5000.0));
  assert!(matches!(
    partition(&root, DVec3::splat(1e-4)),
    Err(ChunkError::TooManyCells { .. })
  ));

  // 65536 * 65536 * 1 cells fit in usize but not in a chunk id.
  let slab = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::new(32768.0, 32768.0, 0.5));
  assert_eq!(
    partition(&slab, DVec3::ONE),
    Err(ChunkError::TooManyCells {
      x: 65536,
      y: 65536,
      z: 1,
      limit: MAX_GRID_CELLS,
    })
  );
}

#[test]
fn test_divide_bounds() {
  let bounds = AxisAlignedBox::normalized(DVec3::splat(4.0), DVec3::ZERO);
  let boxes = divide_bounds(&bounds, 2, 1, 2).unwrap();
  assert_eq!(boxes.len(), 4);
  assert_eq!(boxes[0].id, 0);
  assert_eq!(boxes[0].bounds, AxisAlignedBox::new(DVec3::ZERO, DVec3::new(2.0, 4.0, 2.0)));
  assert_eq!(boxes[1].bounds.min, DVec3::new(0.0, 0.0, 2.0));
  assert_eq!(boxes[3].bounds.max, DVec3::splat(4.0));
  assert!(boxes[3].contains(DVec3::splat(3.0)));
}

#[test]
fn test_divide_bounds_rejects_zero() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::ONE);
  assert_eq!(
    divide_bounds(&bounds, 1, 0, 1),
    Err(ChunkError::InvalidDivisions { x: 1, y: 0, z: 1 })
  );
}

#[test]
fn test_divide_bounds_ids_wrap() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::splat(10.0));
  let boxes = divide_bounds(&bounds, 300, 1, 1).unwrap();
  assert_eq!(boxes.len(), 300);
  assert_eq!(boxes[256].id, 0);
  assert_eq!(boxes[299].id, 43);
}

#[test]
fn test_divide_bounds_rejects_oversized_grid() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::ONE);
  assert!(matches!(
    divide_bounds(&bounds, u32::MAX, u32::MAX, u32::MAX),
    Err(ChunkError::TooManyCells { .. })
  ));
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(64))]

  #[test]
  fn prop_cells_cover_root_and_stay_inside(
    ext in (1.0f64..20.0, 1.0f64..20.0, 1.0f64..20.0),
    size in (2.0f64..20.0, 2.0f64..20.0, 2.0f64..20.0),
    angle in 0.0f64..360.0,
    samples in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0), 1..16),
  ) {
    let extents = DVec3::new(ext.0, ext.1, ext.2);
    let bounds = AxisAlignedBox::from_center_half_extents(DVec3::new(3.0, -7.0, 1.0), extents);
    let root = OrientedBox::from_aabb_rotated_z(&bounds, angle, 0);
    let cells = partition(&root, DVec3::new(size.0, size.1, size.2)).unwrap();

    let tolerance = 1e-9;
    for cell in &cells {
      for corner in cell.corners() {
        let local = root.local_offset(corner).abs();
        prop_assert!(local.cmple(root.extents + tolerance).all());
      }
    }

    for (x, y, z) in samples {
      let p = root.to_world(DVec3::new(x, y, z) * root.extents * 0.999);
      prop_assert!(cells.iter().any(|cell| cell.contains(p)));
    }
  }
}
