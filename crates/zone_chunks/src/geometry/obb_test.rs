use approx::assert_relative_eq;

use super::*;

fn unit_cube() -> OrientedBox {
  OrientedBox::axis_aligned(7, DVec3::ZERO, DVec3::ONE)
}

#[test]
fn test_contains_is_inclusive() {
  let obb = unit_cube();
  assert!(obb.contains(DVec3::ZERO));
  assert!(obb.contains(DVec3::new(1.0, 0.0, 0.0)));
  assert!(obb.contains(DVec3::splat(-1.0)));
  assert!(!obb.contains(DVec3::new(1.0 + 1e-9, 0.0, 0.0)));
}

#[test]
fn test_corners_are_sign_combinations() {
  let obb = OrientedBox::axis_aligned(0, DVec3::new(10.0, 0.0, 0.0), DVec3::new(1.0, 2.0, 3.0));
  let corners = obb.corners();
  assert_eq!(corners[0], DVec3::new(9.0, -2.0, -3.0));
  assert_eq!(corners[1], DVec3::new(9.0, -2.0, 3.0));
  assert_eq!(corners[7], DVec3::new(11.0, 2.0, 3.0));

  for corner in corners {
    assert!(obb.contains(corner));
  }
}

#[test]
fn test_to_aabb_of_rotated_box() {
  let bounds = AxisAlignedBox::new(DVec3::new(-2.0, -1.0, 0.0), DVec3::new(2.0, 1.0, 4.0));
  let obb = OrientedBox::from_aabb_rotated_z(&bounds, 90.0, 0);
  let aabb = obb.to_aabb();

  assert_relative_eq!(aabb.min.x, -1.0, epsilon = 1e-12);
  assert_relative_eq!(aabb.max.x, 1.0, epsilon = 1e-12);
  assert_relative_eq!(aabb.min.y, -2.0, epsilon = 1e-12);
  assert_relative_eq!(aabb.max.y, 2.0, epsilon = 1e-12);
  assert_relative_eq!(aabb.min.z, 0.0, epsilon = 1e-12);
  assert_relative_eq!(aabb.max.z, 4.0, epsilon = 1e-12);
}

#[test]
fn test_rotated_axes() {
  let bounds = AxisAlignedBox::new(DVec3::ZERO, DVec3::splat(2.0));
  let obb = OrientedBox::from_aabb_rotated_z(&bounds, 30.0, 3);
  let [x, y, z] = *obb.axes();

  assert_relative_eq!(x.x, 30f64.to_radians().cos(), epsilon = 1e-12);
  assert_relative_eq!(x.y, 30f64.to_radians().sin(), epsilon = 1e-12);
  assert_relative_eq!(y.x, -30f64.to_radians().sin(), epsilon = 1e-12);
  assert_eq!(z, DVec3::Z);
  assert_eq!(obb.center, DVec3::ONE);
  assert_eq!(obb.extents, DVec3::ONE);
  assert_eq!(obb.id, 3);
}

#[test]
fn test_new_validates_axes() {
  let skewed = [DVec3::X, DVec3::new(1.0, 1.0, 0.0).normalize(), DVec3::Z];
  assert!(matches!(
    OrientedBox::new(0, DVec3::ZERO, skewed, DVec3::ONE),
    Err(ChunkError::NonOrthonormalAxes(_))
  ));

  let scaled = [DVec3::X * 2.0, DVec3::Y, DVec3::Z];
  assert!(OrientedBox::new(0, DVec3::ZERO, scaled, DVec3::ONE).is_err());

  assert!(OrientedBox::new(0, DVec3::ZERO, [DVec3::X, DVec3::Y, DVec3::Z], DVec3::ONE).is_ok());
}

#[test]
fn test_new_rejects_negative_extent() {
  assert_eq!(
    OrientedBox::new(0, DVec3::ZERO, [DVec3::X, DVec3::Y, DVec3::Z], DVec3::new(1.0, -1.0, 1.0)),
    Err(ChunkError::NegativeExtent(DVec3::new(1.0, -1.0, 1.0)))
  );
}

#[test]
fn test_contains_box() {
  let zone = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::splat(5.0));
  let inside = OrientedBox::axis_aligned(1, DVec3::splat(2.0), DVec3::ONE);
  let straddling = OrientedBox::axis_aligned(2, DVec3::splat(4.5), DVec3::ONE);

  assert!(zone.contains_box(&inside));
  assert!(!zone.contains_box(&straddling));
  assert!(zone.contains_box(&zone));
}

#[test]
fn test_local_offset_roundtrip() {
  let bounds = AxisAlignedBox::new(DVec3::new(-3.0, -1.0, 0.0), DVec3::new(5.0, 7.0, 2.0));
  let obb = OrientedBox::from_aabb_rotated_z(&bounds, 17.0, 0);
  let p = DVec3::new(1.5, -2.0, 0.25);
  let back = obb.to_world(obb.local_offset(p));
  assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
  assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
  assert_relative_eq!(back.z, p.z, epsilon = 1e-12);
}

#[test]
fn test_degenerate_contains_only_its_plane() {
  let flat = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::new(1.0, 1.0, 0.0));
  assert!(flat.is_degenerate());
  assert!(flat.contains(DVec3::new(0.5, 0.5, 0.0)));
  assert!(!flat.contains(DVec3::new(0.5, 0.5, 0.1)));
  assert_eq!(flat.volume(), 0.0);
}

#[test]
fn test_volume() {
  let obb = OrientedBox::axis_aligned(0, DVec3::splat(1.0), DVec3::new(1.0, 2.0, 3.0));
  assert_eq!(obb.volume(), 48.0);
}
