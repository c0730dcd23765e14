//! Axis-aligned bounding box with double precision for large models.

use glam::DVec3;

/// Double-precision axis-aligned bounding box.
///
/// Used for object extents coming from the object source, for the world
/// span of an oriented box, and for the overlap region reported by the
/// collision oracle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisAlignedBox {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl AxisAlignedBox {
  /// Create a new box from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.cmple(max).all(),
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a box from two arbitrary opposite corners, swapping components
  /// so that `min <= max` holds.
  pub fn normalized(a: DVec3, b: DVec3) -> Self {
    Self {
      min: a.min(b),
      max: a.max(b),
    }
  }

  /// Create a new box from center and half-extents.
  pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Smallest box enclosing both boxes.
  #[inline]
  pub fn union(&self, other: &AxisAlignedBox) -> Self {
    Self {
      min: self.min.min(other.min),
      max: self.max.max(other.max),
    }
  }

  /// Overlap region of two boxes, or `None` when they are disjoint.
  ///
  /// Boxes that only touch produce a degenerate (zero-volume) region.
  pub fn intersection(&self, other: &AxisAlignedBox) -> Option<Self> {
    let min = self.min.max(other.min);
    let max = self.max.min(other.max);
    if min.cmpgt(max).any() {
      return None;
    }
    Some(Self { min, max })
  }

  /// Check if this box contains a point (boundary inclusive).
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.cmpge(self.min).all() && point.cmple(self.max).all()
  }

  /// Get the size of the box (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the half-extents of the box.
  #[inline]
  pub fn half_extents(&self) -> DVec3 {
    self.size() * 0.5
  }

  /// Get the center of the box.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Enclosed volume.
  #[inline]
  pub fn volume(&self) -> f64 {
    let size = self.size();
    size.x * size.y * size.z
  }
}
