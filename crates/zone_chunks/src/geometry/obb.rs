//! Oriented bounding box: the shape of every chunk, zone and object volume.

use glam::DVec3;

use super::AxisAlignedBox;
use crate::constants::ORTHONORMAL_TOLERANCE;
use crate::error::{ChunkError, ChunkResult};
use crate::types::ChunkId;

/// Sign pattern of the 8 corners, X outermost, Z innermost.
const CORNER_SIGNS: [[f64; 3]; 8] = [
  [-1.0, -1.0, -1.0],
  [-1.0, -1.0, 1.0],
  [-1.0, 1.0, -1.0],
  [-1.0, 1.0, 1.0],
  [1.0, -1.0, -1.0],
  [1.0, -1.0, 1.0],
  [1.0, 1.0, -1.0],
  [1.0, 1.0, 1.0],
];

/// Oriented bounding box with an integer id.
///
/// `extents` are half-widths along the three axes. The axes are private:
/// [`OrientedBox::new`] validates them, the rotation constructors build them,
/// and decoded records are taken as written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientedBox {
  /// Chunk id (sequential for leaves, increasing for merged parents).
  pub id: ChunkId,
  /// World-space center.
  pub center: DVec3,
  axes: [DVec3; 3],
  /// Half-widths along each axis.
  pub extents: DVec3,
}

impl OrientedBox {
  /// Create a box from arbitrary axes, validating orthonormality and
  /// non-negative extents.
  pub fn new(id: ChunkId, center: DVec3, axes: [DVec3; 3], extents: DVec3) -> ChunkResult<Self> {
    if !extents.cmpge(DVec3::ZERO).all() {
      return Err(ChunkError::NegativeExtent(extents));
    }
    if !is_orthonormal(&axes) {
      return Err(ChunkError::NonOrthonormalAxes(axes));
    }
    Ok(Self {
      id,
      center,
      axes,
      extents,
    })
  }

  /// World-aligned box.
  pub fn axis_aligned(id: ChunkId, center: DVec3, extents: DVec3) -> Self {
    Self::from_trusted_parts(id, center, [DVec3::X, DVec3::Y, DVec3::Z], extents)
  }

  /// World-aligned box covering an axis-aligned box.
  pub fn from_aabb(bounds: &AxisAlignedBox, id: ChunkId) -> Self {
    Self::axis_aligned(id, bounds.center(), bounds.half_extents())
  }

  /// Box with the center and half-extents of `bounds`, rotated by
  /// `angle_degrees` about the world Z axis.
  ///
  /// This is the rotation-correction constructor: the model is assumed to be
  /// laid out along a grid rotated in plan, so the extents are kept and only
  /// the X/Y axes turn.
  pub fn from_aabb_rotated_z(bounds: &AxisAlignedBox, angle_degrees: f64, id: ChunkId) -> Self {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Self::from_trusted_parts(
      id,
      bounds.center(),
      [
        DVec3::new(cos, sin, 0.0),
        DVec3::new(-sin, cos, 0.0),
        DVec3::Z,
      ],
      bounds.half_extents(),
    )
  }

  /// Assemble a box without validation. The axes come from another valid
  /// box, a rotation constructor, or a decoded chunk record.
  pub(crate) fn from_trusted_parts(
    id: ChunkId,
    center: DVec3,
    axes: [DVec3; 3],
    extents: DVec3,
  ) -> Self {
    Self {
      id,
      center,
      axes,
      extents,
    }
  }

  /// Same box with a different id.
  #[inline]
  pub fn with_id(mut self, id: ChunkId) -> Self {
    self.id = id;
    self
  }

  /// The three orientation axes (X, Y, Z).
  #[inline]
  pub fn axes(&self) -> &[DVec3; 3] {
    &self.axes
  }

  /// Coordinates of `point` in the box frame, relative to the center.
  #[inline]
  pub fn local_offset(&self, point: DVec3) -> DVec3 {
    let d = point - self.center;
    DVec3::new(d.dot(self.axes[0]), d.dot(self.axes[1]), d.dot(self.axes[2]))
  }

  /// World position of a point given in the box frame.
  #[inline]
  pub fn to_world(&self, local: DVec3) -> DVec3 {
    self.center + self.axes[0] * local.x + self.axes[1] * local.y + self.axes[2] * local.z
  }

  /// Inclusive containment test.
  ///
  /// A point exactly on a face belongs to every box sharing that face.
  #[inline]
  pub fn contains(&self, point: DVec3) -> bool {
    self.local_offset(point).abs().cmple(self.extents).all()
  }

  /// True when all 8 corners of `other` lie inside this box.
  pub fn contains_box(&self, other: &OrientedBox) -> bool {
    other.corners().iter().all(|corner| self.contains(*corner))
  }

  /// The 8 corners `center ± extent·axis`.
  pub fn corners(&self) -> [DVec3; 8] {
    CORNER_SIGNS.map(|s| self.to_world(DVec3::from_array(s) * self.extents))
  }

  /// World-space axis-aligned span of the 8 corners.
  pub fn to_aabb(&self) -> AxisAlignedBox {
    let corners = self.corners();
    corners[1..].iter().fold(
      AxisAlignedBox::new(corners[0], corners[0]),
      |acc, c| AxisAlignedBox::new(acc.min.min(*c), acc.max.max(*c)),
    )
  }

  /// True when some extent is not strictly positive.
  #[inline]
  pub fn is_degenerate(&self) -> bool {
    !self.extents.cmpgt(DVec3::ZERO).all()
  }

  /// Enclosed volume.
  #[inline]
  pub fn volume(&self) -> f64 {
    let size = self.extents * 2.0;
    size.x * size.y * size.z
  }
}

fn is_orthonormal(axes: &[DVec3; 3]) -> bool {
  let unit = axes
    .iter()
    .all(|a| (a.length_squared() - 1.0).abs() <= ORTHONORMAL_TOLERANCE);
  let orthogonal = axes[0].dot(axes[1]).abs() <= ORTHONORMAL_TOLERANCE
    && axes[0].dot(axes[2]).abs() <= ORTHONORMAL_TOLERANCE
    && axes[1].dot(axes[2]).abs() <= ORTHONORMAL_TOLERANCE;
  unit && orthogonal
}

#[cfg(test)]
#[path = "obb_test.rs"]
mod obb_test;
