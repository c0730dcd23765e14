//! Top-down quad subdivision in the root's XY plane.

use glam::DVec3;

use super::ChunkNode;
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::OrientedBox;
use crate::types::ChunkId;

/// Recursively split `root` into four XY quadrants until a box is smaller
/// than four times `min_size` on some axis.
///
/// Children keep the parent axes and Z extent. Ids are assigned in
/// pre-order from 0.
#[tracing::instrument(skip_all, name = "tree::subdivide")]
pub fn subdivide_tree(root: &OrientedBox, min_size: DVec3) -> ChunkResult<ChunkNode> {
  if !min_size.cmpgt(DVec3::ZERO).all() {
    return Err(ChunkError::InvalidMinimumSize(min_size));
  }
  let mut next_id: ChunkId = 0;
  Ok(subdivide(*root, min_size, &mut next_id))
}

fn can_subdivide(obb: &OrientedBox, min_size: DVec3) -> bool {
  (obb.extents * 2.0).cmpge(min_size * 4.0).all()
}

fn subdivide(obb: OrientedBox, min_size: DVec3, next_id: &mut ChunkId) -> ChunkNode {
  let bounds = obb.with_id(*next_id);
  *next_id += 1;

  if !can_subdivide(&bounds, min_size) {
    return ChunkNode::leaf(bounds);
  }

  let children = quadrants(&bounds)
    .into_iter()
    .map(|child| subdivide(child, min_size, next_id))
    .collect();
  ChunkNode::with_children(bounds, children)
}

/// The four XY quadrants, X offset outermost.
fn quadrants(parent: &OrientedBox) -> [OrientedBox; 4] {
  let half = DVec3::new(parent.extents.x * 0.5, parent.extents.y * 0.5, parent.extents.z);
  let [axis_x, axis_y, _] = *parent.axes();
  [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)].map(|(sx, sy)| {
    let center = parent.center + axis_x * (sx * half.x) + axis_y * (sy * half.y);
    OrientedBox::from_trusted_parts(-1, center, *parent.axes(), half)
  })
}
