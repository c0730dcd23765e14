//! Line-list export of oriented boxes for rendering collaborators.
//!
//! ```text
//!        7 ──────── 6
//!       /│         /│
//!      4 ──────── 5 │        +Z
//!      │ 3 ───────│─ 2        │  +Y
//!      │/         │/          │ /
//!      0 ──────── 1           └──── +X
//! ```

use glam::DVec3;

use super::OrientedBox;
use crate::tree::ChunkNode;

/// Vertex sign pattern in wireframe order: bottom face counter-clockwise,
/// then top face counter-clockwise.
const VERTEX_SIGNS: [[f64; 3]; 8] = [
  [-1.0, -1.0, -1.0],
  [1.0, -1.0, -1.0],
  [1.0, 1.0, -1.0],
  [-1.0, 1.0, -1.0],
  [-1.0, -1.0, 1.0],
  [1.0, -1.0, 1.0],
  [1.0, 1.0, 1.0],
  [-1.0, 1.0, 1.0],
];

/// The 12 box edges as vertex index pairs: bottom ring, top ring, pillars.
pub const BOX_EDGES: [(usize, usize); 12] = [
  (0, 1),
  (1, 2),
  (2, 3),
  (3, 0),
  (4, 5),
  (5, 6),
  (6, 7),
  (7, 4),
  (0, 4),
  (1, 5),
  (2, 6),
  (3, 7),
];

/// Per-depth palette (RGB), cycled every 5 levels.
const DEPTH_PALETTE: [[u8; 3]; 5] = [
  [255, 0, 0],
  [0, 255, 0],
  [0, 0, 255],
  [255, 165, 0],
  [255, 0, 255],
];

/// Colour for drawing a tree node at `depth`.
#[inline]
pub fn depth_color(depth: usize) -> [u8; 3] {
  DEPTH_PALETTE[depth % DEPTH_PALETTE.len()]
}

impl OrientedBox {
  /// Box vertices in wireframe order (see [`BOX_EDGES`]).
  pub fn wireframe_vertices(&self) -> [DVec3; 8] {
    VERTEX_SIGNS.map(|s| self.to_world(DVec3::from_array(s) * self.extents))
  }

  /// The 12 edges as endpoint pairs.
  pub fn wireframe(&self) -> [(DVec3, DVec3); 12] {
    let v = self.wireframe_vertices();
    BOX_EDGES.map(|(a, b)| (v[a], v[b]))
  }
}

/// Edges of every node in a tree, pre-order, each tagged with its depth
/// colour.
pub fn tree_wireframe(root: &ChunkNode) -> Vec<([u8; 3], (DVec3, DVec3))> {
  let mut lines = Vec::with_capacity(root.node_count() * BOX_EDGES.len());
  for (depth, node) in root.iter_with_depth() {
    let color = depth_color(depth);
    lines.extend(node.bounds.wireframe().into_iter().map(|edge| (color, edge)));
  }
  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_depth_color_cycles() {
    assert_eq!(depth_color(0), [255, 0, 0]);
    assert_eq!(depth_color(3), [255, 165, 0]);
    assert_eq!(depth_color(5), depth_color(0));
    assert_eq!(depth_color(9), [255, 0, 255]);
  }

  #[test]
  fn test_wireframe_edges_have_box_lengths() {
    let obb = OrientedBox::axis_aligned(0, DVec3::ZERO, DVec3::new(1.0, 2.0, 3.0));
    let edges = obb.wireframe();

    for (a, b) in &edges[0..4] {
      assert_eq!(a.z, -3.0);
      assert_eq!(b.z, -3.0);
    }
    for (a, b) in &edges[8..12] {
      assert_eq!((*b - *a).length(), 6.0);
    }
    assert_eq!((edges[0].1 - edges[0].0).length(), 2.0);
    assert_eq!((edges[1].1 - edges[1].0).length(), 4.0);
  }

  #[test]
  fn test_wireframe_vertices_are_corners() {
    let obb = OrientedBox::axis_aligned(0, DVec3::splat(5.0), DVec3::ONE);
    let corners = obb.corners();
    for v in obb.wireframe_vertices() {
      assert!(corners.contains(&v));
    }
  }
}
