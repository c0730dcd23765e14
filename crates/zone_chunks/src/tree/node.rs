//! ChunkNode - one box plus its owned children.

use glam::DVec3;

use crate::geometry::OrientedBox;
use crate::types::ChunkId;

/// Node of a chunk tree. A node without children is a leaf chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkNode {
  pub bounds: OrientedBox,
  pub children: Vec<ChunkNode>,
}

impl ChunkNode {
  /// Leaf node.
  pub fn leaf(bounds: OrientedBox) -> Self {
    Self {
      bounds,
      children: Vec::new(),
    }
  }

  /// Internal node owning `children`.
  pub fn with_children(bounds: OrientedBox, children: Vec<ChunkNode>) -> Self {
    Self { bounds, children }
  }

  #[inline]
  pub fn id(&self) -> ChunkId {
    self.bounds.id
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_empty()
  }

  /// Nodes in pre-order (parent before children, children in list order).
  pub fn iter(&self) -> impl Iterator<Item = &ChunkNode> {
    self.iter_with_depth().map(|(_, node)| node)
  }

  /// Pre-order traversal yielding `(depth, node)`, the root at depth 0.
  pub fn iter_with_depth(&self) -> PreOrder<'_> {
    PreOrder {
      stack: vec![(0, self)],
    }
  }

  /// Leaf boxes in pre-order.
  pub fn leaves(&self) -> impl Iterator<Item = &OrientedBox> {
    self.iter().filter(|n| n.is_leaf()).map(|n| &n.bounds)
  }

  pub fn node_count(&self) -> usize {
    self.iter().count()
  }

  pub fn leaf_count(&self) -> usize {
    self.leaves().count()
  }

  /// Number of edges on the longest root-to-leaf path.
  pub fn depth(&self) -> usize {
    self.iter_with_depth().map(|(d, _)| d).max().unwrap_or(0)
  }

  /// Every box in the tree, pre-order.
  pub fn boxes(&self) -> Vec<OrientedBox> {
    self.iter().map(|n| n.bounds).collect()
  }

  /// Descend by containment to the leaf holding `point`.
  ///
  /// Children are tried in list order and the first one that yields a leaf
  /// wins, so on a shared face the earlier sibling takes the point.
  /// Degenerate boxes never contain anything.
  pub fn find_leaf(&self, point: DVec3) -> Option<&OrientedBox> {
    if self.bounds.is_degenerate() || !self.bounds.contains(point) {
      return None;
    }
    if self.is_leaf() {
      return Some(&self.bounds);
    }
    self.children.iter().find_map(|child| child.find_leaf(point))
  }
}

/// Pre-order iterator over a chunk tree.
pub struct PreOrder<'a> {
  stack: Vec<(usize, &'a ChunkNode)>,
}

impl<'a> Iterator for PreOrder<'a> {
  type Item = (usize, &'a ChunkNode);

  fn next(&mut self) -> Option<Self::Item> {
    let (depth, node) = self.stack.pop()?;
    self
      .stack
      .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
    Some((depth, node))
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
