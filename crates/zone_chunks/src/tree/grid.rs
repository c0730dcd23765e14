//! Uniform grid index over one level of the tree builder.

use std::collections::HashMap;

use glam::{DVec3, I64Vec3};
use smallvec::SmallVec;

use super::ChunkNode;
use crate::constants::GRID_EPSILON;

/// Cell coordinates are clamped so that probing neighbours never overflows.
const KEY_LIMIT: f64 = (1u64 << 40) as f64;

/// Indices of the nodes that fell into one cell, in insertion order.
pub(super) type CellMembers = SmallVec<[usize; 4]>;

/// Nodes of one level bucketed by cell, iterated in first-seen cell order.
///
/// Coordinates are taken in the frame of the level's first node:
/// `floor((center - min_center) / cell_size)` with the center projected on
/// that node's axes and `cell_size = 2 · extents · scale`.
pub(super) struct LevelGrid {
  cells: Vec<(I64Vec3, CellMembers)>,
  slots: HashMap<I64Vec3, usize>,
}

impl LevelGrid {
  /// Bucket `nodes` (non-empty) with the first node's cell size times
  /// `scale`.
  pub fn build(nodes: &[ChunkNode], scale: f64) -> Self {
    let mut grid = Self {
      cells: Vec::new(),
      slots: HashMap::with_capacity(nodes.len()),
    };
    let Some(first) = nodes.first() else {
      return grid;
    };

    let frame = first.bounds;
    let cell_size = frame.extents * 2.0 * scale;
    let local: Vec<DVec3> = nodes
      .iter()
      .map(|n| frame.local_offset(n.bounds.center))
      .collect();
    let min_center = local
      .iter()
      .fold(DVec3::splat(f64::INFINITY), |acc, c| acc.min(*c));

    for (index, center) in local.iter().enumerate() {
      let key = cell_key((*center - min_center) / cell_size);
      grid.insert(key, index);
    }
    grid
  }

  fn insert(&mut self, key: I64Vec3, index: usize) {
    match self.slots.get(&key) {
      Some(&slot) => self.cells[slot].1.push(index),
      None => {
        self.slots.insert(key, self.cells.len());
        let mut members = CellMembers::new();
        members.push(index);
        self.cells.push((key, members));
      }
    }
  }

  /// Members of the cell at `key`, or `None` when the cell is absent.
  pub fn get(&self, key: I64Vec3) -> Option<&[usize]> {
    self.slots.get(&key).map(|&slot| self.cells[slot].1.as_slice())
  }

  /// Cells in first-seen order.
  pub fn cells(&self) -> impl Iterator<Item = (I64Vec3, &[usize])> {
    self.cells.iter().map(|(key, members)| (*key, members.as_slice()))
  }

  pub fn len(&self) -> usize {
    self.cells.len()
  }
}

/// Floor to integer cell coordinates. A zero cell size on some axis
/// produces NaN or infinity there, which the clamp and cast map to a
/// finite key.
fn cell_key(ratio: DVec3) -> I64Vec3 {
  (ratio + GRID_EPSILON)
    .floor()
    .clamp(DVec3::splat(-KEY_LIMIT), DVec3::splat(KEY_LIMIT))
    .as_i64vec3()
}
