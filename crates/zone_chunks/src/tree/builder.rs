//! Bottom-up agglomeration of leaf chunks into a single-rooted tree.
//!
//! # Algorithm
//!
//! Each pass buckets the current level into a uniform grid sized after the
//! level's first node, then walks the grid in first-seen cell order. For
//! every unvisited node it probes the `dx × dy × dz` blocks (`2..=1` on each
//! axis) starting at the node's cell, and merges the unvisited members of
//! the largest complete block under a fresh parent. Nodes with no partner
//! are promoted unchanged. Passes repeat until one node remains.
//!
//! A pass that merges nothing (scattered leaves with no complete block) is
//! retried with the grid cell doubled. After [`MAX_GRID_DOUBLINGS`] retries
//! the whole level becomes the children of a single root.

use glam::{DVec3, I64Vec3};
use smallvec::SmallVec;
use tracing::{debug, warn};

use super::grid::LevelGrid;
use super::ChunkNode;
use crate::constants::{MAX_GRID_DOUBLINGS, MAX_GROUP_SPAN};
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::OrientedBox;
use crate::types::ChunkId;

/// Indices of one candidate group.
type Group = SmallVec<[usize; 16]>;

/// Build a tree over `leaves`.
///
/// Parent ids start at the largest leaf id plus one and increase in
/// creation order. Every leaf appears exactly once in the result.
#[tracing::instrument(skip_all, name = "tree::build", fields(leaves = leaves.len()))]
pub fn build_tree(leaves: Vec<OrientedBox>) -> ChunkResult<ChunkNode> {
  let Some(max_id) = leaves.iter().map(|b| b.id).max() else {
    return Err(ChunkError::EmptyLeafSet);
  };

  let mut next_id: ChunkId = max_id + 1;
  let mut level: Vec<ChunkNode> = leaves.into_iter().map(ChunkNode::leaf).collect();
  let mut depth = 0usize;
  let mut doublings = 0u32;

  while level.len() > 1 {
    let scale = (1u64 << doublings.min(62)) as f64;
    let before = level.len();
    let (next, merges) = merge_level(level, scale, &mut next_id);
    level = next;

    debug!(depth, before, after = level.len(), merges, scale, "tree level");

    if merges > 0 {
      depth += 1;
      doublings = 0;
      continue;
    }

    doublings += 1;
    if doublings > MAX_GRID_DOUBLINGS {
      warn!(nodes = level.len(), "no mergeable neighbours left, joining level under one root");
      let bounds = enclosing_box(&level, next_id);
      return Ok(ChunkNode::with_children(bounds, level));
    }
  }

  // Non-empty input, and the loop only exits once one node is left.
  level.pop().ok_or(ChunkError::EmptyLeafSet)
}

/// Run one agglomeration pass. Returns the next level and the number of
/// parents created.
fn merge_level(nodes: Vec<ChunkNode>, scale: f64, next_id: &mut ChunkId) -> (Vec<ChunkNode>, usize) {
  let grid = LevelGrid::build(&nodes, scale);
  let mut visited = vec![false; nodes.len()];
  let mut slots: Vec<Option<ChunkNode>> = nodes.into_iter().map(Some).collect();
  let mut next = Vec::with_capacity(slots.len());
  let mut merges = 0;

  for (key, members) in grid.cells() {
    for &index in members {
      if visited[index] {
        continue;
      }

      match best_group(&grid, key, &visited) {
        None => {
          visited[index] = true;
          next.extend(slots[index].take());
        }
        Some(group) => {
          let children: Vec<ChunkNode> = group
            .iter()
            .filter_map(|&member| {
              visited[member] = true;
              slots[member].take()
            })
            .collect();
          let bounds = enclosing_box(&children, *next_id);
          *next_id += 1;
          merges += 1;
          next.push(ChunkNode::with_children(bounds, children));
        }
      }
    }
  }

  (next, merges)
}

/// Largest group of unvisited nodes over the complete blocks anchored at
/// `key`. Blocks are probed from `2×2×2` down to `1×1×1`; the first block
/// reaching a given size keeps it. Groups of one node do not count.
fn best_group(grid: &LevelGrid, key: I64Vec3, visited: &[bool]) -> Option<Group> {
  let mut best: Option<Group> = None;

  for dx in (1..=MAX_GROUP_SPAN).rev() {
    for dy in (1..=MAX_GROUP_SPAN).rev() {
      for dz in (1..=MAX_GROUP_SPAN).rev() {
        let Some(group) = block_members(grid, key, I64Vec3::new(dx, dy, dz), visited) else {
          continue;
        };
        let better = best.as_ref().map_or(true, |b| group.len() > b.len());
        if group.len() > 1 && better {
          best = Some(group);
        }
      }
    }
  }

  best
}

/// Unvisited members of the block of `span` cells at `key`, or `None` when
/// any cell of the block is absent from the grid.
fn block_members(grid: &LevelGrid, key: I64Vec3, span: I64Vec3, visited: &[bool]) -> Option<Group> {
  let mut group = Group::new();
  for x in 0..span.x {
    for y in 0..span.y {
      for z in 0..span.z {
        let members = grid.get(key + I64Vec3::new(x, y, z))?;
        group.extend(members.iter().copied().filter(|&m| !visited[m]));
      }
    }
  }
  Some(group)
}

/// Box spanning every corner of `nodes` (non-empty), in the frame of the
/// first node, re-centered on the span.
fn enclosing_box(nodes: &[ChunkNode], id: ChunkId) -> OrientedBox {
  let Some(first) = nodes.first() else {
    return OrientedBox::axis_aligned(id, DVec3::ZERO, DVec3::ZERO);
  };
  let frame = first.bounds;

  let mut lo = DVec3::splat(f64::INFINITY);
  let mut hi = DVec3::splat(f64::NEG_INFINITY);
  for node in nodes {
    for corner in node.bounds.corners() {
      let local = frame.local_offset(corner);
      lo = lo.min(local);
      hi = hi.max(local);
    }
  }

  OrientedBox::from_trusted_parts(id, frame.to_world((lo + hi) * 0.5), *frame.axes(), (hi - lo) * 0.5)
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
