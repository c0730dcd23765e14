//! Point classification: stamp each point with the chunk that holds it.
//!
//! Lookup runs on the rayon pool against a read-only tree or chunk list;
//! each point is written by exactly one worker. Dropping uncontained points
//! and pruning unused chunks happen afterwards, sequentially.

use std::collections::HashSet;

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::codec::{encode_records, PackedBox, PackedPoint};
use crate::geometry::OrientedBox;
use crate::progress::{ProgressSink, Stage};
use crate::tree::ChunkNode;
use crate::types::ChunkId;

/// How a point on a face shared by several chunks is resolved during a
/// linear scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
  /// The first containing chunk in list order.
  #[default]
  FirstMatch,
  /// The containing chunk whose center is closest; ties go to the lower id.
  NearestCenter,
}

/// Lookup method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassifyStrategy {
  /// Containment descent from the tree root.
  #[default]
  TreeDescent,
  /// Scan of the flat leaf list.
  LinearScan(BoundaryPolicy),
}

/// Classified points plus the chunks that received at least one of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
  /// Contained points with their chunk id, in input order.
  pub points: Vec<PackedPoint>,
  /// Used chunks: tree pre-order for descent, list order for a scan.
  pub chunks: Vec<OrientedBox>,
}

impl Classification {
  /// Points as concatenated 44-byte records.
  pub fn packed_points(&self) -> Vec<u8> {
    encode_records(&self.points)
  }

  /// Used chunks as concatenated 124-byte records.
  pub fn packed_chunks(&self) -> Vec<u8> {
    encode_records(&self.chunks)
  }

  /// Ids of the used chunks.
  pub fn used_ids(&self) -> HashSet<ChunkId> {
    self.chunks.iter().map(|c| c.id).collect()
  }
}

/// Classify by containment descent through `tree`.
#[tracing::instrument(skip_all, name = "classify::tree", fields(points = points.len()))]
pub fn classify_by_tree(
  points: Vec<PackedPoint>,
  tree: &ChunkNode,
  progress: &dyn ProgressSink,
) -> Classification {
  let located = locate(points, progress, |p| tree.find_leaf(p.position).map(|leaf| leaf.id));
  let (points, used) = keep_located(located);

  progress.stage(Stage::ClearingEmptyChunks, 0, 0);
  let chunks: Vec<OrientedBox> = tree
    .iter()
    .map(|node| node.bounds)
    .filter(|bounds| used.contains(&bounds.id))
    .collect();

  info!(points = points.len(), chunks = chunks.len(), "classified by tree");
  Classification { points, chunks }
}

/// Classify by scanning `chunks` in list order.
#[tracing::instrument(skip_all, name = "classify::linear", fields(points = points.len()))]
pub fn classify_linear(
  points: Vec<PackedPoint>,
  chunks: &[OrientedBox],
  policy: BoundaryPolicy,
  progress: &dyn ProgressSink,
) -> Classification {
  let located = locate(points, progress, |p| find_chunk(chunks, p.position, policy));
  let (points, used) = keep_located(located);

  progress.stage(Stage::ClearingEmptyChunks, 0, 0);
  let chunks: Vec<OrientedBox> = chunks
    .iter()
    .filter(|c| used.contains(&c.id))
    .copied()
    .collect();

  info!(points = points.len(), chunks = chunks.len(), "classified by scan");
  Classification { points, chunks }
}

/// Classify against axis-aligned chunks, first match wins.
///
/// Returns the contained points and the used boxes in list order.
pub fn classify_axis_aligned(
  points: Vec<PackedPoint>,
  boxes: &[PackedBox],
  progress: &dyn ProgressSink,
) -> (Vec<PackedPoint>, Vec<PackedBox>) {
  let located = locate(points, progress, |p| {
    boxes
      .iter()
      .find(|b| b.contains(p.position))
      .map(|b| ChunkId::from(b.id))
  });
  let (points, used) = keep_located(located);

  progress.stage(Stage::ClearingEmptyChunks, 0, 0);
  let boxes = boxes
    .iter()
    .filter(|b| used.contains(&ChunkId::from(b.id)))
    .copied()
    .collect();
  (points, boxes)
}

/// Containing chunk for `point` under `policy`. Degenerate chunks are
/// skipped.
pub fn find_chunk(chunks: &[OrientedBox], point: DVec3, policy: BoundaryPolicy) -> Option<ChunkId> {
  let mut containing = chunks
    .iter()
    .filter(|c| !c.is_degenerate() && c.contains(point));

  match policy {
    BoundaryPolicy::FirstMatch => containing.next().map(|c| c.id),
    BoundaryPolicy::NearestCenter => containing
      .min_by(|a, b| {
        let da = a.center.distance_squared(point);
        let db = b.center.distance_squared(point);
        da.total_cmp(&db).then(a.id.cmp(&b.id))
      })
      .map(|c| c.id),
  }
}

/// Run `lookup` for every point on the rayon pool, stamping the chunk id.
fn locate<F>(points: Vec<PackedPoint>, progress: &dyn ProgressSink, lookup: F) -> Vec<Option<PackedPoint>>
where
  F: Fn(&PackedPoint) -> Option<ChunkId> + Sync,
{
  let total = points.len();
  progress.stage(Stage::LocatingPoints, total, 0);

  let located: Vec<Option<PackedPoint>> = points
    .into_par_iter()
    .map(|mut point| {
      let chunk_id = lookup(&point)?;
      point.chunk_id = chunk_id;
      Some(point)
    })
    .collect();

  progress.stage(Stage::LocatingPoints, total, total);
  located
}

/// Drop unlocated points and collect the ids in use.
fn keep_located(located: Vec<Option<PackedPoint>>) -> (Vec<PackedPoint>, HashSet<ChunkId>) {
  let total = located.len();
  let points: Vec<PackedPoint> = located.into_iter().flatten().collect();
  let used: HashSet<ChunkId> = points.iter().map(|p| p.chunk_id).collect();

  let dropped = total - points.len();
  if dropped > 0 {
    debug!(dropped, "points outside every chunk");
  }
  (points, used)
}
