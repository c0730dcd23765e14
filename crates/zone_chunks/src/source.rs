//! Boundary with the object source and the property sink.
//!
//! The object source yields an id and an optional world box per object;
//! objects without a box are skipped. The property sink receives tags and
//! returns nothing.

use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::codec::PackedPoint;
use crate::constants::{CHUNK_CATEGORY, CHUNK_PROPERTY, ZONE_CATEGORY};
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::{AxisAlignedBox, OrientedBox};
use crate::progress::{ProgressSink, Stage};
use crate::types::{ChunkId, ObjectId, Properties};
use crate::zones::{BoxedItem, ZoneAssignment};

/// One object as seen by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceObject {
  pub id: ObjectId,
  /// World bounds, absent when the object has no geometry.
  pub bounds: Option<AxisAlignedBox>,
}

/// Provider of objects to tag.
pub trait ObjectSource {
  fn objects(&self) -> Vec<SourceObject>;
}

impl ObjectSource for [SourceObject] {
  fn objects(&self) -> Vec<SourceObject> {
    self.to_vec()
  }
}

impl ObjectSource for Vec<SourceObject> {
  fn objects(&self) -> Vec<SourceObject> {
    self.clone()
  }
}

/// Receiver of tags.
pub trait PropertySink {
  fn attach(&mut self, object: ObjectId, category: &str, properties: &Properties);
}

/// Union of every object box.
pub fn model_bounds(objects: &[SourceObject]) -> ChunkResult<AxisAlignedBox> {
  objects
    .iter()
    .filter_map(|o| o.bounds)
    .map(|b| AxisAlignedBox::normalized(b.min, b.max))
    .reduce(|acc, b| acc.union(&b))
    .ok_or(ChunkError::NoBounds)
}

/// Root volume for partitioning, rotated by `rotation_degrees` about Z.
///
/// The axes come from [`OrientedBox::from_aabb_rotated_z`]; the extents are
/// refit in the rotated frame so every object box lies inside the root.
/// Without rotation this is the model bounds.
pub fn root_volume(objects: &[SourceObject], rotation_degrees: f64) -> ChunkResult<OrientedBox> {
  let bounds = model_bounds(objects)?;
  let frame = OrientedBox::from_aabb_rotated_z(&bounds, rotation_degrees, 0);

  let (lo, hi) = objects
    .iter()
    .filter_map(|o| o.bounds)
    .flat_map(|b| OrientedBox::from_aabb(&AxisAlignedBox::normalized(b.min, b.max), 0).corners())
    .map(|corner| frame.local_offset(corner))
    .fold(
      (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
      |(lo, hi), local| (lo.min(local), hi.max(local)),
    );

  Ok(OrientedBox::from_trusted_parts(
    0,
    frame.to_world((lo + hi) * 0.5),
    *frame.axes(),
    (hi - lo) * 0.5,
  ))
}

/// Reduce objects to points at their box centers.
///
/// Objects with a nil id or without a box are skipped.
#[tracing::instrument(skip_all, name = "source::pack_points", fields(objects = objects.len()))]
pub fn pack_points(objects: &[SourceObject], progress: &dyn ProgressSink) -> Vec<PackedPoint> {
  progress.stage(Stage::PackingPoints, objects.len(), 0);

  let points: Vec<PackedPoint> = objects
    .par_iter()
    .filter_map(|o| {
      if o.id.is_nil() {
        return None;
      }
      let bounds = o.bounds?;
      Some(PackedPoint::new(o.id, bounds.center()))
    })
    .collect();

  progress.stage(Stage::PackingPoints, objects.len(), objects.len());
  let skipped = objects.len() - points.len();
  if skipped > 0 {
    debug!(skipped, "objects without id or bounds");
  }
  points
}

/// Oriented volumes for the collision test, rotated like the root.
///
/// Volume ids are the object's index in `objects`. Objects without a box
/// are skipped.
pub fn pack_volumes(objects: &[SourceObject], rotation_degrees: f64) -> Vec<BoxedItem> {
  objects
    .par_iter()
    .enumerate()
    .filter_map(|(index, o)| {
      let raw = o.bounds?;
      let bounds = AxisAlignedBox::normalized(raw.min, raw.max);
      Some(BoxedItem {
        id: o.id,
        bounds: OrientedBox::from_aabb_rotated_z(&bounds, rotation_degrees, index as ChunkId),
      })
    })
    .collect()
}

/// Tag every classified point with category `Chunk` and `{"chunk": id}`.
pub fn tag_chunks(sink: &mut dyn PropertySink, points: &[PackedPoint], progress: &dyn ProgressSink) -> usize {
  progress.stage(Stage::ApplyingProperties, points.len(), 0);
  for (done, point) in points.iter().enumerate() {
    let mut properties = Properties::new();
    properties.insert(CHUNK_PROPERTY.to_owned(), point.chunk_id.to_string());
    sink.attach(point.id, CHUNK_CATEGORY, &properties);
    progress.stage(Stage::ApplyingProperties, points.len(), done + 1);
  }
  info!(tagged = points.len(), "chunk tags applied");
  points.len()
}

/// Tag every assigned point with category `Zone` and its zone's metadata.
pub fn tag_zones(sink: &mut dyn PropertySink, assignment: &ZoneAssignment, progress: &dyn ProgressSink) -> usize {
  progress.stage(Stage::ApplyingProperties, assignment.len(), 0);
  for (done, (point, matched)) in assignment.iter().enumerate() {
    sink.attach(*point, ZONE_CATEGORY, &matched.properties);
    progress.stage(Stage::ApplyingProperties, assignment.len(), done + 1);
  }
  info!(tagged = assignment.len(), "zone tags applied");
  assignment.len()
}

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;
