//! Zone assignment: resolve one zone per point from collision results,
//! with geometric containment as the fallback.
//!
//! # Resolution
//!
//! 1. The collision oracle is run once over zones × points.
//! 2. Results are grouped by point. The zone with the strictly greatest
//!    overlap volume wins; on an exact volume tie the strictly smaller
//!    distance wins; on a full tie the earlier result stays.
//! 3. Points that appeared in no result are tested against the zones in
//!    order; the first zone containing all 8 corners of the point's box is
//!    taken.
//! 4. Anything else stays unassigned.

mod oracle;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::error::ChunkResult;
use crate::geometry::OrientedBox;
use crate::progress::{ProgressSink, Stage};
use crate::types::{ObjectId, Properties};

pub use oracle::{BoxOverlapOracle, CollisionOracle, RecordedOracle};

/// Name under which the zone collision test is run.
pub const ZONE_TEST_NAME: &str = "Zone Detection";

/// Object reference plus its oriented volume.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxedItem {
  pub id: ObjectId,
  pub bounds: OrientedBox,
}

/// Reference volume with the metadata copied onto matched points.
#[derive(Clone, Debug, PartialEq)]
pub struct Zone {
  pub item: BoxedItem,
  pub properties: Properties,
}

/// One intersecting (zone, point) pair reported by the oracle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
  pub zone: ObjectId,
  pub point: ObjectId,
  /// Non-negative separation or penetration measure.
  pub distance: f64,
  /// Overlap volume.
  pub volume: f64,
}

/// Which path produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSource {
  Collision,
  Containment,
}

/// The zone chosen for one point.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoneMatch {
  pub zone: ObjectId,
  pub properties: Properties,
  pub source: MatchSource,
}

/// Point id → chosen zone.
pub type ZoneAssignment = BTreeMap<ObjectId, ZoneMatch>;

/// Best candidate among the collisions of one point.
///
/// Strictly greater volume wins, then strictly smaller distance on an exact
/// volume tie. Results with a NaN volume never win.
pub fn best_collision<'a, I>(candidates: I) -> Option<&'a Collision>
where
  I: IntoIterator<Item = &'a Collision>,
{
  let mut best: Option<&Collision> = None;
  let mut best_volume = f64::MIN;
  let mut best_distance = f64::MAX;

  for candidate in candidates {
    let wins = candidate.volume > best_volume
      || (candidate.volume == best_volume && candidate.distance < best_distance);
    if wins {
      best_volume = candidate.volume;
      best_distance = candidate.distance;
      best = Some(candidate);
    }
  }
  best
}

/// Assign zones to `points`.
///
/// Oracle failures are returned as is; results naming an unknown zone or
/// point are skipped.
#[tracing::instrument(skip_all, name = "zones::disambiguate", fields(zones = zones.len(), points = points.len()))]
pub fn disambiguate(
  zones: &[Zone],
  points: &[BoxedItem],
  oracle: &dyn CollisionOracle,
  progress: &dyn ProgressSink,
) -> ChunkResult<ZoneAssignment> {
  let zone_items: Vec<BoxedItem> = zones.iter().map(|z| z.item.clone()).collect();
  let collisions = oracle.run(ZONE_TEST_NAME, &zone_items, points)?;
  debug!(collisions = collisions.len(), "oracle finished");

  let mut zone_index: HashMap<ObjectId, usize> = HashMap::with_capacity(zones.len());
  for (index, zone) in zones.iter().enumerate() {
    zone_index.entry(zone.item.id).or_insert(index);
  }

  let grouped = group_by_point(&collisions, &zone_index, points, progress);
  let mut assignment = ZoneAssignment::new();

  progress.stage(Stage::ChoosingBestCollision, grouped.len(), 0);
  for (done, (point, candidates)) in grouped.iter().enumerate() {
    let best = best_collision(candidates).and_then(|best| zone_index.get(&best.zone));
    if let Some(&index) = best {
      assignment.insert(*point, matched(&zones[index], MatchSource::Collision));
    }
    progress.stage(Stage::ChoosingBestCollision, grouped.len(), done + 1);
  }

  let collided: HashSet<ObjectId> = grouped.iter().map(|(point, _)| *point).collect();
  let remaining: Vec<&BoxedItem> = points.iter().filter(|p| !collided.contains(&p.id)).collect();
  let contained = assign_by_containment(zones, &remaining, &mut assignment, progress);

  info!(
    by_collision = assignment.len() - contained,
    by_containment = contained,
    unassigned = points.len().saturating_sub(assignment.len()),
    "zones assigned"
  );
  Ok(assignment)
}

/// Collisions grouped per point, points in first-seen order.
fn group_by_point(
  collisions: &[Collision],
  zone_index: &HashMap<ObjectId, usize>,
  points: &[BoxedItem],
  progress: &dyn ProgressSink,
) -> Vec<(ObjectId, Vec<Collision>)> {
  let known_points: HashSet<ObjectId> = points.iter().map(|p| p.id).collect();
  let mut slots: HashMap<ObjectId, usize> = HashMap::new();
  let mut grouped: Vec<(ObjectId, Vec<Collision>)> = Vec::new();
  let mut skipped = 0usize;

  progress.stage(Stage::GroupingCollisions, collisions.len(), 0);
  for (done, collision) in collisions.iter().enumerate() {
    if !zone_index.contains_key(&collision.zone) || !known_points.contains(&collision.point) {
      skipped += 1;
      continue;
    }
    let slot = *slots.entry(collision.point).or_insert_with(|| {
      grouped.push((collision.point, Vec::new()));
      grouped.len() - 1
    });
    grouped[slot].1.push(*collision);
    progress.stage(Stage::GroupingCollisions, collisions.len(), done + 1);
  }

  if skipped > 0 {
    warn!(skipped, "collision results referencing unknown zones or points");
  }
  grouped
}

/// First zone, in order, whose box contains every corner of the point's
/// box. Returns how many points were assigned.
fn assign_by_containment(
  zones: &[Zone],
  remaining: &[&BoxedItem],
  assignment: &mut ZoneAssignment,
  progress: &dyn ProgressSink,
) -> usize {
  let mut assigned = 0;
  progress.stage(Stage::ClassifyingRemainingPoints, remaining.len(), 0);

  for point in remaining {
    let found = zones.iter().find(|zone| zone.item.bounds.contains_box(&point.bounds));
    if let Some(zone) = found {
      assignment.insert(point.id, matched(zone, MatchSource::Containment));
      assigned += 1;
      progress.stage(Stage::ClassifyingRemainingPoints, remaining.len(), assigned);
    }
  }
  assigned
}

fn matched(zone: &Zone, source: MatchSource) -> ZoneMatch {
  ZoneMatch {
    zone: zone.item.id,
    properties: zone.properties.clone(),
    source,
  }
}
