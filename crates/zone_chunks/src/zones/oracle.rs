//! Collision-test oracles.

use rayon::prelude::*;

use super::{BoxedItem, Collision};
use crate::error::{ChunkError, ChunkResult};

/// External collision test over two named sets of volumes.
///
/// Implementations return the intersecting (zone, point) pairs with a
/// non-negative distance and the overlap volume. The order of the results
/// matters only for full ties.
pub trait CollisionOracle {
  fn run(&self, test_name: &str, zones: &[BoxedItem], points: &[BoxedItem]) -> ChunkResult<Vec<Collision>>;
}

/// Reference oracle intersecting the world-aligned spans of each pair.
///
/// Pairs with a strictly positive overlap volume are reported, with the
/// smallest overlap span (penetration depth) as distance. Zones are
/// processed on the rayon pool; results keep zone-major input order.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxOverlapOracle;

impl CollisionOracle for BoxOverlapOracle {
  fn run(&self, _test_name: &str, zones: &[BoxedItem], points: &[BoxedItem]) -> ChunkResult<Vec<Collision>> {
    let point_spans: Vec<_> = points.iter().map(|p| (p.id, p.bounds.to_aabb())).collect();

    Ok(
      zones
        .par_iter()
        .flat_map_iter(|zone| {
          let zone_span = zone.bounds.to_aabb();
          point_spans.iter().filter_map(move |(point, span)| {
            let overlap = zone_span.intersection(span)?;
            let volume = overlap.volume();
            (volume > 0.0).then(|| Collision {
              zone: zone.id,
              point: *point,
              distance: overlap.size().min_element(),
              volume,
            })
          })
        })
        .collect(),
    )
  }
}

/// Replays collision results computed elsewhere, for one named test.
#[derive(Clone, Debug, Default)]
pub struct RecordedOracle {
  pub test_name: String,
  pub collisions: Vec<Collision>,
}

impl CollisionOracle for RecordedOracle {
  fn run(&self, test_name: &str, _zones: &[BoxedItem], _points: &[BoxedItem]) -> ChunkResult<Vec<Collision>> {
    if self.test_name != test_name {
      return Err(ChunkError::Oracle {
        test: test_name.to_owned(),
        reason: format!("recorded results belong to `{}`", self.test_name),
      });
    }
    Ok(self.collisions.clone())
  }
}
