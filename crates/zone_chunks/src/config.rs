//! PartitionConfig - parameters of one chunking run.

use glam::DVec3;

use crate::classify::ClassifyStrategy;
use crate::constants::DEFAULT_CELL_SIZE;
use crate::error::{ChunkError, ChunkResult};

/// Parameters of one chunking run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartitionConfig {
  /// Leaf chunk size along each root axis, in model units.
  pub cell_size: DVec3,

  /// Plan rotation of the model grid in degrees. The root volume and every
  /// object volume are built with their X/Y axes turned by this angle.
  pub rotation_degrees: f64,

  /// How points are located.
  pub strategy: ClassifyStrategy,
}

impl PartitionConfig {
  /// Uniform cell size on every axis.
  pub fn with_cell_size(size: f64) -> Self {
    Self {
      cell_size: DVec3::splat(size),
      ..Self::default()
    }
  }

  /// Check every field before a run.
  pub fn validate(&self) -> ChunkResult<()> {
    if !self.cell_size.cmpgt(DVec3::ZERO).all() || !self.cell_size.is_finite() {
      return Err(ChunkError::InvalidCellSize(self.cell_size));
    }
    Ok(())
  }
}

impl Default for PartitionConfig {
  fn default() -> Self {
    Self {
      cell_size: DEFAULT_CELL_SIZE,
      rotation_degrees: 0.0,
      strategy: ClassifyStrategy::TreeDescent,
    }
  }
}
