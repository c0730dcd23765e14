//! Error type shared by every fallible operation in the crate.

use glam::DVec3;
use thiserror::Error;

use crate::codec::RecordKind;

/// Result alias used throughout the crate.
pub type ChunkResult<T> = Result<T, ChunkError>;

/// Precondition violations and collaborator failures.
///
/// Missing-data conditions (an object without bounds, a point outside every
/// chunk) are not errors: the item is dropped and processing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChunkError {
  /// A grid cell size was zero, negative or NaN on some axis.
  #[error("chunk cell size must be positive on every axis, got {0}")]
  InvalidCellSize(DVec3),

  /// An axis-aligned division count was zero.
  #[error("divisions must be greater than zero on every axis, got {x}x{y}x{z}")]
  InvalidDivisions { x: u32, y: u32, z: u32 },

  /// A subdivision minimum size was zero, negative or NaN on some axis.
  #[error("minimum subdivision size must be positive on every axis, got {0}")]
  InvalidMinimumSize(DVec3),

  /// A grid would hold more cells than chunk ids can number.
  #[error("grid of {x}x{y}x{z} cells exceeds the limit of {limit} cells")]
  TooManyCells {
    x: usize,
    y: usize,
    z: usize,
    limit: usize,
  },

  /// The tree builder was handed no leaves.
  #[error("cannot build a chunk tree from an empty leaf set")]
  EmptyLeafSet,

  /// No object in the source carried a usable bounding box.
  #[error("no object provided a usable bounding box")]
  NoBounds,

  /// A single record buffer had the wrong length.
  #[error("{kind} record must be {expected} bytes, got {actual}")]
  RecordLength {
    kind: RecordKind,
    expected: usize,
    actual: usize,
  },

  /// A record stream was not a whole number of records.
  #[error("{kind} stream of {actual} bytes is not a multiple of {record_size}")]
  StreamLength {
    kind: RecordKind,
    record_size: usize,
    actual: usize,
  },

  /// Box axes were not mutually orthogonal unit vectors.
  #[error("box axes are not orthonormal: {0:?}")]
  NonOrthonormalAxes([DVec3; 3]),

  /// A box half-extent was negative or NaN.
  #[error("box extents must be non-negative, got {0}")]
  NegativeExtent(DVec3),

  /// An object identifier string could not be parsed.
  #[error("invalid object id `{0}`")]
  InvalidObjectId(String),

  /// A session step ran before the step producing its input.
  #[error("session has no {0} yet")]
  MissingInput(&'static str),

  /// The collision-test oracle failed to produce results.
  #[error("collision test `{test}` failed: {reason}")]
  Oracle { test: String, reason: String },
}
