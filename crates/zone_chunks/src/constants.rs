//! Record layouts and numeric constants shared by the pipeline.
//!
//! # Record Layouts
//!
//! Every record is little-endian, fixed width, with no padding and no
//! framing. Streams are plain concatenations of records.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Point (legacy), 40 bytes                                             │
//! │   [0..16)   object id                                                │
//! │   [16..40)  x, y, z                              f64 × 3             │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │ Point, 44 bytes                                                      │
//! │   [0..16)   object id                                                │
//! │   [16..40)  x, y, z                              f64 × 3             │
//! │   [40..44)  chunk id                             i32                 │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │ Axis-aligned chunk, 49 bytes                                         │
//! │   [0]       id                                   u8                  │
//! │   [1..25)   min x, y, z                          f64 × 3             │
//! │   [25..49)  max x, y, z                          f64 × 3             │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │ Oriented chunk, 124 bytes                                            │
//! │   [0..4)    id                                   i32                 │
//! │   [4..28)   center                               f64 × 3             │
//! │   [28..52)  axis X                               f64 × 3             │
//! │   [52..76)  axis Y                               f64 × 3             │
//! │   [76..100) axis Z                               f64 × 3             │
//! │   [100..124) extents                             f64 × 3             │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use glam::DVec3;

/// Size of an object identifier.
pub const OBJECT_ID_SIZE: usize = 16;

/// Size of one encoded `f64` vector.
pub const VEC3_SIZE: usize = 3 * 8;

/// Legacy point record: id + position.
pub const LEGACY_POINT_RECORD_SIZE: usize = OBJECT_ID_SIZE + VEC3_SIZE;

/// Point record: id + position + chunk id.
pub const POINT_RECORD_SIZE: usize = LEGACY_POINT_RECORD_SIZE + 4;

/// Axis-aligned chunk record: u8 id + min + max.
pub const BOX_RECORD_SIZE: usize = 1 + 2 * VEC3_SIZE;

/// Oriented chunk record: i32 id + center + 3 axes + extents.
pub const OBB_RECORD_SIZE: usize = 4 + 5 * VEC3_SIZE;

/// Largest number of cells one grid may produce. Leaf ids are `i32`.
pub const MAX_GRID_CELLS: usize = i32::MAX as usize;

/// Chunk id of a point that has not been classified yet.
pub const UNASSIGNED_CHUNK: i32 = 0;

/// Tolerance on unit length and pairwise dot products of box axes.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-9;

/// Slack added before flooring grid coordinates in the tree builder, so a
/// center sitting a rounding error below a cell boundary lands in the
/// expected cell.
pub const GRID_EPSILON: f64 = 1e-6;

/// Upper bound on how many times the tree builder doubles its grid cell
/// when a level makes no merges. Past it the level is merged wholesale.
pub const MAX_GRID_DOUBLINGS: u32 = 64;

/// Largest neighbour block probed by the tree builder along one axis.
pub const MAX_GROUP_SPAN: i64 = 2;

/// Default chunk cell size along each axis of the root volume.
pub const DEFAULT_CELL_SIZE: DVec3 = DVec3::splat(20.0);

/// Property category written for chunk tags.
pub const CHUNK_CATEGORY: &str = "Chunk";

/// Property key carrying the chunk id.
pub const CHUNK_PROPERTY: &str = "chunk";

/// Property category written for zone tags.
pub const ZONE_CATEGORY: &str = "Zone";

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
