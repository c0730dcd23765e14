//! zone_chunks - Oriented chunk partitioning and zone tagging for object sets
//!
//! This crate splits the bounding volume of a large object set into
//! oriented leaf chunks, groups the leaves into a bottom-up chunk tree and
//! assigns every object (reduced to its box center) to one leaf. A second
//! pass resolves which zone volume an object belongs to when it overlaps
//! several.
//!
//! # Features
//!
//! - **Grid partitioning**: Oriented root volume cut into fixed-size cells,
//!   boundary cells clipped to the root
//! - **Chunk tree**: Bottom-up merge of neighboring cells in blocks of up to
//!   2×2×2, plus top-down quad subdivision
//! - **Classification**: Parallel tree descent or linear scan with a
//!   configurable policy for points on shared faces
//! - **Binary codec**: Fixed little-endian records for points, axis-aligned
//!   boxes and oriented boxes
//! - **Zone disambiguation**: Largest-overlap selection over collision
//!   results, with a containment fallback
//!
//! # Example
//!
//! ```ignore
//! use zone_chunks::{ChunkSession, PartitionConfig, TracingProgress};
//!
//! let mut session = ChunkSession::new(PartitionConfig::with_cell_size(20.0));
//! let result = session.run(&objects, &TracingProgress)?;
//!
//! println!("{} points in {} chunks", result.points.len(), result.chunks.len());
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use error::{ChunkError, ChunkResult};
pub use types::{ChunkId, ObjectId, Properties};

// Oriented and axis-aligned boxes
pub mod geometry;
pub use geometry::{AxisAlignedBox, OrientedBox};

// Fixed-layout binary records
pub mod codec;
pub use codec::{decode_records, encode_records, LegacyPoint, PackedBox, PackedPoint, Record, RecordKind};

// Grid partitioning of the root volume
pub mod partition;
pub use partition::{divide_bounds, grid_divisions, partition};

// Chunk tree construction
pub mod tree;
pub use tree::{build_tree, subdivide_tree, ChunkNode};

// Point location
pub mod classify;
pub use classify::{
  classify_axis_aligned, classify_by_tree, classify_linear, find_chunk, BoundaryPolicy, Classification,
  ClassifyStrategy,
};

// Zone selection from collision results
pub mod zones;
pub use zones::{
  disambiguate, BoxOverlapOracle, BoxedItem, Collision, CollisionOracle, RecordedOracle, Zone, ZoneAssignment,
  ZoneMatch, ZONE_TEST_NAME,
};

// Progress reporting
pub mod progress;
pub use progress::{ChannelProgress, NoProgress, Progress, ProgressSink, Stage, TracingProgress};

// Object source and property sink boundary
pub mod source;
pub use source::{
  model_bounds, pack_points, pack_volumes, root_volume, tag_chunks, tag_zones, ObjectSource, PropertySink,
  SourceObject,
};

// Run configuration and caller-owned session
pub mod config;
pub mod session;
pub use config::PartitionConfig;
pub use session::{ChunkSession, SessionId, SessionState, StageTimings};
