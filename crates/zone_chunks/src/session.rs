//! ChunkSession - caller-owned state of one chunking run.
//!
//! The session threads points, leaves, tree and classification through the
//! pipeline steps. A last-good snapshot can be taken and restored as a
//! whole; [`ChunkSession::run`] does both around the full pipeline.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, info_span, warn};
use web_time::Instant;

use crate::classify::{classify_by_tree, classify_linear, Classification, ClassifyStrategy};
use crate::codec::PackedPoint;
use crate::config::PartitionConfig;
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::OrientedBox;
use crate::partition::partition;
use crate::progress::{ProgressSink, Stage};
use crate::source::{pack_points, root_volume, ObjectSource};
use crate::tree::{build_tree, ChunkNode};

// =============================================================================
// SessionId - unique identifier
// =============================================================================

static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque session identifier, unique within the process.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SessionId(u64);

impl SessionId {
  pub fn new() -> Self {
    Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
  }

  pub fn raw(&self) -> u64 {
    self.0
  }
}

impl Default for SessionId {
  fn default() -> Self {
    Self::new()
  }
}

// =============================================================================
// Session state
// =============================================================================

/// Everything a run produces, replaced atomically on restore.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
  pub points: Vec<PackedPoint>,
  pub root: Option<OrientedBox>,
  pub leaves: Vec<OrientedBox>,
  pub tree: Option<ChunkNode>,
  pub classification: Option<Classification>,
}

/// Wall time per step in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
  pub pack_us: u64,
  pub partition_us: u64,
  pub tree_us: u64,
  pub classify_us: u64,
}

impl StageTimings {
  pub fn total_us(&self) -> u64 {
    self.pack_us + self.partition_us + self.tree_us + self.classify_us
  }
}

/// Caller-owned pipeline context.
pub struct ChunkSession {
  pub id: SessionId,
  pub config: PartitionConfig,
  pub timings: StageTimings,
  state: SessionState,
  last_good: Option<SessionState>,
}

impl ChunkSession {
  pub fn new(config: PartitionConfig) -> Self {
    Self {
      id: SessionId::new(),
      config,
      timings: StageTimings::default(),
      state: SessionState::default(),
      last_good: None,
    }
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  /// Record the current state as last-good.
  pub fn snapshot(&mut self) {
    self.last_good = Some(self.state.clone());
  }

  /// Put the last-good state back. Returns false when there is none.
  pub fn restore(&mut self) -> bool {
    match &self.last_good {
      Some(state) => {
        self.state = state.clone();
        true
      }
      None => false,
    }
  }

  /// Pack the source objects into points and fit the root volume.
  pub fn pack(&mut self, source: &dyn ObjectSource, progress: &dyn ProgressSink) -> ChunkResult<usize> {
    let start = Instant::now();
    let objects = source.objects();
    let root = root_volume(&objects, self.config.rotation_degrees)?;
    self.state.points = pack_points(&objects, progress);
    self.state.root = Some(root);
    self.timings.pack_us = start.elapsed().as_micros() as u64;
    Ok(self.state.points.len())
  }

  /// Partition the root volume into leaf chunks.
  pub fn partition(&mut self, progress: &dyn ProgressSink) -> ChunkResult<usize> {
    let root = self.state.root.ok_or(ChunkError::MissingInput("root volume"))?;
    let start = Instant::now();
    progress.stage(Stage::CreatingChunks, 0, 0);
    self.state.leaves = partition(&root, self.config.cell_size)?;
    self.state.tree = None;
    self.state.classification = None;
    self.timings.partition_us = start.elapsed().as_micros() as u64;
    Ok(self.state.leaves.len())
  }

  /// Build the chunk tree over the current leaves.
  pub fn build_tree(&mut self, progress: &dyn ProgressSink) -> ChunkResult<&ChunkNode> {
    let start = Instant::now();
    progress.stage(Stage::BuildingTree, self.state.leaves.len(), 0);
    let tree = build_tree(self.state.leaves.clone())?;
    self.timings.tree_us = start.elapsed().as_micros() as u64;
    let tree = self.state.tree.insert(tree);
    Ok(&*tree)
  }

  /// Classify the packed points with the configured strategy.
  pub fn classify(&mut self, progress: &dyn ProgressSink) -> ChunkResult<&Classification> {
    let start = Instant::now();
    let points = self.state.points.clone();
    let classification = match self.config.strategy {
      ClassifyStrategy::TreeDescent => {
        let tree = self.state.tree.as_ref().ok_or(ChunkError::MissingInput("chunk tree"))?;
        classify_by_tree(points, tree, progress)
      }
      ClassifyStrategy::LinearScan(policy) => classify_linear(points, &self.state.leaves, policy, progress),
    };
    self.timings.classify_us = start.elapsed().as_micros() as u64;
    let classification = self.state.classification.insert(classification);
    Ok(&*classification)
  }

  /// Run pack → partition → tree → classify.
  ///
  /// The state before the call is snapshotted and restored if any step
  /// fails, so a failed run leaves the previous result in place.
  pub fn run(&mut self, source: &dyn ObjectSource, progress: &dyn ProgressSink) -> ChunkResult<&Classification> {
    let _span = info_span!("session::run", session = self.id.raw()).entered();
    self.config.validate()?;
    self.snapshot();

    if let Err(err) = self.run_steps(source, progress) {
      warn!(%err, "run failed, restoring last-good state");
      self.restore();
      return Err(err);
    }

    progress.stage(Stage::Done, 0, 0);
    info!(total_us = self.timings.total_us(), "run finished");
    self
      .state
      .classification
      .as_ref()
      .ok_or(ChunkError::MissingInput("classification"))
  }

  fn run_steps(&mut self, source: &dyn ObjectSource, progress: &dyn ProgressSink) -> ChunkResult<()> {
    self.pack(source, progress)?;
    self.partition(progress)?;
    if self.config.strategy == ClassifyStrategy::TreeDescent {
      self.build_tree(progress)?;
    } else {
      self.state.tree = None;
    }
    self.classify(progress)?;
    Ok(())
  }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
