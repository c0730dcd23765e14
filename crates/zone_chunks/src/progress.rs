//! Progress reporting for long-running pipeline steps.
//!
//! Every step reports `(stage, total, done)` through a [`ProgressSink`].
//! Sinks are shared with rayon workers, so they must be `Sync`.

use std::fmt;

use crossbeam_channel::{self as channel, Receiver, Sender};
use tracing::info;

/// Pipeline stage names, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
  PackingPoints,
  CreatingChunks,
  BuildingTree,
  LocatingPoints,
  ClearingEmptyChunks,
  GroupingCollisions,
  ChoosingBestCollision,
  ClassifyingRemainingPoints,
  ApplyingProperties,
  Done,
}

impl Stage {
  /// Human-readable label.
  pub fn label(self) -> &'static str {
    match self {
      Stage::PackingPoints => "Packing points",
      Stage::CreatingChunks => "Creating chunks",
      Stage::BuildingTree => "Building tree",
      Stage::LocatingPoints => "Locating points",
      Stage::ClearingEmptyChunks => "Clearing empty chunks",
      Stage::GroupingCollisions => "Grouping collisions",
      Stage::ChoosingBestCollision => "Choosing best collision",
      Stage::ClassifyingRemainingPoints => "Classifying remaining points",
      Stage::ApplyingProperties => "Applying properties",
      Stage::Done => "done",
    }
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// One progress update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
  pub stage: Stage,
  /// Items in this stage, 0 when unknown.
  pub total: usize,
  /// Items finished so far.
  pub done: usize,
}

/// Receiver of progress updates.
pub trait ProgressSink: Sync {
  fn report(&self, progress: Progress);

  /// Shorthand for [`ProgressSink::report`].
  fn stage(&self, stage: Stage, total: usize, done: usize) {
    self.report(Progress { stage, total, done });
  }
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
  fn report(&self, _progress: Progress) {}
}

/// Logs every update as a `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
  fn report(&self, progress: Progress) {
    info!(
      stage = progress.stage.label(),
      total = progress.total,
      done = progress.done,
      "progress"
    );
  }
}

/// Forwards updates to a monitor thread over a channel.
///
/// Sending never blocks. Updates are dropped once the receiver is gone.
#[derive(Clone, Debug)]
pub struct ChannelProgress {
  sender: Sender<Progress>,
}

impl ChannelProgress {
  /// Create a sink and the receiving end for the monitor.
  pub fn new() -> (Self, Receiver<Progress>) {
    let (sender, receiver) = channel::unbounded();
    (Self { sender }, receiver)
  }
}

impl ProgressSink for ChannelProgress {
  fn report(&self, progress: Progress) {
    let _ = self.sender.send(progress);
  }
}
