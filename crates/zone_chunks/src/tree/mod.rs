//! Hierarchical chunk trees.
//!
//! - [`build_tree`]: bottom-up agglomeration of grid leaves into one root.
//! - [`subdivide_tree`]: top-down quad subdivision of a root volume.
//!
//! Both produce an owned [`ChunkNode`] tree. A tree is built once per run
//! and queried read-only afterwards.

mod builder;
mod grid;
mod node;
mod subdivide;

pub use builder::build_tree;
pub use node::{ChunkNode, PreOrder};
pub use subdivide::subdivide_tree;
