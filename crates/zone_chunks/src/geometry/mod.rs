//! Vector and box math.
//!
//! - [`AxisAlignedBox`]: min/max box used for object extents and overlap regions.
//! - [`OrientedBox`]: chunk, zone and object volume with an id.
//! - [`wireframe`]: edge lists and depth palette for renderers.

mod bounds;
mod obb;
pub mod wireframe;

pub use bounds::AxisAlignedBox;
pub use obb::OrientedBox;
pub use wireframe::{depth_color, BOX_EDGES};
