//! Regular grid partitioning of a root volume into leaf chunks.
//!
//! Two partitioners are provided:
//! - [`partition`]: oriented cells of a fixed size laid out along the root
//!   axes, with boundary cells clipped to the root.
//! - [`divide_bounds`]: equal axis-aligned boxes for a fixed division count.

use glam::DVec3;
use tracing::debug;

use crate::codec::PackedBox;
use crate::constants::MAX_GRID_CELLS;
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::{AxisAlignedBox, OrientedBox};
use crate::types::ChunkId;

/// Number of cells needed along each axis to cover `extents` with `cell_size`.
#[inline]
pub fn grid_divisions(extents: DVec3, cell_size: DVec3) -> [usize; 3] {
  let div = (extents * 2.0 / cell_size).ceil();
  [div.x as usize, div.y as usize, div.z as usize]
}

/// Checked cell count of a `x × y × z` grid.
fn cell_count(x: usize, y: usize, z: usize) -> ChunkResult<usize> {
  x.checked_mul(y)
    .and_then(|xy| xy.checked_mul(z))
    .filter(|&count| count <= MAX_GRID_CELLS)
    .ok_or(ChunkError::TooManyCells {
      x,
      y,
      z,
      limit: MAX_GRID_CELLS,
    })
}

/// Split `root` into a grid of cells of `cell_size` along its own axes.
///
/// Cells start at the root's minus-extent corner. A cell reaching past the
/// root is clipped to it and re-centered on the clipped span, so the cells
/// tile the root without gaps or overflow. Cells whose clipped extent is not
/// strictly positive on every axis are dropped. Boundary cells are not kept
/// at the `(i + 0.5) * size` grid center with only their extent shrunk.
///
/// Ids run from 0 in `i`, `j`, `k` nesting order (X outermost) over the
/// emitted cells. Every cell inherits the root axes. Grids with more than
/// [`MAX_GRID_CELLS`] cells are rejected.
#[tracing::instrument(skip_all, name = "partition::grid")]
pub fn partition(root: &OrientedBox, cell_size: DVec3) -> ChunkResult<Vec<OrientedBox>> {
  if !cell_size.cmpgt(DVec3::ZERO).all() {
    return Err(ChunkError::InvalidCellSize(cell_size));
  }

  let [div_x, div_y, div_z] = grid_divisions(root.extents, cell_size);
  let count = cell_count(div_x, div_y, div_z)?;
  debug!(div_x, div_y, div_z, "partition grid");

  let ext = root.extents;
  let axes = *root.axes();
  let mut cells = Vec::with_capacity(count);
  let mut next_id: ChunkId = 0;

  for i in 0..div_x {
    for j in 0..div_y {
      for k in 0..div_z {
        let index = DVec3::new(i as f64, j as f64, k as f64);
        let lo = -ext + index * cell_size;
        let hi = (-ext + (index + 1.0) * cell_size).min(ext);
        let half = (hi - lo) * 0.5;
        if !half.cmpgt(DVec3::ZERO).all() {
          continue;
        }

        let center = root.to_world((lo + hi) * 0.5);
        cells.push(OrientedBox::from_trusted_parts(next_id, center, axes, half));
        next_id += 1;
      }
    }
  }

  debug!(cells = cells.len(), "partition done");
  Ok(cells)
}

/// Split an axis-aligned box into `x_div × y_div × z_div` equal boxes.
///
/// The box is normalized first. Ids count from 0 with X outermost and are
/// stored in one byte, so they wrap past 255.
pub fn divide_bounds(
  bounds: &AxisAlignedBox,
  x_div: u32,
  y_div: u32,
  z_div: u32,
) -> ChunkResult<Vec<PackedBox>> {
  if x_div == 0 || y_div == 0 || z_div == 0 {
    return Err(ChunkError::InvalidDivisions {
      x: x_div,
      y: y_div,
      z: z_div,
    });
  }

  let count = cell_count(x_div as usize, y_div as usize, z_div as usize)?;
  let bounds = AxisAlignedBox::normalized(bounds.min, bounds.max);
  let size = bounds.size() / DVec3::new(x_div as f64, y_div as f64, z_div as f64);
  let mut boxes = Vec::with_capacity(count);

  for i in 0..x_div {
    for j in 0..y_div {
      for k in 0..z_div {
        let min = bounds.min + DVec3::new(i as f64, j as f64, k as f64) * size;
        boxes.push(PackedBox {
          id: boxes.len() as u8,
          bounds: AxisAlignedBox::new(min, min + size),
        });
      }
    }
  }

  Ok(boxes)
}

#[cfg(test)]
#[path = "partition_test.rs"]
mod partition_test;
