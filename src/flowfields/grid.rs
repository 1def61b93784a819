//! The geometry of the playable area.
//!
//! The world is divided into square cells of `cell_size` world units. A cell
//! is addressed by a grid coordinate ([IVec2]) where grid `(0, 0)` spans world
//! `[0, cell_size)` on both axes. The playable bounds are a rectangle of grid
//! coordinates starting at `offset`, the fields of the engine are sized to the
//! bounds and indexed by [FieldCell] (the grid coordinate minus `offset`).
//!
//! ```text
//!  grid y
//!    ^      ___________
//!    |     |__|__|__|__|   <- bounds, local (0, 0) is the bottom-left cell
//!    |     |__|__|__|__|      and sits at grid coordinate `offset`
//!    |     o
//!    +----------------> grid x
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The dimensions and placement of the playable grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
	/// Grid coordinate of the bottom-left cell of the bounds
	offset: IVec2,
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Length of a cell side in world units
	cell_size: f32,
}

impl GridGeometry {
	/// Create a new instance of [GridGeometry]. Bounds with no area or a
	/// non-positive `cell_size` cannot support any fields and so panic
	pub fn new(offset: IVec2, width: usize, height: usize, cell_size: f32) -> Self {
		if width == 0 || height == 0 {
			panic!(
				"Grid dimensions `({}, {})` cannot support fields, both must be non-zero",
				width, height
			);
		}
		if cell_size <= 0.0 {
			panic!("Cell size must be positive, found {}", cell_size);
		}
		GridGeometry {
			offset,
			width,
			height,
			cell_size,
		}
	}
	/// Create a [GridGeometry] spanning the grid coordinates `min` to `max`
	/// inclusive
	pub fn from_bounds(min: IVec2, max: IVec2, cell_size: f32) -> Self {
		if max.x < min.x || max.y < min.y {
			panic!("Grid bounds max {} lies below min {}", max, min);
		}
		let size = max - min + IVec2::ONE;
		GridGeometry::new(min, size.x as usize, size.y as usize, cell_size)
	}
	/// Get the grid coordinate of the bottom-left cell
	pub fn get_offset(&self) -> IVec2 {
		self.offset
	}
	/// Get the number of columns
	pub fn get_width(&self) -> usize {
		self.width
	}
	/// Get the number of rows
	pub fn get_height(&self) -> usize {
		self.height
	}
	/// Get the size of a cell in world units
	pub fn get_cell_size(&self) -> f32 {
		self.cell_size
	}
	/// Number of cells within the bounds
	pub fn get_cell_count(&self) -> usize {
		self.width * self.height
	}
	/// Whether the grid coordinate lies within the bounds
	pub fn contains(&self, cell: IVec2) -> bool {
		self.to_local(cell).is_some()
	}
	/// The grid coordinate of the cell containing a world position. Positions
	/// outside of the bounds still map to a cell, check them with
	/// [GridGeometry::contains]
	pub fn world_to_cell(&self, position: Vec2) -> IVec2 {
		(position / self.cell_size).floor().as_ivec2()
	}
	/// The world position of the centre of a cell
	pub fn cell_to_world(&self, cell: IVec2) -> Vec2 {
		(cell.as_vec2() + Vec2::splat(0.5)) * self.cell_size
	}
	/// Convert a grid coordinate into a [FieldCell], [None] if it lies outside
	/// of the bounds
	pub fn to_local(&self, cell: IVec2) -> Option<FieldCell> {
		let local = cell - self.offset;
		if local.x < 0 || local.y < 0 {
			return None;
		}
		let (column, row) = (local.x as usize, local.y as usize);
		if column < self.width && row < self.height {
			Some(FieldCell::new(column, row))
		} else {
			None
		}
	}
	/// Convert a [FieldCell] back into a grid coordinate
	pub fn to_grid(&self, field_cell: FieldCell) -> IVec2 {
		self.offset + IVec2::new(field_cell.get_column() as i32, field_cell.get_row() as i32)
	}
	/// The [FieldCell] under a world position, [None] if it lies outside of
	/// the bounds
	pub fn world_to_local(&self, position: Vec2) -> Option<FieldCell> {
		self.to_local(self.world_to_cell(position))
	}
}
