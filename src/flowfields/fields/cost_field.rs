//! The CostField contains a 2D array of 32-bit float values. The values
//! correspond to the cost of entering that cell. A value of `1.0` is the
//! cheapest open ground, [IMPASSABLE] is a special case that indicates that
//! the field cell is strictly forbidden from being used in a pathing
//! calculation (water, ore deposits). Any other value indicates a harder cost
//! of movement which could be rough terrain or a structure that an actor has
//! to smash its way through.
//!
//! Every [MovementClass] has a [CostField] associated with it, rebuilt in full
//! from the [CostModel] whenever the flow fields are recomputed. An example
//! cost field with a wall (`20`-`40`, scaled by health) and a lake (`X`):
//!
//! ```text
//!  _______________________________________
//! |     |     |     |     |     |     |     |
//! |  1  |  1  |  1  | 40  |  1  |  1  |  1  |
//! |_____|_____|_____|_____|_____|_____|_____|
//! |     |     |     |     |     |     |     |
//! |  1  |  1  |  1  | 22  |  1  |  X  |  X  |
//! |_____|_____|_____|_____|_____|_____|_____|
//! |     |     |     |     |     |     |     |
//! |  1  |  1  |  1  | 40  |  1  |  X  |  X  |
//! |_____|_____|_____|_____|_____|_____|_____|
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Traversal cost of every cell in the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug)]
pub struct CostField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major cell costs
	values: Vec<f32>,
}

impl Field<f32> for CostField {
	fn get(&self) -> &[f32] {
		&self.values
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	fn get_field_cell_value(&self, field_cell: FieldCell) -> f32 {
		self.values[field_index("CostField", self.width, self.height, field_cell)]
	}
	fn set_field_cell_value(&mut self, value: f32, field_cell: FieldCell) {
		let index = field_index("CostField", self.width, self.height, field_cell);
		self.values[index] = value;
	}
}

impl CostField {
	/// Create a [CostField] where every cell costs `1.0`
	pub fn new(width: usize, height: usize) -> Self {
		CostField {
			width,
			height,
			values: vec![1.0; width * height],
		}
	}
	/// Whether an actor may enter the cell at all
	pub fn is_traversable(&self, field_cell: FieldCell) -> bool {
		self.get_field_cell_value(field_cell) != IMPASSABLE
	}
	/// Overwrite every cell with the value produced by `cost_of`
	pub fn rebuild(&mut self, mut cost_of: impl FnMut(FieldCell) -> f32) {
		for row in 0..self.height {
			for column in 0..self.width {
				self.values[row * self.width + column] = cost_of(FieldCell::new(column, row));
			}
		}
	}
	/// Whether moving from `source` to the adjacent `target` in direction
	/// `ordinal` is allowed. Diagonal moves are refused when either flanking
	/// cardinal is impassable so that actors never slice through the corner
	/// of an obstacle:
	///
	/// ```text
	///   X t  <- t cannot be reached from s
	///   s X
	/// ```
	pub fn can_step(&self, source: FieldCell, ordinal: Ordinal, target: FieldCell) -> bool {
		if !self.is_traversable(target) {
			return false;
		}
		if let Some((a, b)) = ordinal.flanking_cardinals() {
			for flank in [a, b] {
				match source.step(flank, self.width, self.height) {
					Some(cell) if self.is_traversable(cell) => {}
					_ => return false,
				}
			}
		}
		true
	}
	/// Tests whether two cells can see each other, every cell along the
	/// rasterised line must be traversable and no diagonal step of the line
	/// may cut the corner of an impassable cell
	pub fn has_line_of_sight(&self, source: FieldCell, target: FieldCell) -> bool {
		let line = source.get_cells_between_points(&target);
		if !line.iter().all(|cell| self.is_traversable(*cell)) {
			return false;
		}
		line.windows(2).all(|pair| {
			let (from, to) = (pair[0], pair[1]);
			let ordinal = Ordinal::cell_to_cell_direction(
				IVec2::new(to.get_column() as i32, to.get_row() as i32),
				IVec2::new(from.get_column() as i32, from.get_row() as i32),
			);
			self.can_step(from, ordinal, to)
		})
	}
}
