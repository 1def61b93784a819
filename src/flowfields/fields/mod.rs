//! The kinds of fields used by the algorithm
//!

pub mod cost_field;
pub mod flow_field;
pub mod integration_field;

use crate::prelude::*;
use bevy::prelude::*;

/// Defines required access to field arrays
pub trait Field<T: Copy> {
	/// Get a reference to the flat, row-major, field array
	fn get(&self) -> &[T];
	/// Get the `(width, height)` of the field
	fn get_dimensions(&self) -> (usize, usize);
	/// Retrieve a field cell value
	fn get_field_cell_value(&self, field_cell: FieldCell) -> T;
	/// Set a field cell to a value
	fn set_field_cell_value(&mut self, value: T, field_cell: FieldCell);
	/// Whether the field cell sits within the field
	fn contains(&self, field_cell: FieldCell) -> bool {
		let (width, height) = self.get_dimensions();
		field_cell.get_column() < width && field_cell.get_row() < height
	}
}

/// Convert a [FieldCell] into an index of a flat field array. Asking for a
/// cell outside of the field is a programming error and so panics
pub(crate) fn field_index(
	field_name: &str,
	width: usize,
	height: usize,
	field_cell: FieldCell,
) -> usize {
	if field_cell.get_column() >= width || field_cell.get_row() >= height {
		panic!(
			"Cannot access a {} value, index out of bounds. Asked for column {}, row {}, field width is {}, field height is {}",
			field_name,
			field_cell.get_column(),
			field_cell.get_row(),
			width,
			height
		)
	}
	field_cell.get_row() * width + field_cell.get_column()
}

/// ID of a cell within a field, measured from the bottom-left corner of the
/// playable bounds. A [FieldCell] is a grid coordinate with the bounds offset
/// removed, see [GridGeometry::to_local]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct FieldCell((usize, usize));

impl FieldCell {
	/// Create a new instance of [FieldCell]
	pub fn new(column: usize, row: usize) -> Self {
		FieldCell((column, row))
	}
	/// Get the `(column, row)` tuple
	pub fn get_column_row(&self) -> (usize, usize) {
		self.0
	}
	/// Get the column
	pub fn get_column(&self) -> usize {
		self.0 .0
	}
	/// Get the row
	pub fn get_row(&self) -> usize {
		self.0 .1
	}
	/// The neighbouring cell in the direction of `ordinal`, or [None] if it
	/// would fall outside of a `width` by `height` field
	pub fn step(&self, ordinal: Ordinal, width: usize, height: usize) -> Option<FieldCell> {
		let offset = ordinal.offset();
		let column = self.get_column() as i64 + offset.x as i64;
		let row = self.get_row() as i64 + offset.y as i64;
		if column < 0 || row < 0 || column >= width as i64 || row >= height as i64 {
			None
		} else {
			Some(FieldCell::new(column as usize, row as usize))
		}
	}
	/// All neighbours (cardinals first, then diagonals) which sit inside a
	/// `width` by `height` field, paired with the direction to reach them
	pub fn neighbours(
		self,
		width: usize,
		height: usize,
	) -> impl Iterator<Item = (Ordinal, FieldCell)> {
		Ordinal::ALL
			.into_iter()
			.filter_map(move |ord| self.step(ord, width, height).map(|cell| (ord, cell)))
	}
	/// Using the Bresenham line algorithm get a list of [FieldCell] that lie
	/// along a line between two points, ordered from `self` to `target`
	/// inclusive
	pub fn get_cells_between_points(&self, target: &FieldCell) -> Vec<FieldCell> {
		let mut column = self.get_column() as i64;
		let mut row = self.get_row() as i64;
		let target_column = target.get_column() as i64;
		let target_row = target.get_row() as i64;

		let delta_column = (target_column - column).abs();
		let delta_row = -(target_row - row).abs();
		let column_increment = if column < target_column { 1 } else { -1 };
		let row_increment = if row < target_row { 1 } else { -1 };
		// error bound indicating which of the axes to step along next
		let mut difference = delta_column + delta_row;

		let mut cells = Vec::with_capacity((delta_column - delta_row) as usize + 1);
		loop {
			cells.push(FieldCell::new(column as usize, row as usize));
			if column == target_column && row == target_row {
				break;
			}
			let doubled = 2 * difference;
			if doubled >= delta_row {
				difference += delta_row;
				column += column_increment;
			}
			if doubled <= delta_column {
				difference += delta_column;
				row += row_increment;
			}
		}
		cells
	}
}

/// The cost, integration and flow fields of a single [MovementClass]
pub struct FlowFieldData {
	/// Traversal cost of each cell
	cost_field: CostField,
	/// Accumulated cost from each cell to the target
	integration_field: IntegrationField,
	/// Direction of travel from each cell
	flow_field: FlowField,
}

impl FlowFieldData {
	/// Allocate the three fields for a `width` by `height` grid
	pub fn new(width: usize, height: usize) -> Self {
		FlowFieldData {
			cost_field: CostField::new(width, height),
			integration_field: IntegrationField::new(width, height),
			flow_field: FlowField::new(width, height),
		}
	}
	/// Get the [CostField]
	pub fn get_cost_field(&self) -> &CostField {
		&self.cost_field
	}
	/// Get a mutable reference to the [CostField]
	pub fn get_cost_field_mut(&mut self) -> &mut CostField {
		&mut self.cost_field
	}
	/// Get the [IntegrationField]
	pub fn get_integration_field(&self) -> &IntegrationField {
		&self.integration_field
	}
	/// Get the [FlowField]
	pub fn get_flow_field(&self) -> &FlowField {
		&self.flow_field
	}
	/// Propagate integration costs out from `target` over the current
	/// [CostField] and derive the [FlowField] from them. Returns the number of
	/// cells reached
	pub fn integrate_and_derive(&mut self, target: FieldCell) -> usize {
		self.integration_field.reset(target);
		let reached = self
			.integration_field
			.calculate_field(target, &self.cost_field);
		self.flow_field.calculate(&self.integration_field);
		reached
	}
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn field_cell_line_horizontal() {
		let source = FieldCell::new(3, 4);
		let target = FieldCell::new(6, 4);
		let result = source.get_cells_between_points(&target);
		let actual = vec![FieldCell::new(3, 4), FieldCell::new(4, 4), FieldCell::new(5, 4), FieldCell::new(6, 4)];
		assert_eq!(actual, result);
	}
	#[test]
	fn field_cell_line_vertical_reverse() {
		let source = FieldCell::new(3, 7);
		let target = FieldCell::new(3, 4);
		let result = source.get_cells_between_points(&target);
		let actual = vec![FieldCell::new(3, 7), FieldCell::new(3, 6), FieldCell::new(3, 5), FieldCell::new(3, 4)];
		assert_eq!(actual, result);
	}
	#[test]
	fn field_cell_line_diagonal() {
		let source = FieldCell::new(0, 0);
		let target = FieldCell::new(3, 3);
		let result = source.get_cells_between_points(&target);
		let actual = vec![FieldCell::new(0, 0), FieldCell::new(1, 1), FieldCell::new(2, 2), FieldCell::new(3, 3)];
		assert_eq!(actual, result);
	}
	#[test]
	fn field_cell_line_shallow() {
		let source = FieldCell::new(0, 0);
		let target = FieldCell::new(4, 2);
		let result = source.get_cells_between_points(&target);
		let actual = vec![FieldCell::new(0, 0), FieldCell::new(1, 1), FieldCell::new(2, 1), FieldCell::new(3, 2), FieldCell::new(4, 2)];
		assert_eq!(actual, result);
	}
	#[test]
	fn field_cell_line_zero() {
		let source = FieldCell::new(3, 4);
		let result = source.get_cells_between_points(&source);
		assert_eq!(vec![FieldCell::new(3, 4)], result);
	}
	#[test]
	fn neighbours_of_corner() {
		let cell = FieldCell::new(0, 0);
		let result: Vec<(Ordinal, FieldCell)> = cell.neighbours(5, 5).collect();
		let actual = vec![
			(Ordinal::North, FieldCell::new(0, 1)),
			(Ordinal::East, FieldCell::new(1, 0)),
			(Ordinal::NorthEast, FieldCell::new(1, 1)),
		];
		assert_eq!(actual, result);
	}
	#[test]
	fn neighbours_of_centre() {
		let cell = FieldCell::new(2, 2);
		assert_eq!(8, cell.neighbours(5, 5).count());
	}
	#[test]
	#[should_panic]
	fn index_out_of_bounds() {
		field_index("CostField", 4, 4, FieldCell::new(4, 0));
	}
}
