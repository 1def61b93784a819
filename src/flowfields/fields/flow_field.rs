//! A [FlowField] is a 2D array of unit vectors. Each vector points from a
//! cell towards whichever of its 8 neighbours has the lowest
//! [IntegrationField] value, provided that neighbour is cheaper than the cell
//! itself. A steering pipeline/character controller should read and
//! interpret a [FlowField] to provide movement.
//!
//! Cells with no cheaper neighbour (the target, unreached cells, isolated
//! local minima) hold [Vec2::ZERO]; [crate::prelude::FlowFieldEngine::query]
//! falls back to an escape heuristic for those.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Direction of travel from every cell of the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug)]
pub struct FlowField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major unit directions
	values: Vec<Vec2>,
}

impl Field<Vec2> for FlowField {
	fn get(&self) -> &[Vec2] {
		&self.values
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	fn get_field_cell_value(&self, field_cell: FieldCell) -> Vec2 {
		self.values[field_index("FlowField", self.width, self.height, field_cell)]
	}
	fn set_field_cell_value(&mut self, value: Vec2, field_cell: FieldCell) {
		let index = field_index("FlowField", self.width, self.height, field_cell);
		self.values[index] = value;
	}
}

impl FlowField {
	/// Create a [FlowField] with no directions
	pub fn new(width: usize, height: usize) -> Self {
		FlowField {
			width,
			height,
			values: vec![Vec2::ZERO; width * height],
		}
	}
	/// The [Ordinal] which a cell points along, [Ordinal::Zero] when it has no
	/// direction
	pub fn get_field_cell_ordinal(&self, field_cell: FieldCell) -> Ordinal {
		Ordinal::from_direction(self.get_field_cell_value(field_cell))
	}
	/// Calculate the [FlowField] from an [IntegrationField]
	pub fn calculate(&mut self, integration_field: &IntegrationField) {
		for row in 0..self.height {
			for column in 0..self.width {
				let field_cell = FieldCell::new(column, row);
				let direction = match cheapest_neighbour(field_cell, integration_field) {
					Some((ordinal, _)) => ordinal.to_vec2(),
					None => Vec2::ZERO,
				};
				self.values[row * self.width + column] = direction;
			}
		}
	}
}

/// Find the neighbour of `field_cell` with the strictly lowest integration
/// cost, provided it is also cheaper than `field_cell` itself. Unreached cells
/// never have a cheapest neighbour
pub fn cheapest_neighbour(
	field_cell: FieldCell,
	integration_field: &IntegrationField,
) -> Option<(Ordinal, FieldCell)> {
	let current_cost = integration_field.get_field_cell_value(field_cell);
	if current_cost == IMPASSABLE {
		return None;
	}
	let (width, height) = integration_field.get_dimensions();
	let mut cheapest_value = current_cost;
	let mut cheapest_neighbour = None;
	for (ordinal, neighbour) in field_cell.neighbours(width, height) {
		let neighbour_cost = integration_field.get_field_cell_value(neighbour);
		if neighbour_cost < cheapest_value {
			cheapest_value = neighbour_cost;
			cheapest_neighbour = Some((ordinal, neighbour));
		}
	}
	cheapest_neighbour
}

#[cfg(test)]
mod tests {
	use super::*;

	fn build(cost_field: &CostField, target: FieldCell) -> (IntegrationField, FlowField) {
		let (width, height) = cost_field.get_dimensions();
		let mut int_field = IntegrationField::new(width, height);
		int_field.reset(target);
		int_field.calculate_field(target, cost_field);
		let mut flow_field = FlowField::new(width, height);
		flow_field.calculate(&int_field);
		(int_field, flow_field)
	}

	#[test]
	fn open_field_points_at_target() {
		let cost_field = CostField::new(5, 5);
		let (_, flow_field) = build(&cost_field, FieldCell::new(2, 2));
		assert_eq!(
			Ordinal::East,
			flow_field.get_field_cell_ordinal(FieldCell::new(0, 2))
		);
		assert_eq!(
			Ordinal::SouthWest,
			flow_field.get_field_cell_ordinal(FieldCell::new(4, 4))
		);
		assert_eq!(
			Ordinal::North,
			flow_field.get_field_cell_ordinal(FieldCell::new(2, 0))
		);
	}
	#[test]
	fn target_has_no_direction() {
		let cost_field = CostField::new(5, 5);
		let (_, flow_field) = build(&cost_field, FieldCell::new(2, 2));
		assert_eq!(Vec2::ZERO, flow_field.get_field_cell_value(FieldCell::new(2, 2)));
	}
	#[test]
	fn impassable_has_no_direction() {
		let mut cost_field = CostField::new(5, 5);
		cost_field.set_field_cell_value(IMPASSABLE, FieldCell::new(1, 1));
		let (_, flow_field) = build(&cost_field, FieldCell::new(4, 4));
		assert_eq!(Vec2::ZERO, flow_field.get_field_cell_value(FieldCell::new(1, 1)));
	}
	#[test]
	fn directions_are_unit_length() {
		let cost_field = CostField::new(6, 6);
		let (_, flow_field) = build(&cost_field, FieldCell::new(1, 4));
		for direction in flow_field.get() {
			if *direction != Vec2::ZERO {
				assert!((direction.length() - 1.0).abs() < 1e-5);
			}
		}
	}
	#[test]
	fn following_directions_descends_to_target() {
		//  ___________________
		// |__|__|__|__|__|__|
		// |__|X_|X_|X_|X_|__|
		// |__|__|__|__|X_|t_|
		// |__|X_|50|__|X_|__|
		// |__|X_|__|__|__|__|
		// |s_|X_|__|__|X_|__|
		let mut cost_field = CostField::new(6, 6);
		for (column, row) in [(1, 0), (1, 1), (1, 2), (4, 0), (4, 2), (4, 3), (1, 4), (2, 4), (3, 4), (4, 4)] {
			cost_field.set_field_cell_value(IMPASSABLE, FieldCell::new(column, row));
		}
		cost_field.set_field_cell_value(50.0, FieldCell::new(2, 2));
		let target = FieldCell::new(5, 3);
		let (int_field, flow_field) = build(&cost_field, target);
		for row in 0..6 {
			for column in 0..6 {
				let mut cell = FieldCell::new(column, row);
				if !int_field.is_reached(cell) {
					continue;
				}
				let mut steps = 0;
				while cell != target {
					let ordinal = flow_field.get_field_cell_ordinal(cell);
					assert_ne!(Ordinal::Zero, ordinal, "stalled at {:?}", cell);
					let next = cell.step(ordinal, 6, 6).unwrap();
					assert!(
						int_field.get_field_cell_value(next) < int_field.get_field_cell_value(cell)
					);
					cell = next;
					steps += 1;
					assert!(steps < 36);
				}
			}
		}
	}
}
