//! The IntegrationField contains a 2D array of 32-bit float values and it uses
//! a [CostField] to produce a cumulative cost of reaching the target.
//!
//! When a new target is processed the field is reset to [IMPASSABLE] and the
//! cell containing the target is set to `0`. The field is then calculated as a
//! single-source shortest path (Dijkstra) over the 8 neighbours of each cell:
//!
//! 1. The cheapest unvisited cell is popped from the frontier (at the
//!    beginning this is the target)
//! 2. For each neighbour lookup its `CostField` value, scaling it by `√2` when
//!    the neighbour is diagonal
//! 3. Add that to the integration cost of the current cell, if it beats the
//!    neighbour's current integration cost then store it and push the
//!    neighbour onto the frontier
//! 4. Repeat until the frontier is empty
//!
//! Over a uniform `CostField` of `1` this produces octile distances from the
//! target (`d` rounded to one decimal place):
//!
//! ```text
//!  _______________________________
//! |     |     |     |     |     |
//! | 2.8 | 2.4 | 2.0 | 2.4 | 2.8 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 2.4 | 1.4 | 1.0 | 1.4 | 2.4 |
//! |_____|_____|_____|_____|_____|
//! |     |     |     |     |     |
//! | 2.0 | 1.0 |  0  | 1.0 | 2.0 |
//! |_____|_____|_____|_____|_____|
//! ```
//!
//! Cells marked [IMPASSABLE] in the `CostField` are never entered so the wave
//! flows around them and any cell the wave cannot reach keeps [IMPASSABLE].
//! Expensive cells (damaged walls, intact buildings) are entered but the wave
//! arrives late, which encourages actors around them where a cheaper route
//! exists.
//!

use std::{cmp::Ordering, collections::BinaryHeap};

use crate::prelude::*;

/// Accumulated cost from every cell to the target
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug)]
pub struct IntegrationField {
	/// Number of columns
	width: usize,
	/// Number of rows
	height: usize,
	/// Row-major integration costs
	values: Vec<f32>,
}

impl Field<f32> for IntegrationField {
	fn get(&self) -> &[f32] {
		&self.values
	}
	fn get_dimensions(&self) -> (usize, usize) {
		(self.width, self.height)
	}
	fn get_field_cell_value(&self, field_cell: FieldCell) -> f32 {
		self.values[field_index("IntegrationField", self.width, self.height, field_cell)]
	}
	fn set_field_cell_value(&mut self, value: f32, field_cell: FieldCell) {
		let index = field_index("IntegrationField", self.width, self.height, field_cell);
		self.values[index] = value;
	}
}

/// An entry of the Dijkstra frontier, ordered so that the cheapest entry sits
/// at the top of a [BinaryHeap]
#[derive(Clone, Copy, Debug)]
struct Frontier {
	/// Integration cost at the time of pushing
	cost: f32,
	/// The cell being expanded
	cell: FieldCell,
}

impl PartialEq for Frontier {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Frontier {}

impl Ord for Frontier {
	fn cmp(&self, other: &Self) -> Ordering {
		// reversed for a min-heap, ties settled on the cell for determinism
		other
			.cost
			.total_cmp(&self.cost)
			.then_with(|| other.cell.cmp(&self.cell))
	}
}

impl PartialOrd for Frontier {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl IntegrationField {
	/// Creates a new [IntegrationField] where all cells are set to [IMPASSABLE]
	pub fn new(width: usize, height: usize) -> Self {
		IntegrationField {
			width,
			height,
			values: vec![IMPASSABLE; width * height],
		}
	}
	/// Reset all the cells of the [IntegrationField] to [IMPASSABLE] apart
	/// from the `target` which is the starting point of calculating the field
	/// and is set to `0`
	pub fn reset(&mut self, target: FieldCell) {
		self.values.fill(IMPASSABLE);
		self.set_field_cell_value(0.0, target);
	}
	/// Whether the propagation reached the cell
	pub fn is_reached(&self, field_cell: FieldCell) -> bool {
		self.get_field_cell_value(field_cell) != IMPASSABLE
	}
	/// Propagate costs from the `target` across the `cost_field`. Returns the
	/// number of cells which were settled
	pub fn calculate_field(&mut self, target: FieldCell, cost_field: &CostField) -> usize {
		let mut settled = vec![false; self.values.len()];
		let mut settled_count = 0;
		let mut queue = BinaryHeap::new();
		queue.push(Frontier {
			cost: self.get_field_cell_value(target),
			cell: target,
		});
		while let Some(Frontier { cost, cell }) = queue.pop() {
			let index = cell.get_row() * self.width + cell.get_column();
			// a cheaper entry for this cell has already been processed
			if settled[index] {
				continue;
			}
			settled[index] = true;
			settled_count += 1;
			for (ordinal, neighbour) in cell.neighbours(self.width, self.height) {
				let n_index = neighbour.get_row() * self.width + neighbour.get_column();
				if settled[n_index] {
					continue;
				}
				let cell_cost = cost_field.get_field_cell_value(neighbour);
				// ignore impassable cells
				if cell_cost == IMPASSABLE {
					continue;
				}
				let int_cost = cost + cell_cost * ordinal.step_factor();
				if int_cost < self.values[n_index] {
					self.values[n_index] = int_cost;
					queue.push(Frontier {
						cost: int_cost,
						cell: neighbour,
					});
				}
			}
		}
		settled_count
	}
}
