//! A point-to-point A* search for single actors which need a route that is
//! independent of the shared flow field (scouts, builders, scripted moves).
//!
//! The search runs over a snapshot of ground costs. Nodes are expanded in
//! order of `f = g + h` with ties going to the node closer to the goal (lower
//! `h`), where `g` is the accumulated cost of the cells entered (diagonal
//! entries scaled by `√2`) and `h` is the octile distance to the goal
//! (Manhattan when diagonals are disabled).
//!
//! A diagonal step is only taken when both of the cardinals it passes between
//! are traversable, so a route never slices through the corner of a blocked
//! cell:
//!
//! ```text
//!  ___________
//! |__|__|g_|__|     s -> g diagonally is refused, the route
//! |__|s_|X_|__|     goes around via the cell north of s
//! |__|__|__|__|
//! ```
//!
//! Once found the route can be smoothed, from each waypoint every later
//! waypoint it can see in a straight line is skipped over.
//!

use std::{cmp::Ordering, collections::BinaryHeap};

use bevy::prelude::*;

use crate::prelude::*;

/// Frontier entry of the search, the lowest `f` then lowest `h` sits at the top
/// of a [BinaryHeap]
#[derive(Clone, Copy, Debug)]
struct Node {
	/// Estimated total cost through this node
	f: f32,
	/// Estimated remaining cost to the goal
	h: f32,
	/// Cell being expanded
	cell: FieldCell,
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Node {}

impl Ord for Node {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.f
			.total_cmp(&self.f)
			.then_with(|| other.h.total_cmp(&self.h))
			.then_with(|| other.cell.cmp(&self.cell))
	}
}

impl PartialOrd for Node {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// A* search over a snapshot of ground traversal costs
pub struct PointToPointSearch<'a> {
	/// Bounds of the grid
	geometry: &'a GridGeometry,
	/// Ground cost of every cell in the bounds
	cost_field: CostField,
	/// Diagonal movement, budget and smoothing
	config: &'a SearchConfig,
}

impl<'a> PointToPointSearch<'a> {
	/// Snapshot the ground costs of the [CostModel] ready for searching
	pub fn new(cost_model: &CostModel<'a>, config: &'a SearchConfig) -> Self {
		PointToPointSearch {
			geometry: cost_model.get_geometry(),
			cost_field: cost_model.build_cost_field(MovementClass::Ground),
			config,
		}
	}
	/// Get the snapshot of ground costs being searched
	pub fn get_cost_field(&self) -> &CostField {
		&self.cost_field
	}
	/// Distance estimate between two cells
	fn heuristic(&self, a: FieldCell, b: FieldCell) -> f32 {
		let a = IVec2::new(a.get_column() as i32, a.get_row() as i32);
		let b = IVec2::new(b.get_column() as i32, b.get_row() as i32);
		if self.config.allow_diagonal {
			octile_distance(a, b)
		} else {
			manhattan_distance(a, b)
		}
	}
	/// Find a route from `start` to `goal` inclusive, smoothed when the
	/// [SearchConfig] asks for it. [None] when either end lies outside of the
	/// bounds, the goal cannot be stood on, no route exists or the iteration
	/// budget is exhausted
	pub fn find_path(&self, start: IVec2, goal: IVec2) -> Option<Vec<IVec2>> {
		let Some(start_cell) = self.geometry.to_local(start) else {
			error!("Path start {} is outside of the grid", start);
			return None;
		};
		let Some(goal_cell) = self.geometry.to_local(goal) else {
			error!("Path goal {} is outside of the grid", goal);
			return None;
		};
		if !self.cost_field.is_traversable(goal_cell) {
			debug!("Path goal {} is not traversable", goal);
			return None;
		}
		let route = self.search(start_cell, goal_cell)?;
		let path: Vec<IVec2> = route
			.into_iter()
			.map(|cell| self.geometry.to_grid(cell))
			.collect();
		if self.config.smooth {
			Some(self.smooth_path(&path))
		} else {
			Some(path)
		}
	}
	/// The A* expansion between two local cells
	fn search(&self, start: FieldCell, goal: FieldCell) -> Option<Vec<FieldCell>> {
		let (width, height) = self.cost_field.get_dimensions();
		let index = |cell: FieldCell| cell.get_row() * width + cell.get_column();
		let mut g_scores = vec![IMPASSABLE; width * height];
		let mut came_from: Vec<Option<FieldCell>> = vec![None; width * height];
		let mut closed = vec![false; width * height];
		let mut open = BinaryHeap::new();

		g_scores[index(start)] = 0.0;
		let h = self.heuristic(start, goal);
		open.push(Node { f: h, h, cell: start });

		let mut iterations = 0;
		while let Some(Node { cell, .. }) = open.pop() {
			if closed[index(cell)] {
				continue;
			}
			if cell == goal {
				let mut route = vec![goal];
				let mut current = goal;
				while let Some(previous) = came_from[index(current)] {
					route.push(previous);
					current = previous;
				}
				route.reverse();
				return Some(route);
			}
			iterations += 1;
			if iterations > self.config.max_iterations {
				warn!(
					"A* gave up after {} iterations searching from {:?} to {:?}",
					self.config.max_iterations,
					self.geometry.to_grid(start),
					self.geometry.to_grid(goal)
				);
				return None;
			}
			closed[index(cell)] = true;
			let g = g_scores[index(cell)];
			for (ordinal, neighbour) in cell.neighbours(width, height) {
				if ordinal.is_diagonal() && !self.config.allow_diagonal {
					continue;
				}
				if closed[index(neighbour)] || !self.cost_field.can_step(cell, ordinal, neighbour) {
					continue;
				}
				let tentative = g + self.cost_field.get_field_cell_value(neighbour) * ordinal.step_factor();
				if tentative < g_scores[index(neighbour)] {
					g_scores[index(neighbour)] = tentative;
					came_from[index(neighbour)] = Some(cell);
					let h = self.heuristic(neighbour, goal);
					open.push(Node {
						f: tentative + h,
						h,
						cell: neighbour,
					});
				}
			}
		}
		None
	}
	/// Remove redundant waypoints. From each anchor the farthest later
	/// waypoint with a clear line of sight becomes the next anchor, so
	/// smoothing an already smoothed path changes nothing. A shortcut may not
	/// cross a cell costlier than any the route it replaces passes through,
	/// the search went around a wall for a reason
	pub fn smooth_path(&self, path: &[IVec2]) -> Vec<IVec2> {
		if path.len() <= 2 {
			return path.to_vec();
		}
		let mut smoothed = vec![path[0]];
		let mut anchor = 0;
		while anchor < path.len() - 1 {
			// costliest cell walked from the anchor up to each later waypoint
			let mut ceilings = vec![0.0_f32; path.len()];
			for i in anchor + 1..path.len() {
				ceilings[i] = ceilings[i - 1].max(self.costliest_on_line(path[i - 1], path[i]));
			}
			let mut next = anchor + 1;
			for candidate in (anchor + 2..path.len()).rev() {
				if self.has_line_of_sight(path[anchor], path[candidate])
					&& self.costliest_on_line(path[anchor], path[candidate]) <= ceilings[candidate]
				{
					next = candidate;
					break;
				}
			}
			smoothed.push(path[next]);
			anchor = next;
		}
		smoothed
	}
	/// Cost of the most expensive cell on the straight line between two grid
	/// coordinates
	fn costliest_on_line(&self, from: IVec2, to: IVec2) -> f32 {
		match (self.geometry.to_local(from), self.geometry.to_local(to)) {
			(Some(from), Some(to)) => from
				.get_cells_between_points(&to)
				.iter()
				.map(|cell| self.cost_field.get_field_cell_value(*cell))
				.fold(0.0, f32::max),
			_ => IMPASSABLE,
		}
	}
	/// Whether a straight line between two grid coordinates stays on
	/// traversable cells without cutting a blocked corner
	pub fn has_line_of_sight(&self, from: IVec2, to: IVec2) -> bool {
		match (self.geometry.to_local(from), self.geometry.to_local(to)) {
			(Some(from), Some(to)) => self.cost_field.has_line_of_sight(from, to),
			_ => false,
		}
	}
}
