//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

/// Special cost value of a cell that can never be entered. The same value is
/// used by the [crate::prelude::IntegrationField] to mark cells which the
/// propagation never reached
pub const IMPASSABLE: f32 = f32::MAX;
/// Multiplier applied to the cost of a cell when it is entered diagonally
pub const DIAGONAL_FACTOR: f32 = std::f32::consts::SQRT_2;
/// `tan(22.5°)`, below this ratio a minor axis is considered insignificant when
/// snapping a direction onto one of the 8 [Ordinal]s
pub const OCTANT_THRESHOLD: f32 = 0.414_213_57;

/// Convenience way of accessing the 8 directions of movement around a grid
/// cell. Rows increase towards the North (the `+y` world axis)
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Reflect)]
pub enum Ordinal {
	North,
	East,
	South,
	West,
	NorthEast,
	SouthEast,
	SouthWest,
	NorthWest,
	/// Special case, used to indicate no direction of movement
	Zero,
}

impl Ordinal {
	/// The cardinals followed by the diagonals. Neighbour scans run in this
	/// order so that a cardinal wins a tie against a diagonal
	pub const ALL: [Ordinal; 8] = [
		Ordinal::North,
		Ordinal::East,
		Ordinal::South,
		Ordinal::West,
		Ordinal::NorthEast,
		Ordinal::SouthEast,
		Ordinal::SouthWest,
		Ordinal::NorthWest,
	];
	/// The `(column, row)` step of the direction
	pub fn offset(&self) -> IVec2 {
		match self {
			Ordinal::North => IVec2::new(0, 1),
			Ordinal::East => IVec2::new(1, 0),
			Ordinal::South => IVec2::new(0, -1),
			Ordinal::West => IVec2::new(-1, 0),
			Ordinal::NorthEast => IVec2::new(1, 1),
			Ordinal::SouthEast => IVec2::new(1, -1),
			Ordinal::SouthWest => IVec2::new(-1, -1),
			Ordinal::NorthWest => IVec2::new(-1, 1),
			Ordinal::Zero => IVec2::ZERO,
		}
	}
	/// Whether moving in this direction crosses a cell corner
	pub fn is_diagonal(&self) -> bool {
		matches!(
			self,
			Ordinal::NorthEast | Ordinal::SouthEast | Ordinal::SouthWest | Ordinal::NorthWest
		)
	}
	/// The multiplier applied to the cost of the cell being entered
	pub fn step_factor(&self) -> f32 {
		if self.is_diagonal() {
			DIAGONAL_FACTOR
		} else {
			1.0
		}
	}
	/// For a diagonal get the two cardinals it sits between, i.e `NorthEast`
	/// yields `(North, East)`. A cardinal or [Ordinal::Zero] yields [None]
	pub fn flanking_cardinals(&self) -> Option<(Ordinal, Ordinal)> {
		match self {
			Ordinal::NorthEast => Some((Ordinal::North, Ordinal::East)),
			Ordinal::SouthEast => Some((Ordinal::South, Ordinal::East)),
			Ordinal::SouthWest => Some((Ordinal::South, Ordinal::West)),
			Ordinal::NorthWest => Some((Ordinal::North, Ordinal::West)),
			_ => None,
		}
	}
	/// Unit vector of the direction in world space
	pub fn to_vec2(&self) -> Vec2 {
		self.offset().as_vec2().normalize_or_zero()
	}
	/// Returns the opposite [Ordinal] of the current
	pub fn inverse(&self) -> Ordinal {
		match self {
			Ordinal::North => Ordinal::South,
			Ordinal::East => Ordinal::West,
			Ordinal::South => Ordinal::North,
			Ordinal::West => Ordinal::East,
			Ordinal::NorthEast => Ordinal::SouthWest,
			Ordinal::SouthEast => Ordinal::NorthWest,
			Ordinal::SouthWest => Ordinal::NorthEast,
			Ordinal::NorthWest => Ordinal::SouthEast,
			Ordinal::Zero => Ordinal::Zero,
		}
	}
	/// For two cells next to each other it can be useful to find the [Ordinal]
	/// pointing from the `source` to the `target`. Cells which are not
	/// adjacent yield [Ordinal::Zero]
	pub fn cell_to_cell_direction(target: IVec2, source: IVec2) -> Self {
		match <(i32, i32)>::from(target - source) {
			(0, 1) => Ordinal::North,
			(1, 1) => Ordinal::NorthEast,
			(1, 0) => Ordinal::East,
			(1, -1) => Ordinal::SouthEast,
			(0, -1) => Ordinal::South,
			(-1, -1) => Ordinal::SouthWest,
			(-1, 0) => Ordinal::West,
			(-1, 1) => Ordinal::NorthWest,
			_ => Ordinal::Zero,
		}
	}
	/// Snap an arbitrary direction onto one of the 8 [Ordinal]s. An axis
	/// dominates when the other axis is within `tan(22.5°)` of it, otherwise
	/// the direction is treated as diagonal. A zero-length vector gives
	/// [Ordinal::Zero]
	pub fn from_direction(direction: Vec2) -> Self {
		let abs_x = direction.x.abs();
		let abs_y = direction.y.abs();
		if abs_x <= f32::EPSILON && abs_y <= f32::EPSILON {
			return Ordinal::Zero;
		}
		let step_x = if abs_y > 0.0 && abs_x < abs_y * OCTANT_THRESHOLD {
			0
		} else {
			direction.x.signum() as i32
		};
		let step_y = if abs_x > 0.0 && abs_y < abs_x * OCTANT_THRESHOLD {
			0
		} else {
			direction.y.signum() as i32
		};
		Ordinal::cell_to_cell_direction(IVec2::new(step_x, step_y), IVec2::ZERO)
	}
	/// The two [Ordinal]s either side of this one when rotating by 45°
	pub fn adjacent(&self) -> [Ordinal; 2] {
		match self {
			Ordinal::North => [Ordinal::NorthWest, Ordinal::NorthEast],
			Ordinal::NorthEast => [Ordinal::North, Ordinal::East],
			Ordinal::East => [Ordinal::NorthEast, Ordinal::SouthEast],
			Ordinal::SouthEast => [Ordinal::East, Ordinal::South],
			Ordinal::South => [Ordinal::SouthEast, Ordinal::SouthWest],
			Ordinal::SouthWest => [Ordinal::South, Ordinal::West],
			Ordinal::West => [Ordinal::SouthWest, Ordinal::NorthWest],
			Ordinal::NorthWest => [Ordinal::West, Ordinal::North],
			Ordinal::Zero => [Ordinal::Zero, Ordinal::Zero],
		}
	}
}

/// Octile distance between two cells, the exact path length across an open
/// grid when diagonal steps cost [DIAGONAL_FACTOR]
pub fn octile_distance(a: IVec2, b: IVec2) -> f32 {
	let delta = (a - b).abs();
	let max = delta.x.max(delta.y) as f32;
	let min = delta.x.min(delta.y) as f32;
	max + (DIAGONAL_FACTOR - 1.0) * min
}

/// Manhattan distance between two cells
pub fn manhattan_distance(a: IVec2, b: IVec2) -> f32 {
	let delta = (a - b).abs();
	(delta.x + delta.y) as f32
}
