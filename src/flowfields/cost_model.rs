//! Converts the terrain and the structures placed onto it into the cost of
//! entering each cell for each [MovementClass].
//!
//! The cost of a cell is resolved in order:
//!
//! 1. A destructible structure covers the cell - a tunneling actor burrows
//!    under the lightest wall tier for a cost of `1`, otherwise the cost is
//!    `base × health_fraction + minimum_cost` where the base comes from the
//!    wall tier or the building band
//! 2. An indestructible obstacle covers the cell - [IMPASSABLE]
//! 3. The terrain is non-traversable - [IMPASSABLE]
//! 4. The base cost of the terrain
//!
//! Ground actors are never walled in by a destructible structure, they pay to
//! smash through it. Flying actors ignore the grid entirely and see a cost of
//! `1` everywhere.
//!

use bevy::prelude::*;

use crate::prelude::*;

/// How an actor traverses the grid
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect)]
pub enum MovementClass {
	/// Walks the grid, smashing through structures in the way
	#[default]
	Ground,
	/// Flies straight to the target
	Flying,
	/// Walks the grid but burrows beneath the lightest walls
	Tunneling,
}

impl MovementClass {
	/// Every class, in the order of [MovementClass::index]
	pub const ALL: [MovementClass; 3] = [
		MovementClass::Ground,
		MovementClass::Flying,
		MovementClass::Tunneling,
	];
	/// Position of the class in per-class storage
	pub fn index(&self) -> usize {
		match self {
			MovementClass::Ground => 0,
			MovementClass::Flying => 1,
			MovementClass::Tunneling => 2,
		}
	}
	/// Whether an actor of this class moves through the structure without
	/// needing to destroy it
	pub fn passes_through(&self, structure: &StructureDescriptor) -> bool {
		match self {
			MovementClass::Flying => true,
			MovementClass::Tunneling => {
				structure.get_category() == StructureCategory::Wall && structure.get_tier() == 0
			}
			MovementClass::Ground => false,
		}
	}
}

/// Read-only view over everything which influences the cost of a cell
pub struct CostModel<'a> {
	/// Bounds of the grid
	geometry: &'a GridGeometry,
	/// Static terrain
	terrain: &'a TerrainMap,
	/// Structures placed on the terrain
	registry: &'a StructureRegistry,
	/// Pricing of structures
	config: &'a CostConfig,
}

impl<'a> CostModel<'a> {
	/// Create a new instance of [CostModel]
	pub fn new(
		geometry: &'a GridGeometry,
		terrain: &'a TerrainMap,
		registry: &'a StructureRegistry,
		config: &'a CostConfig,
	) -> Self {
		CostModel {
			geometry,
			terrain,
			registry,
			config,
		}
	}
	/// Get the bounds of the grid
	pub fn get_geometry(&self) -> &'a GridGeometry {
		self.geometry
	}
	/// Cost of entering the grid coordinate, cells outside of the bounds are
	/// [IMPASSABLE]
	pub fn cost(&self, cell: IVec2, class: MovementClass) -> f32 {
		let Some(field_cell) = self.geometry.to_local(cell) else {
			return IMPASSABLE;
		};
		if class == MovementClass::Flying {
			return 1.0;
		}
		if let Some((_, structure)) = self.registry.structure_at(cell) {
			let category = structure.get_category();
			if category.is_destructible() {
				if class.passes_through(structure) {
					return 1.0;
				}
				let base = match category {
					StructureCategory::Wall => self.config.wall_cost(structure.get_tier()),
					_ => self.config.building_base_cost,
				};
				return base * structure.health_fraction() + self.config.minimum_cost;
			}
			return IMPASSABLE;
		}
		if !self.terrain.is_traversable(field_cell) {
			return IMPASSABLE;
		}
		self.terrain.base_cost(field_cell)
	}
	/// Whether a ground actor could ever stand in the cell
	pub fn is_traversable(&self, cell: IVec2) -> bool {
		self.cost(cell, MovementClass::Ground) != IMPASSABLE
	}
	/// Cells whose cost is forced to `1` when `target` is the destination: the
	/// whole footprint of a structure covering the target (clipped to the
	/// bounds), otherwise just the target itself
	pub fn target_footprint(&self, target: IVec2) -> Vec<FieldCell> {
		match self.registry.structure_at(target) {
			Some((_, structure)) => structure
				.cells()
				.filter_map(|cell| self.geometry.to_local(cell))
				.collect(),
			None => self.geometry.to_local(target).into_iter().collect(),
		}
	}
	/// Snapshot the cost of every cell within the bounds for `class`
	pub fn build_cost_field(&self, class: MovementClass) -> CostField {
		let mut cost_field = CostField::new(self.geometry.get_width(), self.geometry.get_height());
		cost_field.rebuild(|field_cell| self.cost(self.geometry.to_grid(field_cell), class));
		cost_field
	}
	/// Overwrite a [CostField] with the cost of every cell for `class`, then
	/// open up the footprint of `target`
	pub fn fill_cost_field(&self, cost_field: &mut CostField, class: MovementClass, target: IVec2) {
		cost_field.rebuild(|field_cell| self.cost(self.geometry.to_grid(field_cell), class));
		for field_cell in self.target_footprint(target) {
			cost_field.set_field_cell_value(1.0, field_cell);
		}
	}
}
