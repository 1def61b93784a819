//! Walls, buildings and obstacles placed onto the grid.
//!
//! Every structure covers a rectangular footprint of cells. Walls and
//! buildings are destructible, the [CostModel] prices them by their tier and
//! remaining health so that a horde prefers to smash through a damaged wall
//! rather than a fresh one. Obstacles (ore deposits, boulders) can never be
//! destroyed and are impassable.
//!
//! The [StructureRegistry] owns the structures and keeps an occupancy index of
//! which structure covers each cell. Footprints may not overlap.
//!

use std::collections::{BTreeMap, HashMap};

use bevy::prelude::*;

/// Unique ID of a structure held by the [StructureRegistry]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub struct StructureId(u32);

impl StructureId {
	/// Get the raw ID
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// The kind of structure, determines how it is priced
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum StructureCategory {
	/// Defensive wall, priced by tier
	Wall,
	/// Any other destructible building
	Building,
	/// Indestructible blocker
	Obstacle,
}

impl StructureCategory {
	/// Whether actors can destroy the structure
	pub fn is_destructible(&self) -> bool {
		!matches!(self, StructureCategory::Obstacle)
	}
}

/// A structure occupying a rectangle of cells
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructureDescriptor {
	/// Grid coordinate of the bottom-left cell of the footprint
	origin: IVec2,
	/// Footprint columns
	width: u32,
	/// Footprint rows
	height: u32,
	/// What kind of structure it is
	category: StructureCategory,
	/// Build tier, `0` is the lightest
	tier: u8,
	/// Current health, never above `max_health`
	health: f32,
	/// Health when freshly built
	max_health: f32,
}

impl StructureDescriptor {
	/// Create a new structure at full health
	pub fn new(
		origin: IVec2,
		width: u32,
		height: u32,
		category: StructureCategory,
		tier: u8,
		max_health: f32,
	) -> Self {
		StructureDescriptor {
			origin,
			width,
			height,
			category,
			tier,
			health: max_health,
			max_health,
		}
	}
	/// Set the current health, clamped to `[0, max_health]`
	pub fn with_health(mut self, health: f32) -> Self {
		self.health = health.clamp(0.0, self.max_health.max(0.0));
		self
	}
	/// Get the grid coordinate of the bottom-left cell of the footprint
	pub fn get_origin(&self) -> IVec2 {
		self.origin
	}
	/// Get the `(width, height)` of the footprint
	pub fn get_footprint(&self) -> (u32, u32) {
		(self.width, self.height)
	}
	/// Get the kind of structure
	pub fn get_category(&self) -> StructureCategory {
		self.category
	}
	/// Get the build tier
	pub fn get_tier(&self) -> u8 {
		self.tier
	}
	/// Get the current health
	pub fn get_health(&self) -> f32 {
		self.health
	}
	/// Get the health when freshly built
	pub fn get_max_health(&self) -> f32 {
		self.max_health
	}
	/// Remaining health in `[0, 1]`, a structure without any max health is
	/// treated as already broken
	pub fn health_fraction(&self) -> f32 {
		if self.max_health <= 0.0 {
			0.0
		} else {
			(self.health / self.max_health).clamp(0.0, 1.0)
		}
	}
	/// Whether the footprint covers the grid coordinate
	pub fn covers(&self, cell: IVec2) -> bool {
		let local = cell - self.origin;
		local.x >= 0 && local.y >= 0 && (local.x as u32) < self.width && (local.y as u32) < self.height
	}
	/// Every grid coordinate of the footprint
	pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
		(0..self.height as i32).flat_map(move |y| {
			(0..self.width as i32).map(move |x| self.origin + IVec2::new(x, y))
		})
	}
}

/// Every structure on the map with an index of the cells they occupy
#[derive(Resource, Default, Clone, Debug)]
pub struct StructureRegistry {
	/// Structures keyed by ID, ordered for deterministic iteration
	structures: BTreeMap<StructureId, StructureDescriptor>,
	/// Which structure covers a grid coordinate
	occupancy: HashMap<IVec2, StructureId>,
	/// ID handed to the next inserted structure
	next_id: u32,
	/// Health fraction of each structure when the fields were last built
	priced_fractions: BTreeMap<StructureId, f32>,
}

impl StructureRegistry {
	/// Add a structure, returning its ID. Empty footprints and footprints
	/// which overlap an existing structure are rejected
	pub fn insert(&mut self, descriptor: StructureDescriptor) -> Option<StructureId> {
		let (width, height) = descriptor.get_footprint();
		if width == 0 || height == 0 {
			warn!(
				"Rejected structure at {} with an empty footprint",
				descriptor.get_origin()
			);
			return None;
		}
		if let Some(existing) = descriptor
			.cells()
			.find_map(|cell| self.occupancy.get(&cell))
		{
			warn!(
				"Rejected structure at {}, footprint overlaps structure {:?}",
				descriptor.get_origin(),
				existing
			);
			return None;
		}
		let id = StructureId(self.next_id);
		self.next_id += 1;
		for cell in descriptor.cells() {
			self.occupancy.insert(cell, id);
		}
		self.priced_fractions.insert(id, descriptor.health_fraction());
		self.structures.insert(id, descriptor);
		Some(id)
	}
	/// Remove a structure, freeing the cells of its footprint
	pub fn remove(&mut self, id: StructureId) -> Option<StructureDescriptor> {
		let descriptor = self.structures.remove(&id)?;
		self.priced_fractions.remove(&id);
		for cell in descriptor.cells() {
			self.occupancy.remove(&cell);
		}
		Some(descriptor)
	}
	/// Update the health of a structure, returning how far its health
	/// fraction has moved since the fields last priced it. Small hits add up
	/// until [StructureRegistry::mark_priced] is called
	pub fn set_health(&mut self, id: StructureId, health: f32) -> Option<f32> {
		let descriptor = self.structures.get_mut(&id)?;
		*descriptor = descriptor.with_health(health);
		let priced = self
			.priced_fractions
			.get(&id)
			.copied()
			.unwrap_or(1.0);
		Some((descriptor.health_fraction() - priced).abs())
	}
	/// Health fraction the structure had when the fields were last built
	pub fn get_priced_fraction(&self, id: StructureId) -> Option<f32> {
		self.priced_fractions.get(&id).copied()
	}
	/// Record the current health of every structure as priced into the
	/// fields, call after a recomputation
	pub fn mark_priced(&mut self) {
		for (id, descriptor) in self.structures.iter() {
			self.priced_fractions.insert(*id, descriptor.health_fraction());
		}
	}
	/// Get a structure by ID
	pub fn get(&self, id: StructureId) -> Option<&StructureDescriptor> {
		self.structures.get(&id)
	}
	/// The structure covering a grid coordinate
	pub fn structure_at(&self, cell: IVec2) -> Option<(StructureId, &StructureDescriptor)> {
		let id = self.occupancy.get(&cell)?;
		self.structures.get(id).map(|descriptor| (*id, descriptor))
	}
	/// Iterate over the structures in ID order
	pub fn iter(&self) -> impl Iterator<Item = (StructureId, &StructureDescriptor)> {
		self.structures.iter().map(|(id, descriptor)| (*id, descriptor))
	}
	/// Number of structures
	pub fn len(&self) -> usize {
		self.structures.len()
	}
	/// Whether there are no structures
	pub fn is_empty(&self) -> bool {
		self.structures.is_empty()
	}
	/// Remove every structure
	pub fn clear(&mut self) {
		self.structures.clear();
		self.occupancy.clear();
		self.priced_fractions.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wall(x: i32, y: i32) -> StructureDescriptor {
		StructureDescriptor::new(IVec2::new(x, y), 1, 1, StructureCategory::Wall, 0, 100.0)
	}

	#[test]
	fn footprint_cells() {
		let building =
			StructureDescriptor::new(IVec2::new(2, 3), 2, 2, StructureCategory::Building, 0, 50.0);
		let cells: Vec<IVec2> = building.cells().collect();
		let actual = vec![
			IVec2::new(2, 3),
			IVec2::new(3, 3),
			IVec2::new(2, 4),
			IVec2::new(3, 4),
		];
		assert_eq!(actual, cells);
		assert!(building.covers(IVec2::new(3, 4)));
		assert!(!building.covers(IVec2::new(4, 4)));
	}
	#[test]
	fn health_fraction_clamped() {
		let damaged = wall(0, 0).with_health(150.0);
		assert_eq!(1.0, damaged.health_fraction());
		let damaged = wall(0, 0).with_health(-5.0);
		assert_eq!(0.0, damaged.health_fraction());
		let damaged = wall(0, 0).with_health(25.0);
		assert_eq!(0.25, damaged.health_fraction());
	}
	#[test]
	fn insert_and_lookup() {
		let mut registry = StructureRegistry::default();
		let id = registry.insert(wall(4, 4)).unwrap();
		let (found, descriptor) = registry.structure_at(IVec2::new(4, 4)).unwrap();
		assert_eq!(id, found);
		assert_eq!(StructureCategory::Wall, descriptor.get_category());
		assert!(registry.structure_at(IVec2::new(5, 4)).is_none());
	}
	#[test]
	fn overlap_rejected() {
		let mut registry = StructureRegistry::default();
		let building =
			StructureDescriptor::new(IVec2::new(0, 0), 3, 3, StructureCategory::Building, 1, 50.0);
		assert!(registry.insert(building).is_some());
		assert!(registry.insert(wall(2, 2)).is_none());
		assert_eq!(1, registry.len());
	}
	#[test]
	fn empty_footprint_rejected() {
		let mut registry = StructureRegistry::default();
		let nothing =
			StructureDescriptor::new(IVec2::new(0, 0), 0, 3, StructureCategory::Building, 1, 50.0);
		assert!(registry.insert(nothing).is_none());
	}
	#[test]
	fn remove_frees_cells() {
		let mut registry = StructureRegistry::default();
		let id = registry.insert(wall(1, 1)).unwrap();
		assert!(registry.remove(id).is_some());
		assert!(registry.structure_at(IVec2::new(1, 1)).is_none());
		assert!(registry.remove(id).is_none());
		assert!(registry.insert(wall(1, 1)).is_some());
	}
	#[test]
	fn health_change_delta() {
		let mut registry = StructureRegistry::default();
		let id = registry.insert(wall(1, 1)).unwrap();
		let delta = registry.set_health(id, 90.0).unwrap();
		assert!((delta - 0.1).abs() < 1e-6);
		assert_eq!(90.0, registry.get(id).unwrap().get_health());
	}
	#[test]
	fn small_hits_accumulate_until_priced() {
		let mut registry = StructureRegistry::default();
		let id = registry.insert(wall(1, 1)).unwrap();
		let mut health = 100.0;
		for expected in [0.04, 0.08, 0.12] {
			health -= 4.0;
			let delta = registry.set_health(id, health).unwrap();
			assert!((delta - expected).abs() < 1e-5);
		}
		assert_eq!(Some(1.0), registry.get_priced_fraction(id));
		registry.mark_priced();
		assert!((registry.get_priced_fraction(id).unwrap() - 0.88).abs() < 1e-5);
		let delta = registry.set_health(id, health - 4.0).unwrap();
		assert!((delta - 0.04).abs() < 1e-5);
		registry.remove(id);
		assert_eq!(None, registry.get_priced_fraction(id));
	}
	#[test]
	fn ids_are_not_reused() {
		let mut registry = StructureRegistry::default();
		let first = registry.insert(wall(1, 1)).unwrap();
		registry.remove(first);
		let second = registry.insert(wall(1, 1)).unwrap();
		assert_ne!(first, second);
	}
}
