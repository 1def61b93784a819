//! The [FlowFieldEngine] owns the fields of every [MovementClass] and answers
//! the question every actor asks each frame: which way to the target?
//!
//! A single target is shared by the whole horde. When the engine recomputes,
//! each class has its [CostField] rebuilt from the [CostModel], the footprint
//! of the target opened up, an [IntegrationField] propagated out from the
//! target and a [FlowField] derived from it.
//!
//! Querying a direction never fails, it degrades:
//!
//! 1. No target - no movement
//! 2. Flying, outside of the bounds or standing on the target - a straight
//!    line to the target
//! 3. The [FlowField] direction of the cell
//! 4. The cell has no direction (it was cut off or something was built on
//!    it) - escape towards the cheapest reachable neighbour
//! 5. Nothing reachable around - a straight line to the target
//!

use bevy::prelude::*;

use crate::prelude::*;

/// Navigation state for the horde, inserted once the level geometry and
/// terrain are known
#[derive(Resource)]
pub struct FlowFieldEngine {
	/// Bounds and scale of the grid
	geometry: GridGeometry,
	/// Static terrain of the level
	terrain: TerrainMap,
	/// Fields indexed by [MovementClass::index]
	fields: [FlowFieldData; 3],
	/// The shared destination
	target: Option<IVec2>,
	/// Target the fields were last computed towards
	computed_target: Option<IVec2>,
	/// Number of completed recomputations
	revision: u64,
	/// Pricing of structures
	cost_config: CostConfig,
	/// Behaviour of [FlowFieldEngine::find_path]
	search_config: SearchConfig,
}

impl FlowFieldEngine {
	/// Create a new instance of [FlowFieldEngine]. The [TerrainMap] must
	/// describe exactly the cells of the [GridGeometry]
	pub fn new(geometry: GridGeometry, terrain: TerrainMap, config: &FlowFieldConfig) -> Self {
		check_terrain(&geometry, &terrain);
		FlowFieldEngine {
			fields: allocate_fields(&geometry),
			geometry,
			terrain,
			target: None,
			computed_target: None,
			revision: 0,
			cost_config: config.cost.clone(),
			search_config: config.search,
		}
	}
	/// Get the bounds of the grid
	pub fn get_geometry(&self) -> &GridGeometry {
		&self.geometry
	}
	/// Get the static terrain
	pub fn get_terrain(&self) -> &TerrainMap {
		&self.terrain
	}
	/// Get the pricing of structures
	pub fn get_cost_config(&self) -> &CostConfig {
		&self.cost_config
	}
	/// Get the behaviour of [FlowFieldEngine::find_path]
	pub fn get_search_config(&self) -> &SearchConfig {
		&self.search_config
	}
	/// Number of recomputations completed since construction
	pub fn get_revision(&self) -> u64 {
		self.revision
	}
	/// Get the fields of a [MovementClass]
	pub fn get_field_data(&self, class: MovementClass) -> &FlowFieldData {
		&self.fields[class.index()]
	}
	/// Adopt new cost and search parameters, they take effect from the next
	/// recomputation
	pub fn apply_config(&mut self, config: &FlowFieldConfig) {
		self.cost_config = config.cost.clone();
		self.search_config = config.search;
	}
	/// Discard every field and adopt a new level. The target is cleared
	pub fn reset_grid(&mut self, geometry: GridGeometry, terrain: TerrainMap) {
		check_terrain(&geometry, &terrain);
		self.fields = allocate_fields(&geometry);
		self.geometry = geometry;
		self.terrain = terrain;
		self.target = None;
		self.computed_target = None;
		debug!(
			"Flow field grid reset to {}x{} cells",
			self.geometry.get_width(),
			self.geometry.get_height()
		);
	}
	/// Set the destination of the horde. A target outside of the bounds is
	/// rejected and the previous target kept
	pub fn set_target(&mut self, target: IVec2) -> bool {
		if !self.geometry.contains(target) {
			error!("Flow field target {} is outside of the grid", target);
			return false;
		}
		if self.target != Some(target) {
			debug!("Flow field target set to {}", target);
		}
		self.target = Some(target);
		true
	}
	/// Remove the destination, actors stop moving
	pub fn clear_target(&mut self) {
		self.target = None;
	}
	/// Whether a target is set
	pub fn has_target(&self) -> bool {
		self.target.is_some()
	}
	/// Get the destination of the horde
	pub fn target(&self) -> Option<IVec2> {
		self.target
	}
	/// Whether the fields describe the current target
	pub fn is_current(&self) -> bool {
		self.target.is_some() && self.target == self.computed_target
	}
	/// Rebuild the fields of every [MovementClass] towards the target. Returns
	/// `false` without doing anything when no target is set
	pub fn recompute(&mut self, registry: &StructureRegistry) -> bool {
		let Some(target) = self.target else {
			debug!("Skipped flow field recompute, no target is set");
			return false;
		};
		let Some(target_cell) = self.geometry.to_local(target) else {
			// set_target guards the bounds, only a grid reset could cause this
			error!("Flow field target {} is outside of the grid", target);
			return false;
		};
		let cost_model = CostModel::new(&self.geometry, &self.terrain, registry, &self.cost_config);
		let mut settled = [0; 3];
		for class in MovementClass::ALL {
			let data = &mut self.fields[class.index()];
			cost_model.fill_cost_field(data.get_cost_field_mut(), class, target);
			settled[class.index()] = data.integrate_and_derive(target_cell);
		}
		self.computed_target = Some(target);
		self.revision += 1;
		debug!(
			"Recomputed flow fields towards {}, reached cells ground {} flying {} tunneling {}",
			target,
			settled[MovementClass::Ground.index()],
			settled[MovementClass::Flying.index()],
			settled[MovementClass::Tunneling.index()]
		);
		true
	}
	/// Direction an actor of `class` at `position` should travel in, a unit
	/// vector or [Vec2::ZERO]
	pub fn query(&self, position: Vec2, class: MovementClass) -> Vec2 {
		let Some(target) = self.target else {
			return Vec2::ZERO;
		};
		let target_position = self.geometry.cell_to_world(target);
		let straight = (target_position - position).normalize_or_zero();
		if class == MovementClass::Flying || !self.is_current() {
			return straight;
		}
		let Some(field_cell) = self.geometry.world_to_local(position) else {
			return straight;
		};
		if self.geometry.to_grid(field_cell) == target {
			return straight;
		}
		let data = self.get_field_data(class);
		let direction = data.get_flow_field().get_field_cell_value(field_cell);
		if direction != Vec2::ZERO {
			return direction;
		}
		match self.escape(field_cell, data.get_integration_field()) {
			Some(neighbour) => {
				let towards = self.geometry.cell_to_world(self.geometry.to_grid(neighbour)) - position;
				towards.normalize_or_zero()
			}
			None => straight,
		}
	}
	/// The cheapest reachable neighbour of a cell with no direction of its own
	fn escape(&self, field_cell: FieldCell, integration_field: &IntegrationField) -> Option<FieldCell> {
		let (width, height) = integration_field.get_dimensions();
		let mut best: Option<(f32, FieldCell)> = None;
		for (_, neighbour) in field_cell.neighbours(width, height) {
			let cost = integration_field.get_field_cell_value(neighbour);
			if cost == IMPASSABLE {
				continue;
			}
			if best.is_none_or(|(best_cost, _)| cost < best_cost) {
				best = Some((cost, neighbour));
			}
		}
		if let Some((_, neighbour)) = best {
			trace!("Escaping {:?} towards {:?}", field_cell, neighbour);
		}
		best.map(|(_, neighbour)| neighbour)
	}
	/// Find a route for a single ground actor independent of the flow field
	pub fn find_path(
		&self,
		start: IVec2,
		goal: IVec2,
		registry: &StructureRegistry,
	) -> Option<Vec<IVec2>> {
		let cost_model = CostModel::new(&self.geometry, &self.terrain, registry, &self.cost_config);
		PointToPointSearch::new(&cost_model, &self.search_config).find_path(start, goal)
	}
	/// Read-only view of the fields of a class for debug tooling
	pub fn debug_view(&self, class: MovementClass) -> FlowFieldDebugView<'_> {
		let data = self.get_field_data(class);
		FlowFieldDebugView {
			geometry: &self.geometry,
			target: self.target,
			cost: data.get_cost_field().get(),
			integration: data.get_integration_field().get(),
			directions: data.get_flow_field().get(),
		}
	}
}

/// Create the fields of every class sized to the bounds
fn allocate_fields(geometry: &GridGeometry) -> [FlowFieldData; 3] {
	let (width, height) = (geometry.get_width(), geometry.get_height());
	[
		FlowFieldData::new(width, height),
		FlowFieldData::new(width, height),
		FlowFieldData::new(width, height),
	]
}

/// The engine can only be built over terrain which covers the bounds exactly
fn check_terrain(geometry: &GridGeometry, terrain: &TerrainMap) {
	let expected = (geometry.get_width(), geometry.get_height());
	if terrain.get_dimensions() != expected {
		panic!(
			"TerrainMap dimensions {:?} do not match the grid dimensions {:?}",
			terrain.get_dimensions(),
			expected
		);
	}
}

/// Borrowed snapshot of the fields of one [MovementClass], the arrays are
/// row-major with `width * height` entries
pub struct FlowFieldDebugView<'a> {
	/// Bounds of the grid
	geometry: &'a GridGeometry,
	/// Destination of the horde
	target: Option<IVec2>,
	/// Cost of entering each cell
	cost: &'a [f32],
	/// Accumulated cost to the target
	integration: &'a [f32],
	/// Direction out of each cell
	directions: &'a [Vec2],
}

impl<'a> FlowFieldDebugView<'a> {
	/// Get the `(width, height)` of the arrays
	pub fn get_dimensions(&self) -> (usize, usize) {
		(self.geometry.get_width(), self.geometry.get_height())
	}
	/// Grid coordinate of the first element of the arrays
	pub fn get_offset(&self) -> IVec2 {
		self.geometry.get_offset()
	}
	/// Get the destination of the horde
	pub fn get_target(&self) -> Option<IVec2> {
		self.target
	}
	/// Get the cost of entering each cell
	pub fn get_cost(&self) -> &'a [f32] {
		self.cost
	}
	/// Get the accumulated cost from each cell to the target
	pub fn get_integration(&self) -> &'a [f32] {
		self.integration
	}
	/// Get the unit direction out of each cell, zero where there is none
	pub fn get_directions(&self) -> &'a [Vec2] {
		self.directions
	}
	/// Index into the arrays of a grid coordinate
	pub fn index_of(&self, cell: IVec2) -> Option<usize> {
		let field_cell = self.geometry.to_local(cell)?;
		Some(field_cell.get_row() * self.geometry.get_width() + field_cell.get_column())
	}
}
