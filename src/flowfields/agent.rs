//! Moves an actor across the grid one cell at a time.
//!
//! An actor tracks the cell it occupies and, while moving, the adjacent cell
//! it is hopping into. When a hop completes the [FlowFieldEngine] is asked for
//! the direction at the centre of the occupied cell, that direction is snapped
//! onto one of the 8 neighbours and a new hop is committed:
//!
//! * a structure the actor cannot pass through sits in the way - the actor
//!   stops and attacks it
//! * the neighbour is impassable - the neighbours either side (45° away) are
//!   tried instead, with no luck the actor is blocked
//!
//! Actors get shoved around by collisions and other gameplay so every so
//! often the tracked cells are compared against where the actor really is and
//! resynchronised if it has drifted too far.
//!
//! Flying actors skip all of this and fly straight at the target.
//!

use std::time::Duration;

use bevy::prelude::*;

use crate::prelude::*;

/// What an actor did during a [AgentMotion::tick]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionOutcome {
	/// No target, or the actor has arrived
	Idle,
	/// The actor moved
	Moving,
	/// A structure blocks the way and should be attacked
	Attacking(StructureId),
	/// Every way forward is impassable
	Blocked,
}

/// Per actor navigation state
#[derive(Component, Clone, Debug, Reflect)]
pub struct AgentMotion {
	/// Cell the actor occupies, found from its position on the first tick
	current_cell: Option<IVec2>,
	/// Adjacent cell the actor is moving into
	hop: Option<IVec2>,
	/// Structure blocking the way
	attack_target: Option<StructureId>,
	/// World units per second
	speed: f32,
	/// Time since the drift of the actor was last checked
	since_resync: Duration,
}

impl AgentMotion {
	/// Create a new instance of [AgentMotion] moving `speed` world units per
	/// second
	pub fn new(speed: f32) -> Self {
		AgentMotion {
			current_cell: None,
			hop: None,
			attack_target: None,
			speed,
			since_resync: Duration::ZERO,
		}
	}
	/// Get the cell the actor occupies
	pub fn get_current_cell(&self) -> Option<IVec2> {
		self.current_cell
	}
	/// Get the adjacent cell the actor is moving into
	pub fn get_hop(&self) -> Option<IVec2> {
		self.hop
	}
	/// Get the structure the actor is attacking
	pub fn get_attack_target(&self) -> Option<StructureId> {
		self.attack_target
	}
	/// Get the speed in world units per second
	pub fn get_speed(&self) -> f32 {
		self.speed
	}
	/// Set the speed in world units per second
	pub fn set_speed(&mut self, speed: f32) {
		self.speed = speed;
	}
	/// Advance the actor by `delta`, updating `position` in place
	pub fn tick(
		&mut self,
		delta: Duration,
		position: &mut Vec2,
		class: MovementClass,
		engine: &FlowFieldEngine,
		registry: &StructureRegistry,
		config: &AgentConfig,
	) -> MotionOutcome {
		let geometry = engine.get_geometry();
		self.since_resync += delta;
		if self.since_resync >= config.resync_interval {
			self.since_resync = Duration::ZERO;
			self.resync(*position, geometry, config);
		}
		let current = *self
			.current_cell
			.get_or_insert_with(|| geometry.world_to_cell(*position));
		let step = self.speed * delta.as_secs_f32();
		if class == MovementClass::Flying || !geometry.contains(current) {
			return self.drift(step, position, class, engine, config);
		}
		if self.hop.is_none() {
			let direction = engine.query(geometry.cell_to_world(current), class);
			let ordinal = Ordinal::from_direction(direction);
			if ordinal == Ordinal::Zero {
				self.attack_target = None;
				return MotionOutcome::Idle;
			}
			let ahead = current + ordinal.offset();
			if let Some(id) = destructible_in_the_way(ahead, class, registry) {
				trace!("Actor at {} blocked by structure {:?}", current, id);
				self.attack_target = Some(id);
				return MotionOutcome::Attacking(id);
			}
			self.attack_target = None;
			let [left, right] = ordinal.adjacent();
			let next = [ordinal, left, right]
				.into_iter()
				.map(|candidate| current + candidate.offset())
				.find(|next| can_enter(current, *next, class, engine, registry));
			match next {
				Some(next) => self.hop = Some(next),
				None => {
					// squeezing diagonally between two structures, smash one of them
					let flank = ordinal.flanking_cardinals().and_then(|(a, b)| {
						[a, b].into_iter().find_map(|flank| {
							destructible_in_the_way(current + flank.offset(), class, registry)
						})
					});
					if let Some(id) = flank {
						trace!("Actor at {} blocked at a corner by structure {:?}", current, id);
						self.attack_target = Some(id);
						return MotionOutcome::Attacking(id);
					}
					trace!("Actor at {} has no way forward", current);
					return MotionOutcome::Blocked;
				}
			}
		}
		match self.hop {
			Some(hop) => {
				let centre = geometry.cell_to_world(hop);
				let towards = centre - *position;
				if towards.length() <= step.max(config.arrival_epsilon) {
					*position = centre;
					self.current_cell = Some(hop);
					self.hop = None;
				} else {
					*position += towards.normalize() * step;
				}
				MotionOutcome::Moving
			}
			None => MotionOutcome::Idle,
		}
	}
	/// Move straight along the queried direction without snapping to cells
	fn drift(
		&mut self,
		step: f32,
		position: &mut Vec2,
		class: MovementClass,
		engine: &FlowFieldEngine,
		config: &AgentConfig,
	) -> MotionOutcome {
		let geometry = engine.get_geometry();
		self.hop = None;
		self.attack_target = None;
		let direction = engine.query(*position, class);
		if direction == Vec2::ZERO {
			return MotionOutcome::Idle;
		}
		if let Some(target) = engine.target() {
			let centre = geometry.cell_to_world(target);
			if centre.distance(*position) <= step.max(config.arrival_epsilon) {
				*position = centre;
				self.current_cell = Some(target);
				return MotionOutcome::Moving;
			}
		}
		*position += direction * step;
		self.current_cell = Some(geometry.world_to_cell(*position));
		MotionOutcome::Moving
	}
	/// Reset the tracked cells when the actor has drifted too far from both
	fn resync(&mut self, position: Vec2, geometry: &GridGeometry, config: &AgentConfig) {
		let Some(current) = self.current_cell else {
			// not yet placed, the first tick picks up the cell
			return;
		};
		let limit = config.resync_distance * geometry.get_cell_size();
		let near = |cell: IVec2| geometry.cell_to_world(cell).distance(position) <= limit;
		if near(current) || self.hop.is_some_and(near) {
			return;
		}
		let actual = geometry.world_to_cell(position);
		trace!("Actor resynchronised from {} to {}", current, actual);
		self.current_cell = Some(actual);
		self.hop = None;
	}
}

/// A destructible structure covering `cell` that `class` would have to smash
fn destructible_in_the_way(
	cell: IVec2,
	class: MovementClass,
	registry: &StructureRegistry,
) -> Option<StructureId> {
	let (id, structure) = registry.structure_at(cell)?;
	(structure.get_category().is_destructible() && !class.passes_through(structure)).then_some(id)
}

/// Whether an actor of `class` may hop from `current` into the adjacent `next`.
/// A diagonal hop may not squeeze past the corner of a structure the actor
/// cannot pass through
fn can_enter(
	current: IVec2,
	next: IVec2,
	class: MovementClass,
	engine: &FlowFieldEngine,
	registry: &StructureRegistry,
) -> bool {
	let geometry = engine.get_geometry();
	let (Some(from), Some(to)) = (geometry.to_local(current), geometry.to_local(next)) else {
		return false;
	};
	if let Some((_, structure)) = registry.structure_at(next) {
		if !class.passes_through(structure) {
			return false;
		}
	}
	let ordinal = Ordinal::cell_to_cell_direction(next, current);
	if let Some((a, b)) = ordinal.flanking_cardinals() {
		let squeezed = [a, b].into_iter().any(|flank| {
			registry
				.structure_at(current + flank.offset())
				.is_some_and(|(_, structure)| !class.passes_through(structure))
		});
		if squeezed {
			return false;
		}
	}
	engine
		.get_field_data(class)
		.get_cost_field()
		.can_step(from, ordinal, to)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn engine(terrain_blocks: &[(usize, usize)]) -> FlowFieldEngine {
		let geometry = GridGeometry::new(IVec2::ZERO, 10, 10, 1.0);
		let mut terrain = TerrainMap::from_geometry(&geometry);
		for (column, row) in terrain_blocks {
			terrain.set_cell(TerrainCell::blocked(), FieldCell::new(*column, *row));
		}
		FlowFieldEngine::new(geometry, terrain, &FlowFieldConfig::default())
	}

	fn tick(
		agent: &mut AgentMotion,
		position: &mut Vec2,
		class: MovementClass,
		engine: &FlowFieldEngine,
		registry: &StructureRegistry,
	) -> MotionOutcome {
		agent.tick(
			Duration::from_millis(250),
			position,
			class,
			engine,
			registry,
			&AgentConfig::default(),
		)
	}

	#[test]
	fn idle_without_target() {
		let engine = engine(&[]);
		let registry = StructureRegistry::default();
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(2.5, 5.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Idle, outcome);
		assert_eq!(Vec2::new(2.5, 5.5), position);
	}
	#[test]
	fn hop_committed_and_moving_same_tick() {
		let mut engine = engine(&[]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(8, 5));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(2.5, 5.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Moving, outcome);
		assert_eq!(Some(IVec2::new(3, 5)), agent.get_hop());
		assert!((position - Vec2::new(3.0, 5.5)).length() < 1e-5);
		tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(Some(IVec2::new(3, 5)), agent.get_current_cell());
		assert_eq!(None, agent.get_hop());
	}
	#[test]
	fn arrives_and_idles() {
		let mut engine = engine(&[]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(5, 5));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(4.0);
		let mut position = Vec2::new(1.5, 1.5);
		let mut outcome = MotionOutcome::Moving;
		for _ in 0..40 {
			outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		}
		assert_eq!(MotionOutcome::Idle, outcome);
		assert_eq!(Some(IVec2::new(5, 5)), agent.get_current_cell());
		assert_eq!(Vec2::new(5.5, 5.5), position);
	}
	#[test]
	fn attacks_wall_in_the_way() {
		let mut engine = engine(&[]);
		let mut registry = StructureRegistry::default();
		let id = registry
			.insert(StructureDescriptor::new(
				IVec2::new(4, 0),
				1,
				10,
				StructureCategory::Wall,
				0,
				100.0,
			))
			.unwrap();
		engine.set_target(IVec2::new(8, 5));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(3.5, 5.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Attacking(id), outcome);
		assert_eq!(Some(id), agent.get_attack_target());
		assert_eq!(Vec2::new(3.5, 5.5), position);
	}
	#[test]
	fn tunneling_passes_light_wall() {
		let mut engine = engine(&[]);
		let mut registry = StructureRegistry::default();
		registry.insert(StructureDescriptor::new(
			IVec2::new(4, 0),
			1,
			10,
			StructureCategory::Wall,
			0,
			100.0,
		));
		engine.set_target(IVec2::new(8, 5));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(3.5, 5.5);
		let outcome = tick(
			&mut agent,
			&mut position,
			MovementClass::Tunneling,
			&engine,
			&registry,
		);
		assert_eq!(MotionOutcome::Moving, outcome);
		assert_eq!(Some(IVec2::new(4, 5)), agent.get_hop());
	}
	#[test]
	fn blocked_when_enclosed() {
		//  ______________
		// |X_|X_|X_|__|..
		// |__|s_|X_|__|..  t at (8, 2)
		// |__|__|X_|__|..
		// |X_|X_|X_|__|..
		let mut engine = engine(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (2, 3), (0, 3), (1, 3)]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(8, 2));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(1.5, 2.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Blocked, outcome);
	}
	#[test]
	fn sidesteps_impassable() {
		let mut engine = engine(&[(3, 6)]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(0, 0));
		engine.recompute(&registry);
		// fields are stale for the new target so the actor heads straight
		// north-east into the water at (3, 6)
		engine.set_target(IVec2::new(6, 9));
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(2.5, 5.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Moving, outcome);
		assert_eq!(Some(IVec2::new(2, 6)), agent.get_hop());
	}
	#[test]
	fn no_squeezing_between_wall_corners() {
		//  ____________________
		// |__|__|W_|__|__|..  row 6, t at (9, 9)
		// |__|__|__|W_|__|..  row 5
		// |__|__|__|s_|W_|..  row 4
		// |__|__|__|__|__|W_..
		let mut engine = engine(&[]);
		let mut registry = StructureRegistry::default();
		let mut north_wall = None;
		for x in 0..=8 {
			let id = registry.insert(StructureDescriptor::new(
				IVec2::new(x, 8 - x),
				1,
				1,
				StructureCategory::Wall,
				2,
				100.0,
			));
			if x == 3 {
				north_wall = id;
			}
		}
		engine.set_target(IVec2::new(9, 9));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(3.5, 4.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		let north_wall = north_wall.unwrap();
		assert_eq!(MotionOutcome::Attacking(north_wall), outcome);
		assert_eq!(None, agent.get_hop());
		assert_eq!(Vec2::new(3.5, 4.5), position);
	}
	#[test]
	fn sidesteps_single_wall_corner() {
		let mut engine = engine(&[]);
		let mut registry = StructureRegistry::default();
		registry.insert(StructureDescriptor::new(
			IVec2::new(3, 5),
			1,
			1,
			StructureCategory::Wall,
			2,
			100.0,
		));
		engine.set_target(IVec2::new(9, 9));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(3.5, 4.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Moving, outcome);
		assert_eq!(Some(IVec2::new(4, 4)), agent.get_hop());
	}
	#[test]
	fn escapes_obstacle_within_one_tick() {
		let mut engine = engine(&[]);
		let mut registry = StructureRegistry::default();
		registry.insert(StructureDescriptor::new(
			IVec2::new(2, 2),
			1,
			1,
			StructureCategory::Obstacle,
			0,
			0.0,
		));
		engine.set_target(IVec2::new(7, 2));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let start = Vec2::new(2.5, 2.5);
		let mut position = start;
		let outcome = tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(MotionOutcome::Moving, outcome);
		assert!(position.distance(start) > 0.0);
	}
	#[test]
	fn flying_goes_straight() {
		let mut engine = engine(&[(3, 3), (4, 4), (5, 5)]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(8, 8));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(2.0);
		let mut position = Vec2::new(0.5, 0.5);
		let outcome = tick(&mut agent, &mut position, MovementClass::Flying, &engine, &registry);
		assert_eq!(MotionOutcome::Moving, outcome);
		let expected = Vec2::new(0.5, 0.5) + Vec2::ONE.normalize() * 0.5;
		assert!((position - expected).length() < 1e-5);
		assert_eq!(None, agent.get_hop());
	}
	#[test]
	fn resync_after_being_shoved() {
		let mut engine = engine(&[]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(9, 9));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(0.0);
		let mut position = Vec2::new(2.5, 2.5);
		tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(Some(IVec2::new(2, 2)), agent.get_current_cell());
		// knocked well away from the tracked cells
		position = Vec2::new(6.5, 2.5);
		tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(Some(IVec2::new(6, 2)), agent.get_current_cell());
	}
	#[test]
	fn small_drift_is_tolerated() {
		let mut engine = engine(&[]);
		let registry = StructureRegistry::default();
		engine.set_target(IVec2::new(9, 9));
		engine.recompute(&registry);
		let mut agent = AgentMotion::new(0.0);
		let mut position = Vec2::new(2.5, 2.5);
		tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		position = Vec2::new(3.6, 2.5);
		tick(&mut agent, &mut position, MovementClass::Ground, &engine, &registry);
		assert_eq!(Some(IVec2::new(2, 2)), agent.get_current_cell());
	}
}
