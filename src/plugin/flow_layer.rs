//! Logic relating to rebuilding the [FlowField]s towards the target and
//! moving actors along them
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Move the destination of the horde to a grid coordinate
#[derive(Event, Clone, Copy, Debug)]
pub struct EventSetTarget(pub IVec2);

/// Remove the destination of the horde, actors stop moving
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct EventClearTarget;

/// Emitted every tick an actor is held up by a structure, gameplay should
/// apply damage to the structure
#[derive(Event, Clone, Copy, Debug)]
pub struct EventAttackStructure {
	/// The actor held up
	pub agent: Entity,
	/// The structure in the way
	pub structure: StructureId,
}

/// Read [EventSetTarget] and [EventClearTarget], a new target is recalculated
/// on the next scheduled pass without waiting out the cooldown
#[cfg(not(tarpaulin_include))]
pub fn process_target_changes(
	mut set_events: EventReader<EventSetTarget>,
	mut clear_events: EventReader<EventClearTarget>,
	mut engine: ResMut<FlowFieldEngine>,
	mut scheduler: ResMut<RecalculationScheduler>,
	time: Res<Time>,
) {
	if clear_events.read().last().is_some() {
		debug!("Flow field target cleared");
		engine.clear_target();
	}
	// only the latest target matters
	if let Some(EventSetTarget(target)) = set_events.read().last() {
		if engine.set_target(*target) {
			scheduler.force(time.elapsed());
		}
	}
}

/// Rebuild the fields when the [RecalculationScheduler] allows it. The health
/// of every structure is then stamped as priced so that later damage is
/// measured from what the fields actually hold
#[cfg(not(tarpaulin_include))]
pub fn run_scheduled_recalculation(
	mut engine: ResMut<FlowFieldEngine>,
	mut scheduler: ResMut<RecalculationScheduler>,
	mut registry: ResMut<StructureRegistry>,
	time: Res<Time>,
) {
	if scheduler.poll(time.elapsed()) && engine.recompute(&registry) {
		registry.mark_priced();
	}
}

/// Step every actor along the flow field
#[cfg(not(tarpaulin_include))]
pub fn move_agents(
	mut agents: Query<(Entity, &mut AgentMotion, &MovementClass, &mut Transform)>,
	engine: Res<FlowFieldEngine>,
	registry: Res<StructureRegistry>,
	config: Res<FlowFieldConfig>,
	time: Res<Time>,
	mut event_attack: EventWriter<EventAttackStructure>,
) {
	for (entity, mut motion, class, mut transform) in agents.iter_mut() {
		let mut position = transform.translation.truncate();
		let outcome = motion.tick(
			time.delta(),
			&mut position,
			*class,
			&engine,
			&registry,
			&config.agent,
		);
		transform.translation.x = position.x;
		transform.translation.y = position.y;
		if let MotionOutcome::Attacking(structure) = outcome {
			event_attack.write(EventAttackStructure {
				agent: entity,
				structure,
			});
		}
	}
}
