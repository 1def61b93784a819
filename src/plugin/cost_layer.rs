//! Logic for handling changes to the structures on the map which in turn
//! changes the [CostField]s, the recalculation itself is deferred to the
//! [RecalculationScheduler] so that a flurry of changes costs a single rebuild
//!

use crate::prelude::*;
use bevy::prelude::*;

/// A change to a structure on the map
#[derive(Event, Clone, Copy, Debug)]
pub enum EventStructureChanged {
	/// A new structure has been built
	Placed(StructureDescriptor),
	/// A structure has been destroyed or removed
	Destroyed(StructureId),
	/// A structure has been damaged or repaired
	HealthChanged {
		/// The structure affected
		id: StructureId,
		/// Its new health
		health: f32,
	},
}

/// Ask for the flow fields to be recalculated, for instance after the
/// [StructureRegistry] or [TerrainMap] has been edited directly
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct EventRequestRecalculation;

/// Read [EventStructureChanged] and update the [StructureRegistry], asking the
/// [RecalculationScheduler] for a rebuild whenever a change alters costs
#[cfg(not(tarpaulin_include))]
pub fn process_structure_changes(
	mut events: EventReader<EventStructureChanged>,
	mut registry: ResMut<StructureRegistry>,
	mut scheduler: ResMut<RecalculationScheduler>,
	config: Res<FlowFieldConfig>,
	time: Res<Time>,
) {
	for event in events.read() {
		let changed = match event {
			EventStructureChanged::Placed(descriptor) => match registry.insert(*descriptor) {
				Some(id) => {
					debug!("Structure {:?} placed at {}", id, descriptor.get_origin());
					true
				}
				None => false,
			},
			EventStructureChanged::Destroyed(id) => match registry.remove(*id) {
				Some(descriptor) => {
					debug!("Structure {:?} removed from {}", id, descriptor.get_origin());
					true
				}
				None => {
					warn!("Cannot remove unknown structure {:?}", id);
					false
				}
			},
			EventStructureChanged::HealthChanged { id, health } => {
				match registry.set_health(*id, *health) {
					// chip damage is only acted on once it adds up
					Some(delta) => delta >= config.health_change_threshold,
					None => {
						warn!("Cannot change health of unknown structure {:?}", id);
						false
					}
				}
			}
		};
		if changed {
			scheduler.request(time.elapsed());
		}
	}
}

/// Read [EventRequestRecalculation] and pass them to the
/// [RecalculationScheduler]
#[cfg(not(tarpaulin_include))]
pub fn process_recalculation_requests(
	mut events: EventReader<EventRequestRecalculation>,
	mut scheduler: ResMut<RecalculationScheduler>,
	time: Res<Time>,
) {
	for _ in events.read() {
		scheduler.request(time.elapsed());
	}
}

/// Keep the [FlowFieldEngine] and [RecalculationScheduler] in step with the
/// [FlowFieldConfig] resource
#[cfg(not(tarpaulin_include))]
pub fn apply_config_changes(
	config: Res<FlowFieldConfig>,
	mut engine: ResMut<FlowFieldEngine>,
	mut scheduler: ResMut<RecalculationScheduler>,
) {
	if config.is_changed() {
		engine.apply_config(&config);
		scheduler.set_cooldown(config.recalculation_cooldown);
	}
}
