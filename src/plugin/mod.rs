//! Defines the Bevy [Plugin] for FlowField horde navigation
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod cost_layer;
pub mod flow_layer;

/// Order the plugin systems run in each frame
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Drain the inbound events
	Input,
	/// Rebuild the fields when scheduled
	Calculate,
	/// Move actors along the fields
	Movement,
}

/// Adds the navigation resources, events and systems. The
/// [FlowFieldEngine] itself is inserted by the application once the level
/// geometry and terrain are known, until then only structure bookkeeping runs
#[derive(Default)]
pub struct FlowFieldHordePlugin {
	/// Initial configuration, inserted as a resource
	config: FlowFieldConfig,
}

impl FlowFieldHordePlugin {
	/// Create the plugin with a custom [FlowFieldConfig]
	pub fn new(config: FlowFieldConfig) -> Self {
		FlowFieldHordePlugin { config }
	}
}

impl Plugin for FlowFieldHordePlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<Ordinal>()
			.register_type::<FieldCell>()
			.register_type::<MovementClass>()
			.register_type::<StructureId>()
			.register_type::<StructureCategory>()
			.register_type::<AgentMotion>()
			.insert_resource(self.config.clone())
			.insert_resource(RecalculationScheduler::new(
				self.config.recalculation_cooldown,
			))
			.init_resource::<StructureRegistry>()
			.add_event::<cost_layer::EventStructureChanged>()
			.add_event::<cost_layer::EventRequestRecalculation>()
			.add_event::<flow_layer::EventSetTarget>()
			.add_event::<flow_layer::EventClearTarget>()
			.add_event::<flow_layer::EventAttackStructure>()
			.configure_sets(
				Update,
				(
					OrderingSet::Input,
					OrderingSet::Calculate,
					OrderingSet::Movement,
				)
					.chain(),
			)
			.add_systems(
				Update,
				(
					(
						cost_layer::process_structure_changes,
						cost_layer::process_recalculation_requests,
						(
							cost_layer::apply_config_changes,
							flow_layer::process_target_changes,
						)
							.run_if(resource_exists::<FlowFieldEngine>),
					)
						.chain()
						.in_set(OrderingSet::Input),
					flow_layer::run_scheduled_recalculation
						.run_if(resource_exists::<FlowFieldEngine>)
						.in_set(OrderingSet::Calculate),
					flow_layer::move_agents
						.run_if(resource_exists::<FlowFieldEngine>)
						.in_set(OrderingSet::Movement),
				),
			);
	}
}
