//! Tunable parameters of the navigation, held as a [Resource] and inserted by
//! [crate::prelude::FlowFieldHordePlugin]
//!

use std::time::Duration;

use bevy::prelude::*;

/// Pricing of structures by the [crate::prelude::CostModel]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CostConfig {
	/// Base cost of a full health wall indexed by tier, tiers beyond the end
	/// use the last entry
	pub wall_tier_costs: Vec<f32>,
	/// Base cost of a full health non-wall building, a band above every wall
	pub building_base_cost: f32,
	/// Cost of a structure with no health left
	pub minimum_cost: f32,
}

impl Default for CostConfig {
	fn default() -> Self {
		CostConfig {
			wall_tier_costs: vec![20.0, 40.0, 60.0],
			building_base_cost: 80.0,
			minimum_cost: 2.0,
		}
	}
}

impl CostConfig {
	/// Base cost of a wall of the given tier
	pub fn wall_cost(&self, tier: u8) -> f32 {
		let index = (tier as usize).min(self.wall_tier_costs.len().saturating_sub(1));
		self.wall_tier_costs
			.get(index)
			.copied()
			.unwrap_or(self.building_base_cost)
	}
}

/// Behaviour of the A* point-to-point search
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
	/// Allow 8-directional movement, otherwise only cardinal steps are taken
	pub allow_diagonal: bool,
	/// Number of expanded nodes after which the search gives up
	pub max_iterations: usize,
	/// Remove redundant waypoints with line of sight checks, a shortcut never
	/// crosses a cell costlier than the stretch of route it replaces
	pub smooth: bool,
}

impl Default for SearchConfig {
	fn default() -> Self {
		SearchConfig {
			allow_diagonal: true,
			max_iterations: 10_000,
			smooth: true,
		}
	}
}

/// Behaviour of [crate::prelude::AgentMotion]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentConfig {
	/// Distance in world units at which a hop counts as complete
	pub arrival_epsilon: f32,
	/// Distance in cells an agent may drift from its tracked cells before
	/// being resynchronised
	pub resync_distance: f32,
	/// How often the drift is checked
	pub resync_interval: Duration,
}

impl Default for AgentConfig {
	fn default() -> Self {
		AgentConfig {
			arrival_epsilon: 0.05,
			resync_distance: 1.5,
			resync_interval: Duration::from_millis(500),
		}
	}
}

/// Configuration of the flow field navigation
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct FlowFieldConfig {
	/// Pricing of structures
	pub cost: CostConfig,
	/// A* search
	pub search: SearchConfig,
	/// Actor movement
	pub agent: AgentConfig,
	/// Minimum delay between a recalculation request and it being serviced,
	/// requests within the window are coalesced
	pub recalculation_cooldown: Duration,
	/// Smallest change of a structure's health fraction which warrants a
	/// recalculation
	pub health_change_threshold: f32,
}

impl Default for FlowFieldConfig {
	fn default() -> Self {
		FlowFieldConfig {
			cost: CostConfig::default(),
			search: SearchConfig::default(),
			agent: AgentConfig::default(),
			recalculation_cooldown: Duration::from_millis(100),
			health_change_threshold: 0.05,
		}
	}
}

impl FlowFieldConfig {
	/// From a `ron` file generate the [FlowFieldConfig]
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Self {
		let file = std::fs::File::open(path).expect("Failed opening FlowFieldConfig file");
		match ron::de::from_reader(file) {
			Ok(config) => config,
			Err(e) => panic!("Failed deserializing FlowFieldConfig: {}", e),
		}
	}
}
