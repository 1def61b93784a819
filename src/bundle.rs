//! Components an actor needs to be steered by the horde navigation
//!

use crate::prelude::*;
use bevy::prelude::*;

/// An actor moving along the flow field
#[derive(Bundle)]
pub struct HordeAgentBundle {
	/// Hop state of the actor
	motion: AgentMotion,
	/// Which fields steer the actor
	class: MovementClass,
	/// Position of the actor, only the XY plane is navigated
	transform: Transform,
}

impl HordeAgentBundle {
	/// Create a new instance of [HordeAgentBundle] at a world position on the
	/// XY plane, moving `speed` world units per second
	pub fn new(position: Vec2, class: MovementClass, speed: f32) -> Self {
		HordeAgentBundle {
			motion: AgentMotion::new(speed),
			class,
			transform: Transform::from_translation(position.extend(0.0)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn new_bundle() {
		let bundle = HordeAgentBundle::new(Vec2::new(3.0, 4.0), MovementClass::Tunneling, 2.0);
		assert_eq!(Vec3::new(3.0, 4.0, 0.0), bundle.transform.translation);
		assert_eq!(MovementClass::Tunneling, bundle.class);
		assert_eq!(2.0, bundle.motion.get_speed());
		assert_eq!(None, bundle.motion.get_current_cell());
	}
}
