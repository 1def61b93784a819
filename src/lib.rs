//! This is a plugin for Bevy game engine to steer a horde of actors towards a
//! single shared target with FlowFields, smashing through destructible
//! structures on the way, with an A* search for actors that need their own
//! route
//!

pub mod bundle;
pub mod flowfields;
pub mod plugin;

pub mod prelude;
