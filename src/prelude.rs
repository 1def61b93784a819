//! `use bevy_flowfield_horde_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	agent::*,
	astar::*,
	config::*,
	cost_model::*,
	engine::*,
	fields::{cost_field::*, flow_field::*, integration_field::*, *},
	grid::*,
	scheduler::*,
	structures::*,
	terrain::*,
	utilities::*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{cost_layer::*, flow_layer::*, *},
};
