//! Measure recalculating the FlowFields of every movement class over open
//! ground (hence open - no water and no structures)
//!
//! World is 200 cells by 200 cells
//!

use bevy::prelude::*;
use bevy_flowfield_horde_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Create an engine over uniform terrain with a target in the bottom left
fn prepare_engine(width: usize, height: usize) -> FlowFieldEngine {
	let geometry = GridGeometry::new(IVec2::ZERO, width, height, 1.0);
	let terrain = TerrainMap::from_geometry(&geometry);
	let mut engine = FlowFieldEngine::new(geometry, terrain, &FlowFieldConfig::default());
	engine.set_target(IVec2::ZERO);
	engine
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let mut engine = prepare_engine(200, 200);
	let registry = StructureRegistry::default();
	group.bench_function("calc_flow_open", |b| {
		b.iter(|| engine.recompute(black_box(&registry)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
