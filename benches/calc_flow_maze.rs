//! Measure recalculating the FlowFields of every movement class when a
//! quarter of the ground is randomly flooded with water
//!
//! World is 200 cells by 200 cells
//!

use bevy::prelude::*;
use bevy_flowfield_horde_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Create an engine with randomly placed water, the corners are kept dry so
/// the actor and target have somewhere to stand
fn prepare_engine(width: usize, height: usize) -> FlowFieldEngine {
	let geometry = GridGeometry::new(IVec2::ZERO, width, height, 1.0);
	let mut terrain = TerrainMap::from_geometry(&geometry);
	// fixed seed so every run measures the same maze
	let mut rng = StdRng::seed_from_u64(3);
	for column in 0..width {
		for row in 0..height {
			let corner = (column == 0 && row == 0) || (column == width - 1 && row == height - 1);
			if !corner && rng.random_bool(0.25) {
				terrain.set_cell(TerrainCell::blocked(), FieldCell::new(column, row));
			}
		}
	}
	let mut engine = FlowFieldEngine::new(geometry, terrain, &FlowFieldConfig::default());
	engine.set_target(IVec2::ZERO);
	engine
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let mut engine = prepare_engine(200, 200);
	let registry = StructureRegistry::default();
	group.bench_function("calc_flow_maze", |b| {
		b.iter(|| engine.recompute(black_box(&registry)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
