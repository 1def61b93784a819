//! Measure finding a point to point route with A* from one corner of the map
//! to the other around scattered water
//!
//! World is 200 cells by 200 cells
//!

use bevy::prelude::*;
use bevy_flowfield_horde_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Create an engine with staggered lines of water, each line leaving a gap
/// at alternate ends so a route has to snake across the map
fn prepare_engine(width: usize, height: usize) -> FlowFieldEngine {
	let geometry = GridGeometry::new(IVec2::ZERO, width, height, 1.0);
	let mut terrain = TerrainMap::from_geometry(&geometry);
	for (i, row) in (10..height - 10).step_by(20).enumerate() {
		let gap = if i % 2 == 0 { width - 1 } else { 0 };
		for column in (0..width).filter(|c| *c != gap) {
			terrain.set_cell(TerrainCell::blocked(), FieldCell::new(column, row));
		}
	}
	let mut config = FlowFieldConfig::default();
	// the snaking route expands most of the map
	config.search.max_iterations = width * height;
	FlowFieldEngine::new(geometry, terrain, &config)
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let engine = prepare_engine(200, 200);
	let registry = StructureRegistry::default();
	// bottom left to top right
	let start = IVec2::new(0, 0);
	let goal = IVec2::new(199, 199);
	group.bench_function("calc_route", |b| {
		b.iter(|| engine.find_path(black_box(start), black_box(goal), black_box(&registry)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
