//! Measure recalculating the FlowFields of every movement class when the
//! target is surrounded by rings of walls of rising tiers and dotted with
//! buildings
//!
//! World is 200 cells by 200 cells
//!

use bevy::prelude::*;
use bevy_flowfield_horde_plugin::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build square rings of single cell walls around the centre of the map, the
/// inner rings being the sturdiest, and a grid of 3x3 buildings outside them
fn prepare_fortress(width: usize, height: usize) -> (FlowFieldEngine, StructureRegistry) {
	let geometry = GridGeometry::new(IVec2::ZERO, width, height, 1.0);
	let terrain = TerrainMap::from_geometry(&geometry);
	let centre = IVec2::new(width as i32 / 2, height as i32 / 2);
	let mut registry = StructureRegistry::default();
	for (tier, radius) in [(2, 10), (1, 20), (0, 30)] {
		let min = centre - IVec2::splat(radius);
		let span = (radius * 2 + 1) as u32;
		let sides = [
			(min, span, 1),
			(min + IVec2::new(0, radius * 2), span, 1),
			(min + IVec2::Y, 1, span - 2),
			(min + IVec2::new(radius * 2, 1), 1, span - 2),
		];
		for (origin, w, h) in sides {
			registry.insert(StructureDescriptor::new(
				origin,
				w,
				h,
				StructureCategory::Wall,
				tier,
				100.0,
			));
		}
	}
	for x in (2..width as i32 - 3).step_by(12) {
		for y in (2..height as i32 - 3).step_by(12) {
			let origin = IVec2::new(x, y);
			let offset = (origin - centre).abs();
			if offset.x <= 32 && offset.y <= 32 {
				continue;
			}
			registry.insert(StructureDescriptor::new(
				origin,
				3,
				3,
				StructureCategory::Building,
				0,
				250.0,
			));
		}
	}
	let mut engine = FlowFieldEngine::new(geometry, terrain, &FlowFieldConfig::default());
	engine.set_target(centre);
	(engine, registry)
}

pub fn criterion_benchmark(c: &mut Criterion) {
	let mut group = c.benchmark_group("algorithm_use");
	group.significance_level(0.05).sample_size(100);
	let (mut engine, registry) = prepare_fortress(200, 200);
	group.bench_function("calc_flow_fortified", |b| {
		b.iter(|| engine.recompute(black_box(&registry)))
	});
	group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
