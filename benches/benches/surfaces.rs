//! Benchmark suite for surface definition parsing and flattening
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::{collections::BTreeSet, hint::black_box, path::Path};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mascot_avatar::{Flattener, Overrides, flatten::CollectedAnimation};
use mascot_benches::{generate_cyclic_surfaces_text, generate_surfaces_text};
use mascot_types::file::SurfaceGraph;

/// Benchmark parsing definition text of growing size
fn bench_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("surfaces_parse");

	for surfaces in [10u32, 100, 1000] {
		let text = generate_surfaces_text(surfaces, 8);
		group.throughput(Throughput::Bytes(text.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(surfaces), &text, |b, text| {
			b.iter(|| black_box(SurfaceGraph::parse(black_box(text))));
		});
	}

	group.finish();
}

/// Benchmark flattening a body surface with and without active binds
fn bench_flatten(c: &mut Criterion) {
	let mut group = c.benchmark_group("surfaces_flatten");
	let graph = SurfaceGraph::parse(&generate_surfaces_text(10, 16));
	// The directory does not exist, so implicit base lookups always miss
	let image_dir = Path::new("bench-missing-images");

	for (name, binds) in [("no_binds", BTreeSet::new()), ("bind_3", BTreeSet::from([3]))] {
		let flattener = Flattener::new(&graph, image_dir, &binds, 10);
		group.bench_function(name, |b| {
			b.iter(|| black_box(flattener.flatten(black_box(0), (0, 0), 0, &[], &Overrides::new())));
		});
	}

	group.finish();
}

/// Benchmark the depth bound on cyclic references
fn bench_cycle(c: &mut Criterion) {
	let mut group = c.benchmark_group("surfaces_cycle");
	let binds = BTreeSet::new();

	for length in [1u32, 4, 16] {
		let graph = SurfaceGraph::parse(&generate_cyclic_surfaces_text(length));
		let flattener = Flattener::new(&graph, Path::new("bench-missing-images"), &binds, 10);
		group.bench_with_input(BenchmarkId::from_parameter(length), &flattener, |b, flattener| {
			b.iter(|| black_box(flattener.flatten(0, (0, 0), 0, &[], &Overrides::new())));
		});
	}

	group.finish();
}

/// Benchmark the animation walk used for derived frames
fn bench_collect(c: &mut Criterion) {
	let graph = SurfaceGraph::parse(&generate_surfaces_text(10, 16));
	let binds = BTreeSet::from([3]);
	let flattener = Flattener::new(&graph, Path::new("bench-missing-images"), &binds, 10);

	c.bench_function("surfaces_collect_animations", |b| {
		b.iter(|| {
			let collected: Vec<CollectedAnimation<'_>> = flattener.collect_animations(black_box(0));
			black_box(collected)
		});
	});
}

criterion_group!(benches, bench_parse, bench_flatten, bench_cycle, bench_collect);
criterion_main!(benches);
