use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use slngraph_core::{DependencyGraph, ProjectRecord};

/// (name, layers, projects per layer)
const TIERS: [(&str, usize, usize); 3] = [("small", 4, 5), ("medium", 8, 20), ("large", 16, 40)];

/// A layered solution: every project references three projects of the layer
/// below, so closures overlap heavily.
fn layered_records(layers: usize, width: usize) -> Vec<ProjectRecord> {
    let mut records = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for slot in 0..width {
            let name = format!("L{layer}.P{slot}");
            let refs: Vec<String> = if layer + 1 < layers {
                (0..3)
                    .map(|k| format!("L{}.P{}", layer + 1, (slot + k * 7) % width))
                    .collect()
            } else {
                Vec::new()
            };
            records.push(ProjectRecord::new(&name, format!("{name}.csproj")).with_references(refs));
        }
    }
    records
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph.layered");

    for (tier, layers, width) in TIERS {
        let records = layered_records(layers, width);
        group.throughput(Throughput::Elements(records.len() as u64));

        group.bench_with_input(BenchmarkId::new("build", tier), &records, |b, records| {
            b.iter(|| black_box(DependencyGraph::from_records(records.clone())))
        });

        group.bench_with_input(BenchmarkId::new("closures", tier), &records, |b, records| {
            b.iter(|| {
                let graph = DependencyGraph::from_records(records.clone()).expect("build");
                let total: usize = graph
                    .nodes()
                    .map(|node| {
                        graph
                            .deep_depends_on(node.key().as_str())
                            .map_or(0, |set| set.len())
                    })
                    .sum();
                black_box(total)
            });
        });

        group.bench_with_input(BenchmarkId::new("pure", tier), &records, |b, records| {
            b.iter(|| {
                let graph = DependencyGraph::from_records(records.clone()).expect("build");
                for node in graph.nodes() {
                    black_box(graph.find_pure_dependencies(node.key().as_str()).ok());
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("sort", tier), &records, |b, records| {
            b.iter(|| {
                let graph = DependencyGraph::from_records(records.clone()).expect("build");
                black_box(graph.build_waves().map(|waves| waves.len()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
