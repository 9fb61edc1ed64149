// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canvas_index::{BoundingBox, ItemKinds, RTree, SpatialItem};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A canvas laid out as an `n` by `n` grid of 120x80 components with 30 units of gutter.
fn gen_canvas(n: usize) -> Vec<SpatialItem<u32>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let i = (y * n + x) as u32;
            let b = BoundingBox::new(x as f64 * 150.0, y as f64 * 110.0, 120.0, 80.0);
            out.push(SpatialItem::component(format!("c{i}"), b, i));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Components scattered around a few hot spots, with a connection between each consecutive pair.
fn gen_clustered_diagram(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<SpatialItem<u32>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster * 2);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 5000.0, rng.next_f64() * 5000.0));
    }
    let mut i = 0_u32;
    let mut prev: Option<BoundingBox> = None;
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            let b = BoundingBox::new(cx + dx, cy + dy, 120.0, 80.0);
            out.push(SpatialItem::component(format!("c{i}"), b, i));
            if let Some(p) = prev {
                let link = BoundingBox::from_min_max(
                    p.center().0.min(b.center().0) - 4.0,
                    p.center().1.min(b.center().1) - 4.0,
                    p.center().0.max(b.center().0) + 4.0,
                    p.center().1.max(b.center().1) + 4.0,
                );
                out.push(SpatialItem::connection(format!("l{i}"), link, i));
            }
            prev = Some(b);
            i += 1;
        }
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_build");
    for &n in &[32usize, 64, 128] {
        let items = gen_canvas(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("insert_n{}", n), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = RTree::new();
                    for item in items {
                        let _ = tree.insert(item);
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("bulk_load_n{}", n), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = RTree::new();
                    let _ = tree.bulk_load(items);
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_viewport_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_viewport_queries");
    let items = gen_canvas(128);
    let mut incremental = RTree::new();
    for item in items.iter().cloned() {
        let _ = incremental.insert(item);
    }
    let mut bulk = RTree::new();
    let _ = bulk.bulk_load(items);

    for (name, tree) in [("incremental", &incremental), ("bulk", &bulk)] {
        group.bench_function(format!("pan_{}", name), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in 0..256 {
                    let x = (q % 64) as f64 * 200.0;
                    let y = (q / 64) as f64 * 150.0;
                    total += tree.query(&BoundingBox::new(x, y, 1280.0, 720.0)).len();
                }
                black_box(total)
            })
        });
        group.bench_function(format!("hit_test_{}", name), |b| {
            b.iter(|| {
                let mut total = 0usize;
                for q in 0..1024 {
                    let x = (q % 128) as f64 * 150.0 + 60.0;
                    let y = (q / 128) as f64 * 110.0 + 40.0;
                    total += tree.query_point(x, y).len();
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

fn bench_clustered_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_clustered");
    let items = gen_clustered_diagram(16, 256, 1500.0);
    group.bench_function("bulk_load_then_components_only", |b| {
        b.iter_batched(
            || items.clone(),
            |items| {
                let mut tree = RTree::new();
                let _ = tree.bulk_load(items);
                let mut total = 0usize;
                for q in 0..64 {
                    let x = (q % 8) as f64 * 600.0;
                    let y = (q / 8) as f64 * 600.0;
                    total += tree
                        .query_filtered(&BoundingBox::new(x, y, 800.0, 600.0), ItemKinds::COMPONENT)
                        .len();
                }
                black_box(total);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_drag_and_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_edit_heavy");
    let items = gen_canvas(64);
    let ids: Vec<String> = items.iter().map(|it| it.id.clone()).collect();
    group.bench_function("update_every_item", |b| {
        b.iter_batched(
            || {
                let mut tree = RTree::new();
                let _ = tree.bulk_load(items.clone());
                tree
            },
            |mut tree| {
                for (j, id) in ids.iter().enumerate() {
                    let dx = (j % 5) as f64 - 2.0;
                    let dy = ((j * 7) % 5) as f64 - 2.0;
                    let x = (j % 64) as f64 * 150.0 + dx;
                    let y = (j / 64) as f64 * 110.0 + dy;
                    tree.update(id, BoundingBox::new(x, y, 120.0, 80.0));
                }
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    // Crosses the rebuild threshold many times.
    group.bench_function("remove_half", |b| {
        b.iter_batched(
            || {
                let mut tree = RTree::new();
                let _ = tree.bulk_load(items.clone());
                tree
            },
            |mut tree| {
                for id in ids.iter().step_by(2) {
                    tree.remove(id);
                }
                black_box(tree.stats());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_viewport_queries,
    bench_clustered_filtered,
    bench_drag_and_delete,
);
criterion_main!(benches);
