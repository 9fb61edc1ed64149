// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use canvas_index::{BoundingBox, RTree as CanvasTree, SpatialItem};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn gen_grid_items(n: usize, cell: f64) -> Vec<SpatialItem<u32>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let i = (y * n + x) as u32;
            let b = BoundingBox::new(x as f64 * cell, y as f64 * cell, cell, cell);
            out.push(SpatialItem::component(format!("g{i}"), b, i));
        }
    }
    out
}

fn to_rstar_rects(v: &[SpatialItem<u32>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|it| {
            let b = it.bounds;
            Rectangle::from_corners([b.x, b.y], [b.max_x(), b.max_y()])
        })
        .collect()
}

fn bench_rtree_external_compare_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare_f64");
    for &n in &[64usize, 128] {
        let items = gen_grid_items(n, 10.0);
        let query = BoundingBox::new(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("canvas_build_query_n{}", n), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = CanvasTree::new();
                    for item in items {
                        let _ = tree.insert(item);
                    }
                    black_box(tree.query(&query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("canvas_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = CanvasTree::new();
                    let _ = tree.bulk_load(items);
                    black_box(tree.query(&query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&items),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb =
                        AABB::from_corners([query.x, query.y], [query.max_x(), query.max_y()]);
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare_f64);
criterion_main!(benches);
