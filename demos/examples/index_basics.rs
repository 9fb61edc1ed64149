// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic R-tree usage: insert, query, move, remove, and inspect stats.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p canvas_demos --example index_basics`

use canvas_index::{BoundingBox, ItemKinds, RTree, SpatialItem};

fn main() {
    env_logger::init();

    let mut tree = RTree::new();
    for i in 0..12_u32 {
        let b = BoundingBox::new(f64::from(i % 4) * 150.0, f64::from(i / 4) * 110.0, 120.0, 80.0);
        tree.insert(SpatialItem::component(format!("box{i}"), b, i))
            .expect("generated items are valid");
    }
    tree.insert(SpatialItem::connection(
        "wire",
        BoundingBox::new(56.0, 36.0, 308.0, 8.0),
        100,
    ))
    .expect("wire is valid");
    println!("after inserts: {:?}", tree.stats());

    let view = BoundingBox::new(0.0, 0.0, 300.0, 100.0);
    let mut ids: Vec<_> = tree.query(&view).iter().map(|it| it.id.clone()).collect();
    ids.sort();
    println!("in {view:?}: {ids:?}");

    let parts: Vec<_> = tree
        .query_filtered(&view, ItemKinds::COMPONENT)
        .iter()
        .map(|it| it.data)
        .collect();
    println!("components only: {parts:?}");

    let under: Vec<_> = tree.query_point(200.0, 40.0).iter().map(|it| it.id.clone()).collect();
    println!("under (200, 40): {under:?}");

    tree.update("box0", BoundingBox::new(1000.0, 1000.0, 120.0, 80.0));
    println!("box0 now at {:?}", tree.get("box0").map(|it| it.bounds));

    for i in 0..6 {
        tree.remove(&format!("box{i}"));
    }
    println!("after removals: {:?}", tree.stats());
}
