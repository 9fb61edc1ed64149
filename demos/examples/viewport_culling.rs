// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport culling over a large bulk-loaded diagram.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p canvas_demos --example viewport_culling`

use canvas_scene::{Connection, DiagramElement, SceneConfig, SceneIndex};
use kurbo::{Point, Rect};

const COLS: usize = 40;
const ROWS: usize = 25;

fn main() {
    env_logger::init();

    let mut elements = Vec::with_capacity(COLS * ROWS);
    let mut connections = Vec::new();
    for row in 0..ROWS {
        for col in 0..COLS {
            let id = format!("n{row}_{col}");
            let at = Point::new(col as f64 * 200.0, row as f64 * 150.0);
            elements.push(DiagramElement::new(id.clone(), "service", at));
            if col > 0 {
                let prev = format!("n{row}_{}", col - 1);
                connections.push(Connection::new(format!("{prev}->{id}"), prev, id, "calls"));
            }
        }
    }

    let scene = SceneIndex::from_diagram(SceneConfig::default(), elements, connections)
        .expect("generated ids are unique");
    log::info!("index: {:?}", scene.index().stats());

    // Pan a 1280x720 window diagonally across the canvas.
    for step in 0..5 {
        let origin = Point::new(step as f64 * 1500.0, step as f64 * 700.0);
        let viewport = Rect::from_origin_size(origin, (1280.0, 720.0));
        let visible = scene.visible(viewport);
        let links = visible
            .iter()
            .filter(|it| it.kind == canvas_index::ItemKind::Connection)
            .count();
        println!(
            "viewport at {origin:?}: {} visible ({} elements, {links} connections)",
            visible.len(),
            visible.len() - links
        );
    }
}
