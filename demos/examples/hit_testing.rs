// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and dragging on a small diagram.
//!
//! Run:
//! - `cargo run -p canvas_demos --example hit_testing`

use canvas_scene::{Connection, DiagramElement, SceneConfig, SceneEntity, SceneIndex};
use kurbo::{Point, Size};

fn describe(scene: &SceneIndex, p: Point) -> String {
    match scene.hit_test(p) {
        Some(hit) => match &hit.data {
            SceneEntity::Element { element_type } => format!("{} ({element_type})", hit.id),
            SceneEntity::Connection {
                source_id,
                target_id,
            } => format!("{} ({source_id} -> {target_id})", hit.id),
        },
        None => "nothing".to_string(),
    }
}

fn main() {
    env_logger::init();

    let mut scene = SceneIndex::from_diagram(
        SceneConfig::default(),
        [
            DiagramElement::new("backend", "group", Point::new(0.0, 0.0))
                .with_size(Size::new(600.0, 400.0)),
            DiagramElement::new("api", "service", Point::new(40.0, 40.0)),
            DiagramElement::new("db", "database", Point::new(400.0, 250.0)),
            DiagramElement::new("client", "actor", Point::new(800.0, 40.0)),
        ],
        [
            Connection::new("api-db", "api", "db", "sql"),
            Connection::new("client-api", "client", "api", "http"),
        ],
    )
    .expect("diagram ids are unique");

    let probes = [
        Point::new(60.0, 60.0),
        Point::new(300.0, 350.0),
        Point::new(700.0, 80.0),
        Point::new(900.0, 300.0),
    ];
    for p in probes {
        println!("{p:?}: {}", describe(&scene, p));
    }

    let damage = scene
        .move_element("client", Point::new(800.0, 500.0))
        .expect("client exists");
    println!("moved client, repaint {damage:?}");
    for p in probes {
        let all: Vec<_> = scene.hits_at(p).iter().map(|it| it.id.as_str()).collect();
        println!("{p:?}: {all:?}");
    }
}
