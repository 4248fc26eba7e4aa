//! Performance benchmarks for scene-sim

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scene_sim::{NodeKind, Session};

fn populated_session(rects_per_frame: usize, frames: usize) -> Session {
    let mut session = Session::default();
    for _ in 0..frames {
        let frame = session.create_frame();
        for _ in 0..rects_per_frame {
            let rect = session.create_rectangle();
            session.append_child(frame, rect).unwrap();
        }
    }
    session
}

fn bench_node_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_creation");

    group.bench_function("session_new", |b| b.iter(Session::default));

    group.bench_function("create_rectangle", |b| {
        let mut session = Session::default();
        b.iter(|| black_box(session.create_rectangle()))
    });

    group.bench_function("append_child", |b| {
        let mut session = Session::default();
        let frame = session.create_frame();
        b.iter(|| {
            let rect = session.create_rectangle();
            session.append_child(black_box(frame), black_box(rect))
        })
    });

    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for size in [10usize, 100, 1000] {
        let session = populated_session(size / 10, 10);
        group.bench_with_input(BenchmarkId::new("find_all", size), &size, |b, _| {
            let page = session.current_page();
            b.iter(|| {
                black_box(session.find_all(page, |node| node.kind == NodeKind::Rectangle))
            })
        });
    }

    let session = populated_session(100, 10);
    group.bench_function("get_node_by_id", |b| {
        b.iter(|| black_box(session.get_node_by_id("1:500")))
    });

    group.finish();
}

fn bench_instances(c: &mut Criterion) {
    let mut group = c.benchmark_group("instances");

    group.bench_function("create_instance_50_children", |b| {
        let mut session = Session::default();
        let component = session.create_component();
        for _ in 0..50 {
            let rect = session.create_rectangle();
            session.append_child(component, rect).unwrap();
        }
        b.iter(|| black_box(session.create_instance(component)))
    });

    group.bench_function("plugin_data_inherited_read", |b| {
        let mut session = Session::default();
        let component = session.create_component();
        session.set_plugin_data(component, "key", "value").unwrap();
        let mut node = component;
        // A ten-deep clone chain forces the fallback walk.
        for _ in 0..10 {
            node = session.create_instance(node);
        }
        b.iter(|| black_box(session.plugin_data(node, "key")))
    });

    group.finish();
}

criterion_group!(benches, bench_node_creation, bench_traversal, bench_instances);
criterion_main!(benches);
