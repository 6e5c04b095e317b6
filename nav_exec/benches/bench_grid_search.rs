//! # Grid Search Benchmark
//!
//! The worst case for a navigation cycle is a goal the search can't reach, which spends the whole
//! iteration budget before falling back to the potential field.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nalgebra::Vector2;
use nav_lib::{
    field::FieldLayout,
    geom::{Obstacle, Pose2},
    nav::{GridSearch, NavCtrl, NavCtrlParams},
};

fn grid_search_benchmark(c: &mut Criterion) {
    // ---- Build the scenarios ----

    let params = NavCtrlParams::default();
    let search = GridSearch::new(
        params.grid_resolution_m,
        params.max_search_iters,
        params.obstacle_influence_m,
    );

    let start = Vector2::new(0.0, 0.0);
    let goal = Vector2::new(5.0, 0.0);

    // A scattering of obstacles the route has to weave between
    let scattered = vec![
        Obstacle::new(1.5, 0.2, 0.3),
        Obstacle::new(2.5, -0.6, 0.25),
        Obstacle::new(3.2, 0.5, 0.4),
        Obstacle::new(4.0, -0.1, 0.2),
    ];

    // The goal sits inside an obstacle, so the search exhausts its budget
    let walled_off = vec![Obstacle::new(5.0, 0.0, 0.6)];

    // ---- Search only ----

    c.bench_function("GridSearch::search::open", |b| {
        b.iter(|| search.search(black_box(&start), black_box(&goal), &[]))
    });

    c.bench_function("GridSearch::search::scattered", |b| {
        b.iter(|| search.search(black_box(&start), black_box(&goal), &scattered))
    });

    c.bench_function("GridSearch::search::walled_off", |b| {
        b.iter(|| search.search(black_box(&start), black_box(&goal), &walled_off))
    });

    // ---- Full navigation cycle ----

    let mut layout = FieldLayout::new();
    layout.set_marker_pose(1, Pose2::new(goal.x, goal.y, 0.0));

    let nav_ctrl = match NavCtrl::new(params.clone(), layout.clone()) {
        Ok(n) => n,
        Err(e) => panic!("Invalid default parameters: {}", e),
    };

    let nav_ctrl_pf = match NavCtrl::new(
        NavCtrlParams {
            use_grid_search: false,
            ..params
        },
        layout,
    ) {
        Ok(n) => n,
        Err(e) => panic!("Invalid default parameters: {}", e),
    };

    let pose = Pose2::new(start.x, start.y, 0.3);

    c.bench_function("NavCtrl::update::grid_search", |b| {
        b.iter(|| nav_ctrl.update(black_box(&pose), 1, &scattered))
    });

    c.bench_function("NavCtrl::update::grid_search_walled_off", |b| {
        b.iter(|| nav_ctrl.update(black_box(&pose), 1, &walled_off))
    });

    c.bench_function("NavCtrl::update::potential_field", |b| {
        b.iter(|| nav_ctrl_pf.update(black_box(&pose), 1, &scattered))
    });
}

criterion_group!(benches, grid_search_benchmark);
criterion_main!(benches);
