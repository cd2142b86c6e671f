use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sitetree::config::{LayoutConfig, RenderConfig};
use sitetree::layout::{FixedMetrics, compute_layout};
use sitetree::render::render_svg;
use sitetree::theme::Theme;
use sitetree::tree::Forest;
use std::hint::black_box;

/// One root, `groups` children, `leaves` grandchildren per child.
fn dense_rows(groups: usize, leaves: usize) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(groups * leaves);
    for g in 0..groups {
        for l in 0..leaves {
            rows.push(vec![
                "root".to_string(),
                format!("group {g}"),
                format!("item {g}-{l}"),
            ]);
        }
    }
    rows
}

fn bench_layout(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    let metrics = FixedMetrics::default();

    let mut group = c.benchmark_group("layout");
    for (groups, leaves) in [(10, 10), (30, 30), (100, 50)] {
        let rows = dense_rows(groups, leaves);
        let forest = Forest::from_rows(rows.clone());
        group.bench_with_input(
            BenchmarkId::new("build", groups * leaves),
            &rows,
            |b, rows| b.iter(|| black_box(Forest::from_rows(rows.clone()))),
        );
        group.bench_with_input(
            BenchmarkId::new("compute", groups * leaves),
            &forest,
            |b, forest| b.iter(|| black_box(compute_layout(forest, &metrics, &theme, &config))),
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    let render = RenderConfig::default();
    let forest = Forest::from_rows(dense_rows(30, 30));
    let layout = compute_layout(&forest, &FixedMetrics::default(), &theme, &config);

    c.bench_function("render_svg_900_leaves", |b| {
        b.iter(|| black_box(render_svg(&forest, &layout, &theme, &config, &render)))
    });
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
