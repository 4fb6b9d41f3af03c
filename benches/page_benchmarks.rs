//! Criterion benchmarks for page content operations.
//!
//! Run with: `cargo bench`
//!
//! Measures the stored-page codec, rendering at a fixed width, and the panel
//! grid geometry as the number of placements grows.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use page_blocks::core::layout::{Panel, PanelLayout, Placement};
use page_blocks::core::{PageValidator, TextBlock};
use page_blocks::{Block, BlockCatalog, BlockKind, Renderer};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_page(n: usize) -> Vec<Block> {
    (0..n)
        .map(|i| {
            let kind = BlockKind::ALL[i % (BlockKind::ALL.len() - 1)];
            BlockCatalog::create(kind)
        })
        .collect()
}

fn make_grid(panels: usize) -> PanelLayout {
    let mut grid = PanelLayout::default();
    for i in 0..panels {
        let id = format!("p{}", i);
        let x = (i as u32 * 4) % 12;
        let y = (i as u32 / 3) * 6;
        grid.layout.push(Placement::new(id.clone(), x, y, 4, 6));
        grid.panels.insert(
            id,
            Panel {
                blocks: vec![Block::Text(TextBlock {
                    content: format!("<p>panel {}</p>", i),
                })],
            },
        );
    }
    grid
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_sequence");

    for count in [10, 100, 1_000] {
        let content = Block::serialize_sequence(&make_page(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &content, |b, content| {
            b.iter(|| black_box(Block::parse_sequence(content).unwrap().len()));
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize_sequence");

    for count in [10, 100, 1_000] {
        let page = make_page(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &page, |b, page| {
            b.iter(|| black_box(Block::serialize_sequence(page).unwrap().len()));
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for count in [10, 100, 1_000] {
        let mut page = make_page(count);
        page.push(Block::PanelLayout(make_grid(12)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &page, |b, page| {
            b.iter(|| black_box(Renderer::render(page, 970.0).nodes.len()));
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");

    for panels in [4, 32, 256] {
        let blocks = vec![Block::PanelLayout(make_grid(panels))];
        group.bench_with_input(BenchmarkId::from_parameter(panels), &blocks, |b, blocks| {
            let mut page = Renderer::render(blocks, 970.0);
            let mut width = 970.0;
            b.iter(|| {
                width = if width > 600.0 { 480.0 } else { 970.0 };
                black_box(page.resize(width))
            });
        });
    }
    group.finish();
}

fn bench_grid_geometry(c: &mut Criterion) {
    let grid = make_grid(256);
    c.bench_function("grid_content_height_256", |b| {
        b.iter(|| {
            let geometry = grid.geometry(black_box(970.0));
            black_box(geometry.content_height(&grid.layout))
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let page = make_page(1_000);
    c.bench_function("validate_1000", |b| {
        b.iter(|| black_box(PageValidator::validate(&page).valid));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_serialize,
    bench_render,
    bench_resize,
    bench_grid_geometry,
    bench_validate,
);
criterion_main!(benches);
