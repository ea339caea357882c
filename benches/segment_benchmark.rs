//! Benchmarks for layout analysis and question segmentation.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use exampdf::extract::{segment_page, split_question};
use exampdf::geometry::Rect;
use exampdf::parser::{LayoutAnalyzer, TextSpan, DEFAULT_BLOCK_START_PATTERN};
use exampdf::{ExtractOptions, PageLayout, TextBlock};

/// Spans of a two-column page holding `per_column` questions per column,
/// each with a two-line stem and four options.
fn exam_spans(per_column: usize) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    for (col, x) in [(0, 50.0f32), (1, 320.0f32)] {
        let mut y = 60.0f32;
        for q in 0..per_column {
            let n = col * per_column + q + 1;
            spans.push(TextSpan::new(format!("{}. 다음 중 지적측량에 관한", n), x, y, 200.0, 10.0));
            y += 14.0;
            spans.push(TextSpan::new("설명으로 옳은 것은?", x, y, 120.0, 10.0));
            for (i, marker) in ['①', '②', '③', '④'].iter().enumerate() {
                y += 14.0;
                spans.push(TextSpan::new(format!("{} 보기 {}", marker, i + 1), x + 10.0, y, 60.0, 10.0));
            }
            y += 30.0;
        }
    }
    spans
}

fn exam_page(per_column: usize) -> PageLayout {
    let analyzer =
        LayoutAnalyzer::new().with_block_start(regex::Regex::new(DEFAULT_BLOCK_START_PATTERN).unwrap());
    let mut page = PageLayout::new(1, 600.0, 842.0);
    page.blocks = analyzer.build_blocks(exam_spans(per_column), page.mid_x());
    page.drawings.push(Rect::new(80.0, 300.0, 200.0, 360.0));
    page
}

/// Benchmark span to block grouping.
fn bench_layout(c: &mut Criterion) {
    let spans = exam_spans(8);
    let analyzer =
        LayoutAnalyzer::new().with_block_start(regex::Regex::new(DEFAULT_BLOCK_START_PATTERN).unwrap());

    c.bench_function("build_blocks_16_questions", |b| {
        b.iter(|| analyzer.build_blocks(black_box(spans.clone()), 300.0));
    });
}

/// Benchmark question segmentation at various densities.
fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let options = ExtractOptions::default();

    for per_column in [2, 8, 20] {
        let page = exam_page(per_column);
        group.bench_function(format!("{}_per_column", per_column), |b| {
            b.iter(|| segment_page(black_box(&page), &options));
        });
    }

    group.finish();
}

/// Benchmark stem/option splitting.
fn bench_split(c: &mut Criterion) {
    let blocks = [
        TextBlock::new(Rect::default(), "문 12. 다음 중 지적측량의 목적으로 옳지 않은 것은?"),
        TextBlock::new(Rect::default(), "① 토지의 경계 확정 ② 면적 측정"),
        TextBlock::new(Rect::default(), "③ 지적공부 작성 ④ 건물 설계"),
    ];
    let refs: Vec<&TextBlock> = blocks.iter().collect();
    let options = ExtractOptions::default();

    c.bench_function("split_question", |b| {
        b.iter(|| split_question(black_box(&refs), &options.question_pattern));
    });
}

criterion_group!(benches, bench_layout, bench_segmentation, bench_split);
criterion_main!(benches);
