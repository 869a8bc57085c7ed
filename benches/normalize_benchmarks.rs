//! Normalization and Matching Benchmarks
//!
//! Measures page normalization (the per-page cost paid once per document)
//! and query matching over normalized text.
//!
//! Run with: `cargo bench --bench normalize_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pdf_finder::config::FindOptions;
use pdf_finder::search::compile;
use pdf_finder::text::normalize;

/// Latin page with accents, hyphenated line ends and typographic quotes
fn latin_page(lines: usize) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!(
            "Line {} of the caf\u{e9} r\u{e9}sum\u{e9}: \u{201c}na\u{ef}ve\u{201d} co-\noperation ",
            i
        ));
        text.push_str("with \u{fb01}ne ligatures and \u{bd} cup\n");
    }
    text
}

/// CJK page with line breaks between ideographs and Hangul syllables
fn cjk_page(lines: usize) -> String {
    let mut text = String::new();
    for _ in 0..lines {
        text.push_str("这是一个文档搜索测试\n한국어 문장입니다 \u{304C}\nき\n");
    }
    text
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for lines in [10, 100, 1000] {
        let latin = latin_page(lines);
        group.throughput(Throughput::Bytes(latin.len() as u64));
        group.bench_with_input(BenchmarkId::new("latin", lines), &latin, |b, text| {
            b.iter(|| normalize(black_box(text)))
        });

        let cjk = cjk_page(lines);
        group.throughput(Throughput::Bytes(cjk.len() as u64));
        group.bench_with_input(BenchmarkId::new("cjk", lines), &cjk, |b, text| {
            b.iter(|| normalize(black_box(text)))
        });
    }

    group.finish();
}

fn bench_offset_lookup(c: &mut Criterion) {
    let normalized = normalize(&latin_page(1000));
    let len = normalized.char_len();

    c.bench_function("offset_map_original_index", |b| {
        b.iter(|| {
            for i in (0..len).step_by(97) {
                black_box(normalized.offsets.original_index(black_box(i)));
            }
        })
    });
}

fn bench_matching(c: &mut Criterion) {
    let page = normalize(&latin_page(1000));
    let mut group = c.benchmark_group("match");

    let single = compile("cooperation", &FindOptions::default()).unwrap();
    group.bench_function("single_term", |b| {
        b.iter(|| single.find_iter(black_box(&page.text)).count())
    });

    let multi = compile(vec!["cafe", "resume", "naive"], &FindOptions::default()).unwrap();
    group.bench_function("multi_term", |b| {
        b.iter(|| multi.find_iter(black_box(&page.text)).count())
    });

    let words = compile("fine", &FindOptions::new().with_entire_word(true)).unwrap();
    group.bench_function("entire_word", |b| {
        b.iter(|| words.find_iter(black_box(&page.text)).count())
    });

    group.finish();
}

criterion_group!(benches, bench_normalize, bench_offset_lookup, bench_matching);
criterion_main!(benches);
