use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use textdigest::{split_sentences, StopwordFilter, Summarizer};

const PARAGRAPH: &str = "Rust is a multi-paradigm programming language focused on performance \
    and safety. It enforces memory safety without a garbage collector. Dr. Graydon Hoare \
    started the project, e.g. as a personal experiment. The borrow checker tracks references \
    at compile time. Concurrency bugs such as data races are rejected by the compiler. \
    Cargo builds code, downloads dependencies and runs tests. ";

fn document(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

/// Benchmark sentence segmentation alone
fn bench_segmentation(c: &mut Criterion) {
    let text = document(50);
    let mut group = c.benchmark_group("segmentation");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("split_sentences", |b| {
        b.iter(|| split_sentences(black_box(&text)).len())
    });
    group.finish();
}

/// Benchmark full summarization across document sizes
fn bench_summarize(c: &mut Criterion) {
    let summarizer = Summarizer::default();
    let mut group = c.benchmark_group("summarize");

    for paragraphs in [1, 10, 100].iter() {
        let text = document(*paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("max_5", paragraphs),
            &text,
            |b, text| b.iter(|| summarizer.summarize(black_box(text), 5)),
        );
    }

    group.finish();
}

/// Benchmark stop-word list construction
fn bench_stopwords(c: &mut Criterion) {
    c.bench_function("stopwords_english", |b| b.iter(StopwordFilter::english));
}

criterion_group!(benches, bench_segmentation, bench_summarize, bench_stopwords);
criterion_main!(benches);
