//! Benchmarks for outline_eval

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use outline_eval::{evaluate_course, parse_outline, Embedder, Result};

/// Deterministic in-memory oracle: one-hot vectors keyed by FNV-1a, no
/// backend round trip, so the benchmarks measure the engine itself.
struct HashEmbedder;

impl Embedder for HashEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut hash: u64 = 0xcbf29ce484222325;
                for byte in t.bytes() {
                    hash ^= u64::from(byte);
                    hash = hash.wrapping_mul(0x100000001b3);
                }
                let mut vector = vec![0.0f32; 64];
                vector[(hash % 64) as usize] = 1.0;
                vector
            })
            .collect())
    }
}

/// Synthetic course with `sections` sections of `topics` topics each.
fn synthetic_outline(sections: usize, topics: usize) -> String {
    let mut text = String::new();
    for s in 0..sections {
        text.push_str(&format!("{}. Section {}\n", s + 1, s + 1));
        for t in 0..topics {
            text.push_str(&format!("- topic {} {}\n", s, t));
        }
    }
    text
}

fn benchmark_parsing(c: &mut Criterion) {
    let text = synthetic_outline(10, 8);

    c.bench_function("parse_outline", |b| {
        b.iter(|| parse_outline(black_box(&text)))
    });

    let mut group = c.benchmark_group("parse_by_size");
    for sections in [5, 20, 80].iter() {
        let text = synthetic_outline(*sections, 8);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| parse_outline(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_evaluation(c: &mut Criterion) {
    let course = synthetic_outline(10, 8);
    let reference = synthetic_outline(10, 8);

    c.bench_function("evaluate_no_reference", |b| {
        b.iter(|| evaluate_course(black_box(&course), None, None, &HashEmbedder))
    });

    c.bench_function("evaluate_with_reference", |b| {
        b.iter(|| {
            evaluate_course(
                black_box(&course),
                Some(black_box(&reference)),
                None,
                &HashEmbedder,
            )
        })
    });

    let mut group = c.benchmark_group("evaluate_by_size");
    for sections in [4, 10, 25].iter() {
        let course = synthetic_outline(*sections, 6);
        let reference = synthetic_outline(*sections, 6);
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &(course, reference),
            |b, (course, reference)| {
                b.iter(|| {
                    evaluate_course(
                        black_box(course),
                        Some(black_box(reference)),
                        None,
                        &HashEmbedder,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, benchmark_parsing, benchmark_evaluation);
criterion_main!(benches);
