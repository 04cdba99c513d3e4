//! Decode pipeline benchmark: frame splitting and snapshot extraction.
//!
//! Extraction runs once per decoded frame, so its cost on a growing
//! buffer dominates streaming overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rephrase_client::{extract_snapshot, FrameDecoder, StreamBuffer};

/// Builds a four-field style document with roughly `chars` characters
/// per field.
fn style_document(chars: usize) -> String {
    let filler = "please send the report over when you can "
        .chars()
        .cycle()
        .take(chars)
        .collect::<String>();
    format!(
        r#"{{"professional": "{filler}", "casual": "{filler}", "polite": "{filler}", "social_media": "{filler}"}}"#
    )
}

fn extract_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_complete");

    for chars in [64, 512, 4096] {
        let document = style_document(chars);
        group.bench_with_input(
            BenchmarkId::from_parameter(chars),
            &document,
            |b, document| b.iter(|| extract_snapshot(black_box(document))),
        );
    }

    group.finish();
}

fn extract_partial(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_partial");

    for chars in [64, 512, 4096] {
        let document = style_document(chars);
        // Truncating mid-document forces the substring scan path
        let cut = document.len() * 6 / 10;
        let partial = &document[..cut];
        group.bench_with_input(BenchmarkId::from_parameter(chars), &partial, |b, partial| {
            b.iter(|| extract_snapshot(black_box(partial)))
        });
    }

    group.finish();
}

fn frame_decoding(c: &mut Criterion) {
    let document = style_document(512);
    let framed: String = document
        .as_bytes()
        .chunks(16)
        .map(|piece| format!("data: {}\n\n", String::from_utf8_lossy(piece)))
        .collect();
    let chunks: Vec<&str> = framed
        .as_bytes()
        .chunks(64)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect();

    c.bench_function("frame_decoding_512", |b| {
        b.iter(|| {
            let mut decoder = FrameDecoder::new();
            let mut payloads = 0usize;
            for chunk in &chunks {
                payloads += decoder.push(black_box(chunk)).len();
            }
            payloads
        })
    });
}

fn incremental_pipeline(c: &mut Criterion) {
    let document = style_document(512);
    let payloads: Vec<String> = document
        .chars()
        .collect::<Vec<char>>()
        .chunks(16)
        .map(|piece| piece.iter().collect())
        .collect();

    c.bench_function("incremental_pipeline_512", |b| {
        b.iter(|| {
            let mut decoder = FrameDecoder::new();
            let mut buffer = StreamBuffer::new();
            let mut snapshots = 0usize;
            for payload in &payloads {
                let chunk = format!("data: {payload}\n\n");
                for decoded in decoder.push(black_box(&chunk)) {
                    buffer.append(&decoded);
                    if extract_snapshot(buffer.as_str()).is_some() {
                        snapshots += 1;
                    }
                }
            }
            snapshots
        })
    });
}

criterion_group!(
    benches,
    extract_complete,
    extract_partial,
    frame_decoding,
    incremental_pipeline,
);
criterion_main!(benches);
