// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the formwerk-document crate: the text engine on
// its own, and the full text → DOCX path without logos.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use formwerk_document::{Branding, DocxWriter, transform};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A human-sized document: a title, a few sections, multi-line paragraphs.
fn sample_document() -> String {
    let mut text = String::from("# Quarterly Report\n\n## Engineering\n\n");
    for section in 0..20 {
        text.push_str(&format!("### Section {section}\n\n"));
        text.push_str("The team shipped the new ingest pipeline.\n");
        text.push_str("Latency dropped by a third across regions.\n\n");
        text.push_str("#### Details\n\nMore body text follows here, line after line.\n\n");
    }
    text
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_transform(c: &mut Criterion) {
    let text = sample_document();
    c.bench_function("transform (20 sections)", |b| {
        b.iter(|| black_box(transform(black_box(&text))));
    });
}

/// Escaped single-line payloads take the recovery path in normalisation.
fn bench_transform_escaped(c: &mut Criterion) {
    let text = sample_document().replace('\n', "\\n");
    c.bench_function("transform escaped (20 sections)", |b| {
        b.iter(|| black_box(transform(black_box(&text))));
    });
}

fn bench_docx_build(c: &mut Criterion) {
    let blocks = transform(&sample_document());
    let writer = DocxWriter::default();
    let branding = Branding::default();
    c.bench_function("docx build (20 sections, no logos)", |b| {
        b.iter(|| black_box(writer.build(black_box(&blocks), &branding)));
    });
}

criterion_group!(
    benches,
    bench_transform,
    bench_transform_escaped,
    bench_docx_build
);
criterion_main!(benches);
