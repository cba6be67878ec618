// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for SMS body segmentation in smsguard-core.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use smsguard_core::segment::{SINGLE_SEGMENT_LIMIT, split_segments};

/// Segment GSM 7-bit and UCS-2 bodies of increasing length.
///
/// Sizes cover a single part, a typical three-part message, and the ten-part
/// ceiling most carriers accept.
fn bench_split_segments(c: &mut Criterion) {
    let sizes: &[(&str, usize)] = &[("160", 160), ("450", 450), ("1530", 1530)];

    let mut group = c.benchmark_group("split_segments");
    for &(label, len) in sizes {
        let gsm = "a".repeat(len);
        let ucs2 = "ğ".repeat(len);
        group.bench_function(format!("gsm7 {label}"), |b| {
            b.iter(|| black_box(split_segments(black_box(&gsm), SINGLE_SEGMENT_LIMIT)));
        });
        group.bench_function(format!("ucs2 {label}"), |b| {
            b.iter(|| black_box(split_segments(black_box(&ucs2), SINGLE_SEGMENT_LIMIT)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split_segments);
criterion_main!(benches);
