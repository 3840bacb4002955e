//! Criterion benchmarks for the scan-code translation tables.
//!
//! The lookups sit on the per-event hot path of every capture loop, so they
//! should stay branch-table cheap.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inputlink_core::ScanCodeTable;

fn bench_key_lookup(c: &mut Criterion) {
    // A mix of mapped, modifier, and unmapped codes.
    let codes: Vec<u16> = vec![30, 48, 57, 28, 105, 88, 29, 42, 240, 999];

    c.bench_function("to_portable_mixed", |b| {
        b.iter(|| {
            for &code in &codes {
                black_box(ScanCodeTable::to_portable(black_box(code)));
            }
        })
    });

    c.bench_function("modifier_bit_mixed", |b| {
        b.iter(|| {
            for &code in &codes {
                black_box(ScanCodeTable::modifier_bit(black_box(code)));
            }
        })
    });
}

fn bench_button_and_axis_lookup(c: &mut Criterion) {
    c.bench_function("pointer_button", |b| {
        b.iter(|| black_box(ScanCodeTable::pointer_button(black_box(0x110))))
    });
    c.bench_function("relative_axis", |b| {
        b.iter(|| black_box(ScanCodeTable::relative_axis(black_box(0))))
    });
}

criterion_group!(benches, bench_key_lookup, bench_button_and_axis_lookup);
criterion_main!(benches);
