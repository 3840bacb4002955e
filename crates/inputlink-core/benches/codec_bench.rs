//! Criterion benchmarks for the inputlink frame codec.
//!
//! Measures encode and decode latency for every message variant; keyboard and
//! mouse-move frames are the hot path during live forwarding.
//!
//! Run with:
//! ```bash
//! cargo bench --package inputlink-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use inputlink_core::{decode_frame, encode_frame, Axis, PointerButton, WireMessage};

// ── Message fixtures ──────────────────────────────────────────────────────────

fn fixtures() -> Vec<(&'static str, WireMessage)> {
    vec![
        (
            "Connected",
            WireMessage::Connected {
                message: "inputlink sender on bench-host".to_string(),
            },
        ),
        (
            "Keyboard",
            WireMessage::Keyboard {
                code: 0x04,
                pressed: true,
                key_name: "KeyA".to_string(),
            },
        ),
        ("MouseMove", WireMessage::MouseMove { axis: Axis::X, value: -7 }),
        (
            "MouseButton",
            WireMessage::MouseButton {
                button: PointerButton::Left,
                pressed: true,
            },
        ),
        ("Ping", WireMessage::Ping { time: 1_700_000_000.125 }),
    ]
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_frame");
    for (name, msg) in &fixtures() {
        group.bench_with_input(BenchmarkId::new("msg", name), msg, |b, msg| {
            b.iter(|| encode_frame(black_box(msg)).expect("encode must succeed"))
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_frame");
    for (name, msg) in &fixtures() {
        let bytes = encode_frame(msg).expect("encode must succeed for benchmark setup");
        group.bench_with_input(BenchmarkId::new("msg", name), &bytes, |b, bytes| {
            b.iter(|| decode_frame(black_box(bytes)).expect("decode must succeed"))
        });
    }
    group.finish();
}

fn bench_roundtrip_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_decode_roundtrip");

    // Keyboard: highest frequency during text input.
    let key_msg = WireMessage::Keyboard {
        code: 0x04,
        pressed: true,
        key_name: "KeyA".to_string(),
    };
    group.bench_function("Keyboard", |b| {
        b.iter(|| {
            let bytes = encode_frame(black_box(&key_msg)).unwrap();
            decode_frame(black_box(&bytes)).unwrap()
        })
    });

    // MouseMove: highest frequency during pointer motion.
    let move_msg = WireMessage::MouseMove { axis: Axis::Y, value: 3 };
    group.bench_function("MouseMove", |b| {
        b.iter(|| {
            let bytes = encode_frame(black_box(&move_msg)).unwrap();
            decode_frame(black_box(&bytes)).unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_roundtrip_hot_path);
criterion_main!(benches);
