use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyvalues3::{from_slice, from_str, kv3, to_string, to_vec, Encoding, Value, WriteOptions};

fn npc(i: usize) -> Value {
    kv3!({
        "name": (format!("npc_guard_{}", i)),
        "model": (resource: "models/npc/guard.vmdl"),
        "health": (100 + i as i64),
        "reaction_time": 0.12,
        "weapons": ["pistol", "smg"],
        "hostile": true
    })
}

fn roster(size: usize) -> Value {
    Value::Array((0..size).map(npc).collect())
}

fn benchmark_write_text(c: &mut Criterion) {
    let value = npc(0);

    c.bench_function("write_text_simple", |b| {
        b.iter(|| to_string(black_box(&value)))
    });
}

fn benchmark_read_text(c: &mut Criterion) {
    let text = to_string(&npc(0)).unwrap();

    c.bench_function("read_text_simple", |b| {
        b.iter(|| from_str(black_box(&text)))
    });
}

fn benchmark_text_roster(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_roster");

    for size in [10, 100, 1000].iter() {
        let value = roster(*size);
        let text = to_string(&value).unwrap();

        group.bench_with_input(BenchmarkId::new("write", size), &value, |b, value| {
            b.iter(|| to_string(black_box(value)))
        });
        group.bench_with_input(BenchmarkId::new("read", size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_binary_roster(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_roster");

    for (label, encoding) in [
        ("binary", Encoding::BINARY_UNCOMPRESSED),
        ("binarylz4", Encoding::BINARY_LZ4),
    ] {
        let options = WriteOptions::new().with_encoding(encoding);
        for size in [10, 100, 1000].iter() {
            let value = roster(*size);
            let bytes = to_vec(&value, &options).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("write_{}", label), size),
                &value,
                |b, value| b.iter(|| to_vec(black_box(value), &options)),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("read_{}", label), size),
                &bytes,
                |b, bytes| b.iter(|| from_slice(black_box(bytes))),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_write_text,
    benchmark_read_text,
    benchmark_text_roster,
    benchmark_binary_roster
);

criterion_main!(benches);
