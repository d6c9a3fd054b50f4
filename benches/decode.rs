// benches/decode.rs
//! Decode-path benchmarks
//!
//! The poll loop copies library-owned buffers and decodes timestamp groups
//! on every iteration; these benches keep an eye on that hot path.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use balert_sdk::data::{SampleBlock, ThirdPartyPacket, TimestampBlock};

fn bench_sample_rows(c: &mut Criterion) {
    // One busy poll: 24 channels, 256 samples.
    let width = 24 + 6;
    let values: Vec<f32> = (0..width * 256).map(|v| v as f32 * 0.5).collect();
    let block = SampleBlock::new(24, values);

    c.bench_function("sample_block_row_iteration", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for row in black_box(&block).rows() {
                acc += row.channels().iter().sum::<f32>();
            }
            black_box(acc)
        })
    });
}

fn bench_timestamp_decode(c: &mut Criterion) {
    let bytes: Vec<u8> = (0..256u32).flat_map(|v| v.to_be_bytes()).collect();
    let block = TimestampBlock::new(bytes);

    c.bench_function("timestamp_millis_decode", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for stamp in black_box(&block).iter() {
                acc = acc.wrapping_add(stamp.millis());
            }
            black_box(acc)
        })
    });
}

fn bench_third_party_parse(c: &mut Criterion) {
    let mut stream = Vec::new();
    for counter in 0..64u8 {
        stream.extend_from_slice(&[0x56, 0x5A, counter]);
        stream.extend_from_slice(&(counter as u32 * 4).to_be_bytes());
        stream.extend_from_slice(&16u16.to_be_bytes());
        stream.push(0x10);
        stream.extend_from_slice(&[counter; 16]);
        stream.push(0);
    }

    c.bench_function("third_party_parse_stream", |b| {
        b.iter(|| ThirdPartyPacket::parse_stream(black_box(&stream)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_sample_rows,
    bench_timestamp_decode,
    bench_third_party_parse
);
criterion_main!(benches);
