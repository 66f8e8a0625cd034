use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use phixps::phi::{scan_markers, DecoderConfig, PhiDecoder};

fn generate_phi_file(regions: usize, points: usize, padding_words: usize) -> Vec<u8> {
    let mut text = String::from("SOFH\nFileDesc: bench\n");
    for i in 0..regions {
        text.push_str(&format!(
            "SpectralRegDef: {} {} R{} 6 {} -0.1 {}.0 {}.0\n",
            i + 1,
            i + 1,
            i,
            points,
            1000 + i,
            900 + i
        ));
    }
    text.push_str("EOFH\n");
    let mut bytes = text.into_bytes();

    for i in 0..regions {
        for (label, value) in [
            (b"pnt\0", points as u32),
            (b"sar\0", 1),
            (b"c/s\0", 0),
            (b"f4\0\0", 4),
        ] {
            bytes.extend_from_slice(label);
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend(std::iter::repeat(0u8).take(padding_words * 4));
        for j in 0..points {
            let value = 2000.0 + ((i * 7 + j) % 500) as f32 * 1.37;
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &(regions, points) in &[(5usize, 201usize), (5, 1356), (20, 801)] {
        let content = generate_phi_file(regions, points, 24);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", format!("{}x{}", regions, points)),
            &content,
            |b, content| {
                let decoder = PhiDecoder::default();
                b.iter(|| decoder.decode(black_box(content)).unwrap())
            },
        );

        group.bench_with_input(
            BenchmarkId::new("parallel_flag", format!("{}x{}", regions, points)),
            &content,
            |b, content| {
                let decoder = PhiDecoder::new(DecoderConfig {
                    parallel: true,
                    ..DecoderConfig::default()
                })
                .unwrap();
                b.iter(|| decoder.decode(black_box(content)).unwrap())
            },
        );
    }

    group.finish();
}

fn bench_marker_scan(c: &mut Criterion) {
    let content = generate_phi_file(20, 1356, 24);
    c.bench_function("scan_markers", |b| {
        b.iter(|| scan_markers(black_box(&content), 0, b"pnt"))
    });
}

criterion_group!(benches, bench_decode, bench_marker_scan);
criterion_main!(benches);
