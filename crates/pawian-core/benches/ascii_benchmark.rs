use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use pawian_core::{
    data::{SAMPLE_ASCII, SAMPLE_PARTICLES},
    mass, read_ascii_from, write_ascii_to, AsciiReadOptions, AsciiWriteOptions, PwaAccessor,
};

const N_COPIES: usize = 5000;

fn ascii_benchmark(c: &mut Criterion) {
    let text = SAMPLE_ASCII.repeat(N_COPIES);
    let options = AsciiReadOptions::new().particles(SAMPLE_PARTICLES);
    c.bench_function("read ascii benchmark", |b| {
        b.iter(|| black_box(read_ascii_from(text.as_bytes(), &options).unwrap()));
    });
    let df = read_ascii_from(text.as_bytes(), &options).unwrap();
    c.bench_function("write ascii benchmark", |b| {
        b.iter_batched(
            || Vec::with_capacity(text.len()),
            |mut buffer| {
                write_ascii_to(&df, &mut buffer, &AsciiWriteOptions::new()).unwrap();
                black_box(buffer)
            },
            BatchSize::LargeInput,
        );
    });
    c.bench_function("invariant mass benchmark", |b| {
        b.iter(|| {
            let pwa = PwaAccessor::new(&df).unwrap();
            black_box(pwa.evaluate(mass(["D0", "D-"])).unwrap())
        });
    });
}

criterion_group!(benches, ascii_benchmark);
criterion_main!(benches);
